//! Terminal raycaster runner (default binary).
//!
//! Polls crossterm for input until the next 16 ms tick, advances the game
//! by the measured frame time, and draws the displayed frame with half-block
//! cells. The stylizer runs on the pipeline's background worker, so a slow or
//! hung stylizer never delays this loop.

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use diffused_rays::engine::{Game, GameConfig, TickReport};
use diffused_rays::input::{handle_key_event, InputHandler};
use diffused_rays::pipeline::PipelineState;
use diffused_rays::term::{
    FrameBuffer, FrameView, HudView, StylizationStatus, TerminalRenderer, Viewport,
};
use diffused_rays::types::TICK_MS;

fn main() -> Result<()> {
    init_logging();

    // Startup errors are reported before the terminal is taken over.
    let config = GameConfig::from_env()?;
    let mut game = Game::new(&config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// The terminal is in raw mode on the alternate screen, so logs go to
/// `DIFFUSED_RAYS_LOG_PATH`. Without it, logging stays off unless `RUST_LOG`
/// is set.
fn init_logging() {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filter) => {
            builder.parse_filters(&filter);
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Info);
        }
    }

    match std::env::var_os("DIFFUSED_RAYS_LOG_PATH") {
        Some(path) => match File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
                builder.write_style(env_logger::WriteStyle::Never);
            }
            Err(err) => {
                eprintln!("cannot open log file {}: {err}", path.to_string_lossy());
                builder.filter_level(log::LevelFilter::Off);
            }
        },
        None if std::env::var_os("RUST_LOG").is_none() => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }

    if builder.try_init().is_ok() {
        log::debug!("logging initialized");
    }
}

fn run(term: &mut TerminalRenderer, game: &mut Game) -> Result<()> {
    let view = FrameView::default();
    let mut input = if term.release_events() {
        InputHandler::new().with_release_events()
    } else {
        InputHandler::new()
    };
    let mut fb = FrameBuffer::new(0, 0);
    let mut fps = FpsMeter::new();

    let epoch = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = handle_key_event(key) {
                        let now_ms = epoch.elapsed().as_millis() as u64;
                        match key.kind {
                            KeyEventKind::Press => input.handle_press(action, now_ms),
                            // Auto-repeat only keeps held keys alive.
                            KeyEventKind::Repeat if action.is_held() => {
                                input.handle_press(action, now_ms)
                            }
                            KeyEventKind::Repeat => {}
                            KeyEventKind::Release => input.handle_release(action),
                        }
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                Event::FocusLost => input.release_all(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed < tick_duration {
            continue;
        }
        last_tick = Instant::now();

        let sample = input.sample(epoch.elapsed().as_millis() as u64);
        let report = game.tick(&sample, elapsed.as_secs_f64());
        if report.quit {
            log::info!("quit after {} ticks", game.ticks());
            return Ok(());
        }
        fps.record(last_tick);

        let hud = hud_view(game, &report, fps.fps());
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&report.displayed.frame, Some(&hud), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}

fn hud_view<'a>(game: &'a Game, report: &TickReport, fps: u32) -> HudView<'a> {
    let pipeline = game.pipeline();
    let stylizer = pipeline.stylizer_name();
    let stylization = match (stylizer, pipeline.is_enabled()) {
        (None, _) => StylizationStatus::Unavailable,
        (Some(_), true) => StylizationStatus::On,
        (Some(_), false) => StylizationStatus::Off,
    };
    HudView {
        stylization,
        stylizer,
        preset: &game.preset().name,
        staleness: report.displayed.staleness,
        in_flight: report.displayed.state == PipelineState::InFlight,
        fps,
    }
}

/// Frames presented over the last whole second.
struct FpsMeter {
    window_start: Instant,
    frames: u32,
    fps: u32,
}

impl FpsMeter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            fps: 0,
        }
    }

    fn record(&mut self, now: Instant) {
        self.frames += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= Duration::from_secs(1) {
            self.fps = (self.frames as f64 / window.as_secs_f64()).round() as u32;
            self.frames = 0;
            self.window_start = now;
        }
    }

    fn fps(&self) -> u32 {
        self.fps
    }
}
