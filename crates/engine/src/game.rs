//! Game - one tick of input, movement, rendering, and frame pipeline.

use std::sync::Arc;

use thiserror::Error;

use crate::core::maps::{test_map, TEST_MAP_START};
use crate::core::{
    GridMap, InvalidMapError, MoveOutcome, NonFiniteInputError, Player, Raycaster, RenderParams,
    SpawnError,
};
use crate::pipeline::{
    ConfigError, DisplayedFrame, FramePipeline, StylePreset, StylePresets, Stylizer,
};
use crate::types::{Frame, InputSample};

use crate::config::GameConfig;

/// Startup failure. Nothing in [`Game::tick`] returns one of these.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid map: {0}")]
    Map(#[from] InvalidMapError),

    #[error("invalid start pose: {0}")]
    Spawn(#[from] SpawnError),

    #[error("invalid render parameters: {0}")]
    Render(#[from] NonFiniteInputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start stylizer worker: {0}")]
    Worker(#[from] std::io::Error),
}

/// Outcome of one [`Game::tick`].
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Frame to present this tick
    pub displayed: DisplayedFrame,
    /// Quit was requested; nothing else was processed
    pub quit: bool,
    /// Result of this tick's translation, if any was requested
    pub movement: Option<MoveOutcome>,
    /// This tick's movement was dropped because of non-finite input
    pub input_rejected: bool,
}

/// Owns the world and drives it one tick at a time.
pub struct Game {
    map: GridMap,
    player: Player,
    raycaster: Raycaster,
    raw: Frame,
    pipeline: FramePipeline,
    presets: StylePresets,
    move_speed: f64,
    turn_speed: f64,
    ticks: u64,
}

impl Game {
    /// Built-in map, configured stylizer.
    pub fn new(config: &GameConfig) -> Result<Self, EngineError> {
        let map = test_map()?;
        let stylizer = config.stylizer.build()?;
        let mut game = Self::with_parts(map, TEST_MAP_START, config, stylizer)?;
        if config.stylizer.enabled_on_start {
            game.pipeline.set_enabled(true);
        }
        Ok(game)
    }

    /// Assemble a game from an explicit map, start pose, and stylizer.
    ///
    /// Stylization starts disabled.
    pub fn with_parts(
        map: GridMap,
        start: (f64, f64, f64),
        config: &GameConfig,
        stylizer: Option<Arc<dyn Stylizer>>,
    ) -> Result<Self, EngineError> {
        let (x, y, heading) = start;
        let player = Player::spawn(x, y, heading, &map)?;
        let raycaster = Raycaster::new(RenderParams::default().with_fov_degrees(config.fov_degrees))?;
        let (width, height) = (raycaster.params().width, raycaster.params().height);
        let pipeline = match stylizer {
            Some(stylizer) => FramePipeline::new(stylizer, width, height)?,
            None => FramePipeline::without_stylizer(width, height),
        };
        log::info!(
            "game ready: map {}x{}, start ({x}, {y}) heading {heading}",
            map.width(),
            map.height()
        );

        Ok(Self {
            map,
            player,
            raycaster,
            raw: Frame::new(width, height),
            pipeline,
            presets: StylePresets::default(),
            move_speed: config.move_speed,
            turn_speed: config.turn_speed,
            ticks: 0,
        })
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn raycaster(&self) -> &Raycaster {
        &self.raycaster
    }

    /// This tick's raw render.
    pub fn raw_frame(&self) -> &Frame {
        &self.raw
    }

    pub fn pipeline(&self) -> &FramePipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut FramePipeline {
        &mut self.pipeline
    }

    pub fn preset(&self) -> &StylePreset {
        self.presets.current()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Apply one input sample over `dt_secs` seconds and produce the frame to
    /// display.
    ///
    /// A non-finite `dt_secs` skips movement for this tick only; rendering and
    /// the pipeline still run. Negative values are treated as zero.
    pub fn tick(&mut self, input: &InputSample, dt_secs: f64) -> TickReport {
        if input.quit {
            return TickReport {
                displayed: self.pipeline.displayed(),
                quit: true,
                movement: None,
                input_rejected: false,
            };
        }
        self.ticks += 1;

        if input.toggle_stylization {
            if self.pipeline.stylizer_name().is_none() {
                log::info!("stylization unavailable: no stylizer configured");
            } else {
                self.pipeline.toggle();
            }
        }
        if input.cycle_style {
            let preset = self.presets.cycle();
            log::info!("style preset: {}", preset.name);
        }

        let (movement, input_rejected) = match self.apply_motion(input, dt_secs) {
            Ok(movement) => (movement, false),
            Err(err) => {
                log::warn!("tick {}: movement skipped: {err}", self.ticks);
                (None, true)
            }
        };

        self.raycaster
            .render_into(&self.player, &self.map, &mut self.raw);
        let displayed = self.pipeline.tick(&self.raw, &self.presets.current().params);

        TickReport {
            displayed,
            quit: false,
            movement,
            input_rejected,
        }
    }

    fn apply_motion(
        &mut self,
        input: &InputSample,
        dt_secs: f64,
    ) -> Result<Option<MoveOutcome>, NonFiniteInputError> {
        let dt = NonFiniteInputError::check("dt", dt_secs)?.max(0.0);

        let turn = axis(input.turn_right, input.turn_left);
        if turn != 0.0 {
            // +heading turns right on screen (+y points down).
            self.player.rotate(turn * self.turn_speed * dt)?;
        }

        let drive = axis(input.move_forward, input.move_back);
        if drive == 0.0 {
            return Ok(None);
        }
        let outcome = self
            .player
            .forward(drive * self.move_speed * dt, &self.map)?;
        if outcome != MoveOutcome::Moved {
            log::debug!(
                "move {:?} at ({:.2}, {:.2})",
                outcome,
                self.player.x(),
                self.player.y()
            );
        }
        Ok(Some(outcome))
    }
}

fn axis(positive: bool, negative: bool) -> f64 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{FrameSource, PosterizeStylizer};
    use crate::types::InputAction;
    use std::f64::consts::TAU;
    use std::time::Duration;

    fn game() -> Game {
        let map = test_map().unwrap();
        Game::with_parts(map, TEST_MAP_START, &GameConfig::default(), None).unwrap()
    }

    fn input(actions: &[InputAction]) -> InputSample {
        InputSample::with(actions)
    }

    #[test]
    fn forward_moves_along_heading_by_speed_times_dt() {
        let mut g = game();
        let report = g.tick(&input(&[InputAction::MoveForward]), 0.5);
        assert_eq!(report.movement, Some(MoveOutcome::Moved));
        assert!((g.player().x() - 6.5).abs() < 1e-9);
        assert!((g.player().y() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn back_moves_opposite_heading() {
        let mut g = game();
        g.tick(&input(&[InputAction::MoveBack]), 0.5);
        assert!((g.player().x() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn right_turn_increases_heading_left_decreases() {
        let mut g = game();
        g.tick(&input(&[InputAction::TurnRight]), 0.5);
        assert!((g.player().heading() - 1.0).abs() < 1e-9);

        let mut g = game();
        g.tick(&input(&[InputAction::TurnLeft]), 0.5);
        assert!((g.player().heading() - (TAU - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut g = game();
        let report = g.tick(
            &input(&[
                InputAction::MoveForward,
                InputAction::MoveBack,
                InputAction::TurnLeft,
                InputAction::TurnRight,
            ]),
            1.0,
        );
        assert_eq!(report.movement, None);
        assert_eq!(g.player().position(), (5.0, 5.0));
        assert_eq!(g.player().heading(), 0.0);
    }

    #[test]
    fn non_finite_dt_skips_movement_but_still_renders() {
        let mut g = game();
        let report = g.tick(&input(&[InputAction::MoveForward]), f64::NAN);
        assert!(report.input_rejected);
        assert_eq!(g.player().position(), (5.0, 5.0));
        assert_eq!(*report.displayed.frame, *g.raw_frame());

        let report = g.tick(&input(&[InputAction::MoveForward]), 0.1);
        assert!(!report.input_rejected);
        assert!(g.player().x() > 5.0);
    }

    #[test]
    fn move_into_outer_wall_is_rejected() {
        let mut g = game();
        let report = g.tick(&input(&[InputAction::MoveForward]), 2.0);
        assert_ne!(report.movement, Some(MoveOutcome::Moved));
        assert_eq!(g.player().position(), (5.0, 5.0));
    }

    #[test]
    fn quit_short_circuits() {
        let mut g = game();
        let report = g.tick(&input(&[InputAction::Quit, InputAction::MoveForward]), 1.0);
        assert!(report.quit);
        assert_eq!(g.ticks(), 0);
        assert_eq!(g.player().position(), (5.0, 5.0));
    }

    #[test]
    fn cycle_advances_preset() {
        let mut g = game();
        let first = g.preset().name.clone();
        g.tick(&input(&[InputAction::CycleStyle]), 0.0);
        assert_ne!(g.preset().name, first);
    }

    #[test]
    fn toggle_without_stylizer_stays_raw() {
        let mut g = game();
        let report = g.tick(&input(&[InputAction::ToggleStylization]), 0.0);
        assert!(!g.pipeline().is_enabled());
        assert_eq!(report.displayed.source, FrameSource::Raw);
    }

    #[test]
    fn toggle_with_stylizer_eventually_shows_stylized_frame() {
        let map = test_map().unwrap();
        let stylizer: Arc<dyn Stylizer> = Arc::new(PosterizeStylizer::new(Duration::ZERO));
        let mut g =
            Game::with_parts(map, TEST_MAP_START, &GameConfig::default(), Some(stylizer)).unwrap();

        g.tick(&input(&[InputAction::ToggleStylization]), 0.0);
        assert!(g.pipeline().is_enabled());
        assert!(g.pipeline().wait_idle(Duration::from_secs(5)));
        assert_eq!(g.pipeline().displayed().source, FrameSource::Stylized);
    }

    #[test]
    fn spawn_inside_wall_is_a_startup_error() {
        let map = test_map().unwrap();
        let err = Game::with_parts(map, (0.5, 0.5, 0.0), &GameConfig::default(), None);
        assert!(matches!(err, Err(EngineError::Spawn(_))));
    }
}
