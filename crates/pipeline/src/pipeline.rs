//! Frame pipeline - decouples the render tick from the slow stylizer.
//!
//! Bridges the sync tick loop with a background tokio worker.
//!
//! Per tick the pipeline is either `Idle` or `InFlight`:
//!
//! - **Idle, stylization on**: the raw frame is copied and submitted to the
//!   stylizer on the worker; the displayed frame is left as it is.
//! - **Idle, stylization off**: the raw frame becomes the displayed frame.
//! - **InFlight**: the raw frame is dropped (never queued). When the request
//!   completes, its output replaces the displayed frame and the pipeline is
//!   idle again.
//!
//! The displayed frame, the in-flight flag, and the generation counter live
//! under one mutex. The worker swaps in a complete `Arc<Frame>` under that lock,
//! so readers only ever see whole frames. Every enable/disable bumps the
//! generation; a completion whose captured generation no longer matches is
//! discarded. Failures are logged and discarded.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::runtime::{Builder, Runtime};

use crate::style::StyleParams;
use crate::stylizer::{Stylizer, TransformError};
use crate::types::Frame;

/// Whether a stylization request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    InFlight,
}

/// Where the displayed frame came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    Raw,
    Stylized,
}

/// Counters since the pipeline was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    /// Raw frames handed to the stylizer
    pub submitted: u64,
    /// Raw frames skipped because a request was in flight
    pub dropped: u64,
    /// Stylized frames that became the displayed frame
    pub completed: u64,
    /// Stylized frames thrown away because stylization was toggled meanwhile
    pub discarded: u64,
    /// Requests that ended in a [`TransformError`]
    pub failed: u64,
}

/// What the display should show this tick.
#[derive(Debug, Clone)]
pub struct DisplayedFrame {
    pub frame: Arc<Frame>,
    pub source: FrameSource,
    /// Ticks between the raw frame this image came from and the current tick
    pub staleness: u64,
    pub state: PipelineState,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    generation: u64,
    tick: u64,
    submitted_at: Instant,
}

#[derive(Debug)]
struct Slot {
    displayed: Arc<Frame>,
    source: FrameSource,
    /// Tick of the raw frame the displayed image was produced from
    displayed_tick: u64,
    seeded: bool,
    enabled: bool,
    generation: u64,
    in_flight: Option<InFlight>,
    stats: PipelineStats,
}

#[derive(Debug)]
struct Shared {
    slot: Mutex<Slot>,
    idle: Condvar,
}

impl Shared {
    // The slot holds plain values that are always left consistent, so a
    // panic while holding the lock does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Completion callback, run on the worker.
    fn complete(&self, request: InFlight, result: Result<Frame, TransformError>) {
        let latency = request.submitted_at.elapsed();
        let mut slot = self.lock();
        slot.in_flight = None;

        match result {
            Ok(frame) if slot.enabled && slot.generation == request.generation => {
                log::debug!(
                    "stylized frame from tick {} ready after {:?}",
                    request.tick,
                    latency
                );
                slot.displayed = Arc::new(frame);
                slot.source = FrameSource::Stylized;
                slot.displayed_tick = request.tick;
                slot.seeded = true;
                slot.stats.completed += 1;
            }
            Ok(_) => {
                log::debug!(
                    "discarding stylized frame from tick {} (generation {} is stale)",
                    request.tick,
                    request.generation
                );
                slot.stats.discarded += 1;
            }
            Err(err) => {
                log::warn!("stylizer failed on tick {}: {}", request.tick, err);
                slot.stats.failed += 1;
            }
        }

        drop(slot);
        self.idle.notify_all();
    }
}

/// Single-slot producer/consumer handoff between the tick loop and a stylizer.
pub struct FramePipeline {
    runtime: Option<Runtime>,
    stylizer: Option<Arc<dyn Stylizer>>,
    shared: Arc<Shared>,
    tick: u64,
}

impl FramePipeline {
    /// Create a pipeline around `stylizer` with its own single-worker runtime.
    ///
    /// `width`/`height` size the placeholder shown before the first tick.
    pub fn new(stylizer: Arc<dyn Stylizer>, width: u16, height: u16) -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(1)
            .thread_name("diffused-rays-stylizer")
            .build()?;
        log::info!("frame pipeline started with stylizer {}", stylizer.name());
        Ok(Self::build(Some(runtime), Some(stylizer), width, height))
    }

    /// A pipeline that always shows the raw frame.
    pub fn without_stylizer(width: u16, height: u16) -> Self {
        Self::build(None, None, width, height)
    }

    fn build(
        runtime: Option<Runtime>,
        stylizer: Option<Arc<dyn Stylizer>>,
        width: u16,
        height: u16,
    ) -> Self {
        let slot = Slot {
            displayed: Arc::new(Frame::new(width, height)),
            source: FrameSource::Raw,
            displayed_tick: 0,
            seeded: false,
            enabled: false,
            generation: 0,
            in_flight: None,
            stats: PipelineStats::default(),
        };
        Self {
            runtime,
            stylizer,
            shared: Arc::new(Shared {
                slot: Mutex::new(slot),
                idle: Condvar::new(),
            }),
            tick: 0,
        }
    }

    pub fn stylizer_name(&self) -> Option<&'static str> {
        self.stylizer.as_ref().map(|s| s.name())
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.lock().enabled
    }

    /// Turn stylization on or off.
    ///
    /// Any change starts a new generation, so a request already in flight is
    /// allowed to finish but its output is discarded. Returns the resulting
    /// state; enabling without a stylizer has no effect.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let enabled = enabled && self.stylizer.is_some();
        let mut slot = self.shared.lock();
        if slot.enabled != enabled {
            slot.enabled = enabled;
            slot.generation += 1;
            log::info!(
                "stylization {} (generation {})",
                if enabled { "enabled" } else { "disabled" },
                slot.generation
            );
        }
        slot.enabled
    }

    pub fn toggle(&mut self) -> bool {
        let enabled = self.is_enabled();
        self.set_enabled(!enabled)
    }

    pub fn state(&self) -> PipelineState {
        if self.shared.lock().in_flight.is_some() {
            PipelineState::InFlight
        } else {
            PipelineState::Idle
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.shared.lock().stats
    }

    /// Number of ticks processed so far
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Current displayed frame without advancing the pipeline.
    pub fn displayed(&self) -> DisplayedFrame {
        let slot = self.shared.lock();
        self.snapshot(&slot)
    }

    fn snapshot(&self, slot: &Slot) -> DisplayedFrame {
        DisplayedFrame {
            frame: Arc::clone(&slot.displayed),
            source: slot.source,
            staleness: self.tick.saturating_sub(slot.displayed_tick),
            state: if slot.in_flight.is_some() {
                PipelineState::InFlight
            } else {
                PipelineState::Idle
            },
        }
    }

    /// Feed this tick's raw frame and get the frame to display.
    ///
    /// Never blocks on the stylizer.
    pub fn tick(&mut self, raw: &Frame, style: &StyleParams) -> DisplayedFrame {
        self.tick += 1;
        let tick = self.tick;
        let mut slot = self.shared.lock();

        // Nothing shown yet: start from this raw frame rather than a blank one.
        if !slot.seeded {
            Arc::make_mut(&mut slot.displayed).copy_from(raw);
            slot.source = FrameSource::Raw;
            slot.displayed_tick = tick;
            slot.seeded = true;
        }

        if !slot.enabled {
            if slot.displayed_tick != tick {
                // Reuses the allocation unless the display still holds the old frame.
                Arc::make_mut(&mut slot.displayed).copy_from(raw);
                slot.source = FrameSource::Raw;
                slot.displayed_tick = tick;
            }
        } else if slot.in_flight.is_some() {
            slot.stats.dropped += 1;
        } else if let (Some(stylizer), Some(runtime)) = (&self.stylizer, &self.runtime) {
            let request = InFlight {
                generation: slot.generation,
                tick,
                submitted_at: Instant::now(),
            };
            slot.in_flight = Some(request);
            slot.stats.submitted += 1;

            let frame = raw.clone();
            let style = style.clone();
            let stylizer = Arc::clone(stylizer);
            let shared = Arc::clone(&self.shared);
            runtime.spawn_blocking(move || {
                let result =
                    panic::catch_unwind(AssertUnwindSafe(|| stylizer.stylize(&frame, &style)))
                        .unwrap_or(Err(TransformError::Panicked))
                        .and_then(|out| {
                            if out.same_size(&frame) {
                                Ok(out)
                            } else {
                                let (w, h) = out.dimensions();
                                Err(TransformError::SizeMismatch {
                                    expected: frame.dimensions(),
                                    found: (w as u32, h as u32),
                                })
                            }
                        });
                shared.complete(request, result);
            });
            log::trace!("submitted tick {} (generation {})", tick, request.generation);
        }

        self.snapshot(&slot)
    }

    /// Block until no request is in flight or `timeout` elapses.
    ///
    /// Returns true if the pipeline is idle. Meant for tests and shutdown; the
    /// tick loop never waits.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let slot = self.shared.lock();
        let (slot, _) = self
            .shared
            .idle
            .wait_timeout_while(slot, timeout, |s| s.in_flight.is_some())
            .unwrap_or_else(PoisonError::into_inner);
        slot.in_flight.is_none()
    }
}

impl Drop for FramePipeline {
    fn drop(&mut self) {
        // The stylizer cannot be interrupted; leave a hung request behind
        // instead of blocking exit on it.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    struct Invert;

    impl Stylizer for Invert {
        fn stylize(&self, frame: &Frame, _: &StyleParams) -> Result<Frame, TransformError> {
            let mut out = frame.clone();
            for p in out.pixels_mut() {
                *p = Rgb::new(255 - p.r, 255 - p.g, 255 - p.b);
            }
            Ok(out)
        }

        fn name(&self) -> &'static str {
            "invert"
        }
    }

    struct Shrink;

    impl Stylizer for Shrink {
        fn stylize(&self, _: &Frame, _: &StyleParams) -> Result<Frame, TransformError> {
            Ok(Frame::new(1, 1))
        }

        fn name(&self) -> &'static str {
            "shrink"
        }
    }

    struct Explode;

    impl Stylizer for Explode {
        fn stylize(&self, _: &Frame, _: &StyleParams) -> Result<Frame, TransformError> {
            panic!("model crashed")
        }

        fn name(&self) -> &'static str {
            "explode"
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn disabled_pipeline_shows_raw_frames() {
        let mut p = FramePipeline::new(Arc::new(Invert), 2, 2).unwrap();
        let raw = Frame::filled(2, 2, Rgb::new(10, 20, 30));
        let shown = p.tick(&raw, &StyleParams::default());
        assert_eq!(*shown.frame, raw);
        assert_eq!(shown.source, FrameSource::Raw);
        assert_eq!(shown.staleness, 0);
        assert_eq!(p.stats().submitted, 0);
    }

    #[test]
    fn completed_request_replaces_displayed_frame() {
        let mut p = FramePipeline::new(Arc::new(Invert), 2, 2).unwrap();
        assert!(p.set_enabled(true));
        let raw = Frame::filled(2, 2, Rgb::new(10, 20, 30));
        p.tick(&raw, &StyleParams::default());
        assert!(p.wait_idle(WAIT));
        let shown = p.displayed();
        assert_eq!(shown.source, FrameSource::Stylized);
        assert_eq!(shown.frame.get(0, 0), Some(Rgb::new(245, 235, 225)));
        assert_eq!(p.stats().completed, 1);
    }

    #[test]
    fn size_mismatch_is_a_failure() {
        let mut p = FramePipeline::new(Arc::new(Shrink), 2, 2).unwrap();
        p.set_enabled(true);
        let raw = Frame::filled(2, 2, Rgb::new(1, 1, 1));
        p.tick(&raw, &StyleParams::default());
        assert!(p.wait_idle(WAIT));
        assert_eq!(p.stats().failed, 1);
        assert_eq!(*p.displayed().frame, raw);
        assert_eq!(p.state(), PipelineState::Idle);
    }

    #[test]
    fn panicking_stylizer_does_not_wedge_pipeline() {
        let mut p = FramePipeline::new(Arc::new(Explode), 2, 2).unwrap();
        p.set_enabled(true);
        let raw = Frame::new(2, 2);
        p.tick(&raw, &StyleParams::default());
        assert!(p.wait_idle(WAIT));
        assert_eq!(p.stats().failed, 1);
        p.tick(&raw, &StyleParams::default());
        assert!(p.wait_idle(WAIT));
        assert_eq!(p.stats().submitted, 2);
    }

    #[test]
    fn without_stylizer_cannot_be_enabled() {
        let mut p = FramePipeline::without_stylizer(2, 2);
        assert!(!p.set_enabled(true));
        assert!(!p.toggle());
        assert_eq!(p.stylizer_name(), None);
        let raw = Frame::filled(2, 2, Rgb::new(9, 9, 9));
        assert_eq!(*p.tick(&raw, &StyleParams::default()).frame, raw);
    }
}
