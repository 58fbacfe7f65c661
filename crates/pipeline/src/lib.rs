//! Frame pipeline module - feeds raw renders through a slow stylizer
//!
//! The raycaster produces a frame every few milliseconds; an image-to-image
//! stylizer needs hundreds. This crate keeps the two apart:
//!
//! 1. **Tick**: the loop hands each raw frame to [`FramePipeline::tick`], which
//!    never blocks
//! 2. **Submit**: when idle and enabled, the frame is copied to a background
//!    worker running the [`Stylizer`]
//! 3. **Drop**: while a request is in flight, newer raw frames are skipped
//! 4. **Swap**: on completion the stylized frame atomically replaces the
//!    displayed frame (unless stylization was toggled since submission)
//!
//! The display always has a frame to show. A slow or hung stylizer only makes
//! it stale; a failing one is logged and ignored.
//!
//! # Configuration
//!
//! See [`config`] for the environment variables that select the stylizer.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use diffused_rays_pipeline::{FramePipeline, FrameSource, PosterizeStylizer, StyleParams};
//! use diffused_rays_types::Frame;
//!
//! let stylizer = Arc::new(PosterizeStylizer::new(Duration::ZERO));
//! let mut pipeline = FramePipeline::new(stylizer, 4, 4).unwrap();
//! pipeline.set_enabled(true);
//!
//! let raw = Frame::new(4, 4);
//! pipeline.tick(&raw, &StyleParams::default());
//! assert!(pipeline.wait_idle(Duration::from_secs(5)));
//! assert_eq!(pipeline.displayed().source, FrameSource::Stylized);
//! ```

pub mod config;
pub mod pipeline;
pub mod style;
pub mod stylizer;

pub use diffused_rays_types as types;

pub use config::{ConfigError, StylizerConfig, StylizerKind};
pub use pipeline::{DisplayedFrame, FramePipeline, FrameSource, PipelineState, PipelineStats};
pub use style::{StyleParams, StylePreset, StylePresets};
pub use stylizer::{
    decode_png, encode_png, CommandStylizer, PosterizeStylizer, Stylizer, TransformError,
};
