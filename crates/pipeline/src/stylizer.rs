//! Stylizer boundary - the slow image-to-image transform.
//!
//! A [`Stylizer`] is a blocking, possibly very slow function from a raw frame to
//! a stylized frame of the same size. The pipeline runs it on a background
//! worker; implementations never see the tick loop.
//!
//! Two implementations ship with the crate:
//!
//! - [`PosterizeStylizer`]: local stand-in that sleeps for a configurable
//!   latency, then quantizes colors
//! - [`CommandStylizer`]: runs an external program per frame, exchanging PNG
//!   images over stdin/stdout and passing the style as JSON in
//!   `DIFFUSED_RAYS_STYLE`

use std::io::{Cursor, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use image::{ImageFormat, RgbImage};
use thiserror::Error;

use crate::style::StyleParams;
use crate::types::{Frame, Rgb};

/// Environment variable carrying the JSON-encoded [`StyleParams`] for
/// [`CommandStylizer`] child processes.
pub const STYLE_ENV: &str = "DIFFUSED_RAYS_STYLE";

/// Failure of one transform request. Never fatal to the tick loop.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("stylizer failed: {0}")]
    Failed(String),

    #[error("stylizer panicked")]
    Panicked,

    #[error("stylized frame is {found:?}, expected {expected:?}")]
    SizeMismatch {
        expected: (u16, u16),
        found: (u32, u32),
    },

    #[error("stylizer process I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("stylizer process exited with {0}")]
    Exit(ExitStatus),

    #[error("image codec: {0}")]
    Image(#[from] image::ImageError),

    #[error("style parameters could not be encoded: {0}")]
    Params(#[from] serde_json::Error),
}

/// Blocking frame transform.
pub trait Stylizer: Send + Sync + 'static {
    /// Transform `frame`. May take hundreds of milliseconds.
    fn stylize(&self, frame: &Frame, params: &StyleParams) -> Result<Frame, TransformError>;

    /// Stylizer name for logs and the HUD
    fn name(&self) -> &'static str;
}

/// Color quantization with an artificial delay.
#[derive(Debug, Clone)]
pub struct PosterizeStylizer {
    latency: Duration,
}

impl PosterizeStylizer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Stylizer for PosterizeStylizer {
    fn stylize(&self, frame: &Frame, params: &StyleParams) -> Result<Frame, TransformError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        // More steps keep more color levels.
        let levels = (params.steps.clamp(1, 14) + 1) as f32;
        let strength = if params.strength.is_finite() {
            params.strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let quantize = |c: u8| {
            let c = c as f32;
            let q = ((c / 255.0) * (levels - 1.0)).round() * 255.0 / (levels - 1.0);
            (c + (q - c) * strength).round().clamp(0.0, 255.0) as u8
        };

        let mut out = frame.clone();
        for p in out.pixels_mut() {
            *p = Rgb::new(quantize(p.r), quantize(p.g), quantize(p.b));
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "posterize"
    }
}

/// External program stylizer: PNG in on stdin, PNG out on stdout.
#[derive(Debug, Clone)]
pub struct CommandStylizer {
    program: String,
    args: Vec<String>,
}

impl CommandStylizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a command line on whitespace. No shell quoting is applied.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Stylizer for CommandStylizer {
    fn stylize(&self, frame: &Frame, params: &StyleParams) -> Result<Frame, TransformError> {
        let png = encode_png(frame)?;
        let style = serde_json::to_string(params)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(STYLE_ENV, style)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransformError::Failed("child stdin unavailable".to_string()))?;

        // Feed stdin from a second thread so a child that writes before it has
        // read everything cannot deadlock against us.
        let (written, output) = thread::scope(|s| {
            let writer = s.spawn(move || stdin.write_all(&png));
            let output = child.wait_with_output();
            (writer.join(), output)
        });
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::debug!("stylizer {} stderr: {}", self.program, stderr.trim());
            return Err(TransformError::Exit(output.status));
        }
        match written {
            Ok(result) => result?,
            Err(_) => return Err(TransformError::Panicked),
        }

        decode_png(&output.stdout)
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

/// Encode a frame as PNG.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, TransformError> {
    let (w, h) = frame.dimensions();
    let img = RgbImage::from_raw(w as u32, h as u32, frame.to_rgb_bytes()).ok_or(
        TransformError::SizeMismatch {
            expected: (w, h),
            found: (w as u32, h as u32),
        },
    )?;
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Decode a PNG (any color type) into an RGB frame.
pub fn decode_png(bytes: &[u8]) -> Result<Frame, TransformError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgb8();
    let (w, h) = img.dimensions();
    let too_big = || TransformError::SizeMismatch {
        expected: (u16::MAX, u16::MAX),
        found: (w, h),
    };
    let width = u16::try_from(w).map_err(|_| too_big())?;
    let height = u16::try_from(h).map_err(|_| too_big())?;
    Frame::from_rgb_bytes(width, height, img.as_raw()).ok_or_else(too_big)
}
