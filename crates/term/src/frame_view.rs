//! FrameView: maps a rendered [`Frame`] plus HUD state into a terminal
//! framebuffer.
//!
//! Each terminal cell shows two vertically stacked pixels using an upper half
//! block, which gives roughly square pixels on common terminal fonts. The frame
//! is scaled (nearest neighbour) to the largest size that fits the viewport
//! without distorting its aspect ratio, and centered.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::Frame;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Whether the stylization toggle is on, off, or has nothing to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylizationStatus {
    On,
    Off,
    Unavailable,
}

/// What the status line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudView<'a> {
    pub stylization: StylizationStatus,
    pub stylizer: Option<&'a str>,
    pub preset: &'a str,
    /// Ticks since the displayed frame's source was rendered
    pub staleness: u64,
    pub in_flight: bool,
    pub fps: u32,
}

const CONTROLS: &str = "WASD/arrows move  SPACE stylize  TAB style  Q quit";

const BACKGROUND: Rgb = Rgb::new(0, 0, 0);

/// Terminal presenter for rendered frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameView {
    show_hud: bool,
}

impl Default for FrameView {
    fn default() -> Self {
        Self { show_hud: true }
    }
}

impl FrameView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_hud() -> Self {
        Self { show_hud: false }
    }

    /// Render into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers reuse one framebuffer
    /// across frames; it only reallocates when the viewport grows.
    pub fn render_into(
        &self,
        frame: &Frame,
        hud: Option<&HudView<'_>>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell {
            ch: ' ',
            style: CellStyle::colors(Rgb::new(220, 220, 220), BACKGROUND),
        });

        let hud = hud.filter(|_| self.show_hud && viewport.height >= 3);
        let (top, rows) = if hud.is_some() {
            (1, viewport.height - 2)
        } else {
            (0, viewport.height)
        };

        self.draw_image(frame, fb, top, viewport.width, rows);

        if let Some(hud) = hud {
            self.draw_status_line(fb, hud, 0);
            self.draw_controls_line(fb, viewport.height - 1);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, frame: &Frame, hud: Option<&HudView<'_>>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(frame, hud, viewport, &mut fb);
        fb
    }

    fn draw_image(&self, frame: &Frame, fb: &mut FrameBuffer, top: u16, cols: u16, rows: u16) {
        let (fw, fh) = (frame.width() as u32, frame.height() as u32);
        let (area_w, area_h) = (cols as u32, rows as u32 * 2);
        if fw == 0 || fh == 0 || area_w == 0 || area_h == 0 {
            return;
        }

        // Fit by whichever axis is tighter.
        let (out_w, out_h) = if area_w * fh <= area_h * fw {
            (area_w, (area_w * fh / fw).max(1))
        } else {
            ((area_h * fw / fh).max(1), area_h)
        };

        let out_rows = out_h.div_ceil(2);
        let x0 = top_left(area_w, out_w);
        let y0 = top as u32 + top_left(rows as u32, out_rows);

        let sample = |px: u32, py: u32| -> Rgb {
            if py >= out_h {
                return BACKGROUND;
            }
            let sx = (px * fw / out_w).min(fw - 1) as u16;
            let sy = (py * fh / out_h).min(fh - 1) as u16;
            frame.get(sx, sy).unwrap_or(BACKGROUND)
        };

        for cy in 0..out_rows {
            for cx in 0..out_w {
                let top_px = sample(cx, cy * 2);
                let bottom_px = sample(cx, cy * 2 + 1);
                fb.set(
                    (x0 + cx) as u16,
                    (y0 + cy) as u16,
                    Cell::half_block(top_px, bottom_px),
                );
            }
        }
    }

    fn draw_status_line(&self, fb: &mut FrameBuffer, hud: &HudView<'_>, y: u16) {
        let bar = CellStyle::colors(Rgb::new(200, 200, 200), Rgb::new(20, 20, 28));
        fb.fill_rect(0, y, fb.width(), 1, ' ', bar);

        let (label, badge) = match hud.stylization {
            StylizationStatus::On => (
                " SD ON ",
                CellStyle::colors(Rgb::new(0, 0, 0), Rgb::new(80, 200, 80)).bold(),
            ),
            StylizationStatus::Off => (
                " SD OFF ",
                CellStyle::colors(Rgb::new(0, 0, 0), Rgb::new(220, 200, 60)).bold(),
            ),
            StylizationStatus::Unavailable => (
                " SD N/A ",
                CellStyle::colors(Rgb::new(160, 160, 160), Rgb::new(60, 60, 60)).dim(),
            ),
        };
        let mut x = fb.put_str(0, y, label, badge);

        let sep = bar.dim();
        let value = bar.bold();
        x = fb.put_str(x, y, " ", bar);
        if let Some(name) = hud.stylizer {
            x = fb.put_str(x, y, name, value);
            x = fb.put_str(x, y, " | ", sep);
        }
        x = fb.put_str(x, y, hud.preset, value);

        if hud.stylization == StylizationStatus::On {
            x = fb.put_str(x, y, " | stale ", sep);
            x = fb.put_u64(x, y, hud.staleness, value);
            if hud.in_flight {
                x = fb.put_str(x, y, " | busy", sep);
            }
        }

        x = fb.put_str(x, y, " | ", sep);
        x = fb.put_u64(x, y, hud.fps as u64, value);
        fb.put_str(x, y, " fps", sep);
    }

    fn draw_controls_line(&self, fb: &mut FrameBuffer, y: u16) {
        let style = CellStyle::colors(Rgb::new(140, 140, 150), BACKGROUND);
        let w = CONTROLS.chars().count() as u16;
        let x = fb.width().saturating_sub(w) / 2;
        fb.put_str(x, y, CONTROLS, style);
    }
}

fn top_left(available: u32, used: u32) -> u32 {
    available.saturating_sub(used) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::HALF_BLOCK;

    fn row_text(fb: &FrameBuffer, y: u16) -> String {
        (0..fb.width())
            .filter_map(|x| fb.get(x, y))
            .map(|c| c.ch)
            .collect()
    }

    fn hud(stylization: StylizationStatus) -> HudView<'static> {
        HudView {
            stylization,
            stylizer: Some("posterize"),
            preset: "dungeon",
            staleness: 7,
            in_flight: true,
            fps: 60,
        }
    }

    #[test]
    fn exact_fit_maps_pixel_pairs_to_cells() {
        let mut frame = Frame::new(2, 2);
        frame.set(0, 0, Rgb::new(1, 0, 0));
        frame.set(0, 1, Rgb::new(2, 0, 0));
        frame.set(1, 0, Rgb::new(3, 0, 0));
        frame.set(1, 1, Rgb::new(4, 0, 0));

        let fb = FrameView::without_hud().render(&frame, None, Viewport::new(2, 1));
        assert_eq!(
            fb.get(0, 0),
            Some(Cell::half_block(Rgb::new(1, 0, 0), Rgb::new(2, 0, 0)))
        );
        assert_eq!(
            fb.get(1, 0),
            Some(Cell::half_block(Rgb::new(3, 0, 0), Rgb::new(4, 0, 0)))
        );
    }

    #[test]
    fn square_frame_is_centered_horizontally_in_wide_viewport() {
        let frame = Frame::filled(4, 4, Rgb::new(9, 9, 9));
        let fb = FrameView::without_hud().render(&frame, None, Viewport::new(10, 2));
        // 4x4 pixels fill 4 columns by 2 rows; 3 blank columns each side.
        for x in 0..10 {
            let drawn = fb.get(x, 0).map(|c| c.ch) == Some(HALF_BLOCK);
            assert_eq!(drawn, (3..7).contains(&x), "column {x}");
        }
    }

    #[test]
    fn frame_scales_up_to_fill_viewport() {
        let frame = Frame::filled(2, 2, Rgb::new(5, 5, 5));
        let fb = FrameView::without_hud().render(&frame, None, Viewport::new(8, 4));
        let drawn = fb.cells().iter().filter(|c| c.ch == HALF_BLOCK).count();
        assert_eq!(drawn, 32);
    }

    #[test]
    fn hud_lines_frame_the_image() {
        let frame = Frame::new(8, 8);
        let fb = FrameView::new().render(
            &frame,
            Some(&hud(StylizationStatus::On)),
            Viewport::new(80, 10),
        );
        let status = row_text(&fb, 0);
        assert!(status.starts_with(" SD ON "), "{status}");
        assert!(status.contains("posterize"));
        assert!(status.contains("dungeon"));
        assert!(status.contains("stale 7"));
        assert!(status.contains("busy"));
        assert!(status.contains("60 fps"));
        assert!(row_text(&fb, 9).contains("SPACE stylize"));
        assert!(!row_text(&fb, 0).contains(HALF_BLOCK));
    }

    #[test]
    fn staleness_hidden_when_stylization_off() {
        let frame = Frame::new(8, 8);
        let fb = FrameView::new().render(
            &frame,
            Some(&hud(StylizationStatus::Off)),
            Viewport::new(80, 10),
        );
        let status = row_text(&fb, 0);
        assert!(status.starts_with(" SD OFF "));
        assert!(!status.contains("stale"));
    }

    #[test]
    fn tiny_viewports_do_not_panic() {
        let frame = Frame::new(128, 128);
        let view = FrameView::new();
        for (w, h) in [(0, 0), (1, 1), (1, 3), (3, 2), (200, 1)] {
            let fb = view.render(&frame, Some(&hud(StylizationStatus::On)), Viewport::new(w, h));
            assert_eq!((fb.width(), fb.height()), (w, h));
        }
    }
}
