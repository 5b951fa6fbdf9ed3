//! Canvas2D executor for scene command lists
//!
//! The only module that touches the drawing surface. Errors from the context
//! are tolerated; a frame that fails to draw is dropped, not fatal.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{DrawCmd, css_color};
use crate::consts::*;

/// Thin wrapper around a 2D context that replays scene command lists
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Size the canvas to the logical arena and acquire its 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        canvas.set_width(ARENA_WIDTH as u32);
        canvas.set_height(ARENA_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    /// Clear the frame and replay the command list in order
    pub fn render(&self, cmds: &[DrawCmd]) {
        self.ctx
            .clear_rect(0.0, 0.0, ARENA_WIDTH as f64, ARENA_HEIGHT as f64);

        for cmd in cmds {
            match cmd {
                DrawCmd::Circle {
                    center,
                    radius,
                    color,
                } => {
                    self.ctx.set_fill_style_str(&css_color(*color));
                    self.ctx.begin_path();
                    let _ = self.ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    );
                    self.ctx.fill();
                }
                DrawCmd::Rect { pos, size, color } => {
                    self.ctx.set_fill_style_str(&css_color(*color));
                    self.ctx
                        .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
                DrawCmd::Label {
                    pos,
                    text,
                    color,
                    size_px,
                    centered,
                } => {
                    self.ctx.set_fill_style_str(&css_color(*color));
                    self.ctx.set_font(&format!("{size_px}px Arial"));
                    self.ctx
                        .set_text_align(if *centered { "center" } else { "left" });
                    let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
            }
        }
    }
}
