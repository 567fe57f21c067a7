//! Rendering module
//!
//! The game draws through the [`Canvas`] trait: image blits at whole-pixel
//! positions, rectangles and text. [`DrawList`] records each frame's
//! commands in memory, which is enough for headless play and tests; a
//! windowed backend implements [`Canvas`] over its own surface.

pub mod draw_list;

use glam::IVec2;

pub use draw_list::{DrawCommand, DrawList};

use crate::assets::ImageId;
use crate::sim::Rect;

/// RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const RED: Color = [1.0, 0.0, 0.0, 1.0];

/// Drawing surface
pub trait Canvas {
    fn clear(&mut self, color: Color);
    /// Draw an image with its top-left corner at `pos`
    fn blit(&mut self, image: ImageId, pos: IVec2);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// One-pixel border
    fn outline_rect(&mut self, rect: Rect, color: Color);
    fn text(&mut self, text: &str, pos: IVec2, color: Color);
    /// Finish the frame
    fn present(&mut self);
}
