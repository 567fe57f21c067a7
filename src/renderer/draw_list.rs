//! In-memory canvas

use glam::IVec2;

use super::{Canvas, Color};
use crate::assets::ImageId;
use crate::sim::Rect;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Blit { image: ImageId, pos: IVec2 },
    FillRect { rect: Rect, color: Color },
    OutlineRect { rect: Rect, color: Color },
    Text { text: String, pos: IVec2, color: Color },
}

/// Canvas that records the commands of the frame being built and keeps the
/// last presented frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pending: Vec<DrawCommand>,
    presented: Vec<DrawCommand>,
    frames: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the last presented frame, in draw order
    pub fn frame(&self) -> &[DrawCommand] {
        &self.presented
    }

    /// Number of frames presented
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Images blitted in the last frame, in draw order
    pub fn blits(&self) -> impl Iterator<Item = ImageId> + '_ {
        self.presented.iter().filter_map(|c| match c {
            DrawCommand::Blit { image, .. } => Some(*image),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.pending.clear();
        self.pending.push(DrawCommand::Clear(color));
    }

    fn blit(&mut self, image: ImageId, pos: IVec2) {
        self.pending.push(DrawCommand::Blit { image, pos });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.pending.push(DrawCommand::FillRect { rect, color });
    }

    fn outline_rect(&mut self, rect: Rect, color: Color) {
        self.pending.push(DrawCommand::OutlineRect { rect, color });
    }

    fn text(&mut self, text: &str, pos: IVec2, color: Color) {
        self.pending.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            color,
        });
    }

    fn present(&mut self) {
        self.presented = std::mem::take(&mut self.pending);
        self.frames += 1;
    }
}
