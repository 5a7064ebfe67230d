//! Draw-call recording canvas for tests and debugging.

use nocturne_core::Rgba;

use crate::Canvas2d;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgba,
    },
    ClearRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    FillCircle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Rgba,
    },
}

/// Canvas that logs every draw call instead of rasterizing.
///
/// Tests assert on the op log to verify what the engine painted and in
/// what order, without inspecting pixels.
#[derive(Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Count of recorded circle fills (one per particle drawn).
    pub fn circle_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillCircle { .. }))
            .count()
    }
}

impl Canvas2d for RecordingCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.ops.push(DrawOp::FillRect { x, y, w, h, color });
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(DrawOp::ClearRect { x, y, w, h });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::FillCircle {
            cx,
            cy,
            radius,
            color,
        });
    }
}
