//! Splits the terminal into independent effect panes.
//!
//! Each pane is backed by a [`SharedCanvas`]: the engine draws through its
//! clone of the handle, this host presents and resizes through its own.
//! One terminal cell shows two vertically stacked pixels (half-block
//! rendering), so a pane's pixel height is twice its cell height.

use std::collections::HashMap;

use nocturne_canvas::SharedCanvas;
use nocturne_core::{Rgba, SurfaceId};
use nocturne_engine::{SurfaceHost, SurfaceSource};

pub const FIREFLIES: &str = "fireflies";
pub const STARS: &str = "stars";

pub struct Pane {
    pub canvas: SharedCanvas,
    /// Top-left corner in terminal cells
    pub origin_col: u16,
    pub origin_row: u16,
}

/// Terminal-backed [`SurfaceHost`] with one pane per effect.
pub struct PaneHost {
    panes: HashMap<SurfaceId, Pane>,
}

impl PaneHost {
    /// Lay out the two stock panes side by side across `cols` x `rows`
    /// terminal cells.
    pub fn new(cols: u16, rows: u16, background: Rgba) -> Self {
        let (left, right) = split_layout(cols, rows);
        let mut panes = HashMap::new();
        panes.insert(
            SurfaceId::from(FIREFLIES),
            Pane {
                canvas: SharedCanvas::new(left.2, left.3, background),
                origin_col: left.0,
                origin_row: left.1,
            },
        );
        panes.insert(
            SurfaceId::from(STARS),
            Pane {
                canvas: SharedCanvas::new(right.2, right.3, background),
                origin_col: right.0,
                origin_row: right.1,
            },
        );
        Self { panes }
    }

    /// Recompute pane rectangles for a new terminal size and resize the
    /// shared rasters in place.
    pub fn relayout(&mut self, cols: u16, rows: u16) {
        let (left, right) = split_layout(cols, rows);
        if let Some(pane) = self.panes.get_mut(FIREFLIES) {
            pane.origin_col = left.0;
            pane.origin_row = left.1;
            pane.canvas.resize(left.2, left.3);
        }
        if let Some(pane) = self.panes.get_mut(STARS) {
            pane.origin_col = right.0;
            pane.origin_row = right.1;
            pane.canvas.resize(right.2, right.3);
        }
    }

    pub fn panes(&self) -> impl Iterator<Item = &Pane> {
        self.panes.values()
    }
}

/// Two side-by-side pane rects as (origin_col, origin_row, width_px,
/// height_px); pixel width is one per cell, pixel height two per cell.
fn split_layout(cols: u16, rows: u16) -> ((u16, u16, u32, u32), (u16, u16, u32, u32)) {
    let cols = cols.max(2);
    let rows = rows.max(1);
    let left_cols = cols / 2;
    let right_cols = cols - left_cols;
    let height_px = rows as u32 * 2;
    (
        (0, 0, left_cols as u32, height_px),
        (left_cols, 0, right_cols as u32, height_px),
    )
}

impl SurfaceHost<SharedCanvas> for PaneHost {
    fn acquire(&mut self, id: &SurfaceId) -> Option<SurfaceSource<SharedCanvas>> {
        let pane = self.panes.get(id.as_str())?;
        Some(SurfaceSource {
            canvas: pane.canvas.clone(),
            width: pane.canvas.width(),
            height: pane.canvas.height(),
        })
    }

    fn dimensions(&mut self, id: &SurfaceId) -> Option<(u32, u32)> {
        let pane = self.panes.get(id.as_str())?;
        Some((pane.canvas.width(), pane.canvas.height()))
    }
}
