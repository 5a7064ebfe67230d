//! Half-block terminal presentation with a raw-mode guard.
//!
//! Each terminal cell shows two pixels via `▀`: the glyph's foreground is
//! the upper pixel, the cell background the lower one. Frames are diffed
//! against the previous presentation so a mostly static field costs only
//! a handful of cursor moves per tick.

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::panes::Pane;

const HALF_BLOCK: char = '\u{2580}';

#[derive(Clone, Copy, PartialEq, Eq)]
struct CellColors {
    top: Color,
    bottom: Color,
}

pub struct Terminal {
    stdout: Stdout,
    cols: u16,
    rows: u16,
    /// Colors as last presented, row-major; `None` forces a full redraw
    last: Option<Vec<CellColors>>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init {
            restore(&mut out);
            return Err(e);
        }
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            stdout: out,
            cols,
            rows,
            last: None,
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Note a terminal resize and drop the diff baseline.
    pub fn resized(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.last = None;
    }

    /// Draw every pane's raster into its cell rectangle.
    pub fn present<'a>(&mut self, panes: impl Iterator<Item = &'a Pane>) -> Result<()> {
        let cell_count = self.cols as usize * self.rows as usize;
        let fresh = self.last.is_none();
        if fresh {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = Some(vec![
                CellColors {
                    top: Color::Reset,
                    bottom: Color::Reset
                };
                cell_count
            ]);
        }

        let mut cur_fg: Option<Color> = None;
        let mut cur_bg: Option<Color> = None;
        let mut cur_pos: Option<(u16, u16)> = None;
        let mut dirty = false;

        for pane in panes {
            pane.canvas.with_pixels(|canvas| -> Result<()> {
                let cell_rows = (canvas.height() / 2).min(self.rows as u32) as u16;
                let cell_cols = canvas.width().min(self.cols as u32) as u16;
                for row in 0..cell_rows {
                    let screen_row = pane.origin_row + row;
                    if screen_row >= self.rows {
                        break;
                    }
                    for col in 0..cell_cols {
                        let screen_col = pane.origin_col + col;
                        if screen_col >= self.cols {
                            break;
                        }
                        let top = pixel_color(canvas, col as u32, row as u32 * 2);
                        let bottom = pixel_color(canvas, col as u32, row as u32 * 2 + 1);
                        let cell = CellColors { top, bottom };

                        let idx = screen_row as usize * self.cols as usize + screen_col as usize;
                        let last = self.last.as_mut().expect("baseline set above");
                        if !fresh && last[idx] == cell {
                            continue;
                        }
                        last[idx] = cell;
                        dirty = true;

                        if cur_pos != Some((screen_col, screen_row)) {
                            self.stdout.queue(cursor::MoveTo(screen_col, screen_row))?;
                        }
                        if cur_fg != Some(cell.top) {
                            self.stdout.queue(SetForegroundColor(cell.top))?;
                            cur_fg = Some(cell.top);
                        }
                        if cur_bg != Some(cell.bottom) {
                            self.stdout.queue(SetBackgroundColor(cell.bottom))?;
                            cur_bg = Some(cell.bottom);
                        }
                        self.stdout.queue(Print(HALF_BLOCK))?;
                        cur_pos = if screen_col + 1 < self.cols {
                            Some((screen_col + 1, screen_row))
                        } else {
                            None
                        };
                    }
                }
                Ok(())
            })?;
        }

        if dirty || fresh {
            self.stdout.queue(ResetColor)?;
            self.stdout.flush()?;
        }
        Ok(())
    }
}

fn pixel_color(canvas: &nocturne_canvas::PixelCanvas, x: u32, y: u32) -> Color {
    match canvas.pixel(x, y) {
        Some(px) => Color::Rgb {
            r: px.r,
            g: px.g,
            b: px.b,
        },
        None => Color::Reset,
    }
}

fn restore(out: &mut Stdout) {
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}
