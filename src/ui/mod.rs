//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`render`]: Top-level frame rendering (query bar, gallery, footer)
//! - [`gallery`]: The thumbnail grid and its image blitting
//! - [`overlays`]: The help popup

mod gallery;
mod overlays;
mod render;
mod status;

pub use render::render;

/// Width of one gallery cell in terminal columns, including spacing.
pub const CELL_WIDTH: u16 = 26;
/// Height of one gallery cell in terminal rows: image rows plus a caption row.
pub const CELL_HEIGHT: u16 = 10;
/// Terminal columns a thumbnail is resized to fit.
pub const THUMB_IMAGE_COLS: u16 = CELL_WIDTH - 2;
/// Terminal rows a thumbnail is resized to fit.
pub const THUMB_IMAGE_ROWS: u16 = CELL_HEIGHT - 1;
/// Rows reserved outside the gallery: query bar, toast bar, status bar.
pub const CHROME_ROWS: u16 = 3;

/// How many gallery columns fit in a terminal of the given width.
pub fn gallery_cols(width: u16) -> usize {
    ((width / CELL_WIDTH) as usize).max(1)
}

/// How many gallery rows fit in a terminal of the given height.
pub fn gallery_rows(height: u16) -> usize {
    ((height.saturating_sub(CHROME_ROWS) / CELL_HEIGHT) as usize).max(1)
}
