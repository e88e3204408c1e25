//! Grid sizing configuration.
//!
//! Exactly one sizing mode applies per run.  The raw parameter surface
//! (optional block counts, optional physical cell sizes) is resolved into a
//! tagged [`GridSizing`] variant once, before any geometry work, so invalid
//! combinations are rejected up front.

use crate::{GridError, GridResult};

/// Cell edge length in degrees used when no sizing parameters are given.
pub const DEFAULT_CELL_DEG: f64 = 0.006;

/// How grid cells are sized.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum GridSizing {
    /// Cells of [`DEFAULT_CELL_DEG`] degrees on both axes.
    #[default]
    Default,
    /// Fixed number of columns (`x_blocks`) and rows (`y_blocks`); cell size
    /// is derived from the node bounding box.
    ByBlockCount { x_blocks: u32, y_blocks: u32 },
    /// Physical cell size in metres, converted to degrees at the run's
    /// latitude band.
    ByCellSize { width_m: f64, height_m: f64 },
}

impl GridSizing {
    /// Resolve the optional raw parameters into a sizing mode.
    ///
    /// Supplying a block-count pair and a cell-size pair simultaneously is a
    /// configuration conflict; supplying half of either pair is incomplete.
    /// Both abort the run before any partitioning happens.
    pub fn from_options(
        x_blocks: Option<u32>,
        y_blocks: Option<u32>,
        cell_width_m: Option<f64>,
        cell_height_m: Option<f64>,
    ) -> GridResult<GridSizing> {
        let blocks = match (x_blocks, y_blocks) {
            (Some(x), Some(y)) => Some((x, y)),
            (None, None) => None,
            _ => return Err(GridError::IncompleteSizing { what: "block counts" }),
        };
        let cells = match (cell_width_m, cell_height_m) {
            (Some(w), Some(h)) => Some((w, h)),
            (None, None) => None,
            _ => return Err(GridError::IncompleteSizing { what: "cell sizes" }),
        };

        match (blocks, cells) {
            (Some(_), Some(_)) => Err(GridError::SizingConflict),
            (Some((x, y)), None) => Ok(GridSizing::ByBlockCount { x_blocks: x, y_blocks: y }),
            (None, Some((w, h))) => Ok(GridSizing::ByCellSize { width_m: w, height_m: h }),
            (None, None) => Ok(GridSizing::Default),
        }
    }
}

/// Configuration for a partitioning run.
#[derive(Clone, Debug, Default)]
pub struct GridConfig {
    pub sizing: GridSizing,
    /// Latitude override in degrees.  When `None`, the mean node latitude is
    /// used (falling back to 30° for an empty network).
    pub latitude: Option<f64>,
}

impl GridConfig {
    pub fn new(sizing: GridSizing) -> Self {
        Self { sizing, latitude: None }
    }

    pub fn with_latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }
}
