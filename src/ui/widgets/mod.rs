//! UI widgets

pub mod card_grid;
pub mod number_field;

pub use card_grid::{card_at, grid_area_size, CardGridWidget, GridCursor, CELL_HEIGHT, CELL_WIDTH};
pub use number_field::{NumberField, NumberFieldWidget};
