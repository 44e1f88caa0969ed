//! Grid geometry: field storage, input and computational grids, rotation.

mod computational;
mod field;
mod input;
mod rotation;

pub use computational::ComputationalGrid;
pub use field::Field2;
pub use input::InputGrid;
pub use rotation::{rotate, DEG_TO_RAD};
