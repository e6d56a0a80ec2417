
pub mod outcome;
pub mod point;
pub mod transform;

pub use outcome::Outcome;
pub use point::{Point, BOARD_CELLS, BOARD_SIZE};
pub use transform::Transform;
