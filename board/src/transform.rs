
use super::point::{Point, BOARD_CELLS};

use utils::*;

///
/// An enum that represents the 8 symmetries of the square board.
///
/// Identity refers to the null transformation, while Reflect refers to reflecting 
/// the board in a mirror parallel to the y-axis; the rotations are applied after 
/// the (optional) reflection.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transform
{
    Identity,
    IdenRot90,
    IdenRot180,
    IdenRot270,
    Reflect,
    ReflRot90,
    ReflRot180,
    ReflRot270
}

impl Transform 
{
    ///
    /// The number of board symmetries.
    ///
    pub const COUNT : usize = 8;

    ///
    /// Applies this transform to the given point, treating the origin as the pivot.
    ///
    pub fn apply_to_point (& self, target: & Point) -> Point
    {
        let x  = target.x();
        let y  = target.y();

        match self 
        {
            Transform::Identity   => Point::new( x,  y),
            Transform::IdenRot90  => Point::new( y, -x),
            Transform::IdenRot180 => Point::new(-x, -y),
            Transform::IdenRot270 => Point::new(-y,  x),
            Transform::Reflect    => Point::new(-x,  y),
            Transform::ReflRot90  => Point::new( y,  x),
            Transform::ReflRot180 => Point::new( x, -y),
            Transform::ReflRot270 => Point::new(-y, -x)
        }
    }

    ///
    /// Applies this transform to an on-board point, pivoting around the centre 
    /// cell so that the result stays on the board.
    ///
    pub fn apply_on_board (& self, target: & Point) -> Point 
    {
        let centre = Point::centre();
        self.apply_to_point(& (* target - centre)) + centre
    }

    ///
    /// Returns a vector of all of the transforms.
    ///
    pub fn as_array () -> Vec<Transform>
    {
        vec!
        [
            Transform::Identity,
            Transform::IdenRot90,
            Transform::IdenRot180,
            Transform::IdenRot270,
            Transform::Reflect,
            Transform::ReflRot90,
            Transform::ReflRot180,
            Transform::ReflRot270
        ]
    }

    ///
    /// Returns the transform for the given index into as_array(), wrapping around.
    ///
    pub fn from_index (index: usize) -> Transform 
    {
        Transform::as_array()[index % Transform::COUNT]
    }

    ///
    /// Returns the gather permutation of the flattened board for this transform.
    ///
    /// Entry `i` names the source cell whose contents land on cell `i`, so that 
    /// gathering a row-major 81-vector by this permutation moves the contents of 
    /// every cell `p` onto `apply_on_board(p)`.
    ///
    pub fn permutation (& self) -> [usize; BOARD_CELLS]
    {
        let mut perm = [0; BOARD_CELLS];

        for source in Point::all()
        {
            perm[self.apply_on_board(& source).index()] = source.index();
        }

        perm
    }
}
