
use utils::*;

///
/// The side length of the board.
///
pub const BOARD_SIZE : i32 = 9;

///
/// The number of cells on the board, which is also the width of a flat policy.
///
pub const BOARD_CELLS : usize = (BOARD_SIZE * BOARD_SIZE) as usize;

///
/// Represents a cell on the board, addressed by row (x) and column (y).
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point 
{
    x: i32,
    y: i32
}

impl std::fmt::Display for Point 
{
    fn fmt (& self, f: & mut std::fmt::Formatter<'_>) -> std::fmt::Result 
    {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl std::ops::Add for Point 
{
    type Output = Point;

    fn add (self, rhs: Point) -> Point 
    {
        Point { x: self.x + rhs.x, y: self.y + rhs.y } 
    }
}

impl std::ops::Sub for Point 
{
    type Output = Point;
    
    fn sub (self, rhs: Point) -> Point
    {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Point 
{
    ///
    /// Returns the centre cell, around which the board symmetries pivot.
    ///
    pub fn centre () -> Point 
    {
        Point::new(BOARD_SIZE / 2, BOARD_SIZE / 2)
    }

    ///
    /// Returns the point for a row-major flat index, provided it is on the board.
    ///
    pub fn from_index (index: usize) -> Option<Point>
    {
        match index < BOARD_CELLS 
        {
            true  => Some(Point::new(index as i32 / BOARD_SIZE, index as i32 % BOARD_SIZE)),
            false => None
        }
    }

    ///
    /// Determines whether this point is on the board.
    ///
    pub fn in_bounds (& self) -> bool
    {
        0 <= self.x && self.x < BOARD_SIZE && 0 <= self.y && self.y < BOARD_SIZE
    }

    ///
    /// Returns the row-major flat index of this point. Only meaningful for on-board points.
    ///
    pub fn index (& self) -> usize 
    {
        (self.x * BOARD_SIZE + self.y) as usize
    }

    ///
    /// Returns a new point.
    ///
    pub fn new (x: i32, y: i32) -> Point
    {
        Point { x, y }
    }

    ///
    /// Returns an iterator over every cell of the board in index order.
    ///
    pub fn all () -> impl Iterator<Item = Point>
    {
        (0 .. BOARD_CELLS).filter_map(Point::from_index)
    }

    ///
    /// Returns x.
    ///
    pub fn x (& self) -> i32
    {
        self.x
    }

    ///
    /// Returns y.
    ///
    pub fn y (& self) -> i32
    {
        self.y
    }
}
