use crate::canvas::Point;
use crate::state::EyeState;

/// Half-axes of the eye ellipse for each expression
pub const NORMAL_EYE_SIZE: (i32, i32) = (75, 75);
pub const HAPPY_EYE_SIZE: (i32, i32) = (90, 90);  // Eyes are slightly larger when happy
pub const SAD_EYE_SIZE: (i32, i32) = (85, 85);

/// Stroke width of every outlined shape
pub const STROKE_WIDTH: i32 = 5;

/// Which eye a shape belongs to. Right-eye geometry is the left-eye
/// geometry mirrored around the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    /// Sign applied to horizontal offsets that point away from the face centre
    pub fn outward(&self) -> i32 {
        match self {
            EyeSide::Left => -1,
            EyeSide::Right => 1,
        }
    }
}

/// Both eye centres, left first
pub fn eye_centers(state: &EyeState) -> [(EyeSide, Point); 2] {
    [
        (EyeSide::Left, Point::new(state.left.x, state.left.y)),
        (EyeSide::Right, Point::new(state.right.x, state.right.y)),
    ]
}
