use crate::canvas::{DrawCommand, Point};
use crate::color::Palette;
use crate::state::EyeState;
use crate::elements::eyes::eye_centers;

// Teardrop geometry relative to the eye centre (left eye; mirrored for the right)
const TEAR_OFFSET_X: i32 = 90;
const TEAR_OFFSET_Y: i32 = 46;
const TEAR_RADIUS: i32 = 10;
const TRIANGLE_WIDTH: i32 = 20;
const TRIANGLE_HEIGHT: i32 = 25;
const TRIANGLE_LIFT: i32 = 40;

/// Teardrop glyphs beside both eyes, always in the tear colour
pub fn teardrops(state: &EyeState, palette: &Palette, out: &mut Vec<DrawCommand>) {
    for (side, center) in eye_centers(state) {
        let tear_x = center.x + side.outward() * TEAR_OFFSET_X;
        let drop_y = center.y + TEAR_OFFSET_Y;
        let apex_y = drop_y + TEAR_RADIUS - TRIANGLE_LIFT;
        let base_y = apex_y + TRIANGLE_HEIGHT;

        out.push(DrawCommand::Polygon {
            points: vec![
                Point::new(tear_x, apex_y),
                Point::new(tear_x - TRIANGLE_WIDTH / 2, base_y),
                Point::new(tear_x + TRIANGLE_WIDTH / 2, base_y),
            ],
            color: palette.tear,
        });
        out.push(DrawCommand::Circle {
            center: Point::new(tear_x, drop_y),
            radius: TEAR_RADIUS,
            color: palette.tear,
        });
    }
}
