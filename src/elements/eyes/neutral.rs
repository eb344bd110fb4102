use crate::canvas::{ArcSpan, DrawCommand, Point, Stroke};
use crate::color::Palette;
use crate::state::EyeState;
use super::base::{eye_centers, EyeSide, NORMAL_EYE_SIZE, STROKE_WIDTH};

/// Idle eyes: a filled circle when open, a flat line while blinking.
/// Each eye follows its own open flag.
pub fn draw(state: &EyeState, palette: &Palette, out: &mut Vec<DrawCommand>) {
    let (half_width, _) = NORMAL_EYE_SIZE;

    for (side, center) in eye_centers(state) {
        let open = match side {
            EyeSide::Left => state.left_open,
            EyeSide::Right => state.right_open,
        };

        if open {
            out.push(DrawCommand::Ellipse {
                center,
                axes: NORMAL_EYE_SIZE,
                span: ArcSpan::FULL,
                color: palette.normal,
                stroke: Stroke::Fill,
            });
        } else {
            out.push(DrawCommand::Line {
                from: Point::new(center.x - half_width, center.y),
                to: Point::new(center.x + half_width, center.y),
                color: palette.normal,
                width: STROKE_WIDTH,
            });
        }
    }
}
