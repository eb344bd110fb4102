use crate::canvas::{ArcSpan, DrawCommand, Point, Stroke};
use crate::color::Palette;
use crate::state::{EyeState, Phase};
use super::base::{eye_centers, EyeSide, SAD_EYE_SIZE, STROKE_WIDTH};

/// Drooping eye sectors, the outer top wedge of each eye is cut away
const LEFT_SPAN: ArcSpan = ArcSpan::new(-190.0, -420.0);
const RIGHT_SPAN: ArcSpan = ArcSpan::new(10.0, 240.0);

const SLANT_DEGREES: f64 = 10.0;

/// Sad eyes: teary sectors, a slanted line at the peak, then teary sectors again.
/// Teardrops are drawn separately on top.
pub fn draw(state: &EyeState, phase: Phase, palette: &Palette, out: &mut Vec<DrawCommand>) {
    for (side, center) in eye_centers(state) {
        let command = match phase {
            Phase::Onset | Phase::Recovery => sector(side, center, palette),
            Phase::Peak => slanted_line(side, center, palette),
        };
        out.push(command);
    }
}

fn sector(side: EyeSide, center: Point, palette: &Palette) -> DrawCommand {
    let span = match side {
        EyeSide::Left => LEFT_SPAN,
        EyeSide::Right => RIGHT_SPAN,
    };

    DrawCommand::Ellipse {
        center,
        axes: SAD_EYE_SIZE,
        span,
        color: palette.sad,
        stroke: Stroke::Fill,
    }
}

fn slanted_line(side: EyeSide, center: Point, palette: &Palette) -> DrawCommand {
    let (offset_x, offset_y) = slant_offsets();
    // Inner end sits higher than the outer end on both eyes
    let dip = side.outward() * offset_y;

    DrawCommand::Line {
        from: Point::new(center.x - offset_x, center.y - dip),
        to: Point::new(center.x + offset_x, center.y + dip),
        color: palette.sad,
        width: STROKE_WIDTH,
    }
}

/// Half-length of the slanted line projected on each axis
pub fn slant_offsets() -> (i32, i32) {
    let length = SAD_EYE_SIZE.0 as f64;
    let slant = SLANT_DEGREES.to_radians();
    ((length * slant.cos()) as i32, (length * slant.sin()) as i32)
}
