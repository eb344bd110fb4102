use crate::canvas::{ArcSpan, DrawCommand, Stroke};
use crate::color::Palette;
use crate::state::{EyeState, Phase};
use super::base::{eye_centers, HAPPY_EYE_SIZE, STROKE_WIDTH};

/// Upper half of the ellipse, the "^ ^" look
const SMILE_SPAN: ArcSpan = ArcSpan::new(180.0, 360.0);

/// Happy eyes: full circles, squinting arcs at the peak, then full circles again
pub fn draw(state: &EyeState, phase: Phase, palette: &Palette, out: &mut Vec<DrawCommand>) {
    let (span, stroke) = match phase {
        Phase::Onset | Phase::Recovery => (ArcSpan::FULL, Stroke::Fill),
        Phase::Peak => (SMILE_SPAN, Stroke::Width(STROKE_WIDTH)),
    };

    for (_, center) in eye_centers(state) {
        out.push(DrawCommand::Ellipse {
            center,
            axes: HAPPY_EYE_SIZE,
            span,
            color: palette.happy,
            stroke,
        });
    }
}
