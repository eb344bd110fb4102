// Animation scheduler
// Advances the eye state once per tick: blink, idle drift, then expression phases

use std::time::Instant;
use tracing::debug;

use crate::state::{EyeState, Mode, Phase, BLINK_INTERVAL_SECS, IDLE_INTERVAL_SECS};

/// Advance every timer of `state` using a single clock reading
pub fn advance(state: &mut EyeState, now: Instant) {
    blink(state, now);

    if state.idle.enabled {
        idle_drift(state, now);
    }

    if state.mode != Mode::Normal {
        timed_mode(&mut state.mode, now);
    }
}

fn blink(state: &mut EyeState, now: Instant) {
    // Happiness visuals never blink
    if matches!(state.mode, Mode::Happiness(_)) {
        return;
    }

    let blink = &mut state.blink;
    if !blink.blinking && secs_between(blink.last, now) >= blink.next_interval {
        state.left_open = false;
        state.right_open = false;
        blink.blinking = true;
        blink.started = now;
    } else if blink.blinking && secs_between(blink.started, now) >= blink.duration {
        state.left_open = true;
        state.right_open = true;
        blink.blinking = false;
        blink.last = now;
        state.blink.next_interval = state.random_f64(BLINK_INTERVAL_SECS);
    }
}

fn idle_drift(state: &mut EyeState, now: Instant) {
    if state.blink.blinking {
        return;
    }

    if secs_between(state.idle.last, now) > state.idle.interval {
        // Both eyes move together
        let movement = state.random_drift();
        state.left.x += movement;
        state.right.x += movement;
        state.idle.last = now;
        state.idle.interval = state.random_f64(IDLE_INTERVAL_SECS);
        debug!(movement, left_x = state.left.x, "idle drift");
    }
}

/// Shared phase progression for Happiness and Sadness
fn timed_mode(mode: &mut Mode, now: Instant) {
    let Some(activation) = mode.activation_mut() else {
        return;
    };

    let elapsed = activation.elapsed(now);
    let phase = Phase::at(elapsed, activation.duration);
    // Phases never step backwards within one activation
    if phase > activation.phase {
        debug!(phase = phase.index(), elapsed, "expression phase");
        activation.phase = phase;
    }

    if elapsed >= activation.duration {
        debug!(?mode, elapsed, "expression finished");
        *mode = Mode::Normal;
    }
}

fn secs_between(earlier: Instant, now: Instant) -> f64 {
    now.saturating_duration_since(earlier).as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawCommand;
    use crate::color::Palette;
    use crate::face::compose;
    use crate::state::Expression;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn eyes_at(start: Instant, seed: u64) -> EyeState {
        EyeState::new(640, 480, StdRng::seed_from_u64(seed), start)
    }

    fn at(start: Instant, secs: f64) -> Instant {
        start + Duration::from_secs_f64(secs)
    }

    #[test]
    fn test_blink_opens_after_duration() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 1);
        let blink_at = eyes.blink.next_interval;
        let duration = eyes.blink.duration;

        advance(&mut eyes, at(start, blink_at - 0.01));
        assert!(!eyes.is_blinking());

        let closed_at = at(start, blink_at + 0.001);
        advance(&mut eyes, closed_at);
        assert!(eyes.is_blinking());
        assert!(!eyes.left_open && !eyes.right_open);
        assert_eq!(eyes.blink.started, closed_at);

        advance(&mut eyes, closed_at + Duration::from_secs_f64(duration - 0.01));
        assert!(eyes.is_blinking());

        let opened_at = closed_at + Duration::from_secs_f64(duration + 0.001);
        advance(&mut eyes, opened_at);
        assert!(!eyes.is_blinking());
        assert!(eyes.left_open && eyes.right_open);
        assert_eq!(eyes.blink.last, opened_at);
        assert!((3.0..6.0).contains(&eyes.blink.next_interval));
    }

    #[test]
    fn test_happiness_suppresses_blinking() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 2);
        eyes.enter_for(Expression::Happiness, start, 100.0);

        for step in 0..500 {
            advance(&mut eyes, at(start, step as f64 * 0.02));
            assert!(!eyes.is_blinking());
        }
    }

    #[test]
    fn test_idle_drift_is_symmetric_and_horizontal() {
        let start = Instant::now();
        for seed in 0..16 {
            let mut eyes = eyes_at(start, seed);
            eyes.set_idle(true);
            // Keep the blink out of the way
            eyes.blink.next_interval = 1000.0;

            let (left, right) = (eyes.left, eyes.right);
            let fired_at = eyes.idle.interval + 0.01;
            advance(&mut eyes, at(start, fired_at));

            let delta = eyes.left.x - left.x;
            assert_eq!(eyes.right.x - right.x, delta);
            assert!((-10..=10).contains(&delta));
            assert_eq!(eyes.left.y, left.y);
            assert_eq!(eyes.right.y, right.y);
            assert_eq!(eyes.idle.last, at(start, fired_at));
            assert!((2.0..5.0).contains(&eyes.idle.interval));
        }
    }

    #[test]
    fn test_idle_disabled_by_default() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 3);
        eyes.blink.next_interval = 1000.0;
        let last = eyes.idle.last;

        advance(&mut eyes, at(start, 30.0));
        assert_eq!(eyes.idle.last, last);
        assert_eq!(eyes.left.x, 160);
        assert_eq!(eyes.right.x, 480);
    }

    #[test]
    fn test_idle_waits_while_blinking() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 4);
        eyes.set_idle(true);
        eyes.blink.blinking = true;
        eyes.blink.started = start;
        eyes.blink.duration = 1000.0;
        let last = eyes.idle.last;

        advance(&mut eyes, at(start, 10.0));
        assert_eq!(eyes.idle.last, last);
    }

    #[test]
    fn test_sadness_phases_and_expiry() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 5);
        eyes.enter_for(Expression::Sadness, start, 3.0);

        advance(&mut eyes, at(start, 0.9));
        assert_eq!(eyes.phase(), Some(Phase::Onset));

        advance(&mut eyes, at(start, 1.5));
        assert_eq!(eyes.phase(), Some(Phase::Peak));

        advance(&mut eyes, at(start, 2.5));
        assert_eq!(eyes.phase(), Some(Phase::Recovery));
        assert_eq!(eyes.expression(), Some(Expression::Sadness));

        advance(&mut eyes, at(start, 3.1));
        assert_eq!(eyes.mode, Mode::Normal);
        assert_eq!(eyes.phase(), None);
    }

    #[test]
    fn test_mode_ends_exactly_at_duration() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 6);
        eyes.enter_for(Expression::Happiness, start, 4.0);

        advance(&mut eyes, at(start, 3.999));
        assert_eq!(eyes.expression(), Some(Expression::Happiness));

        advance(&mut eyes, at(start, 4.0));
        assert_eq!(eyes.mode, Mode::Normal);
    }

    #[test]
    fn test_zero_duration_ends_on_next_tick() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 7);
        eyes.enter_for(Expression::Sadness, start, 0.0);

        advance(&mut eyes, start);
        assert_eq!(eyes.mode, Mode::Normal);
    }

    #[test]
    fn test_phase_sequence_is_monotonic() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 8);
        eyes.enter(Expression::Happiness, start);
        let duration = eyes.mode.activation().unwrap().duration;
        let mut seen = Vec::new();
        let mut t = 0.0;
        while eyes.mode != Mode::Normal {
            advance(&mut eyes, at(start, t));
            if let Some(phase) = eyes.phase() {
                seen.push(phase);
            }
            t += 0.02;
        }

        assert!(t >= duration);

        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(seen.first(), Some(&Phase::Onset));
        assert_eq!(seen.last(), Some(&Phase::Recovery));
    }

    #[test]
    fn test_ten_seconds_without_dispatch() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 9);
        let mut blinks = 0;
        let mut was_blinking = false;

        // 50 FPS for 10 seconds
        for frame in 0..=500 {
            advance(&mut eyes, at(start, frame as f64 / 50.0));
            assert_eq!(eyes.mode, Mode::Normal);
            if eyes.is_blinking() && !was_blinking {
                blinks += 1;
            }
            if was_blinking && !eyes.is_blinking() {
                assert!(eyes.left_open && eyes.right_open);
            }
            was_blinking = eyes.is_blinking();
        }

        assert!(blinks >= 1);
    }

    #[test]
    fn test_blink_runs_hidden_during_sadness() {
        let start = Instant::now();
        let mut eyes = eyes_at(start, 4);
        let palette = Palette::default();
        let interval = eyes.blink.next_interval;
        let blink_duration = eyes.blink.duration;

        // Sadness ends while the blink it hides is still closed
        eyes.enter_for(Expression::Sadness, at(start, interval - 0.5), 0.6);

        advance(&mut eyes, at(start, interval + 0.001));
        assert!(eyes.is_blinking());
        assert!(!eyes.left_open && !eyes.right_open);
        let commands = compose(&eyes, &palette);
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Line { .. })));
        let sectors = commands.iter()
            .filter(|c| matches!(c, DrawCommand::Ellipse { color, .. } if *color == palette.sad))
            .count();
        assert_eq!(sectors, 2);

        advance(&mut eyes, at(start, interval + 0.15));
        assert_eq!(eyes.mode, Mode::Normal);
        assert!(eyes.is_blinking());
        let commands = compose(&eyes, &palette);
        assert!(commands[1..].iter().all(|c| matches!(c,
            DrawCommand::Line { color, .. } if *color == palette.normal)));

        advance(&mut eyes, at(start, interval + blink_duration + 0.01));
        assert!(!eyes.is_blinking());
        let commands = compose(&eyes, &palette);
        assert!(commands[1..].iter().all(|c| matches!(c,
            DrawCommand::Ellipse { color, .. } if *color == palette.normal)));
    }
}
