//! Deterministic input for headless rendering.

use std::f64::consts::TAU;

use glam::DVec2;
use sketchbook_core::Input;

const DEFAULT_ORBIT_PERIOD: u64 = 240;
const DEFAULT_PRESS_FRAMES: u64 = 45;
const DEFAULT_RELEASE_FRAMES: u64 = 15;
/// Orbit radius as a fraction of the canvas short side.
const ORBIT_RADIUS_RATIO: f64 = 0.3;

/// Pointer that circles the canvas center, pressing and releasing on a
/// fixed cycle, with optional key presses at given frames.
///
/// Frame counts start at 1. Iterating yields one [`Input`] per frame.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    canvas_size: DVec2,
    frame: u64,
    orbit_period: u64,
    press_frames: u64,
    release_frames: u64,
    keys: Vec<(u64, char)>,
    was_pressed: bool,
}

impl ScriptedInput {
    pub fn new(canvas_size: DVec2) -> Self {
        Self {
            canvas_size,
            frame: 0,
            orbit_period: DEFAULT_ORBIT_PERIOD,
            press_frames: DEFAULT_PRESS_FRAMES,
            release_frames: DEFAULT_RELEASE_FRAMES,
            keys: Vec::new(),
            was_pressed: false,
        }
    }

    /// Replaces the press/release cycle. A zero press length never presses.
    pub fn with_cycle(mut self, press_frames: u64, release_frames: u64) -> Self {
        self.press_frames = press_frames;
        self.release_frames = release_frames;
        self
    }

    /// Types `key` on `frame`.
    pub fn with_key(mut self, frame: u64, key: char) -> Self {
        self.keys.push((frame, key));
        self
    }

    fn pointer(&self) -> DVec2 {
        let radius = ORBIT_RADIUS_RATIO * self.canvas_size.min_element();
        let period = self.orbit_period.max(1);
        let angle = TAU * (self.frame % period) as f64 / period as f64;
        0.5 * self.canvas_size + DVec2::from_angle(angle) * radius
    }

    fn is_pressed(&self) -> bool {
        let cycle = self.press_frames + self.release_frames;
        cycle > 0 && (self.frame - 1) % cycle < self.press_frames
    }
}

impl Iterator for ScriptedInput {
    type Item = Input;

    fn next(&mut self) -> Option<Input> {
        self.frame += 1;
        let pressed = self.is_pressed();
        let input = Input {
            frame_count: self.frame,
            pointer: self.pointer(),
            pressed,
            clicked: pressed && !self.was_pressed,
            released: !pressed && self.was_pressed,
            typed_keys: self
                .keys
                .iter()
                .filter(|(frame, _)| *frame == self.frame)
                .map(|&(_, key)| key)
                .collect(),
            canvas_size: self.canvas_size,
        };
        self.was_pressed = pressed;
        Some(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_count_from_one() {
        let frames: Vec<u64> = ScriptedInput::new(DVec2::splat(100.0))
            .take(3)
            .map(|i| i.frame_count)
            .collect();
        assert_eq!(frames, vec![1, 2, 3]);
    }

    #[test]
    fn press_cycle_emits_edges() {
        let inputs: Vec<Input> = ScriptedInput::new(DVec2::splat(100.0))
            .with_cycle(2, 1)
            .take(6)
            .collect();
        let pressed: Vec<bool> = inputs.iter().map(|i| i.pressed).collect();
        assert_eq!(pressed, vec![true, true, false, true, true, false]);
        assert!(inputs[0].clicked && inputs[3].clicked);
        assert!(!inputs[1].clicked);
        assert!(inputs[2].released && inputs[5].released);
    }

    #[test]
    fn pointer_stays_in_canvas() {
        assert!(ScriptedInput::new(DVec2::new(640.0, 480.0))
            .take(500)
            .all(|i| i.pointer_in_canvas()));
    }

    #[test]
    fn keys_land_on_their_frame() {
        let inputs: Vec<Input> = ScriptedInput::new(DVec2::splat(100.0))
            .with_key(2, 'p')
            .take(3)
            .collect();
        assert!(inputs[0].typed_keys.is_empty());
        assert!(inputs[1].typed('p'));
        assert!(inputs[2].typed_keys.is_empty());
    }

    #[test]
    fn zero_cycle_never_presses() {
        assert!(ScriptedInput::new(DVec2::splat(100.0))
            .with_cycle(0, 0)
            .take(10)
            .all(|i| !i.pressed));
    }
}
