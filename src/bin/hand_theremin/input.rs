//! Keyboard-driven stand-in for the hand-landmark detector.
//!
//! Each simulated hand is a palm position plus a distance; every frame it is
//! expanded into a full 21-point landmark set so the library sees exactly what
//! a detector would hand it.

use crossterm::event::KeyCode;
use hand_theremin::{
    tracking::{DEPTH_SCALE, LANDMARK_COUNT},
    Landmark,
};

/// Movement per key press, in normalized image units.
const STEP: f32 = 0.02;
/// Vertical spacing of finger joints.
const JOINT_SPACING: f32 = 0.03;

#[derive(Debug, Clone, Copy)]
pub struct SimulatedHand {
    pub present: bool,
    /// Palm x in image coordinates.
    pub x: f32,
    pub y: f32,
    /// Closeness, 0 = far, 1 = close.
    pub distance: f32,
}

impl SimulatedHand {
    fn new(x: f32) -> Self {
        Self {
            present: false,
            x,
            y: 0.6,
            distance: 0.5,
        }
    }

    fn nudge(&mut self, dx: f32, dd: f32) {
        self.x = (self.x + dx).clamp(0.0, 1.0);
        self.distance = (self.distance + dd).clamp(0.0, 1.0);
    }

    /// Wrist at the palm, five fingers fanned out above it. Thumb tip and
    /// pinky tip sit `distance / DEPTH_SCALE` apart.
    pub fn landmarks(&self) -> Vec<Landmark> {
        let width = self.distance / DEPTH_SCALE;
        let mut points = Vec::with_capacity(LANDMARK_COUNT);
        points.push(Landmark::new(self.x, self.y, 0.0));

        for finger in 0..5 {
            let spread = (2.0 - finger as f32) * width / 4.0;
            for joint in 1..=4 {
                let reach = joint as f32 / 4.0;
                points.push(Landmark::new(
                    self.x + spread * reach,
                    self.y - joint as f32 * JOINT_SPACING,
                    0.0,
                ));
            }
        }
        points
    }
}

/// Two hands, steered from the keyboard.
pub struct SimulatedHands {
    hands: [SimulatedHand; 2],
}

impl SimulatedHands {
    pub fn new() -> Self {
        Self {
            hands: [SimulatedHand::new(0.7), SimulatedHand::new(0.3)],
        }
    }

    /// Apply a key press. Returns false if the key is not a hand control.
    ///
    /// Keys follow the mirror view: moving a hand right on screen lowers x.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        let (hand, dx, dd) = match key {
            KeyCode::Char('a') => (0, STEP, 0.0),
            KeyCode::Char('d') => (0, -STEP, 0.0),
            KeyCode::Char('w') => (0, 0.0, STEP),
            KeyCode::Char('x') => (0, 0.0, -STEP),
            KeyCode::Char('j') => (1, STEP, 0.0),
            KeyCode::Char('l') => (1, -STEP, 0.0),
            KeyCode::Char('i') => (1, 0.0, STEP),
            KeyCode::Char('m') => (1, 0.0, -STEP),
            KeyCode::Char('1') => {
                self.toggle(0);
                return true;
            }
            KeyCode::Char('2') => {
                self.toggle(1);
                return true;
            }
            _ => return false,
        };
        self.hands[hand].nudge(dx, dd);
        true
    }

    fn toggle(&mut self, hand: usize) {
        self.hands[hand].present = !self.hands[hand].present;
    }

    /// Detector output for this frame: one landmark set per visible hand.
    pub fn frame(&self) -> Vec<Vec<Landmark>> {
        self.hands
            .iter()
            .filter(|hand| hand.present)
            .map(SimulatedHand::landmarks)
            .collect()
    }
}
