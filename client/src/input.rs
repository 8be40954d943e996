//! Keyboard sampling with edge detection for intent dispatch.

use macroquad::prelude::*;
use shared::MoveDir;

/// A user action ready to be turned into an outbound intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Move(MoveDir),
    Shoot,
}

/// Samples the keyboard once per input tick and reports key-press
/// edges. Holding a key yields one action per press, not per frame.
pub struct InputManager {
    prev_left: bool,
    prev_right: bool,
    prev_up: bool,
    prev_down: bool,
    prev_shoot: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            prev_left: false,
            prev_right: false,
            prev_up: false,
            prev_down: false,
            prev_shoot: false,
        }
    }

    /// Reads the current key states and returns the actions whose keys
    /// went down since the previous poll.
    pub fn poll(&mut self) -> Vec<PlayerAction> {
        let left = is_key_down(KeyCode::A) || is_key_down(KeyCode::Left);
        let right = is_key_down(KeyCode::D) || is_key_down(KeyCode::Right);
        let up = is_key_down(KeyCode::W) || is_key_down(KeyCode::Up);
        let down = is_key_down(KeyCode::S) || is_key_down(KeyCode::Down);
        let shoot = is_key_down(KeyCode::Space);

        let mut actions = Vec::new();
        if edge(left, &mut self.prev_left) {
            actions.push(PlayerAction::Move(MoveDir::Left));
        }
        if edge(right, &mut self.prev_right) {
            actions.push(PlayerAction::Move(MoveDir::Right));
        }
        if edge(up, &mut self.prev_up) {
            actions.push(PlayerAction::Move(MoveDir::Up));
        }
        if edge(down, &mut self.prev_down) {
            actions.push(PlayerAction::Move(MoveDir::Down));
        }
        if edge(shoot, &mut self.prev_shoot) {
            actions.push(PlayerAction::Shoot);
        }
        actions
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Press-edge detection: true exactly when the key transitions from
/// released to held.
fn edge(now: bool, prev: &mut bool) -> bool {
    let fired = now && !*prev;
    *prev = now;
    fired
}
