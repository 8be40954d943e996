//! Bullet trajectory simulation.
//!
//! One scheduler owns every live bullet, keyed by id, and advances all
//! of them from a single tick dispatch. Termination removes the bullet
//! from the set before the terminal reason is reported, so a finished
//! bullet can never tick again.

use crate::board::Board;
use crate::error::GameError;
use log::debug;
use shared::{in_bounds, Heading};
use std::collections::BTreeMap;

/// Why a bullet stopped flying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// Next cell lies outside the board.
    OutOfBounds,
    /// Next cell is a wall or occupied by a tank.
    Blocked,
    /// Next cell matches the one-shot coordinate of a reported tank
    /// elimination; the bullet stops exactly where the kill happened.
    AbsorbedByRecentCollision,
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub heading: Heading,
    pub owner: String,
}

/// Owns all active bullet simulations for one match.
///
/// The suppression coordinate is the most recent tank-elimination point
/// reported by the server. Elimination reports and bullet arrival are
/// not ordered relative to each other, so the coordinate is held here
/// until some bullet reaches it, then cleared after that single use.
#[derive(Debug, Default)]
pub struct BulletScheduler {
    active: BTreeMap<String, Bullet>,
    suppression: Option<(i32, i32)>,
}

impl BulletScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new bullet at its origin cell. Ids must be unique
    /// among live bullets.
    pub fn spawn(
        &mut self,
        id: &str,
        x: i32,
        y: i32,
        heading: Heading,
        owner: &str,
    ) -> Result<(), GameError> {
        if self.active.contains_key(id) {
            return Err(GameError::DuplicateBulletId(id.to_string()));
        }
        self.active.insert(
            id.to_string(),
            Bullet {
                id: id.to_string(),
                x,
                y,
                heading,
                owner: owner.to_string(),
            },
        );
        Ok(())
    }

    pub fn set_suppression(&mut self, x: i32, y: i32) {
        self.suppression = Some((x, y));
    }

    pub fn suppression(&self) -> Option<(i32, i32)> {
        self.suppression
    }

    /// Stops a single simulation. Absent ids are ignored.
    pub fn cancel(&mut self, id: &str) {
        self.active.remove(id);
    }

    /// Stops every simulation, e.g. when the match terminates.
    pub fn cancel_all(&mut self) {
        self.active.clear();
        self.suppression = None;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.active.values()
    }

    /// Advances every live bullet one cell and returns the bullets that
    /// terminated this tick, with their terminal reason.
    ///
    /// Per bullet, in order: out of bounds, suppression coordinate
    /// (consumed on first use), blocked cell, otherwise advance.
    pub fn step(&mut self, board: &Board) -> Vec<(String, Terminal)> {
        let mut terminated = Vec::new();

        for bullet in self.active.values_mut() {
            let (dx, dy) = bullet.heading.step();
            let next_x = bullet.x + dx;
            let next_y = bullet.y + dy;

            if !in_bounds(next_x, next_y) {
                terminated.push((bullet.id.clone(), Terminal::OutOfBounds));
                continue;
            }

            if self.suppression == Some((next_x, next_y)) {
                self.suppression = None;
                terminated.push((bullet.id.clone(), Terminal::AbsorbedByRecentCollision));
                continue;
            }

            if !board.is_passable(next_x, next_y) {
                terminated.push((bullet.id.clone(), Terminal::Blocked));
                continue;
            }

            bullet.x = next_x;
            bullet.y = next_y;
        }

        for (id, reason) in &terminated {
            debug!("Bullet {} terminated: {:?}", id, reason);
            self.active.remove(id);
        }

        terminated
    }
}
