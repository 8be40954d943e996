//! Match session: entity registry plus the event reconciler.
//!
//! The session owns every piece of mutable match state (board, tank
//! registry, bullet scheduler, local identity) and is the only place
//! inbound server events mutate it. Intents go out through it too, so
//! the "no tank, no traffic" rule lives in one spot.

use crate::board::Board;
use crate::bullet::{BulletScheduler, Terminal};
use crate::error::GameError;
use log::{debug, info, warn};
use shared::{in_bounds, Heading, MoveDir, Packet, Tank};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lifecycle of one match, driven by inbound events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPhase {
    Initializing,
    Active,
    Terminated(String),
}

pub struct MatchSession {
    board: Board,
    tanks: BTreeMap<String, Tank>,
    scheduler: BulletScheduler,
    local_player: Option<String>,
    local_tank: Option<Tank>,
    phase: MatchPhase,
}

impl MatchSession {
    /// Builds a session from the join handshake: own tank, board
    /// snapshot and the current roster. Roster positions are stamped
    /// onto the board the same way a movement echo would. A malformed
    /// own tank fails the handshake; its pose would otherwise leak
    /// back out through every intent built from it.
    pub fn new(
        local_tank: Tank,
        board_snapshot: &[Vec<String>],
        roster: Vec<Tank>,
    ) -> Result<Self, GameError> {
        if local_tank.heading().is_none() {
            return Err(GameError::InvalidRotation(local_tank.rotation));
        }
        if !in_bounds(local_tank.posx, local_tank.posy) {
            return Err(GameError::OutOfBounds {
                x: local_tank.posx,
                y: local_tank.posy,
            });
        }

        let mut session = Self {
            board: Board::from_codes(board_snapshot),
            tanks: BTreeMap::new(),
            scheduler: BulletScheduler::new(),
            local_player: Some(local_tank.name.clone()),
            local_tank: Some(local_tank.clone()),
            phase: MatchPhase::Initializing,
        };

        for tank in roster {
            if let Err(e) = session.place_tank(tank) {
                warn!("Dropping roster entry: {}", e);
            }
        }
        if !session.tanks.contains_key(&local_tank.name) {
            if let Err(e) = session.place_tank(local_tank) {
                warn!("Dropping own tank placement: {}", e);
            }
        }
        session.phase = MatchPhase::Active;
        Ok(session)
    }

    fn place_tank(&mut self, tank: Tank) -> Result<(), GameError> {
        if tank.heading().is_none() {
            return Err(GameError::InvalidRotation(tank.rotation));
        }
        self.board.put_tank(&tank.name, tank.posx, tank.posy)?;
        self.tanks.insert(tank.name.clone(), tank);
        Ok(())
    }

    // ---- entity registry ----

    /// Inserts or overwrites a tank. On overwrite the existing color is
    /// kept when none is supplied.
    pub fn upsert_tank(
        &mut self,
        name: &str,
        posx: i32,
        posy: i32,
        rotation: i16,
        color: Option<String>,
    ) -> Result<(), GameError> {
        if Heading::from_degrees(rotation).is_none() {
            return Err(GameError::InvalidRotation(rotation));
        }
        let color = color
            .or_else(|| self.tanks.get(name).map(|t| t.color.clone()))
            .unwrap_or_default();
        self.tanks
            .insert(name.to_string(), Tank::new(name, posx, posy, rotation, &color));
        Ok(())
    }

    /// Removes a tank. Removing an absent id is a no-op; the server may
    /// report an elimination the client already pruned.
    pub fn remove_tank(&mut self, name: &str) {
        if let Some(tank) = self.tanks.remove(name) {
            self.board.clear_if_owned(name, tank.posx, tank.posy);
        }
    }

    pub fn tank(&self, name: &str) -> Option<&Tank> {
        self.tanks.get(name)
    }

    pub fn tanks(&self) -> impl Iterator<Item = &Tank> {
        self.tanks.values()
    }

    pub fn tank_count(&self) -> usize {
        self.tanks.len()
    }

    // ---- intent dispatch ----

    /// Builds a move intent for the local tank. Returns `None` without
    /// side effects when no local player is set (not joined yet, or
    /// eliminated). The local position is NOT changed here; it only
    /// moves when the server echoes the movement back.
    pub fn request_move(&self, dir: MoveDir) -> Option<Packet> {
        let name = self.local_player.as_ref()?;
        let tank = self.local_tank.as_ref()?;
        let (dx, dy) = dir.step();
        Some(Packet::MoveIntent {
            name: name.clone(),
            pos_x: tank.posx,
            pos_y: tank.posy,
            new_pos_x: tank.posx + dx,
            new_pos_y: tank.posy + dy,
            rotation: dir.heading().degrees(),
        })
    }

    /// Builds a shoot intent from the local tank's pose with a freshly
    /// generated bullet id. `None` when no local player is set.
    pub fn request_shoot(&self) -> Option<Packet> {
        let name = self.local_player.as_ref()?;
        let tank = self.local_tank.as_ref()?;
        Some(Packet::ShootIntent {
            name: name.clone(),
            bullet_id: Uuid::new_v4().to_string(),
            start_x: tank.posx,
            start_y: tank.posy,
            direction: tank.rotation,
        })
    }

    // ---- event reconciliation ----

    /// Applies one authoritative server event. Returns follow-up
    /// packets the client should send (currently only the winner-check
    /// trigger). Events after termination are ignored.
    pub fn apply_event(&mut self, event: Packet) -> Result<Vec<Packet>, GameError> {
        if matches!(self.phase, MatchPhase::Terminated(_)) {
            debug!("Match terminated, ignoring {:?}", event);
            return Ok(Vec::new());
        }

        match event {
            Packet::MovementUpdate {
                name,
                posx,
                posy,
                rotation,
            } => self
                .apply_movement(&name, posx, posy, rotation)
                .map(|_| Vec::new()),

            Packet::BoardResync { board } => {
                self.board.load(&board);
                Ok(Vec::new())
            }

            Packet::BulletSpawned {
                bullet_id,
                start_x,
                start_y,
                direction,
                tank_id,
            } => {
                let heading = Heading::from_degrees(direction)
                    .ok_or(GameError::InvalidRotation(direction))?;
                self.scheduler
                    .spawn(&bullet_id, start_x, start_y, heading, &tank_id)?;

                // last tank standing: ask the server to run its victory check
                if self.tanks.len() <= 1 {
                    return Ok(vec![Packet::WinnerCheck]);
                }
                Ok(Vec::new())
            }

            Packet::CollisionResult { tank, x, y } => {
                self.scheduler.set_suppression(x, y);
                self.remove_tank(&tank);
                self.board.clear_if_owned(&tank, x, y);
                if self.local_player.as_deref() == Some(tank.as_str()) {
                    info!("Local tank {} destroyed, spectating", tank);
                    self.local_player = None;
                }
                Ok(Vec::new())
            }

            Packet::Winner { name } => {
                info!("Winner announced: {}", name);
                self.scheduler.cancel_all();
                self.phase = MatchPhase::Terminated(name);
                Ok(Vec::new())
            }

            other => {
                warn!("Unexpected event: {:?}", other);
                Ok(Vec::new())
            }
        }
    }

    fn apply_movement(
        &mut self,
        name: &str,
        posx: i32,
        posy: i32,
        rotation: i16,
    ) -> Result<(), GameError> {
        // reject before touching anything; a dropped update must leave
        // registry and board exactly as they were (rotation is vetted
        // by upsert_tank before it mutates)
        if !in_bounds(posx, posy) {
            return Err(GameError::OutOfBounds { x: posx, y: posy });
        }

        let old_pos = self.tanks.get(name).map(|t| (t.posx, t.posy));
        self.upsert_tank(name, posx, posy, rotation, None)?;

        if let Some((old_x, old_y)) = old_pos {
            self.board.clear_if_owned(name, old_x, old_y);
        }
        self.board.put_tank(name, posx, posy)?;

        if self.local_player.as_deref() == Some(name) {
            self.local_tank = self.tanks.get(name).cloned();
        }
        Ok(())
    }

    /// Advances every live bullet one cell. No-op after termination.
    pub fn step_bullets(&mut self) -> Vec<(String, Terminal)> {
        if matches!(self.phase, MatchPhase::Terminated(_)) {
            return Vec::new();
        }
        self.scheduler.step(&self.board)
    }

    /// Clears all match state after a confirmed backend reset.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.tanks.clear();
        self.board = Board::new();
        self.local_player = None;
        self.local_tank = None;
    }

    // ---- accessors for the render projection ----

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn bullets(&self) -> &BulletScheduler {
        &self.scheduler
    }

    pub fn local_player(&self) -> Option<&str> {
        self.local_player.as_deref()
    }

    pub fn local_tank(&self) -> Option<&Tank> {
        self.local_tank.as_ref()
    }

    pub fn phase(&self) -> &MatchPhase {
        &self.phase
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, MatchPhase::Terminated(_))
    }

    pub fn winner(&self) -> Option<&str> {
        match &self.phase {
            MatchPhase::Terminated(name) => Some(name),
            _ => None,
        }
    }
}
