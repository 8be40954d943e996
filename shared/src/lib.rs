use serde::{Deserialize, Serialize};

pub const ROWS: usize = 10;
pub const COLS: usize = 15;
pub const MAX_PLAYERS: usize = 3;

/// Interval between bullet simulation steps.
pub const BULLET_TICK_MS: u64 = 500;
/// Delay between a winner announcement and the backend reset request.
pub const RESET_DELAY_MS: u64 = 10_000;
/// How long the client waits for the join handshake before giving up.
pub const JOIN_TIMEOUT_MS: u64 = 3_000;

/// Board cell code for an empty box on the wire.
pub const EMPTY_CODE: &str = "0";
/// Board cell code for a wall on the wire.
pub const WALL_CODE: &str = "1";

/// The four cardinal headings a tank or bullet can face.
///
/// On the wire a heading travels as its degree value (`0`, `90`, `180`,
/// `-90`); anything else is rejected during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Right,
    Down,
    Left,
    Up,
}

impl Heading {
    pub fn degrees(self) -> i16 {
        match self {
            Heading::Right => 0,
            Heading::Down => 90,
            Heading::Left => 180,
            Heading::Up => -90,
        }
    }

    pub fn from_degrees(deg: i16) -> Option<Self> {
        match deg {
            0 => Some(Heading::Right),
            90 => Some(Heading::Down),
            180 => Some(Heading::Left),
            -90 => Some(Heading::Up),
            _ => None,
        }
    }

    /// Unit step in grid coordinates (x grows right, y grows down).
    pub fn step(self) -> (i32, i32) {
        match self {
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Up => (0, -1),
        }
    }
}

/// A movement request from the keyboard, before it becomes an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    /// Heading the tank ends up facing after moving this way.
    pub fn heading(self) -> Heading {
        match self {
            MoveDir::Left => Heading::Left,
            MoveDir::Right => Heading::Right,
            MoveDir::Up => Heading::Up,
            MoveDir::Down => Heading::Down,
        }
    }

    pub fn step(self) -> (i32, i32) {
        self.heading().step()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Tank {
    pub name: String,
    pub posx: i32,
    pub posy: i32,
    pub rotation: i16,
    pub color: String,
}

impl Tank {
    pub fn new(name: &str, posx: i32, posy: i32, rotation: i16, color: &str) -> Self {
        Self {
            name: name.to_string(),
            posx,
            posy,
            rotation,
            color: color.to_string(),
        }
    }

    pub fn heading(&self) -> Option<Heading> {
        Heading::from_degrees(self.rotation)
    }
}

pub fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && x < COLS as i32 && y >= 0 && y < ROWS as i32
}

/// Everything that crosses the wire, both directions.
///
/// Each variant corresponds to one pub/sub topic of the match channel;
/// field names mirror the topic payloads.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Packet {
    // client -> server
    Join {
        name: String,
    },
    MoveIntent {
        name: String,
        pos_x: i32,
        pos_y: i32,
        new_pos_x: i32,
        new_pos_y: i32,
        rotation: i16,
    },
    ShootIntent {
        name: String,
        bullet_id: String,
        start_x: i32,
        start_y: i32,
        direction: i16,
    },
    /// Empty trigger asking the server to run its victory check.
    WinnerCheck,
    ResetRequest,
    Leave,

    // server -> client
    Joined {
        tank: Tank,
        board: Vec<Vec<String>>,
        roster: Vec<Tank>,
    },
    JoinDenied {
        reason: String,
    },
    MovementUpdate {
        name: String,
        posx: i32,
        posy: i32,
        rotation: i16,
    },
    BulletSpawned {
        bullet_id: String,
        start_x: i32,
        start_y: i32,
        direction: i16,
        tank_id: String,
    },
    /// Full grid snapshot, rows of cell codes.
    BoardResync {
        board: Vec<Vec<String>>,
    },
    CollisionResult {
        tank: String,
        x: i32,
        y: i32,
    },
    Winner {
        name: String,
    },
    ResetAck,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_degrees_roundtrip() {
        for heading in [Heading::Right, Heading::Down, Heading::Left, Heading::Up] {
            assert_eq!(Heading::from_degrees(heading.degrees()), Some(heading));
        }
    }

    #[test]
    fn test_heading_rejects_non_cardinal() {
        assert_eq!(Heading::from_degrees(45), None);
        assert_eq!(Heading::from_degrees(270), None);
        assert_eq!(Heading::from_degrees(-180), None);
    }

    #[test]
    fn test_heading_steps() {
        assert_eq!(Heading::Right.step(), (1, 0));
        assert_eq!(Heading::Down.step(), (0, 1));
        assert_eq!(Heading::Left.step(), (-1, 0));
        assert_eq!(Heading::Up.step(), (0, -1));
    }

    #[test]
    fn test_move_dir_rotation_mapping() {
        assert_eq!(MoveDir::Left.heading().degrees(), 180);
        assert_eq!(MoveDir::Right.heading().degrees(), 0);
        assert_eq!(MoveDir::Up.heading().degrees(), -90);
        assert_eq!(MoveDir::Down.heading().degrees(), 90);
    }

    #[test]
    fn test_tank_creation() {
        let tank = Tank::new("leo", 1, 8, 0, "#fa0a0a");
        assert_eq!(tank.name, "leo");
        assert_eq!(tank.posx, 1);
        assert_eq!(tank.posy, 8);
        assert_eq!(tank.heading(), Some(Heading::Right));
    }

    #[test]
    fn test_tank_invalid_heading() {
        let tank = Tank::new("leo", 1, 8, 30, "#fa0a0a");
        assert_eq!(tank.heading(), None);
    }

    #[test]
    fn test_in_bounds_edges() {
        assert!(in_bounds(0, 0));
        assert!(in_bounds(COLS as i32 - 1, ROWS as i32 - 1));
        assert!(!in_bounds(-1, 0));
        assert!(!in_bounds(0, -1));
        assert!(!in_bounds(COLS as i32, 0));
        assert!(!in_bounds(0, ROWS as i32));
    }
}
