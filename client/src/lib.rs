//! # Tank Battle Client Library
//!
//! Client-side engine for the grid-based multiplayer tank battle. The
//! client renders a shared 10x15 board, turns keyboard input into
//! outbound intents, and reconciles local state against authoritative
//! events pushed by the server.
//!
//! ## Architecture Overview
//!
//! The client never moves its own tank speculatively. Every intent
//! (move, shoot) goes to the server and takes effect only when the
//! corresponding event is echoed back, so the server echo is the single
//! source of truth for positions. The one locally-run simulation is
//! bullet flight: each spawned bullet advances one cell per tick until
//! it leaves the board, hits something, or is absorbed by a reported
//! tank elimination.
//!
//! ## Module Organization
//!
//! ### Board Module (`board`)
//! Grid occupancy model: empty, wall, or tank-occupied cells. A derived
//! view loaded from server snapshots and kept in step with movement
//! events.
//!
//! ### Game Module (`game`)
//! The match session: tank registry, local identity, match phase, and
//! the reconciler that applies inbound events. Also builds outbound
//! move and shoot intents.
//!
//! ### Bullet Module (`bullet`)
//! Trajectory scheduler owning every live bullet simulation, advanced
//! from a single tick dispatch with exactly-once termination.
//!
//! ### Input Module (`input`)
//! Keyboard sampling with press-edge detection; maps keys to player
//! actions.
//!
//! ### Network Module (`network`)
//! UDP transport, join handshake, the select-based event loop, and the
//! delayed end-of-match reset.
//!
//! ### Rendering Module (`rendering`)
//! Projection of the current model onto the screen; reads state, never
//! mutates it.

pub mod board;
pub mod bullet;
pub mod error;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
