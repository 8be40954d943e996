//! Match channel transport: socket, handshake and the event loop.
//!
//! One task owns everything; all waiting is expressed through the
//! `select!` below, so session mutations and the renders that follow
//! them never interleave.

use crate::error::GameError;
use crate::game::MatchSession;
use crate::input::{InputManager, PlayerAction};
use crate::rendering::Renderer;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, BULLET_TICK_MS, JOIN_TIMEOUT_MS, RESET_DELAY_MS};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{interval, sleep, timeout};

pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    player_name: String,
    input_manager: InputManager,
    renderer: Renderer,
    status_line: Option<String>,
}

impl Client {
    pub async fn new(
        server_addr: &str,
        player_name: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        Ok(Client {
            socket,
            server_addr,
            player_name: player_name.to_string(),
            input_manager: InputManager::new(),
            renderer: Renderer::new(),
            status_line: None,
        })
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    /// Join handshake: the reply carries the initial board snapshot,
    /// the roster and our own server-assigned tank. A denial or a
    /// timeout is fatal; there is nothing to render without a snapshot.
    pub async fn join(&mut self) -> Result<MatchSession, GameError> {
        info!("Joining match as {}...", self.player_name);
        let join = Packet::Join {
            name: self.player_name.clone(),
        };
        self.send_packet(&join)
            .await
            .map_err(|e| GameError::RequestFailed(e.to_string()))?;

        let mut buffer = [0u8; 65_536];
        let socket = &self.socket;
        let handshake = async {
            loop {
                let (len, _) = socket
                    .recv_from(&mut buffer)
                    .await
                    .map_err(|e| GameError::RequestFailed(e.to_string()))?;
                match deserialize::<Packet>(&buffer[..len]) {
                    Ok(Packet::Joined {
                        tank,
                        board,
                        roster,
                    }) => return MatchSession::new(tank, &board, roster),
                    Ok(Packet::JoinDenied { reason }) => {
                        return Err(GameError::RequestFailed(reason))
                    }
                    // events for the match in progress can arrive ahead
                    // of the handshake reply
                    _ => continue,
                }
            }
        };

        match timeout(Duration::from_millis(JOIN_TIMEOUT_MS), handshake).await {
            Ok(result) => result,
            Err(_) => Err(GameError::RequestFailed(
                "join handshake timed out".to_string(),
            )),
        }
    }

    async fn handle_event(&mut self, session: &mut MatchSession, event: Packet) {
        match session.apply_event(event) {
            Ok(follow_ups) => {
                for packet in follow_ups {
                    if let Err(e) = self.send_packet(&packet).await {
                        error!("Error sending follow-up packet: {}", e);
                    }
                }
            }
            // invalid payloads and duplicate spawns are dropped, prior
            // state kept
            Err(e) => warn!("Dropping event: {}", e),
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut session = self.join().await?;
        info!("Joined; {} tanks on the board", session.tank_count());

        let mut input_interval = interval(Duration::from_millis(16));
        let mut bullet_interval = interval(Duration::from_millis(BULLET_TICK_MS));
        let mut render_interval = interval(Duration::from_millis(16));

        let mut buffer = [0u8; 65_536];

        while !session.is_terminated() {
            tokio::select! {
                result = self.socket.recv_from(&mut buffer) => {
                    match result {
                        Ok((len, _)) => match deserialize::<Packet>(&buffer[0..len]) {
                            Ok(event) => self.handle_event(&mut session, event).await,
                            Err(e) => warn!("Discarding undecodable packet: {}", e),
                        },
                        Err(e) => error!("Error receiving event: {}", e),
                    }
                },

                _ = input_interval.tick() => {
                    for action in self.input_manager.poll() {
                        let intent = match action {
                            PlayerAction::Move(dir) => session.request_move(dir),
                            PlayerAction::Shoot => session.request_shoot(),
                        };
                        // no local tank yet, or eliminated: silent no-op
                        if let Some(packet) = intent {
                            if let Err(e) = self.send_packet(&packet).await {
                                error!("Error sending intent: {}", e);
                            }
                        }
                    }
                },

                _ = bullet_interval.tick() => {
                    for (id, reason) in session.step_bullets() {
                        debug!("Bullet {} finished: {:?}", id, reason);
                    }
                },

                _ = render_interval.tick() => {
                    self.renderer.render(&session, self.status_line.as_deref());
                },
            }
        }

        self.finish(&mut session).await
    }

    /// End-of-match sequence: show the result, wait out the reset
    /// delay, then ask the backend to reset. If the backend does not
    /// acknowledge, local state is kept so the screen never disagrees
    /// with the server.
    async fn finish(
        &mut self,
        session: &mut MatchSession,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(winner) = session.winner() {
            info!("Match over, winner: {}", winner);
        }
        self.status_line = Some(format!(
            "Match over. Resetting in {}s...",
            RESET_DELAY_MS / 1000
        ));
        self.renderer.render(session, self.status_line.as_deref());

        sleep(Duration::from_millis(RESET_DELAY_MS)).await;

        self.request_reset().await?;
        session.teardown();
        let _ = self.send_packet(&Packet::Leave).await;
        info!("Session torn down");
        Ok(())
    }

    async fn request_reset(&mut self) -> Result<(), GameError> {
        self.send_packet(&Packet::ResetRequest)
            .await
            .map_err(|e| GameError::RequestFailed(e.to_string()))?;

        let mut buffer = [0u8; 1024];
        let socket = &self.socket;
        let wait_for_ack = async {
            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, _)) => {
                        if matches!(deserialize::<Packet>(&buffer[..len]), Ok(Packet::ResetAck)) {
                            return Ok(());
                        }
                    }
                    Err(e) => return Err(GameError::RequestFailed(e.to_string())),
                }
            }
        };

        match timeout(Duration::from_millis(JOIN_TIMEOUT_MS), wait_for_ack).await {
            Ok(result) => result,
            Err(_) => {
                error!("Backend reset was not acknowledged; keeping local state");
                self.status_line = Some("Backend reset failed".to_string());
                Err(GameError::RequestFailed(
                    "reset was not acknowledged".to_string(),
                ))
            }
        }
    }
}
