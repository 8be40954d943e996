//! Visual projection of the match model.
//!
//! Rendering is a pure function of (board, registry, bullets, phase);
//! nothing here mutates game state, so the core stays testable without
//! a window attached.

use crate::board::Cell;
use crate::game::{MatchPhase, MatchSession};
use macroquad::prelude::*;
use shared::{COLS, ROWS};

const CELL_PX: f32 = 48.0;
const MARGIN_PX: f32 = 24.0;
const FALLBACK_TANK_COLOR: Color = GRAY;

pub struct Renderer {
    cell: f32,
    origin_x: f32,
    origin_y: f32,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            cell: CELL_PX,
            origin_x: MARGIN_PX,
            origin_y: MARGIN_PX,
        }
    }

    pub fn render(&self, session: &MatchSession, status_line: Option<&str>) {
        clear_background(Color::from_rgba(26, 26, 26, 255));

        self.draw_grid(session);
        self.draw_tanks(session);
        self.draw_bullets(session);
        self.draw_status(session, status_line);

        if let MatchPhase::Terminated(winner) = session.phase() {
            self.draw_winner_banner(winner);
        }
    }

    fn cell_rect(&self, x: i32, y: i32) -> (f32, f32) {
        (
            self.origin_x + x as f32 * self.cell,
            self.origin_y + y as f32 * self.cell,
        )
    }

    fn draw_grid(&self, session: &MatchSession) {
        for (y, row) in session.board().rows().iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let (px, py) = self.cell_rect(x as i32, y as i32);
                let fill = match cell {
                    Cell::Wall => Color::from_rgba(90, 90, 90, 255),
                    _ => Color::from_rgba(40, 40, 40, 255),
                };
                draw_rectangle(px, py, self.cell, self.cell, fill);
                draw_rectangle_lines(px, py, self.cell, self.cell, 1.0, DARKGRAY);
            }
        }
    }

    fn draw_tanks(&self, session: &MatchSession) {
        for tank in session.tanks() {
            let (px, py) = self.cell_rect(tank.posx, tank.posy);
            let body = parse_color(&tank.color);
            let inset = self.cell * 0.15;
            draw_rectangle(
                px + inset,
                py + inset,
                self.cell - 2.0 * inset,
                self.cell - 2.0 * inset,
                body,
            );

            // barrel shows the heading
            if let Some(heading) = tank.heading() {
                let (dx, dy) = heading.step();
                let cx = px + self.cell / 2.0;
                let cy = py + self.cell / 2.0;
                draw_line(
                    cx,
                    cy,
                    cx + dx as f32 * self.cell * 0.45,
                    cy + dy as f32 * self.cell * 0.45,
                    3.0,
                    WHITE,
                );
            }

            if session.local_player() == Some(tank.name.as_str()) {
                draw_rectangle_lines(px, py, self.cell, self.cell, 2.0, GREEN);
            }
            draw_text(&tank.name, px + 2.0, py - 2.0, 14.0, WHITE);
        }
    }

    fn draw_bullets(&self, session: &MatchSession) {
        for bullet in session.bullets().bullets() {
            let (px, py) = self.cell_rect(bullet.x, bullet.y);
            draw_circle(
                px + self.cell / 2.0,
                py + self.cell / 2.0,
                self.cell * 0.12,
                RED,
            );
        }
    }

    fn draw_status(&self, session: &MatchSession, status_line: Option<&str>) {
        let base_y = self.origin_y + ROWS as f32 * self.cell + 20.0;
        let who = match session.local_player() {
            Some(name) => format!("Playing as {}", name),
            None => "Spectating".to_string(),
        };
        draw_text(&who, self.origin_x, base_y, 18.0, WHITE);

        let roster = format!("{} tanks on the board", session.tank_count());
        draw_text(&roster, self.origin_x, base_y + 20.0, 16.0, LIGHTGRAY);

        if let Some(line) = status_line {
            draw_text(line, self.origin_x, base_y + 40.0, 16.0, YELLOW);
        }
    }

    fn draw_winner_banner(&self, winner: &str) {
        let text = format!("Winner: {}", winner);
        let width = COLS as f32 * self.cell;
        draw_rectangle(
            self.origin_x,
            self.origin_y + 60.0,
            width,
            60.0,
            Color::from_rgba(0, 0, 0, 200),
        );
        draw_text(
            &text,
            self.origin_x + width / 2.0 - text.len() as f32 * 6.0,
            self.origin_y + 98.0,
            32.0,
            GOLD,
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `#rrggbb`; anything else falls back to a fixed color rather
/// than dropping the tank from the screen.
fn parse_color(hex: &str) -> Color {
    let raw = match hex.strip_prefix('#') {
        Some(raw) if raw.len() == 6 && raw.is_ascii() => raw,
        _ => return FALLBACK_TANK_COLOR,
    };
    match (
        u8::from_str_radix(&raw[0..2], 16),
        u8::from_str_radix(&raw[2..4], 16),
        u8::from_str_radix(&raw[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Color::from_rgba(r, g, b, 255),
        _ => FALLBACK_TANK_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_valid() {
        let c = parse_color("#fa0a0a");
        assert_eq!((c.r * 255.0).round() as u8, 0xfa);
        assert_eq!((c.g * 255.0).round() as u8, 0x0a);
        assert_eq!((c.b * 255.0).round() as u8, 0x0a);
    }

    #[test]
    fn test_parse_color_fallback() {
        for bad in ["", "#fff", "red", "#zzzzzz", "fa0a0a"] {
            let c = parse_color(bad);
            assert_eq!(c.r, FALLBACK_TANK_COLOR.r);
            assert_eq!(c.g, FALLBACK_TANK_COLOR.g);
            assert_eq!(c.b, FALLBACK_TANK_COLOR.b);
        }
    }
}
