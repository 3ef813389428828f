/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.  The playfield is measured in sprite
/// pixels, so every entity is scaled onto the terminal grid and drawn
/// wherever its pixel mask is opaque at the cell centre.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::entities::{GameState, GameStatus};
use crate::mask::Rect;
use crate::scores::ScoreEntry;
use crate::sprites::Sprite;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::White;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_KILLS: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_LEVEL_COMPLETE: Color = Color::Green;
const C_GAME_OVER: Color = Color::Red;
const C_ERROR: Color = Color::Red;

const GLYPH_PLAYER: char = '█';
const GLYPH_ENEMY: char = '▓';
const GLYPH_BULLET: char = '║';
const GLYPH_READY: char = '▮';

// ── Terminal ↔ playfield mapping ──────────────────────────────────────────────

/// Terminal area the playfield is drawn into: row 0 is the HUD, the last
/// row holds the controls hint, the rest is the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(3)
    }

    /// Terminal cells covered by a pixel-space rectangle, clipped to the
    /// playfield.  Every visible rectangle covers at least one cell.
    pub fn cells(&self, rect: &Rect, width: u32, height: u32) -> Vec<(u16, u16)> {
        let cols = self.cols.saturating_sub(2) as f32;
        let rows = self.field_rows() as f32;
        if cols <= 0.0 || rows <= 0.0 || width == 0 || height == 0 {
            return Vec::new();
        }
        let sx = cols / width as f32;
        let sy = rows / height as f32;

        let c0 = (rect.x as f32 * sx).floor() as i32;
        let r0 = (rect.y as f32 * sy).floor() as i32;
        let c1 = ((rect.right() as f32 * sx).ceil() as i32).max(c0 + 1);
        let r1 = ((rect.bottom() as f32 * sy).ceil() as i32).max(r0 + 1);

        let mut out = Vec::new();
        for r in r0.max(0)..r1.min(rows as i32) {
            for c in c0.max(0)..c1.min(cols as i32) {
                out.push((c as u16 + 1, r as u16 + 2));
            }
        }
        out
    }

    /// Pixel inside `rect` at the centre of terminal cell `(col, row)`.
    fn pixel_at(&self, col: u16, row: u16, rect: &Rect, width: u32, height: u32) -> (i32, i32) {
        let sx = width as f32 / self.cols.saturating_sub(2).max(1) as f32;
        let sy = height as f32 / self.field_rows().max(1) as f32;
        let px = ((col - 1) as f32 + 0.5) * sx;
        let py = ((row - 2) as f32 + 0.5) * sy;
        (px as i32 - rect.x, py as i32 - rect.y)
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.status {
        GameStatus::LevelComplete { .. } => {
            draw_banner(out, view, &[("LEVEL COMPLETE", C_LEVEL_COMPLETE)])?;
        }
        GameStatus::GameOver { .. } | GameStatus::Finished => {
            let score_line = format!("Final Score: {}", state.score);
            draw_banner(
                out,
                view,
                &[("GAME OVER", C_GAME_OVER), (score_line.as_str(), C_HUD_SCORE)],
            )?;
        }
        GameStatus::Playing => {
            draw_border(out, view)?;
            draw_hud(out, state, view)?;
            for enemy in &state.enemies {
                draw_sprite(out, state, view, &enemy.ship.rect, &enemy.ship.sprite, GLYPH_ENEMY)?;
            }
            for bullet in &state.player.fired_bullets {
                draw_sprite(out, state, view, &bullet.rect, &bullet.sprite, GLYPH_BULLET)?;
            }
            let ship = &state.player.ship;
            draw_sprite(out, state, view, &ship.rect, &ship.sprite, GLYPH_PLAYER)?;
            draw_hint(out, view, "ARROWS / WASD : Move   SPACE : Shoot   ESC : Quit")?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let bottom = view.field_rows() + 2;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;
    for row in 2..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("Lives: {}  ", state.lives)))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}  ", state.score)))?;
    out.queue(style::SetForegroundColor(C_HUD_KILLS))?;
    out.queue(Print(format!(
        "Kills: {}/{}",
        state.level.kills, state.level.target_kills
    )))?;

    // Ready bullets, then level, right-aligned
    let ready: String = std::iter::repeat(GLYPH_READY)
        .take(state.player.bullets.len())
        .collect();
    let right = format!("{ready}  Level: {}", state.level.number);
    let rx = view.cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(rgb(state.player.bullet_sprite.color)))?;
    out.queue(Print(ready))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("  Level: {}", state.level.number)))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_sprite<W: Write>(
    out: &mut W,
    state: &GameState,
    view: Viewport,
    rect: &Rect,
    sprite: &Sprite,
    glyph: char,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(rgb(sprite.color)))?;
    let cells = view.cells(rect, state.width, state.height);
    let single = cells.len() == 1;
    for (col, row) in cells {
        let (px, py) = view.pixel_at(col, row, rect, state.width, state.height);
        // Sub-cell sprites are always shown so bullets never vanish.
        if single || sprite.mask.get(px, py) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── Overlays and menus ────────────────────────────────────────────────────────

fn draw_hint<W: Write>(out: &mut W, view: Viewport, hint: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

/// Centred block of lines.
fn draw_banner<W: Write>(
    out: &mut W,
    view: Viewport,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

pub fn render_menu<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_banner(
        out,
        view,
        &[
            ("★  WAVE  SHOOTER  ★", Color::Cyan),
            ("", C_HUD),
            ("[1] New game", C_HUD),
            ("[2] High scores", C_HUD),
            ("[Q] Quit", C_HUD),
        ],
    )?;
    draw_hint(out, view, "1 / 2 : Choose   Q / ESC : Quit")?;
    out.queue(style::ResetColor)?;
    out.flush()
}

pub fn render_name_prompt<W: Write>(
    out: &mut W,
    view: Viewport,
    name: &str,
    error: Option<&str>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let field = format!("> {name}_");
    let error = error.unwrap_or("");
    draw_banner(
        out,
        view,
        &[
            ("Enter your name", Color::Cyan),
            ("", C_HUD),
            (field.as_str(), C_HUD),
            ("", C_HUD),
            (error, C_ERROR),
        ],
    )?;
    draw_hint(out, view, "ENTER : Start   ESC : Back")?;
    out.queue(style::ResetColor)?;
    out.flush()
}

pub fn render_scores<W: Write>(
    out: &mut W,
    view: Viewport,
    entries: &[ScoreEntry],
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut lines: Vec<String> = vec!["High Scores".to_string(), String::new()];
    if entries.is_empty() {
        lines.push("No records yet".to_string());
    } else {
        lines.extend(
            entries
                .iter()
                .enumerate()
                .map(|(i, e)| format!("{}. {} - {}", i + 1, e.name, e.score)),
        );
    }
    let styled: Vec<(&str, Color)> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), if i == 0 { Color::Cyan } else { C_HUD }))
        .collect();
    draw_banner(out, view, &styled)?;
    draw_hint(out, view, "ESC / BACKSPACE : Back")?;
    out.queue(style::ResetColor)?;
    out.flush()
}
