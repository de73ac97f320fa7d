use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::game::{GameState, GameStatus};
use crate::grid::{Position, Tile};
use crate::item::ItemKind;
use crate::password::generate_password;
use crate::powerup::PowerUpKind;
use crate::ui::hud::{HUD_HEIGHT, render_hud};
use crate::ui::menu::{render_game_over_menu, render_idle_menu, render_respawn_banner};

/// Terminal columns per tile, so tiles come out roughly square.
pub const TILE_WIDTH: u16 = 2;

const GLYPH_WALL: &str = "██";
const GLYPH_TRAIL: &str = "░░";
const GLYPH_SNAKE_HEAD: &str = "██";
const GLYPH_SNAKE_BODY: &str = "▓▓";

const WALL_COLOR: Color = Color::Rgb(90, 90, 110);
const TRAIL_COLOR: Color = Color::Rgb(70, 50, 50);
const SNAKE_HEAD_COLOR: Color = Color::LightGreen;
const SNAKE_BODY_COLOR: Color = Color::Green;

/// Hue step between neighbouring segments of a rainbow snake.
const RAINBOW_SEGMENT_SPREAD: f32 = 12.0;

/// Largest square board, in tiles, that fits a `width` by `height` terminal
/// next to the HUD and the board frame.
#[must_use]
pub fn board_tiles_for(width: u16, height: u16) -> u16 {
    let columns = width.saturating_sub(2) / TILE_WIDTH;
    let rows = height.saturating_sub(2 + HUD_HEIGHT);
    columns.min(rows)
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState) {
    let area = frame.area();
    let play_area = render_hud(frame, area, state);
    let board_area = board_rect(play_area, state.tile_count());

    let block = Block::bordered()
        .title(format!(" level {} ", state.level))
        .border_style(Style::new().fg(Color::DarkGray));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_maze(frame, inner, state);
    render_trail(frame, inner, state);
    render_items(frame, inner, state);
    render_snake(frame, inner, state);

    match state.status {
        GameStatus::Idle => {
            let password = (state.level % 10 == 0).then(|| generate_password(state.level));
            render_idle_menu(frame, board_area, state.level, password.as_deref());
        }
        GameStatus::Respawning => render_respawn_banner(frame, board_area, state),
        GameStatus::GameOver => {
            render_game_over_menu(frame, board_area, state.score, state.death_reason);
        }
        GameStatus::Running => {}
    }
}

fn board_rect(play_area: Rect, tile_count: usize) -> Rect {
    let tiles = u16::try_from(tile_count).unwrap_or(u16::MAX);
    let width = tiles.saturating_mul(TILE_WIDTH).saturating_add(2);
    let height = tiles.saturating_add(2);

    let x = play_area.x + play_area.width.saturating_sub(width) / 2;
    let y = play_area.y + play_area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height).intersection(play_area)
}

fn render_maze(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let style = Style::new().fg(WALL_COLOR);
    let tile_count = i32::try_from(state.tile_count()).unwrap_or(0);
    let buffer = frame.buffer_mut();

    for y in 0..tile_count {
        for x in 0..tile_count {
            let position = Position::new(x, y);
            if state.maze.tile(position) != Some(Tile::Wall) {
                continue;
            }
            if let Some((column, row)) = logical_to_terminal(inner, state.tile_count(), position) {
                buffer.set_string(column, row, GLYPH_WALL, style);
            }
        }
    }
}

fn render_trail(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let style = Style::new().fg(TRAIL_COLOR);
    let buffer = frame.buffer_mut();

    for position in &state.trail {
        if let Some((x, y)) = logical_to_terminal(inner, state.tile_count(), *position) {
            buffer.set_string(x, y, GLYPH_TRAIL, style);
        }
    }
}

fn render_items(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let buffer = frame.buffer_mut();

    for kind in ItemKind::ALL {
        let (glyph, color) = item_glyph(kind);
        for position in state.items.of(kind) {
            if let Some((x, y)) = logical_to_terminal(inner, state.tile_count(), *position) {
                buffer.set_string(x, y, glyph, Style::new().fg(color));
            }
        }
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let rainbow = state.power_ups.is_active(PowerUpKind::Mushroom);
    let buffer = frame.buffer_mut();

    for (index, segment) in state.snake.segments().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, state.tile_count(), *segment) else {
            continue;
        };

        let is_head = index == 0;
        let color = if rainbow {
            rainbow_color(state.rainbow_hue + index as f32 * RAINBOW_SEGMENT_SPREAD)
        } else if is_head {
            SNAKE_HEAD_COLOR
        } else {
            SNAKE_BODY_COLOR
        };

        if is_head {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new().fg(color).add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(color));
        }
    }
}

fn item_glyph(kind: ItemKind) -> (&'static str, Color) {
    match kind {
        ItemKind::Pellet => ("()", Color::Yellow),
        ItemKind::Mushroom => ("♣♣", Color::LightRed),
        ItemKind::LightningBolt => ("≈≈", Color::LightCyan),
        ItemKind::Hourglass => ("><", Color::LightBlue),
        ItemKind::Star => ("**", Color::LightYellow),
    }
}

/// Fully saturated colour for `hue` degrees.
#[must_use]
pub fn rainbow_color(hue: f32) -> Color {
    let (r, g, b) = hsl_to_rgb(hue, 1.0, 0.5);
    Color::Rgb(r, g, b)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let hue = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let second = chroma * (1.0 - (hue % 2.0 - 1.0).abs());
    let (r, g, b) = match hue as u8 {
        0 => (chroma, second, 0.0),
        1 => (second, chroma, 0.0),
        2 => (0.0, chroma, second),
        3 => (0.0, second, chroma),
        4 => (second, 0.0, chroma),
        _ => (chroma, 0.0, second),
    };
    let offset = lightness - chroma / 2.0;
    let channel = |value: f32| ((value + offset) * 255.0).round() as u8;
    (channel(r), channel(g), channel(b))
}

fn logical_to_terminal(inner: Rect, tile_count: usize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within(tile_count) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(TILE_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(TILE_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
