use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::game::GameState;
use crate::powerup::{PowerUpKind, PowerUps};

/// Rows taken by the HUD below the board.
pub const HUD_HEIGHT: u16 = 2;

const HUD_MARGIN_X: u16 = 2;
const SEPARATOR: &str = " │ ";
const VALUE_COLOR: Color = Color::White;
const LABEL_COLOR: Color = Color::DarkGray;

/// Renders the two-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState) -> Rect {
    let [play_area, stats_area, effects_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let stats_area = inset_horizontal(stats_area, HUD_MARGIN_X);
    let effects_area = inset_horizontal(effects_area, HUD_MARGIN_X);

    frame.render_widget(
        Paragraph::new(stats_line(
            state.snake.len(),
            state.level,
            state.score,
            state.items.pellets.len(),
            usize::from(stats_area.width),
        ))
        .alignment(Alignment::Right)
        .style(Style::default().fg(LABEL_COLOR)),
        stats_area,
    );

    let interval_ms = state.tick_interval().as_secs_f64() * 1000.0;
    frame.render_widget(
        Paragraph::new(effects_line(&state.power_ups, interval_ms))
            .alignment(Alignment::Right)
            .style(Style::default().fg(LABEL_COLOR)),
        effects_area,
    );

    play_area
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(margin.saturating_mul(2)),
        height: area.height,
    }
}

fn stats_line(
    length: usize,
    level: u32,
    score: u32,
    pellets_left: usize,
    available_width: usize,
) -> Line<'static> {
    let compact = stats_width(length, level, score, pellets_left, false) > available_width;
    let labels = if compact {
        ["L", "V", "S", "P"]
    } else {
        ["Length", "Level", "Score", "Pellets"]
    };
    let values = [
        length.to_string(),
        level.to_string(),
        score.to_string(),
        pellets_left.to_string(),
    ];

    let mut spans = Vec::with_capacity(labels.len() * 3);
    for (index, (label, value)) in labels.into_iter().zip(values).enumerate() {
        if index > 0 {
            spans.push(Span::raw(SEPARATOR));
        }
        spans.push(Span::raw(format!("{label}: ")));
        spans.push(Span::styled(value, Style::default().fg(VALUE_COLOR)));
    }
    Line::from(spans)
}

fn stats_width(length: usize, level: u32, score: u32, pellets_left: usize, compact: bool) -> usize {
    let labels = if compact {
        ["L", "V", "S", "P"]
    } else {
        ["Length", "Level", "Score", "Pellets"]
    };
    let values = [
        length.to_string(),
        level.to_string(),
        score.to_string(),
        pellets_left.to_string(),
    ];

    let fields: usize = labels
        .iter()
        .zip(&values)
        .map(|(label, value)| label.chars().count() + 2 + value.chars().count())
        .sum();
    fields + SEPARATOR.chars().count() * (labels.len() - 1)
}

fn effects_line(power_ups: &PowerUps, interval_ms: f64) -> Line<'static> {
    let mut spans = Vec::new();

    for kind in PowerUpKind::ALL {
        let timer = power_ups.timer(kind);
        if !timer.active {
            continue;
        }
        spans.push(Span::styled(
            format!("{} {:.1}s", kind.label(), timer.timer_ms / 1000.0),
            Style::default().fg(effect_color(kind)),
        ));
        spans.push(Span::raw(SEPARATOR));
    }

    spans.push(Span::raw(format!("tick {interval_ms:.0} ms")));
    Line::from(spans)
}

fn effect_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Mushroom => Color::LightRed,
        PowerUpKind::LightningBolt => Color::LightCyan,
        PowerUpKind::Hourglass => Color::LightBlue,
        PowerUpKind::Star => Color::LightYellow,
    }
}
