use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::game::{DeathReason, GameState};

/// Waiting-for-input popup shown before every level. Levels with a code show
/// it so the player can come back later.
pub fn render_idle_menu(frame: &mut Frame<'_>, area: Rect, level: u32, password: Option<&str>) {
    let popup = centered_popup(area, 80, 50);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(format!("LEVEL {level}")).style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("arrow key to start"),
    ];
    if let Some(password) = password {
        lines.push(Line::from(""));
        lines.push(
            Line::from(format!("code: {password}")).style(Style::default().fg(Color::Yellow)),
        );
    }
    lines.push(Line::from(""));
    lines.push(Line::from("type a code to skip").style(Style::default().fg(Color::DarkGray)));
    lines.push(Line::from("[Esc] quit").style(Style::default().fg(Color::DarkGray)));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" ready ")),
        popup,
    );
}

/// One-line notice while the ticker counts down to the resumed run.
pub fn render_respawn_banner(frame: &mut Frame<'_>, area: Rect, state: &GameState) {
    let popup = centered_popup(area, 80, 20);
    frame.render_widget(Clear, popup);

    let cause = state.death_reason.map_or("crashed", DeathReason::label);
    let lines = vec![
        Line::from(format!("snake {cause}")),
        Line::from(format!("back to level {}", state.level)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::LightRed))
            .block(Block::bordered()),
        popup,
    );
}

/// Final game-over popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    death_reason: Option<DeathReason>,
) {
    let popup = centered_popup(area, 80, 50);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("GAME OVER").style(
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(death_reason.map_or("", DeathReason::label)),
        Line::from(""),
        Line::from("[Enter] play again"),
        Line::from("[Esc] quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
