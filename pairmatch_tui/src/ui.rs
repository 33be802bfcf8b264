//! UI rendering
//!
//! Pure functions from [`App`] state to ratatui widgets.

use host::Status;
use pairmatch::{CardView, Face, GameOutcome, GameSnapshot, GRID_COLUMNS};
use ratatui::{prelude::*, widgets::*};

use crate::app::App;

const TITLE: &str = "Memory Match";
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const PLAYER_COLORS: [Color; 2] = [Color::Blue, Color::Magenta];
const IMAGE_LABEL_WIDTH: usize = 16;

fn player_name(player_idx: usize) -> String {
    format!("Player {}", player_idx + 1)
}

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();
    match &app.snapshot().status {
        Status::Loading { progress } => {
            let spinner = SPINNER[app.ticks() % SPINNER.len()];
            render_centered(
                frame,
                area,
                vec![
                    Line::styled(
                        format!("{} Loading the game...", spinner),
                        Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                    ),
                    Line::styled(progress.to_string(), Style::new().fg(Color::Cyan)),
                ],
            );
        }
        Status::Failed { message } => {
            render_centered(
                frame,
                area,
                vec![
                    Line::styled(
                        "Oops! Something went wrong",
                        Style::new().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Line::raw(message.as_str()),
                    Line::raw(""),
                    Line::styled("Press r to try again", Style::new().fg(Color::Yellow)),
                ],
            );
        }
        Status::Ready => {
            if let Some(game) = &app.snapshot().game {
                render_game(frame, area, game, app.cursor());
            }
        }
    }
}

fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line>) {
    let height = lines.len() as u16;
    let area = Layout::new(
        Direction::Vertical,
        [
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ],
    )
    .split(area)[1];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_game(frame: &mut Frame, area: Rect, game: &GameSnapshot, cursor: usize) {
    let main_layout = Layout::new(
        Direction::Vertical,
        [
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ],
    )
    .split(area);

    frame.render_widget(
        Paragraph::new(TITLE)
            .alignment(Alignment::Center)
            .style(Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
        main_layout[0],
    );
    render_scores(frame, main_layout[1], game);

    match game.outcome {
        Some(outcome) => render_game_over(frame, main_layout[2], outcome),
        None => {
            render_table(frame, main_layout[2], &game.cards, cursor);
            let player_idx = game.current_player_idx;
            frame.render_widget(
                Paragraph::new(format!("Turn: {}", player_name(player_idx)))
                    .alignment(Alignment::Center)
                    .style(
                        Style::new()
                            .fg(Color::White)
                            .bg(PLAYER_COLORS[player_idx])
                            .add_modifier(Modifier::BOLD),
                    ),
                main_layout[3],
            );
        }
    }
}

fn render_scores(frame: &mut Frame, area: Rect, game: &GameSnapshot) {
    let columns = Layout::new(
        Direction::Horizontal,
        [
            Constraint::Min(0),
            Constraint::Length(16),
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Min(0),
        ],
    )
    .split(area);

    for (player_idx, column) in [(0, columns[1]), (1, columns[3])] {
        let is_current = game.outcome.is_none() && game.current_player_idx == player_idx;
        let mut block = Block::new()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(player_name(player_idx))
            .title_alignment(Alignment::Center);
        block = if is_current {
            block
                .border_type(BorderType::Thick)
                .border_style(Style::new().fg(PLAYER_COLORS[player_idx]))
        } else {
            block.border_style(Style::new().fg(Color::DarkGray))
        };
        let score = Paragraph::new(game.scores[player_idx].to_string())
            .alignment(Alignment::Center)
            .style(Style::new().add_modifier(Modifier::BOLD))
            .block(block);
        frame.render_widget(score, column);
    }

    let versus = Layout::new(
        Direction::Vertical,
        [Constraint::Min(0), Constraint::Length(1), Constraint::Min(0)],
    )
    .split(columns[2])[1];
    frame.render_widget(
        Paragraph::new("VS")
            .alignment(Alignment::Center)
            .style(Style::new().fg(Color::DarkGray)),
        versus,
    );
}

fn render_table(frame: &mut Frame, area: Rect, cards: &[CardView], cursor: usize) {
    let num_rows = cards.len().div_ceil(GRID_COLUMNS).max(1) as u32;
    let rows = Layout::new(
        Direction::Vertical,
        (0..num_rows).map(|_| Constraint::Ratio(1, num_rows)),
    )
    .split(area);

    for (row_idx, row_cards) in cards.chunks(GRID_COLUMNS).enumerate() {
        let cells = Layout::new(
            Direction::Horizontal,
            (0..GRID_COLUMNS).map(|_| Constraint::Ratio(1, GRID_COLUMNS as u32)),
        )
        .split(rows[row_idx]);
        for (col_idx, card) in row_cards.iter().enumerate() {
            let position = row_idx * GRID_COLUMNS + col_idx;
            frame.render_widget(card_widget(card, position == cursor), cells[col_idx]);
        }
    }
}

/// Keeps the end of long image references, where file names live.
fn image_label(image: &str) -> String {
    let len = image.chars().count();
    if len <= IMAGE_LABEL_WIDTH {
        return image.to_string();
    }
    let tail: String = image.chars().skip(len - (IMAGE_LABEL_WIDTH - 1)).collect();
    format!("…{}", tail)
}

fn card_widget(card: &CardView, selected: bool) -> Paragraph<'static> {
    let (lines, color) = match (card.face, &card.character) {
        (Face::Hidden, _) | (_, None) => (vec![Line::raw(""), Line::raw("?")], Color::Gray),
        (face, Some(character)) => {
            let color = if face == Face::Matched {
                Color::Green
            } else {
                Color::Yellow
            };
            let mut lines = vec![
                Line::styled(
                    character.name.clone(),
                    Style::new().add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    character.source.clone(),
                    Style::new().add_modifier(Modifier::ITALIC),
                ),
            ];
            if let Some(image) = &card.image {
                lines.push(Line::styled(
                    image_label(image.as_str()),
                    Style::new().fg(Color::DarkGray),
                ));
            }
            (lines, color)
        }
    };

    let mut block = Block::new()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(color));
    if selected {
        block = block
            .border_type(BorderType::Double)
            .border_style(Style::new().fg(Color::White).add_modifier(Modifier::BOLD));
    }
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::new().fg(color))
        .block(block)
}

fn render_game_over(frame: &mut Frame, area: Rect, outcome: GameOutcome) {
    let result = match outcome {
        GameOutcome::WonByPlayer { player_idx } => Line::styled(
            format!("{} wins!", player_name(player_idx)),
            Style::new().fg(PLAYER_COLORS[player_idx]).add_modifier(Modifier::BOLD),
        ),
        GameOutcome::Draw => Line::styled(
            "It's a draw!",
            Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
    };
    render_centered(
        frame,
        area,
        vec![
            Line::styled(
                "Game over!",
                Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            result,
            Line::raw(""),
            Line::styled("Press r to play again", Style::new().fg(Color::Yellow)),
        ],
    );
}
