use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{CollisionKind, Game, ItemKind, Position, Status};
use crate::metrics::SessionStats;

/// Draws a frame from read-only game snapshots
///
/// Knows nothing about timing or input; the play loop decides when a
/// redraw happens.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, game: &Game, stats: &SessionStats) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(game, stats), chunks[0]);

        // Center the game board horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let board = match game.status() {
            Status::Ready => self.render_ready(),
            Status::Over => self.render_game_over(game, stats),
            Status::Running => self.render_board(game, false),
            Status::Paused => self.render_board(game, true),
        };
        frame.render_widget(board, game_area);

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    /// The live board; while paused it is dimmed wholesale under a PAUSED
    /// title so the freeze is unmistakable at a glance
    fn render_board(&self, game: &Game, paused: bool) -> Paragraph<'_> {
        let grid = game.grid();
        let head = game.snake().head();
        let mut lines = Vec::with_capacity(grid.height());

        for y in 0..grid.height() {
            let mut spans = Vec::with_capacity(grid.width());

            for x in 0..grid.width() {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if game.snake().occupies(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if let Some(item) = game.items().iter().find(|item| item.position == pos) {
                    item_span(item.kind)
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let (title, border) = if paused {
            (
                format!(" {} | PAUSED, SPACE to resume ", game.level().name),
                Style::default().fg(Color::Yellow),
            )
        } else {
            (
                format!(" {} ", game.level().name),
                Style::default().fg(Color::White),
            )
        };

        let board = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(border)
                    .title(title),
            )
            .alignment(Alignment::Center);
        if paused {
            // The base style dims every cell; span colors stay readable
            // underneath
            board.style(Style::default().add_modifier(Modifier::DIM))
        } else {
            board
        }
    }

    fn render_stats(&self, game: &Game, stats: &SessionStats) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                game.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                game.snake().len().to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Level: ", Style::default().fg(Color::Yellow)),
            Span::styled(game.level().name.clone(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                stats.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(stats.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_ready(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "S L I T H E R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "SPACE",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, game: &Game, stats: &SessionStats) -> Paragraph<'_> {
        let cause = match game.cause_of_death() {
            Some(CollisionKind::Wall) => "You ran into the wall",
            Some(CollisionKind::Body) => "You ran into yourself",
            None => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![Span::styled(cause, Style::default().fg(Color::Gray))]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    game.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    stats.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "SPACE",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to steer | "),
            Span::styled("SPACE", Style::default().fg(Color::Cyan)),
            Span::raw(" to pause | "),
            Span::styled("R", Style::default().fg(Color::Cyan)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

/// One glyph per item kind, so the player can tell helpers from hazards
fn item_span(kind: ItemKind) -> Span<'static> {
    match kind {
        ItemKind::Apple => Span::styled(
            "● ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        ItemKind::Poison => Span::styled("▲ ", Style::default().fg(Color::Magenta)),
        ItemKind::Reverse => Span::styled("◆ ", Style::default().fg(Color::Blue)),
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
