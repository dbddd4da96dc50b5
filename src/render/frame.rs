use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::surface::{GridSurface, Marker};

/// Everything the terminal frame shows besides the grid itself
pub struct FrameView<'a> {
    pub surface: &'a GridSurface,
    pub score: u64,
    pub high_score: u64,
    pub mode_label: &'a str,
}

/// Draws a [`GridSurface`] with a score header and a controls footer
pub struct FrameRenderer;

impl FrameRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, frame: &mut Frame, view: &FrameView) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(2), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(view), chunks[0]);
        frame.render_widget(self.render_grid(view.surface), chunks[1]);
        frame.render_widget(self.render_controls(view), chunks[2]);
    }

    fn render_grid(&self, surface: &GridSurface) -> Paragraph<'_> {
        let size = surface.size();
        let mut lines = Vec::with_capacity(size);

        for row in 0..size {
            let spans: Vec<Span> = (0..size)
                .map(|col| match surface.marker_at(row * size + col) {
                    Some(Marker::Snake) => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Some(Marker::Fruit) => Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let block = if surface.is_game_over() {
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Red))
                .title(" GAME OVER ")
        } else {
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake ")
        };

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, view: &FrameView) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled(view.mode_label.to_string(), Style::default().fg(Color::Cyan)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self, view: &FrameView) -> Paragraph<'_> {
        let line = if view.surface.is_game_over() {
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ])
        } else {
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}
