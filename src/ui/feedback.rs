use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Result of feedback input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackResult {
    /// User submitted the feedback text
    Submit(String),
    /// User closed the form
    Cancel,
}

/// Free-text feedback form shown over the list view
#[derive(Debug, Default)]
pub struct FeedbackForm {
    text: String,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> Option<FeedbackResult> {
        match key.code {
            KeyCode::Enter => {
                if self.text.trim().is_empty() {
                    None
                } else {
                    Some(FeedbackResult::Submit(std::mem::take(&mut self.text)))
                }
            }
            KeyCode::Esc => Some(FeedbackResult::Cancel),
            KeyCode::Char(c) => {
                self.text.push(c);
                None
            }
            KeyCode::Backspace => {
                self.text.pop();
                None
            }
            _ => None,
        }
    }

    /// Render the feedback overlay
    pub fn render(&self, frame: &mut Frame) {
        let area = super::centered_rect(60, 40, frame.area());

        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Feedback Form ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let body = if self.text().is_empty() {
            Paragraph::new("Your feedback...").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.text()).style(Style::default().fg(Color::White))
        };
        frame.render_widget(body.wrap(Wrap { trim: false }), chunks[0]);

        let help = Paragraph::new("Enter: Submit Feedback | Esc: Close")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[1]);
    }
}
