mod list;
mod detail;
mod help;
pub mod feedback;

use crate::app::{App, View};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    match app.view {
        View::List => list::render(app, frame),
        View::Detail => detail::render(app, frame),
    }

    if let Some(form) = &app.feedback {
        form.render(frame);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
