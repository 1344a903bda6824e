use crate::app::App;
use crate::detail::DetailState;
use crate::models::MovieRecord;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: content(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    match app.detail.state() {
        DetailState::Loaded(movie) => render_movie(app, movie, frame, chunks[0]),
        DetailState::Failed(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(detail_block(" Movie Detail "));
            frame.render_widget(error, chunks[0]);
        }
        DetailState::Loading | DetailState::Idle => {
            let text = if app.detail.is_loading() { "Loading..." } else { "" };
            let loading = Paragraph::new(text)
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .block(detail_block(" Movie Detail "));
            frame.render_widget(loading, chunks[0]);
        }
    }

    // ── Status bar ──
    let status_line = Line::from(vec![
        Span::styled(
            " ↑↓/PgUp/PgDn",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Scroll  "),
        Span::styled(
            "Esc",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Back  "),
        Span::styled(
            app.detail.id().unwrap_or_default().to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[1]);
}

fn detail_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
}

fn field<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn render_movie(app: &App, movie: &MovieRecord, frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", movie.title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Poster: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                movie.poster.as_str(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::from(""),
        Line::from(format!(" {}", movie.plot)),
        Line::from(""),
        field("Year", &movie.year),
        field("Director", &movie.director),
        field("Actors", &movie.actors),
        field("Rating", &movie.imdb_rating),
        field("Genre", &movie.genre),
        field("Runtime", &movie.runtime),
        Line::from(""),
        Line::from(Span::styled(
            " Reviews",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    if app.detail.reviews().is_empty() {
        lines.push(Line::from(" No reviews available."));
    }
    for review in app.detail.reviews() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}  ", review.author),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(review.content, Style::default().fg(Color::Gray)),
        ]));
    }

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0))
        .block(
            detail_block(" Movie Detail ").title_bottom(
                Line::from(format!(" scroll: {} ", app.detail_scroll)).alignment(Alignment::Right),
            ),
        );
    frame.render_widget(content, area);
}
