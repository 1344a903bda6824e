use crate::app::{App, InputMode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + search(3) + results(min) + pages(3) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header_text = format!(
        " Movie Finder   [{} results]",
        app.search.results().len()
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    // ── Search bar ──
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " Search for movies (Enter to search, Esc to cancel): "
    } else {
        " Search for movies (/): "
    };
    let search_text = format!("{}{}", search_label, app.search_input);
    let search_bar = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search "),
        );
    frame.render_widget(search_bar, chunks[1]);

    // Set cursor position when editing
    if app.input_mode == InputMode::Editing {
        let cursor_x = chunks[1].x + 1 + search_label.width() as u16 + app.search_input.width() as u16;
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    // ── Results ──
    // Loading and error each replace the whole content area.
    let results_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Movies ");

    if app.search.is_loading() {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(results_block);
        frame.render_widget(loading, chunks[2]);
    } else if let Some(error) = app.search.error() {
        let error = Paragraph::new(error)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(results_block);
        frame.render_widget(error, chunks[2]);
    } else {
        let page = app.search.current_page();
        if page.items.is_empty() {
            let empty = Paragraph::new("No movies found.")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .block(results_block);
            frame.render_widget(empty, chunks[2]);
        } else {
            let width = (area.width as usize).saturating_sub(8);
            let items: Vec<ListItem> = page
                .items
                .iter()
                .map(|movie| {
                    let title_line = Line::from(vec![
                        Span::styled(
                            truncate_str(&movie.title, width.saturating_sub(30)),
                            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(format!(" ({})", movie.year), Style::default().fg(Color::Gray)),
                        Span::styled("  Runtime: ", Style::default().fg(Color::DarkGray)),
                        Span::styled(movie.runtime_label().to_string(), Style::default().fg(Color::Yellow)),
                    ]);
                    let plot_line = Line::from(Span::styled(
                        format!("  {}", truncate_str(movie.plot_label(), width)),
                        Style::default().fg(Color::DarkGray),
                    ));
                    ListItem::new(vec![title_line, plot_line])
                })
                .collect();

            let list_widget = List::new(items)
                .block(results_block.title_bottom(
                    Line::from(format!(" page {} of {} ", page.page_number, page.total_pages))
                        .alignment(Alignment::Right),
                ))
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▸ ");

            let mut list_state = ListState::default();
            list_state.select(Some(app.list_selected));
            frame.render_stateful_widget(list_widget, chunks[2], &mut list_state);
        }
    }

    // ── Page strip ──
    let page_strip = Paragraph::new(page_strip(app.search.page(), app.search.total_pages()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(page_strip, chunks[3]);

    // ── Status bar ──
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ↑↓", key_style),
        Span::raw(" Navigate  "),
        Span::styled("←→", key_style),
        Span::raw(" Page  "),
        Span::styled("/", key_style),
        Span::raw(" Search  "),
        Span::styled("Enter", key_style),
        Span::raw(" Detail  "),
        Span::styled("f", key_style),
        Span::raw(" Feedback  "),
        Span::styled("?", key_style),
        Span::raw(" Help  "),
        Span::styled("q", key_style),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    let status_bar = Paragraph::new(status_line);
    frame.render_widget(status_bar, chunks[4]);
}

/// `Prev 1 [2] 3 Next`, with Prev/Next dimmed at the ends.
fn page_strip(current: u32, total: u32) -> Line<'static> {
    let enabled = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        "◀ Prev ",
        if current <= 1 { disabled } else { enabled },
    )];
    for page in 1..=total {
        if page == current {
            spans.push(Span::styled(
                format!(" {} ", page),
                Style::default().bg(Color::Red).fg(Color::White),
            ));
        } else {
            spans.push(Span::styled(format!(" {} ", page), Style::default().fg(Color::Gray)));
        }
    }
    spans.push(Span::styled(
        " Next ▶",
        if current >= total { disabled } else { enabled },
    ));
    Line::from(spans)
}

/// Truncate a string to `max_width` columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_short_input_untouched() {
        assert_eq!(truncate_str("Alien", 10), "Alien");
    }

    #[test]
    fn test_truncate_str_adds_ellipsis() {
        assert_eq!(truncate_str("The Lord of the Rings", 8), "The Lor…");
    }

    #[test]
    fn test_truncate_str_counts_wide_chars() {
        // Each of these occupies two columns.
        assert_eq!(truncate_str("千と千尋の神隠し", 7), "千と千…");
    }

    #[test]
    fn test_page_strip_lists_every_page() {
        let line = page_strip(2, 3);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "◀ Prev  1  2  3  Next ▶");
    }

    #[test]
    fn test_page_strip_without_results() {
        let line = page_strip(1, 0);
        assert_eq!(line.spans.len(), 2);
    }
}
