use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<10}", keys), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = super::centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("Global"),
        binding("?", "Toggle this help"),
        binding("q", "Quit application"),
        binding("Ctrl+C", "Quit from anywhere"),
        Line::from(""),
        section("List View"),
        binding("↑/k ↓/j", "Move within the page"),
        binding("←/h →/l", "Previous / next page"),
        binding("1-9", "Jump to page"),
        binding("/", "Edit search term (Enter submits, empty restores)"),
        binding("Enter", "Open movie detail"),
        binding("f", "Open feedback form"),
        Line::from(""),
        section("Detail View"),
        binding("↑/↓", "Scroll content"),
        binding("PgUp/PgDn", "Scroll page up/down"),
        binding("Esc", "Back to results"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
