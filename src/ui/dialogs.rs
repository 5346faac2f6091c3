use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub fn render_help(frame: &mut Frame, area: Rect) {
    // Center the help dialog
    let dialog_width = 52.min(area.width.saturating_sub(4));
    let dialog_height = 24.min(area.height.saturating_sub(4));

    let x = (area.width - dialog_width) / 2;
    let y = (area.height - dialog_height) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let heading = Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan);
    let help_text = vec![
        Line::from(Span::styled("View", heading)),
        Line::from(""),
        Line::from("  v          Toggle grid / list"),
        Line::from("  g / l      Grid / list"),
        Line::from("  s          Cycle sort (none/date/size)"),
        Line::from("  /          Edit search"),
        Line::from("  Ctrl+U     Clear search"),
        Line::from(""),
        Line::from(Span::styled("Pages", heading)),
        Line::from(""),
        Line::from("  n / → / PgDn   Next page"),
        Line::from("  p / ← / PgUp   Previous page"),
        Line::from("  Home / End     First / last page"),
        Line::from("  1-9            Go to page"),
        Line::from("  Click          Go to page"),
        Line::from(""),
        Line::from(Span::styled("Other", heading)),
        Line::from(""),
        Line::from("  r          Reload images"),
        Line::from("  ?          Show this help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(Color::DarkGray))),
    ];

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help "),
    );

    frame.render_widget(paragraph, dialog_area);
}
