use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::{App, AppMode, LoadPhase};

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    // If there's a status message, show it prominently
    if let Some(ref message) = app.status_message {
        let line = Line::from(vec![Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        )]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let page = app.current_page();

    let phase = match app.phase {
        LoadPhase::Loading => " Loading... ",
        LoadPhase::Ready => " Ready ",
    };

    // Build running task indicators
    let running_tasks = app.task_manager.running_tasks();
    let task_indicators: Vec<String> = running_tasks
        .iter()
        .map(|task| format!("[{}:{}s]", task.source, task.elapsed().as_secs()))
        .collect();

    let mut spans = vec![
        Span::styled(phase, Style::default().fg(Color::White).bg(Color::DarkGray)),
        Span::styled(
            format!(" {} images, page {}/{} ", app.records.len(), page.page.number, page.page.count),
            Style::default().fg(Color::Gray),
        ),
    ];

    if !task_indicators.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", task_indicators.join(" ")),
            Style::default().fg(Color::Cyan),
        ));
    }

    let help_text = match app.mode {
        AppMode::Searching => " Enter/Esc:done Ctrl+U:clear ",
        _ => " v:view s:sort /:search n/p:page r:reload ?:help q:quit ",
    };

    // Calculate remaining space and add spacing
    let content_len: usize = spans.iter().map(|s| s.content.len()).sum();
    let available = area.width as usize;
    if available > content_len + help_text.len() {
        spans.push(Span::raw(" ".repeat(available - content_len - help_text.len())));
    }

    // Right: help hints
    spans.push(Span::styled(
        help_text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
