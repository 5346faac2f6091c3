//! Gallery view: header with search, the current page as a grid or list,
//! and the page selector.

use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use ratatui_image::StatefulImage;

use super::thumbnails::{ThumbnailCache, ThumbnailStatus};
use crate::app::{AppMode, LoadPhase};
use crate::gallery::{GalleryPage, ViewMode, ViewState};
use crate::model::ImageRecord;

/// Gap between page buttons, in columns
const BUTTON_GAP: u16 = 1;

/// Everything the gallery needs to draw one frame.
pub struct GalleryFrame<'a> {
    pub page: &'a GalleryPage,
    pub view: &'a ViewState,
    pub mode: AppMode,
    pub phase: LoadPhase,
    pub date_format: &'a str,
}

/// A clickable page selector button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub page: usize,
    pub area: Rect,
    pub active: bool,
}

fn button_label(page: usize) -> String {
    format!(" {} ", page)
}

fn button_width(page: usize) -> u16 {
    button_label(page).len() as u16
}

/// Lay out one button per page left to right inside `area`. When they do
/// not all fit, show the widest window around `current` that does.
pub fn page_buttons(area: Rect, page_count: usize, current: usize) -> Vec<PageButton> {
    if area.width == 0 || area.height == 0 || page_count == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, page_count);
    let fits = |first: usize, last: usize| -> bool {
        let total: u32 = (first..=last)
            .map(|p| u32::from(button_width(p) + BUTTON_GAP))
            .sum();
        total.saturating_sub(u32::from(BUTTON_GAP)) <= u32::from(area.width)
    };

    let (mut first, mut last) = (current, current);
    if !fits(first, last) {
        return Vec::new();
    }
    // Grow alternately to the right and left while there is room
    loop {
        let mut grew = false;
        if last < page_count && fits(first, last + 1) {
            last += 1;
            grew = true;
        }
        if first > 1 && fits(first - 1, last) {
            first -= 1;
            grew = true;
        }
        if !grew {
            break;
        }
    }

    let mut x = area.x;
    (first..=last)
        .map(|page| {
            let width = button_width(page);
            let button = PageButton {
                page,
                area: Rect::new(x, area.y, width, 1),
                active: page == current,
            };
            x += width + BUTTON_GAP;
            button
        })
        .collect()
}

/// The page button under a terminal cell, if any.
pub fn hit_test(buttons: &[PageButton], column: u16, row: u16) -> Option<usize> {
    buttons
        .iter()
        .find(|b| b.area.contains(Position::new(column, row)))
        .map(|b| b.page)
}

pub fn render_header(frame: &mut Frame, gallery: &GalleryFrame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            " Image Gallery ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "| View: {} | Sort by: {} | {} matching",
            gallery.view.view.label(),
            gallery.view.sort.label(),
            gallery.page.total
        )),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let editing = gallery.mode == AppMode::Searching;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let search_line = if gallery.view.search.is_empty() && !editing {
        Line::from(Span::styled("Press / to search", Style::default().fg(Color::DarkGray)))
    } else {
        let mut spans = vec![Span::raw(gallery.view.search.clone())];
        if editing {
            spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
        }
        Line::from(spans)
    };

    let search = Paragraph::new(search_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Search "),
    );
    frame.render_widget(search, chunks[1]);
}

pub fn render_content(frame: &mut Frame, gallery: &GalleryFrame<'_>, thumbnails: &mut ThumbnailCache, area: Rect) {
    // Poll for completed thumbnail loads once per frame (not per cell)
    thumbnails.poll_async_loads();

    if gallery.phase == LoadPhase::Loading {
        render_centered(frame, "Loading images...", area);
        return;
    }

    if gallery.page.records.is_empty() {
        let message = if gallery.view.search.is_empty() {
            "No images"
        } else {
            "No images match the search"
        };
        render_centered(frame, message, area);
        return;
    }

    match gallery.view.view {
        ViewMode::Grid => render_grid(frame, gallery, thumbnails, area),
        ViewMode::List => render_list(frame, gallery, thumbnails, area),
    }
}

/// Number of grid columns for a page of `page_size` records.
pub fn grid_columns(page_size: usize) -> usize {
    let mut columns = 1;
    while columns * columns < page_size {
        columns += 1;
    }
    columns
}

fn render_grid(frame: &mut Frame, gallery: &GalleryFrame<'_>, thumbnails: &mut ThumbnailCache, area: Rect) {
    let columns = grid_columns(gallery.view.page_size);
    let rows = gallery.view.page_size.div_ceil(columns).max(1);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row_idx, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (col_idx, cell_area) in cells.iter().enumerate() {
            if let Some(record) = gallery.page.records.get(row_idx * columns + col_idx) {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray));
                let inner = block.inner(*cell_area);
                frame.render_widget(block, *cell_area);
                render_thumbnail(frame, thumbnails, record, inner);
            }
        }
    }
}

fn render_list(frame: &mut Frame, gallery: &GalleryFrame<'_>, thumbnails: &mut ThumbnailCache, area: Rect) {
    let rows = gallery.view.page_size.max(1);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (record, row_area) in gallery.page.records.iter().zip(row_areas.iter()) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(*row_area);
        frame.render_widget(block, *row_area);

        // Terminal cells are about twice as tall as wide
        let thumb_width = (inner.height * 2).min(inner.width / 3);
        let parts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(thumb_width), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        render_thumbnail(frame, thumbnails, record, parts[0]);

        let details = vec![
            Line::from(Span::styled(
                record.author.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Uploaded: {}", record.formatted_date(gallery.date_format))),
            Line::from(format!("Size: {}", record.formatted_size())),
        ];
        frame.render_widget(Paragraph::new(details), parts[2]);
    }
}

fn render_thumbnail(frame: &mut Frame, thumbnails: &mut ThumbnailCache, record: &ImageRecord, area: Rect) {
    // Skip if area too small
    if area.width < 2 || area.height < 1 {
        return;
    }

    let text = match thumbnails.request(record) {
        ThumbnailStatus::Ready => {
            if let Some(protocol) = thumbnails.protocol_mut(&record.id) {
                frame.render_stateful_widget(StatefulImage::new(None), area, protocol);
            }
            return;
        }
        ThumbnailStatus::Loading => "Loading...",
        ThumbnailStatus::Failed => "[x]",
        ThumbnailStatus::Unavailable => "[ ]",
    };

    render_centered(frame, text, area);
}

fn render_centered(frame: &mut Frame, text: &str, area: Rect) {
    if area.height == 0 {
        return;
    }
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    let centered = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    frame.render_widget(paragraph, centered);
}

pub fn render_page_controls(frame: &mut Frame, gallery: &GalleryFrame<'_>, area: Rect) {
    let page = &gallery.page.page;
    for button in page_buttons(area, page.count, page.number) {
        let style = if button.active {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };
        frame.render_widget(Paragraph::new(button_label(button.page)).style(style), button.area);
    }
}
