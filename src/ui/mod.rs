mod dialogs;
pub mod gallery;
mod status_bar;
pub mod thumbnails;

use ratatui::prelude::*;

use crate::app::{App, AppMode};
use gallery::GalleryFrame;

/// Screen regions, shared by rendering and mouse handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub content: Rect,
    pub pages: Rect,
    pub status: Rect,
}

pub fn layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title + search box
            Constraint::Min(0),    // Grid or list
            Constraint::Length(1), // Page buttons
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    ScreenLayout {
        header: chunks[0],
        content: chunks[1],
        pages: chunks[2],
        status: chunks[3],
    }
}

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let regions = layout(area);

    let page = app.current_page();
    let gallery = GalleryFrame {
        page: &page,
        view: &app.view,
        mode: app.mode,
        phase: app.phase,
        date_format: &app.config.gallery.date_format,
    };

    gallery::render_header(frame, &gallery, regions.header);
    gallery::render_content(frame, &gallery, &mut app.thumbnails, regions.content);
    gallery::render_page_controls(frame, &gallery, regions.pages);

    status_bar::render(frame, app, regions.status);

    // Render help overlay if in help mode
    if app.mode == AppMode::Help {
        dialogs::render_help(frame, area);
    }
}
