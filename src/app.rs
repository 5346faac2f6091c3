use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::gallery::{GalleryEvent, GalleryPage, Pipeline, ViewMode, ViewState};
use crate::model::ImageRecord;
use crate::source::{self, ImageSource};
use crate::tasks::{BackgroundTaskManager, LoadOutcome, TaskCompletionInfo, TaskId};
use crate::ui;
use crate::ui::gallery::{hit_test, page_buttons};
use crate::ui::thumbnails::ThumbnailCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Searching,
    Help,
}

/// Whether the record set has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
}

pub struct App {
    pub config: Config,
    pub mode: AppMode,
    pub phase: LoadPhase,
    pub view: ViewState,
    /// Written once per mount, read-only afterwards
    pub records: Arc<[ImageRecord]>,
    pub pipeline: Pipeline,
    pub task_manager: BackgroundTaskManager,
    /// The load whose result the gallery is waiting for
    pub current_load: Option<TaskId>,
    pub thumbnails: ThumbnailCache,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Config, thumbnails: ThumbnailCache) -> Self {
        let view = initial_view(&config);
        let pipeline = Pipeline::new(config.gallery.date_format.clone());
        Self {
            config,
            mode: AppMode::Normal,
            phase: LoadPhase::Loading,
            view,
            records: Arc::from(Vec::new()),
            pipeline,
            task_manager: BackgroundTaskManager::new(),
            current_load: None,
            thumbnails,
            should_quit: false,
            status_message: None,
        }
    }

    /// Start loading from the configured source.
    pub fn mount(&mut self) {
        let source = source::from_config(&self.config.source);
        self.mount_with(source);
    }

    /// Start loading from `source`, dropping whatever was shown before.
    pub fn mount_with(&mut self, source: Box<dyn ImageSource>) {
        if let Some(id) = self.current_load.take() {
            self.task_manager.cancel_task(id);
        }

        self.records = Arc::from(Vec::new());
        self.view = initial_view(&self.config);
        self.phase = LoadPhase::Loading;
        self.thumbnails.clear();

        tracing::info!(source = source.name(), "Loading images");
        self.current_load = Some(self.task_manager.spawn_load(source));
    }

    /// Cancel outstanding work before the view goes away.
    pub fn teardown(&mut self) {
        self.current_load = None;
        self.task_manager.cancel_all();
    }

    /// Apply finished loads. Results of superseded loads are ignored.
    pub fn poll_tasks(&mut self) {
        for completion in self.task_manager.poll_updates() {
            self.apply_completion(completion);
        }
    }

    fn apply_completion(&mut self, completion: TaskCompletionInfo) {
        if self.current_load != Some(completion.id) {
            tracing::debug!(task = completion.id.0, "Ignoring result of a superseded load");
            return;
        }
        self.current_load = None;

        match completion.outcome {
            LoadOutcome::Loaded(records) => {
                tracing::info!(
                    source = completion.source,
                    count = records.len(),
                    elapsed_ms = completion.elapsed.as_millis() as u64,
                    "Images loaded"
                );
                self.records = Arc::from(records);
            }
            LoadOutcome::Failed(e) => {
                tracing::error!(source = completion.source, "Failed to load images: {}", e);
                self.records = Arc::from(Vec::new());
            }
            LoadOutcome::Cancelled => {
                tracing::warn!(source = completion.source, "Load ended without a result");
                self.records = Arc::from(Vec::new());
            }
        }
        self.phase = LoadPhase::Ready;
    }

    /// Feed a user request through the reducer.
    pub fn dispatch(&mut self, event: GalleryEvent) {
        let page_count = self.pipeline.page_count(&self.records, &self.view);
        self.view = self.view.reduce(&event, page_count);
    }

    pub fn current_page(&mut self) -> GalleryPage {
        self.pipeline.derive(&self.records, &self.view)
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            self.poll_tasks();

            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key)?,
                    Event::Mouse(mouse) => {
                        let size = terminal.size()?;
                        let area = Rect::new(0, 0, size.width, size.height);
                        self.handle_mouse(mouse, area)?;
                    }
                    _ => {}
                }
            }
        }

        self.teardown();
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Any key clears a stale status message
        self.status_message = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        match self.mode {
            AppMode::Help => {
                self.mode = AppMode::Normal;
            }
            AppMode::Searching => self.handle_search_key(key),
            AppMode::Normal => self.handle_normal_key(key),
        }

        Ok(())
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Char('/') => self.mode = AppMode::Searching,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(GalleryEvent::ClearSearch)
            }

            KeyCode::Char('v') => self.dispatch(GalleryEvent::ToggleView),
            KeyCode::Char('g') => self.dispatch(GalleryEvent::SetView(ViewMode::Grid)),
            KeyCode::Char('l') => self.dispatch(GalleryEvent::SetView(ViewMode::List)),
            KeyCode::Char('s') => self.dispatch(GalleryEvent::CycleSort),

            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => self.dispatch(GalleryEvent::NextPage),
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => self.dispatch(GalleryEvent::PrevPage),
            KeyCode::Home => self.dispatch(GalleryEvent::FirstPage),
            KeyCode::End => self.dispatch(GalleryEvent::LastPage),
            KeyCode::Char(c @ '1'..='9') => {
                let page = c.to_digit(10).unwrap_or(1) as usize;
                self.select_page(page);
            }

            KeyCode::Char('r') => {
                self.status_message = Some("Reloading images...".to_string());
                self.mount();
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.mode = AppMode::Normal,
            KeyCode::Backspace => self.dispatch(GalleryEvent::PopSearchChar),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(GalleryEvent::ClearSearch)
            }
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.dispatch(GalleryEvent::PushSearchChar(c))
            }
            _ => {}
        }
    }

    fn select_page(&mut self, page: usize) {
        self.dispatch(GalleryEvent::SelectPage(page));
        if self.view.page != page {
            self.status_message = Some(format!("No page {}", page));
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect) -> Result<()> {
        if self.mode != AppMode::Normal {
            return Ok(());
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let regions = ui::layout(area);
                let page = self.current_page().page;
                let buttons = page_buttons(regions.pages, page.count, page.number);
                if let Some(target) = hit_test(&buttons, mouse.column, mouse.row) {
                    self.select_page(target);
                }
            }
            MouseEventKind::ScrollDown => self.dispatch(GalleryEvent::NextPage),
            MouseEventKind::ScrollUp => self.dispatch(GalleryEvent::PrevPage),
            _ => {}
        }

        Ok(())
    }
}

fn initial_view(config: &Config) -> ViewState {
    ViewState::new(config.gallery.view, config.gallery.sort, config.gallery.page_size)
}
