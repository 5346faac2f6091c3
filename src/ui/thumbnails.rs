//! Asynchronous thumbnail fetching and caching.

use image::{imageops::FilterType, DynamicImage};
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::mpsc;
use std::time::Duration;

use crate::config::{ImageProtocol, PreviewConfig};
use crate::model::ImageRecord;

/// Refuse image bodies larger than this
const MAX_IMAGE_BYTES: u64 = 32 * 1024 * 1024;

/// A finished fetch: generation it was started in, record id, image.
type FetchResult = (u64, String, Option<DynamicImage>);

/// Where a record's thumbnail currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailStatus {
    Ready,
    Loading,
    Failed,
    /// No graphics protocol available
    Unavailable,
}

/// Thumbnails keyed by record id, fetched on worker threads.
pub struct ThumbnailCache {
    /// Image picker for protocol detection
    picker: Option<Picker>,
    pixel_size: u32,
    cache: HashMap<String, StatefulProtocol>,
    loading: HashSet<String>,
    /// Ids whose fetch failed; not retried until the cache is cleared
    failed: HashSet<String>,
    /// Bumped by `clear`; fetches tagged with an older value are dropped
    generation: u64,
    receiver: mpsc::Receiver<FetchResult>,
    sender: mpsc::Sender<FetchResult>,
    agent: ureq::Agent,
}

impl ThumbnailCache {
    /// Must be called after the terminal entered raw mode so the protocol
    /// query can be answered.
    pub fn new(config: &PreviewConfig) -> Self {
        let picker = if config.thumbnails_enabled() {
            create_picker(config.protocol)
        } else {
            None
        };
        Self::with_picker(picker, config.thumbnail_size)
    }

    /// A cache that never fetches anything.
    pub fn disabled() -> Self {
        Self::with_picker(None, 0)
    }

    fn with_picker(picker: Option<Picker>, pixel_size: u32) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            picker,
            pixel_size,
            cache: HashMap::new(),
            loading: HashSet::new(),
            failed: HashSet::new(),
            generation: 0,
            receiver: rx,
            sender: tx,
            agent: ureq::AgentBuilder::new().timeout(Duration::from_secs(20)).build(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.picker.is_some()
    }

    /// Poll for completed async thumbnail loads
    pub fn poll_async_loads(&mut self) {
        while let Ok((generation, id, image)) = self.receiver.try_recv() {
            if generation != self.generation {
                tracing::debug!(%id, "Dropping thumbnail fetched before the cache was cleared");
                continue;
            }
            self.loading.remove(&id);
            match (image, self.picker.as_mut()) {
                (Some(image), Some(picker)) => {
                    let protocol = picker.new_resize_protocol(image);
                    self.cache.insert(id, protocol);
                }
                _ => {
                    self.failed.insert(id);
                }
            }
        }
    }

    /// Status of `record`'s thumbnail, starting a fetch when needed.
    pub fn request(&mut self, record: &ImageRecord) -> ThumbnailStatus {
        if self.picker.is_none() {
            return ThumbnailStatus::Unavailable;
        }
        if self.cache.contains_key(&record.id) {
            return ThumbnailStatus::Ready;
        }
        if self.failed.contains(&record.id) {
            return ThumbnailStatus::Failed;
        }

        if self.loading.insert(record.id.clone()) {
            let id = record.id.clone();
            let url = record.url.clone();
            let sender = self.sender.clone();
            let agent = self.agent.clone();
            let size = self.pixel_size;
            let generation = self.generation;

            std::thread::spawn(move || {
                let image = match fetch_image(&agent, &url) {
                    Ok(img) => Some(img.resize(size, size, FilterType::Triangle)),
                    Err(e) => {
                        tracing::debug!(%url, error = %e, "Thumbnail fetch failed");
                        None
                    }
                };
                let _ = sender.send((generation, id, image));
            });
        }

        ThumbnailStatus::Loading
    }

    /// Encoded thumbnail for `id`, if it has arrived.
    pub fn protocol_mut(&mut self, id: &str) -> Option<&mut StatefulProtocol> {
        self.cache.get_mut(id)
    }

    /// Forget everything, e.g. when the record set is replaced.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.loading.clear();
        self.failed.clear();
        self.generation += 1;
    }
}

fn create_picker(protocol: ImageProtocol) -> Option<Picker> {
    if protocol == ImageProtocol::None {
        return None;
    }

    let mut picker = match Picker::from_query_stdio() {
        Ok(picker) => picker,
        Err(e) => {
            tracing::warn!("Terminal graphics unavailable: {}", e);
            return None;
        }
    };

    match protocol {
        ImageProtocol::None | ImageProtocol::Auto => {}
        ImageProtocol::Sixel => picker.set_protocol_type(ProtocolType::Sixel),
        ImageProtocol::Kitty => picker.set_protocol_type(ProtocolType::Kitty),
        ImageProtocol::ITerm2 => picker.set_protocol_type(ProtocolType::Iterm2),
        ImageProtocol::Halfblocks => picker.set_protocol_type(ProtocolType::Halfblocks),
    }

    Some(picker)
}

fn fetch_image(agent: &ureq::Agent, url: &str) -> anyhow::Result<DynamicImage> {
    let response = agent.get(url).call()?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_IMAGE_BYTES)
        .read_to_end(&mut bytes)?;
    Ok(image::load_from_memory(&bytes)?)
}
