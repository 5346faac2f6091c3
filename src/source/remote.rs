//! Record list fetched from a remote JSON endpoint.
//!
//! The endpoint must answer a GET with a JSON array of objects. Field names
//! follow the picsum.photos `/v2/list` shape, with a few common aliases:
//!
//! | record field  | accepted JSON fields                         |
//! |---------------|----------------------------------------------|
//! | `id`          | `id` (number or string)                      |
//! | `author`      | `author`, `name`                             |
//! | `url`         | `download_url`, then `url`                   |
//! | `uploaded_at` | `uploaded_at`, `uploadedAt`, `created_at`    |
//! | `size`        | `size` (bytes, or a string like `"1.5 KB"`)  |

use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use super::{ImageSource, LoadError};
use crate::model::{parse_size, parse_timestamp, ImageRecord};

/// Picsum's image list endpoint
pub const DEFAULT_ENDPOINT: &str = "https://picsum.photos/v2/list";

pub struct RemoteSource {
    endpoint: String,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteSize {
    Bytes(u64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RemoteImage {
    id: RemoteId,
    #[serde(default, alias = "name")]
    author: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, alias = "uploadedAt", alias = "created_at")]
    uploaded_at: Option<String>,
    #[serde(default)]
    size: Option<RemoteSize>,
}

impl RemoteSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            endpoint: endpoint.to_string(),
            agent,
        }
    }
}

impl ImageSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn load(&self) -> Result<Vec<ImageRecord>, LoadError> {
        tracing::info!(endpoint = %self.endpoint, "Fetching image list");

        let response = self.agent.get(&self.endpoint).call().map_err(|e| LoadError::Request {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })?;

        let body = response.into_string().map_err(|e| LoadError::Request {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })?;

        parse_list(&body).map_err(|e| LoadError::Decode {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })
    }
}

/// Map a JSON list body into records. Entries without any image url are
/// skipped; repeated ids keep their first occurrence.
pub fn parse_list(body: &str) -> Result<Vec<ImageRecord>, serde_json::Error> {
    let images: Vec<RemoteImage> = serde_json::from_str(body)?;
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(images.len());

    for image in images {
        let id = match image.id {
            RemoteId::Number(n) => n.to_string(),
            RemoteId::Text(s) => s,
        };

        let Some(url) = image.download_url.or(image.url) else {
            tracing::warn!(%id, "Skipping image without a url");
            continue;
        };

        if !seen.insert(id.clone()) {
            tracing::warn!(%id, "Dropping image with duplicate id");
            continue;
        }

        let uploaded_at = image.uploaded_at.as_deref().and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                tracing::debug!(%id, raw, "Unparsable upload date");
            }
            parsed
        });

        let size = match image.size {
            Some(RemoteSize::Bytes(n)) => Some(n),
            Some(RemoteSize::Float(f)) if f.is_finite() && f >= 0.0 => Some(f.round() as u64),
            Some(RemoteSize::Float(_)) => None,
            Some(RemoteSize::Text(text)) => parse_size(&text),
            None => None,
        };

        let author = image.author.unwrap_or_else(|| format!("Image {id}"));
        records.push(ImageRecord {
            id,
            author,
            url,
            uploaded_at,
            size,
        });
    }

    Ok(records)
}
