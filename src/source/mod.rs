//! Sources of image records.
//!
//! A source produces the whole record set in one call. Loading happens on
//! a background task (see [`crate::tasks`]); the sources themselves are
//! plain blocking code.

pub mod remote;
pub mod synthetic;

use thiserror::Error;

use crate::config::{SourceConfig, SourceKind};
use crate::model::ImageRecord;

pub use remote::RemoteSource;
pub use synthetic::SyntheticSource;

/// Failure to obtain the record set.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Transport failure or non-success HTTP status
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },
    /// The response body was not a list of image objects
    #[error("malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Something that can produce the gallery's records.
pub trait ImageSource: Send + Sync {
    /// Short name for logs and the status bar
    fn name(&self) -> &'static str;

    fn load(&self) -> Result<Vec<ImageRecord>, LoadError>;
}

/// Build the source described by the configuration.
pub fn from_config(config: &SourceConfig) -> Box<dyn ImageSource> {
    match config.kind {
        SourceKind::Synthetic => {
            let mut source = SyntheticSource::new(config.count);
            if let Some(seed) = config.seed {
                source = source.with_seed(seed);
            }
            Box::new(source)
        }
        SourceKind::Remote => Box::new(RemoteSource::new(
            &config.endpoint,
            std::time::Duration::from_secs(config.timeout_secs),
        )),
    }
}
