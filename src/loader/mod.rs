//! Dataset Loading
//!
//! The dataset is fetched exactly once per session, from either a local
//! file or an HTTP(S) URL, and parsed into normalized records:
//! - File (`data/pdsi.csv`)
//! - HTTP (`https://example.org/pdsi.csv`)
//!
//! There are no retries and no timeouts. Any failure here is fatal for the
//! chart and is returned to the caller as a [`LoadError`].

mod csv_reader;
mod file;
mod http;

pub use csv_reader::parse_dataset;
pub use file::FileSource;
pub use http::HttpSource;

use crate::model::{NormalizeError, Normalized};
use async_trait::async_trait;
use std::path::PathBuf;

/// Somewhere a dataset can be read from
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Human-readable location, used in logs
    fn describe(&self) -> String;

    /// Fetch the raw dataset text
    async fn fetch(&self) -> Result<String, LoadError>;
}

/// Pick a source for a path or URL
pub fn source_for(location: &str) -> Box<dyn DatasetSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// Fetch and normalize a dataset
pub async fn load_dataset(source: &dyn DatasetSource) -> Result<Normalized, LoadError> {
    tracing::info!("Loading dataset from {}", source.describe());

    let text = source.fetch().await?;
    let normalized = parse_dataset(&text)?;

    if normalized.records.is_empty() {
        return Err(LoadError::Empty(source.describe()));
    }

    if normalized.malformed_fields > 0 {
        tracing::warn!(
            "{} row or category fields could not be parsed and are treated as missing",
            normalized.malformed_fields
        );
    }
    tracing::info!("Loaded {} records", normalized.records.len());

    Ok(normalized)
}

/// Errors that can occur while loading the dataset
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed dataset: {0}")]
    Malformed(#[from] NormalizeError),

    #[error("Dataset {0} contains no records")]
    Empty(String),
}
