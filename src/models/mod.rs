use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A stored upload as seen by the listing page. Built transiently from a
/// directory scan on each request; the filesystem itself is the store.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
}
