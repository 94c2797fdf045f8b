use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::models::UploadedImage;

/// Extensions eligible for display in the listing view. Uploads carrying any
/// other extension are stored but never listed.
pub const VALID_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "png", "bmp"];

/// Flat-directory image store. Every upload lands directly in `image_dir`
/// and listing is a rescan of the same directory.
pub struct ImageStore {
    image_dir: PathBuf,
    max_upload_size: u64,
}

impl ImageStore {
    pub fn new(image_dir: impl Into<PathBuf>, max_upload_size: u64) -> Self {
        Self {
            image_dir: image_dir.into(),
            max_upload_size,
        }
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.image_dir.join(filename)
    }

    /// Streams `reader` into `filename`, copying at most `max_upload_size`
    /// bytes in bounded chunks, and returns the number of bytes written.
    /// A longer source is truncated at the cap; callers treat
    /// `written == max_upload_size` as oversized.
    pub async fn save_capped<R>(&self, filename: &str, mut reader: R) -> Result<u64>
    where
        R: AsyncRead + Unpin,
    {
        let dest = self.path_for(filename);
        let mut file = fs::File::create(&dest)
            .await
            .context("Could not open file for writing")?;

        let mut written: u64 = 0;
        let mut buffer = [0u8; 8192];

        while written < self.max_upload_size {
            let n = reader
                .read(&mut buffer)
                .await
                .context("Could not read input stream")?;
            if n == 0 {
                break;
            }

            let remaining = usize::try_from(self.max_upload_size - written).unwrap_or(usize::MAX);
            let take = n.min(remaining);
            file.write_all(&buffer[..take])
                .await
                .context("Could not write to file")?;
            written += take as u64;
        }

        file.flush().await.context("Could not flush file")?;
        Ok(written)
    }

    /// Removes a stored upload.
    pub async fn remove(&self, filename: &str) -> Result<()> {
        fs::remove_file(self.path_for(filename))
            .await
            .with_context(|| format!("Could not delete {filename}"))?;
        Ok(())
    }

    /// Scans the image directory and returns every whitelisted image with its
    /// modification time, most recent first. A missing or unreadable
    /// directory is an error, not an empty listing.
    pub async fn list_images(&self) -> Result<Vec<UploadedImage>> {
        let mut entries = fs::read_dir(&self.image_dir)
            .await
            .context("Cannot find image directory")?;

        let mut images = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Could not read image directory")?
        {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !has_valid_extension(&filename) {
                continue;
            }

            let metadata = entry
                .metadata()
                .await
                .with_context(|| format!("Could not stat {filename}"))?;
            let modified = metadata
                .modified()
                .with_context(|| format!("No modification time for {filename}"))?;

            images.push(UploadedImage {
                filename,
                path: entry.path(),
                modified: DateTime::<Utc>::from(modified),
            });
        }

        images.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(images)
    }
}

fn has_valid_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VALID_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn store(dir: &Path) -> ImageStore {
        ImageStore::new(dir, 64)
    }

    fn set_mtime(path: &Path, secs_ago: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
            .unwrap();
    }

    #[tokio::test]
    async fn test_save_counts_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let written = store.save_capped("a.png", &b"hello"[..]).await.unwrap();
        assert_eq!(written, 5);
        assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_save_truncates_at_cap() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let input = vec![7u8; 200];
        let written = store.save_capped("big.png", &input[..]).await.unwrap();
        assert_eq!(written, 64);
        assert_eq!(std::fs::read(dir.path().join("big.png")).unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        store.save_capped("a.png", &b"first"[..]).await.unwrap();
        store.save_capped("a.png", &b"second"[..]).await.unwrap();
        assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_save_fails_without_directory() {
        let store = ImageStore::new("/nonexistent/imgdrop-test", 64);
        let err = store.save_capped("a.png", &b"hello"[..]).await.unwrap_err();
        assert!(err.to_string().contains("Could not open file for writing"));
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        store.save_capped("a.png", &b"hello"[..]).await.unwrap();
        store.remove("a.png").await.unwrap();
        assert!(!dir.path().join("a.png").exists());
    }

    #[tokio::test]
    async fn test_list_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.jpg", "b.PNG", "c.txt", "d.webp", "noext"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let images = store(dir.path()).list_images().await.unwrap();
        let mut names: Vec<_> = images.iter().map(|i| i.filename.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["a.jpg", "b.PNG"]);
    }

    #[tokio::test]
    async fn test_list_orders_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        for (name, age) in [("old.jpg", 30u64), ("mid.gif", 20), ("new.png", 10)] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"x").unwrap();
            set_mtime(&path, age);
        }

        let images = store(dir.path()).list_images().await.unwrap();
        let names: Vec<_> = images.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, ["new.png", "mid.gif", "old.jpg"]);
    }

    #[tokio::test]
    async fn test_list_fails_without_directory() {
        let store = ImageStore::new("/nonexistent/imgdrop-test", 64);
        let err = store.list_images().await.unwrap_err();
        assert!(err.to_string().contains("Cannot find image directory"));
    }
}
