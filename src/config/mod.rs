use std::env;
use std::path::PathBuf;

/// Runtime configuration for the drop box
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory uploads are written to and listed from (default: ./i)
    pub image_dir: PathBuf,

    /// Hard cap on upload size in bytes (default: 10,240,000)
    pub max_upload_size: u64,

    /// Hostname advertised in generated public URLs (default: "localhost")
    pub server_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("i"),
            max_upload_size: 10_240_000,
            server_name: "localhost".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            image_dir: env::var("IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.image_dir),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            server_name: env::var("SERVER_NAME").unwrap_or(default.server_name),
        }
    }
}
