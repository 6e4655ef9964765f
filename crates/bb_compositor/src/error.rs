use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("asset '{}' not found", .path.display())]
    Missing { path: PathBuf },
    #[error("failed to decode asset '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

