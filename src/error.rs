use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("input path '{}' is not a valid file or directory", .0.display())]
    InvalidInput(PathBuf),

    #[error("could not read the image at {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save cropped face to {}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download {url}")]
    Download {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error(
        "could not fetch the face detection model; download seeta_fd_frontal_v1.0.bin from \
         https://github.com/atomashpolskiy/rustface/tree/master/model and place it at {}",
        .path.display()
    )]
    ModelDownload {
        path: PathBuf,
        #[source]
        source: Box<CropError>,
    },

    #[error("face detection model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("failed to load face detection model from {}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CropError>;
