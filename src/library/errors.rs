use std::{fmt::Debug, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibError {
    #[error("No images were given to combine")]
    EmptyInput,

    #[error("Row length must be at least 1")]
    ZeroRowLength,

    #[error("Failed to decode image: {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Combined image would exceed the maximum canvas size ({first} + {second} + {separator} px)")]
    CanvasTooLarge { first: u32, second: u32, separator: u32 },

    #[error("Image processing error: {0}")]
    ImgError(#[from] image::ImageError),

    #[error("Failed to encode combined image to {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error writing {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
