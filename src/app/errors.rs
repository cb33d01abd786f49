use std::path::PathBuf;

use thiserror::Error;

use crate::library::{FileSetError, LibError};

#[derive(Error, Debug)]
pub enum AppError {
    /////////////////////////////////
    // Argument parsing
    #[error(transparent)]
    ArgParse(#[from] clap::Error),

    #[error("Args file not found at {0}")]
    ArgsFileNotFound(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse args file at given location: {0}: {1}")]
    ArgsFileParse(PathBuf, String),

    #[error("Invalid value for --{arg}: {value} (expected {expected})")]
    InvalidArgValue {
        arg: &'static str,
        value: String,
        expected: String,
    },

    #[error("Could not parse separator color: {0}. Use a color name such as 'red' or a hex value such as '#ff0000'")]
    ParseColor(String),

    /////////////////////////////////
    // Finding images
    #[error("Failed to read directory: {0}")]
    FileSearch(#[from] FileSetError),

    #[error("There are no supported image files in the folder: {0}")]
    NoImagesFound(PathBuf),

    /////////////////////////////////
    // Combining and saving
    #[error(transparent)]
    Combine(#[from] LibError),
}
