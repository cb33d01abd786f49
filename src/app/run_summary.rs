use std::path::PathBuf;

use serde::Serialize;

use crate::library::{row_partition, OutputFormat};

/// What was written, for `--json-output`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub file_size_bytes: u64,
    pub num_images: usize,
    pub row_length: usize,
    pub row_sizes: Vec<usize>,
    pub input_paths: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(
        output_path: PathBuf,
        format: OutputFormat,
        dimensions: (u32, u32),
        file_size_bytes: u64,
        input_paths: Vec<PathBuf>,
        row_length: usize,
    ) -> Self {
        let num_images = input_paths.len();
        Self {
            output_path,
            format,
            width: dimensions.0,
            height: dimensions.1,
            file_size_bytes,
            num_images,
            row_length,
            row_sizes: row_partition(num_images, row_length),
            input_paths,
        }
    }
}
