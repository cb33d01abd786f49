use image::Rgb;

use super::{definitions::*, output::OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorCfg {
    pub color: Rgb<u8>,
    pub width: u32,
}

impl Default for SeparatorCfg {
    fn default() -> Self {
        Self {
            color: Rgb([0, 0, 0]),
            width: DEFAULT_SEPARATOR_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeCap {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for SizeCap {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_SINGLE_IMAGE_MAX_WIDTH,
            max_height: DEFAULT_SINGLE_IMAGE_MAX_HEIGHT,
        }
    }
}

/// How the images are arranged on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One image per row.
    Vertical,
    /// A single row holding every image.
    Horizontal,
    /// Rows of `row_length` images stacked top to bottom. When no row length is given, one is
    /// chosen with [`super::default_row_length`].
    Custom { row_length: Option<usize> },
}

impl Default for Layout {
    fn default() -> Self {
        Self::Custom { row_length: None }
    }
}

impl Layout {
    /// Number of images placed in each row when `num_images` are combined with this layout.
    pub fn row_length(&self, num_images: usize) -> usize {
        match self {
            Self::Vertical => 1,
            Self::Horizontal => num_images.max(1),
            Self::Custom {
                row_length: Some(row_length),
            } => *row_length,
            Self::Custom { row_length: None } => super::default_row_length(num_images),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeCfg {
    pub layout: Layout,
    pub separator: SeparatorCfg,
    pub size_cap: Option<SizeCap>,
    pub resolution_percent: u32,
}

impl Default for CompositeCfg {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            separator: SeparatorCfg::default(),
            size_cap: None,
            resolution_percent: DEFAULT_RESOLUTION_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveCfg {
    pub format: OutputFormat,
    pub quality: u8,
}

impl Default for SaveCfg {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpg,
            quality: DEFAULT_QUALITY,
        }
    }
}
