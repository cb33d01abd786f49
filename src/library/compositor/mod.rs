//! Grid composition.
//!
//! Images are decoded one at a time and folded into a running row, and each finished row is
//! folded into a running column. So at any moment only the two accumulators and the most
//! recently decoded image are held in memory.

use std::{iter, path::Path};

use super::{
    definitions::DEFAULT_GRID_ASPECT_RATIO,
    img_ops::{cap_size, combine_horizontal, combine_vertical, scale_by_percent},
    CompositeCfg, LibError, RgbImgBuf,
};

#[cfg(test)]
mod tests;

/// Source of decoded images.
pub trait RasterLoader {
    fn load(&self, path: &Path) -> Result<RgbImgBuf, LibError>;
}

/// Decodes images from disk with the `image` crate. Any alpha channel is discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl RasterLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<RgbImgBuf, LibError> {
        let img = image::open(path).map_err(|source| LibError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            target: "load",
            "Loaded {} ({}x{} {:?})", path.display(), img.width(), img.height(), img.color()
        );

        Ok(img.to_rgb8())
    }
}

/// Picks a row length giving a grid roughly 1.5 times as many images wide as it is high.
pub fn default_row_length(num_images: usize) -> usize {
    let row_length = (DEFAULT_GRID_ASPECT_RATIO * num_images as f64).sqrt().round() as usize;
    row_length.max(1)
}

/// The number of images in each row when `num_images` images are laid out `row_length` to a row.
pub fn row_partition(num_images: usize, row_length: usize) -> Vec<usize> {
    if row_length == 0 {
        return vec![];
    }

    let full_rows = num_images / row_length;
    let remainder = num_images % row_length;

    iter::repeat(row_length)
        .take(full_rows)
        .chain(Some(remainder).filter(|&r| r > 0))
        .collect()
}

fn load_capped(
    path: &Path,
    loader: &impl RasterLoader,
    cfg: &CompositeCfg,
) -> Result<RgbImgBuf, LibError> {
    let img = loader.load(path)?;

    Ok(match cfg.size_cap {
        Some(cap) => cap_size(img, cap.max_width, cap.max_height),
        None => img,
    })
}

/// Combines `files` left to right into a single row.
pub fn combine_row(
    files: &[impl AsRef<Path>],
    loader: &impl RasterLoader,
    cfg: &CompositeCfg,
) -> Result<RgbImgBuf, LibError> {
    let mut imgs = files.iter().map(|f| load_capped(f.as_ref(), loader, cfg));

    let first = imgs.next().ok_or(LibError::EmptyInput)??;
    imgs.try_fold(first, |acc, img| combine_horizontal(&acc, &img?, &cfg.separator))
}

/// Splits `files` into rows of `row_length` images (the last row may be shorter), combines each
/// row, then stacks the rows top to bottom.
pub fn combine_grid(
    files: &[impl AsRef<Path>],
    row_length: usize,
    loader: &impl RasterLoader,
    cfg: &CompositeCfg,
) -> Result<RgbImgBuf, LibError> {
    if row_length == 0 {
        return Err(LibError::ZeroRowLength);
    }

    let mut rows = files.chunks(row_length).enumerate().map(|(row_no, row_files)| {
        debug!(target: "compose", "Combining row {} ({} images)", row_no, row_files.len());
        combine_row(row_files, loader, cfg)
    });

    let first = rows.next().ok_or(LibError::EmptyInput)??;
    rows.try_fold(first, |acc, row| combine_vertical(&acc, &row?, &cfg.separator))
}

/// Combines `files` according to `cfg.layout`, then applies the output resolution.
pub fn compose(
    files: &[impl AsRef<Path>],
    loader: &impl RasterLoader,
    cfg: &CompositeCfg,
) -> Result<RgbImgBuf, LibError> {
    if files.is_empty() {
        return Err(LibError::EmptyInput);
    }

    let row_length = cfg.layout.row_length(files.len());
    info!(
        "Combining {} images in {} rows of up to {}",
        files.len(),
        row_partition(files.len(), row_length).len(),
        row_length
    );

    let combined = combine_grid(files, row_length, loader, cfg)?;

    let combined = if cfg.resolution_percent != 100 {
        scale_by_percent(combined, cfg.resolution_percent)
    } else {
        combined
    };

    Ok(combined)
}
