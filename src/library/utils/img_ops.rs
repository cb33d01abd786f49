use std::convert::TryFrom;

use image::{imageops::FilterType, GenericImage, ImageBuffer, Rgb};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use crate::library::{LibError, SeparatorCfg};

pub type RgbImgBuf = ImageBuffer<Rgb<u8>, Vec<u8>>;

// Areas of a canvas not covered by an image or a separator are left at this color.
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

pub fn combine_horizontal(
    b1: &RgbImgBuf,
    b2: &RgbImgBuf,
    sep: &SeparatorCfg,
) -> Result<RgbImgBuf, LibError> {
    //prepare a new buffer large enough to fit both images and the separator.
    //the width is the sum of the widths of the two images plus the separator.
    //the depth is the max of the depths of the two images,
    let (b1_x, b1_y) = b1.dimensions();
    let (b2_x, b2_y) = b2.dimensions();
    let sum_x = checked_extent(b1_x, b2_x, sep.width)?;
    let max_y = std::cmp::max(b1_y, b2_y);

    let mut sxs_buf: RgbImgBuf = ImageBuffer::from_pixel(sum_x, max_y, BACKGROUND);
    sxs_buf.copy_from(b1, 0, 0)?;
    fill_separator(&mut sxs_buf, b1_x, 0, sep.width, max_y, sep);
    sxs_buf.copy_from(b2, b1_x + sep.width, 0)?;

    Ok(sxs_buf)
}

pub fn combine_vertical(
    b1: &RgbImgBuf,
    b2: &RgbImgBuf,
    sep: &SeparatorCfg,
) -> Result<RgbImgBuf, LibError> {
    //prepare a new buffer large enough to fit both images and the separator.
    //the width is the max of the widths of the two images.
    //the depth is the sum of the depths of the two images plus the separator,
    let (b1_x, b1_y) = b1.dimensions();
    let (b2_x, b2_y) = b2.dimensions();
    let max_x = std::cmp::max(b1_x, b2_x);
    let sum_y = checked_extent(b1_y, b2_y, sep.width)?;

    let mut stacked_buf: RgbImgBuf = ImageBuffer::from_pixel(max_x, sum_y, BACKGROUND);
    stacked_buf.copy_from(b1, 0, 0)?;
    fill_separator(&mut stacked_buf, 0, b1_y, max_x, sep.width, sep);
    stacked_buf.copy_from(b2, 0, b1_y + sep.width)?;

    Ok(stacked_buf)
}

fn checked_extent(first: u32, second: u32, separator: u32) -> Result<u32, LibError> {
    first
        .checked_add(second)
        .and_then(|sum| sum.checked_add(separator))
        .ok_or(LibError::CanvasTooLarge {
            first,
            second,
            separator,
        })
}

fn fill_separator(buf: &mut RgbImgBuf, x: u32, y: u32, width: u32, height: u32, sep: &SeparatorCfg) {
    //Rect cannot be zero-sized.
    if width == 0 || height == 0 {
        return;
    }

    let rect = Rect::at(x as i32, y as i32).of_size(width, height);
    draw_filled_rect_mut(buf, rect, sep.color);
}

/// Shrinks `img` so that it fits inside `max_x` by `max_y`, keeping its aspect ratio.
///
/// Images which already fit are returned untouched.
pub fn cap_size(img: RgbImgBuf, max_x: u32, max_y: u32) -> RgbImgBuf {
    let (img_x, img_y) = img.dimensions();
    if img_x <= max_x && img_y <= max_y {
        return img;
    }

    let (new_x, new_y) = capped_dimensions(img_x, img_y, max_x, max_y);
    debug!(
        target: "resize",
        "Shrinking {}x{} image to {}x{}", img_x, img_y, new_x, new_y
    );
    image::imageops::resize(&img, new_x, new_y, RESAMPLE_FILTER)
}

fn capped_dimensions(img_x: u32, img_y: u32, max_x: u32, max_y: u32) -> (u32, u32) {
    //whichever side overshoots its bound by the most decides the scale factor.
    let ratio = f64::min(
        f64::from(max_x) / f64::from(img_x),
        f64::from(max_y) / f64::from(img_y),
    );

    let new_x = (f64::from(img_x) * ratio).round() as u32;
    let new_y = (f64::from(img_y) * ratio).round() as u32;

    (new_x.clamp(1, max_x.max(1)), new_y.clamp(1, max_y.max(1)))
}

/// Rescales `img` to `percent`% of its size. Each side is rounded down, but never below 1px.
pub fn scale_by_percent(img: RgbImgBuf, percent: u32) -> RgbImgBuf {
    if percent == 100 {
        return img;
    }

    let (img_x, img_y) = img.dimensions();
    let scale = |side: u32| {
        let scaled = u64::from(side) * u64::from(percent) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    };
    let (new_x, new_y) = (scale(img_x), scale(img_y));

    debug!(
        target: "resize",
        "Scaling {}x{} image by {}% to {}x{}", img_x, img_y, percent, new_x, new_y
    );
    image::imageops::resize(&img, new_x, new_y, RESAMPLE_FILTER)
}
