use std::{collections::HashMap, path::PathBuf};

use image::{ImageBuffer, Rgb};

use super::*;
use crate::library::{img_ops::BACKGROUND, Layout, SeparatorCfg, SizeCap};

const SEP_COLOR: Rgb<u8> = Rgb([255, 0, 255]);

//Serves images from memory, keyed by path.
struct MemLoader(HashMap<PathBuf, RgbImgBuf>);

impl RasterLoader for MemLoader {
    fn load(&self, path: &Path) -> Result<RgbImgBuf, LibError> {
        self.0.get(path).cloned().ok_or_else(|| LibError::Decode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(std::io::ErrorKind::NotFound.into()),
        })
    }
}

//Builds a loader holding one solid image per (width, height) entry. Image i is named "i.png" and
//filled with a color unique to i.
fn solid_images(dims: &[(u32, u32)]) -> (MemLoader, Vec<PathBuf>) {
    let mut imgs = HashMap::new();
    let mut paths = vec![];
    for (i, &(x, y)) in dims.iter().enumerate() {
        let path = PathBuf::from(format!("{}.png", i));
        imgs.insert(path.clone(), ImageBuffer::from_pixel(x, y, color_of(i)));
        paths.push(path);
    }
    (MemLoader(imgs), paths)
}

fn color_of(i: usize) -> Rgb<u8> {
    Rgb([10 + i as u8 * 20, 100, 50])
}

fn cfg_with_sep(width: u32) -> CompositeCfg {
    CompositeCfg {
        separator: SeparatorCfg {
            color: SEP_COLOR,
            width,
        },
        ..Default::default()
    }
}

#[test]
fn test_default_row_length() {
    assert_eq!(default_row_length(0), 1);
    assert_eq!(default_row_length(1), 1);
    assert_eq!(default_row_length(2), 2);
    assert_eq!(default_row_length(4), 2);
    assert_eq!(default_row_length(6), 3);
    assert_eq!(default_row_length(10), 4);
    assert_eq!(default_row_length(24), 6);
    assert_eq!(default_row_length(100), 12);
}

#[test]
fn test_row_partition() {
    assert_eq!(row_partition(4, 2), vec![2, 2]);
    assert_eq!(row_partition(5, 2), vec![2, 2, 1]);
    assert_eq!(row_partition(1, 3), vec![1]);
    assert_eq!(row_partition(0, 3), Vec::<usize>::new());
    assert_eq!(row_partition(3, 0), Vec::<usize>::new());

    for n in 1..40 {
        for r in 1..12 {
            let rows = row_partition(n, r);
            let expected_rows = (n + r - 1) / r;

            assert_eq!(rows.len(), expected_rows, "n={} r={}", n, r);
            assert_eq!(rows.iter().sum::<usize>(), n);
            assert!(rows[..rows.len() - 1].iter().all(|&len| len == r));

            let last = *rows.last().unwrap();
            assert_eq!(last, n - r * (expected_rows - 1));
            assert!(last >= 1 && last <= r);
        }
    }
}

#[test]
fn test_layout_row_length() {
    assert_eq!(Layout::Vertical.row_length(7), 1);
    assert_eq!(Layout::Horizontal.row_length(7), 7);
    assert_eq!(Layout::Custom { row_length: Some(3) }.row_length(7), 3);
    assert_eq!(Layout::Custom { row_length: None }.row_length(6), 3);
}

#[test]
fn test_combine_row_order() {
    let (loader, paths) = solid_images(&[(10, 10), (20, 5), (5, 15)]);

    let row = combine_row(&paths, &loader, &cfg_with_sep(2)).unwrap();

    assert_eq!(row.dimensions(), (10 + 2 + 20 + 2 + 5, 15));
    assert_eq!(row[(0, 0)], color_of(0));
    assert_eq!(row[(10, 0)], SEP_COLOR);
    assert_eq!(row[(12, 0)], color_of(1));
    assert_eq!(row[(12, 5)], BACKGROUND);
    assert_eq!(row[(32, 14)], SEP_COLOR);
    assert_eq!(row[(34, 14)], color_of(2));
}

#[test]
fn test_combine_row_single_image() {
    let (loader, paths) = solid_images(&[(7, 3)]);

    let row = combine_row(&paths, &loader, &cfg_with_sep(20)).unwrap();

    assert_eq!(row, ImageBuffer::from_pixel(7, 3, color_of(0)));
}

#[test]
fn test_combine_row_empty() {
    let (loader, _) = solid_images(&[]);
    let empty: Vec<PathBuf> = vec![];

    let res = combine_row(&empty, &loader, &cfg_with_sep(2));
    assert!(matches!(res, Err(LibError::EmptyInput)));
}

#[test]
fn test_combine_row_applies_size_cap() {
    let (loader, paths) = solid_images(&[(400, 100), (50, 50)]);
    let cfg = CompositeCfg {
        size_cap: Some(SizeCap {
            max_width: 200,
            max_height: 200,
        }),
        ..cfg_with_sep(0)
    };

    let row = combine_row(&paths, &loader, &cfg).unwrap();

    assert_eq!(row.dimensions(), (200 + 50, 50));
}

#[test]
//4 equal images, 2 to a row, separator 10: two 210x100 rows stacked into 210x210.
fn test_grid_of_four() {
    let (loader, paths) = solid_images(&[(100, 100); 4]);

    let grid = combine_grid(&paths, 2, &loader, &cfg_with_sep(10)).unwrap();

    assert_eq!(grid.dimensions(), (210, 210));
    assert_eq!(grid[(0, 0)], color_of(0));
    assert_eq!(grid[(110, 0)], color_of(1));
    assert_eq!(grid[(0, 110)], color_of(2));
    assert_eq!(grid[(110, 110)], color_of(3));
    assert_eq!(grid[(105, 50)], SEP_COLOR);
    assert_eq!(grid[(50, 105)], SEP_COLOR);
    assert_eq!(grid[(105, 105)], SEP_COLOR);
}

#[test]
//a short final row leaves the area to its right as background.
fn test_grid_ragged_last_row() {
    let (loader, paths) = solid_images(&[(10, 10); 5]);

    let grid = combine_grid(&paths, 2, &loader, &cfg_with_sep(1)).unwrap();

    assert_eq!(grid.dimensions(), (21, 32));
    assert_eq!(grid[(0, 22)], color_of(4));
    assert_eq!(grid[(10, 22)], BACKGROUND);
    assert_eq!(grid[(20, 31)], BACKGROUND);
}

#[test]
fn test_grid_mixed_sizes() {
    let (loader, paths) = solid_images(&[(30, 10), (10, 40), (50, 5)]);

    let grid = combine_grid(&paths, 2, &loader, &cfg_with_sep(3)).unwrap();

    //rows are 43x40 and 50x5
    assert_eq!(grid.dimensions(), (50, 40 + 3 + 5));
}

#[test]
fn test_grid_zero_row_length() {
    let (loader, paths) = solid_images(&[(10, 10)]);

    let res = combine_grid(&paths, 0, &loader, &cfg_with_sep(1));
    assert!(matches!(res, Err(LibError::ZeroRowLength)));
}

#[test]
fn test_grid_row_length_longer_than_input() {
    let (loader, paths) = solid_images(&[(10, 10); 3]);

    let grid = combine_grid(&paths, 10, &loader, &cfg_with_sep(1)).unwrap();
    assert_eq!(grid.dimensions(), (32, 10));
}

#[test]
//the result depends only on the order of the inputs.
fn test_grid_is_deterministic() {
    let (loader, paths) = solid_images(&[(12, 7), (3, 9), (8, 8), (5, 1), (9, 2)]);
    let cfg = cfg_with_sep(2);

    let first = combine_grid(&paths, 2, &loader, &cfg).unwrap();
    let second = combine_grid(&paths, 2, &loader, &cfg).unwrap();
    assert_eq!(first, second);

    let mut reversed = paths.clone();
    reversed.reverse();
    let reversed = combine_grid(&reversed, 2, &loader, &cfg).unwrap();
    assert_ne!(first, reversed);
}

#[test]
fn test_grid_decode_failure_names_file() {
    let (loader, mut paths) = solid_images(&[(10, 10); 2]);
    paths.insert(1, PathBuf::from("broken.jpg"));

    match combine_grid(&paths, 2, &loader, &cfg_with_sep(1)) {
        Err(LibError::Decode { path, .. }) => assert_eq!(path, PathBuf::from("broken.jpg")),
        other => panic!("expected decode error, got {:?}", other.map(|img| img.dimensions())),
    }
}

#[test]
//three 200px wide images stacked with separator 5: 50 + 80 + 60 + 5 + 5.
fn test_compose_vertical() {
    let (loader, paths) = solid_images(&[(200, 50), (200, 80), (200, 60)]);
    let cfg = CompositeCfg {
        layout: Layout::Vertical,
        ..cfg_with_sep(5)
    };

    let combined = compose(&paths, &loader, &cfg).unwrap();
    assert_eq!(combined.dimensions(), (200, 200));
}

#[test]
fn test_compose_horizontal() {
    let (loader, paths) = solid_images(&[(20, 50), (30, 80), (40, 60)]);
    let cfg = CompositeCfg {
        layout: Layout::Horizontal,
        ..cfg_with_sep(5)
    };

    let combined = compose(&paths, &loader, &cfg).unwrap();
    assert_eq!(combined.dimensions(), (100, 80));
}

#[test]
fn test_compose_default_custom_layout() {
    //6 images -> 3 to a row
    let (loader, paths) = solid_images(&[(10, 10); 6]);

    let combined = compose(&paths, &loader, &cfg_with_sep(0)).unwrap();
    assert_eq!(combined.dimensions(), (30, 20));
}

#[test]
fn test_compose_scales_output() {
    let (loader, paths) = solid_images(&[(100, 100); 4]);
    let cfg = CompositeCfg {
        layout: Layout::Custom { row_length: Some(2) },
        resolution_percent: 50,
        ..cfg_with_sep(10)
    };

    let combined = compose(&paths, &loader, &cfg).unwrap();
    assert_eq!(combined.dimensions(), (105, 105));
}

#[test]
fn test_compose_empty() {
    let (loader, paths) = solid_images(&[]);

    let res = compose(&paths, &loader, &CompositeCfg::default());
    assert!(matches!(res, Err(LibError::EmptyInput)));
}

#[test]
fn test_fs_loader_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.png");
    std::fs::write(&bad, b"definitely not a png").unwrap();

    match FsLoader.load(&bad) {
        Err(LibError::Decode { path, .. }) => assert_eq!(path, bad),
        other => panic!("expected decode error, got {:?}", other.map(|img| img.dimensions())),
    }
}

#[test]
fn test_fs_loader_flattens_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alpha.png");
    image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 128]))
        .save(&path)
        .unwrap();

    let img = FsLoader.load(&path).unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img[(0, 0)], Rgb([1, 2, 3]));
}
