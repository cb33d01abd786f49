use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use image::{codecs::jpeg::JpegEncoder, ColorType, ImageFormat};
use serde::Serialize;

use super::{definitions::OUTPUT_FILE_STEM, LibError, RgbImgBuf, SaveCfg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpg,
    Png,
    Gif,
    Bmp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [Self::Jpg, Self::Png, Self::Gif, Self::Bmp];
    pub const NAMES: [&'static str; 4] = ["jpg", "png", "gif", "bmp"];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Bmp => ImageFormat::Bmp,
        }
    }

    /// `combined.<ext>`
    pub fn output_file_name(self) -> String {
        format!("{}.{}", OUTPUT_FILE_STEM, self.extension())
    }

    fn temp_file_name(self) -> String {
        format!(".{}.tmp", self.output_file_name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "bmp" => Ok(Self::Bmp),
            other => Err(format!("unsupported output format: {}", other)),
        }
    }
}

/// True for file names this program writes: the combined image in any format, and the
/// temporary file it is encoded into.
pub fn is_output_artifact(file_name: &str) -> bool {
    let file_name = file_name.to_ascii_lowercase();
    OutputFormat::ALL
        .iter()
        .any(|fmt| file_name == fmt.output_file_name() || file_name == fmt.temp_file_name())
}

/// Encodes `img` into `dir/combined.<ext>`, returning the path written.
///
/// The image is first encoded into a hidden temporary file in the same directory which is then
/// renamed into place, so a failed encode never leaves a partial `combined.<ext>` behind.
pub fn save_composite(img: &RgbImgBuf, dir: &Path, cfg: &SaveCfg) -> Result<PathBuf, LibError> {
    let output_path = dir.join(cfg.format.output_file_name());
    let temp_path = dir.join(cfg.format.temp_file_name());

    if let Err(e) = write_encoded(img, &temp_path, cfg) {
        if let Err(rm_err) = fs::remove_file(&temp_path) {
            debug!("Failed to remove {}: {}", temp_path.display(), rm_err);
        }
        return Err(e);
    }

    fs::rename(&temp_path, &output_path).map_err(|source| LibError::Io {
        path: output_path.clone(),
        source,
    })?;

    Ok(output_path)
}

fn write_encoded(img: &RgbImgBuf, path: &Path, cfg: &SaveCfg) -> Result<(), LibError> {
    let io_err = |source: std::io::Error| LibError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let encoded = match cfg.format {
        //the encoder treats quality 0 as 1.
        OutputFormat::Jpg => {
            let (img_x, img_y) = img.dimensions();
            JpegEncoder::new_with_quality(&mut writer, cfg.quality.max(1)).encode(
                img.as_raw(),
                img_x,
                img_y,
                ColorType::Rgb8,
            )
        }
        other => img.write_to(&mut writer, other.image_format()),
    };
    encoded.map_err(|source| LibError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    writer.flush().map_err(io_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, ImageBuffer, Rgb};

    use super::*;

    fn checkerboard() -> RgbImgBuf {
        ImageBuffer::from_fn(16, 9, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([200, 10, 10])
            }
        })
    }

    #[test]
    fn test_output_format_names() {
        for (fmt, name) in OutputFormat::ALL.iter().zip(OutputFormat::NAMES.iter()) {
            assert_eq!(fmt.extension(), *name);
            assert_eq!(name.parse::<OutputFormat>().unwrap(), *fmt);
        }
        assert_eq!("JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert!("tiff".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_artifacts() {
        assert!(is_output_artifact("combined.jpg"));
        assert!(is_output_artifact("Combined.PNG"));
        assert!(is_output_artifact(".combined.bmp.tmp"));
        assert!(!is_output_artifact("combined_old.jpg"));
        assert!(!is_output_artifact("a.jpg"));
    }

    #[test]
    fn test_save_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let img = checkerboard();

        for &format in OutputFormat::ALL.iter() {
            let cfg = SaveCfg { format, quality: 80 };
            let path = save_composite(&img, dir.path(), &cfg).unwrap();

            assert_eq!(path, dir.path().join(format.output_file_name()));
            assert!(!dir.path().join(format.temp_file_name()).exists());

            let reloaded = image::open(&path).unwrap();
            assert_eq!((reloaded.width(), reloaded.height()), (16, 9));
        }
    }

    #[test]
    fn test_lossless_formats_round_trip_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let img = checkerboard();

        let cfg = SaveCfg {
            format: OutputFormat::Png,
            quality: 0,
        };
        let path = save_composite(&img, dir.path(), &cfg).unwrap();
        assert_eq!(image::open(&path).unwrap().to_rgb8(), img);
    }

    #[test]
    fn test_failed_save_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let res = save_composite(&checkerboard(), &missing, &SaveCfg::default());
        assert!(matches!(res, Err(LibError::Io { .. })));
        assert!(!missing.join("combined.jpg").exists());
    }
}
