mod compositor;
pub mod definitions;
pub mod errors;
pub mod file_set;
mod library_cfg;
mod output;
mod utils;

//exports
pub use compositor::{compose, default_row_length, row_partition, FsLoader};
pub use errors::LibError;
pub use file_set::{FileSet, FileSetError, MatchMode};
pub use library_cfg::{CompositeCfg, Layout, SaveCfg, SeparatorCfg, SizeCap};
pub use output::{save_composite, OutputFormat};
pub use utils::color::parse_color;
pub use utils::img_ops::{self, RgbImgBuf};
