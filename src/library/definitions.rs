// Layout heuristic. Target width:height ratio of a grid, counted in images rather than pixels.
pub const DEFAULT_GRID_ASPECT_RATIO: f64 = 1.5;

// Limits accepted for user-supplied layout and output settings.
pub const MIN_ROW_LENGTH: usize = 1;
pub const MAX_ROW_LENGTH: usize = 1_000_000;
pub const MIN_RESOLUTION_PERCENT: u32 = 1;
pub const MAX_RESOLUTION_PERCENT: u32 = 300;
pub const MAX_QUALITY: u8 = 100;

// Defaults
pub const DEFAULT_SEPARATOR_WIDTH: u32 = 20;
pub const DEFAULT_SEPARATOR_COLOR: &str = "black";
pub const DEFAULT_QUALITY: u8 = 95;
pub const DEFAULT_RESOLUTION_PERCENT: u32 = 100;
pub const DEFAULT_SINGLE_IMAGE_MAX_WIDTH: u32 = 1200;
pub const DEFAULT_SINGLE_IMAGE_MAX_HEIGHT: u32 = 900;

//Substrings which mark a file name as an image to be combined.
pub const FORMAT_TOKENS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

pub const OUTPUT_FILE_STEM: &str = "combined";
