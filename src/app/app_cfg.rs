use std::path::PathBuf;

use crate::library::{CompositeCfg, MatchMode, SaveCfg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportVerbosity {
    Quiet,
    Default,
    Verbose,
}

#[derive(Debug, Clone)]
pub struct DirCfg {
    pub work_dir: PathBuf,
    pub match_mode: MatchMode,
}

#[derive(Debug, Clone)]
pub struct OutputCfg {
    pub json_output: bool,
    pub verbosity: ReportVerbosity,
}

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub dir_cfg: DirCfg,
    pub composite_cfg: CompositeCfg,
    pub save_cfg: SaveCfg,

    pub output_cfg: OutputCfg,

    //--row-length given alongside a layout which does not use it.
    pub ignored_row_length: Option<usize>,
}
