mod app_cfg;
mod app_fns;
mod arg_parse;
mod errors;
mod run_summary;


//exports
pub use app_cfg::{AppCfg, DirCfg, OutputCfg, ReportVerbosity};
pub use app_fns::*;
pub use arg_parse::{parse_args_from, write_completions, ParsedArgs};
pub use errors::AppError;
pub use run_summary::RunSummary;
