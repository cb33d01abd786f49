use std::{
    error::Error,
    ffi::OsString,
    io::{self, BufWriter},
};

use byte_unit::Byte;

use crate::{
    app::*,
    library::{compose, save_composite, FileSet, FileSetError, FsLoader, LibError},
};

pub fn run_app() -> i32 {
    run_app_with_args(std::env::args_os())
}

pub fn run_app_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    //Parse arguments and bail early if there is an error.
    let cfg = match parse_args_from(args) {
        Ok(ParsedArgs::Run(cfg)) => {
            configure_logs(cfg.output_cfg.verbosity);
            cfg
        }
        Ok(ParsedArgs::Completions(shell)) => {
            write_completions(shell, &mut io::stdout());
            return 0;
        }
        //clap prints its own usage message, and exits with 0 for --help and --version.
        Err(AppError::ArgParse(e)) => e.exit(),
        Err(fatal) => {
            //the logger is configured from the parsed arguments, so start it here before
            //reporting the error.
            configure_logs(ReportVerbosity::Verbose);
            print_fatal_err(&fatal, ReportVerbosity::Verbose);
            return 1;
        }
    };

    match run_app_inner(&cfg) {
        Ok(summary) => {
            if cfg.output_cfg.json_output {
                print_summary(&summary);
            }
            0
        }
        Err(fatal_error) => {
            print_fatal_err(&fatal_error, cfg.output_cfg.verbosity);
            1
        }
    }
}

pub fn run_app_inner(cfg: &AppCfg) -> Result<RunSummary, AppError> {
    let work_dir = &cfg.dir_cfg.work_dir;

    if let Some(row_length) = cfg.ignored_row_length {
        warn!(
            "Ignoring --row-length {}: it only applies to --method custom",
            row_length
        );
    }

    let mut file_set = FileSet::new(work_dir, cfg.dir_cfg.match_mode);
    let (files, nonfatal_errs) = file_set.enumerate_from_fs()?;
    print_nonfatal_errs(&nonfatal_errs);

    if files.is_empty() {
        return Err(AppError::NoImagesFound(work_dir.to_path_buf()));
    }

    info!("Found {} images in {}", files.len(), work_dir.display());
    for file in files {
        debug!(target: "file_set", "    {}", file.display());
    }

    let combined = compose(files, &FsLoader, &cfg.composite_cfg)?;
    let output_path = save_composite(&combined, work_dir, &cfg.save_cfg)?;

    let file_size_bytes = std::fs::metadata(&output_path)
        .map_err(|source| LibError::Io {
            path: output_path.clone(),
            source,
        })?
        .len();

    let (width, height) = combined.dimensions();
    info!(
        "Wrote {} ({}x{}, {})",
        output_path.display(),
        width,
        height,
        Byte::from_bytes(u128::from(file_size_bytes)).get_appropriate_unit(false)
    );

    let row_length = cfg.composite_cfg.layout.row_length(files.len());
    Ok(RunSummary::new(
        output_path,
        cfg.save_cfg.format,
        (width, height),
        file_size_bytes,
        files.clone(),
        row_length,
    ))
}

fn print_fatal_err(fatal_err: &AppError, verbosity: ReportVerbosity) {
    error!(target: "app-errorlog", "{}", fatal_err);

    if verbosity == ReportVerbosity::Verbose {
        let mut source: Option<&(dyn Error + 'static)> = fatal_err.source();
        while let Some(e) = source {
            error!(target: "app-errorlog", "    caused by: {}", e);
            source = e.source();
        }
    }
}

fn print_nonfatal_errs(nonfatal_errs: &[FileSetError]) {
    for err in nonfatal_errs {
        warn!("{}", err);
    }
}

fn print_summary(summary: &RunSummary) {
    let stdout = BufWriter::new(io::stdout());
    if let Err(e) = serde_json::to_writer_pretty(stdout, summary) {
        error!(target: "app-errorlog", "Failed to write json output: {}", e);
    }
    println!();
}

pub fn configure_logs(verbosity: ReportVerbosity) {
    use simplelog::*;

    let mut cfg = simplelog::ConfigBuilder::new();

    let min_loglevel = match verbosity {
        ReportVerbosity::Quiet => LevelFilter::Warn,
        ReportVerbosity::Default => LevelFilter::Info,
        ReportVerbosity::Verbose => LevelFilter::Trace,
    };

    //init only fails if a logger is already installed, in which case keep using that one.
    if TermLogger::init(min_loglevel, cfg.build(), TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        debug!("Logger already initialized");
    }
}
