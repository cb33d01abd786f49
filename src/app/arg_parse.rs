use std::{
    ffi::{OsStr, OsString},
    fmt::Display,
    io::Write,
    iter::once,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::{App, Arg, ArgMatches, Shell};

use crate::{
    app::*,
    library::{definitions::*, parse_color, CompositeCfg, Layout, MatchMode, OutputFormat, SaveCfg, SeparatorCfg, SizeCap},
};

const PROGRAM_NAME: &str = "image_combiner";

const DIR: &str = "Directory";
const METHOD: &str = "Method";
const VERTICAL: &str = "Vertical";
const HORIZONTAL: &str = "Horizontal";
const ROW_LENGTH: &str = "Row length";
const SEPARATOR_COLOR: &str = "Separator color";
const SEPARATOR_WIDTH: &str = "Separator width";
const QUALITY: &str = "Quality";
const RESOLUTION_PERCENT: &str = "Resolution percent";
const OUTPUT_FORMAT: &str = "Output format";
const RESIZE_EVERY_IMAGE: &str = "Resize every image";
const SINGLE_IMAGE_MAX_WIDTH: &str = "Single image max width";
const SINGLE_IMAGE_MAX_HEIGHT: &str = "Single image max height";
const STRICT_EXTENSIONS: &str = "Strict extensions";
const JSON_OUTPUT: &str = "Json output";
const QUIET: &str = "Quiet";
const VERBOSE: &str = "Verbose";
const ARGS_FILE: &str = "Args file";
const GENERATE_COMPLETIONS: &str = "Generate completions";

const METHODS: [&str; 3] = ["vertical", "horizontal", "custom"];

/// What the command line asked for.
#[derive(Debug)]
pub enum ParsedArgs {
    Run(AppCfg),
    Completions(Shell),
}

//clap borrows default values for the lifetime of the App, so their string forms live here.
struct DefaultValues {
    separator_width: String,
    quality: String,
    resolution_percent: String,
    single_image_max_width: String,
    single_image_max_height: String,
}

impl DefaultValues {
    fn new() -> Self {
        Self {
            separator_width: DEFAULT_SEPARATOR_WIDTH.to_string(),
            quality: DEFAULT_QUALITY.to_string(),
            resolution_percent: DEFAULT_RESOLUTION_PERCENT.to_string(),
            single_image_max_width: DEFAULT_SINGLE_IMAGE_MAX_WIDTH.to_string(),
            single_image_max_height: DEFAULT_SINGLE_IMAGE_MAX_HEIGHT.to_string(),
        }
    }
}

fn build_clap_app(defaults: &DefaultValues) -> App<'_, '_> {
    //args are not added through method chaining because this appears to break rustfmt.
    let mut clap_app = App::new("Image combiner")
        .version("1.0")
        .about("Combines every image in a folder into a single image, arranged as a column, a row or a grid");

    clap_app = clap_app.arg(
        Arg::with_name(DIR)
            .long("dir")
            .takes_value(true)
            .default_value(".")
            .help("Directory containing the images. The combined image is also written here.")
            .display_order(1),
    );

    clap_app = clap_app.arg(
        Arg::with_name(METHOD)
            .long("method")
            .takes_value(true)
            .possible_values(&METHODS)
            .conflicts_with_all(&[VERTICAL, HORIZONTAL])
            .help("How to arrange the images. 'custom' lays them out in rows of --row-length [default: custom]")
            .display_order(2),
    );

    clap_app = clap_app.arg(
        Arg::with_name(VERTICAL)
            .long("vertical")
            .conflicts_with(HORIZONTAL)
            .help("Combine images vertically. Same as --method vertical"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(HORIZONTAL)
            .long("horizontal")
            .help("Combine images horizontally. Same as --method horizontal"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(ROW_LENGTH)
            .long("row-length")
            .takes_value(true)
            .help("Number of images in each row of a custom layout. Defaults to round(sqrt(1.5 * number of images))")
            .display_order(3),
    );

    clap_app = clap_app.arg(
        Arg::with_name(SEPARATOR_COLOR)
            .long("separator-color")
            .takes_value(true)
            .default_value(DEFAULT_SEPARATOR_COLOR)
            .help("Separator color, as a name (e.g. 'red') or a hex value (e.g. '#ff0000')"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(SEPARATOR_WIDTH)
            .long("separator-width")
            .takes_value(true)
            .default_value(&defaults.separator_width)
            .help("Separator width in pixels"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(QUALITY)
            .long("quality")
            .takes_value(true)
            .default_value(&defaults.quality)
            .help("Output quality, 0-100. Only used for jpg output"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(RESOLUTION_PERCENT)
            .long("resolution-percent")
            .takes_value(true)
            .default_value(&defaults.resolution_percent)
            .help("Scale the combined image to this percentage of its size, 1-300"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(OUTPUT_FORMAT)
            .long("output-format")
            .takes_value(true)
            .possible_values(&OutputFormat::NAMES)
            .case_insensitive(true)
            .default_value("jpg")
            .help("Format of the combined image. It is written to combined.<format>"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(RESIZE_EVERY_IMAGE)
            .long("resize-every-image")
            .help("Shrink every image to fit within --single-image-max-width and --single-image-max-height before combining"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(SINGLE_IMAGE_MAX_WIDTH)
            .long("single-image-max-width")
            .takes_value(true)
            .default_value(&defaults.single_image_max_width),
    );

    clap_app = clap_app.arg(
        Arg::with_name(SINGLE_IMAGE_MAX_HEIGHT)
            .long("single-image-max-height")
            .takes_value(true)
            .default_value(&defaults.single_image_max_height),
    );

    clap_app = clap_app.arg(
        Arg::with_name(STRICT_EXTENSIONS)
            .long("strict-extensions")
            .help("Only select files whose extension is an image format. By default any file whose name contains jpg, jpeg, png, bmp or gif is selected"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(JSON_OUTPUT)
            .long("json-output")
            .help("Print a json summary of the combined image"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(QUIET)
            .long("quiet")
            .help("Quiet verbosity: Only print errors, warnings and output")
            .conflicts_with(VERBOSE),
    );

    clap_app = clap_app.arg(
        Arg::with_name(VERBOSE)
            .long("verbose")
            .help("Verbose: print details of every image loaded and combined"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(ARGS_FILE)
            .long("args-file")
            .takes_value(true)
            .help("Read command line arguments from a file. All other arguments on the command line are ignored"),
    );

    clap_app = clap_app.arg(
        Arg::with_name(GENERATE_COMPLETIONS)
            .long("generate-completions")
            .takes_value(true)
            .possible_values(&Shell::variants())
            .help("Write shell completions to stdout and exit"),
    );

    clap_app
}

pub fn parse_args_from<I, T>(args: I) -> Result<ParsedArgs, AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let defaults = DefaultValues::new();
    let mut matches = build_clap_app(&defaults).get_matches_from_safe(args)?;

    //first check if a Args file is present. If so, then read it and use the arguments from within.
    let args_file_path = matches.value_of_os(ARGS_FILE).map(PathBuf::from);
    if let Some(args_file_path) = args_file_path {
        let args = read_args_file(&args_file_path)?;

        //need to prepend program name as this is what would be seen in a direct shell invocation.
        let args = once(PROGRAM_NAME.to_string()).chain(args);
        matches = build_clap_app(&defaults).get_matches_from_safe(args)?;
    }

    if let Some(shell) = matches.value_of(GENERATE_COMPLETIONS) {
        let shell = Shell::from_str(shell).map_err(|expected| AppError::InvalidArgValue {
            arg: "generate-completions",
            value: shell.to_string(),
            expected,
        })?;
        return Ok(ParsedArgs::Completions(shell));
    }

    let dir_cfg = DirCfg {
        work_dir: PathBuf::from(matches.value_of_os(DIR).unwrap_or_else(|| OsStr::new("."))),
        match_mode: if matches.is_present(STRICT_EXTENSIONS) {
            MatchMode::Extension
        } else {
            MatchMode::Substring
        },
    };

    let (layout, ignored_row_length) = parse_layout(&matches)?;

    let composite_cfg = CompositeCfg {
        layout,
        separator: parse_separator(&matches)?,
        size_cap: parse_size_cap(&matches)?,
        resolution_percent: parse_in_range(
            &matches,
            RESOLUTION_PERCENT,
            "resolution-percent",
            MIN_RESOLUTION_PERCENT..=MAX_RESOLUTION_PERCENT,
        )?
        .unwrap_or(DEFAULT_RESOLUTION_PERCENT),
    };

    let save_cfg = SaveCfg {
        format: match matches.value_of(OUTPUT_FORMAT) {
            Some(format) => OutputFormat::from_str(format).map_err(|_| AppError::InvalidArgValue {
                arg: "output-format",
                value: format.to_string(),
                expected: OutputFormat::NAMES.join(", "),
            })?,
            None => SaveCfg::default().format,
        },
        quality: parse_in_range(&matches, QUALITY, "quality", 0..=MAX_QUALITY)?.unwrap_or(DEFAULT_QUALITY),
    };

    let verbosity = if matches.is_present(QUIET) {
        ReportVerbosity::Quiet
    } else if matches.is_present(VERBOSE) {
        ReportVerbosity::Verbose
    } else {
        ReportVerbosity::Default
    };

    let output_cfg = OutputCfg {
        json_output: matches.is_present(JSON_OUTPUT),
        verbosity,
    };

    Ok(ParsedArgs::Run(AppCfg {
        dir_cfg,
        composite_cfg,
        save_cfg,
        output_cfg,
        ignored_row_length,
    }))
}

pub fn write_completions(shell: Shell, out: &mut impl Write) {
    let defaults = DefaultValues::new();
    build_clap_app(&defaults).gen_completions_to(PROGRAM_NAME, shell, out);
}

fn read_args_file(path: &Path) -> Result<Vec<String>, AppError> {
    let args = std::fs::read_to_string(path).map_err(|e| AppError::ArgsFileNotFound(path.to_path_buf(), e))?;

    //now strip comments from the args file
    let args_file_contents =
        comment::shell::strip(args).map_err(|e| AppError::ArgsFileParse(path.to_path_buf(), e.to_string()))?;

    //the arguments file needs to be split into args in the same way as the shell would do it.
    shell_words::split(&args_file_contents).map_err(|e| AppError::ArgsFileParse(path.to_path_buf(), e.to_string()))
}

//Also returns the --row-length value if the chosen layout has no use for it.
fn parse_layout(matches: &ArgMatches) -> Result<(Layout, Option<usize>), AppError> {
    let row_length = parse_in_range(matches, ROW_LENGTH, "row-length", MIN_ROW_LENGTH..=MAX_ROW_LENGTH)?;

    let method = if matches.is_present(VERTICAL) {
        "vertical"
    } else if matches.is_present(HORIZONTAL) {
        "horizontal"
    } else {
        matches.value_of(METHOD).unwrap_or("custom")
    };

    match method {
        "vertical" => Ok((Layout::Vertical, row_length)),
        "horizontal" => Ok((Layout::Horizontal, row_length)),
        "custom" => Ok((Layout::Custom { row_length }, None)),
        other => Err(AppError::InvalidArgValue {
            arg: "method",
            value: other.to_string(),
            expected: METHODS.join(", "),
        }),
    }
}

fn parse_separator(matches: &ArgMatches) -> Result<SeparatorCfg, AppError> {
    let color = match matches.value_of(SEPARATOR_COLOR) {
        Some(color) => parse_color(color).ok_or_else(|| AppError::ParseColor(color.to_string()))?,
        None => SeparatorCfg::default().color,
    };

    let width = parse_in_range(matches, SEPARATOR_WIDTH, "separator-width", 0..=u32::MAX)?
        .unwrap_or(DEFAULT_SEPARATOR_WIDTH);

    Ok(SeparatorCfg { color, width })
}

fn parse_size_cap(matches: &ArgMatches) -> Result<Option<SizeCap>, AppError> {
    //the bounds are validated even if unused, so that mistakes are not silently ignored.
    let max_width = parse_in_range(matches, SINGLE_IMAGE_MAX_WIDTH, "single-image-max-width", 1..=u32::MAX)?
        .unwrap_or(DEFAULT_SINGLE_IMAGE_MAX_WIDTH);
    let max_height = parse_in_range(matches, SINGLE_IMAGE_MAX_HEIGHT, "single-image-max-height", 1..=u32::MAX)?
        .unwrap_or(DEFAULT_SINGLE_IMAGE_MAX_HEIGHT);

    if matches.is_present(RESIZE_EVERY_IMAGE) {
        Ok(Some(SizeCap { max_width, max_height }))
    } else {
        Ok(None)
    }
}

fn parse_in_range<T>(
    matches: &ArgMatches,
    name: &str,
    flag: &'static str,
    range: RangeInclusive<T>,
) -> Result<Option<T>, AppError>
where
    T: FromStr + PartialOrd + Display,
{
    let value = match matches.value_of(name) {
        Some(value) => value,
        None => return Ok(None),
    };

    let invalid = || AppError::InvalidArgValue {
        arg: flag,
        value: value.to_string(),
        expected: format!("an integer from {} to {}", range.start(), range.end()),
    };

    match value.trim().parse::<T>() {
        Ok(parsed) if range.contains(&parsed) => Ok(Some(parsed)),
        _ => Err(invalid()),
    }
}
