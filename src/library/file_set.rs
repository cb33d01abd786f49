use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    result::Result,
};

use itertools::{Either::*, Itertools};
use thiserror::Error;
use walkdir::WalkDir;

use super::{definitions::FORMAT_TOKENS, output::is_output_artifact};

#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileSetError {
    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectoryError(PathBuf),

    #[error("File enumeration failed: {0}")]
    EnumerationError(String),
}

impl From<walkdir::Error> for FileSetError {
    fn from(e: walkdir::Error) -> Self {
        Self::EnumerationError(format!("{}", e))
    }
}

/// How a file name is tested against the image format tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The token may appear anywhere in the file name, so `jpgfoo.txt` is selected.
    Substring,
    /// The token must be the file extension.
    Extension,
}

impl Default for MatchMode {
    fn default() -> Self {
        Self::Substring
    }
}

/// The image files found directly inside one directory, in file name order.
pub struct FileSet {
    source_dir: PathBuf,
    match_mode: MatchMode,
    enumerated: bool,
    enumerated_paths: Vec<PathBuf>,
}

impl FileSet {
    pub fn new(source_dir: impl AsRef<Path>, match_mode: MatchMode) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            match_mode,
            enumerated: false,
            enumerated_paths: Default::default(),
        }
    }

    /// Lists the directory. Entries which could not be read are returned alongside the paths
    /// rather than aborting the listing.
    pub fn enumerate_from_fs(&mut self) -> Result<(&Vec<PathBuf>, Vec<FileSetError>), FileSetError> {
        if !self.enumerated {
            match self.enumerate_from_fs_inner() {
                Ok(errs) => {
                    self.enumerated = true;
                    Ok((&self.enumerated_paths, errs))
                }
                Err(fatal_error) => Err(fatal_error),
            }
        } else {
            Ok((&self.enumerated_paths, Default::default()))
        }
    }

    fn enumerate_from_fs_inner(&mut self) -> Result<Vec<FileSetError>, FileSetError> {
        use FileSetError::*;

        if !self.source_dir.exists() {
            return Err(PathNotFoundError(self.source_dir.clone()));
        }
        if !self.source_dir.is_dir() {
            return Err(NotADirectoryError(self.source_dir.clone()));
        }

        //only the top level of the directory is searched.
        let paths_to_enumerate = WalkDir::new(&self.source_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter(|dir_entry_res| match &dir_entry_res {
                Ok(dir_entry) => self.should_keep(dir_entry),
                Err(_) => true,
            });

        let (mut enumerated_paths, loading_errors): (Vec<_>, Vec<_>) = paths_to_enumerate
            .map(|dir_entry_res| dir_entry_res.map(|dir_entry| dir_entry.path().to_path_buf()))
            .partition_map(|dir_entry_res| match dir_entry_res {
                Ok(src_path) => Left(src_path),
                Err(e) => Right(e.into()),
            });

        //sort is required for deterministic outputs.
        enumerated_paths.sort();
        enumerated_paths.dedup();

        trace!(
            target: "file_set",
            "Selected from {}: {}",
            self.source_dir.display(),
            enumerated_paths.iter().map(|p| p.display()).join(", ")
        );

        self.enumerated_paths = enumerated_paths;

        Ok(loading_errors)
    }

    fn should_keep(&self, x: &walkdir::DirEntry) -> bool {
        x.path().is_file() && self.name_matches(x.file_name())
    }

    fn name_matches(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy().to_lowercase();

        //never pick up the output of a previous run.
        if is_output_artifact(&name) {
            return false;
        }

        match self.match_mode {
            MatchMode::Substring => FORMAT_TOKENS.iter().any(|&token| name.contains(token)),
            MatchMode::Extension => Path::new(&name)
                .extension()
                .map(OsStr::to_string_lossy)
                .map_or(false, |ext| FORMAT_TOKENS.iter().any(|&token| ext == token)),
        }
    }
}
