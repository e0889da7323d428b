use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("invalid usage: {0}")]
    Usage(String),
    #[error("could not read a timestamp of {}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "the new name \"{name}\" would be {length} characters long which is greater than {max}; \
         please shorten the file name by at least {} characters and try again",
        overflow(.length, .max)
    )]
    PathTooLong {
        name: String,
        length: usize,
        max: usize,
    },
    #[error("{}: is no file or directory (broken link?)", .path.display())]
    BrokenEntry { path: PathBuf },
}

fn overflow(length: &usize, max: &usize) -> usize {
    length.saturating_sub(*max)
}
