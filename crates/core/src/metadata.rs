use crate::error::RenameError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeKind {
    #[default]
    Modification,
    Creation,
}

/// Supplies the local wall-clock time a stamp is derived from.
pub trait TimestampSource {
    fn timestamp(&self, path: &Path, kind: TimeKind) -> Result<DateTime<Local>, RenameError>;
}

/// Creation means birth time, as reported by macOS and Windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct BirthTimeSource;

/// Creation means the inode change time, the closest most Unix systems offer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeTimeSource;

impl TimestampSource for BirthTimeSource {
    fn timestamp(&self, path: &Path, kind: TimeKind) -> Result<DateTime<Local>, RenameError> {
        read_time(path, |meta| match kind {
            TimeKind::Modification => meta.modified(),
            TimeKind::Creation => meta.created(),
        })
    }
}

impl TimestampSource for ChangeTimeSource {
    fn timestamp(&self, path: &Path, kind: TimeKind) -> Result<DateTime<Local>, RenameError> {
        read_time(path, |meta| match kind {
            TimeKind::Modification => meta.modified(),
            TimeKind::Creation => change_time(meta),
        })
    }
}

/// Picks the creation-time flavor of the running platform.
pub fn default_source() -> Box<dyn TimestampSource> {
    if cfg!(any(target_os = "macos", target_os = "ios", windows)) {
        Box::new(BirthTimeSource)
    } else {
        Box::new(ChangeTimeSource)
    }
}

fn read_time(
    path: &Path,
    pick: impl FnOnce(&fs::Metadata) -> io::Result<SystemTime>,
) -> Result<DateTime<Local>, RenameError> {
    let time = fs::metadata(path)
        .and_then(|meta| pick(&meta))
        .map_err(|source| RenameError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(DateTime::from(time))
}

#[cfg(unix)]
fn change_time(meta: &fs::Metadata) -> io::Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = meta.ctime();
    let nanos = u32::try_from(meta.ctime_nsec()).unwrap_or(0);
    let time = if secs >= 0 {
        UNIX_EPOCH + Duration::new(secs.unsigned_abs(), nanos)
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
    };
    Ok(time)
}

#[cfg(not(unix))]
fn change_time(meta: &fs::Metadata) -> io::Result<SystemTime> {
    meta.created()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn modification_time_is_read_as_local_wall_clock() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("report.txt");
        let file = File::create(&path).expect("file must be creatable");
        let mtime = Local
            .with_ymd_and_hms(2021, 9, 21, 10, 30, 0)
            .single()
            .expect("unambiguous local time");
        file.set_modified(SystemTime::from(mtime))
            .expect("mtime must be settable");

        for source in [
            Box::new(BirthTimeSource) as Box<dyn TimestampSource>,
            Box::new(ChangeTimeSource),
        ] {
            let read = source
                .timestamp(&path, TimeKind::Modification)
                .expect("mtime must be readable");
            assert_eq!(read, mtime);
        }
    }

    #[test]
    fn change_time_is_available_for_fresh_files() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("fresh.txt");
        File::create(&path).expect("file must be creatable");

        let ctime = ChangeTimeSource
            .timestamp(&path, TimeKind::Creation)
            .expect("ctime must be readable");
        assert!(ctime.year() >= 2020);
    }

    #[test]
    fn missing_path_is_a_metadata_error() {
        let temp = tempdir().expect("tempdir");
        let err = default_source()
            .timestamp(&temp.path().join("missing"), TimeKind::Modification)
            .expect_err("missing file must fail");
        assert!(matches!(err, RenameError::Metadata { .. }));
    }
}
