use crate::error::RenameError;
use crate::metadata::TimeKind;
use crate::stamp::StampStyle;
use serde::{Deserialize, Serialize};

/// Longest name `rename(2)` reliably accepts.
pub const MAX_PATHLENGTH: usize = 255;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RenameMode {
    #[default]
    AddStamp,
    RemoveStamp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EntryFilter {
    #[default]
    All,
    FilesOnly,
    DirectoriesOnly,
}

/// Settings for one run, built once and shared read-only by every item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameOptions {
    pub mode: RenameMode,
    pub style: StampStyle,
    pub time_kind: TimeKind,
    pub delimiter: Option<String>,
    /// When false, existing stamps are ignored and a fresh one is always derived.
    pub corrections: bool,
    pub filter: EntryFilter,
    pub dry_run: bool,
    pub max_name_len: usize,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            mode: RenameMode::AddStamp,
            style: StampStyle::Standard,
            time_kind: TimeKind::Modification,
            delimiter: None,
            corrections: true,
            filter: EntryFilter::All,
            dry_run: false,
            max_name_len: MAX_PATHLENGTH,
        }
    }
}

/// Style flags as given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleFlags {
    pub compact: bool,
    pub short: bool,
    pub month: bool,
    pub withtime: bool,
}

impl StyleFlags {
    pub fn resolve(self) -> Result<StampStyle, RenameError> {
        let exclusive = [self.compact, self.month, self.withtime]
            .iter()
            .filter(|set| **set)
            .count();
        if exclusive > 1 {
            return Err(RenameError::Usage(
                "please use either the default, compact, month, or withtime format".to_string(),
            ));
        }

        Ok(if self.compact {
            StampStyle::Compact
        } else if self.short {
            StampStyle::Short
        } else if self.month {
            StampStyle::Month
        } else if self.withtime {
            StampStyle::WithTime
        } else {
            StampStyle::Standard
        })
    }
}

impl RenameOptions {
    pub fn validate(&self) -> Result<(), RenameError> {
        if self.max_name_len == 0 {
            return Err(RenameError::Usage(
                "the maximum name length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
