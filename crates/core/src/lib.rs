mod apply;
mod config;
mod error;
mod formatter;
mod matcher;
mod metadata;
mod planner;
mod remover;
mod stamp;

pub use apply::{check_name_length, run_batch, BatchReport, BatchStats, ItemOutcome, ItemStatus};
pub use config::{EntryFilter, RenameMode, RenameOptions, StyleFlags, MAX_PATHLENGTH};
pub use error::RenameError;
pub use formatter::{choose_delimiter, format_stamp};
pub use matcher::{classify, match_stamp, NameClass, StampMatcher, CATALOG};
pub use metadata::{default_source, BirthTimeSource, ChangeTimeSource, TimeKind, TimestampSource};
pub use planner::{plan_add_stamp, RenamePlan};
pub use remover::remove_stamp;
pub use stamp::{ParsedStamp, StampFields, StampKind, StampStyle, StampTime, TimeSeparators};
