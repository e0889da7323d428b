use crate::config::{EntryFilter, RenameMode, RenameOptions};
use crate::error::RenameError;
use crate::metadata::TimestampSource;
use crate::planner::{plan_add_stamp, RenamePlan};
use crate::remover::remove_stamp;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemStatus {
    Renamed,
    Previewed,
    Unchanged,
    SkippedByFilter,
    Broken,
    MetadataFailed,
    RenameFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub path: PathBuf,
    pub new_name: Option<String>,
    pub status: ItemStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchStats {
    pub processed: usize,
    pub renamed: usize,
    pub previewed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub broken: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchReport {
    pub items: Vec<ItemOutcome>,
    pub stats: BatchStats,
}

impl BatchReport {
    fn record(&mut self, outcome: ItemOutcome) {
        self.stats.processed += 1;
        match outcome.status {
            ItemStatus::Renamed => self.stats.renamed += 1,
            ItemStatus::Previewed => self.stats.previewed += 1,
            ItemStatus::Unchanged => self.stats.unchanged += 1,
            ItemStatus::SkippedByFilter => self.stats.skipped += 1,
            ItemStatus::Broken => self.stats.broken += 1,
            ItemStatus::MetadataFailed | ItemStatus::RenameFailed => self.stats.failed += 1,
        }
        self.items.push(outcome);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

/// Stamps or unstamps every path in order.
///
/// Problems with a single entry are logged and recorded in the report. A new
/// name longer than `options.max_name_len` stops the whole batch with
/// [`RenameError::PathTooLong`] before anything else is renamed.
pub fn run_batch(
    paths: &[PathBuf],
    options: &RenameOptions,
    source: &dyn TimestampSource,
) -> Result<BatchReport> {
    options.validate()?;

    let mut report = BatchReport::default();
    for path in paths {
        debug!("handling item {}", path.display());
        let outcome = process_item(path, options, source)?;
        report.record(outcome);
    }
    Ok(report)
}

fn process_item(
    path: &Path,
    options: &RenameOptions,
    source: &dyn TimestampSource,
) -> Result<ItemOutcome> {
    let Some(kind) = entry_kind(path) else {
        let err = RenameError::BrokenEntry {
            path: path.to_path_buf(),
        };
        error!("{err}");
        return Ok(outcome(path, None, ItemStatus::Broken, Some(err.to_string())));
    };

    // Filters hold for stamp removal too, not only when adding stamps.
    if !passes_filter(kind, options.filter) {
        debug!("skipping {} because of the entry filter", path.display());
        return Ok(outcome(path, None, ItemStatus::SkippedByFilter, None));
    }

    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        let reason = format!("{}: name is not valid UTF-8 or empty", path.display());
        error!("{reason}");
        return Ok(outcome(path, None, ItemStatus::RenameFailed, Some(reason)));
    };

    let plan = match options.mode {
        RenameMode::RemoveStamp => remove_stamp(name),
        RenameMode::AddStamp => {
            match plan_add_stamp(name, options, || source.timestamp(path, options.time_kind)) {
                Ok(plan) => plan,
                Err(err) => {
                    error!("{err}");
                    return Ok(outcome(
                        path,
                        None,
                        ItemStatus::MetadataFailed,
                        Some(err.to_string()),
                    ));
                }
            }
        }
    };

    if !plan.changed {
        info!("{} … no modification", path.display());
        return Ok(outcome(path, None, ItemStatus::Unchanged, None));
    }

    check_name_length(&plan, options.max_name_len)?;

    let target = path.with_file_name(&plan.new_name);
    info!("{:<40}  →  {}", path.display(), plan.new_name);
    if options.dry_run {
        return Ok(outcome(
            path,
            Some(plan.new_name),
            ItemStatus::Previewed,
            None,
        ));
    }

    match rename_entry(path, &target) {
        Ok(()) => Ok(outcome(path, Some(plan.new_name), ItemStatus::Renamed, None)),
        Err(err) => {
            error!("{err:#}");
            Ok(outcome(
                path,
                Some(plan.new_name),
                ItemStatus::RenameFailed,
                Some(format!("{err:#}")),
            ))
        }
    }
}

/// Rejects new names the filesystem would refuse as too long.
pub fn check_name_length(plan: &RenamePlan, max: usize) -> Result<(), RenameError> {
    let length = plan.new_name.chars().count();
    if length > max {
        return Err(RenameError::PathTooLong {
            name: plan.new_name.clone(),
            length,
            max,
        });
    }
    Ok(())
}

fn rename_entry(from: &Path, to: &Path) -> Result<()> {
    if to.symlink_metadata().is_ok() {
        bail!("target already exists: {}", to.display());
    }
    fs::rename(from, to)
        .with_context(|| format!("could not rename {} to {}", from.display(), to.display()))
}

fn entry_kind(path: &Path) -> Option<EntryKind> {
    let meta = fs::metadata(path).ok()?;
    if meta.is_dir() {
        Some(EntryKind::Directory)
    } else if meta.is_file() {
        Some(EntryKind::File)
    } else {
        None
    }
}

fn passes_filter(kind: EntryKind, filter: EntryFilter) -> bool {
    match filter {
        EntryFilter::All => true,
        EntryFilter::FilesOnly => kind == EntryKind::File,
        EntryFilter::DirectoriesOnly => kind == EntryKind::Directory,
    }
}

fn outcome(
    path: &Path,
    new_name: Option<String>,
    status: ItemStatus,
    reason: Option<String>,
) -> ItemOutcome {
    ItemOutcome {
        path: path.to_path_buf(),
        new_name,
        status,
        reason,
    }
}
