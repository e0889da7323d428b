use crate::config::RenameOptions;
use crate::error::RenameError;
use crate::formatter::{choose_delimiter, format_stamp};
use crate::matcher::{classify, NameClass};
use crate::stamp::{ParsedStamp, StampFields, StampKind, StampStyle};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// New name computed for one entry. Nothing is touched on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenamePlan {
    pub original_name: String,
    pub new_name: String,
    pub changed: bool,
}

impl RenamePlan {
    pub fn new(original_name: &str, new_name: String) -> Self {
        Self {
            changed: new_name != original_name,
            original_name: original_name.to_string(),
            new_name,
        }
    }

    pub fn unchanged(name: &str) -> Self {
        Self::new(name, name.to_string())
    }
}

/// Computes the stamped name for `name`.
///
/// An existing stamp is kept, corrected or converted to `options.style`.
/// `timestamp` is only called when a stamp has to be derived from scratch:
/// the name has no stamp, its stamp is not recognized, or corrections are off.
pub fn plan_add_stamp<F>(
    name: &str,
    options: &RenameOptions,
    timestamp: F,
) -> Result<RenamePlan, RenameError>
where
    F: FnOnce() -> Result<DateTime<Local>, RenameError>,
{
    if !options.corrections {
        debug!("\"{name}\": corrections are off, deriving a new stamp");
        return derive_from_timestamp(name, options, timestamp);
    }

    match classify(name) {
        NameClass::NoStamp => {
            debug!("\"{name}\" has no stamp");
            derive_from_timestamp(name, options, timestamp)
        }
        NameClass::Unrecognized => {
            debug!("\"{name}\" does not match any known stamp layout");
            derive_from_timestamp(name, options, timestamp)
        }
        NameClass::Stamped(stamp) => Ok(convert_existing(name, &stamp, options)),
    }
}

fn convert_existing(name: &str, stamp: &ParsedStamp, options: &RenameOptions) -> RenamePlan {
    debug!("\"{name}\" matches the {:?} layout", stamp.kind);

    match stamp.kind {
        StampKind::WithTimeSeconds | StampKind::WithTimeNoSeconds => {
            if options.style == StampStyle::WithTime {
                correct_time_separators(name, stamp)
            } else {
                warn!("\"{name}\": the time of day is lost by this conversion");
                reformat(name, stamp, options)
            }
        }
        StampKind::Standard => match options.style {
            StampStyle::Compact | StampStyle::Month | StampStyle::WithTime => {
                reformat(name, stamp, options)
            }
            StampStyle::Standard | StampStyle::Short => {
                debug!("\"{name}\" keeps its standard stamp");
                RenamePlan::unchanged(name)
            }
        },
        // A two-digit year is never taken as final, so short stamps are always rebuilt.
        StampKind::Short => reformat(name, stamp, options),
        kind if kind.style() == options.style => {
            debug!("\"{name}\" already has the requested layout");
            RenamePlan::unchanged(name)
        }
        StampKind::Month => {
            info!("\"{name}\" has no day information, using \"00\" for the conversion");
            reformat(name, stamp, options)
        }
        _ => reformat(name, stamp, options),
    }
}

fn correct_time_separators(name: &str, stamp: &ParsedStamp) -> RenamePlan {
    let canonical = stamp
        .separators
        .map(|separators| separators.is_canonical())
        .unwrap_or(true);
    if canonical {
        debug!("\"{name}\" already uses the canonical time separators");
        return RenamePlan::unchanged(name);
    }

    debug!("\"{name}\": rewriting the time separators");
    let mut new_name = format_stamp(StampStyle::WithTime, &stamp.fields);
    new_name.push(stamp.delimiter);
    new_name.push_str(stamp.remainder(name));
    RenamePlan::new(name, new_name)
}

fn reformat(name: &str, stamp: &ParsedStamp, options: &RenameOptions) -> RenamePlan {
    let fields = stamp.fields.without_time();
    let rest = stamp.remainder(name);
    debug!(
        "\"{name}\": year {} month {:02} day {:02}",
        fields.year, fields.month, fields.day
    );
    RenamePlan::new(name, assemble(options, &fields, rest))
}

fn derive_from_timestamp<F>(
    name: &str,
    options: &RenameOptions,
    timestamp: F,
) -> Result<RenamePlan, RenameError>
where
    F: FnOnce() -> Result<DateTime<Local>, RenameError>,
{
    let date = timestamp()?;
    let fields = StampFields::from_local(&date);
    Ok(RenamePlan::new(name, assemble(options, &fields, name)))
}

fn assemble(options: &RenameOptions, fields: &StampFields, rest: &str) -> String {
    let stamp = format_stamp(options.style, fields);
    let delimiter = choose_delimiter(rest, options.delimiter.as_deref());
    format!("{stamp}{delimiter}{rest}")
}
