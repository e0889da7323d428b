use crate::matcher::CATALOG;
use crate::planner::RenamePlan;
use tracing::{debug, warn};

/// Strips a recognized leading stamp from `name`.
///
/// Names without a known stamp are returned unchanged, and so are names that
/// consist of nothing but a stamp.
pub fn remove_stamp(name: &str) -> RenamePlan {
    let Some(stamp) = CATALOG.iter().find_map(|matcher| matcher.try_match(name)) else {
        debug!("\"{name}\" carries no known stamp");
        return RenamePlan::unchanged(name);
    };

    let rest = stamp.remainder(name).trim();
    if rest.is_empty() {
        warn!("\"{name}\" is only a stamp, keeping the name");
        return RenamePlan::unchanged(name);
    }

    debug!("\"{name}\": removing the {:?} stamp", stamp.kind);
    RenamePlan::new(name, rest.to_string())
}
