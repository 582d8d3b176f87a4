//! Magazine edition lifecycle constants and validation helpers.
//!
//! An edition moves `draft -> active -> published`. Completion is a separate
//! flag that also forces `published`; reverting a confirmation on a
//! completed edition reopens it as `active`.

use crate::deadlines::schedule::first_monday;
use crate::types::CalendarDate;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_PUBLISHED: &str = "published";

/// All valid edition status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_ACTIVE, STATUS_PUBLISHED];

/// Statuses an administrator may set directly. `published` is reached only
/// by completing the edition.
pub const MANUAL_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_ACTIVE];

/// Status an edition returns to when a revert reopens it.
pub const REOPENED_STATUS: &str = STATUS_ACTIVE;

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// Validate a status supplied through an edition update.
pub fn validate_manual_status(status: &str) -> Result<(), String> {
    validate_status(status)?;
    if !MANUAL_STATUSES.contains(&status) {
        return Err(format!(
            "Status '{status}' is set by completing the edition. Must be one of: {}",
            MANUAL_STATUSES.join(", ")
        ));
    }
    Ok(())
}

/// Validate the publication link supplied when completing an edition.
pub fn validate_publication_link(link: &str) -> Result<(), String> {
    if link.trim().is_empty() {
        return Err("A publication link is required".to_string());
    }
    Ok(())
}

/// Resolve the publication date for a new edition.
///
/// An explicit date always wins. Otherwise the first Monday of the given
/// target month is used.
pub fn resolve_publication_date(
    explicit: Option<CalendarDate>,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<CalendarDate, String> {
    if let Some(date) = explicit {
        return Ok(date);
    }
    match (year, month) {
        (Some(year), Some(month)) => first_monday(year, month)
            .ok_or_else(|| format!("Invalid target month {year}-{month:02}")),
        _ => Err("Either publication_date or year and month are required".to_string()),
    }
}
