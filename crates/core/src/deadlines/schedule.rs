//! Deadline schedule calculator.
//!
//! Maps an edition's publication date to every named deadline date of both
//! content tracks. All arithmetic is calendar-day based and relative to the
//! publication date; weekends and holidays are not skipped.

use chrono::{Datelike, Duration};
use serde::Serialize;

use super::steps::ContentTrack;
use crate::types::CalendarDate;

// ---------------------------------------------------------------------------
// Offsets (days relative to the publication date)
// ---------------------------------------------------------------------------

pub const OFFSET_CLIENT_INITIAL: i64 = -35;
pub const OFFSET_SEND_TO_EDITION: i64 = -31;
pub const OFFSET_EDITION_START: i64 = -28;
pub const OFFSET_EDITION_END: i64 = -24;
pub const OFFSET_ALL_CHANGES_SENT: i64 = -21;
/// Falls on a Friday when the publication date is a Monday.
pub const OFFSET_CLIENT_CHANGES: i64 = -10;
pub const OFFSET_AD_CLIENT: i64 = -14;
pub const OFFSET_BOOK_ASSEMBLY_START: i64 = -7;
pub const OFFSET_BOOK_ASSEMBLY_END: i64 = -3;

/// Days remaining at or below which a deadline is urgent.
pub const URGENT_THRESHOLD_DAYS: i64 = 3;
/// Days remaining at or below which a deadline is a warning.
pub const WARNING_THRESHOLD_DAYS: i64 = 7;

/// Label returned by [`next_deadline`] once every milestone has passed.
pub const PUBLISHED_LABEL: &str = "Publicado";

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

/// Deadlines for technical articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalDeadlines {
    pub client_initial_deadline: CalendarDate,
    pub send_to_edition_deadline: CalendarDate,
    pub edition_start: CalendarDate,
    pub edition_end: CalendarDate,
    pub all_changes_sent: CalendarDate,
    pub client_changes_deadline: CalendarDate,
    pub book_assembly_start: CalendarDate,
    pub book_assembly_end: CalendarDate,
    pub publication: CalendarDate,
}

/// Deadlines for advertisements. Book assembly and publication match the
/// technical track; only the client deadline differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdDeadlines {
    pub client_deadline: CalendarDate,
    pub book_assembly_start: CalendarDate,
    pub book_assembly_end: CalendarDate,
    pub publication: CalendarDate,
}

/// Both tracks' deadlines for one publication date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadlineSchedule {
    pub technical: TechnicalDeadlines,
    pub ads: AdDeadlines,
}

/// The deadlines of a single track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackDeadlines {
    Technical(TechnicalDeadlines),
    Ad(AdDeadlines),
}

/// Names a date inside a track's deadline record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateKey {
    ClientInitial,
    SendToEdition,
    EditionStart,
    EditionEnd,
    AllChangesSent,
    ClientChanges,
    AdClient,
    BookAssemblyStart,
    BookAssemblyEnd,
    Publication,
}

impl DeadlineSchedule {
    pub fn for_track(&self, track: ContentTrack) -> TrackDeadlines {
        match track {
            ContentTrack::Technical => TrackDeadlines::Technical(self.technical),
            ContentTrack::Ad => TrackDeadlines::Ad(self.ads),
        }
    }
}

impl TrackDeadlines {
    /// Look up a date by key. Returns `None` for keys the track does not carry.
    pub fn date(&self, key: DateKey) -> Option<CalendarDate> {
        match self {
            TrackDeadlines::Technical(t) => match key {
                DateKey::ClientInitial => Some(t.client_initial_deadline),
                DateKey::SendToEdition => Some(t.send_to_edition_deadline),
                DateKey::EditionStart => Some(t.edition_start),
                DateKey::EditionEnd => Some(t.edition_end),
                DateKey::AllChangesSent => Some(t.all_changes_sent),
                DateKey::ClientChanges => Some(t.client_changes_deadline),
                DateKey::BookAssemblyStart => Some(t.book_assembly_start),
                DateKey::BookAssemblyEnd => Some(t.book_assembly_end),
                DateKey::Publication => Some(t.publication),
                DateKey::AdClient => None,
            },
            TrackDeadlines::Ad(a) => match key {
                DateKey::AdClient => Some(a.client_deadline),
                DateKey::BookAssemblyStart => Some(a.book_assembly_start),
                DateKey::BookAssemblyEnd => Some(a.book_assembly_end),
                DateKey::Publication => Some(a.publication),
                _ => None,
            },
        }
    }

    pub fn publication(&self) -> CalendarDate {
        match self {
            TrackDeadlines::Technical(t) => t.publication,
            TrackDeadlines::Ad(a) => a.publication,
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

fn offset(publication: CalendarDate, days: i64) -> CalendarDate {
    publication + Duration::days(days)
}

/// Derive every deadline date for both tracks from a publication date.
pub fn calculate_deadlines(publication: CalendarDate) -> DeadlineSchedule {
    let book_assembly_start = offset(publication, OFFSET_BOOK_ASSEMBLY_START);
    let book_assembly_end = offset(publication, OFFSET_BOOK_ASSEMBLY_END);

    DeadlineSchedule {
        technical: TechnicalDeadlines {
            client_initial_deadline: offset(publication, OFFSET_CLIENT_INITIAL),
            send_to_edition_deadline: offset(publication, OFFSET_SEND_TO_EDITION),
            edition_start: offset(publication, OFFSET_EDITION_START),
            edition_end: offset(publication, OFFSET_EDITION_END),
            all_changes_sent: offset(publication, OFFSET_ALL_CHANGES_SENT),
            client_changes_deadline: offset(publication, OFFSET_CLIENT_CHANGES),
            book_assembly_start,
            book_assembly_end,
            publication,
        },
        ads: AdDeadlines {
            client_deadline: offset(publication, OFFSET_AD_CLIENT),
            book_assembly_start,
            book_assembly_end,
            publication,
        },
    }
}

/// First Monday of the given month, or `None` for an invalid month.
pub fn first_monday(year: i32, month: u32) -> Option<CalendarDate> {
    let first = CalendarDate::from_ymd_opt(year, month, 1)?;
    let weekday = first.weekday().num_days_from_sunday();
    let days_to_add = match weekday {
        0 => 1,
        1 => 0,
        d => 8 - d,
    };
    Some(offset(first, i64::from(days_to_add)))
}

// ---------------------------------------------------------------------------
// Countdown helpers
// ---------------------------------------------------------------------------

/// Whole calendar days from `today` until `target`. Negative once passed.
pub fn days_until(target: CalendarDate, today: CalendarDate) -> i64 {
    (target - today).num_days()
}

/// Urgency band for a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Overdue,
    Urgent,
    Warning,
    Safe,
}

impl Urgency {
    pub fn from_days(days_remaining: i64) -> Self {
        if days_remaining < 0 {
            Urgency::Overdue
        } else if days_remaining <= URGENT_THRESHOLD_DAYS {
            Urgency::Urgent
        } else if days_remaining <= WARNING_THRESHOLD_DAYS {
            Urgency::Warning
        } else {
            Urgency::Safe
        }
    }
}

/// The next date-based milestone of a track, regardless of confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextDeadline {
    pub name: &'static str,
    pub date: CalendarDate,
    pub days_remaining: i64,
}

/// Informational milestones per track, in display order. The technical list
/// keeps client changes ahead of the earlier "changes sent" date, so the first
/// upcoming match is never "changes sent".
fn milestones(track: ContentTrack) -> &'static [(&'static str, DateKey)] {
    match track {
        ContentTrack::Technical => &[
            ("Deadline cliente inicial", DateKey::ClientInitial),
            ("Envío a edición", DateKey::SendToEdition),
            ("Edición completa", DateKey::EditionEnd),
            ("Cambios cliente", DateKey::ClientChanges),
            ("Cambios enviados", DateKey::AllChangesSent),
            ("Montaje libro", DateKey::BookAssemblyEnd),
            ("Publicación", DateKey::Publication),
        ],
        ContentTrack::Ad => &[
            ("Deadline cliente", DateKey::AdClient),
            ("Montaje libro", DateKey::BookAssemblyEnd),
            ("Publicación", DateKey::Publication),
        ],
    }
}

/// First milestone of the track dated today or later.
pub fn next_deadline(
    publication: CalendarDate,
    track: ContentTrack,
    today: CalendarDate,
) -> NextDeadline {
    let deadlines = calculate_deadlines(publication).for_track(track);
    milestones(track)
        .iter()
        .filter_map(|&(name, key)| deadlines.date(key).map(|date| (name, date)))
        .find(|&(_, date)| date >= today)
        .map(|(name, date)| NextDeadline {
            name,
            date,
            days_remaining: days_until(date, today),
        })
        .unwrap_or(NextDeadline {
            name: PUBLISHED_LABEL,
            date: publication,
            days_remaining: 0,
        })
}
