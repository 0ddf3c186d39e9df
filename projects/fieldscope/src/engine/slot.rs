use crate::error::EngineError;
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Monitoring window length, `from` and `to` both included
pub const SLOT_LENGTH_DAYS: u64 = 14;
const SLOT_END_OFFSET: Days = Days::new(SLOT_LENGTH_DAYS - 1);

/// Earliest anchor the field calendar offers.
pub fn min_slot_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Calendar date of a timestamp in UTC. Slots never use local time.
pub fn utc_calendar_date<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> NaiveDate {
    timestamp.with_timezone(&Utc).date_naive()
}

/// Parses `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its UTC date.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, EngineError> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(input)
        .map(|ts| utc_calendar_date(&ts))
        .map_err(|_| EngineError::InvalidDateRange(format!("unrecognized date {:?}", input)))
}

/// serde helper for calendar dates that may arrive as timestamps
pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(serde::de::Error::custom)
}

/// Same as `deserialize_date`; missing, null or blank values become `None`.
pub fn deserialize_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_calendar_date(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// The fixed 14-day monitoring window of a field
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Slot {
    /// Moves the window to a new anchor and recomputes `to`. The slot is left
    /// as it was when the anchor is rejected.
    pub fn reanchor(&mut self, from: NaiveDate) -> Result<(), EngineError> {
        *self = compute_slot(from)?;
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Every date of the window in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.from.iter_days().take(SLOT_LENGTH_DAYS as usize)
    }
}

/// Builds the window starting at `from`: `to = from + 13 days`.
pub fn compute_slot(from: NaiveDate) -> Result<Slot, EngineError> {
    if from < min_slot_date() {
        return Err(EngineError::InvalidDateRange(format!(
            "slot cannot start before {}",
            min_slot_date()
        )));
    }
    let to = from
        .checked_add_days(SLOT_END_OFFSET)
        .ok_or_else(|| EngineError::InvalidDateRange(format!("slot starting {} overflows", from)))?;
    Ok(Slot { from, to })
}

/// Validates a window as submitted by a form. A missing `to` is recomputed,
/// an explicit one must be exactly 13 days after `from`.
pub fn validate_slot(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Slot, EngineError> {
    let from = from.ok_or_else(|| {
        EngineError::InvalidDateRange("a 14-day slot needs a start date".to_string())
    })?;
    let slot = compute_slot(from)?;
    match to {
        Some(to) if to != slot.to => Err(EngineError::InvalidDateRange(format!(
            "slot starting {} must end on {}, got {}",
            slot.from, slot.to, to
        ))),
        _ => Ok(slot),
    }
}

pub fn is_valid_slot(from: NaiveDate, to: NaiveDate) -> bool {
    validate_slot(Some(from), Some(to)).is_ok()
}
