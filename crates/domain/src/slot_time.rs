// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The temporal key of an engagement.
//!
//! Slot times are wall-clock instants interpreted as UTC. They are always
//! persisted in one canonical form (`YYYY-MM-DDTHH:MM:SS`) so that the
//! `(band, slot)` uniqueness constraint compares equal instants as equal
//! strings, and so that lexical order matches chronological order.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const SECONDS_T: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const MINUTES_T: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const SECONDS_SPACE: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const MINUTES_SPACE: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const DATE_ONLY: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// A band's slot instant, second precision, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SlotTime(PrimitiveDateTime);

impl SlotTime {
    /// Wraps an already-constructed date/time.
    #[must_use]
    pub const fn new(value: PrimitiveDateTime) -> Self {
        Self(value)
    }

    /// The slot time of an instant, taken in UTC.
    #[must_use]
    pub fn from_instant(instant: OffsetDateTime) -> Self {
        let utc: OffsetDateTime = instant.to_offset(UtcOffset::UTC);
        Self(PrimitiveDateTime::new(utc.date(), utc.time()))
    }

    /// Parses a slot time from user or database input.
    ///
    /// Accepted forms are `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DDTHH:MM`, the same
    /// two with a space instead of `T`, and a bare `YYYY-MM-DD` (midnight).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateParseError` if no accepted form matches.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed: &str = input.trim();

        for format in [SECONDS_T, MINUTES_T, SECONDS_SPACE, MINUTES_SPACE] {
            if let Ok(value) = PrimitiveDateTime::parse(trimmed, format) {
                return Ok(Self(value));
            }
        }

        Date::parse(trimmed, DATE_ONLY)
            .map(|date| Self(date.midnight()))
            .map_err(|e| DomainError::DateParseError {
                date_string: input.to_string(),
                error: e.to_string(),
            })
    }

    /// Rejects slot times that are not strictly after `now`.
    ///
    /// `now` is passed in rather than read here so callers and tests
    /// control the clock.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SlotNotInFuture` if the slot is at or before `now`.
    pub fn ensure_future(&self, now: OffsetDateTime) -> Result<(), DomainError> {
        if self.0.assume_utc() > now {
            Ok(())
        } else {
            Err(DomainError::SlotNotInFuture {
                slot: self.canonical(),
            })
        }
    }

    /// The canonical persisted form.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }

    #[must_use]
    pub const fn value(&self) -> PrimitiveDateTime {
        self.0
    }
}

impl std::fmt::Display for SlotTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl From<SlotTime> for String {
    fn from(slot: SlotTime) -> Self {
        slot.canonical()
    }
}

impl TryFrom<String> for SlotTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
