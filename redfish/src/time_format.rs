// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Maintenance-window instant normalization
//!
//! The device stores window boundaries as ISO-8601 UTC instants with an
//! explicit `Z` suffix. Callers hand in one of two human formats:
//!
//! - slash-delimited: `07/21/2021 5:00PM`
//! - textual month: `Jul 21 2021 5:00PM`
//!
//! [`normalize_instant`] parses either, treats the value as UTC wall-clock
//! time, and renders the canonical `2021-07-21T17:00:00Z` form used for
//! every comparison and submission.

use std::convert::TryFrom;
use std::error::Error as StdError;
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::Date;
use time::Month;
use time::PrimitiveDateTime;
use time::Time;

/// Failure to normalize a maintenance-window instant.
#[derive(Debug)]
pub enum TimeFormatError {
    /// The input does not match either accepted format; carries the input.
    Malformed(String),
    /// A parsed component is out of range (month 13, hour 25, ...).
    Component(time::error::ComponentRange),
}

impl fmt::Display for TimeFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(input) => write!(f, "unrecognized date/time format: {input}"),
            Self::Component(e) => write!(f, "date/time component out of range: {e}"),
        }
    }
}

impl StdError for TimeFormatError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Component(e) => Some(e),
            Self::Malformed(_) => None,
        }
    }
}

impl From<time::error::ComponentRange> for TimeFormatError {
    fn from(err: time::error::ComponentRange) -> Self {
        Self::Component(err)
    }
}

fn malformed(input: &str) -> TimeFormatError {
    TimeFormatError::Malformed(input.to_string())
}

fn month_from_short(token: &str) -> Option<Month> {
    match token.to_ascii_lowercase().as_str() {
        "jan" => Some(Month::January),
        "feb" => Some(Month::February),
        "mar" => Some(Month::March),
        "apr" => Some(Month::April),
        "may" => Some(Month::May),
        "jun" => Some(Month::June),
        "jul" => Some(Month::July),
        "aug" => Some(Month::August),
        "sep" => Some(Month::September),
        "oct" => Some(Month::October),
        "nov" => Some(Month::November),
        "dec" => Some(Month::December),
        _ => None,
    }
}

/// Parse a 12-hour clock token like `5:00PM` into 24-hour (hour, minute).
fn parse_clock(token: &str, input: &str) -> Result<(u8, u8), TimeFormatError> {
    let (hour_str, rest) = token.split_once(':').ok_or_else(|| malformed(input))?;
    if rest.len() < 4 {
        return Err(malformed(input));
    }
    let (minute_str, period) = rest.split_at(2);

    let hour: u8 = hour_str.parse().map_err(|_| malformed(input))?;
    let minute: u8 = minute_str.parse().map_err(|_| malformed(input))?;
    if hour == 0 || hour > 12 {
        return Err(malformed(input));
    }

    let hour = match period.to_ascii_uppercase().as_str() {
        "AM" => hour % 12,
        "PM" => hour % 12 + 12,
        _ => return Err(malformed(input)),
    };
    Ok((hour, minute))
}

/// Normalize an input instant to ISO-8601 UTC with an explicit `Z` suffix.
///
/// # Errors
///
/// Returns [`TimeFormatError`] when the input matches neither accepted
/// format or a component is out of range.
pub fn normalize_instant(input: &str) -> Result<String, TimeFormatError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();

    let (year, month, day, clock) = if input.contains('/') {
        // 07/21/2021 5:00PM
        let &[date, clock] = tokens.as_slice() else {
            return Err(malformed(input));
        };
        let mut parts = date.split('/');
        let month: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| malformed(input))?;
        let day: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| malformed(input))?;
        let year: i32 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| malformed(input))?;
        if parts.next().is_some() {
            return Err(malformed(input));
        }
        let month = Month::try_from(month)?;
        (year, month, day, clock)
    } else {
        // Jul 21 2021 5:00PM
        let &[month, day, year, clock] = tokens.as_slice() else {
            return Err(malformed(input));
        };
        let month = month_from_short(month).ok_or_else(|| malformed(input))?;
        let day: u8 = day.parse().map_err(|_| malformed(input))?;
        let year: i32 = year.parse().map_err(|_| malformed(input))?;
        (year, month, day, clock)
    };

    let (hour, minute) = parse_clock(clock, input)?;
    let date = Date::from_calendar_date(year, month, day)?;
    let time = Time::from_hms(hour, minute, 0)?;

    PrimitiveDateTime::new(date, time)
        .assume_utc()
        .format(&Rfc3339)
        .map_err(|_| malformed(input))
}
