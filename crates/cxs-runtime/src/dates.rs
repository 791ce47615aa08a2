//! Date utilities: canonical formatting, date math and day windows
//!
//! Date math follows the search backend syntax: an anchor (`now`, or an
//! absolute date followed by `||`) and a sequence of operations, each either
//! `+N<unit>`, `-N<unit>` or a rounding `/<unit>`. Units are `y`, `M`, `w`,
//! `d`, `h`/`H`, `m` and `s`. Rounding happens in the evaluation timezone.
//!
//! ```text
//! now-7d/d
//! 2024-03-15||+1M/M
//! ```

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, TimeZone,
    Timelike, Utc,
};
use cxs_core::condition::{parse_date_value, parse_iso_date};
use cxs_core::{PropertyValue, Value};

/// Canonical textual form of dates embedded in queries
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn format_iso(date: &DateTime<Utc>) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Resolve a date math expression (or a plain absolute date)
pub fn parse_date_math(expr: &str, now: DateTime<Utc>, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    let expr = expr.trim();
    let (anchor, mut rest) = if let Some(rest) = expr.strip_prefix("now") {
        (now, rest)
    } else if let Some((date, rest)) = expr.split_once("||") {
        (parse_iso_date(date)?, rest)
    } else {
        return parse_iso_date(expr);
    };

    let mut current = anchor.with_timezone(offset);
    while let Some(op) = rest.chars().next() {
        rest = &rest[op.len_utf8()..];
        match op {
            '/' => {
                let unit = rest.chars().next()?;
                rest = &rest[unit.len_utf8()..];
                current = round_down(current, unit)?;
            }
            '+' | '-' => {
                let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
                let amount: i64 = if digits == 0 { 1 } else { rest[..digits].parse().ok()? };
                rest = &rest[digits..];
                let unit = rest.chars().next()?;
                rest = &rest[unit.len_utf8()..];
                let amount = if op == '-' { -amount } else { amount };
                current = add_units(current, amount, unit)?;
            }
            _ => return None,
        }
    }
    Some(current.with_timezone(&Utc))
}

fn add_units(date: DateTime<FixedOffset>, amount: i64, unit: char) -> Option<DateTime<FixedOffset>> {
    let months = |n: i64| -> Option<DateTime<FixedOffset>> {
        let m = Months::new(u32::try_from(n.unsigned_abs()).ok()?);
        if n >= 0 {
            date.checked_add_months(m)
        } else {
            date.checked_sub_months(m)
        }
    };
    match unit {
        'y' => months(amount.checked_mul(12)?),
        'M' => months(amount),
        'w' => date.checked_add_signed(Duration::try_weeks(amount)?),
        'd' => date.checked_add_signed(Duration::try_days(amount)?),
        'h' | 'H' => date.checked_add_signed(Duration::try_hours(amount)?),
        'm' => date.checked_add_signed(Duration::try_minutes(amount)?),
        's' => date.checked_add_signed(Duration::try_seconds(amount)?),
        _ => None,
    }
}

fn round_down(date: DateTime<FixedOffset>, unit: char) -> Option<DateTime<FixedOffset>> {
    let local = date.naive_local();
    let day = local.date();
    let rounded: NaiveDateTime = match unit {
        'y' => NaiveDate::from_ymd_opt(day.year(), 1, 1)?.and_hms_opt(0, 0, 0)?,
        'M' => NaiveDate::from_ymd_opt(day.year(), day.month(), 1)?.and_hms_opt(0, 0, 0)?,
        'w' => {
            let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
            monday.and_hms_opt(0, 0, 0)?
        }
        'd' => day.and_hms_opt(0, 0, 0)?,
        'h' | 'H' => day.and_hms_opt(local.hour(), 0, 0)?,
        'm' => day.and_hms_opt(local.hour(), local.minute(), 0)?,
        's' => day.and_hms_opt(local.hour(), local.minute(), local.second())?,
        _ => return None,
    };
    date.offset().from_local_datetime(&rounded).single()
}

/// The half-open window `[start of day, start of next day)` containing `date`
/// in the given timezone
pub fn day_window(date: &DateTime<Utc>, offset: &FixedOffset) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = round_down(date.with_timezone(offset), 'd')?;
    let end = add_units(start, 1, 'd')?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Resolve a value holding a date, epoch millis, an ISO-8601 string or a
/// date math expression
pub fn resolve_date(value: &Value, now: DateTime<Utc>, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_math(s, now, offset),
        other => parse_date_value(other),
    }
}

/// Absolute date of a typed comparison value, if it denotes one
pub fn property_value_date(
    value: &PropertyValue,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> Option<DateTime<Utc>> {
    match value {
        PropertyValue::Date(d) => Some(*d),
        PropertyValue::DateExpr(expr) | PropertyValue::Str(expr) => parse_date_math(expr, now, offset),
        PropertyValue::Int(millis) => Utc.timestamp_millis_opt(*millis).single(),
        PropertyValue::Dbl(_) => None,
    }
}
