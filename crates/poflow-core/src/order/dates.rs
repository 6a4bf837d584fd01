//! Order date parsing.

use chrono::{FixedOffset, NaiveDate};

use crate::error::AssemblyError;
use crate::template::patterns::ORDER_DATE_FORMAT;

/// Parse an order date in the strict `DD-MM-YY` form.
pub fn parse_order_date(text: &str) -> Result<NaiveDate, AssemblyError> {
    NaiveDate::parse_from_str(text.trim(), ORDER_DATE_FORMAT).map_err(|_| {
        AssemblyError::DateParse {
            value: text.to_string(),
        }
    })
}

/// Unix timestamp of midnight on `date` at the given offset from UTC.
pub fn midnight_timestamp(date: NaiveDate, utc_offset_minutes: i32) -> Option<i64> {
    let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    midnight
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.timestamp())
}

/// Parse an order date straight to its unix timestamp.
pub fn order_timestamp(text: &str, utc_offset_minutes: i32) -> Result<i64, AssemblyError> {
    let date = parse_order_date(text)?;
    midnight_timestamp(date, utc_offset_minutes).ok_or_else(|| AssemblyError::DateParse {
        value: text.to_string(),
    })
}
