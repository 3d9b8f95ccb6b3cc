//! `date` header freshness.
//!
//! A signature that covers `date` is only accepted while that date is within
//! the configured clock-skew tolerance of the verifier's clock. Without this
//! check a captured request could be replayed indefinitely.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::error::AuthError;

/// IMF-fixdate, the preferred HTTP-date form.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

const RFC850_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Parse an HTTP-date in any of the three forms RFC 7231 requires recipients
/// to accept.
#[must_use]
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(value, RFC850_FORMAT) {
        return Some(date.and_utc());
    }
    // asctime pads single-digit days with a space
    let collapsed = value.split_ascii_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&collapsed, ASCTIME_FORMAT)
        .ok()
        .map(|date| date.and_utc())
}

/// Check that `value` is an HTTP-date within `clock_skew` of `now`, in
/// either direction.
///
/// # Errors
///
/// Returns [`AuthError::StaleOrInvalidDate`] if the value cannot be parsed or
/// falls outside the tolerance.
pub fn check_date_freshness(
    value: &str,
    now: DateTime<Utc>,
    clock_skew: TimeDelta,
) -> Result<DateTime<Utc>, AuthError> {
    let date = parse_http_date(value)
        .ok_or_else(|| AuthError::StaleOrInvalidDate(format!("unparsable date {value:?}")))?;

    let drift = (now - date).abs();
    if drift > clock_skew {
        return Err(AuthError::StaleOrInvalidDate(format!(
            "date is {}s away from server time",
            drift.num_seconds()
        )));
    }

    Ok(date)
}
