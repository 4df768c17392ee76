//! Resolving "today" in the server's configured time zone.
//!
//! Transactions carry plain calendar dates, so monthly buckets never depend on
//! a time zone. The only zone-dependent value is the reference date used for
//! time range filtering, which is computed here once per request and then
//! passed around explicitly.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The time zone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// Get the current UTC offset of `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not a known canonical time zone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's calendar date in `canonical_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the time zone name is not valid.
pub fn today_in(canonical_timezone: &str) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))?;

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}
