//! Time binder: parses one raw string into a temporal field.
//!
//! Layouts use chrono `strftime` syntax and default to RFC 3339. The zone is
//! picked from the field directives: `time_utc` first, then `time_location`,
//! then the binder's configured zone (local time unless configured).

use std::fmt;

use chrono::format::ParseErrorKind;
use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use thiserror::Error;

use crate::error::ConversionError;
use crate::field::Temporal;
use crate::resolver::TimeDirectives;

/// Name shown in errors when no layout directive is set.
const RFC3339: &str = "RFC 3339";

/// Zone a temporal value is parsed and expressed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Zone {
    Utc,
    #[default]
    Local,
    Named(Tz),
}

impl Zone {
    /// Resolve a zone by name.
    ///
    /// `UTC` (or an empty name) and `Local` are recognised besides IANA names.
    pub fn resolve(name: &str) -> Result<Zone, String> {
        match name {
            "" | "UTC" => Ok(Zone::Utc),
            "Local" => Ok(Zone::Local),
            _ => name
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|e| e.to_string()),
        }
    }

    /// Express an instant in this zone.
    fn express(&self, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            Zone::Utc => instant.with_timezone(&Utc).fixed_offset(),
            Zone::Local => instant.with_timezone(&Local).fixed_offset(),
            Zone::Named(tz) => instant.with_timezone(tz).fixed_offset(),
        }
    }

    /// Interpret a wall-clock time in this zone, taking the earliest instant
    /// when the time is ambiguous.
    fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Utc => Utc.from_local_datetime(naive).earliest().map(|d| d.fixed_offset()),
            Zone::Local => Local.from_local_datetime(naive).earliest().map(|d| d.fixed_offset()),
            Zone::Named(tz) => tz.from_local_datetime(naive).earliest().map(|d| d.fixed_offset()),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Utc => f.write_str("UTC"),
            Zone::Local => f.write_str("Local"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Failure of the time binder.
#[derive(Debug, Error)]
pub enum TimeError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("unknown time location {location:?}: {reason}")]
    Location { location: String, reason: String },
}

/// Bind `raw` into a temporal field.
///
/// `default_format` and `default_zone` apply when the field carries no
/// layout directive or zone directive respectively.
pub fn bind_time(
    target: &mut dyn Temporal,
    raw: &str,
    directives: &TimeDirectives,
    default_format: Option<&str>,
    default_zone: &Zone,
) -> Result<(), TimeError> {
    let layout = directives.format.as_deref().or(default_format);

    if raw.is_empty() {
        target.reset();
        return Ok(());
    }

    let zone = if directives.utc {
        Zone::Utc
    } else if let Some(location) = directives.location.as_deref() {
        Zone::resolve(location).map_err(|reason| TimeError::Location {
            location: location.to_string(),
            reason,
        })?
    } else {
        default_zone.clone()
    };

    let instant = parse_in_zone(raw, layout, &zone)?;
    target.assign(instant);
    Ok(())
}

/// Parse `raw` against `layout`.
///
/// Layouts that carry an offset keep the parsed instant; layouts without one
/// are read as wall-clock time in `zone` (date-only layouts at midnight).
pub fn parse_in_zone(
    raw: &str,
    layout: Option<&str>,
    zone: &Zone,
) -> Result<DateTime<FixedOffset>, ConversionError> {
    let invalid = |source| ConversionError::Time {
        value: raw.to_string(),
        layout: layout.unwrap_or(RFC3339).to_string(),
        source,
    };

    let Some(format) = layout else {
        return DateTime::parse_from_rfc3339(raw)
            .map(|instant| zone.express(instant))
            .map_err(invalid);
    };

    match DateTime::parse_from_str(raw, format) {
        Ok(instant) => return Ok(zone.express(instant)),
        Err(e) if e.kind() != ParseErrorKind::NotEnough => return Err(invalid(e)),
        Err(_) => {}
    }

    let naive = match NaiveDateTime::parse_from_str(raw, format) {
        Ok(naive) => naive,
        Err(e) if e.kind() == ParseErrorKind::NotEnough => NaiveDate::parse_from_str(raw, format)
            .map(|date| date.and_time(NaiveTime::default()))
            .map_err(invalid)?,
        Err(e) => return Err(invalid(e)),
    };

    zone.localize(&naive)
        .ok_or_else(|| ConversionError::NonexistentTime {
            value: raw.to_string(),
            zone: zone.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn directives(format: Option<&str>, utc: bool, location: Option<&str>) -> TimeDirectives {
        TimeDirectives {
            format: format.map(str::to_string),
            utc,
            location: location.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_resets_without_zone_lookup() {
        let mut at = Utc.with_ymd_and_hms(2021, 5, 6, 7, 8, 9).unwrap();
        let d = directives(None, false, Some("Not/AZone"));
        bind_time(&mut at, "", &d, None, &Zone::Local).unwrap();
        assert_eq!(at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_rfc3339_in_utc() {
        let mut at = DateTime::<Utc>::default();
        let d = directives(None, true, None);
        bind_time(&mut at, "2020-01-02T03:04:05Z", &d, None, &Zone::Local).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_offset_kept_as_instant() {
        let mut at = DateTime::<FixedOffset>::default();
        let d = directives(None, true, None);
        bind_time(&mut at, "2020-01-02T12:00:00+09:00", &d, None, &Zone::Local).unwrap();
        assert_eq!(at.offset().local_minus_utc(), 0);
        assert_eq!(at.hour(), 3);
    }

    #[test]
    fn test_named_location_wall_clock() {
        let mut at = DateTime::<FixedOffset>::default();
        let d = directives(Some("%Y-%m-%d %H:%M"), false, Some("Asia/Tokyo"));
        bind_time(&mut at, "2020-01-02 09:30", &d, None, &Zone::Local).unwrap();
        assert_eq!(at.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(
            at.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2020, 1, 2, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_utc_directive_wins_over_location() {
        let mut at = NaiveDateTime::default();
        let d = directives(Some("%Y-%m-%d %H:%M"), true, Some("Asia/Tokyo"));
        bind_time(&mut at, "2020-01-02 09:30", &d, None, &Zone::Local).unwrap();
        assert_eq!(at.hour(), 9);
    }

    #[test]
    fn test_date_only_layout() {
        let mut day = NaiveDate::default();
        let d = directives(Some("%Y-%m-%d"), false, None);
        bind_time(&mut day, "2024-02-29", &d, None, &Zone::Utc).unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2024, 2, 29));
    }

    #[test]
    fn test_unknown_location() {
        let mut at = DateTime::<Utc>::default();
        let d = directives(None, false, Some("Mars/Olympus"));
        let err =
            bind_time(&mut at, "2020-01-02T03:04:05Z", &d, None, &Zone::Local).unwrap_err();
        assert!(matches!(
            err,
            TimeError::Location { ref location, .. } if location == "Mars/Olympus"
        ));
        assert!(err.to_string().starts_with("unknown time location \"Mars/Olympus\""));
    }

    #[test]
    fn test_parse_failure() {
        let mut at = DateTime::<Utc>::default();
        let d = directives(None, true, None);
        let err = bind_time(&mut at, "yesterday", &d, None, &Zone::Local).unwrap_err();
        assert!(matches!(err, TimeError::Conversion(ConversionError::Time { .. })));
    }

    #[test]
    fn test_nonexistent_wall_clock() {
        let zone = Zone::resolve("America/New_York").unwrap();
        let err = parse_in_zone("2021-03-14 02:30", Some("%Y-%m-%d %H:%M"), &zone).unwrap_err();
        assert!(matches!(err, ConversionError::NonexistentTime { .. }));
    }

    #[test]
    fn test_configured_defaults() {
        let mut at = DateTime::<FixedOffset>::default();
        let d = TimeDirectives::default();
        let zone = Zone::resolve("Europe/Paris").unwrap();
        bind_time(&mut at, "15/07/2023", &d, Some("%d/%m/%Y"), &zone).unwrap();
        assert_eq!(at.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(at.day(), 15);
    }

    #[test]
    fn test_zone_names() {
        assert_eq!(Zone::resolve("UTC").unwrap(), Zone::Utc);
        assert_eq!(Zone::resolve("Local").unwrap(), Zone::Local);
        assert_eq!(Zone::resolve("Asia/Tokyo").unwrap().to_string(), "Asia/Tokyo");
        assert!(Zone::resolve("Nowhere/City").is_err());
    }
}
