use std::fmt;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Which export a raw timestamp came from. The two systems write entry
/// timestamps in different layouts, so parsing is tag-dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    AccessPark,
    GoPass,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::AccessPark => "ACCESSPARK",
            SourceKind::GoPass => "GOPASS",
        }
    }

    /// The dataset a record of this kind is validated against.
    pub fn opposite(self) -> SourceKind {
        match self {
            SourceKind::AccessPark => SourceKind::GoPass,
            SourceKind::GoPass => SourceKind::AccessPark,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Canonical entry instant shared by both datasets.
///
/// Seconds and sub-seconds are truncated at construction: match keys carry
/// minute precision only, and all cross-dataset comparison happens through
/// the `fecha`/`hora` renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryStamp(NaiveDateTime);

impl EntryStamp {
    pub fn new(dt: NaiveDateTime) -> Self {
        let truncated = dt
            .with_second(0)
            .and_then(|d| d.with_nanosecond(0))
            .unwrap_or(dt);
        EntryStamp(truncated)
    }

    /// Canonical date, `DD/MM/YYYY`.
    pub fn fecha(&self) -> String {
        self.0.format("%d/%m/%Y").to_string()
    }

    /// Canonical time, `HH:MM` 24-hour.
    pub fn hora(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for EntryStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.fecha(), self.hora())
    }
}

// ACCESSPARK check_in: `2025-02-27 14:23:00.000`. `%.f` also accepts the
// no-fraction form, the `T` variant shows up in some exports.
const ACCESSPARK_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// GOPASS Fecha de entrada: `28/10/2025 2:57:50 p. m.` and friends. Ordered
// most-specific first; the first format that parses wins.
const GOPASS_FORMATS: &[&str] = &[
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%Y %H:%M",
];

// Last-resort layouts for values that match none of the declared formats.
const FALLBACK_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const FALLBACK_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Converts a source-specific timestamp string into the canonical entry
/// stamp. Absence is the only failure signal: a missing value, or one that
/// no pattern can parse, yields `None`. Never panics.
pub fn normalize_timestamp(raw: Option<&str>, kind: SourceKind) -> Option<EntryStamp> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let dt = match kind {
        SourceKind::AccessPark => try_formats(raw, ACCESSPARK_FORMATS),
        SourceKind::GoPass => {
            let cleaned = normalize_meridiem(raw);
            try_formats(&cleaned, GOPASS_FORMATS)
                .or_else(|| try_formats(&cleaned, FALLBACK_FORMATS))
                .or_else(|| try_date_only(&cleaned))
        }
    }?;

    Some(EntryStamp::new(dt))
}

fn try_formats(s: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn try_date_only(s: &str) -> Option<NaiveDateTime> {
    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Rewrites localized meridiem markers (`a. m.`, `p.m.`, `A. M`, ...) to the
/// canonical `AM`/`PM` tokens chrono's `%p` expects, and collapses runs of
/// whitespace left behind by the source exporter.
fn normalize_meridiem(raw: &str) -> String {
    static MERIDIEM: OnceLock<Regex> = OnceLock::new();
    let re = MERIDIEM.get_or_init(|| {
        Regex::new(r"(?i)\b([ap])\.?\s*m\.?").expect("meridiem pattern is valid")
    });

    let replaced = re.replace_all(raw, |caps: &regex::Captures| {
        format!("{}M", caps[1].to_uppercase())
    });

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fecha_hora(raw: &str, kind: SourceKind) -> Option<(String, String)> {
        normalize_timestamp(Some(raw), kind).map(|s| (s.fecha(), s.hora()))
    }

    // ── ACCESSPARK ───────────────────────────────────────────────────────────

    #[test]
    fn accesspark_with_millis() {
        assert_eq!(
            fecha_hora("2025-02-27 14:23:00.000", SourceKind::AccessPark),
            Some(("27/02/2025".to_string(), "14:23".to_string()))
        );
    }

    #[test]
    fn accesspark_without_millis() {
        assert_eq!(
            fecha_hora("2025-02-27 09:05:59", SourceKind::AccessPark),
            Some(("27/02/2025".to_string(), "09:05".to_string()))
        );
    }

    #[test]
    fn accesspark_t_separator() {
        assert_eq!(
            fecha_hora("2025-12-01T23:59:10", SourceKind::AccessPark),
            Some(("01/12/2025".to_string(), "23:59".to_string()))
        );
    }

    #[test]
    fn accesspark_seconds_truncated() {
        let stamp = normalize_timestamp(Some("2025-02-27 14:23:45.678"), SourceKind::AccessPark)
            .unwrap();
        assert_eq!(stamp.hora(), "14:23");
        assert_eq!(stamp.datetime().second(), 0);
    }

    #[test]
    fn accesspark_garbage_is_absent() {
        assert_eq!(fecha_hora("not a date", SourceKind::AccessPark), None);
        assert_eq!(fecha_hora("27/02/2025 14:23", SourceKind::AccessPark), None);
    }

    // ── GOPASS ───────────────────────────────────────────────────────────────

    #[test]
    fn gopass_spanish_pm_marker() {
        assert_eq!(
            fecha_hora("28/10/2025  2:57:50 p. m.", SourceKind::GoPass),
            Some(("28/10/2025".to_string(), "14:57".to_string()))
        );
    }

    #[test]
    fn gopass_spanish_am_marker() {
        assert_eq!(
            fecha_hora("28/10/2025 9:05:00 a. m.", SourceKind::GoPass),
            Some(("28/10/2025".to_string(), "09:05".to_string()))
        );
    }

    #[test]
    fn gopass_compact_meridiem_variants() {
        let expected = Some(("05/03/2025".to_string(), "13:30".to_string()));
        assert_eq!(fecha_hora("05/03/2025 1:30:00 p.m.", SourceKind::GoPass), expected);
        assert_eq!(fecha_hora("05/03/2025 1:30 PM", SourceKind::GoPass), expected);
        assert_eq!(fecha_hora("05/03/2025 1:30 P. M.", SourceKind::GoPass), expected);
    }

    #[test]
    fn gopass_24h_with_seconds() {
        assert_eq!(
            fecha_hora("28/10/2025 14:57:50", SourceKind::GoPass),
            Some(("28/10/2025".to_string(), "14:57".to_string()))
        );
    }

    #[test]
    fn gopass_24h_without_seconds() {
        assert_eq!(
            fecha_hora("28/10/2025 14:57", SourceKind::GoPass),
            Some(("28/10/2025".to_string(), "14:57".to_string()))
        );
    }

    #[test]
    fn gopass_twelve_hour_agrees_with_24h_equivalent() {
        let twelve = fecha_hora("28/10/2025 2:57:50 p. m.", SourceKind::GoPass);
        let twenty_four = fecha_hora("28/10/2025 14:57:50", SourceKind::GoPass);
        assert_eq!(twelve, twenty_four);
    }

    #[test]
    fn gopass_midnight_and_noon() {
        assert_eq!(
            fecha_hora("01/01/2025 12:00:00 a. m.", SourceKind::GoPass),
            Some(("01/01/2025".to_string(), "00:00".to_string()))
        );
        assert_eq!(
            fecha_hora("01/01/2025 12:00:00 p. m.", SourceKind::GoPass),
            Some(("01/01/2025".to_string(), "12:00".to_string()))
        );
    }

    #[test]
    fn gopass_permissive_fallback_iso() {
        assert_eq!(
            fecha_hora("2025-10-28 14:57:50", SourceKind::GoPass),
            Some(("28/10/2025".to_string(), "14:57".to_string()))
        );
    }

    #[test]
    fn gopass_date_only_falls_back_to_midnight() {
        assert_eq!(
            fecha_hora("28/10/2025", SourceKind::GoPass),
            Some(("28/10/2025".to_string(), "00:00".to_string()))
        );
    }

    #[test]
    fn gopass_garbage_is_absent() {
        assert_eq!(fecha_hora("mañana", SourceKind::GoPass), None);
        assert_eq!(fecha_hora("99/99/9999 25:00", SourceKind::GoPass), None);
    }

    // ── Shared edge cases ────────────────────────────────────────────────────

    #[test]
    fn missing_input_is_absent_for_both_kinds() {
        assert_eq!(normalize_timestamp(None, SourceKind::AccessPark), None);
        assert_eq!(normalize_timestamp(None, SourceKind::GoPass), None);
        assert_eq!(normalize_timestamp(Some(""), SourceKind::AccessPark), None);
        assert_eq!(normalize_timestamp(Some("   "), SourceKind::GoPass), None);
    }

    #[test]
    fn meridiem_normalization_variants() {
        assert_eq!(normalize_meridiem("2:57:50 p. m."), "2:57:50 PM");
        assert_eq!(normalize_meridiem("2:57 a.m."), "2:57 AM");
        assert_eq!(normalize_meridiem("2:57  A. M"), "2:57 AM");
        assert_eq!(normalize_meridiem("14:57:50"), "14:57:50");
    }

    #[test]
    fn source_kind_opposites() {
        assert_eq!(SourceKind::AccessPark.opposite(), SourceKind::GoPass);
        assert_eq!(SourceKind::GoPass.opposite(), SourceKind::AccessPark);
        assert_eq!(SourceKind::AccessPark.to_string(), "ACCESSPARK");
    }
}
