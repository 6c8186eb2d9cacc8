use chrono::Duration;

use crate::plate::normalize_plate;
use crate::timestamp::EntryStamp;

/// Business-fixed clock-drift tolerance between the two systems, in minutes.
pub const TOLERANCE_MINUTES: i64 = 10;

/// The exact match key of a record plus its tolerance-expanded window.
///
/// `window` holds one key per integer minute offset in `[-tol, +tol]`,
/// offset 0 included, so a record with usable inputs carries `2*tol + 1`
/// keys. A record with unparseable plate or timestamp carries none and is
/// unmatched by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TolerantKeys {
    pub exact: Option<String>,
    pub window: Vec<String>,
}

impl TolerantKeys {
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

/// Builds the `PLATE|DD/MM/YYYY|HH:MM` lookup token, or `None` when the
/// plate has no usable content.
pub fn match_key(plate: &str, stamp: &EntryStamp) -> Option<String> {
    let plate = normalize_plate(plate)?;
    Some(format!("{plate}|{}|{}", stamp.fecha(), stamp.hora()))
}

/// Expands `(plate, stamp)` into the exact key and its tolerance window.
///
/// Offsets are applied to the full date-time value, so a window that crosses
/// midnight rolls the date component of the shifted keys. If an offset falls
/// outside chrono's representable range the window degrades to the exact key
/// alone rather than failing the record. A negative tolerance is treated as
/// zero, so keying never panics on out-of-range configuration.
pub fn build_keys(
    plate: &str,
    stamp: Option<&EntryStamp>,
    tolerance_minutes: i64,
) -> TolerantKeys {
    let tolerance_minutes = tolerance_minutes.max(0);
    let Some(stamp) = stamp else {
        return TolerantKeys::default();
    };
    let Some(exact) = match_key(plate, stamp) else {
        return TolerantKeys::default();
    };

    let mut window = Vec::with_capacity((tolerance_minutes * 2 + 1) as usize);
    for offset in -tolerance_minutes..=tolerance_minutes {
        let key = stamp
            .datetime()
            .checked_add_signed(Duration::minutes(offset))
            .and_then(|dt| match_key(plate, &EntryStamp::new(dt)));
        match key {
            Some(k) => window.push(k),
            None => {
                return TolerantKeys {
                    window: vec![exact.clone()],
                    exact: Some(exact),
                };
            }
        }
    }

    TolerantKeys {
        exact: Some(exact),
        window,
    }
}
