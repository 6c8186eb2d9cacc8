use serde::{Deserialize, Serialize};

use crate::key::{build_keys, TolerantKeys};
use crate::timestamp::{normalize_timestamp, EntryStamp, SourceKind};

/// Per-record classification against the opposite dataset's key-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Matched,
    Unmatched,
}

impl MatchStatus {
    /// Report label for a record owned by `own`. The wording names the
    /// opposite dataset; the logic behind both sides is identical.
    pub fn label(self, own: SourceKind) -> &'static str {
        match (self, own.opposite()) {
            (MatchStatus::Matched, SourceKind::GoPass) => "Llave encontrada en GOPASS",
            (MatchStatus::Unmatched, SourceKind::GoPass) => "Llave NO encontrada en GOPASS",
            (MatchStatus::Matched, SourceKind::AccessPark) => "Llave encontrada en ACCESSPARK",
            (MatchStatus::Unmatched, SourceKind::AccessPark) => {
                "Llave NO encontrada en ACCESSPARK"
            }
        }
    }
}

/// One row from either source export.
///
/// The original cells are preserved in column order so the report can emit
/// them untouched; the derived fields exist only for the duration of a
/// reconciliation run.
#[derive(Debug, Clone)]
pub struct Record {
    /// Original row cells, in header order.
    pub fields: Vec<String>,
    pub raw_plate: String,
    pub raw_timestamp: String,
    pub stamp: Option<EntryStamp>,
    pub keys: TolerantKeys,
    pub status: Option<MatchStatus>,
}

impl Record {
    pub fn new(fields: Vec<String>, raw_plate: String, raw_timestamp: String) -> Self {
        Record {
            fields,
            raw_plate,
            raw_timestamp,
            stamp: None,
            keys: TolerantKeys::default(),
            status: None,
        }
    }

    /// Runs the normalization + keying pass for this record. Unparseable
    /// plate or timestamp leaves the record without keys, which classifies
    /// it Unmatched later; nothing here fails.
    pub fn derive_keys(&mut self, kind: SourceKind, tolerance_minutes: i64) {
        self.stamp = normalize_timestamp(Some(&self.raw_timestamp), kind);
        self.keys = build_keys(&self.raw_plate, self.stamp.as_ref(), tolerance_minutes);
    }

    /// Canonical `DD/MM/YYYY` date, empty when the timestamp was unparseable.
    pub fn fecha_entrada(&self) -> String {
        self.stamp.map(|s| s.fecha()).unwrap_or_default()
    }

    /// Canonical `HH:MM` time, empty when the timestamp was unparseable.
    pub fn hora_entrada(&self) -> String {
        self.stamp.map(|s| s.hora()).unwrap_or_default()
    }
}

/// One loaded export: its kind, its original header row, and its records.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub kind: SourceKind,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(kind: SourceKind, headers: Vec<String>) -> Self {
        Dataset {
            kind,
            headers,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
