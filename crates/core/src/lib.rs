pub mod key;
pub mod plate;
pub mod record;
pub mod timestamp;

pub use key::{build_keys, match_key, TolerantKeys, TOLERANCE_MINUTES};
pub use plate::normalize_plate;
pub use record::{Dataset, MatchStatus, Record};
pub use timestamp::{normalize_timestamp, EntryStamp, SourceKind};
