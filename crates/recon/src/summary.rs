use serde::Serialize;

use parkmatch_core::{Dataset, MatchStatus};

/// Match counts for one annotated dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub source: String,
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub matched_pct: f64,
}

impl DatasetSummary {
    fn from_dataset(dataset: &Dataset) -> Self {
        let total = dataset.len();
        let matched = dataset
            .records
            .iter()
            .filter(|r| r.status == Some(MatchStatus::Matched))
            .count();
        let matched_pct = if total > 0 {
            matched as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        DatasetSummary {
            source: dataset.kind.label().to_string(),
            total,
            matched,
            unmatched: total - matched,
            matched_pct,
        }
    }
}

/// Summary of a full reconciliation run, one entry per dataset.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub accesspark: DatasetSummary,
    pub gopass: DatasetSummary,
}

pub fn summarize(accesspark: &Dataset, gopass: &Dataset) -> RunSummary {
    RunSummary {
        accesspark: DatasetSummary::from_dataset(accesspark),
        gopass: DatasetSummary::from_dataset(gopass),
    }
}
