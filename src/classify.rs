//src/classify.rs

use std::fs;
use std::io;
use std::path::Path;

use crate::config::ClassifyConfig;
use crate::tblout::BestHits;
use crate::types::{ClassificationSummary, TypeStats};

/// Fold a file's best hits into per-type counts and totals and pick the
/// winning type.
///
/// Every configured type appears in the output, zero-filled when nothing hit
/// it. The winner scan walks the types in configuration order with a running
/// max seeded below zero, so an all-zero file still produces a winner (the
/// first type, at 0.00) and exact ties keep the earliest type.
pub fn summarize(best_hits: &BestHits, config: &ClassifyConfig) -> ClassificationSummary {
    let mut types: Vec<TypeStats> = config
        .type_names()
        .into_iter()
        .map(|name| TypeStats {
            name: name.to_string(),
            matches: 0,
            total_score: 0.0,
        })
        .collect();

    for hit in best_hits.values() {
        if let Some(stats) = types.iter_mut().find(|s| s.name == hit.type_name) {
            stats.matches += 1;
            stats.total_score += hit.score;
        }
    }

    // Sentinel below any legitimate total; strict `>` keeps the first type
    // on exact ties.
    let mut top_type = config.fallback_type.clone();
    let mut top_score = -1.0;
    for stats in &types {
        if stats.total_score > top_score {
            top_score = stats.total_score;
            top_type = stats.name.clone();
        }
    }

    ClassificationSummary {
        types,
        top_type,
        top_score,
    }
}

/// Write one genome's classification artifact.
pub fn write_classification<P: AsRef<Path>>(
    summary: &ClassificationSummary,
    path: P,
) -> io::Result<()> {
    fs::write(path, summary.render())
}

/// Output file name for a tblout result file named `<base>_hmm_results.txt`.
pub fn classification_file_name(result_stem: &str) -> String {
    format!(
        "{}.classification.txt",
        result_stem.trim_end_matches("_hmm_results")
    )
}
