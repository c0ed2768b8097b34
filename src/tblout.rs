//src/tblout.rs

use ahash::AHashMap;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::config::ClassifyConfig;
use crate::types::BestHit;

/// Map from query profile id to its best-scoring hit in one tblout file.
pub type BestHits = AHashMap<String, BestHit>;

/// Parses an hmmsearch `--tblout` file and keeps, per query profile, the
/// highest positive full-sequence score together with the type computed from
/// the line that set it. Also supports `.gz` input.
///
/// tblout columns (whitespace-delimited): field 1 = target name,
/// field 3 = query name, field 6 = full-sequence score. Comment lines start
/// with `#`. Rows that are short, non-numeric in the score column, or score
/// at most 0 are skipped without a diagnostic.
pub fn parse_tblout<P: AsRef<Path>>(
    path: P,
    config: &ClassifyConfig,
) -> io::Result<BestHits> {
    let f = File::open(&path)?;

    // If the file ends with ".gz", wrap it in a MultiGzDecoder
    let is_gz = path
        .as_ref()
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };

    let mut best_hits: BestHits = AHashMap::new();

    for line_result in reader.lines() {
        let line = line_result?;

        // Skip comment lines and empty lines
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            continue;
        }

        let query = parts[2];
        let score: f64 = match parts[5].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };

        // Only scores > 0 count
        if score <= 0.0 {
            continue;
        }

        // The type rides along with the score that is currently winning; it
        // is fixed when a line takes the max and never re-derived afterwards.
        let replaces = best_hits
            .get(query)
            .map(|hit| score > hit.score)
            .unwrap_or(true);
        if replaces {
            best_hits.insert(
                query.to_string(),
                BestHit {
                    score,
                    type_name: config.type_of(query).to_string(),
                },
            );
        }
    }

    Ok(best_hits)
}
