//src/summary.rs

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::config::ClassifyConfig;
use crate::types::{ClassificationSummary, SummaryRow};

/// Trailing part of every classification artifact file name.
pub const CLASSIFICATION_SUFFIX: &str = ".classification.txt";

/// Header of the run-level summary table.
pub const SUMMARY_HEADER: &str = "Genome\tType\tMax_Score";

/// Derive the genome name from an artifact file name. Unexpected names are
/// used as-is.
pub fn genome_name(file_name: &str) -> &str {
    file_name
        .strip_suffix(CLASSIFICATION_SUFFIX)
        .unwrap_or(file_name)
}

/// Extract `(type name, raw score text)` from an artifact's `Summary:` line.
///
/// The type is a run of word characters, the score a run of digits and dots;
/// anything else (including a missing line) yields `None`.
pub fn extract_summary(content: &str) -> Option<(&str, &str)> {
    const PREFIX: &str = "Summary: The highest score type is ";
    const INFIX: &str = " with a total score of ";

    let start = content.find(PREFIX)? + PREFIX.len();
    let rest = &content[start..];

    let type_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if type_len == 0 {
        return None;
    }
    let (type_name, rest) = rest.split_at(type_len);

    let rest = rest.strip_prefix(INFIX)?;
    let score_len = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    if score_len == 0 {
        return None;
    }
    Some((type_name, &rest[..score_len]))
}

/// Clean and parse the extracted score text. Trailing dots are a known
/// formatting artifact (the sentence's final period is captured by the
/// digits-and-dots run) and are stripped before parsing.
pub fn parse_score(raw: &str) -> Option<f64> {
    raw.trim_end_matches('.').parse().ok()
}

/// Apply the two-tier threshold policy to a winning score.
pub fn final_type<'a>(score: f64, raw_type: &'a str, config: &ClassifyConfig) -> &'a str {
    if score < config.outgroup_threshold {
        "Outgroup"
    } else if score < config.other_threshold {
        "Other"
    } else {
        raw_type
    }
}

/// Build the summary row for an in-memory classification (the handoff used
/// when both stages run in one process).
pub fn row_for(
    genome: &str,
    summary: &ClassificationSummary,
    config: &ClassifyConfig,
) -> SummaryRow {
    SummaryRow {
        genome: genome.to_string(),
        final_type: final_type(summary.top_score, &summary.top_type, config).to_string(),
        score: summary.top_score,
    }
}

/// Re-parse a directory of classification artifacts into summary rows.
///
/// An artifact whose `Summary:` line is missing or malformed is skipped with
/// a warning; a score that fails numeric parsing after cleanup still yields a
/// row, at 0.0, with a warning. Neither condition stops the scan.
pub fn rows_from_artifacts<P: AsRef<Path>>(
    classification_dir: P,
    config: &ClassifyConfig,
) -> io::Result<Vec<SummaryRow>> {
    let mut file_names: Vec<String> = fs::read_dir(&classification_dir)?
        .filter_map(|entry| {
            let name = entry.ok()?.file_name().to_string_lossy().into_owned();
            name.ends_with(CLASSIFICATION_SUFFIX).then_some(name)
        })
        .collect();
    file_names.sort();

    let mut rows = Vec::with_capacity(file_names.len());
    for file_name in &file_names {
        let content = fs::read_to_string(classification_dir.as_ref().join(file_name))?;

        let Some((raw_type, raw_score)) = extract_summary(&content) else {
            log::warn!("could not parse summary line (file: {file_name})");
            continue;
        };

        let score = match parse_score(raw_score) {
            Some(v) => v,
            None => {
                log::warn!("invalid score format '{raw_score}', using 0 (file: {file_name})");
                0.0
            }
        };

        rows.push(SummaryRow {
            genome: genome_name(file_name).to_string(),
            final_type: final_type(score, raw_type, config).to_string(),
            score,
        });
    }
    Ok(rows)
}

/// Write the summary table: header first, then one tab-separated row per
/// genome, in the order given.
pub fn write_summary<P: AsRef<Path>>(rows: &[SummaryRow], path: P) -> io::Result<()> {
    let mut out = File::create(path)?;
    writeln!(out, "{SUMMARY_HEADER}")?;
    for row in rows {
        writeln!(out, "{}\t{}\t{}", row.genome, row.final_type, row.score)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::summarize;
    use crate::tblout::BestHits;
    use crate::types::BestHit;

    #[test]
    fn genome_name_strips_the_artifact_suffix() {
        assert_eq!(genome_name("genome1.classification.txt"), "genome1");
        assert_eq!(genome_name("odd_name.txt"), "odd_name.txt");
    }

    #[test]
    fn summary_line_extraction() {
        let content = "Type Fp: matches=1, total_score=55000.00\n\n\
                       Summary: The highest score type is Fp with a total score of 55000.00.\n";
        assert_eq!(extract_summary(content), Some(("Fp", "55000.00.")));
        assert_eq!(extract_summary("no summary here"), None);
        assert_eq!(
            extract_summary("Summary: The highest score type is  with a total score of 1.0."),
            None
        );
    }

    #[test]
    fn trailing_dots_are_cleaned_before_parsing() {
        assert_eq!(parse_score("55000.00."), Some(55000.0));
        assert_eq!(parse_score("999..."), Some(999.0));
        assert_eq!(parse_score("1.2.3"), None);
    }

    #[test]
    fn threshold_boundaries() {
        let config = ClassifyConfig::default();
        assert_eq!(final_type(49999.99, "Fd", &config), "Outgroup");
        assert_eq!(final_type(50000.0, "Fd", &config), "Other");
        assert_eq!(final_type(69999.99, "Fl", &config), "Other");
        assert_eq!(final_type(70000.0, "Fd", &config), "Fd");
        // the raw type may itself be Other
        assert_eq!(final_type(80000.0, "Other", &config), "Other");
    }

    #[test]
    fn render_and_reparse_round_trip() {
        let config = ClassifyConfig::default();
        let mut hits: BestHits = BestHits::default();
        hits.insert(
            "a_Fd_alignment".to_string(),
            BestHit {
                score: 80000.0,
                type_name: "Fd".to_string(),
            },
        );
        let summary = summarize(&hits, &config);
        let text = summary.render();

        let (raw_type, raw_score) = extract_summary(&text).unwrap();
        assert_eq!(raw_type, summary.top_type);
        assert_eq!(parse_score(raw_score), Some(summary.top_score));
    }

    #[test]
    fn malformed_artifacts_are_skipped_but_bad_scores_get_a_zero_row() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("good.classification.txt"),
            "Summary: The highest score type is Fd with a total score of 80000.00.\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("broken.classification.txt"),
            "nothing useful\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("badscore.classification.txt"),
            "Summary: The highest score type is Fp with a total score of 1.2.3.\n",
        )
        .unwrap();
        fs::write(dir.path().join("ignored.txt"), "not an artifact").unwrap();

        let rows = rows_from_artifacts(dir.path(), &ClassifyConfig::default()).unwrap();
        assert_eq!(rows.len(), 2);

        // sorted by file name: badscore before good
        assert_eq!(rows[0].genome, "badscore");
        assert_eq!(rows[0].score, 0.0);
        assert_eq!(rows[0].final_type, "Outgroup");

        assert_eq!(rows[1].genome, "good");
        assert_eq!(rows[1].score, 80000.0);
        assert_eq!(rows[1].final_type, "Fd");
    }

    #[test]
    fn summary_table_has_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        let rows = vec![
            SummaryRow {
                genome: "g1".into(),
                final_type: "Fd".into(),
                score: 80000.0,
            },
            SummaryRow {
                genome: "g2".into(),
                final_type: "Outgroup".into(),
                score: 999.0,
            },
        ];
        write_summary(&rows, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Genome\tType\tMax_Score");
        assert_eq!(lines[1], "g1\tFd\t80000");
        assert_eq!(lines[2], "g2\tOutgroup\t999");
        assert_eq!(lines.len(), 3);
    }
}
