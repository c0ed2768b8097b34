// src/lib.rs
pub mod classify;
pub mod config;
pub mod error;
pub mod hmmsearch;
pub mod summary;
pub mod tblout;
pub mod types;

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{classification_file_name, summarize, write_classification};
use crate::config::ClassifyConfig;
use crate::error::PipelineError;
use crate::hmmsearch::{check_model, collect_faa_files, run_hmmsearch};
use crate::summary::{genome_name, row_for, rows_from_artifacts, write_summary};
use crate::types::{ClassificationSummary, SummaryRow};

/// File name of the merged profile library inside the model directory.
pub const MERGED_MODEL: &str = "merged.hmm";

/// Everything a full pipeline run produced.
pub struct RunOutputs {
    /// Per-genome classifications in processing order
    pub classifications: Vec<(String, ClassificationSummary)>,

    /// Rows of the run-level summary table
    pub summary_rows: Vec<SummaryRow>,

    /// Where the summary table was written
    pub summary_path: PathBuf,
}

/// Run the whole pipeline: hmmsearch every `.faa` under `test_dir` against
/// the merged model, classify each genome's results, and write the run-level
/// summary table.
///
/// A failed search for one genome is logged and skipped; only missing
/// top-level inputs (or a missing hmmsearch binary) abort the run.
pub fn run_pipeline(
    test_dir: &Path,
    hmm_dir: &Path,
    output_dir: &Path,
    config: &ClassifyConfig,
) -> Result<RunOutputs, PipelineError> {
    let faa_files = collect_faa_files(test_dir)?;
    let model = hmm_dir.join(MERGED_MODEL);
    check_model(&model)?;

    let details_dir = output_dir.join("details");
    fs::create_dir_all(&details_dir)?;

    log::info!("found {} .faa file(s) under {}", faa_files.len(), test_dir.display());

    // Stage 1: external search, one tblout per genome
    for (counter, faa_file) in faa_files.iter().enumerate() {
        log::info!(
            "[{}/{}] searching {}",
            counter + 1,
            faa_files.len(),
            faa_file.display()
        );

        let stem = faa_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tbl_out = details_dir.join(format!("{stem}_hmm_results.txt"));
        let dom_out = details_dir.join(format!("{stem}_hmm_results_dom.txt"));

        match run_hmmsearch(&model, faa_file, &tbl_out, &dom_out) {
            Ok(()) => {}
            Err(e @ PipelineError::SearchFailed { .. }) => {
                log::error!("{e}");
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    // Stage 2: classify each genome's tblout
    let classifications = process_results(&details_dir, output_dir, config)?;

    // Stage 3: one table for the run, header first, rows in processing order.
    // In-process the stage 2 -> 3 handoff is the summary value itself; the
    // artifacts written above remain the on-disk boundary.
    let summary_rows: Vec<SummaryRow> = classifications
        .iter()
        .map(|(genome, summary)| row_for(genome, summary, config))
        .collect();

    let summary_path = output_dir.join("summary.txt");
    write_summary(&summary_rows, &summary_path)?;
    log::info!("summary table written to {}", summary_path.display());

    Ok(RunOutputs {
        classifications,
        summary_rows,
        summary_path,
    })
}

/// Classify every `*_hmm_results.txt` under `details_dir` (domain tables are
/// skipped) and write one classification artifact per genome into
/// `output_dir`. Files are independent, so they are classified in parallel;
/// the returned order follows the sorted file names.
pub fn process_results(
    details_dir: &Path,
    output_dir: &Path,
    config: &ClassifyConfig,
) -> Result<Vec<(String, ClassificationSummary)>, PipelineError> {
    fs::create_dir_all(output_dir)?;

    let mut result_files: Vec<PathBuf> = fs::read_dir(details_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let name = path.file_name()?.to_string_lossy();
            (name.ends_with("_hmm_results.txt") || name.ends_with("_hmm_results.txt.gz"))
                .then_some(path)
        })
        .collect();
    result_files.sort();

    let classifications: Vec<(String, ClassificationSummary)> = result_files
        .par_iter()
        .filter_map(|path| {
            let best_hits = match tblout::parse_tblout(path, config) {
                Ok(hits) => hits,
                Err(e) => {
                    log::error!("could not read {}: {e}", path.display());
                    return None;
                }
            };
            let summary = summarize(&best_hits, config);

            let stem = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stem = stem
                .trim_end_matches(".gz")
                .trim_end_matches(".txt")
                .to_string();
            let artifact = output_dir.join(classification_file_name(&stem));
            if let Err(e) = write_classification(&summary, &artifact) {
                log::error!("could not write {}: {e}", artifact.display());
                return None;
            }

            let genome = genome_name(
                artifact
                    .file_name()
                    .map(|s| s.to_string_lossy())
                    .unwrap_or_default()
                    .as_ref(),
            )
            .to_string();
            Some((genome, summary))
        })
        .collect();

    Ok(classifications)
}

/// Stage 3 on its own: re-parse a directory of classification artifacts and
/// write the summary table next to them. This is the path taken when the
/// classification ran in an earlier process.
pub fn generate_summary(
    classification_dir: &Path,
    output_dir: &Path,
    config: &ClassifyConfig,
) -> Result<(Vec<SummaryRow>, PathBuf), PipelineError> {
    let rows = rows_from_artifacts(classification_dir, config)?;
    let summary_path = output_dir.join("summary.txt");
    write_summary(&rows, &summary_path)?;
    log::info!("summary table written to {}", summary_path.display());
    Ok((rows, summary_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_details(dir: &Path, genome: &str, rows: &[&str]) {
        let path = dir.join(format!("{genome}_hmm_results.txt"));
        let mut content = String::from("# hmmsearch tblout\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn stages_two_and_three_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let details = tmp.path().join("details");
        let out = tmp.path().join("out");
        fs::create_dir_all(&details).unwrap();

        // winner Fd at 80000 -> final label Fd
        write_details(
            &details,
            "genome1",
            &[
                "t1 - geneA_Fp_alignment - 1e-50 55000.0 0.1",
                "t2 - geneB_Fd_alignment - 1e-80 80000.0 0.1",
                "t3 - geneC_junk - 1e-2 -5.0 0.1",
            ],
        );
        // winner Fl at 60000 -> threshold masks the raw type
        write_details(&details, "genome2", &["t1 - x_Fl_alignment - 1e-60 60000.0 0.1"]);
        // tiny winner -> Outgroup
        write_details(&details, "genome3", &["t1 - y_Fp_alignment - 1e-3 999.0 0.1"]);
        // a domain table that must be ignored
        fs::write(details.join("genome1_hmm_results_dom.txt"), "# dom\n").unwrap();

        let config = ClassifyConfig::default();
        let classifications = process_results(&details, &out, &config).unwrap();
        assert_eq!(classifications.len(), 3);

        let (genome, summary) = &classifications[0];
        assert_eq!(genome, "genome1");
        assert_eq!(summary.top_type, "Fd");
        assert_eq!(summary.top_score, 80000.0);
        let fp = summary.types.iter().find(|s| s.name == "Fp").unwrap();
        assert_eq!((fp.matches, fp.total_score), (1, 55000.0));
        let fl = summary.types.iter().find(|s| s.name == "Fl").unwrap();
        assert_eq!((fl.matches, fl.total_score), (0, 0.0));

        // artifacts exist and re-parse to the same rows the in-memory path gives
        let (rows, summary_path) = generate_summary(&out, &out, &config).unwrap();
        assert!(summary_path.exists());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].genome, "genome1");
        assert_eq!(rows[0].final_type, "Fd");
        assert_eq!(rows[0].score, 80000.0);
        assert_eq!(rows[1].final_type, "Other"); // 60000 masks Fl
        assert_eq!(rows[2].final_type, "Outgroup");

        let in_memory: Vec<SummaryRow> = classifications
            .iter()
            .map(|(genome, summary)| row_for(genome, summary, &config))
            .collect();
        assert_eq!(in_memory, rows);

        let table = fs::read_to_string(&summary_path).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Genome\tType\tMax_Score");
        assert_eq!(lines[1], "genome1\tFd\t80000");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn unreadable_details_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(process_results(&missing, tmp.path(), &ClassifyConfig::default()).is_err());
    }
}
