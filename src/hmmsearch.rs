//src/hmmsearch.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::PipelineError;

/// Extensions hmmpress leaves next to a model file.
const PRESS_EXTENSIONS: [&str; 4] = ["h3f", "h3i", "h3m", "h3p"];

/// Check that the merged model exists and has a complete hmmpress index.
pub fn check_model(model: &Path) -> Result<(), PipelineError> {
    if !model.exists() {
        return Err(PipelineError::MissingModel(model.to_path_buf()));
    }

    let all_pressed = PRESS_EXTENSIONS.iter().all(|ext| {
        let mut os = model.as_os_str().to_owned();
        os.push(".");
        os.push(ext);
        PathBuf::from(os).exists()
    });
    if !all_pressed {
        return Err(PipelineError::ModelNotPressed(model.to_path_buf()));
    }
    Ok(())
}

/// Recursively collect every `.faa` file under `dir`.
pub fn collect_faa_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.exists() {
        return Err(PipelineError::MissingInputDir(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort();

    if files.is_empty() {
        return Err(PipelineError::NoInputFiles(dir.to_path_buf()));
    }
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), PipelineError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().map(|ext| ext == "faa").unwrap_or(false) {
            files.push(path);
        }
    }
    Ok(())
}

/// Run `hmmsearch --tblout <tbl_out> --domtblout <dom_out> <model> <query>`.
///
/// A missing hmmsearch binary is fatal; a non-zero exit is a per-file
/// failure the caller can log and skip.
pub fn run_hmmsearch(
    model: &Path,
    query: &Path,
    tbl_out: &Path,
    dom_out: &Path,
) -> Result<(), PipelineError> {
    let output = Command::new("hmmsearch")
        .arg("--tblout")
        .arg(tbl_out)
        .arg("--domtblout")
        .arg(dom_out)
        .arg(model)
        .arg(query)
        .output()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PipelineError::HmmerNotFound
            } else {
                PipelineError::Io(e)
            }
        })?;

    if !output.status.success() {
        return Err(PipelineError::SearchFailed {
            file: query.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}
