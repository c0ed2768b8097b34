//src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline-level failures. Only missing top-level resources abort a run;
/// malformed rows and artifacts are handled in place by the parsing stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("test sequence directory '{0}' does not exist")]
    MissingInputDir(PathBuf),

    #[error("HMM model file '{0}' does not exist")]
    MissingModel(PathBuf),

    #[error("HMM model '{0}' is not pressed or the press is incomplete; run `hmmpress` on it first")]
    ModelNotPressed(PathBuf),

    #[error("no .faa files found under '{0}'")]
    NoInputFiles(PathBuf),

    #[error("hmmsearch not found; make sure HMMER is installed and on PATH")]
    HmmerNotFound,

    #[error("hmmsearch failed for '{file}': {stderr}")]
    SearchFailed { file: PathBuf, stderr: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
