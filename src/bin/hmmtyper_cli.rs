use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;

use hmmtyper_rs::config::ClassifyConfig;
use hmmtyper_rs::error::PipelineError;
use hmmtyper_rs::{generate_summary, run_pipeline};

/// Profile-HMM genome typing: hmmsearch every .faa under TEST_DIR against
/// the merged model, classify each genome and build a run summary table.
#[derive(Parser)]
#[command(name = "hmmtyper-rs", version)]
struct Cli {
    /// Directory holding the test sequences (.faa files, searched recursively)
    test_dir: PathBuf,

    /// Directory holding the pressed merged.hmm model
    #[arg(long, default_value = "hmm_classifier")]
    hmm_dir: PathBuf,

    /// Where results, classifications and the summary table are written
    #[arg(long, default_value = "hmm_results")]
    out_dir: PathBuf,

    /// Skip searching and classifying; rebuild the summary table from the
    /// classification artifacts already present in the output directory
    #[arg(long)]
    summarize_only: bool,
}

fn spinner(color: &str, msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template(&format!("{{spinner:.{color}}} {{msg}}"))
            .expect("Invalid spinner template"),
    );
    bar.set_message(msg.to_string());
    bar
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config = ClassifyConfig::default();

    let result = if cli.summarize_only {
        let bar = spinner("yellow", "Rebuilding summary table...");
        let outcome = generate_summary(&cli.out_dir, &cli.out_dir, &config);
        match outcome {
            Ok((rows, path)) => {
                bar.finish_with_message(format!(
                    "Summary table with {} row(s) written to {}",
                    rows.len(),
                    path.display()
                ));
                Ok(())
            }
            Err(e) => {
                bar.finish_with_message("Summary generation failed.");
                Err(e)
            }
        }
    } else {
        let bar = spinner("green", "Searching and classifying genomes...");
        match run_pipeline(&cli.test_dir, &cli.hmm_dir, &cli.out_dir, &config) {
            Ok(outputs) => {
                bar.finish_with_message(format!(
                    "Classified {} genome(s); summary table written to {}",
                    outputs.classifications.len(),
                    outputs.summary_path.display()
                ));
                Ok(())
            }
            Err(e) => {
                bar.finish_with_message("Run failed.");
                Err(e)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        let exit_code = match e {
            PipelineError::MissingInputDir(_)
            | PipelineError::MissingModel(_)
            | PipelineError::ModelNotPressed(_)
            | PipelineError::NoInputFiles(_) => 2,
            PipelineError::HmmerNotFound => 3,
            _ => 1,
        };
        process::exit(exit_code);
    }
}
