//src/types.rs

use std::fmt::Write as FmtWrite;

/// Best-scoring hit for one query profile within a single tblout file.
/// The type label is the one computed from whichever line currently holds
/// the maximum score, so the two fields always travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct BestHit {
    pub score: f64,
    pub type_name: String,
}

/// Aggregate over one genome for a single type: how many query profiles had
/// their best hit in this type, and the sum of those best scores.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeStats {
    pub name: String,
    pub matches: u32,
    pub total_score: f64,
}

/// A structured representation of one genome's classification.
/// Every configured type is present, even with zero matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationSummary {
    /// Per-type stats in the fixed configuration order
    pub types: Vec<TypeStats>,

    /// Type with the strictly greatest total score (earliest type keeps ties)
    pub top_type: String,
    /// That type's total score
    pub top_score: f64,
}

impl ClassificationSummary {
    /// Generate the classification artifact text on demand.
    ///
    /// The layout is a public contract: the summary stage re-parses the
    /// `Summary:` line when it runs against artifacts on disk.
    pub fn render(&self) -> String {
        let mut output = String::new();
        for stats in &self.types {
            writeln!(
                output,
                "Type {}: matches={}, total_score={:.2}",
                stats.name, stats.matches, stats.total_score
            )
            .unwrap();
        }
        writeln!(
            output,
            "\nSummary: The highest score type is {} with a total score of {:.2}.",
            self.top_type, self.top_score
        )
        .unwrap();
        output
    }
}

/// One row of the run-level summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub genome: String,
    /// Final label after thresholding: `Outgroup`, `Other`, or the raw type
    pub final_type: String,
    /// The winning total score, unmodified by thresholding
    pub score: f64,
}
