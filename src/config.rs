//src/config.rs

/// Classification policy: the ordered type patterns and the two score
/// thresholds. These were hard-wired in the original pipeline; keeping them
/// in one struct makes the policy explicit and testable.
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    /// Ordered `(type name, query-id suffix)` pairs; the first suffix that
    /// matches wins. Order also decides ties between equal totals.
    pub type_patterns: Vec<(String, String)>,
    /// Type assigned when no suffix matches
    pub fallback_type: String,
    /// Winning totals below this are labeled `Outgroup`
    pub outgroup_threshold: f64,
    /// Winning totals below this (but at or above `outgroup_threshold`)
    /// are labeled `Other`; at or above, the raw type is kept
    pub other_threshold: f64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        ClassifyConfig {
            type_patterns: vec![
                ("Fp".to_string(), "_Fp_alignment".to_string()),
                ("Fd".to_string(), "_Fd_alignment".to_string()),
                ("Fl".to_string(), "_Fl_alignment".to_string()),
                ("Other".to_string(), "_Other_alignment".to_string()),
            ],
            fallback_type: "Other".to_string(),
            outgroup_threshold: 50000.0,
            other_threshold: 70000.0,
        }
    }
}

impl ClassifyConfig {
    /// Assign a type to a query profile identifier. First matching suffix
    /// wins; no match falls back to `fallback_type`.
    pub fn type_of<'a>(&'a self, query_id: &str) -> &'a str {
        for (name, suffix) in &self.type_patterns {
            if query_id.ends_with(suffix.as_str()) {
                return name;
            }
        }
        &self.fallback_type
    }

    /// Every type name in iteration order, with the fallback appended when
    /// it has no pattern of its own. Duplicates are dropped.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.type_patterns.len() + 1);
        for (name, _) in &self.type_patterns {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        if !names.contains(&self.fallback_type.as_str()) {
            names.push(&self.fallback_type);
        }
        names
    }
}
