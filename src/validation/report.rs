use super::IntegrityViolation;

/// Result of running the integrity checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    violations: Vec<IntegrityViolation>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, violations: Vec<IntegrityViolation>) {
        self.violations.extend(violations);
    }

    /// True when no hard violation was found
    pub fn is_valid(&self) -> bool {
        !self.violations.iter().any(IntegrityViolation::is_hard)
    }

    pub fn violations(&self) -> &[IntegrityViolation] {
        &self.violations
    }

    pub fn hard_violations(&self) -> impl Iterator<Item = &IntegrityViolation> {
        self.violations.iter().filter(|v| v.is_hard())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &IntegrityViolation> {
        self.violations.iter().filter(|v| !v.is_hard())
    }

    /// One line per hard violation, for error messages and correction prompts
    pub fn hard_summary(&self) -> String {
        self.hard_violations()
            .map(|v| format!("- {}", v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
