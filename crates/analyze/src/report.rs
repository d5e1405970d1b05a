//! DiagnosticReport: per-screen problem records plus flattened findings.
//!
//! Records keep the structured problems (with suggested fixes) for repair
//! tooling; findings are one-line summaries for display.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::deck::AnalysisError;

/// A diagnostic the analyzer can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCheck {
    Duplicate,
    Pattern,
    BrokenNavigation,
    InvalidMutateTarget,
    InvalidInitTarget,
    InvalidConditionTarget,
    InvalidConditionValue,
}

impl DiagnosticCheck {
    pub const ALL: [DiagnosticCheck; 7] = [
        DiagnosticCheck::Duplicate,
        DiagnosticCheck::Pattern,
        DiagnosticCheck::BrokenNavigation,
        DiagnosticCheck::InvalidMutateTarget,
        DiagnosticCheck::InvalidInitTarget,
        DiagnosticCheck::InvalidConditionTarget,
        DiagnosticCheck::InvalidConditionValue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCheck::Duplicate => "duplicate",
            DiagnosticCheck::Pattern => "pattern",
            DiagnosticCheck::BrokenNavigation => "broken_navigation",
            DiagnosticCheck::InvalidMutateTarget => "invalid_mutate_target",
            DiagnosticCheck::InvalidInitTarget => "invalid_init_target",
            DiagnosticCheck::InvalidConditionTarget => "invalid_condition_target",
            DiagnosticCheck::InvalidConditionValue => "invalid_condition_value",
        }
    }

    /// Checks that look at part ids rather than rule references.
    pub fn is_identifier_check(self) -> bool {
        matches!(self, DiagnosticCheck::Duplicate | DiagnosticCheck::Pattern)
    }

    pub fn severity(self) -> FindingSeverity {
        match self {
            DiagnosticCheck::Duplicate | DiagnosticCheck::BrokenNavigation => {
                FindingSeverity::Error
            }
            _ => FindingSeverity::Warning,
        }
    }
}

impl DiagnosticCheck {
    /// Comma-separated names of every check, for error messages.
    pub fn valid_names() -> String {
        DiagnosticCheck::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DiagnosticCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosticCheck {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagnosticCheck::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AnalysisError::UnknownCheck {
                name: s.to_string(),
                valid: DiagnosticCheck::valid_names(),
            })
    }
}

/// A part that needs renaming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub part_id: String,
    /// Screen that owns the part.
    pub owner: String,
    pub suggested_fix: String,
}

/// A rule, action, or initial-state fact that points at something missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceProblem {
    pub check: DiagnosticCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact_id: Option<String>,
    /// The offending navigation target, state path, or fact path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub suggested_fix: String,
}

/// Everything found on one screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    pub node: String,
    pub duplicates: Vec<Problem>,
    pub malformed: Vec<Problem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceProblem>,
}

impl DiagnosticRecord {
    pub fn new(node: &str) -> Self {
        DiagnosticRecord {
            node: node.to_string(),
            duplicates: Vec::new(),
            malformed: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn problem_count(&self) -> usize {
        self.duplicates.len() + self.malformed.len() + self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problem_count() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FindingSeverity {
    Error,
    Warning,
}

/// One-line summary of a single problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub check: DiagnosticCheck,
    pub severity: FindingSeverity,
    pub node: String,
    pub message: String,
}

/// Aggregated output of a diagnostics run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticReport {
    pub records: Vec<DiagnosticRecord>,
    pub checks_run: Vec<String>,
    pub problem_count: usize,
    pub findings: Vec<Finding>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_problems(&self) -> bool {
        self.problem_count > 0
    }

    /// Recount problems and rebuild findings from the records.
    pub fn extract_findings(&mut self) {
        self.findings.clear();
        self.problem_count = 0;

        for record in &self.records {
            self.problem_count += record.problem_count();

            for problem in &record.duplicates {
                self.findings.push(Finding {
                    check: DiagnosticCheck::Duplicate,
                    severity: DiagnosticCheck::Duplicate.severity(),
                    node: record.node.clone(),
                    message: format!(
                        "Part id '{}' is used more than once; suggested fix: '{}'",
                        problem.part_id, problem.suggested_fix
                    ),
                });
            }

            for problem in &record.malformed {
                self.findings.push(Finding {
                    check: DiagnosticCheck::Pattern,
                    severity: DiagnosticCheck::Pattern.severity(),
                    node: record.node.clone(),
                    message: format!(
                        "Part id '{}' contains invalid characters; suggested fix: '{}'",
                        problem.part_id, problem.suggested_fix
                    ),
                });
            }

            for problem in &record.references {
                self.findings.push(Finding {
                    check: problem.check,
                    severity: problem.check.severity(),
                    node: record.node.clone(),
                    message: reference_message(problem),
                });
            }
        }
    }
}

fn reference_message(problem: &ReferenceProblem) -> String {
    let target = problem.target.as_deref().unwrap_or("");
    let rule = problem.rule_id.as_deref().unwrap_or("?");
    match problem.check {
        DiagnosticCheck::BrokenNavigation => format!(
            "Rule '{}' navigates to unknown screen '{}'",
            rule, target
        ),
        DiagnosticCheck::InvalidMutateTarget => format!(
            "Rule '{}' mutates invalid target '{}'",
            rule, target
        ),
        DiagnosticCheck::InvalidInitTarget => format!(
            "Initial state fact '{}' targets invalid path '{}'",
            problem.fact_id.as_deref().unwrap_or("?"),
            target
        ),
        DiagnosticCheck::InvalidConditionTarget => format!(
            "Condition '{}' in rule '{}' tests invalid fact '{}'",
            problem.condition_id.as_deref().unwrap_or("?"),
            rule,
            target
        ),
        DiagnosticCheck::InvalidConditionValue => format!(
            "Condition '{}' in rule '{}' has a null value",
            problem.condition_id.as_deref().unwrap_or("?"),
            rule
        ),
        DiagnosticCheck::Duplicate | DiagnosticCheck::Pattern => {
            format!("{} problem on '{}'", problem.check, target)
        }
    }
}
