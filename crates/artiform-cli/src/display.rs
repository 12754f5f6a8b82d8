//! Display formatting for CLI output
//!
//! Provides structured display for:
//! - Validation errors grouped by resource address
//! - Plans with per-field changes
//! - Resource schemas

use artiform_core::{FieldDiff, FieldValue, Schema};
use console::style;
use serde_json::Value as JsonValue;

use crate::commands::plan::{Step, StepAction};

/// Fields whose values are never printed
const SENSITIVE_FIELDS: &[&str] = &["password"];

pub const MASK: &str = "(sensitive)";

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A validation problem at a field path within one resource
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

/// Validation results of one resource
#[derive(Debug, Clone)]
pub struct ResourceReport {
    pub address: String,
    pub issues: Vec<ValidationIssue>,
}

/// Grouped validation results for display
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub resources: Vec<ResourceReport>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, address: &str, issues: Vec<ValidationIssue>) {
        self.resources.push(ResourceReport {
            address: address.to_string(),
            issues,
        });
    }

    pub fn display(&self) {
        for resource in &self.resources {
            if resource.issues.is_empty() {
                println!("{} {}", style("✓").green(), resource.address);
                continue;
            }

            println!("{} {}", style("✗").red(), style(&resource.address).cyan().bold());
            for issue in &resource.issues {
                let icon = match issue.severity {
                    Severity::Error => style("✗").red(),
                    Severity::Warning => style("⚠").yellow(),
                };
                if issue.path.is_empty() {
                    println!("    {} {}", icon, issue.message);
                } else {
                    println!("    {} {} at {}", icon, issue.message, style(&issue.path).dim());
                }
            }
        }
    }

    /// (errors, warnings)
    pub fn summary(&self) -> (usize, usize) {
        self.resources
            .iter()
            .flat_map(|r| &r.issues)
            .fold((0, 0), |(e, w), issue| match issue.severity {
                Severity::Error => (e + 1, w),
                Severity::Warning => (e, w + 1),
            })
    }

    pub fn print_summary(&self) {
        let (errors, _) = self.summary();
        if errors > 0 {
            println!(
                "{} {} in {} of {}",
                style("✗").red().bold(),
                pluralize(errors, "error", "errors"),
                pluralize(self.invalid_count(), "resource", "resources"),
                self.resources.len()
            );
        } else {
            println!("{} Validation passed!", style("✓").green().bold());
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary().0 > 0
    }

    fn invalid_count(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| r.issues.iter().any(|i| i.severity == Severity::Error))
            .count()
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({
            "valid": !self.has_errors(),
            "resources": self.resources.iter().map(|r| {
                serde_json::json!({
                    "address": r.address,
                    "valid": r.issues.iter().all(|i| i.severity != Severity::Error),
                    "errors": r.issues.iter().map(|i| {
                        serde_json::json!({ "path": i.path, "message": i.message })
                    }).collect::<Vec<_>>(),
                })
            }).collect::<Vec<_>>(),
        })
    }
}

/// Pluralize a word based on count
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}

pub fn is_sensitive(field: &str) -> bool {
    SENSITIVE_FIELDS.contains(&field)
}

/// Value as JSON, masked for sensitive fields
pub fn field_json(field: &str, value: Option<&FieldValue>) -> JsonValue {
    match value {
        None => JsonValue::Null,
        Some(_) if is_sensitive(field) => JsonValue::String(MASK.into()),
        Some(v) => v.to_json(),
    }
}

fn format_field(field: &str, value: Option<&FieldValue>) -> String {
    match field_json(field, value) {
        JsonValue::Null => "(unset)".to_string(),
        JsonValue::String(s) if is_sensitive(field) => s,
        other => other.to_string(),
    }
}

fn format_change(change: &FieldDiff) -> String {
    let mut line = format!(
        "{}: {} -> {}",
        change.field,
        style(format_field(&change.field, change.old.as_ref())).dim(),
        style(format_field(&change.field, change.new.as_ref())).bold()
    );
    if change.force_new {
        line.push_str(&format!(" {}", style("(forces replacement)").red()));
    }
    line
}

/// Counts shown under a plan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub add: usize,
    pub change: usize,
    pub destroy: usize,
}

impl PlanSummary {
    pub fn from_steps(steps: &[Step]) -> Self {
        steps.iter().fold(Self::default(), |mut s, step| {
            match step.action {
                StepAction::Create => s.add += 1,
                StepAction::Update => s.change += 1,
                StepAction::Replace => {
                    s.add += 1;
                    s.destroy += 1;
                }
                StepAction::Delete => s.destroy += 1,
            }
            s
        })
    }
}

pub fn display_plan(steps: &[Step]) {
    if steps.is_empty() {
        println!(
            "{} No changes. Repositories match the configuration.",
            style("✓").green().bold()
        );
        return;
    }

    for step in steps {
        let (symbol, verb) = match step.action {
            StepAction::Create => (style("+").green(), "will be created"),
            StepAction::Update => (style("~").yellow(), "will be updated in place"),
            StepAction::Replace => (style("-/+").red(), "must be replaced"),
            StepAction::Delete => (style("-").red(), "will be destroyed"),
        };
        println!("{} {} {}", symbol, style(&step.address).bold(), verb);
        for change in &step.changes {
            println!("      {}", format_change(change));
        }
    }

    let s = PlanSummary::from_steps(steps);
    println!();
    println!(
        "{} Plan: {} to add, {} to change, {} to destroy.",
        style("→").blue(),
        s.add,
        s.change,
        s.destroy
    );
}

pub fn display_schema(name: &str, schema: &Schema) {
    println!("{}", style(name).cyan().bold());
    let width = schema.keys().map(str::len).max().unwrap_or(0);

    for (field, spec) in schema.iter() {
        let mut flags = Vec::new();
        if spec.required {
            flags.push("required");
        } else if spec.optional {
            flags.push("optional");
        }
        if spec.computed {
            flags.push("computed");
        }
        if spec.force_new {
            flags.push("forces new");
        }

        println!(
            "  {:width$}  {:14} {}",
            field,
            spec.field_type.to_string(),
            style(flags.join(", ")).dim(),
            width = width
        );
        if let Some(description) = &spec.description {
            println!("  {:width$}  {}", "", style(description).dim(), width = width);
        }
    }
}
