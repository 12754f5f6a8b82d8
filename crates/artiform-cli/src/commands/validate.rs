//! Validate command - check a manifest against the resource schemas
//!
//! Runs entirely offline.

use artiform_repo::{RepoError, ResourceRegistry};
use console::style;
use std::path::Path;

use crate::display::{Severity, ValidationIssue, ValidationReport};
use crate::error::{CliError, Result};
use crate::exit_codes;
use crate::manifest::Manifest;

pub fn run(manifest_path: &Path, json_output: bool) -> Result<()> {
    let registry = ResourceRegistry::builtin()?;
    let manifest = Manifest::load(manifest_path)?;

    if !json_output {
        println!(
            "{} Validating {} from {}",
            style("→").blue(),
            crate::display::pluralize(manifest.resources.len(), "resource", "resources"),
            manifest_path.display()
        );
        println!();
    }

    let mut report = ValidationReport::new();
    for block in &manifest.resources {
        let address = block.address();
        let issues = match block.declare(&registry) {
            Ok(declared) => {
                let mut issues = match declared.resource.validate(&declared.data) {
                    Ok(()) => Vec::new(),
                    Err(RepoError::Validation { errors, .. }) => errors
                        .into_iter()
                        .map(|e| ValidationIssue {
                            severity: Severity::Error,
                            path: e.path,
                            message: e.message,
                        })
                        .collect(),
                    Err(other) => return Err(other.into()),
                };
                if declared.data.is_set("password") {
                    issues.push(ValidationIssue {
                        severity: Severity::Warning,
                        path: "password".to_string(),
                        message: "stored in the state file in plain text".to_string(),
                    });
                }
                issues
            }
            Err(CliError::Validation { message, .. }) | Err(CliError::Usage { message, .. }) => {
                vec![ValidationIssue {
                    severity: Severity::Error,
                    path: String::new(),
                    message,
                }]
            }
            Err(other) => return Err(other),
        };
        report.add(&address, issues);
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        report.display();
        println!();
        report.print_summary();
    }

    if report.has_errors() {
        std::process::exit(exit_codes::VALIDATION_ERROR);
    }
    Ok(())
}
