//! Check command - report whether a payload can be exported

use anyhow::{bail, Result};
use serde_json::Value;
use std::path::Path;
use yuanbao_core::{looks_like_transcript, read_transcript};

use super::read_payload;
use crate::output::colors;

struct Check {
    name: &'static str,
    passed: bool,
    details: String,
}

pub fn run(file: &Path) -> Result<()> {
    let text = read_payload(file)?;
    let mut checks = Vec::new();

    // Check 1: the same textual sniff the capture side uses
    let sniffed = looks_like_transcript(&text);
    checks.push(Check {
        name: "Payload markers",
        passed: sniffed,
        details: if sniffed {
            "Found \"convs\" and \"createTime\"".to_string()
        } else {
            "Missing \"convs\" or \"createTime\"".to_string()
        },
    });

    // Check 2: valid JSON
    let value = match serde_json::from_str::<Value>(&text) {
        Ok(value) => {
            checks.push(Check {
                name: "JSON",
                passed: true,
                details: format!("{} bytes", colors::format_count(text.len())),
            });
            Some(value)
        }
        Err(e) => {
            checks.push(Check {
                name: "JSON",
                passed: false,
                details: format!("Parse failed: {}", e),
            });
            None
        }
    };

    // Check 3: transcript structure
    if let Some(value) = &value {
        match read_transcript(value) {
            Ok(transcript) => {
                let (human, ai) = transcript.speaker_counts();
                checks.push(Check {
                    name: "Transcript",
                    passed: true,
                    details: format!(
                        "{} turns ({} user, {} agent)",
                        transcript.turns.len(),
                        human,
                        ai
                    ),
                });
            }
            Err(e) => checks.push(Check {
                name: "Transcript",
                passed: false,
                details: e.to_string(),
            }),
        }
    }

    println!("{}", colors::header("Payload Check"));
    println!();
    for check in &checks {
        let status = if check.passed {
            colors::success(check.name)
        } else {
            colors::error(check.name)
        };
        println!("  {} - {}", status, check.details);
    }

    println!();
    if checks.iter().all(|c| c.passed) {
        println!("{}", colors::success("Ready to export"));
        Ok(())
    } else {
        bail!("Payload cannot be exported");
    }
}
