//! Verify command presentation.

use super::hash::plural;
use crate::error::EngineError;
use crate::verify::{ReportOutcome, VerificationReport};
use serde_json::json;

pub fn format_verification(
    report: &VerificationReport,
    outcome: &ReportOutcome,
    format: &str,
) -> Result<String, EngineError> {
    if format == "json" {
        let problems: Vec<_> = report.problems().collect();
        let report_path = match outcome {
            ReportOutcome::Clean => None,
            ReportOutcome::Written { path, .. } => Some(path),
        };
        let out = json!({
            "verified": report.verified_count(),
            "problems": problems,
            "report": report_path,
            "elapsed_ms": report.elapsed.as_millis() as u64,
        });
        return Ok(serde_json::to_string_pretty(&out)?);
    }

    let mut lines = vec![format!(
        "Verified {} file hash{} in {} ms",
        report.verified_count(),
        if report.verified_count() == 1 { "" } else { "es" },
        report.elapsed.as_millis()
    )];
    match outcome {
        ReportOutcome::Clean => lines.push("No mismatches found".to_string()),
        ReportOutcome::Written { path, problems } => lines.push(format!(
            "Wrote {} mismatch{} to {}",
            problems,
            if *problems == 1 { "" } else { "es" },
            path.display()
        )),
    }
    let missing = report
        .problems()
        .filter(|o| o.result == crate::types::VerificationResult::Missing)
        .count();
    if missing > 0 {
        lines.push(format!("  {} missing file{}", missing, plural(missing)));
    }
    Ok(lines.join("\n"))
}
