//! Hash command presentation.

use crate::error::EngineError;
use crate::hasher::{HashRunSummary, PendingScan};
use serde_json::json;

pub fn format_hash_summary(summary: &HashRunSummary, format: &str) -> Result<String, EngineError> {
    if format == "json" {
        let failures: Vec<_> = summary
            .failures
            .iter()
            .map(|f| json!({ "path": f.path, "cause": f.cause.to_string() }))
            .collect();
        let out = json!({
            "discovered": summary.discovered,
            "already_known": summary.already_known,
            "excluded": summary.excluded,
            "hashed": summary.hashed,
            "failed": summary.failures.len(),
            "failures": failures,
            "elapsed_ms": summary.elapsed.as_millis() as u64,
        });
        return Ok(serde_json::to_string_pretty(&out)?);
    }

    let mut s = format!(
        "Hashed {} new file{} in {} ms ({} already recorded)",
        summary.hashed,
        plural(summary.hashed),
        summary.elapsed.as_millis(),
        summary.already_known
    );
    if !summary.failures.is_empty() {
        s.push_str(&format!(
            "\n\nFailed to hash {} file{} (will retry on next run):",
            summary.failures.len(),
            plural(summary.failures.len())
        ));
        for failure in &summary.failures {
            s.push_str(&format!("\n  - {}: {}", failure.path.display(), failure.cause));
        }
    }
    Ok(s)
}

pub fn format_pending(scan: &PendingScan, format: &str) -> Result<String, EngineError> {
    let pending = &scan.files;
    if format == "json" {
        let paths: Vec<&str> = pending.iter().map(|p| p.manifest_path.as_str()).collect();
        let out = json!({
            "discovered": scan.discovered,
            "already_known": scan.already_known,
            "excluded": scan.excluded,
            "new": paths,
        });
        return Ok(serde_json::to_string_pretty(&out)?);
    }

    if pending.is_empty() {
        return Ok(format!("No new files ({} already recorded)", scan.already_known));
    }
    let mut lines = vec![format!(
        "{} new file{} would be hashed:",
        pending.len(),
        plural(pending.len())
    )];
    lines.extend(pending.iter().map(|p| format!("  {}", p.manifest_path)));
    Ok(lines.join("\n"))
}

pub(super) fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
