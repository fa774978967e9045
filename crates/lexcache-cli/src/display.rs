//! Plain-text tables for the `history` and `sources` subcommands.

use lexcache_core::{DocumentSource, VersionSummary};
use lexcache_sync::CycleReport;

pub fn history_table(law_type: &str, versions: &[VersionSummary]) -> String {
    if versions.is_empty() {
        return format!("{law_type}: no stored versions\n");
    }
    let mut out = format!("{law_type}: {} stored version(s)\n", versions.len());
    out.push_str(&format!("{:>8}  {:<19}  {:>10}\n", "id", "last_updated (UTC)", "bytes"));
    for v in versions {
        out.push_str(&format!(
            "{:>8}  {:<19}  {:>10}\n",
            v.id,
            v.last_updated.format("%Y-%m-%d %H:%M:%S"),
            v.size
        ));
    }
    out
}

pub fn sources_table(sources: &[DocumentSource]) -> String {
    let width = sources
        .iter()
        .map(|s| s.law_type.len())
        .max()
        .unwrap_or(0);
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{:>2}. {:<width$}  {}\n", i + 1, s.law_type, s.url))
        .collect()
}

pub fn cycle_summary(report: &CycleReport) -> String {
    let mut out = format!(
        "updated {} document(s), {} failed\n",
        report.updated.len(),
        report.failed.len()
    );
    for (law_type, error) in &report.failed {
        out.push_str(&format!("  {law_type}: {error}\n"));
    }
    out
}
