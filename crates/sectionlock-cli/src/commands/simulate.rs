use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use sectionlock_core::trace::{replay, Trace};
use sectionlock_core::AppConfig;

pub async fn run(config: AppConfig, trace_path: &Path, json: bool) -> Result<()> {
    let text = tokio::fs::read_to_string(trace_path)
        .await
        .with_context(|| format!("reading trace {}", trace_path.display()))?;
    let trace = Trace::from_json(&text)
        .with_context(|| format!("parsing trace {}", trace_path.display()))?;

    info!(
        "Replaying {} events over {} sections",
        trace.events.len(),
        trace.sections.len()
    );
    let report = replay(&trace, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
