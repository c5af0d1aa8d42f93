use anyhow::{Context, Result};
use tracing::{debug, info_span};

use psi_layout::{dump_to_string, parse_base64_state};

/// Decode `blob` and render its textual dump.
pub fn run_dump(blob: &str) -> Result<String> {
    let span = info_span!("dump", input_len = blob.len());
    let _guard = span.enter();
    let state = parse_base64_state(blob).context("decode toolbar state")?;
    debug!(
        records = state.records.len(),
        toolbars = state
            .toolbar_layouts()
            .map(psi_layout::ToolBarLayout::entry_count)
            .sum::<usize>(),
        "state decoded"
    );
    Ok(dump_to_string(&state))
}
