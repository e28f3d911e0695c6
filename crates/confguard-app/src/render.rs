//! Render use case: write a run through the configured output format.

use anyhow::Context;
use confguard_render::{OutputWriter, RenderContext};
use confguard_types::{OutputFormat, RunResult, ToolMeta};
use std::io::Write;

pub fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "confguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Render `run` to `out` and flush it.
pub fn write_results<W: Write>(
    out: W,
    run: &RunResult,
    format: OutputFormat,
    trace: bool,
) -> anyhow::Result<()> {
    let mut writer = OutputWriter::new(out, format, RenderContext::new(trace, tool_meta()));
    for result in run {
        writer.put(result.clone());
    }
    writer.flush().context("write output")
}
