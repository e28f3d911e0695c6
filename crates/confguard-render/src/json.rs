use crate::{RenderContext, RenderError};
use confguard_types::{ReportEnvelope, RunResult, SCHEMA_REPORT_V1};

/// Pretty JSON report envelope. Trace lines are kept only when tracing is on.
pub fn render_json(run: &RunResult, ctx: &RenderContext) -> Result<String, RenderError> {
    let mut results = run.clone();
    if !ctx.trace {
        for r in &mut results.0 {
            r.traces.clear();
        }
    }
    let envelope = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ctx.tool.clone(),
        summary: run.summary(),
        results,
    };
    let mut out = serde_json::to_string_pretty(&envelope)?;
    out.push('\n');
    Ok(out)
}
