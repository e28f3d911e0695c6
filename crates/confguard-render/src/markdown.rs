use crate::model::{plural, rows_of, RowKind};
use crate::RenderContext;
use confguard_types::RunResult;

pub fn render_markdown(run: &RunResult, ctx: &RenderContext) -> String {
    let mut out = String::new();
    let s = run.summary();

    out.push_str("# Confguard report\n\n");
    let verdict = if s.failures > 0 || s.exceptions > 0 {
        "FAIL"
    } else if s.warnings > 0 {
        "WARN"
    } else {
        "PASS"
    };
    out.push_str(&format!(
        "- Result: **{}**\n- Tests: {} ({} passed, {}, {}, {})\n",
        verdict,
        s.tests,
        s.passed,
        plural(s.warnings, "warning"),
        plural(s.failures, "failure"),
        plural(s.exceptions, "exception"),
    ));
    if s.exemptions > 0 {
        out.push_str(&format!("- Exempted: {}\n", s.exemptions));
    }
    out.push('\n');

    let rows: Vec<_> = run.iter().flat_map(rows_of).collect();
    if rows.is_empty() {
        out.push_str("No findings.\n");
    } else {
        out.push_str("## Findings\n\n");
        for row in rows {
            let tag = match row.kind {
                RowKind::Failure => "FAIL",
                RowKind::Warning => "WARN",
                RowKind::Exception => "ERROR",
                RowKind::Exemption => "EXEMPT",
            };
            match row.namespace {
                Some(ns) => out.push_str(&format!(
                    "- [{}] `{}` / `{}`: {}\n",
                    tag, row.file, ns, row.message
                )),
                None => out.push_str(&format!("- [{}] `{}`: {}\n", tag, row.file, row.message)),
            }
        }
    }

    if ctx.trace && run.iter().any(|r| !r.traces.is_empty()) {
        out.push_str("\n## Trace\n");
        for r in run.iter().filter(|r| !r.traces.is_empty()) {
            out.push_str(&format!("\n### `{}`\n\n```text\n", r.filename));
            for t in &r.traces {
                out.push_str(t);
                out.push('\n');
            }
            out.push_str("```\n");
        }
    }

    out
}
