use crate::model::{plural, rows_of};
use crate::RenderContext;
use confguard_types::RunResult;

/// Line-per-message terminal output followed by a totals line.
///
/// `FAIL - <file> - <namespace> - <message>`; file-level problems omit the namespace.
pub fn render_stdout(run: &RunResult, ctx: &RenderContext) -> String {
    let mut lines = Vec::new();
    for result in run {
        for row in rows_of(result) {
            lines.push(match row.namespace {
                Some(ns) => format!("{} - {} - {} - {}", row.kind.label(), row.file, ns, row.message),
                None => format!("{} - {} - {}", row.kind.label(), row.file, row.message),
            });
        }
        if ctx.trace {
            lines.extend(
                result
                    .traces
                    .iter()
                    .map(|t| format!("TRAC - {} - {}", result.filename, t)),
            );
        }
    }

    let s = run.summary();
    let mut totals = format!(
        "{}, {} passed, {}, {}, {}",
        plural(s.tests, "test"),
        s.passed,
        plural(s.warnings, "warning"),
        plural(s.failures, "failure"),
        plural(s.exceptions, "exception"),
    );
    if s.exemptions > 0 {
        totals.push_str(&format!(", {} exempted", s.exemptions));
    }

    let mut out = String::new();
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }
    if !lines.is_empty() {
        out.push('\n');
    }
    out.push_str(&totals);
    out.push('\n');
    out
}
