use crate::model::{rows_of, RowKind};
use crate::RenderContext;
use confguard_types::RunResult;

/// TAP version 13. One test point per failure, warning, exception and success.
///
/// Warnings are `ok` points marked `# warning`; exemptions and traces are comments.
pub fn render_tap(run: &RunResult, ctx: &RenderContext) -> String {
    let mut out = String::from("TAP version 13\n");
    out.push_str(&format!("1..{}\n", run.summary().tests));

    let mut n = 0u32;
    for result in run {
        for row in rows_of(result) {
            let subject = match row.namespace {
                Some(ns) => format!("{} - {} - {}", row.file, ns, row.message),
                None => format!("{} - {}", row.file, row.message),
            };
            let line = match row.kind {
                RowKind::Failure => {
                    n += 1;
                    format!("not ok {n} - {subject}")
                }
                RowKind::Warning => {
                    n += 1;
                    format!("ok {n} - {subject} # warning")
                }
                RowKind::Exception => {
                    n += 1;
                    format!("not ok {n} - {subject} # exception")
                }
                RowKind::Exemption => format!("# exempted: {subject}"),
            };
            out.push_str(&line);
            out.push('\n');
        }
        for _ in 0..result.successes {
            n += 1;
            out.push_str(&format!("ok {n} - {}\n", result.filename));
        }
        if ctx.trace {
            for t in &result.traces {
                out.push_str(&format!("# {t}\n"));
            }
        }
    }
    out
}
