use confguard_types::{CheckResult, ResultMessage, RunResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Failure,
    Warning,
    Exception,
    Exemption,
}

impl RowKind {
    /// Short label used by the line-oriented formats.
    pub fn label(self) -> &'static str {
        match self {
            RowKind::Failure => "FAIL",
            RowKind::Warning => "WARN",
            RowKind::Exception => "ERROR",
            RowKind::Exemption => "EXEMPT",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RowKind::Failure => "failure",
            RowKind::Warning => "warning",
            RowKind::Exception => "exception",
            RowKind::Exemption => "exemption",
        }
    }
}

/// One reportable message, flattened out of its `CheckResult`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Row<'a> {
    pub kind: RowKind,
    pub file: &'a str,
    pub namespace: Option<&'a str>,
    pub message: &'a str,
}

/// Every message of a run, file by file; within a file failures, warnings, exceptions, then
/// exemptions, each in result order.
pub fn rows(run: &RunResult) -> Vec<Row<'_>> {
    run.iter().flat_map(rows_of).collect()
}

pub(crate) fn rows_of(result: &CheckResult) -> Vec<Row<'_>> {
    let file = result.filename.as_str();
    let mut out = Vec::new();
    push_group(&mut out, RowKind::Failure, file, &result.failures);
    push_group(&mut out, RowKind::Warning, file, &result.warnings);
    push_group(&mut out, RowKind::Exception, file, &result.exceptions);
    push_group(&mut out, RowKind::Exemption, file, &result.exemptions);
    out
}

fn push_group<'a>(out: &mut Vec<Row<'a>>, kind: RowKind, file: &'a str, msgs: &'a [ResultMessage]) {
    out.extend(msgs.iter().map(|m| Row {
        kind,
        file,
        namespace: m.namespace.as_deref(),
        message: m.message.as_str(),
    }));
}

pub(crate) fn plural(n: u32, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
