use crate::model::rows_of;
use crate::RenderContext;
use confguard_types::RunResult;

const HEADERS: [&str; 4] = ["RESULT", "FILE", "NAMESPACE", "MESSAGE"];

/// Fixed-width table. Files with successes get one `success` row carrying the count.
pub fn render_table(run: &RunResult, ctx: &RenderContext) -> String {
    let mut body: Vec<[String; 4]> = Vec::new();
    for result in run {
        for row in rows_of(result) {
            body.push([
                row.kind.name().to_string(),
                row.file.to_string(),
                row.namespace.unwrap_or("-").to_string(),
                row.message.to_string(),
            ]);
        }
        if result.successes > 0 {
            body.push([
                "success".to_string(),
                result.filename.to_string(),
                result.namespaces.join(", "),
                format!("{} passed", result.successes),
            ]);
        }
        if ctx.trace {
            for t in &result.traces {
                body.push([
                    "trace".to_string(),
                    result.filename.to_string(),
                    "-".to_string(),
                    t.clone(),
                ]);
            }
        }
    }

    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let border = {
        let parts: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+\n", parts.join("+"))
    };
    let line = |cells: &[&str]| {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!(" {c:<w$} ", w = *w))
            .collect();
        format!("|{}|\n", parts.join("|"))
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&line(&HEADERS));
    out.push_str(&border);
    for cells in &body {
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        out.push_str(&line(&refs));
    }
    if !body.is_empty() {
        out.push_str(&border);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ctx;
    use confguard_types::{CheckResult, InputPath, ResultMessage};

    #[test]
    fn renders_aligned_rows() {
        let mut a = CheckResult::new(InputPath::new("a.yaml"));
        a.namespaces = vec!["main".to_string()];
        a.failures
            .push(ResultMessage::new("no services").in_namespace("main"));
        let mut b = CheckResult::new(InputPath::new("b.json"));
        b.namespaces = vec!["main".to_string()];
        b.successes = 1;

        let out = render_table(&RunResult::new(vec![a, b]), &ctx(false));
        insta::assert_snapshot!(out, @r"
        +---------+--------+-----------+-------------+
        | RESULT  | FILE   | NAMESPACE | MESSAGE     |
        +---------+--------+-----------+-------------+
        | failure | a.yaml | main      | no services |
        | success | b.json | main      | 1 passed    |
        +---------+--------+-----------+-------------+
        ");
    }

    #[test]
    fn empty_run_is_header_only() {
        let out = render_table(&RunResult::default(), &ctx(false));
        assert_eq!(out.lines().count(), 3);
    }
}
