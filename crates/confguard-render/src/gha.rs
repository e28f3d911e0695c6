use crate::model::{rows_of, RowKind};
use crate::RenderContext;
use confguard_types::{ids, RunResult};

/// Render messages as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path}::[{namespace}] {message}`
pub fn render_github_annotations(run: &RunResult, _ctx: &RenderContext) -> String {
    let mut out = String::new();

    for result in run {
        for row in rows_of(result) {
            let level = match row.kind {
                RowKind::Failure | RowKind::Exception => "error",
                RowKind::Warning => "warning",
                RowKind::Exemption => "notice",
            };

            let message = match row.namespace {
                Some(ns) => format!("[{}] {}", ns, row.message),
                None => row.message.to_string(),
            };
            let message = escape_data(&message);

            // Synthetic paths do not point at a file in the checkout.
            if row.file == ids::COMBINED_FILENAME || row.file == ids::STDIN_PATH {
                out.push_str(&format!("::{}::{}\n", level, message));
            } else {
                out.push_str(&format!(
                    "::{} file={}::{}\n",
                    level,
                    escape_property(row.file),
                    message
                ));
            }
        }
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
