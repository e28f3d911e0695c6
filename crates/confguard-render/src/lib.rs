//! Rendering of run results (terminal, JSON, TAP, tables, Markdown, GitHub annotations).
//!
//! Renderers are pure: they compute nothing semantic and the same results always render to
//! the same bytes.

#![forbid(unsafe_code)]

mod gha;
mod json;
mod markdown;
mod model;
mod stdout;
mod table;
mod tap;
mod writer;

use confguard_types::{OutputFormat, RunResult, ToolMeta};

pub use gha::render_github_annotations;
pub use json::render_json;
pub use markdown::render_markdown;
pub use model::{rows, Row, RowKind};
pub use stdout::render_stdout;
pub use table::render_table;
pub use tap::render_tap;
pub use writer::{OutputWriter, WriteError};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("serializing report: {0}")]
    Json(#[from] serde_json::Error),
}

/// What every renderer may look at besides the results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderContext {
    /// Include trace lines.
    pub trace: bool,
    pub tool: ToolMeta,
}

impl RenderContext {
    pub fn new(trace: bool, tool: ToolMeta) -> Self {
        Self { trace, tool }
    }
}

type RenderFn = fn(&RunResult, &RenderContext) -> Result<String, RenderError>;

const RENDERERS: [(OutputFormat, RenderFn); 6] = [
    (OutputFormat::Stdout, |r, c| Ok(render_stdout(r, c))),
    (OutputFormat::Json, render_json),
    (OutputFormat::Tap, |r, c| Ok(render_tap(r, c))),
    (OutputFormat::Table, |r, c| Ok(render_table(r, c))),
    (OutputFormat::Markdown, |r, c| Ok(render_markdown(r, c))),
    (OutputFormat::Github, |r, c| Ok(render_github_annotations(r, c))),
];

/// Render a run with the renderer registered for `format`.
pub fn render(
    format: OutputFormat,
    run: &RunResult,
    ctx: &RenderContext,
) -> Result<String, RenderError> {
    RENDERERS
        .iter()
        .find(|(f, _)| *f == format)
        .map_or_else(|| Ok(render_stdout(run, ctx)), |(_, r)| r(run, ctx))
}
