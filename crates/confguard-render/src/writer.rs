use crate::{render, RenderContext, RenderError};
use confguard_types::{CheckResult, OutputFormat, RunResult};
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("writing output: {0}")]
    Io(#[from] std::io::Error),
}

/// Buffers results and renders them in one go on `flush`.
///
/// Formats with a plan or totals need the whole run, so nothing is written before `flush`.
pub struct OutputWriter<W: Write> {
    out: W,
    format: OutputFormat,
    ctx: RenderContext,
    pending: Vec<CheckResult>,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(out: W, format: OutputFormat, ctx: RenderContext) -> Self {
        Self {
            out,
            format,
            ctx,
            pending: Vec::new(),
        }
    }

    pub fn put(&mut self, result: CheckResult) {
        self.pending.push(result);
    }

    /// Render everything buffered so far, write it and flush the sink.
    pub fn flush(&mut self) -> Result<(), WriteError> {
        let run = RunResult::new(std::mem::take(&mut self.pending));
        let text = render(self.format, &run, &self.ctx)?;
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
