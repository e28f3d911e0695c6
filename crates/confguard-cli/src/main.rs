//! CLI entry point for confguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `confguard-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use confguard_app::{run_parse, run_test, write_results, Cancellation, ParseInput, TestInput};
use confguard_settings::Overrides;
use confguard_types::ids;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "confguard",
    version,
    about = "Test configuration files against Rego policies"
)]
struct Cli {
    /// Path to confguard config TOML (missing file is allowed).
    #[arg(long, global = true, default_value = ids::DEFAULT_CONFIG_FILE)]
    config: Utf8PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate policies against the inputs and report the results.
    Test {
        #[command(flatten)]
        run: RunArgs,

        /// Output format (stdout, json, tap, table, markdown, github).
        #[arg(short, long)]
        output: Option<String>,

        /// Include rule traces in the output.
        #[arg(long)]
        trace: bool,

        /// Return a non-zero exit code when only warnings are found.
        #[arg(long)]
        fail_on_warn: bool,

        /// Worker pool size (defaults to available parallelism).
        #[arg(long)]
        parallelism: Option<usize>,

        /// Rego syntax version of the policies (v0 or v1).
        #[arg(long)]
        rego_version: Option<String>,
    },

    /// Print the inputs as policies would see them.
    Parse {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Files or directories to test; `-` reads standard input.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Policy file or directory (repeatable; default `policy`).
    #[arg(short, long)]
    policy: Vec<String>,

    /// Data file or directory exposed as `data` (repeatable).
    #[arg(short, long)]
    data: Vec<String>,

    /// Namespace to evaluate (repeatable; default `main`).
    #[arg(short, long)]
    namespace: Vec<String>,

    /// Evaluate every namespace found in the policies.
    #[arg(long)]
    all_namespaces: bool,

    /// Evaluate all inputs as one document keyed by file path.
    #[arg(long)]
    combine: bool,

    /// Regular expression; matching input paths are skipped.
    #[arg(long)]
    ignore: Option<String>,

    /// Force the input format (json, yaml, toml) instead of detecting by extension.
    #[arg(short, long)]
    input: Option<String>,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            policy: self.policy.clone(),
            data: self.data.clone(),
            namespace: self.namespace.clone(),
            all_namespaces: flag(self.all_namespaces),
            combine: flag(self.combine),
            ignore: self.ignore.clone(),
            input: self.input.clone(),
            ..Overrides::default()
        }
    }
}

/// A switch that is off on the command line leaves the config file value in place.
fn flag(on: bool) -> Option<bool> {
    on.then_some(true)
}

fn main() {
    init_logging();
    // Usage errors share the runtime-error code so they never read as a policy outcome.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(ids::EXIT_RUNTIME_ERROR);
        }
    };

    let result = match &cli.cmd {
        Commands::Test {
            run,
            output,
            trace,
            fail_on_warn,
            parallelism,
            rego_version,
        } => {
            let overrides = Overrides {
                output: output.clone(),
                trace: flag(*trace),
                fail_on_warn: flag(*fail_on_warn),
                parallelism: *parallelism,
                rego_version: rego_version.clone(),
                ..run.overrides()
            };
            cmd_test(&cli, &run.inputs, overrides)
        }
        Commands::Parse { run } => cmd_parse(&cli, &run.inputs, run.overrides()),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("confguard error: {err:#}");
            std::process::exit(ids::EXIT_RUNTIME_ERROR);
        }
    }
}

/// Logs go to stderr; stdout carries only rendered output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_config(cli: &Cli) -> String {
    // Missing file is allowed (defaults apply).
    std::fs::read_to_string(&cli.config).unwrap_or_default()
}

fn cmd_test(cli: &Cli, inputs: &[String], overrides: Overrides) -> anyhow::Result<i32> {
    let cfg_text = read_config(cli);
    let output = run_test(
        TestInput {
            config_text: &cfg_text,
            overrides,
            inputs,
        },
        &Cancellation::new(),
    )?;
    tracing::debug!(
        files = output.run.len(),
        exit_code = output.exit_code,
        "run finished"
    );

    let stdout = std::io::stdout().lock();
    write_results(
        stdout,
        &output.run,
        output.resolved.output,
        output.resolved.runner.trace,
    )?;
    Ok(output.exit_code)
}

fn cmd_parse(cli: &Cli, inputs: &[String], overrides: Overrides) -> anyhow::Result<i32> {
    let cfg_text = read_config(cli);
    let text = run_parse(ParseInput {
        config_text: &cfg_text,
        overrides,
        inputs,
    })?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .context("write parsed inputs")?;
    Ok(ids::EXIT_OK)
}
