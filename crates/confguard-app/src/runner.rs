//! The test runner: load, group, evaluate, aggregate.

use crate::{Cancellation, RunError};
use confguard_domain::model::InputUnit;
use confguard_domain::policy::RunnerConfig;
use confguard_domain::{
    aggregate_document, assemble, missing_namespaces, resolve_namespaces, unparsable_result,
};
use confguard_engine::Evaluator;
use confguard_types::{CheckResult, RunResult};
use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, info, warn};

/// Runs policies against inputs under one immutable configuration.
#[derive(Debug)]
pub struct TestRunner {
    config: RunnerConfig,
    ignore: Option<Regex>,
}

impl TestRunner {
    pub fn new(config: RunnerConfig) -> Result<Self, RunError> {
        let ignore = config
            .ignore
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| RunError::Config(format!("invalid ignore pattern: {e}")))?;
        if config.parallelism == Some(0) {
            return Err(RunError::Config("parallelism must be at least 1".to_string()));
        }
        Ok(Self { config, ignore })
    }

    /// Evaluate `inputs` (files, directories, or `-` for stdin).
    ///
    /// Results come back in input order whatever the worker count. Load and compile errors,
    /// parse errors in combined mode and cancellation are fatal; nothing partial is returned.
    pub fn run(&self, cancel: &Cancellation, inputs: &[String]) -> Result<RunResult, RunError> {
        let cfg = &self.config;
        check_cancelled(cancel)?;

        let data = confguard_repo::load_data(&cfg.data_paths)?;
        let rules = confguard_repo::load_policies(&cfg.policy_paths, &data, cfg.rego_version)?;

        let discovered = rules.namespaces();
        let namespaces = resolve_namespaces(&cfg.namespaces, &discovered);
        for ns in missing_namespaces(&namespaces, &discovered) {
            warn!(namespace = ns, "namespace has no policies");
        }

        let paths = confguard_repo::discover_inputs(inputs)?;
        let units = confguard_repo::group_inputs(
            paths,
            self.ignore.as_ref(),
            cfg.combine,
            cfg.input_format,
        )?;
        info!(
            units = units.len(),
            namespaces = namespaces.len(),
            "evaluating"
        );
        check_cancelled(cancel)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count())
            .build()?;

        let trace = cfg.trace;
        let evaluated: Vec<Result<(usize, CheckResult), RunError>> = pool.install(|| {
            units
                .par_iter()
                .enumerate()
                .map_init(
                    || Evaluator::new(&rules, trace),
                    |evaluator, (idx, unit)| {
                        check_cancelled(cancel)?;
                        let result = match unit {
                            InputUnit::Unparsable { path, error } => {
                                debug!(file = %path, "unparsable input");
                                unparsable_result(path.clone(), &namespaces, error)
                            }
                            InputUnit::Document(doc) => {
                                let evaluator = evaluator.as_mut().map_err(|e| e.clone())?;
                                let cells = evaluator.evaluate(doc, &namespaces);
                                aggregate_document(doc.path.clone(), &namespaces, cells)
                            }
                        };
                        Ok((idx, result))
                    },
                )
                .collect()
        });

        let mut ordered = Vec::with_capacity(evaluated.len());
        let mut first_error = None;
        for item in evaluated {
            match item {
                Ok(pair) => ordered.push(pair),
                Err(RunError::Cancelled) => return Err(RunError::Cancelled),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }
        check_cancelled(cancel)?;

        // Workers may finish out of order; input order is the contract.
        ordered.sort_by_key(|(idx, _)| *idx);
        Ok(assemble(ordered.into_iter().map(|(_, r)| r).collect()))
    }

    fn worker_count(&self) -> usize {
        self.config.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

fn check_cancelled(cancel: &Cancellation) -> Result<(), RunError> {
    if cancel.is_cancelled() {
        Err(RunError::Cancelled)
    } else {
        Ok(())
    }
}
