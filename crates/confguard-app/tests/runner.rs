//! End-to-end tests of the test runner against temporary policy trees.

use camino::{Utf8Path, Utf8PathBuf};
use confguard_app::{Cancellation, RunError, TestRunner};
use confguard_domain::policy::{FailOn, NamespaceSelection, RunnerConfig};
use confguard_domain::{exit_code, exit_code_fail_on_warn};
use confguard_types::InputPath;
use tempfile::TempDir;

const MAIN_POLICY: &str = r#"package main

deny[msg] {
  input.kind == "Service"
  msg := "no services"
}

warn[msg] {
  input.replicas < 2
  msg := "single replica"
}
"#;

struct Fixture {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        Self { _tmp: tmp, root }
    }

    fn write(&self, rel: &str, contents: &str) -> String {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, contents).expect("write file");
        path.to_string()
    }

    fn config(&self) -> RunnerConfig {
        RunnerConfig {
            policy_paths: vec![self.root.join("policy")],
            ..RunnerConfig::default()
        }
    }

    fn path(&self, rel: &str) -> Utf8PathBuf {
        self.root.join(rel)
    }
}

fn run(cfg: RunnerConfig, inputs: &[String]) -> confguard_types::RunResult {
    TestRunner::new(cfg)
        .expect("runner")
        .run(&Cancellation::new(), inputs)
        .expect("run")
}

fn input_path(p: &str) -> InputPath {
    InputPath::from(Utf8Path::new(p))
}

#[test]
fn scenario_a_service_is_denied() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let svc = fx.write("svc.json", r#"{"kind": "Service"}"#);

    let result = run(fx.config(), &[svc.clone()]);
    assert_eq!(result.len(), 1);
    let r = &result.results()[0];
    assert_eq!(r.filename, input_path(&svc));
    assert_eq!(r.successes, 0);
    assert_eq!(r.failures.len(), 1);
    assert_eq!(r.failures[0].message, "no services");
    assert_eq!(exit_code(&result), 1);
}

#[test]
fn scenario_b_deployment_passes() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let dep = fx.write("dep.json", r#"{"kind": "Deployment", "replicas": 3}"#);

    let result = run(fx.config(), &[dep]);
    let r = &result.results()[0];
    assert_eq!(r.successes, 1);
    assert!(r.failures.is_empty() && r.warnings.is_empty() && r.exceptions.is_empty());
    assert_eq!(exit_code(&result), 0);
}

#[test]
fn rule_errors_become_exceptions_of_their_namespace() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    fx.write(
        "policy/broken.rego",
        "package broken\n\ndeny[msg] {\n  x := to_number(\"abc\")\n  msg := sprintf(\"%v\", [x])\n}\n",
    );
    fx.write(
        "policy/conflict.rego",
        "package conflict\n\ndeny = \"first\" { true }\n\ndeny = \"second\" { true }\n",
    );
    let svc = fx.write("svc.json", r#"{"kind": "Service"}"#);

    let cfg = RunnerConfig {
        namespaces: NamespaceSelection::All,
        ..fx.config()
    };
    let result = run(cfg, &[svc]);
    let r = &result.results()[0];
    assert_eq!(r.namespaces, vec!["broken", "conflict", "main"]);
    assert_eq!(r.successes, 0);

    assert_eq!(r.failures.len(), 1);
    assert_eq!(r.failures[0].message, "no services");
    assert_eq!(r.failures[0].namespace.as_deref(), Some("main"));

    let attributed: Vec<_> = r.exceptions.iter().map(|e| e.namespace.as_deref()).collect();
    assert_eq!(attributed, vec![Some("broken"), Some("conflict")]);
    assert!(r.exceptions[0].message.starts_with("data.broken.deny: "));
    assert_eq!(exit_code(&result), 1);
}

#[test]
fn scenario_c_warning_only_depends_on_policy() {
    let fx = Fixture::new();
    fx.write(
        "policy/main.rego",
        "package main\n\nwarn[msg] {\n  input.replicas < 2\n  msg := \"single replica\"\n}\n",
    );
    let dep = fx.write("dep.yaml", "kind: Deployment\nreplicas: 1\n");

    let result = run(fx.config(), &[dep]);
    assert_eq!(result.results()[0].warnings.len(), 1);
    assert_eq!(exit_code(&result), 0);
    assert_ne!(exit_code_fail_on_warn(&result), 0);
    assert_eq!(FailOn::Warning.exit_code(&result), 1);
}

#[test]
fn scenario_d_ignore_pattern_drops_a_file() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let keep = fx.write("inputs/keep.json", r#"{"kind": "Deployment", "replicas": 2}"#);
    let skip = fx.write("inputs/skip.json", r#"{"kind": "Service"}"#);

    let cfg = RunnerConfig {
        ignore: Some("skip".to_string()),
        ..fx.config()
    };
    let result = run(cfg, &[keep.clone(), skip]);
    assert_eq!(result.len(), 1);
    assert_eq!(result.results()[0].filename, input_path(&keep));
}

#[test]
fn results_keep_input_order_with_many_workers() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let inputs: Vec<String> = (0..24)
        .map(|i| {
            let kind = if i % 3 == 0 { "Service" } else { "Deployment" };
            fx.write(
                &format!("inputs/{:02}.json", 23 - i),
                &format!(r#"{{"kind": "{kind}", "replicas": 2}}"#),
            )
        })
        .collect();

    let cfg = RunnerConfig {
        parallelism: Some(4),
        ..fx.config()
    };
    let result = run(cfg.clone(), &inputs);
    let got: Vec<String> = result.iter().map(|r| r.filename.to_string()).collect();
    let want: Vec<String> = inputs.iter().map(|p| input_path(p).to_string()).collect();
    assert_eq!(got, want);

    let again = run(cfg, &inputs);
    assert_eq!(
        serde_json::to_string(&result).expect("json"),
        serde_json::to_string(&again).expect("json")
    );
}

#[test]
fn combined_mode_sees_documents_by_path() {
    let fx = Fixture::new();
    fx.write(
        "policy/main.rego",
        r#"package main

deny[msg] {
  count(input) > 1
  msg := sprintf("%d files", [count(input)])
}

deny[msg] {
  input.kind == "Service"
  msg := "never matches combined input"
}
"#,
    );
    let a = fx.write("a.json", r#"{"kind": "Service"}"#);
    let b = fx.write("b.json", r#"{"kind": "Service"}"#);

    let cfg = RunnerConfig {
        combine: true,
        ..fx.config()
    };
    let result = run(cfg, &[a, b]);
    assert_eq!(result.len(), 1);
    let r = &result.results()[0];
    assert_eq!(r.filename, InputPath::combined());
    let msgs: Vec<_> = r.failures.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(msgs, vec!["2 files"]);
}

#[test]
fn combined_mode_with_all_inputs_ignored_is_one_result() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let a = fx.write("a.json", r#"{"kind": "Service"}"#);

    let cfg = RunnerConfig {
        combine: true,
        ignore: Some(r"a\.json$".to_string()),
        ..fx.config()
    };
    let result = run(cfg, &[a]);
    assert_eq!(result.len(), 1);
    assert_eq!(result.results()[0].successes, 1);
}

#[test]
fn combined_mode_parse_error_is_fatal() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let bad = fx.write("bad.json", "{");

    let cfg = RunnerConfig {
        combine: true,
        ..fx.config()
    };
    let err = TestRunner::new(cfg)
        .expect("runner")
        .run(&Cancellation::new(), &[bad])
        .unwrap_err();
    assert!(matches!(err, RunError::Input(_)), "{err}");
}

#[test]
fn per_file_parse_error_is_an_exception() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let bad = fx.write("bad.json", "{");
    let good = fx.write("good.json", r#"{"kind": "Deployment", "replicas": 2}"#);

    let result = run(fx.config(), &[bad, good]);
    assert_eq!(result.len(), 2);
    assert_eq!(result.results()[0].exceptions.len(), 1);
    assert_eq!(result.results()[1].successes, 1);
    assert_eq!(exit_code(&result), 1);
}

#[test]
fn all_namespaces_evaluates_every_package() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    fx.write(
        "policy/k8s.rego",
        "package k8s\n\ndeny[msg] {\n  input.kind == \"Service\"\n  msg := \"k8s says no\"\n}\n",
    );
    let svc = fx.write("svc.json", r#"{"kind": "Service", "replicas": 2}"#);

    let cfg = RunnerConfig {
        namespaces: NamespaceSelection::All,
        ..fx.config()
    };
    let result = run(cfg, &[svc]);
    let r = &result.results()[0];
    assert_eq!(r.namespaces, vec!["k8s".to_string(), "main".to_string()]);
    let got: Vec<_> = r
        .failures
        .iter()
        .map(|m| (m.namespace.as_deref().unwrap_or(""), m.message.as_str()))
        .collect();
    assert_eq!(got, vec![("k8s", "k8s says no"), ("main", "no services")]);
}

#[test]
fn absent_namespace_is_a_success_not_an_error() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let svc = fx.write("svc.json", r#"{"kind": "Service"}"#);

    let cfg = RunnerConfig {
        namespaces: NamespaceSelection::Explicit(vec!["nothing_here".to_string()]),
        ..fx.config()
    };
    let result = run(cfg, &[svc]);
    let r = &result.results()[0];
    assert_eq!(r.successes, 1);
    assert!(r.failures.is_empty() && r.exceptions.is_empty());
}

#[test]
fn data_is_visible_to_rules() {
    let fx = Fixture::new();
    fx.write(
        "policy/main.rego",
        r#"package main

deny[msg] {
  not data.images.allowed[input.image]
  msg := sprintf("image %s is not allowed", [input.image])
}
"#,
    );
    fx.write("data/images.yaml", "allowed:\n  nginx: true\n");
    let ok = fx.write("ok.json", r#"{"image": "nginx"}"#);
    let bad = fx.write("bad.json", r#"{"image": "redis"}"#);

    let cfg = RunnerConfig {
        data_paths: vec![fx.path("data")],
        ..fx.config()
    };
    let result = run(cfg, &[ok, bad]);
    assert_eq!(result.results()[0].successes, 1);
    assert_eq!(
        result.results()[1].failures[0].message,
        "image redis is not allowed"
    );
}

#[test]
fn directory_inputs_expand() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    fx.write("inputs/b.json", r#"{"kind": "Service"}"#);
    fx.write("inputs/a.yaml", "kind: Deployment\nreplicas: 2\n");

    let result = run(fx.config(), &[fx.path("inputs").to_string()]);
    let names: Vec<_> = result
        .iter()
        .map(|r| r.filename.as_str().rsplit('/').next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["a.yaml", "b.json"]);
}

#[test]
fn trace_lines_are_attached_only_when_enabled() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let svc = fx.write("svc.json", r#"{"kind": "Service", "replicas": 2}"#);

    let traced = run(
        RunnerConfig {
            trace: true,
            ..fx.config()
        },
        &[svc.clone()],
    );
    assert!(traced.results()[0]
        .traces
        .iter()
        .any(|l| l == "Enter data.main.deny"));

    let quiet = run(fx.config(), &[svc]);
    assert!(quiet.results()[0].traces.is_empty());
}

#[test]
fn cancelled_run_returns_no_results() {
    let fx = Fixture::new();
    fx.write("policy/main.rego", MAIN_POLICY);
    let svc = fx.write("svc.json", r#"{"kind": "Service"}"#);

    let cancel = Cancellation::new();
    cancel.cancel();
    let err = TestRunner::new(fx.config())
        .expect("runner")
        .run(&cancel, &[svc])
        .unwrap_err();
    assert!(matches!(err, RunError::Cancelled));
}

#[test]
fn missing_policies_are_fatal() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.path("policy")).expect("mkdir");
    let svc = fx.write("svc.json", "{}");

    let err = TestRunner::new(fx.config())
        .expect("runner")
        .run(&Cancellation::new(), &[svc])
        .unwrap_err();
    assert!(matches!(err, RunError::Policy(_)), "{err}");
}

#[test]
fn invalid_ignore_pattern_is_rejected_up_front() {
    let cfg = RunnerConfig {
        ignore: Some("(".to_string()),
        ..RunnerConfig::default()
    };
    assert!(matches!(TestRunner::new(cfg), Err(RunError::Config(_))));
}
