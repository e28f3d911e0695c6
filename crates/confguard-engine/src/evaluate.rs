use crate::ruleset::{EngineError, RuleSet};
use crate::triggers::{exempted_keys, triggers_of};
use confguard_domain::model::{exemption_key, CellOutcome, InputDocument, Query, RuleClass};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Evaluates documents against a rule set with one engine instance.
///
/// Not shared between threads; each worker creates its own.
pub struct Evaluator<'r> {
    rules: &'r RuleSet,
    engine: regorus::Engine,
    trace: bool,
}

impl<'r> Evaluator<'r> {
    pub fn new(rules: &'r RuleSet, trace: bool) -> Result<Self, EngineError> {
        let mut engine = rules.instantiate()?;
        engine.set_gather_prints(trace);
        Ok(Self {
            rules,
            engine,
            trace,
        })
    }

    /// Evaluate one document against every namespace, in the given order.
    ///
    /// Returns one cell per namespace. Sub-documents of a multi-document input are evaluated
    /// in turn and their outcomes folded into the same cells.
    pub fn evaluate(&mut self, doc: &InputDocument, namespaces: &[String]) -> Vec<CellOutcome> {
        debug!(file = %doc.path, documents = doc.documents.len(), "evaluating");
        let mut cells: Vec<CellOutcome> = namespaces.iter().map(CellOutcome::new).collect();

        for document in &doc.documents {
            if let Err(e) = self.engine.set_input_json(&document.to_string()) {
                let message = format!("binding input: {e}");
                for cell in &mut cells {
                    cell.exception.errors.push(message.clone());
                }
                continue;
            }
            for cell in &mut cells {
                self.evaluate_namespace(cell);
            }
        }
        cells
    }

    fn evaluate_namespace(&mut self, cell: &mut CellOutcome) {
        let ruleset = self.rules;
        let rules = ruleset.rules(&cell.namespace);

        let mut exempt = BTreeSet::new();
        for rule in rules.iter().filter(|r| r.class == RuleClass::Exception) {
            let query = Query::new(cell.namespace.clone(), RuleClass::Exception);
            match self.query(&query, &rule.name, &mut cell.trace) {
                Ok(Some(value)) => exempt.extend(exempted_keys(&value)),
                Ok(None) => {}
                Err(e) => cell.exception.errors.push(e),
            }
        }

        for rule in rules.iter().filter(|r| r.class != RuleClass::Exception) {
            let query = Query::new(cell.namespace.clone(), rule.class);
            match self.query(&query, &rule.name, &mut cell.trace) {
                Ok(Some(value)) => {
                    let triggers = triggers_of(&rule.name, &value);
                    let outcome = cell.outcome_mut(rule.class);
                    if exemption_key(&rule.name).is_some_and(|k| exempt.contains(k)) {
                        outcome.exempted.extend(triggers);
                    } else {
                        outcome.triggered.extend(triggers);
                    }
                }
                Ok(None) => {}
                Err(e) => cell.outcome_mut(rule.class).errors.push(e),
            }
        }
    }

    /// Evaluate one rule. `Ok(None)` means the rule is undefined for this input.
    fn query(
        &mut self,
        query: &Query,
        rule: &str,
        trace: &mut Vec<String>,
    ) -> Result<Option<Value>, String> {
        let rule_ref = query.rule_ref(rule);
        if self.trace {
            trace.push(format!("Enter {rule_ref}"));
        }

        let result = self
            .engine
            .eval_rule(rule_ref.clone())
            .map_err(|e| e.to_string())
            .and_then(|v| to_json(&v));

        if self.trace {
            if let Ok(prints) = self.engine.take_prints() {
                trace.extend(prints);
            }
            trace.push(match &result {
                Ok(Some(v)) => format!("Exit {rule_ref} = {v}"),
                Ok(None) => format!("Exit {rule_ref} = undefined"),
                Err(e) => format!("Error {rule_ref}: {e}"),
            });
        }

        result.map_err(|e| format!("{rule_ref}: {e}"))
    }
}

fn to_json(value: &regorus::Value) -> Result<Option<Value>, String> {
    if matches!(value, regorus::Value::Undefined) {
        return Ok(None);
    }
    let text = value.to_json_str().map_err(|e| e.to_string())?;
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::PolicySource;
    use confguard_domain::data::DataStore;
    use confguard_domain::policy::RegoVersion;
    use confguard_types::InputPath;
    use serde_json::json;

    const MAIN: &str = r#"package main

deny[msg] {
  input.kind == "Service"
  msg := "no services"
}

warn_latest[msg] {
  endswith(input.image, ":latest")
  msg := {"msg": "avoid latest", "id": "IMG-1"}
}
"#;

    fn compile(sources: &[(&str, &str)], data: DataStore) -> RuleSet {
        RuleSet::compile(
            sources
                .iter()
                .map(|(p, t)| PolicySource::new(*p, *t))
                .collect(),
            &data,
            RegoVersion::V0,
        )
        .expect("compile")
    }

    fn ns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn doc(value: Value) -> InputDocument {
        InputDocument::single(InputPath::new("in.yaml"), value)
    }

    #[test]
    fn deny_triggers_with_message() {
        let rules = compile(&[("main.rego", MAIN)], DataStore::new());
        let mut ev = Evaluator::new(&rules, false).expect("engine");
        let cells = ev.evaluate(&doc(json!({"kind": "Service"})), &ns(&["main"]));
        assert_eq!(cells.len(), 1);
        let deny = &cells[0].deny;
        assert_eq!(deny.triggered.len(), 1);
        assert_eq!(deny.triggered[0].message, "no services");
        assert!(!cells[0].is_clean());
        assert!(cells[0].trace.is_empty());
    }

    #[test]
    fn clean_document_is_clean() {
        let rules = compile(&[("main.rego", MAIN)], DataStore::new());
        let mut ev = Evaluator::new(&rules, false).expect("engine");
        let cells = ev.evaluate(&doc(json!({"kind": "Deployment"})), &ns(&["main"]));
        assert!(cells[0].is_clean());
    }

    #[test]
    fn warn_object_keeps_metadata() {
        let rules = compile(&[("main.rego", MAIN)], DataStore::new());
        let mut ev = Evaluator::new(&rules, false).expect("engine");
        let cells = ev.evaluate(&doc(json!({"image": "nginx:latest"})), &ns(&["main"]));
        let warn = &cells[0].warn;
        assert_eq!(warn.triggered[0].message, "avoid latest");
        assert_eq!(warn.triggered[0].metadata, json!({"id": "IMG-1"}));
    }

    #[test]
    fn absent_namespace_yields_clean_cell() {
        let rules = compile(&[("main.rego", MAIN)], DataStore::new());
        let mut ev = Evaluator::new(&rules, false).expect("engine");
        let cells = ev.evaluate(&doc(json!({"kind": "Service"})), &ns(&["nope"]));
        assert_eq!(cells[0].namespace, "nope");
        assert!(cells[0].is_clean());
    }

    #[test]
    fn exception_rule_exempts_named_rules() {
        let src = r#"package main

deny_root[msg] {
  input.user == "root"
  msg := "runs as root"
}

exception[rules] {
  input.trusted
  rules := ["root"]
}
"#;
        let rules = compile(&[("main.rego", src)], DataStore::new());
        let mut ev = Evaluator::new(&rules, false).expect("engine");

        let cells = ev.evaluate(&doc(json!({"user": "root", "trusted": true})), &ns(&["main"]));
        assert!(cells[0].is_clean());
        assert_eq!(cells[0].deny.exempted.len(), 1);

        let cells = ev.evaluate(&doc(json!({"user": "root"})), &ns(&["main"]));
        assert_eq!(cells[0].deny.triggered.len(), 1);
    }

    #[test]
    fn rules_read_loaded_data() {
        let src = r#"package main

deny[msg] {
  not data.registries.allowed[input.registry]
  msg := sprintf("registry %v not allowed", [input.registry])
}
"#;
        let mut data = DataStore::new();
        data.insert(&["registries".to_string()], json!({"allowed": {"ghcr.io": true}}))
            .expect("insert");
        let rules = compile(&[("main.rego", src)], data);
        let mut ev = Evaluator::new(&rules, false).expect("engine");

        let cells = ev.evaluate(&doc(json!({"registry": "ghcr.io"})), &ns(&["main"]));
        assert!(cells[0].is_clean());
        let cells = ev.evaluate(&doc(json!({"registry": "evil.io"})), &ns(&["main"]));
        assert_eq!(
            cells[0].deny.triggered[0].message,
            "registry evil.io not allowed"
        );
    }

    #[test]
    fn multi_document_inputs_fold_into_one_cell() {
        let rules = compile(&[("main.rego", MAIN)], DataStore::new());
        let mut ev = Evaluator::new(&rules, false).expect("engine");
        let input = InputDocument::new(
            InputPath::new("all.yaml"),
            vec![json!({"kind": "Service"}), json!({"kind": "Service"})],
        );
        let cells = ev.evaluate(&input, &ns(&["main"]));
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].deny.triggered.len(), 2);
    }

    #[test]
    fn runtime_errors_stay_in_their_namespace() {
        let broken = r#"package broken

deny[msg] {
  x := to_number("abc")
  msg := sprintf("parsed %v", [x])
}
"#;
        let rules = compile(
            &[("main.rego", MAIN), ("broken.rego", broken)],
            DataStore::new(),
        );
        let mut ev = Evaluator::new(&rules, false).expect("engine");
        let cells = ev.evaluate(&doc(json!({"kind": "Service"})), &ns(&["broken", "main"]));

        assert_eq!(cells[0].namespace, "broken");
        assert_eq!(cells[0].deny.errors.len(), 1);
        assert!(cells[0].deny.errors[0].starts_with("data.broken.deny: "));
        assert!(cells[0].deny.triggered.is_empty());
        assert!(!cells[0].is_clean());

        assert_eq!(cells[1].namespace, "main");
        assert!(cells[1].deny.errors.is_empty());
        assert_eq!(cells[1].deny.triggered[0].message, "no services");
    }

    #[test]
    fn trace_records_enter_and_exit() {
        let rules = compile(&[("main.rego", MAIN)], DataStore::new());
        let mut ev = Evaluator::new(&rules, true).expect("engine");
        let cells = ev.evaluate(&doc(json!({"kind": "Service"})), &ns(&["main"]));
        let trace = &cells[0].trace;
        assert_eq!(trace.first().map(String::as_str), Some("Enter data.main.deny"));
        assert!(trace.iter().any(|l| l == "Exit data.main.deny = [\"no services\"]"));
        assert!(trace.iter().any(|l| l == "Enter data.main.warn_latest"));
    }
}
