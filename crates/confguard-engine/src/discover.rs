//! Line-based discovery of packages and queryable rule heads.
//!
//! The engine answers queries for rules it is asked about, so the runner needs to know which
//! `deny*`/`violation*`/`warn*`/`exception` rules exist and in what order they were written.
//! Only heads starting at column 0 are considered.

use confguard_domain::model::RuleClass;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredRule {
    pub name: String,
    pub class: RuleClass,
}

/// What one source file declares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceLayout {
    /// Dotted package path without the `data.` prefix, e.g. `kubernetes.admission`.
    pub package: Option<String>,
    /// Distinct rules in order of first appearance.
    pub rules: Vec<DiscoveredRule>,
}

#[allow(clippy::expect_used)] // Static regex pattern is hardcoded and valid
fn package_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^package\s+([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)")
            .expect("valid regex")
    })
}

#[allow(clippy::expect_used)] // Static regex pattern is hardcoded and valid
fn rule_head_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*(?:\[|\{|=|:=|contains\b|if\b)")
            .expect("valid regex")
    })
}

pub fn scan_source(text: &str) -> SourceLayout {
    let mut layout = SourceLayout::default();
    for line in text.lines() {
        if layout.package.is_none() {
            if let Some(caps) = package_regex().captures(line) {
                layout.package = Some(caps[1].to_string());
                continue;
            }
        }
        let Some(caps) = rule_head_regex().captures(line) else {
            continue;
        };
        let name = &caps[1];
        let Some(class) = RuleClass::of_rule(name) else {
            continue;
        };
        if layout.rules.iter().all(|r| r.name != name) {
            layout.rules.push(DiscoveredRule {
                name: name.to_string(),
                class,
            });
        }
    }
    layout
}
