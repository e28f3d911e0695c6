use crate::policy::NamespaceSelection;
use std::collections::BTreeSet;

/// Resolve the namespaces every document of a run is evaluated against.
///
/// An explicit list is used verbatim: names absent from `discovered` are kept and simply
/// contribute no rules. `All` yields every discovered namespace in sorted order.
pub fn resolve_namespaces(
    selection: &NamespaceSelection,
    discovered: &BTreeSet<String>,
) -> Vec<String> {
    match selection {
        NamespaceSelection::Explicit(list) => {
            let mut seen = BTreeSet::new();
            list.iter()
                .filter(|ns| seen.insert(ns.as_str()))
                .cloned()
                .collect()
        }
        NamespaceSelection::All => discovered.iter().cloned().collect(),
    }
}

/// Requested namespaces with no compiled rules behind them.
pub fn missing_namespaces<'a>(
    resolved: &'a [String],
    discovered: &BTreeSet<String>,
) -> Vec<&'a str> {
    resolved
        .iter()
        .filter(|ns| !discovered.contains(*ns))
        .map(String::as_str)
        .collect()
}
