use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use super::{Host, Inventory};
use crate::error::FilterError;

/// Raw filter flags as given on the command line, each comma-separated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub hosts: Option<String>,
    pub groups: Option<String>,
    pub kwargs: Option<String>,
}

impl FilterParams {
    pub fn is_empty(&self) -> bool {
        [&self.hosts, &self.groups, &self.kwargs]
            .iter()
            .all(|p| p.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Conjunction of `key=value` terms. A `__contains` key suffix tests list
/// membership or substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    key: String,
    value: String,
    contains: bool,
}

impl Predicate {
    /// Parse `k=v` or `k1=v1&k2=v2`.
    pub fn parse(expr: &str) -> Result<Self, FilterError> {
        let mut terms = Vec::new();
        for raw in expr.split('&').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = raw
                .split_once('=')
                .ok_or_else(|| FilterError::InvalidPredicate(raw.to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(FilterError::EmptyKey(raw.to_string()));
            }
            let (key, contains) = match key.strip_suffix("__contains") {
                Some(stripped) => (stripped, true),
                None => (key, false),
            };
            terms.push(Term {
                key: key.to_string(),
                value: value.trim().to_string(),
                contains,
            });
        }
        if terms.is_empty() {
            return Err(FilterError::InvalidPredicate(expr.to_string()));
        }
        Ok(Self { terms })
    }

    pub fn matches(&self, host: &Host) -> bool {
        self.terms.iter().all(|t| t.matches(host))
    }
}

impl Term {
    fn matches(&self, host: &Host) -> bool {
        let Some(attr) = host.attribute(&self.key) else {
            return false;
        };
        match (&attr, self.contains) {
            (Value::Array(items), _) => items.iter().any(|i| scalar_eq(i, &self.value)),
            (Value::String(s), true) => s.contains(&self.value),
            (_, true) => false,
            (other, false) => scalar_eq(other, &self.value),
        }
    }
}

fn scalar_eq(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => b.to_string().eq_ignore_ascii_case(expected),
        _ => false,
    }
}

/// Build the host view selected by `params`.
///
/// With no filter the input inventory is returned as is (same `Arc`).
/// Otherwise the result is the union of hosts matched by name, by group
/// and by any predicate expression, in inventory order, each once.
pub fn filter_inventory(
    inventory: &Arc<Inventory>,
    params: &FilterParams,
) -> Result<Arc<Inventory>, FilterError> {
    if params.is_empty() {
        return Ok(Arc::clone(inventory));
    }

    let predicates = split_list(params.kwargs.as_deref())
        .map(Predicate::parse)
        .collect::<Result<Vec<_>, _>>()?;

    let mut selected: HashSet<String> = HashSet::new();

    for name in split_list(params.hosts.as_deref()) {
        if inventory.get(name).is_some() {
            selected.insert(name.to_string());
        } else {
            tracing::debug!(host = name, "filter names unknown host");
        }
    }

    let groups: Vec<&str> = split_list(params.groups.as_deref()).collect();
    for host in inventory.hosts() {
        if groups.iter().any(|g| host.in_group(g)) || predicates.iter().any(|p| p.matches(host))
        {
            selected.insert(host.name.clone());
        }
    }

    tracing::debug!(
        selected = selected.len(),
        total = inventory.len(),
        "inventory filtered"
    );
    Ok(Arc::new(inventory.subset(&selected)))
}
