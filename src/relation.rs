//! Splitting a constraint or goal line into its left-hand side, relational operator
//! and right-hand side.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expression::{self, UnresolvedCoefficients};
use crate::registry::VariableRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "=")]
    Equal,
}

impl Relation {
    // probe order matters: "<=" and ">=" must win over the "=" they contain
    const PROBE: [Relation; 3] = [Relation::LessEqual, Relation::GreaterEqual, Relation::Equal];

    pub fn as_str(self) -> &'static str {
        match self {
            Relation::LessEqual => "<=",
            Relation::GreaterEqual => ">=",
            Relation::Equal => "=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leftmost operator at or after byte `from`, with its byte position.
fn find_operator(s: &str, from: usize) -> Option<(usize, Relation)> {
    s[from..].char_indices().find_map(|(offset, _)| {
        let rest = &s[from + offset..];
        Relation::PROBE
            .into_iter()
            .find(|relation| rest.starts_with(relation.as_str()))
            .map(|relation| (from + offset, relation))
    })
}

/// First relational operator in `s`, or `None` when the line has none.
pub fn extract_relation(s: &str) -> Option<Relation> {
    find_operator(s, 0).map(|(_, relation)| relation)
}

/// Number written after the first operator, up to the next operator if any.
pub fn extract_rhs(s: &str) -> Option<f64> {
    let (at, relation) = find_operator(s, 0)?;
    let start = at + relation.as_str().len();
    let end = find_operator(s, start).map_or(s.len(), |(next, _)| next);
    s[start..end]
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|rhs| rhs.is_finite())
}

/// Text before the first operator; the whole line when there is none.
pub fn lhs(s: &str) -> &str {
    find_operator(s, 0).map_or(s, |(at, _)| &s[..at])
}

/// A line broken into its three parts, each resolved independently.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub coefficients: Result<Vec<f64>, UnresolvedCoefficients>,
    pub relation: Option<Relation>,
    pub rhs: Option<f64>,
}

pub fn classify(s: &str, registry: &VariableRegistry) -> ClassifiedRow {
    ClassifiedRow {
        coefficients: expression::parse(lhs(s), registry),
        relation: extract_relation(s),
        rhs: extract_rhs(s),
    }
}
