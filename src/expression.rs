//! Coefficient extraction for a single linear expression.
//!
//! An expression reduces to a vector with one slot per registered variable. Slots of
//! variables that never appear stay `0`, variables the registry does not know are
//! dropped, and a variable mentioned twice keeps the coefficient of its last mention
//! (`x1 + 2x1` yields `2`, not `3`).

use thiserror::Error;

use crate::lexer::{self, Sign, TermToken, VariablePattern};
use crate::registry::VariableRegistry;

/// A coefficient paired with the variable it multiplies.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// `None` when the written coefficient is not a finite number, e.g. a lone `.`
    /// or more digits than an `f64` can hold.
    pub coefficient: Option<f64>,
    pub variable: String,
}

impl From<TermToken<'_>> for Term {
    fn from(token: TermToken<'_>) -> Self {
        let magnitude = if token.magnitude.is_empty() {
            Some(1.0)
        } else {
            token
                .magnitude
                .parse::<f64>()
                .ok()
                .filter(|m| m.is_finite())
        };
        let coefficient = match token.sign {
            Sign::Minus => magnitude.map(|m| -m),
            Sign::Plus | Sign::Implicit => magnitude,
        };
        Self {
            coefficient,
            variable: token.variable.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("coefficient of {} is not a number", joined(.variables))]
pub struct UnresolvedCoefficients {
    pub variables: Vec<String>,
}

fn joined(variables: &[String]) -> String {
    variables.join(", ")
}

/// The terms of an expression in the order they were written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpression {
    terms: Vec<Term>,
}

impl LinearExpression {
    pub fn scan(text: &str, pattern: VariablePattern) -> Self {
        Self {
            terms: lexer::scan(text, pattern).map(Term::from).collect(),
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Lays the terms out against `registry`.
    pub fn coefficients(
        &self,
        registry: &VariableRegistry,
    ) -> Result<Vec<f64>, UnresolvedCoefficients> {
        let mut slots = vec![Some(0.0); registry.len()];
        for term in &self.terms {
            if let Some(index) = registry.index_of(&term.variable) {
                slots[index] = term.coefficient;
            }
        }
        let variables: Vec<String> = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .filter_map(|(index, _)| registry.name(index).map(str::to_string))
            .collect();
        if !variables.is_empty() {
            return Err(UnresolvedCoefficients { variables });
        }
        Ok(slots.into_iter().flatten().collect())
    }
}

/// Coefficient vector of `expression`, aligned to `registry`.
pub fn parse(
    expression: &str,
    registry: &VariableRegistry,
) -> Result<Vec<f64>, UnresolvedCoefficients> {
    LinearExpression::scan(expression, registry.pattern()).coefficients(registry)
}
