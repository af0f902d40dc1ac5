//! Problem inputs, compiled models and the two request shapes the solver accepts.
//!
//! Inputs are plain owned structs handed to the stateless functions in
//! [`crate::assembler`]; nothing here is shared between submissions.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::relation::Relation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Standard,
    Goal,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Standard => f.write_str("standard"),
            Mode::Goal => f.write_str("goal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationType {
    #[default]
    Max,
    Min,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    #[default]
    Simplex,
    BigM,
    TwoPhase,
    GoalProgramming,
}

/// Sign restriction of a single variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VariableRestriction {
    #[default]
    #[serde(rename = ">=0", alias = "non-negative")]
    NonNegative,
    #[serde(rename = "unrestricted")]
    Unrestricted,
}

// ------------- Inputs -------------

/// What the user typed for a standard linear program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardProblem {
    pub objective: String,
    #[serde(default)]
    pub optimization: OptimizationType,
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Restrictions keyed by variable name; unnamed variables are non-negative.
    #[serde(default)]
    pub restrictions: HashMap<String, VariableRestriction>,
    #[serde(default)]
    pub method: Method,
}

/// What the user typed for a preemptive goal program. Goals are listed by priority,
/// highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalProblem {
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Problem {
    Standard(StandardProblem),
    Goal(GoalProblem),
}

impl Problem {
    pub fn mode(&self) -> Mode {
        match self {
            Problem::Standard(_) => Mode::Standard,
            Problem::Goal(_) => Mode::Goal,
        }
    }
}

// ------------- Compiled models -------------

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub coefficients: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

/// A target row of a goal program. Priority 0 is satisfied first.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub priority: usize,
    pub target: Constraint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationModel {
    pub variables: Vec<String>,
    pub objective: Vec<f64>,
    pub optimization: OptimizationType,
    pub constraints: Vec<Constraint>,
    pub restrictions: Vec<VariableRestriction>,
    pub method: Method,
}

impl OptimizationModel {
    pub fn request(&self) -> StandardRequest {
        StandardRequest {
            objective: self.objective.clone(),
            optimization: self.optimization,
            constraints: self
                .constraints
                .iter()
                .map(|c| c.coefficients.clone())
                .collect(),
            rhs: self.constraints.iter().map(|c| c.rhs).collect(),
            constraint_types: self.constraints.iter().map(|c| c.relation).collect(),
            var_restrictions: self.restrictions.clone(),
            method: self.method,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgrammingModel {
    pub variables: Vec<String>,
    pub constraints: Vec<Constraint>,
    pub goals: Vec<Goal>,
}

impl GoalProgrammingModel {
    /// Constraint relations are checked during compilation but the goal solver
    /// takes only coefficients and values for them.
    pub fn request(&self) -> GoalRequest {
        let mut goals: Vec<&Goal> = self.goals.iter().collect();
        goals.sort_by_key(|goal| goal.priority);
        GoalRequest {
            method: GoalMethod::Goal,
            constraints_coeffs: self
                .constraints
                .iter()
                .map(|c| c.coefficients.clone())
                .collect(),
            constraints_values: self.constraints.iter().map(|c| c.rhs).collect(),
            goals_coeffs: goals
                .iter()
                .map(|g| g.target.coefficients.clone())
                .collect(),
            goals_values: goals.iter().map(|g| g.target.rhs).collect(),
            goals_directions: goals.iter().map(|g| g.target.relation).collect(),
        }
    }
}

// ------------- Wire format -------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardRequest {
    pub objective: Vec<f64>,
    pub optimization: OptimizationType,
    pub constraints: Vec<Vec<f64>>,
    pub rhs: Vec<f64>,
    pub constraint_types: Vec<Relation>,
    pub var_restrictions: Vec<VariableRestriction>,
    pub method: Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoalMethod {
    #[default]
    #[serde(rename = "goal")]
    Goal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRequest {
    pub method: GoalMethod,
    pub constraints_coeffs: Vec<Vec<f64>>,
    pub constraints_values: Vec<f64>,
    pub goals_coeffs: Vec<Vec<f64>>,
    pub goals_values: Vec<f64>,
    pub goals_directions: Vec<Relation>,
}

/// Body of the single POST sent to the solver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SolverRequest {
    Standard(StandardRequest),
    Goal(GoalRequest),
}

impl SolverRequest {
    pub fn mode(&self) -> Mode {
        match self {
            SolverRequest::Standard(_) => Mode::Standard,
            SolverRequest::Goal(_) => Mode::Goal,
        }
    }
}

impl From<StandardRequest> for SolverRequest {
    fn from(request: StandardRequest) -> Self {
        Self::Standard(request)
    }
}

impl From<GoalRequest> for SolverRequest {
    fn from(request: GoalRequest) -> Self {
        Self::Goal(request)
    }
}
