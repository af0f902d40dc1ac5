//! Turns problem text into a validated model.
//!
//! Compilation is all-or-nothing: every line is checked, every problem found is
//! recorded as an [`Issue`], and a single unresolved coefficient, operator or
//! right-hand side anywhere rejects the whole submission.
//!
//! The two modes scope their variables differently. A standard problem takes its
//! variables from the objective alone, so a constraint mentioning a variable the
//! objective does not is compiled without that term. A goal program takes its
//! variables from every constraint and goal line, so goal-only variables count.

use std::fmt;

use tracing::debug;

use crate::error::{LpformError, Result};
use crate::expression::{self, UnresolvedCoefficients};
use crate::lexer::VariablePattern;
use crate::model::{
    Constraint, Goal, GoalProblem, GoalProgrammingModel, OptimizationModel, Problem,
    SolverRequest, StandardProblem,
};
use crate::registry::VariableRegistry;
use crate::relation::{self, ClassifiedRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Objective,
    Constraint(usize),
    Goal(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Objective => f.write_str("objective"),
            Location::Constraint(index) => write!(f, "constraint {}", index + 1),
            Location::Goal(index) => write!(f, "goal {}", index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    NoVariables,
    Coefficient { variable: String },
    MissingRelation,
    MissingRhs,
}

/// One reason a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub location: Location,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::NoVariables => write!(f, "{}: no variables found", self.location),
            IssueKind::Coefficient { variable } => write!(
                f,
                "{}: coefficient of {variable} is not a number",
                self.location
            ),
            IssueKind::MissingRelation => write!(
                f,
                "{}: expected one of <=, >= or =",
                self.location
            ),
            IssueKind::MissingRhs => write!(
                f,
                "{}: right-hand side is not a number",
                self.location
            ),
        }
    }
}

#[derive(Default)]
struct Validation {
    issues: Vec<Issue>,
}

impl Validation {
    fn issue(&mut self, location: Location, kind: IssueKind) {
        self.issues.push(Issue { location, kind });
    }

    fn resolved(
        &mut self,
        location: Location,
        coefficients: std::result::Result<Vec<f64>, UnresolvedCoefficients>,
    ) -> Option<Vec<f64>> {
        coefficients
            .map_err(|unresolved| {
                for variable in unresolved.variables {
                    self.issue(location, IssueKind::Coefficient { variable });
                }
            })
            .ok()
    }

    fn row(
        &mut self,
        location: Location,
        text: &str,
        registry: &VariableRegistry,
    ) -> Option<Constraint> {
        let ClassifiedRow {
            coefficients,
            relation,
            rhs,
        } = relation::classify(text, registry);
        let coefficients = self.resolved(location, coefficients);
        match (relation, rhs) {
            (None, _) => self.issue(location, IssueKind::MissingRelation),
            (Some(_), None) => self.issue(location, IssueKind::MissingRhs),
            _ => (),
        }
        Some(Constraint {
            coefficients: coefficients?,
            relation: relation?,
            rhs: rhs?,
        })
    }

    fn finish<T>(self, model: Option<T>) -> Result<T> {
        match model {
            Some(model) if self.issues.is_empty() => Ok(model),
            _ => Err(LpformError::InvalidModel {
                issues: self.issues,
            }),
        }
    }
}

fn standard_registry(problem: &StandardProblem) -> VariableRegistry {
    VariableRegistry::discover(VariablePattern::Standard, [&problem.objective])
}

fn goal_registry(problem: &GoalProblem) -> VariableRegistry {
    VariableRegistry::discover(
        VariablePattern::Indexed,
        problem.constraints.iter().chain(&problem.goals),
    )
}

/// Variables an editor should offer for the problem as currently typed.
pub fn live_variables(problem: &Problem) -> Vec<String> {
    let registry = match problem {
        Problem::Standard(standard) => standard_registry(standard),
        Problem::Goal(goal) => goal_registry(goal),
    };
    registry.names().into_iter().map(str::to_string).collect()
}

pub fn compile_standard(problem: &StandardProblem) -> Result<OptimizationModel> {
    let registry = standard_registry(problem);
    debug!(
        variables = registry.len(),
        constraints = problem.constraints.len(),
        "compiling standard model"
    );
    let mut validation = Validation::default();
    if registry.is_empty() {
        validation.issue(Location::Objective, IssueKind::NoVariables);
    }
    let objective = validation.resolved(
        Location::Objective,
        expression::parse(&problem.objective, &registry),
    );
    let constraints: Vec<Option<Constraint>> = problem
        .constraints
        .iter()
        .enumerate()
        .map(|(index, text)| validation.row(Location::Constraint(index), text, &registry))
        .collect();
    let restrictions: Vec<_> = registry
        .names()
        .into_iter()
        .map(|name| problem.restrictions.get(name).copied().unwrap_or_default())
        .collect();
    let model = objective.and_then(|objective| {
        Some(OptimizationModel {
            variables: registry.names().into_iter().map(str::to_string).collect(),
            objective,
            optimization: problem.optimization,
            constraints: constraints.into_iter().collect::<Option<Vec<_>>>()?,
            restrictions,
            method: problem.method,
        })
    });
    validation.finish(model)
}

pub fn compile_goal(problem: &GoalProblem) -> Result<GoalProgrammingModel> {
    let registry = goal_registry(problem);
    debug!(
        variables = registry.len(),
        constraints = problem.constraints.len(),
        goals = problem.goals.len(),
        "compiling goal model"
    );
    let mut validation = Validation::default();
    let constraints: Vec<Option<Constraint>> = problem
        .constraints
        .iter()
        .enumerate()
        .map(|(index, text)| validation.row(Location::Constraint(index), text, &registry))
        .collect();
    let goals: Vec<Option<Goal>> = problem
        .goals
        .iter()
        .enumerate()
        .map(|(priority, text)| {
            validation
                .row(Location::Goal(priority), text, &registry)
                .map(|target| Goal { priority, target })
        })
        .collect();
    let model = constraints
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .zip(goals.into_iter().collect::<Option<Vec<_>>>())
        .map(|(constraints, goals)| GoalProgrammingModel {
            variables: registry.names().into_iter().map(str::to_string).collect(),
            constraints,
            goals,
        });
    validation.finish(model)
}

/// Compiles either kind of problem straight into the request body.
pub fn compile(problem: &Problem) -> Result<SolverRequest> {
    match problem {
        Problem::Standard(standard) => Ok(compile_standard(standard)?.request().into()),
        Problem::Goal(goal) => Ok(compile_goal(goal)?.request().into()),
    }
}
