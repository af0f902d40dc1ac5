//! Decoding of the solver's answer.
//!
//! Every step of a trace is a small text table. Standard traces separate fields with
//! tabs; goal traces are column-aligned with runs of spaces and leave the top-left
//! corner blank. Neither is guaranteed to be rectangular: tableaux gain and lose
//! columns between steps, and a header may be shorter than its rows. Cells are kept
//! as text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LpformError, Result};
use crate::model::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSeparator {
    #[default]
    Tab,
    Whitespace,
}

impl FieldSeparator {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Standard => FieldSeparator::Tab,
            Mode::Goal => FieldSeparator::Whitespace,
        }
    }

    fn split(self, line: &str) -> Vec<String> {
        match self {
            FieldSeparator::Tab => line.split('\t').map(str::to_string).collect(),
            FieldSeparator::Whitespace => line.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// One decoded step: column labels plus body rows, each row indexed on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableauSnapshot {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableauSnapshot {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// Widest line of the step, header included.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }
}

pub fn decode_step(step: &str, separator: FieldSeparator) -> TableauSnapshot {
    let mut lines = step
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());
    let Some(first) = lines.next() else {
        debug!("step without any table line");
        return TableauSnapshot::default();
    };
    let mut header = separator.split(first);
    if separator == FieldSeparator::Whitespace && first.starts_with(char::is_whitespace) {
        header.insert(0, String::new());
    }
    TableauSnapshot {
        header,
        rows: lines.map(|line| separator.split(line)).collect(),
    }
}

pub fn decode_trace<S: AsRef<str>>(steps: &[S], separator: FieldSeparator) -> Vec<TableauSnapshot> {
    steps
        .iter()
        .map(|step| decode_step(step.as_ref(), separator))
        .collect()
}

// ------------- Solver responses -------------

#[derive(Deserialize)]
struct StandardReply {
    solution: Option<Vec<f64>>,
    optimal_value: Option<f64>,
    #[serde(default)]
    steps: Vec<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct GoalReply {
    optimal_solution: Option<Vec<f64>>,
    #[serde(default)]
    steps: Vec<String>,
}

/// What the solver sent back, checked for the fields each mode must carry.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult {
    Standard {
        solution: Vec<f64>,
        optimal_value: f64,
        steps: Vec<String>,
    },
    Goal {
        optimal_solution: Vec<f64>,
        steps: Vec<String>,
    },
}

impl SolverResult {
    pub fn from_json(body: serde_json::Value, mode: Mode) -> Result<Self> {
        if !body.is_object() {
            return Err(LpformError::MalformedResponse(format!(
                "expected a JSON object, got {body}"
            )));
        }
        let malformed = |e: serde_json::Error| LpformError::MalformedResponse(e.to_string());
        match mode {
            Mode::Standard => {
                let reply: StandardReply = serde_json::from_value(body).map_err(malformed)?;
                match (reply.solution, reply.optimal_value, reply.error) {
                    (Some(solution), Some(optimal_value), _) => Ok(SolverResult::Standard {
                        solution,
                        optimal_value,
                        steps: reply.steps,
                    }),
                    (None, _, Some(message)) => Err(LpformError::Solver(message)),
                    (None, _, None) => Err(LpformError::MalformedResponse(
                        "missing solution".to_string(),
                    )),
                    (Some(_), None, _) => Err(LpformError::MalformedResponse(
                        "missing optimal_value".to_string(),
                    )),
                }
            }
            Mode::Goal => {
                let reply: GoalReply = serde_json::from_value(body).map_err(malformed)?;
                let optimal_solution = reply.optimal_solution.ok_or_else(|| {
                    LpformError::MalformedResponse("missing optimal_solution".to_string())
                })?;
                Ok(SolverResult::Goal {
                    optimal_solution,
                    steps: reply.steps,
                })
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            SolverResult::Standard { .. } => Mode::Standard,
            SolverResult::Goal { .. } => Mode::Goal,
        }
    }

    pub fn steps(&self) -> &[String] {
        match self {
            SolverResult::Standard { steps, .. } | SolverResult::Goal { steps, .. } => steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Solution {
    Standard { values: Vec<f64>, optimal_value: f64 },
    Goal { values: Vec<f64> },
}

impl Solution {
    pub fn values(&self) -> &[f64] {
        match self {
            Solution::Standard { values, .. } | Solution::Goal { values } => values,
        }
    }

    /// Column labels for display: `x1..xn`, then `z` when there is an optimal value.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = (1..=self.values().len()).map(|i| format!("x{i}")).collect();
        if let Solution::Standard { .. } = self {
            labels.push("z".to_string());
        }
        labels
    }
}

/// A fully decoded round trip, ready to be displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub solution: Solution,
    pub steps: Vec<TableauSnapshot>,
    pub received_at: DateTime<Utc>,
}

impl Outcome {
    pub fn decode(result: SolverResult) -> Self {
        let separator = FieldSeparator::for_mode(result.mode());
        let steps = decode_trace(result.steps(), separator);
        let solution = match result {
            SolverResult::Standard { solution, optimal_value, .. } => Solution::Standard {
                values: solution,
                optimal_value,
            },
            SolverResult::Goal { optimal_solution, .. } => Solution::Goal {
                values: optimal_solution,
            },
        };
        Self {
            solution,
            steps,
            received_at: Utc::now(),
        }
    }

    pub fn mode(&self) -> Mode {
        match self.solution {
            Solution::Standard { .. } => Mode::Standard,
            Solution::Goal { .. } => Mode::Goal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_and_rows_split_on_tabs() {
        let step = decode_step("Basic\tx1\tRHS\nZ\t-3.00\t0.00\ns1\t1.00\t4.00\n", FieldSeparator::Tab);
        assert_eq!(step.header, vec!["Basic", "x1", "RHS"]);
        assert_eq!(step.rows.len(), 2);
        assert_eq!(step.rows[1], vec!["s1", "1.00", "4.00"]);
    }

    #[test]
    fn blank_lines_are_not_rows() {
        let step = decode_step("\n  \nA\tB\n\n\t \nZ\t1\n", FieldSeparator::Tab);
        assert_eq!(step.header, vec!["A", "B"]);
        assert_eq!(step.rows, vec![vec!["Z".to_string(), "1".to_string()]]);
    }

    #[test]
    fn carriage_returns_are_dropped() {
        let step = decode_step("A\tB\r\nZ\t1\r\n", FieldSeparator::Tab);
        assert_eq!(step.header, vec!["A", "B"]);
        assert_eq!(step.rows[0], vec!["Z", "1"]);
    }

    #[test]
    fn degenerate_steps_are_empty() {
        assert!(decode_step("", FieldSeparator::Tab).is_empty());
        assert!(decode_step(" \n\t\n", FieldSeparator::Whitespace).is_empty());
    }

    #[test]
    fn aligned_header_gets_a_corner_cell() {
        let step = decode_step(
            "     x0    x1   RHS\nZ0   0.0   0.0  0.0\nS0-  200.0 0.0  1000.0",
            FieldSeparator::Whitespace,
        );
        assert_eq!(step.header, vec!["", "x0", "x1", "RHS"]);
        assert_eq!(step.rows[1], vec!["S0-", "200.0", "0.0", "1000.0"]);
        assert_eq!(step.column_count(), 4);
    }

    #[test]
    fn standard_reply_with_error_is_a_solver_error() {
        let body = json!({"solution": null, "optimal_value": null, "error": "Unbounded solution", "steps": []});
        match SolverResult::from_json(body, Mode::Standard) {
            Err(LpformError::Solver(message)) => assert_eq!(message, "Unbounded solution"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_solution_vectors_are_reported() {
        let err = SolverResult::from_json(json!({"steps": []}), Mode::Goal).unwrap_err();
        assert!(err.to_string().contains("optimal_solution"));
        let err = SolverResult::from_json(json!({"optimal_value": 1.0}), Mode::Standard).unwrap_err();
        assert!(err.to_string().contains("missing solution"));
        let err = SolverResult::from_json(json!("Goal Programming solution coming soon"), Mode::Standard)
            .unwrap_err();
        assert!(matches!(err, LpformError::MalformedResponse(_)));
    }

    #[test]
    fn outcome_labels_its_solution() {
        let result = SolverResult::from_json(
            json!({"solution": [6.43, 0.57], "optimal_value": 7.57, "steps": ["A\tB\nZ\t1\t2"]}),
            Mode::Standard,
        )
        .unwrap();
        let outcome = Outcome::decode(result);
        assert_eq!(outcome.mode(), Mode::Standard);
        assert_eq!(outcome.solution.labels(), vec!["x1", "x2", "z"]);
        assert_eq!(outcome.steps[0].rows[0], vec!["Z", "1", "2"]);
    }
}
