use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lpform::client::Solver;
use lpform::model::{GoalProblem, Problem, SolverRequest, StandardProblem};
use lpform::session::Session;
use lpform::trace::SolverResult;
use lpform::{LpformError, Result};
use pretty_assertions::assert_eq;
use tokio::sync::Notify;

/// Answers every request with a fixed goal solution and counts the calls.
#[derive(Default)]
struct Counting {
    calls: AtomicUsize,
    fail: bool,
}

impl Solver for Counting {
    async fn solve(&self, request: &SolverRequest) -> Result<SolverResult> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(LpformError::Transport("connection refused".into()));
        }
        let width = match request {
            SolverRequest::Goal(goal) => goal.goals_coeffs.first().map_or(0, Vec::len),
            SolverRequest::Standard(standard) => standard.objective.len(),
        };
        Ok(SolverResult::Goal {
            optimal_solution: vec![call as f64; width],
            steps: vec!["     x0   RHS\nZ0   0.0  0.0".to_string()],
        })
    }
}

/// Holds the request open until released.
struct Gated {
    entered: Notify,
    release: Notify,
}

impl Solver for Gated {
    async fn solve(&self, _request: &SolverRequest) -> Result<SolverResult> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(SolverResult::Goal { optimal_solution: vec![1.0], steps: Vec::new() })
    }
}

fn goal_problem() -> Problem {
    Problem::Goal(GoalProblem {
        constraints: vec!["x1 + x2 <= 10".into()],
        goals: vec!["x1 >= 2".into()],
    })
}

#[tokio::test]
async fn invalid_model_never_reaches_the_solver() {
    let session = Session::new(Counting::default());
    let problem = Problem::Standard(StandardProblem {
        objective: "3x1+2x2".into(),
        constraints: vec!["2x1+3x2 10".into()],
        ..StandardProblem::default()
    });
    let err = session.submit(&problem).await.unwrap_err();
    assert!(err.is_invalid_model());
    assert_eq!(session.solver().calls.load(Ordering::SeqCst), 0);
    assert!(session.last_result().is_none());
}

#[tokio::test]
async fn each_success_replaces_the_last_result() {
    let session = Session::new(Counting::default());
    let first = session.submit(&goal_problem()).await.expect("first");
    assert_eq!(first.solution.values(), &[1.0, 1.0]);
    let second = session.submit(&goal_problem()).await.expect("second");
    assert_eq!(second.solution.values(), &[2.0, 2.0]);
    let shown = session.last_result().expect("a result is shown");
    assert!(Arc::ptr_eq(&shown, &second));
    assert_eq!(session.solver().calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failure_leaves_the_previous_result_in_place() {
    let ok = Session::new(Counting::default());
    let shown = ok.submit(&goal_problem()).await.expect("solved");

    let failing = Session::new(Counting { fail: true, ..Counting::default() });
    assert!(failing.submit(&goal_problem()).await.unwrap_err().is_transport());
    assert!(failing.last_result().is_none());

    let invalid = Problem::Goal(GoalProblem { constraints: vec!["x1".into()], goals: Vec::new() });
    assert!(ok.submit(&invalid).await.is_err());
    assert!(Arc::ptr_eq(&ok.last_result().expect("still shown"), &shown));
}

#[tokio::test]
async fn concurrent_submit_is_rejected_while_busy() {
    let session = Arc::new(Session::new(Gated { entered: Notify::new(), release: Notify::new() }));
    let background = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.submit(&goal_problem()).await })
    };
    session.solver().entered.notified().await;
    assert!(session.is_busy());
    assert!(matches!(session.submit(&goal_problem()).await, Err(LpformError::Busy)));

    session.solver().release.notify_one();
    let outcome = background.await.expect("task joined").expect("solved");
    assert_eq!(outcome.solution.values(), &[1.0]);
    assert!(!session.is_busy());
}
