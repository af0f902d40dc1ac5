//! Submission state owned by whoever displays results.
//!
//! A [`Session`] lets one submission through at a time. A second submit while one is
//! outstanding is rejected with [`LpformError::Busy`] rather than queued, so results
//! can never arrive out of order. The last successful outcome is kept until the next
//! successful one replaces it; a failed submission leaves it untouched.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::assembler;
use crate::client::Solver;
use crate::error::{LpformError, Result};
use crate::model::Problem;
use crate::trace::Outcome;

/// Clears the busy flag when the submission ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Session<S> {
    solver: S,
    busy: AtomicBool,
    submissions: AtomicU64,
    last: Mutex<Option<Arc<Outcome>>>,
}

impl<S: Solver> Session<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            busy: AtomicBool::new(false),
            submissions: AtomicU64::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The outcome currently on display, if any submission has succeeded yet.
    pub fn last_result(&self) -> Option<Arc<Outcome>> {
        match self.last.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn acquire(&self) -> Result<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard(&self.busy))
            .map_err(|_| LpformError::Busy)
    }

    /// Compiles `problem`, sends it to the solver and, on success, makes the decoded
    /// outcome the one on display. Nothing is sent when compilation fails.
    pub async fn submit(&self, problem: &Problem) -> Result<Arc<Outcome>> {
        let _busy = self.acquire()?;
        let id = self.submissions.fetch_add(1, Ordering::Relaxed) + 1;
        let mode = problem.mode();
        let request = assembler::compile(problem).inspect_err(|e| {
            warn!(id, %mode, error = %e, "submission rejected");
        })?;
        let result = self.solver.solve(&request).await.inspect_err(|e| {
            warn!(id, %mode, error = %e, "solver round trip failed");
        })?;
        let outcome = Arc::new(Outcome::decode(result));
        info!(id, %mode, steps = outcome.steps.len(), "solution received");
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *last = Some(Arc::clone(&outcome));
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GoalProblem, SolverRequest};
    use crate::trace::SolverResult;

    struct Refusing;

    impl Solver for Refusing {
        async fn solve(&self, _request: &SolverRequest) -> Result<SolverResult> {
            Err(LpformError::Transport("refused".into()))
        }
    }

    #[tokio::test]
    async fn busy_flag_is_released_after_a_failure() {
        let session = Session::new(Refusing);
        let problem = Problem::Goal(GoalProblem {
            constraints: vec!["x1 <= 3".into()],
            goals: vec!["x1 >= 1".into()],
        });
        assert!(session.submit(&problem).await.is_err());
        assert!(!session.is_busy());
        assert!(session.last_result().is_none());
    }

    #[test]
    fn second_acquire_is_rejected() {
        let session = Session::new(Refusing);
        let guard = session.acquire().unwrap();
        assert!(session.is_busy());
        assert!(matches!(session.acquire(), Err(LpformError::Busy)));
        drop(guard);
        assert!(!session.is_busy());
    }
}
