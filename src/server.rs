use std::sync::Arc;
use std::time::Instant;
use axum::{extract::State, routing::{get, post}, Router, Json};
use tower_http::cors::{CorsLayer, Any};
use serde::Serialize;
use axum::http::StatusCode;
use tracing::{info, warn};
use crate::assembler;
use crate::client::Solver;
use crate::error::LpformError;
use crate::model::{Problem, SolverRequest};
use crate::session::Session;
use crate::trace::Outcome;

#[derive(Serialize, Default)]
pub struct ApiResponse {
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<SolverRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Arc<Outcome>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

type Reply = (StatusCode, Json<ApiResponse>);

fn ok(started: Instant, body: ApiResponse) -> Reply {
    let body = ApiResponse { status: "ok".into(), elapsed_ms: elapsed_ms(started), ..body };
    (StatusCode::OK, Json(body))
}

fn failed(started: Instant, e: &LpformError) -> Reply {
    let status = status_for(e);
    let detail = format!("{e}");
    warn!(%detail, code=%status.as_u16(), "request failed");
    let body = ApiResponse {
        status: "error".into(),
        elapsed_ms: elapsed_ms(started),
        error: Some(e.user_message().to_string()),
        detail: Some(detail),
        ..ApiResponse::default()
    };
    (status, Json(body))
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

pub fn status_for(e: &LpformError) -> StatusCode {
    match e {
        LpformError::InvalidModel { .. } => StatusCode::BAD_REQUEST,
        LpformError::Busy => StatusCode::CONFLICT,
        _ if e.is_transport() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn variables(Json(problem): Json<Problem>) -> Reply {
    let started = Instant::now();
    let variables = assembler::live_variables(&problem);
    ok(started, ApiResponse { variables: Some(variables), ..ApiResponse::default() })
}

async fn compile(Json(problem): Json<Problem>) -> Reply {
    let started = Instant::now();
    match assembler::compile(&problem) {
        Ok(request) => ok(started, ApiResponse { request: Some(request), ..ApiResponse::default() }),
        Err(e) => failed(started, &e),
    }
}

async fn solve<S>(State(session): State<Arc<Session<S>>>, Json(problem): Json<Problem>) -> Reply
where
    S: Solver + Send + Sync + 'static,
{
    let started = Instant::now();
    match session.submit(&problem).await {
        Ok(outcome) => {
            info!(ms=elapsed_ms(started), steps=outcome.steps.len(), "solve complete");
            ok(started, ApiResponse { outcome: Some(outcome), ..ApiResponse::default() })
        }
        Err(e) => failed(started, &e),
    }
}

async fn result<S>(State(session): State<Arc<Session<S>>>) -> Reply
where
    S: Solver + Send + Sync + 'static,
{
    let started = Instant::now();
    match session.last_result() {
        Some(outcome) => ok(started, ApiResponse { outcome: Some(outcome), ..ApiResponse::default() }),
        None => {
            let body = ApiResponse {
                status: "empty".into(),
                elapsed_ms: elapsed_ms(started),
                ..ApiResponse::default()
            };
            (StatusCode::NOT_FOUND, Json(body))
        }
    }
}

pub fn router<S>(session: Arc<Session<S>>) -> Router
where
    S: Solver + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/v1/variables", post(variables))
        .route("/v1/compile", post(compile))
        .route("/v1/solve", post(solve::<S>))
        .route("/v1/result", get(result::<S>))
        .layer(cors)
        .with_state(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{Issue, IssueKind, Location};
    use crate::model::{GoalProblem, StandardProblem};
    use crate::trace::SolverResult;

    /// Answers goal requests with a fixed solution, or fails every call.
    struct Fixed {
        fail: bool,
    }

    impl Solver for Fixed {
        async fn solve(&self, _request: &SolverRequest) -> crate::error::Result<SolverResult> {
            if self.fail {
                return Err(LpformError::Transport("connection refused".into()));
            }
            Ok(SolverResult::Goal {
                optimal_solution: vec![5.0, 2.5],
                steps: vec!["     x0   x1   RHS\nZ0   0.0  0.0  0.0".to_string()],
            })
        }
    }

    fn goal_problem() -> Problem {
        Problem::Goal(GoalProblem {
            constraints: vec!["1500x1 + 3000x2 <= 15000".into()],
            goals: vec!["200x1 >= 1000".into()],
        })
    }

    #[test]
    fn errors_map_to_distinct_statuses() {
        let invalid = LpformError::InvalidModel {
            issues: vec![Issue { location: Location::Objective, kind: IssueKind::NoVariables }],
        };
        assert_eq!(status_for(&invalid), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&LpformError::Busy), StatusCode::CONFLICT);
        assert_eq!(status_for(&LpformError::Solver("Unbounded solution".into())), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn compile_returns_the_payload() {
        let problem = Problem::Standard(StandardProblem {
            objective: "3x1+2x2".into(),
            constraints: vec!["2x1+3x2<=10".into()],
            ..StandardProblem::default()
        });
        let (status, Json(body)) = compile(Json(problem)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        let request = serde_json::to_value(body.request.unwrap()).unwrap();
        assert_eq!(request["constraint_types"], serde_json::json!(["<="]));
    }

    #[tokio::test]
    async fn compile_reports_invalid_models() {
        let problem = Problem::Goal(GoalProblem {
            constraints: vec!["x1 + x2".into()],
            goals: vec!["x1 >= 2".into()],
        });
        let (status, Json(body)) = compile(Json(problem)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.as_deref(), Some("invalid model"));
        assert!(body.detail.unwrap().contains("constraint 1"));
    }

    #[tokio::test]
    async fn variables_are_listed() {
        let problem = Problem::Goal(GoalProblem {
            constraints: vec!["x2 + x1 <= 4".into()],
            goals: vec!["x3 >= 2".into()],
        });
        let (_, Json(body)) = variables(Json(problem)).await;
        assert_eq!(body.variables.unwrap(), vec!["x2", "x1", "x3"]);
    }

    #[tokio::test]
    async fn solve_returns_the_outcome_and_result_keeps_it() {
        let session = Arc::new(Session::new(Fixed { fail: false }));

        let (status, Json(body)) = result(State(Arc::clone(&session))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.status, "empty");
        assert!(body.outcome.is_none());

        let (status, Json(body)) = solve(State(Arc::clone(&session)), Json(goal_problem())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        let solved = body.outcome.unwrap();
        assert_eq!(solved.solution.values(), &[5.0, 2.5]);
        assert_eq!(solved.steps[0].header, vec!["", "x0", "x1", "RHS"]);

        let (status, Json(body)) = result(State(session)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(Arc::ptr_eq(&body.outcome.unwrap(), &solved));
    }

    #[tokio::test]
    async fn solver_failure_is_a_bad_gateway() {
        let session = Arc::new(Session::new(Fixed { fail: true }));
        let (status, Json(body)) = solve(State(Arc::clone(&session)), Json(goal_problem())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error.as_deref(), Some("An error occurred while solving the problem."));
        assert!(body.outcome.is_none());

        let (status, _) = result(State(session)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn solve_rejects_invalid_models_before_the_solver() {
        let session = Arc::new(Session::new(Fixed { fail: true }));
        let problem = Problem::Goal(GoalProblem {
            constraints: vec!["x1 + x2".into()],
            goals: vec!["x1 >= 2".into()],
        });
        let (status, Json(body)) = solve(State(session), Json(problem)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.as_deref(), Some("invalid model"));
    }
}
