//! HTTP client for the external solving service.

use std::future::Future;

use tracing::{debug, warn};

use crate::config::SolverSettings;
use crate::error::{LpformError, Result};
use crate::model::SolverRequest;
use crate::trace::SolverResult;

/// Anything that can turn a compiled request into a solver result.
pub trait Solver {
    fn solve(&self, request: &SolverRequest) -> impl Future<Output = Result<SolverResult>> + Send;
}

/// Posts requests as JSON to a single solver endpoint.
pub struct SolverClient {
    http: reqwest::Client,
    url: String,
}

impl SolverClient {
    pub fn new(settings: &SolverSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            http,
            url: settings.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Solver for SolverClient {
    async fn solve(&self, request: &SolverRequest) -> Result<SolverResult> {
        let mode = request.mode();
        debug!(url = %self.url, %mode, "posting model to solver");
        let resp = self.http.post(&self.url).json(request).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    debug!(status, error = %e, "could not read solver error body");
                    String::new()
                }
            };
            warn!(status, %mode, "solver rejected the request");
            return Err(LpformError::SolverStatus { status, message });
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| LpformError::MalformedResponse(e.to_string()))?;
        SolverResult::from_json(body, mode)
    }
}
