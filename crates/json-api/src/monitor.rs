//! Query Monitor Handlers

use freight::monitor::{QueryEvent, QueryStatus};
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::extensions::*;

/// One recorded backend query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct QueryEventResponse {
    pub table: String,
    pub operation: String,

    /// `success` or `error`
    pub status: String,
    pub duration_ms: f64,
    pub error: Option<String>,
    pub recorded_at: String,
}

impl From<QueryEvent> for QueryEventResponse {
    fn from(event: QueryEvent) -> Self {
        let status = match event.status {
            QueryStatus::Success => "success",
            QueryStatus::Error => "error",
        };

        Self {
            table: event.table,
            operation: event.operation,
            status: status.to_string(),
            duration_ms: event.duration.as_secs_f64() * 1000.0,
            error: event.error,
            recorded_at: event.recorded_at.to_string(),
        }
    }
}

/// Recent backend queries, oldest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MonitorResponse {
    pub capacity: usize,
    pub total: usize,
    pub errors: usize,
    pub mean_duration_ms: f64,
    pub events: Vec<QueryEventResponse>,
}

/// Query Monitor Handler
#[endpoint(
    tags("monitor"),
    summary = "Query Monitor",
    security(("bearer_auth" = []))
)]
pub(crate) async fn show(depot: &mut Depot) -> Result<Json<MonitorResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let monitor = state.app.query.monitor();
    let stats = monitor.stats();

    Ok(Json(MonitorResponse {
        capacity: monitor.capacity(),
        total: stats.total,
        errors: stats.errors,
        mean_duration_ms: stats.mean_duration.as_secs_f64() * 1000.0,
        events: monitor.snapshot().into_iter().map(Into::into).collect(),
    }))
}

/// Clear Query Monitor Handler
#[endpoint(
    tags("monitor"),
    summary = "Clear Query Monitor",
    security(("bearer_auth" = []))
)]
pub(crate) async fn clear(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.state_or_500()?;

    state.app.query.monitor().clear();

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use freight::monitor::QueryMonitor;
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, service_with_state};

    use super::*;

    fn event(status: QueryStatus, millis: u64) -> QueryEvent {
        QueryEvent {
            table: "cargas".to_string(),
            operation: "list_available".to_string(),
            status,
            duration: Duration::from_millis(millis),
            error: (status == QueryStatus::Error).then(|| "connection refused".to_string()),
            recorded_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn shows_then_clears_the_buffer() -> TestResult {
        let monitor = Arc::new(QueryMonitor::with_capacity(2));

        monitor.record(event(QueryStatus::Success, 10));
        monitor.record(event(QueryStatus::Error, 20));
        monitor.record(event(QueryStatus::Error, 30));

        let state = Mocks::default().into_state_with_monitor(monitor.clone());
        let service = service_with_state(
            state,
            Router::with_path("monitor").get(show).delete(clear),
        );

        let shown: MonitorResponse = TestClient::get("http://example.com/monitor")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(shown.capacity, 2);
        assert_eq!(shown.total, 2, "oldest event evicted");
        assert_eq!(shown.errors, 2);
        assert!((shown.mean_duration_ms - 25.0).abs() < 0.001, "mean of 20 and 30");
        assert_eq!(
            shown.events.first().map(|event| event.status.as_str()),
            Some("error")
        );

        let cleared = TestClient::delete("http://example.com/monitor")
            .send(&service)
            .await;

        assert_eq!(cleared.status_code, Some(StatusCode::NO_CONTENT));
        assert!(monitor.is_empty(), "buffer cleared on request");

        Ok(())
    }
}
