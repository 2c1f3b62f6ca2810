//! Per-request logging, request ids and HTTP metrics.

mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, error, info, warn};

use super::metrics;

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Hoop that wraps each request in an `http.request` span and records its
/// outcome. `/metrics` scrapes pass through untouched.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestLogging {
    slow_threshold: Duration,
}

impl RequestLogging {
    pub(crate) const fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }
}

#[handler]
impl RequestLogging {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        if req.uri().path() == "/metrics" {
            ctrl.call_next(req, depot, res).await;

            return;
        }

        let started = Instant::now();
        let _in_flight = metrics::InFlightRequestGuard::track();

        let request_id =
            request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

        request_ids::set_request_id_header(res, &request_id);
        depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

        let method = req.method().to_string();
        let route = spans::route_template(req.uri().path());

        let span = tracing::info_span!(
            parent: None,
            "http.request",
            request_id = %request_id,
            method = %method,
            route = %route,
            remote_addr = %req.remote_addr(),
            status = tracing::field::Empty,
            elapsed_ms = tracing::field::Empty
        );

        ctrl.call_next(req, depot, res)
            .instrument(span.clone())
            .await;

        let elapsed = started.elapsed();
        let status = res.status_code.unwrap_or(StatusCode::OK);

        metrics::observe_request(&method, &route, status.as_u16(), elapsed.as_secs_f64());

        span.record("status", status.as_u16());
        span.record("elapsed_ms", elapsed.as_millis());

        span.in_scope(|| self.log_outcome(status, elapsed));
    }
}

impl RequestLogging {
    fn log_outcome(self, status: StatusCode, elapsed: Duration) {
        let elapsed_ms = elapsed.as_millis();

        if status.is_server_error() {
            error!(status = status.as_u16(), elapsed_ms, "request failed");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), elapsed_ms, "request rejected");
        } else {
            info!(status = status.as_u16(), elapsed_ms, "request completed");
        }

        if elapsed > self.slow_threshold {
            warn!(
                elapsed_ms,
                threshold_ms = self.slow_threshold.as_millis(),
                "slow request"
            );
        }
    }
}
