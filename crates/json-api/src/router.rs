//! App Router

use salvo::Router;

use crate::{
    alerts, auth, cargas, distance, geocode, healthcheck, map, monitor, observability, reviews,
    settings, trucks,
};

/// Routes that answer without a session.
pub fn public_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
}

/// Routes behind bearer session auth.
pub fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cargas")
                .get(cargas::index::handler)
                .post(cargas::create::handler)
                .push(
                    Router::with_path("{carga}")
                        .get(cargas::get::handler)
                        .push(Router::with_path("assign").post(cargas::transition::assign))
                        .push(Router::with_path("unassign").post(cargas::transition::unassign))
                        .push(Router::with_path("complete").post(cargas::transition::complete))
                        .push(Router::with_path("cancel").post(cargas::transition::cancel)),
                ),
        )
        .push(
            Router::with_path("trucks")
                .get(trucks::index::handler)
                .post(trucks::create::handler)
                .push(
                    Router::with_path("{truck}")
                        .get(trucks::get::handler)
                        .push(Router::with_path("cancel").post(trucks::transition::cancel))
                        .push(Router::with_path("complete").post(trucks::transition::complete)),
                ),
        )
        .push(
            Router::with_path("map")
                .push(
                    Router::with_path("cargas")
                        .get(map::cargas::handler)
                        .push(Router::with_path("{carga}/info").get(map::info::handler)),
                )
                .push(Router::with_path("trucks").get(map::trucks::handler))
                .push(Router::with_path("feed").delete(map::feed::handler)),
        )
        .push(Router::with_path("distance").get(distance::handler))
        .push(Router::with_path("geocode").post(geocode::handler))
        .push(
            Router::with_path("monitor")
                .get(monitor::show)
                .delete(monitor::clear),
        )
        .push(
            Router::with_path("alerts")
                .get(alerts::index::handler)
                .post(alerts::create::handler)
                .push(Router::with_path("{alert}").delete(alerts::delete::handler)),
        )
        .push(Router::with_path("reviews").post(reviews::create::handler))
        .push(Router::with_path("users/{user}/reviews").get(reviews::index::handler))
        .push(Router::with_path("settings/visibility").get(settings::handler))
}
