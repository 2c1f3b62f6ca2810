//! State

use std::{sync::Arc, time::Instant};

use freight_app::context::AppContext;

/// Services and process facts shared by every handler.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) started: Instant,
}

impl State {
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self {
            app,
            started: Instant::now(),
        })
    }
}
