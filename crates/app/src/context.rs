//! App Context

use std::sync::Arc;

use freight::{monitor::QueryMonitor, visibility::VisibilityMode};
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        alerts::{AlertsService, PgAlertsService},
        cargas::{CargasService, PgCargasService},
        profiles::{PgProfilesService, ProfilesService},
        reviews::{PgReviewsService, ReviewsService},
        settings::{PgSettingsService, SettingsService},
        trucks::{PgTrucksService, TrucksService},
    },
    geocoding::{Geocoder, GeocodingClient, GeocodingConfig},
    query::{MapFeeds, PostingsQuery},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Runtime knobs that are not stored in the database.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub geocoding: GeocodingConfig,
    pub monitor_capacity: usize,
    pub visibility_mode: VisibilityMode,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            geocoding: GeocodingConfig::default(),
            monitor_capacity: QueryMonitor::DEFAULT_CAPACITY,
            visibility_mode: VisibilityMode::default(),
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub profiles: Arc<dyn ProfilesService>,
    pub cargas: Arc<dyn CargasService>,
    pub trucks: Arc<dyn TrucksService>,
    pub settings: Arc<dyn SettingsService>,
    pub alerts: Arc<dyn AlertsService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub auth: Arc<dyn AuthService>,
    pub geocoder: Arc<dyn Geocoder>,
    pub query: PostingsQuery,
    pub feeds: Arc<MapFeeds>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, options: AppOptions) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(Db::new(pool), options))
    }

    /// Wire every service over one pool.
    #[must_use]
    pub fn from_db(db: Db, options: AppOptions) -> Self {
        let pool = db.pool().clone();

        let cargas: Arc<dyn CargasService> = Arc::new(PgCargasService::new(db.clone()));
        let trucks: Arc<dyn TrucksService> = Arc::new(PgTrucksService::new(db.clone()));
        let settings: Arc<dyn SettingsService> = Arc::new(PgSettingsService::new(pool.clone()));

        let query = PostingsQuery::new(
            cargas.clone(),
            trucks.clone(),
            settings.clone(),
            Arc::new(QueryMonitor::with_capacity(options.monitor_capacity)),
            options.visibility_mode,
        );

        Self {
            profiles: Arc::new(PgProfilesService::new(pool.clone())),
            alerts: Arc::new(PgAlertsService::new(db.clone())),
            reviews: Arc::new(PgReviewsService::new(db)),
            auth: Arc::new(PgAuthService::new(pool)),
            geocoder: Arc::new(GeocodingClient::new(options.geocoding)),
            feeds: Arc::new(MapFeeds::new()),
            cargas,
            trucks,
            settings,
            query,
        }
    }
}
