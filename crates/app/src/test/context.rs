//! Test context for service-level integration tests.

use std::sync::Arc;

use sqlx::{Connection, PgConnection, PgPool, query};

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        alerts::{AlertsService, PgAlertsService},
        cargas::{CargasService, PgCargasService},
        profiles::{
            PgProfilesService, ProfilesService,
            data::NewProfile,
            records::{Role, UserUuid},
        },
        reviews::{PgReviewsService, ReviewsService},
        settings::{PgSettingsService, SettingsService},
        trucks::{PgTrucksService, TrucksService},
    },
};

use super::db::{SUPERUSER, SUPERUSER_PASSWORD, TestDb};

/// Non-superuser role the services connect as, so RLS applies.
const APP_ROLE: &str = "freight_app_test";
const APP_ROLE_PASSWORD: &str = "freight_app_test_pass";

pub struct TestContext {
    pub db: TestDb,
    pub shipper: UserUuid,
    pub carrier: UserUuid,
    pub profiles: Arc<dyn ProfilesService>,
    pub cargas: Arc<dyn CargasService>,
    pub trucks: Arc<dyn TrucksService>,
    pub settings: Arc<dyn SettingsService>,
    pub alerts: Arc<dyn AlertsService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub auth: PgAuthService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let app_pool = Self::app_pool(&test_db).await;
        let db = Db::new(app_pool.clone());

        let profiles: Arc<dyn ProfilesService> = Arc::new(PgProfilesService::new(app_pool.clone()));

        let shipper = Self::user(profiles.as_ref(), "Cerealera del Litoral", Role::Shipper).await;
        let carrier = Self::user(profiles.as_ref(), "Transportes del Sur", Role::Carrier).await;

        Self {
            shipper,
            carrier,
            profiles,
            cargas: Arc::new(PgCargasService::new(db.clone())),
            trucks: Arc::new(PgTrucksService::new(db.clone())),
            alerts: Arc::new(PgAlertsService::new(db.clone())),
            reviews: Arc::new(PgReviewsService::new(db)),
            settings: Arc::new(PgSettingsService::new(app_pool.clone())),
            auth: PgAuthService::new(app_pool),
            db: test_db,
        }
    }

    /// Create another user, e.g. a second carrier.
    pub async fn create_user(&self, name: &str, role: Role) -> UserUuid {
        Self::user(self.profiles.as_ref(), name, role).await
    }

    async fn user(profiles: &dyn ProfilesService, name: &str, role: Role) -> UserUuid {
        let uuid = UserUuid::new();

        profiles
            .create_profile(NewProfile {
                uuid,
                display_name: name.to_string(),
                role,
            })
            .await
            .expect("Failed to create test profile");

        uuid
    }

    /// A pool connected as [`APP_ROLE`]; superusers bypass row-level security
    /// even when it is forced.
    async fn app_pool(test_db: &TestDb) -> PgPool {
        let su_url = &test_db.superuser_url;
        let server_url = su_url.rsplit_once('/').map_or(su_url.as_str(), |x| x.0);

        let mut server_conn = PgConnection::connect(&format!("{server_url}/postgres"))
            .await
            .expect("Failed to connect to postgres database for role setup");

        // Tests race to create the role; 42710 and 23505 both mean it exists.
        let created = query(&format!(
            "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
               NOSUPERUSER NOCREATEDB NOCREATEROLE NOBYPASSRLS"
        ))
        .execute(&mut server_conn)
        .await;

        match created {
            Ok(_) => {}
            Err(sqlx::Error::Database(ref e))
                if matches!(e.code().as_deref(), Some("42710" | "23505")) => {}
            Err(error) => panic!("Failed to create app role: {error}"),
        }

        query(&format!(
            "GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}",
            test_db.name
        ))
        .execute(&mut server_conn)
        .await
        .expect("Failed to grant CONNECT on test database");

        server_conn
            .close()
            .await
            .expect("Failed to close server connection");

        let mut db_conn = PgConnection::connect(su_url)
            .await
            .expect("Failed to connect to test database for privilege setup");

        for stmt in [
            format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}"),
            format!(
                "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {APP_ROLE}"
            ),
            format!("GRANT EXECUTE ON ALL FUNCTIONS IN SCHEMA public TO {APP_ROLE}"),
        ] {
            query(&stmt)
                .execute(&mut db_conn)
                .await
                .expect("Failed to grant privileges to app role");
        }

        db_conn
            .close()
            .await
            .expect("Failed to close db connection");

        let app_url = su_url.replacen(
            &format!("{SUPERUSER}:{SUPERUSER_PASSWORD}"),
            &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
            1,
        );

        PgPool::connect(&app_url)
            .await
            .expect("Failed to create app pool")
    }
}
