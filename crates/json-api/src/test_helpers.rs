//! Test helpers.

use std::sync::Arc;

use freight::{
    geo::Coordinates,
    monitor::QueryMonitor,
    postings::{Availability, Location, OperatingRadius, PostingState},
    rates::{Rate, RateKind},
    visibility::VisibilityMode,
};
use freight_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        alerts::MockAlertsService,
        cargas::{
            MockCargasService,
            records::{CargaRecord, CargaUuid},
        },
        profiles::{MockProfilesService, records::UserUuid},
        reviews::MockReviewsService,
        settings::MockSettingsService,
        trucks::{
            MockTrucksService,
            records::{TruckRecord, TruckUuid},
        },
    },
    geocoding::MockGeocoder,
    query::{MapFeeds, PostingsQuery},
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use testresult::TestResult;
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// Service doubles; any call without an expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) profiles: MockProfilesService,
    pub(crate) cargas: MockCargasService,
    pub(crate) trucks: MockTrucksService,
    pub(crate) settings: MockSettingsService,
    pub(crate) alerts: MockAlertsService,
    pub(crate) reviews: MockReviewsService,
    pub(crate) auth: MockAuthService,
    pub(crate) geocoder: MockGeocoder,
    pub(crate) mode: VisibilityMode,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        self.into_state_with_monitor(Arc::new(QueryMonitor::default()))
    }

    /// State whose query layer records into `monitor`.
    pub(crate) fn into_state_with_monitor(self, monitor: Arc<QueryMonitor>) -> Arc<State> {
        let cargas = Arc::new(self.cargas);
        let trucks = Arc::new(self.trucks);
        let settings = Arc::new(self.settings);

        let query = PostingsQuery::new(
            cargas.clone(),
            trucks.clone(),
            settings.clone(),
            monitor,
            self.mode,
        );

        State::from_app_context(AppContext {
            profiles: Arc::new(self.profiles),
            cargas,
            trucks,
            settings,
            alerts: Arc::new(self.alerts),
            reviews: Arc::new(self.reviews),
            auth: Arc::new(self.auth),
            geocoder: Arc::new(self.geocoder),
            query,
            feeds: Arc::new(MapFeeds::new()),
        })
    }

    /// Serve `route` as the authenticated [`TEST_USER_UUID`].
    pub(crate) fn service(self, route: Router) -> Service {
        service_with_state(self.into_state(), route)
    }
}

pub(crate) fn service_with_state(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_user)
            .push(route),
    )
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::default()
    }
    .into_state()
}

fn located(address: &str, province: &str, lat: f64, lng: f64) -> TestResult<Location> {
    Ok(Location {
        address: address.to_string(),
        province: Some(province.to_string()),
        city: None,
        coordinates: Some(Coordinates::new(lat, lng)?),
    })
}

/// Available carga from Buenos Aires to Córdoba, about 647 km.
pub(crate) fn make_carga(uuid: CargaUuid) -> TestResult<CargaRecord> {
    Ok(CargaRecord {
        uuid,
        owner_uuid: TEST_USER_UUID,
        origin: located("Buenos Aires", "Buenos Aires", -34.6037, -58.3816)?,
        destination: located("Córdoba", "Córdoba", -31.4201, -64.1888)?,
        cargo_type: "granos".to_string(),
        truck_type: "semi".to_string(),
        rate: Some(Rate::new(Decimal::from(647_000), RateKind::PerTrip, false)?),
        state: PostingState::Available,
        available_until: None,
        assignee_uuid: None,
        assigned_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    })
}

/// Permanently available truck based in Rosario.
pub(crate) fn make_truck(uuid: TruckUuid) -> TestResult<TruckRecord> {
    Ok(TruckRecord {
        uuid,
        owner_uuid: TEST_USER_UUID,
        origin: located("Rosario", "Santa Fe", -32.9468, -60.6393)?,
        destination: None,
        truck_type: "semi".to_string(),
        capacity_tons: Decimal::from(28),
        refrigerated: false,
        radius: OperatingRadius::new(200)?,
        availability: Availability::Permanent,
        state: PostingState::Available,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    })
}
