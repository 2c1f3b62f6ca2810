//! Fixtures
//!
//! YAML seed data for demos and manual testing. Postings reference their
//! owners by the profile's fixture key.

use std::{fs, path::Path};

use freight::{
    postings::{Availability, Location, OperatingRadius},
    rates::Rate,
};
use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    cargas::{CargasService, CargasServiceError, data::NewCarga, records::CargaUuid},
    profiles::{
        ProfilesService, ProfilesServiceError,
        data::NewProfile,
        records::{Role, UserUuid},
    },
    settings::{SettingsService, SettingsServiceError, data::NewVariable},
    trucks::{TrucksService, TrucksServiceError, data::NewTruck, records::TruckUuid},
};

/// Fixture loading and seeding errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("unknown owner `{owner}` referenced by `{posting}`")]
    UnknownOwner { posting: String, owner: String },

    #[error("profile `{0}`: {1}")]
    Profile(String, #[source] ProfilesServiceError),

    #[error("setting `{0}`: {1}")]
    Setting(String, #[source] SettingsServiceError),

    #[error("carga `{0}`: {1}")]
    Carga(String, #[source] CargasServiceError),

    #[error("truck `{0}`: {1}")]
    Truck(String, #[source] TrucksServiceError),
}

/// A parsed fixture file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureSet {
    #[serde(default)]
    pub profiles: FxHashMap<String, ProfileFixture>,

    #[serde(default)]
    pub settings: Vec<SettingFixture>,

    #[serde(default)]
    pub cargas: FxHashMap<String, CargaFixture>,

    #[serde(default)]
    pub trucks: FxHashMap<String, TruckFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileFixture {
    pub uuid: Uuid,
    pub display_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingFixture {
    pub key: String,
    pub value: String,
    pub category: String,

    #[serde(default = "active_by_default")]
    pub active: bool,
}

const fn active_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CargaFixture {
    pub owner: String,
    pub origin: Location,
    pub destination: Location,
    pub cargo_type: String,
    pub truck_type: String,

    #[serde(default)]
    pub rate: Option<Rate>,

    #[serde(default)]
    pub available_until: Option<Date>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TruckFixture {
    pub owner: String,
    pub origin: Location,

    #[serde(default)]
    pub destination: Option<Location>,
    pub truck_type: String,
    pub capacity_tons: Decimal,

    #[serde(default)]
    pub refrigerated: bool,
    pub radius_km: OperatingRadius,
    pub availability: Availability,
}

/// What a seed run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub profiles: usize,
    pub settings: usize,
    pub cargas: usize,
    pub trucks: usize,
}

/// Services a seed run writes through.
pub struct Seeder<'a> {
    pub profiles: &'a dyn ProfilesService,
    pub settings: &'a dyn SettingsService,
    pub cargas: &'a dyn CargasService,
    pub trucks: &'a dyn TrucksService,
}

impl FixtureSet {
    /// Parse a fixture document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a fixture set.
    pub fn parse(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    fn owner(&self, posting: &str, owner: &str) -> Result<UserUuid, FixtureError> {
        self.profiles
            .get(owner)
            .map(|profile| UserUuid::from_uuid(profile.uuid))
            .ok_or_else(|| FixtureError::UnknownOwner {
                posting: posting.to_string(),
                owner: owner.to_string(),
            })
    }
}

impl Seeder<'_> {
    /// Write `fixtures`. Profiles that already exist are kept; postings are
    /// always created fresh.
    ///
    /// # Errors
    ///
    /// Returns the first failing record.
    pub async fn seed(&self, fixtures: &FixtureSet) -> Result<SeedReport, FixtureError> {
        let mut report = SeedReport::default();

        for (key, profile) in &fixtures.profiles {
            let created = self
                .profiles
                .create_profile(NewProfile {
                    uuid: UserUuid::from_uuid(profile.uuid),
                    display_name: profile.display_name.clone(),
                    role: profile.role,
                })
                .await;

            match created {
                Ok(_) => report.profiles += 1,
                Err(ProfilesServiceError::AlreadyExists) => {}
                Err(error) => return Err(FixtureError::Profile(key.clone(), error)),
            }
        }

        for setting in &fixtures.settings {
            self.settings
                .set_variable(NewVariable {
                    key: setting.key.clone(),
                    value: setting.value.clone(),
                    category: setting.category.clone(),
                    active: setting.active,
                })
                .await
                .map_err(|error| FixtureError::Setting(setting.key.clone(), error))?;

            report.settings += 1;
        }

        for (key, carga) in &fixtures.cargas {
            let owner = fixtures.owner(key, &carga.owner)?;

            self.cargas
                .create_carga(
                    owner,
                    NewCarga {
                        uuid: CargaUuid::new(),
                        origin: carga.origin.clone(),
                        destination: carga.destination.clone(),
                        cargo_type: carga.cargo_type.clone(),
                        truck_type: carga.truck_type.clone(),
                        rate: carga.rate,
                        available_until: carga.available_until,
                    },
                )
                .await
                .map_err(|error| FixtureError::Carga(key.clone(), error))?;

            report.cargas += 1;
        }

        for (key, truck) in &fixtures.trucks {
            let owner = fixtures.owner(key, &truck.owner)?;

            self.trucks
                .create_truck(
                    owner,
                    NewTruck {
                        uuid: TruckUuid::new(),
                        origin: truck.origin.clone(),
                        destination: truck.destination.clone(),
                        truck_type: truck.truck_type.clone(),
                        capacity_tons: truck.capacity_tons,
                        refrigerated: truck.refrigerated,
                        radius: truck.radius_km,
                        availability: truck.availability,
                    },
                )
                .await
                .map_err(|error| FixtureError::Truck(key.clone(), error))?;

            report.trucks += 1;
        }

        info!(?report, "fixtures seeded");

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use freight::{filters::PostingFilter, rates::RateKind, visibility::EntityKind};
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    const DEMO: &str = include_str!("../../../fixtures/demo.yml");

    #[test]
    fn demo_fixture_parses() -> TestResult {
        let fixtures = FixtureSet::parse(DEMO)?;

        assert!(!fixtures.profiles.is_empty());
        assert!(!fixtures.cargas.is_empty());
        assert!(!fixtures.trucks.is_empty());

        let rates: Vec<RateKind> = fixtures
            .cargas
            .values()
            .filter_map(|carga| carga.rate.map(|rate| rate.kind()))
            .collect();

        assert!(rates.contains(&RateKind::PerTrip));
        assert!(rates.contains(&RateKind::PerTon));

        Ok(())
    }

    #[test]
    fn unknown_owners_are_reported() -> TestResult {
        let fixtures = FixtureSet::parse(
            r"
cargas:
  huerfana:
    owner: nadie
    origin: { address: Rosario }
    destination: { address: Córdoba }
    cargo_type: granos
    truck_type: semi
",
        )?;

        let carga = fixtures.cargas.get("huerfana").ok_or("missing carga")?;

        assert!(matches!(
            fixtures.owner("huerfana", &carga.owner),
            Err(FixtureError::UnknownOwner { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn seeding_is_repeatable_for_profiles() -> TestResult {
        let ctx = TestContext::new().await;
        let fixtures = FixtureSet::parse(DEMO)?;

        let seeder = Seeder {
            profiles: ctx.profiles.as_ref(),
            settings: ctx.settings.as_ref(),
            cargas: ctx.cargas.as_ref(),
            trucks: ctx.trucks.as_ref(),
        };

        let first = seeder.seed(&fixtures).await?;
        let second = seeder.seed(&fixtures).await?;

        assert_eq!(first.profiles, fixtures.profiles.len());
        assert_eq!(second.profiles, 0);
        assert_eq!(second.cargas, fixtures.cargas.len());

        let listed = ctx
            .cargas
            .list_available_cargas(PostingFilter::default(), None)
            .await?;

        assert_eq!(listed.len(), fixtures.cargas.len() * 2);
        assert!(ctx.settings.grace_period(EntityKind::Truck).await?.as_days() > 0);

        Ok(())
    }
}
