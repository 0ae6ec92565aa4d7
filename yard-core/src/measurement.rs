use crate::{calculator, reference, species::Species};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

/// Where the applied density of a record came from.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum DensitySource {
    /// Seasonal table lookup for the measurement month
    #[default]
    Table,
    /// Entered by hand at measurement time
    Manual,
}

/// One drone survey of a pile, optionally reconciled against a scale ticket.
///
/// Derived fields are computed once by [`calculator::derive`] when the
/// record is built and are never touched again; correcting a record means
/// replacing it with a newly built one.
///
/// Serialized with named fields. Loading goes through a raw on-disk form: only
/// the identity fields are required, and a record missing any derived
/// field has all of them recomputed from its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct MeasurementRecord {
    date: NaiveDate,
    pile_id: String,
    species: Species,
    /// Stacked volume in m³
    drone_volume: f64,
    /// kg/m³
    applied_density: f64,
    density_source: DensitySource,
    stacking_factor: f64,
    /// Tons
    estimated_mass: f64,
    /// Tons; zero when the pile has not been weighed
    scale_mass: f64,
    /// t/m³
    real_conversion_factor: f64,
    error_tons: f64,
    error_pct: f64,
}

/// A record as found on disk.
///
/// Accepts both the current field names and the column names of the
/// spreadsheet-era `estoque_arauco_final.json` files.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "Data", deserialize_with = "deserialize_date")]
    date: NaiveDate,
    #[serde(alias = "Pilha_ID")]
    pile_id: String,
    #[serde(alias = "Tipo_Madeira")]
    species: Species,
    #[serde(alias = "Volume_Drone_Estereo")]
    drone_volume: f64,
    #[serde(default, alias = "Densidade_Aplicada")]
    applied_density: Option<f64>,
    #[serde(default)]
    density_source: Option<DensitySource>,
    #[serde(default, alias = "Fator_Teorico")]
    stacking_factor: Option<f64>,
    #[serde(default, alias = "Peso_Teorico_Ton")]
    estimated_mass: Option<f64>,
    #[serde(default, alias = "Peso_Tickets_Ton")]
    scale_mass: Option<f64>,
    #[serde(default, alias = "Fator_Conversao_Real")]
    real_conversion_factor: Option<f64>,
    #[serde(default, alias = "Erro_Ton")]
    error_tons: Option<f64>,
    #[serde(default, alias = "Erro_Percentual")]
    error_pct: Option<f64>,
}

impl From<RawRecord> for MeasurementRecord {
    fn from(raw: RawRecord) -> Self {
        let (applied_density, density_source) = match raw.applied_density {
            Some(density) => (density, raw.density_source.unwrap_or_default()),
            None => (
                reference::default_density(&raw.date, raw.species),
                DensitySource::Table,
            ),
        };
        let scale_mass = raw.scale_mass.unwrap_or(0.0);

        let stored = (
            raw.stacking_factor,
            raw.estimated_mass,
            raw.real_conversion_factor,
            raw.error_tons,
            raw.error_pct,
        );
        let derived = match stored {
            (
                Some(stacking_factor),
                Some(estimated_mass),
                Some(real_conversion_factor),
                Some(error_tons),
                Some(error_pct),
            ) if raw.applied_density.is_some() => calculator::DerivedFields {
                stacking_factor,
                estimated_mass,
                real_conversion_factor,
                error_tons,
                error_pct,
            },
            _ => {
                debug!(
                    "record {} {}: derived fields incomplete, recomputing",
                    raw.pile_id, raw.date
                );
                calculator::derive(raw.drone_volume, raw.species, applied_density, scale_mass)
            }
        };

        MeasurementRecord {
            date: raw.date,
            pile_id: raw.pile_id,
            species: raw.species,
            drone_volume: raw.drone_volume,
            applied_density,
            density_source,
            stacking_factor: derived.stacking_factor,
            estimated_mass: derived.estimated_mass,
            scale_mass,
            real_conversion_factor: derived.real_conversion_factor,
            error_tons: derived.error_tons,
            error_pct: derived.error_pct,
        }
    }
}

impl MeasurementRecord {
    /// Build a record and compute its derived fields.
    ///
    /// The caller is responsible for the entry preconditions; use
    /// [`crate::entry::MeasurementEntry::into_record`] for validated input.
    pub fn new(
        date: NaiveDate,
        pile_id: impl Into<String>,
        species: Species,
        drone_volume: f64,
        applied_density: f64,
        density_source: DensitySource,
        scale_mass: f64,
    ) -> Self {
        let derived = calculator::derive(drone_volume, species, applied_density, scale_mass);
        MeasurementRecord {
            date,
            pile_id: pile_id.into(),
            species,
            drone_volume,
            applied_density,
            density_source,
            stacking_factor: derived.stacking_factor,
            estimated_mass: derived.estimated_mass,
            scale_mass,
            real_conversion_factor: derived.real_conversion_factor,
            error_tons: derived.error_tons,
            error_pct: derived.error_pct,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn pile_id(&self) -> &str {
        &self.pile_id
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn drone_volume(&self) -> f64 {
        self.drone_volume
    }

    pub fn applied_density(&self) -> f64 {
        self.applied_density
    }

    pub fn density_source(&self) -> DensitySource {
        self.density_source
    }

    pub fn stacking_factor(&self) -> f64 {
        self.stacking_factor
    }

    pub fn estimated_mass(&self) -> f64 {
        self.estimated_mass
    }

    pub fn scale_mass(&self) -> f64 {
        self.scale_mass
    }

    pub fn real_conversion_factor(&self) -> f64 {
        self.real_conversion_factor
    }

    pub fn error_tons(&self) -> f64 {
        self.error_tons
    }

    pub fn error_pct(&self) -> f64 {
        self.error_pct
    }

    /// True once a scale ticket has been recorded for this survey.
    pub fn is_weighed(&self) -> bool {
        self.scale_mass > 0.0
    }

    /// Error percentage, or `None` for a pile that was never weighed.
    ///
    /// A stored `error_pct` of zero is ambiguous on its own; this tells an
    /// exact estimate apart from a missing weighing.
    pub fn weighed_error_pct(&self) -> Option<f64> {
        self.is_weighed().then_some(self.error_pct)
    }

    pub fn weighed_scale_mass(&self) -> Option<f64> {
        self.is_weighed().then_some(self.scale_mass)
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    yard_utils::dates::parse_date(&raw).map_err(serde::de::Error::custom)
}
