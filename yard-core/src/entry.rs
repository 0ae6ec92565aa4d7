use crate::{
    error::{Result, ValidationError},
    measurement::{DensitySource, MeasurementRecord},
    reference,
    species::Species,
};
use chrono::NaiveDate;
use log::debug;

/// Raw inputs for one measurement, as supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementEntry {
    pub date: NaiveDate,
    pub pile_id: String,
    pub species: Species,
    /// Stacked volume from the drone survey, m³
    pub drone_volume: f64,
    /// Manual density override in kg/m³; `None` uses the seasonal table
    pub density: Option<f64>,
    /// Scale ticket total in tons; `None` or zero means not weighed yet
    pub scale_mass: Option<f64>,
}

impl MeasurementEntry {
    pub fn new(
        date: NaiveDate,
        pile_id: impl Into<String>,
        species: Species,
        drone_volume: f64,
    ) -> Self {
        MeasurementEntry {
            date,
            pile_id: pile_id.into(),
            species,
            drone_volume,
            density: None,
            scale_mass: None,
        }
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    pub fn with_scale_mass(mut self, scale_mass: f64) -> Self {
        self.scale_mass = Some(scale_mass);
        self
    }

    /// Check the entry preconditions, first failure wins.
    ///
    /// Order: pile id, volume, density override, scale mass. NaN and
    /// infinities fail the numeric checks.
    pub fn validate(&self) -> Result<()> {
        if self.pile_id.trim().is_empty() {
            return Err(ValidationError::EmptyPileId);
        }
        if !(self.drone_volume.is_finite() && self.drone_volume > 0.0) {
            return Err(ValidationError::NonPositiveVolume(self.drone_volume));
        }
        if let Some(density) = self.density {
            if !(density.is_finite() && density > 0.0) {
                return Err(ValidationError::NonPositiveDensity(density));
            }
        }
        if let Some(scale_mass) = self.scale_mass {
            if !(scale_mass.is_finite() && scale_mass >= 0.0) {
                return Err(ValidationError::NegativeScaleMass(scale_mass));
            }
        }
        Ok(())
    }

    /// Density that will be applied, and where it comes from.
    pub fn applied_density(&self) -> (f64, DensitySource) {
        match self.density {
            Some(density) => (density, DensitySource::Manual),
            None => (
                reference::default_density(&self.date, self.species),
                DensitySource::Table,
            ),
        }
    }

    /// Validate and turn the entry into a fully derived record.
    pub fn into_record(self) -> Result<MeasurementRecord> {
        self.validate()?;
        let (density, source) = self.applied_density();
        debug!(
            "deriving {} {} on {}: {} m³ at {} kg/m³ ({:?})",
            self.species, self.pile_id, self.date, self.drone_volume, density, source
        );
        Ok(MeasurementRecord::new(
            self.date,
            self.pile_id.trim(),
            self.species,
            self.drone_volume,
            density,
            source,
            self.scale_mass.unwrap_or(0.0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_auto_density_scenario() {
        let record = MeasurementEntry::new(june_15(), "P-10", Species::Pinus, 100.0)
            .into_record()
            .unwrap();
        assert_eq!(record.applied_density(), 500.0);
        assert_eq!(record.density_source(), DensitySource::Table);
        assert_eq!(record.stacking_factor(), 0.65);
        assert_eq!(record.estimated_mass(), 32.5);
    }

    #[test]
    fn test_weighed_scenario() {
        let record = MeasurementEntry::new(june_15(), "P-10", Species::Pinus, 100.0)
            .with_scale_mass(30.0)
            .into_record()
            .unwrap();
        assert_eq!(record.real_conversion_factor(), 0.3);
        assert_eq!(record.error_tons(), 2.5);
        assert_eq!(record.error_pct(), 8.33);
    }

    #[test]
    fn test_manual_density_uses_same_formula() {
        let manual = MeasurementEntry::new(june_15(), "P-10", Species::Pinus, 100.0)
            .with_density(500.0)
            .into_record()
            .unwrap();
        let auto = MeasurementEntry::new(june_15(), "P-10", Species::Pinus, 100.0)
            .into_record()
            .unwrap();
        assert_eq!(manual.density_source(), DensitySource::Manual);
        assert_eq!(manual.estimated_mass(), auto.estimated_mass());

        let heavier = MeasurementEntry::new(june_15(), "P-10", Species::Pinus, 100.0)
            .with_density(600.0)
            .into_record()
            .unwrap();
        assert_eq!(heavier.estimated_mass(), 39.0);
    }

    #[test]
    fn test_zero_scale_mass_means_unweighed() {
        let record = MeasurementEntry::new(june_15(), "E-1", Species::Eucalipto, 80.0)
            .with_scale_mass(0.0)
            .into_record()
            .unwrap();
        assert!(!record.is_weighed());
        assert_eq!(record.error_tons(), 0.0);
    }

    #[test]
    fn test_pile_id_is_trimmed() {
        let record = MeasurementEntry::new(june_15(), "  P-10 ", Species::Pinus, 1.0)
            .into_record()
            .unwrap();
        assert_eq!(record.pile_id(), "P-10");
    }

    #[test]
    fn test_rejects_empty_pile_id() {
        let err = MeasurementEntry::new(june_15(), "   ", Species::Pinus, 100.0)
            .into_record()
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyPileId);
    }

    #[test]
    fn test_rejects_non_positive_volume() {
        for volume in [0.0, -5.0] {
            let err = MeasurementEntry::new(june_15(), "P", Species::Pinus, volume)
                .validate()
                .unwrap_err();
            assert_eq!(err, ValidationError::NonPositiveVolume(volume));
        }
        let nan = MeasurementEntry::new(june_15(), "P", Species::Pinus, f64::NAN).validate();
        assert!(matches!(nan, Err(ValidationError::NonPositiveVolume(_))));
    }

    #[test]
    fn test_empty_pile_checked_before_volume() {
        let err = MeasurementEntry::new(june_15(), "", Species::Pinus, 0.0)
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyPileId);
    }

    #[test]
    fn test_rejects_bad_density_and_scale() {
        let err = MeasurementEntry::new(june_15(), "P", Species::Pinus, 10.0)
            .with_density(0.0)
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveDensity(0.0));

        let err = MeasurementEntry::new(june_15(), "P", Species::Pinus, 10.0)
            .with_scale_mass(-1.0)
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::NegativeScaleMass(-1.0));
    }
}
