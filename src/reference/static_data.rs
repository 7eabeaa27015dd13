//! Alloy composition and the rod-length labour schedule.
use crate::error::{PricingError, Result};
use crate::pricing::Metal;

/// One step of the labour schedule: rods of at least `min_length` use `factor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabourBreakpoint {
    pub min_length: f64,
    pub factor: f64,
}

impl From<(f64, f64)> for LabourBreakpoint {
    fn from((min_length, factor): (f64, f64)) -> Self {
        Self { min_length, factor }
    }
}

/// Per-instance static reference data. Each order book owns its own copy, so
/// changing the composition for one book never leaks into another.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticData {
    copper_fraction: f64,
    labour_factors: Vec<LabourBreakpoint>,
}

impl StaticData {
    pub fn new<B: Into<LabourBreakpoint>>(copper_fraction: f64, labour_factors: impl IntoIterator<Item = B>) -> Result<Self> {
        let mut data = Self { copper_fraction: 0.0, labour_factors: Vec::new() };
        data.set_copper_fraction(copper_fraction)?;
        data.set_labour_factors(labour_factors)?;
        Ok(data)
    }

    pub fn set_copper_fraction(&mut self, copper_fraction: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&copper_fraction) {
            return Err(PricingError::InvalidCopperFraction(copper_fraction));
        }
        self.copper_fraction = copper_fraction;
        Ok(())
    }

    pub fn copper_fraction(&self) -> f64 { self.copper_fraction }

    pub fn alloy_mass_fraction(&self, metal: Metal) -> f64 {
        match metal {
            Metal::Copper => self.copper_fraction,
            Metal::Zinc => 1.0 - self.copper_fraction,
        }
    }

    /// Replaces the labour schedule. Breakpoints must be strictly ascending in
    /// length; factors are expected, not required, to increase with length.
    pub fn set_labour_factors<B: Into<LabourBreakpoint>>(&mut self, labour_factors: impl IntoIterator<Item = B>) -> Result<()> {
        let schedule: Vec<LabourBreakpoint> = labour_factors.into_iter().map(Into::into).collect();

        if schedule.is_empty() {
            return Err(PricingError::InvalidLabourSchedule("schedule is empty".into()));
        }
        if let Some(bad) = schedule.iter().find(|b| !b.min_length.is_finite() || !(b.factor.is_finite() && b.factor > 0.0)) {
            return Err(PricingError::InvalidLabourSchedule(format!(
                "breakpoint ({}, {}) must have a finite length and a positive factor",
                bad.min_length, bad.factor
            )));
        }
        if schedule.windows(2).any(|w| w[0].min_length >= w[1].min_length) {
            return Err(PricingError::InvalidLabourSchedule("lengths must be supplied in ascending order".into()));
        }
        if schedule.windows(2).any(|w| w[0].factor >= w[1].factor) {
            tracing::warn!("Labour factors are expected to be monotonically increasing");
        }

        self.labour_factors = schedule;
        Ok(())
    }

    pub fn labour_factors(&self) -> &[LabourBreakpoint] { &self.labour_factors }

    /// Factor of the greatest breakpoint not exceeding `rod_length`.
    pub fn labour_factor(&self, rod_length: f64) -> Result<f64> {
        let covering = self.labour_factors.partition_point(|b| b.min_length <= rod_length);
        match covering.checked_sub(1) {
            Some(idx) => Ok(self.labour_factors[idx].factor),
            None => Err(PricingError::LengthOutOfRange {
                length: rod_length,
                min: self.labour_factors.first().map_or(f64::NAN, |b| b.min_length),
            }),
        }
    }
}
