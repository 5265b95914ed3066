//! Property value and rent tracks
//!
//! Both compound monthly at a twelfth of their annual rate. Values are
//! evaluated in closed form for each month rather than by repeated
//! multiplication, so long horizons do not accumulate rounding drift.

/// `principal * (1 + monthly_rate)^months`
pub fn compounded(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    principal * (1.0 + monthly_rate).powi(months as i32)
}

/// Appreciating property and the running costs tied to its value
#[derive(Debug, Clone)]
pub struct PropertyValueTrack {
    purchase_price: f64,
    monthly_appreciation: f64,
    monthly_holding_cost_ratio: f64,
}

impl PropertyValueTrack {
    pub fn new(purchase_price: f64, appreciation_rate: f64, annual_holding_cost_ratio: f64) -> Self {
        Self {
            purchase_price,
            monthly_appreciation: appreciation_rate / 12.0,
            monthly_holding_cost_ratio: annual_holding_cost_ratio / 12.0,
        }
    }

    /// Property value at the end of `month`
    pub fn value_at(&self, month: u32) -> f64 {
        compounded(self.purchase_price, self.monthly_appreciation, month)
    }

    /// Holding cost for `month`, charged on the appreciated value
    pub fn holding_cost_at(&self, month: u32) -> f64 {
        self.value_at(month) * self.monthly_holding_cost_ratio
    }
}

/// Growing rent compared against the fixed mortgage annuity
#[derive(Debug, Clone)]
pub struct RentTrack {
    base_rent: f64,
    monthly_growth: f64,
    annuity: f64,
}

impl RentTrack {
    pub fn new(base_rent: f64, rent_growth_rate: f64, annuity: f64) -> Self {
        Self {
            base_rent,
            monthly_growth: rent_growth_rate / 12.0,
            annuity,
        }
    }

    /// Rent due in `month`; growth already applies in month 1
    pub fn rent_at(&self, month: u32) -> f64 {
        compounded(self.base_rent, self.monthly_growth, month)
    }

    /// Annuity minus rent; negative once rent overtakes the mortgage payment
    pub fn gap_at(&self, month: u32) -> f64 {
        self.annuity - self.rent_at(month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_property_value_compounds_monthly() {
        let track = PropertyValueTrack::new(650_000.0, 0.025, 0.005);

        assert_relative_eq!(track.value_at(0), 650_000.0);
        assert_relative_eq!(track.value_at(1), 650_000.0 * (1.0 + 0.025 / 12.0), epsilon = 1e-9);
        assert_relative_eq!(
            track.holding_cost_at(1),
            track.value_at(1) * 0.005 / 12.0,
            epsilon = 1e-9
        );

        let mut previous = track.value_at(0);
        for month in 1..=120 {
            let value = track.value_at(month);
            assert!(value > previous);
            previous = value;
        }
    }

    #[test]
    fn test_zero_growth_is_constant() {
        let property = PropertyValueTrack::new(400_000.0, 0.0, 0.01);
        let rent = RentTrack::new(1150.0, 0.0, 1500.0);

        for month in 1..=60 {
            assert_eq!(property.value_at(month), 400_000.0);
            assert_eq!(rent.rent_at(month), 1150.0);
            assert_eq!(rent.gap_at(month), 350.0);
        }
    }

    #[test]
    fn test_rent_grows_from_first_month() {
        let rent = RentTrack::new(1896.0, 0.03, 2145.0);

        assert_relative_eq!(rent.rent_at(1), 1896.0 * 1.0025, epsilon = 1e-9);
        assert_relative_eq!(rent.gap_at(1), 2145.0 - 1896.0 * 1.0025, epsilon = 1e-9);
    }

    #[test]
    fn test_rent_strictly_increasing_over_long_horizon() {
        for growth in [0.001, 0.03, 0.12] {
            let rent = RentTrack::new(1896.0, growth, 2145.0);
            let mut previous = rent.rent_at(0);
            for month in 1..=480 {
                let current = rent.rent_at(month);
                assert!(current > previous, "growth {} month {}", growth, month);
                assert!(rent.gap_at(month) < rent.gap_at(month - 1));
                previous = current;
            }
        }
    }

    #[test]
    fn test_gap_flips_sign_once() {
        let rent = RentTrack::new(1896.0, 0.03, 2145.0);
        let flips = (1..240)
            .filter(|&m| (rent.gap_at(m) >= 0.0) != (rent.gap_at(m + 1) >= 0.0))
            .count();

        assert_eq!(flips, 1);
        assert!(rent.gap_at(49) > 0.0);
        assert!(rent.gap_at(50) < 0.0);
    }
}
