//! Fixed-annuity mortgage amortization

use serde::{Deserialize, Serialize};

/// Split of one month's annuity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationStep {
    pub interest: f64,

    /// Actual reduction of the balance this month
    pub principal_paid: f64,

    /// Part of the annuity left over once the loan is paid off
    pub overpayment: f64,

    pub remaining_balance: f64,
}

/// Amortization schedule with a payment fixed at origination
///
/// The payment is never trued up after payoff: once the balance reaches zero
/// the full annuity keeps being paid and shows up as `overpayment`.
#[derive(Debug, Clone)]
pub struct AmortizationSchedule {
    annuity: f64,
    monthly_rate: f64,
    balance: f64,
}

impl AmortizationSchedule {
    /// Start a schedule paying `annuity` every month
    ///
    /// The annuity comes from `DerivedConstants::monthly_annuity` so the
    /// schedule and the rent gap use the identical payment.
    pub fn new(loan_amount: f64, annual_rate: f64, annuity: f64) -> Self {
        Self {
            annuity,
            monthly_rate: annual_rate / 12.0,
            balance: loan_amount,
        }
    }

    pub fn annuity(&self) -> f64 {
        self.annuity
    }

    pub fn remaining_balance(&self) -> f64 {
        self.balance
    }

    /// Pay one month's annuity
    pub fn step(&mut self) -> AmortizationStep {
        let interest = self.balance * self.monthly_rate;
        let scheduled_principal = self.annuity - interest;
        let remaining_balance = (self.balance - scheduled_principal).max(0.0);
        let principal_paid = self.balance - remaining_balance;

        self.balance = remaining_balance;

        AmortizationStep {
            interest,
            principal_paid,
            overpayment: scheduled_principal - principal_paid,
            remaining_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_first_month_split() {
        let mut schedule = AmortizationSchedule::new(520_000.0, 0.0345, 2145.0);
        assert_relative_eq!(schedule.annuity(), 2145.0, epsilon = 1e-9);

        let step = schedule.step();
        assert_relative_eq!(step.interest, 1495.0, epsilon = 1e-9);
        assert_relative_eq!(step.principal_paid, 650.0, epsilon = 1e-9);
        assert_eq!(step.overpayment, 0.0);
        assert_relative_eq!(step.remaining_balance, 519_350.0, epsilon = 1e-9);
    }

    #[test]
    fn test_payment_components_sum_to_annuity() {
        let mut schedule = AmortizationSchedule::new(520_000.0, 0.0345, 2145.0);
        let mut previous = schedule.remaining_balance();

        for _ in 0..360 {
            let step = schedule.step();
            assert_abs_diff_eq!(
                step.interest + step.principal_paid + step.overpayment,
                schedule.annuity(),
                epsilon = 1e-8
            );
            assert!(step.remaining_balance <= previous);
            assert!(step.remaining_balance >= 0.0);
            previous = step.remaining_balance;
        }
    }

    #[test]
    fn test_payoff_clamps_without_reducing_payment() {
        // 50% amortization pays a 100k loan off inside three years
        let mut schedule = AmortizationSchedule::new(100_000.0, 0.01, 0.51 * 100_000.0 / 12.0);
        let mut paid_off_month = None;

        for month in 1..=60 {
            let before = schedule.remaining_balance();
            let step = schedule.step();
            assert!(step.principal_paid <= before + 1e-9);

            if step.remaining_balance == 0.0 && paid_off_month.is_none() {
                paid_off_month = Some(month);
                assert!(step.overpayment > 0.0);
            }
        }

        assert!(paid_off_month.is_some());
        let step = schedule.step();
        assert_eq!(step.interest, 0.0);
        assert_eq!(step.principal_paid, 0.0);
        assert_relative_eq!(step.overpayment, schedule.annuity());
    }

    #[test]
    fn test_interest_only_keeps_balance() {
        let mut schedule = AmortizationSchedule::new(200_000.0, 0.04, 0.04 * 200_000.0 / 12.0);
        for _ in 0..24 {
            let step = schedule.step();
            assert_abs_diff_eq!(step.remaining_balance, 200_000.0, epsilon = 1e-6);
        }
    }
}
