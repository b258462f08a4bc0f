//! Pricing and payment-window policy.
//!
//! The one place where the system markup and the payment timeout are
//! applied. A booking's total price is quoted exactly once, at creation,
//! and frozen; nothing downstream recomputes it.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Default minutes a booking may stay unpaid before the expiry sweep
/// cancels it.
pub const DEFAULT_PAYMENT_TIMEOUT_MINUTES: u32 = 15;

/// Default percentage added on top of a unit's base price.
pub const DEFAULT_MARKUP_PERCENT: u32 = 15;

/// Markup and payment-window configuration consumed by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    pub payment_timeout_minutes: u32,
    pub markup_percent: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            payment_timeout_minutes: DEFAULT_PAYMENT_TIMEOUT_MINUTES,
            markup_percent: DEFAULT_MARKUP_PERCENT,
        }
    }
}

impl BookingPolicy {
    /// Quote the total price for a base price: `base × (1 + markup/100)`,
    /// rounded once to 2 decimal places with round-half-up.
    pub fn quote_total_price(&self, base_price: Decimal) -> Decimal {
        let multiplier = Decimal::ONE + Decimal::from(self.markup_percent) / Decimal::from(100_u32);
        (base_price * multiplier).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Deadline by which a booking created at `now` must be paid.
    pub fn payment_deadline(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(i64::from(self.payment_timeout_minutes))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::TimeZone;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    #[case(dec!(100.00), 15, dec!(115.00))]
    #[case(dec!(100.00), 0, dec!(100.00))]
    #[case(dec!(99.99), 15, dec!(114.99))]
    #[case(dec!(10.03), 15, dec!(11.53))]
    fn quote_applies_markup_and_scale(
        #[case] base: Decimal,
        #[case] markup: u32,
        #[case] expected: Decimal,
    ) {
        let policy = BookingPolicy {
            payment_timeout_minutes: 15,
            markup_percent: markup,
        };
        assert_eq!(policy.quote_total_price(base), expected);
    }

    #[rstest]
    fn quote_rounds_half_up() {
        // 0.10 × 1.15 = 0.115 — the midpoint must round away from zero.
        let policy = BookingPolicy::default();
        assert_eq!(policy.quote_total_price(dec!(0.10)), dec!(0.12));
    }

    #[rstest]
    fn deadline_is_exactly_now_plus_timeout() {
        let policy = BookingPolicy::default();
        let now = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).single().expect("valid timestamp");
        let expected = Utc
            .with_ymd_and_hms(2026, 8, 7, 12, 15, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(policy.payment_deadline(now), expected);
    }

    #[rstest]
    fn defaults_match_configuration_contract() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.payment_timeout_minutes, 15);
        assert_eq!(policy.markup_percent, 15);
    }
}
