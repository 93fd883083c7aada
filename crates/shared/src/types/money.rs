use rust_decimal::{Decimal, RoundingStrategy};

/// Round HALF_UP (ties away from zero) to 2 fractional digits, matching
/// the pricing engine's rounding rule (§4.1). Every money-valued field in
/// this system is a plain `rust_decimal::Decimal` rounded through this
/// function at the point it is produced, and serialized as a decimal
/// string via `rust_decimal::serde::str` on the model itself — there is no
/// separate `Money` wrapper type.
pub fn round_half_up_2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_up_rounding() {
        // 10.995 rounds HALF_UP to 11.00, never to 10.99 (which binary
        // float rounding sometimes produces).
        assert_eq!(round_half_up_2(dec!(10.995)), dec!(11.00));
        assert_eq!(round_half_up_2(dec!(10.005)), dec!(10.01));
        assert_eq!(round_half_up_2(dec!(10.004)), dec!(10.00));
    }

    #[test]
    fn test_half_up_rounding_is_idempotent() {
        assert_eq!(round_half_up_2(dec!(50.00)), dec!(50.00));
    }
}
