use rust_decimal::Decimal;

/// Cashback an expense earns before any cap: `amount * percent / 100`,
/// rounded down to a whole currency unit.
///
/// Flooring keeps quoted figures at or below what an issuer credits,
/// e.g. `942 * 25%` is 235.5 and earns 235.
///
/// Never panics: a product past [Decimal::MAX] is scaled down first and
/// saturates if it still does not fit.
pub(crate) fn raw_cashback(amount: Decimal, percent: Decimal) -> Decimal {
    let scaled = match amount.checked_mul(percent) {
        Some(product) => product / Decimal::ONE_HUNDRED,
        None => (amount / Decimal::ONE_HUNDRED).saturating_mul(percent),
    };
    scaled.floor()
}

/// How one expense's raw cashback splits between what is credited and what
/// the cap swallows. `eligible + lost == raw` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CashbackResult {
    pub(crate) raw: Decimal,
    pub(crate) eligible: Decimal,
    pub(crate) lost: Decimal,
}

impl CashbackResult {
    pub(crate) const ZERO: Self = Self {
        raw: Decimal::ZERO,
        eligible: Decimal::ZERO,
        lost: Decimal::ZERO,
    };

    pub(crate) fn uncapped(raw: Decimal) -> Self {
        Self {
            raw,
            eligible: raw,
            lost: Decimal::ZERO,
        }
    }

    /// Split `raw` against what is left of the cap.
    pub(crate) fn capped(raw: Decimal, remaining: Decimal) -> Self {
        let eligible = raw.min(remaining.max(Decimal::ZERO));
        Self {
            raw,
            eligible,
            lost: raw - eligible,
        }
    }
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
