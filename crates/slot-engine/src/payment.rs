//! Package payments: splitting an amount across parts, and the commission the
//! card processor keeps.
//!
//! All amounts are integer minor units. Rates are basis points (1/100 of a
//! percent), so a 2.5 % card fee is `250`.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub type Cents = u64;

const BPS_DENOMINATOR: u128 = 10_000;

/// Highest accepted commission rate: 100 %.
pub const MAX_RATE_BPS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

/// One part of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tender {
    pub method: PaymentMethod,
    pub amount: Cents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub total: Cents,
    pub card_total: Cents,
    pub commission: Cents,
    /// What the studio keeps after card commission.
    pub net: Cents,
}

/// Split `total` in proportion to `weights`.
///
/// Uses the largest-remainder method, so the parts always add up to `total`
/// exactly. Ties go to the earlier weight.
///
/// # Errors
/// Returns `EngineError::InvalidSplit` when `weights` is empty or sums to zero.
pub fn split_proportionally(total: Cents, weights: &[u64]) -> Result<Vec<Cents>> {
    let weight_sum: u128 = weights.iter().map(|&w| w as u128).sum();
    if weight_sum == 0 {
        return Err(EngineError::InvalidSplit(
            "weights must contain at least one positive value".to_string(),
        ));
    }

    let total_wide = total as u128;
    let mut parts: Vec<Cents> = Vec::with_capacity(weights.len());
    let mut remainders: Vec<(u128, usize)> = Vec::with_capacity(weights.len());
    for (i, &w) in weights.iter().enumerate() {
        let scaled = total_wide * w as u128;
        parts.push((scaled / weight_sum) as Cents);
        remainders.push((scaled % weight_sum, i));
    }

    // Hand out the cents lost to flooring, largest remainder first.
    let allotted: Cents = parts.iter().sum();
    let leftover = (total - allotted) as usize;
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, i) in remainders.iter().take(leftover) {
        parts[i] += 1;
    }

    Ok(parts)
}

/// Commission on a card amount, rounded half up to the nearest minor unit.
///
/// # Errors
/// Returns `EngineError::InvalidRate` when `rate_bps` is above
/// [`MAX_RATE_BPS`].
pub fn card_commission(amount: Cents, rate_bps: u32) -> Result<Cents> {
    if rate_bps > MAX_RATE_BPS {
        return Err(EngineError::InvalidRate(rate_bps));
    }
    let scaled = amount as u128 * rate_bps as u128;
    Cents::try_from((scaled + BPS_DENOMINATOR / 2) / BPS_DENOMINATOR)
        .map_err(|_| EngineError::AmountOverflow)
}

fn checked_total<'a>(tenders: impl IntoIterator<Item = &'a Tender>) -> Result<Cents> {
    tenders
        .into_iter()
        .try_fold(0 as Cents, |acc, t| acc.checked_add(t.amount))
        .ok_or(EngineError::AmountOverflow)
}

/// Settle a package payment made with one or more tenders.
///
/// Commission applies to card tenders only, computed on their combined amount.
///
/// # Errors
/// Returns `EngineError::InvalidRate` for a rate above [`MAX_RATE_BPS`],
/// `EngineError::AmountOverflow` when the tenders overflow a `u64`, and
/// `EngineError::PaymentMismatch` when they do not add up to `total`.
pub fn settle(total: Cents, tenders: &[Tender], rate_bps: u32) -> Result<Settlement> {
    if rate_bps > MAX_RATE_BPS {
        return Err(EngineError::InvalidRate(rate_bps));
    }
    let tendered = checked_total(tenders)?;
    if tendered != total {
        return Err(EngineError::PaymentMismatch { total, tendered });
    }

    let card_total = checked_total(tenders.iter().filter(|t| t.method == PaymentMethod::Card))?;
    let commission = card_commission(card_total, rate_bps)?;

    tracing::debug!(total, card_total, commission, rate_bps, "settled payment");
    Ok(Settlement {
        total,
        card_total,
        commission,
        net: total.saturating_sub(commission),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_rounds_half_up() {
        // 1234 * 2.5 % = 30.85
        assert_eq!(card_commission(1234, 250).unwrap(), 31);
        // 1220 * 2.5 % = 30.5
        assert_eq!(card_commission(1220, 250).unwrap(), 31);
        assert_eq!(card_commission(0, 250).unwrap(), 0);
    }

    #[test]
    fn full_rate_keeps_the_whole_amount() {
        assert_eq!(card_commission(u64::MAX, MAX_RATE_BPS).unwrap(), u64::MAX);
    }

    #[test]
    fn rate_above_one_hundred_percent_is_rejected() {
        assert!(matches!(
            card_commission(u64::MAX, u32::MAX),
            Err(EngineError::InvalidRate(u32::MAX))
        ));
    }
}
