//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access. Tier selection,
//! base-rate computation and modifier stacking all operate on an already
//! loaded [`PricingConfig`](super::models::PricingConfig).

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{
    DayType, PricingModel, PricingModifier, PricingTier, ServiceType, TransferType, ValueType,
};
use super::services::PricingError;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use winecountry_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Format an amount as dollars for breakdown lines, e.g. `$1250.00`, `-$60.00`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = round_money(amount, 2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Validated request attributes a quote is computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteContext {
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub party_size: Option<i32>,
    pub duration_hours: Option<Decimal>,
    pub transfer_type: Option<TransferType>,
    pub wait_hours: Option<Decimal>,
}

impl QuoteContext {
    pub fn day_bucket(&self) -> DayType {
        DayType::for_date(self.date)
    }

    /// Billable hours for hourly tiers: tour duration or wait time.
    pub fn billable_hours(&self) -> Option<Decimal> {
        match self.service_type {
            ServiceType::WineTour => self.duration_hours,
            ServiceType::WaitTime => self.wait_hours,
            ServiceType::Transfer => None,
        }
    }
}

/// Whether a tier is a candidate for the request.
///
/// Checks activity, service type, day bucket, party-size band (skipped when
/// the request carries no party size) and transfer route.
pub fn tier_matches(tier: &PricingTier, ctx: &QuoteContext) -> bool {
    if !tier.active || tier.service_type != ctx.service_type {
        return false;
    }
    if !tier.day_type.matches_date(ctx.date) {
        return false;
    }
    if let Some(party_size) = ctx.party_size {
        if !tier.accepts_party_size(party_size) {
            return false;
        }
    }
    match (tier.transfer_type, ctx.transfer_type) {
        (Some(required), Some(requested)) => required == requested,
        (Some(_), None) => false,
        (None, _) => true,
    }
}

/// Select the single tier that prices the request.
///
/// When several tiers match, the narrowest party-size band wins; remaining
/// ties go to the most recently created tier, then the highest id.
pub fn select_tier<'a>(tiers: &'a [PricingTier], ctx: &QuoteContext) -> Option<&'a PricingTier> {
    tiers
        .iter()
        .filter(|tier| tier_matches(tier, ctx))
        .min_by(|a, b| {
            a.band_width()
                .cmp(&b.band_width())
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        })
}

/// Base rate computed from a tier, before the minimum charge.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseRate {
    pub amount: Decimal,
    pub explanation: String,
}

/// Compute the tier's raw base rate for the request.
pub fn compute_base_rate(tier: &PricingTier, ctx: &QuoteContext) -> Result<BaseRate, PricingError> {
    match tier.pricing_model {
        PricingModel::Hourly => {
            let rate = tier
                .hourly_rate
                .ok_or_else(|| PricingError::misconfigured(tier, "hourly tier has no hourly_rate"))?;
            let hours = ctx.billable_hours().ok_or_else(|| {
                PricingError::misconfigured(
                    tier,
                    &format!("hourly pricing is not supported for {}", ctx.service_type),
                )
            })?;
            let amount = rate
                .checked_mul(hours)
                .map(|a| round_money(a, 2))
                .ok_or_else(|| PricingError::misconfigured(tier, "hourly_rate overflows the quote"))?;
            Ok(BaseRate {
                amount,
                explanation: format!(
                    "Base rate: {}/hr × {} hours = {}",
                    format_money(rate),
                    hours.normalize(),
                    format_money(amount)
                ),
            })
        }
        PricingModel::Flat => {
            let rate = require_base_rate(tier)?;
            Ok(BaseRate {
                amount: round_money(rate, 2),
                explanation: format!("Base rate: flat {}", format_money(rate)),
            })
        }
        PricingModel::PerPerson => {
            let rate = require_base_rate(tier)?;
            let party_size = ctx.party_size.ok_or_else(|| {
                PricingError::InvalidInput("partySize is required for per-person pricing".to_string())
            })?;
            let amount = rate
                .checked_mul(Decimal::from(party_size))
                .map(|a| round_money(a, 2))
                .ok_or_else(|| PricingError::misconfigured(tier, "base_rate overflows the quote"))?;
            Ok(BaseRate {
                amount,
                explanation: format!(
                    "Base rate: {} × {} guests = {}",
                    format_money(rate),
                    party_size,
                    format_money(amount)
                ),
            })
        }
        PricingModel::PerMile => {
            let rate = require_base_rate(tier)?;
            Ok(BaseRate {
                amount: round_money(rate, 2),
                explanation: format!("Base rate: {} (per-mile tier, quoted at base rate)", format_money(rate)),
            })
        }
    }
}

fn require_base_rate(tier: &PricingTier) -> Result<Decimal, PricingError> {
    tier.base_rate
        .ok_or_else(|| PricingError::misconfigured(tier, "tier has no base_rate"))
}

/// Raise `amount` to `minimum` if it falls below. Returns the floored amount
/// and whether the floor changed it.
pub fn apply_minimum(amount: Decimal, minimum: Decimal) -> (Decimal, bool) {
    if amount < minimum {
        (minimum, true)
    } else {
        (amount, false)
    }
}

/// A modifier as applied to a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedModifier {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Result of stacking modifiers on a base rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierStack {
    pub applied: Vec<AppliedModifier>,
    pub explanations: Vec<String>,
    pub total: Decimal,
}

/// Apply modifiers to `base` in priority order (lower first, ties by id).
///
/// Percentage modifiers are computed against the running total, so the
/// order matters when more than one percentage applies. A total that leaves
/// the `Decimal` range is reported as `InvalidInput`.
pub fn apply_modifiers(
    base: Decimal,
    modifiers: &[&PricingModifier],
) -> Result<ModifierStack, PricingError> {
    let mut ordered: Vec<&PricingModifier> = modifiers.to_vec();
    ordered.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));

    let mut running = base;
    let mut applied = Vec::with_capacity(ordered.len());
    let mut explanations = Vec::with_capacity(ordered.len());

    for modifier in ordered {
        let amount = match modifier.value_type {
            ValueType::Percentage => running
                .checked_mul(modifier.value)
                .and_then(|a| a.checked_div(Decimal::ONE_HUNDRED))
                .map(|a| round_money(a, 2)),
            ValueType::Flat => Some(round_money(modifier.value, 2)),
        }
        .ok_or_else(|| modifier_overflow(modifier))?;
        running = running
            .checked_add(amount)
            .ok_or_else(|| modifier_overflow(modifier))?;

        let how = match modifier.value_type {
            ValueType::Percentage if modifier.value.is_sign_negative() => {
                format!("{}%", modifier.value.normalize())
            }
            ValueType::Percentage => format!("+{}%", modifier.value.normalize()),
            ValueType::Flat => "flat".to_string(),
        };
        explanations.push(format!(
            "{} ({}, {}): {}{} → {}",
            modifier.name,
            modifier.modifier_type,
            how,
            if amount.is_sign_negative() { "" } else { "+" },
            format_money(amount),
            format_money(running)
        ));
        applied.push(AppliedModifier {
            name: modifier.name.clone(),
            amount,
        });
    }

    Ok(ModifierStack {
        applied,
        explanations,
        total: running,
    })
}

fn modifier_overflow(modifier: &PricingModifier) -> PricingError {
    PricingError::InvalidInput(format!(
        "quote amount is out of range after modifier '{}'",
        modifier.name
    ))
}
