//! Pricing resolver.
//!
//! Loads the tier/modifier configuration for the requested service type from
//! a [`PricingRepository`] and runs the pure calculation in [`quote`].
//! Calculations are side-effect free: nothing is persisted or logged here.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::calculators::{
    apply_minimum, apply_modifiers, compute_base_rate, format_money, select_tier, AppliedModifier,
    QuoteContext,
};
use super::eligibility::{eligible_modifiers, ModifierEligibility, StandardEligibility};
use super::models::{PricingConfig, PricingTier, ServiceType};
use super::repository::PricingRepository;
use super::requests::CalculatePriceRequest;

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    /// Missing or out-of-range request field. Client-correctable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No active tier matches the request. A configuration gap, not a fault.
    #[error("No active pricing tier for {service_type} ({context})")]
    NoTierFound {
        service_type: ServiceType,
        context: String,
    },

    /// The selected tier cannot price the request (e.g. missing rate).
    #[error("Pricing tier {tier_id} is misconfigured: {message}")]
    TierMisconfigured { tier_id: i64, message: String },

    /// The tier/modifier store could not be read.
    #[error("Pricing configuration unavailable: {0}")]
    ConfigurationUnavailable(String),
}

impl PricingError {
    pub fn misconfigured(tier: &PricingTier, message: &str) -> Self {
        PricingError::TierMisconfigured {
            tier_id: tier.id,
            message: message.to_string(),
        }
    }

    /// Stable machine-readable error category for API responses.
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::InvalidInput(_) => "invalid_input",
            PricingError::NoTierFound { .. } => "no_tier_found",
            PricingError::TierMisconfigured { .. } => "tier_misconfigured",
            PricingError::ConfigurationUnavailable(_) => "configuration_unavailable",
        }
    }
}

/// Result of a price calculation
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub tier_used: PricingTier,
    pub base_rate: Decimal,
    pub modifiers: Vec<AppliedModifier>,
    pub final_price: Decimal,
    pub minimum_charge_applied: bool,
    pub breakdown: Vec<String>,
}

/// Compute a quote from an already loaded configuration.
///
/// # Arguments
/// * `config` - Tiers and modifiers for the request's service type
/// * `ctx` - Validated request
/// * `apply_modifiers_flag` - When false the quote is the raw tier rate (floored at the minimum)
/// * `eligibility` - Rules deciding which modifiers apply
pub fn quote(
    config: &PricingConfig,
    ctx: &QuoteContext,
    apply_modifiers_flag: bool,
    eligibility: &dyn ModifierEligibility,
) -> Result<PriceQuote, PricingError> {
    let tier = select_tier(&config.tiers, ctx).ok_or_else(|| PricingError::NoTierFound {
        service_type: ctx.service_type,
        context: describe_request(ctx),
    })?;

    let mut breakdown = Vec::new();
    breakdown.push(describe_tier(tier));

    let raw = compute_base_rate(tier, ctx)?;
    breakdown.push(raw.explanation);

    let (base_rate, base_floored) = apply_minimum(raw.amount, tier.minimum_charge);
    if base_floored {
        breakdown.push(format!(
            "Minimum charge applied: {} → {}",
            format_money(raw.amount),
            format_money(base_rate)
        ));
    }

    if !apply_modifiers_flag {
        breakdown.push(format!("Final price: {}", format_money(base_rate)));
        return Ok(PriceQuote {
            tier_used: tier.clone(),
            base_rate,
            modifiers: Vec::new(),
            final_price: base_rate,
            minimum_charge_applied: base_floored,
            breakdown,
        });
    }

    let eligible = eligible_modifiers(eligibility, &config.modifiers, ctx);
    let stack = apply_modifiers(base_rate, &eligible)?;
    breakdown.extend(stack.explanations);

    let (final_price, final_floored) = apply_minimum(stack.total, tier.minimum_charge);
    if final_floored {
        breakdown.push(format!(
            "Minimum charge enforced after modifiers: {} → {}",
            format_money(stack.total),
            format_money(final_price)
        ));
    }
    breakdown.push(format!("Final price: {}", format_money(final_price)));

    Ok(PriceQuote {
        tier_used: tier.clone(),
        base_rate,
        modifiers: stack.applied,
        final_price,
        minimum_charge_applied: base_floored || final_floored,
        breakdown,
    })
}

fn describe_tier(tier: &PricingTier) -> String {
    let mut line = format!(
        "Tier: {} ({}, {}, party {}",
        tier.tier_name,
        tier.service_type,
        tier.day_type,
        tier.party_band_label()
    );
    if let Some(route) = tier.transfer_type {
        line.push_str(&format!(", route {}", route.as_str()));
    }
    line.push(')');
    line
}

fn describe_request(ctx: &QuoteContext) -> String {
    let mut parts = vec![format!("{} on {}", ctx.day_bucket(), ctx.date)];
    if let Some(party_size) = ctx.party_size {
        parts.push(format!("party of {}", party_size));
    }
    if let Some(route) = ctx.transfer_type {
        parts.push(format!("route {}", route.as_str()));
    }
    parts.join(", ")
}

/// Resolves price quotes against an injected configuration repository.
pub struct PricingResolver<R> {
    repository: R,
    eligibility: Arc<dyn ModifierEligibility>,
}

impl<R: PricingRepository> PricingResolver<R> {
    /// Resolver with the default [`StandardEligibility`] rules.
    pub fn new(repository: R) -> Self {
        Self::with_eligibility(repository, Arc::new(StandardEligibility))
    }

    pub fn with_eligibility(repository: R, eligibility: Arc<dyn ModifierEligibility>) -> Self {
        Self {
            repository,
            eligibility,
        }
    }

    /// Validate the request, load configuration and price it.
    pub async fn calculate(&self, request: CalculatePriceRequest) -> Result<PriceQuote, PricingError> {
        let apply_modifiers_flag = request.apply_modifiers;
        let ctx = request.into_context()?;
        let config = self.repository.load(ctx.service_type).await?;
        quote(&config, &ctx, apply_modifiers_flag, self.eligibility.as_ref())
    }
}
