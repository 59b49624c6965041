//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::AppliedModifier;
use super::models::{PricingModifier, PricingTier, TransferType};
use super::services::PriceQuote;

/// Successful quote (`POST /api/pricing/calculate`)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuoteResponse {
    pub success: bool,
    pub tier_used: PricingTier,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_rate: Decimal,
    pub modifiers: Vec<AppliedModifier>,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub minimum_charge_applied: bool,
    pub breakdown: Vec<String>,
}

impl From<PriceQuote> for PriceQuoteResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            success: true,
            tier_used: quote.tier_used,
            base_rate: quote.base_rate,
            modifiers: quote.modifiers,
            final_price: quote.final_price,
            minimum_charge_applied: quote.minimum_charge_applied,
            breakdown: quote.breakdown,
        }
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Entry of `GET /api/pricing/transfer-types`
#[derive(Debug, Serialize)]
pub struct TransferTypeResponse {
    pub value: &'static str,
    pub label: &'static str,
}

impl From<TransferType> for TransferTypeResponse {
    fn from(transfer_type: TransferType) -> Self {
        Self {
            value: transfer_type.as_str(),
            label: transfer_type.label(),
        }
    }
}

/// Tier list for the admin UI
#[derive(Debug, Serialize)]
pub struct TierListResponse {
    pub success: bool,
    pub tiers: Vec<PricingTier>,
}

/// Single tier after create/update/deactivate
#[derive(Debug, Serialize)]
pub struct TierResponse {
    pub success: bool,
    pub tier: PricingTier,
}

/// Modifier list for the admin UI, split by effect for display
#[derive(Debug, Serialize)]
pub struct ModifierListResponse {
    pub success: bool,
    pub modifiers: Vec<PricingModifier>,
    pub discount_count: usize,
    pub surcharge_count: usize,
}

impl ModifierListResponse {
    pub fn new(modifiers: Vec<PricingModifier>) -> Self {
        let discount_count = modifiers.iter().filter(|m| m.is_discount()).count();
        Self {
            success: true,
            surcharge_count: modifiers.len() - discount_count,
            discount_count,
            modifiers,
        }
    }
}

/// Single modifier after create/update/deactivate
#[derive(Debug, Serialize)]
pub struct ModifierResponse {
    pub success: bool,
    pub modifier: PricingModifier,
}
