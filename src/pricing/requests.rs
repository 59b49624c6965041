//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use super::calculators::QuoteContext;
use super::models::{DayType, PricingModel, ServiceType, TransferType, ValueType};
use super::services::PricingError;

/// Request to price a service (`POST /api/pricing/calculate`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePriceRequest {
    pub service_type: ServiceType,
    #[serde(default)]
    pub party_size: Option<i32>,
    #[serde(default)]
    pub duration_hours: Option<Decimal>,
    #[serde(default)]
    pub transfer_type: Option<TransferType>,
    #[serde(default)]
    pub hours: Option<Decimal>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default = "default_apply_modifiers")]
    pub apply_modifiers: bool,
}

fn default_apply_modifiers() -> bool {
    true
}

/// Longest tour or wait a single quote may bill.
pub const MAX_BILLABLE_HOURS: Decimal = dec!(24);

/// Upper bound (exclusive) of a `NUMERIC(10, 2)` money column.
pub const MAX_STORED_AMOUNT: Decimal = dec!(100000000);

impl CalculatePriceRequest {
    /// Validate the request and turn it into a [`QuoteContext`].
    ///
    /// Fields that do not belong to the requested service type are dropped.
    pub fn into_context(self) -> Result<QuoteContext, PricingError> {
        let date = parse_date(self.date.as_deref())?;

        if let Some(party_size) = self.party_size {
            if party_size < 1 {
                return Err(invalid("partySize must be at least 1"));
            }
        }

        match self.service_type {
            ServiceType::WineTour => {
                let party_size = self
                    .party_size
                    .ok_or_else(|| invalid("partySize is required for wine_tour"))?;
                let duration = self
                    .duration_hours
                    .ok_or_else(|| invalid("durationHours is required for wine_tour"))?;
                if duration < Decimal::ONE {
                    return Err(invalid("durationHours must be at least 1"));
                }
                if duration > MAX_BILLABLE_HOURS {
                    return Err(invalid("durationHours must not exceed 24"));
                }
                let half_hours = duration
                    .checked_mul(dec!(2))
                    .ok_or_else(|| invalid("durationHours is out of range"))?;
                if !half_hours.fract().is_zero() {
                    return Err(invalid("durationHours must be in 0.5 hour increments"));
                }
                Ok(QuoteContext {
                    service_type: ServiceType::WineTour,
                    date,
                    party_size: Some(party_size),
                    duration_hours: Some(duration),
                    transfer_type: None,
                    wait_hours: None,
                })
            }
            ServiceType::Transfer => {
                let transfer_type = self
                    .transfer_type
                    .ok_or_else(|| invalid("transferType is required for transfer"))?;
                Ok(QuoteContext {
                    service_type: ServiceType::Transfer,
                    date,
                    party_size: self.party_size,
                    duration_hours: None,
                    transfer_type: Some(transfer_type),
                    wait_hours: None,
                })
            }
            ServiceType::WaitTime => {
                let party_size = self
                    .party_size
                    .ok_or_else(|| invalid("partySize is required for wait_time"))?;
                let hours = self
                    .hours
                    .ok_or_else(|| invalid("hours is required for wait_time"))?;
                if hours < dec!(0.5) {
                    return Err(invalid("hours must be at least 0.5"));
                }
                if hours > MAX_BILLABLE_HOURS {
                    return Err(invalid("hours must not exceed 24"));
                }
                Ok(QuoteContext {
                    service_type: ServiceType::WaitTime,
                    date,
                    party_size: Some(party_size),
                    duration_hours: None,
                    transfer_type: None,
                    wait_hours: Some(hours),
                })
            }
        }
    }
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate, PricingError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid("date is required"))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| PricingError::InvalidInput(format!("date '{}' is not a YYYY-MM-DD date", raw)))
}

fn invalid(message: &str) -> PricingError {
    PricingError::InvalidInput(message.to_string())
}

/// Query for `GET /api/admin/pricing/tiers`
#[derive(Debug, Default, Deserialize)]
pub struct TierListQuery {
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query for `GET /api/admin/pricing/modifiers`
#[derive(Debug, Default, Deserialize)]
pub struct ModifierListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Create or replace a pricing tier
#[derive(Debug, Clone, Deserialize)]
pub struct TierInput {
    pub service_type: ServiceType,
    pub tier_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub party_size_min: Option<i32>,
    #[serde(default)]
    pub party_size_max: Option<i32>,
    #[serde(default = "default_day_type")]
    pub day_type: DayType,
    #[serde(default)]
    pub transfer_type: Option<TransferType>,
    pub pricing_model: PricingModel,
    #[serde(default)]
    pub base_rate: Option<Decimal>,
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    #[serde(default)]
    pub minimum_charge: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_day_type() -> DayType {
    DayType::Any
}

fn default_active() -> bool {
    true
}

impl TierInput {
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.tier_name.trim().is_empty() {
            return Err(invalid("tier_name must not be empty"));
        }
        validate_party_band(self.party_size_min, self.party_size_max, "party_size")?;
        if self.transfer_type.is_some() && self.service_type != ServiceType::Transfer {
            return Err(invalid("transfer_type is only valid on transfer tiers"));
        }
        let amounts = [
            ("minimum_charge", Some(self.minimum_charge)),
            ("base_rate", self.base_rate),
            ("hourly_rate", self.hourly_rate),
        ];
        for (field, amount) in amounts {
            if let Some(amount) = amount {
                if amount.is_sign_negative() {
                    return Err(PricingError::InvalidInput(format!("{} must not be negative", field)));
                }
                check_stored_amount(field, amount)?;
            }
        }
        match self.pricing_model {
            PricingModel::Hourly => {
                if self.service_type == ServiceType::Transfer {
                    return Err(invalid("transfer tiers cannot use hourly pricing"));
                }
                if self.hourly_rate.is_none() {
                    return Err(invalid("hourly_rate is required for hourly pricing"));
                }
            }
            PricingModel::Flat | PricingModel::PerPerson | PricingModel::PerMile => {
                if self.base_rate.is_none() {
                    return Err(PricingError::InvalidInput(format!(
                        "base_rate is required for {} pricing",
                        self.pricing_model.as_str()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Create or replace a pricing modifier
#[derive(Debug, Clone, Deserialize)]
pub struct ModifierInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub modifier_type: String,
    pub value_type: ValueType,
    pub value: Decimal,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub day_type: Option<DayType>,
    #[serde(default)]
    pub min_party_size: Option<i32>,
    #[serde(default)]
    pub max_party_size: Option<i32>,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

impl ModifierInput {
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.modifier_type.trim().is_empty() {
            return Err(invalid("modifier_type must not be empty"));
        }
        if self.value_type == ValueType::Percentage
            && (self.value < dec!(-100) || self.value > dec!(100))
        {
            return Err(invalid("percentage value must be between -100 and 100"));
        }
        check_stored_amount("value", self.value)?;
        validate_party_band(self.min_party_size, self.max_party_size, "party_size")?;
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until) {
            if from > until {
                return Err(invalid("valid_from must not be after valid_until"));
            }
        }
        Ok(())
    }
}

fn check_stored_amount(field: &str, amount: Decimal) -> Result<(), PricingError> {
    if amount.abs() >= MAX_STORED_AMOUNT {
        return Err(PricingError::InvalidInput(format!(
            "{} must be less than {}",
            field, MAX_STORED_AMOUNT
        )));
    }
    Ok(())
}

fn validate_party_band(min: Option<i32>, max: Option<i32>, field: &str) -> Result<(), PricingError> {
    for bound in [min, max].into_iter().flatten() {
        if bound < 1 {
            return Err(PricingError::InvalidInput(format!("{} bounds must be at least 1", field)));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(PricingError::InvalidInput(format!(
                "{} minimum ({}) must not exceed maximum ({})",
                field, min, max
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> CalculatePriceRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_wine_tour_request_to_context() {
        let req = parse(json!({
            "serviceType": "wine_tour",
            "partySize": 4,
            "durationHours": 6.5,
            "date": "2026-10-20",
            "applyModifiers": false
        }));
        assert!(!req.apply_modifiers);
        let ctx = req.into_context().unwrap();
        assert_eq!(ctx.party_size, Some(4));
        assert_eq!(ctx.duration_hours, Some(dec!(6.5)));
        assert_eq!(ctx.date, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
    }

    #[test]
    fn test_apply_modifiers_defaults_true() {
        let req = parse(json!({"serviceType": "transfer", "transferType": "walla", "date": "2026-10-20"}));
        assert!(req.apply_modifiers);
        let ctx = req.into_context().unwrap();
        assert_eq!(ctx.party_size, None);
        assert_eq!(ctx.transfer_type, Some(TransferType::Walla));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let cases = [
            json!({"serviceType": "wine_tour", "durationHours": 6, "date": "2026-10-20"}),
            json!({"serviceType": "wine_tour", "partySize": 4, "date": "2026-10-20"}),
            json!({"serviceType": "wine_tour", "partySize": 4, "durationHours": 6}),
            json!({"serviceType": "transfer", "partySize": 2, "date": "2026-10-20"}),
            json!({"serviceType": "wait_time", "partySize": 2, "date": "2026-10-20"}),
        ];
        for case in cases {
            let result = parse(case.clone()).into_context();
            assert!(matches!(result, Err(PricingError::InvalidInput(_))), "{}", case);
        }
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let cases = [
            json!({"serviceType": "wine_tour", "partySize": 0, "durationHours": 6, "date": "2026-10-20"}),
            json!({"serviceType": "wine_tour", "partySize": 4, "durationHours": 0.5, "date": "2026-10-20"}),
            json!({"serviceType": "wine_tour", "partySize": 4, "durationHours": 4.25, "date": "2026-10-20"}),
            json!({"serviceType": "wait_time", "partySize": 2, "hours": 0.25, "date": "2026-10-20"}),
            json!({"serviceType": "transfer", "transferType": "walla", "partySize": -1, "date": "2026-10-20"}),
            json!({"serviceType": "transfer", "transferType": "walla", "date": "10/20/2026"}),
        ];
        for case in cases {
            let result = parse(case.clone()).into_context();
            assert!(matches!(result, Err(PricingError::InvalidInput(_))), "{}", case);
        }
    }

    #[test]
    fn test_oversized_hours_rejected() {
        let cases = [
            json!({"serviceType": "wine_tour", "partySize": 4, "durationHours": 24.5, "date": "2026-10-20"}),
            json!({"serviceType": "wine_tour", "partySize": 4, "durationHours": 5e28, "date": "2026-10-20"}),
            json!({"serviceType": "wait_time", "partySize": 2, "hours": 1e28, "date": "2026-10-20"}),
        ];
        for case in cases {
            let result = parse(case.clone()).into_context();
            assert!(matches!(result, Err(PricingError::InvalidInput(_))), "{}", case);
        }

        let longest = parse(json!({
            "serviceType": "wine_tour",
            "partySize": 4,
            "durationHours": 24,
            "date": "2026-10-20"
        }));
        assert_eq!(longest.into_context().unwrap().duration_hours, Some(dec!(24)));
    }

    #[test]
    fn test_unknown_service_type_fails_to_deserialize() {
        let result: Result<CalculatePriceRequest, _> =
            serde_json::from_value(json!({"serviceType": "helicopter", "date": "2026-10-20"}));
        assert!(result.is_err());
    }

    fn tier_input() -> TierInput {
        serde_json::from_value(json!({
            "service_type": "wine_tour",
            "tier_name": "Small group",
            "party_size_min": 1,
            "party_size_max": 6,
            "day_type": "weekday",
            "pricing_model": "hourly",
            "hourly_rate": 100,
            "minimum_charge": 400
        }))
        .unwrap()
    }

    #[test]
    fn test_tier_input_valid_and_legacy_day_type() {
        let input = tier_input();
        assert_eq!(input.day_type, DayType::SunWed);
        assert!(input.active);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_tier_input_rejects_inverted_band() {
        let mut input = tier_input();
        input.party_size_min = Some(8);
        input.party_size_max = Some(4);
        assert!(matches!(input.validate(), Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn test_tier_input_requires_authoritative_rate() {
        let mut input = tier_input();
        input.hourly_rate = None;
        input.base_rate = Some(dec!(100));
        assert!(input.validate().is_err());

        input.pricing_model = PricingModel::Flat;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_tier_input_transfer_type_only_on_transfers() {
        let mut input = tier_input();
        input.transfer_type = Some(TransferType::Walla);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_modifier_input_validation() {
        let mut input: ModifierInput = serde_json::from_value(json!({
            "name": "Early bird",
            "modifier_type": "early_bird",
            "value_type": "percentage",
            "value": -10,
            "priority": 1,
            "valid_from": "2026-01-01",
            "valid_until": "2026-03-31"
        }))
        .unwrap();
        assert!(input.validate().is_ok());

        input.value = dec!(-150);
        assert!(input.validate().is_err());

        input.value = dec!(-10);
        input.valid_from = NaiveDate::from_ymd_opt(2026, 4, 1);
        assert!(input.validate().is_err());

        input.valid_from = None;
        input.value_type = ValueType::Flat;
        input.value = dec!(1000000000);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_tier_input_rejects_amounts_beyond_column_range() {
        let mut input = tier_input();
        input.hourly_rate = Some(dec!(1000000000));
        assert!(matches!(input.validate(), Err(PricingError::InvalidInput(_))));

        input.hourly_rate = Some(dec!(99999999.99));
        assert!(input.validate().is_ok());

        input.minimum_charge = dec!(100000000);
        assert!(input.validate().is_err());
    }
}
