//! Pricing domain models.
//!
//! Tiers and modifiers are read from `pricing_tiers` / `pricing_modifiers`.
//! Enum columns are stored as TEXT, so rows are fetched into `*Row` structs
//! and converted into the typed models with `TryFrom`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Bookable service a quote is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    WineTour,
    Transfer,
    WaitTime,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::WineTour,
        ServiceType::Transfer,
        ServiceType::WaitTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::WineTour => "wine_tour",
            ServiceType::Transfer => "transfer",
            ServiceType::WaitTime => "wait_time",
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wine_tour" => Ok(ServiceType::WineTour),
            "transfer" => Ok(ServiceType::Transfer),
            "wait_time" => Ok(ServiceType::WaitTime),
            other => Err(format!("unknown service type '{}'", other)),
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day-of-week bucket a tier applies to.
///
/// `weekday` and `weekend` are accepted as legacy spellings of `sun_wed` and
/// `thu_sat`; only the canonical names are ever written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    #[serde(alias = "weekday")]
    SunWed,
    #[serde(alias = "weekend")]
    ThuSat,
    Any,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::SunWed => "sun_wed",
            DayType::ThuSat => "thu_sat",
            DayType::Any => "any",
        }
    }

    /// Bucket for a calendar date: Sunday–Wednesday or Thursday–Saturday.
    pub fn for_date(date: NaiveDate) -> DayType {
        match date.weekday() {
            Weekday::Sun | Weekday::Mon | Weekday::Tue | Weekday::Wed => DayType::SunWed,
            Weekday::Thu | Weekday::Fri | Weekday::Sat => DayType::ThuSat,
        }
    }

    /// Whether a tier or modifier tagged with `self` applies on `date`.
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        match self {
            DayType::Any => true,
            bucket => *bucket == DayType::for_date(date),
        }
    }
}

impl FromStr for DayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sun_wed" | "weekday" => Ok(DayType::SunWed),
            "thu_sat" | "weekend" => Ok(DayType::ThuSat),
            "any" => Ok(DayType::Any),
            other => Err(format!("unknown day type '{}'", other)),
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a tier turns its rates into a base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    Hourly,
    Flat,
    PerPerson,
    PerMile,
}

impl PricingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::Hourly => "hourly",
            PricingModel::Flat => "flat",
            PricingModel::PerPerson => "per_person",
            PricingModel::PerMile => "per_mile",
        }
    }
}

impl FromStr for PricingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(PricingModel::Hourly),
            "flat" => Ok(PricingModel::Flat),
            "per_person" => Ok(PricingModel::PerPerson),
            "per_mile" => Ok(PricingModel::PerMile),
            other => Err(format!("unknown pricing model '{}'", other)),
        }
    }
}

/// Whether a modifier's value is a percentage of the running total or a flat amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Percentage,
    Flat,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Percentage => "percentage",
            ValueType::Flat => "flat",
        }
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" => Ok(ValueType::Percentage),
            "flat" | "fixed" => Ok(ValueType::Flat),
            other => Err(format!("unknown value type '{}'", other)),
        }
    }
}

/// Named airport/city transfer routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    SeatacToWalla,
    WallaToSeatac,
    PascoToWalla,
    WallaToPasco,
    PdxToWalla,
    WallaToPdx,
    Walla,
}

impl TransferType {
    pub const ALL: [TransferType; 7] = [
        TransferType::SeatacToWalla,
        TransferType::WallaToSeatac,
        TransferType::PascoToWalla,
        TransferType::WallaToPasco,
        TransferType::PdxToWalla,
        TransferType::WallaToPdx,
        TransferType::Walla,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::SeatacToWalla => "seatac_to_walla",
            TransferType::WallaToSeatac => "walla_to_seatac",
            TransferType::PascoToWalla => "pasco_to_walla",
            TransferType::WallaToPasco => "walla_to_pasco",
            TransferType::PdxToWalla => "pdx_to_walla",
            TransferType::WallaToPdx => "walla_to_pdx",
            TransferType::Walla => "walla",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransferType::SeatacToWalla => "SeaTac Airport → Walla Walla",
            TransferType::WallaToSeatac => "Walla Walla → SeaTac Airport",
            TransferType::PascoToWalla => "Pasco Airport → Walla Walla",
            TransferType::WallaToPasco => "Walla Walla → Pasco Airport",
            TransferType::PdxToWalla => "Portland Airport → Walla Walla",
            TransferType::WallaToPdx => "Walla Walla → Portland Airport",
            TransferType::Walla => "Local Walla Walla transfer",
        }
    }
}

impl FromStr for TransferType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        TransferType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown transfer type '{}'", normalized))
    }
}

/// Administrator-defined pricing rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingTier {
    pub id: i64,
    pub service_type: ServiceType,
    pub tier_name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub party_size_min: Option<i32>,
    pub party_size_max: Option<i32>,
    pub day_type: DayType,
    pub transfer_type: Option<TransferType>,
    pub pricing_model: PricingModel,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub base_rate: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub hourly_rate: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub minimum_charge: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingTier {
    /// Width of the party-size band.
    ///
    /// A missing side is measured against `1` or `i32::MAX`, so `7+` ranks
    /// wider than any bounded band but narrower than `3+`. A tier with no
    /// bounds at all is the widest possible band.
    pub fn band_width(&self) -> i64 {
        match (self.party_size_min, self.party_size_max) {
            (None, None) => i64::MAX,
            (min, max) => {
                i64::from(max.unwrap_or(i32::MAX)) - i64::from(min.unwrap_or(1))
            }
        }
    }

    /// Whether `party_size` falls within the tier's (optional) inclusive bounds.
    pub fn accepts_party_size(&self, party_size: i32) -> bool {
        self.party_size_min.map_or(true, |min| party_size >= min)
            && self.party_size_max.map_or(true, |max| party_size <= max)
    }

    /// Short human-readable party band, e.g. `1-6`, `7+`, `any size`.
    pub fn party_band_label(&self) -> String {
        match (self.party_size_min, self.party_size_max) {
            (Some(min), Some(max)) => format!("{}-{}", min, max),
            (Some(min), None) => format!("{}+", min),
            (None, Some(max)) => format!("up to {}", max),
            (None, None) => "any size".to_string(),
        }
    }
}

/// Row shape of `pricing_tiers`.
#[derive(Debug, Clone, FromRow)]
pub struct PricingTierRow {
    pub id: i64,
    pub service_type: String,
    pub tier_name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub party_size_min: Option<i32>,
    pub party_size_max: Option<i32>,
    pub day_type: String,
    pub transfer_type: Option<String>,
    pub pricing_model: String,
    pub base_rate: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub minimum_charge: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PricingTierRow> for PricingTier {
    type Error = String;

    fn try_from(row: PricingTierRow) -> Result<Self, Self::Error> {
        Ok(PricingTier {
            id: row.id,
            service_type: row.service_type.parse()?,
            tier_name: row.tier_name,
            description: row.description,
            notes: row.notes,
            party_size_min: row.party_size_min,
            party_size_max: row.party_size_max,
            day_type: row.day_type.parse()?,
            transfer_type: row.transfer_type.as_deref().map(str::parse).transpose()?,
            pricing_model: row.pricing_model.parse()?,
            base_rate: row.base_rate,
            hourly_rate: row.hourly_rate,
            minimum_charge: row.minimum_charge,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Priority-ordered adjustment stacked on top of a tier's base rate.
///
/// The sign of the adjustment is carried by `value`; `modifier_type` is a
/// display category only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingModifier {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub modifier_type: String,
    pub value_type: ValueType,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub priority: i32,
    pub active: bool,
    pub service_type: Option<ServiceType>,
    pub day_type: Option<DayType>,
    pub min_party_size: Option<i32>,
    pub max_party_size: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingModifier {
    /// Discount-like modifiers reduce the price. Used for display grouping only.
    pub fn is_discount(&self) -> bool {
        self.value.is_sign_negative()
    }
}

/// Row shape of `pricing_modifiers`.
#[derive(Debug, Clone, FromRow)]
pub struct PricingModifierRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub modifier_type: String,
    pub value_type: String,
    pub value: Decimal,
    pub priority: i32,
    pub active: bool,
    pub service_type: Option<String>,
    pub day_type: Option<String>,
    pub min_party_size: Option<i32>,
    pub max_party_size: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PricingModifierRow> for PricingModifier {
    type Error = String;

    fn try_from(row: PricingModifierRow) -> Result<Self, Self::Error> {
        Ok(PricingModifier {
            id: row.id,
            name: row.name,
            description: row.description,
            modifier_type: row.modifier_type,
            value_type: row.value_type.parse()?,
            value: row.value,
            priority: row.priority,
            active: row.active,
            service_type: row.service_type.as_deref().map(str::parse).transpose()?,
            day_type: row.day_type.as_deref().map(str::parse).transpose()?,
            min_party_size: row.min_party_size,
            max_party_size: row.max_party_size,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Tiers and modifiers relevant to one service type, as loaded for a calculation.
#[derive(Debug, Clone, Default)]
pub struct PricingConfig {
    pub tiers: Vec<PricingTier>,
    pub modifiers: Vec<PricingModifier>,
}
