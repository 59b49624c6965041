//! Database queries for pricing engine.
//!
//! Enum columns are TEXT; rows are fetched into `*Row` structs and converted
//! with `TryFrom`, so a bad value in the table surfaces as `AppError::InvalidData`.

use sqlx::PgPool;

use crate::error::AppError;

use super::models::{
    PricingConfig, PricingModifier, PricingModifierRow, PricingTier, PricingTierRow, ServiceType,
};
use super::requests::{ModifierInput, TierInput};

const TIER_COLUMNS: &str = r#"
    id, service_type, tier_name, description, notes,
    party_size_min, party_size_max, day_type, transfer_type,
    pricing_model, base_rate, hourly_rate, minimum_charge,
    active, created_at, updated_at
"#;

const MODIFIER_COLUMNS: &str = r#"
    id, name, description, modifier_type, value_type, value,
    priority, active, service_type, day_type,
    min_party_size, max_party_size, valid_from, valid_until,
    created_at, updated_at
"#;

fn into_tier(row: PricingTierRow) -> Result<PricingTier, AppError> {
    let id = row.id;
    PricingTier::try_from(row)
        .map_err(|e| AppError::InvalidData(format!("pricing_tiers.id={}: {}", id, e)))
}

fn into_modifier(row: PricingModifierRow) -> Result<PricingModifier, AppError> {
    let id = row.id;
    PricingModifier::try_from(row)
        .map_err(|e| AppError::InvalidData(format!("pricing_modifiers.id={}: {}", id, e)))
}

/// List tiers, optionally scoped to a service type
pub async fn list_tiers(
    pool: &PgPool,
    service_type: Option<ServiceType>,
    include_inactive: bool,
) -> Result<Vec<PricingTier>, AppError> {
    let sql = format!(
        r#"
        SELECT {}
        FROM pricing_tiers
        WHERE ($1::text IS NULL OR service_type = $1)
          AND ($2 OR active = true)
        ORDER BY service_type, party_size_min NULLS FIRST, id
        "#,
        TIER_COLUMNS
    );
    let rows = sqlx::query_as::<_, PricingTierRow>(&sql)
        .bind(service_type.map(|s| s.as_str()))
        .bind(include_inactive)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(into_tier).collect()
}

/// List modifiers in stacking order
pub async fn list_modifiers(
    pool: &PgPool,
    include_inactive: bool,
) -> Result<Vec<PricingModifier>, AppError> {
    let sql = format!(
        r#"
        SELECT {}
        FROM pricing_modifiers
        WHERE ($1 OR active = true)
        ORDER BY priority, id
        "#,
        MODIFIER_COLUMNS
    );
    let rows = sqlx::query_as::<_, PricingModifierRow>(&sql)
        .bind(include_inactive)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(into_modifier).collect()
}

/// Active modifiers that are unrestricted or restricted to `service_type`
pub async fn list_active_modifiers_for(
    pool: &PgPool,
    service_type: ServiceType,
) -> Result<Vec<PricingModifier>, AppError> {
    let sql = format!(
        r#"
        SELECT {}
        FROM pricing_modifiers
        WHERE active = true
          AND (service_type IS NULL OR service_type = $1)
        ORDER BY priority, id
        "#,
        MODIFIER_COLUMNS
    );
    let rows = sqlx::query_as::<_, PricingModifierRow>(&sql)
        .bind(service_type.as_str())
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(into_modifier).collect()
}

/// Load everything a calculation for `service_type` needs
pub async fn load_pricing_config(
    pool: &PgPool,
    service_type: ServiceType,
) -> Result<PricingConfig, AppError> {
    let tiers = list_tiers(pool, Some(service_type), false).await?;
    let modifiers = list_active_modifiers_for(pool, service_type).await?;
    Ok(PricingConfig { tiers, modifiers })
}

/// Get a tier by id
pub async fn get_tier(pool: &PgPool, id: i64) -> Result<Option<PricingTier>, AppError> {
    let sql = format!("SELECT {} FROM pricing_tiers WHERE id = $1", TIER_COLUMNS);
    let row = sqlx::query_as::<_, PricingTierRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(into_tier).transpose()
}

/// Insert a tier
pub async fn insert_tier(pool: &PgPool, input: &TierInput) -> Result<PricingTier, AppError> {
    let sql = format!(
        r#"
        INSERT INTO pricing_tiers (
            service_type, tier_name, description, notes,
            party_size_min, party_size_max, day_type, transfer_type,
            pricing_model, base_rate, hourly_rate, minimum_charge, active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {}
        "#,
        TIER_COLUMNS
    );
    let row = sqlx::query_as::<_, PricingTierRow>(&sql)
        .bind(input.service_type.as_str())
        .bind(input.tier_name.trim())
        .bind(&input.description)
        .bind(&input.notes)
        .bind(input.party_size_min)
        .bind(input.party_size_max)
        .bind(input.day_type.as_str())
        .bind(input.transfer_type.map(|t| t.as_str()))
        .bind(input.pricing_model.as_str())
        .bind(input.base_rate)
        .bind(input.hourly_rate)
        .bind(input.minimum_charge)
        .bind(input.active)
        .fetch_one(pool)
        .await?;

    into_tier(row)
}

/// Replace a tier. Returns `None` if the id does not exist.
pub async fn update_tier(
    pool: &PgPool,
    id: i64,
    input: &TierInput,
) -> Result<Option<PricingTier>, AppError> {
    let sql = format!(
        r#"
        UPDATE pricing_tiers
        SET service_type = $2, tier_name = $3, description = $4, notes = $5,
            party_size_min = $6, party_size_max = $7, day_type = $8, transfer_type = $9,
            pricing_model = $10, base_rate = $11, hourly_rate = $12, minimum_charge = $13,
            active = $14, updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        TIER_COLUMNS
    );
    let row = sqlx::query_as::<_, PricingTierRow>(&sql)
        .bind(id)
        .bind(input.service_type.as_str())
        .bind(input.tier_name.trim())
        .bind(&input.description)
        .bind(&input.notes)
        .bind(input.party_size_min)
        .bind(input.party_size_max)
        .bind(input.day_type.as_str())
        .bind(input.transfer_type.map(|t| t.as_str()))
        .bind(input.pricing_model.as_str())
        .bind(input.base_rate)
        .bind(input.hourly_rate)
        .bind(input.minimum_charge)
        .bind(input.active)
        .fetch_optional(pool)
        .await?;

    row.map(into_tier).transpose()
}

/// Deactivate a tier. Rows are never deleted.
pub async fn deactivate_tier(pool: &PgPool, id: i64) -> Result<Option<PricingTier>, AppError> {
    let sql = format!(
        "UPDATE pricing_tiers SET active = false, updated_at = NOW() WHERE id = $1 RETURNING {}",
        TIER_COLUMNS
    );
    let row = sqlx::query_as::<_, PricingTierRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(into_tier).transpose()
}

/// Insert a modifier
pub async fn insert_modifier(
    pool: &PgPool,
    input: &ModifierInput,
) -> Result<PricingModifier, AppError> {
    let sql = format!(
        r#"
        INSERT INTO pricing_modifiers (
            name, description, modifier_type, value_type, value,
            priority, active, service_type, day_type,
            min_party_size, max_party_size, valid_from, valid_until
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {}
        "#,
        MODIFIER_COLUMNS
    );
    let row = sqlx::query_as::<_, PricingModifierRow>(&sql)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.modifier_type.trim())
        .bind(input.value_type.as_str())
        .bind(input.value)
        .bind(input.priority)
        .bind(input.active)
        .bind(input.service_type.map(|s| s.as_str()))
        .bind(input.day_type.map(|d| d.as_str()))
        .bind(input.min_party_size)
        .bind(input.max_party_size)
        .bind(input.valid_from)
        .bind(input.valid_until)
        .fetch_one(pool)
        .await?;

    into_modifier(row)
}

/// Replace a modifier. Returns `None` if the id does not exist.
pub async fn update_modifier(
    pool: &PgPool,
    id: i64,
    input: &ModifierInput,
) -> Result<Option<PricingModifier>, AppError> {
    let sql = format!(
        r#"
        UPDATE pricing_modifiers
        SET name = $2, description = $3, modifier_type = $4, value_type = $5, value = $6,
            priority = $7, active = $8, service_type = $9, day_type = $10,
            min_party_size = $11, max_party_size = $12, valid_from = $13, valid_until = $14,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        MODIFIER_COLUMNS
    );
    let row = sqlx::query_as::<_, PricingModifierRow>(&sql)
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.modifier_type.trim())
        .bind(input.value_type.as_str())
        .bind(input.value)
        .bind(input.priority)
        .bind(input.active)
        .bind(input.service_type.map(|s| s.as_str()))
        .bind(input.day_type.map(|d| d.as_str()))
        .bind(input.min_party_size)
        .bind(input.max_party_size)
        .bind(input.valid_from)
        .bind(input.valid_until)
        .fetch_optional(pool)
        .await?;

    row.map(into_modifier).transpose()
}

/// Deactivate a modifier. Rows are never deleted.
pub async fn deactivate_modifier(
    pool: &PgPool,
    id: i64,
) -> Result<Option<PricingModifier>, AppError> {
    let sql = format!(
        "UPDATE pricing_modifiers SET active = false, updated_at = NOW() WHERE id = $1 RETURNING {}",
        MODIFIER_COLUMNS
    );
    let row = sqlx::query_as::<_, PricingModifierRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(into_modifier).transpose()
}
