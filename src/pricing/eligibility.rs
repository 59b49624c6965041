//! Modifier eligibility rules.
//!
//! Which active modifiers apply to a request is decided by a
//! [`ModifierEligibility`] predicate so the resolver can be given a different
//! rule set without touching the stacking math.

use super::calculators::QuoteContext;
use super::models::PricingModifier;

/// Decides whether a modifier applies to a request.
pub trait ModifierEligibility: Send + Sync {
    fn is_eligible(&self, modifier: &PricingModifier, ctx: &QuoteContext) -> bool;
}

/// Default rules, driven entirely by the modifier's own metadata.
///
/// Every restriction left unset on the modifier is treated as "no restriction":
/// 1. the modifier is active
/// 2. `service_type`, if set, equals the request's service type
/// 3. `day_type`, if set, matches the request date's bucket
/// 4. `min_party_size` / `max_party_size`, if set, hold for the party size
///    (a party-size restriction never matches a request without a party size)
/// 5. the request date lies within `valid_from..=valid_until`
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEligibility;

impl ModifierEligibility for StandardEligibility {
    fn is_eligible(&self, modifier: &PricingModifier, ctx: &QuoteContext) -> bool {
        if !modifier.active {
            return false;
        }

        if let Some(service_type) = modifier.service_type {
            if service_type != ctx.service_type {
                return false;
            }
        }

        if let Some(day_type) = modifier.day_type {
            if !day_type.matches_date(ctx.date) {
                return false;
            }
        }

        if modifier.min_party_size.is_some() || modifier.max_party_size.is_some() {
            let Some(party_size) = ctx.party_size else {
                return false;
            };
            if modifier.min_party_size.is_some_and(|min| party_size < min) {
                return false;
            }
            if modifier.max_party_size.is_some_and(|max| party_size > max) {
                return false;
            }
        }

        if modifier.valid_from.is_some_and(|from| ctx.date < from) {
            return false;
        }
        if modifier.valid_until.is_some_and(|until| ctx.date > until) {
            return false;
        }

        true
    }
}

/// Filter `modifiers` down to the ones `rules` accepts for `ctx`.
pub fn eligible_modifiers<'a>(
    rules: &dyn ModifierEligibility,
    modifiers: &'a [PricingModifier],
    ctx: &QuoteContext,
) -> Vec<&'a PricingModifier> {
    modifiers
        .iter()
        .filter(|m| rules.is_eligible(m, ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{DayType, ServiceType, TransferType, ValueType};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn modifier() -> PricingModifier {
        PricingModifier {
            id: 1,
            name: "Volume discount".to_string(),
            description: None,
            modifier_type: "volume".to_string(),
            value_type: ValueType::Percentage,
            value: dec!(-5),
            priority: 10,
            active: true,
            service_type: None,
            day_type: None,
            min_party_size: None,
            max_party_size: None,
            valid_from: None,
            valid_until: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ctx(date: NaiveDate, party_size: Option<i32>) -> QuoteContext {
        QuoteContext {
            service_type: ServiceType::WineTour,
            date,
            party_size,
            duration_hours: Some(dec!(6)),
            transfer_type: None,
            wait_hours: None,
        }
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    }

    #[test]
    fn test_unrestricted_active_modifier_is_eligible() {
        assert!(StandardEligibility.is_eligible(&modifier(), &ctx(tuesday(), Some(4))));
    }

    #[test]
    fn test_inactive_modifier_never_eligible() {
        let mut m = modifier();
        m.active = false;
        assert!(!StandardEligibility.is_eligible(&m, &ctx(tuesday(), Some(4))));
    }

    #[test]
    fn test_service_type_gate() {
        let mut m = modifier();
        m.service_type = Some(ServiceType::Transfer);
        assert!(!StandardEligibility.is_eligible(&m, &ctx(tuesday(), Some(4))));

        let transfer = QuoteContext {
            service_type: ServiceType::Transfer,
            date: tuesday(),
            party_size: None,
            duration_hours: None,
            transfer_type: Some(TransferType::Walla),
            wait_hours: None,
        };
        assert!(StandardEligibility.is_eligible(&m, &transfer));
    }

    #[test]
    fn test_day_type_gate() {
        let mut m = modifier();
        m.day_type = Some(DayType::ThuSat);
        assert!(!StandardEligibility.is_eligible(&m, &ctx(tuesday(), Some(4))));
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        assert!(StandardEligibility.is_eligible(&m, &ctx(saturday, Some(4))));
    }

    #[test]
    fn test_party_size_gate() {
        let mut m = modifier();
        m.min_party_size = Some(8);
        assert!(!StandardEligibility.is_eligible(&m, &ctx(tuesday(), Some(4))));
        assert!(StandardEligibility.is_eligible(&m, &ctx(tuesday(), Some(8))));
        assert!(!StandardEligibility.is_eligible(&m, &ctx(tuesday(), None)));

        m.max_party_size = Some(10);
        assert!(!StandardEligibility.is_eligible(&m, &ctx(tuesday(), Some(11))));
    }

    #[test]
    fn test_date_window_inclusive() {
        let mut m = modifier();
        m.valid_from = Some(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        m.valid_until = Some(NaiveDate::from_ymd_opt(2026, 10, 31).unwrap());
        assert!(StandardEligibility.is_eligible(&m, &ctx(tuesday(), Some(4))));
        let last_day = NaiveDate::from_ymd_opt(2026, 10, 31).unwrap();
        assert!(StandardEligibility.is_eligible(&m, &ctx(last_day, Some(4))));
        let before = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(!StandardEligibility.is_eligible(&m, &ctx(before, Some(4))));
        let after = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        assert!(!StandardEligibility.is_eligible(&m, &ctx(after, Some(4))));
    }

    #[test]
    fn test_eligible_modifiers_filters() {
        let mut inactive = modifier();
        inactive.id = 2;
        inactive.active = false;
        let modifiers = vec![modifier(), inactive];
        let eligible = eligible_modifiers(&StandardEligibility, &modifiers, &ctx(tuesday(), Some(4)));
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, 1);
    }
}
