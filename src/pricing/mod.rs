//! Pricing engine module.
//!
//! Resolves quotes for wine tours, transfers and wait time from
//! administrator-defined tiers and modifiers, and exposes the admin
//! endpoints that maintain them.

pub mod calculators;
pub mod eligibility;
pub mod models;
pub mod queries;
pub mod repository;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::round_money;
pub use eligibility::{ModifierEligibility, StandardEligibility};
pub use repository::{PgPricingRepository, PricingRepository, StaticPricingRepository};
pub use routes::router;
pub use services::{PriceQuote, PricingError, PricingResolver};
