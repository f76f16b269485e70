pub mod error;
pub mod formatting;
pub mod tiers;
pub mod types;

pub mod analysis;
pub mod arv;
pub mod offers;
pub mod profitability;
pub mod repairs;
pub mod roi;

#[cfg(feature = "tax_delinquent")]
pub mod tax_delinquent;

pub use analysis::{analyze_deal, DealAnalysis, DealInputs};
pub use error::DealError;
pub use types::*;

/// Standard result type for all deal-analysis operations
pub type DealResult<T> = Result<T, DealError>;
