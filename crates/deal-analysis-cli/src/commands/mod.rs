pub mod analysis;
pub mod arv;
pub mod format;
pub mod offers;
pub mod profitability;
pub mod repairs;
pub mod roi;
pub mod tax_delinquent;
