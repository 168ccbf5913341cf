//! Core data models for the league ledger.

mod ids;
mod league;
mod matchup;
mod owner;
mod record;
mod season;
mod standings;
mod stats;

pub use ids::*;
pub use league::*;
pub use matchup::*;
pub use owner::*;
pub use record::*;
pub use season::*;
pub use standings::*;
pub use stats::*;
