//! Pure statistics over a loaded season: percentile ranks, age projections
//! and the trade reallocation model. Nothing in here does I/O.

pub mod metrics;
pub mod percentile;
pub mod projection;
pub mod season_view;
pub mod trade;
