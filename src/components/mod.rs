pub mod career;
pub mod percentile_bars;
pub mod radar;
