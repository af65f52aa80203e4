pub mod aggregator;
pub mod filters;
