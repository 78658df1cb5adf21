pub mod datasets;
pub mod treasure;
