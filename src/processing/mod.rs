pub mod aggregate;
pub mod histogram;
pub mod statistics;
