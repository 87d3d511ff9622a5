pub mod datetime;
pub mod labels;
pub mod loader;
pub mod observation;
