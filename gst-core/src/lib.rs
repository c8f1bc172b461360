pub mod date_range;
pub mod error;
pub mod location;
pub mod observation;
pub mod series;
