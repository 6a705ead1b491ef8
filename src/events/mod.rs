pub mod calendar;
pub mod model;
pub mod stats;
pub mod store;
