pub mod classifier;
pub mod config;
pub mod events;
pub mod logging;
pub mod rubric;
pub mod web;
