pub mod api;
pub mod collector;
pub mod dto;
