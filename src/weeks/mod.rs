pub mod data;
pub mod endpoints;
