pub mod calc;
pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod geocode;
pub mod mock;
pub mod models;
pub mod query;
pub mod sync;
