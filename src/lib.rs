pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod github;
pub mod languages;
pub mod models;
pub mod streak;
pub mod svg;
pub mod types;
