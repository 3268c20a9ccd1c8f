pub mod accounts;
pub mod config;
pub mod error;
pub mod jobs;
pub mod store;
pub mod telemetry;
pub mod web;
