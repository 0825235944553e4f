pub mod api;
pub mod app;
pub mod calculator;
pub mod config;
pub mod equations;
pub mod importers;
pub mod services;
pub mod utils;
