// src/lib.rs

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod group_service;
pub mod middleware;
pub mod models;
pub mod oracles;
pub mod raddb;
pub mod store;
pub mod syncable_service;
pub mod web;

pub use app::App;
pub use config::AppConfig;
