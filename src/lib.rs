//! Naebak News - news content delivery service
//!
//! This library provides the core functionality for the Naebak
//! platform's news microservice: news items with categories, tags,
//! comments and daily engagement stats behind a cached, rate-limited
//! HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod seed;
pub mod services;
