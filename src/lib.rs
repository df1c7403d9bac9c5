//! Fuel-efficiency dashboard core: remote prediction workflow with a local
//! simulation fallback, plus the CLI and embedded web dashboard around it.

pub mod analytics;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod form;
pub mod health;
pub mod i18n;
pub mod model;
pub mod prediction;
pub mod service;
pub mod session;
pub mod view;
pub mod web;
