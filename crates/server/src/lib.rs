pub mod config;

pub mod error_convert;

pub mod telemetry;

pub mod health;

pub mod openapi;

pub mod rest;

pub mod state;

pub mod auth;

// Case data store gateways and the bulk-action pipeline
pub mod ccd;

pub mod bulk;

pub mod updater;

pub mod retired_fields;

pub mod tasks;

pub mod app;
