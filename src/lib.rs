//! Coconut-estate labor and inventory management client.
//!
//! The REST client lives in [`client`]; the directory engine, form rules and
//! report aggregation work purely on fetched copies of backend records.
//! [`backend`] is an in-memory implementation of the same REST contract used
//! for local runs and tests.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod backend;
pub mod client;
pub mod config;
pub mod directory;
pub mod errors;
pub mod forms;
pub mod models;
pub mod qr;
pub mod reports;
pub mod services;
pub mod theme;
pub mod validation;

pub use client::{ApiClient, LaborApi};
pub use errors::ServiceError;
