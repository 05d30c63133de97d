//! Weather provider client for Skycast
//!
//! Resolves requests to a direct provider URL, a URL template, or a
//! key-hiding proxy; fetches current conditions, air quality and three
//! forecast horizons; and aggregates raw forecast samples into hourly,
//! daily and weekly view models.

pub mod aggregate;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod types;

pub use aggregate::{daily_summaries, hourly_view, weekly_summaries, DaySummary};
pub use client::WeatherClient;
pub use endpoint::{resolve, RequestParams, RequestPlan, Resource};
pub use error::WeatherError;
pub use types::*;
