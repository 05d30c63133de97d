//! Skycast application layer.
//!
//! Ties config, the provider client and the stores together behind a
//! session controller, and exposes the dashboard view models a frontend
//! renders from.

pub mod session;
pub mod view;

pub use session::{App, Controller, SessionState};
pub use view::{Dashboard, ForecastCard, Horizon, MapView, PageLayout, WeatherCard};
