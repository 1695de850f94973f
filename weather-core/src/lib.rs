//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The parsed WeatherAPI.com response model
//! - The `WeatherApi` capability and its reqwest implementation
//! - `WeatherStore`, the observable Loading/Success/Error state machine
//! - Configuration & credentials handling
//!
//! Rendering is left to the caller: subscribe to a store and match on
//! `Option<WeatherResult>`.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod result;
pub mod store;

pub use api::{ApiResponse, WeatherApi, WeatherApiClient};
pub use config::{ApiConfig, Config, DEFAULT_BASE_URL};
pub use error::{ConfigError, DecodeError, TransportError};
pub use model::{Condition, Current, Location, WeatherModel};
pub use result::{FETCH_FAILED, UNKNOWN_ERROR, WeatherResult};
pub use store::{WeatherStore, resolve};
