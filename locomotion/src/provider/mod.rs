//! Directions provider abstraction
//!
//! This module provides traits and implementations for requesting routes
//! from a remote routing service. The service is treated as opaque: no
//! attempt is made to validate or correct the geometry it returns.
//!
//! ```ignore
//! use locomotion::provider::{OpenRouteServiceProvider, DirectionsProvider, ReqwestClient};
//!
//! let http_client = ReqwestClient::new()?;
//! let provider = OpenRouteServiceProvider::new(http_client, Some(api_key));
//! let directions = provider.directions(&waypoints, TravelProfile::Driving).await?;
//! let route = directions.into_route(Utc::now(), 3.0)?;
//! ```

mod http;
mod openroute;
mod types;

pub use http::{AsyncHttpClient, HttpFuture, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use openroute::{parse_directions, OpenRouteServiceProvider, DEFAULT_BASE_URL};
pub use types::{
    Directions, DirectionsFuture, DirectionsProvider, DurationSource, ProviderError,
    MAX_ROUTE_SECONDS,
};

#[cfg(test)]
pub use http::tests::{MockHttpClient, RecordedRequest};
