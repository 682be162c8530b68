//! OpenRouteService directions provider.
//!
//! Uses the v2 directions API with GeoJSON output. Requires an API key,
//! sent as a bearer credential.
//!
//! # API Endpoint
//!
//! `POST {base_url}/{profile}/geojson` with body
//! `{"coordinates": [[lon, lat], ...], "profile": "...", "format": "geojson"}`.
//!
//! # Response Shape
//!
//! The first feature carries the route: `geometry.coordinates` is the list of
//! `[lon, lat]` positions, `properties.summary.duration` the total travel time
//! and `properties.segments[].duration` the per-leg breakdown. Either timing
//! field may be missing.

use serde::Deserialize;
use serde_json::json;

use crate::provider::{
    AsyncHttpClient, Directions, DirectionsFuture, DirectionsProvider, DurationSource,
    ProviderError,
};
use crate::route::{Coordinate, TravelProfile};

/// Public OpenRouteService directions endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org/v2/directions";

/// OpenRouteService directions provider.
///
/// # Example
///
/// ```no_run
/// use locomotion::provider::{OpenRouteServiceProvider, ReqwestClient};
///
/// let client = ReqwestClient::new().unwrap();
/// let provider = OpenRouteServiceProvider::new(client, Some("YOUR_API_KEY".to_string()));
/// // Hand the provider to a RouteLoader...
/// ```
pub struct OpenRouteServiceProvider<C: AsyncHttpClient> {
    http_client: C,
    api_key: Option<String>,
    base_url: String,
}

impl<C: AsyncHttpClient> OpenRouteServiceProvider<C> {
    /// Creates a provider against the public endpoint.
    pub fn new(http_client: C, api_key: Option<String>) -> Self {
        Self::with_base_url(http_client, api_key, DEFAULT_BASE_URL)
    }

    /// Creates a provider against a custom endpoint (self-hosted instances).
    pub fn with_base_url(
        http_client: C,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The endpoint requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http_client(&self) -> &C {
        &self.http_client
    }

    /// Builds the request URL for a profile.
    fn build_url(&self, profile: TravelProfile) -> String {
        format!("{}/{}/geojson", self.base_url, profile.provider_id())
    }

    fn build_body(waypoints: &[Coordinate], profile: TravelProfile) -> serde_json::Value {
        let coordinates: Vec<[f64; 2]> = waypoints.iter().map(|c| c.to_lon_lat()).collect();
        json!({
            "coordinates": coordinates,
            "profile": profile.provider_id(),
            "format": "geojson",
        })
    }
}

impl<C: AsyncHttpClient> DirectionsProvider for OpenRouteServiceProvider<C> {
    fn directions<'a>(
        &'a self,
        waypoints: &'a [Coordinate],
        profile: TravelProfile,
    ) -> DirectionsFuture<'a> {
        Box::pin(async move {
            let url = self.build_url(profile);
            let body = Self::build_body(waypoints, profile);

            let bytes = self
                .http_client
                .post_json(&url, self.api_key.as_deref(), &body)
                .await?;

            parse_directions(&bytes)
        })
    }

    fn name(&self) -> &str {
        "OpenRouteService"
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    summary: Option<Summary>,
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    duration: f64,
}

/// Parse a GeoJSON directions response.
pub fn parse_directions(bytes: &[u8]) -> Result<Directions, ProviderError> {
    let collection: FeatureCollection =
        serde_json::from_slice(bytes).map_err(|e| ProviderError::ParseError(e.to_string()))?;

    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyGeometry)?;

    let geometry = feature
        .geometry
        .coordinates
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(Coordinate::new(*lon, *lat)),
            _ => Err(ProviderError::ParseError(format!(
                "position has {} components, expected at least 2",
                position.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if geometry.is_empty() {
        return Err(ProviderError::EmptyGeometry);
    }

    let summary = feature.properties.summary.and_then(|s| s.duration);
    let segments = feature
        .properties
        .segments
        .into_iter()
        .map(|s| s.duration)
        .collect();

    Ok(Directions {
        geometry,
        duration: DurationSource::resolve(summary, segments),
    })
}
