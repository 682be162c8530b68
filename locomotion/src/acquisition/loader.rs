//! Route loader: provider first, synthetic fallback second.

use chrono::Utc;
use futures::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use super::fallback::{self, FallbackConfig};
use crate::provider::{DirectionsProvider, ProviderError};
use crate::route::{Coordinate, Route, TravelProfile};

/// Errors surfaced by multi-point acquisition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcquisitionError {
    /// A multi-point route needs at least a start and an end.
    #[error("multi-point route needs at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),

    /// The provider could not produce a route.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Acquires routes from a [`DirectionsProvider`].
///
/// Direct routes never fail: any provider error is logged and replaced by
/// a synthetic straight-line route. Multi-point routes report failures to
/// the caller, who may call [`RouteLoader::fallback_multi_point_route`]
/// explicitly.
pub struct RouteLoader<P: DirectionsProvider> {
    provider: P,
    config: FallbackConfig,
}

impl<P: DirectionsProvider> RouteLoader<P> {
    /// Create a loader with default fallback shapes.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, FallbackConfig::default())
    }

    /// Create a loader with custom fallback shapes.
    pub fn with_config(provider: P, config: FallbackConfig) -> Self {
        Self { provider, config }
    }

    /// The fallback configuration in use.
    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Load a route from `start` to `end`.
    pub async fn load_direct_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        profile: TravelProfile,
    ) -> Route {
        let issued_at = Utc::now();
        let waypoints = [start, end];

        let result = self
            .provider
            .directions(&waypoints, profile)
            .await
            .and_then(|directions| directions.into_route(issued_at, self.config.spacing_secs()));

        match result {
            Ok(route) => {
                info!(
                    provider = self.provider.name(),
                    %profile,
                    points = route.len(),
                    "Loaded direct route"
                );
                route
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Direct route request failed, using synthetic route"
                );
                fallback::direct_route(start, end, &self.config, issued_at)
            }
        }
    }

    /// Load the direct route once per profile, concurrently.
    ///
    /// Results are in the order of `profiles`.
    pub async fn load_direct_routes(
        &self,
        start: Coordinate,
        end: Coordinate,
        profiles: &[TravelProfile],
    ) -> Vec<(TravelProfile, Route)> {
        let loads = profiles.iter().map(|&profile| async move {
            (profile, self.load_direct_route(start, end, profile).await)
        });
        join_all(loads).await
    }

    /// Load a route visiting `waypoints` in order.
    pub async fn load_multi_point_route(
        &self,
        waypoints: &[Coordinate],
        profile: TravelProfile,
    ) -> Result<Route, AcquisitionError> {
        if waypoints.len() < 2 {
            return Err(AcquisitionError::TooFewWaypoints(waypoints.len()));
        }

        let issued_at = Utc::now();
        let route = self
            .provider
            .directions(waypoints, profile)
            .await
            .and_then(|directions| directions.into_route(issued_at, self.config.spacing_secs()))
            .inspect_err(|e| {
                warn!(
                    provider = self.provider.name(),
                    waypoints = waypoints.len(),
                    error = %e,
                    "Multi-point route request failed"
                )
            })?;

        info!(
            provider = self.provider.name(),
            %profile,
            waypoints = waypoints.len(),
            points = route.len(),
            "Loaded multi-point route"
        );
        Ok(route)
    }

    /// Synthetic route through `waypoints`, issued now.
    pub fn fallback_multi_point_route(&self, waypoints: &[Coordinate]) -> Route {
        fallback::multi_point_route(waypoints, &self.config, Utc::now())
    }

    /// Synthetic straight-line route, issued now.
    pub fn fallback_direct_route(&self, start: Coordinate, end: Coordinate) -> Route {
        fallback::direct_route(start, end, &self.config, Utc::now())
    }

    /// Offline preview route from `origin`, issued now.
    pub fn fallback_simple_route(&self, origin: Coordinate) -> Route {
        fallback::simple_route(origin, &self.config, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockHttpClient, OpenRouteServiceProvider};
    use chrono::Duration;

    const START: Coordinate = Coordinate::new(79.0882, 21.1458);
    const MID: Coordinate = Coordinate::new(79.0922, 21.1498);
    const END: Coordinate = Coordinate::new(79.0982, 21.1558);

    const RESPONSE: &str = r#"{
        "features": [{
            "geometry": {"coordinates": [[79.0882, 21.1458], [79.0930, 21.1500], [79.0982, 21.1558]]},
            "properties": {"summary": {"duration": 60.0}}
        }]
    }"#;

    fn loader(mock: MockHttpClient) -> RouteLoader<OpenRouteServiceProvider<MockHttpClient>> {
        RouteLoader::new(OpenRouteServiceProvider::new(mock, Some("key".to_string())))
    }

    #[tokio::test]
    async fn test_direct_route_from_provider() {
        let loader = loader(MockHttpClient::json(RESPONSE));
        let route = loader
            .load_direct_route(START, END, TravelProfile::Driving)
            .await;

        assert_eq!(route.len(), 3);
        assert_eq!(route[2].timestamp - route[0].timestamp, Duration::seconds(60));
        assert_eq!(route[1].timestamp - route[0].timestamp, Duration::seconds(30));
    }

    #[tokio::test]
    async fn test_direct_route_falls_back_on_http_error() {
        let loader = loader(MockHttpClient::failing());
        let route = loader
            .load_direct_route(START, END, TravelProfile::Driving)
            .await;

        assert_eq!(route.len(), 21);
        assert_eq!(route[0].coordinate(), START);
        assert_eq!(route[1].timestamp - route[0].timestamp, Duration::seconds(3));
    }

    #[tokio::test]
    async fn test_direct_route_falls_back_on_bad_body() {
        let loader = loader(MockHttpClient::json(r#"{"error": "quota exceeded"}"#));
        let route = loader
            .load_direct_route(START, END, TravelProfile::Walking)
            .await;
        assert_eq!(route.len(), 21);
    }

    #[tokio::test]
    async fn test_direct_route_falls_back_on_huge_duration() {
        let body = r#"{
            "features": [{
                "geometry": {"coordinates": [[79.0882, 21.1458], [79.0982, 21.1558]]},
                "properties": {"summary": {"duration": 1e300}}
            }]
        }"#;
        let loader = loader(MockHttpClient::json(body));
        let route = loader
            .load_direct_route(START, END, TravelProfile::Driving)
            .await;

        assert_eq!(route.len(), 21);
        assert_eq!(route[20].timestamp - route[0].timestamp, Duration::seconds(60));
    }

    #[tokio::test]
    async fn test_multi_point_route_reports_huge_duration() {
        let body = r#"{
            "features": [{
                "geometry": {"coordinates": [[79.0882, 21.1458], [79.0982, 21.1558]]},
                "properties": {"segments": [{"duration": 1e300}]}
            }]
        }"#;
        let loader = loader(MockHttpClient::json(body));
        let result = loader
            .load_multi_point_route(&[START, MID, END], TravelProfile::Driving)
            .await;

        assert!(matches!(
            result,
            Err(AcquisitionError::Provider(ProviderError::ParseError(_)))
        ));
    }

    #[tokio::test]
    async fn test_direct_route_falls_back_on_status() {
        let loader = loader(MockHttpClient::new(Err(ProviderError::Status {
            status: 403,
            url: "https://example.com".to_string(),
        })));
        let route = loader
            .load_direct_route(START, END, TravelProfile::Driving)
            .await;
        assert_eq!(route.len(), 21);
    }

    #[tokio::test]
    async fn test_multi_point_route_success() {
        let loader = loader(MockHttpClient::json(RESPONSE));
        let route = loader
            .load_multi_point_route(&[START, MID, END], TravelProfile::Driving)
            .await
            .unwrap();

        assert_eq!(route.len(), 3);
        assert_eq!(route[2].timestamp - route[0].timestamp, Duration::seconds(60));
    }

    #[tokio::test]
    async fn test_multi_point_route_reports_failure() {
        let loader = loader(MockHttpClient::failing());
        let result = loader
            .load_multi_point_route(&[START, MID, END], TravelProfile::Driving)
            .await;

        assert!(matches!(
            result,
            Err(AcquisitionError::Provider(ProviderError::HttpError(_)))
        ));
    }

    #[tokio::test]
    async fn test_multi_point_route_too_few_waypoints() {
        let loader = loader(MockHttpClient::json(RESPONSE));
        let result = loader
            .load_multi_point_route(&[START], TravelProfile::Driving)
            .await;

        assert_eq!(result, Err(AcquisitionError::TooFewWaypoints(1)));
    }

    #[tokio::test]
    async fn test_load_direct_routes_per_profile() {
        let loader = loader(MockHttpClient::json(RESPONSE));
        let routes = loader
            .load_direct_routes(START, END, &TravelProfile::ALL)
            .await;

        let profiles: Vec<_> = routes.iter().map(|(p, _)| *p).collect();
        assert_eq!(profiles, TravelProfile::ALL.to_vec());
        assert!(routes.iter().all(|(_, route)| route.len() == 3));
        assert_eq!(loader.provider().http_client().request_count(), 3);
    }

    #[test]
    fn test_fallback_multi_point_route_available() {
        let loader = loader(MockHttpClient::failing());
        let route = loader.fallback_multi_point_route(&[START, MID, END]);
        assert_eq!(route.len(), 22);
    }
}
