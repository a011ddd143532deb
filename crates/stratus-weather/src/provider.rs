//! Weather fetching against an OpenWeatherMap-compatible endpoint.
//!
//! One GET per fetch, no automatic retries; failures are classified into
//! [`FetchError`] variants and logged at the point of classification.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::error::FetchError;
use crate::types::{Coordinate, WeatherRecord};

/// Default current-weather endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Network-availability collaborator, consulted before any request goes out.
pub trait ConnectivityProbe: Send + Sync {
    fn is_connected(&self) -> bool;
}

/// Probe for hosts without a connectivity manager.
pub struct AssumeOnline;

impl ConnectivityProbe for AssumeOnline {
    fn is_connected(&self) -> bool {
        true
    }
}

#[derive(Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
    connectivity: Arc<dyn ConnectivityProbe>,
}

impl WeatherProvider {
    /// Build a provider against the given endpoint.
    ///
    /// `units` is passed through verbatim as the API's unit-system code.
    pub fn new(
        base_url: &str,
        api_key: &str,
        units: &str,
        timeout: Duration,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            units: units.to_string(),
            connectivity,
        })
    }

    /// Fetch current weather for one coordinate.
    ///
    /// Fails immediately with `NoConnectivity` when the probe reports the
    /// network as unavailable, without issuing the request.
    pub async fn fetch(&self, coordinate: &Coordinate) -> Result<WeatherRecord, FetchError> {
        if !self.connectivity.is_connected() {
            tracing::warn!("No internet connection available, skipping weather request");
            return Err(FetchError::NoConnectivity);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("units", self.units.clone()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Weather request failed in transit: {}", e);
                FetchError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            response.json::<WeatherRecord>().await.map_err(|e| {
                tracing::error!("Failed to decode weather payload: {}", e);
                FetchError::Parse(e.to_string())
            })
        } else {
            let err = match status.as_u16() {
                400 => FetchError::BadRequest,
                404 => FetchError::NotFound,
                code => FetchError::Server(code),
            };
            tracing::error!("Weather request returned {}: {}", status, err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Offline;

    impl ConnectivityProbe for Offline {
        fn is_connected(&self) -> bool {
            false
        }
    }

    fn coordinate() -> Coordinate {
        Coordinate {
            latitude: 47.6062,
            longitude: -122.3321,
        }
    }

    fn provider_for(server: &MockServer) -> WeatherProvider {
        WeatherProvider::new(
            &server.uri(),
            "test_key",
            "metric",
            Duration::from_secs(2),
            Arc::new(AssumeOnline),
        )
        .unwrap()
    }

    fn success_body() -> serde_json::Value {
        serde_json::json!({
            "weather": [
                {"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}
            ],
            "base": "stations",
            "main": {"temp": 22.5, "temp_min": 18.2, "temp_max": 25.1, "pressure": 1015, "humidity": 40},
            "visibility": 10000,
            "wind": {"speed": 1.5, "deg": 350},
            "clouds": {"all": 0},
            "dt": 1700000000,
            "sys": {"country": "US", "sunrise": 1699973000, "sunset": 1700006600},
            "name": "Seattle",
            "cod": 200
        })
    }

    #[tokio::test]
    async fn test_fetch_decodes_success_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .and(query_param("lat", "47.6062"))
            .and(query_param("lon", "-122.3321"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let record = provider.fetch(&coordinate()).await.unwrap();

        assert_eq!(record.conditions[0].main, "Clear");
        assert_eq!(record.conditions[0].icon, "01d");
        assert_eq!(record.measurements.temp, 22.5);
        assert_eq!(record.measurements.temp_min, 18.2);
        assert_eq!(record.measurements.temp_max, 25.1);
        assert_eq!(record.site.country, "US");
        assert_eq!(record.site.sunrise, 1699973000);
        assert_eq!(record.name, "Seattle");
        assert_eq!(record.status, 200);
    }

    #[tokio::test]
    async fn test_400_is_bad_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch(&coordinate()).await;

        assert!(matches!(result, Err(FetchError::BadRequest)));
    }

    #[tokio::test]
    async fn test_404_is_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch(&coordinate()).await;

        assert!(matches!(result, Err(FetchError::NotFound)));
    }

    #[tokio::test]
    async fn test_500_is_server_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch(&coordinate()).await;

        assert!(matches!(result, Err(FetchError::Server(500))));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_parse_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch(&coordinate()).await;

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn test_offline_probe_skips_request() {
        let mock_server = MockServer::start().await;
        // Any request reaching the server would violate the expectation.
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(
            &mock_server.uri(),
            "test_key",
            "metric",
            Duration::from_secs(2),
            Arc::new(Offline),
        )
        .unwrap();

        let result = provider.fetch(&coordinate()).await;

        assert!(matches!(result, Err(FetchError::NoConnectivity)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 1 is reserved; connection should be refused outright.
        let provider = WeatherProvider::new(
            "http://127.0.0.1:1",
            "test_key",
            "metric",
            Duration::from_millis(500),
            Arc::new(AssumeOnline),
        )
        .unwrap();

        let result = provider.fetch(&coordinate()).await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
