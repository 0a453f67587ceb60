// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Address lookup against a Nominatim-compatible search endpoint.
//!
//! Handlers run on blocking worker threads, so the lookup drives the async
//! `reqwest` client to completion on the runtime handle captured at startup.

use std::time::Duration;

use bandbook_api::{GeocodeError, Geocoder};
use bandbook_domain::Coordinates;
use serde::Deserialize;
use tokio::runtime::Handle;
use tracing::debug;

/// One search hit. Nominatim reports coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Geocoder backed by a Nominatim search endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
    runtime: Handle,
}

impl NominatimGeocoder {
    /// Builds a geocoder for `endpoint`.
    ///
    /// Must be called from within the tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError::Transport` if the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration, user_agent: &str) -> Result<Self, GeocodeError> {
        let client: reqwest::Client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            runtime: Handle::current(),
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GeocodeError> {
        let response: reqwest::Response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        response
            .json::<Vec<SearchHit>>()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))
    }
}

/// Parses the first hit into coordinates.
fn first_coordinates(hits: &[SearchHit]) -> Result<Option<Coordinates>, GeocodeError> {
    let Some(hit) = hits.first() else {
        return Ok(None);
    };

    let latitude: f64 = hit
        .lat
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude '{}'", hit.lat)))?;
    let longitude: f64 = hit
        .lon
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude '{}'", hit.lon)))?;

    Coordinates::new(latitude, longitude)
        .map(Some)
        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        debug!(query, "Geocoding address");
        let hits: Vec<SearchHit> = self.runtime.block_on(self.search(query))?;
        first_coordinates(&hits)
    }
}
