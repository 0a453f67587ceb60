// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Address lookup used when a user requests a slot.
//!
//! Geocoding is best-effort. A failed or empty lookup leaves the
//! engagement's coordinates unset and never fails the request.

use bandbook_domain::Coordinates;
use thiserror::Error;

/// Errors a geocoder may report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeocodeError {
    /// The lookup service could not be reached or answered with an error.
    #[error("Geocoder request failed: {0}")]
    Transport(String),

    /// The lookup service answered with something unusable.
    #[error("Geocoder returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Resolves a free-text address to coordinates.
///
/// Implementations are called from synchronous handler code and may block.
pub trait Geocoder {
    /// Looks up `query`, returning `Ok(None)` when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns a `GeocodeError` if the lookup itself failed.
    fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// A geocoder that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGeocoder;

impl Geocoder for NoopGeocoder {
    fn geocode(&self, _query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(None)
    }
}
