//! Query extractors for API routes
//!
//! ## HTTP Caching Strategy
//!
//! | Endpoint Type      | Cache-Control          |
//! |--------------------|------------------------|
//! | Sales list / stats | -                      |
//! | Filter options     | `private, max-age=30`  |
//! | Health             | -                      |

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde_json::{Map, Value};

use crate::domain::sales::SalesQuery;
use crate::domain::sales::query::applied_params;

/// Raw sales query-string pairs, in request order.
///
/// Never rejects: a query string that cannot be decoded is treated as empty,
/// and every individual value is parsed leniently by [`SalesQuery::from_pairs`].
#[derive(Debug, Clone, Default)]
pub struct SalesParams {
    pub pairs: Vec<(String, String)>,
}

impl SalesParams {
    pub fn query(&self) -> SalesQuery {
        SalesQuery::from_pairs(&self.pairs)
    }

    /// Parameters echoed back under `filters.applied`
    pub fn applied(&self) -> Map<String, Value> {
        applied_params(&self.pairs)
    }
}

impl<S> FromRequestParts<S> for SalesParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Query::<Vec<(String, String)>>::from_request_parts(parts, state).await {
            Ok(Query(pairs)) => pairs,
            Err(e) => {
                tracing::debug!(error = %e, uri = %parts.uri, "Ignoring undecodable query string");
                Vec::new()
            }
        };
        Ok(Self { pairs })
    }
}
