use shapecast_schema::SchemaRegistry;
use shapecast_transform::{Transformer, Value};

use crate::error::JobBoardError;
use crate::schemas::{self, JOB_SEARCH_RESPONSE};

/// Something that answers job search queries with a raw response body.
pub trait JobSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue one search and return the parsed response body.
    fn search(&self, query: &str) -> Result<serde_json::Value, Self::Error>;
}

/// Serves the same response body for every query.
#[derive(Debug, Clone)]
pub struct StaticSource {
    body: String,
}

impl StaticSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl JobSource for StaticSource {
    type Error = serde_json::Error;

    fn search(&self, _query: &str) -> Result<serde_json::Value, Self::Error> {
        serde_json::from_str(&self.body)
    }
}

/// The latest job listing that decoded cleanly.
///
/// A failed refresh leaves the previous listing in place.
#[derive(Debug)]
pub struct JobBoard<'r, S> {
    source: S,
    registry: &'r SchemaRegistry,
    listing: Option<Value>,
}

impl<S: JobSource> JobBoard<'static, S> {
    /// A board decoding against the built-in job types.
    pub fn new(source: S) -> Self {
        JobBoard::with_registry(source, schemas::registry())
    }
}

impl<'r, S: JobSource> JobBoard<'r, S> {
    /// A board decoding against `registry`, which must define `JobSearchResponse`.
    pub fn with_registry(source: S, registry: &'r SchemaRegistry) -> Self {
        Self {
            source,
            registry,
            listing: None,
        }
    }

    /// Search for `query` and replace the listing with the decoded response.
    /// Returns the number of jobs now listed.
    pub fn refresh(&mut self, query: &str) -> Result<usize, JobBoardError> {
        match self.fetch(query) {
            Ok(listing) => {
                self.listing = Some(listing);
                let count = self.jobs().len();
                tracing::info!(query, count, "job listing refreshed");
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(
                    query,
                    error = %err,
                    "job listing refresh failed; keeping previous listing"
                );
                Err(err)
            }
        }
    }

    fn fetch(&self, query: &str) -> Result<Value, JobBoardError> {
        let body = self.source.search(query).map_err(|err| JobBoardError::Source {
            query: query.to_string(),
            source: Box::new(err),
        })?;
        let engine = Transformer::new(self.registry);
        Ok(engine.decode_json(&body, JOB_SEARCH_RESPONSE)?)
    }

    /// Decoded `JobSearchResponse` of the last successful refresh.
    pub fn listing(&self) -> Option<&Value> {
        self.listing.as_ref()
    }

    /// Jobs of the current listing, in response order.
    pub fn jobs(&self) -> &[Value] {
        self.listing
            .as_ref()
            .and_then(|listing| listing.get("data"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up one job of the current listing by `job_id`.
    pub fn get(&self, job_id: &str) -> Option<&Value> {
        self.jobs()
            .iter()
            .find(|job| job.get("job_id").and_then(Value::as_str) == Some(job_id))
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
