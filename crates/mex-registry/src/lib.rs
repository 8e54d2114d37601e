//! Package-registry search client for the messaging extension runtime.
//!
//! Issues one search request per call against the registry's `query` endpoint
//! and normalizes the response into fixed-shape package records. Every failure
//! mode classifies as "search unavailable"; the caller decides how to surface
//! it.

pub mod registry_search_client;

pub use registry_search_client::{PackageRecord, RegistrySearchClient, RegistrySearchError};
