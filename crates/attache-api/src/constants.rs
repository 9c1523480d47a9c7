//! API constants

/// Versioned prefix every file route lives under
pub const API_PREFIX: &str = "/api/v0";

/// Path of the served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";
