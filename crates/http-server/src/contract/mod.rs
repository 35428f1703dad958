//! # HTTP Server Contract System
//!
//! This module provides a type-safe contract system for defining HTTP endpoints with
//! compile-time TypeScript generation. It separates request handling into path, body, and
//! query parameters so the frontend client can be generated from the same source of truth.
//!
//! ### EndpointContract Trait
//! All endpoints must implement the `EndpointContract` trait which defines:
//! - `METHOD`: HTTP method (GET, POST, PUT, DELETE)
//! - `PATH`: URL path as a string literal
//! - `PathRequest`: Type for URL path parameters (e.g., `/teams/{id}`)
//! - `BodyRequest`: Type for request body parameters (use `EmptyRequest` if not needed)
//! - `QueryRequest`: Type for query parameters (use `EmptyRequest` if not needed)
//! - `Response`: Response type with status code variants
//!
//! ## Configuration Pattern
//!
//! Create a config struct that implements `EndpointConfigTypes` to group all your
//! request/response types:
//!
//! ```rust,ignore
//! use http_server::define_endpoint;
//! use http_server::contract::{EmptyRequest, EndpointConfigTypes};
//!
//! pub struct TeamGetEndpointConfig;
//!
//! impl EndpointConfigTypes for TeamGetEndpointConfig {
//!     type PathRequest = TeamPathParams;   // /teams/{id}
//!     type BodyRequest = EmptyRequest;
//!     type QueryRequest = EmptyRequest;
//!     type Response = TeamGetResponses;
//! }
//!
//! define_endpoint! {
//!     TeamGetEndpoint,
//!     TeamGetEndpointDef,
//!     Get,
//!     "/teams/{id}",
//!     ts_path_type = "\"/api/teams/${string}\"",
//!     config = TeamGetEndpointConfig
//! }
//! ```
//!
//! This generates a TypeScript type like:
//!
//! ```typescript
//! export type TeamGetEndpointDef = {
//!   method: HttpMethod,
//!   path: "/api/teams/${string}",
//!   path_request: TeamPathParams,
//!   body_request: EmptyRequest,
//!   query_request: EmptyRequest,
//!   responses: TeamGetResponses
//! };
//! ```
//!
//! ## Response Type Patterns
//!
//! Response types use serde field renaming so the TypeScript side can index
//! responses by HTTP status code:
//! ```rust,ignore
//! #[derive(Serialize, TS, Default)]
//! pub struct TeamGetResponses {
//!     #[serde(rename = "200")]
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     pub ok: Option<TeamView>,
//!
//!     #[serde(rename = "404")]
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     pub not_found: Option<MessageResponse>,
//! }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Bumped whenever an endpoint definition or event payload changes shape.
/// Surfaced by `/api/info` so the frontend can detect a stale client bundle.
pub const CONTRACT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, TS, Clone, Debug, PartialEq)]
#[ts(export, export_to = "api.ts")]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "DELETE")]
    Delete,
}

pub trait ApiRequest:
    Serialize + for<'de> Deserialize<'de> + TS + Default + Send + Sync + 'static
{
}
impl<T> ApiRequest for T where
    T: Serialize + for<'de> Deserialize<'de> + TS + Default + Send + Sync + 'static
{
}

#[derive(Serialize, Deserialize, TS, Default, Debug, Clone, PartialEq)]
#[ts(export, export_to = "api.ts")]
pub struct EmptyRequest;

pub trait ApiResponse: Serialize + TS + Default + Send + Sync + 'static {}
impl<T> ApiResponse for T where T: Serialize + TS + Default + Send + Sync + 'static {}

pub trait EndpointContract {
    const METHOD: HttpMethod;
    const PATH: &'static str;

    type PathRequest: ApiRequest;
    type BodyRequest: ApiRequest;
    type QueryRequest: ApiRequest;
    type Response: ApiResponse;
}

/// Trait for endpoint configuration - implement this for your config struct
pub trait EndpointConfigTypes {
    type PathRequest: ApiRequest;
    type BodyRequest: ApiRequest;
    type QueryRequest: ApiRequest;
    type Response: ApiResponse;
}

#[macro_export]
macro_rules! define_endpoint {
    (
        $endpoint_name:ident,
        $def_name:ident,
        $method:ident,
        $path:literal,
        ts_path_type = $ts_path_type:literal,
        config = $config_type:ty
    ) => {
        $crate::define_endpoint! {
            $endpoint_name,
            $def_name,
            $method,
            $path,
            ts_path_type = $ts_path_type,
            config = $config_type,
            export_to = "api.ts"
        }
    };
    (
        $endpoint_name:ident,
        $def_name:ident,
        $method:ident,
        $path:literal,
        ts_path_type = $ts_path_type:literal,
        config = $config_type:ty,
        export_to = $export_path:literal
    ) => {
        pub struct $endpoint_name;

        impl $crate::contract::EndpointContract for $endpoint_name {
            const METHOD: $crate::contract::HttpMethod = $crate::contract::HttpMethod::$method;
            const PATH: &'static str = $path;
            type PathRequest = <$config_type as $crate::contract::EndpointConfigTypes>::PathRequest;
            type BodyRequest = <$config_type as $crate::contract::EndpointConfigTypes>::BodyRequest;
            type QueryRequest = <$config_type as $crate::contract::EndpointConfigTypes>::QueryRequest;
            type Response = <$config_type as $crate::contract::EndpointConfigTypes>::Response;
        }

        #[derive(serde::Serialize, ts_rs::TS)]
        #[ts(export, export_to = $export_path)]
        pub struct $def_name {
            pub method: $crate::contract::HttpMethod,
            #[ts(type = $ts_path_type)]
            pub path: String,
            pub path_request: <$config_type as $crate::contract::EndpointConfigTypes>::PathRequest,
            pub body_request: <$config_type as $crate::contract::EndpointConfigTypes>::BodyRequest,
            pub query_request: <$config_type as $crate::contract::EndpointConfigTypes>::QueryRequest,
            pub responses: <$config_type as $crate::contract::EndpointConfigTypes>::Response,
        }

        impl Default for $def_name {
            fn default() -> Self {
                Self {
                    method: $crate::contract::HttpMethod::$method,
                    path: $path.to_string(),
                    path_request: <<$config_type as $crate::contract::EndpointConfigTypes>::PathRequest>::default(),
                    body_request: <<$config_type as $crate::contract::EndpointConfigTypes>::BodyRequest>::default(),
                    query_request: <<$config_type as $crate::contract::EndpointConfigTypes>::QueryRequest>::default(),
                    responses: <<$config_type as $crate::contract::EndpointConfigTypes>::Response>::default(),
                }
            }
        }
    };
}
