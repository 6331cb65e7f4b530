//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /has/:key` - Check whether a key is cached
//! - `DELETE /del/:key` - Delete a key
//! - `POST /del/prefix` - Delete keys by prefix
//! - `POST /del/tags` - Delete keys matching tag patterns
//! - `DELETE /clear` - Drop every entry and the cache directory
//! - `GET /keys` - List cached keys
//! - `GET /info/:key` - Entry metadata
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
