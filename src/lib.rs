// Library root
// -----------
// This crate exposes the library surface behind the `bookshelf` terminal
// client. The binary (`main.rs`) wires these modules together.
//
// Module responsibilities:
// - `config`: base URL and token file location.
// - `error`: error type for transport and token storage failures.
// - `models`: book records, the editable book form and wire payloads.
// - `session`: the bearer token, held in memory and persisted to disk.
// - `api`: HTTP requests for the six backend operations.
// - `app`: view state and the login / list / save / delete flows.
// - `ui`: interactive terminal menus that drive `app`.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod ui;
