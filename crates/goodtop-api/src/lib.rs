// goodtop-api: Async Rust client for Goodtop PoE switch web management
//
// These switches expose no documented API. Management happens through a
// handful of CGI pages that render fixed-format HTML; this crate logs in
// with the firmware's legacy MD5-cookie scheme, scrapes those pages into
// typed records, and posts the same forms the browser UI would to toggle
// per-port PoE power and admin state.

pub mod auth;
pub mod client;
pub mod error;
pub mod model;
pub mod parse;
pub mod transport;

pub use client::GoodtopClient;
pub use error::Error;
pub use model::{DeviceSnapshot, FlowControl, PoeState, PortRecord, SpeedDuplex};
pub use transport::TransportConfig;
