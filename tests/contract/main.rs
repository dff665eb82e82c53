//! Contract and gateway integration tests.

mod support;
mod client;

#[cfg(feature = "http")]
mod http;
