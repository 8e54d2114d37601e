//! Messaging-extension runtime for package-registry search.
//!
//! Hosts the request handler that turns inbound compose-extension events into
//! response payloads, the injectable login-state store shared by concurrent
//! conversations, and the card-composition helpers.

pub mod extension_runtime;

pub use extension_runtime::{
    ExtensionHandlerError, ExtensionRequestHandler, ExtensionRuntimeConfig,
    InMemoryLoginStateStore, LoginStateStore,
};
