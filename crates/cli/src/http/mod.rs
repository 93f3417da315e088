// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! REST access to the agency and public APIs.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  ApiClient  │────►│  Transport  │────►│   Backend   │
//! │             │◄────│   (trait)   │◄────│             │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   Session   │  (credentials, single-flight refresh)
//! └─────────────┘
//! ```

mod client;
mod transport;

pub use client::{ApiClient, Endpoints, ListFilter};
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport, TransportError,
    TransportResult,
};

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
mod client_tests;
