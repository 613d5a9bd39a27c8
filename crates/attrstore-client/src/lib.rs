//! HTTP client for the attrstore key/attribute store API.
//!
//! This crate provides the concrete [`StoreClient`] implementation of
//! [`AttributeStore`](attrstore_core::AttributeStore).

#![doc(html_root_url = "https://docs.rs/attrstore-client/0.3.0")]

pub mod api;
mod client;

pub use attrstore_core::{AttributeStore, Result, StoreError};
pub use client::{StoreClient, StoreClientBuilder};
