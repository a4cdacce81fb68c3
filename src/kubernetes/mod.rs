// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, manifests and resource access.

pub mod client;
pub mod manifests;
pub mod resources;

pub use client::create_client;
pub use resources::ResourceClient;
