// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resources read and written by the harness.

pub mod cluster;
pub mod node_config;
pub mod virtual_machine;

pub use cluster::{NodeStatus, VMRayCluster, VMRayClusterSpec, VMRayClusterStatus};
pub use node_config::{VMRayNodeConfig, VMRayNodeConfigSpec};
pub use virtual_machine::VirtualMachine;
