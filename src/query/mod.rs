// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query execution: external tool runs and result reconciliation

pub mod reconcile;
pub mod runner;
pub mod search;
