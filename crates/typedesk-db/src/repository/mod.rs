//! # Repositories
//!
//! One repository per aggregate, each a thin handle over the shared pool:
//!
//! - [`branch`] / [`employee`] - org lookups (employee → branch resolution)
//! - [`service`] - the sellable catalog, read-only for the receipt core
//! - [`receipt`] - receipt reads and the atomic receipt writer
//! - [`activity`] - append-only audit log

pub mod activity;
pub mod branch;
pub mod employee;
pub mod receipt;
pub mod service;
