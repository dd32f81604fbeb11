//! Listing Wizard - state orchestration for a multi-step property listing wizard
//!
//! This crate aggregates partial input across the wizard's steps, stages the
//! draft so it survives reloads, merges a fetched listing under local edits,
//! and normalizes taxonomy attributes between bare ids and `{id, label}`
//! objects against a shared reference-data cache.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
