//! Core types shared across the monitor facilities
//!
//! This crate provides the canonical schema constants used by both the
//! error and logging facilities, so that field keys and event names stay
//! identical in every crate that emits them.

pub mod schema;
