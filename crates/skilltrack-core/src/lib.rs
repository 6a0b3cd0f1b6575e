//! skilltrack-core — ability scoring, learning insights, and review scheduling.
//!
//! This crate is the pure computational core of skilltrack: given completed
//! practice events and tracked mistakes, it decides how ability scores move,
//! which knowledge areas look weak or anomalous, and when missed items should
//! be re-surfaced for review. Everything is a synchronous, side-effect-free
//! function over caller-supplied values; persistence and transport live with
//! the callers.

pub mod input;
pub mod insights;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod scoring;
