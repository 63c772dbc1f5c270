//! Admission gating and retry policy for backend generation calls.
//!
//! Local model servers fall over when generations overlap, so every call
//! that produces tokens goes through a single-slot [`AdmissionGate`].
//! [`ResilientClient`] wraps any [`StudioloDriver`](studiolo_interface::StudioloDriver)
//! with that gate plus a classified retry loop: transient failures back off
//! and try again, backend crashes get a longer cool-down first, and
//! cancellation stops everything immediately.

mod client;
mod gate;
mod retry;

pub use client::ResilientClient;
pub use gate::{AdmissionGate, AdmissionPermit};
pub use retry::{RetryConfig, retry_with_policy};
