//! HTTP and WebSocket transport for the credit casino.
//!
//! Converts requests into [`credit_casino::Intent`]s, drives the
//! [`credit_casino::WagerOrchestrator`] and renders its replies.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
