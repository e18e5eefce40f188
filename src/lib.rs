//! FoundersLens - Resilient LLM orchestration for startup-idea analysis
//!
//! This library sends an analyst prompt to a primary Gemini model, falls back
//! to a second model when the primary runs out of quota, and turns the model's
//! free-form answer into a structured market and strategy report.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod telemetry;
