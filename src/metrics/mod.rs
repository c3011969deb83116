//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Contadores de admisión, rechazos, archivos servidos y latencias.

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
