//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Contadores del servidor. Tiene su propio lock y nunca se actualiza
//! dentro de la sección crítica de la cola.

use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
struct MetricsData {
    /// Requests que pasaron la validación y entraron a la cola
    admitted: u64,

    /// Rechazos por código de estado
    rejected: BTreeMap<u16, u64>,

    /// Archivos servidos por los workers
    served: u64,

    /// Bytes de cuerpo enviados
    bytes_served: u64,

    /// Conexiones perdidas por errores de I/O
    io_failures: u64,

    /// Latencias admisión → fin de envío (microsegundos)
    latencies: VecDeque<u64>,

    /// Máximo de latencias a guardar (para calcular percentiles)
    max_latencies: usize,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                admitted: 0,
                rejected: BTreeMap::new(),
                served: 0,
                bytes_served: 0,
                io_failures: 0,
                latencies: VecDeque::with_capacity(10_000),
                max_latencies: 10_000, // Guardar últimas 10k latencias
            })),
            start_time: Instant::now(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MetricsData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record_admitted(&self) {
        self.lock().admitted += 1;
    }

    pub fn record_rejected(&self, status_code: u16) {
        *self.lock().rejected.entry(status_code).or_insert(0) += 1;
    }

    /// Registra un archivo servido y su latencia desde la admisión
    pub fn record_served(&self, bytes: u64, latency: Duration) {
        let mut data = self.lock();
        data.served += 1;
        data.bytes_served += bytes;

        // Si tenemos demasiadas latencias, eliminar las más antiguas
        if data.latencies.len() >= data.max_latencies {
            data.latencies.pop_front();
        }
        data.latencies.push_back(latency.as_micros() as u64);
    }

    pub fn record_io_failure(&self) {
        self.lock().io_failures += 1;
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.lock();
        let (p50, p95, p99, avg) = calculate_percentiles(&data.latencies);

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            admitted: data.admitted,
            rejected: data.rejected.clone(),
            served: data.served,
            bytes_served: data.bytes_served,
            io_failures: data.io_failures,
            latency_p50_us: p50,
            latency_p95_us: p95,
            latency_p99_us: p99,
            latency_avg_us: avg,
            latency_samples: data.latencies.len(),
        }
    }

    /// Snapshot en JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Calcula percentiles de latencia
fn calculate_percentiles(latencies: &VecDeque<u64>) -> (u64, u64, u64, u64) {
    if latencies.is_empty() {
        return (0, 0, 0, 0);
    }

    let mut sorted: Vec<u64> = latencies.iter().copied().collect();
    sorted.sort_unstable();

    let len = sorted.len();
    let p50 = sorted[len * 50 / 100];
    let p95 = sorted[len * 95 / 100];
    let p99 = sorted[len * 99 / 100];

    let sum: u64 = sorted.iter().sum();
    let avg = sum / len as u64;

    (p50, p95, p99, avg)
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub admitted: u64,
    pub rejected: BTreeMap<u16, u64>,
    pub served: u64,
    pub bytes_served: u64,
    pub io_failures: u64,
    pub latency_p50_us: u64,
    pub latency_p95_us: u64,
    pub latency_p99_us: u64,
    pub latency_avg_us: u64,
    pub latency_samples: usize,
}

impl MetricsSnapshot {
    /// Total de rechazos, sumando todos los códigos
    pub fn total_rejected(&self) -> u64 {
        self.rejected.values().sum()
    }
}
