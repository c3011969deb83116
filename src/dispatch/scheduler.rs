//! # Políticas de Planificación
//! src/dispatch/scheduler.rs
//!
//! Decide qué request pendiente sale de la cola. La cola invoca a
//! [`Scheduler::select`] con el lock tomado y con una vista de solo
//! lectura; la remoción la hace la cola después.
//!
//! | Política | Selección                                   | Costo    |
//! |----------|---------------------------------------------|----------|
//! | FIFO     | el más antiguo                              | O(1)     |
//! | SFF      | menor tamaño; empate → el más antiguo       | O(count) |
//! | Random   | uniforme, con el generador del worker       | O(1)     |
//!
//! SFF no tiene aging: un archivo grande puede quedar relegado mientras
//! sigan llegando archivos más chicos.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::VecDeque;

/// Algo que la cola puede planificar por tamaño
pub trait Schedulable {
    fn file_size(&self) -> u64;
}

/// Política de planificación, elegida al arrancar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchedulingPolicy {
    /// First-In First-Out
    #[default]
    Fifo,

    /// Shortest-File-First
    Sff,

    /// Selección aleatoria uniforme
    Random,
}

impl std::fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SchedulingPolicy::Fifo => "FIFO",
            SchedulingPolicy::Sff => "SFF",
            SchedulingPolicy::Random => "RANDOM",
        };
        write!(f, "{}", name)
    }
}

/// Planificador de un worker
///
/// Cada worker crea el suyo al arrancar; el generador aleatorio nunca se
/// comparte entre threads.
#[derive(Debug)]
pub struct Scheduler {
    policy: SchedulingPolicy,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self {
            policy,
            rng: StdRng::from_entropy(),
        }
    }

    /// Planificador con semilla fija (pruebas reproducibles)
    pub fn with_seed(policy: SchedulingPolicy, seed: u64) -> Self {
        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Política con la que fue creado
    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    /// Índice del próximo request a remover
    ///
    /// `pending` no puede estar vacío; la cola solo llama con `count > 0`.
    pub fn select<T: Schedulable>(&mut self, pending: &VecDeque<T>) -> usize {
        match self.policy {
            SchedulingPolicy::Fifo => 0,
            SchedulingPolicy::Sff => shortest_file(pending),
            SchedulingPolicy::Random if pending.len() > 1 => self.rng.gen_range(0..pending.len()),
            SchedulingPolicy::Random => 0,
        }
    }
}

/// Primer índice con el menor `file_size` (desigualdad estricta → el más antiguo gana)
fn shortest_file<T: Schedulable>(pending: &VecDeque<T>) -> usize {
    let mut target = 0;
    for (i, entry) in pending.iter().enumerate().skip(1) {
        if entry.file_size() < pending[target].file_size() {
            target = i;
        }
    }
    target
}
