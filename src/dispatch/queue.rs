//! # Cola Acotada Compartida
//! src/dispatch/queue.rs
//!
//! Buffer de capacidad fija entre el acceptor (productor) y los workers
//! (consumidores). Todo el estado vive bajo un único `Mutex`:
//!
//! - `enqueue` espera en `not_full` mientras `count == capacity`
//! - `dequeue` espera en `not_empty` mientras `count == 0`, pide un índice
//!   al [`Scheduler`] con el lock tomado y remueve esa entrada
//!
//! Cada transición cambia la ocupación en uno, así que cada una despierta
//! a un solo waiter. `close` es la excepción: despierta a todos.
//!
//! Después de `close`, `dequeue` sigue entregando lo que quedó encolado y
//! retorna `None` recién cuando la cola está vacía.

use crate::dispatch::scheduler::{Schedulable, Scheduler};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use tracing::error;

/// La cola está cerrada; el request vuelve al llamador
pub struct QueueClosed<T>(pub T);

impl<T> QueueClosed<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::fmt::Debug for QueueClosed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("QueueClosed(..)")
    }
}

impl<T> std::fmt::Display for QueueClosed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("request queue is closed")
    }
}

impl<T> std::error::Error for QueueClosed<T> {}

/// Estado protegido por el lock
struct QueueState<T> {
    /// Entradas en orden de inserción; `entries.len()` es el `count`
    entries: VecDeque<T>,
    closed: bool,
    high_water: usize,
    total_enqueued: u64,
    total_dequeued: u64,
}

struct Shared<T> {
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

/// Cola acotada thread-safe
///
/// Clonar la cola comparte el mismo buffer.
pub struct RequestQueue<T> {
    shared: Arc<Shared<T>>,

    /// Capacidad máxima de la cola
    capacity: usize,
}

impl<T: Schedulable> RequestQueue<T> {
    /// Crea una cola con capacidad máxima (al menos 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState {
                    entries: VecDeque::with_capacity(capacity),
                    closed: false,
                    high_water: 0,
                    total_enqueued: 0,
                    total_dequeued: 0,
                }),
                not_empty: Condvar::new(),
                not_full: Condvar::new(),
            }),
            capacity,
        }
    }

    // Cada mutación es una sola llamada sobre el VecDeque: un panic ajeno
    // no puede dejar el estado a medias, así que el poison se ignora.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un request
    ///
    /// Bloquea mientras la cola esté llena. Si la cola está (o queda)
    /// cerrada, el request se devuelve en `QueueClosed`.
    pub fn enqueue(&self, item: T) -> Result<(), QueueClosed<T>> {
        let mut state = self.lock();

        while state.entries.len() == self.capacity && !state.closed {
            state = self
                .shared
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if state.closed {
            return Err(QueueClosed(item));
        }

        state.entries.push_back(item);
        state.total_enqueued += 1;
        state.high_water = state.high_water.max(state.entries.len());

        // Notificar a un worker esperando
        self.shared.not_empty.notify_one();

        Ok(())
    }

    /// Desencola el request que elija el scheduler
    ///
    /// Bloquea mientras la cola esté vacía. Retorna `None` solo cuando la
    /// cola está cerrada y ya no quedan entradas.
    pub fn dequeue(&self, scheduler: &mut Scheduler) -> Option<T> {
        let mut state = self.lock();

        while state.entries.is_empty() && !state.closed {
            state = self
                .shared
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        let item = Self::take_selected(&mut state, scheduler)?;
        self.shared.not_full.notify_one();
        Some(item)
    }

    /// Intenta desencolar sin bloquear
    pub fn try_dequeue(&self, scheduler: &mut Scheduler) -> Option<T> {
        let mut state = self.lock();
        let item = Self::take_selected(&mut state, scheduler)?;
        self.shared.not_full.notify_one();
        Some(item)
    }

    fn take_selected(state: &mut QueueState<T>, scheduler: &mut Scheduler) -> Option<T> {
        if state.entries.is_empty() {
            return None;
        }

        let len = state.entries.len();
        let index = scheduler.select(&state.entries);
        debug_assert!(index < len, "scheduler picked index {} of {}", index, len);

        // `remove` desplaza el resto conservando su orden relativo
        let item = match state.entries.remove(index) {
            Some(item) => item,
            None => {
                error!(index, len, policy = %scheduler.policy(), "scheduler index out of range, serving head");
                state.entries.pop_front()?
            }
        };
        state.total_dequeued += 1;
        Some(item)
    }

    /// Cierra la cola y despierta a todos los threads bloqueados
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        drop(state);

        self.shared.not_empty.notify_all();
        self.shared.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Retorna el tamaño actual de la cola (`count`)
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verifica si la cola está llena
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Obtiene estadísticas de la cola
    pub fn stats(&self) -> QueueStats {
        let state = self.lock();
        QueueStats {
            count: state.entries.len(),
            capacity: self.capacity,
            high_water: state.high_water,
            total_enqueued: state.total_enqueued,
            total_dequeued: state.total_dequeued,
            closed: state.closed,
        }
    }
}

impl<T> Clone for RequestQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            capacity: self.capacity,
        }
    }
}

/// Estadísticas de una cola
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub count: usize,
    pub capacity: usize,
    pub high_water: usize,
    pub total_enqueued: u64,
    pub total_dequeued: u64,
    pub closed: bool,
}
