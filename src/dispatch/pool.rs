//! # Pool de Workers
//! src/dispatch/pool.rs
//!
//! Threads persistentes que repiten dequeue → servir → cerrar. Cada worker
//! crea su propio [`Scheduler`] (y con él su generador aleatorio); lo único
//! compartido entre workers es la cola.

use crate::dispatch::queue::RequestQueue;
use crate::dispatch::scheduler::{Schedulable, Scheduler, SchedulingPolicy};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

/// Pool de tamaño fijo que consume una [`RequestQueue`]
pub struct WorkerPool<T> {
    queue: RequestQueue<T>,
    handles: Vec<JoinHandle<()>>,
}

impl<T: Schedulable + Send + 'static> WorkerPool<T> {
    /// Inicia `workers` threads que sirven la cola con `handler`
    ///
    /// `handler` recibe el id del worker y el request desencolado; es dueño
    /// del request y de su conexión hasta que retorna.
    pub fn spawn<F>(
        workers: usize,
        queue: RequestQueue<T>,
        policy: SchedulingPolicy,
        handler: F,
    ) -> io::Result<Self>
    where
        F: Fn(usize, T) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let mut handles = Vec::with_capacity(workers);

        for id in 0..workers {
            let worker_queue = queue.clone();
            let handler = Arc::clone(&handler);

            let spawned = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || Self::worker_loop(id, worker_queue, policy, handler));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Liberar a los que ya arrancaron antes de reportar
                    queue.close();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(e);
                }
            }
        }

        Ok(Self { queue, handles })
    }

    /// Loop principal del worker
    fn worker_loop<F>(id: usize, queue: RequestQueue<T>, policy: SchedulingPolicy, handler: Arc<F>)
    where
        F: Fn(usize, T),
    {
        let mut scheduler = Scheduler::new(policy);
        info!(worker = id, policy = %scheduler.policy(), "worker started");

        while let Some(request) = queue.dequeue(&mut scheduler) {
            handler(id, request);
        }

        info!(worker = id, "worker stopped");
    }

    /// Número de workers del pool
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Cierra la cola, deja que los workers la vacíen y espera a todos
    ///
    /// Retorna cuántos workers terminaron por panic.
    pub fn shutdown(self) -> usize {
        self.queue.close();

        let mut panicked = 0;
        for handle in self.handles {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                error!(worker = %name, "worker panicked");
                panicked += 1;
            }
        }
        panicked
    }
}
