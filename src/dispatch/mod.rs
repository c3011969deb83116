//! # Sistema de Despacho
//!
//! Núcleo de concurrencia: cola acotada entre el acceptor y un pool fijo
//! de workers, con una política de planificación enchufable.
//!
//! ```text
//! acceptor ──enqueue──▶ RequestQueue ──dequeue(Scheduler)──▶ worker-N
//!              (espera not_full)        (espera not_empty)
//! ```

pub mod pool;
pub mod queue;
pub mod request;
pub mod scheduler;

pub use pool::WorkerPool;
pub use queue::{QueueClosed, QueueStats, RequestQueue};
pub use request::StaticRequest;
pub use scheduler::{Schedulable, Scheduler, SchedulingPolicy};
