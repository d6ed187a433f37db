//! A blocking MPMC work channel for threads.
//!
//! Strand provides a single shared FIFO queue with multiple producer and
//! multiple consumer handles, backpressure on bounded capacities, graceful
//! close propagation, and a completion-tracking join barrier. It is built on
//! one mutex and three condition variables; there is no async surface and no
//! lock-free fast path, by design.

pub mod error;
pub mod mpmc;

// Public re-exports for convenience
pub use error::{
  CloseError, RecvError, SendError, SenderCreateError, TaskDoneError, TryRecvError, TrySendError,
};
pub use mpmc::{Channel, Receiver, Sender};
