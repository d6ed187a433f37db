// src/mpmc/mod.rs

//! A lock-based MPMC work channel with backpressure and completion tracking.
//!
//! The channel couples a bounded (or unbounded) FIFO queue with two extra
//! protocols on top of plain send/receive:
//!
//! - **Close propagation**: every `Sender` must close exactly once (`Drop`
//!   does it if the caller does not). Once the last sender has closed,
//!   receivers observe a terminal `Closed` state instead of `Empty`.
//! - **Completion tracking**: every received item is a pending task until the
//!   receiver calls [`Receiver::task_done`]; [`Channel::join`] blocks until
//!   the pending count reaches zero.
//!
//! Handle creation is ordered: all senders must be created before the first
//! receiver. This keeps "no senders remain" a monotone, race-free signal for
//! receivers, which is what makes the `Closed` state unambiguous.
//!
//! ```
//! use strand::mpmc::Channel;
//!
//! let chan = Channel::unbounded();
//! let tx = chan.sender().unwrap();
//! let rx = chan.receiver();
//!
//! std::thread::spawn(move || {
//!   for i in 0..4 {
//!     tx.send(i).unwrap();
//!   }
//!   // tx dropped here: close() runs exactly once.
//! });
//!
//! let got: Vec<u32> = rx.iter().collect();
//! assert_eq!(got, vec![0, 1, 2, 3]);
//! ```

use crate::error::{
  CloseError, RecvError, SendError, SenderCreateError, TaskDoneError, TryRecvError, TrySendError,
};

mod core;
mod sync_impl;

use self::core::Shared;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// --- Public Structs ---

/// The channel itself: the shared queue plus its counters.
///
/// `Channel` is the factory for [`Sender`] and [`Receiver`] handles and can
/// be cloned cheaply; all clones refer to the same underlying queue. It
/// carries no send/receive capability of its own.
#[derive(Debug)]
pub struct Channel<T: Send> {
  shared: Arc<Shared<T>>,
}

/// A producing handle for the channel.
///
/// Senders are created via [`Channel::sender`], which fails once any receiver
/// exists. There is deliberately no `Clone` impl: cloning would be sender
/// creation without the ordering check.
///
/// Each sender must be closed exactly once. `Drop` closes automatically, so
/// a sender moved into a worker thread releases its slot on every exit path,
/// panics included. An explicit [`Sender::close`] beforehand is fine; the
/// later `Drop` becomes a no-op.
#[derive(Debug)]
pub struct Sender<T: Send> {
  shared: Arc<Shared<T>>,
  closed: AtomicBool,
}

/// A consuming handle for the channel.
///
/// Receivers can be cloned freely to create multiple consumers; items are
/// delivered in FIFO order across all of them. Each successful receive adds
/// one pending task; call [`Receiver::task_done`] after processing an item
/// so that [`Channel::join`] can observe quiescence.
#[derive(Debug)]
pub struct Receiver<T: Send> {
  shared: Arc<Shared<T>>,
}

// --- Constructors ---

impl<T: Send> Channel<T> {
  /// Creates a new channel. A `capacity` of `0` means unbounded; any other
  /// value bounds the queue and makes sends exert backpressure when full.
  pub fn new(capacity: usize) -> Self {
    Channel {
      shared: Arc::new(Shared::new(capacity)),
    }
  }

  /// Creates a new unbounded channel. Equivalent to `Channel::new(0)`.
  pub fn unbounded() -> Self {
    Channel::new(0)
  }

  /// Creates a new sender handle.
  ///
  /// # Errors
  ///
  /// Returns `Err(SenderCreateError)` if any receiver handle already exists.
  /// Create every sender before the first receiver.
  pub fn sender(&self) -> Result<Sender<T>, SenderCreateError> {
    self.shared.attach_sender()?;
    Ok(Sender {
      shared: Arc::clone(&self.shared),
      closed: AtomicBool::new(false),
    })
  }

  /// Creates a new receiver handle. Never fails; from the first call on, no
  /// further senders can be created.
  pub fn receiver(&self) -> Receiver<T> {
    self.shared.attach_receiver();
    Receiver {
      shared: Arc::clone(&self.shared),
    }
  }

  /// Blocks until every received item has been marked done via
  /// [`Receiver::task_done`]. Returns immediately if nothing is pending.
  pub fn join(&self) {
    self.shared.join();
  }

  /// Returns the number of items currently buffered.
  #[inline]
  pub fn len(&self) -> usize {
    self.shared.len()
  }

  /// Returns `true` if no items are currently buffered.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if the channel is bounded and saturated. Always `false`
  /// for unbounded channels.
  #[inline]
  pub fn is_full(&self) -> bool {
    self.shared.is_full()
  }

  /// Returns the capacity of the channel. `None` for unbounded channels.
  pub fn capacity(&self) -> Option<usize> {
    if self.shared.capacity == 0 {
      None
    } else {
      Some(self.shared.capacity)
    }
  }
}

impl<T: Send> Clone for Channel<T> {
  fn clone(&self) -> Self {
    Channel {
      shared: Arc::clone(&self.shared),
    }
  }
}

// --- Sender ---

impl<T: Send> Sender<T> {
  /// Sends a value, blocking the current thread while a bounded channel is
  /// full. On an unbounded channel this never blocks.
  ///
  /// # Errors
  ///
  /// Returns `Err(SendError::Closed)` if this handle was already closed.
  pub fn send(&self, item: T) -> Result<(), SendError> {
    if self.closed.load(Ordering::Relaxed) {
      return Err(SendError::Closed);
    }
    sync_impl::send_block(&self.shared, item);
    Ok(())
  }

  /// Attempts to send a value without blocking.
  ///
  /// # Errors
  ///
  /// - `Err(TrySendError::Full(item))` if the channel is bounded and full.
  /// - `Err(TrySendError::Closed(item))` if this handle was already closed.
  pub fn try_send(&self, item: T) -> Result<(), TrySendError<T>> {
    if self.closed.load(Ordering::Relaxed) {
      return Err(TrySendError::Closed(item));
    }
    self.shared.try_send_core(item)
  }

  /// Sends a value, blocking for at most `timeout`.
  ///
  /// # Errors
  ///
  /// - `Err(TrySendError::Full(item))` if the deadline expired while the
  ///   channel was still full.
  /// - `Err(TrySendError::Closed(item))` if this handle was already closed.
  pub fn send_timeout(&self, item: T, timeout: Duration) -> Result<(), TrySendError<T>> {
    if self.closed.load(Ordering::Relaxed) {
      return Err(TrySendError::Closed(item));
    }
    sync_impl::send_deadline(&self.shared, item, timeout)
  }

  /// Closes this sender handle.
  ///
  /// This is an explicit alternative to `drop`. It decrements the channel's
  /// sender count; when the last sender closes, every receiver parked on an
  /// empty queue is woken so it can observe the `Closed` state.
  ///
  /// # Errors
  ///
  /// Returns `Err(CloseError)` if this handle has already been closed. The
  /// sender count is not touched in that case.
  pub fn close(&self) -> Result<(), CloseError> {
    if self
      .closed
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Relaxed)
      .is_ok()
    {
      self.shared.detach_sender();
      Ok(())
    } else {
      Err(CloseError)
    }
  }

  /// Blocks until every received item has been marked done. See
  /// [`Channel::join`].
  pub fn join(&self) {
    self.shared.join();
  }

  /// Returns the number of items currently buffered.
  #[inline]
  pub fn len(&self) -> usize {
    self.shared.len()
  }

  /// Returns `true` if no items are currently buffered.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if the channel is bounded and saturated.
  #[inline]
  pub fn is_full(&self) -> bool {
    self.shared.is_full()
  }

  /// Returns the capacity of the channel. `None` for unbounded channels.
  pub fn capacity(&self) -> Option<usize> {
    if self.shared.capacity == 0 {
      None
    } else {
      Some(self.shared.capacity)
    }
  }
}

impl<T: Send> Drop for Sender<T> {
  fn drop(&mut self) {
    // close() is guarded by the flag, so an earlier explicit close makes
    // this a no-op rather than a double decrement.
    let _ = self.close();
  }
}

// --- Receiver ---

impl<T: Send> Receiver<T> {
  /// Receives a value, blocking the current thread while the channel is
  /// empty and senders remain.
  ///
  /// # Errors
  ///
  /// Returns `Err(RecvError::Closed)` once the channel is empty and the last
  /// sender has closed. This is the normal end-of-stream signal, not a
  /// retryable failure.
  pub fn recv(&self) -> Result<T, RecvError> {
    sync_impl::recv_block(&self.shared)
  }

  /// Attempts to receive a value without blocking.
  ///
  /// # Errors
  ///
  /// - `Err(TryRecvError::Empty)` if the channel is empty but senders
  ///   remain; the caller may retry.
  /// - `Err(TryRecvError::Closed)` if the channel is empty and all senders
  ///   have closed.
  pub fn try_recv(&self) -> Result<T, TryRecvError> {
    self.shared.try_recv_core()
  }

  /// Receives a value, blocking for at most `timeout`.
  ///
  /// # Errors
  ///
  /// - `Err(TryRecvError::Empty)` if the deadline expired while the channel
  ///   was still empty with senders remaining.
  /// - `Err(TryRecvError::Closed)` if the channel is empty and all senders
  ///   have closed.
  pub fn recv_timeout(&self, timeout: Duration) -> Result<T, TryRecvError> {
    sync_impl::recv_deadline(&self.shared, timeout)
  }

  /// Marks one previously received item as fully processed.
  ///
  /// When the number of completions matches the number of receives, all
  /// threads blocked in [`Channel::join`] are released.
  ///
  /// # Errors
  ///
  /// Returns `Err(TaskDoneError)` if called more times than items were
  /// received. A programming error in the completion protocol.
  pub fn task_done(&self) -> Result<(), TaskDoneError> {
    self.shared.task_done()
  }

  /// Blocks until every received item has been marked done. See
  /// [`Channel::join`].
  pub fn join(&self) {
    self.shared.join();
  }

  /// Returns a blocking iterator over received items.
  ///
  /// Each `next()` performs a blocking [`Receiver::recv`]; the iterator ends
  /// cleanly when the channel reports `Closed`. Items pulled through the
  /// iterator still count as pending tasks until `task_done` is called.
  pub fn iter(&self) -> Iter<'_, T> {
    Iter { rx: self }
  }

  /// Returns the number of items currently buffered.
  #[inline]
  pub fn len(&self) -> usize {
    self.shared.len()
  }

  /// Returns `true` if no items are currently buffered.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if the channel is bounded and saturated.
  #[inline]
  pub fn is_full(&self) -> bool {
    self.shared.is_full()
  }

  /// Returns the capacity of the channel. `None` for unbounded channels.
  pub fn capacity(&self) -> Option<usize> {
    if self.shared.capacity == 0 {
      None
    } else {
      Some(self.shared.capacity)
    }
  }
}

impl<T: Send> Clone for Receiver<T> {
  fn clone(&self) -> Self {
    // Consumer creation is always legal; receiver_seen is already set.
    Receiver {
      shared: Arc::clone(&self.shared),
    }
  }
}

// --- Iteration ---

/// A blocking borrowing iterator over a [`Receiver`]. See [`Receiver::iter`].
#[derive(Debug)]
pub struct Iter<'a, T: Send> {
  rx: &'a Receiver<T>,
}

impl<T: Send> Iterator for Iter<'_, T> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    self.rx.recv().ok()
  }
}

/// A blocking owning iterator over a [`Receiver`]. Single-pass: consuming it
/// consumes the handle.
#[derive(Debug)]
pub struct IntoIter<T: Send> {
  rx: Receiver<T>,
}

impl<T: Send> Iterator for IntoIter<T> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    self.rx.recv().ok()
  }
}

impl<T: Send> IntoIterator for Receiver<T> {
  type Item = T;
  type IntoIter = IntoIter<T>;

  fn into_iter(self) -> IntoIter<T> {
    IntoIter { rx: self }
  }
}

impl<'a, T: Send> IntoIterator for &'a Receiver<T> {
  type Item = T;
  type IntoIter = Iter<'a, T>;

  fn into_iter(self) -> Iter<'a, T> {
    self.iter()
  }
}
