// src/error.rs

use core::fmt;

/// Error returned by `try_send` and `send_timeout` when the item could not be
/// enqueued. The item being sent is always handed back to the caller.
#[derive(PartialEq, Eq, Clone)]
pub enum TrySendError<T> {
  /// The channel is bounded and saturated (or the deadline expired while it
  /// still was). The caller may retry, or fall back to a blocking `send`.
  Full(T),
  /// This sender handle has already been closed.
  Closed(T),
}

impl<T> TrySendError<T> {
  /// Consumes the error, returning the item that could not be sent.
  #[inline]
  pub fn into_inner(self) -> T {
    match self {
      TrySendError::Full(v) => v,
      TrySendError::Closed(v) => v,
    }
  }
}

impl<T> fmt::Debug for TrySendError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TrySendError::Full(_) => write!(f, "TrySendError::Full(..)"),
      TrySendError::Closed(_) => write!(f, "TrySendError::Closed(..)"),
    }
  }
}

impl<T> fmt::Display for TrySendError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TrySendError::Full(_) => f.write_str("channel full"),
      TrySendError::Closed(_) => f.write_str("sender handle closed"),
    }
  }
}

impl<T: fmt::Debug> std::error::Error for TrySendError<T> {}

/// Error returned by the blocking `send`.
///
/// A blocking send without a deadline only fails if the sender handle itself
/// was already closed; otherwise it parks until space exists.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SendError {
  Closed,
}
impl std::error::Error for SendError {}
impl fmt::Display for SendError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SendError::Closed => write!(f, "sender handle closed"),
    }
  }
}

/// Error returned by `try_recv` and `recv_timeout` when no item could be
/// dequeued.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TryRecvError {
  /// The queue is empty but producers remain open; an item may still arrive.
  Empty,
  /// The queue is empty and every producer has closed. Terminal: no item
  /// will ever arrive.
  Closed,
}
impl std::error::Error for TryRecvError {}
impl fmt::Display for TryRecvError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryRecvError::Empty => write!(f, "channel empty"),
      TryRecvError::Closed => write!(f, "channel closed (empty and all senders closed)"),
    }
  }
}

/// Error returned by the blocking `recv`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RecvError {
  /// The queue is empty and every producer has closed.
  Closed,
}
impl std::error::Error for RecvError {}
impl fmt::Display for RecvError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RecvError::Closed => write!(f, "channel closed (empty and all senders closed)"),
    }
  }
}

/// Error returned when explicitly closing an already closed sender handle.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CloseError;
impl std::error::Error for CloseError {}
impl fmt::Display for CloseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "sender handle is already closed")
  }
}

/// Error returned by `task_done` when it is called more times than items were
/// dequeued. A programming error in the caller's completion protocol.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TaskDoneError;
impl std::error::Error for TaskDoneError {}
impl fmt::Display for TaskDoneError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "task_done() called with no pending task")
  }
}

/// Error returned when creating a sender handle after a receiver handle
/// already exists.
///
/// Receivers decide that the channel is closed by watching the sender count
/// reach zero. Forbidding late senders keeps that observation monotone: once
/// a receiver exists, the sender count can only fall.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SenderCreateError;
impl std::error::Error for SenderCreateError {}
impl fmt::Display for SenderCreateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "cannot create a sender after a receiver has been attached")
  }
}
