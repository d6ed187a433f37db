//! The core shared state and logic for the work channel.
//!
//! This module contains the `Shared` struct which holds the central
//! mutex-protected state of the channel. All synchronization lives here; the
//! public `Sender`/`Receiver`/`Channel` handles in `mod.rs` are thin wrappers
//! that forward into this module.
//!
//! ### Design Principles:
//!
//! 1.  **Central Mutex**: A single `parking_lot::Mutex` guards all state
//!     changes. Every operation holds it for its full duration except while
//!     parked on a condvar.
//! 2.  **Separate Condvars**: Three wait conditions exist (space available,
//!     item available, all pending tasks done) and each gets its own
//!     `Condvar` over the one mutex. A producer finishing a send wakes only
//!     receivers; a `task_done` reaching zero wakes only join waiters.
//! 3.  **Predicate re-check**: Waiters always re-check their predicate after
//!     waking. A wakeup is a hint, not a grant; another waiter may have
//!     consumed the state change first, and condvars may wake spuriously.

use crate::error::{SenderCreateError, TaskDoneError, TryRecvError, TrySendError};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// The mutable channel state, protected by `Shared::internal`.
#[derive(Debug)]
pub(crate) struct ChannelInternal<T> {
  /// FIFO buffer. Insertion order is delivery order across all receivers.
  pub(crate) queue: VecDeque<T>,
  /// The number of open `Sender` handles. Decremented only by an explicit
  /// or `Drop`-driven close, never implicitly.
  pub(crate) sender_count: usize,
  /// Set once any `Receiver` handle has been created; never reset. New
  /// senders are refused from that point on.
  pub(crate) receiver_seen: bool,
  /// Items dequeued but not yet marked complete via `task_done`.
  pub(crate) pending_tasks: usize,
}

/// The shared owner of the channel's state, wrapped in an `Arc` by the
/// public handles.
#[derive(Debug)]
pub(crate) struct Shared<T> {
  pub(crate) internal: Mutex<ChannelInternal<T>>,
  /// Senders park here when a bounded channel is full.
  pub(crate) space_cond: Condvar,
  /// Receivers park here when the channel is empty and senders remain.
  pub(crate) item_cond: Condvar,
  /// `join` callers park here while `pending_tasks > 0`.
  pub(crate) join_cond: Condvar,
  /// Maximum number of buffered items. `0` means unbounded.
  pub(crate) capacity: usize,
}

impl<T: Send> Shared<T> {
  /// Creates a new shared core with a given capacity. `0` signifies an
  /// unbounded channel.
  pub(crate) fn new(capacity: usize) -> Self {
    Shared {
      internal: Mutex::new(ChannelInternal {
        queue: VecDeque::with_capacity(if capacity == 0 { 32 } else { capacity }),
        sender_count: 0,
        receiver_seen: false,
        pending_tasks: 0,
      }),
      space_cond: Condvar::new(),
      item_cond: Condvar::new(),
      join_cond: Condvar::new(),
      capacity,
    }
  }

  /// Registers a new sender handle.
  ///
  /// Refused once any receiver exists: receivers detect permanent closure by
  /// watching `sender_count` fall to zero, which is only sound if the count
  /// cannot rise again after they start observing.
  pub(crate) fn attach_sender(&self) -> Result<(), SenderCreateError> {
    let mut guard = self.internal.lock();
    if guard.receiver_seen {
      return Err(SenderCreateError);
    }
    guard.sender_count += 1;
    Ok(())
  }

  /// Registers a new receiver handle. Idempotent; never fails.
  pub(crate) fn attach_receiver(&self) {
    self.internal.lock().receiver_seen = true;
  }

  /// The non-blocking send path: append if the buffer has room, waking one
  /// parked receiver on success. An unbounded channel always has room.
  pub(crate) fn try_send_core(&self, item: T) -> Result<(), TrySendError<T>> {
    let mut guard = self.internal.lock();

    if self.capacity != 0 && guard.queue.len() >= self.capacity {
      return Err(TrySendError::Full(item));
    }

    guard.queue.push_back(item);
    self.item_cond.notify_one();
    Ok(())
  }

  /// The non-blocking receive path: pop the head if one exists, waking one
  /// parked sender. Distinguishes a temporarily empty channel (`Empty`) from
  /// a permanently closed one (`Closed`).
  pub(crate) fn try_recv_core(&self) -> Result<T, TryRecvError> {
    let mut guard = self.internal.lock();
    self.pop_locked(&mut guard)
  }

  /// Pop under an already held lock. Shared between the try path and the
  /// blocking loops in `sync_impl`, which must pop without releasing the
  /// lock they waited under.
  pub(crate) fn pop_locked(&self, guard: &mut ChannelInternal<T>) -> Result<T, TryRecvError> {
    match guard.queue.pop_front() {
      Some(item) => {
        guard.pending_tasks += 1;
        self.space_cond.notify_one();
        Ok(item)
      }
      None => {
        if guard.sender_count > 0 {
          Err(TryRecvError::Empty)
        } else {
          Err(TryRecvError::Closed)
        }
      }
    }
  }

  /// Detaches one sender. When the last sender goes away every parked
  /// receiver is woken so it can observe the `Closed` state; a single wake
  /// would strand all but one of an arbitrary number of blocked receivers.
  pub(crate) fn detach_sender(&self) {
    let mut guard = self.internal.lock();
    guard.sender_count -= 1;
    if guard.sender_count == 0 {
      log::trace!("last sender closed; waking all parked receivers");
      self.item_cond.notify_all();
    }
  }

  /// Marks one previously dequeued item as complete. Reaching zero releases
  /// every thread blocked in `join`.
  pub(crate) fn task_done(&self) -> Result<(), TaskDoneError> {
    let mut guard = self.internal.lock();
    if guard.pending_tasks == 0 {
      return Err(TaskDoneError);
    }
    guard.pending_tasks -= 1;
    if guard.pending_tasks == 0 {
      log::trace!("pending task count reached zero; releasing join waiters");
      self.join_cond.notify_all();
    }
    Ok(())
  }

  /// Blocks until every dequeued item has been marked complete. Returns
  /// immediately if nothing is pending. No timeout variant.
  pub(crate) fn join(&self) {
    let mut guard = self.internal.lock();
    while guard.pending_tasks > 0 {
      self.join_cond.wait(&mut guard);
    }
  }

  /// Point-in-time number of buffered items.
  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.internal.lock().queue.len()
  }

  /// Point-in-time fullness. Always `false` for unbounded channels.
  #[inline]
  pub(crate) fn is_full(&self) -> bool {
    self.capacity != 0 && self.len() >= self.capacity
  }
}

impl<T> Drop for Shared<T> {
  fn drop(&mut self) {
    // When the last Arc<Shared> is dropped (all handles gone), drain any
    // items still buffered so their Drop impls run. No waiters can exist at
    // this point, so no wakeups are needed.
    if let Some(mut guard) = self.internal.try_lock() {
      guard.queue.clear();
    }
  }
}
