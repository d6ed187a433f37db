//! The blocking and deadline-bounded send/receive loops.
//!
//! Every loop here follows the same pattern: take the central lock, and while
//! the wait predicate holds, park on the matching condvar. Deadlines are
//! absolute `Instant`s computed once at entry; `Condvar::wait_until`
//! recomputes the remaining budget on every wake, so a spurious or stolen
//! wakeup costs a re-check, never a restarted timeout.

use super::core::Shared;
use crate::error::{RecvError, TryRecvError, TrySendError};

use std::time::{Duration, Instant};

/// Blocking send with no deadline. Parks on `space_cond` while a bounded
/// channel is full; an unbounded channel never waits. Cannot fail: space
/// eventually appears or the caller stays parked.
pub(crate) fn send_block<T: Send>(shared: &Shared<T>, item: T) {
  let mut guard = shared.internal.lock();
  if shared.capacity != 0 {
    while guard.queue.len() >= shared.capacity {
      shared.space_cond.wait(&mut guard);
    }
  }
  guard.queue.push_back(item);
  shared.item_cond.notify_one();
}

/// Blocking send bounded by a deadline. Expiry while the channel is still
/// full hands the item back as `Full`; the caller may retry.
pub(crate) fn send_deadline<T: Send>(
  shared: &Shared<T>,
  item: T,
  timeout: Duration,
) -> Result<(), TrySendError<T>> {
  let deadline = Instant::now() + timeout;
  let mut guard = shared.internal.lock();
  if shared.capacity != 0 {
    while guard.queue.len() >= shared.capacity {
      if shared.space_cond.wait_until(&mut guard, deadline).timed_out() {
        // The wake that timed us out may still have raced with a recv that
        // freed a slot; only fail if the channel is truly still full.
        if guard.queue.len() >= shared.capacity {
          return Err(TrySendError::Full(item));
        }
        break;
      }
    }
  }
  guard.queue.push_back(item);
  shared.item_cond.notify_one();
  Ok(())
}

/// Blocking receive with no deadline. Parks on `item_cond` while the channel
/// is empty and senders remain; fails with `Closed` exactly when the channel
/// is empty and the last sender has closed.
pub(crate) fn recv_block<T: Send>(shared: &Shared<T>) -> Result<T, RecvError> {
  let mut guard = shared.internal.lock();
  while guard.queue.is_empty() && guard.sender_count > 0 {
    shared.item_cond.wait(&mut guard);
  }
  match shared.pop_locked(&mut guard) {
    Ok(item) => Ok(item),
    Err(TryRecvError::Closed) => Err(RecvError::Closed),
    Err(TryRecvError::Empty) => {
      unreachable!("wait loop exits only with an item buffered or all senders closed")
    }
  }
}

/// Blocking receive bounded by a deadline. Expiry while empty with senders
/// remaining yields `Empty`; if the last sender closed in the meantime the
/// result is `Closed`.
pub(crate) fn recv_deadline<T: Send>(
  shared: &Shared<T>,
  timeout: Duration,
) -> Result<T, TryRecvError> {
  let deadline = Instant::now() + timeout;
  let mut guard = shared.internal.lock();
  while guard.queue.is_empty() && guard.sender_count > 0 {
    if shared.item_cond.wait_until(&mut guard, deadline).timed_out() {
      break;
    }
  }
  // An item may have landed in the same instant the wait expired; the pop
  // decides between success, Empty, and Closed under the lock.
  shared.pop_locked(&mut guard)
}
