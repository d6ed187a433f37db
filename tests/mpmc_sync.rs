mod common;
use common::*;

use strand::error::{CloseError, RecvError, TryRecvError, TrySendError};
use strand::mpmc::Channel;

use std::thread;

#[test]
fn send_receive_smoke() {
  let chan = Channel::unbounded();
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  tx.send(1).unwrap();
  assert_eq!(rx.recv(), Ok(1));
}

#[test]
fn fifo_across_two_receivers() {
  let chan = Channel::unbounded();
  let tx = chan.sender().unwrap();
  let rx_a = chan.receiver();
  let rx_b = chan.receiver();

  tx.send(1).unwrap();
  tx.send(2).unwrap();

  // One shared FIFO: whichever receiver pulls first gets the older item.
  assert_eq!(rx_a.recv(), Ok(1));
  assert_eq!(rx_b.recv(), Ok(2));
}

#[test]
fn try_recv_empty_while_senders_remain() {
  let chan = Channel::<u32>::unbounded();
  let _tx = chan.sender().unwrap();
  let rx = chan.receiver();

  assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn becomes_empty_after_drain() {
  let chan = Channel::unbounded();
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  tx.send(1).unwrap();
  assert_eq!(rx.recv(), Ok(1));
  assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn empty_becomes_closed_after_last_close() {
  let chan = Channel::<u32>::unbounded();
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

  tx.close().unwrap();

  // Same empty queue, but the state is now terminal.
  assert_eq!(rx.try_recv(), Err(TryRecvError::Closed));
}

#[test]
fn close_with_nothing_enqueued_is_closed_not_empty() {
  let chan = Channel::<u32>::unbounded();
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  drop(tx);
  assert_eq!(rx.try_recv(), Err(TryRecvError::Closed));
  assert_eq!(rx.recv(), Err(RecvError::Closed));
}

#[test]
fn buffered_items_survive_close() {
  let chan = Channel::unbounded();
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  tx.send(7).unwrap();
  tx.send(8).unwrap();
  drop(tx);

  // Draining: items already enqueued are still delivered after close.
  assert_eq!(rx.recv(), Ok(7));
  assert_eq!(rx.recv(), Ok(8));
  assert_eq!(rx.recv(), Err(RecvError::Closed));
}

#[test]
fn capacity_one_backpressure_cycle() {
  let chan = Channel::new(1);
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  tx.send(10).unwrap();
  assert_eq!(tx.try_send(11), Err(TrySendError::Full(11)));
  assert_eq!(rx.recv(), Ok(10));
  assert_eq!(tx.try_send(11), Ok(()));
}

#[test]
fn bounded_fills_exactly_to_capacity() {
  let cap = 4;
  let chan = Channel::new(cap);
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  for i in 0..cap {
    tx.try_send(i).unwrap();
  }
  assert!(chan.is_full());
  assert_eq!(tx.try_send(99), Err(TrySendError::Full(99)));

  assert_eq!(rx.recv(), Ok(0));
  assert!(!chan.is_full());
  tx.try_send(99).unwrap();
  assert_eq!(chan.len(), cap);
}

#[test]
fn unbounded_never_full() {
  let chan = Channel::unbounded();
  let tx = chan.sender().unwrap();

  for i in 0..ITEMS_HIGH {
    tx.try_send(i).unwrap();
  }
  assert!(!chan.is_full());
  assert_eq!(chan.len(), ITEMS_HIGH);
}

#[test]
fn sender_after_receiver_is_refused() {
  let chan = Channel::<u32>::unbounded();
  let _tx = chan.sender().unwrap();
  let _rx = chan.receiver();

  assert!(chan.sender().is_err());
}

#[test]
fn second_explicit_close_is_an_error() {
  let chan = Channel::<u32>::unbounded();
  let tx_a = chan.sender().unwrap();
  let tx_b = chan.sender().unwrap();
  let rx = chan.receiver();

  assert_eq!(tx_a.close(), Ok(()));
  assert_eq!(tx_a.close(), Err(CloseError));

  // The double close must not have eaten tx_b's slot.
  assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
  drop(tx_b);
  assert_eq!(rx.try_recv(), Err(TryRecvError::Closed));
}

#[test]
fn drop_after_explicit_close_does_not_double_close() {
  let chan = Channel::<u32>::unbounded();
  let tx_a = chan.sender().unwrap();
  let tx_b = chan.sender().unwrap();
  let rx = chan.receiver();

  tx_a.close().unwrap();
  drop(tx_a); // no second decrement

  assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
  tx_b.close().unwrap();
  assert_eq!(rx.try_recv(), Err(TryRecvError::Closed));
}

#[test]
fn send_on_closed_handle_fails() {
  let chan = Channel::unbounded();
  let tx = chan.sender().unwrap();

  tx.close().unwrap();
  assert!(tx.send(1).is_err());
  assert_eq!(tx.try_send(2), Err(TrySendError::Closed(2)));
}

#[test]
fn blocking_recv_woken_by_close() {
  let chan = Channel::<u32>::unbounded();
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  let handle = thread::spawn(move || rx.recv());

  thread::sleep(TINY_TIMEOUT);
  drop(tx);

  assert_eq!(handle.join().unwrap(), Err(RecvError::Closed));
}

#[test]
fn close_broadcast_wakes_every_parked_receiver() {
  let chan = Channel::<u32>::unbounded();
  let tx = chan.sender().unwrap();

  let mut handles = Vec::new();
  for _ in 0..8 {
    let rx = chan.receiver();
    handles.push(thread::spawn(move || rx.recv()));
  }

  thread::sleep(TINY_TIMEOUT);
  tx.close().unwrap();

  // A single notify would strand seven of these forever.
  for handle in handles {
    assert_eq!(handle.join().unwrap(), Err(RecvError::Closed));
  }
}

#[test]
fn blocking_send_unblocks_when_slot_frees() {
  let chan = Channel::new(1);
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  tx.send(1).unwrap();

  let handle = thread::spawn(move || {
    tx.send(2).unwrap(); // parks until the recv below
    2
  });

  thread::sleep(TINY_TIMEOUT);
  assert_eq!(rx.recv(), Ok(1));
  assert_eq!(handle.join().unwrap(), 2);
  assert_eq!(rx.recv(), Ok(2));
}

#[test]
fn iterator_ends_cleanly_on_close() {
  let chan = Channel::unbounded();
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  let producer = thread::spawn(move || {
    for i in 0..ITEMS_LOW {
      tx.send(i).unwrap();
    }
  });

  let got: Vec<usize> = rx.iter().collect();
  producer.join().unwrap();

  assert_eq!(got, (0..ITEMS_LOW).collect::<Vec<_>>());
}

#[test]
fn into_iterator_consumes_the_handle() {
  let chan = Channel::unbounded();
  let tx = chan.sender().unwrap();
  let rx = chan.receiver();

  tx.send(5).unwrap();
  drop(tx);

  let got: Vec<u32> = rx.into_iter().collect();
  assert_eq!(got, vec![5]);
}

#[test]
fn snapshots_report_point_in_time_state() {
  let chan = Channel::new(2);
  let tx = chan.sender().unwrap();

  assert!(chan.is_empty());
  assert_eq!(chan.capacity(), Some(2));
  tx.send(1).unwrap();
  assert_eq!(chan.len(), 1);
  assert!(!chan.is_empty());
  assert!(!chan.is_full());
  tx.send(2).unwrap();
  assert!(chan.is_full());

  let unbounded = Channel::<u32>::unbounded();
  assert_eq!(unbounded.capacity(), None);
  assert!(!unbounded.is_full());
}
