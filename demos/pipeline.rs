//! A small work pipeline: several producers feed a bounded channel, several
//! workers drain it, and the main thread uses the join barrier to wait until
//! every item has been fully processed.
//!
//! Run with: `cargo run --example pipeline`

use strand::mpmc::Channel;
use std::thread;

fn main() {
  let chan = Channel::new(4);

  // Senders must all exist before the first receiver is created.
  let txs: Vec<_> = (0..2).map(|_| chan.sender().unwrap()).collect();

  let mut workers = Vec::new();
  for worker_id in 0..3 {
    let rx = chan.receiver();
    workers.push(thread::spawn(move || {
      for job in &rx {
        println!("worker {worker_id} processing job {job}");
        rx.task_done().unwrap();
      }
    }));
  }

  let mut producers = Vec::new();
  for (producer_id, tx) in txs.into_iter().enumerate() {
    producers.push(thread::spawn(move || {
      for i in 0..5 {
        let job = producer_id * 100 + i;
        tx.send(job).unwrap();
      }
      // tx drops here; its close runs exactly once.
    }));
  }

  for producer in producers {
    producer.join().unwrap();
  }

  // Wait until every dequeued job has been marked done.
  chan.join();
  println!("all jobs complete");

  for worker in workers {
    worker.join().unwrap();
  }
}
