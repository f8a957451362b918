//! Result collection: an unordered stream of per-pair results consumed by
//! the single driver thread.

use anyhow::{Result, bail};
use crossbeam_channel::Receiver;

use crate::types::PairResult;

/// Receiving side of the result channel plus the count of results still
/// owed. Workers push in completion order, which is unspecified; the
/// driver drains until nothing remains.
pub struct ResultStream {
    rx: Receiver<PairResult>,
    remaining: usize,
}

impl ResultStream {
    /// Wrap the result receiver for a run that submitted `submitted` work
    /// items.
    pub fn new(rx: Receiver<PairResult>, submitted: usize) -> Self {
        Self {
            rx,
            remaining: submitted,
        }
    }

    /// Work items submitted minus results delivered so far.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Block until the next result arrives. Errors only if the channel
    /// disconnects while results are still owed, which means a worker died
    /// without reporting.
    pub fn drain_next(&mut self) -> Result<PairResult> {
        if self.remaining == 0 {
            bail!("result stream already drained");
        }
        match self.rx.recv() {
            Ok(result) => {
                self.remaining -= 1;
                Ok(result)
            }
            Err(_) => bail!(
                "result stream closed with {} results outstanding (worker panicked?)",
                self.remaining
            ),
        }
    }
}
