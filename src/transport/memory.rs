//! In-memory duplex link.
//!
//! Two [`MemoryLink`] ends share a pair of byte queues. Every byte written is
//! also appended to a per-end trace, so tests can assert on exactly what went
//! over the wire.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::{SerialLink, TransportError};

type Queue = Arc<Mutex<VecDeque<u8>>>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One end of an in-memory link.
#[derive(Debug, Clone)]
pub struct MemoryLink {
    inbox: Queue,
    outbox: Queue,
    trace: Arc<Mutex<Vec<u8>>>,
}

/// Create two connected ends.
pub fn memory_pair() -> (MemoryLink, MemoryLink) {
    let a_to_b = Queue::default();
    let b_to_a = Queue::default();
    let a = MemoryLink {
        inbox: b_to_a.clone(),
        outbox: a_to_b.clone(),
        trace: Arc::default(),
    };
    let b = MemoryLink {
        inbox: a_to_b,
        outbox: b_to_a,
        trace: Arc::default(),
    };
    (a, b)
}

impl MemoryLink {
    /// An end with nobody on the other side. Writes only reach the trace.
    pub fn detached() -> Self {
        Self {
            inbox: Queue::default(),
            outbox: Queue::default(),
            trace: Arc::default(),
        }
    }

    /// Queue bytes for reading on this end, as if the partner had sent them.
    pub fn inject(&self, bytes: &[u8]) {
        lock(&self.inbox).extend(bytes);
    }

    /// Everything written on this end so far.
    pub fn sent(&self) -> Vec<u8> {
        lock(&self.trace).clone()
    }

    /// Bytes written on this end that the partner has not read yet.
    pub fn in_flight(&self) -> usize {
        lock(&self.outbox).len()
    }
}

impl SerialLink for MemoryLink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        lock(&self.trace).extend_from_slice(bytes);
        lock(&self.outbox).extend(bytes);
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        Ok(lock(&self.inbox).len())
    }

    fn read_byte(&mut self) -> Option<u8> {
        lock(&self.inbox).pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pair_delivers_in_order() {
        let (mut a, mut b) = memory_pair();
        a.write_bytes(b"hi").unwrap();
        assert_eq!(b.bytes_available().unwrap(), 2);
        assert_eq!(b.read_byte(), Some(b'h'));
        assert_eq!(b.read_byte(), Some(b'i'));
        assert_eq!(b.read_byte(), None);
        assert_eq!(a.sent(), b"hi");
        assert!(b.sent().is_empty());
    }

    #[test]
    fn test_inject_and_discard() {
        let mut link = MemoryLink::detached();
        link.inject(b"garbage");
        assert_eq!(link.discard_pending().unwrap(), 7);
        assert_eq!(link.bytes_available().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_bytes_times_out() {
        let mut link = MemoryLink::detached();
        link.inject(b"A");
        let ready = link
            .wait_for_bytes(5, Some(Duration::from_millis(1000)))
            .await
            .unwrap();
        assert!(!ready);
        // The partial byte stays buffered.
        assert_eq!(link.bytes_available().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_bytes_sees_late_arrival() {
        let (mut a, b) = memory_pair();
        let writer = async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            let mut b = b;
            b.write_bytes(b"xyz").unwrap();
        };
        let (ready, ()) = tokio::join!(a.wait_for_bytes(3, Some(Duration::from_millis(1000))), writer);
        assert!(ready.unwrap());
    }
}
