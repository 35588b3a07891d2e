//! Lazy iteration over store keys.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use stones_storage::{Namespace, StorageEngine, Transaction};

use crate::error::Result;

/// Number of keys fetched per batch.
const KEY_BATCH: usize = 1000;

/// A lazy iterator over the keys of one namespace, in ascending byte order.
///
/// Holds a single read transaction for as long as it lives, so every key
/// comes from the same snapshot. Writes made after the iterator was created
/// are not observed. Keys are fetched in batches; only the current batch is
/// kept in memory.
///
/// Returned by [`Store::iter`](crate::Store::iter).
pub struct Keys<'e, E: StorageEngine + 'e> {
    tx: E::Transaction<'e>,
    namespace: Namespace,
    buffer: VecDeque<Vec<u8>>,
    last: Option<Vec<u8>>,
    exhausted: bool,
}

impl<'e, E: StorageEngine + 'e> Keys<'e, E> {
    pub(crate) fn new(tx: E::Transaction<'e>, namespace: Namespace) -> Self {
        Self { tx, namespace, buffer: VecDeque::new(), last: None, exhausted: false }
    }

    /// Fill the buffer with the keys following the last one handed out.
    fn refill(&mut self) -> Result<()> {
        let batch = self.tx.keys_after(&self.namespace, self.last.as_deref(), KEY_BATCH)?;
        if batch.len() < KEY_BATCH {
            self.exhausted = true;
        }
        self.buffer.extend(batch);
        Ok(())
    }
}

impl<'e, E: StorageEngine + 'e> Iterator for Keys<'e, E> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(err) = self.refill() {
                self.exhausted = true;
                return Some(Err(err));
            }
        }
        let key = self.buffer.pop_front()?;
        self.last = Some(key.clone());
        Some(Ok(key))
    }
}

impl<'e, E: StorageEngine + 'e> FusedIterator for Keys<'e, E> {}

impl<'e, E: StorageEngine + 'e> std::fmt::Debug for Keys<'e, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keys")
            .field("namespace", &self.namespace)
            .field("buffered", &self.buffer.len())
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use stones_storage::backends::redb::RedbEngine;

    use super::*;
    use crate::scope::write_scope;

    fn engine_with_keys(count: usize) -> (RedbEngine, Namespace) {
        let engine = RedbEngine::in_memory().unwrap();
        let ns = engine.open_namespace(Some("keys")).unwrap();
        write_scope(&engine, |tx| {
            for i in 0..count {
                tx.put(&ns, format!("key{i:05}").as_bytes(), b"v", false)?;
            }
            Ok(())
        })
        .unwrap();
        (engine, ns)
    }

    #[test]
    fn yields_keys_in_order_across_batches() {
        let (engine, ns) = engine_with_keys(KEY_BATCH * 2 + 17);
        let keys: Vec<Vec<u8>> =
            Keys::<RedbEngine>::new(engine.begin_read().unwrap(), ns).map(|k| k.unwrap()).collect();

        assert_eq!(keys.len(), KEY_BATCH * 2 + 17);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys[0], b"key00000");
    }

    #[test]
    fn exact_batch_multiple_ends_cleanly() {
        let (engine, ns) = engine_with_keys(KEY_BATCH);
        let keys: Vec<Vec<u8>> =
            Keys::<RedbEngine>::new(engine.begin_read().unwrap(), ns).map(|k| k.unwrap()).collect();
        assert_eq!(keys.len(), KEY_BATCH);
        assert_eq!(keys.last().unwrap(), format!("key{:05}", KEY_BATCH - 1).as_bytes());
    }

    #[test]
    fn reads_keys_through_a_write_transaction() {
        let (engine, ns) = engine_with_keys(3);
        let keys: Vec<Vec<u8>> = Keys::<RedbEngine>::new(engine.begin_write().unwrap(), ns)
            .map(|k| k.unwrap())
            .collect();
        assert_eq!(keys, vec![b"key00000".to_vec(), b"key00001".to_vec(), b"key00002".to_vec()]);
    }

    #[test]
    fn empty_namespace_yields_nothing() {
        let (engine, ns) = engine_with_keys(0);
        let mut keys = Keys::<RedbEngine>::new(engine.begin_read().unwrap(), ns);
        assert!(keys.next().is_none());
        assert!(keys.next().is_none());
    }

    #[test]
    fn iterates_a_snapshot() {
        let (engine, ns) = engine_with_keys(3);
        let mut keys = Keys::<RedbEngine>::new(engine.begin_read().unwrap(), ns.clone());
        assert_eq!(keys.next().unwrap().unwrap(), b"key00000");

        write_scope(&engine, |tx| Ok(tx.put(&ns, b"key00001a", b"v", false)?)).unwrap();

        let rest: Vec<Vec<u8>> = keys.map(|k| k.unwrap()).collect();
        assert_eq!(rest, vec![b"key00001".to_vec(), b"key00002".to_vec()]);
    }

    #[test]
    fn missing_namespace_surfaces_once() {
        let engine = RedbEngine::in_memory().unwrap();
        let ns = Namespace::named("never_created").unwrap();
        let mut keys = Keys::<RedbEngine>::new(engine.begin_read().unwrap(), ns);
        assert!(keys.next().unwrap().is_err());
        assert!(keys.next().is_none());
    }
}
