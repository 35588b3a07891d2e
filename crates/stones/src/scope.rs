//! Per-operation transaction scopes.
//!
//! Every store operation runs inside exactly one scope. A scope begins an
//! engine transaction, hands it to a closure, and always finishes it: read
//! scopes release their snapshot on every path, write scopes commit when the
//! closure returns `Ok` and abort when it returns `Err`. A write transaction
//! dropped while unwinding from a panic is aborted by the engine.

use stones_storage::{StorageEngine, Transaction};
use tracing::warn;

use crate::error::Result;

/// Run `body` against a fresh read transaction.
pub(crate) fn read_scope<'e, E, T>(
    engine: &'e E,
    body: impl FnOnce(&E::Transaction<'e>) -> Result<T>,
) -> Result<T>
where
    E: StorageEngine + 'e,
{
    let tx = engine.begin_read()?;
    let result = body(&tx);
    drop(tx);
    result
}

/// Run `body` against a fresh write transaction.
///
/// Commits on success. On failure the transaction is rolled back and the
/// body's error is returned; a failed rollback is logged, not reported.
pub(crate) fn write_scope<'e, E, T>(
    engine: &'e E,
    body: impl FnOnce(&mut E::Transaction<'e>) -> Result<T>,
) -> Result<T>
where
    E: StorageEngine + 'e,
{
    let mut tx = engine.begin_write()?;
    match body(&mut tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "aborting write transaction");
            if let Err(abort) = tx.rollback() {
                warn!(error = %abort, "failed to abort write transaction");
            }
            Err(err)
        }
    }
}
