//! Unit of work spanning several stores.
//!
//! # Invariants
//! - One scope owns exactly one SQLite transaction.
//! - The transaction ends exactly once: `commit`, `rollback`, or rollback on
//!   drop (early return, dropped caller, unwinding).
//! - Stores receive `&WriteScope` and can only run statements through it;
//!   they cannot commit, roll back or start another transaction.

use super::error::{write_error, Entity, StoreResult};
use rusqlite::{Connection, Transaction, TransactionBehavior};

pub struct WriteScope<'conn> {
    tx: Transaction<'conn>,
    entity: Entity,
}

impl<'conn> WriteScope<'conn> {
    /// Begins an immediate transaction on `conn`.
    ///
    /// Fails when `conn` already has an open transaction, so scopes never
    /// nest.
    pub fn begin(conn: &'conn Connection, entity: Entity) -> StoreResult<Self> {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
            .map_err(write_error(entity, "begin"))?;
        Ok(Self { tx, entity })
    }

    pub fn commit(self) -> StoreResult<()> {
        let entity = self.entity;
        self.tx.commit().map_err(write_error(entity, "commit"))
    }

    pub fn rollback(self) -> StoreResult<()> {
        let entity = self.entity;
        self.tx.rollback().map_err(write_error(entity, "rollback"))
    }

    pub(crate) fn executor(&self) -> &Connection {
        &self.tx
    }
}
