//! Unit-of-work execution over one SQLite transaction.
//!
//! # Responsibility
//! - Persist a whole [`CatalogBatch`] inside a single transaction scope.
//! - Roll back everything on the first failure and report it once.
//!
//! # Invariants
//! - Entity steps run in declared order; wiring runs after its endpoints
//!   exist; commit runs last.
//! - The transaction is finished exactly once on every path (explicit
//!   commit/rollback, drop as the fallback when rollback itself fails).
//! - Failures are returned as values, never unwound past this boundary.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

use log::{debug, error, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use uuid::Uuid;

use crate::model::category::CategoryId;
use crate::model::product::ProductId;
use crate::repo::catalog_repo::{CatalogRepository, RepoError, SqliteCatalogRepository};
use crate::uow::batch::{BatchStep, CatalogBatch, CategoryHandle, ProductHandle};

/// Single catch-all failure kind for a unit-of-work run.
#[derive(Debug)]
pub enum UowError {
    /// Storage rejected a call inside the transactional scope.
    Persistence {
        phase: &'static str,
        source: RepoError,
    },
}

impl UowError {
    fn at(phase: &'static str, source: RepoError) -> Self {
        Self::Persistence { phase, source }
    }
}

impl Display for UowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence { phase, source } => write!(f, "{phase} failed: {source}"),
        }
    }
}

impl Error for UowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence { source, .. } => Some(source),
        }
    }
}

/// Identifiers assigned to a committed batch, addressable by handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Correlation id shared by all log events of this run.
    pub run_id: Uuid,
    category_ids: Vec<CategoryId>,
    product_ids: Vec<ProductId>,
}

impl BatchOutcome {
    /// Returns the id assigned to the category behind `handle`.
    pub fn category_id(&self, handle: CategoryHandle) -> Option<CategoryId> {
        self.category_ids.get(handle.0).copied()
    }

    /// Returns the id assigned to the product behind `handle`.
    pub fn product_id(&self, handle: ProductHandle) -> Option<ProductId> {
        self.product_ids.get(handle.0).copied()
    }
}

/// Runs one batch inside a single immediate transaction.
///
/// All entity saves and association writes either commit together or roll
/// back together. The first failure aborts the remaining steps; rollback is
/// attempted once and its own failure is logged without masking the
/// original error. The connection stays usable after either outcome.
pub fn run_batch(conn: &mut Connection, batch: &CatalogBatch) -> Result<BatchOutcome, UowError> {
    let run_id = Uuid::new_v4();
    let started_at = Instant::now();
    info!(
        "event=uow_run module=uow status=start run_id={run_id} steps={} links={} owners={}",
        batch.step_count(),
        batch.links().count(),
        batch.owners().count(),
    );

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|err| {
            let err = UowError::at("transaction begin", RepoError::from(err));
            error!("event=uow_run module=uow status=error run_id={run_id} error={err}");
            err
        })?;

    match populate_and_wire(&tx, batch, run_id) {
        Ok((category_ids, product_ids)) => {
            debug!("event=uow_commit module=uow status=start run_id={run_id}");
            match tx.commit() {
                Ok(()) => {
                    info!(
                        "event=uow_run module=uow status=ok run_id={run_id} duration_ms={}",
                        started_at.elapsed().as_millis()
                    );
                    Ok(BatchOutcome {
                        run_id,
                        category_ids,
                        product_ids,
                    })
                }
                Err(err) => {
                    // rusqlite rolls the scope back when commit fails.
                    let err = UowError::at("commit", RepoError::from(err));
                    error!("event=uow_run module=uow status=error run_id={run_id} error={err}");
                    Err(err)
                }
            }
        }
        Err(err) => {
            error!("event=uow_run module=uow status=error run_id={run_id} error={err}");
            roll_back(tx, run_id);
            Err(err)
        }
    }
}

fn populate_and_wire(
    tx: &Transaction<'_>,
    batch: &CatalogBatch,
    run_id: Uuid,
) -> Result<(Vec<CategoryId>, Vec<ProductId>), UowError> {
    let repo = SqliteCatalogRepository::try_new(tx)
        .map_err(|err| UowError::at("repository setup", err))?;

    let mut category_ids: Vec<CategoryId> = vec![0; batch.category_count()];
    let mut product_ids: Vec<ProductId> = vec![0; batch.product_count()];

    debug!("event=uow_populate module=uow status=start run_id={run_id}");
    for (position, step) in batch.steps().iter().enumerate() {
        match *step {
            BatchStep::Category(index) => {
                let id = repo
                    .insert_category(batch.category_draft(index))
                    .map_err(|err| UowError::at("save", err))?;
                category_ids[index] = id;
                debug!(
                    "event=uow_save module=uow status=ok run_id={run_id} step={position} kind=category id={id}"
                );
            }
            BatchStep::Product(index) => {
                let id = repo
                    .insert_product(batch.product_draft(index))
                    .map_err(|err| UowError::at("save", err))?;
                product_ids[index] = id;
                debug!(
                    "event=uow_save module=uow status=ok run_id={run_id} step={position} kind=product id={id}"
                );
            }
        }
    }

    debug!("event=uow_wire module=uow status=start run_id={run_id}");
    for (product, category) in batch.links() {
        repo.link_product_to_category(product_ids[product], category_ids[category])
            .map_err(|err| UowError::at("association wiring", err))?;
    }
    for (product, category) in batch.owners() {
        repo.set_product_owner(product_ids[product], category_ids[category])
            .map_err(|err| UowError::at("association wiring", err))?;
    }

    Ok((category_ids, product_ids))
}

fn roll_back(tx: Transaction<'_>, run_id: Uuid) {
    info!("event=uow_rollback module=uow status=start run_id={run_id}");
    match tx.rollback() {
        Ok(()) => info!("event=uow_rollback module=uow status=ok run_id={run_id}"),
        // The scope is still released: a failed rollback drops the
        // transaction, which finishes it.
        Err(err) => error!(
            "event=uow_rollback module=uow status=error run_id={run_id} error={err}"
        ),
    }
}
