//! # Zeta4G Replica
//!
//! Read replica routing for database connections: reads go to a replica,
//! writes and transactional reads stay on the primary.
//!
//! ## Features
//!
//! - **Role Routing** - Every read resolves to the scoped override role or the process default
//! - **Read-Your-Writes** - Reads inside an open transaction are forced to the primary
//! - **Scoped Overrides** - `read_from` / `read_from_primary` (and their `_async` forms) restore the previous role on every exit path
//! - **Transaction Guards** - Block or skip BEGIN/COMMIT/SAVEPOINT while pinned to a replica
//! - **Async Dispatch** - `QueryRouter` wraps any connection implementing [`QueryConnection`]
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! zeta4g-replica = "0.1"
//! ```
//!
//! ## Basic Usage
//!
//! ```rust
//! use zeta4g_replica::{ExecutionContext, ReplicaConfig};
//!
//! # fn main() -> Result<(), zeta4g_replica::ReplicaError> {
//! let router = ReplicaConfig::builder("slave")
//!     .with_roles(["slave", "slow_slave"])
//!     .build()
//!     .install()?;
//!
//! let ctx = ExecutionContext::new();
//! assert_eq!(router.current_role(&ctx), "slave");
//!
//! // Only this block reads from the slow replica
//! let role = router.read_from(&ctx, "slow_slave", || router.current_role(&ctx))?;
//! assert_eq!(role, "slow_slave");
//! assert_eq!(router.current_role(&ctx), "slave");
//! # Ok(())
//! # }
//! ```
//!
//! ## Transactions
//!
//! Reads inside an open transaction go to the primary so they observe the
//! transaction's own writes:
//!
//! ```rust
//! # use zeta4g_replica::{ExecutionContext, ReplicaConfig};
//! # let router = ReplicaConfig::builder("replica").with_role("replica").build().install().unwrap();
//! let ctx = ExecutionContext::new();
//!
//! assert!(!router.must_use_primary(&ctx, 0));
//! assert!(router.must_use_primary(&ctx, 1));
//!
//! // Escape hatch for applications that never write inside transactions
//! router.set_ignore_transactions(true);
//! assert!(!router.must_use_primary(&ctx, 1));
//! ```
//!
//! ## Transaction Guards
//!
//! ```rust
//! # use zeta4g_replica::{ExecutionContext, LifecycleOp, ReplicaConfig, ReplicaError, TransactionGuard};
//! # let router = ReplicaConfig::builder("replica").with_role("replica").build().install().unwrap();
//! let ctx = ExecutionContext::new();
//!
//! router.block_transactions(&ctx, || {
//!     let result = TransactionGuard::new(&ctx).run(LifecycleOp::Begin, || Ok(()));
//!     assert_eq!(result, Err(ReplicaError::TransactionAttempted(LifecycleOp::Begin)));
//! });
//! ```
//!
//! ## Query Dispatch
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use zeta4g_replica::{ExecutionContext, QueryConnection, QueryRouter, ReplicaConfig, StaticResolver};
//! # async fn example<C: QueryConnection>(primary: Arc<C>, replica: Arc<C>) -> Result<(), zeta4g_replica::ReplicaError> {
//! let config = ReplicaConfig::builder("replica").with_role("replica").build();
//! let resolver = StaticResolver::new().with_connection("replica", replica);
//! let router = QueryRouter::install(&config, resolver, primary)?;
//!
//! // Bind a context to this task so concurrent tasks never share overrides
//! let ctx = Arc::new(ExecutionContext::new());
//! let rows = ExecutionContext::scope(ctx, async {
//!     let ctx = ExecutionContext::current();
//!     router.select_all(&ctx, "SELECT * FROM users", Some("User Load")).await
//! })
//! .await?;
//!
//! // Async scopes keep the override and guard mode across `.await`
//! let ctx = ExecutionContext::new();
//! let begin = router
//!     .router()
//!     .block_transactions_async(&ctx, router.begin_db_transaction(&ctx))
//!     .await;
//! assert!(begin.is_err());
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`replica`] - Routing core, scoped overrides, transaction guards and dispatch

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod replica;

// Re-exports for convenience
pub use replica::{
    install, should_force_primary,
    ExecutionContext, ReplicaConfig, ReplicaConfigBuilder,
    ReplicaError, ReplicaResult,
    Role, RoleRegistry, Router,
    LifecycleOp, TransactionGuard, TransactionGuardMode,
};

pub use replica::dispatch::{
    ConnectionResolver, QueryConnection, QueryRouter, SelectMethod, StaticResolver,
};
