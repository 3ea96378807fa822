//! Replica Module
//!
//! 레플리카 읽기 라우팅 코어
//!
//! # 구성
//!
//! - 실행 컨텍스트: 실행 단위별 오버라이드 역할과 트랜잭션 가드 모드
//! - 역할 레지스트리: 유효한 역할 집합과 프로세스 기본 역할
//! - 라우팅 결정 엔진: 쿼리마다 사용할 역할과 프라이머리 강제 여부
//! - 트랜잭션 가드: 라이프사이클 호출 차단/무시
//! - 스코프 오버라이드: 블록 동안 역할 강제, 모든 종료 경로에서 복원
//!
//! # Example
//!
//! ```ignore
//! use zeta4g_replica::replica::{ExecutionContext, ReplicaConfig};
//!
//! let router = ReplicaConfig::builder("replica")
//!     .with_role("replica")
//!     .build()
//!     .install()?;
//!
//! let ctx = ExecutionContext::current();
//!
//! // 기본 역할 (replica)
//! assert_eq!(router.current_role(&ctx), "replica");
//!
//! // 블록 동안 프라이머리에서 읽기
//! router.read_from_primary(&ctx, || {
//!     assert!(router.is_reading_from_primary(&ctx));
//! })?;
//!
//! // 레플리카 전용 구간에서 트랜잭션 차단
//! router.block_transactions(&ctx, || {
//!     assert!(router.is_blocking_transactions(&ctx));
//! });
//! ```

pub mod dispatch;
mod config;
mod context;
mod error;
mod guard;
mod registry;
mod role;
mod routing;
mod scope;

// Re-exports
pub use config::{install, ReplicaConfig, ReplicaConfigBuilder};
pub use context::ExecutionContext;
pub use error::{ReplicaError, ReplicaResult};
pub use guard::{GuardDecision, LifecycleOp, TransactionGuard, TransactionGuardMode};
pub use registry::RoleRegistry;
pub use role::{Role, PRIMARY};
pub use routing::{should_force_primary, Router};
pub use scope::{enter_guard_mode, ContextGuard, GuardModeOverride, RoleOverride};
