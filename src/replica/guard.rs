//! 트랜잭션 가드
//!
//! 레플리카 전용 구간에서 트랜잭션 라이프사이클 호출을 차단하거나 무시합니다.
//!
//! 모든 읽기를 레플리카로 보내더라도 트랜잭션을 시작하면 BEGIN/COMMIT이
//! 프라이머리로 전송됩니다. `Block`은 이를 에러로 드러내고, `Skip`은
//! 수정할 수 없는 코드를 위해 조용히 흡수합니다.

use std::fmt;
use std::future::Future;

use super::context::ExecutionContext;
use super::error::{ReplicaError, ReplicaResult};

// ============================================================================
// TransactionGuardMode - 가드 모드
// ============================================================================

/// 트랜잭션 가드 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionGuardMode {
    /// 일반 트랜잭션 동작
    #[default]
    Normal,
    /// 트랜잭션 시도 시 에러
    Block,
    /// 트랜잭션 시도 무시
    Skip,
}

// ============================================================================
// LifecycleOp - 라이프사이클 연산
// ============================================================================

/// 트랜잭션 라이프사이클 연산
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleOp {
    /// 트랜잭션 시작
    Begin,
    /// 트랜잭션 커밋
    Commit,
    /// 세이브포인트 생성
    CreateSavepoint,
    /// 세이브포인트로 롤백
    RollbackToSavepoint,
    /// 세이브포인트 해제
    ReleaseSavepoint,
}

impl LifecycleOp {
    /// 전체 연산 목록
    pub const ALL: [LifecycleOp; 5] = [
        Self::Begin,
        Self::Commit,
        Self::CreateSavepoint,
        Self::RollbackToSavepoint,
        Self::ReleaseSavepoint,
    ];

    /// 연산 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Begin => "begin_db_transaction",
            Self::Commit => "commit_db_transaction",
            Self::CreateSavepoint => "create_savepoint",
            Self::RollbackToSavepoint => "rollback_to_savepoint",
            Self::ReleaseSavepoint => "release_savepoint",
        }
    }

    /// 차단 시 에러 메시지
    pub fn rejection_message(&self) -> &'static str {
        match self {
            Self::Begin => {
                "Attempting to begin a transaction during a read-only database connection."
            }
            Self::Commit => {
                "Attempting to commit a transaction during a read-only database connection."
            }
            Self::CreateSavepoint => {
                "Attempting to create a savepoint during a read-only database connection."
            }
            Self::RollbackToSavepoint => {
                "Attempting to rollback a savepoint during a read-only database connection."
            }
            Self::ReleaseSavepoint => {
                "Attempting to release a savepoint during a read-only database connection."
            }
        }
    }
}

impl fmt::Display for LifecycleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TransactionGuard - 트랜잭션 가드
// ============================================================================

/// 가드 판정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 실제 연산 실행
    Proceed,
    /// 실행하지 않고 반환
    Skip,
}

/// 트랜잭션 가드
///
/// 한 실행 컨텍스트의 가드 모드를 보고 라이프사이클 연산을 판정합니다.
#[derive(Debug, Clone, Copy)]
pub struct TransactionGuard<'a> {
    ctx: &'a ExecutionContext,
}

impl<'a> TransactionGuard<'a> {
    /// 컨텍스트에 대한 가드 생성
    pub fn new(ctx: &'a ExecutionContext) -> Self {
        Self { ctx }
    }

    /// 연산 판정
    ///
    /// Skip이 Block보다 우선합니다.
    pub fn check(&self, op: LifecycleOp) -> ReplicaResult<GuardDecision> {
        match self.ctx.guard_mode() {
            TransactionGuardMode::Skip => {
                tracing::trace!(op = %op, "skipping transaction lifecycle call");
                Ok(GuardDecision::Skip)
            }
            TransactionGuardMode::Block => {
                tracing::warn!(op = %op, "transaction attempted while transactions are blocked");
                Err(ReplicaError::TransactionAttempted(op))
            }
            TransactionGuardMode::Normal => Ok(GuardDecision::Proceed),
        }
    }

    /// 판정 후 실제 연산 실행
    pub fn run<F>(&self, op: LifecycleOp, real: F) -> ReplicaResult<()>
    where
        F: FnOnce() -> ReplicaResult<()>,
    {
        match self.check(op)? {
            GuardDecision::Skip => Ok(()),
            GuardDecision::Proceed => real(),
        }
    }

    /// 판정 후 실제 비동기 연산 실행
    pub async fn run_async<F, Fut>(&self, op: LifecycleOp, real: F) -> ReplicaResult<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ReplicaResult<()>>,
    {
        match self.check(op)? {
            GuardDecision::Skip => Ok(()),
            GuardDecision::Proceed => real().await,
        }
    }
}
