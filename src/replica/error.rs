//! Replica Error Types
//!
//! 레플리카 라우팅 에러 정의

use thiserror::Error;

use super::guard::LifecycleOp;
use super::role::Role;

// ============================================================================
// ReplicaError - 라우팅 에러
// ============================================================================

/// 레플리카 라우팅 에러
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplicaError {
    /// 등록되지 않은 역할
    #[error("Undefined role: {0}")]
    UnknownRole(Role),

    /// 역할 집합에 없는 기본 역할
    #[error("Invalid default role: {0} is not a registered role")]
    InvalidDefault(Role),

    /// 트랜잭션 차단 중 라이프사이클 호출
    #[error("{}", .0.rejection_message())]
    TransactionAttempted(LifecycleOp),

    /// 역할에 대한 연결 없음
    #[error("Connection unavailable for role {role}: {message}")]
    ConnectionUnavailable { role: Role, message: String },

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 쿼리 실행 에러 (연결 측에서 발생)
    #[error("Query error: {0}")]
    Query(String),
}

impl ReplicaError {
    /// 알 수 없는 역할 에러 생성
    pub fn unknown_role(role: impl Into<Role>) -> Self {
        Self::UnknownRole(role.into())
    }

    /// 연결 불가 에러 생성
    pub fn connection_unavailable(role: impl Into<Role>, message: impl Into<String>) -> Self {
        Self::ConnectionUnavailable {
            role: role.into(),
            message: message.into(),
        }
    }

    /// 설정 에러 생성
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 쿼리 에러 생성
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// 재시도 가능 여부
    ///
    /// 코어는 재시도하지 않습니다. 호출자 판단용입니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable { .. })
    }

    /// 설정 오류 여부
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownRole(_) | Self::InvalidDefault(_) | Self::Configuration(_)
        )
    }
}

// ============================================================================
// Result Type
// ============================================================================

/// 라우팅 결과 타입
pub type ReplicaResult<T> = Result<T, ReplicaError>;

// ============================================================================
// Tests
// ============================================================================
