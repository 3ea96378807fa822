//! 연결 인터페이스
//!
//! 코어는 연결을 만들지 않습니다. 호스트 데이터 접근 계층이 아래 트레이트를
//! 구현해 실행 기능과 역할별 연결 조회를 제공합니다.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::replica::error::{ReplicaError, ReplicaResult};
use crate::replica::role::Role;

/// 이름이 없는 쿼리의 진단 이름
pub const DEFAULT_QUERY_NAME: &str = "SQL";

// ============================================================================
// SelectMethod - 읽기 메서드
// ============================================================================

/// 읽기 메서드 종류
///
/// 모두 같은 방식으로 라우팅됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectMethod {
    /// 원시 결과
    Select,
    /// 전체 행
    SelectAll,
    /// 첫 행
    SelectOne,
    /// 행 배열
    SelectRows,
    /// 단일 값
    SelectValue,
    /// 첫 컬럼 값 목록
    SelectValues,
}

impl SelectMethod {
    /// 메서드 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::SelectAll => "select_all",
            Self::SelectOne => "select_one",
            Self::SelectRows => "select_rows",
            Self::SelectValue => "select_value",
            Self::SelectValues => "select_values",
        }
    }
}

impl fmt::Display for SelectMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// QueryConnection - 쿼리 연결
// ============================================================================

/// 한 역할의 데이터베이스에 대한 실행 연결
pub trait QueryConnection: Send + Sync {
    /// 읽기 결과 타입
    type Rows: Send;

    /// 읽기 실행
    fn select(
        &self,
        method: SelectMethod,
        sql: &str,
        name: &str,
    ) -> impl Future<Output = ReplicaResult<Self::Rows>> + Send;

    /// 쓰기 실행, 영향받은 행 수 반환
    fn execute(&self, sql: &str, name: &str) -> impl Future<Output = ReplicaResult<u64>> + Send;

    /// 열린 트랜잭션 깊이
    fn open_transactions(&self) -> usize;

    /// 트랜잭션 시작
    fn begin_db_transaction(&self) -> impl Future<Output = ReplicaResult<()>> + Send;

    /// 트랜잭션 커밋
    fn commit_db_transaction(&self) -> impl Future<Output = ReplicaResult<()>> + Send;

    /// 세이브포인트 생성
    fn create_savepoint(&self, name: &str) -> impl Future<Output = ReplicaResult<()>> + Send;

    /// 세이브포인트로 롤백
    fn rollback_to_savepoint(&self, name: &str) -> impl Future<Output = ReplicaResult<()>> + Send;

    /// 세이브포인트 해제
    fn release_savepoint(&self, name: &str) -> impl Future<Output = ReplicaResult<()>> + Send;
}

// ============================================================================
// ConnectionResolver - 연결 조회
// ============================================================================

/// 역할별 연결 조회
pub trait ConnectionResolver: Send + Sync {
    /// 연결 타입
    type Connection: QueryConnection;

    /// 역할의 연결 조회
    ///
    /// 연결이 없으면 `UnknownRole` 또는 `ConnectionUnavailable`로 실패해야 합니다.
    fn resolve(&self, role: &Role) -> ReplicaResult<Arc<Self::Connection>>;
}

/// 역할별 연결 맵 기반 조회기
pub struct StaticResolver<C> {
    connections: RwLock<HashMap<Role, Arc<C>>>,
}

impl<C> StaticResolver<C> {
    /// 빈 조회기 생성
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// 연결 등록
    pub fn with_connection(self, role: impl Into<Role>, connection: Arc<C>) -> Self {
        self.insert(role, connection);
        self
    }

    /// 연결 등록 (기존 연결 교체)
    pub fn insert(&self, role: impl Into<Role>, connection: Arc<C>) -> Option<Arc<C>> {
        self.connections.write().insert(role.into(), connection)
    }

    /// 연결 제거
    pub fn remove(&self, role: &Role) -> Option<Arc<C>> {
        self.connections.write().remove(role)
    }

    /// 등록된 역할 수
    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    /// 비어 있는지 확인
    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }
}

impl<C> Default for StaticResolver<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for StaticResolver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut roles: Vec<Role> = self.connections.read().keys().cloned().collect();
        roles.sort();
        f.debug_struct("StaticResolver").field("roles", &roles).finish()
    }
}

impl<C: QueryConnection> ConnectionResolver for StaticResolver<C> {
    type Connection = C;

    fn resolve(&self, role: &Role) -> ReplicaResult<Arc<C>> {
        self.connections.read().get(role).cloned().ok_or_else(|| {
            ReplicaError::connection_unavailable(role.clone(), "no connection established")
        })
    }
}
