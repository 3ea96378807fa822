//! 쿼리 라우터
//!
//! 바인딩된(프라이머리) 연결을 감싸서 읽기는 라우팅 결정에 따라 보내고,
//! 트랜잭션 라이프사이클 호출은 트랜잭션 가드를 거쳐 위임합니다.

use std::fmt;
use std::sync::Arc;

use crate::replica::config::ReplicaConfig;
use crate::replica::context::ExecutionContext;
use crate::replica::error::ReplicaResult;
use crate::replica::guard::{LifecycleOp, TransactionGuard};
use crate::replica::role::Role;
use crate::replica::routing::Router;

use super::connection::{ConnectionResolver, QueryConnection, SelectMethod, DEFAULT_QUERY_NAME};

/// 레플리카 진단 이름
pub fn replica_query_name(role: &Role, name: Option<&str>) -> String {
    format!("Replica({}): {}", role, name.unwrap_or(DEFAULT_QUERY_NAME))
}

/// 쿼리 라우터
pub struct QueryRouter<R: ConnectionResolver> {
    /// 라우팅 결정
    router: Router,
    /// 역할별 연결 조회
    resolver: R,
    /// 현재 바인딩된 연결 (쓰기와 트랜잭션이 실행되는 곳)
    bound: Arc<R::Connection>,
    /// 읽기 라우팅 활성화
    replica_routing: bool,
}

impl<R: ConnectionResolver> QueryRouter<R> {
    /// 새 라우터 생성
    pub fn new(router: Router, resolver: R, bound: Arc<R::Connection>) -> Self {
        Self {
            router,
            resolver,
            bound,
            replica_routing: true,
        }
    }

    /// 설정으로 라우터 설치
    pub fn install(config: &ReplicaConfig, resolver: R, bound: Arc<R::Connection>) -> ReplicaResult<Self> {
        let router = config.install()?;
        Ok(Self::new(router, resolver, bound).with_replica_routing(config.extend_primary))
    }

    /// 같은 레지스트리에 설정 재등록
    ///
    /// 이 라우터의 [`Router`]를 공유하는 모든 곳에 반영됩니다.
    pub fn reconfigure(&mut self, config: &ReplicaConfig) -> ReplicaResult<()> {
        self.router.reconfigure(config)?;
        self.replica_routing = config.extend_primary;
        Ok(())
    }

    /// 읽기 라우팅 활성화 설정
    ///
    /// 비활성화하면 모든 읽기가 바인딩된 연결에서 실행됩니다.
    pub fn with_replica_routing(mut self, enabled: bool) -> Self {
        self.replica_routing = enabled;
        self
    }

    /// 라우팅 결정 엔진
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// 바인딩된 연결
    pub fn bound(&self) -> &Arc<R::Connection> {
        &self.bound
    }

    /// 이 컨텍스트의 다음 읽기가 프라이머리로 가는지 확인
    pub fn reads_from_primary(&self, ctx: &ExecutionContext) -> bool {
        !self.replica_routing || self.router.must_use_primary(ctx, self.bound.open_transactions())
    }

    /// 읽기 실행
    ///
    /// 프라이머리가 강제되면 바인딩된 연결에서 그대로 실행합니다. 아니면
    /// 현재 역할로 오버라이드를 고정한 채 그 역할의 연결에서 실행합니다.
    /// 레플리카 연결 실패는 프라이머리로 대체하지 않고 그대로 반환합니다.
    pub async fn select(
        &self,
        ctx: &ExecutionContext,
        method: SelectMethod,
        sql: &str,
        name: Option<&str>,
    ) -> ReplicaResult<<R::Connection as QueryConnection>::Rows> {
        if self.reads_from_primary(ctx) {
            return self
                .bound
                .select(method, sql, name.unwrap_or(DEFAULT_QUERY_NAME))
                .await;
        }

        let role = self.router.current_role(ctx);
        let _override = self.router.override_role(ctx, role.clone())?;
        let connection = self.resolver.resolve(&role)?;
        let name = replica_query_name(&role, name);

        tracing::debug!(role = %role, method = %method, name = %name, "routing read to replica");
        connection.select(method, sql, &name).await
    }

    /// 전체 행 읽기
    pub async fn select_all(
        &self,
        ctx: &ExecutionContext,
        sql: &str,
        name: Option<&str>,
    ) -> ReplicaResult<<R::Connection as QueryConnection>::Rows> {
        self.select(ctx, SelectMethod::SelectAll, sql, name).await
    }

    /// 단일 값 읽기
    pub async fn select_value(
        &self,
        ctx: &ExecutionContext,
        sql: &str,
        name: Option<&str>,
    ) -> ReplicaResult<<R::Connection as QueryConnection>::Rows> {
        self.select(ctx, SelectMethod::SelectValue, sql, name).await
    }

    /// 쓰기 실행
    ///
    /// 쓰기는 라우팅하지 않고 항상 바인딩된 연결에서 실행합니다.
    pub async fn execute(&self, sql: &str, name: Option<&str>) -> ReplicaResult<u64> {
        self.bound.execute(sql, name.unwrap_or(DEFAULT_QUERY_NAME)).await
    }

    /// 트랜잭션 시작
    pub async fn begin_db_transaction(&self, ctx: &ExecutionContext) -> ReplicaResult<()> {
        TransactionGuard::new(ctx)
            .run_async(LifecycleOp::Begin, || self.bound.begin_db_transaction())
            .await
    }

    /// 트랜잭션 커밋
    pub async fn commit_db_transaction(&self, ctx: &ExecutionContext) -> ReplicaResult<()> {
        TransactionGuard::new(ctx)
            .run_async(LifecycleOp::Commit, || self.bound.commit_db_transaction())
            .await
    }

    /// 세이브포인트 생성
    pub async fn create_savepoint(&self, ctx: &ExecutionContext, name: &str) -> ReplicaResult<()> {
        TransactionGuard::new(ctx)
            .run_async(LifecycleOp::CreateSavepoint, || self.bound.create_savepoint(name))
            .await
    }

    /// 세이브포인트로 롤백
    pub async fn rollback_to_savepoint(&self, ctx: &ExecutionContext, name: &str) -> ReplicaResult<()> {
        TransactionGuard::new(ctx)
            .run_async(LifecycleOp::RollbackToSavepoint, || {
                self.bound.rollback_to_savepoint(name)
            })
            .await
    }

    /// 세이브포인트 해제
    pub async fn release_savepoint(&self, ctx: &ExecutionContext, name: &str) -> ReplicaResult<()> {
        TransactionGuard::new(ctx)
            .run_async(LifecycleOp::ReleaseSavepoint, || self.bound.release_savepoint(name))
            .await
    }
}

impl<R> fmt::Debug for QueryRouter<R>
where
    R: ConnectionResolver + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryRouter")
            .field("router", &self.router)
            .field("resolver", &self.resolver)
            .field("replica_routing", &self.replica_routing)
            .finish()
    }
}
