//! 라우팅 결정 엔진
//!
//! 쿼리마다 어떤 역할의 연결을 사용할지 결정합니다.

use std::sync::Arc;

use super::context::ExecutionContext;
use super::error::ReplicaResult;
use super::registry::RoleRegistry;
use super::role::Role;

/// 프라이머리 강제 여부
///
/// 역할이 primary이거나, 열린 트랜잭션이 있고 트랜잭션을 무시하지 않으면 true.
/// 트랜잭션 안의 읽기는 같은 트랜잭션의 쓰기를 봐야 하므로 프라이머리로 보냅니다.
pub fn should_force_primary(role: &Role, open_tx_count: usize, ignore_transactions: bool) -> bool {
    role.is_primary() || (open_tx_count > 0 && !ignore_transactions)
}

/// 라우터
///
/// 역할 레지스트리를 공유하며, 실행 컨텍스트는 호출마다 전달받습니다.
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<RoleRegistry>,
}

impl Router {
    /// 레지스트리로 라우터 생성
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self { registry }
    }

    /// 역할 목록과 기본 역할로 라우터 생성
    pub fn with_roles<I, R>(roles: I, default_role: impl Into<Role>) -> ReplicaResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Ok(Self::new(Arc::new(RoleRegistry::new(roles, default_role)?)))
    }

    /// 레지스트리
    pub fn registry(&self) -> &Arc<RoleRegistry> {
        &self.registry
    }

    /// 현재 역할
    ///
    /// 오버라이드가 있으면 그 역할, 없으면 프로세스 기본 역할입니다.
    pub fn current_role(&self, ctx: &ExecutionContext) -> Role {
        ctx.override_role()
            .unwrap_or_else(|| self.registry.default_role())
    }

    /// 현재 역할이 `role`인지 확인
    pub fn is_reading_from(&self, ctx: &ExecutionContext, role: impl Into<Role>) -> ReplicaResult<bool> {
        let role = role.into();
        self.registry.assert_role(&role)?;
        Ok(self.current_role(ctx) == role)
    }

    /// 현재 역할이 primary인지 확인
    pub fn is_reading_from_primary(&self, ctx: &ExecutionContext) -> bool {
        self.current_role(ctx).is_primary()
    }

    /// 프라이머리 강제 여부 (트랜잭션 무시 값 명시)
    pub fn should_force_primary(
        &self,
        ctx: &ExecutionContext,
        open_tx_count: usize,
        ignore_transactions: bool,
    ) -> bool {
        should_force_primary(&self.current_role(ctx), open_tx_count, ignore_transactions)
    }

    /// 프라이머리 강제 여부 (레지스트리의 트랜잭션 무시 값 사용)
    pub fn must_use_primary(&self, ctx: &ExecutionContext, open_tx_count: usize) -> bool {
        self.should_force_primary(ctx, open_tx_count, self.registry.ignore_transactions())
    }

    /// 프로세스 기본 역할 변경
    pub fn set_default(&self, role: impl Into<Role>) -> ReplicaResult<()> {
        self.registry.set_default(role)
    }

    /// 프로세스 기본 역할을 primary로 변경
    pub fn read_from_primary_default(&self) -> ReplicaResult<()> {
        self.registry.set_default(Role::primary())
    }

    /// 트랜잭션 무시 여부
    pub fn ignore_transactions(&self) -> bool {
        self.registry.ignore_transactions()
    }

    /// 트랜잭션 무시 설정
    pub fn set_ignore_transactions(&self, ignore: bool) {
        self.registry.set_ignore_transactions(ignore);
    }
}
