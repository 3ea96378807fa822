//! 스코프 오버라이드 컨트롤러
//!
//! 작업 블록 동안만 역할이나 트랜잭션 가드 모드를 강제합니다.
//! 가드는 진입 시 프레임을 쌓고 `Drop`에서 자신의 프레임만 제거하므로
//! 정상 반환, 에러, 패닉, 퓨처 취소 모두에서 복원이 보장됩니다.
//!
//! 퓨처를 감쌀 때는 `*_async` 형태를 사용합니다. 동기 형태에 퓨처를
//! 반환하는 클로저를 넘기면 퓨처는 스코프가 끝난 뒤에 실행됩니다.

use std::fmt;
use std::future::Future;

use super::context::{ExecutionContext, FrameExit, FrameId};
use super::error::ReplicaResult;
use super::guard::TransactionGuardMode;
use super::role::Role;
use super::routing::Router;

// ============================================================================
// ContextGuard - 스코프 복원 가드
// ============================================================================

/// 가드가 관리하는 컨텍스트 슬롯
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Override,
    GuardMode,
}

/// 스코프 복원 가드
///
/// 중첩 스코프가 스택처럼 동작합니다. 순서가 어긋난 종료에서도 다른
/// 스코프의 프레임은 건드리지 않습니다.
#[must_use = "the previous value is restored as soon as the guard is dropped"]
pub struct ContextGuard<'a> {
    ctx: &'a ExecutionContext,
    slot: Slot,
    /// `None`이면 진입 시 값이 같아서 아무것도 바꾸지 않음
    frame: Option<FrameId>,
}

/// 역할 오버라이드 가드
pub type RoleOverride<'a> = ContextGuard<'a>;

/// 트랜잭션 가드 모드 오버라이드 가드
pub type GuardModeOverride<'a> = ContextGuard<'a>;

impl ContextGuard<'_> {
    /// 상태를 바꾼 가드인지 여부
    pub fn is_active(&self) -> bool {
        self.frame.is_some()
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };

        let exit = match self.slot {
            Slot::Override => self.ctx.pop_override(frame),
            Slot::GuardMode => self.ctx.pop_guard_mode(frame),
        };

        match exit {
            FrameExit::Nested => {}
            FrameExit::OutOfOrder => tracing::warn!(
                slot = ?self.slot,
                "scope exited out of order; execution context is shared between concurrent work"
            ),
            FrameExit::Missing => tracing::debug!(slot = ?self.slot, "scope frame already reset"),
        }
    }
}

impl fmt::Debug for ContextGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextGuard")
            .field("slot", &self.slot)
            .field("active", &self.is_active())
            .finish()
    }
}

/// 가드 모드 진입
pub fn enter_guard_mode(ctx: &ExecutionContext, mode: TransactionGuardMode) -> GuardModeOverride<'_> {
    let frame = if ctx.guard_mode() == mode {
        None
    } else {
        Some(ctx.push_guard_mode(mode))
    };

    ContextGuard {
        ctx,
        slot: Slot::GuardMode,
        frame,
    }
}

// ============================================================================
// Router - 스코프 API
// ============================================================================

impl Router {
    /// 역할 오버라이드 진입
    ///
    /// 등록되지 않은 역할이면 상태를 바꾸기 전에 실패합니다.
    pub fn override_role<'a>(
        &self,
        ctx: &'a ExecutionContext,
        role: impl Into<Role>,
    ) -> ReplicaResult<RoleOverride<'a>> {
        let role = role.into();
        self.registry().assert_role(&role)?;

        let frame = if ctx.override_role().as_ref() == Some(&role) {
            None
        } else {
            Some(ctx.push_override(role))
        };

        Ok(ContextGuard {
            ctx,
            slot: Slot::Override,
            frame,
        })
    }

    /// `role`로 라우팅을 강제한 채 작업 실행
    pub fn with_role<T>(
        &self,
        ctx: &ExecutionContext,
        role: impl Into<Role>,
        work: impl FnOnce() -> T,
    ) -> ReplicaResult<T> {
        let _guard = self.override_role(ctx, role)?;
        Ok(work())
    }

    /// `role`로 라우팅을 강제한 채 퓨처 실행
    pub async fn with_role_async<F>(
        &self,
        ctx: &ExecutionContext,
        role: impl Into<Role>,
        work: F,
    ) -> ReplicaResult<F::Output>
    where
        F: Future,
    {
        let _guard = self.override_role(ctx, role)?;
        Ok(work.await)
    }

    /// 지정한 레플리카에서 읽기
    pub fn read_from<T>(
        &self,
        ctx: &ExecutionContext,
        role: impl Into<Role>,
        work: impl FnOnce() -> T,
    ) -> ReplicaResult<T> {
        self.with_role(ctx, role, work)
    }

    /// 지정한 레플리카에서 퓨처 실행
    pub async fn read_from_async<F>(
        &self,
        ctx: &ExecutionContext,
        role: impl Into<Role>,
        work: F,
    ) -> ReplicaResult<F::Output>
    where
        F: Future,
    {
        self.with_role_async(ctx, role, work).await
    }

    /// 프라이머리에서 읽기
    pub fn read_from_primary<T>(
        &self,
        ctx: &ExecutionContext,
        work: impl FnOnce() -> T,
    ) -> ReplicaResult<T> {
        self.with_role(ctx, Role::primary(), work)
    }

    /// 프라이머리에서 퓨처 실행
    pub async fn read_from_primary_async<F>(
        &self,
        ctx: &ExecutionContext,
        work: F,
    ) -> ReplicaResult<F::Output>
    where
        F: Future,
    {
        self.with_role_async(ctx, Role::primary(), work).await
    }

    /// 작업 동안 트랜잭션 시도를 에러로 처리
    pub fn block_transactions<T>(&self, ctx: &ExecutionContext, work: impl FnOnce() -> T) -> T {
        let _guard = enter_guard_mode(ctx, TransactionGuardMode::Block);
        work()
    }

    /// 퓨처 실행 동안 트랜잭션 시도를 에러로 처리
    pub async fn block_transactions_async<F>(&self, ctx: &ExecutionContext, work: F) -> F::Output
    where
        F: Future,
    {
        let _guard = enter_guard_mode(ctx, TransactionGuardMode::Block);
        work.await
    }

    /// 작업 동안 트랜잭션 시도를 무시
    ///
    /// 쓰기가 전혀 없다고 확신할 때만 사용합니다.
    pub fn skip_transactions<T>(&self, ctx: &ExecutionContext, work: impl FnOnce() -> T) -> T {
        let _guard = enter_guard_mode(ctx, TransactionGuardMode::Skip);
        work()
    }

    /// 퓨처 실행 동안 트랜잭션 시도를 무시
    pub async fn skip_transactions_async<F>(&self, ctx: &ExecutionContext, work: F) -> F::Output
    where
        F: Future,
    {
        let _guard = enter_guard_mode(ctx, TransactionGuardMode::Skip);
        work.await
    }

    /// 트랜잭션 차단 중인지 확인
    pub fn is_blocking_transactions(&self, ctx: &ExecutionContext) -> bool {
        ctx.guard_mode() == TransactionGuardMode::Block
    }

    /// 트랜잭션 무시 중인지 확인
    pub fn is_skipping_transactions(&self, ctx: &ExecutionContext) -> bool {
        ctx.guard_mode() == TransactionGuardMode::Skip
    }
}
