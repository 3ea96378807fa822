//! 실행 컨텍스트
//!
//! 실행 단위(스레드 또는 태스크)별 라우팅 상태 저장소입니다.
//!
//! 컨텍스트는 명시적 핸들로 전달하는 것이 기본입니다. 현재 실행 단위의
//! 컨텍스트가 필요하면 [`ExecutionContext::current`]를 사용합니다.
//! 비동기 코드에서는 [`ExecutionContext::scope`]로 태스크에 컨텍스트를
//! 바인딩해야 합니다. 같은 스레드에서 번갈아 실행되는 태스크들이 스레드
//! 컨텍스트를 공유하면 오버라이드가 서로 섞이기 때문입니다.
//!
//! 오버라이드와 가드 모드는 프레임 스택으로 저장합니다. 현재 값은 항상
//! 스택의 맨 위이고, 스코프는 종료 시 자신이 쌓은 프레임만 제거합니다.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use super::guard::TransactionGuardMode;
use super::role::Role;

thread_local! {
    static THREAD_CONTEXT: Arc<ExecutionContext> = Arc::new(ExecutionContext::new());
}

tokio::task_local! {
    static TASK_CONTEXT: Arc<ExecutionContext>;
}

// ============================================================================
// FrameStack - 스코프 프레임 스택
// ============================================================================

/// 스코프 프레임 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameId(u64);

/// 프레임 제거 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameExit {
    /// 맨 위 프레임 제거 (정상 중첩)
    Nested,
    /// 더 안쪽 프레임이 남아 있는 상태에서 제거
    OutOfOrder,
    /// 이미 없음 (reset 이후)
    Missing,
}

#[derive(Debug, Clone)]
struct FrameStack<T> {
    frames: Vec<(FrameId, T)>,
}

impl<T> Default for FrameStack<T> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T> FrameStack<T> {
    fn top(&self) -> Option<&T> {
        self.frames.last().map(|(_, value)| value)
    }

    fn push(&mut self, id: FrameId, value: T) {
        self.frames.push((id, value));
    }

    fn remove(&mut self, id: FrameId) -> FrameExit {
        match self.frames.iter().rposition(|(frame, _)| *frame == id) {
            Some(index) => {
                let exit = if index + 1 == self.frames.len() {
                    FrameExit::Nested
                } else {
                    FrameExit::OutOfOrder
                };
                self.frames.remove(index);
                exit
            }
            None => FrameExit::Missing,
        }
    }

    fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

// ============================================================================
// ExecutionContext - 실행 컨텍스트
// ============================================================================

/// 컨텍스트 상태
#[derive(Debug, Default)]
struct ContextState {
    overrides: FrameStack<Role>,
    guard_modes: FrameStack<TransactionGuardMode>,
    next_frame: u64,
}

impl ContextState {
    fn next_frame(&mut self) -> FrameId {
        self.next_frame += 1;
        FrameId(self.next_frame)
    }
}

/// 실행 컨텍스트
///
/// 한 실행 단위만 사용하므로 내부 락은 경합하지 않습니다.
#[derive(Default)]
pub struct ExecutionContext {
    state: Mutex<ContextState>,
}

impl ExecutionContext {
    /// 새 컨텍스트 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 실행 단위의 컨텍스트
    ///
    /// 태스크 스코프 안이면 태스크 컨텍스트를 반환합니다. 스코프 없이
    /// tokio 런타임 위에서 호출하면 스레드 컨텍스트를 다른 태스크와 공유하지
    /// 않도록 분리된 새 컨텍스트를 반환합니다. 런타임 밖이면 스레드 컨텍스트입니다.
    pub fn current() -> Arc<ExecutionContext> {
        if let Ok(context) = TASK_CONTEXT.try_with(Arc::clone) {
            return context;
        }

        if tokio::runtime::Handle::try_current().is_ok() {
            tracing::warn!(
                "no execution context bound to this task; using a detached context \
                 (bind one with ExecutionContext::scope)"
            );
            return Arc::new(ExecutionContext::new());
        }

        THREAD_CONTEXT.with(Arc::clone)
    }

    /// 퓨처 실행 동안 태스크 컨텍스트 바인딩
    pub fn scope<F>(context: Arc<ExecutionContext>, future: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        TASK_CONTEXT.scope(context, future)
    }

    /// 현재 오버라이드 역할
    pub fn override_role(&self) -> Option<Role> {
        self.state.lock().overrides.top().cloned()
    }

    /// 현재 트랜잭션 가드 모드
    pub fn guard_mode(&self) -> TransactionGuardMode {
        self.state
            .lock()
            .guard_modes
            .top()
            .copied()
            .unwrap_or_default()
    }

    /// 오버라이드 프레임 추가
    pub(crate) fn push_override(&self, role: Role) -> FrameId {
        let mut state = self.state.lock();
        let id = state.next_frame();
        state.overrides.push(id, role);
        id
    }

    /// 오버라이드 프레임 제거
    pub(crate) fn pop_override(&self, id: FrameId) -> FrameExit {
        self.state.lock().overrides.remove(id)
    }

    /// 가드 모드 프레임 추가
    pub(crate) fn push_guard_mode(&self, mode: TransactionGuardMode) -> FrameId {
        let mut state = self.state.lock();
        let id = state.next_frame();
        state.guard_modes.push(id, mode);
        id
    }

    /// 가드 모드 프레임 제거
    pub(crate) fn pop_guard_mode(&self, id: FrameId) -> FrameExit {
        self.state.lock().guard_modes.remove(id)
    }

    /// 상태 초기화 (풀 워커 재사용 시)
    pub fn reset(&self) {
        *self.state.lock() = ContextState::default();
    }

    /// 오버라이드와 가드 모드가 모두 비어 있는지 확인
    pub fn is_clean(&self) -> bool {
        let state = self.state.lock();
        state.overrides.is_empty() && state.guard_modes.is_empty()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ExecutionContext")
            .field("override_role", &state.overrides.top())
            .field("guard_mode", &state.guard_modes.top().copied().unwrap_or_default())
            .finish()
    }
}
