//! 역할 레지스트리
//!
//! 프로세스 전역의 유효한 역할 집합과 기본 역할을 관리합니다.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use super::error::{ReplicaError, ReplicaResult};
use super::role::Role;

/// 레지스트리 상태
#[derive(Debug, Clone)]
struct RegistryState {
    /// 등록된 역할 (순서 유지, 중복 없음, 첫 번째는 항상 primary)
    roles: Vec<Role>,
    /// 기본 역할
    default_role: Role,
}

/// 역할 레지스트리
///
/// 쓰기는 설치 시점이나 관리 호출에서만 일어나므로 단순한 `RwLock`으로 충분합니다.
#[derive(Debug)]
pub struct RoleRegistry {
    state: RwLock<RegistryState>,
    /// 트랜잭션 중에도 레플리카 읽기 허용
    ignore_transactions: AtomicBool,
}

impl RoleRegistry {
    /// 역할 집합과 기본 역할로 레지스트리 생성
    pub fn new<I, R>(roles: I, default_role: impl Into<Role>) -> ReplicaResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        let state = Self::build_state(roles, default_role.into())?;
        Ok(Self {
            state: RwLock::new(state),
            ignore_transactions: AtomicBool::new(false),
        })
    }

    /// 역할 집합 재등록
    ///
    /// 기존 상태를 덮어씁니다. 실패 시 기존 상태는 유지됩니다.
    pub fn register<I, R>(&self, roles: I, default_role: impl Into<Role>) -> ReplicaResult<()>
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        let state = Self::build_state(roles, default_role.into())?;
        tracing::info!(
            roles = ?state.roles,
            default = %state.default_role,
            "registered replica roles"
        );
        *self.state.write() = state;
        Ok(())
    }

    fn build_state<I, R>(roles: I, default_role: Role) -> ReplicaResult<RegistryState>
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        let mut set = vec![Role::primary()];
        for role in roles {
            let role = role.into();
            if !set.contains(&role) {
                set.push(role);
            }
        }

        if !set.contains(&default_role) {
            return Err(ReplicaError::InvalidDefault(default_role));
        }

        Ok(RegistryState {
            roles: set,
            default_role,
        })
    }

    /// 등록 여부
    pub fn is_registered(&self, role: &Role) -> bool {
        self.state.read().roles.contains(role)
    }

    /// 등록되지 않은 역할이면 에러
    pub fn assert_role(&self, role: &Role) -> ReplicaResult<()> {
        if self.is_registered(role) {
            Ok(())
        } else {
            Err(ReplicaError::UnknownRole(role.clone()))
        }
    }

    /// 등록된 역할 목록 (primary 포함, 등록 순서)
    pub fn roles(&self) -> Vec<Role> {
        self.state.read().roles.clone()
    }

    /// 프로세스 기본 역할
    pub fn default_role(&self) -> Role {
        self.state.read().default_role.clone()
    }

    /// 기본 역할 변경
    pub fn set_default(&self, role: impl Into<Role>) -> ReplicaResult<()> {
        let role = role.into();
        let mut state = self.state.write();
        if !state.roles.contains(&role) {
            return Err(ReplicaError::UnknownRole(role));
        }

        if state.default_role != role {
            tracing::info!(from = %state.default_role, to = %role, "default read role changed");
            state.default_role = role;
        }
        Ok(())
    }

    /// 트랜잭션 무시 여부
    pub fn ignore_transactions(&self) -> bool {
        self.ignore_transactions.load(Ordering::Acquire)
    }

    /// 트랜잭션 무시 설정
    pub fn set_ignore_transactions(&self, ignore: bool) {
        self.ignore_transactions.store(ignore, Ordering::Release);
    }
}
