//! 레플리카 설정
//!
//! 역할 목록, 기본 역할, 트랜잭션 무시 여부를 설정하고 라우터를 설치합니다.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::{ReplicaError, ReplicaResult};
use super::registry::RoleRegistry;
use super::role::Role;
use super::routing::Router;

// ============================================================================
// ReplicaConfig - 레플리카 설정
// ============================================================================

/// 레플리카 설정
///
/// 기본 역할은 필수입니다. 설정을 빠뜨린 애플리케이션이 조용히
/// 잘못된 곳에서 읽지 않도록 기본값을 두지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaConfig {
    /// 레플리카 역할 목록 (primary는 자동 포함)
    #[serde(default)]
    pub roles: Vec<Role>,
    /// 기본 읽기 역할
    pub default_role: Role,
    /// 트랜잭션 중에도 레플리카에서 읽기
    #[serde(default)]
    pub ignore_transactions: bool,
    /// 프라이머리 연결에도 레플리카 라우팅 적용
    #[serde(default = "default_extend_primary")]
    pub extend_primary: bool,
}

fn default_extend_primary() -> bool {
    true
}

impl ReplicaConfig {
    /// 새 설정 생성
    pub fn new(default_role: impl Into<Role>) -> Self {
        Self {
            roles: Vec::new(),
            default_role: default_role.into(),
            ignore_transactions: false,
            extend_primary: true,
        }
    }

    /// 빌더 시작
    pub fn builder(default_role: impl Into<Role>) -> ReplicaConfigBuilder {
        ReplicaConfigBuilder {
            config: Self::new(default_role),
        }
    }

    /// 설정 검증
    ///
    /// 역할 이름만 검사합니다. 기본 역할의 소속은 레지스트리 등록 시 검사됩니다.
    pub fn validate(&self) -> ReplicaResult<()> {
        if let Some(role) = self.roles.iter().find(|r| r.as_str().trim().is_empty()) {
            return Err(ReplicaError::configuration(format!(
                "Role names must not be empty: {role:?}"
            )));
        }

        Ok(())
    }

    /// 설정으로 라우터 설치
    pub fn install(&self) -> ReplicaResult<Router> {
        install(self)
    }
}

// ============================================================================
// ReplicaConfigBuilder - 설정 빌더
// ============================================================================

/// 레플리카 설정 빌더
#[derive(Debug)]
pub struct ReplicaConfigBuilder {
    config: ReplicaConfig,
}

impl ReplicaConfigBuilder {
    /// 역할 추가
    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.config.roles.push(role.into());
        self
    }

    /// 역할 목록 추가
    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.config.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// 트랜잭션 무시 설정
    pub fn with_ignore_transactions(mut self, ignore: bool) -> Self {
        self.config.ignore_transactions = ignore;
        self
    }

    /// 프라이머리 연결 확장 설정
    pub fn with_extend_primary(mut self, extend: bool) -> Self {
        self.config.extend_primary = extend;
        self
    }

    /// 빌드
    pub fn build(self) -> ReplicaConfig {
        self.config
    }
}

/// 설정을 검증하고 라우터 설치
///
/// 호출마다 독립된 레지스트리를 만듭니다. 반환된 [`Router`]와 그 복제본이
/// 프로세스의 레지스트리 역할을 하며, 이후 재설정은 [`Router::reconfigure`]로
/// 같은 레지스트리에 덮어씁니다.
pub fn install(config: &ReplicaConfig) -> ReplicaResult<Router> {
    config.validate()?;

    let registry = RoleRegistry::new(config.roles.iter(), config.default_role.clone())?;
    registry.set_ignore_transactions(config.ignore_transactions);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        roles = ?registry.roles(),
        default = %config.default_role,
        ignore_transactions = config.ignore_transactions,
        "installed replica routing"
    );

    Ok(Router::new(Arc::new(registry)))
}

impl Router {
    /// 기존 레지스트리에 설정 재등록
    ///
    /// 이 라우터를 복제해 가진 모든 곳에 즉시 반영됩니다. 실패하면 기존 상태를
    /// 유지합니다. `extend_primary`는 `QueryRouter`별 설정이라 여기서는 쓰지 않습니다.
    pub fn reconfigure(&self, config: &ReplicaConfig) -> ReplicaResult<()> {
        config.validate()?;

        self.registry()
            .register(config.roles.iter(), config.default_role.clone())?;
        self.registry()
            .set_ignore_transactions(config.ignore_transactions);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replica::context::ExecutionContext;

    #[test]
    fn test_builder() {
        let config = ReplicaConfig::builder("slave")
            .with_role("slave")
            .with_roles(["slow_slave"])
            .with_ignore_transactions(true)
            .build();

        assert_eq!(config.roles, vec![Role::new("slave"), Role::new("slow_slave")]);
        assert_eq!(config.default_role, "slave");
        assert!(config.ignore_transactions);
        assert!(config.extend_primary);
    }

    #[test]
    fn test_install_invalid_default() {
        let config = ReplicaConfig::builder("missing").with_role("slave").build();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(
            config.install().unwrap_err(),
            ReplicaError::InvalidDefault(Role::new("missing"))
        );
    }

    #[test]
    fn test_validate_empty_role_name() {
        let config = ReplicaConfig::builder("primary").with_role(" ").build();
        assert!(matches!(config.validate(), Err(ReplicaError::Configuration(_))));
    }

    #[test]
    fn test_primary_default_without_replicas() {
        let router = ReplicaConfig::new("primary").install().unwrap();
        let ctx = ExecutionContext::new();
        assert!(router.is_reading_from_primary(&ctx));
    }

    #[test]
    fn test_install() {
        let router = ReplicaConfig::builder("replica")
            .with_role("replica")
            .with_ignore_transactions(true)
            .build()
            .install()
            .unwrap();

        let ctx = ExecutionContext::new();
        assert_eq!(router.current_role(&ctx), "replica");
        assert!(router.ignore_transactions());
        assert_eq!(router.registry().roles(), vec![Role::primary(), Role::new("replica")]);
    }

    #[test]
    fn test_config_deserialize() {
        let json = r#"{"roles": ["slave", "slow_slave"], "default_role": "slave"}"#;
        let config: ReplicaConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.roles.len(), 2);
        assert_eq!(config.default_role, "slave");
        assert!(!config.ignore_transactions);
        assert!(config.extend_primary);
    }

    #[test]
    fn test_config_requires_default_role() {
        let json = r#"{"roles": ["slave"]}"#;
        assert!(serde_json::from_str::<ReplicaConfig>(json).is_err());
    }

    #[test]
    fn test_reconfigure_is_seen_by_clones() {
        let router = ReplicaConfig::builder("slave")
            .with_role("slave")
            .build()
            .install()
            .unwrap();
        let clone = router.clone();
        let ctx = ExecutionContext::new();

        let config = ReplicaConfig::builder("replica")
            .with_role("replica")
            .with_ignore_transactions(true)
            .build();
        router.reconfigure(&config).unwrap();

        assert_eq!(clone.current_role(&ctx), "replica");
        assert!(clone.ignore_transactions());
        assert!(!clone.registry().is_registered(&Role::new("slave")));
    }

    #[test]
    fn test_reconfigure_failure_keeps_state() {
        let router = ReplicaConfig::builder("slave")
            .with_role("slave")
            .build()
            .install()
            .unwrap();

        let config = ReplicaConfig::builder("missing")
            .with_role("replica")
            .with_ignore_transactions(true)
            .build();
        assert_eq!(
            router.reconfigure(&config),
            Err(ReplicaError::InvalidDefault(Role::new("missing")))
        );

        let ctx = ExecutionContext::new();
        assert_eq!(router.current_role(&ctx), "slave");
        assert!(!router.ignore_transactions());
    }
}
