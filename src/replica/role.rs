//! 역할 (Role)
//!
//! 연결 대상을 나타내는 심볼 식별자입니다.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// 프라이머리 역할 이름
pub const PRIMARY: &str = "primary";

// ============================================================================
// Role - 역할
// ============================================================================

/// 데이터베이스 연결 역할
///
/// `primary` 또는 `replica`, `slow_replica` 같은 이름 있는 레플리카입니다.
/// 복제 비용이 작도록 `Arc<str>`로 보관합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Arc<str>);

impl Role {
    /// 새 역할 생성
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// 프라이머리 역할
    pub fn primary() -> Self {
        Self::new(PRIMARY)
    }

    /// 역할 이름
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 프라이머리 여부
    pub fn is_primary(&self) -> bool {
        &*self.0 == PRIMARY
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&Role> for Role {
    fn from(role: &Role) -> Self {
        role.clone()
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Role {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Role {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
