//! 테스트용 연결
//!
//! 복제가 없는 별도 저장소처럼 동작해서, 프라이머리에 쓴 데이터는
//! 레플리카에서 보이지 않습니다.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::replica::error::{ReplicaError, ReplicaResult};
use crate::replica::guard::LifecycleOp;
use crate::replica::role::Role;

use super::connection::{QueryConnection, SelectMethod};

/// 읽기 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRows {
    /// 읽기를 처리한 연결의 역할
    pub role: Role,
    /// 진단 이름
    pub name: String,
    /// 행
    pub rows: Vec<String>,
}

/// 기록된 호출
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Select { method: SelectMethod, name: String },
    Execute { sql: String },
    Lifecycle { op: LifecycleOp, savepoint: Option<String> },
}

/// 테스트용 연결
#[derive(Debug)]
pub struct MockConnection {
    role: Role,
    rows: Mutex<Vec<String>>,
    calls: Mutex<Vec<MockCall>>,
    open_transactions: AtomicUsize,
    fail_selects: bool,
}

impl MockConnection {
    pub fn new(role: impl Into<Role>) -> Self {
        Self {
            role: role.into(),
            rows: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            open_transactions: AtomicUsize::new(0),
            fail_selects: false,
        }
    }

    /// 모든 읽기가 실패하는 연결
    pub fn unavailable(role: impl Into<Role>) -> Self {
        Self {
            fail_selects: true,
            ..Self::new(role)
        }
    }

    pub fn shared(role: impl Into<Role>) -> Arc<Self> {
        Arc::new(Self::new(role))
    }

    pub fn with_rows<I, S>(self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.lock().extend(rows.into_iter().map(Into::into));
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn select_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, MockCall::Select { .. }))
            .count()
    }

    pub fn lifecycle_count(&self, op: LifecycleOp) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, MockCall::Lifecycle { op: o, .. } if *o == op))
            .count()
    }

    fn record_lifecycle(&self, op: LifecycleOp, savepoint: Option<&str>) {
        self.calls.lock().push(MockCall::Lifecycle {
            op,
            savepoint: savepoint.map(str::to_string),
        });
    }
}

impl QueryConnection for MockConnection {
    type Rows = MockRows;

    async fn select(&self, method: SelectMethod, _sql: &str, name: &str) -> ReplicaResult<MockRows> {
        self.calls.lock().push(MockCall::Select {
            method,
            name: name.to_string(),
        });

        if self.fail_selects {
            return Err(ReplicaError::connection_unavailable(
                self.role.clone(),
                "connection refused",
            ));
        }

        Ok(MockRows {
            role: self.role.clone(),
            name: name.to_string(),
            rows: self.rows.lock().clone(),
        })
    }

    async fn execute(&self, sql: &str, _name: &str) -> ReplicaResult<u64> {
        self.calls.lock().push(MockCall::Execute {
            sql: sql.to_string(),
        });
        self.rows.lock().push(sql.to_string());
        Ok(1)
    }

    fn open_transactions(&self) -> usize {
        self.open_transactions.load(Ordering::SeqCst)
    }

    async fn begin_db_transaction(&self) -> ReplicaResult<()> {
        self.record_lifecycle(LifecycleOp::Begin, None);
        self.open_transactions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn commit_db_transaction(&self) -> ReplicaResult<()> {
        self.record_lifecycle(LifecycleOp::Commit, None);
        let _ = self
            .open_transactions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        Ok(())
    }

    async fn create_savepoint(&self, name: &str) -> ReplicaResult<()> {
        self.record_lifecycle(LifecycleOp::CreateSavepoint, Some(name));
        Ok(())
    }

    async fn rollback_to_savepoint(&self, name: &str) -> ReplicaResult<()> {
        self.record_lifecycle(LifecycleOp::RollbackToSavepoint, Some(name));
        Ok(())
    }

    async fn release_savepoint(&self, name: &str) -> ReplicaResult<()> {
        self.record_lifecycle(LifecycleOp::ReleaseSavepoint, Some(name));
        Ok(())
    }
}
