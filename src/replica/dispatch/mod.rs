//! 쿼리 디스패치
//!
//! 연결 실행 기능을 감싸는 경계 계층입니다. 읽기마다 라우팅 결정을 적용하고
//! 트랜잭션 라이프사이클 호출에 트랜잭션 가드를 적용한 뒤 위임합니다.

mod connection;
#[cfg(test)]
pub(crate) mod mock;
mod router;

pub use connection::{
    ConnectionResolver, QueryConnection, SelectMethod, StaticResolver, DEFAULT_QUERY_NAME,
};
pub use router::{replica_query_name, QueryRouter};
