//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 컬렉션 단위의 JSON 문서 저장소입니다. SQLite의 `documents` 테이블 하나에
//! 모든 컬렉션(categories, products, orders 등)의 문서를 보관합니다.
//! 라우트 핸들러(routes/)와 마이그레이션(services/)에서 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `documents`: 문서 CRUD(생성/조회/수정/삭제) 쿼리
//! - `filter`: 최상위 필드 일치(equality) 조건

pub mod documents;
pub mod filter;

pub use documents::*;
pub use filter::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;

/// 문서 저장소 작업에서 발생하는 에러
#[derive(Debug, Error)]
pub enum StoreError {
    /// 시작 시 연결에 실패하여 저장소를 사용할 수 없음
    #[error("document store is not connected")]
    Unavailable,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 저장된 본문이 JSON 객체가 아니거나 기대한 구조와 다름
    #[error("stored document could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("schema migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// 문서 저장소 핸들
///
/// 연결에 성공하면 연결 풀을 가지고, 실패하면 "연결 안 됨" 상태로 남습니다.
/// 연결 안 된 저장소는 모든 작업에 `StoreError::Unavailable`을 돌려주므로
/// 서버는 계속 떠 있고 요청만 500으로 실패합니다.
///
/// `SqlitePool`은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: Option<SqlitePool>,
}

impl DocumentStore {
    /// 연결 문자열로 저장소에 연결하고 스키마 마이그레이션을 실행합니다.
    ///
    /// 데이터베이스 파일이 없으면 새로 만듭니다.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool: Some(pool) })
    }

    /// 테스트용 메모리 저장소
    ///
    /// `sqlite::memory:`는 연결마다 별도의 데이터베이스가 생기므로
    /// 연결 하나를 계속 유지합니다.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool: Some(pool) })
    }

    /// 연결되지 않은 저장소
    pub fn disconnected() -> Self {
        Self { pool: None }
    }

    pub fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    /// 연결 풀을 빌려옵니다. 연결되지 않았으면 `Unavailable`.
    pub fn pool(&self) -> Result<&SqlitePool, StoreError> {
        self.pool.as_ref().ok_or(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_store_reports_unavailable() {
        let store = DocumentStore::disconnected();
        assert!(!store.is_connected());
        assert!(matches!(store.pool(), Err(StoreError::Unavailable)));
    }

    #[tokio::test]
    async fn in_memory_store_is_connected() {
        let store = DocumentStore::in_memory().await.unwrap();
        assert!(store.is_connected());
        assert!(store.pool().is_ok());
    }

    #[tokio::test]
    async fn unreachable_database_fails_to_connect() {
        let result =
            DocumentStore::connect("sqlite:/nonexistent-online-store-dir/sub/store.db", 1).await;
        assert!(result.is_err());
    }
}
