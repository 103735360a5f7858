//! # 문서 데이터베이스 쿼리 모듈
//!
//! `documents` 테이블에 대한 CRUD(Create, Read, Update, Delete) 쿼리 함수들입니다.
//! 모든 함수는 `SqlitePool` 참조와 컬렉션 이름을 받아 비동기로 실행됩니다.
//!
//! ## 테이블 구조
//! - `collection`, `id`: 복합 기본키 (컬렉션 안에서 ID가 유일)
//! - `body`: 문서 본문 JSON 텍스트
//! - `created_at`, `updated_at`: RFC 3339 타임스탬프
//!
//! 목록은 삽입 순서(rowid)대로 반환합니다.

use super::{Filter, StoreError}; // 조회 조건, 저장소 에러
use crate::models::{Document, DocumentRow}; // API용 문서, DB 행(row)
use chrono::{SecondsFormat, Utc}; // 타임스탬프 생성 (UTC 기준)
use serde_json::{Map, Value}; // 문서 본문: JSON 객체
use sqlx::{QueryBuilder, Sqlite, SqlitePool}; // 동적 쿼리 빌더, SQLite 연결 풀

const SELECT_COLUMNS: &str = "SELECT id, body, created_at, updated_at FROM documents";

/// 현재 시각을 RFC 3339 문자열로 (예: "2025-01-01T12:00:00.000Z")
///
/// 밀리초까지 고정 길이로 기록하므로 문자열 비교가 곧 시간 비교입니다.
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 컬렉션에서 필터 조건에 맞는 문서를 모두 조회합니다.
///
/// 저장된 본문 중 하나라도 해석할 수 없으면 `StoreError::Decode`를 반환합니다.
pub async fn list_documents(
    pool: &SqlitePool,
    collection: &str,
    filter: &Filter,
) -> Result<Vec<Document>, StoreError> {
    // QueryBuilder: 조건 개수가 요청마다 다른 쿼리를 안전하게 조립합니다.
    // push()는 SQL 조각을, push_bind()는 `?` 자리표시자와 바인딩 값을 추가합니다.
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
    query.push(" WHERE collection = ");
    query.push_bind(collection.to_string());
    filter.push_conditions(&mut query);
    query.push(" ORDER BY rowid");

    // build_query_as: 결과 행을 DocumentRow(FromRow)로 매핑하는 쿼리 생성
    let rows = query
        .build_query_as::<DocumentRow>()
        .fetch_all(pool)
        .await?;

    // Iterator<Item = Result<T, E>>를 Result<Vec<T>, E>로 collect하면
    // 첫 번째 에러에서 멈추고 그 에러를 반환합니다.
    rows.into_iter()
        .map(|row| Document::try_from(row).map_err(StoreError::from))
        .collect()
}

/// 컬렉션의 모든 행을 본문 해석 없이 가져옵니다.
///
/// 문서별로 해석 실패를 따로 다뤄야 하는 곳(이미지 URL 마이그레이션)에서 사용합니다.
pub async fn list_document_rows(
    pool: &SqlitePool,
    collection: &str,
) -> Result<Vec<DocumentRow>, StoreError> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, body, created_at, updated_at
        FROM documents
        WHERE collection = ?
        ORDER BY rowid
        "#,
    )
    .bind(collection)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// ID로 행 하나를 본문 해석 없이 가져옵니다.
///
/// 저장된 본문 텍스트가 그대로 필요한 곳(비교 후 교체)에서 사용합니다.
pub async fn get_document_row(
    pool: &SqlitePool,
    collection: &str,
    id: &str,
) -> Result<Option<DocumentRow>, StoreError> {
    // fetch_optional: 결과가 0행이면 None, 1행이면 Some(row)
    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, body, created_at, updated_at
        FROM documents
        WHERE collection = ? AND id = ?
        "#,
    )
    .bind(collection)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// ID로 문서 하나를 조회합니다.
///
/// ## 반환값
/// - `Ok(Some(Document))`: 문서를 찾은 경우
/// - `Ok(None)`: 해당 ID의 문서가 없는 경우
pub async fn get_document(
    pool: &SqlitePool,
    collection: &str,
    id: &str,
) -> Result<Option<Document>, StoreError> {
    let row = get_document_row(pool, collection, id).await?;

    // Option<Result<..>> → Result<Option<..>>: 행이 있을 때만 본문을 해석합니다.
    row.map(Document::try_from).transpose().map_err(StoreError::from)
}

/// 새 문서를 저장하고 저장된 문서를 반환합니다.
///
/// ID는 UUIDv7으로 생성합니다. 타임스탬프 기반이라 생성 순서대로 정렬됩니다.
pub async fn insert_document(
    pool: &SqlitePool,
    collection: &str,
    fields: Map<String, Value>,
) -> Result<Document, StoreError> {
    let id = uuid::Uuid::now_v7().to_string();
    let timestamp = now();
    // 본문은 JSON 텍스트로 저장합니다. 테이블의 CHECK(json_valid(body))가 형식을 보장합니다.
    let body = serde_json::to_string(&fields)?;

    sqlx::query(
        r#"
        INSERT INTO documents (collection, id, body, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(collection)
    .bind(&id)
    .bind(&body)
    .bind(&timestamp)
    .bind(&timestamp)
    .execute(pool)
    .await?;

    Ok(Document {
        id,
        fields,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    })
}

/// 문서의 최상위 필드에 `patch`를 덮어씁니다 (부분 업데이트).
///
/// 읽기와 쓰기를 하나의 트랜잭션에서 수행합니다.
/// 해당 ID의 문서가 없으면 `Ok(None)`.
pub async fn update_document(
    pool: &SqlitePool,
    collection: &str,
    id: &str,
    patch: Map<String, Value>,
) -> Result<Option<Document>, StoreError> {
    // 트랜잭션 시작. commit() 전에 함수가 끝나면(에러로 `?` 반환 등)
    // tx가 drop되면서 자동으로 롤백됩니다.
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, body, created_at, updated_at
        FROM documents
        WHERE collection = ? AND id = ?
        "#,
    )
    .bind(collection)
    .bind(id)
    .fetch_optional(&mut *tx) // &mut *tx: 트랜잭션 안의 연결에서 실행
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut document = Document::try_from(row)?;
    // extend: 같은 키는 patch의 값으로 덮어쓰고, 없던 키는 추가합니다 (최상위 필드만).
    document.fields.extend(patch);
    document.updated_at = now();

    sqlx::query("UPDATE documents SET body = ?, updated_at = ? WHERE collection = ? AND id = ?")
        .bind(serde_json::to_string(&document.fields)?)
        .bind(&document.updated_at)
        .bind(collection)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(document))
}

/// 저장된 본문이 `expected_body`와 같을 때만 문서 본문을 통째로 교체합니다.
///
/// 읽은 뒤 다른 요청이 문서를 바꿨다면 아무 행도 바뀌지 않고 `false`를 반환합니다.
/// 문서가 삭제된 경우에도 `false`이므로, 호출하는 쪽에서 다시 읽어 구분합니다.
pub async fn replace_document_if_unchanged(
    pool: &SqlitePool,
    collection: &str,
    document: &Document,
    expected_body: &str,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE documents
        SET body = ?, updated_at = ?
        WHERE collection = ? AND id = ? AND body = ?
        "#,
    )
    .bind(serde_json::to_string(&document.fields)?)
    .bind(now())
    .bind(collection)
    .bind(&document.id)
    .bind(expected_body)
    .execute(pool)
    .await?;

    // rows_affected(): UPDATE/DELETE가 실제로 바꾼 행 수
    Ok(result.rows_affected() > 0)
}

/// ID로 문서를 삭제합니다. 삭제된 행이 없으면 `false`.
pub async fn delete_document(
    pool: &SqlitePool,
    collection: &str,
    id: &str,
) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
        .bind(collection)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
