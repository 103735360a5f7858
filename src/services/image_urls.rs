//! # 상품 이미지 URL 마이그레이션
//!
//! 개발 환경에서 저장된 상품 이미지 URL은 `http://localhost...`로 시작합니다.
//! 서버가 시작되어 저장소 연결에 성공하면 이 모듈이 한 번 실행되어
//! 그 접두사를 배포 주소(`BASE_URL`)로 바꿔 씁니다.
//!
//! ## 처리 흐름
//! 1. 상품 컬렉션 전체를 읽습니다. 목록 조회가 실패하면 작업 전체를 중단합니다.
//! 2. 메모리에서 URL을 바꿔 쓰고, 하나라도 바뀐 상품만 저장 대상으로 모읍니다.
//! 3. 저장은 최대 `concurrency`개까지 동시에 진행합니다. 저장된 본문이 읽은 뒤에
//!    바뀌었으면 덮어쓰지 않고 다시 읽어서 바꿔 씁니다.
//! 4. 상품별 성공/실패를 `MigrationReport`로 모아 반환합니다.
//!    실패한 저장은 상품 ID와 함께 기록되며 조용히 사라지지 않습니다.

use crate::db::{self, StoreError};
use crate::models::{Document, DocumentRow, Product, PRODUCT_COLLECTION};
use futures::{stream, StreamExt};
use sqlx::SqlitePool;
use thiserror::Error;

/// 로컬 개발 호스트를 나타내는 URL 접두사
pub const LOCAL_HOST_PREFIX: &str = "http://localhost";

/// URL이 로컬 개발 호스트로 시작하면 그 접두사를 `base_url`로 바꾼 새 URL을 반환합니다.
///
/// 접두사 뒤의 나머지 문자열은 바이트 단위로 그대로 유지됩니다.
/// 이미 `base_url`로 시작하는 URL은 바꾸지 않으므로, `base_url` 자체가
/// `http://localhost`로 시작하더라도 두 번 실행해서 결과가 달라지지 않습니다.
pub fn rewrite_url(url: &str, base_url: &str) -> Option<String> {
    if url.starts_with(base_url) {
        return None;
    }
    url.strip_prefix(LOCAL_HOST_PREFIX)
        .map(|rest| format!("{base_url}{rest}"))
}

/// 저장에 실패한 상품 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub product_id: String,
    pub error: String,
}

/// 마이그레이션 결과 요약
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// 읽은 상품 수
    pub scanned: usize,
    /// URL이 바뀌어 저장에 성공한 상품 수
    pub rewritten: usize,
    /// 해석 또는 저장에 실패한 상품들
    pub failures: Vec<SaveFailure>,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, product_id: String, error: impl ToString) {
        self.failures.push(SaveFailure {
            product_id,
            error: error.to_string(),
        });
    }
}

/// 같은 상품을 다시 읽고 저장을 시도하는 최대 횟수
const MAX_SAVE_ATTEMPTS: usize = 3;

/// URL을 바꿔 쓴 상품과, 그 상품을 읽을 때 저장되어 있던 본문 텍스트
///
/// 저장은 본문이 그대로일 때만 적용되므로, 읽은 뒤 다른 요청이 문서를 바꿨다면
/// 덮어쓰지 않고 다시 읽습니다.
struct PendingRewrite {
    document: Document,
    seen_body: String,
}

/// 상품 하나를 저장한 결과
#[derive(Debug, PartialEq, Eq)]
enum SaveOutcome {
    Rewritten,
    /// 다시 읽어 보니 바꿀 URL이 남아 있지 않음
    AlreadyCurrent,
    /// 읽은 뒤 삭제됨
    Missing,
}

#[derive(Debug, Error)]
enum SaveError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("product kept changing, gave up after {0} attempts")]
    Contended(usize),
}

/// 행 하나를 해석하고 URL을 바꿔 씁니다. 바뀐 것이 없으면 `None`.
fn prepare(row: DocumentRow, base_url: &str) -> Result<Option<PendingRewrite>, serde_json::Error> {
    let seen_body = row.body.clone();
    let Document {
        id,
        fields,
        created_at,
        updated_at,
    } = Document::try_from(row)?;

    let mut product = Product::from_fields(fields)?;
    if !product.rewrite_image_urls(base_url) {
        return Ok(None);
    }

    Ok(Some(PendingRewrite {
        document: Document {
            id,
            fields: product.into_fields()?,
            created_at,
            updated_at,
        },
        seen_body,
    }))
}

/// 상품 컬렉션 전체를 읽고 저장이 필요한 상품만 모읍니다.
///
/// 해석할 수 없는 상품은 보고서의 실패 목록에 바로 기록합니다.
async fn scan(
    pool: &SqlitePool,
    base_url: &str,
) -> Result<(MigrationReport, Vec<PendingRewrite>), StoreError> {
    let rows = db::list_document_rows(pool, PRODUCT_COLLECTION).await?;
    let mut report = MigrationReport {
        scanned: rows.len(),
        ..MigrationReport::default()
    };

    let mut pending = Vec::new();
    for row in rows {
        let id = row.id.clone();
        match prepare(row, base_url) {
            Ok(Some(rewrite)) => pending.push(rewrite),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(product_id = %id, "Skipping product with unreadable images: {}", e);
                report.fail(id, e);
            }
        }
    }

    Ok((report, pending))
}

/// 상품 하나를 저장합니다.
///
/// 본문이 읽은 그대로일 때만 교체하고, 그 사이에 바뀌었으면
/// 최신 본문을 다시 읽어 URL을 다시 바꿔 씁니다.
async fn save(
    pool: &SqlitePool,
    base_url: &str,
    mut pending: PendingRewrite,
) -> Result<SaveOutcome, SaveError> {
    for _ in 0..MAX_SAVE_ATTEMPTS {
        let saved = db::replace_document_if_unchanged(
            pool,
            PRODUCT_COLLECTION,
            &pending.document,
            &pending.seen_body,
        )
        .await?;
        if saved {
            return Ok(SaveOutcome::Rewritten);
        }

        let Some(row) =
            db::get_document_row(pool, PRODUCT_COLLECTION, &pending.document.id).await?
        else {
            return Ok(SaveOutcome::Missing);
        };
        match prepare(row, base_url).map_err(StoreError::from)? {
            Some(next) => pending = next,
            None => return Ok(SaveOutcome::AlreadyCurrent),
        }
    }

    Err(SaveError::Contended(MAX_SAVE_ATTEMPTS))
}

/// 모인 상품을 최대 `concurrency`개씩 동시에 저장하고 결과를 보고서에 더합니다.
async fn save_all(
    pool: &SqlitePool,
    base_url: &str,
    pending: Vec<PendingRewrite>,
    concurrency: usize,
    report: &mut MigrationReport,
) {
    // buffer_unordered(n): 최대 n개의 future를 동시에 실행하고, 끝나는 순서대로 내보냅니다.
    let results: Vec<(String, Result<SaveOutcome, SaveError>)> = stream::iter(pending)
        .map(|rewrite| async move {
            let id = rewrite.document.id.clone();
            (id, save(pool, base_url, rewrite).await)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    for (id, result) in results {
        match result {
            Ok(SaveOutcome::Rewritten) => report.rewritten += 1,
            Ok(SaveOutcome::AlreadyCurrent) => {
                tracing::debug!(product_id = %id, "Product image URLs were already updated");
            }
            Ok(SaveOutcome::Missing) => {
                tracing::warn!(product_id = %id, "Product disappeared before it could be saved");
                report.fail(id, "product no longer exists");
            }
            Err(e) => {
                tracing::error!(product_id = %id, "Failed to save product: {}", e);
                report.fail(id, e);
            }
        }
    }
}

/// 모든 상품의 이미지 URL을 `base_url`로 바꿔 쓰고 결과 요약을 반환합니다.
///
/// 목록 조회 실패만 `Err`로 전파되고, 상품별 실패는 보고서에 담깁니다.
/// 서버가 요청을 받는 중에 실행되어도 다른 요청이 바꾼 필드는 덮어쓰지 않습니다.
pub async fn rewrite_image_urls(
    pool: &SqlitePool,
    base_url: &str,
    concurrency: usize,
) -> Result<MigrationReport, StoreError> {
    let (mut report, pending) = scan(pool, base_url).await?;
    save_all(pool, base_url, pending, concurrency, &mut report).await;
    Ok(report)
}

/// 서버 시작 시 한 번 실행되는 진입점. 결과는 로그로만 남깁니다.
pub async fn run_on_startup(pool: SqlitePool, base_url: String, concurrency: usize) {
    tracing::info!("Rewriting product image URLs from {} to {}", LOCAL_HOST_PREFIX, base_url);

    match rewrite_image_urls(&pool, &base_url, concurrency).await {
        Ok(report) if report.is_clean() => tracing::info!(
            scanned = report.scanned,
            rewritten = report.rewritten,
            "Updated all image URLs successfully"
        ),
        Ok(report) => tracing::warn!(
            scanned = report.scanned,
            rewritten = report.rewritten,
            failed = report.failures.len(),
            "Image URL update finished with failures"
        ),
        Err(e) => tracing::error!("Error updating image URLs: {}", e),
    }
}
