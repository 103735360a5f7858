//! # 일반 CRUD 라우트 핸들러
//!
//! `Resource` 정의 하나로 목록/단건/생성/수정/삭제 핸들러를 만들어 냅니다.
//!
//! ## 엔드포인트 (접두사 기준)
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | / | `list` | 목록 (쿼리 파라미터는 필드 일치 조건) |
//! | POST | / | `create` | 새 문서 생성 → 201 |
//! | GET | /{id} | `get` | 단건 조회 |
//! | PUT | /{id} | `update` | 최상위 필드 부분 업데이트 |
//! | DELETE | /{id} | `delete` | 삭제 |
//!
//! 어떤 핸들러를 노출할지는 `Resource::capabilities`가 결정합니다.
//! 모든 응답은 `{success, message, data}` 봉투 형태입니다.

use crate::{
    db::{self, Filter},
    error::AppError,
    models::{strip_server_keys, ApiResponse, Document},
    routes::{extract::ApiJson, resources::Resource, AppState},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::MethodRouter,
    Json, Router,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// 리소스의 capabilities에 맞춰 `/`와 `/{id}` 라우트를 만듭니다.
pub fn router(resource: &'static Resource) -> Router<AppState> {
    Router::new()
        .route("/", collection_methods(resource))
        .route("/{id}", item_methods(resource))
}

/// `/` 경로의 메서드 라우터 (GET 목록, POST 생성)
///
/// 전용 핸들러가 필요한 모듈은 여기에 메서드를 더 이어 붙입니다.
pub fn collection_methods(resource: &'static Resource) -> MethodRouter<AppState> {
    let caps = resource.capabilities;
    let mut methods = MethodRouter::new();
    if caps.list {
        methods = methods.get(
            move |State(state): State<AppState>,
                  Query(params): Query<HashMap<String, String>>| {
                list(resource, state, params)
            },
        );
    }
    if caps.create {
        methods = methods.post(
            move |State(state): State<AppState>, ApiJson(body): ApiJson<Value>| {
                create(resource, state, body)
            },
        );
    }
    methods
}

/// `/{id}` 경로의 메서드 라우터 (GET 단건, PUT 수정, DELETE 삭제)
pub fn item_methods(resource: &'static Resource) -> MethodRouter<AppState> {
    let caps = resource.capabilities;
    let mut methods = MethodRouter::new();
    if caps.get {
        methods = methods.get(
            move |State(state): State<AppState>, Path(id): Path<String>| get(resource, state, id),
        );
    }
    if caps.update {
        methods = methods.put(
            move |State(state): State<AppState>,
                  Path(id): Path<String>,
                  ApiJson(body): ApiJson<Value>| update(resource, state, id, body),
        );
    }
    if caps.delete {
        methods = methods.delete(
            move |State(state): State<AppState>, Path(id): Path<String>| {
                delete(resource, state, id)
            },
        );
    }
    methods
}

/// 요청 본문이 JSON 객체인지 확인하고 서버 관리 키를 제거합니다.
fn into_object(body: Value) -> Result<Map<String, Value>, AppError> {
    let Value::Object(mut fields) = body else {
        return Err(AppError::Validation(
            "Request body must be a JSON object.".to_string(),
        ));
    };
    strip_server_keys(&mut fields);
    Ok(fields)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// 생성 요청 본문을 검증하고 기본값을 채웁니다.
pub fn prepare_create(resource: &Resource, body: Value) -> Result<Map<String, Value>, AppError> {
    let mut fields = into_object(body)?;
    for (key, value) in resource.defaults {
        fields
            .entry(key.to_string())
            .or_insert_with(|| Value::String(value.to_string()));
    }

    let missing: Vec<&str> = resource
        .required
        .iter()
        .copied()
        .filter(|key| fields.get(*key).map_or(true, is_blank))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Required fields are missing: {}.",
            missing.join(", ")
        )));
    }

    if let Some(validate) = resource.validate {
        validate(&fields)?;
    }
    Ok(fields)
}

/// 수정 요청 본문을 검증합니다. 필수 필드는 비울 수 없습니다.
pub fn prepare_update(resource: &Resource, body: Value) -> Result<Map<String, Value>, AppError> {
    let patch = into_object(body)?;

    let emptied: Vec<&str> = resource
        .required
        .iter()
        .copied()
        .filter(|key| patch.get(*key).is_some_and(is_blank))
        .collect();
    if !emptied.is_empty() {
        return Err(AppError::Validation(format!(
            "Required fields cannot be empty: {}.",
            emptied.join(", ")
        )));
    }

    if let Some(validate) = resource.validate {
        validate(&patch)?;
    }
    Ok(patch)
}

/// `GET /` — 조건에 맞는 문서 목록을 조회합니다.
pub async fn list(
    resource: &'static Resource,
    state: AppState,
    params: HashMap<String, String>,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let filter = Filter::from_params(params)?;
    list_filtered(resource, &state, &filter).await
}

/// 필터가 이미 만들어진 목록 조회. 전용 조회 경로(예: 사용자별 주문)에서 재사용합니다.
pub async fn list_filtered(
    resource: &'static Resource,
    state: &AppState,
    filter: &Filter,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let pool = state.store.pool()?;
    let documents = db::list_documents(pool, resource.collection, filter)
        .await?
        .into_iter()
        .map(|doc| doc.without(resource.hidden))
        .collect();

    Ok(Json(ApiResponse::success(
        format!("{} retrieved successfully.", resource.plural),
        documents,
    )))
}

/// `GET /{id}` — 문서 하나를 조회합니다. 없으면 404.
pub async fn get(
    resource: &'static Resource,
    state: AppState,
    id: String,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let pool = state.store.pool()?;
    let document = db::get_document(pool, resource.collection, &id)
        .await?
        .ok_or_else(|| resource.not_found())?;

    Ok(Json(ApiResponse::success(
        format!("{} retrieved successfully.", resource.singular),
        document.without(resource.hidden),
    )))
}

/// `POST /` — 새 문서를 생성합니다. 성공 시 201 Created.
pub async fn create(
    resource: &'static Resource,
    state: AppState,
    body: Value,
) -> Result<(StatusCode, Json<ApiResponse<Document>>), AppError> {
    let fields = prepare_create(resource, body)?;
    let pool = state.store.pool()?;
    let document = db::insert_document(pool, resource.collection, fields).await?;
    tracing::debug!(collection = resource.collection, id = %document.id, "Created document");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            format!("{} created successfully.", resource.singular),
            document.without(resource.hidden),
        )),
    ))
}

/// `PUT /{id}` — 보낸 필드만 덮어씁니다. 없으면 404.
pub async fn update(
    resource: &'static Resource,
    state: AppState,
    id: String,
    body: Value,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let patch = prepare_update(resource, body)?;
    let pool = state.store.pool()?;
    let document = db::update_document(pool, resource.collection, &id, patch)
        .await?
        .ok_or_else(|| resource.not_found())?;

    Ok(Json(ApiResponse::success(
        format!("{} updated successfully.", resource.singular),
        document.without(resource.hidden),
    )))
}

/// `DELETE /{id}` — 문서를 삭제합니다. 없으면 404.
pub async fn delete(
    resource: &'static Resource,
    state: AppState,
    id: String,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let pool = state.store.pool()?;
    if !db::delete_document(pool, resource.collection, &id).await? {
        return Err(resource.not_found());
    }

    Ok(Json(ApiResponse::message(format!(
        "{} deleted successfully.",
        resource.singular
    ))))
}
