//! # 사용자(User) 라우트 핸들러
//!
//! 목록/단건 조회와 삭제는 일반 CRUD 핸들러를 사용하고,
//! 비밀번호를 다루는 생성/수정과 로그인만 이 모듈에서 처리합니다.
//!
//! ## 엔드포인트
//! - `GET    /users`         → 사용자 목록
//! - `POST   /users`         → 사용자 생성 (비밀번호는 Argon2id로 해싱하여 저장)
//! - `POST   /users/login`   → 이름과 비밀번호 확인
//! - `GET    /users/{id}`    → 단건 조회
//! - `PUT    /users/{id}`    → 수정 (비밀번호를 보내면 다시 해싱)
//! - `DELETE /users/{id}`    → 삭제
//!
//! 응답에는 `password` 필드가 절대 포함되지 않습니다.

use crate::{
    db::{self, Filter},
    error::AppError,
    models::{ApiResponse, Document, LoginRequest},
    routes::{
        crud,
        extract::ApiJson,
        resources::USERS,
        AppState,
    },
    services::password::{hash_password, verify_password},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{Map, Value};
use sqlx::SqlitePool;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", crud::collection_methods(&USERS).post(register))
        .route("/login", post(login))
        .route("/{id}", crud::item_methods(&USERS).put(update_user))
}

/// 본문에 `password`가 있으면 문자열인지 확인하고 해시로 바꿉니다.
fn hash_password_field(fields: &mut Map<String, Value>) -> Result<(), AppError> {
    let Some(password) = fields.get("password") else {
        return Ok(());
    };
    let password = password
        .as_str()
        .ok_or_else(|| AppError::Validation("password must be a string.".to_string()))?;

    let hash = hash_password(password)?;
    fields.insert("password".to_string(), Value::String(hash));
    Ok(())
}

/// 같은 이름을 가진 다른 사용자가 있으면 409 Conflict.
async fn ensure_name_available(
    pool: &SqlitePool,
    fields: &Map<String, Value>,
    current_id: Option<&str>,
) -> Result<(), AppError> {
    let Some(name) = fields.get("name").and_then(Value::as_str) else {
        return Ok(());
    };

    let filter = Filter::new().eq("name", name)?;
    let taken = db::list_documents(pool, USERS.collection, &filter)
        .await?
        .iter()
        .any(|user| Some(user.id.as_str()) != current_id);

    if taken {
        return Err(AppError::Conflict("User name already exists.".to_string()));
    }
    Ok(())
}

/// `POST /users` — 새 사용자를 생성합니다.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<ApiResponse<Document>>), AppError> {
    let mut fields = crud::prepare_create(&USERS, body)?;
    let pool = state.store.pool()?;
    ensure_name_available(pool, &fields, None).await?;
    hash_password_field(&mut fields)?;

    let user = db::insert_document(pool, USERS.collection, fields).await?;
    tracing::info!(user_id = %user.id, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "User created successfully.",
            user.without(USERS.hidden),
        )),
    ))
}

/// `PUT /users/{id}` — 사용자 정보를 수정합니다.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let mut patch = crud::prepare_update(&USERS, body)?;
    let pool = state.store.pool()?;
    ensure_name_available(pool, &patch, Some(&id)).await?;
    hash_password_field(&mut patch)?;

    let user = db::update_document(pool, USERS.collection, &id, patch)
        .await?
        .ok_or_else(|| USERS.not_found())?;

    Ok(Json(ApiResponse::success(
        "User updated successfully.",
        user.without(USERS.hidden),
    )))
}

/// `POST /users/login` — 이름과 비밀번호가 맞으면 사용자 정보를 돌려줍니다.
///
/// 이름이 없든 비밀번호가 틀리든 같은 401 메시지를 반환합니다.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid name or password.".to_string());

    let pool = state.store.pool()?;
    let filter = Filter::new().eq("name", req.name.as_str())?;
    let user = db::list_documents(pool, USERS.collection, &filter)
        .await?
        .into_iter()
        .next()
        .ok_or_else(invalid)?;

    let stored = user
        .fields
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !verify_password(&req.password, stored) {
        return Err(invalid());
    }

    Ok(Json(ApiResponse::success(
        "Login successful.",
        user.without(USERS.hidden),
    )))
}
