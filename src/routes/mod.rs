//! # 라우트 모듈
//!
//! HTTP 요청을 처리하는 라우트 모듈들과, 이를 경로 접두사에 연결하는
//! 명시적인 등록표(`MODULES`)를 정의합니다.
//!
//! 각 하위 모듈:
//! - `crud`: 리소스 정의로부터 만드는 일반 CRUD 핸들러
//! - `resources`: 리소스(카테고리, 상품, 주문 등) 정의
//! - `products`: 상품 이미지 목록 검증
//! - `users`: 비밀번호 해싱이 필요한 사용자 생성/수정, 로그인
//! - `orders`: 사용자별 주문 조회
//! - `root`: `GET /`와 404 처리
//! - `extract`: 봉투 형태로 거부하는 JSON 추출기

pub mod crud;
pub mod extract;
pub mod orders;
pub mod products;
pub mod resources;
pub mod root;
pub mod users;

use crate::{config::Config, db::DocumentStore};
use axum::Router;
use resources::*;
use std::sync::Arc;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `main`에서 한 번 만들어 `Router::with_state`로 주입합니다.
#[derive(Debug, Clone)]
pub struct AppState {
    /// 문서 저장소 (연결 실패 시 "연결 안 됨" 상태)
    pub store: DocumentStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: DocumentStore, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// 경로 접두사 하나와 그 아래에 붙일 라우터를 만드는 함수
#[derive(Debug, Clone, Copy)]
pub struct RouteModule {
    pub prefix: &'static str,
    pub build: fn() -> Router<AppState>,
}

/// 시작 시 조립되는 라우트 모듈 등록표
pub const MODULES: &[RouteModule] = &[
    RouteModule { prefix: "/categories", build: categories },
    RouteModule { prefix: "/subCategories", build: sub_categories },
    RouteModule { prefix: "/brands", build: brands },
    RouteModule { prefix: "/variantTypes", build: variant_types },
    RouteModule { prefix: "/variants", build: variants },
    RouteModule { prefix: "/products", build: products },
    RouteModule { prefix: "/couponCodes", build: coupon_codes },
    RouteModule { prefix: "/posters", build: posters },
    RouteModule { prefix: "/users", build: users::router },
    RouteModule { prefix: "/orders", build: orders::router },
    RouteModule { prefix: "/payment", build: payment },
    RouteModule { prefix: "/notification", build: notification },
];

fn categories() -> Router<AppState> {
    crud::router(&CATEGORIES)
}

fn sub_categories() -> Router<AppState> {
    crud::router(&SUB_CATEGORIES)
}

fn brands() -> Router<AppState> {
    crud::router(&BRANDS)
}

fn variant_types() -> Router<AppState> {
    crud::router(&VARIANT_TYPES)
}

fn variants() -> Router<AppState> {
    crud::router(&VARIANTS)
}

fn products() -> Router<AppState> {
    crud::router(&PRODUCTS)
}

fn coupon_codes() -> Router<AppState> {
    crud::router(&COUPON_CODES)
}

fn posters() -> Router<AppState> {
    crud::router(&POSTERS)
}

fn payment() -> Router<AppState> {
    crud::router(&PAYMENTS)
}

fn notification() -> Router<AppState> {
    crud::router(&NOTIFICATIONS)
}
