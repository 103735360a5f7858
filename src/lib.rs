//! # 온라인 스토어 API
//!
//! 카테고리, 상품, 주문, 결제, 사용자, 알림을 다루는 REST API와
//! 상품/카테고리/포스터 이미지 정적 파일 서빙을 제공합니다.
//!
//! `create_app()`이 라우터 전체를 조립하고, 실행 파일(`main.rs`)은
//! 설정 로딩, 저장소 연결, 이미지 URL 마이그레이션, 서버 시작만 담당합니다.
//! 라우터 조립을 라이브러리로 분리해 두었기 때문에 `tests/`의 통합 테스트도
//! 실제 서버를 띄우지 않고 같은 라우터를 호출할 수 있습니다.

// ── 모듈 선언 ──
// `pub mod`: 다른 크레이트(여기서는 main.rs와 tests/)에서도 접근할 수 있는 공개 모듈
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use axum::{
    routing::get, // GET 메서드 라우팅 함수
    Router,       // 라우터: URL 경로와 핸들러를 연결하는 구조체
};
use routes::AppState; // 모든 핸들러가 공유하는 상태 (저장소 + 설정)
use tower_http::{
    // tower-http: HTTP 미들웨어 모음 크레이트
    cors::{Any, CorsLayer},                     // CORS(Cross-Origin Resource Sharing) 설정
    normalize_path::NormalizePath,              // 경로 끝의 `/` 정리
    services::ServeDir,                         // 디렉토리 정적 파일 서빙 서비스
    trace::TraceLayer,                          // HTTP 요청/응답 로깅 미들웨어
};

/// 정적 이미지 경로 접두사와 `PUBLIC_DIR` 아래의 하위 디렉토리
pub const IMAGE_MOUNTS: [(&str, &str); 3] = [
    ("/image/products", "products"),
    ("/image/category", "category"),
    ("/image/poster", "posters"),
];

/// 완성된 애플리케이션 서비스
///
/// 라우터를 경로 정리 미들웨어로 한 번 더 감싼 타입입니다.
pub type App = NormalizePath<Router>;

/// 애플리케이션 라우터를 조립합니다.
///
/// 1. 정적 이미지 디렉토리 세 곳을 고정 접두사에 연결
/// 2. 등록표(`routes::MODULES`)의 라우트 모듈을 각 접두사 아래에 중첩
/// 3. `GET /`와 404 fallback 등록
/// 4. CORS(모든 출처 허용)와 요청 로깅 미들웨어 적용
/// 5. 끝에 붙은 `/`를 제거하여 `/categories/`도 `/categories`와 같은 핸들러로 보냄
pub fn create_app(state: AppState) -> App {
    let public_dir = state.config.public_dir.clone();

    let mut app = Router::new().route("/", get(routes::root::api_status));

    // nest_service: 접두사 아래의 모든 요청을 하나의 서비스(ServeDir)에 넘깁니다.
    // ServeDir은 파일이 없으면 자체적으로 404를 반환합니다.
    for (prefix, dir) in IMAGE_MOUNTS {
        app = app.nest_service(prefix, ServeDir::new(public_dir.join(dir)));
    }

    // nest: 하위 라우터의 모든 경로 앞에 접두사를 붙여 연결합니다.
    // 예: categories 라우터의 "/{id}" → "/categories/{id}"
    for module in routes::MODULES {
        app = app.nest(module.prefix, (module.build)());
    }

    // CORS 설정: 모든 출처, 메서드, 헤더를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = app
        .fallback(routes::root::route_not_found) // 어느 라우트에도 맞지 않는 요청 → 404 봉투
        .with_state(state) // 모든 핸들러에 AppState 주입
        .layer(cors)
        .layer(TraceLayer::new_for_http()); // HTTP 요청/응답 자동 로깅

    // Router::layer로 붙인 미들웨어는 라우팅이 끝난 뒤에 실행되므로,
    // 경로를 바꾸는 미들웨어는 라우터 바깥에서 감싸야 라우팅에 반영됩니다.
    NormalizePath::trim_trailing_slash(router)
}
