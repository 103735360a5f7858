//! # 온라인 스토어 API 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 문서 저장소 연결 (실패해도 서버는 계속 시작)
//! 4. 연결에 성공하면 이미지 URL 마이그레이션을 한 번 실행
//! 5. 정적 이미지 디렉토리 생성
//! 6. 라우터 조립 후 HTTP 서버 시작

// ── 외부 크레이트 및 라이브러리에서 필요한 항목 가져오기 ──
use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use axum::{
    extract::Request, // HTTP 요청 타입 (into_make_service의 타입 인자)
    ServiceExt,       // 라우터가 아닌 서비스(NormalizePath)를 서버에 넘기기 위한 확장 트레이트
};
use online_store_api::{
    config::Config,          // 환경변수 설정
    create_app,              // 라우터 전체 조립
    db::DocumentStore,       // 문서 저장소 (연결됨 / 연결 안 됨)
    routes::AppState,        // 핸들러 공유 상태
    services::image_urls,    // 시작 시 이미지 URL 마이그레이션
    IMAGE_MOUNTS,            // 정적 이미지 디렉토리 목록
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티

// #[tokio::main]: Tokio 비동기 런타임을 만들고 main을 그 안에서 실행합니다.
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .ok(): .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 이 크레이트, tower_http, axum을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "online_store_api=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 로그를 터미널에 출력하는 포맷터 레이어
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // PORT나 MONGO_URL이 없으면 `?`로 에러를 전파하여 시작을 중단합니다.
    let config = Config::from_env()?;
    tracing::info!("Starting online store API on {}", config.bind_address());

    // ── 4단계: 문서 저장소 연결 ──
    // 연결 실패는 치명적이지 않습니다. 저장소가 필요한 요청만 500으로 실패합니다.
    let store = match DocumentStore::connect(&config.database_url, config.max_connections).await {
        Ok(store) => {
            tracing::info!("Connected to Database");
            store
        }
        Err(e) => {
            tracing::error!("Failed to connect to the document store: {}", e);
            DocumentStore::disconnected()
        }
    };

    // ── 5단계: 이미지 URL 마이그레이션 ──
    // tokio::spawn: 별도 태스크로 실행하여 서버 시작을 기다리게 하지 않습니다.
    // 요청 처리와 동시에 실행되어도 다른 요청이 바꾼 상품은 덮어쓰지 않습니다.
    if let Ok(pool) = store.pool() {
        match &config.base_url {
            Some(base_url) => {
                tokio::spawn(image_urls::run_on_startup(
                    pool.clone(), // SqlitePool은 내부적으로 Arc이므로 clone해도 같은 풀
                    base_url.clone(),
                    config.migration_concurrency,
                ));
            }
            None => tracing::warn!("BASE_URL is not set, skipping image URL update"),
        }
    }

    // ── 6단계: 정적 이미지 디렉토리 생성 ──
    // create_dir_all: 중간 디렉토리까지 모두 생성 (mkdir -p와 같음)
    for (_, dir) in IMAGE_MOUNTS {
        let path = config.public_dir.join(dir);
        if !path.exists() {
            tokio::fs::create_dir_all(&path).await?;
            tracing::info!("Created image directory: {}", path.display());
        }
    }

    // ── 7단계: 라우터 조립 ──
    // config는 AppState로 이동(move)하므로 필요한 값은 미리 꺼내 둡니다.
    let addr = config.bind_address();
    let port = config.port;
    let app = create_app(AppState::new(store, config));

    // ── 8단계: 서버 시작 ──
    // TcpListener::bind: 지정한 주소에서 TCP 연결을 받기 시작합니다.
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on port {}", port);

    // into_make_service: 연결마다 서비스 인스턴스를 만들어 주는 팩토리로 변환합니다.
    // NormalizePath로 감싼 라우터는 Router가 아니므로 명시적으로 변환이 필요합니다.
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
