//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `PORT`: 서버 포트 번호 (필수)
//! - `MONGO_URL`: 문서 저장소 연결 문자열 (필수, 예: `sqlite:data/store.db`)
//! - `BASE_URL`: 이미지 URL 호스트를 바꿔 쓸 배포 주소 (없으면 마이그레이션 생략)
//! - `HOST`: 서버 바인딩 주소 (기본값: `0.0.0.0`)
//! - `PUBLIC_DIR`: 정적 이미지 루트 디렉토리 (기본값: `public`)
//! - `DB_MAX_CONNECTIONS`: 연결 풀 크기 (기본값: 5)
//! - `MIGRATION_CONCURRENCY`: 마이그레이션 동시 저장 개수 (기본값: 8)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// 설정을 읽는 중 발생할 수 있는 에러
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 필수 환경변수가 설정되지 않음
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// 값은 있지만 원하는 타입으로 파싱할 수 없음
    #[error("invalid value {value:?} for environment variable {name}")]
    Invalid { name: &'static str, value: String },
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// `AppState`를 통해 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버가 바인딩할 호스트 주소
    pub host: String,
    /// 서버 포트 번호
    pub port: u16,
    /// 문서 저장소 연결 문자열
    pub database_url: String,
    /// 이미지 URL을 다시 쓸 배포 주소 (예: "https://api.example.com")
    pub base_url: Option<String>,
    /// `products`, `category`, `posters` 하위 디렉토리를 가진 정적 파일 루트
    pub public_dir: PathBuf,
    /// 연결 풀의 최대 연결 수
    pub max_connections: u32,
    /// 마이그레이션에서 동시에 진행할 저장 작업 수
    pub migration_concurrency: usize,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `PORT`와 `MONGO_URL`은 필수이며, 없으면 `ConfigError::Missing`이 발생합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로부터 설정을 만듭니다.
    ///
    /// 테스트에서는 프로세스 환경변수를 건드리지 않고 HashMap 등으로 값을 주입합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 빈 문자열은 설정하지 않은 것과 같게 취급합니다.
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = get("PORT").ok_or(ConfigError::Missing("PORT"))?;
        let database_url = get("MONGO_URL").ok_or(ConfigError::Missing("MONGO_URL"))?;

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse("PORT", port)?,
            database_url,
            base_url: get("BASE_URL"),
            public_dir: get("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            max_connections: get("DB_MAX_CONNECTIONS")
                .map(|value| parse("DB_MAX_CONNECTIONS", value))
                .transpose()?
                .unwrap_or(5),
            migration_concurrency: get("MIGRATION_CONCURRENCY")
                .map(|value| parse("MIGRATION_CONCURRENCY", value))
                .transpose()?
                .unwrap_or(8)
                .max(1),
        })
    }

    /// 리스너 바인딩 주소 ("host:port")
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
