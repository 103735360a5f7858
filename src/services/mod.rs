//! # 서비스 모듈
//!
//! HTTP 계층과 독립적인 비즈니스 로직을 담당합니다.
//! - `image_urls`: 시작 시 한 번 실행되는 상품 이미지 URL 마이그레이션
//! - `password`: 사용자 비밀번호 Argon2id 해싱/검증

pub mod image_urls;
pub mod password;
