//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `envelope`: 모든 응답이 공통으로 사용하는 `{success, message, data}` 봉투
//! - `document`: 문서 저장소에 보관되는 레코드
//! - `product`: 이미지 URL 마이그레이션이 다루는 상품/이미지 구조
//! - `user`: 로그인 요청 본문

pub mod document;
pub mod envelope;
pub mod product;
pub mod user;

pub use document::*;
pub use envelope::*;
pub use product::*;
pub use user::*;
