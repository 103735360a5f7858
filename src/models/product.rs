//! # 상품(Product) 모델
//!
//! 상품의 다른 속성(이름, 가격, 재고 등)은 이 모듈에서 해석하지 않고
//! `other` 맵에 그대로 보관합니다. 이미지 목록만 타입으로 다룹니다.
//! 이렇게 하면 이미지 URL을 바꿔 쓴 뒤 다시 저장해도 나머지 필드가 손실되지 않습니다.

use crate::services::image_urls::rewrite_url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 상품 문서가 저장되는 컬렉션
pub const PRODUCT_COLLECTION: &str = "products";

/// 상품에 포함된(embedded) 이미지 한 장
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// 절대 URL (예: "http://localhost/image/products/1.jpg")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// 상품 문서의 본문
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 순서가 있는 이미지 목록. 필드가 없으면 None.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Image>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Product {
    /// 문서 본문 필드로부터 상품을 만듭니다.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(fields))
    }

    /// 다시 문서 본문 필드로 되돌립니다.
    pub fn into_fields(self) -> Result<Map<String, Value>, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }

    /// 로컬 개발 호스트를 가리키는 이미지 URL을 `base_url`로 바꿔 씁니다.
    ///
    /// 하나라도 바뀌었으면 `true`를 반환합니다.
    pub fn rewrite_image_urls(&mut self, base_url: &str) -> bool {
        let mut changed = false;
        for image in self.images.iter_mut().flatten() {
            let rewritten = image.url.as_deref().and_then(|url| rewrite_url(url, base_url));
            if let Some(url) = rewritten {
                image.url = Some(url);
                changed = true;
            }
        }
        changed
    }
}
