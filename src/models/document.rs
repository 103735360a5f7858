//! # 문서(Document) 모델
//!
//! 문서 저장소의 한 레코드입니다. 컬렉션마다 스키마가 고정되어 있지 않으므로
//! 본문은 JSON 객체(`Map<String, Value>`) 그대로 보관합니다.
//!
//! API 응답에서는 Mongo 스타일의 키 이름을 사용합니다:
//! `{ "_id": "...", ...본문 필드, "createdAt": "...", "updatedAt": "..." }`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 서버가 관리하는 키. 클라이언트가 보낸 본문에서는 제거됩니다.
pub const SERVER_MANAGED_KEYS: [&str; 3] = ["_id", "createdAt", "updatedAt"];

/// 저장소에 보관된 문서 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// 문서 고유 식별자 (UUIDv7 문자열)
    #[serde(rename = "_id")]
    pub id: String,
    /// 문서 본문 필드들
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl Document {
    /// 응답에서 숨겨야 하는 필드(예: 사용자 비밀번호 해시)를 제거합니다.
    pub fn without(mut self, hidden: &[&str]) -> Self {
        for key in hidden {
            self.fields.remove(*key);
        }
        self
    }
}

/// `documents` 테이블의 한 행(row)
///
/// `body`는 JSON 텍스트이며 `Document`로 변환할 때 파싱합니다.
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<DocumentRow> for Document {
    type Error = serde_json::Error;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            fields: serde_json::from_str(&row.body)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// 클라이언트 본문에서 서버 관리 키를 제거합니다.
pub fn strip_server_keys(fields: &mut Map<String, Value>) {
    for key in SERVER_MANAGED_KEYS {
        fields.remove(key);
    }
}
