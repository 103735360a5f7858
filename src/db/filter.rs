//! # 조회 조건(Filter)
//!
//! `GET /orders?orderStatus=pending&userID=abc` 처럼 쿼리 파라미터로 들어온
//! 최상위 필드 일치 조건을 SQL WHERE 절로 바꿉니다.
//!
//! 필드 이름은 영문자/숫자/밑줄만 허용합니다. 값은 항상 바인딩되고,
//! 저장된 값은 텍스트로 바꿔서 비교합니다 (숫자 `5`는 `"5"`, 불리언은 `"true"`/`"false"`).

use sqlx::{QueryBuilder, Sqlite};
use thiserror::Error;

/// 허용되지 않는 필드 이름
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid filter field {0:?}")]
pub struct InvalidField(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Id(String),
    Field { path: String, value: String },
}

/// 모든 조건을 AND로 묶는 필터. 비어 있으면 컬렉션 전체를 뜻합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field == value` 조건을 추가합니다. `_id`는 문서 ID와 비교합니다.
    pub fn eq(mut self, field: &str, value: impl Into<String>) -> Result<Self, InvalidField> {
        let value = value.into();
        if field == "_id" {
            self.conditions.push(Condition::Id(value));
            return Ok(self);
        }

        let valid = !field.is_empty()
            && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(InvalidField(field.to_string()));
        }

        self.conditions.push(Condition::Field {
            path: format!("$.{field}"),
            value,
        });
        Ok(self)
    }

    /// 쿼리 파라미터 목록으로부터 필터를 만듭니다.
    pub fn from_params<I>(params: I) -> Result<Self, InvalidField>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        params
            .into_iter()
            .try_fold(Self::new(), |filter, (field, value)| filter.eq(&field, value))
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// 조건들을 ` AND ...` 형태로 쿼리 빌더에 이어 붙입니다.
    pub(crate) fn push_conditions(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        for condition in &self.conditions {
            match condition {
                Condition::Id(id) => {
                    query.push(" AND id = ");
                    query.push_bind(id.clone());
                }
                Condition::Field { path, value } => {
                    // json_extract는 true/false를 1/0으로 돌려주므로 json_type으로 먼저 구분합니다.
                    query.push(" AND (CASE json_type(body, ");
                    query.push_bind(path.clone());
                    query.push(") WHEN 'true' THEN 'true' WHEN 'false' THEN 'false' ELSE CAST(json_extract(body, ");
                    query.push_bind(path.clone());
                    query.push(") AS TEXT) END) = ");
                    query.push_bind(value.clone());
                }
            }
        }
    }
}
