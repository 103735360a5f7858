use serde::Deserialize;

/// `POST /users/login` 요청 본문
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}
