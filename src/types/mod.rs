use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============= Response Envelope =============

/// Machine-readable result codes carried in every response body.
pub mod codes {
    /// Request succeeded.
    pub const SUCCESS: u32 = 20000;
    /// Generic failure (invalid input, not found, internal).
    pub const ERROR: u32 = 50000;
    /// Username/password pair rejected at login.
    pub const INVALID_CREDENTIALS: u32 = 50001;
    /// Authenticated, but the caller's role may not perform the action.
    pub const FORBIDDEN: u32 = 50003;
    /// No bearer token on a protected request.
    pub const MISSING_TOKEN: u32 = 50007;
    /// Token signature did not verify.
    pub const ILLEGAL_TOKEN: u32 = 50008;
    /// Token could not be parsed.
    pub const MALFORMED_TOKEN: u32 = 50009;
    /// Reserved for single-session enforcement; never produced.
    pub const OTHER_CLIENT_LOGIN: u32 = 50012;
    /// Token subject no longer exists or is deactivated.
    pub const INACTIVE_OR_UNKNOWN: u32 = 50013;
    /// Token signature is valid but its lifetime has elapsed.
    pub const TOKEN_EXPIRED: u32 = 50014;
}

/// Uniform body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u32,
    pub status: String,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, msg: impl Into<String>) -> Self {
        Self {
            code: codes::SUCCESS,
            status: "ok".to_string(),
            msg: msg.into(),
            data: Some(data),
        }
    }

    pub fn fail(code: u32, msg: impl Into<String>) -> Self {
        Self {
            code,
            status: "fail".to_string(),
            msg: msg.into(),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload (`data: null`).
    pub fn empty(msg: impl Into<String>) -> Self {
        Self {
            code: codes::SUCCESS,
            status: "ok".to_string(),
            msg: msg.into(),
            data: None,
        }
    }
}

// ============= Authentication Types =============

/// Account role. The set is open: unknown role names round-trip as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
    Reviewer,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Reviewer => "reviewer",
            Role::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "admin" => Role::Admin,
            "user" => Role::User,
            "reviewer" => Role::Reviewer,
            _ => Role::Other(s),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::from(s.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT payload. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// The caller resolved by the authentication guard for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
    pub active: bool,
}

// ============= User Center Types =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub avatar: String,
    pub email: String,
    pub job: String,
    pub job_name: String,
    pub organization: String,
    pub organization_name: String,
    pub location: String,
    pub location_name: String,
    pub introduction: String,
    pub personal_website: String,
    pub phone: String,
    pub registration_date: String,
    pub account_id: String,
    pub certification: u8,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub path: String,
    pub name: String,
    pub meta: MenuMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuMeta {
    pub locale: String,
    pub requires_auth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Roles allowed to see the entry; `None` means everyone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
}

/// Body of `/api/user/save-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub country_region: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub profile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub people_number: u32,
    pub contributors: Vec<Contributor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub id: u64,
    pub avatar: String,
    pub name: String,
    pub people_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseInfo {
    pub account_type: u8,
    pub status: u8,
    pub time: String,
    pub legal_person: String,
    pub certificate_type: String,
    pub authentication_number: String,
    pub enterprise_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationRecord {
    pub certification_type: u8,
    pub certification_content: String,
    pub status: u8,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub enterprise_info: EnterpriseInfo,
    pub record: Vec<CertificationRecord>,
}

// ============= Profile Types =============

/// Stream settings shown on the profile page. The nested `video` and `audio`
/// objects are opaque to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileBasic {
    pub status: u16,
    pub video: serde_json::Value,
    pub audio: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationLogRecord {
    pub key: String,
    pub content_number: String,
    pub update_content: String,
    pub status: u8,
    pub update_time: String,
}

// ============= Message Types =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub sub_title: String,
    pub avatar: Option<String>,
    pub content: String,
    pub time: String,
    /// 0 unread, 1 read
    pub status: u8,
    pub message_type: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct MessageStatus {
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    pub id: u64,
    pub username: String,
    pub content: String,
    pub time: String,
    pub is_collect: bool,
}

// ============= Material Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiReviewResult {
    pub score: u8,
    pub confidence: u8,
    pub suggestions: Vec<String>,
    pub risk_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub file_url: String,
    pub file_name: String,
    pub file_size: u64,
    pub status: MaterialStatus,
    pub uploader: String,
    pub upload_time: DateTime<Utc>,
    pub reviewer: Option<String>,
    pub review_time: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    pub ai_review_result: Option<AiReviewResult>,
}

#[derive(Debug, Deserialize)]
pub struct UploadMaterialRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Identifiers of files previously stored by the upload collaborator.
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MaterialFilter {
    pub status: Option<MaterialStatus>,
    pub category: Option<String>,
    pub uploader: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMaterialRequest {
    pub material_id: String,
    pub status: MaterialStatus,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReviewRequest {
    pub material_ids: Vec<String>,
    pub status: MaterialStatus,
    pub comment: Option<String>,
}

/// Body naming a single material, used by delete and AI review.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialIdRequest {
    pub material_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialStatistics {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub by_category: std::collections::BTreeMap<String, usize>,
}

// ============= List Types =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecord {
    pub id: String,
    pub number: u32,
    pub name: String,
    /// img, horizontalVideo, verticalVideo
    pub content_type: String,
    /// artificial, rules
    pub filter_type: String,
    pub count: u32,
    /// online, offline
    pub status: String,
    pub created_time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyQuery {
    pub current: Option<usize>,
    pub page_size: Option<usize>,
    pub id: Option<String>,
    pub number: Option<u32>,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub filter_type: Option<String>,
    pub count: Option<u32>,
    pub status: Option<String>,
    pub created_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyList {
    pub list: Vec<PolicyRecord>,
    pub total: usize,
}

/// Entry of the quality-inspection, service and rules-preset lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<bool>,
}

// ============= Error Types =============

/// Why a request failed to authenticate. Every kind is terminal for the
/// request; the client recovers by logging in again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    Missing,

    #[error("Malformed token")]
    Malformed,

    #[error("Illegal token")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Account is inactive or unknown")]
    InactiveOrUnknown,
}

impl AuthError {
    pub fn code(&self) -> u32 {
        match self {
            AuthError::InvalidCredentials => codes::INVALID_CREDENTIALS,
            AuthError::Missing => codes::MISSING_TOKEN,
            AuthError::Malformed => codes::MALFORMED_TOKEN,
            AuthError::BadSignature => codes::ILLEGAL_TOKEN,
            AuthError::Expired => codes::TOKEN_EXPIRED,
            AuthError::InactiveOrUnknown => codes::INACTIVE_OR_UNKNOWN,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            AppError::Auth(kind) => kind.code(),
            AppError::Forbidden(_) => codes::FORBIDDEN,
            _ => codes::ERROR,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            AppError::Auth(kind) => kind.to_string(),
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidInput(msg) => msg.clone(),
            // Internal details stay in the logs
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "Internal server error".to_string()
            }
        };

        let body = ApiResponse::<()>::fail(self.code(), message);

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
