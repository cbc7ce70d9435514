//! Supabase Storage API Models
//!
//! Storage v1 オブジェクトAPIのリクエスト/レスポンスモデル

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// オブジェクト一覧リクエストのボディ
#[derive(Debug, Serialize)]
pub struct ListObjectsRequest {
    pub prefix: String,
    pub limit: u32,
    pub offset: u32,
}

/// 一覧レスポンスのオブジェクト情報
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectInfo {
    pub name: String,
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// ストレージAPIのエラーレスポンス
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub status_code: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}
