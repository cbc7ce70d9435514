//! Supabase Storage Client
//!
//! Storage v1 オブジェクトAPIの薄いHTTPラッパー

use anyhow::{anyhow, Context};
use bytes::Bytes;
use reqwest::StatusCode;

use super::models::{ApiErrorResponse, ListObjectsRequest, ObjectInfo};
use crate::domain::repositories::storage_repository::StorageError;

/// 一覧取得の1回あたりの最大件数
///
/// フォルダ解決には「空かどうか」だけ分かればよいので1ページで足りる
const LIST_PAGE_LIMIT: u32 = 100;

/// Supabase Storageクライアント
pub struct SupabaseStorageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStorageClient {
    /// 新しいクライアントを作成
    ///
    /// # Arguments
    ///
    /// * `project_url` - プロジェクトURL（例: `https://xyzcompany.supabase.co`）
    /// * `api_key` - APIキー
    pub fn new(project_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: project_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }

    fn list_url(&self, bucket: &str) -> String {
        format!("{}/storage/v1/object/list/{}", self.base_url, bucket)
    }

    /// オブジェクトの公開URL
    ///
    /// 公開URLはAPI呼び出しなしで構成できる
    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }

    /// オブジェクトをアップロード
    ///
    /// # Errors
    ///
    /// リクエストの送信に失敗した場合、またはAPIがエラーを返した場合
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        content: Bytes,
    ) -> Result<(), StorageError> {
        let response = self
            .http
            .post(self.object_url(bucket, path))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(content)
            .send()
            .await
            .context("storage upload request failed")?;

        Self::check_response(response, path).await?;
        Ok(())
    }

    /// フォルダ配下のオブジェクトを一覧
    ///
    /// # Errors
    ///
    /// リクエストの送信に失敗した場合、またはAPIがエラーを返した場合
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, StorageError> {
        let request = ListObjectsRequest {
            prefix: prefix.to_string(),
            limit: LIST_PAGE_LIMIT,
            offset: 0,
        };

        let response = self
            .http
            .post(self.list_url(bucket))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("storage list request failed")?;

        let response = Self::check_response(response, prefix).await?;
        let entries = response
            .json::<Vec<ObjectInfo>>()
            .await
            .context("failed to decode object listing")?;

        Ok(entries)
    }

    /// ステータスコードを検査し、エラーレスポンスをStorageErrorへ変換
    #[cfg_attr(coverage_nightly, coverage(off))]
    async fn check_response(
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ApiErrorResponse>()
            .await
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| status.to_string());

        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(path.to_string()));
        }

        Err(StorageError::Backend(anyhow!(
            "storage API error ({}): {}",
            status,
            detail
        )))
    }
}
