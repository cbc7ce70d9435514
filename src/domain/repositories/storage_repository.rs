//! # Storage Repository Trait
//!
//! オブジェクトストレージへのアクセスを抽象化

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// ストレージ操作のエラー
#[derive(Debug, Error)]
pub enum StorageError {
    /// 対象のパスが存在しない
    #[error("not found: {0}")]
    NotFound(String),

    /// バックエンド側の失敗（ネットワーク、認可など）
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// バケット内のオブジェクト一覧のエントリ
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    /// オブジェクト名（フォルダ内の相対名）
    pub name: String,
}

/// ストレージリポジトリ
///
/// オブジェクトのアップロード、一覧取得、公開URL解決を担当するリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// オブジェクトをアップロード
    ///
    /// # Arguments
    ///
    /// * `bucket` - アップロード先バケット名
    /// * `path` - バケット内のオブジェクトパス（`folder/name` 形式）
    /// * `content` - オブジェクトの内容
    ///
    /// # Errors
    ///
    /// 転送に失敗した場合にエラーを返す
    async fn upload(&self, bucket: &str, path: &str, content: Bytes) -> Result<(), StorageError>;

    /// フォルダ配下のオブジェクトを一覧
    ///
    /// # Arguments
    ///
    /// * `bucket` - バケット名
    /// * `path` - 一覧対象のフォルダパス
    ///
    /// # Returns
    ///
    /// フォルダ直下のエントリのリスト。空のフォルダは空のリスト
    ///
    /// # Errors
    ///
    /// フォルダが存在しない場合は [`StorageError::NotFound`]、
    /// その他の失敗は [`StorageError::Backend`] を返す
    async fn list(&self, bucket: &str, path: &str) -> Result<Vec<ObjectEntry>, StorageError>;

    /// オブジェクトの公開URLを解決
    ///
    /// # Arguments
    ///
    /// * `bucket` - バケット名
    /// * `path` - オブジェクトパス
    async fn get_public_url(&self, bucket: &str, path: &str) -> Result<String, StorageError>;
}
