//! Supabase Storage Repository Implementation
//!
//! StorageRepositoryのSupabase Storage実装

use async_trait::async_trait;
use bytes::Bytes;

use crate::adapter::supabase::client::SupabaseStorageClient;
use crate::domain::repositories::storage_repository::{
    ObjectEntry, StorageError, StorageRepository,
};

/// Supabase Storageリポジトリ
pub struct SupabaseStorageRepository {
    client: SupabaseStorageClient,
}

impl SupabaseStorageRepository {
    /// 新しいリポジトリを作成
    pub fn new(client: SupabaseStorageClient) -> Self {
        Self { client }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[async_trait]
impl StorageRepository for SupabaseStorageRepository {
    async fn upload(&self, bucket: &str, path: &str, content: Bytes) -> Result<(), StorageError> {
        self.client.upload_object(bucket, path, content).await
    }

    async fn list(&self, bucket: &str, path: &str) -> Result<Vec<ObjectEntry>, StorageError> {
        // APIモデルからDomainのエントリへ変換
        let entries = self.client.list_objects(bucket, path).await?;
        Ok(entries
            .into_iter()
            .map(|o| ObjectEntry { name: o.name })
            .collect())
    }

    async fn get_public_url(&self, bucket: &str, path: &str) -> Result<String, StorageError> {
        Ok(self.client.public_object_url(bucket, path))
    }
}
