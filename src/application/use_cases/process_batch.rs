//! # Process Batch Use Case
//!
//! バッチアップロードユースケース（並列ファンアウト）

use std::sync::Arc;

use chrono::Local;
use thiserror::Error;

use crate::domain::entities::upload_batch::UploadBatch;
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};
use crate::domain::services::object_naming::ObjectNamingService;

/// バッチ境界で報告されるアップロードエラー
///
/// 3種類とも呼び出し側からは「バッチ全体の失敗」として扱われ、
/// エラー通知として1回だけ表面化する
#[derive(Debug, Error)]
pub enum UploadError {
    /// アップロード先フォルダの解決に失敗
    #[error("failed to resolve destination folder under '{base}': {source}")]
    FolderResolution {
        base: String,
        #[source]
        source: StorageError,
    },

    /// 特定ファイルの転送に失敗
    #[error("failed to upload '{file_name}': {source}")]
    Transfer {
        file_name: String,
        #[source]
        source: StorageError,
    },

    /// アップロードは成功したが公開URLの解決に失敗
    #[error("failed to resolve public URL for '{file_name}': {source}")]
    UrlResolution {
        file_name: String,
        #[source]
        source: StorageError,
    },
}

/// バッチアップロードユースケース
///
/// バッチ内の全ファイルを解決済みフォルダへ並列アップロードし、
/// それぞれの公開URLを入力順で返す
pub struct ProcessBatchUseCase<S: StorageRepository + 'static> {
    storage: Arc<S>,
}

impl<S: StorageRepository + 'static> ProcessBatchUseCase<S> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `storage` - ストレージリポジトリ
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// バッチをアップロード
    ///
    /// 全ファイルのアップロードタスクを同時に発行する。ファイルごとに
    /// 転送 → 公開URL解決の両方が成功して初めて成功となる。
    /// いずれかのファイルが失敗した場合はバッチ全体が失敗となり、
    /// 残りの実行中タスクは切り離されたまま走り切る（結果は破棄され、
    /// 部分的な成功として報告されることはない）
    ///
    /// # Arguments
    ///
    /// * `batch` - アップロードするバッチ
    /// * `bucket` - アップロード先バケット名
    /// * `folder` - 解決済みのアップロード先フォルダ
    ///
    /// # Returns
    ///
    /// 入力順と1:1で対応する公開URLのリスト（完了順ではない）
    ///
    /// # Errors
    ///
    /// 入力順で最初に失敗したファイルのエラーを返す
    pub async fn execute(
        &self,
        batch: &UploadBatch,
        bucket: &str,
        folder: &str,
    ) -> Result<Vec<String>, UploadError> {
        let mut handles = Vec::with_capacity(batch.len());

        for file in batch.files() {
            let storage = Arc::clone(&self.storage);
            let bucket = bucket.to_string();
            let folder = folder.to_string();
            let file = file.clone();

            handles.push(tokio::spawn(async move {
                // タイムスタンプはバッチ単位ではなくファイル単位で取得する
                let object_name = ObjectNamingService::timestamped_name(&file.name, Local::now());
                let object_path = format!("{}/{}", folder, object_name);

                log::info!("uploading {} to {}/{}", file.name, bucket, object_path);

                storage
                    .upload(&bucket, &object_path, file.content.clone())
                    .await
                    .map_err(|source| UploadError::Transfer {
                        file_name: file.name.clone(),
                        source,
                    })?;

                storage
                    .get_public_url(&bucket, &object_path)
                    .await
                    .map_err(|source| UploadError::UrlResolution {
                        file_name: file.name.clone(),
                        source,
                    })
            }));
        }

        // 完了順ではなく入力順で結合する
        let mut urls = Vec::with_capacity(batch.len());
        for (handle, file) in handles.into_iter().zip(batch.files()) {
            match handle.await {
                Ok(Ok(url)) => urls.push(url),
                Ok(Err(e)) => return Err(e),
                Err(e) => {
                    return Err(UploadError::Transfer {
                        file_name: file.name.clone(),
                        source: StorageError::Backend(anyhow::anyhow!(e)),
                    })
                }
            }
        }

        Ok(urls)
    }
}
