//! # Folder Name Resolver
//!
//! アップロード先フォルダ名の解決

use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};

/// 単一ファイルアップロードで再利用される固定フォルダ名
///
/// フォルダ内の衝突はオブジェクト名側のタイムスタンプ接頭辞で回避される
pub const PRIMARY_FOLDER: &str = "Primary";

/// フォルダ名リゾルバ
///
/// 既存コンテンツと衝突しないアップロード先フォルダを決定するビジネスロジック
pub struct FolderNameResolver;

impl FolderNameResolver {
    /// アップロード先フォルダ名を解決
    ///
    /// 単一ファイルの場合は固定の [`PRIMARY_FOLDER`] を返す。
    /// 複数ファイルの場合は `base-1`, `base-2`, ... を順に調べ、
    /// 一覧が空だった最初の候補を返す。候補の探索は逐次的に行う
    /// （最初の空き候補で停止する必要があるため）
    ///
    /// # Arguments
    ///
    /// * `storage` - ストレージリポジトリ
    /// * `bucket` - 対象バケット名
    /// * `base` - フォルダ名のプレフィックス
    /// * `file_count` - バッチ内のファイル数
    ///
    /// # Errors
    ///
    /// 一覧取得が NotFound 以外の原因で失敗した場合にエラーを返す。
    /// 既存コンテンツへの上書きを防ぐため、一時的なエラーを
    /// 「フォルダが空」として扱ってはならない
    pub async fn resolve<S>(
        storage: &S,
        bucket: &str,
        base: &str,
        file_count: usize,
    ) -> Result<String, StorageError>
    where
        S: StorageRepository + ?Sized,
    {
        if file_count <= 1 {
            return Ok(PRIMARY_FOLDER.to_string());
        }

        let mut index = 0usize;
        loop {
            index += 1;
            let candidate = format!("{}-{}", base, index);

            match storage.list(bucket, &candidate).await {
                Ok(entries) if entries.is_empty() => return Ok(candidate),
                Ok(_) => {
                    log::debug!("folder {} already has content, trying next", candidate);
                }
                // 未作成のフォルダは空とみなす
                Err(StorageError::NotFound(_)) => return Ok(candidate),
                Err(e) => return Err(e),
            }
        }
    }
}
