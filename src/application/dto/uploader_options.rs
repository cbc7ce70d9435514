//! # Uploader Options DTO
//!
//! アップローダ設定のData Transfer Object

/// アップローダ設定
///
/// 1つのオーケストレータインスタンスに必要な設定情報
#[derive(Debug, Clone)]
pub struct UploaderOptions {
    /// アップロード先バケット名
    pub bucket_name: String,
    /// 複数ファイルバッチ用のフォルダ名プレフィックス
    pub folder_base_name: String,
}

impl UploaderOptions {
    /// 新しいアップローダ設定を作成
    ///
    /// # Arguments
    ///
    /// * `bucket_name` - アップロード先バケット名
    /// * `folder_base_name` - フォルダ名プレフィックス
    pub fn new(bucket_name: String, folder_base_name: String) -> Self {
        Self {
            bucket_name,
            folder_base_name,
        }
    }
}
