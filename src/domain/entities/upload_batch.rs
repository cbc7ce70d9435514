//! # UploadBatch Value Object
//!
//! アップロードバッチのバリューオブジェクト

use super::file_descriptor::FileDescriptor;

/// アップロードバッチ
///
/// 選択時に作成されるファイル記述子の順序付きコレクション。
/// バッチ完了後（成功・失敗を問わず）破棄され、サイクルをまたいで
/// 部分的に再利用されることはない
#[derive(Debug, Clone)]
pub struct UploadBatch {
    files: Vec<FileDescriptor>,
}

impl UploadBatch {
    /// 新しいアップロードバッチを作成
    ///
    /// # Arguments
    ///
    /// * `files` - ファイル記述子のベクター（選択順）
    pub fn new(files: Vec<FileDescriptor>) -> Self {
        Self { files }
    }

    /// バッチ内のファイル数を返す
    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// バッチが空かどうかを返す
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// ファイルへの参照を返す
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// ファイルの所有権を移動して返す
    pub fn into_files(self) -> Vec<FileDescriptor> {
        self.files
    }

    /// バッチの合計サイズ（バイト）を返す
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

impl From<Vec<FileDescriptor>> for UploadBatch {
    fn from(files: Vec<FileDescriptor>) -> Self {
        Self::new(files)
    }
}

impl From<UploadBatch> for Vec<FileDescriptor> {
    fn from(batch: UploadBatch) -> Self {
        batch.into_files()
    }
}
