//! # FileDescriptor Entity
//!
//! アップロード対象ファイルのエンティティ

use bytes::Bytes;

/// アップロード対象ファイル
///
/// 選択時に作成される不変の記述子。1バッチサイクルの間だけ
/// バッチに所有される
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    /// 元のファイル名（パスを含まない）
    pub name: String,
    /// ファイルサイズ（バイト）
    pub size: u64,
    /// ファイル内容
    pub content: Bytes,
}

impl FileDescriptor {
    /// 新しいファイル記述子を作成
    ///
    /// # Arguments
    ///
    /// * `name` - 元のファイル名
    /// * `content` - ファイル内容
    pub fn new(name: impl Into<String>, content: Bytes) -> Self {
        let size = content.len() as u64;
        Self {
            name: name.into(),
            size,
            content,
        }
    }
}
