//! # Object Naming Service
//!
//! 保存オブジェクト名の生成

use chrono::{DateTime, Local};

/// オブジェクト命名サービス
///
/// 共有フォルダ内での同名衝突を防ぎ、時系列ソートを保つ命名規則
pub struct ObjectNamingService;

impl ObjectNamingService {
    /// タイムスタンプ接頭辞付きのオブジェクト名を生成
    ///
    /// `MMDDYY-HHMMSS-<元のファイル名>` 形式。タイムスタンプは
    /// バッチ単位ではなくファイル単位で取得したものを渡す
    ///
    /// # Arguments
    ///
    /// * `original` - 元のファイル名
    /// * `at` - アップロード時点のローカル時刻
    pub fn timestamped_name(original: &str, at: DateTime<Local>) -> String {
        format!("{}-{}", at.format("%m%d%y-%H%M%S"), original)
    }
}
