//! Adapter Layer
//!
//! 外部システム（Supabase Storage, 設定ファイル）との統合

pub mod config;
pub mod repositories;
pub mod supabase;
