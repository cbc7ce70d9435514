//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **ProcessBatchUseCase**: バッチの並列アップロードとURL収集

pub mod process_batch;
