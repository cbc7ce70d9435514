//! # Data Transfer Objects
//!
//! 層をまたいで受け渡す設定・データの入れ物

pub mod uploader_options;
