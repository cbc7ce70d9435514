//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::Parser;

/// ローカルファイルをストレージバケットへアップロードするCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "upsync")]
#[command(about = "Upload local files to a storage bucket and print their public URLs", long_about = None)]
pub struct Args {
    /// Files or directories to upload (directories are expanded recursively)
    pub paths: Vec<String>,

    /// Dry run mode - don't actually upload
    #[arg(long)]
    pub dry_run: bool,

    /// Config file path
    #[arg(short, long, default_value = "./.upsync/config.json")]
    pub config: String,
}
