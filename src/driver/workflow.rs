//! Workflow Orchestration
//!
//! ワークフローのオーケストレーション

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::adapter::config::Config;
use crate::adapter::repositories::supabase_storage_repository::SupabaseStorageRepository;
use crate::adapter::supabase::client::SupabaseStorageClient;
use crate::application::dto::uploader_options::UploaderOptions;
use crate::application::orchestrator::{UploadListener, UploadOrchestrator};
use crate::application::use_cases::process_batch::UploadError;
use crate::domain::entities::file_descriptor::FileDescriptor;
use crate::domain::entities::upload_batch::UploadBatch;

use super::cli::Args;

/// 選択されたパスをアップロード対象ファイルへ展開
///
/// ディレクトリは再帰的に展開される。展開後も引数の順序を保つ
pub fn collect_upload_paths(paths: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for raw in paths {
        let expanded = shellexpand::tilde(raw);
        let path = Path::new(expanded.as_ref());

        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.context("failed to walk directory")?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else if path.is_file() {
            files.push(path.to_path_buf());
        } else {
            bail!("no such file or directory: {}", raw);
        }
    }

    Ok(files)
}

/// バイト数をMB表記へ変換（選択サマリー表示用）
pub fn format_total_size_mb(total: u64) -> String {
    format!("{:.2} MB", total as f64 / (1024.0 * 1024.0))
}

/// 成功URLを出力し、失敗を記録するコンソールリスナー
struct ConsoleListener {
    failed: AtomicBool,
}

impl ConsoleListener {
    fn new() -> Self {
        Self {
            failed: AtomicBool::new(false),
        }
    }

    fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

impl UploadListener for ConsoleListener {
    fn on_upload_success(&self, urls: &[String]) {
        println!("✓ Files uploaded successfully");
        for url in urls {
            println!("  {}", url);
        }
    }

    fn on_upload_error(&self, error: &UploadError) {
        println!("✗ Error uploading files: {}", error);
        self.failed.store(true, Ordering::SeqCst);
    }
}

/// File Upload Workflow
pub struct FileUploadWorkflow {
    config: Config,
}

impl FileUploadWorkflow {
    /// Create a new workflow instance with dependency injection
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Execute the upload workflow
    pub async fn execute(&self, args: Args) -> Result<()> {
        info!("Starting bucket uploader...");
        info!("Dry run: {}", args.dry_run);

        println!("✓ Using configuration:");
        println!("  Project: {}", self.config.project_url);
        println!("  Bucket: {}", self.config.bucket_name);
        println!("  Folder base: {}", self.config.folder_base_name);

        if args.paths.is_empty() {
            println!("No files selected. Exiting.");
            return Ok(());
        }

        // 対象ファイルを展開
        let paths = collect_upload_paths(&args.paths)?;
        if paths.is_empty() {
            println!("No files to upload. Exiting.");
            return Ok(());
        }

        // ファイルを読み込んでバッチを作成
        let mut files = Vec::with_capacity(paths.len());
        for path in &paths {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("invalid file name: {}", path.display()))?
                .to_string();
            let content = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            files.push(FileDescriptor::new(name, Bytes::from(content)));
        }
        let batch = UploadBatch::new(files);

        // 選択サマリー
        let names: Vec<&str> = batch.files().iter().map(|f| f.name.as_str()).collect();
        println!("✓ Selected {} file(s): {}", batch.len(), names.join(", "));
        println!("  Total size: {}", format_total_size_mb(batch.total_size()));

        if args.dry_run {
            println!("✓ Dry-run mode (not actually uploading)");
            println!(
                "  Would upload {} file(s) to bucket '{}'",
                batch.len(),
                self.config.bucket_name
            );
            for file in batch.files() {
                println!("    - {} ({} bytes)", file.name, file.size);
            }
            return Ok(());
        }

        // ストレージゲートウェイとオーケストレータを組み立て
        let client = SupabaseStorageClient::new(&self.config.project_url, &self.config.api_key);
        let storage = Arc::new(SupabaseStorageRepository::new(client));
        let listener = Arc::new(ConsoleListener::new());
        let options = UploaderOptions::new(
            self.config.bucket_name.clone(),
            self.config.folder_base_name.clone(),
        );

        let orchestrator = UploadOrchestrator::new(options, storage, Arc::clone(&listener));

        let accepted = orchestrator.submit_batch(batch).await;
        if !accepted {
            println!("No files to upload. Exiting.");
            return Ok(());
        }

        if listener.has_failed() {
            bail!("upload failed");
        }

        println!("✓ Upload complete!");

        Ok(())
    }
}
