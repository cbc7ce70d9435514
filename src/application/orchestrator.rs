//! # Upload Orchestrator
//!
//! アップロードライフサイクルの状態機械
//!
//! 状態は `Idle` と `Busy` の2つ。バッチ受理から完了までの間 `busy` が
//! 立ち、その間に到着したトリガは破棄される（キューイングしない）。
//! 完了時の状態復帰は成功・失敗・パニックを問わず必ず行われる

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::dto::uploader_options::UploaderOptions;
use crate::application::use_cases::process_batch::{ProcessBatchUseCase, UploadError};
use crate::domain::entities::upload_batch::UploadBatch;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::domain::services::folder_resolver::FolderNameResolver;

/// アップロード結果の通知先
///
/// 1バッチサイクルにつき、成功通知またはエラー通知のどちらか一方だけが
/// 最大1回呼び出される
pub trait UploadListener: Send + Sync {
    /// バッチ成功時に呼び出される
    ///
    /// # Arguments
    ///
    /// * `urls` - 入力順と1:1で対応する公開URL
    fn on_upload_success(&self, urls: &[String]);

    /// バッチ失敗時に呼び出される
    fn on_upload_error(&self, error: &UploadError);
}

impl<T: UploadListener + ?Sized> UploadListener for Arc<T> {
    fn on_upload_success(&self, urls: &[String]) {
        (**self).on_upload_success(urls)
    }

    fn on_upload_error(&self, error: &UploadError) {
        (**self).on_upload_error(error)
    }
}

/// busyフラグをIdleへ戻すガード
///
/// フォルダ解決やアップロード中のパニックを含む全ての脱出経路で
/// 状態復帰を保証する
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// アップロードオーケストレータ
///
/// 選択から完了までのライフサイクルを所有する状態機械。
/// 同時に処理されるバッチは最大1つで、バッチ間でアップロードが
/// 交錯することはない。インスタンスごとに独立した状態を持つ
pub struct UploadOrchestrator<S, L>
where
    S: StorageRepository + 'static,
    L: UploadListener,
{
    options: UploaderOptions,
    storage: Arc<S>,
    listener: L,
    process_batch: ProcessBatchUseCase<S>,
    busy: AtomicBool,
}

impl<S, L> UploadOrchestrator<S, L>
where
    S: StorageRepository + 'static,
    L: UploadListener,
{
    /// 新しいオーケストレータを作成
    ///
    /// # Arguments
    ///
    /// * `options` - アップローダ設定
    /// * `storage` - ストレージリポジトリ
    /// * `listener` - 結果の通知先
    pub fn new(options: UploaderOptions, storage: Arc<S>, listener: L) -> Self {
        let process_batch = ProcessBatchUseCase::new(Arc::clone(&storage));
        Self {
            options,
            storage,
            listener,
            process_batch,
            busy: AtomicBool::new(false),
        }
    }

    /// バッチを受け付けて1サイクル実行
    ///
    /// 空のバッチ、および実行中に到着したトリガは何もせずに破棄される。
    /// 受け付けた場合は完了時に成功またはエラーの通知がちょうど1回行われ、
    /// 結果に関わらずIdle状態へ戻る
    ///
    /// # Arguments
    ///
    /// * `batch` - アップロードするバッチ
    ///
    /// # Returns
    ///
    /// バッチを受け付けたかどうか
    pub async fn submit_batch(&self, batch: UploadBatch) -> bool {
        if batch.is_empty() {
            return false;
        }

        // Idle -> Busy 遷移。既にBusyならトリガを破棄する
        if self.busy.swap(true, Ordering::SeqCst) {
            log::warn!(
                "upload already in progress, ignoring trigger for {} file(s)",
                batch.len()
            );
            return false;
        }
        let _guard = BusyGuard(&self.busy);

        match self.run_cycle(&batch).await {
            Ok(urls) => {
                log::info!("uploaded {} file(s)", urls.len());
                self.listener.on_upload_success(&urls);
            }
            Err(e) => {
                log::error!("upload batch failed: {}", e);
                self.listener.on_upload_error(&e);
            }
        }

        true
    }

    /// 1サイクル分の処理：フォルダ解決 → 並列アップロード
    async fn run_cycle(&self, batch: &UploadBatch) -> Result<Vec<String>, UploadError> {
        let folder = FolderNameResolver::resolve(
            self.storage.as_ref(),
            &self.options.bucket_name,
            &self.options.folder_base_name,
            batch.len(),
        )
        .await
        .map_err(|source| UploadError::FolderResolution {
            base: self.options.folder_base_name.clone(),
            source,
        })?;

        log::info!("resolved destination folder: {}", folder);

        self.process_batch
            .execute(batch, &self.options.bucket_name, &folder)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    use crate::domain::entities::file_descriptor::FileDescriptor;
    use crate::domain::repositories::storage_repository::{ObjectEntry, StorageError};

    struct RecordingListener {
        successes: Mutex<Vec<Vec<String>>>,
        errors: Mutex<Vec<String>>,
    }

    impl RecordingListener {
        fn new() -> Self {
            Self {
                successes: Mutex::new(Vec::new()),
                errors: Mutex::new(Vec::new()),
            }
        }

        fn success_count(&self) -> usize {
            self.successes.lock().unwrap().len()
        }

        fn error_count(&self) -> usize {
            self.errors.lock().unwrap().len()
        }
    }

    impl UploadListener for RecordingListener {
        fn on_upload_success(&self, urls: &[String]) {
            self.successes.lock().unwrap().push(urls.to_vec());
        }

        fn on_upload_error(&self, error: &UploadError) {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }

    struct StubGateway {
        upload_calls: AtomicUsize,
        fail_uploads: bool,
        /// Some の場合、アップロードは release 通知まで待機する
        block: Option<(Notify, Notify)>,
    }

    impl StubGateway {
        fn new() -> Self {
            Self {
                upload_calls: AtomicUsize::new(0),
                fail_uploads: false,
                block: None,
            }
        }

        fn blocking() -> Self {
            Self {
                block: Some((Notify::new(), Notify::new())),
                ..Self::new()
            }
        }

        fn upload_calls(&self) -> usize {
            self.upload_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StorageRepository for StubGateway {
        async fn upload(
            &self,
            _bucket: &str,
            _path: &str,
            _content: Bytes,
        ) -> Result<(), StorageError> {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);

            if let Some((entered, release)) = &self.block {
                entered.notify_one();
                release.notified().await;
            }

            if self.fail_uploads {
                return Err(StorageError::Backend(anyhow::anyhow!("transfer failed")));
            }
            Ok(())
        }

        async fn list(&self, _bucket: &str, _path: &str) -> Result<Vec<ObjectEntry>, StorageError> {
            Ok(vec![])
        }

        async fn get_public_url(&self, bucket: &str, path: &str) -> Result<String, StorageError> {
            Ok(format!("https://cdn.test/{}/{}", bucket, path))
        }
    }

    fn create_test_batch(names: &[&str]) -> UploadBatch {
        let files = names
            .iter()
            .map(|name| FileDescriptor::new(*name, Bytes::from_static(b"data")))
            .collect();
        UploadBatch::new(files)
    }

    fn create_orchestrator(
        gateway: Arc<StubGateway>,
        listener: Arc<RecordingListener>,
    ) -> UploadOrchestrator<StubGateway, Arc<RecordingListener>> {
        let options = UploaderOptions::new("media".to_string(), "Docs".to_string());
        UploadOrchestrator::new(options, gateway, listener)
    }

    #[tokio::test]
    async fn test_submit_batch_success_notifies_once() {
        let gateway = Arc::new(StubGateway::new());
        let listener = Arc::new(RecordingListener::new());
        let orchestrator = create_orchestrator(gateway, Arc::clone(&listener));

        let accepted = orchestrator.submit_batch(create_test_batch(&["a.png"])).await;

        assert!(accepted);
        assert_eq!(listener.success_count(), 1);
        assert_eq!(listener.error_count(), 0);

        let successes = listener.successes.lock().unwrap();
        assert_eq!(successes[0].len(), 1);
        assert!(successes[0][0].contains("/Primary/"));
    }

    #[tokio::test]
    async fn test_submit_batch_error_notifies_once() {
        let mut gateway = StubGateway::new();
        gateway.fail_uploads = true;
        let listener = Arc::new(RecordingListener::new());
        let orchestrator = create_orchestrator(Arc::new(gateway), Arc::clone(&listener));

        let accepted = orchestrator.submit_batch(create_test_batch(&["a.png"])).await;

        assert!(accepted);
        assert_eq!(listener.success_count(), 0);
        assert_eq!(listener.error_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_empty_batch_is_noop() {
        let gateway = Arc::new(StubGateway::new());
        let listener = Arc::new(RecordingListener::new());
        let orchestrator = create_orchestrator(Arc::clone(&gateway), Arc::clone(&listener));

        let accepted = orchestrator.submit_batch(UploadBatch::new(vec![])).await;

        assert!(!accepted);
        assert_eq!(gateway.upload_calls(), 0);
        assert_eq!(listener.success_count(), 0);
        assert_eq!(listener.error_count(), 0);
    }

    #[tokio::test]
    async fn test_trigger_while_busy_is_ignored() {
        let gateway = Arc::new(StubGateway::blocking());
        let listener = Arc::new(RecordingListener::new());
        let orchestrator = Arc::new(create_orchestrator(
            Arc::clone(&gateway),
            Arc::clone(&listener),
        ));

        let first = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.submit_batch(create_test_batch(&["a.png"])).await })
        };

        // 1件目のアップロードが開始されるまで待つ
        let (entered, release) = gateway.block.as_ref().unwrap();
        entered.notified().await;
        let calls_during_busy = gateway.upload_calls();

        // 実行中のトリガは破棄され、ゲートウェイ呼び出しも増えない
        let second = orchestrator.submit_batch(create_test_batch(&["b.png"])).await;
        assert!(!second);
        assert_eq!(gateway.upload_calls(), calls_during_busy);

        release.notify_one();
        assert!(first.await.unwrap());

        // 通知は受理された1バッチ分だけ
        assert_eq!(listener.success_count(), 1);
        assert_eq!(listener.error_count(), 0);
    }

    #[tokio::test]
    async fn test_orchestrator_returns_to_idle_after_success() {
        let gateway = Arc::new(StubGateway::new());
        let listener = Arc::new(RecordingListener::new());
        let orchestrator = create_orchestrator(gateway, Arc::clone(&listener));

        assert!(orchestrator.submit_batch(create_test_batch(&["a.png"])).await);
        assert!(orchestrator.submit_batch(create_test_batch(&["b.png"])).await);

        assert_eq!(listener.success_count(), 2);
    }

    #[tokio::test]
    async fn test_orchestrator_returns_to_idle_after_error() {
        let mut gateway = StubGateway::new();
        gateway.fail_uploads = true;
        let listener = Arc::new(RecordingListener::new());
        let orchestrator = create_orchestrator(Arc::new(gateway), Arc::clone(&listener));

        assert!(orchestrator.submit_batch(create_test_batch(&["a.png"])).await);
        assert_eq!(listener.error_count(), 1);

        // エラー後も次のバッチは受理される
        assert!(orchestrator.submit_batch(create_test_batch(&["b.png"])).await);
        assert_eq!(listener.error_count(), 2);
    }

    #[tokio::test]
    async fn test_folder_resolution_error_reported_as_batch_failure() {
        struct FailingListGateway;

        #[async_trait]
        impl StorageRepository for FailingListGateway {
            async fn upload(
                &self,
                _bucket: &str,
                _path: &str,
                _content: Bytes,
            ) -> Result<(), StorageError> {
                panic!("upload must not run when folder resolution fails");
            }

            async fn list(
                &self,
                _bucket: &str,
                _path: &str,
            ) -> Result<Vec<ObjectEntry>, StorageError> {
                Err(StorageError::Backend(anyhow::anyhow!("503 Service Unavailable")))
            }

            async fn get_public_url(
                &self,
                _bucket: &str,
                _path: &str,
            ) -> Result<String, StorageError> {
                panic!("url resolution must not run when folder resolution fails");
            }
        }

        let listener = Arc::new(RecordingListener::new());
        let options = UploaderOptions::new("media".to_string(), "Docs".to_string());
        let orchestrator =
            UploadOrchestrator::new(options, Arc::new(FailingListGateway), Arc::clone(&listener));

        // 複数ファイルなのでフォルダ解決のプローブが走る
        let accepted = orchestrator
            .submit_batch(create_test_batch(&["a.png", "b.png"]))
            .await;

        assert!(accepted);
        assert_eq!(listener.success_count(), 0);
        assert_eq!(listener.error_count(), 1);

        let errors = listener.errors.lock().unwrap();
        assert!(errors[0].contains("destination folder"));
    }
}
