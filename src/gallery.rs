use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use crate::encode::{is_accepted, to_data_uri};
use crate::input::ConfirmPrompt;
use crate::constants::CLEAR_PROMPT;
use crate::render::{project, RenderTarget};
use crate::storage::KeyValueStore;
use crate::types::{parse_collection, seed_records, CandidateFile, GalleryView, ImageRecord, Lightbox};

/// 保存結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// 書き込み成功
    Saved,
    /// 書き込みに失敗し、保存データを削除した（メモリ上の状態はそのまま）
    Evicted,
}

// 永続化つき画像コレクション。
// メモリ上の Vec<ImageRecord> が正で、ストアはその書き込み先ミラー。
// 変更・保存・再描画は同じロックの中で行う（容量超過時のみ保存側がずれる）
#[derive(Clone)]
pub struct Gallery {
    inner: Arc<Inner>,
}

struct Inner {
    images: Mutex<Vec<ImageRecord>>,
    store: Arc<dyn KeyValueStore>,
    target: Arc<dyn RenderTarget>,
    storage_key: String,
    runtime: Option<Handle>,  // 初期化時のランタイム（同期コードからの追加用）
}

/// `add_files` で開始したエンコードタスク群
pub struct AddBatch {
    accepted: usize,
    handles: Vec<JoinHandle<()>>,
}

impl AddBatch {
    // 許可リストを通過したファイル数
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// すべてのエンコードと追加が終わるまで待つ
    pub async fn finish(self) -> usize {
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!("画像追加タスク異常終了: {}", e);
            }
        }
        self.accepted
    }
}

impl Gallery {
    /// ストアから読み込む。無い・壊れている・空ならシード画像で初期化して即保存する
    pub fn initialize(
        store: Arc<dyn KeyValueStore>,
        target: Arc<dyn RenderTarget>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();

        let loaded = match store.get(&storage_key) {
            Some(raw) => {
                let parsed = parse_collection(&raw);
                if parsed.is_none() {
                    warn!("保存データが不正なためシード画像で初期化します: key={}", storage_key);
                }
                parsed
            }
            None => None,
        };
        let seeded = loaded.is_none();
        let images = loaded.unwrap_or_else(seed_records);
        info!("ギャラリー初期化: {}件 (seeded={})", images.len(), seeded);

        let gallery = Self {
            inner: Arc::new(Inner {
                images: Mutex::new(images),
                store,
                target,
                storage_key,
                runtime: Handle::try_current().ok(),
            }),
        };

        {
            let images = gallery.lock();
            if seeded {
                gallery.persist_locked(&images);
            }
            gallery.render_locked(&images);
        }

        gallery
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ImageRecord>> {
        self.inner.images.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    // 現在のコレクションのコピー
    pub fn images(&self) -> Vec<ImageRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn view(&self) -> GalleryView {
        project(&self.lock())
    }

    /// ファイルを追加する。
    ///
    /// 許可されていない MIME タイプは黙って捨てる。許可されたファイルは1件ずつ
    /// 別タスクでデータURIに変換し、終わった順に末尾へ追加・保存・再描画する。
    /// 同じバッチ内の追加順は完了順で、渡した順になるとは限らない。
    /// ランタイムが無い場所から呼ばれた場合は呼び出し元でそのまま処理する。
    pub fn add_files(&self, files: Vec<CandidateFile>) -> AddBatch {
        let runtime = Handle::try_current()
            .ok()
            .or_else(|| self.inner.runtime.clone());

        let mut accepted = 0;
        let mut handles = Vec::new();

        for file in files {
            if !is_accepted(&file.mime_type) {
                debug!("未対応のファイル形式のため無視: {} ({})", file.name, file.mime_type);
                continue;
            }
            accepted += 1;

            // エンコードと保存（ディスク書き込み）はどちらもブロッキング処理
            let gallery = self.clone();
            let task = move || {
                let CandidateFile { name, mime_type, bytes } = file;
                let src = to_data_uri(&mime_type, &bytes);
                gallery.append(ImageRecord::new(src, name));
            };

            match &runtime {
                Some(handle) => handles.push(handle.spawn_blocking(task)),
                None => task(),
            }
        }

        AddBatch { accepted, handles }
    }

    fn append(&self, record: ImageRecord) {
        let mut images = self.lock();
        debug!("画像追加: {} (位置 {})", record.name, images.len());
        images.push(record);
        self.persist_locked(&images);
        self.render_locked(&images);
    }

    /// 指定位置の画像を削除する。範囲外なら何もしない
    pub fn remove_at(&self, index: usize) -> Option<ImageRecord> {
        let mut images = self.lock();
        if index >= images.len() {
            debug!("範囲外の削除要求を無視: index={} len={}", index, images.len());
            return None;
        }

        let removed = images.remove(index);
        self.persist_locked(&images);
        self.render_locked(&images);
        Some(removed)
    }

    /// 全削除。呼び出し前にユーザーの確認が済んでいること
    pub fn clear_all(&self) {
        let mut images = self.lock();
        images.clear();
        self.persist_locked(&images);
        self.render_locked(&images);
    }

    // 確認ダイアログで「はい」のときだけ全削除する
    pub fn clear_with_confirmation(&self, prompt: &dyn ConfirmPrompt) -> bool {
        if !prompt.confirm(CLEAR_PROMPT) {
            return false;
        }
        self.clear_all();
        true
    }

    // 拡大表示
    pub fn enlarge(&self, index: usize) -> Option<Lightbox> {
        self.lock().get(index).map(|img| Lightbox { src: img.src.clone() })
    }

    pub fn persist(&self) -> PersistOutcome {
        let images = self.lock();
        self.persist_locked(&images)
    }

    pub fn render(&self) {
        let images = self.lock();
        self.render_locked(&images);
    }

    // 書き込みに失敗したらキーごと削除し、再試行はしない
    fn persist_locked(&self, images: &[ImageRecord]) -> PersistOutcome {
        let key = &self.inner.storage_key;
        let result = serde_json::to_string(images)
            .map_err(|e| e.to_string())
            .and_then(|json| self.inner.store.set(key, &json).map_err(|e| e.to_string()));

        match result {
            Ok(()) => PersistOutcome::Saved,
            Err(e) => {
                warn!("保存に失敗したため保存データを削除します: key={} - {}", key, e);
                self.inner.store.remove(key);
                PersistOutcome::Evicted
            }
        }
    }

    fn render_locked(&self, images: &[ImageRecord]) {
        self.inner.target.replace(&project(images));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STORAGE_KEY;
    use crate::error::StorageError;
    use crate::render::HtmlTarget;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingTarget {
        renders: AtomicUsize,
        last: Mutex<Option<GalleryView>>,
    }

    impl RenderTarget for CountingTarget {
        fn replace(&self, view: &GalleryView) {
            self.renders.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(view.clone());
        }
    }

    // 書き込みが必ず入出力エラーになるストア
    #[derive(Default)]
    struct BrokenDiskStore {
        writes: AtomicUsize,
        removes: AtomicUsize,
    }

    impl KeyValueStore for BrokenDiskStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk unplugged",
            )))
        }

        fn remove(&self, _key: &str) {
            self.removes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn png(name: &str) -> CandidateFile {
        CandidateFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    fn setup(store: &MemoryStore) -> (Gallery, HtmlTarget) {
        let target = HtmlTarget::new();
        let gallery = Gallery::initialize(
            Arc::new(store.clone()),
            Arc::new(target.clone()),
            STORAGE_KEY,
        );
        (gallery, target)
    }

    fn stored(store: &MemoryStore) -> Option<Vec<ImageRecord>> {
        store
            .get(STORAGE_KEY)
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_initialize_seeds_empty_storage() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, _) = setup(&store);

        assert_eq!(gallery.images(), seed_records());
        assert_eq!(stored(&store), Some(seed_records()));
    }

    #[test]
    fn test_initialize_seeds_invalid_storage() {
        for raw in ["{broken", "[]", "null", r#"[{"name":"no src"}]"#, r#"[{"src":"","name":"x"}]"#] {
            let store = MemoryStore::new(1024 * 1024);
            store.set(STORAGE_KEY, raw).unwrap();

            let (gallery, _) = setup(&store);
            assert_eq!(gallery.images(), seed_records(), "stored: {raw}");
            assert_eq!(stored(&store), Some(seed_records()), "stored: {raw}");
        }
    }

    #[test]
    fn test_initialize_keeps_valid_storage() {
        let store = MemoryStore::new(1024 * 1024);
        let saved = vec![ImageRecord::new("data:image/gif;base64,R0lG", "cat.gif")];
        store.set(STORAGE_KEY, &serde_json::to_string(&saved).unwrap()).unwrap();

        let (gallery, target) = setup(&store);
        assert_eq!(gallery.images(), saved);
        assert!(target.markup().contains("1 photo"));
        assert!(target.markup().contains("cat.gif"));
    }

    #[test]
    fn test_initialize_renders_once() {
        let store = MemoryStore::new(1024 * 1024);
        let target = Arc::new(CountingTarget::default());
        let _gallery = Gallery::initialize(Arc::new(store), target.clone(), STORAGE_KEY);

        assert_eq!(target.renders.load(Ordering::SeqCst), 1);
        assert!(matches!(
            target.last.lock().unwrap().as_ref(),
            Some(GalleryView::Populated { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_files_grows_by_accepted_count() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, _) = setup(&store);

        let first = gallery.add_files(vec![png("a.png"), png("b.png")]);
        assert_eq!(first.finish().await, 2);
        let second = gallery.add_files(vec![
            CandidateFile::new("c.webp", "image/webp", vec![1, 2, 3]),
            CandidateFile::new("d.svg", "image/svg+xml", b"<svg/>".to_vec()),
            CandidateFile::new("e.jpg", "image/jpeg", vec![0xFF, 0xD8]),
        ]);
        assert_eq!(second.finish().await, 3);

        assert_eq!(gallery.len(), 3 + 5);
        assert_eq!(stored(&store).map(|s| s.len()), Some(8));
    }

    #[tokio::test]
    async fn test_batch_order_is_compared_as_a_set() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, _) = setup(&store);

        gallery
            .add_files(vec![png("1.png"), png("2.png"), png("3.png")])
            .finish()
            .await;

        let images = gallery.images();
        // シードは先頭のまま、追加分は完了順
        assert_eq!(&images[..3], &seed_records()[..]);
        let mut added: Vec<String> = images[3..].iter().map(|r| r.name.clone()).collect();
        added.sort();
        assert_eq!(added, vec!["1.png", "2.png", "3.png"]);
        assert!(images[3..]
            .iter()
            .all(|r| r.src == "data:image/png;base64,iVBORw=="));
    }

    #[tokio::test]
    async fn test_rejected_type_is_ignored() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, _) = setup(&store);
        let before = store.get(STORAGE_KEY);

        let batch = gallery.add_files(vec![CandidateFile::new("notes.txt", "text/plain", b"hi".to_vec())]);
        assert_eq!(batch.accepted(), 0);
        batch.finish().await;

        assert_eq!(gallery.len(), 3);
        assert_eq!(store.get(STORAGE_KEY), before);
    }

    #[tokio::test]
    async fn test_mixed_batch_drops_only_rejected() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, _) = setup(&store);

        let batch = gallery.add_files(vec![
            png("ok.png"),
            CandidateFile::new("raw.bmp", "image/bmp", vec![0]),
            CandidateFile::new("doc.pdf", "application/pdf", vec![0]),
        ]);
        assert_eq!(batch.finish().await, 1);
        assert_eq!(gallery.len(), 4);
        assert_eq!(gallery.images()[3].name, "ok.png");
    }

    #[test]
    fn test_remove_at_preserves_order() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, _) = setup(&store);

        let removed = gallery.remove_at(1).unwrap();
        assert_eq!(removed.name, "Developer Setup");

        let names: Vec<String> = gallery.images().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Code Wallpaper", "Abstract Tech"]);
        assert_eq!(stored(&store), Some(gallery.images()));
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let store = MemoryStore::new(1024 * 1024);
        let target = Arc::new(CountingTarget::default());
        let gallery = Gallery::initialize(Arc::new(store.clone()), target.clone(), STORAGE_KEY);

        assert_eq!(gallery.remove_at(3), None);
        assert_eq!(gallery.remove_at(usize::MAX), None);
        assert_eq!(gallery.images(), seed_records());
        assert_eq!(stored(&store), Some(seed_records()));
        assert_eq!(target.renders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_all_empties_memory_and_storage() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, target) = setup(&store);

        gallery.clear_all();
        assert!(gallery.is_empty());
        assert_eq!(stored(&store), Some(Vec::new()));
        assert!(target.markup().contains("galleryEmpty"));
        assert!(!target.markup().contains("galleryCount"));
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, _) = setup(&store);

        let declined = |message: &str| {
            assert_eq!(message, CLEAR_PROMPT);
            false
        };
        assert!(!gallery.clear_with_confirmation(&declined));
        assert_eq!(gallery.len(), 3);

        assert!(gallery.clear_with_confirmation(&|_: &str| true));
        assert_eq!(gallery.len(), 0);
    }

    #[test]
    fn test_persist_twice_writes_same_value() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, _) = setup(&store);

        assert_eq!(gallery.persist(), PersistOutcome::Saved);
        let first = store.get(STORAGE_KEY);
        assert_eq!(gallery.persist(), PersistOutcome::Saved);
        assert_eq!(store.get(STORAGE_KEY), first);
        assert!(first.is_some());
    }

    #[tokio::test]
    async fn test_quota_exceeded_evicts_key_but_keeps_memory() {
        let store = MemoryStore::new(0);
        let (gallery, target) = setup(&store);
        assert_eq!(store.get(STORAGE_KEY), None);

        gallery.add_files(vec![png("big.png")]).finish().await;

        assert_eq!(gallery.len(), 4);
        assert_eq!(gallery.images()[3].name, "big.png");
        assert_eq!(store.get(STORAGE_KEY), None);
        assert!(target.markup().contains("4 photos"));
        assert_eq!(gallery.persist(), PersistOutcome::Evicted);
    }

    #[tokio::test]
    async fn test_quota_exceeded_removes_previously_saved_value() {
        // シードは入るが画像を1枚足すと溢れる容量
        let seed_len = serde_json::to_string(&seed_records()).unwrap().len();
        let store = MemoryStore::new(STORAGE_KEY.len() + seed_len + 16);
        let (gallery, _) = setup(&store);
        assert_eq!(stored(&store), Some(seed_records()));

        gallery
            .add_files(vec![CandidateFile::new("large.jpg", "image/jpeg", vec![7; 256])])
            .finish()
            .await;

        assert_eq!(gallery.len(), 4);
        assert_eq!(store.get(STORAGE_KEY), None);
    }

    #[test]
    fn test_enlarge() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, _) = setup(&store);

        let lightbox = gallery.enlarge(2).unwrap();
        assert_eq!(lightbox.src, "assets/images/gallery_abstract_1771753088132.png");
        assert_eq!(gallery.enlarge(3), None);
    }

    #[test]
    fn test_end_to_end_render_counts() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, target) = setup(&store);

        assert!(target.markup().contains("3 photos"));
        assert!(target.markup().contains("Code Wallpaper"));

        gallery.remove_at(0);
        assert!(target.markup().contains("2 photos"));
        assert!(!target.markup().contains("Code Wallpaper"));
    }

    #[tokio::test]
    async fn test_reload_from_disk_store() {
        use crate::storage::DiskStore;

        let dir = tempfile::tempdir().unwrap();
        let open = || {
            Gallery::initialize(
                Arc::new(DiskStore::new(dir.path(), 1024 * 1024)),
                Arc::new(HtmlTarget::new()),
                STORAGE_KEY,
            )
        };

        let gallery = open();
        gallery.remove_at(0);
        gallery.add_files(vec![png("kept.png")]).finish().await;
        let expected = gallery.images();
        drop(gallery);

        let reopened = open();
        assert_eq!(reopened.images(), expected);
        assert_eq!(reopened.len(), 3);
    }

    #[test]
    fn test_add_files_without_runtime_runs_inline() {
        let store = MemoryStore::new(1024 * 1024);
        let (gallery, target) = setup(&store);

        let batch = gallery.add_files(vec![
            png("sync.png"),
            CandidateFile::new("notes.txt", "text/plain", vec![1]),
        ]);

        assert_eq!(batch.accepted(), 1);
        assert_eq!(gallery.len(), 4);
        assert_eq!(gallery.images()[3].name, "sync.png");
        assert_eq!(stored(&store).map(|s| s.len()), Some(4));
        assert!(target.markup().contains("4 photos"));
    }

    #[test]
    fn test_io_write_failure_evicts_key_and_keeps_memory() {
        let store = Arc::new(BrokenDiskStore::default());
        let gallery = Gallery::initialize(store.clone(), Arc::new(HtmlTarget::new()), STORAGE_KEY);

        // シードの保存に失敗した時点で一度削除される
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(store.removes.load(Ordering::SeqCst), 1);
        assert_eq!(gallery.images(), seed_records());

        assert_eq!(gallery.persist(), PersistOutcome::Evicted);
        assert_eq!(store.writes.load(Ordering::SeqCst), 2);
        assert_eq!(store.removes.load(Ordering::SeqCst), 2);
        assert_eq!(gallery.images(), seed_records());

        gallery.remove_at(0);
        assert_eq!(store.removes.load(Ordering::SeqCst), 3);
        assert_eq!(gallery.len(), 2);
    }
}
