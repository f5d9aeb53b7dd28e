//! File-backed configuration stores.
//!
//! A [`ConfigStore`] owns one backing file and the document parsed from it,
//! behind a reader-writer lock. The store is cheap to clone; every clone
//! shares the same document and file, so a value written through one clone
//! is immediately visible to the others. Mutations, `save`, and `reload`
//! take the write lock, which serializes them against each other and against
//! concurrent reads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::task;

use crate::codec::{parse_document, write_document};
use crate::document::{ConfigDocument, DocumentOptions};
use crate::error::{ConfigError, ConfigResult};
use crate::path::join_dotted;
use crate::section::ConfigSection;
use crate::value::{ConfigValue, FromValue, ValueCodec};

struct StoreInner {
    path: PathBuf,
    document: RwLock<ConfigDocument>,
}

/// A shared, file-backed configuration store.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<StoreInner>,
}

fn poisoned_lock() -> ConfigError {
    ConfigError::Io(io::Error::other("configuration lock poisoned"))
}

fn join_failure(e: task::JoinError) -> ConfigError {
    ConfigError::Io(io::Error::other(format!("blocking task failed: {}", e)))
}

fn read_tree(
    path: &Path,
    parse_comments: bool,
) -> ConfigResult<(ConfigSection, Option<String>)> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        // A missing file is an empty document, created on first save.
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok((ConfigSection::new(), None))
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };
    let parsed = parse_document(&text, parse_comments)?;
    Ok((parsed.root, parsed.header))
}

impl ConfigStore {
    /// Open the store backed by `path`, parsing the file if it exists. A
    /// missing file yields an empty document.
    pub fn load(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::load_with_options(path, DocumentOptions::default())
    }

    /// Open the store with explicit document options.
    pub fn load_with_options(
        path: impl Into<PathBuf>,
        options: DocumentOptions,
    ) -> ConfigResult<Self> {
        let path = path.into();
        let (root, header) = read_tree(&path, options.parse_comments)?;
        let mut document = ConfigDocument::with_root(root, options);
        if header.is_some() {
            document.set_header(header);
        }
        log::info!(
            "Loaded configuration from {} ({} top-level keys)",
            path.display(),
            document.root().len()
        );
        Ok(Self {
            inner: Arc::new(StoreInner {
                path,
                document: RwLock::new(document),
            }),
        })
    }

    /// Open the store on a blocking worker thread.
    pub async fn load_async(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        task::spawn_blocking(move || Self::load(path))
            .await
            .map_err(join_failure)?
    }

    /// The backing file path.
    pub fn file_path(&self) -> &Path {
        &self.inner.path
    }

    /// The file stem of the backing file, e.g. `"settings"` for
    /// `conf/settings.yml`.
    pub fn name(&self) -> &str {
        self.inner
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("")
    }

    fn read_doc(&self) -> ConfigResult<RwLockReadGuard<'_, ConfigDocument>> {
        self.inner.document.read().map_err(|_| poisoned_lock())
    }

    fn write_doc(&self) -> ConfigResult<RwLockWriteGuard<'_, ConfigDocument>> {
        self.inner.document.write().map_err(|_| poisoned_lock())
    }

    // ---- persistence ----

    /// Serialize the document and write it to the backing file, creating
    /// parent directories as needed. Holds the write lock for the duration,
    /// so a save never interleaves with a mutation.
    pub fn save(&self) -> ConfigResult<()> {
        let document = self.write_doc()?;
        let text = write_document(&document);
        if let Some(parent) = self.inner.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.inner.path, text)?;
        log::info!(
            "Saved configuration to {} ({} top-level keys)",
            self.inner.path.display(),
            document.root().len()
        );
        Ok(())
    }

    /// Save on a blocking worker thread. Once started, the save runs to
    /// completion even if the returned future is dropped.
    pub async fn save_async(&self) -> ConfigResult<()> {
        let store = self.clone();
        task::spawn_blocking(move || store.save())
            .await
            .map_err(join_failure)?
    }

    /// Re-read the backing file, discarding unsaved mutations. Options and
    /// the defaults table survive; the tree and header come from the file.
    pub fn reload(&self) -> ConfigResult<()> {
        let mut document = self.write_doc()?;
        let (root, header) = read_tree(&self.inner.path, document.parse_comments())?;
        document.replace_root(root);
        if header.is_some() {
            document.set_header(header);
        }
        log::info!(
            "Reloaded configuration from {} ({} top-level keys)",
            self.inner.path.display(),
            document.root().len()
        );
        Ok(())
    }

    /// Reload on a blocking worker thread.
    pub async fn reload_async(&self) -> ConfigResult<()> {
        let store = self.clone();
        task::spawn_blocking(move || store.reload())
            .await
            .map_err(join_failure)?
    }

    // ---- options and defaults ----

    /// Merge entries into the defaults table. With `copy_defaults` enabled
    /// they are also written into the live tree where missing.
    pub fn add_defaults<I, K, V>(&self, defaults: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        self.write_doc()?.add_defaults(defaults);
        Ok(())
    }

    pub fn copy_defaults(&self) -> ConfigResult<bool> {
        Ok(self.read_doc()?.copy_defaults())
    }

    pub fn set_copy_defaults(&self, value: bool) -> ConfigResult<()> {
        self.write_doc()?.set_copy_defaults(value);
        Ok(())
    }

    pub fn header(&self) -> ConfigResult<Option<String>> {
        Ok(self.read_doc()?.header().map(str::to_string))
    }

    pub fn set_header(&self, header: Option<String>) -> ConfigResult<()> {
        self.write_doc()?.set_header(header);
        Ok(())
    }

    pub fn copy_header(&self) -> ConfigResult<bool> {
        Ok(self.read_doc()?.copy_header())
    }

    pub fn set_copy_header(&self, value: bool) -> ConfigResult<()> {
        self.write_doc()?.set_copy_header(value);
        Ok(())
    }

    pub fn parse_comments(&self) -> ConfigResult<bool> {
        Ok(self.read_doc()?.parse_comments())
    }

    pub fn set_parse_comments(&self, value: bool) -> ConfigResult<()> {
        self.write_doc()?.set_parse_comments(value);
        Ok(())
    }

    // ---- reads ----

    /// Raw value at a dotted path, from the live tree or the defaults table.
    pub fn get(&self, path: &str) -> ConfigResult<Option<ConfigValue>> {
        Ok(self.read_doc()?.lookup(path)?.cloned())
    }

    /// Checked generic get. See [`ConfigSection::get_as`].
    pub fn get_as<T: FromValue>(&self, path: &str) -> ConfigResult<Option<T>> {
        self.read_doc()?.get_as(path)
    }

    pub fn get_string(&self, path: &str) -> ConfigResult<String> {
        self.read_doc()?.get_string(path)
    }

    pub fn get_string_or(&self, path: &str, default: &str) -> ConfigResult<String> {
        self.read_doc()?.get_string_or(path, default)
    }

    pub fn get_int(&self, path: &str) -> ConfigResult<i32> {
        self.read_doc()?.get_int(path)
    }

    pub fn get_int_or(&self, path: &str, default: i32) -> ConfigResult<i32> {
        self.read_doc()?.get_int_or(path, default)
    }

    pub fn get_long(&self, path: &str) -> ConfigResult<i64> {
        self.read_doc()?.get_long(path)
    }

    pub fn get_long_or(&self, path: &str, default: i64) -> ConfigResult<i64> {
        self.read_doc()?.get_long_or(path, default)
    }

    pub fn get_double(&self, path: &str) -> ConfigResult<f64> {
        self.read_doc()?.get_double(path)
    }

    pub fn get_double_or(&self, path: &str, default: f64) -> ConfigResult<f64> {
        self.read_doc()?.get_double_or(path, default)
    }

    pub fn get_bool(&self, path: &str) -> ConfigResult<bool> {
        self.read_doc()?.get_bool(path)
    }

    pub fn get_bool_or(&self, path: &str, default: bool) -> ConfigResult<bool> {
        self.read_doc()?.get_bool_or(path, default)
    }

    pub fn get_list(&self, path: &str) -> ConfigResult<Vec<ConfigValue>> {
        self.read_doc()?.get_list(path)
    }

    pub fn get_string_list(&self, path: &str) -> ConfigResult<Vec<String>> {
        self.read_doc()?.get_string_list(path)
    }

    pub fn get_int_list(&self, path: &str) -> ConfigResult<Vec<i32>> {
        self.read_doc()?.get_int_list(path)
    }

    pub fn get_long_list(&self, path: &str) -> ConfigResult<Vec<i64>> {
        self.read_doc()?.get_long_list(path)
    }

    pub fn get_double_list(&self, path: &str) -> ConfigResult<Vec<f64>> {
        self.read_doc()?.get_double_list(path)
    }

    pub fn get_float_list(&self, path: &str) -> ConfigResult<Vec<f32>> {
        self.read_doc()?.get_float_list(path)
    }

    pub fn get_bool_list(&self, path: &str) -> ConfigResult<Vec<bool>> {
        self.read_doc()?.get_bool_list(path)
    }

    /// A cloned snapshot of the section at the path, if it is one.
    pub fn get_section(&self, path: &str) -> ConfigResult<Option<ConfigSection>> {
        Ok(self.read_doc()?.get_section(path)?.cloned())
    }

    /// Decode an opaque rich value at the path through a codec.
    pub fn get_rich<C: ValueCodec>(&self, codec: &C, path: &str) -> ConfigResult<Option<C::Value>> {
        Ok(self.read_doc()?.lookup(path)?.and_then(|v| codec.decode(v)))
    }

    /// Decode an opaque rich value, or `default` when absent or mismatched.
    pub fn get_rich_or<C: ValueCodec>(
        &self,
        codec: &C,
        path: &str,
        default: C::Value,
    ) -> ConfigResult<C::Value> {
        Ok(self.get_rich(codec, path)?.unwrap_or(default))
    }

    /// Enumerate keys of the section at `path` (the root when empty). See
    /// [`ConfigSection::keys`].
    pub fn keys(&self, path: &str, deep: bool) -> ConfigResult<Vec<String>> {
        self.read_doc()?.root().keys(path, deep)
    }

    // ---- tag checks ----

    /// Check if a value is present (and not null), consulting defaults.
    /// Lookup failures report `false`.
    pub fn is_set(&self, path: &str) -> bool {
        self.read_doc().map(|doc| doc.is_set(path)).unwrap_or(false)
    }

    pub fn is_string(&self, path: &str) -> bool {
        self.read_doc().map(|doc| doc.is_string(path)).unwrap_or(false)
    }

    pub fn is_int(&self, path: &str) -> bool {
        self.read_doc().map(|doc| doc.is_int(path)).unwrap_or(false)
    }

    pub fn is_long(&self, path: &str) -> bool {
        self.read_doc().map(|doc| doc.is_long(path)).unwrap_or(false)
    }

    pub fn is_double(&self, path: &str) -> bool {
        self.read_doc().map(|doc| doc.is_double(path)).unwrap_or(false)
    }

    pub fn is_bool(&self, path: &str) -> bool {
        self.read_doc().map(|doc| doc.is_bool(path)).unwrap_or(false)
    }

    pub fn is_list(&self, path: &str) -> bool {
        self.read_doc().map(|doc| doc.is_list(path)).unwrap_or(false)
    }

    pub fn is_section(&self, path: &str) -> bool {
        self.read_doc().map(|doc| doc.is_section(path)).unwrap_or(false)
    }

    // ---- mutations ----

    /// Write a value at a dotted path, creating intermediate sections as
    /// needed. Setting [`ConfigValue::Null`] removes the key.
    pub fn set(&self, path: &str, value: impl Into<ConfigValue>) -> ConfigResult<()> {
        self.write_doc()?.root_mut().set(path, value)
    }

    /// Remove the value at a dotted path, returning it.
    pub fn remove(&self, path: &str) -> ConfigResult<Option<ConfigValue>> {
        self.write_doc()?.root_mut().remove(path)
    }

    /// Create (or reuse) a section at a dotted path, returning a handle
    /// scoped to it.
    pub fn create_section(&self, path: &str) -> ConfigResult<SectionHandle> {
        self.write_doc()?.root_mut().create_section(path)?;
        Ok(self.section(path))
    }

    /// Create a section at a dotted path pre-populated with initial values,
    /// returning a handle scoped to it.
    pub fn create_section_with<I, K, V>(&self, path: &str, values: I) -> ConfigResult<SectionHandle>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        self.write_doc()?
            .root_mut()
            .create_section_with(path, values)?;
        Ok(self.section(path))
    }

    /// Encode and store an opaque rich value at the path.
    pub fn set_rich<C: ValueCodec>(
        &self,
        codec: &C,
        path: &str,
        value: &C::Value,
    ) -> ConfigResult<()> {
        self.write_doc()?.root_mut().set_rich(codec, path, value)
    }

    // ---- comments ----

    /// The comment lines written above the key at the path.
    pub fn comments(&self, path: &str) -> ConfigResult<Vec<String>> {
        self.read_doc()?.root().comments(path)
    }

    /// Replace the comment lines above the key at the path.
    pub fn set_comments<I, S>(&self, path: &str, lines: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write_doc()?.root_mut().set_comments(path, lines)
    }

    /// A handle scoped to the section at `base`; all of its paths are
    /// interpreted relative to that prefix.
    pub fn section(&self, base: &str) -> SectionHandle {
        SectionHandle {
            store: self.clone(),
            base: base.to_string(),
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.inner.path)
            .finish_non_exhaustive()
    }
}

/// A view of one store scoped under a dotted path prefix.
///
/// The handle addresses by position, not identity: it keeps working after a
/// reload or after the section is removed and recreated, always resolving
/// against whatever currently lives at its base path.
#[derive(Debug, Clone)]
pub struct SectionHandle {
    store: ConfigStore,
    base: String,
}

impl SectionHandle {
    /// The absolute dotted path this handle is scoped to.
    pub fn current_path(&self) -> &str {
        &self.base
    }

    /// The store this handle reads from and writes to.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// A handle scoped further down, under `rel` relative to this handle.
    pub fn section(&self, rel: &str) -> SectionHandle {
        self.store.section(&join_dotted(&self.base, rel))
    }

    fn abs(&self, rel: &str) -> String {
        join_dotted(&self.base, rel)
    }

    pub fn get(&self, rel: &str) -> ConfigResult<Option<ConfigValue>> {
        self.store.get(&self.abs(rel))
    }

    pub fn get_as<T: FromValue>(&self, rel: &str) -> ConfigResult<Option<T>> {
        self.store.get_as(&self.abs(rel))
    }

    pub fn get_string(&self, rel: &str) -> ConfigResult<String> {
        self.store.get_string(&self.abs(rel))
    }

    pub fn get_string_or(&self, rel: &str, default: &str) -> ConfigResult<String> {
        self.store.get_string_or(&self.abs(rel), default)
    }

    pub fn get_int(&self, rel: &str) -> ConfigResult<i32> {
        self.store.get_int(&self.abs(rel))
    }

    pub fn get_int_or(&self, rel: &str, default: i32) -> ConfigResult<i32> {
        self.store.get_int_or(&self.abs(rel), default)
    }

    pub fn get_long(&self, rel: &str) -> ConfigResult<i64> {
        self.store.get_long(&self.abs(rel))
    }

    pub fn get_long_or(&self, rel: &str, default: i64) -> ConfigResult<i64> {
        self.store.get_long_or(&self.abs(rel), default)
    }

    pub fn get_double(&self, rel: &str) -> ConfigResult<f64> {
        self.store.get_double(&self.abs(rel))
    }

    pub fn get_double_or(&self, rel: &str, default: f64) -> ConfigResult<f64> {
        self.store.get_double_or(&self.abs(rel), default)
    }

    pub fn get_bool(&self, rel: &str) -> ConfigResult<bool> {
        self.store.get_bool(&self.abs(rel))
    }

    pub fn get_bool_or(&self, rel: &str, default: bool) -> ConfigResult<bool> {
        self.store.get_bool_or(&self.abs(rel), default)
    }

    pub fn get_list(&self, rel: &str) -> ConfigResult<Vec<ConfigValue>> {
        self.store.get_list(&self.abs(rel))
    }

    pub fn get_string_list(&self, rel: &str) -> ConfigResult<Vec<String>> {
        self.store.get_string_list(&self.abs(rel))
    }

    pub fn get_int_list(&self, rel: &str) -> ConfigResult<Vec<i32>> {
        self.store.get_int_list(&self.abs(rel))
    }

    pub fn get_long_list(&self, rel: &str) -> ConfigResult<Vec<i64>> {
        self.store.get_long_list(&self.abs(rel))
    }

    pub fn get_double_list(&self, rel: &str) -> ConfigResult<Vec<f64>> {
        self.store.get_double_list(&self.abs(rel))
    }

    pub fn get_float_list(&self, rel: &str) -> ConfigResult<Vec<f32>> {
        self.store.get_float_list(&self.abs(rel))
    }

    pub fn get_bool_list(&self, rel: &str) -> ConfigResult<Vec<bool>> {
        self.store.get_bool_list(&self.abs(rel))
    }

    pub fn get_section(&self, rel: &str) -> ConfigResult<Option<ConfigSection>> {
        self.store.get_section(&self.abs(rel))
    }

    pub fn get_rich<C: ValueCodec>(&self, codec: &C, rel: &str) -> ConfigResult<Option<C::Value>> {
        self.store.get_rich(codec, &self.abs(rel))
    }

    pub fn get_rich_or<C: ValueCodec>(
        &self,
        codec: &C,
        rel: &str,
        default: C::Value,
    ) -> ConfigResult<C::Value> {
        self.store.get_rich_or(codec, &self.abs(rel), default)
    }

    /// Enumerate keys under this handle's base (or deeper when `rel` is
    /// non-empty), relative to the base.
    pub fn keys(&self, rel: &str, deep: bool) -> ConfigResult<Vec<String>> {
        let path = if rel.is_empty() {
            self.base.clone()
        } else {
            self.abs(rel)
        };
        self.store.keys(&path, deep)
    }

    pub fn is_set(&self, rel: &str) -> bool {
        self.store.is_set(&self.abs(rel))
    }

    pub fn is_string(&self, rel: &str) -> bool {
        self.store.is_string(&self.abs(rel))
    }

    pub fn is_int(&self, rel: &str) -> bool {
        self.store.is_int(&self.abs(rel))
    }

    pub fn is_long(&self, rel: &str) -> bool {
        self.store.is_long(&self.abs(rel))
    }

    pub fn is_double(&self, rel: &str) -> bool {
        self.store.is_double(&self.abs(rel))
    }

    pub fn is_bool(&self, rel: &str) -> bool {
        self.store.is_bool(&self.abs(rel))
    }

    pub fn is_list(&self, rel: &str) -> bool {
        self.store.is_list(&self.abs(rel))
    }

    pub fn is_section(&self, rel: &str) -> bool {
        self.store.is_section(&self.abs(rel))
    }

    pub fn set(&self, rel: &str, value: impl Into<ConfigValue>) -> ConfigResult<()> {
        self.store.set(&self.abs(rel), value)
    }

    pub fn remove(&self, rel: &str) -> ConfigResult<Option<ConfigValue>> {
        self.store.remove(&self.abs(rel))
    }

    pub fn create_section(&self, rel: &str) -> ConfigResult<SectionHandle> {
        self.store.create_section(&self.abs(rel))
    }

    pub fn set_rich<C: ValueCodec>(
        &self,
        codec: &C,
        rel: &str,
        value: &C::Value,
    ) -> ConfigResult<()> {
        self.store.set_rich(codec, &self.abs(rel), value)
    }

    pub fn comments(&self, rel: &str) -> ConfigResult<Vec<String>> {
        self.store.comments(&self.abs(rel))
    }

    pub fn set_comments<I, S>(&self, rel: &str, lines: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store.set_comments(&self.abs(rel), lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(dir: &tempfile::TempDir, name: &str) -> ConfigStore {
        ConfigStore::load(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir, "absent.yml");
        assert!(store.keys("", false).unwrap().is_empty());
        assert_eq!(store.name(), "absent");
    }

    #[test]
    fn test_clones_share_one_document() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir, "shared.yml");
        let other = store.clone();

        store.set("counter", 1).unwrap();
        assert_eq!(other.get_int("counter").unwrap(), 1);

        other.remove("counter").unwrap();
        assert!(!store.is_set("counter"));
    }

    #[test]
    fn test_section_handle_prefixes_paths() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir, "handles.yml");
        store.set("server.net.port", 8080).unwrap();

        let server = store.section("server");
        assert_eq!(server.current_path(), "server");
        assert_eq!(server.get_int("net.port").unwrap(), 8080);

        let net = server.section("net");
        assert_eq!(net.current_path(), "server.net");
        net.set("host", "0.0.0.0").unwrap();
        assert_eq!(store.get_string("server.net.host").unwrap(), "0.0.0.0");

        assert_eq!(net.keys("", false).unwrap(), vec!["port", "host"]);
    }

    #[test]
    fn test_handle_survives_section_recreation() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir, "stale.yml");
        store.set("zone.limit", 5).unwrap();

        let zone = store.section("zone");
        store.remove("zone").unwrap();
        assert!(!zone.is_set("limit"));

        store.set("zone.limit", 9).unwrap();
        assert_eq!(zone.get_int("limit").unwrap(), 9);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/conf.yml");
        let store = ConfigStore::load(&path).unwrap();
        store.set("k", 1).unwrap();
        store.save().unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_reload_discards_unsaved_mutations() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir, "reload.yml");
        store.set("kept", "yes").unwrap();
        store.save().unwrap();

        store.set("scratch", "no").unwrap();
        store.reload().unwrap();

        assert_eq!(store.get_string("kept").unwrap(), "yes");
        assert!(!store.is_set("scratch"));
    }

    #[test]
    fn test_defaults_through_store() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir, "defaults.yml");
        store.add_defaults([("retries", 3)]).unwrap();

        assert_eq!(store.get_int("retries").unwrap(), 3);
        assert!(store.is_set("retries"));
        // Not materialized until copy_defaults is enabled.
        assert!(!store.keys("", false).unwrap().contains(&"retries".to_string()));

        store.set_copy_defaults(true).unwrap();
        assert!(store.keys("", false).unwrap().contains(&"retries".to_string()));
    }

    #[tokio::test]
    async fn test_async_save_and_reload() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::load_async(dir.path().join("async.yml"))
            .await
            .unwrap();
        store.set("flag", true).unwrap();
        store.save_async().await.unwrap();

        store.set("flag", false).unwrap();
        store.reload_async().await.unwrap();
        assert!(store.get_bool("flag").unwrap());
    }
}
