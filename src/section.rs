//! Ordered configuration tree nodes.
//!
//! [`ConfigSection`] is the only node type with named children. Entries keep
//! insertion order and carry the comment lines that precede their key in the
//! backing document, so a re-saved file preserves both structure and
//! annotations.
//!
//! Path-taking operations validate the dotted path up front; a malformed
//! path is an [`crate::ConfigError::InvalidPath`] precondition failure.
//! Missing keys are never an error for the defaulted typed accessors, which
//! fall back to the type's zero value or the supplied default.

use crate::error::{ConfigError, ConfigResult};
use crate::path::{join_dotted, ConfigPath};
use crate::value::{
    coerce_bool, coerce_f64, coerce_i32, coerce_i64, coerce_string, ConfigValue, FromValue,
    ValueCodec,
};

/// One keyed entry in a section: the value plus the comment lines written
/// above the key in the backing document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SectionEntry {
    pub(crate) key: String,
    pub(crate) comments: Vec<String>,
    pub(crate) value: ConfigValue,
}

impl SectionEntry {
    fn new_section(key: &str) -> Self {
        Self {
            key: key.to_string(),
            comments: Vec::new(),
            value: ConfigValue::Section(ConfigSection::new()),
        }
    }
}

/// A node in the configuration tree that maps keys to child values.
///
/// Keys are unique within one section and iterate in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigSection {
    entries: Vec<SectionEntry>,
}

impl ConfigSection {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the section has no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over direct children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.value))
    }

    pub(crate) fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    /// Look up a direct child by key. The key is taken literally, not as a
    /// dotted path.
    pub fn child(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    fn child_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.entries
            .iter_mut()
            .find(|e| e.key == key)
            .map(|e| &mut e.value)
    }

    fn entry_by_key_mut(&mut self, key: &str) -> Option<&mut SectionEntry> {
        self.entries.iter_mut().find(|e| e.key == key)
    }

    /// Insert or replace a direct child. Replacing keeps the entry's
    /// position and comments.
    pub fn insert_child(&mut self, key: &str, value: ConfigValue) {
        match self.child_mut(key) {
            Some(slot) => *slot = value,
            None => self.entries.push(SectionEntry {
                key: key.to_string(),
                comments: Vec::new(),
                value,
            }),
        }
    }

    pub(crate) fn insert_entry(&mut self, entry: SectionEntry) {
        match self.entry_by_key_mut(&entry.key) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove a direct child by key, returning its value.
    pub fn remove_child(&mut self, key: &str) -> Option<ConfigValue> {
        let idx = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(idx).value)
    }

    // ---- path resolution ----

    /// Resolve a dotted path for reading.
    ///
    /// Traversing through a non-section node yields `Ok(None)`; the
    /// permissive read philosophy treats that the same as a missing key.
    pub fn resolve(&self, path: &str) -> ConfigResult<Option<&ConfigValue>> {
        let parsed = ConfigPath::parse(path)?;
        let mut current = self;
        for segment in parsed.parent() {
            match current.child(segment).and_then(ConfigValue::as_section) {
                Some(section) => current = section,
                None => return Ok(None),
            }
        }
        Ok(current.child(parsed.last()))
    }

    /// Resolve a dotted path that must address sections all the way down.
    ///
    /// Unlike [`resolve`](Self::resolve), hitting a non-section node on the
    /// walk is an `InvalidPath` error. A missing key is still `Ok(None)`.
    pub fn require_section(&self, path: &str) -> ConfigResult<Option<&ConfigSection>> {
        let parsed = ConfigPath::parse(path)?;
        let mut current = self;
        let mut walked = String::new();
        for segment in parsed.segments() {
            walked = join_dotted(&walked, segment);
            match current.child(segment) {
                None => return Ok(None),
                Some(ConfigValue::Section(section)) => current = section,
                Some(other) => {
                    return Err(ConfigError::invalid_path(format!(
                        "'{}' is a {}, not a section",
                        walked,
                        other.type_name()
                    )))
                }
            }
        }
        Ok(Some(current))
    }

    fn ensure_child_section(&mut self, key: &str) -> &mut ConfigSection {
        let idx = match self.entries.iter().position(|e| e.key == key) {
            Some(i) => i,
            None => {
                self.entries.push(SectionEntry::new_section(key));
                self.entries.len() - 1
            }
        };
        // A non-section in the way of a write walk is replaced, matching the
        // set semantics of auto-created parent chains.
        if !self.entries[idx].value.is_section() {
            self.entries[idx].value = ConfigValue::Section(ConfigSection::new());
        }
        match &mut self.entries[idx].value {
            ConfigValue::Section(section) => section,
            _ => unreachable!("entry was just replaced with a section"),
        }
    }

    fn ensure_segments(&mut self, segments: &[String]) -> &mut ConfigSection {
        let mut current = self;
        for segment in segments {
            current = current.ensure_child_section(segment);
        }
        current
    }

    // ---- mutation ----

    /// Write a value at a dotted path, creating intermediate sections as
    /// needed. Setting [`ConfigValue::Null`] removes the key from its parent
    /// section instead.
    pub fn set(&mut self, path: &str, value: impl Into<ConfigValue>) -> ConfigResult<()> {
        let value = value.into();
        if value.is_null() {
            self.remove(path)?;
            return Ok(());
        }
        let parsed = ConfigPath::parse(path)?;
        let parent = self.ensure_segments(parsed.parent());
        parent.insert_child(parsed.last(), value);
        Ok(())
    }

    /// Remove the value at a dotted path, returning it. Missing keys and
    /// missing parent sections are `Ok(None)`; parents are never deleted.
    pub fn remove(&mut self, path: &str) -> ConfigResult<Option<ConfigValue>> {
        let parsed = ConfigPath::parse(path)?;
        let mut current = self;
        for segment in parsed.parent() {
            match current.child_mut(segment).and_then(ConfigValue::as_section_mut) {
                Some(section) => current = section,
                None => return Ok(None),
            }
        }
        Ok(current.remove_child(parsed.last()))
    }

    /// Create (or reuse) a section at a dotted path, creating parents as
    /// needed, and return a mutable handle to it for chained access.
    pub fn create_section(&mut self, path: &str) -> ConfigResult<&mut ConfigSection> {
        let parsed = ConfigPath::parse(path)?;
        Ok(self.ensure_segments(parsed.segments()))
    }

    /// Create a section at a dotted path pre-populated with initial values.
    pub fn create_section_with<I, K, V>(
        &mut self,
        path: &str,
        values: I,
    ) -> ConfigResult<&mut ConfigSection>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        let section = self.create_section(path)?;
        for (key, value) in values {
            section.insert_child(&key.into(), value.into());
        }
        Ok(section)
    }

    // ---- key enumeration ----

    /// Enumerate keys of the section at `path` (this section when `path` is
    /// empty), in insertion order.
    ///
    /// With `deep`, descendant keys are included as dotted paths in pre-order,
    /// section keys themselves included. A missing section yields an empty
    /// list; a non-section in the way is an `InvalidPath` error.
    pub fn keys(&self, path: &str, deep: bool) -> ConfigResult<Vec<String>> {
        let target = if path.is_empty() {
            Some(self)
        } else {
            self.require_section(path)?
        };
        let mut out = Vec::new();
        if let Some(section) = target {
            if deep {
                section.collect_deep_keys("", &mut out);
            } else {
                out.extend(section.entries.iter().map(|e| e.key.clone()));
            }
        }
        Ok(out)
    }

    fn collect_deep_keys(&self, prefix: &str, out: &mut Vec<String>) {
        for entry in &self.entries {
            let full = join_dotted(prefix, &entry.key);
            out.push(full.clone());
            if let ConfigValue::Section(section) = &entry.value {
                section.collect_deep_keys(&full, out);
            }
        }
    }

    // ---- typed accessors ----

    /// Raw node access at a dotted path.
    pub fn get(&self, path: &str) -> ConfigResult<Option<&ConfigValue>> {
        self.resolve(path)
    }

    /// Checked generic get. `Ok(None)` when the path is absent (or null),
    /// `Err(TypeMismatch)` when a value is present with the wrong runtime
    /// tag. This is the one accessor where a wrong expected type is a caller
    /// contract violation rather than a silent fallback.
    pub fn get_as<T: FromValue>(&self, path: &str) -> ConfigResult<Option<T>> {
        match self.resolve(path)? {
            None => Ok(None),
            Some(value) if value.is_null() => Ok(None),
            Some(value) => match T::from_value(value) {
                Some(converted) => Ok(Some(converted)),
                None => Err(ConfigError::type_mismatch(
                    path,
                    T::EXPECTED,
                    value.type_name(),
                )),
            },
        }
    }

    /// Get a string, or `""` when absent or not a string.
    pub fn get_string(&self, path: &str) -> ConfigResult<String> {
        Ok(coerce_string(self.resolve(path)?, ""))
    }

    /// Get a string, or `default` when absent or not a string.
    pub fn get_string_or(&self, path: &str, default: &str) -> ConfigResult<String> {
        Ok(coerce_string(self.resolve(path)?, default))
    }

    /// Get an integer, or `0` when absent or uncoercible.
    pub fn get_int(&self, path: &str) -> ConfigResult<i32> {
        Ok(coerce_i32(self.resolve(path)?, 0))
    }

    /// Get an integer, or `default` when absent or uncoercible.
    pub fn get_int_or(&self, path: &str, default: i32) -> ConfigResult<i32> {
        Ok(coerce_i32(self.resolve(path)?, default))
    }

    /// Get a long, or `0` when absent or uncoercible.
    pub fn get_long(&self, path: &str) -> ConfigResult<i64> {
        Ok(coerce_i64(self.resolve(path)?, 0))
    }

    /// Get a long, or `default` when absent or uncoercible.
    pub fn get_long_or(&self, path: &str, default: i64) -> ConfigResult<i64> {
        Ok(coerce_i64(self.resolve(path)?, default))
    }

    /// Get a double, or `0.0` when absent or uncoercible.
    pub fn get_double(&self, path: &str) -> ConfigResult<f64> {
        Ok(coerce_f64(self.resolve(path)?, 0.0))
    }

    /// Get a double, or `default` when absent or uncoercible.
    pub fn get_double_or(&self, path: &str, default: f64) -> ConfigResult<f64> {
        Ok(coerce_f64(self.resolve(path)?, default))
    }

    /// Get a boolean, or `false` when absent or not a boolean.
    pub fn get_bool(&self, path: &str) -> ConfigResult<bool> {
        Ok(coerce_bool(self.resolve(path)?, false))
    }

    /// Get a boolean, or `default` when absent or not a boolean.
    pub fn get_bool_or(&self, path: &str, default: bool) -> ConfigResult<bool> {
        Ok(coerce_bool(self.resolve(path)?, default))
    }

    fn list_items(&self, path: &str) -> ConfigResult<Option<&[ConfigValue]>> {
        Ok(self.resolve(path)?.and_then(ConfigValue::as_list))
    }

    /// Get a list of raw values, or an empty list when absent or not a list.
    pub fn get_list(&self, path: &str) -> ConfigResult<Vec<ConfigValue>> {
        Ok(self
            .list_items(path)?
            .map(<[ConfigValue]>::to_vec)
            .unwrap_or_default())
    }

    /// Get a list of strings. Any scalar element is rendered as a string;
    /// non-scalar elements are skipped rather than failing the list.
    pub fn get_string_list(&self, path: &str) -> ConfigResult<Vec<String>> {
        Ok(self
            .list_items(path)?
            .map(|items| items.iter().filter_map(ConfigValue::scalar_to_string).collect())
            .unwrap_or_default())
    }

    /// Get a list of integers. Elements that fail coercion are skipped.
    pub fn get_int_list(&self, path: &str) -> ConfigResult<Vec<i32>> {
        Ok(self
            .list_items(path)?
            .map(|items| items.iter().filter_map(ConfigValue::as_i32).collect())
            .unwrap_or_default())
    }

    /// Get a list of longs. Elements that fail coercion are skipped.
    pub fn get_long_list(&self, path: &str) -> ConfigResult<Vec<i64>> {
        Ok(self
            .list_items(path)?
            .map(|items| items.iter().filter_map(ConfigValue::as_i64).collect())
            .unwrap_or_default())
    }

    /// Get a list of doubles. Elements that fail coercion are skipped.
    pub fn get_double_list(&self, path: &str) -> ConfigResult<Vec<f64>> {
        Ok(self
            .list_items(path)?
            .map(|items| items.iter().filter_map(ConfigValue::as_f64).collect())
            .unwrap_or_default())
    }

    /// Get a list of floats. Elements that fail coercion are skipped.
    pub fn get_float_list(&self, path: &str) -> ConfigResult<Vec<f32>> {
        Ok(self
            .list_items(path)?
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_f64().map(|f| f as f32))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Get a list of booleans. Elements that fail coercion are skipped.
    pub fn get_bool_list(&self, path: &str) -> ConfigResult<Vec<bool>> {
        Ok(self
            .list_items(path)?
            .map(|items| items.iter().filter_map(ConfigValue::as_bool).collect())
            .unwrap_or_default())
    }

    /// Get the sub-section at a dotted path, if the node is a section.
    pub fn get_section(&self, path: &str) -> ConfigResult<Option<&ConfigSection>> {
        Ok(self.resolve(path)?.and_then(ConfigValue::as_section))
    }

    // ---- runtime tag checks ----

    fn tag_matches(&self, path: &str, check: impl Fn(&ConfigValue) -> bool) -> bool {
        matches!(self.resolve(path), Ok(Some(value)) if check(value))
    }

    /// Check if a value is present (and not null) at the path. Malformed
    /// paths report `false`.
    pub fn is_set(&self, path: &str) -> bool {
        self.tag_matches(path, |v| !v.is_null())
    }

    /// Check if the value at the path is a string.
    pub fn is_string(&self, path: &str) -> bool {
        self.tag_matches(path, ConfigValue::is_string)
    }

    /// Check if the value at the path is an integer.
    pub fn is_int(&self, path: &str) -> bool {
        self.tag_matches(path, ConfigValue::is_integer)
    }

    /// Check if the value at the path is a long. Integers and longs share
    /// one storage tag, so this matches exactly when [`is_int`](Self::is_int)
    /// does.
    pub fn is_long(&self, path: &str) -> bool {
        self.tag_matches(path, ConfigValue::is_integer)
    }

    /// Check if the value at the path is a double.
    pub fn is_double(&self, path: &str) -> bool {
        self.tag_matches(path, ConfigValue::is_float)
    }

    /// Check if the value at the path is a boolean.
    pub fn is_bool(&self, path: &str) -> bool {
        self.tag_matches(path, ConfigValue::is_bool)
    }

    /// Check if the value at the path is a list.
    pub fn is_list(&self, path: &str) -> bool {
        self.tag_matches(path, ConfigValue::is_list)
    }

    /// Check if the value at the path is a section.
    pub fn is_section(&self, path: &str) -> bool {
        self.tag_matches(path, ConfigValue::is_section)
    }

    // ---- comments ----

    fn entry_at(&self, path: &str) -> ConfigResult<Option<&SectionEntry>> {
        let parsed = ConfigPath::parse(path)?;
        let mut current = self;
        for segment in parsed.parent() {
            match current.child(segment).and_then(ConfigValue::as_section) {
                Some(section) => current = section,
                None => return Ok(None),
            }
        }
        Ok(current.entries.iter().find(|e| e.key == parsed.last()))
    }

    fn entry_at_mut(&mut self, path: &str) -> ConfigResult<Option<&mut SectionEntry>> {
        let parsed = ConfigPath::parse(path)?;
        let mut current = self;
        for segment in parsed.parent() {
            match current.child_mut(segment).and_then(ConfigValue::as_section_mut) {
                Some(section) => current = section,
                None => return Ok(None),
            }
        }
        Ok(current.entry_by_key_mut(parsed.last()))
    }

    /// The comment lines written above the key at the path. Empty when the
    /// key is absent or has no comments.
    pub fn comments(&self, path: &str) -> ConfigResult<Vec<String>> {
        Ok(self
            .entry_at(path)?
            .map(|e| e.comments.clone())
            .unwrap_or_default())
    }

    /// Replace the comment lines above the key at the path. A no-op when the
    /// key is absent.
    pub fn set_comments<I, S>(&mut self, path: &str, lines: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(entry) = self.entry_at_mut(path)? {
            entry.comments = lines.into_iter().map(Into::into).collect();
        }
        Ok(())
    }

    // ---- rich values ----

    /// Decode an opaque rich value at the path through a codec. Shape
    /// mismatches decode to `None`, matching the permissive read philosophy.
    pub fn get_rich<C: ValueCodec>(&self, codec: &C, path: &str) -> ConfigResult<Option<C::Value>> {
        Ok(self.resolve(path)?.and_then(|v| codec.decode(v)))
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

    /// Encode and store an opaque rich value at the path.
    pub fn set_rich<C: ValueCodec>(
        &mut self,
        codec: &C,
        path: &str,
        value: &C::Value,
    ) -> ConfigResult<()> {
        self.set(path, codec.encode(value))
    }
}
