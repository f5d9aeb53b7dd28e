//! Configuration documents: a root section plus document-level state.
//!
//! A [`ConfigDocument`] bundles the live tree with the options controlling
//! serialization (header handling, comment parsing, default copying) and the
//! defaults table. Defaults are a secondary path-keyed mapping consulted by
//! [`ConfigDocument::lookup`] only when the live tree has no value at the
//! path; they never overwrite live values.

use crate::error::ConfigResult;
use crate::section::ConfigSection;
use crate::value::{
    coerce_bool, coerce_f64, coerce_i32, coerce_i64, coerce_string, ConfigValue, FromValue,
};

/// Serialization and defaults-handling options for a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// Copy default-table entries into the live tree when defaults are added
    /// or the document is loaded, so they persist on save. Off by default.
    pub copy_defaults: bool,
    /// Re-write the header block at the top of the saved file. On by
    /// default.
    pub copy_header: bool,
    /// Read per-key comments from the file and write them back on save. On
    /// by default.
    pub parse_comments: bool,
    /// Text block emitted at the top of the saved file, one comment line per
    /// text line.
    pub header: Option<String>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            copy_defaults: false,
            copy_header: true,
            parse_comments: true,
            header: None,
        }
    }
}

/// The root section plus document-level metadata: header, options, and the
/// defaults table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigDocument {
    root: ConfigSection,
    options: DocumentOptions,
    defaults: Vec<(String, ConfigValue)>,
}

impl ConfigDocument {
    /// Create an empty document with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from an already-built tree, keeping `options`.
    pub fn with_root(root: ConfigSection, options: DocumentOptions) -> Self {
        Self {
            root,
            options,
            defaults: Vec::new(),
        }
    }

    /// The live tree.
    pub fn root(&self) -> &ConfigSection {
        &self.root
    }

    /// Mutable access to the live tree.
    pub fn root_mut(&mut self) -> &mut ConfigSection {
        &mut self.root
    }

    /// Replace the live tree wholesale, keeping options and defaults. Used
    /// by reload.
    pub(crate) fn replace_root(&mut self, root: ConfigSection) {
        self.root = root;
        if self.options.copy_defaults {
            self.materialize_defaults();
        }
    }

    /// The document options.
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Mutable access to the document options.
    pub fn options_mut(&mut self) -> &mut DocumentOptions {
        &mut self.options
    }

    /// Whether defaults are copied into the live tree.
    pub fn copy_defaults(&self) -> bool {
        self.options.copy_defaults
    }

    /// Turn copying of defaults into the live tree on or off. Turning it on
    /// immediately materializes any defaults missing from the tree.
    pub fn set_copy_defaults(&mut self, value: bool) {
        self.options.copy_defaults = value;
        if value {
            self.materialize_defaults();
        }
    }

    /// The header text block, if set.
    pub fn header(&self) -> Option<&str> {
        self.options.header.as_deref()
    }

    /// Set or clear the header text block.
    pub fn set_header(&mut self, header: Option<String>) {
        self.options.header = header;
    }

    /// Whether the header is re-written on save.
    pub fn copy_header(&self) -> bool {
        self.options.copy_header
    }

    /// Turn header re-writing on or off.
    pub fn set_copy_header(&mut self, value: bool) {
        self.options.copy_header = value;
    }

    /// Whether per-key comments are parsed and written.
    pub fn parse_comments(&self) -> bool {
        self.options.parse_comments
    }

    /// Turn comment parsing on or off.
    pub fn set_parse_comments(&mut self, value: bool) {
        self.options.parse_comments = value;
    }

    // ---- defaults ----

    /// Merge entries into the defaults table. Within the table, the last
    /// write for a path wins; live-tree values are never overwritten. With
    /// `copy_defaults` on, missing defaults are also written into the live
    /// tree so they persist on save.
    pub fn add_defaults<I, K, V>(&mut self, defaults: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        for (path, value) in defaults {
            let path = path.into();
            let value = value.into();
            match self.defaults.iter_mut().find(|(p, _)| *p == path) {
                Some((_, slot)) => *slot = value,
                None => self.defaults.push((path, value)),
            }
        }
        if self.options.copy_defaults {
            self.materialize_defaults();
        }
    }

    /// The defaults table in insertion order.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.defaults.iter().map(|(p, v)| (p.as_str(), v))
    }

    fn materialize_defaults(&mut self) {
        // set() only fails on malformed paths; the table never holds one
        // that the live tree would reject, so a failed copy is skipped.
        for (path, value) in &self.defaults {
            if !self.root.is_set(path) {
                let _ = self.root.set(path, value.clone());
            }
        }
    }

    /// Defaults-aware lookup: the live tree first, then the defaults table.
    pub fn lookup(&self, path: &str) -> ConfigResult<Option<&ConfigValue>> {
        if let Some(value) = self.root.resolve(path)? {
            return Ok(Some(value));
        }
        Ok(self
            .defaults
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, v)| v))
    }

    // ---- defaults-aware typed accessors ----

    /// Get a string, falling back to the defaults table and then `""`.
    pub fn get_string(&self, path: &str) -> ConfigResult<String> {
        Ok(coerce_string(self.lookup(path)?, ""))
    }

    /// Get a string, falling back to the defaults table and then `default`.
    pub fn get_string_or(&self, path: &str, default: &str) -> ConfigResult<String> {
        Ok(coerce_string(self.lookup(path)?, default))
    }

    /// Get an integer, falling back to the defaults table and then `0`.
    pub fn get_int(&self, path: &str) -> ConfigResult<i32> {
        Ok(coerce_i32(self.lookup(path)?, 0))
    }

    /// Get an integer, falling back to the defaults table and then `default`.
    pub fn get_int_or(&self, path: &str, default: i32) -> ConfigResult<i32> {
        Ok(coerce_i32(self.lookup(path)?, default))
    }

    /// Get a long, falling back to the defaults table and then `0`.
    pub fn get_long(&self, path: &str) -> ConfigResult<i64> {
        Ok(coerce_i64(self.lookup(path)?, 0))
    }

    /// Get a long, falling back to the defaults table and then `default`.
    pub fn get_long_or(&self, path: &str, default: i64) -> ConfigResult<i64> {
        Ok(coerce_i64(self.lookup(path)?, default))
    }

    /// Get a double, falling back to the defaults table and then `0.0`.
    pub fn get_double(&self, path: &str) -> ConfigResult<f64> {
        Ok(coerce_f64(self.lookup(path)?, 0.0))
    }

    /// Get a double, falling back to the defaults table and then `default`.
    pub fn get_double_or(&self, path: &str, default: f64) -> ConfigResult<f64> {
        Ok(coerce_f64(self.lookup(path)?, default))
    }

    /// Get a boolean, falling back to the defaults table and then `false`.
    pub fn get_bool(&self, path: &str) -> ConfigResult<bool> {
        Ok(coerce_bool(self.lookup(path)?, false))
    }

    /// Get a boolean, falling back to the defaults table and then `default`.
    pub fn get_bool_or(&self, path: &str, default: bool) -> ConfigResult<bool> {
        Ok(coerce_bool(self.lookup(path)?, default))
    }

    fn lookup_list(&self, path: &str) -> ConfigResult<Option<&[ConfigValue]>> {
        Ok(self.lookup(path)?.and_then(ConfigValue::as_list))
    }

    /// Get a list of raw values, falling back to the defaults table and then
    /// an empty list.
    pub fn get_list(&self, path: &str) -> ConfigResult<Vec<ConfigValue>> {
        Ok(self
            .lookup_list(path)?
            .map(<[ConfigValue]>::to_vec)
            .unwrap_or_default())
    }

    /// Get a list of strings. Scalar elements are rendered; non-scalar
    /// elements are skipped.
    pub fn get_string_list(&self, path: &str) -> ConfigResult<Vec<String>> {
        Ok(self
            .lookup_list(path)?
            .map(|items| items.iter().filter_map(ConfigValue::scalar_to_string).collect())
            .unwrap_or_default())
    }

    /// Get a list of integers. Elements that fail coercion are skipped.
    pub fn get_int_list(&self, path: &str) -> ConfigResult<Vec<i32>> {
        Ok(self
            .lookup_list(path)?
            .map(|items| items.iter().filter_map(ConfigValue::as_i32).collect())
            .unwrap_or_default())
    }

    /// Get a list of longs. Elements that fail coercion are skipped.
    pub fn get_long_list(&self, path: &str) -> ConfigResult<Vec<i64>> {
        Ok(self
            .lookup_list(path)?
            .map(|items| items.iter().filter_map(ConfigValue::as_i64).collect())
            .unwrap_or_default())
    }

    /// Get a list of doubles. Elements that fail coercion are skipped.
    pub fn get_double_list(&self, path: &str) -> ConfigResult<Vec<f64>> {
        Ok(self
            .lookup_list(path)?
            .map(|items| items.iter().filter_map(ConfigValue::as_f64).collect())
            .unwrap_or_default())
    }

    /// Get a list of floats. Elements that fail coercion are skipped.
    pub fn get_float_list(&self, path: &str) -> ConfigResult<Vec<f32>> {
        Ok(self
            .lookup_list(path)?
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
            .lookup_list(path)?
            .map(|items| items.iter().filter_map(ConfigValue::as_bool).collect())
            .unwrap_or_default())
    }

    /// Get the section at the path from the live tree or the defaults table.
    pub fn get_section(&self, path: &str) -> ConfigResult<Option<&ConfigSection>> {
        Ok(self.lookup(path)?.and_then(ConfigValue::as_section))
    }

    /// Checked generic get over the defaults-aware lookup.
    pub fn get_as<T: FromValue>(&self, path: &str) -> ConfigResult<Option<T>> {
        match self.lookup(path)? {
            None => Ok(None),
            Some(value) if value.is_null() => Ok(None),
            Some(value) => match T::from_value(value) {
                Some(converted) => Ok(Some(converted)),
                None => Err(crate::error::ConfigError::type_mismatch(
                    path,
                    T::EXPECTED,
                    value.type_name(),
                )),
            },
        }
    }

    fn tag_matches(&self, path: &str, check: impl Fn(&ConfigValue) -> bool) -> bool {
        matches!(self.lookup(path), Ok(Some(value)) if check(value))
    }

    /// Check if a value is present at the path in the live tree or the
    /// defaults table.
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

    /// Check if the value at the path is a long. Shares a storage tag with
    /// [`is_int`](Self::is_int).
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
}
