//! # confdoc
//!
//! A hierarchical, typed, path-addressed configuration store backed by a
//! comment-preserving text document.
//!
//! ## Core Components
//!
//! * `path` - Dotted path parsing and validation
//! * `value` - The dynamic value model with coercions and codec traits
//! * `section` - Ordered tree nodes with typed accessors and comments
//! * `document` - Root tree plus options, header, and the defaults table
//! * `codec` - Parser and writer for the backing text format
//! * `store` - Shared file-backed stores with async persistence
//! * `error` - Error types and handling
//!
//! ## Usage
//!
//! ```no_run
//! use confdoc::ConfigStore;
//!
//! fn main() -> confdoc::ConfigResult<()> {
//!     let store = ConfigStore::load("conf/settings.yml")?;
//!     store.add_defaults([("server.port", 25565)])?;
//!
//!     let port = store.get_int("server.port")?;
//!     store.set("server.motd", format!("listening on {}", port))?;
//!     store.save()?;
//!     Ok(())
//! }
//! ```
//!
//! Reads never fail on missing keys: the typed accessors fall back to the
//! defaults table and then to the type's zero value, while
//! [`ConfigStore::get_as`] raises [`ConfigError::TypeMismatch`] when a
//! present value has the wrong runtime type. Saved files keep key order,
//! per-key comments, and the header block.

pub mod codec;
pub mod document;
pub mod error;
pub mod path;
pub mod section;
pub mod store;
pub mod value;

pub use codec::{parse_document, write_document, ParsedDocument};
pub use document::{ConfigDocument, DocumentOptions};
pub use error::{ConfigError, ConfigResult};
pub use path::{join_dotted, ConfigPath};
pub use section::ConfigSection;
pub use store::{ConfigStore, SectionHandle};
pub use value::{ConfigValue, FromValue, ValueCodec};
