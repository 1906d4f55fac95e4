//! neorm – a minimal object-relational mapping core.
//!
//! The crate turns statically declared models into table metadata, hides
//! per-database syntax behind a pluggable dialect, and offers a stateful
//! session that accumulates SQL text and parameters before sending them to
//! the store.
//!
//! ## Modules
//! * [`datatype`] – The [`datatype::DataType`] trait that lets a Rust type
//!   declare its native [`datatype::Kind`].
//! * [`dialect`] – The [`dialect::Dialect`] trait, the built-in
//!   [`dialect::Sqlite3`] dialect and the [`dialect::DialectRegistry`].
//! * [`schema`] – [`schema::Model`], the [`model!`] macro and
//!   [`schema::Schema::parse`].
//! * [`session`] – The [`session::Session`] statement builder and its three
//!   execution modes.
//! * `table` – CREATE / DROP / existence checks on the session's bound model.
//! * [`engine`] – Opens a store and hands out sessions.
//! * [`config`], [`logging`] – Engine configuration and tracing setup.
//!
//! ## Lifecycle
//! Every execution call (`exec`, `query_row`, `query_rows`) empties the
//! session's pending statement, whether or not the store accepted it. The
//! bound schema and dialect survive. Binding the same model type twice reuses
//! the cached schema; binding another type replaces it.
//!
//! ## Quick Start
//! ```
//! use neorm::{dialect::DialectRegistry, engine::Engine};
//!
//! neorm::model! {
//!     pub struct User {
//!         #[neorm(PrimaryKey)]
//!         pub id: i32,
//!         pub name: String,
//!     }
//! }
//!
//! let registry = DialectRegistry::with_builtins();
//! let engine = Engine::open("sqlite3", ":memory:", &registry).unwrap();
//! let mut session = engine.new_session();
//! session.model::<User>().unwrap();
//! session.create_table().unwrap();
//! assert!(session.has_table().unwrap());
//! ```

pub mod config;
pub mod datatype;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod logging;
pub mod schema;
pub mod session;
mod table;

pub use error::{NeormError, Result};
