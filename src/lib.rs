//! Rowbind maps structs onto table rows.
//!
//! Fields are annotated with `#[db("name[,flag]*[,key:value]*")]`, the
//! derive builds the accessor table, and a [`Database`] turns an attached
//! record into single row CREATE, SELECT, INSERT, UPDATE and DELETE
//! statements.
//!
//! ```ignore
//! #[derive(Default, Record)]
//! struct User {
//!     #[db("id,primary,autoinc,table:users")]
//!     id: i64,
//!     #[db("name,unique")]
//!     name: String,
//!     #[db("created_at,created")]
//!     created_at: Option<time::OffsetDateTime>,
//! }
//!
//! let mut user = User { name: "alice".into(), ..Default::default() };
//! let mut bound = database.attach(&mut user)?;
//! bound.create_table().await?;
//! bound.save_new(&Params::new()).await?;
//! ```
pub use ::rowbind_core::*;
pub use ::rowbind_macros::*;
pub use ::serde_json;
