mod as_value;
mod column_def;
mod connection;
mod database;
mod driver;
mod error;
mod executor;
mod field;
mod materialize;
mod params;
mod query;
mod record;
mod registry;
mod schema;
mod tag;
mod util;
mod value;
mod writer;

pub use as_value::*;
pub use column_def::*;
pub use connection::*;
pub use database::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use field::*;
pub use materialize::*;
pub use params::*;
pub use query::*;
pub use record::*;
pub use registry::*;
pub use schema::*;
pub use tag::*;
pub use util::*;
pub use value::*;
pub use writer::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;
