//! Group GTEx samples by tissue and collect the read counts of one gene.
//!
//! The core joins a sample attributes table to a read-count table with
//! explicit search primitives ([`data::search`]), groups samples in
//! first-seen order ([`data::group`]) and summarises each group
//! ([`data::stats`], [`data::filter`]). [`query::run_query`] ties them
//! together; [`report`] and [`render`] are the output sinks.

pub mod color;
pub mod data;
pub mod error;
pub mod query;
pub mod render;
pub mod report;

pub use data::model::{GroupCounts, Table};
pub use error::{ErrorKind, GtexError, Result};
pub use query::{QueryConfig, run_query};
