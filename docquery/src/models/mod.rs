mod document;
mod query;

pub use document::{Document, Metadata};
pub use query::{QueryRequest, QueryResponse, QuerySourceNode};
