pub mod schema_store;

pub use schema_store::SchemaStore;
