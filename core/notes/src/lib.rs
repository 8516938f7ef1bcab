pub mod config;
pub mod dynamo;
pub mod error;
pub mod provision;
pub mod routes;
pub mod service;
pub mod store;

pub use config::{Backend, DynamoConfig, ServiceConfig};
pub use dynamo::{connect, DynamoStore};
pub use error::{NotesError, Result};
pub use provision::{ensure_table, notes_table_definition, ProvisionOutcome, TableDefinition};
pub use routes::{router, AppState};
pub use service::NotesService;
pub use store::{InMemoryStore, NoteStore};
