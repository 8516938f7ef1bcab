use std::time::Duration;

pub const DEFAULT_TABLE_NAME: &str = "NotesTable";
pub const DEFAULT_REGION: &str = "ap-south-1";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    DynamoDb,
    Memory,
}

impl Backend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dynamodb" | "dynamo" => Some(Backend::DynamoDb),
            "memory" | "in-memory" => Some(Backend::Memory),
            _ => None,
        }
    }
}

/// DynamoDB connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoConfig {
    pub table_name: String,
    pub region: String,
    /// Optional endpoint override (e.g. LocalStack, DynamoDB Local)
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub backend: Backend,
    pub dynamo: DynamoConfig,
    pub bind_addr: String,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("NOTES_BACKEND")
            .and_then(|v| Backend::parse(&v))
            .unwrap_or(Backend::DynamoDb);

        let timeout = lookup("DYNAMO_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis);

        Self {
            backend,
            dynamo: DynamoConfig {
                table_name: lookup("DYNAMO_TABLE")
                    .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
                region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                endpoint: lookup("DYNAMO_ENDPOINT").filter(|v| !v.is_empty()),
                timeout,
            },
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}
