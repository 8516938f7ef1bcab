/// Provisioning Binary - Creates the notes DynamoDB table if it does not exist
///
/// Usage:
///   cargo run --bin provision [--table <name>] [--region <region>] [--endpoint <url>]
///
/// Options default to DYNAMO_TABLE, AWS_REGION and DYNAMO_ENDPOINT.
/// Run once per deployment, before the service starts taking traffic.

use anyhow::Result;
use clap::Parser;
use notes_service::{connect, ensure_table, notes_table_definition, ProvisionOutcome, ServiceConfig};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "provision")]
#[command(about = "Create the notes DynamoDB table if it is missing")]
struct Args {
    /// Table name (defaults to DYNAMO_TABLE or NotesTable)
    #[arg(long, short)]
    table: Option<String>,

    /// AWS region (defaults to AWS_REGION or ap-south-1)
    #[arg(long, short)]
    region: Option<String>,

    /// Endpoint override, e.g. http://localhost:8000 for DynamoDB Local
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Notes Service - Table Provisioning v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut dynamo = ServiceConfig::from_env().dynamo;
    if let Some(table) = args.table {
        dynamo.table_name = table;
    }
    if let Some(region) = args.region {
        dynamo.region = region;
    }
    if args.endpoint.is_some() {
        dynamo.endpoint = args.endpoint;
    }

    info!("Table:  {}", dynamo.table_name);
    info!("Region: {}", dynamo.region);

    let client = connect(&dynamo).await;
    let definition = notes_table_definition(&dynamo.table_name);

    match ensure_table(&client, &definition).await? {
        ProvisionOutcome::Created => info!("✓ Table {} created", definition.table_name),
        ProvisionOutcome::AlreadyExists => {
            info!("✓ Table {} already present, nothing to do", definition.table_name)
        }
    }

    Ok(())
}
