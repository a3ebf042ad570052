use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use skald_client::endpoints::auth::{LoginRequest, RegisterRequest};
use skald_client::{ApiClient, FileSessionStore};

#[derive(Parser)]
#[command(name = "skald")]
#[command(version, about = "Skald command line tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Skald API base URL (overrides SKALD_API_URL)
    #[arg(long)]
    server_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and persist the session
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Campaign copy generation
    Campaign {
        #[command(subcommand)]
        command: CampaignCommand,
    },
    /// Instagram post generation
    Instagram {
        #[command(subcommand)]
        command: InstagramCommand,
    },
    /// Pitch and outreach documents
    Pitch {
        #[command(subcommand)]
        command: PitchCommand,
    },
    /// Competitor analysis
    Competitor {
        #[command(subcommand)]
        command: CompetitorCommand,
    },
    /// Lead scoring and outreach
    Leads {
        #[command(subcommand)]
        command: LeadsCommand,
    },
    /// Sales-practice simulator
    Simulator {
        #[command(subcommand)]
        command: SimulatorCommand,
    },
    /// Business intelligence
    Intel {
        #[command(subcommand)]
        command: IntelCommand,
    },
    /// Product catalog
    Products {
        #[command(subcommand)]
        command: ProductsCommand,
    },
    /// Brand memory
    Memory {
        #[command(subcommand)]
        command: MemoryCommand,
    },
}

#[derive(Subcommand)]
enum CampaignCommand {
    /// One-shot generation
    Generate {
        /// Payload as a JSON string
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        /// Path to a JSON payload file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Token-streamed generation, printed as it arrives
    Stream {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum InstagramCommand {
    /// Generate a post
    Generate {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Show the generation pipeline steps
    Steps,
}

#[derive(Subcommand)]
enum PitchCommand {
    /// Draft a cold email
    ColdEmail {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Draft a sales pitch
    SalesPitch {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Draft a proposal
    Proposal {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CompetitorCommand {
    /// Analyse a competitor
    Analyse {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Fetch the weekly digest
    Digest,
}

#[derive(Subcommand)]
enum LeadsCommand {
    /// Score a single lead
    Score {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Upload a lead file for batch scoring
    ScoreBatch {
        /// CSV file of leads
        file: PathBuf,
    },
    /// Draft outreach for a scored lead
    Outreach {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SimulatorCommand {
    /// List practice personas
    Personas,
    /// Send one conversation turn
    Message {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Get the coaching debrief for a session
    Debrief {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum IntelCommand {
    /// Generate the weekly brief
    WeeklyBrief {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Dashboard statistics
    Stats,
    /// Opportunity alerts
    Alerts,
}

#[derive(Subcommand)]
enum ProductsCommand {
    /// List products
    List,
    /// Add a product
    Add {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Remove a product by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum MemoryCommand {
    /// Record a generation event
    Log {
        #[arg(long, value_name = "JSON")]
        payload: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Show learned brand rules
    Rules,
    /// Show memory status
    Status,
}

/// Resolve a payload from --payload JSON or an --input file; defaults to an
/// empty object so list-ish generation commands work bare.
fn read_payload(payload: Option<String>, input: Option<PathBuf>) -> Result<serde_json::Value> {
    if let Some(raw) = payload {
        return serde_json::from_str(&raw).context("--payload is not valid JSON");
    }
    if let Some(path) = input {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", path.display()));
    }
    Ok(serde_json::json!({}))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn stream_to_stdout(
    client: &ApiClient,
    payload: &serde_json::Value,
) -> Result<(), skald_client::ApiError> {
    client
        .campaign_stream(
            payload,
            |token| {
                print!("{}", token);
                let _ = std::io::stdout().flush();
            },
            || println!(),
        )
        .await
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let base_url = cli
        .server_url
        .or_else(|| std::env::var("SKALD_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    let store = Arc::new(FileSessionStore::new()?);
    let client = ApiClient::new(base_url, store);

    match cli.command {
        Commands::Login { email, password } => {
            let session = client.login(&LoginRequest { email, password }).await?;
            println!("Logged in as {} <{}>", session.user.name, session.user.email);
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            let session = client
                .register(&RegisterRequest {
                    name,
                    email,
                    password,
                })
                .await?;
            println!("Registered {} <{}>", session.user.name, session.user.email);
        }
        Commands::Logout => {
            client.logout()?;
            println!("Logged out");
        }
        Commands::Whoami => {
            print_json(&client.me().await?)?;
        }
        Commands::Campaign { command } => match command {
            CampaignCommand::Generate { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.campaign_generate(&payload).await?)?;
            }
            CampaignCommand::Stream { payload, input } => {
                let payload = read_payload(payload, input)?;
                stream_to_stdout(&client, &payload).await?;
            }
        },
        Commands::Instagram { command } => match command {
            InstagramCommand::Generate { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.instagram_generate(&payload).await?)?;
            }
            InstagramCommand::Steps => {
                print_json(&client.instagram_pipeline_steps().await?)?;
            }
        },
        Commands::Pitch { command } => match command {
            PitchCommand::ColdEmail { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.pitch_cold_email(&payload).await?)?;
            }
            PitchCommand::SalesPitch { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.pitch_sales_pitch(&payload).await?)?;
            }
            PitchCommand::Proposal { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.pitch_proposal(&payload).await?)?;
            }
        },
        Commands::Competitor { command } => match command {
            CompetitorCommand::Analyse { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.competitor_analyse(&payload).await?)?;
            }
            CompetitorCommand::Digest => {
                print_json(&client.competitor_weekly_digest().await?)?;
            }
        },
        Commands::Leads { command } => match command {
            LeadsCommand::Score { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.leads_score(&payload).await?)?;
            }
            LeadsCommand::ScoreBatch { file } => {
                let bytes = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let file_name = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("leads.csv")
                    .to_string();
                print_json(&client.leads_score_batch(&file_name, bytes).await?)?;
            }
            LeadsCommand::Outreach { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.leads_outreach(&payload).await?)?;
            }
        },
        Commands::Simulator { command } => match command {
            SimulatorCommand::Personas => {
                print_json(&client.simulator_personas().await?)?;
            }
            SimulatorCommand::Message { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.simulator_message(&payload).await?)?;
            }
            SimulatorCommand::Debrief { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.simulator_debrief(&payload).await?)?;
            }
        },
        Commands::Intel { command } => match command {
            IntelCommand::WeeklyBrief { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.intelligence_weekly_brief(&payload).await?)?;
            }
            IntelCommand::Stats => {
                print_json(&client.intelligence_dashboard_stats().await?)?;
            }
            IntelCommand::Alerts => {
                print_json(&client.intelligence_opportunity_alerts().await?)?;
            }
        },
        Commands::Products { command } => match command {
            ProductsCommand::List => {
                print_json(&client.products_list().await?)?;
            }
            ProductsCommand::Add { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.products_create(&payload).await?)?;
            }
            ProductsCommand::Remove { id } => {
                print_json(&client.products_delete(&id).await?)?;
            }
        },
        Commands::Memory { command } => match command {
            MemoryCommand::Log { payload, input } => {
                let payload = read_payload(payload, input)?;
                print_json(&client.memory_log(&payload).await?)?;
            }
            MemoryCommand::Rules => {
                print_json(&client.memory_rules().await?)?;
            }
            MemoryCommand::Status => {
                print_json(&client.memory_status().await?)?;
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_payload_defaults_to_empty_object() {
        let value = read_payload(None, None).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_read_payload_rejects_bad_json() {
        assert!(read_payload(Some("{not json".to_string()), None).is_err());
    }

    #[test]
    fn test_cli_parses_stream_command() {
        let cli = Cli::try_parse_from([
            "skald",
            "campaign",
            "stream",
            "--payload",
            r#"{"product": "widget"}"#,
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Campaign {
                command: CampaignCommand::Stream { .. }
            }
        ));
    }
}
