use anyhow::Context;
use clap::{Parser, Subcommand};
use riot_match_coach::config::Config;
use riot_match_coach::insight::InsightClient;
use riot_match_coach::player_summary::fetch_player_summary;
use riot_match_coach::riot_api::{DEFAULT_RECENT_MATCHES, RiotClient};
use riot_match_coach::server::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "riot-match-coach",
    about = "Condensed League of Legends match summaries and coaching feedback",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Overrides BIND_ADDR
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Resolve a Riot ID to its PUUID
    Puuid {
        /// Riot game name (e.g., Summoner name)
        #[arg(long = "game-name")]
        game_name: String,

        /// Riot tag line (e.g., region tag)
        #[arg(long = "tag-line")]
        tag_line: String,
    },

    /// List recent match IDs, most recent first
    Matches {
        #[arg(long)]
        puuid: String,

        #[arg(long, default_value_t = DEFAULT_RECENT_MATCHES)]
        count: usize,
    },

    /// Print the condensed player summary for one match
    Summary {
        #[arg(long)]
        puuid: String,

        #[arg(long = "match-id")]
        match_id: String,

        /// Also ask the configured LLM for coaching feedback
        #[arg(long)]
        insights: bool,

        /// Question forwarded to the LLM instead of the default instructions
        #[arg(long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    if let Err(err) = run(args).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;
    let riot = RiotClient::new(&config.riot_api_key, &config.riot_base_url)?;

    match args.command {
        Command::Serve { bind } => {
            let insights = match config.llm.clone() {
                Some(llm) => Some(Arc::new(InsightClient::new(llm)?)),
                None => None,
            };
            let state = AppState {
                riot: Arc::new(riot),
                insights,
            };
            server::serve(state, bind.unwrap_or(config.bind_addr)).await?;
        }
        Command::Puuid {
            game_name,
            tag_line,
        } => {
            let puuid = riot.get_puuid(&game_name, &tag_line).await?;
            println!("{}", puuid);
        }
        Command::Matches { puuid, count } => {
            for match_id in riot.get_match_ids_by_puuid(&puuid, count).await? {
                println!("{}", match_id);
            }
        }
        Command::Summary {
            puuid,
            match_id,
            insights,
            message,
        } => {
            let summary = fetch_player_summary(&riot, &puuid, &match_id).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            if insights {
                let llm = config
                    .llm
                    .context("LLM_API_KEY or OPENAI_API_KEY must be set for --insights")?;
                let insight = InsightClient::new(llm)?
                    .generate(&summary, message.as_deref())
                    .await?;
                println!("=== AI Coaching Feedback ({}) ===", insight.model);
                println!("{}", insight.insights);
            }
        }
    }

    Ok(())
}
