use clap::{Parser, Subcommand};
use coplay_engine::{
    core::IntersectResponse,
    providers::Fixture,
    ranking::{matches_search, retain_displayable, sort_friends},
    CoplayEngine, EngineConfig, RankedList, RankingContext, Ranker, SteamUser, TierRanker,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "coplay")]
#[command(about = "Find the Steam games a group can play together", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read a `0` player count as a real count instead of unknown
    #[arg(long, global = true)]
    zero_is_known: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a saved intersection response
    Rank {
        /// Response JSON file
        file: PathBuf,

        /// Number of users the games are for
        #[arg(short, long)]
        group_size: usize,
    },

    /// Order a friend list for the picker
    Friends {
        /// Friend list JSON file (array, or object keyed by Steam ID)
        file: PathBuf,

        /// Only show names containing this text
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Intersect and rank the libraries in a fixture file
    Compare {
        /// Fixture JSON file with `libraries` and `games`
        #[arg(short, long)]
        fixture: PathBuf,

        /// Steam IDs to compare
        #[arg(required = true)]
        users: Vec<u64>,

        /// Count played free games as owned
        #[arg(long)]
        include_free_games: bool,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FriendPayload {
    List(Vec<SteamUser>),
    Map(HashMap<String, SteamUser>),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env()?;
    if cli.zero_is_known {
        config.legacy_zero_unknown = false;
    }

    match cli.command {
        Commands::Rank { file, group_size } => {
            let json = std::fs::read_to_string(&file)?;

            match IntersectResponse::from_json(&json, config.zero_encoding())? {
                IntersectResponse::Games { games, .. } => {
                    let list = TierRanker::new().rank(games, RankingContext::new(group_size));
                    print_ranked(&list);
                }
                other => {
                    let name = other.user().map(|id| id.to_string()).unwrap_or_default();
                    println!("❌ {}", other.user_message(&name).unwrap_or_default());
                }
            }
        }

        Commands::Friends { file, search } => {
            let json = std::fs::read_to_string(&file)?;
            let mut users = match serde_json::from_str::<FriendPayload>(&json)? {
                FriendPayload::List(users) => users,
                FriendPayload::Map(users) => users.into_values().collect(),
            };

            retain_displayable(&mut users);
            if users.is_empty() {
                println!("❌ {}", coplay_engine::app::EMPTY_FRIEND_LIST);
                return Ok(());
            }
            sort_friends(&mut users);

            println!("👥 Friends:");
            for user in users.iter().filter(|u| matches_search(u, &search)) {
                let status = if user.online { "online" } else { "offline" };
                match user.visibility.unavailable_reason() {
                    None => println!("   {} ({}) [{}]", user.screen_name, user.steam_id, status),
                    Some(_) => println!(
                        "   {} ({}) [{}, {} profile]",
                        user.screen_name,
                        user.steam_id,
                        status,
                        user.visibility.label()
                    ),
                }
            }
        }

        Commands::Compare { fixture, users, include_free_games } => {
            let (library, catalog, _) = Fixture::load(&fixture)?.into_providers(config.zero_encoding());
            let engine = CoplayEngine::new(Arc::new(library), Arc::new(catalog), config)?;

            println!("🔍 Comparing {} users", users.len());

            match engine.compare(&users, include_free_games).await {
                Ok(list) => print_ranked(&list),
                Err(e) => {
                    let response = IntersectResponse::from(e);
                    let name = response.user().map(|id| id.to_string()).unwrap_or_default();
                    println!("❌ {}", response.user_message(&name).unwrap_or_default());
                }
            }
        }
    }

    Ok(())
}

fn print_ranked(list: &RankedList) {
    if list.is_empty() {
        println!("❌ {}", coplay_engine::app::NO_SHARED_GAMES);
        return;
    }

    println!("\n✅ {} shared games for {} users:", list.len(), list.group_size);
    for (i, ranked) in list.games.iter().enumerate() {
        let marker = if ranked.hint.is_short() { "⚠️" } else { "  " };
        println!(
            "   {:>3}. {} {} [{} players]",
            i + 1,
            marker,
            ranked.game.name,
            ranked.game.supported_players
        );
        if let Some(title) = ranked.hint.title() {
            println!("          {}", title);
        }
    }

    if list.dropped > 0 {
        println!("\n   ({} unnamed records skipped)", list.dropped);
    }
}
