//! Hollowdeep - demo entry point
//!
//! Runs a short scripted delve against the built-in catalogs (or a
//! directory of catalog files): create an adventurer, walk north until
//! the time track spawns a wandering monster, fight it out, and print
//! the narrative log. Mainly useful for eyeballing engine behavior
//! with a fixed seed.

use std::path::PathBuf;

use clap::Parser;

use hollowdeep::catalog::{defaults, GameData};
use hollowdeep::combat::PlayerAction;
use hollowdeep::core::config::GameConfig;
use hollowdeep::core::error::Result;
use hollowdeep::core::types::{Direction, HeroPath, Race, SkillId, StatId};
use hollowdeep::rules::dice::SeededDice;
use hollowdeep::session::{CharacterBuild, GameSession, MoveOutcome, StartingItem, Tone};

#[derive(Parser)]
#[command(name = "hollowdeep", about = "Turn-based dungeon crawler rules engine demo")]
struct Args {
    /// Seed for the shared dice stream
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Directory of catalog JSON files (defaults to the built-in set)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Where to write the player build snapshot
    #[arg(long, default_value = "player.json")]
    player_file: PathBuf,

    /// Turns to play before giving up on finding trouble
    #[arg(long, default_value_t = 60)]
    max_turns: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hollowdeep=info")),
        )
        .init();

    let args = Args::parse();
    let data = match &args.data_dir {
        Some(dir) => GameData::load_dir(dir)?,
        None => defaults::default_game_data()?,
    };

    let mut build = CharacterBuild::assemble(
        "Wulfric",
        Race::Human,
        HeroPath::Warrior,
        [StatId::Str, StatId::Dex, StatId::Int],
        vec![SkillId::Dodge, SkillId::Lucky],
        &GameConfig::default(),
    );
    build.starting_equipment = vec![
        StartingItem { category: "weapons".into(), key: "short_sword".into() },
        StartingItem { category: "armor".into(), key: "leather_cuirass".into() },
        StartingItem { category: "items".into(), key: "healing_potion".into() },
        StartingItem { category: "items".into(), key: "oil_flask".into() },
    ];
    build.save(&args.player_file)?;
    tracing::info!(path = %args.player_file.display(), "player build saved");

    let mut session = GameSession::new(
        &build,
        data,
        GameConfig::default(),
        Box::new(SeededDice::new(args.seed)),
    );

    println!("=== HOLLOWDEEP ===");
    println!("Seed {} - {} the {:?} sets out.", args.seed, build.name, build.hero_path);
    println!();

    // Pace back and forth until the time track produces an encounter
    let mut heading = Direction::North;
    for _ in 0..args.max_turns {
        if session.is_over() {
            break;
        }
        if session.in_combat() {
            session.combat_action(PlayerAction::Attack);
            continue;
        }
        match session.move_player(heading) {
            MoveOutcome::Moved | MoveOutcome::EnteredArea { .. } => {}
            MoveOutcome::DoorClosed(direction) => {
                session.try_open_door(direction);
            }
            MoveOutcome::Blocked => heading = heading.opposite(),
            MoveOutcome::Unavailable => {}
        }
    }

    println!("--- final log ---");
    for (text, tone) in session.log.messages() {
        let marker = match tone {
            Tone::Good => "+",
            Tone::Bad => "!",
            Tone::Warning => "~",
            Tone::Info => " ",
        };
        println!("{marker} {text}");
    }

    let player = session.player();
    if let Some(stats) = session.store.stats(player) {
        println!();
        println!(
            "HP {}/{}  STR {}  DEX {}  INT {}",
            stats.current_hp, stats.max_hp, stats.adj_str, stats.adj_dex, stats.adj_int
        );
    }
    if session.is_over() {
        println!("The dungeon has claimed another adventurer.");
    }
    Ok(())
}
