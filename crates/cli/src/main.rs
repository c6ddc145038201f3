//! Battle runner entry point.

use anyhow::Result;
use clap::Parser;

use battle_core::{Battle, BattleConfig, Boss, Character, Healer, Mage, StatBlock, Warrior};

/// Runs one party-vs-boss battle and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "battle", version, about)]
struct Args {
    /// Rounds fought before the battle is called a draw.
    #[arg(long, default_value_t = BattleConfig::DEFAULT_MAX_ROUNDS)]
    max_rounds: u32,

    /// Base seed for critical-hit rolls.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let party: Vec<Box<dyn Character>> = vec![
        Box::new(Warrior::new(
            "Warrior",
            StatBlock::new(1, 6, 3, 1).with_hp(80).with_mp(20),
        )),
        Box::new(Mage::new(
            "Mage",
            StatBlock::new(1, 1, 5, 7).with_hp(60).with_mp(30),
        )),
        Box::new(Healer::new(
            "Healer",
            StatBlock::new(1, 1, 2, 6).with_hp(70).with_mp(30),
        )),
    ];
    let boss = Box::new(Boss::new(
        "Dragon",
        StatBlock::new(3, 8, 4, 5).with_hp(120).with_mp(0),
    ));

    let mut battle = Battle::new(party, boss).with_seed(args.seed);
    let result = battle.run(args.max_rounds);

    println!("outcome: {} (after {} rounds)", result.outcome, result.rounds);
    Ok(())
}
