use anyhow::{bail, Context, Result};
use clap::Parser;
use league_scores::core::input::parse_games;
use league_scores::utils::logger;
use league_scores::{LeagueConfig, ScoringRules, SetScore, Winner};

#[derive(Parser)]
#[command(name = "score-check")]
#[command(about = "Check tennis set scores and print the match winner")]
struct Args {
    /// Sets as HOME-AWAY, e.g. 6-4 3-6 7-5 (the third is the match tiebreak)
    #[arg(required = true, num_args = 2..=3)]
    sets: Vec<String>,

    /// League TOML configuration with custom rules
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_set(raw: &str) -> Result<SetScore> {
    let (home, away) = raw
        .split_once('-')
        .with_context(|| format!("'{}' is not in HOME-AWAY form", raw))?;
    match (parse_games(home), parse_games(away)) {
        (Some(home), Some(away)) => Ok(SetScore::new(home, away)),
        _ => bail!("'{}' does not contain whole numbers", raw),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let rules = match &args.config {
        Some(path) => LeagueConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?
            .scoring_rules(),
        None => ScoringRules::default(),
    };
    tracing::debug!("Rules: {:?}", rules);

    let sets = args
        .sets
        .iter()
        .map(|raw| parse_set(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut all_valid = true;
    for (index, set) in sets.iter().enumerate() {
        let valid = if index < 2 {
            rules.is_standard_set_valid(set.home, set.away)
        } else {
            rules.is_match_tiebreak_valid(set.home, set.away)
        };
        all_valid &= valid;
        let mark = if valid { "✅" } else { "❌" };
        println!("{} Set {}: {}", mark, index + 1, set);
    }

    let winner = rules.determine_winner(&sets);
    println!("🏆 Winner: {}", winner);

    if !all_valid || winner == Winner::Undetermined {
        std::process::exit(2);
    }
    Ok(())
}
