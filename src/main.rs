use clap::Parser;
use league_scores::config::DEFAULT_STORE_PATH;
use league_scores::utils::error::ErrorSeverity;
use league_scores::utils::{logger, validation::Validate};
use league_scores::{
    CliConfig, LeagueConfig, LocalScoreStore, ScoreSubmissionService, SubmissionRequest,
};

fn exit_with(e: &league_scores::ScoreError) -> ! {
    tracing::error!(
        "❌ Score submission failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    // 載入聯盟設定 (可選)
    let league = match &args.config {
        Some(path) => match LeagueConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let verbose = args.verbose || league.as_ref().map(|c| c.verbose()).unwrap_or(false);
    if args.json_logs || league.as_ref().map(|c| c.json_logs()).unwrap_or(false) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🎾 Starting league-scores");
    tracing::debug!("CLI config: {:?}", args);

    if let Err(e) = args.validate() {
        exit_with(&e);
    }
    if let Some(config) = &league {
        if let Err(e) = config.validate() {
            exit_with(&e);
        }
        tracing::info!("✅ League configuration '{}' loaded", config.league.name);
    }

    let rules = league
        .as_ref()
        .map(LeagueConfig::scoring_rules)
        .unwrap_or_default();
    let store_path = args
        .store
        .clone()
        .or_else(|| league.as_ref().and_then(|c| c.store_path()).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string());

    let request = match SubmissionRequest::from_file(&args.submission) {
        Ok(request) => request,
        Err(e) => exit_with(&e),
    };

    let form = match &request.voice {
        Some(parsed) => {
            tracing::info!("🎙️ Merging voice parse result into the form");
            match request.form.merge_parsed(parsed, &rules) {
                Ok(form) => form,
                Err(e) => exit_with(&e),
            }
        }
        None => request.form.clone(),
    };

    let service = ScoreSubmissionService::new(LocalScoreStore::new(&store_path), rules);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        match service.preview(&form) {
            Ok(winner) => {
                println!("✅ Scores are valid, winner: {}", winner);
                return Ok(());
            }
            Err(e) => exit_with(&e),
        }
    }

    let submitter = match request.submitter() {
        Ok(submitter) => submitter,
        Err(e) => exit_with(&e),
    };

    match service.submit(&form, &request.players, submitter).await {
        Ok(outcome) => {
            println!("✅ {}", outcome.message());
            println!("🏆 Winner: {}", outcome.winner);
            println!("📁 Store: {}", store_path);

            if let Ok((recorded, remaining)) = service.progress(&form.match_id).await {
                println!(
                    "📊 {} of {} lines recorded, {} remaining",
                    recorded,
                    service.rules().lines_per_match,
                    remaining
                );
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
