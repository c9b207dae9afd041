//! `bowly` - CLI for the bowling score tracker
//!
//! This binary logs games, scores frame entries and reports trend
//! statistics from the local game database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use chrono::{Local, NaiveDate};
use clap::Parser;

use bowly::cli::{
    AddCommand, Cli, Command, ConfigCommand, EnterCommand, ListCommand, ScoreCommand,
};
use bowly::session::Session;
use bowly::{init_logging, Backup, Config, GameRecord, NewGame, Removed, Statistics, Storage};
use bowly_frames::{score, validate, FrameGrid, ScoreResult};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Add(add_cmd) => handle_add(&config, &add_cmd),
        Command::Score(score_cmd) => handle_score(&score_cmd),
        Command::Enter(enter_cmd) => handle_enter(&config, &enter_cmd),
        Command::List(list_cmd) => handle_list(&config, &list_cmd),
        Command::Remove(remove_cmd) => {
            let storage = open_storage(&config)?;
            match storage.remove(&remove_cmd.key)? {
                Removed::Id(id) => println!("Removed game {id}."),
                Removed::Date { date, count } => println!("Removed {count} game(s) on {date}."),
            }
            Ok(())
        }
        Command::Clear(clear_cmd) => {
            if clear_cmd.yes {
                let removed = open_storage(&config)?.clear()?;
                println!("Removed {removed} game(s).");
            } else {
                println!("This will remove every logged game.");
                println!("Use --yes to confirm.");
            }
            Ok(())
        }
        Command::Stats(stats_cmd) => handle_stats(&config, stats_cmd.json),
        Command::Target(target_cmd) => {
            let storage = open_storage(&config)?;
            if let Some(target) = target_cmd.score {
                storage.set_target(target)?;
                println!("Target set to {target:.2}.");
            } else {
                println!("{:.2}", storage.target(config.stats.default_target)?);
            }
            Ok(())
        }
        Command::Export(export_cmd) => {
            let storage = open_storage(&config)?;
            let backup = Backup::from_storage(&storage, config.stats.default_target)?;
            let path = export_cmd
                .output
                .unwrap_or_else(|| Backup::file_name(today()).into());
            backup.save(&path)?;
            println!(
                "Exported {} game(s) to {}.",
                backup.records.len(),
                path.display()
            );
            Ok(())
        }
        Command::Import(import_cmd) => {
            let backup = Backup::load(&import_cmd.path, config.stats.default_target)?;
            let mut storage = open_storage(&config)?;
            let stored = backup.restore(&mut storage)?;
            println!(
                "Imported {stored} game(s), target {:.2}.",
                backup.target
            );
            Ok(())
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn open_storage(config: &Config) -> Result<Storage, Box<dyn std::error::Error>> {
    Ok(Storage::open(config.database_path())?)
}

fn score_notation(notation: &str) -> Result<(FrameGrid, ScoreResult), Box<dyn std::error::Error>> {
    let grid = FrameGrid::parse_notation(notation).map_err(bowly::Error::from)?;
    let frames = validate(&grid).map_err(bowly::Error::from)?;
    let result = score(&frames);
    Ok((grid, result))
}

fn handle_add(config: &Config, cmd: &AddCommand) -> Result<(), Box<dyn std::error::Error>> {
    let date = cmd.date.unwrap_or_else(today);
    let game = match (&cmd.frames, cmd.score) {
        (Some(notation), _) => {
            let (_, result) = score_notation(notation)?;
            NewGame::from_score(date, result)?
        }
        (None, Some(total)) => NewGame::new(
            date,
            total,
            cmd.strikes.unwrap_or(0),
            cmd.spares.unwrap_or(0),
        )?,
        (None, None) => return Err("either --score or --frames is required".into()),
    };

    let record = open_storage(config)?.add(game)?;
    print_added(&record);
    Ok(())
}

fn print_added(record: &GameRecord) {
    println!(
        "Added {} on {}: {} (strikes: {}, spares: {})",
        record.id, record.date, record.score, record.strikes, record.spares
    );
}

fn handle_score(cmd: &ScoreCommand) -> Result<(), Box<dyn std::error::Error>> {
    let (grid, result) = score_notation(&cmd.frames)?;
    if cmd.json {
        let output = serde_json::json!({
            "frames": grid,
            "total": result.total,
            "strikes": result.strikes,
            "spares": result.spares,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Frames:  {grid}");
        println!("Score:   {}", result.total);
        println!("Strikes: {}", result.strikes);
        println!("Spares:  {}", result.spares);
    }
    Ok(())
}

fn handle_enter(config: &Config, cmd: &EnterCommand) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let result = Session::new(stdin.lock(), stdout.lock()).run()?;

    match result {
        Some(result) if cmd.save => {
            let game = NewGame::from_score(cmd.date.unwrap_or_else(today), result)?;
            let record = open_storage(config)?.add(game)?;
            print_added(&record);
        }
        Some(result) => println!("Final score: {}", result.total),
        None if cmd.save => println!("No score computed; nothing saved."),
        None => {}
    }
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> Result<(), Box<dyn std::error::Error>> {
    let storage = open_storage(config)?;
    let records = match cmd.limit {
        Some(limit) => storage.recent(limit)?,
        None => storage.list()?,
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No games logged.");
        return Ok(());
    }

    println!(
        "{:<16}  {:<10}  {:>5}  {:>7}  {:>6}",
        "ID", "DATE", "SCORE", "STRIKES", "SPARES"
    );
    for record in &records {
        println!(
            "{:<16}  {:<10}  {:>5}  {:>7}  {:>6}",
            record.id,
            record.date.to_string(),
            record.score,
            record.strikes,
            record.spares
        );
    }
    Ok(())
}

fn handle_stats(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let storage = open_storage(config)?;
    let records = storage.list()?;
    let target = storage.target(config.stats.default_target)?;
    let stats = Statistics::compute(
        &records,
        target,
        config.stats.recent_games,
        config.stats.trend_window,
    );

    if json {
        let mut output = serde_json::to_value(&stats)?;
        output["targetGap"] = serde_json::Value::String(stats.target_gap());
        output["suggestionMessage"] = serde_json::Value::String(stats.suggestion.message());
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let recent = if stats.recent.is_empty() {
        "no games yet".to_string()
    } else {
        stats
            .recent
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!("Games:          {}", stats.games);
    println!("Average:        {:.2}", stats.average);
    println!(
        "High game:      {}",
        stats.max.map_or_else(|| "-".to_string(), |m| m.to_string())
    );
    println!("Target:         {:.2}", stats.target);
    println!("To target:      {}", stats.target_gap());
    println!("Recent:         {recent}");
    println!("Total strikes:  {}", stats.total_strikes);
    println!("Total spares:   {}", stats.total_spares);
    println!();
    println!("{}", stats.suggestion);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Stats]");
                println!("  Default target:     {:.2}", config.stats.default_target);
                println!("  Recent games:       {}", config.stats.recent_games);
                println!("  Trend window:       {}", config.stats.trend_window);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
