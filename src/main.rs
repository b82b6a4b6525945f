use anyhow::Context;
use chrono::Local;
use clap::Parser;
use rom_tracker::core::chart::render_bar_chart;
use rom_tracker::core::session::{group_sessions, parse_reading};
use rom_tracker::core::{ConfigProvider, Measurement, MeasurementRepository, SearchQuery, Subject};
use rom_tracker::domain::battery;
use rom_tracker::utils::error::ErrorSeverity;
use rom_tracker::utils::{logger, validation::Validate};
use rom_tracker::{
    classify, CliConfig, Command, CsvMeasurementStore, Exporter, LocalStorage, RomError,
    SessionRecorder, Settings,
};
use std::io::Write;

const CHART_WIDTH: usize = 40;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let settings = match config.settings().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if settings.json_logs {
        logger::init_json_logger(settings.log_level.as_deref().unwrap_or("info"));
    } else {
        logger::init_cli_logger(config.verbose, settings.log_level.as_deref());
    }
    tracing::debug!("Effective settings: {:?}", settings);

    let mut out = std::io::stdout().lock();
    match run(config.command, &settings, &mut out).await {
        Ok(()) => Ok(()),
        Err(CommandError::Output(e)) => Err(e),
        Err(CommandError::Rom(e)) => {
            tracing::error!(
                "Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

/// Domain failures map to exit codes; failures writing to stdout do not.
enum CommandError {
    Rom(RomError),
    Output(anyhow::Error),
}

impl From<RomError> for CommandError {
    fn from(e: RomError) -> Self {
        CommandError::Rom(e)
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        CommandError::Output(anyhow::Error::new(e).context("failed to write output"))
    }
}

async fn run(
    command: Command,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let store = CsvMeasurementStore::new(
        LocalStorage::new(settings.data_dir().to_string()),
        settings.store_file(),
    );

    match command {
        Command::Tests => {
            for test in battery::all() {
                match test.full_rom {
                    Some(rom) => writeln!(out, "{:<24} {}", test.name, rom)?,
                    None => writeln!(out, "{:<24} -", test.name)?,
                }
            }
        }
        Command::Classify {
            full_rom,
            left,
            right,
        } => {
            writeln!(out, "{}", classify(full_rom, left, right))?;
        }
        Command::Add {
            name,
            surname,
            date,
            readings,
        } => {
            let readings = readings
                .iter()
                .map(|r| parse_reading(r))
                .collect::<rom_tracker::Result<Vec<_>>>()?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let recorder = SessionRecorder::new(store);
            let stored = recorder
                .record(&Subject::new(name, surname), date, &readings)
                .await?;

            tracing::info!(
                "Saved {} measurements to {}",
                stored.len(),
                recorder.repository().location()
            );
            writeln!(out, "✅ Data submitted successfully!")?;
            print_table(out, &stored)?;
            writeln!(out)?;
            writeln!(out, "{}", render_bar_chart(&stored, CHART_WIDTH))?;
        }
        Command::Search {
            name,
            surname,
            date,
            detail,
        } => {
            let query = SearchQuery {
                name,
                surname,
                date,
            };
            let sessions = group_sessions(store.search(&query).await?);
            if sessions.is_empty() {
                writeln!(out, "No results found.")?;
            }
            for session in &sessions {
                writeln!(out, "{}", session.key())?;
                if detail {
                    print_table(out, &session.measurements)?;
                    writeln!(out)?;
                    writeln!(
                        out,
                        "{}",
                        render_bar_chart(&session.measurements, CHART_WIDTH)
                    )?;
                    writeln!(out)?;
                }
            }
        }
        Command::Export { .. } => {
            let rows = store.all().await?;
            let exporter = Exporter::new(
                LocalStorage::new(settings.export_path().to_string()),
                settings,
            )?;
            for location in exporter.export(&rows).await? {
                writeln!(out, "📁 {}", location)?;
            }
        }
        Command::Delete { id: Some(id), .. } => {
            store.delete(id).await?;
            writeln!(out, "Entry ID {} deleted successfully!", id)?;
        }
        Command::Delete { id: None, .. } => {
            let removed = store.delete_all().await?;
            writeln!(out, "All entries deleted successfully! ({} removed)", removed)?;
        }
    }

    out.flush()
        .context("failed to flush output")
        .map_err(CommandError::Output)
}

fn print_table(out: &mut impl Write, rows: &[Measurement]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>5}  {:<24} {:>8} {:>8} {:>8}  Result",
        "ID", "Test", "Full ROM", "Left", "Right"
    )?;
    for m in rows {
        let full_rom = m
            .full_rom
            .map(|rom| rom.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:>5}  {:<24} {:>8} {:>8} {:>8}  {}",
            m.id, m.test, full_rom, m.left, m.right, m.result
        )?;
    }
    Ok(())
}
