use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use revolt::cli::{Cli, Commands, ConfigSubcommands, create_backend, effective_config};
use revolt::config::AppConfig;
use revolt::core::{GenerationError, Generator, Result};
use revolt::{logging, tui};

fn run_config_command(command: ConfigSubcommands, config: &AppConfig) -> Result<()> {
    match command {
        ConfigSubcommands::Init => {
            let path =
                AppConfig::init_default().map_err(|e| GenerationError::Config(e.to_string()))?;
            println!("✓ Created config file at {}", path.display());
        }
        ConfigSubcommands::Where => {
            let path = AppConfig::get_config_path().ok_or_else(|| {
                GenerationError::Config("Could not determine config path".to_string())
            })?;
            println!("{}", path.display());
        }
        ConfigSubcommands::Show => {
            let rendered = config
                .to_toml()
                .map_err(|e| GenerationError::Config(e.to_string()))?;
            print!("{rendered}");
        }
    }
    Ok(())
}

async fn run_generate(
    cli: &Cli,
    config: &AppConfig,
    prompt: &str,
    output: Option<&Path>,
) -> Result<()> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GenerationError::Config("Prompt must not be empty".to_string()));
    }

    let backend = create_backend(cli, config)?;
    let mut generator = Generator::new(backend);

    let outcome = generator
        .submit(prompt, |update, session| {
            tracing::debug!(
                chunk = update.chunk(),
                received = update.raw_len(),
                revision = session.revision(),
                "Artifact updated"
            );
        })
        .await?;

    tracing::info!(
        chunks = outcome.chunks,
        bytes = outcome.raw.len(),
        language = generator.session().language().unwrap_or("none"),
        "Generation finished"
    );

    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", outcome.artifact))?;
            eprintln!(
                "✓ Wrote {} lines to {}",
                outcome.artifact.lines().count(),
                path.display()
            );
        }
        None => println!("{}", outcome.artifact),
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Config { command }) => {
            let config = effective_config(&cli, AppConfig::load());
            run_config_command(*command, &config)
        }
        Some(Commands::Generate { prompt, output }) => {
            logging::init_stderr(cli.verbose);
            let config = effective_config(&cli, AppConfig::load());
            run_generate(&cli, &config, prompt, output.as_deref()).await
        }
        None => {
            let log_guard = logging::init();
            let config = effective_config(&cli, AppConfig::load());
            let backend = create_backend(&cli, &config)?;
            let result = tui::run_tui(backend, &config).await;
            if let Some((path, _)) = &log_guard {
                eprintln!("Debug log written to {}", path.display());
            }
            result
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}
