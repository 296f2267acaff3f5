// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ssml_prosody::app_config::{self, Config};
use ssml_prosody::audio::wav;
use ssml_prosody::errors::AppError;
use ssml_prosody::file_utils::{FileManager, FileType};
use ssml_prosody::synthesis::PrerenderedSynthesizer;
use ssml_prosody::SpeechPipeline;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a markup file and print its clean text and timeline as JSON
    Parse {
        /// Markup file to parse
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Replay a markup file's directives over a pre-rendered waveform
    Render(RenderArgs),

    /// Generate shell completions for ssml-prosody
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Markup file to render
    #[arg(short, long, value_name = "FILE")]
    markup: PathBuf,

    /// WAV file holding the synthesizer output for the markup's text
    #[arg(short, long, value_name = "WAV")]
    audio: PathBuf,

    /// Output WAV file (defaults to <markup>.rendered.wav next to the markup)
    #[arg(short, long, value_name = "WAV")]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// ssml-prosody - SSML markup directives for speech synthesis
#[derive(Parser, Debug)]
#[command(name = "ssml-prosody")]
#[command(version)]
#[command(about = "Parse speech markup and apply its directives to audio")]
#[command(long_about = "ssml-prosody parses SSML into clean text plus a directive timeline and
replays the timeline (breaks, prosody, emphasis, audio inserts) over a waveform.

EXAMPLES:
    ssml-prosody parse greeting.ssml                                # Print text and timeline
    ssml-prosody render -m greeting.ssml -a raw.wav -o final.wav    # Apply directives
    ssml-prosody --log-level debug render -m g.ssml -a raw.wav -f   # Overwrite, debug logging
    ssml-prosody completions bash > ssml-prosody.bash               # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize with trace so the max level alone decides what is shown
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "ssml-prosody", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config, cli.log_level.clone())?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Parse { input } => run_parse(&config, &input),
        Commands::Render(args) => {
            let markup = args.markup.clone();
            run_render(config, args)
                .await
                .with_context(|| format!("Failed to render {:?}", markup))
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// @loads: Config from disk, creating a default file when missing
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .with_context(|| format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(config_path, &config_json)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Command line wins over the file
    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn run_parse(config: &Config, input: &Path) -> Result<()> {
    ensure_markup(input)?;
    let markup = FileManager::read_to_string(input)?;
    let parsed = ssml_prosody::MarkupParser::with_config(config.parser.clone()).parse(&markup);

    let json = serde_json::to_string_pretty(&parsed).context("Failed to serialize parse result")?;
    println!("{}", json);
    Ok(())
}

async fn run_render(config: Config, args: RenderArgs) -> Result<(), AppError> {
    ensure_markup(&args.markup)?;
    if FileManager::detect_file_type(&args.audio)? != FileType::Wav {
        return Err(AppError::File(format!("Audio input is not a WAV file: {:?}", args.audio)));
    }

    let output = match args.output {
        Some(path) => path,
        None => {
            let dir = args.markup.parent().unwrap_or(Path::new("."));
            FileManager::generate_output_path(&args.markup, dir, "rendered", "wav")
        }
    };
    if FileManager::file_exists(&output) && !args.force_overwrite {
        warn!("Skipping render, output already exists (use -f to force overwrite): {:?}", output);
        return Ok(());
    }

    let markup = FileManager::read_to_string(&args.markup)
        .map_err(|e| AppError::File(format!("{:#}", e)))?;
    let synthesizer = Arc::new(PrerenderedSynthesizer::new(&args.audio));
    let pipeline = SpeechPipeline::new(config, synthesizer)?;

    let start_time = std::time::Instant::now();
    let rendered = pipeline.render(&markup).await?;
    wav::write_wav(&output, &rendered.audio).map_err(|e| AppError::File(format!("{:#}", e)))?;

    info!(
        "Wrote {:?}: {} ms of audio, {} directives applied in {:.2?}",
        output,
        rendered.audio.duration_ms(),
        rendered.parsed.timeline.len(),
        start_time.elapsed()
    );
    Ok(())
}

fn ensure_markup(path: &Path) -> Result<()> {
    match FileManager::detect_file_type(path)? {
        FileType::Markup => Ok(()),
        FileType::Wav => Err(anyhow!("Expected a markup file, got WAV audio: {:?}", path)),
        FileType::Unknown => {
            warn!("Could not recognise {:?} as markup, parsing anyway", path);
            Ok(())
        }
    }
}
