use clap::{Parser, Subcommand};
use std::path::Path;

use pixelsaga::cli::commands::{self, OutputFormat};
use pixelsaga::config::generation::GenerationConfig;

#[derive(Parser)]
#[command(name = "pixelsaga")]
#[command(about = "Deterministic themed world-grid generator")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (defaults apply when it is absent)
    #[arg(short, long, default_value = "pixelsaga.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one world grid
    Generate {
        /// Theme: fantasy, post-apocalyptic, sci-fi, cyberpunk, dungeon, caves
        #[arg(short, long)]
        theme: Option<String>,

        /// Size preset: small, medium or large
        #[arg(short, long)]
        size: Option<String>,

        /// Seed; a random one is chosen and printed when omitted
        #[arg(long, allow_hyphen_values = true)]
        seed: Option<i64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "ascii")]
        format: OutputFormat,
    },

    /// Show the seed bundle derived for a request
    Seeds {
        #[arg(short, long, default_value = "fantasy")]
        theme: String,

        #[arg(short, long, default_value = "small")]
        size: String,

        #[arg(long, allow_hyphen_values = true)]
        seed: i64,
    },

    /// Generate a run of consecutive seeds in parallel
    Batch {
        #[arg(short, long)]
        theme: Option<String>,

        #[arg(short, long)]
        size: Option<String>,

        /// First seed
        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        from: i64,

        /// Number of grids
        #[arg(short = 'n', long, default_value_t = 16)]
        count: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match GenerationConfig::load_or_default(Path::new(&cli.config)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    commands::init_logging(&config);

    let result = match cli.command {
        Commands::Generate {
            theme,
            size,
            seed,
            format,
        } => commands::generate(&config, theme.as_deref(), size.as_deref(), seed, format),
        Commands::Seeds { theme, size, seed } => {
            commands::show_seeds(&theme, &size, seed);
            Ok(())
        }
        Commands::Batch {
            theme,
            size,
            from,
            count,
        } => commands::batch(&config, theme.as_deref(), size.as_deref(), from, count),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
