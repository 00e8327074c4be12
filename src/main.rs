use appconf::cli::{self, Input};
use appconf::{Format, Platform};
use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// App Config: find, read and write per-application configuration files
#[derive(Parser)]
#[command(name = "appconf", version, styles = STYLES)]
struct Cli {
    /// A dotenv file to source XDG_CONFIG_HOME / APPDATA overrides from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Resolve paths as on another platform (win32, darwin, linux, ...)
    #[arg(short, long, global = true)]
    platform: Option<Platform>,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration directory for an application
    Dir { app: String },

    /// Print the path of a file in the configuration directory
    Path {
        app: String,
        #[arg(default_value = appconf::DEFAULT_FILE)]
        file: String,
    },

    /// Create the configuration directory
    Create { app: String },

    /// Print the parsed contents of a config file
    Get {
        app: String,

        #[arg(default_value = appconf::DEFAULT_FILE)]
        file: String,

        /// Parse with this format instead of the one implied by the file name
        #[arg(short, long)]
        format: Option<Format>,

        /// Contents to initialize the file with if it does not exist
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Write a config file from a value, a file or stdin
    Save {
        app: String,

        #[arg(default_value = appconf::DEFAULT_FILE)]
        file: String,

        /// Write with this format instead of the one implied by the file name
        #[arg(short, long)]
        format: Option<Format>,

        /// Format of the input, when it differs from the output format
        #[arg(long)]
        input_format: Option<Format>,

        /// Literal contents to write
        #[arg(short, long, conflicts_with = "input")]
        value: Option<String>,

        /// File to copy contents from (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List the entries of the configuration directory
    List { app: String },

    /// Delete a config file, or the whole directory if no file is given
    Delete { app: String, file: Option<PathBuf> },

    /// List the available formats
    Formats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv = cli::load_dotenv(&cli.env)?;

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    if let Some(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    let platform = cli.platform;

    match cli.command {
        Commands::Dir { app } => {
            println!("{}", appconf::get_dir_for(&app, platform).display());
        }
        Commands::Path { app, file } => {
            println!("{}", appconf::get_file_for(&app, &file, platform).display());
        }
        Commands::Create { app } => {
            let store = cli::store_for(&app, platform);
            store.create()?;
            log::info!("✓ Ready: {}", store.dir().display().bright_black());
        }
        Commands::Get {
            app,
            file,
            format,
            default,
        } => {
            let store = cli::store_for(&app, platform);
            match cli::read_config(&store, &file, format, default.as_deref())? {
                Some(contents) => println!("{}", cli::render(&contents)?),
                None => {
                    eyre::bail!("No such config file: {}", store.file_path(&file).display());
                }
            }
        }
        Commands::Save {
            app,
            file,
            format,
            input_format,
            value,
            input,
        } => {
            let store = cli::store_for(&app, platform);
            let source = match (value, input) {
                (Some(value), _) => Input::Value(value),
                (None, Some(path)) => Input::File(path),
                (None, None) => Input::Stdin,
            };
            let written = cli::write_config(&store, &file, format, input_format, &source)?;
            log::info!(
                "✓ Wrote {} byte(s) to {}",
                written,
                store.file_path(&file).display().bright_black()
            );
        }
        Commands::List { app } => {
            let store = cli::store_for(&app, platform);
            match store.list()? {
                Some(entries) => {
                    for entry in entries {
                        println!("{}", entry);
                    }
                }
                None => log::warn!(
                    "No config directory for {} at {}",
                    app.cyan(),
                    store.dir().display().bright_black()
                ),
            }
        }
        Commands::Delete { app, file } => {
            let store = cli::store_for(&app, platform);
            cli::delete_config(&store, file.as_deref())?;
        }
        Commands::Formats => {
            for format in Format::ALL {
                println!("{}", format);
            }
        }
    }

    Ok(())
}
