use anyhow::Result;
use bloat_browser::CaptureOptions;
use bloat_cli::{OutputFormat, commands, targets};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bloat")]
#[command(author, version)]
#[command(
    about = "Measure page weight by resource type and score it against screenshots",
    long_about = "bloat loads pages in Chrome, records their network activity and screenshots, \
                  then reports transferred bytes per resource type and the web bloat score: \
                  transferred bytes divided by screenshot bytes."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

/// Which URLs to work on and where their artifacts live
#[derive(Args)]
struct Targets {
    /// URLs to process
    #[arg(value_name = "URL")]
    urls: Vec<String>,

    /// File with one URL per line
    #[arg(long, value_name = "FILE")]
    url_file: Option<PathBuf>,

    /// Root directory for per-host artifacts
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "BLOAT_OUTPUT_DIR",
        default_value = "output"
    )]
    output_dir: PathBuf,
}

impl Targets {
    fn urls(&self) -> Result<Vec<String>> {
        targets::collect_urls(self.urls.clone(), self.url_file.as_deref())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load pages in Chrome, capture trace and screenshots, then analyze
    Crawl {
        #[command(flatten)]
        targets: Targets,

        /// Only crawl URLs whose artifacts are missing
        #[arg(long)]
        retry: bool,

        /// Path to the Chrome binary
        #[arg(long, value_name = "PATH", env = "BLOAT_CHROME_PATH")]
        chrome_path: Option<PathBuf>,

        /// Navigation timeout in seconds
        #[arg(long, value_name = "SECS", default_value_t = 30)]
        timeout: u64,

        /// Time to keep recording after the page loads, in milliseconds
        #[arg(long, value_name = "MS", default_value_t = 2000)]
        settle_ms: u64,

        /// Show the browser window
        #[arg(long)]
        headful: bool,
    },

    /// Analyze artifacts captured by an earlier crawl
    Analyze {
        #[command(flatten)]
        targets: Targets,
    },

    /// List URLs that still need crawling
    Pending {
        #[command(flatten)]
        targets: Targets,
    },

    /// Generate shell completion scripts
    #[command(after_long_help = COMPLETION_HELP)]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

const COMPLETION_HELP: &str = "SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:  bloat completion --shell bash >> ~/.bashrc
    Zsh:   bloat completion --shell zsh > ~/.zfunc/_bloat   (with fpath+=~/.zfunc in ~/.zshrc)
    Fish:  bloat completion --shell fish > ~/.config/fish/completions/bloat.fish";

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Crawl {
            targets,
            retry,
            chrome_path,
            timeout,
            settle_ms,
            headful,
        } => {
            let options = CaptureOptions {
                chrome_path,
                headless: !headful,
                navigation_timeout: Duration::from_secs(timeout),
                settle_delay: Duration::from_millis(settle_ms),
                ..CaptureOptions::default()
            };
            commands::crawl::execute(
                targets.urls()?,
                &targets.output_dir,
                retry,
                options,
                cli.format,
            )
        }
        Commands::Analyze { targets } => {
            commands::analyze::execute(&targets.urls()?, &targets.output_dir, cli.format)
        }
        Commands::Pending { targets } => {
            commands::pending::execute(&targets.urls()?, &targets.output_dir, cli.format)
        }
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("bloat=debug,bloat_cli=debug,bloat_core=debug,bloat_browser=debug")
    } else {
        EnvFilter::new("bloat=info,bloat_cli=info,bloat_core=warn,bloat_browser=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
