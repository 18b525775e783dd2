use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clickbot::args::CommonArgs;
use clickbot::config::Config;
use clickbot::logging::{self, LogConfig};
use clickbot::theme as t;

// ── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "clickbot",
    version,
    about = "Play the Cookie Clicker experiment page with a greedy upgrade strategy"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Launch the browser and play until the target is reached (default)
    Run,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(if cli.common.verbose {
        LogConfig::debug()
    } else {
        LogConfig::from_env()
    });
    t::init_color(cli.common.no_color);

    let config_path = cli.common.config_path();
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Init { force } => write_default_config(&config_path, force),
        Commands::Config => {
            let config = load_config(&cli.common)?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Commands::Run => {
            let config = load_config(&cli.common)?;
            run(config).await
        }
    }
}

fn load_config(common: &CommonArgs) -> Result<Config> {
    let mut config = Config::load(Some(common.config_path()))?;
    common.apply_overrides(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("{}", t::icon_ok(&format!("Wrote {}", path.display())));
    Ok(())
}

#[cfg(feature = "browser")]
async fn run(config: Config) -> Result<()> {
    use clickbot::surface::ChromeSurface;
    use clickbot::{GameSession, SessionOptions, StrategyLoop};

    let spinner = t::spinner(&format!("Opening {}", config.browser.url));
    let surface = match ChromeSurface::launch(&config.browser).await {
        Ok(surface) => {
            t::spinner_ok(&spinner, "Game page loaded");
            surface
        }
        Err(e) => {
            t::spinner_fail(&spinner, "Could not open the game page");
            return Err(e).context("launching browser");
        }
    };

    let mut session = GameSession::initialize(surface, SessionOptions::from(&config))
        .await
        .context("initializing game session")?;

    let interval = config.strategy.interval()?;
    let report = StrategyLoop::new(interval)
        .run(&mut session)
        .await
        .context("playing")?;

    println!(
        "{}",
        t::icon_ok(&format!(
            "{} cookies produced, report at {}",
            clickbot::display::thousands(report.stats.produced),
            session.options().report_path().display()
        ))
    );

    if config.browser.keep_open {
        println!("{}", t::muted("Browser left open, press Ctrl-C to close it."));
        tokio::signal::ctrl_c().await?;
    }
    session.close().await?;
    Ok(())
}

#[cfg(not(feature = "browser"))]
async fn run(_config: Config) -> Result<()> {
    anyhow::bail!("clickbot was built without browser support; rebuild with --features browser")
}
