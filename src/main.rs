use anyhow::Context;
use checkin_runner::{Config, Params, Runner};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "checkin")]
#[command(about = "OCR-guided daily check-in")]
#[command(version)]
struct Cli {
    /// Config file (default: config.local.yaml or config.yaml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Set a parameter (can be used multiple times)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Find the claim button but do not click it
    #[arg(long)]
    no_claim: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    // RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let params = Params::from_args(&cli.params)?;

    let path = match cli.config {
        Some(path) => path,
        None => Config::discover(".")?,
    };
    let mut config = Config::load_with_params(&path, &params)
        .with_context(|| format!("loading {}", path.display()))?;

    if cli.check {
        print_summary(&config)?;
        return Ok(());
    }

    if cli.headless {
        config.browser.headless = true;
    }
    if cli.no_claim {
        config.claim = false;
    }

    println!("Running: {}", config.name);

    let mut runner = Runner::launch(&config).await?;
    let result = runner.run(&config).await;
    // The browser is closed whatever happened above.
    if let Err(e) = runner.close().await {
        tracing::warn!("{}", e);
    }
    let result = result?;

    println!();
    if result.success {
        println!("✓ Success");
    } else {
        println!("✗ Failed");
        if let Some(ref error) = result.error {
            println!("  Error: {}", error);
        }
        if result.capability_failure {
            println!("  (browser or OCR backend failure)");
        }
    }
    println!("  Steps: {}", result.steps_completed);
    println!("  Claimed: {}", if result.claimed { "yes" } else { "no" });
    println!("  Duration: {}ms", result.duration_ms);
    if let Some(ref shot) = result.final_screenshot {
        println!("  Screenshot: {}", shot.display());
    }

    if !result.success {
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(config: &Config) -> anyhow::Result<()> {
    let labels = config.labels()?;
    let viewport = config.browser.viewport();

    println!("Config valid: {}", config.name);
    println!("  Target: {}", config.target.url);
    println!("  Account: {}", config.account.username);
    println!("  Viewport: {}x{}", viewport.width, viewport.height);
    println!("  Locale: {}", config.locale);
    println!(
        "  Labels: {} / {} / {} / {} / {}",
        labels.username, labels.password, labels.login, labels.monthly_pass, labels.claim
    );
    println!(
        "  OCR: {} ({})",
        checkin_runner::ocr::backend().unwrap_or("none, rebuild with --features tesseract"),
        config.ocr.language
    );
    println!("  Claim: {}", if config.claim { "yes" } else { "no" });
    if !config.params.is_empty() {
        println!("  Parameters: {}", config.params.len());
        for (name, def) in &config.params {
            let req = if def.required { " (required)" } else { "" };
            let desc = def.description.as_deref().unwrap_or("");
            println!("    - {}{}: {}", name, req, desc);
        }
    }
    println!("  Final screenshot: {}", config.on_failure.screenshot);
    match config.on_failure.mail {
        Some(ref mail) => println!("  Failure mail: {} via {}", mail.receiver, mail.smtp_server),
        None => println!("  Failure mail: off"),
    }
    Ok(())
}
