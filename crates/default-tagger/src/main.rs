//! default-tagger: tag default VPC resources and the default RDS security
//! group with `isDefault=true` in every AWS region

use anyhow::Result;
use clap::Parser;
use default_tagger::config::TaggerConfig;
use default_tagger::{logging, orchestrator};
use default_tagger_common::defaults::{DEFAULT_PROFILE, DEFAULT_REGION_CONCURRENCY};

#[derive(Parser, Debug)]
#[command(name = "default-tagger")]
#[command(about = "Add AWS tag {isDefault: true} to default EC2 & RDS resources")]
#[command(version)]
struct Args {
    /// Validate permissions without tagging anything
    #[arg(short = 'd', long = "dryrun")]
    dry_run: bool,

    /// AWS credential profile to use
    #[arg(long, default_value = DEFAULT_PROFILE)]
    profile: String,
}

impl From<Args> for TaggerConfig {
    fn from(args: Args) -> Self {
        Self {
            profile: args.profile,
            dry_run: args.dry_run,
            concurrency: DEFAULT_REGION_CONCURRENCY,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print the error and each of its causes on stderr
fn print_error(e: &anyhow::Error) {
    eprintln!("\x1b[1;31mError:\x1b[0m {e}");
    for cause in e.chain().skip(1) {
        eprintln!("  \x1b[33mCaused by:\x1b[0m {cause}");
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    logging::init_logging()?;

    let config: TaggerConfig = args.into();
    let report = orchestrator::run(&config).await?;

    if !report.is_success() {
        let failed = report.failed_regions();
        anyhow::bail!(
            "{} of {} regions failed: {}",
            failed.len(),
            report.regions.len(),
            failed.join(", ")
        );
    }

    Ok(())
}
