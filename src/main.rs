use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use helm_release::cli::{run_release, ReleaseArgs};
use helm_release::config::{self, SourceKind};
use helm_release::domain::BumpKind;
use helm_release::git::{Git2Provider, OverridingProvider, RepoOverrides};
use helm_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "helm-release",
    about = "Compute the next chart version from git and update the Helm chart",
    disable_version_flag = true
)]
struct Args {
    #[arg(default_value = ".", help = "Directory containing the chart")]
    chart_dir: PathBuf,

    #[arg(long, help = "Increment this version component: major, minor or patch")]
    bump: Option<BumpKind>,

    #[arg(short, long, help = "Image tag to write into the values file")]
    tag: Option<String>,

    #[arg(long = "path", help = "Dotted path of the image tag in the values file")]
    tag_path: Option<String>,

    #[arg(long, help = "Print the computed version and exit without writing")]
    print_computed_version: bool,

    #[arg(long, help = "Version source: git or helm (helm requires --bump)")]
    source: Option<SourceKind>,

    #[arg(long, action = ArgAction::Set, help = "Abort on repository errors instead of using 0.0.1")]
    strict: Option<bool>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("helm-release {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let release_args = ReleaseArgs {
        chart_dir: args.chart_dir,
        bump: args.bump,
        tag: args.tag,
        tag_path: args.tag_path,
        print_only: args.print_computed_version,
        source: args.source,
        strict: args.strict,
    };

    let repo_dir = release_args.chart_dir.clone();
    let outcome = match run_release(&release_args, &config, || {
        Ok(OverridingProvider::new(
            Git2Provider::open(&repo_dir)?,
            RepoOverrides::from_env(),
        ))
    }) {
        Ok(outcome) => outcome,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if release_args.print_only {
        println!("{}", outcome.version);
        return Ok(());
    }

    ui::display_version_change(
        outcome.chart.as_deref().unwrap_or("chart"),
        outcome.previous.as_ref(),
        &outcome.version,
    );
    for file in &outcome.written {
        ui::display_success(&format!("Updated {}", file.display()));
    }

    Ok(())
}
