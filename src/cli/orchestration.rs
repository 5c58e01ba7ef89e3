//! Main release workflow orchestration logic
//!
//! Argument parsing stays in `main.rs`; this module takes already-parsed
//! arguments, resolves the next version and, unless asked only to print it,
//! rewrites the chart.

use std::cmp::Ordering;
use std::path::PathBuf;

use crate::chart::Chart;
use crate::config::{ChartConfig, Config, SourceKind};
use crate::domain::{BumpKind, SemanticVersion, VersionError};
use crate::error::Result;
use crate::git::{collect_repo_state, RepoStateProvider};
use crate::resolver::{default_version, resolve_source, VersionSource};
use crate::ui;

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// Options left as `None` fall back to the loaded configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    /// Directory searched for the chart
    pub chart_dir: PathBuf,

    /// Explicit version component to increment
    pub bump: Option<BumpKind>,

    /// Image tag written to the values file and used as appVersion
    pub tag: Option<String>,

    /// Dotted path of the image tag in the values file
    pub tag_path: Option<String>,

    /// Only compute the version, write nothing
    pub print_only: bool,

    pub source: Option<SourceKind>,

    pub strict: Option<bool>,
}

impl Default for ReleaseArgs {
    fn default() -> Self {
        ReleaseArgs {
            chart_dir: PathBuf::from("."),
            bump: None,
            tag: None,
            tag_path: None,
            print_only: false,
            source: None,
            strict: None,
        }
    }
}

/// Result of a successful release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// The computed chart version
    pub version: SemanticVersion,

    /// Value for the chart's appVersion field
    pub app_version: String,

    /// Version the chart carried before the update, when readable
    pub previous: Option<SemanticVersion>,

    /// Name of the updated chart
    pub chart: Option<String>,

    /// Files written, in write order
    pub written: Vec<PathBuf>,
}

impl ReleaseOutcome {
    pub fn wrote(&self) -> bool {
        !self.written.is_empty()
    }
}

/// Main release workflow
///
/// 1. Select the version source (repository state or chart version)
/// 2. Resolve the next version, falling back to 0.0.1 on repository
///    errors when not strict
/// 3. Return early when only printing
/// 4. Discover the chart, prepare both manifests and write them
///
/// The repository is only opened when the git source is selected, through
/// `open_provider`.
pub fn run_release<P, F>(args: &ReleaseArgs, config: &Config, open_provider: F) -> Result<ReleaseOutcome>
where
    P: RepoStateProvider,
    F: FnOnce() -> Result<P>,
{
    let source = args.source.unwrap_or(config.behavior.source);
    let strict = args.strict.unwrap_or(config.behavior.strict);
    let chart_config = effective_chart_config(args, &config.chart);

    if source == SourceKind::Helm && args.bump.is_none() {
        return Err(VersionError::BumpRequired { origin: "helm" }.into());
    }

    let mut chart = None;
    let resolved = match source {
        SourceKind::Git => open_provider().and_then(|provider| {
            let state = collect_repo_state(&provider)?;
            Ok(resolve_source(&VersionSource::FromRepoState(state), args.bump)?)
        }),
        SourceKind::Helm => {
            let found = Chart::discover(&args.chart_dir, &chart_config)?;
            let current = found.read_version()?;
            chart = Some(found);
            Ok(resolve_source(
                &VersionSource::FromManifestVersion(current),
                args.bump,
            )?)
        }
    };

    let version = match resolved {
        Ok(version) => version,
        Err(err) if !strict && err.is_repo_state_error() => {
            let fallback = default_version();
            ui::display_warning(&format!(
                "{}; strict mode is off, using default version {}",
                err, fallback
            ));
            fallback
        }
        Err(err) => return Err(err),
    };

    let app_version = match &args.tag {
        Some(tag) => tag.clone(),
        None => version.without_build_metadata().to_string(),
    };

    if args.print_only {
        return Ok(ReleaseOutcome {
            version,
            app_version,
            previous: None,
            chart: None,
            written: Vec::new(),
        });
    }

    let chart = match chart {
        Some(chart) => chart,
        None => Chart::discover(&args.chart_dir, &chart_config)?,
    };

    let previous = chart.read_version().ok();
    if let Some(old) = &previous {
        if version.cmp_precedence(old) == Ordering::Less {
            ui::display_warning(&format!(
                "{}: new version {} sorts before the current version {}",
                chart.name, version, old
            ));
        }
    }

    let prepared = chart.prepare_release(&version, &app_version, args.tag.as_deref())?;
    let written = chart.write_release(&prepared)?;

    Ok(ReleaseOutcome {
        version,
        app_version,
        previous,
        chart: Some(chart.name),
        written,
    })
}

fn effective_chart_config(args: &ReleaseArgs, config: &ChartConfig) -> ChartConfig {
    let mut chart_config = config.clone();
    if let Some(path) = &args.tag_path {
        chart_config.tag_path = path.clone();
    }
    chart_config
}

