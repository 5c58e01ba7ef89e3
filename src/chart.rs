//! Helm chart discovery and manifest updates
//!
//! A chart is a directory holding a chart file (`Chart.yaml`) and a values
//! file (`values.yaml`). Updates are prepared fully in memory before anything
//! touches the disk, so path and parse errors never leave half-written
//! charts behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ChartConfig;
use crate::document::{self, get_at_path, set_at_path, Document, PathExpression, Scalar};
use crate::domain::SemanticVersion;
use crate::error::{HelmReleaseError, Result};

pub const VERSION_KEY: &str = "version";
pub const APP_VERSION_KEY: &str = "appVersion";

/// A located chart and the files that make it up
#[derive(Debug, Clone)]
pub struct Chart {
    pub name: String,
    pub dir: PathBuf,
    chart_file: PathBuf,
    values_file: PathBuf,
    tag_path: PathExpression,
}

/// Serialized manifests ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRelease {
    pub chart: String,
    pub values: Option<String>,
}

impl Chart {
    /// Find the single chart below `root`.
    ///
    /// Finding no chart file, or more than one, is a discovery error.
    pub fn discover(root: &Path, config: &ChartConfig) -> Result<Self> {
        let mut found = find_chart_files(root, &config.chart_file)?;

        match found.len() {
            0 => Err(HelmReleaseError::discovery(format!(
                "unable to find a {} under {}",
                config.chart_file,
                root.display()
            ))),
            1 => {
                let chart_file = found.remove(0);
                let dir = chart_file
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                Chart::at(dir, config)
            }
            _ => {
                let paths: Vec<String> = found
                    .iter()
                    .filter_map(|p| p.parent())
                    .map(|p| p.display().to_string())
                    .collect();
                Err(HelmReleaseError::discovery(format!(
                    "found more than a single chart in the following paths:\n\t{}",
                    paths.join("\n\t")
                )))
            }
        }
    }

    /// Describe the chart in `dir` without searching
    pub fn at(dir: PathBuf, config: &ChartConfig) -> Result<Self> {
        let name = dir
            .canonicalize()
            .unwrap_or_else(|_| dir.clone())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Chart {
            name,
            chart_file: dir.join(&config.chart_file),
            values_file: dir.join(&config.values_file),
            tag_path: PathExpression::parse(&config.tag_path)?,
            dir,
        })
    }

    pub fn chart_file(&self) -> &Path {
        &self.chart_file
    }

    pub fn values_file(&self) -> &Path {
        &self.values_file
    }

    pub fn tag_path(&self) -> &PathExpression {
        &self.tag_path
    }

    pub fn load_chart(&self) -> Result<Document> {
        load_document(&self.chart_file)
    }

    pub fn load_values(&self) -> Result<Document> {
        load_document(&self.values_file)
    }

    /// Version currently recorded in the chart file
    pub fn read_version(&self) -> Result<SemanticVersion> {
        let doc = self.load_chart()?;
        let key = PathExpression::parse(VERSION_KEY)?;

        let raw = match get_at_path(&doc, &key) {
            Some(Document::Scalar(Scalar::String(raw))) => raw.clone(),
            Some(Document::Scalar(scalar)) => {
                return Err(HelmReleaseError::manifest(format!(
                    "{} field in {} was read as a {} ({}), expected a quoted semver string",
                    VERSION_KEY,
                    self.chart_file.display(),
                    scalar.kind(),
                    scalar
                )))
            }
            Some(other) => {
                return Err(HelmReleaseError::manifest(format!(
                    "{} field in {} is a {}, expected a version string",
                    VERSION_KEY,
                    self.chart_file.display(),
                    other.kind()
                )))
            }
            None => {
                return Err(HelmReleaseError::manifest(format!(
                    "{} has no {} field",
                    self.chart_file.display(),
                    VERSION_KEY
                )))
            }
        };

        Ok(SemanticVersion::parse(&raw)?)
    }

    /// Build the updated manifests without writing them.
    ///
    /// The chart's `version` must already exist; `appVersion` is created at
    /// the root when missing. The values file is only touched when an image
    /// tag is given.
    pub fn prepare_release(
        &self,
        version: &SemanticVersion,
        app_version: &str,
        image_tag: Option<&str>,
    ) -> Result<PreparedRelease> {
        let chart = self.updated_chart(version, app_version)?;

        let values = match image_tag {
            Some(tag) => {
                let values = self.load_values()?;
                let updated = set_at_path(&values, &self.tag_path, Scalar::from(tag))?;
                debug!(path = %self.tag_path, tag, "updated image tag");
                Some(document::yaml::to_string(&updated)?)
            }
            None => None,
        };

        Ok(PreparedRelease {
            chart: document::yaml::to_string(&chart)?,
            values,
        })
    }

    fn updated_chart(&self, version: &SemanticVersion, app_version: &str) -> Result<Document> {
        let doc = self.load_chart()?;
        let version_key = PathExpression::parse(VERSION_KEY)?;
        let mut updated = set_at_path(&doc, &version_key, Scalar::String(version.to_string()))?;

        let app_key = PathExpression::parse(APP_VERSION_KEY)?;
        if get_at_path(&updated, &app_key).is_some() {
            updated = set_at_path(&updated, &app_key, Scalar::from(app_version))?;
        } else if let Some(root) = updated.as_mapping_mut() {
            root.insert(APP_VERSION_KEY, Scalar::from(app_version).into());
        }

        Ok(updated)
    }

    /// Write prepared manifests: values first, then the chart.
    ///
    /// The two writes are not atomic as a pair. A failure after the values
    /// file was written is reported as [`HelmReleaseError::PartialUpdate`].
    pub fn write_release(&self, prepared: &PreparedRelease) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if let Some(values) = &prepared.values {
            fs::write(&self.values_file, values)?;
            info!(file = %self.values_file.display(), "wrote values");
            written.push(self.values_file.clone());
        }

        if let Err(source) = fs::write(&self.chart_file, &prepared.chart) {
            return Err(match written.first() {
                Some(first) => HelmReleaseError::PartialUpdate {
                    written: first.display().to_string(),
                    failed: self.chart_file.display().to_string(),
                    source,
                },
                None => HelmReleaseError::Io(source),
            });
        }
        info!(file = %self.chart_file.display(), "wrote chart");
        written.push(self.chart_file.clone());

        Ok(written)
    }
}

fn load_document(path: &Path) -> Result<Document> {
    let source = fs::read_to_string(path)?;
    document::yaml::parse(&source).map_err(|e| match e {
        HelmReleaseError::Manifest(msg) => {
            HelmReleaseError::manifest(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Recursively collect every file named `file_name` below `root`.
///
/// `.git` directories are not searched. Directories that cannot be read
/// below `root` are skipped.
pub fn find_chart_files(root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(HelmReleaseError::discovery(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir.as_path() == root => {
                return Err(HelmReleaseError::discovery(format!(
                    "cannot read {}: {}",
                    dir.display(),
                    e
                )))
            }
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries {
            let (path, file_type, name) = match entry.and_then(|e| {
                let file_type = e.file_type()?;
                Ok((e.path(), file_type, e.file_name()))
            }) {
                Ok(parts) => parts,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if file_type.is_dir() {
                if name != ".git" {
                    pending.push(path);
                }
            } else if name == file_name {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}
