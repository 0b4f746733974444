use anyhow::{Context, Result};
use rescope_resolver::RebuildDecision;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sentinel emitted when everything must be rebuilt.
pub const REBUILD_ALL: &str = "*";

/// Sentinel emitted when nothing should be built (fatal input path only).
pub const REBUILD_NONE: &str = "nothing";

/// The two output channels: affected projects and affected modules, one id
/// per line, or a single sentinel line on both.
///
/// Created before the change list is opened so the fatal-input path can
/// still emit its sentinel.
pub struct ReportChannels {
    projects: BufWriter<File>,
    modules: BufWriter<File>,
    projects_path: PathBuf,
    modules_path: PathBuf,
}

impl ReportChannels {
    pub fn create(projects_path: &Path, modules_path: &Path) -> Result<Self> {
        let projects = File::create(projects_path)
            .with_context(|| format!("creating '{}'", projects_path.display()))?;
        let modules = File::create(modules_path)
            .with_context(|| format!("creating '{}'", modules_path.display()))?;
        Ok(Self {
            projects: BufWriter::new(projects),
            modules: BufWriter::new(modules),
            projects_path: projects_path.to_owned(),
            modules_path: modules_path.to_owned(),
        })
    }

    pub fn projects_path(&self) -> &Path {
        &self.projects_path
    }

    pub fn modules_path(&self) -> &Path {
        &self.modules_path
    }

    pub fn write_decision(&mut self, decision: &RebuildDecision) -> Result<()> {
        match decision {
            RebuildDecision::Nothing => {
                log::info!("rebuild nothing");
                self.write_both(REBUILD_NONE)?;
            }
            RebuildDecision::All => {
                log::info!("rebuild all");
                self.write_both(REBUILD_ALL)?;
            }
            RebuildDecision::Subset { projects, modules } => {
                for id in projects {
                    writeln!(self.projects, "{}", id)?;
                }
                for id in modules {
                    writeln!(self.modules, "{}", id)?;
                }
            }
        }
        self.flush()
    }

    fn write_both(&mut self, line: &str) -> Result<()> {
        writeln!(self.projects, "{}", line)?;
        writeln!(self.modules, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.projects
            .flush()
            .with_context(|| format!("writing '{}'", self.projects_path.display()))?;
        self.modules
            .flush()
            .with_context(|| format!("writing '{}'", self.modules_path.display()))?;
        Ok(())
    }
}
