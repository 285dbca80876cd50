//! Output directory layout.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::error::CoreResult;
use crate::sections::ModuleSections;

/// Scratch file validated on every attempt.
pub const DRAFT_FILE: &str = "generated_module.tf";
pub const TEMP_DIR: &str = "temp";
pub const RESOURCES_FILE: &str = "main.tf";
pub const VARIABLES_FILE: &str = "variables.tf";
pub const OUTPUTS_FILE: &str = "outputs.tf";
pub const README_FILE: &str = "README.md";

/// Directories of one generation run:
///
/// ```text
/// generated_module_<YYYYMMDD_HHMMSS>/
/// ├── main.tf
/// ├── variables.tf
/// ├── outputs.tf
/// ├── README.md
/// └── temp/
///     └── generated_module.tf
/// ```
///
/// Nothing is cleaned up afterwards.
#[derive(Debug, Clone)]
pub struct ModuleLayout {
    output_dir: PathBuf,
    temp_dir: PathBuf,
}

impl ModuleLayout {
    /// Directory name for a run started at `timestamp`.
    pub fn dir_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("generated_module_{}", timestamp.format("%Y%m%d_%H%M%S"))
    }

    /// Create (or reuse) the output and temp directories under `root`.
    pub fn create<Tz: TimeZone>(root: &Path, timestamp: &DateTime<Tz>) -> CoreResult<Self>
    where
        Tz::Offset: std::fmt::Display,
    {
        let output_dir = root.join(Self::dir_name(timestamp));
        let temp_dir = output_dir.join(TEMP_DIR);

        fs::create_dir_all(&temp_dir)?;
        debug!("Created module layout at {:?}", output_dir);

        Ok(Self {
            output_dir,
            temp_dir,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn draft_path(&self) -> PathBuf {
        self.temp_dir.join(DRAFT_FILE)
    }

    /// Overwrite the scratch draft.
    pub fn write_draft(&self, content: &str) -> CoreResult<PathBuf> {
        let path = self.draft_path();
        debug!("Writing draft to {:?}", path);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Write the four module files, returning their paths.
    pub fn write_sections(&self, sections: &ModuleSections) -> CoreResult<Vec<PathBuf>> {
        let files = [
            (RESOURCES_FILE, &sections.resources),
            (VARIABLES_FILE, &sections.variables),
            (OUTPUTS_FILE, &sections.outputs),
            (README_FILE, &sections.readme),
        ];

        let mut written = Vec::with_capacity(files.len());
        for (name, content) in files {
            let path = self.output_dir.join(name);
            debug!("Writing {:?}", path);
            fs::write(&path, with_trailing_newline(content))?;
            written.push(path);
        }
        Ok(written)
    }
}

fn with_trailing_newline(content: &str) -> String {
    if content.is_empty() || content.ends_with('\n') {
        content.to_string()
    } else {
        format!("{}\n", content)
    }
}
