use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WriteError;
use crate::postprocess::{PostProcessHook, PostProcessWarning};
use crate::{GeneratedFile, WriteMode};

/// What happened while writing one generation run to disk.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    /// Protected files left untouched because they already existed.
    pub skipped: Vec<PathBuf>,
    pub warnings: Vec<PostProcessWarning>,
}

impl WriteReport {
    /// True when the run finished but the formatter failed on some files.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Write generated files under `base`, then hand each written file to `hook`.
///
/// Files are written and post-processed one at a time, in order. Only
/// filesystem errors abort; formatter failures are collected as warnings.
pub fn write_files(
    base: &Path,
    files: &[GeneratedFile],
    hook: &PostProcessHook,
) -> Result<WriteReport, WriteError> {
    let mut report = WriteReport::default();

    for file in files {
        let path = base.join(&file.path);

        if file.write_mode == WriteMode::SkipIfExists && path.exists() {
            log::warn!("skipping existing {} (not overwritten)", path.display());
            report.skipped.push(path);
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &file.content).map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("wrote {}", path.display());

        if let Some(warning) = hook.after_file_written(&path, file.category) {
            report.warnings.push(warning);
        }
        report.written.push(path);
    }

    Ok(report)
}
