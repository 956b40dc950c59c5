//! Output file writer.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use routeforge_core::SiteConfig;
use tracing::debug;

use crate::args::GenerationArgs;

/// Sink for rendered pages.
pub trait PageWriter: Send + Sync {
    /// Persist `content` for `path`, overwriting any previous output.
    fn write(&self, args: &GenerationArgs, path: &str, content: &str) -> io::Result<()>;
}

impl<F> PageWriter for F
where
    F: Fn(&GenerationArgs, &str, &str) -> io::Result<()> + Send + Sync,
{
    fn write(&self, args: &GenerationArgs, path: &str, content: &str) -> io::Result<()> {
        self(args, path, content)
    }
}

/// Writes `<target>/<language>/<path>/<file_index><file_extension>`.
#[derive(Debug, Clone)]
pub struct FsWriter {
    target_directory: PathBuf,
    file_name: String,
}

impl FsWriter {
    /// Create a writer rooted at `target_directory`.
    #[must_use]
    pub fn new(
        target_directory: impl Into<PathBuf>,
        file_index: &str,
        file_extension: &str,
    ) -> Self {
        Self {
            target_directory: target_directory.into(),
            file_name: format!("{file_index}{file_extension}"),
        }
    }

    /// Create a writer from the site's output settings.
    #[must_use]
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            &config.target_directory,
            &config.file_index,
            &config.file_extension,
        )
    }

    /// Directory that holds the page for `path`.
    ///
    /// Empty and `.` segments are dropped, so leading, trailing and doubled
    /// slashes all normalize away. A `..` segment is rejected: page paths may
    /// come from data items and must stay inside the language directory.
    pub fn page_dir(&self, language: &str, path: &str) -> io::Result<PathBuf> {
        let mut dir = self.target_directory.join(language);
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("page path '{path}' leaves the output directory"),
                    ));
                }
                segment => dir.push(segment),
            }
        }
        Ok(dir)
    }

    /// Full path of the file written for `path`.
    pub fn output_path(&self, language: &str, path: &str) -> io::Result<PathBuf> {
        Ok(self.page_dir(language, path)?.join(&self.file_name))
    }
}

impl PageWriter for FsWriter {
    fn write(&self, args: &GenerationArgs, path: &str, content: &str) -> io::Result<()> {
        let dir = self.page_dir(&args.language, path)?;
        fs::create_dir_all(&dir)?;
        let output_path = dir.join(&self.file_name);
        fs::write(&output_path, content)?;
        debug!(path = %output_path.display(), "wrote page");
        Ok(())
    }
}

/// Remove a language's output directory, if present.
pub fn clean_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        debug!(dir = %dir.display(), "cleaning output directory");
        fs::remove_dir_all(dir)?;
    }
    Ok(())
}
