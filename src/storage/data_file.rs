use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    domain::{AlwaysSkip, Arbiter, Registry},
    storage::text::{self, ImportSummary, MalformedRecord},
};

/// A file on disk holding a registry snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    /// Refers to the snapshot at `path`. Nothing is read until asked.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file is missing or holds nothing but whitespace.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than the file not existing.
    pub fn is_blank(&self) -> io::Result<bool> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.trim().is_empty()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Reads the file's contents.
    ///
    /// # Errors
    ///
    /// - [`LoadError::NotFound`] if the file does not exist
    /// - [`LoadError::Blank`] if it contains only whitespace
    /// - [`LoadError::Io`] for any other I/O failure
    pub fn read(&self) -> Result<String, LoadError> {
        let content = std::fs::read_to_string(&self.path).map_err(|io_error| {
            match io_error.kind() {
                io::ErrorKind::NotFound => LoadError::NotFound(self.path.clone()),
                _ => LoadError::Io(io_error),
            }
        })?;

        if content.trim().is_empty() {
            return Err(LoadError::Blank(self.path.clone()));
        }
        Ok(content)
    }

    /// Imports the file into an existing registry, resolving name collisions
    /// with `arbiter`.
    ///
    /// # Errors
    ///
    /// Fails as [`DataFile::read`] does, or with [`LoadError::Import`] if the
    /// file is malformed. Records read before the malformed one have already
    /// been applied and stay in the registry.
    #[instrument(skip(registry, arbiter), fields(path = %self.path.display()))]
    pub fn load_into<A: Arbiter + ?Sized>(
        &self,
        registry: &mut Registry,
        arbiter: &mut A,
    ) -> Result<ImportSummary, LoadError> {
        let content = self.read()?;
        Ok(text::import(&content, registry, arbiter)?)
    }

    /// Loads the file into a fresh registry.
    ///
    /// A well-formed file has no duplicate names, so no conflicts are
    /// expected. Should one occur, the first record wins.
    ///
    /// # Errors
    ///
    /// See [`DataFile::load_into`].
    pub fn open(&self) -> Result<Registry, LoadError> {
        let mut registry = Registry::default();
        self.load_into(&mut registry, &mut AlwaysSkip)?;
        Ok(registry)
    }

    /// Like [`DataFile::open`], but a missing or blank file yields an empty
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] or [`LoadError::Import`].
    pub fn open_or_default(&self) -> Result<Registry, LoadError> {
        match self.open() {
            Err(LoadError::NotFound(path) | LoadError::Blank(path)) => {
                tracing::debug!("no records in '{}'; starting empty", path.display());
                Ok(Registry::default())
            }
            result => result,
        }
    }

    /// Writes `registry` to the file, replacing its contents.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directories cannot be written.
    #[instrument(skip(registry), fields(path = %self.path.display()))]
    pub fn save(&self, registry: &Registry) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        text::write(registry, &mut writer)?;
        writer.flush()
    }
}

/// Errors that can occur while loading a data file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("'{}' does not exist", .0.display())]
    NotFound(PathBuf),

    /// The file holds no records.
    #[error("'{}' is empty", .0.display())]
    Blank(PathBuf),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The file is not a valid snapshot.
    #[error(transparent)]
    Import(#[from] MalformedRecord),
}
