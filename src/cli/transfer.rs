use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clinic::{DataFile, LoadError};
use tracing::instrument;

use crate::cli::{
    output,
    prompt::{ConflictPolicy, Prompt},
    terminal::Colorize,
    Session,
};

#[derive(Debug, Parser)]
pub struct Import {
    /// The file to read records from
    path: PathBuf,

    /// What to do with records whose names are already taken
    #[arg(long, value_enum, default_value_t)]
    on_conflict: ConflictPolicy,
}

impl Import {
    #[instrument]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut registry = session.load()?;
        let source = DataFile::new(&self.path);
        let mut prompt = Prompt::for_import(self.on_conflict);

        let summary = match source.load_into(&mut registry, &mut prompt) {
            Err(LoadError::Blank(path)) => {
                println!("{}", format!("'{}' holds no records", path.display()).dim());
                return Ok(());
            }
            Err(LoadError::Import(malformed)) => {
                session.save(&registry)?;
                tracing::warn!("kept the records read before line {}", malformed.line);
                return Err(malformed)
                    .with_context(|| format!("failed to import '{}'", self.path.display()));
            }
            result => result.with_context(|| format!("failed to import '{}'", self.path.display()))?,
        };

        if summary.is_empty() {
            println!("{}", "Nothing was imported".dim());
            return Ok(());
        }

        session.save(&registry)?;
        println!(
            "{} {} and {}",
            "Imported".success(),
            output::count(summary.doctors_imported, "doctor"),
            output::count(summary.pets_imported, "pet")
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Export {
    /// The file to write records to
    path: PathBuf,

    /// Overwrite the file without asking
    #[arg(short, long)]
    yes: bool,
}

impl Export {
    #[instrument]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let registry = session.load()?;
        let target = DataFile::new(&self.path);

        if target.path() == session.file().path() {
            tracing::warn!("exporting onto the data file itself");
        }

        let blank = target
            .is_blank()
            .with_context(|| format!("failed to read '{}'", self.path.display()))?;
        if !blank
            && !Prompt::new(self.yes).ask(&format!(
                "'{}' already holds records. Overwrite it?",
                self.path.display()
            ))
        {
            println!("{}", "Cancelled".warning());
            return Ok(());
        }

        target
            .save(&registry)
            .with_context(|| format!("failed to write '{}'", self.path.display()))?;
        println!(
            "{} {} and {} to {}",
            "Exported".success(),
            output::count(registry.doctor_count(), "doctor"),
            output::count(registry.pet_count(), "pet"),
            self.path.display()
        );
        Ok(())
    }
}
