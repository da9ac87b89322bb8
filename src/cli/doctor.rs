use clap::Parser;
use clinic::{
    domain::{Choice, Species},
    Doctor, Name,
};
use tracing::instrument;

use crate::cli::{
    output::{self, OutputFormat},
    parse_choice, parse_name,
    terminal::Colorize,
    Session,
};

#[derive(Debug, clap::Subcommand)]
pub enum DoctorCommand {
    /// Register a doctor
    Add(Add),

    /// List doctors
    List(List),

    /// Remove a doctor
    ///
    /// Pets assigned to the doctor are left without one.
    Remove(Remove),

    /// List the pets assigned to a doctor
    Pets(Pets),
}

impl DoctorCommand {
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        match self {
            Self::Add(command) => command.run(session),
            Self::List(command) => command.run(session),
            Self::Remove(command) => command.run(session),
            Self::Pets(command) => command.run(session),
        }
    }
}

#[derive(Debug, Parser)]
pub struct Add {
    /// The doctor's name
    #[arg(value_parser = parse_name)]
    name: Name,

    /// The type of pet the doctor specialises in (dog or cat)
    #[arg(value_parser = parse_choice::<Species>)]
    specialisation: Choice<Species>,
}

impl Add {
    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut registry = session.load()?;
        let doctor = Doctor::new(self.name, self.specialisation.spelling());
        let name = doctor.name().clone();

        registry.add_doctor(doctor)?;
        session.save(&registry)?;

        println!("{} Doctor {}", "Added".success(), name.record());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct List {
    /// Sort by name
    #[arg(long)]
    sorted: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl List {
    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let registry = session.load()?;
        let doctors = registry.list_doctors(session.sorted(self.sorted));
        output::doctors(&doctors, self.output)
    }
}

#[derive(Debug, Parser)]
pub struct Remove {
    /// The doctor's name
    name: String,
}

impl Remove {
    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut registry = session.load()?;
        let orphaned = registry.pets_of(&self.name)?.len();

        let doctor = registry.remove_doctor(&self.name)?;
        session.save(&registry)?;

        println!("{} Doctor {}", "Removed".success(), doctor.name().record());
        if orphaned > 0 {
            println!(
                "{}",
                format!("{} no longer assigned to a doctor", output::count(orphaned, "pet"))
                    .warning()
            );
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Pets {
    /// The doctor's name
    name: String,

    /// Sort by name
    #[arg(long)]
    sorted: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Pets {
    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let registry = session.load()?;
        let mut pets = registry.pets_of(&self.name)?;
        if session.sorted(self.sorted) {
            pets.sort_by(|a, b| a.name().cmp(b.name()));
        }

        let views: Vec<_> = pets.into_iter().map(|pet| registry.pet_view(pet)).collect();
        output::pets(&views, self.output, "No pets assigned")
    }
}
