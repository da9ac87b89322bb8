use clap::Parser;
use clinic::{
    domain::{confirm_assignment, Choice, Size, Species},
    Arbiter, Name, Pet, PetEdit, Registry, RegistryError,
};
use tracing::instrument;

use crate::cli::{
    output::{self, OutputFormat},
    parse_choice, parse_name, parse_weight,
    prompt::Prompt,
    terminal::Colorize,
    Session,
};

#[derive(Debug, clap::Subcommand)]
pub enum PetCommand {
    /// Register a pet
    Add(Add),

    /// Show a pet's details and whether it is overweight
    Show(Show),

    /// Change some of a pet's details
    Edit(Edit),

    /// List pets
    List(List),

    /// Remove a pet
    Remove(Remove),

    /// Assign a pet to a doctor
    ///
    /// Moving a pet away from its current doctor, or to a doctor who does
    /// not specialise in its type, must be confirmed.
    Assign(Assign),

    /// Remove a pet's doctor
    Unassign(Unassign),
}

impl PetCommand {
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        match self {
            Self::Add(command) => command.run(session),
            Self::Show(command) => command.run(session),
            Self::Edit(command) => command.run(session),
            Self::List(command) => command.run(session),
            Self::Remove(command) => command.run(session),
            Self::Assign(command) => command.run(session),
            Self::Unassign(command) => command.run(session),
        }
    }
}

/// Moves a pet to `doctor` (or to no doctor), asking `arbiter` first.
///
/// Returns whether the change was made.
fn reassign(
    registry: &mut Registry,
    pet_name: &str,
    doctor_name: Option<&str>,
    arbiter: &mut dyn Arbiter,
) -> Result<bool, RegistryError> {
    let pet = registry
        .find_pet(pet_name)
        .ok_or_else(|| RegistryError::PetNotFound(pet_name.to_string()))?;
    let proposed = doctor_name
        .map(|name| {
            registry
                .find_doctor(name)
                .ok_or_else(|| RegistryError::DoctorNotFound(name.to_string()))
        })
        .transpose()?;

    if !confirm_assignment(arbiter, pet, registry.doctor_of(pet), proposed) {
        tracing::debug!("assignment of '{pet_name}' declined");
        return Ok(false);
    }

    match doctor_name {
        Some(doctor_name) => registry.assign_doctor(pet_name, doctor_name)?,
        None => registry.unassign_doctor(pet_name)?,
    }
    Ok(true)
}

fn report_assignment(registry: &Registry, pet_name: &str) {
    let Some(pet) = registry.find_pet(pet_name) else {
        return;
    };
    match registry.doctor_of(pet) {
        Some(doctor) => println!(
            "{} {} to Doctor {}",
            "Assigned".success(),
            pet.name().record(),
            doctor.name().record()
        ),
        None => println!(
            "{} {} is not assigned to a doctor",
            "Updated".success(),
            pet.name().record()
        ),
    }
}

#[derive(Debug, Parser)]
pub struct Add {
    /// The pet's name
    #[arg(value_parser = parse_name)]
    name: Name,

    /// small, medium or large
    #[arg(long, value_parser = parse_choice::<Size>)]
    size: Choice<Size>,

    /// dog or cat
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_choice::<Species>)]
    species: Choice<Species>,

    /// Age in years
    #[arg(long)]
    age: u32,

    /// Weight in kilograms
    #[arg(long, value_parser = parse_weight)]
    weight: f64,
}

impl Add {
    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut registry = session.load()?;
        let pet = Pet::new(
            self.name,
            self.size.spelling(),
            self.species.spelling(),
            i64::from(self.age),
            self.weight,
        );
        let view = output::pet_details(registry.pet_view(&pet));
        let name = pet.name().clone();

        registry.add_pet(pet)?;
        session.save(&registry)?;

        println!("{} {}", "Added".success(), name.record());
        print!("{view}");
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Show {
    /// The pet's name
    name: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Show {
    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let registry = session.load()?;
        let pet = registry
            .find_pet(&self.name)
            .ok_or_else(|| RegistryError::PetNotFound(self.name.clone()))?;
        let view = registry.pet_view(pet);

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
            OutputFormat::Table => {
                print!("{}", output::pet_details(view));
                println!("\n{}", output::weight_assessment(view));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Edit {
    /// The pet's name
    name: String,

    /// small, medium or large
    #[arg(long, value_parser = parse_choice::<Size>)]
    size: Option<Choice<Size>>,

    /// dog or cat
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_choice::<Species>)]
    species: Option<Choice<Species>>,

    /// Age in years
    #[arg(long)]
    age: Option<u32>,

    /// Weight in kilograms
    #[arg(long, value_parser = parse_weight)]
    weight: Option<f64>,

    /// Assign the pet to this doctor
    #[arg(long)]
    doctor: Option<String>,

    /// Confirm any reassignment without asking
    #[arg(short, long)]
    yes: bool,
}

impl Edit {
    fn edit(&self) -> PetEdit {
        PetEdit {
            size: self.size.as_ref().map(|size| size.spelling().to_string()),
            species: self
                .species
                .as_ref()
                .map(|species| species.spelling().to_string()),
            age: self.age.map(i64::from),
            weight: self.weight,
        }
    }

    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let edit = self.edit();
        if edit.is_empty() && self.doctor.is_none() {
            anyhow::bail!("nothing to change; pass at least one of --size, --type, --age, --weight or --doctor");
        }

        let mut registry = session.load()?;
        let mut changed = false;

        if !edit.is_empty() {
            registry.edit_pet(&self.name, &edit)?;
            changed = true;
        }

        if let Some(doctor) = &self.doctor {
            let mut prompt = Prompt::new(self.yes);
            if reassign(&mut registry, &self.name, Some(doctor), &mut prompt)? {
                changed = true;
            } else {
                println!("{}", "The pet's doctor was not changed".warning());
            }
        }

        if changed {
            session.save(&registry)?;
            let pet = registry
                .find_pet(&self.name)
                .ok_or_else(|| RegistryError::PetNotFound(self.name.clone()))?;
            println!("{} {}", "Updated".success(), pet.name().record());
            print!("{}", output::pet_details(registry.pet_view(pet)));
        }
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
        let views: Vec<_> = registry
            .list_pets(session.sorted(self.sorted))
            .into_iter()
            .map(|pet| registry.pet_view(pet))
            .collect();
        output::pets(&views, self.output, "No pets registered")
    }
}

#[derive(Debug, Parser)]
pub struct Remove {
    /// The pet's name
    name: String,
}

impl Remove {
    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut registry = session.load()?;
        let pet = registry.remove_pet(&self.name)?;
        session.save(&registry)?;
        println!("{} {}", "Removed".success(), pet.name().record());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Assign {
    /// The pet's name
    pet: String,

    /// The doctor's name
    doctor: String,

    /// Confirm without asking
    #[arg(short, long)]
    yes: bool,
}

impl Assign {
    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut registry = session.load()?;
        let mut prompt = Prompt::new(self.yes);

        if !reassign(&mut registry, &self.pet, Some(&self.doctor), &mut prompt)? {
            println!("{}", "Cancelled".warning());
            return Ok(());
        }
        session.save(&registry)?;
        report_assignment(&registry, &self.pet);
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Unassign {
    /// The pet's name
    pet: String,

    /// Confirm without asking
    #[arg(short, long)]
    yes: bool,
}

impl Unassign {
    #[instrument]
    fn run(self, session: &Session) -> anyhow::Result<()> {
        let mut registry = session.load()?;
        let mut prompt = Prompt::new(self.yes);

        if !reassign(&mut registry, &self.pet, None, &mut prompt)? {
            println!("{}", "Cancelled".warning());
            return Ok(());
        }
        session.save(&registry)?;
        report_assignment(&registry, &self.pet);
        Ok(())
    }
}
