use std::path::{Path, PathBuf};

mod config;
mod doctor;
mod output;
mod pet;
mod prompt;
mod terminal;
mod transfer;

use anyhow::Context;
use clap::ArgAction;
use clinic::{
    domain::{choice::Variant, Choice},
    Config, DataFile, Name, Registry,
};
use config::ConfigCommand;
use doctor::DoctorCommand;
use pet::PetCommand;
use transfer::{Export, Import};

/// Parse a record name, rejecting blank input.
fn parse_name(s: &str) -> Result<Name, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Parse one of a closed set of values, keeping the spelling as typed.
fn parse_choice<T: Variant>(s: &str) -> Result<Choice<T>, String> {
    Choice::parse(s).map_err(|e| format!("{e}"))
}

/// Parse a weight in kilograms, which must be positive.
fn parse_weight(s: &str) -> Result<f64, String> {
    let weight: f64 = s.trim().parse().map_err(|e| format!("{e}"))?;
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err("weight must be greater than zero".to_string())
    }
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The file records are kept in.
    ///
    /// Defaults to the `data_file` setting of the configuration, or
    /// `HospitalManagement.txt`.
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// The path to the configuration file
    #[arg(short = 'C', long, default_value = Config::FILE_NAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let mut config = load_config(&self.config);
        if let Some(file) = self.file {
            config.set_data_file(file);
        }

        self.command.run(&Session::new(config), &self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load_config(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("no configuration at '{}'; using defaults", path.display());
        return Config::default();
    }
    Config::load(path).unwrap_or_else(|e| {
        tracing::debug!("{e}; using defaults");
        Config::default()
    })
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Register, list and remove doctors
    #[command(subcommand)]
    Doctor(DoctorCommand),

    /// Register, inspect, edit and assign pets
    #[command(subcommand)]
    Pet(PetCommand),

    /// Merge the records of another file into the data file
    ///
    /// Records whose names are already taken are merged or skipped,
    /// depending on `--on-conflict`.
    Import(Import),

    /// Write every record to another file
    Export(Export),

    /// Show or change the settings in the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    fn run(self, session: &Session, config_path: &Path) -> anyhow::Result<()> {
        match self {
            Self::Doctor(command) => command.run(session)?,
            Self::Pet(command) => command.run(session)?,
            Self::Import(command) => command.run(session)?,
            Self::Export(command) => command.run(session)?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

/// The data file and settings every command works with.
#[derive(Debug)]
pub struct Session {
    config: Config,
    file: DataFile,
}

impl Session {
    fn new(config: Config) -> Self {
        let file = DataFile::new(config.data_file());
        Self { config, file }
    }

    /// Loads the registry. A missing or blank data file is an empty
    /// registry.
    fn load(&self) -> anyhow::Result<Registry> {
        self.file
            .open_or_default()
            .with_context(|| format!("failed to load '{}'", self.file.path().display()))
    }

    fn save(&self, registry: &Registry) -> anyhow::Result<()> {
        self.file
            .save(registry)
            .with_context(|| format!("failed to save '{}'", self.file.path().display()))?;
        tracing::debug!("saved '{}'", self.file.path().display());
        Ok(())
    }

    const fn file(&self) -> &DataFile {
        &self.file
    }

    /// Whether listings should be sorted.
    const fn sorted(&self, requested: bool) -> bool {
        requested || self.config.sort_lists
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clinic::domain::{Size, Species};
    use test_case::test_case;

    use super::*;

    #[test_case("Rex", true)]
    #[test_case("  ", false)]
    #[test_case("", false)]
    fn names(input: &str, valid: bool) {
        assert_eq!(parse_name(input).is_ok(), valid);
    }

    #[test]
    fn choices_keep_spelling() {
        let size = parse_choice::<Size>("LARGE").unwrap();
        assert_eq!(size.value(), Size::Large);
        assert_eq!(size.spelling(), "LARGE");
        assert!(parse_choice::<Species>("parrot").is_err());
    }

    #[test_case("4.5", Some(4.5))]
    #[test_case("12", Some(12.0))]
    #[test_case("0", None)]
    #[test_case("-3", None)]
    #[test_case("heavy", None)]
    #[test_case("NaN", None)]
    fn weights(input: &str, expected: Option<f64>) {
        assert_eq!(parse_weight(input).ok(), expected);
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "vet", "pet", "list", "-f", "records.txt", "-vv", "--sorted",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.file, Some(PathBuf::from("records.txt")));
        assert_eq!(cli.config, PathBuf::from(Config::FILE_NAME));
    }

    #[test]
    fn config_command_uses_the_config_flag() {
        let cli = Cli::try_parse_from(["vet", "-C", "other.toml", "config", "set", "sort_lists", "true"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Set { ref key, .. }) if key == "sort_lists"
        ));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(&tmp.path().join("missing.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(Config::FILE_NAME);
        std::fs::write(&path, "not = [valid").unwrap();
        assert_eq!(load_config(&path), Config::default());
    }

    #[test]
    fn session_sorts_when_configured() {
        let mut config = Config::default();
        assert!(!Session::new(config.clone()).sorted(false));
        assert!(Session::new(config.clone()).sorted(true));
        config.sort_lists = true;
        assert!(Session::new(config).sorted(false));
    }

    #[test]
    fn session_round_trips_registry() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.set_data_file(tmp.path().join("clinic.txt"));
        let session = Session::new(config);

        let mut registry = session.load().unwrap();
        assert!(registry.is_empty());
        registry
            .add_doctor(clinic::Doctor::new(Name::try_from("Bob").unwrap(), "dog"))
            .unwrap();
        session.save(&registry).unwrap();

        assert_eq!(session.load().unwrap().doctor_count(), 1);
        assert!(!session.file().is_blank().unwrap());
    }
}
