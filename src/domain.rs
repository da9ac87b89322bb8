//! Domain models for the clinic.
//!
//! This module contains the record types (doctors and pets), the registry
//! that owns them, and the configuration of the command-line tool.

pub mod choice;
pub use choice::{Choice, InvalidChoice, Size, Species};

mod config;
pub use config::Config;

mod decision;
pub use decision::{confirm_assignment, AlwaysMerge, AlwaysSkip, Arbiter, Question, Resolution};

mod doctor;
pub use doctor::{Doctor, DoctorId, NO_DOCTOR};

mod field;
pub use field::FieldError;

mod name;
pub use name::{EmptyNameError, Name};

mod pet;
pub use pet::{Pet, PetEdit};

pub mod registry;
pub use registry::{PetView, Registry, RegistryError};
