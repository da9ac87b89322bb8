//! Veterinary Clinic Records
//!
//! Doctors and pets are kept in an in-memory [`Registry`] that enforces
//! unique names and valid doctor assignments. Registries are persisted as
//! line-oriented text files through [`DataFile`].

pub mod domain;
pub use domain::{
    AlwaysMerge, AlwaysSkip, Arbiter, Config, Doctor, DoctorId, Name, Pet, PetEdit, PetView,
    Question, Registry, RegistryError, Resolution, NO_DOCTOR,
};

/// Reading and writing registries as text.
pub mod storage;
pub use storage::{DataFile, ImportSummary, LoadError, MalformedRecord};
