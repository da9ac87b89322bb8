//! The in-memory store of doctors and pets.
//!
//! The [`Registry`] knows nothing about files or users. It owns both
//! collections and keeps them consistent:
//!
//! - names are unique (ignoring case) among doctors, and among pets
//! - a pet's doctor link always points at a registered doctor
//!
//! Records are kept in growable vectors. The order of unsorted listings is
//! storage order, which callers should treat as unspecified.

use serde::{Serialize, Serializer};
use tracing::instrument;

use crate::domain::{Doctor, DoctorId, FieldError, Name, Pet, PetEdit, NO_DOCTOR};

/// Owner of every doctor and pet record.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    doctors: Vec<Doctor>,
    pets: Vec<Pet>,
}

/// Errors returned by registry operations.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum RegistryError {
    /// A doctor with the same name (ignoring case) is already registered.
    #[error("there is already a doctor named '{0}'")]
    DuplicateDoctor(String),

    /// A pet with the same name (ignoring case) is already registered.
    #[error("there is already a pet named '{0}'")]
    DuplicatePet(String),

    /// No doctor has the given name.
    #[error("there are no doctors named '{0}'")]
    DoctorNotFound(String),

    /// No pet has the given name.
    #[error("there are no pets named '{0}'")]
    PetNotFound(String),

    /// A pet is linked to a doctor that is not registered.
    #[error("no registered doctor has id {0}")]
    UnknownDoctor(DoctorId),

    /// The name is reserved for pets that have no doctor.
    #[error("'{0}' is reserved and cannot be used as a doctor's name")]
    ReservedName(String),

    /// A field was given an illegal value.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Registry {
    /// Number of registered doctors.
    #[must_use]
    pub fn doctor_count(&self) -> usize {
        self.doctors.len()
    }

    /// Number of registered pets.
    #[must_use]
    pub fn pet_count(&self) -> usize {
        self.pets.len()
    }

    /// Whether the registry holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty() && self.pets.is_empty()
    }

    /// Registers a doctor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateDoctor`] if the name is taken, or
    /// [`RegistryError::ReservedName`] if it reads as [`NO_DOCTOR`]. The
    /// registry is left unchanged.
    #[instrument(skip_all, fields(doctor = %doctor.name()))]
    pub fn add_doctor(&mut self, doctor: Doctor) -> Result<(), RegistryError> {
        if doctor.name().matches(NO_DOCTOR) {
            return Err(RegistryError::ReservedName(doctor.name().to_string()));
        }
        if let Some(existing) = self.find_doctor(doctor.name().as_str()) {
            return Err(RegistryError::DuplicateDoctor(existing.name().to_string()));
        }
        tracing::info!("added doctor");
        self.doctors.push(doctor);
        Ok(())
    }

    /// Registers a pet.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicatePet`] if the name is taken, or
    /// [`RegistryError::UnknownDoctor`] if the pet is linked to a doctor that
    /// is not registered. The registry is left unchanged.
    #[instrument(skip_all, fields(pet = %pet.name()))]
    pub fn add_pet(&mut self, pet: Pet) -> Result<(), RegistryError> {
        if let Some(existing) = self.find_pet(pet.name().as_str()) {
            return Err(RegistryError::DuplicatePet(existing.name().to_string()));
        }
        if let Some(id) = pet.doctor() {
            if self.doctor(id).is_none() {
                return Err(RegistryError::UnknownDoctor(id));
            }
        }
        tracing::info!("added pet");
        self.pets.push(pet);
        Ok(())
    }

    /// Removes a doctor, unassigning them from every pet in the same step.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DoctorNotFound`] if no doctor has that name.
    #[instrument(skip(self))]
    pub fn remove_doctor(&mut self, name: &str) -> Result<Doctor, RegistryError> {
        let index = self
            .doctor_index(name)
            .ok_or_else(|| RegistryError::DoctorNotFound(name.to_string()))?;
        let doctor = self.doctors.remove(index);

        let mut unassigned = 0;
        for pet in &mut self.pets {
            if pet.doctor() == Some(doctor.id()) {
                pet.set_doctor(None);
                unassigned += 1;
            }
        }

        tracing::info!(unassigned, "removed doctor {}", doctor.name());
        Ok(doctor)
    }

    /// Removes a pet.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PetNotFound`] if no pet has that name.
    #[instrument(skip(self))]
    pub fn remove_pet(&mut self, name: &str) -> Result<Pet, RegistryError> {
        let index = self
            .pet_index(name)
            .ok_or_else(|| RegistryError::PetNotFound(name.to_string()))?;
        let pet = self.pets.remove(index);
        tracing::info!("removed pet {}", pet.name());
        Ok(pet)
    }

    /// Finds a doctor by name, ignoring case.
    #[must_use]
    pub fn find_doctor(&self, name: &str) -> Option<&Doctor> {
        self.doctor_index(name).map(|index| &self.doctors[index])
    }

    /// Finds a pet by name, ignoring case.
    #[must_use]
    pub fn find_pet(&self, name: &str) -> Option<&Pet> {
        self.pet_index(name).map(|index| &self.pets[index])
    }

    /// Resolves a doctor link.
    #[must_use]
    pub fn doctor(&self, id: DoctorId) -> Option<&Doctor> {
        self.doctors.iter().find(|doctor| doctor.id() == id)
    }

    /// The doctor a pet is assigned to.
    #[must_use]
    pub fn doctor_of(&self, pet: &Pet) -> Option<&Doctor> {
        pet.doctor().and_then(|id| self.doctor(id))
    }

    /// Joins a pet with its resolved doctor.
    #[must_use]
    pub fn pet_view<'a>(&'a self, pet: &'a Pet) -> PetView<'a> {
        PetView {
            pet,
            doctor: self.doctor_of(pet),
        }
    }

    /// Assigns a pet to a doctor.
    ///
    /// The assignment is unconditional: any confirmation (replacing an
    /// existing doctor, a specialisation mismatch) must already have been
    /// obtained, see [`confirm_assignment`](crate::domain::confirm_assignment).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PetNotFound`] or
    /// [`RegistryError::DoctorNotFound`] if either name is unknown.
    #[instrument(skip(self))]
    pub fn assign_doctor(&mut self, pet_name: &str, doctor_name: &str) -> Result<(), RegistryError> {
        let doctor = self
            .find_doctor(doctor_name)
            .map(Doctor::id)
            .ok_or_else(|| RegistryError::DoctorNotFound(doctor_name.to_string()))?;
        let pet = self
            .pet_mut(pet_name)
            .ok_or_else(|| RegistryError::PetNotFound(pet_name.to_string()))?;
        pet.set_doctor(Some(doctor));
        tracing::info!("assigned pet to doctor");
        Ok(())
    }

    /// Clears a pet's doctor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PetNotFound`] if no pet has that name.
    pub fn unassign_doctor(&mut self, pet_name: &str) -> Result<(), RegistryError> {
        let pet = self
            .pet_mut(pet_name)
            .ok_or_else(|| RegistryError::PetNotFound(pet_name.to_string()))?;
        pet.set_doctor(None);
        Ok(())
    }

    /// Applies a partial edit to a pet.
    ///
    /// Either every field in the edit is applied, or (on error) none is.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PetNotFound`] if no pet has that name, or
    /// [`RegistryError::Field`] if any value is illegal.
    #[instrument(skip(self))]
    pub fn edit_pet(&mut self, name: &str, edit: &PetEdit) -> Result<(), RegistryError> {
        let pet = self
            .pet_mut(name)
            .ok_or_else(|| RegistryError::PetNotFound(name.to_string()))?;
        *pet = edit.applied_to(pet)?;
        tracing::info!("updated pet");
        Ok(())
    }

    /// All doctors, optionally sorted by name (ignoring case).
    #[must_use]
    pub fn list_doctors(&self, sorted: bool) -> Vec<&Doctor> {
        let mut doctors: Vec<_> = self.doctors.iter().collect();
        if sorted {
            doctors.sort_by(|a, b| a.name().cmp(b.name()));
        }
        doctors
    }

    /// All pets, optionally sorted by name (ignoring case).
    #[must_use]
    pub fn list_pets(&self, sorted: bool) -> Vec<&Pet> {
        let mut pets: Vec<_> = self.pets.iter().collect();
        if sorted {
            pets.sort_by(|a, b| a.name().cmp(b.name()));
        }
        pets
    }

    /// The pets assigned to a doctor, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DoctorNotFound`] if no doctor has that name.
    pub fn pets_of(&self, doctor_name: &str) -> Result<Vec<&Pet>, RegistryError> {
        let doctor = self
            .find_doctor(doctor_name)
            .ok_or_else(|| RegistryError::DoctorNotFound(doctor_name.to_string()))?;
        Ok(self
            .pets
            .iter()
            .filter(|pet| pet.doctor() == Some(doctor.id()))
            .collect())
    }

    /// Pushes a pet that the caller has already checked against the
    /// registry's invariants.
    pub(crate) fn insert_pet_unchecked(&mut self, pet: Pet) {
        debug_assert!(self.find_pet(pet.name().as_str()).is_none());
        self.pets.push(pet);
    }

    pub(crate) fn doctor_mut(&mut self, name: &str) -> Option<&mut Doctor> {
        let index = self.doctor_index(name)?;
        Some(&mut self.doctors[index])
    }

    pub(crate) fn pet_mut(&mut self, name: &str) -> Option<&mut Pet> {
        let index = self.pet_index(name)?;
        Some(&mut self.pets[index])
    }
}

impl Registry {
    fn doctor_index(&self, name: &str) -> Option<usize> {
        self.doctors
            .iter()
            .position(|doctor| doctor.name().matches(name))
    }

    fn pet_index(&self, name: &str) -> Option<usize> {
        self.pets.iter().position(|pet| pet.name().matches(name))
    }
}

/// A pet together with the doctor it is assigned to.
///
/// Views compare by content: two views are equal when the pets' details are
/// equal and their doctors have the same name and specialisation. This makes
/// them suitable for comparing pets held by different registries.
#[derive(Debug, Clone, Copy)]
pub struct PetView<'a> {
    /// The pet.
    pub pet: &'a Pet,
    /// The pet's doctor, if assigned.
    pub doctor: Option<&'a Doctor>,
}

impl PetView<'_> {
    /// The assigned doctor's name.
    #[must_use]
    pub fn doctor_name(&self) -> Option<&Name> {
        self.doctor.map(Doctor::name)
    }
}

impl PartialEq for PetView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.pet.same_details(other.pet) && self.doctor == other.doctor
    }
}

impl Serialize for PetView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let pet = self.pet;
        let mut state = serializer.serialize_struct("Pet", 7)?;
        state.serialize_field("name", pet.name())?;
        state.serialize_field("size", &pet.size())?;
        state.serialize_field("type", &pet.species())?;
        state.serialize_field("age", &pet.age())?;
        state.serialize_field("weight", &pet.weight())?;
        state.serialize_field("doctor", &self.doctor_name())?;
        state.serialize_field("overweight", &pet.is_overweight())?;
        state.end()
    }
}
