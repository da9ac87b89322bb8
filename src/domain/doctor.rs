use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    choice::{Choice, Species},
    FieldError, Name,
};

/// How a pet without a doctor is shown and stored. No doctor may use this
/// name (in any casing).
pub const NO_DOCTOR: &str = "no doctor assigned";

/// Stable identifier of a doctor.
///
/// Pets refer to their doctor by this identifier rather than by name, so a
/// doctor's record can be rewritten (for example by an import) without
/// disturbing the pets assigned to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoctorId(Uuid);

impl DoctorId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A doctor working at the clinic.
#[derive(Debug, Clone, Serialize)]
pub struct Doctor {
    #[serde(skip)]
    id: DoctorId,
    name: Name,
    specialisation: Option<Choice<Species>>,
}

impl Doctor {
    /// Creates a doctor.
    ///
    /// If `specialisation` is not a recognised species the doctor is created
    /// without one, exactly as if [`Doctor::set_specialisation`] had rejected
    /// it.
    #[must_use]
    pub fn new(name: Name, specialisation: &str) -> Self {
        let mut doctor = Self {
            id: DoctorId::generate(),
            name,
            specialisation: None,
        };
        if let Err(e) = doctor.set_specialisation(specialisation) {
            tracing::debug!("doctor '{}' created without a specialisation: {e}", doctor.name);
        }
        doctor
    }

    /// The doctor's identifier.
    #[must_use]
    pub const fn id(&self) -> DoctorId {
        self.id
    }

    /// The doctor's name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Replaces the doctor's name.
    ///
    /// Names identify doctors within a registry, so this is only reachable
    /// for doctors that are not yet (or no longer) registered, or through
    /// the registry's own merge logic.
    pub fn set_name(&mut self, name: Name) {
        self.name = name;
    }

    /// The doctor's specialisation, as entered.
    #[must_use]
    pub const fn specialisation(&self) -> Option<&Choice<Species>> {
        self.specialisation.as_ref()
    }

    /// The species the doctor specialises in.
    #[must_use]
    pub fn species(&self) -> Option<Species> {
        self.specialisation.as_ref().map(Choice::value)
    }

    /// Sets the specialisation.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Choice`] if `specialisation` is not `dog` or
    /// `cat` (in any case). The previous value is kept.
    pub fn set_specialisation(&mut self, specialisation: &str) -> Result<(), FieldError> {
        self.specialisation = Some(Choice::parse(specialisation)?);
        Ok(())
    }

    /// Whether the doctor specialises in the given species.
    #[must_use]
    pub fn treats(&self, species: Species) -> bool {
        self.species() == Some(species)
    }
}

impl PartialEq for Doctor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.specialisation == other.specialisation
    }
}
