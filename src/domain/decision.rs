//! Decisions the registry delegates to its caller.
//!
//! The core never talks to the user. Whenever a choice has to be made
//! (whether an imported record should overwrite an existing one, or whether
//! a pet may be moved to a different doctor) it asks an [`Arbiter`].

use std::fmt;

use crate::domain::{Doctor, Pet, PetView};

/// What to do with an incoming record whose name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Overwrite the existing record with the incoming values.
    Merge,
    /// Keep the existing record untouched.
    Skip,
}

/// A yes/no question about changing a pet's doctor.
#[derive(Debug, Clone, Copy)]
pub enum Question<'a> {
    /// The pet already has a doctor and would be moved away from them.
    Reassign {
        /// The pet being moved.
        pet: &'a Pet,
        /// The doctor the pet is currently assigned to.
        current: &'a Doctor,
        /// The doctor the pet would be assigned to, or `None` to unassign.
        proposed: Option<&'a Doctor>,
    },
    /// The doctor does not specialise in the pet's type.
    SpecialisationMismatch {
        /// The pet being assigned.
        pet: &'a Pet,
        /// The proposed doctor.
        doctor: &'a Doctor,
    },
}

impl fmt::Display for Question<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reassign {
                pet,
                current,
                proposed: Some(proposed),
            } => write!(
                f,
                "'{}' is currently assigned to Doctor {}. Change to Doctor {}?",
                pet.name(),
                current.name(),
                proposed.name()
            ),
            Self::Reassign {
                pet,
                current,
                proposed: None,
            } => write!(
                f,
                "'{}' is currently assigned to Doctor {}. Remove the assignment?",
                pet.name(),
                current.name()
            ),
            Self::SpecialisationMismatch { pet, doctor } => {
                let species = pet
                    .species()
                    .map_or_else(|| "this type of pet".to_string(), |s| format!("{}s", s.value()));
                write!(
                    f,
                    "Doctor {} does not specialise in {species}. Assign anyway?",
                    doctor.name()
                )
            }
        }
    }
}

/// Answers the questions raised while importing records or assigning pets.
pub trait Arbiter {
    /// Decides what happens to an incoming doctor whose name already exists.
    fn resolve_doctor(&mut self, existing: &Doctor, incoming: &Doctor) -> Resolution;

    /// Decides what happens to an incoming pet whose name already exists.
    fn resolve_pet(&mut self, existing: PetView<'_>, incoming: PetView<'_>) -> Resolution;

    /// Answers a yes/no question.
    fn confirm(&mut self, question: &Question<'_>) -> bool;
}

impl<A: Arbiter + ?Sized> Arbiter for &mut A {
    fn resolve_doctor(&mut self, existing: &Doctor, incoming: &Doctor) -> Resolution {
        (**self).resolve_doctor(existing, incoming)
    }

    fn resolve_pet(&mut self, existing: PetView<'_>, incoming: PetView<'_>) -> Resolution {
        (**self).resolve_pet(existing, incoming)
    }

    fn confirm(&mut self, question: &Question<'_>) -> bool {
        (**self).confirm(question)
    }
}

/// Merges every conflict and agrees to every question.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysMerge;

impl Arbiter for AlwaysMerge {
    fn resolve_doctor(&mut self, _: &Doctor, _: &Doctor) -> Resolution {
        Resolution::Merge
    }

    fn resolve_pet(&mut self, _: PetView<'_>, _: PetView<'_>) -> Resolution {
        Resolution::Merge
    }

    fn confirm(&mut self, _: &Question<'_>) -> bool {
        true
    }
}

/// Skips every conflict and declines every question.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSkip;

impl Arbiter for AlwaysSkip {
    fn resolve_doctor(&mut self, _: &Doctor, _: &Doctor) -> Resolution {
        Resolution::Skip
    }

    fn resolve_pet(&mut self, _: PetView<'_>, _: PetView<'_>) -> Resolution {
        Resolution::Skip
    }

    fn confirm(&mut self, _: &Question<'_>) -> bool {
        false
    }
}

/// Asks whatever is needed before moving `pet` from `current` to `proposed`.
///
/// - Moving a pet away from a doctor it is already assigned to needs a
///   [`Question::Reassign`] confirmation.
/// - Assigning a doctor whose specialisation is not the pet's type needs a
///   [`Question::SpecialisationMismatch`] confirmation.
///
/// Returns `true` if the change may go ahead. Questions stop at the first
/// refusal.
pub fn confirm_assignment<A: Arbiter + ?Sized>(
    arbiter: &mut A,
    pet: &Pet,
    current: Option<&Doctor>,
    proposed: Option<&Doctor>,
) -> bool {
    if let Some(current) = current {
        let unchanged = proposed.is_some_and(|proposed| proposed.id() == current.id());
        if !unchanged
            && !arbiter.confirm(&Question::Reassign {
                pet,
                current,
                proposed,
            })
        {
            return false;
        }
    }

    if let Some(doctor) = proposed {
        let mismatch = match (doctor.species(), pet.species()) {
            (Some(specialisation), Some(species)) => specialisation != species.value(),
            _ => false,
        };
        if mismatch && !arbiter.confirm(&Question::SpecialisationMismatch { pet, doctor }) {
            return false;
        }
    }

    true
}
