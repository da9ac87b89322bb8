use crate::domain::{
    choice::{Choice, Size, Species},
    DoctorId, FieldError, Name,
};

/// A pet registered with the clinic.
///
/// Enumerated fields start unset when constructed from an invalid value, and
/// every setter leaves the field untouched if it rejects its input.
#[derive(Debug, Clone)]
pub struct Pet {
    name: Name,
    size: Option<Choice<Size>>,
    species: Option<Choice<Species>>,
    age: u32,
    weight: Option<f64>,
    doctor: Option<DoctorId>,
}

impl Pet {
    /// Creates an unassigned pet.
    ///
    /// Invalid values are dropped in the same way the setters reject them:
    /// `size` and `species` stay unset, a negative `age` stays at zero, and a
    /// non-positive `weight` stays unset.
    #[must_use]
    pub fn new(name: Name, size: &str, species: &str, age: i64, weight: f64) -> Self {
        let mut pet = Self {
            name,
            size: None,
            species: None,
            age: 0,
            weight: None,
            doctor: None,
        };
        pet.apply(size, species, age, weight);
        pet
    }

    /// Applies each value through its setter, ignoring rejected ones.
    pub(crate) fn apply(&mut self, size: &str, species: &str, age: i64, weight: f64) {
        let results = [
            self.set_size(size),
            self.set_species(species),
            self.set_age(age),
            self.set_weight(weight),
        ];
        for error in results.into_iter().filter_map(Result::err) {
            tracing::debug!("ignoring value for pet '{}': {error}", self.name);
        }
    }

    /// The pet's name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Replaces the pet's name.
    pub fn set_name(&mut self, name: Name) {
        self.name = name;
    }

    /// The pet's size, as entered.
    #[must_use]
    pub const fn size(&self) -> Option<&Choice<Size>> {
        self.size.as_ref()
    }

    /// Sets the size.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Choice`] unless `size` is `small`, `medium` or
    /// `large` (in any case).
    pub fn set_size(&mut self, size: &str) -> Result<(), FieldError> {
        self.size = Some(Choice::parse(size)?);
        Ok(())
    }

    /// The pet's type, as entered.
    #[must_use]
    pub const fn species(&self) -> Option<&Choice<Species>> {
        self.species.as_ref()
    }

    /// Sets the type.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Choice`] unless `species` is `dog` or `cat` (in
    /// any case).
    pub fn set_species(&mut self, species: &str) -> Result<(), FieldError> {
        self.species = Some(Choice::parse(species)?);
        Ok(())
    }

    /// Age in years.
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Sets the age in years.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidAge`] for negative (or absurdly large)
    /// ages.
    pub fn set_age(&mut self, age: i64) -> Result<(), FieldError> {
        self.age = u32::try_from(age).map_err(|_| FieldError::InvalidAge(age))?;
        Ok(())
    }

    /// Weight in kilograms, if one has been recorded.
    #[must_use]
    pub const fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// Sets the weight in kilograms.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidWeight`] unless `weight` is finite and
    /// greater than zero.
    pub fn set_weight(&mut self, weight: f64) -> Result<(), FieldError> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(FieldError::InvalidWeight(weight));
        }
        self.weight = Some(weight);
        Ok(())
    }

    /// The identifier of the assigned doctor, if any.
    #[must_use]
    pub const fn doctor(&self) -> Option<DoctorId> {
        self.doctor
    }

    /// Whether the pet has an assigned doctor.
    #[must_use]
    pub const fn has_doctor(&self) -> bool {
        self.doctor.is_some()
    }

    /// Links the pet to a doctor. Only the registry may do this, since it is
    /// responsible for keeping links pointing at registered doctors.
    pub(crate) fn set_doctor(&mut self, doctor: Option<DoctorId>) {
        self.doctor = doctor;
    }

    /// The upper healthy weight in kilograms for the pet's type and size.
    ///
    /// | type | small | medium | large |
    /// |------|-------|--------|-------|
    /// | cat  | 4 kg  | 6 kg   | 8 kg  |
    /// | dog  | 6 kg  | 9 kg   | 12 kg |
    ///
    /// `None` if the type or size is unset.
    #[must_use]
    pub fn weight_limit(&self) -> Option<f64> {
        let (Some(species), Some(size)) = (&self.species, &self.size) else {
            return None;
        };
        Some(limit_for(species.value(), size.value()))
    }

    /// Whether the pet is heavier than its [weight limit](Self::weight_limit).
    ///
    /// A pet with no recorded type, size or weight is never overweight.
    #[must_use]
    pub fn is_overweight(&self) -> bool {
        match (self.weight, self.weight_limit()) {
            (Some(weight), Some(limit)) => weight > limit,
            _ => false,
        }
    }

    /// Compares every field except the doctor link.
    #[must_use]
    pub fn same_details(&self, other: &Self) -> bool {
        self.name == other.name
            && self.size == other.size
            && self.species == other.species
            && self.age == other.age
            && self.weight == other.weight
    }
}

impl PartialEq for Pet {
    fn eq(&self, other: &Self) -> bool {
        self.same_details(other) && self.doctor == other.doctor
    }
}

const fn limit_for(species: Species, size: Size) -> f64 {
    match (species, size) {
        (Species::Cat, Size::Small) => 4.0,
        (Species::Cat, Size::Medium) => 6.0,
        (Species::Cat, Size::Large) => 8.0,
        (Species::Dog, Size::Small) => 6.0,
        (Species::Dog, Size::Medium) => 9.0,
        (Species::Dog, Size::Large) => 12.0,
    }
}

/// A partial update to a pet. Fields left as `None` are not changed.
#[derive(Debug, Clone, Default)]
pub struct PetEdit {
    /// New size.
    pub size: Option<String>,
    /// New type.
    pub species: Option<String>,
    /// New age in years.
    pub age: Option<i64>,
    /// New weight in kilograms.
    pub weight: Option<f64>,
}

impl PetEdit {
    /// Applies the edit to a copy of `pet`, returning the copy only if every
    /// value was accepted.
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldError`] encountered; `pet` itself is never
    /// modified.
    pub fn applied_to(&self, pet: &Pet) -> Result<Pet, FieldError> {
        let mut updated = pet.clone();
        if let Some(size) = &self.size {
            updated.set_size(size)?;
        }
        if let Some(species) = &self.species {
            updated.set_species(species)?;
        }
        if let Some(age) = self.age {
            updated.set_age(age)?;
        }
        if let Some(weight) = self.weight {
            updated.set_weight(weight)?;
        }
        Ok(updated)
    }

    /// Whether the edit changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.is_none() && self.species.is_none() && self.age.is_none() && self.weight.is_none()
    }
}
