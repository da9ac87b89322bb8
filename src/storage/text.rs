//! The plain-text snapshot format.
//!
//! A snapshot holds every pet, then every doctor, one `key value` pair per
//! line:
//!
//! ```text
//! Pets
//! type cat
//! size small
//! name Whiskers
//! weight 3.5
//! age 2
//! doctor Bob
//! Doctors
//! name Bob
//! specialisation cat
//! ```
//!
//! Values are written exactly as stored, with no escaping. Pets without a
//! doctor are written with the `no doctor assigned` sentinel.

use std::{
    fmt,
    io,
    iter::{Enumerate, Peekable},
    str::Lines,
};

use tracing::instrument;

use crate::domain::{
    choice::Variant, confirm_assignment, Arbiter, Choice, Doctor, Name, Pet, Registry, Resolution,
    NO_DOCTOR,
};

/// Header line that opens the pets section.
pub const PETS_HEADER: &str = "Pets";
/// Header line that opens the doctors section.
pub const DOCTORS_HEADER: &str = "Doctors";
/// Value of the `doctor` field for pets without a doctor.

const TYPE: &str = "type";
const SIZE: &str = "size";
const NAME: &str = "name";
const WEIGHT: &str = "weight";
const AGE: &str = "age";
const DOCTOR: &str = "doctor";
const SPECIALISATION: &str = "specialisation";

/// Renders a registry in the snapshot format.
///
/// Records are written in storage order. Every line, including the last, is
/// terminated by `\n`.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a>(pub &'a Registry);

impl fmt::Display for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.0;

        writeln!(f, "{PETS_HEADER}")?;
        for pet in registry.list_pets(false) {
            let doctor = registry
                .doctor_of(pet)
                .map_or(NO_DOCTOR, |doctor| doctor.name().as_str());
            writeln!(f, "{TYPE} {}", spelling(pet.species()))?;
            writeln!(f, "{SIZE} {}", spelling(pet.size()))?;
            writeln!(f, "{NAME} {}", pet.name())?;
            writeln!(f, "{WEIGHT} {}", Weight(pet.weight()))?;
            writeln!(f, "{AGE} {}", pet.age())?;
            writeln!(f, "{DOCTOR} {doctor}")?;
        }

        writeln!(f, "{DOCTORS_HEADER}")?;
        for doctor in registry.list_doctors(false) {
            writeln!(f, "{NAME} {}", doctor.name())?;
            writeln!(f, "{SPECIALISATION} {}", spelling(doctor.specialisation()))?;
        }

        Ok(())
    }
}

fn spelling<T: Variant>(choice: Option<&Choice<T>>) -> &str {
    choice.map_or("", Choice::spelling)
}

/// Weights always carry a fractional part (`8.0`, not `8`). Unset weights are
/// written as `0.0`, which reads back as unset.
struct Weight(Option<f64>);

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("0.0"),
            Some(weight) if weight.fract() == 0.0 && weight.abs() < 1e15 => {
                write!(f, "{weight:.1}")
            }
            Some(weight) => write!(f, "{weight}"),
        }
    }
}

/// Renders a registry snapshot to a string.
#[must_use]
pub fn export(registry: &Registry) -> String {
    Snapshot(registry).to_string()
}

/// Writes a registry snapshot.
///
/// # Errors
///
/// Returns any error raised by the writer.
#[instrument(skip_all)]
pub fn write<W: io::Write>(registry: &Registry, writer: &mut W) -> io::Result<()> {
    write!(writer, "{}", Snapshot(registry))?;
    tracing::debug!(
        pets = registry.pet_count(),
        doctors = registry.doctor_count(),
        "wrote snapshot"
    );
    Ok(())
}

/// Counts of records taken from an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Doctors inserted or merged.
    pub doctors_imported: usize,
    /// Pets inserted or merged.
    pub pets_imported: usize,
}

impl ImportSummary {
    /// Whether nothing was imported.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.doctors_imported == 0 && self.pets_imported == 0
    }
}

/// A record in the snapshot could not be read.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("malformed record at line {line}: {reason}")]
pub struct MalformedRecord {
    /// The 1-based line number of the offending line.
    pub line: usize,
    /// What was wrong with it.
    pub reason: Reason,
}

impl MalformedRecord {
    const fn new(line: usize, reason: Reason) -> Self {
        Self { line, reason }
    }
}

/// Why a record could not be read.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum Reason {
    /// The input ended part-way through a record.
    #[error("expected a '{0}' line but the input ended")]
    Truncated(&'static str),

    /// A line in the middle of a record does not start with the expected key.
    #[error("expected a '{expected}' line, found '{found}'")]
    UnexpectedKey {
        /// The key that should have come next.
        expected: &'static str,
        /// The line that was found instead.
        found: String,
    },

    /// The `name` field is blank.
    #[error("the name is empty")]
    EmptyName,

    /// The `age` field is not an integer.
    #[error("'{0}' is not a whole number")]
    NotAnInteger(String),

    /// The `weight` field is not a number.
    #[error("'{0}' is not a number")]
    NotANumber(String),
}

/// Reads a snapshot and merges it into `registry`.
///
/// The doctors section is read and applied first, so that pets can refer to
/// doctors from the same snapshot. Pets are then read and applied one record
/// at a time. Records are applied as soon as they are read: if a malformed
/// record stops the import, everything applied before it stays in the
/// registry.
///
/// For each record:
///
/// - if no record of that kind has the same name, it is inserted;
/// - otherwise the arbiter decides whether to merge it into the existing
///   record or skip it. A merged pet only changes doctor if the arbiter
///   confirms the reassignment (see [`confirm_assignment`]).
///
/// Pets referring to an unknown doctor are imported unassigned. Doctors
/// using a reserved name are skipped.
///
/// Returns the number of doctors and pets inserted or merged.
///
/// # Errors
///
/// Returns [`MalformedRecord`] if a record is truncated, has its fields out
/// of order, has an empty name, or has a non-numeric age or weight.
#[instrument(skip_all)]
pub fn import<A: Arbiter + ?Sized>(
    text: &str,
    registry: &mut Registry,
    arbiter: &mut A,
) -> Result<ImportSummary, MalformedRecord> {
    let mut summary = ImportSummary::default();
    import_doctors(text, registry, arbiter, &mut summary)?;
    import_pets(text, registry, arbiter, &mut summary)?;

    tracing::info!(
        doctors = summary.doctors_imported,
        pets = summary.pets_imported,
        "imported snapshot"
    );
    Ok(summary)
}

fn import_doctors<A: Arbiter + ?Sized>(
    text: &str,
    registry: &mut Registry,
    arbiter: &mut A,
    summary: &mut ImportSummary,
) -> Result<(), MalformedRecord> {
    let Some(mut cursor) = Cursor::after_header(text, DOCTORS_HEADER) else {
        tracing::debug!("no '{DOCTORS_HEADER}' section");
        return Ok(());
    };
    while let Some(entry) = cursor.next_doctor()? {
        if apply_doctor(registry, arbiter, &entry) {
            summary.doctors_imported += 1;
        }
    }
    Ok(())
}

fn import_pets<A: Arbiter + ?Sized>(
    text: &str,
    registry: &mut Registry,
    arbiter: &mut A,
    summary: &mut ImportSummary,
) -> Result<(), MalformedRecord> {
    let Some(mut cursor) = Cursor::after_header(text, PETS_HEADER) else {
        tracing::debug!("no '{PETS_HEADER}' section");
        return Ok(());
    };
    while let Some(entry) = cursor.next_pet()? {
        if apply_pet(registry, arbiter, &entry) {
            summary.pets_imported += 1;
        }
    }
    Ok(())
}

struct DoctorEntry<'a> {
    name: Name,
    specialisation: &'a str,
}

struct PetEntry<'a> {
    name: Name,
    size: &'a str,
    species: &'a str,
    age: i64,
    weight: f64,
    doctor: Option<&'a str>,
}

/// Walks the lines of one section of a snapshot.
struct Cursor<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
    /// 1-based number of the last line consumed.
    line: usize,
}

impl<'a> Cursor<'a> {
    /// Positions a cursor just after the first line equal to `header`.
    fn after_header(text: &'a str, header: &str) -> Option<Self> {
        let mut lines = text.lines().enumerate().peekable();
        let (index, _) = lines.by_ref().find(|(_, line)| *line == header)?;
        Some(Self {
            lines,
            line: index + 1,
        })
    }

    /// Whether the next line opens a record starting with `key`.
    ///
    /// Anything else (a blank line, another header, trailing junk) ends the
    /// section.
    fn at_record(&mut self, key: &str) -> bool {
        match self.lines.peek() {
            Some((_, line)) if value_of(line, key).is_some() => true,
            Some((index, line)) => {
                tracing::trace!("section ends at line {}: '{line}'", index + 1);
                false
            }
            None => false,
        }
    }

    /// Consumes the next line, which must hold `key`, and returns its line
    /// number and value.
    fn field(&mut self, key: &'static str) -> Result<(usize, &'a str), MalformedRecord> {
        let Some((index, line)) = self.lines.next() else {
            return Err(MalformedRecord::new(self.line + 1, Reason::Truncated(key)));
        };
        self.line = index + 1;
        let value = value_of(line, key).ok_or_else(|| {
            MalformedRecord::new(
                self.line,
                Reason::UnexpectedKey {
                    expected: key,
                    found: line.to_string(),
                },
            )
        })?;
        Ok((self.line, value))
    }

    fn name(&mut self) -> Result<Name, MalformedRecord> {
        let (line, value) = self.field(NAME)?;
        Name::try_from(value).map_err(|_| MalformedRecord::new(line, Reason::EmptyName))
    }

    /// Reads the next doctor, or `None` once the section ends.
    fn next_doctor(&mut self) -> Result<Option<DoctorEntry<'a>>, MalformedRecord> {
        if !self.at_record(NAME) {
            return Ok(None);
        }
        let name = self.name()?;
        let (_, specialisation) = self.field(SPECIALISATION)?;
        Ok(Some(DoctorEntry {
            name,
            specialisation,
        }))
    }

    /// Reads the next pet, or `None` once the section ends.
    fn next_pet(&mut self) -> Result<Option<PetEntry<'a>>, MalformedRecord> {
        if !self.at_record(TYPE) {
            return Ok(None);
        }
        let (_, species) = self.field(TYPE)?;
        let (_, size) = self.field(SIZE)?;
        let name = self.name()?;

        let (line, weight) = self.field(WEIGHT)?;
        let weight = weight
            .trim()
            .parse::<f64>()
            .map_err(|_| MalformedRecord::new(line, Reason::NotANumber(weight.to_string())))?;

        let (line, age) = self.field(AGE)?;
        let age = age
            .trim()
            .parse::<i64>()
            .map_err(|_| MalformedRecord::new(line, Reason::NotAnInteger(age.to_string())))?;

        let (_, doctor) = self.field(DOCTOR)?;
        let doctor = (!doctor.is_empty() && !doctor.eq_ignore_ascii_case(NO_DOCTOR)).then_some(doctor);

        Ok(Some(PetEntry {
            name,
            size,
            species,
            age,
            weight,
            doctor,
        }))
    }
}

/// Splits `key value` lines. A line holding only the key has an empty value.
fn value_of<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix(' ')
    }
}

/// Inserts or merges one doctor. Returns whether it counts as imported.
fn apply_doctor<A: Arbiter + ?Sized>(
    registry: &mut Registry,
    arbiter: &mut A,
    entry: &DoctorEntry<'_>,
) -> bool {
    let incoming = Doctor::new(entry.name.clone(), entry.specialisation);

    let Some(existing) = registry.find_doctor(entry.name.as_str()) else {
        tracing::debug!("new doctor '{}'", entry.name);
        return match registry.add_doctor(incoming) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("skipped doctor: {e}");
                false
            }
        };
    };

    if arbiter.resolve_doctor(existing, &incoming) == Resolution::Skip {
        tracing::debug!("skipped existing doctor '{}'", entry.name);
        return false;
    }

    if let Some(doctor) = registry.doctor_mut(entry.name.as_str()) {
        doctor.set_name(entry.name.clone());
        if let Err(e) = doctor.set_specialisation(entry.specialisation) {
            tracing::debug!("kept specialisation of doctor '{}': {e}", entry.name);
        }
    }
    tracing::debug!("merged doctor '{}'", entry.name);
    true
}

/// Inserts or merges one pet. Returns whether it counts as imported.
fn apply_pet<A: Arbiter + ?Sized>(
    registry: &mut Registry,
    arbiter: &mut A,
    entry: &PetEntry<'_>,
) -> bool {
    let proposed = entry.doctor.and_then(|doctor_name| {
        let found = registry.find_doctor(doctor_name).map(Doctor::id);
        if found.is_none() {
            tracing::warn!(
                "pet '{}' refers to unknown doctor '{doctor_name}'; importing it unassigned",
                entry.name
            );
        }
        found
    });

    let mut incoming = Pet::new(
        entry.name.clone(),
        entry.size,
        entry.species,
        entry.age,
        entry.weight,
    );
    incoming.set_doctor(proposed);

    let Some(mut merged) = registry.find_pet(entry.name.as_str()).cloned() else {
        tracing::debug!("new pet '{}'", entry.name);
        registry.insert_pet_unchecked(incoming);
        return true;
    };

    let resolution = arbiter.resolve_pet(registry.pet_view(&merged), registry.pet_view(&incoming));
    if resolution == Resolution::Skip {
        tracing::debug!("skipped existing pet '{}'", entry.name);
        return false;
    }

    merged.set_name(entry.name.clone());
    merged.apply(entry.size, entry.species, entry.age, entry.weight);

    if merged.doctor() != proposed {
        let current = registry.doctor_of(&merged);
        let next = proposed.and_then(|id| registry.doctor(id));
        if confirm_assignment(arbiter, &merged, current, next) {
            merged.set_doctor(proposed);
        } else {
            tracing::debug!("kept the doctor of pet '{}'", entry.name);
        }
    }

    if let Some(pet) = registry.pet_mut(entry.name.as_str()) {
        *pet = merged;
    }
    tracing::debug!("merged pet '{}'", entry.name);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlwaysMerge, AlwaysSkip, PetView, Question, Size, Species};

    fn name(s: &str) -> Name {
        Name::try_from(s).unwrap()
    }

    fn sample() -> Registry {
        let mut registry = Registry::default();
        registry.add_doctor(Doctor::new(name("Bob"), "cat")).unwrap();
        registry.add_doctor(Doctor::new(name("Alice"), "Dog")).unwrap();
        registry
            .add_pet(Pet::new(name("Whiskers"), "small", "cat", 2, 3.5))
            .unwrap();
        registry
            .add_pet(Pet::new(name("Rex"), "Large", "DOG", 7, 12.0))
            .unwrap();
        registry.assign_doctor("Whiskers", "Bob").unwrap();
        registry
    }

    /// Counts conflicts and answers them with a fixed resolution.
    struct Counting {
        resolution: Resolution,
        confirm: bool,
        doctor_conflicts: Vec<String>,
        pet_conflicts: Vec<String>,
        questions: usize,
    }

    impl Counting {
        fn new(resolution: Resolution, confirm: bool) -> Self {
            Self {
                resolution,
                confirm,
                doctor_conflicts: Vec::new(),
                pet_conflicts: Vec::new(),
                questions: 0,
            }
        }
    }

    impl Arbiter for Counting {
        fn resolve_doctor(&mut self, existing: &Doctor, incoming: &Doctor) -> Resolution {
            assert_eq!(existing.name(), incoming.name());
            self.doctor_conflicts.push(existing.name().to_string());
            self.resolution
        }

        fn resolve_pet(&mut self, existing: PetView<'_>, incoming: PetView<'_>) -> Resolution {
            assert_eq!(existing.pet.name(), incoming.pet.name());
            self.pet_conflicts.push(existing.pet.name().to_string());
            self.resolution
        }

        fn confirm(&mut self, _: &Question<'_>) -> bool {
            self.questions += 1;
            self.confirm
        }
    }

    fn assert_same_records(left: &Registry, right: &Registry) {
        assert_eq!(left.list_doctors(true), right.list_doctors(true));
        let left_pets = left.list_pets(true);
        let right_pets = right.list_pets(true);
        assert_eq!(left_pets.len(), right_pets.len());
        for (l, r) in left_pets.into_iter().zip(right_pets) {
            assert_eq!(left.pet_view(l), right.pet_view(r));
        }
    }

    #[test]
    fn export_layout() {
        let expected = "\
Pets
type cat
size small
name Whiskers
weight 3.5
age 2
doctor Bob
type DOG
size Large
name Rex
weight 12.0
age 7
doctor no doctor assigned
Doctors
name Bob
specialisation cat
name Alice
specialisation Dog
";
        assert_eq!(export(&sample()), expected);
    }

    #[test]
    fn empty_registry_exports_headers_only() {
        assert_eq!(export(&Registry::default()), "Pets\nDoctors\n");
    }

    #[test]
    fn write_matches_export() {
        let registry = sample();
        let mut bytes = Vec::new();
        write(&registry, &mut bytes).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), export(&registry));
    }

    #[test]
    fn unset_fields_are_written_empty() {
        let mut registry = Registry::default();
        registry
            .add_pet(Pet::new(name("Blob"), "tiny", "fish", 1, -1.0))
            .unwrap();
        registry.add_doctor(Doctor::new(name("Eve"), "bird")).unwrap();

        let text = export(&registry);
        assert!(text.contains("type \nsize \nname Blob\nweight 0.0\n"));
        assert!(text.ends_with("name Eve\nspecialisation \n"));

        let mut copy = Registry::default();
        import(&text, &mut copy, &mut AlwaysMerge).unwrap();
        let blob = copy.find_pet("Blob").unwrap();
        assert_eq!(blob.species(), None);
        assert_eq!(blob.size(), None);
        assert_eq!(blob.weight(), None);
        assert_eq!(copy.find_doctor("Eve").unwrap().specialisation(), None);
    }

    #[test]
    fn round_trip_into_empty_registry() {
        let original = sample();
        let text = export(&original);

        let mut copy = Registry::default();
        let summary = import(&text, &mut copy, &mut AlwaysMerge).unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                doctors_imported: 2,
                pets_imported: 2
            }
        );
        assert_same_records(&original, &copy);
        assert_eq!(export(&copy), text);
    }

    #[test]
    fn round_trip_single_unassigned_pet() {
        let mut registry = Registry::default();
        registry
            .add_pet(Pet::new(name("Whiskers"), "small", "cat", 2, 3.5))
            .unwrap();
        registry.add_doctor(Doctor::new(name("Bob"), "cat")).unwrap();
        let text = export(&registry);

        let mut copy = Registry::default();
        import(&text, &mut copy, &mut AlwaysMerge).unwrap();
        assert_eq!(export(&copy), text);
        assert!(!copy.find_pet("Whiskers").unwrap().has_doctor());
    }

    #[test]
    fn conflicts_are_resolved_once_per_record() {
        let text = export(&sample());
        let mut registry = sample();
        let mut arbiter = Counting::new(Resolution::Skip, false);

        let summary = import(&text, &mut registry, &mut arbiter).unwrap();

        assert!(summary.is_empty());
        assert_eq!(arbiter.doctor_conflicts, ["Bob", "Alice"]);
        assert_eq!(arbiter.pet_conflicts, ["Whiskers", "Rex"]);
        assert_eq!(arbiter.questions, 0);
    }

    #[test]
    fn skip_leaves_existing_record_untouched() {
        let text = "\
Pets
type dog
size medium
name WHISKERS
weight 9.25
age 11
doctor Alice
Doctors
name bob
specialisation DOG
";
        let mut registry = sample();
        let before_pet = registry.find_pet("Whiskers").unwrap().clone();
        let before_doctor = registry.find_doctor("Bob").unwrap().clone();

        let summary = import(text, &mut registry, &mut AlwaysSkip).unwrap();
        assert!(summary.is_empty());

        let after_pet = registry.find_pet("Whiskers").unwrap();
        assert_eq!(after_pet, &before_pet);
        assert_eq!(after_pet.name().as_str(), "Whiskers");
        assert_eq!(after_pet.size().unwrap().spelling(), "small");
        assert_eq!(after_pet.species().unwrap().spelling(), "cat");

        let after_doctor = registry.find_doctor("Bob").unwrap();
        assert_eq!(after_doctor.name().as_str(), "Bob");
        assert_eq!(after_doctor.specialisation().unwrap().spelling(), "cat");
        assert_eq!(after_doctor.id(), before_doctor.id());
    }

    #[test]
    fn merge_replaces_every_field() {
        let text = "\
Pets
type dog
size medium
name WHISKERS
weight 9.25
age 11
doctor Alice
Doctors
name bob
specialisation DOG
";
        let mut registry = sample();
        let bob_id = registry.find_doctor("Bob").unwrap().id();
        let mut arbiter = Counting::new(Resolution::Merge, true);

        let summary = import(text, &mut registry, &mut arbiter).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                doctors_imported: 1,
                pets_imported: 1
            }
        );

        let bob = registry.find_doctor("Bob").unwrap();
        assert_eq!(bob.name().as_str(), "bob");
        assert_eq!(bob.specialisation().unwrap().spelling(), "DOG");
        assert_eq!(bob.id(), bob_id, "merging keeps the doctor's identity");

        let whiskers = registry.find_pet("whiskers").unwrap();
        assert_eq!(whiskers.name().as_str(), "WHISKERS");
        assert_eq!(whiskers.species().unwrap().value(), Species::Dog);
        assert_eq!(whiskers.size().unwrap().value(), Size::Medium);
        assert_eq!(whiskers.weight(), Some(9.25));
        assert_eq!(whiskers.age(), 11);
        assert_eq!(
            registry.doctor_of(whiskers).unwrap().name().as_str(),
            "Alice"
        );
        // Moving away from Bob had to be confirmed; Alice treats dogs.
        assert_eq!(arbiter.questions, 1);
    }

    #[test]
    fn declined_reassignment_keeps_doctor_but_merges_details() {
        let text = "\
Pets
type cat
size large
name Whiskers
weight 5.0
age 3
doctor Alice
Doctors
";
        let mut registry = sample();
        let mut arbiter = Counting::new(Resolution::Merge, false);

        let summary = import(text, &mut registry, &mut arbiter).unwrap();
        assert_eq!(summary.pets_imported, 1);

        let whiskers = registry.find_pet("Whiskers").unwrap();
        assert_eq!(whiskers.age(), 3);
        assert_eq!(registry.doctor_of(whiskers).unwrap().name().as_str(), "Bob");
    }

    #[test]
    fn merge_with_sentinel_unassigns_after_confirmation() {
        let text = "\
Pets
type cat
size small
name Whiskers
weight 3.5
age 2
doctor No Doctor Assigned
";
        let mut registry = sample();
        import(text, &mut registry, &mut AlwaysMerge).unwrap();
        assert!(!registry.find_pet("Whiskers").unwrap().has_doctor());
    }

    #[test]
    fn merge_with_invalid_enum_keeps_previous_value() {
        let text = "\
Pets
type iguana
size gigantic
name Rex
weight -4
age -2
doctor no doctor assigned
";
        let mut registry = sample();
        import(text, &mut registry, &mut AlwaysMerge).unwrap();

        let rex = registry.find_pet("Rex").unwrap();
        assert_eq!(rex.species().unwrap().spelling(), "DOG");
        assert_eq!(rex.size().unwrap().spelling(), "Large");
        assert_eq!(rex.weight(), Some(12.0));
        assert_eq!(rex.age(), 7);
    }

    #[test]
    fn pets_can_refer_to_doctors_in_the_same_file() {
        let text = "\
Pets
type dog
size small
name Fido
weight 4.0
age 1
doctor carol
Doctors
name Carol
specialisation dog
";
        let mut registry = Registry::default();
        import(text, &mut registry, &mut AlwaysSkip).unwrap();
        let fido = registry.find_pet("Fido").unwrap();
        assert_eq!(registry.doctor_of(fido).unwrap().name().as_str(), "Carol");
    }

    #[test]
    fn unknown_doctor_reference_imports_unassigned() {
        let text = "\
Pets
type dog
size small
name Fido
weight 4.0
age 1
doctor Nobody
Doctors
";
        let mut registry = Registry::default();
        let summary = import(text, &mut registry, &mut AlwaysMerge).unwrap();
        assert_eq!(summary.pets_imported, 1);
        assert!(!registry.find_pet("Fido").unwrap().has_doctor());
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let text = format!("{}\n   \n\n", export(&sample()));
        let mut registry = Registry::default();
        let summary = import(&text, &mut registry, &mut AlwaysMerge).unwrap();
        assert_eq!(summary.doctors_imported, 2);
        assert_eq!(summary.pets_imported, 2);
    }

    #[test]
    fn unrecognised_trailing_content_ends_section() {
        let text = "\
Doctors
name Bob
specialisation cat
# notes follow
name Ignored
specialisation dog
";
        let mut registry = Registry::default();
        let summary = import(text, &mut registry, &mut AlwaysMerge).unwrap();
        assert_eq!(summary.doctors_imported, 1);
        assert!(registry.find_doctor("Ignored").is_none());
    }

    #[test]
    fn sections_may_appear_in_either_order() {
        let text = "\
Doctors
name Bob
specialisation cat
Pets
type cat
size small
name Tom
weight 4.0
age 5
doctor Bob
";
        let mut registry = Registry::default();
        let summary = import(text, &mut registry, &mut AlwaysMerge).unwrap();
        assert_eq!(summary.doctors_imported, 1);
        assert_eq!(summary.pets_imported, 1);
        assert_eq!(registry.pets_of("Bob").unwrap().len(), 1);
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let text = export(&sample()).replace('\n', "\r\n");
        let mut registry = Registry::default();
        import(&text, &mut registry, &mut AlwaysMerge).unwrap();
        assert_same_records(&sample(), &registry);
    }

    #[test]
    fn missing_sections_import_nothing() {
        let mut registry = Registry::default();
        let summary = import("hello\nworld\n", &mut registry, &mut AlwaysMerge).unwrap();
        assert!(summary.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn bad_age_keeps_records_applied_before_it() {
        let text = "\
Pets
type cat
size small
name Tom
weight 4.0
age 5
doctor Bob
type dog
size large
name Rex
weight 20.5
age five
doctor no doctor assigned
type cat
size small
name Felix
weight 3.0
age 1
doctor no doctor assigned
Doctors
name Bob
specialisation cat
";
        let mut registry = Registry::default();
        let error = import(text, &mut registry, &mut AlwaysMerge).unwrap_err();
        assert_eq!(
            error,
            MalformedRecord {
                line: 12,
                reason: Reason::NotAnInteger("five".to_string())
            }
        );

        assert_eq!(registry.doctor_count(), 1);
        assert_eq!(registry.pet_count(), 1);
        let tom = registry.find_pet("Tom").unwrap();
        assert_eq!(registry.doctor_of(tom).unwrap().name().as_str(), "Bob");
        assert!(registry.find_pet("Rex").is_none());
        assert!(registry.find_pet("Felix").is_none());
    }

    #[test]
    fn bad_doctor_stops_before_any_pet() {
        let text = "\
Pets
type cat
size small
name Tom
weight 4.0
age 5
doctor Bob
Doctors
name Bob
specialisation cat
name Carol
";
        let mut registry = Registry::default();
        registry
            .add_pet(Pet::new(name("Tom"), "large", "dog", 9, 30.0))
            .unwrap();

        let error = import(text, &mut registry, &mut AlwaysMerge).unwrap_err();
        assert_eq!(
            error,
            MalformedRecord {
                line: 12,
                reason: Reason::Truncated("specialisation")
            }
        );

        assert!(registry.find_doctor("Bob").is_some());
        assert!(registry.find_doctor("Carol").is_none());
        let tom = registry.find_pet("Tom").unwrap();
        assert_eq!(tom.age(), 9);
        assert!(tom.doctor().is_none());
    }

    #[test]
    fn doctor_with_the_unassigned_marker_is_skipped() {
        let text = "\
Pets
type cat
size small
name Tom
weight 4.0
age 5
doctor No Doctor Assigned
Doctors
name No Doctor Assigned
specialisation cat
name Bob
specialisation dog
";
        let mut registry = Registry::default();
        let summary = import(text, &mut registry, &mut AlwaysMerge).unwrap();
        assert_eq!(summary.doctors_imported, 1);
        assert_eq!(summary.pets_imported, 1);

        assert_eq!(registry.doctor_count(), 1);
        assert!(registry.find_doctor("no doctor assigned").is_none());
        assert!(registry.find_pet("Tom").unwrap().doctor().is_none());

        let mut reloaded = Registry::default();
        import(&export(&registry), &mut reloaded, &mut AlwaysSkip).unwrap();
        assert_same_records(&registry, &reloaded);
    }

    #[test]
    fn bad_weight_is_fatal() {
        let text = "\
Pets
type cat
size small
name Tom
weight heavy
age 5
doctor no doctor assigned
";
        let error = import(text, &mut Registry::default(), &mut AlwaysMerge).unwrap_err();
        assert_eq!(error.line, 5);
        assert_eq!(error.reason, Reason::NotANumber("heavy".to_string()));
    }

    #[test]
    fn truncated_record_is_fatal() {
        let text = "Pets\ntype cat\nsize small\nname Tom\n";
        let error = import(text, &mut Registry::default(), &mut AlwaysMerge).unwrap_err();
        assert_eq!(
            error,
            MalformedRecord {
                line: 5,
                reason: Reason::Truncated("weight")
            }
        );
    }

    #[test]
    fn truncated_doctor_is_fatal() {
        let text = "Pets\nDoctors\nname Bob\n";
        let error = import(text, &mut Registry::default(), &mut AlwaysMerge).unwrap_err();
        assert_eq!(error.reason, Reason::Truncated("specialisation"));
    }

    #[test]
    fn fields_out_of_order_are_fatal() {
        let text = "Pets\ntype cat\nname Tom\nsize small\nweight 1.0\nage 1\ndoctor x\n";
        let error = import(text, &mut Registry::default(), &mut AlwaysMerge).unwrap_err();
        assert_eq!(
            error,
            MalformedRecord {
                line: 3,
                reason: Reason::UnexpectedKey {
                    expected: "size",
                    found: "name Tom".to_string()
                }
            }
        );
    }

    #[test]
    fn empty_name_is_fatal() {
        let text = "Doctors\nname \nspecialisation cat\n";
        let error = import(text, &mut Registry::default(), &mut AlwaysMerge).unwrap_err();
        assert_eq!(error.reason, Reason::EmptyName);
        assert_eq!(error.line, 2);
    }

    #[test]
    fn duplicate_names_within_a_file_are_conflicts() {
        let text = "\
Doctors
name Bob
specialisation cat
name BOB
specialisation dog
";
        let mut registry = Registry::default();
        let mut arbiter = Counting::new(Resolution::Skip, true);
        let summary = import(text, &mut registry, &mut arbiter).unwrap();
        assert_eq!(summary.doctors_imported, 1);
        assert_eq!(arbiter.doctor_conflicts, ["Bob"]);
        assert_eq!(registry.find_doctor("bob").unwrap().species(), Some(Species::Cat));
    }

    #[test]
    fn weights_keep_a_fractional_digit() {
        assert_eq!(Weight(Some(8.0)).to_string(), "8.0");
        assert_eq!(Weight(Some(3.25)).to_string(), "3.25");
        assert_eq!(Weight(Some(0.1)).to_string(), "0.1");
        assert_eq!(Weight(None).to_string(), "0.0");
    }
}
