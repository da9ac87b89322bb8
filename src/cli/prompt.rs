use clap::ValueEnum;
use clinic::{Arbiter, Doctor, PetView, Question, Resolution};

use crate::cli::{
    output::{doctor_details, pet_details},
    terminal::Colorize,
};

/// What to do when an imported record's name is already taken.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum ConflictPolicy {
    /// Show both records and ask
    #[default]
    Ask,
    /// Overwrite the existing record
    Merge,
    /// Keep the existing record
    Skip,
}

/// Answers questions by asking on the terminal.
#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    assume_yes: bool,
    policy: ConflictPolicy,
}

impl Prompt {
    /// A prompt that asks every question, or none if `assume_yes` is set.
    pub const fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            policy: ConflictPolicy::Ask,
        }
    }

    /// A prompt for imports. Merging everything also agrees to every
    /// reassignment it causes.
    pub const fn for_import(policy: ConflictPolicy) -> Self {
        Self {
            assume_yes: matches!(policy, ConflictPolicy::Merge),
            policy,
        }
    }

    /// Asks a yes/no question, defaulting to no.
    ///
    /// If the terminal cannot be read the answer is no.
    pub fn ask(&self, question: &str) -> bool {
        if self.assume_yes {
            tracing::debug!("assuming yes: {question}");
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!("could not read an answer ({e}); assuming no");
                false
            })
    }

    fn resolve(&self, kind: &str, existing: &str, incoming: &str) -> Resolution {
        match self.policy {
            ConflictPolicy::Merge => Resolution::Merge,
            ConflictPolicy::Skip => Resolution::Skip,
            ConflictPolicy::Ask => {
                eprintln!("\n{}", format!("A {kind} with this name already exists.").warning());
                eprintln!("{}\n{existing}", "Existing".dim());
                eprintln!("{}\n{incoming}", "Imported".dim());
                if self.ask(&format!("Overwrite the existing {kind}?")) {
                    Resolution::Merge
                } else {
                    Resolution::Skip
                }
            }
        }
    }
}

impl Arbiter for Prompt {
    fn resolve_doctor(&mut self, existing: &Doctor, incoming: &Doctor) -> Resolution {
        self.resolve("doctor", &doctor_details(existing), &doctor_details(incoming))
    }

    fn resolve_pet(&mut self, existing: PetView<'_>, incoming: PetView<'_>) -> Resolution {
        self.resolve("pet", &pet_details(existing), &pet_details(incoming))
    }

    fn confirm(&mut self, question: &Question<'_>) -> bool {
        self.ask(&question.to_string())
    }
}
