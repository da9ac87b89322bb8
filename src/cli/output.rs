//! Rendering records for the terminal.

use std::fmt::Write as _;

use clap::ValueEnum;
use clinic::{domain::Choice, Doctor, PetView, NO_DOCTOR};
use serde::Serialize;

use crate::cli::terminal::Colorize;

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Prints doctors in the requested format.
pub fn doctors(doctors: &[&Doctor], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&doctors),
        OutputFormat::Table if doctors.is_empty() => {
            println!("{}", "No doctors registered".dim());
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new(["Name", "Specialisation"]);
            for doctor in doctors {
                table.push([doctor.name().to_string(), choice(doctor.specialisation())]);
            }
            table.print();
            Ok(())
        }
    }
}

/// Prints pets in the requested format. `empty` is shown instead of a table
/// when there are none.
pub fn pets(pets: &[PetView<'_>], format: OutputFormat, empty: &str) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&pets),
        OutputFormat::Table if pets.is_empty() => {
            println!("{}", empty.dim());
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new(["Name", "Type", "Size", "Age", "Weight", "Doctor"]);
            for view in pets {
                let pet = view.pet;
                let mut weight = weight(pet.weight());
                if pet.is_overweight() {
                    weight.push_str(" (!)");
                }
                table.push([
                    pet.name().to_string(),
                    choice(pet.species()),
                    choice(pet.size()),
                    pet.age().to_string(),
                    weight,
                    doctor_name(*view),
                ]);
            }
            table.print();
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The labelled fields of a doctor, one per line.
pub fn doctor_details(doctor: &Doctor) -> String {
    details(&[
        ("Name", doctor.name().to_string()),
        ("Specialisation", choice(doctor.specialisation())),
    ])
}

/// The labelled fields of a pet, one per line.
pub fn pet_details(view: PetView<'_>) -> String {
    let pet = view.pet;
    details(&[
        ("Name", pet.name().to_string()),
        ("Type", choice(pet.species())),
        ("Size", choice(pet.size())),
        ("Age", pet.age().to_string()),
        ("Weight", weight(pet.weight())),
        ("Doctor", doctor_name(view)),
    ])
}

/// A sentence describing whether the pet's weight is healthy.
pub fn weight_assessment(view: PetView<'_>) -> String {
    let pet = view.pet;
    match (pet.weight(), pet.weight_limit()) {
        (Some(weight), Some(limit)) if pet.is_overweight() => format!(
            "{} is overweight: {weight} kg is above the {limit} kg limit for a {} {}",
            pet.name(),
            choice(pet.size()).to_lowercase(),
            choice(pet.species()).to_lowercase()
        )
        .warning(),
        (Some(_), Some(limit)) => {
            format!("{} is a healthy weight (limit {limit} kg)", pet.name()).success()
        }
        _ => format!(
            "{} cannot be assessed without a type, size and weight",
            pet.name()
        )
        .dim(),
    }
}

/// `1 pet`, `2 pets`
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn details(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;
    let mut out = String::new();
    for (label, value) in fields {
        let label = format!("{label}:");
        let _ = writeln!(out, "  {label:<width$} {value}");
    }
    out
}

fn choice<T>(choice: Option<&Choice<T>>) -> String {
    choice.map_or_else(|| "-".to_string(), ToString::to_string)
}

fn weight(weight: Option<f64>) -> String {
    weight.map_or_else(|| "-".to_string(), |weight| format!("{weight} kg"))
}

fn doctor_name(view: PetView<'_>) -> String {
    view.doctor_name()
        .map_or_else(|| NO_DOCTOR.to_string(), ToString::to_string)
}

/// A plain table with left-aligned columns.
struct Table<const N: usize> {
    headers: [&'static str; N],
    rows: Vec<[String; N]>,
}

impl<const N: usize> Table<N> {
    const fn new(headers: [&'static str; N]) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: [String; N]) {
        self.rows.push(row);
    }

    fn widths(&self) -> [usize; N] {
        let mut widths = self.headers.map(str::len);
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn render_row<S: AsRef<str>>(cells: &[S; N], widths: &[usize; N]) -> String {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    }

    fn print(&self) {
        let widths = self.widths();
        println!("{}", Self::render_row(&self.headers, &widths).dim());
        for row in &self.rows {
            println!("{}", Self::render_row(row, &widths));
        }
    }
}
