// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::{Parser, Subcommand, ValueEnum};
use csv::{ReaderBuilder, Trim, Writer};
use library_lending_rs::{
    ActiveUsers, CollaboratorError, Library, LibraryConfig, LibraryEvent, NotificationTriggers,
    Notifier, Title, UserId, late_fee,
};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Library Lending - Replay lending scripts and quote late fees
#[derive(Parser, Debug)]
#[command(name = "library-lending-rs")]
#[command(about = "A library lending ledger driven by CSV scripts", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a CSV lending script and print the final inventory
    Replay {
        /// Path to CSV file with lending operations
        ///
        /// Expected format: op,title,user,count
        /// Example: cargo run -- replay script.csv > inventory.csv
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Events to report (defaults to borrowed, returned, available)
        #[arg(long, value_enum, value_delimiter = ',')]
        notify: Option<Vec<Trigger>>,
    },
    /// Compute a late-return fee
    Fee {
        /// Days past the due date
        #[arg(long, allow_negative_numbers = true)]
        days: i64,

        /// Apply the bestseller surcharge
        #[arg(long)]
        bestseller: bool,

        /// Apply the premium member discount
        #[arg(long)]
        premium: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Trigger {
    Borrowed,
    Returned,
    Available,
    Rejected,
}

fn triggers_from(selected: Option<Vec<Trigger>>) -> NotificationTriggers {
    let Some(selected) = selected else {
        return NotificationTriggers::default();
    };
    NotificationTriggers {
        borrowed: selected.contains(&Trigger::Borrowed),
        returned: selected.contains(&Trigger::Returned),
        available: selected.contains(&Trigger::Available),
        rejected: selected.contains(&Trigger::Rejected),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("library_lending_rs=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Replay { input, notify } => {
            let file = match File::open(&input) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Error opening file '{}': {}", input.display(), e);
                    process::exit(1);
                }
            };

            let config = LibraryConfig {
                notify: triggers_from(notify),
                ..LibraryConfig::default()
            };
            let library = match process_commands(BufReader::new(file), config) {
                Ok(library) => library,
                Err(e) => {
                    eprintln!("Error processing script: {}", e);
                    process::exit(1);
                }
            };

            if let Err(e) = write_inventory(&library, std::io::stdout()) {
                eprintln!("Error writing output: {}", e);
                process::exit(1);
            }
        }
        Command::Fee {
            days,
            bestseller,
            premium,
        } => match late_fee(days, bestseller, premium) {
            Ok(fee) => println!("{fee}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
    }
}

/// Reports dispatched events through the log.
struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: &LibraryEvent) -> Result<(), CollaboratorError> {
        info!(?event, "notification");
        Ok(())
    }
}

/// Raw CSV record matching the script format.
///
/// Fields: `op, title, user, count`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    count: Option<u32>,
}

#[derive(Debug)]
enum Operation {
    Add { title: Title, count: u32 },
    Activate { user: UserId },
    Deactivate { user: UserId },
    Borrow { title: Title, user: UserId },
    Return { title: Title, user: UserId },
}

impl CsvRecord {
    /// Converts a CSV record into an operation.
    ///
    /// Returns `None` for unknown operations or missing required fields.
    fn into_operation(self) -> Option<Operation> {
        let title = self.title.filter(|t| !t.is_empty()).map(Title::from);
        let user = self.user.filter(|u| !u.is_empty()).map(UserId::from);

        match self.op.to_lowercase().as_str() {
            "add" => Some(Operation::Add {
                title: title?,
                count: self.count?,
            }),
            "activate" => Some(Operation::Activate { user: user? }),
            "deactivate" => Some(Operation::Deactivate { user: user? }),
            "borrow" => Some(Operation::Borrow {
                title: title?,
                user: user?,
            }),
            "return" => Some(Operation::Return {
                title: title?,
                user: user?,
            }),
            _ => None,
        }
    }
}

/// Replay a lending script from a CSV reader.
///
/// Users start inactive; `activate` rows register them with the in-memory
/// eligibility registry. Malformed rows and rejected operations are logged
/// and skipped.
///
/// # CSV Format
///
/// Expected columns: `op, title, user, count`
/// - `op`: add, activate, deactivate, borrow, return
/// - `title`: Book title (unused by activate/deactivate)
/// - `user`: User ID (unused by add)
/// - `count`: Copies to add (add only)
///
/// # Example
///
/// ```csv
/// op,title,user,count
/// add,1984,,3
/// activate,,alice,
/// borrow,1984,alice,
/// return,1984,alice,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
fn process_commands<R: Read>(reader: R, config: LibraryConfig) -> Result<Library, csv::Error> {
    let users = Arc::new(ActiveUsers::new());
    let library = Library::with_notifier(users.clone(), Arc::new(TracingNotifier), config);

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for (row, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(row, error = %e, "skipping malformed row");
                continue;
            }
        };
        let Some(operation) = record.into_operation() else {
            warn!(row, "skipping invalid operation");
            continue;
        };

        match operation {
            Operation::Add { title, count } => {
                if let Err(e) = library.add_copies(&title, count) {
                    warn!(row, error = %e, "add rejected");
                }
            }
            Operation::Activate { user } => users.activate(user),
            Operation::Deactivate { user } => users.deactivate(user),
            Operation::Borrow { title, user } => match library.borrow_book(&title, &user) {
                Ok(true) => {}
                Ok(false) => warn!(row, %title, %user, "borrow declined"),
                Err(e) => warn!(row, error = %e, "borrow failed"),
            },
            Operation::Return { title, user } => {
                if !library.return_book(&title, &user) {
                    warn!(row, %title, %user, "return declined");
                }
            }
        }
    }

    Ok(library)
}

/// Write the inventory to a CSV writer.
///
/// # CSV Format
///
/// Columns: `title, available, on_loan`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
fn write_inventory<W: Write>(library: &Library, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for record in library.inventory() {
        wtr.serialize(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
