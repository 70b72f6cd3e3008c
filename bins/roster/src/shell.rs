//! Interactive menu over a [`StudentRepository`].
//!
//! Reads one line per prompt from any `BufRead` and writes to any `Write`,
//! so the whole dialogue can be driven from memory in tests.

use std::io::{self, BufRead, Write};

use models::student::{validate_grade, validate_name};
use service::{ServiceError, StudentRepository};

const MENU: &str = "
    === Student Management System ===

    1 - Register student
    2 - List students
    3 - Change grade
    4 - Delete student
    5 - Exit

    Choose an option: ";

const RULE_WIDTH: usize = 50;
const CLEAR: &str = "\x1B[2J\x1B[H";

/// Why an action stopped early.
#[derive(Debug)]
enum ActionError {
    Service(ServiceError),
    /// Input closed while a prompt was waiting.
    Eof,
    Io(io::Error),
}

impl From<ServiceError> for ActionError {
    fn from(err: ServiceError) -> Self { Self::Service(err) }
}

impl From<io::Error> for ActionError {
    fn from(err: io::Error) -> Self { Self::Io(err) }
}

type ActionResult<T> = Result<T, ActionError>;

pub struct Shell<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Self { input, output, clear_screen }
    }

    /// Run the menu until the user exits or input ends.
    pub fn run<S: StudentRepository>(&mut self, store: &mut S) -> io::Result<()> {
        loop {
            if self.clear_screen {
                write!(self.output, "{CLEAR}")?;
            }
            let Some(choice) = self.prompt(MENU)? else {
                return Ok(());
            };

            let outcome = match choice.trim().parse::<i64>() {
                Ok(1) => self.register(store),
                Ok(2) => self.list(store),
                Ok(3) => self.change_grade(store),
                Ok(4) => self.delete(store),
                Ok(5) => {
                    writeln!(self.output, "Leaving the system...")?;
                    return Ok(());
                }
                Ok(_) => Ok(Some("Invalid option!".to_string())),
                Err(_) => Ok(Some("Please enter a valid number!".to_string())),
            };

            match outcome {
                Ok(Some(msg)) => writeln!(self.output, "{msg}")?,
                Ok(None) => {}
                Err(ActionError::Service(e)) => writeln!(self.output, "{}", describe(&e))?,
                Err(ActionError::Eof) => return Ok(()),
                Err(ActionError::Io(e)) => return Err(e),
            }

            if !self.pause()? {
                return Ok(());
            }
        }
    }

    fn register<S: StudentRepository>(&mut self, store: &mut S) -> ActionResult<Option<String>> {
        let identifier = parse_identifier(&self.ask("Student identifier: ")?)?;
        if store.find(identifier).is_some() {
            return Err(ServiceError::DuplicateKey(identifier).into());
        }

        let name = self.ask("Student name: ")?.trim().to_string();
        validate_name(&name).map_err(ServiceError::from)?;

        let grade = parse_grade(&self.ask("Student grade: ")?)?;
        validate_grade(grade).map_err(ServiceError::from)?;

        store.insert(identifier, &name, grade)?;
        Ok(Some("Student registered successfully!".to_string()))
    }

    fn list<S: StudentRepository>(&mut self, store: &S) -> ActionResult<Option<String>> {
        if store.list().next().is_none() {
            return Ok(Some("No students registered.".to_string()));
        }

        let rule = "-".repeat(RULE_WIDTH);
        writeln!(self.output, "\nStudent list:")?;
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "{:<10} {:<30} {:<10}", "Identifier", "Name", "Grade")?;
        writeln!(self.output, "{rule}")?;
        for s in store.list() {
            writeln!(self.output, "{:<10} {:<30} {:<10.2}", s.identifier, s.name, s.grade)?;
        }
        writeln!(self.output, "{rule}")?;

        if !self.pause()? {
            return Err(ActionError::Eof);
        }
        Ok(None)
    }

    fn change_grade<S: StudentRepository>(&mut self, store: &mut S) -> ActionResult<Option<String>> {
        let identifier = parse_identifier(&self.ask("Student identifier: ")?)?;
        let current = store.find(identifier).map(|s| s.grade).ok_or(ServiceError::NotFound(identifier))?;
        writeln!(self.output, "Current grade: {current:?}")?;

        let grade = parse_grade(&self.ask("Enter the new grade: ")?)?;
        store.update_grade(identifier, grade)?;
        Ok(Some("Grade updated successfully!".to_string()))
    }

    fn delete<S: StudentRepository>(&mut self, store: &mut S) -> ActionResult<Option<String>> {
        let identifier = parse_identifier(&self.ask("Student identifier: ")?)?;
        store.delete(identifier)?;
        Ok(Some("Student deleted successfully!".to_string()))
    }

    /// Print `label`, then read one line without its line terminator.
    /// `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn ask(&mut self, label: &str) -> ActionResult<String> {
        self.prompt(label)?.ok_or(ActionError::Eof)
    }

    /// Returns false once input is exhausted.
    fn pause(&mut self) -> io::Result<bool> {
        Ok(self.prompt("\nPress Enter to continue...")?.is_some())
    }
}

fn parse_identifier(raw: &str) -> Result<i64, ServiceError> {
    raw.trim().parse().map_err(|_| ServiceError::invalid("enter a valid whole number"))
}

fn parse_grade(raw: &str) -> Result<f64, ServiceError> {
    raw.trim().parse().map_err(|_| ServiceError::invalid("enter a valid number"))
}

/// User-facing text for each error kind.
fn describe(err: &ServiceError) -> String {
    match err {
        ServiceError::InvalidInput(msg) => format!("Error: {msg}!"),
        ServiceError::DuplicateKey(id) => format!("Error: identifier {id} already exists!"),
        ServiceError::NotFound(_) => "Student not found!".to_string(),
        ServiceError::Persistence(msg) => {
            format!("Error saving data: {msg}. The change is kept in memory only.")
        }
    }
}
