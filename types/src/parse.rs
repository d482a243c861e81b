//! Parsing of machine manuals.
//!
//! One machine per line:
//!
//! ```text
//! [.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
//! ```
//!
//! - `[...]` is the lamp diagram, `#` on and `.` off, lamp 0 first.
//! - Each `(...)` lists lamp/counter indices. It is both a toggle switch and a
//!   counter button.
//! - The optional `{...}` lists counter targets.

use std::num::ParseIntError;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{Bits, Button, CounterSystem, SystemError, ToggleSystem};

static DIAGRAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("diagram pattern is valid"));
static WIRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("wiring pattern is valid"));
static TARGETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]*)\}").expect("targets pattern is valid"));

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected a lamp diagram like '[.##.]'")]
    MissingDiagram,
    #[error("lamp diagram may only contain '.' and '#', found {0:?}")]
    InvalidLamp(char),
    #[error("invalid number {text:?} in {group:?}")]
    InvalidNumber {
        group: String,
        text: String,
        #[source]
        source: ParseIntError,
    },
    #[error("more than one {0} group")]
    DuplicateGroup(&'static str),
    #[error("unexpected text {0:?}")]
    UnexpectedText(String),
    #[error(transparent)]
    Invalid(#[from] SystemError),
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

/// Both views of one parsed machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    pub toggle: ToggleSystem,
    /// Present only when the line carries a `{...}` target list.
    pub counter: Option<CounterSystem>,
}

/// Parse every non-blank line of a manual.
pub fn parse_manual(text: &str) -> Result<Vec<Machine>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            parse_machine(line).map_err(|source| ParseError::Line {
                line: i + 1,
                source: Box::new(source),
            })
        })
        .collect()
}

pub fn parse_machine(line: &str) -> Result<Machine, ParseError> {
    let mut diagrams = DIAGRAM.captures_iter(line);
    let diagram = diagrams.next().ok_or(ParseError::MissingDiagram)?;
    if diagrams.next().is_some() {
        return Err(ParseError::DuplicateGroup("lamp diagram"));
    }
    let (lamp_count, lamps) = parse_lamps(&diagram[1])?;

    let mut switches = Vec::new();
    let mut buttons = Vec::new();
    for wiring in WIRING.captures_iter(line) {
        let indices = parse_number_list::<usize>(&wiring[1])?;
        switches.push(Bits::from_indices(&indices)?);
        buttons.push(Button::new(indices));
    }

    let mut target_groups = TARGETS.captures_iter(line);
    let targets = target_groups
        .next()
        .map(|caps| parse_number_list::<u32>(&caps[1]))
        .transpose()?;
    if target_groups.next().is_some() {
        return Err(ParseError::DuplicateGroup("target"));
    }

    let leftover = DIAGRAM.replace_all(line, "");
    let leftover = WIRING.replace_all(&leftover, "");
    let leftover = TARGETS.replace_all(&leftover, "");
    if !leftover.trim().is_empty() {
        return Err(ParseError::UnexpectedText(leftover.trim().to_string()));
    }

    let toggle = ToggleSystem::new(lamp_count, lamps, switches)?;
    let counter = targets
        .map(|targets| CounterSystem::new(targets, buttons))
        .transpose()?;
    Ok(Machine { toggle, counter })
}

fn parse_lamps(diagram: &str) -> Result<(usize, Bits), ParseError> {
    let mut on = Vec::new();
    let mut count = 0;
    for (i, c) in diagram.trim().chars().enumerate() {
        match c {
            '.' => {}
            '#' => on.push(i),
            other => return Err(ParseError::InvalidLamp(other)),
        }
        count = i + 1;
    }
    if count > Bits::WIDTH {
        return Err(SystemError::TooManyLamps { lamps: count }.into());
    }
    Ok((count, Bits::from_indices(&on)?))
}

/// Comma-separated numbers. An empty group yields an empty list.
fn parse_number_list<T>(group: &str) -> Result<Vec<T>, ParseError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    if group.trim().is_empty() {
        return Ok(Vec::new());
    }
    group
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<T>()
                .map_err(|source| ParseError::InvalidNumber {
                    group: group.to_string(),
                    text: part.trim().to_string(),
                    source,
                })
        })
        .collect()
}
