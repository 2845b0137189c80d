use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map},
    sequence::{delimited, tuple},
    IResult,
};
use std::fmt;
use tracing::{trace, warn};

use crate::lease::{Field, LeaseRecord};

/// What a single line of a dhcpd leases file means to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `lease <address> {`
    LeaseStart(&'a str),
    /// One of the field statements, with its captured value.
    Statement(Field, &'a str),
    /// A line consisting of exactly `}`.
    BlockEnd,
    Other,
}

// Only the space character counts, tabs do not.
fn spaces0(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c == ' ')(input)
}

fn spaces1(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c == ' ')(input)
}

fn until_semicolon(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == ';')(input)
}

fn lease_start(input: &str) -> IResult<&str, &str> {
    delimited(
        tuple((spaces0, tag("lease"), spaces1)),
        take_till1(|c: char| c == ' '),
        tuple((spaces1, char('{'))),
    )(input)
}

fn client_hostname(input: &str) -> IResult<&str, &str> {
    delimited(
        tuple((spaces1, tag("client-hostname"), spaces1, char('"'))),
        take_till1(|c: char| c == '"'),
        char('"'),
    )(input)
}

fn hardware_ethernet(input: &str) -> IResult<&str, &str> {
    delimited(
        tuple((spaces1, tag("hardware ethernet"), spaces1)),
        until_semicolon,
        char(';'),
    )(input)
}

/// `starts`/`ends` statements: the weekday number is dropped, the date and time
/// are captured as written.
fn timestamp<'a>(keyword: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    delimited(
        tuple((spaces1, tag(keyword), spaces1, digit1, spaces1)),
        until_semicolon,
        char(';'),
    )
}

/// Classifies one line, without its terminator. Patterns are anchored at the
/// start of the line and tried in order; the first one that matches wins.
pub fn classify(line: &str) -> Line<'_> {
    let result: IResult<&str, Line<'_>> = alt((
        map(lease_start, Line::LeaseStart),
        map(client_hostname, |value| Line::Statement(Field::Hostname, value)),
        map(hardware_ethernet, |value| Line::Statement(Field::MacAddress, value)),
        map(timestamp("starts"), |value| Line::Statement(Field::Starts, value)),
        map(timestamp("ends"), |value| Line::Statement(Field::Ends, value)),
        map(all_consuming(tag("}")), |_| Line::BlockEnd),
    ))(line);

    result.map(|(_, line)| line).unwrap_or(Line::Other)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    InLease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    LeaseWhileBusy,
    FieldWhileIdle(Field),
    BlockEndWhileIdle,
    UnterminatedLease,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WarningKind::LeaseWhileBusy => write!(f, "new lease begin when parser not idle"),
            WarningKind::FieldWhileIdle(field) => write!(f, "{} when parser idle", field),
            WarningKind::BlockEndWhileIdle => write!(f, "lease end when parser idle"),
            WarningKind::UnterminatedLease => write!(f, "input ended inside a lease block"),
        }
    }
}

/// A statement that appeared out of order. The parser still applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Warning {
    pub line: usize,
    pub kind: WarningKind,
}

/// Accumulates the fields of the lease block being read and hands back the
/// finished record whenever a block closes.
#[derive(Debug, Default)]
pub struct LeaseParser {
    state: State,
    current: LeaseRecord,
    line_number: usize,
    warnings: usize,
    last_warning: Option<Warning>,
}

impl LeaseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next line. Returns the collected record when the line closes a
    /// block, after which every field is empty again.
    pub fn feed(&mut self, line: &str) -> Option<LeaseRecord> {
        self.line_number += 1;
        match classify(line) {
            Line::LeaseStart(address) => {
                if self.state != State::Idle {
                    self.warn(WarningKind::LeaseWhileBusy);
                }
                self.state = State::InLease;
                address.clone_into(&mut self.current.address);
                None
            }
            Line::Statement(field, value) => {
                if self.state != State::InLease {
                    self.warn(WarningKind::FieldWhileIdle(field));
                }
                self.current.set(field, value);
                None
            }
            Line::BlockEnd => {
                if self.state != State::InLease {
                    self.warn(WarningKind::BlockEndWhileIdle);
                }
                self.state = State::Idle;
                Some(std::mem::take(&mut self.current))
            }
            Line::Other => {
                trace!(line = self.line_number, "ignoring {:?}", line);
                None
            }
        }
    }

    /// Called once the input is exhausted. A block that never closed is dropped.
    pub fn finish(&mut self) {
        if self.state != State::Idle {
            self.warn(WarningKind::UnterminatedLease);
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn last_warning(&self) -> Option<Warning> {
        self.last_warning
    }

    fn warn(&mut self, kind: WarningKind) {
        let warning = Warning {
            line: self.line_number,
            kind,
        };
        warn!(line = warning.line, "{}", warning.kind);
        self.warnings += 1;
        self.last_warning = Some(warning);
    }
}
