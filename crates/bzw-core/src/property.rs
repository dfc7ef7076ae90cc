use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Span;
use crate::error::BzwError;

/// A single `name value...` clause inside an object body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyClause {
    /// Canonical lowercase keyword. Aliases fold to their long form
    /// (`pos` is stored as `position`).
    pub name: String,
    /// Operands in the order written.
    pub values: Vec<Value>,
    /// Byte range of the clause in the source text.
    pub span: Span,
}

impl PropertyClause {
    /// Create a clause with an empty span.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
            span: 0..0,
        }
    }

    /// Create a clause that has no operands, e.g. `passable`.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// The single point operand, if this clause has one.
    pub fn point(&self) -> Option<&Point> {
        match self.values.as_slice() {
            [Value::Point(p)] => Some(p),
            _ => None,
        }
    }

    /// Every numeric operand as `f64`, skipping anything that is not a number.
    pub fn numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }
}

/// A typed operand of a property clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// An integer operand (`color 2`).
    Integer(i64),
    /// A floating-point operand. Integer-shaped literals in float
    /// positions are stored here too.
    Float(f64),
    /// A bare alphanumeric word (`name wall1`).
    Word(String),
    /// A path-like reference (`phydrv conveyor`).
    Reference(String),
    /// A 2D or 3D point (`position 1 2 3`).
    Point(Point),
    /// A link endpoint (`to 3`, `from east:f`).
    Teleporter(TeleporterSpec),
    /// A flag specifier (`flag good`, `type GM`).
    Flag(FlagSpec),
    /// Free text running to the end of the line (`death Sunk!`).
    Text(String),
}

impl Value {
    /// The numeric value of an integer or float operand.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Two or three consecutive floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Point {
    /// A 2D point such as a texture coordinate.
    D2([f64; 2]),
    /// A 3D point such as a position or size.
    D3([f64; 3]),
}

impl Point {
    /// The coordinates as a slice of length 2 or 3.
    pub fn coords(&self) -> &[f64] {
        match self {
            Self::D2(c) => c,
            Self::D3(c) => c,
        }
    }
}

/// Which face of a teleporter a link endpoint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Front face, written `f`.
    Front,
    /// Back face, written `b`.
    Back,
    /// Either face, written `?`.
    Either,
    /// Both faces, written `*`.
    Both,
}

impl Side {
    /// The character used for this side in world files.
    pub fn as_char(self) -> char {
        match self {
            Self::Front => 'f',
            Self::Back => 'b',
            Self::Either => '?',
            Self::Both => '*',
        }
    }
}

impl TryFrom<char> for Side {
    type Error = BzwError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'f' | 'F' => Ok(Self::Front),
            'b' | 'B' => Ok(Self::Back),
            '?' => Ok(Self::Either),
            '*' => Ok(Self::Both),
            other => Err(BzwError::UnknownSide(other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The target of a `link` endpoint.
///
/// A purely numeric operand is always an index; anything else is a
/// reference, optionally suffixed with `:` and a side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeleporterSpec {
    /// Teleporter index in file order.
    Index(i64),
    /// A named teleporter reference.
    Named {
        /// Reference text before any side suffix.
        reference: String,
        /// Face selector after the `:`, if present.
        side: Option<Side>,
    },
}

impl TeleporterSpec {
    /// Build a named spec without a side.
    pub fn named(reference: impl Into<String>) -> Self {
        Self::Named {
            reference: reference.into(),
            side: None,
        }
    }
}

/// A zone flag specifier: the `good`/`bad` groups or a short flag code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSpec {
    /// Every good flag.
    Good,
    /// Every bad flag.
    Bad,
    /// A one or two letter flag code such as `GM` or `V`.
    Code(String),
}

/// Whether `s` has the shape of a flag code: one or two ASCII letters.
pub fn is_flag_code(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphabetic())
}

impl FromStr for FlagSpec {
    type Err = BzwError;

    /// `good` and `bad` are checked before the code shape.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("good") {
            Ok(Self::Good)
        } else if s.eq_ignore_ascii_case("bad") {
            Ok(Self::Bad)
        } else if is_flag_code(s) {
            Ok(Self::Code(s.to_string()))
        } else {
            Err(BzwError::InvalidFlagCode(s.to_string()))
        }
    }
}
