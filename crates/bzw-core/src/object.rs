use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Span;
use crate::error::BzwError;
use crate::property::{PropertyClause, Value};

/// The kind of a top-level world object, named by its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    /// A curved wall segment or ring (`arc`).
    Arc,
    /// A solid rectangular block (`box`).
    Box,
    /// A team base (`base`).
    Base,
    /// A connection between two teleporter faces (`link`).
    Link,
    /// A named physics driver definition (`physics`).
    Physics,
    /// A four-sided pyramid (`pyramid`).
    Pyramid,
    /// A sphere or hemisphere (`sphere`).
    Sphere,
    /// A teleporter frame (`teleporter`).
    Teleporter,
    /// A tetrahedron given by its vertices (`tetra`).
    Tetra,
    /// The global water plane (`waterLevel`).
    WaterLevel,
    /// A world weapon that fires on a schedule (`weapon`).
    Weapon,
    /// World-wide settings (`world`).
    World,
    /// A spawn or flag zone (`zone`).
    Zone,
}

impl ObjectKind {
    /// Every kind, in the order the top-level grammar tries them.
    pub const ALL: [ObjectKind; 13] = [
        Self::Arc,
        Self::Box,
        Self::Base,
        Self::Link,
        Self::Physics,
        Self::Pyramid,
        Self::Sphere,
        Self::Teleporter,
        Self::Tetra,
        Self::WaterLevel,
        Self::Weapon,
        Self::World,
        Self::Zone,
    ];

    /// The canonical keyword that opens an object of this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Arc => "arc",
            Self::Box => "box",
            Self::Base => "base",
            Self::Link => "link",
            Self::Physics => "physics",
            Self::Pyramid => "pyramid",
            Self::Sphere => "sphere",
            Self::Teleporter => "teleporter",
            Self::Tetra => "tetra",
            Self::WaterLevel => "waterLevel",
            Self::Weapon => "weapon",
            Self::World => "world",
            Self::Zone => "zone",
        }
    }

    /// Look up a kind by keyword, ignoring ASCII case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ObjectKind {
    type Err = BzwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| BzwError::UnknownObjectKind(s.to_string()))
    }
}

/// One object from a world file: its kind and its property clauses in source order.
///
/// Repeated clauses are kept as written. Deciding whether the first or the
/// last `position` counts is up to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    /// Which object this is.
    pub kind: ObjectKind,
    /// Property clauses, in the order they appear.
    pub clauses: Vec<PropertyClause>,
    /// Byte range from the kind keyword through `end`.
    pub span: Span,
}

impl WorldObject {
    /// Create an object with no clauses and an empty span.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            clauses: Vec::new(),
            span: 0..0,
        }
    }

    /// Append a clause, keeping earlier ones untouched.
    pub fn with_clause(mut self, clause: PropertyClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// All clauses with the given canonical name, in source order.
    pub fn clauses_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PropertyClause> {
        self.clauses.iter().filter(move |c| c.name == name)
    }

    /// The first clause with the given canonical name.
    pub fn first(&self, name: &str) -> Option<&PropertyClause> {
        self.clauses.iter().find(|c| c.name == name)
    }

    /// The value of the first `name` clause, if it carries a bare word.
    pub fn name(&self) -> Option<&str> {
        match self.first("name")?.values.first()? {
            Value::Word(w) => Some(w),
            _ => None,
        }
    }
}

/// A whole parsed world file: its objects in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level objects, in the order they appear.
    pub objects: Vec<WorldObject>,
}

impl Document {
    /// Create a document from a list of objects.
    pub fn new(objects: Vec<WorldObject>) -> Self {
        Self { objects }
    }

    /// Number of top-level objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the document holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over the objects in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, WorldObject> {
        self.objects.iter()
    }

    /// All objects of the given kind, in source order.
    pub fn objects_of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter().filter(move |o| o.kind == kind)
    }

    /// Object counts per kind. Kinds that never appear are absent.
    pub fn count_by_kind(&self) -> BTreeMap<ObjectKind, usize> {
        let mut counts = BTreeMap::new();
        for object in &self.objects {
            *counts.entry(object.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Serialize the document as JSON.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a WorldObject;
    type IntoIter = std::slice::Iter<'a, WorldObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
