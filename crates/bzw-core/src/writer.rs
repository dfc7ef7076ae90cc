//! World-file text output.
//!
//! Every model type prints as the world-file text that would parse back to
//! it. Objects print one clause per line, indented four spaces, closed by
//! `end`; documents separate objects with a blank line. Floats use Rust's
//! shortest round-trip formatting, so reparsing yields the same value.
//! Whole floats too large for an integer literal switch to exponent form.

use std::fmt;

use crate::object::{Document, WorldObject};
use crate::property::{FlagSpec, Point, PropertyClause, TeleporterSpec, Value};

const INDENT: &str = "    ";

/// Above this, a whole float printed without an exponent would lex as an
/// out-of-range integer.
const PLAIN_FLOAT_LIMIT: f64 = 1e15;

fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.abs() >= PLAIN_FLOAT_LIMIT {
        write!(f, "{n:e}")
    } else {
        write!(f, "{n}")
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &c) in self.coords().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write_float(f, c)?;
        }
        Ok(())
    }
}

impl fmt::Display for TeleporterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(n) => write!(f, "{n}"),
            Self::Named {
                reference,
                side: Some(side),
            } => write!(f, "{reference}:{side}"),
            Self::Named {
                reference,
                side: None,
            } => f.write_str(reference),
        }
    }
}

impl fmt::Display for FlagSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => f.write_str("good"),
            Self::Bad => f.write_str("bad"),
            Self::Code(code) => f.write_str(code),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write_float(f, *n),
            Self::Word(w) | Self::Reference(w) | Self::Text(w) => f.write_str(w),
            Self::Point(p) => write!(f, "{p}"),
            Self::Teleporter(spec) => write!(f, "{spec}"),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

impl fmt::Display for PropertyClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for value in &self.values {
            // An empty death message prints as the bare keyword.
            if matches!(value, Value::Text(t) if t.is_empty()) {
                continue;
            }
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

impl fmt::Display for WorldObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        for clause in &self.clauses {
            writeln!(f, "{INDENT}{clause}")?;
        }
        writeln!(f, "end")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, object) in self.objects.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{object}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::object::ObjectKind;
    use crate::property::Side;

    proptest! {
        #[test]
        fn float_text_reads_back_exactly(x in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            let text = Value::Float(x).to_string();
            prop_assert_eq!(text.parse::<f64>().unwrap(), x);
            if x.abs() < 1e15 {
                prop_assert!(!text.contains('e'));
            }
        }
    }

    #[test]
    fn writes_object_block() {
        let object = WorldObject::new(ObjectKind::Box)
            .with_clause(PropertyClause::new(
                "position",
                vec![Value::Point(Point::D3([1.0, 2.0, 3.5]))],
            ))
            .with_clause(PropertyClause::new("rotation", vec![Value::Float(45.0)]))
            .with_clause(PropertyClause::flag("drivethrough"));
        assert_eq!(
            object.to_string(),
            "box\n    position 1 2 3.5\n    rotation 45\n    drivethrough\nend\n"
        );
    }

    #[test]
    fn separates_objects_with_blank_line() {
        let doc = Document::new(vec![
            WorldObject::new(ObjectKind::World)
                .with_clause(PropertyClause::new("size", vec![Value::Float(400.0)])),
            WorldObject::new(ObjectKind::WaterLevel)
                .with_clause(PropertyClause::new("height", vec![Value::Float(-1.5)])),
        ]);
        assert_eq!(
            doc.to_string(),
            "world\n    size 400\nend\n\nwaterLevel\n    height -1.5\nend\n"
        );
    }

    #[test]
    fn writes_teleporter_specs() {
        assert_eq!(TeleporterSpec::Index(3).to_string(), "3");
        assert_eq!(TeleporterSpec::named("east").to_string(), "east");
        let spec = TeleporterSpec::Named {
            reference: "0".into(),
            side: Some(Side::Both),
        };
        assert_eq!(spec.to_string(), "0:*");
    }

    #[test]
    fn empty_death_message_prints_bare_keyword() {
        let clause = PropertyClause::new("death", vec![Value::Text(String::new())]);
        assert_eq!(clause.to_string(), "death");
        let clause = PropertyClause::new("death", vec![Value::Text("You drowned".into())]);
        assert_eq!(clause.to_string(), "death You drowned");
    }

    #[test]
    fn writes_flags_and_small_floats() {
        let clause = PropertyClause::new(
            "flag",
            vec![
                Value::Flag(FlagSpec::Good),
                Value::Flag(FlagSpec::Code("GM".into())),
            ],
        );
        assert_eq!(clause.to_string(), "flag good GM");
        assert_eq!(Value::Float(0.000001).to_string(), "0.000001");
    }

    #[test]
    fn huge_floats_use_exponent() {
        assert_eq!(Value::Float(1e20).to_string(), "1e20");
        assert_eq!(Point::D2([-2.5e16, 3.0]).to_string(), "-2.5e16 3");
    }
}
