//! Integration tests for parsing BZW world files.
use bzw_core::{Document, FlagSpec, ObjectKind, Point, Side, TeleporterSpec, Value};
use bzw_dsl::parse_source;
use proptest::prelude::*;

/// One small valid object per kind, with the number of clauses it holds.
const MINIMAL: [(ObjectKind, &str, usize); 13] = [
    (ObjectKind::Arc, "arc divisions 16 angle 90 end", 2),
    (ObjectKind::Box, "box position 0 0 0 size 1 1 1 rotation 0 end", 3),
    (ObjectKind::Base, "base color 1 position 0 0 0 end", 2),
    (ObjectKind::Link, "link to 0 from 1 end", 2),
    (ObjectKind::Physics, "physics linear 1 0 0 end", 1),
    (ObjectKind::Pyramid, "pyramid flipz end", 1),
    (ObjectKind::Sphere, "sphere radius 5 end", 1),
    (ObjectKind::Teleporter, "teleporter border 1 end", 1),
    (
        ObjectKind::Tetra,
        "tetra vertex 0 0 0 vertex 1 0 0 vertex 0 1 0 vertex 0 0 1 end",
        4,
    ),
    (ObjectKind::WaterLevel, "waterLevel height -1 end", 1),
    (ObjectKind::Weapon, "weapon type V end", 1),
    (ObjectKind::World, "world size 400 end", 1),
    (ObjectKind::Zone, "zone team 1 end", 1),
];

const SAMPLE: &str = r#"# Sample map
world
  name sample
  size 400
  flagHeight 10
end

box
  pos -10 20.5 0
  size 5 5 10
  rot 45
  drivethrough
end

pyramid position 0 0 0 size 1 1 2 flipz end

teleporter
  name eastport
  position 100 0 0
  border 1.12
end

link from eastport:f to maps/west_1:? end
link from 0 to 1 end

base color 1 position -180 0 0 size 20 20 0.5 end

arc divisions 32 angle 270 ratio 0.25 texsize 1 1 2 2 phydrv belt smoothbounce end
sphere radius 12 hemisphere texsize 4 4 flatshading end
tetra vertex 0 0 0 vertex 1 0 0 vertex 0 1 0 vertex 0 0 1 normals 0 0 1 texcoords 0 1 end

zone position 0 0 0 size 10 10 1 flag good bad GM V team 1 2 safety 3 end
weapon position 0 0 10 initdelay 2 delay 1 2.5 type SW end
waterLevel height -1.5 end

physics
  name belt
  linear 0 1e1 0
  angular 0.5 0 0
  slide 2
  death Swept away!   # message ends before the comment
end
"#;

fn without_spans(mut doc: Document) -> Document {
    for object in &mut doc.objects {
        object.span = 0..0;
        for clause in &mut object.clauses {
            clause.span = 0..0;
        }
    }
    doc
}

// ---------------------------------------------------------------------------
// Object kinds
// ---------------------------------------------------------------------------

#[test]
fn every_kind_parses_on_its_own() {
    for (kind, source, clauses) in MINIMAL {
        let doc = parse_source(source).unwrap_or_else(|e| panic!("{source}: {e:?}"));
        assert_eq!(doc.len(), 1, "{source}");
        assert_eq!(doc.objects[0].kind, kind, "{source}");
        assert_eq!(doc.objects[0].clauses.len(), clauses, "{source}");
    }
}

#[test]
fn kinds_in_sequence_keep_source_order() {
    let source: Vec<&str> = MINIMAL.iter().map(|(_, s, _)| *s).collect();
    let doc = parse_source(&source.join("\n")).unwrap();
    let kinds: Vec<ObjectKind> = doc.iter().map(|o| o.kind).collect();
    assert_eq!(kinds, ObjectKind::ALL.to_vec());
}

#[test]
fn dropping_any_end_fails() {
    for skip in 0..MINIMAL.len() {
        let source: Vec<&str> = MINIMAL
            .iter()
            .enumerate()
            .map(|(i, &(_, s, _))| if i == skip { s.trim_end_matches(" end") } else { s })
            .collect();
        let source = source.join("\n");
        assert!(parse_source(&source).is_err(), "accepted without end: {source}");
    }
}

#[test]
fn kind_keywords_ignore_case() {
    let doc = parse_source("WATERLEVEL HEIGHT 2 END Box Size 1 1 1 End").unwrap();
    assert_eq!(doc.objects[0].kind, ObjectKind::WaterLevel);
    assert_eq!(doc.objects[1].kind, ObjectKind::Box);
}

// ---------------------------------------------------------------------------
// Worked examples
// ---------------------------------------------------------------------------

#[test]
fn box_with_position_and_size() {
    let doc = parse_source("box position 1 2 3 size 1 1 1 end").unwrap();
    let object = &doc.objects[0];
    assert_eq!(object.kind, ObjectKind::Box);
    assert_eq!(object.clauses.len(), 2);
    assert_eq!(object.first("position").and_then(|c| c.point()), Some(&Point::D3([1.0, 2.0, 3.0])));
    assert_eq!(object.first("size").and_then(|c| c.point()), Some(&Point::D3([1.0, 1.0, 1.0])));
}

#[test]
fn teleporter_then_link_with_side() {
    let doc = parse_source("teleporter border 2.5 end link to 0:f from 3 end").unwrap();
    assert_eq!(doc.objects[0].kind, ObjectKind::Teleporter);
    let link = &doc.objects[1];
    assert_eq!(
        link.first("to").unwrap().values,
        vec![Value::Teleporter(TeleporterSpec::Named {
            reference: "0".into(),
            side: Some(Side::Front),
        })]
    );
    assert_eq!(
        link.first("from").unwrap().values,
        vec![Value::Teleporter(TeleporterSpec::Index(3))]
    );
}

#[test]
fn object_without_clauses_fails() {
    assert!(parse_source("box end").is_err());
}

#[test]
fn comment_swallowing_end_fails() {
    assert!(parse_source("box\n  size 1 1 1 # close it: end\n").is_err());
}

#[test]
fn trailing_text_fails() {
    let diags = parse_source("world size 400 end\nthis is not an object").unwrap_err();
    assert_eq!(diags[0].span.start, 19);
}

// ---------------------------------------------------------------------------
// Operand shapes
// ---------------------------------------------------------------------------

#[test]
fn digit_targets_are_indices_and_others_are_references() {
    let doc = parse_source("link to 7 from tele7 end").unwrap();
    let link = &doc.objects[0];
    assert_eq!(
        link.first("to").unwrap().values,
        vec![Value::Teleporter(TeleporterSpec::Index(7))]
    );
    assert_eq!(
        link.first("from").unwrap().values,
        vec![Value::Teleporter(TeleporterSpec::named("tele7"))]
    );
}

#[test]
fn flag_literals_win_over_codes() {
    let doc = parse_source("zone flag good bad gd end").unwrap();
    assert_eq!(
        doc.objects[0].first("flag").unwrap().values,
        vec![
            Value::Flag(FlagSpec::Good),
            Value::Flag(FlagSpec::Bad),
            Value::Flag(FlagSpec::Code("gd".into())),
        ]
    );
}

#[test]
fn lexical_errors_are_reported_with_position() {
    let diags = parse_source("box size 1 1 1 end\nbox size 2 ; 2 2 end").unwrap_err();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].span, 30..31);
    assert!(diags[0].message.contains("unexpected character"));
}

#[test]
fn every_literal_form_is_a_number() {
    for (literal, expected) in [
        ("3", 3.0),
        ("+4E-1", 0.4),
        ("3e2", 300.0),
        ("-7.", -7.0),
        ("+2.5e+1", 25.0),
    ] {
        let doc = parse_source(&format!("waterLevel height {literal} end")).unwrap();
        assert_eq!(doc.objects[0].clauses[0].values, vec![Value::Float(expected)], "{literal}");
    }
}

#[test]
fn operand_words_may_look_like_numbers_or_keywords() {
    let doc = parse_source("box name death position 0 0 0 end
sphere radius 1 phydrv 007 name 42 end")
        .unwrap();
    assert_eq!(doc.objects[0].name(), Some("death"));
    assert_eq!(doc.objects[0].clauses.len(), 2);
    assert_eq!(
        doc.objects[1].first("phydrv").unwrap().values,
        vec![Value::Reference("007".into())]
    );
    assert_eq!(doc.objects[1].name(), Some("42"));

    let reread = parse_source(&doc.to_string()).unwrap();
    assert_eq!(without_spans(reread), without_spans(doc));
}

// ---------------------------------------------------------------------------
// Writing and reading back
// ---------------------------------------------------------------------------

#[test]
fn sample_map_parses() {
    let doc = parse_source(SAMPLE).unwrap();
    assert_eq!(doc.len(), 14);
    assert_eq!(doc.objects_of_kind(ObjectKind::Link).count(), 2);

    let physics = doc.objects_of_kind(ObjectKind::Physics).next().unwrap();
    assert_eq!(physics.name(), Some("belt"));
    assert_eq!(
        physics.first("death").unwrap().values,
        vec![Value::Text("Swept away!".into())]
    );
    assert_eq!(
        physics.first("linear").and_then(|c| c.point()),
        Some(&Point::D3([0.0, 10.0, 0.0]))
    );
}

#[test]
fn written_document_reads_back_the_same() {
    let doc = parse_source(SAMPLE).unwrap();
    let text = doc.to_string();
    let reread = parse_source(&text).unwrap_or_else(|e| panic!("{text}\n{e:?}"));
    assert_eq!(without_spans(reread), without_spans(doc));
}

/// Signed or unsigned, with or without a fraction, with an optional
/// exponent in either case: `3`, `+4E-1`, `-7.`, `3e2`, `0.125e+3`.
fn float_literal() -> impl Strategy<Value = String> {
    proptest::string::string_regex(r"[+-]?[0-9]{1,5}(\.[0-9]{0,4})?([eE][+-]?[0-9]{1,2})?")
        .unwrap()
}

proptest! {
    #[test]
    fn float_literals_parse_to_their_value(literal in float_literal()) {
        let expected: f64 = literal.parse().unwrap();
        let doc = parse_source(&format!("world size {literal} end")).unwrap();
        prop_assert_eq!(&doc.objects[0].clauses[0].values, &vec![Value::Float(expected)]);
    }

    #[test]
    fn written_points_read_back_exactly(
        x in proptest::num::f64::NORMAL | proptest::num::f64::ZERO,
        y in proptest::num::f64::NORMAL | proptest::num::f64::ZERO,
        z in proptest::num::f64::NORMAL | proptest::num::f64::ZERO,
    ) {
        let source = format!("box position {} end", Point::D3([x, y, z]));
        let doc = parse_source(&source).unwrap();
        prop_assert_eq!(doc.objects[0].clauses[0].point(), Some(&Point::D3([x, y, z])));
    }
}
