use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use bzw_core::property::is_flag_code;
use bzw_core::{
    Document, FlagSpec, ObjectKind, Point, PropertyClause, Side, TeleporterSpec, Value, WorldObject,
};

use crate::lexer::Token;

type Span = SimpleSpan;
type Extra<'a> = extra::Err<Rich<'a, Token>>;

/// Parse error with source span.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Byte range where matching stopped.
    pub span: std::ops::Range<usize>,
    /// Human-readable description, naming what was found and what was expected.
    pub message: String,
    /// The tokens or rules that would have been accepted at `span`.
    pub expected: Vec<String>,
    /// Enclosing objects being parsed when the error occurred, innermost last.
    pub context: Vec<String>,
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// A grammar keyword, matched ignoring ASCII case.
fn keyword<'a, I>(k: &'static str) -> impl Parser<'a, I, (), Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    select! { Token::Keyword(ref w) if w.eq_ignore_ascii_case(k) => () }.labelled(k)
}

fn integer<'a, I>() -> impl Parser<'a, I, i64, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    select! { Token::Integer(n) => n }.labelled("integer")
}

/// A float; integer-shaped literals are accepted and widened.
fn number<'a, I>() -> impl Parser<'a, I, f64, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    select! {
        Token::Float(n) => n,
        Token::Integer(n) => n as f64,
    }
    .labelled("number")
}

/// A bare word. Keywords other than `end` count, so `name box` is legal.
fn bare_word<'a, I>() -> impl Parser<'a, I, String, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    select! {
        Token::Word(w) => w,
        Token::Keyword(w) if !w.eq_ignore_ascii_case("end") => w,
    }
    .labelled("word")
}

/// A reference string, or a bare word standing in for one.
fn reference<'a, I>() -> impl Parser<'a, I, String, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    select! {
        Token::Reference(r) => r,
        Token::Word(w) => w,
        Token::Keyword(w) if !w.eq_ignore_ascii_case("end") => w,
    }
    .labelled("reference")
}

fn side<'a, I>() -> impl Parser<'a, I, Side, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    select! { Token::Side(c) => c }
        .try_map(|c, span| Side::try_from(c).map_err(|e| Rich::custom(span, e)))
        .labelled("teleporter side")
}

/// One or two letters, keyword or not.
fn flag_code<'a, I>() -> impl Parser<'a, I, String, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    select! {
        Token::Word(w) if is_flag_code(&w) => w,
        Token::Keyword(w) if is_flag_code(&w) => w,
    }
    .labelled("flag code")
}

/// `good` and `bad` are tried before the short-code shape.
fn flag_spec<'a, I>() -> impl Parser<'a, I, FlagSpec, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        keyword("good").to(FlagSpec::Good),
        keyword("bad").to(FlagSpec::Bad),
        flag_code().map(FlagSpec::Code),
    ))
}

/// An index when the operand is a plain integer, otherwise a reference
/// with an optional `:side`.
fn teleporter_spec<'a, I>() -> impl Parser<'a, I, TeleporterSpec, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        integer().map(TeleporterSpec::Index),
        reference()
            .then(side().or_not())
            .map(|(reference, side)| TeleporterSpec::Named { reference, side }),
    ))
    .labelled("teleporter")
}

// ---------------------------------------------------------------------------
// Operand lists
// ---------------------------------------------------------------------------

fn no_operands<'a, I>() -> impl Parser<'a, I, Vec<Value>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    empty().to(Vec::new())
}

fn one_integer<'a, I>() -> impl Parser<'a, I, Vec<Value>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    integer().map(|n| vec![Value::Integer(n)])
}

fn one_number<'a, I>() -> impl Parser<'a, I, Vec<Value>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    number().map(|n| vec![Value::Float(n)])
}

/// Exactly `count` floats, kept as separate values.
fn numbers<'a, I>(count: usize) -> impl Parser<'a, I, Vec<Value>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    number()
        .map(Value::Float)
        .repeated()
        .exactly(count)
        .collect::<Vec<Value>>()
}

/// One or more integers.
fn integers<'a, I>() -> impl Parser<'a, I, Vec<Value>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    integer()
        .map(Value::Integer)
        .repeated()
        .at_least(1)
        .collect::<Vec<Value>>()
}

fn endpoint<'a, I>() -> impl Parser<'a, I, Vec<Value>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    teleporter_spec().map(|spec| vec![Value::Teleporter(spec)])
}

fn point2<'a, I>() -> impl Parser<'a, I, Vec<Value>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    number()
        .then(number())
        .map(|(x, y)| vec![Value::Point(Point::D2([x, y]))])
}

fn point3<'a, I>() -> impl Parser<'a, I, Vec<Value>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    number()
        .then(number())
        .then(number())
        .map(|((x, y), z)| vec![Value::Point(Point::D3([x, y, z]))])
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

/// A clause opened by `opener` and stored under the canonical `name`.
///
/// Once the keyword matches, a failing operand fails the clause; no other
/// alternative starts with the same keyword.
fn clause<'a, I, K, P>(
    name: &'static str,
    opener: K,
    operands: P,
) -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
    K: Parser<'a, I, (), Extra<'a>> + Clone,
    P: Parser<'a, I, Vec<Value>, Extra<'a>> + Clone,
{
    opener.ignore_then(operands).map_with(move |values, e| {
        let span: Span = e.span();
        PropertyClause {
            name: name.to_string(),
            values,
            span: span.into_range(),
        }
    })
}

/// A clause whose keyword is its name.
fn prop<'a, I, P>(
    name: &'static str,
    operands: P,
) -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
    P: Parser<'a, I, Vec<Value>, Extra<'a>> + Clone,
{
    clause(name, keyword(name), operands)
}

/// A keyword-only clause such as `passable`.
fn bare<'a, I>(name: &'static str) -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    prop(name, no_operands())
}

/// `name <word>`, the free-form metadata clause every kind accepts.
fn name_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    prop("name", bare_word().map(|w| vec![Value::Word(w)]))
}

fn location_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        clause("position", choice((keyword("position"), keyword("pos"))), point3()),
        prop("size", point3()),
        clause("rotation", choice((keyword("rotation"), keyword("rot"))), one_number()),
        prop("shift", point3()),
        prop("scale", point3()),
        prop("shear", point3()),
        prop("spin", point3()),
        name_property(),
    ))
}

fn obstacle_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        bare("drivethrough"),
        bare("shootthrough"),
        bare("passable"),
        location_property(),
    ))
}

fn phydrv<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    prop("phydrv", reference().map(|r| vec![Value::Reference(r)]))
}

// ---------------------------------------------------------------------------
// Per-kind property grammars
// ---------------------------------------------------------------------------

fn pyramid_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((bare("flipz"), obstacle_property()))
}

fn base_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((prop("color", one_integer()), obstacle_property()))
}

fn world_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        prop("size", one_number()),
        prop("flagheight", one_number()),
        name_property(),
    ))
}

fn teleporter_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((prop("border", one_number()), obstacle_property()))
}

fn link_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        prop("to", endpoint()),
        prop("from", endpoint()),
        name_property(),
    ))
}

fn arc_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        prop("divisions", one_integer()),
        prop("angle", one_number()),
        prop("ratio", one_number()),
        prop("texsize", numbers(4)),
        phydrv(),
        bare("smoothbounce"),
        bare("flatshading"),
        obstacle_property(),
    ))
}

fn sphere_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        prop("divisions", one_integer()),
        prop("radius", one_number()),
        clause(
            "hemisphere",
            choice((keyword("hemisphere"), keyword("hemi"))),
            no_operands(),
        ),
        prop("texsize", numbers(2)),
        phydrv(),
        bare("smoothbounce"),
        bare("flatshading"),
        obstacle_property(),
    ))
}

fn tetra_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        prop("vertex", point3()),
        prop("normals", point3()),
        prop("texcoords", point2()),
        obstacle_property(),
    ))
}

fn zone_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        prop(
            "flag",
            flag_spec()
                .map(Value::Flag)
                .repeated()
                .at_least(1)
                .collect::<Vec<Value>>(),
        ),
        prop("team", integers()),
        prop("safety", integers()),
        location_property(),
    ))
}

fn weapon_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((
        prop("initdelay", one_number()),
        prop(
            "delay",
            number()
                .map(Value::Float)
                .repeated()
                .at_least(1)
                .collect::<Vec<Value>>(),
        ),
        prop(
            "type",
            flag_code().map(|code| vec![Value::Flag(FlagSpec::Code(code))]),
        ),
        location_property(),
    ))
}

fn water_level_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    choice((prop("height", one_number()), name_property()))
}

fn physics_property<'a, I>() -> impl Parser<'a, I, PropertyClause, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    let message = select! { Token::Text(t) => t }
        .or_not()
        .map(|text| vec![Value::Text(text.unwrap_or_default())]);
    choice((
        prop("linear", point3()),
        prop("angular", point3()),
        prop("slide", one_number()),
        prop("death", message),
        name_property(),
    ))
}

// ---------------------------------------------------------------------------
// Objects and documents
// ---------------------------------------------------------------------------

/// `<kind> <property>+ end`. The `end` keyword is consumed and dropped.
fn object<'a, I, P>(
    kind: ObjectKind,
    property: P,
) -> impl Parser<'a, I, WorldObject, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
    P: Parser<'a, I, PropertyClause, Extra<'a>> + Clone,
{
    keyword(kind.keyword())
        .ignore_then(property.repeated().at_least(1).collect::<Vec<_>>())
        .then_ignore(keyword("end"))
        .map_with(move |clauses, e| {
            let span: Span = e.span();
            log::trace!("recognized {kind} with {} clauses at {span:?}", clauses.len());
            WorldObject {
                kind,
                clauses,
                span: span.into_range(),
            }
        })
        .labelled(kind.keyword())
        .as_context()
}

/// Build the full document parser: one or more objects, then end of input.
fn document_parser<'a, I>() -> impl Parser<'a, I, Document, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    let world_object = choice((
        object(ObjectKind::Arc, arc_property()),
        object(ObjectKind::Box, obstacle_property()),
        object(ObjectKind::Base, base_property()),
        object(ObjectKind::Link, link_property()),
        object(ObjectKind::Physics, physics_property()),
        object(ObjectKind::Pyramid, pyramid_property()),
        object(ObjectKind::Sphere, sphere_property()),
        object(ObjectKind::Teleporter, teleporter_property()),
        object(ObjectKind::Tetra, tetra_property()),
        object(ObjectKind::WaterLevel, water_level_property()),
        object(ObjectKind::Weapon, weapon_property()),
        object(ObjectKind::World, world_property()),
        object(ObjectKind::Zone, zone_property()),
    ));

    world_object
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(Document::new)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a token stream into a [`Document`].
///
/// The whole stream must be consumed. On failure no partial document is
/// returned.
pub fn parse(tokens: &[(Token, std::ops::Range<usize>)]) -> Result<Document, Vec<ParseError>> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), Span::from(span.clone())));

    let len = tokens.last().map_or(0, |(_, s)| s.end);
    let eoi: Span = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = document_parser().parse(stream).into_output_errors();

    match output {
        Some(document) if errors.is_empty() => Ok(document),
        _ => Err(errors.into_iter().map(to_parse_error).collect()),
    }
}

fn to_parse_error(e: Rich<'_, Token>) -> ParseError {
    ParseError {
        span: e.span().into_range(),
        message: e.to_string(),
        expected: e.expected().map(ToString::to_string).collect(),
        context: e
            .contexts()
            .map(|(label, span)| format!("{label} at {}", span.into_range().start))
            .collect(),
    }
}
