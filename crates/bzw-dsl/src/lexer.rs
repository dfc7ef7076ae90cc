use logos::Logos;
use std::fmt;

/// Token type for BZFlag world files.
///
/// Number, word, and reference lexemes compete for the same text. Equal-length
/// matches resolve in that order, so `12` is a number and `wall` is a word;
/// anything containing `/:*_?` can only be a reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A grammar keyword, in its original spelling. Matching is
    /// case-insensitive and happens in the parser.
    Keyword(String),
    /// Signed integer literal with no fraction or exponent.
    Integer(i64),
    /// Signed literal with a fraction and/or exponent.
    Float(f64),
    /// Bare alphanumeric word that is not a keyword. Digits right after
    /// `name` or `phydrv` also lex as a word.
    Word(String),
    /// Path-like string over letters, digits, and `/:*_?`.
    Reference(String),
    /// Teleporter side split off a reference (`f`, `b`, `?`, `*`), lowercased.
    Side(char),
    /// Rest-of-line text following `death`. Displays as a short preview.
    Text(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(k) => write!(f, "{k}"),
            Token::Integer(n) => write!(f, "{n}"),
            Token::Float(n) => write!(f, "{n}"),
            Token::Word(w) => write!(f, "{w}"),
            Token::Reference(r) => write!(f, "{r}"),
            Token::Side(c) => write!(f, ":{c}"),
            Token::Text(t) if t.chars().count() > TEXT_PREVIEW => {
                let preview: String = t.chars().take(TEXT_PREVIEW).collect();
                write!(f, "{preview}...")
            }
            Token::Text(t) => write!(f, "{t}"),
        }
    }
}

/// Characters of a `death` message shown when the token is displayed.
const TEXT_PREVIEW: usize = 20;

/// Words the grammar gives meaning to. Compared ignoring ASCII case.
const KEYWORDS: &[&str] = &[
    // object kinds
    "arc",
    "box",
    "base",
    "link",
    "physics",
    "pyramid",
    "sphere",
    "teleporter",
    "tetra",
    "waterlevel",
    "weapon",
    "world",
    "zone",
    "end",
    // location and obstacle properties
    "name",
    "position",
    "pos",
    "size",
    "rotation",
    "rot",
    "shift",
    "scale",
    "shear",
    "spin",
    "drivethrough",
    "shootthrough",
    "passable",
    // per-kind properties
    "flipz",
    "color",
    "flagheight",
    "border",
    "to",
    "from",
    "divisions",
    "angle",
    "ratio",
    "texsize",
    "phydrv",
    "smoothbounce",
    "flatshading",
    "hemisphere",
    "hemi",
    "radius",
    "vertex",
    "normals",
    "texcoords",
    "flag",
    "team",
    "safety",
    "initdelay",
    "delay",
    "type",
    "height",
    "linear",
    "angular",
    "slide",
    "death",
    "good",
    "bad",
];

/// Keywords whose operand is a single bare word or reference. An
/// alphanumeric number lexeme after one of these stays a word, so
/// `name 007` keeps its spelling.
const WORD_OPERAND_KEYWORDS: &[&str] = &["name", "phydrv"];

/// Keywords whose operand may be spelled like any other keyword. A `death`
/// right after one of these is an operand and takes no message.
const OPERAND_KEYWORDS: &[&str] = &["name", "phydrv", "to", "from"];

fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Whether the last token is one of `keywords`.
fn follows(tokens: &[(Token, std::ops::Range<usize>)], keywords: &[&str]) -> bool {
    matches!(
        tokens.last(),
        Some((Token::Keyword(k), _)) if keywords.iter().any(|w| w.eq_ignore_ascii_case(k))
    )
}

/// Raw lexeme classes. Slices are read from the lexer and turned into
/// owned `Token`s as they are produced.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
enum RawToken {
    #[regex(r"[+-]?[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", priority = 5)]
    Number,

    #[regex(r"[a-zA-Z0-9]+", priority = 4)]
    Word,

    #[regex(r"[a-zA-Z0-9/:*_?]+", priority = 3)]
    Reference,
}

/// A lexer error with source location.
#[derive(Debug, Clone)]
pub struct LexError {
    /// Byte range of the erroneous input in the source.
    pub span: std::ops::Range<usize>,
    /// Human-readable description of the lexer error.
    pub message: String,
}

/// Lex source code into a sequence of `(Token, Span)` pairs.
///
/// Returns the token stream and any lexer errors. Lexing continues past errors
/// so every bad character is reported at once.
pub fn lex(source: &str) -> (Vec<(Token, std::ops::Range<usize>)>, Vec<LexError>) {
    let mut tokens: Vec<(Token, std::ops::Range<usize>)> = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(RawToken::Number) => {
                let raw = lexer.slice();
                let word_shaped = raw.bytes().all(|b| b.is_ascii_alphanumeric());
                if word_shaped && follows(&tokens, WORD_OPERAND_KEYWORDS) {
                    tokens.push((Token::Word(raw.to_string()), span));
                    continue;
                }
                match number_token(raw) {
                    Ok(token) => tokens.push((token, span)),
                    Err(message) => errors.push(LexError { span, message }),
                }
            }
            Ok(RawToken::Word) => {
                let word = lexer.slice();
                if !is_keyword(word) {
                    tokens.push((Token::Word(word.to_string()), span));
                    continue;
                }
                let opens_message =
                    word.eq_ignore_ascii_case("death") && !follows(&tokens, OPERAND_KEYWORDS);
                tokens.push((Token::Keyword(word.to_string()), span.clone()));
                let message = opens_message
                    .then(|| rest_of_line(lexer.remainder()))
                    .flatten();
                if let Some((text, offset)) = message {
                    let start = span.end + offset;
                    tokens.push((Token::Text(text.to_string()), start..start + text.len()));
                    lexer.bump(offset + text.len());
                }
            }
            Ok(RawToken::Reference) => {
                let slice = lexer.slice();
                match split_side(slice) {
                    Some((reference, side)) => {
                        let side_start = span.end - 1;
                        tokens.push((
                            Token::Reference(reference.to_string()),
                            span.start..span.start + reference.len(),
                        ));
                        tokens.push((Token::Side(side), side_start..span.end));
                    }
                    None => tokens.push((Token::Reference(slice.to_string()), span)),
                }
            }
            Err(()) => {
                errors.push(LexError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span]),
                });
            }
        }
    }

    log::debug!("lexed {} tokens, {} errors", tokens.len(), errors.len());
    (tokens, errors)
}

/// Classify a numeric lexeme: no fraction and no exponent means integer.
fn number_token(raw: &str) -> Result<Token, String> {
    if raw.contains(['.', 'e', 'E']) {
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Float(n)),
            Ok(_) => Err(format!("float literal out of range: {raw}")),
            Err(_) => Err(format!("invalid float literal: {raw}")),
        }
    } else {
        raw.parse::<i64>()
            .map(Token::Integer)
            .map_err(|_| format!("integer literal out of range: {raw}"))
    }
}

/// Split `name:s` into the reference and its side character.
fn split_side(slice: &str) -> Option<(&str, char)> {
    let (reference, suffix) = slice.rsplit_once(':')?;
    let mut chars = suffix.chars();
    let side = chars.next()?.to_ascii_lowercase();
    if reference.is_empty() || chars.next().is_some() || !matches!(side, 'f' | 'b' | '?' | '*') {
        return None;
    }
    Some((reference, side))
}

/// Trimmed text up to the end of the line or a comment, with its offset
/// into `remainder`. `None` when nothing but whitespace is left.
fn rest_of_line(remainder: &str) -> Option<(&str, usize)> {
    let line = remainder.split('\n').next().unwrap_or_default();
    let line = line.split('#').next().unwrap_or_default();
    let text = line.trim();
    if text.is_empty() {
        return None;
    }
    let offset = line.len() - line.trim_start().len();
    Some((text, offset))
}
