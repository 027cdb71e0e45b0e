use std::rc::Rc;

use logos::Logos;

/// A location in rill source code: file name plus 1-indexed line and
/// column.
///
/// Positions are attached to every token and flow from there into AST
/// nodes and error messages. The file name is shared behind an `Rc` so
/// cloning a position is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// The source file name, or `"<repl>"` for interactive input.
    pub file:   Rc<str>,
    /// 1-indexed source line.
    pub line:   u32,
    /// 1-indexed source column.
    pub column: u32,
}

impl Position {
    /// Creates a position from its parts.
    #[must_use]
    pub fn new(file: &Rc<str>, line: u32, column: u32) -> Self {
        Self { file: Rc::clone(file),
               line,
               column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.file.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the
/// lexer. This enum defines all recognized tokens in the language;
/// literal tokens carry their decoded payload.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Floating-point literal tokens, such as `3.14`. A fractional part
    /// is required; exponents are not supported.
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_int)]
    Int(i64),
    /// String literal tokens. The payload has escape sequences already
    /// processed; `${...}` interpolation markers are kept verbatim for
    /// the parser's interpolation pass.
    #[regex(r#""([^"\\]|\\.)*""#, parse_string)]
    Str(String),
    /// Boolean literal tokens, `true` or `false`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// `let`
    #[token("let")]
    Let,
    /// `mut`
    #[token("mut")]
    Mut,
    /// `fn`
    #[token("fn")]
    Fn,
    /// `return`
    #[token("return")]
    Return,
    /// `if`
    #[token("if")]
    If,
    /// `elif`
    #[token("elif")]
    Elif,
    /// `else`
    #[token("else")]
    Else,
    /// `loop`
    #[token("loop")]
    Loop,
    /// `in`
    #[token("in")]
    In,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `match`
    #[token("match")]
    Match,
    /// `none`
    #[token("none")]
    NoneLit,
    /// `test`
    #[token("test")]
    Test,
    /// `step`
    #[token("step")]
    Step,
    /// `import` — reserved; there is no grammar production for it yet.
    #[token("import")]
    Import,
    /// Identifier tokens; variable or function names such as `x` or
    /// `total_count`. The lone underscore `_` is a valid identifier and
    /// doubles as the match wildcard.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// `==`
    #[token("==")]
    EqEq,
    /// `!=`
    #[token("!=")]
    NotEq,
    /// `<=`
    #[token("<=")]
    LessEq,
    /// `>=`
    #[token(">=")]
    GreaterEq,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `|>`
    #[token("|>")]
    PipeArrow,
    /// `..`
    #[token("..")]
    DotDot,
    /// `=>`
    #[token("=>")]
    FatArrow,
    /// `??`
    #[token("??")]
    Coalesce,
    /// `?.`
    #[token("?.")]
    SafeDot,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `=`
    #[token("=")]
    Assign,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Bang,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `:`
    #[token(":")]
    Colon,
    /// `?` — recognized but currently has no grammar production.
    #[token("?")]
    Question,

    /// Statement separator: a literal newline or a `;`. The newline form
    /// advances the line counter.
    #[token("\n", newline)]
    #[token(";")]
    Newline,
    /// Spaces, tabs, carriage returns and form feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,

    /// End of input. Appended by [`scan`]. NUL never occurs in text
    /// sources, so the automaton itself cannot produce this variant.
    #[token("\u{0}")]
    Eof,
    /// An unrecognized character sequence. Non-ASCII input matches here
    /// directly; ASCII characters outside the operator set are mapped
    /// here by [`scan`]. Scanning continues past either.
    #[regex(r"[^\x00-\x7F]+", |lex| lex.slice().to_string())]
    Illegal(String),
}

impl Token {
    /// Returns the human-readable name of the token kind, used in parser
    /// diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Float(v) => format!("float '{v}'"),
            Self::Int(v) => format!("int '{v}'"),
            Self::Str(_) => "string literal".to_string(),
            Self::Bool(v) => format!("'{v}'"),
            Self::Ident(name) => format!("identifier '{name}'"),
            Self::Illegal(lexeme) => format!("illegal character '{lexeme}'"),
            Self::Newline => "newline".to_string(),
            Self::Eof => "end of input".to_string(),
            Self::Let => "'let'".to_string(),
            Self::Mut => "'mut'".to_string(),
            Self::Fn => "'fn'".to_string(),
            Self::Return => "'return'".to_string(),
            Self::If => "'if'".to_string(),
            Self::Elif => "'elif'".to_string(),
            Self::Else => "'else'".to_string(),
            Self::Loop => "'loop'".to_string(),
            Self::In => "'in'".to_string(),
            Self::Break => "'break'".to_string(),
            Self::Continue => "'continue'".to_string(),
            Self::Match => "'match'".to_string(),
            Self::NoneLit => "'none'".to_string(),
            Self::Test => "'test'".to_string(),
            Self::Step => "'step'".to_string(),
            Self::Import => "'import'".to_string(),
            Self::EqEq => "'=='".to_string(),
            Self::NotEq => "'!='".to_string(),
            Self::LessEq => "'<='".to_string(),
            Self::GreaterEq => "'>='".to_string(),
            Self::AndAnd => "'&&'".to_string(),
            Self::OrOr => "'||'".to_string(),
            Self::PipeArrow => "'|>'".to_string(),
            Self::DotDot => "'..'".to_string(),
            Self::FatArrow => "'=>'".to_string(),
            Self::Coalesce => "'??'".to_string(),
            Self::SafeDot => "'?.'".to_string(),
            Self::Plus => "'+'".to_string(),
            Self::Minus => "'-'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Slash => "'/'".to_string(),
            Self::Percent => "'%'".to_string(),
            Self::Assign => "'='".to_string(),
            Self::Less => "'<'".to_string(),
            Self::Greater => "'>'".to_string(),
            Self::Bang => "'!'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::LBracket => "'['".to_string(),
            Self::RBracket => "']'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Dot => "'.'".to_string(),
            Self::Colon => "':'".to_string(),
            Self::Question => "'?'".to_string(),
            Self::Comment | Self::Ignored => "skipped".to_string(),
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset where that line
/// starts, so column numbers can be derived from token spans.
pub struct LexerExtras {
    /// The current 1-indexed line number.
    pub line:       u32,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// Scans an entire source string into a positioned token sequence.
///
/// The returned sequence is always terminated by [`Token::Eof`].
/// Unrecognized characters become [`Token::Illegal`] and scanning
/// continues; the scanner itself never fails.
///
/// # Parameters
/// - `source`: The source text.
/// - `file`: File name attached to every position (use `"<repl>"` for
///   interactive input).
///
/// # Returns
/// The tokens paired with their 1-indexed positions.
#[must_use]
pub fn scan(source: &str, file: &str) -> Vec<(Token, Position)> {
    let file: Rc<str> = Rc::from(file);
    let mut lexer = Token::lexer_with_extras(source, LexerExtras::default());
    let mut tokens = Vec::new();

    loop {
        // Snapshot before `next()`: multi-line string callbacks advance
        // the line counter past the token's own start.
        let line = lexer.extras.line;
        let line_start = lexer.extras.line_start;

        let Some(result) = lexer.next() else { break };

        let column = (lexer.span().start - line_start + 1) as u32;
        let pos = Position::new(&file, line, column);
        match result {
            Ok(token) => tokens.push((token, pos)),
            Err(()) => tokens.push((Token::Illegal(lexer.slice().to_string()), pos)),
        }
    }

    let column = (source.len() - lexer.extras.line_start + 1) as u32;
    tokens.push((Token::Eof, Position::new(&file, lexer.extras.line, column)));
    tokens
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice. Fails (and so
/// yields an illegal token) when the literal overflows `i64`.
fn parse_int(lex: &mut logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Decodes a string literal: strips the surrounding quotes, processes the
/// escape sequences `\n`, `\t`, `\"` and `\\`, and advances the line
/// counter for every raw newline inside the literal.
///
/// Unknown escapes keep the backslash verbatim. `${...}` interpolation
/// markers are left untouched for the parser.
fn parse_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    for (offset, byte) in slice.bytes().enumerate() {
        if byte == b'\n' {
            lex.extras.line += 1;
            lex.extras.line_start = lex.span().start + offset + 1;
        }
    }

    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            decoded.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => decoded.push('\n'),
            Some('t') => decoded.push('\t'),
            Some('"') => decoded.push('"'),
            Some('\\') => decoded.push('\\'),
            Some(other) => {
                decoded.push('\\');
                decoded.push(other);
            },
            None => decoded.push('\\'),
        }
    }
    decoded
}

/// Advances the line counter at a literal newline.
fn newline(lex: &mut logos::Lexer<Token>) {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        scan(source, "test").into_iter().map(|(tok, _)| tok).collect()
    }

    #[test]
    fn scans_simple_let_statement() {
        let tokens = kinds("let five = 5");
        assert_eq!(tokens,
                   vec![Token::Let,
                        Token::Ident("five".to_string()),
                        Token::Assign,
                        Token::Int(5),
                        Token::Eof,]);
    }

    #[test]
    fn last_token_is_always_eof() {
        for source in ["", "   ", "let x = 1\n", "@@@"] {
            let tokens = scan(source, "test");
            assert_eq!(tokens.last().unwrap().0, Token::Eof, "source: {source:?}");
        }
    }

    #[test]
    fn scans_multi_character_operators_with_longest_match() {
        let tokens = kinds("== != <= >= && || |> .. => ?? ?.");
        assert_eq!(tokens,
                   vec![Token::EqEq,
                        Token::NotEq,
                        Token::LessEq,
                        Token::GreaterEq,
                        Token::AndAnd,
                        Token::OrOr,
                        Token::PipeArrow,
                        Token::DotDot,
                        Token::FatArrow,
                        Token::Coalesce,
                        Token::SafeDot,
                        Token::Eof,]);
    }

    #[test]
    fn keywords_are_not_identifiers() {
        let tokens = kinds("let letter in inner");
        assert_eq!(tokens,
                   vec![Token::Let,
                        Token::Ident("letter".to_string()),
                        Token::In,
                        Token::Ident("inner".to_string()),
                        Token::Eof,]);
    }

    #[test]
    fn int_followed_by_range_is_not_a_float() {
        let tokens = kinds("0..10");
        assert_eq!(tokens,
                   vec![Token::Int(0), Token::DotDot, Token::Int(10), Token::Eof]);
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = scan("let x = 1\n  x + 2", "test");
        let positions: Vec<(u32, u32)> =
            tokens.iter().map(|(_, p)| (p.line, p.column)).collect();
        assert_eq!(positions,
                   vec![(1, 1), // let
                        (1, 5), // x
                        (1, 7), // =
                        (1, 9), // 1
                        (1, 10), // newline
                        (2, 3), // x
                        (2, 5), // +
                        (2, 7), // 2
                        (2, 8),]); // eof
        for (_, pos) in &tokens {
            assert!(pos.line >= 1 && pos.column >= 1);
        }
    }

    #[test]
    fn semicolon_is_a_statement_separator() {
        let tokens = kinds("1; 2");
        assert_eq!(tokens,
                   vec![Token::Int(1), Token::Newline, Token::Int(2), Token::Eof]);
    }

    #[test]
    fn comments_run_to_end_of_line() {
        let tokens = kinds("1 // ignored ?? @@\n2");
        assert_eq!(tokens,
                   vec![Token::Int(1), Token::Newline, Token::Int(2), Token::Eof]);
    }

    #[test]
    fn string_escapes_are_decoded() {
        let tokens = kinds(r#""a\nb\t\"c\"\\d""#);
        assert_eq!(tokens,
                   vec![Token::Str("a\nb\t\"c\"\\d".to_string()), Token::Eof]);
    }

    #[test]
    fn interpolation_marker_survives_lexing() {
        let tokens = kinds(r#""hi ${name}!""#);
        assert_eq!(tokens,
                   vec![Token::Str("hi ${name}!".to_string()), Token::Eof]);
    }

    #[test]
    fn unknown_characters_become_illegal_tokens() {
        let tokens = kinds("1 @ 2");
        assert_eq!(tokens,
                   vec![Token::Int(1),
                        Token::Illegal("@".to_string()),
                        Token::Int(2),
                        Token::Eof,]);
    }

    #[test]
    fn multi_line_string_advances_line_counter() {
        let tokens = scan("\"a\nb\" x", "test");
        assert_eq!(tokens[0].0, Token::Str("a\nb".to_string()));
        let (ident, pos) = &tokens[1];
        assert_eq!(*ident, Token::Ident("x".to_string()));
        assert_eq!((pos.line, pos.column), (2, 4));
    }
}
