//! Tokens and terminal categories.
//!
//! `TokenKind` enumerates every terminal the lexer can emit, in the priority
//! order the tokenizer tries its automata (layout first, then keywords,
//! literals, punctuation, and the generic identifier last, so an equal-length
//! keyword match always beats `Id`). The names produced by
//! [`TokenKind::name`] are the terminal names used by the serialized parsing
//! table.

use std::fmt;

use crate::Position;

/// Identity of one source unit, assigned by the driver.
///
/// Threaded through every token and diagnostic so a batch run can attribute
/// errors to the right file without carrying paths around.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SourceId(pub u32);

macro_rules! token_kinds {
    ( $( $variant:ident => $name:literal, $lexeme:expr; )+ ) => {
        /// Terminal categories of the Joos lexical grammar.
        ///
        /// Declaration order is the tokenizer's automaton priority order.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum TokenKind {
            $( $variant, )+
        }

        impl TokenKind {
            /// Every terminal kind, in automaton priority order.
            pub const ALL: &'static [TokenKind] = &[ $( TokenKind::$variant, )+ ];

            /// The terminal name used by the grammar artifact.
            pub const fn name(self) -> &'static str {
                match self {
                    $( TokenKind::$variant => $name, )+
                }
            }

            /// Look a kind up by its grammar-artifact name.
            pub fn from_name(name: &str) -> Option<TokenKind> {
                match name {
                    $( $name => Some(TokenKind::$variant), )+
                    _ => None,
                }
            }

            /// The exact source text for keyword-like terminals.
            ///
            /// `None` for categories matched by a non-trivial automaton
            /// (literals, identifiers, layout) and for `Eof`.
            pub const fn fixed_lexeme(self) -> Option<&'static str> {
                match self {
                    $( TokenKind::$variant => $lexeme, )+
                }
            }
        }
    };
}

token_kinds! {
    // Layout (suppressed from the emitted stream)
    Whitespace => "WHITESPACE", None;
    Comment => "COMMENT", None;

    // Keywords (all Java 1.3 reserved words, used or not)
    Abstract => "ABSTRACT", Some("abstract");
    Continue => "CONTINUE", Some("continue");
    For => "FOR", Some("for");
    New => "NEW", Some("new");
    Switch => "SWITCH", Some("switch");
    Assert => "ASSERT", Some("assert");
    Default => "DEFAULT", Some("default");
    If => "IF", Some("if");
    Package => "PACKAGE", Some("package");
    Synchronized => "SYNCHRONIZED", Some("synchronized");
    Boolean => "BOOLEAN", Some("boolean");
    Do => "DO", Some("do");
    Goto => "GOTO", Some("goto");
    Private => "PRIVATE", Some("private");
    This => "THIS", Some("this");
    Break => "BREAK", Some("break");
    Double => "DOUBLE", Some("double");
    Implements => "IMPLEMENTS", Some("implements");
    Protected => "PROTECTED", Some("protected");
    Throw => "THROW", Some("throw");
    Byte => "BYTE", Some("byte");
    Else => "ELSE", Some("else");
    Import => "IMPORT", Some("import");
    Public => "PUBLIC", Some("public");
    Throws => "THROWS", Some("throws");
    Case => "CASE", Some("case");
    Enum => "ENUM", Some("enum");
    Instanceof => "INSTANCEOF", Some("instanceof");
    Return => "RETURN", Some("return");
    Transient => "TRANSIENT", Some("transient");
    Catch => "CATCH", Some("catch");
    Extends => "EXTENDS", Some("extends");
    Int => "INT", Some("int");
    Short => "SHORT", Some("short");
    Try => "TRY", Some("try");
    Char => "CHAR", Some("char");
    Final => "FINAL", Some("final");
    Interface => "INTERFACE", Some("interface");
    Static => "STATIC", Some("static");
    Void => "VOID", Some("void");
    Class => "CLASS", Some("class");
    Finally => "FINALLY", Some("finally");
    Long => "LONG", Some("long");
    Strictfp => "STRICTFP", Some("strictfp");
    Volatile => "VOLATILE", Some("volatile");
    Const => "CONST", Some("const");
    Float => "FLOAT", Some("float");
    Native => "NATIVE", Some("native");
    Super => "SUPER", Some("super");
    While => "WHILE", Some("while");

    // Literal keywords
    Null => "NULL", Some("null");
    True => "TRUE", Some("true");
    False => "FALSE", Some("false");

    // Literals with non-trivial automata
    CharLiteral => "CHARLITERAL", None;
    StrLiteral => "STRLITERAL", None;
    IntLiteral => "INTLITERAL", None;

    // Separators
    LParen => "LPAREN", Some("(");
    RParen => "RPAREN", Some(")");
    LBrace => "LBRACE", Some("{");
    RBrace => "RBRACE", Some("}");
    LBracket => "LBRACKET", Some("[");
    RBracket => "RBRACKET", Some("]");
    Semicolon => "SEMICOLON", Some(";");
    Comma => "COMMA", Some(",");
    Dot => "DOT", Some(".");

    // Operators
    Eq => "EQ", Some("=");
    Gt => "GT", Some(">");
    Lt => "LT", Some("<");
    Bang => "BANG", Some("!");
    Tilde => "TILDE", Some("~");
    QMark => "QMARK", Some("?");
    Colon => "COLON", Some(":");
    DEqual => "DEQUAL", Some("==");
    Lte => "LTE", Some("<=");
    Gte => "GTE", Some(">=");
    Neq => "NEQ", Some("!=");
    LogAnd => "LOGAND", Some("&&");
    LogOr => "LOGOR", Some("||");
    PlusPlus => "PP", Some("++");
    MinusMinus => "MM", Some("--");
    Plus => "PLUS", Some("+");
    Minus => "MINUS", Some("-");
    Mult => "MULT", Some("*");
    Div => "DIV", Some("/");
    BitAnd => "BITAND", Some("&");
    BitOr => "BITOR", Some("|");
    BitXor => "BITXOR", Some("^");
    Mod => "MOD", Some("%");
    LShift => "LSHIFT", Some("<<");
    RShift => "RSHIFT", Some(">>");
    URShift => "URSHIFT", Some(">>>");
    PlusEq => "PLUSEQ", Some("+=");
    MinusEq => "MINUSEQ", Some("-=");
    MultEq => "MULTEQ", Some("*=");
    DivEq => "DIVEQ", Some("/=");
    BitAndEq => "BITANDEQ", Some("&=");
    BitOrEq => "BITOREQ", Some("|=");
    BitXorEq => "BITXOREQ", Some("^=");
    ModEq => "MODEQ", Some("%=");
    LShiftEq => "LSHIFTEQ", Some("<<=");
    RShiftEq => "RSHIFTEQ", Some(">>=");
    URShiftEq => "URSHIFTEQ", Some(">>>=");

    // Identifier comes after every fixed-lexeme category so keywords win ties
    Id => "ID", None;

    // Synthetic end-of-input terminal; has no automaton
    Eof => "EOF", None;
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexical token.
///
/// Immutable value record: the source unit it came from, its category, the
/// exact text matched (`lexeme`), an optional decoded payload (`value`, set
/// when transition actions transformed the consumed bytes, e.g. escape
/// decoding in string literals), and the position of its first character.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub source: SourceId,
    pub kind: TokenKind,
    pub lexeme: String,
    pub value: Option<Vec<u8>>,
    pub pos: Position,
}

impl Token {
    /// Create a token without a decoded payload.
    pub fn new(source: SourceId, kind: TokenKind, lexeme: impl Into<String>, pos: Position) -> Self {
        Token {
            source,
            kind,
            lexeme: lexeme.into(),
            value: None,
            pos,
        }
    }

    /// Create a token carrying a decoded payload.
    pub fn with_value(
        source: SourceId,
        kind: TokenKind,
        lexeme: impl Into<String>,
        value: Vec<u8>,
        pos: Position,
    ) -> Self {
        Token {
            source,
            kind,
            lexeme: lexeme.into(),
            value: Some(value),
            pos,
        }
    }

    /// Length of the lexeme in bytes (equals characters for ASCII input).
    #[inline]
    pub fn len(&self) -> usize {
        self.lexeme.len()
    }

    /// True for tokens with an empty lexeme (only the synthetic `Eof`
    /// token when built without its conventional `$` image).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lexeme.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} @ {}", self.kind, self.lexeme, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_round_trip() {
        for &kind in TokenKind::ALL {
            assert_eq!(TokenKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(TokenKind::from_name("NOT_A_TERMINAL"), None);
    }

    #[test]
    fn keywords_have_lowercase_lexemes() {
        assert_eq!(TokenKind::Class.fixed_lexeme(), Some("class"));
        assert_eq!(TokenKind::Instanceof.fixed_lexeme(), Some("instanceof"));
        assert_eq!(TokenKind::URShiftEq.fixed_lexeme(), Some(">>>="));
        assert_eq!(TokenKind::Id.fixed_lexeme(), None);
        assert_eq!(TokenKind::Eof.fixed_lexeme(), None);
    }

    #[test]
    fn identifier_is_tried_after_keywords() {
        let id_index = TokenKind::ALL
            .iter()
            .position(|&k| k == TokenKind::Id)
            .unwrap_or(usize::MAX);
        let class_index = TokenKind::ALL
            .iter()
            .position(|&k| k == TokenKind::Class)
            .unwrap_or(usize::MAX);
        assert!(class_index < id_index);
    }

    #[test]
    fn token_debug_shows_kind_and_position() {
        let tok = Token::new(
            SourceId(0),
            TokenKind::Id,
            "foo",
            Position::new(2, 5),
        );
        assert_eq!(format!("{tok:?}"), "ID \"foo\" @ 2:5");
    }
}
