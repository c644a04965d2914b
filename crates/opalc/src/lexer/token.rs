//! Token definitions for the Opal lexer

use crate::common::Span;
use crate::types::Type;
use logos::Logos;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All token kinds in Opal
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]  // Skip whitespace
#[logos(skip r"//[^\n]*")]      // Skip line comments
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")] // Skip block comments
pub enum TokenKind {
    // === Type keywords ===
    #[token("void")]
    Void,
    #[token("bool")]
    Bool,
    #[token("byte")]
    Byte,
    #[token("ubyte")]
    UByte,
    #[token("short")]
    Short,
    #[token("ushort")]
    UShort,
    #[token("int")]
    Int,
    #[token("uint")]
    UInt,
    #[token("long")]
    Long,
    #[token("ulong")]
    ULong,
    #[token("float")]
    Float,
    #[token("double")]
    Double,

    // === Control keywords ===
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("return")]
    Return,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // === Literals ===
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    BoolLiteral(bool),

    // Integer literals keep their raw slice; the parser decodes digits
    // and the type-selecting suffix (u, b, ub, s, us, l, ul). Hex digits
    // swallow `b` and `s`, so hex suffixes start with `u` or `l`.
    #[regex(r"0[xX][0-9a-fA-F]+([uU][lL]?|[lL])?", |lex| lex.slice().to_string())]
    HexLiteral(String),

    #[regex(r"[0-9]+([uU][bBsSlL]?|[bBsSlL])?", |lex| lex.slice().to_string())]
    IntLiteral(String),

    // Float literals: dotted form with optional exponent and suffix, or
    // digits with a mandatory f/d suffix (2f, 3d)
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[fFdD]?", priority = 3, callback = |lex| lex.slice().to_string())]
    #[regex(r"[0-9]+[fFdD]", priority = 2, callback = |lex| lex.slice().to_string())]
    FloatLiteral(String),

    // === Operators ===
    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Comparison
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    // Logical
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,

    // Bitwise
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,

    // Assignment
    #[token("=")]
    Eq,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // Special
    Eof,
}

impl TokenKind {
    /// Check if this token is a type keyword
    pub fn is_type_keyword(&self) -> bool {
        self.to_type().is_some()
    }

    /// Map a type keyword token to its type
    pub fn to_type(&self) -> Option<Type> {
        match self {
            TokenKind::Void => Some(Type::Void),
            TokenKind::Bool => Some(Type::Bool),
            TokenKind::Byte => Some(Type::Byte),
            TokenKind::UByte => Some(Type::UByte),
            TokenKind::Short => Some(Type::Short),
            TokenKind::UShort => Some(Type::UShort),
            TokenKind::Int => Some(Type::Int),
            TokenKind::UInt => Some(Type::UInt),
            TokenKind::Long => Some(Type::Long),
            TokenKind::ULong => Some(Type::ULong),
            TokenKind::Float => Some(Type::Float),
            TokenKind::Double => Some(Type::Double),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Void => write!(f, "'void'"),
            TokenKind::Bool => write!(f, "'bool'"),
            TokenKind::Byte => write!(f, "'byte'"),
            TokenKind::UByte => write!(f, "'ubyte'"),
            TokenKind::Short => write!(f, "'short'"),
            TokenKind::UShort => write!(f, "'ushort'"),
            TokenKind::Int => write!(f, "'int'"),
            TokenKind::UInt => write!(f, "'uint'"),
            TokenKind::Long => write!(f, "'long'"),
            TokenKind::ULong => write!(f, "'ulong'"),
            TokenKind::Float => write!(f, "'float'"),
            TokenKind::Double => write!(f, "'double'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Do => write!(f, "'do'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::BoolLiteral(b) => write!(f, "'{}'", b),
            TokenKind::IntLiteral(s) => write!(f, "integer '{}'", s),
            TokenKind::HexLiteral(s) => write!(f, "hex '{}'", s),
            TokenKind::FloatLiteral(s) => write!(f, "float '{}'", s),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::GtEq => write!(f, "'>='"),
            TokenKind::AmpAmp => write!(f, "'&&'"),
            TokenKind::PipePipe => write!(f, "'||'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Amp => write!(f, "'&'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::Tilde => write!(f, "'~'"),
            TokenKind::LtLt => write!(f, "'<<'"),
            TokenKind::GtGt => write!(f, "'>>'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Semi => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}
