use std::fmt;

/// The kind of a token, without the source text it covers.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,

    Eq,
    NotEq,
    LessThan,
    GreaterThan,

    // Delimiters
    Comma,
    Semicolon,

    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    // Identifiers & literals
    Identifier,
    Integer,

    // Keywords
    Let,
    Fn,
    If,
    Else,
    Return,
    True,
    False,

    // Special
    Eof,
    Illegal,
}

impl TokenKind {
    /// Get the keyword kind for the given identifier text, if it is reserved.
    pub fn lookup_keyword(s: &str) -> Option<TokenKind> {
        use TokenKind::*;

        match s {
            "let" => Some(Let),
            "fn" => Some(Fn),
            "if" => Some(If),
            "else" => Some(Else),
            "return" => Some(Return),
            "true" => Some(True),
            "false" => Some(False),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;

        match self {
            Assign => write!(f, "="),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Star => write!(f, "*"),
            Slash => write!(f, "/"),
            Bang => write!(f, "!"),

            Eq => write!(f, "=="),
            NotEq => write!(f, "!="),
            LessThan => write!(f, "<"),
            GreaterThan => write!(f, ">"),

            Comma => write!(f, ","),
            Semicolon => write!(f, ";"),

            LeftParen => write!(f, "("),
            RightParen => write!(f, ")"),
            LeftBrace => write!(f, "{{"),
            RightBrace => write!(f, "}}"),

            Identifier => write!(f, "identifier"),
            Integer => write!(f, "integer literal"),

            Let => write!(f, "let"),
            Fn => write!(f, "fn"),
            If => write!(f, "if"),
            Else => write!(f, "else"),
            Return => write!(f, "return"),
            True => write!(f, "true"),
            False => write!(f, "false"),

            Eof => write!(f, "end of input"),
            Illegal => write!(f, "illegal"),
        }
    }
}

/// A lexical unit: its kind, the source text it covers, and the 1-based
/// line it starts on.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize) -> Token {
        Token {
            kind,
            literal: literal.into(),
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;

    #[test]
    fn keyword_lookup() {
        let tests = vec![
            ("let", Some(TokenKind::Let)),
            ("fn", Some(TokenKind::Fn)),
            ("if", Some(TokenKind::If)),
            ("else", Some(TokenKind::Else)),
            ("return", Some(TokenKind::Return)),
            ("true", Some(TokenKind::True)),
            ("false", Some(TokenKind::False)),
            ("letter", None),
            ("function", None),
            ("", None),
        ];

        for (input, expected) in tests {
            assert_eq!(TokenKind::lookup_keyword(input), expected);
        }
    }

    #[test]
    fn kind_formatting() {
        assert_eq!(format!("{}", TokenKind::Eq), "==");
        assert_eq!(format!("{}", TokenKind::Assign), "=");
        assert_eq!(format!("{}", TokenKind::LeftBrace), "{");
        assert_eq!(format!("{}", TokenKind::Identifier), "identifier");
        assert_eq!(format!("{}", TokenKind::Integer), "integer literal");
        assert_eq!(format!("{}", TokenKind::Eof), "end of input");
    }
}
