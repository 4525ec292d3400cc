/// Lexical tokens of a p5x expression.
///
/// Everything between the single-character tokens is a [`Token::Segment`];
/// the parser decides which iterator a segment denotes.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Iterator separator
    ///
    /// # Examples
    /// ```text
    /// /*/_data
    /// //
    /// ```
    Slash,

    /// OR, union of the left and right sides
    Pipe,

    /// AND, intersection of the left and right sides
    Ampersand,

    /// XOR, symmetric difference
    Caret,

    /// NOT, left side without the right side
    Exclamation,

    /// Opens a nested group
    LParen,

    /// Closes a nested group
    RParen,

    /// Starts the type declaration
    ///
    /// # Examples
    /// ```text
    /// ?value
    /// ?count
    /// ?value.int
    /// ```
    Question,

    /// Unquoted run of characters, whitespace trimmed
    ///
    /// # Examples
    /// ```text
    /// _data
    /// =:int:5
    /// [0,2]
    /// ```
    Segment(String),

    /// String literal, either `"..."` or `@"..."`
    ///
    /// Used for names that contain control characters.
    ///
    /// # Examples
    /// ```text
    /// "/^_a/"
    /// @"multi
    /// line"
    /// ```
    Quoted(String),

    Eof,
}

impl Token {
    /// Text carried by segment-like tokens.
    pub fn segment(&self) -> Option<&str> {
        match self {
            Token::Segment(text) | Token::Quoted(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Slash => write!(f, "/"),
            Token::Pipe => write!(f, "|"),
            Token::Ampersand => write!(f, "&"),
            Token::Caret => write!(f, "^"),
            Token::Exclamation => write!(f, "!"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Question => write!(f, "?"),
            Token::Segment(text) => write!(f, "{}", text),
            Token::Quoted(text) => write!(f, "\"{}\"", text),
            Token::Eof => write!(f, "end of expression"),
        }
    }
}
