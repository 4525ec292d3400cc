use crate::ast::Token;

/// Characters that end a segment and form tokens on their own.
const CONTROL_CHARS: &[char] = &['/', '|', '&', '^', '!', '(', ')', '?'];

/// Malformed literal in the expression text.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: usize,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl std::error::Error for LexError {}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// The text being tokenized.
    pub fn source(&self) -> String {
        self.input.iter().collect()
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            position: self.position,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Everything up to the next control character, trailing whitespace trimmed.
    fn read_segment(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if CONTROL_CHARS.contains(&ch) {
                break;
            }
            result.push(ch);
            self.advance();
        }
        result.trim_end().to_string()
    }

    /// `"..."` on a single line, with backslash escapes.
    fn read_string(&mut self) -> Result<String, LexError> {
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\n' | '\r' => return Err(self.error("Newline in string literal")),
                '\\' => {
                    self.advance();
                    let escaped = match self.current_char() {
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some('\\') => '\\',
                        Some('a') => '\u{07}',
                        Some('b') => '\u{08}',
                        Some('f') => '\u{0C}',
                        Some('t') => '\t',
                        Some('v') => '\u{0B}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('x') => self.read_hex_escape()?,
                        Some(other) => {
                            return Err(self.error(format!("Invalid escape sequence: \\{}", other)));
                        }
                        None => return Err(self.error("Unterminated string literal")),
                    };
                    result.push(escaped);
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.error("Unterminated string literal"))
    }

    /// `\xHHHH`; leaves the position on the last hex digit.
    fn read_hex_escape(&mut self) -> Result<char, LexError> {
        let digits: String = (1..=4).filter_map(|offset| self.peek_char(offset)).collect();
        if digits.len() != 4 {
            return Err(self.error("Incomplete \\x escape sequence"));
        }
        let code = u32::from_str_radix(&digits, 16)
            .map_err(|_| self.error(format!("Invalid \\x escape sequence: {}", digits)))?;
        let ch = char::from_u32(code)
            .ok_or_else(|| self.error(format!("Invalid character code: {}", digits)))?;
        self.position += 4;
        Ok(ch)
    }

    /// `@"..."` spanning lines; `""` is a literal quote.
    fn read_multiline_string(&mut self) -> Result<String, LexError> {
        let mut result = String::new();
        self.advance(); // @
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            if ch == '"' {
                if self.peek_char(1) == Some('"') {
                    result.push('"');
                    self.advance();
                    self.advance();
                    continue;
                }
                self.advance();
                return Ok(result);
            }
            result.push(ch);
            self.advance();
        }

        Err(self.error("Unterminated multi-line string literal"))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('/') => Token::Slash,
            Some('|') => Token::Pipe,
            Some('&') => Token::Ampersand,
            Some('^') => Token::Caret,
            Some('!') => Token::Exclamation,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some('?') => Token::Question,
            Some('"') => return self.read_string().map(Token::Quoted),
            Some('@') if self.peek_char(1) == Some('"') => {
                return self.read_multiline_string().map(Token::Quoted);
            }
            Some(_) => return Ok(Token::Segment(self.read_segment())),
        };

        if token != Token::Eof {
            self.advance();
        }
        Ok(token)
    }

    /// Tokenizes the rest of the input, `Eof` included.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[test]
fn test_control_characters() {
    let mut lexer = Lexer::new("/|&^!()?");
    assert_eq!(lexer.next_token(), Ok(Token::Slash));
    assert_eq!(lexer.next_token(), Ok(Token::Pipe));
    assert_eq!(lexer.next_token(), Ok(Token::Ampersand));
    assert_eq!(lexer.next_token(), Ok(Token::Caret));
    assert_eq!(lexer.next_token(), Ok(Token::Exclamation));
    assert_eq!(lexer.next_token(), Ok(Token::LParen));
    assert_eq!(lexer.next_token(), Ok(Token::RParen));
    assert_eq!(lexer.next_token(), Ok(Token::Question));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_segments_are_trimmed() {
    let mut lexer = Lexer::new("/ foo bar /*");
    assert_eq!(lexer.next_token(), Ok(Token::Slash));
    assert_eq!(lexer.next_token(), Ok(Token::Segment("foo bar".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Slash));
    assert_eq!(lexer.next_token(), Ok(Token::Segment("*".to_string())));
}
