use crate::{
    ast::{IteratorGroup, Logical, LogicalKind, MatchType, NodeIterator, RegexIterator, Token},
    error::{ErrorKind, ExpressionError},
    lexer::Lexer,
    value::Value,
};
use std::mem;

/// Parsed body of an expression.
#[derive(Debug, Clone)]
pub struct ParsedExpression {
    /// Unseeded top-level group
    pub group: IteratorGroup,
    pub match_type: MatchType,
    pub cast: Option<String>,
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    expression: String,
    /// Group receiving iterators and logicals
    current: IteratorGroup,
    /// Groups enclosing `current`, innermost last
    enclosing: Vec<IteratorGroup>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ExpressionError> {
        let expression = lexer.source();
        let current_token = lexer
            .next_token()
            .map_err(|e| ExpressionError::syntax(&expression, e.to_string()))?;
        Ok(Parser {
            lexer,
            current_token,
            expression,
            current: IteratorGroup::new(),
            enclosing: Vec::new(),
        })
    }

    /// Moves to the next token, returning the one just consumed.
    fn advance(&mut self) -> Result<Token, ExpressionError> {
        let next = self
            .lexer
            .next_token()
            .map_err(|e| ExpressionError::syntax(&self.expression, e.to_string()))?;
        Ok(mem::replace(&mut self.current_token, next))
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn error(&self, kind: ErrorKind) -> ExpressionError {
        ExpressionError::new(&self.expression, kind)
    }

    fn syntax(&self, message: impl Into<String>) -> ExpressionError {
        ExpressionError::syntax(&self.expression, message)
    }

    /// Parses the whole expression into an unseeded group.
    pub fn parse(&mut self) -> Result<ParsedExpression, ExpressionError> {
        let mut previous: Option<Token> = None;
        let mut match_type = MatchType::Node;
        let mut cast = None;

        while !self.check(&Token::Eof) {
            let token = self.advance()?;
            if previous.is_none() && !matches!(token, Token::Slash | Token::Question) {
                return Err(self.syntax(
                    "Syntax error in expression, missing iterator declaration",
                ));
            }

            // `//`, `/?`, `/(`, `/)` and `/|` select nodes with empty names
            if previous == Some(Token::Slash) && token.segment().is_none() {
                self.current.add_iterator(NodeIterator::Named(String::new()));
            }

            match &token {
                Token::Slash | Token::Eof => {}
                Token::Question => {
                    (match_type, cast) = self.parse_type()?;
                }
                Token::LParen => {
                    let outer = mem::take(&mut self.current);
                    self.enclosing.push(outer);
                }
                Token::RParen => {
                    let outer = self
                        .enclosing
                        .pop()
                        .ok_or_else(|| self.error(ErrorKind::UnbalancedGroup))?;
                    let nested = mem::replace(&mut self.current, outer);
                    self.current.add_iterator(NodeIterator::Group(Box::new(nested)));
                }
                Token::Pipe | Token::Ampersand | Token::Caret | Token::Exclamation => {
                    if let Some(kind) = LogicalKind::from_token(&token) {
                        self.current.add_logical(Logical::new(kind));
                    }
                }
                Token::Segment(text) | Token::Quoted(text) => {
                    let iterator = self.parse_iterator(text)?;
                    self.current.add_iterator(iterator);
                }
            }
            previous = Some(token);
        }

        if !self.enclosing.is_empty() {
            return Err(self.error(ErrorKind::UnbalancedGroup));
        }

        Ok(ParsedExpression {
            group: mem::take(&mut self.current),
            match_type,
            cast,
        })
    }

    /// `?type` or `?type.cast`; must be the last token.
    fn parse_type(&mut self) -> Result<(MatchType, Option<String>), ExpressionError> {
        let token = self.advance()?;
        let declaration = match token.segment() {
            Some(text) => text.to_string(),
            None => return Err(self.error(ErrorKind::UnknownType(token.to_string()))),
        };

        let (name, cast) = match declaration.split_once('.') {
            Some((name, cast)) => (name, Some(cast.to_string())),
            None => (declaration.as_str(), None),
        };
        let match_type = MatchType::from_name(name)
            .ok_or_else(|| self.error(ErrorKind::UnknownType(name.to_string())))?;

        if !self.check(&Token::Eof) {
            return Err(self.syntax(format!(
                "Unexpected '{}' after type declaration",
                self.current_token
            )));
        }
        Ok((match_type, cast))
    }

    /// Maps a segment onto the iterator it denotes.
    fn parse_iterator(&self, text: &str) -> Result<NodeIterator, ExpressionError> {
        let iterator = match text {
            ".." => NodeIterator::Root,
            "*" => NodeIterator::Children,
            "**" => NodeIterator::Flatten,
            "." => NodeIterator::Parent,
            "#" => NodeIterator::Reference,
            "<" => NodeIterator::ShiftLeft,
            ">" => NodeIterator::ShiftRight,
            _ if text.starts_with('=') => self.parse_valued(&text[1..])?,
            _ if text.starts_with('[') => self.parse_range(text)?,
            _ if text.starts_with("..") => NodeIterator::NamedAncestor(text[2..].to_string()),
            _ if text.starts_with('%') => self.parse_modulo(text)?,
            _ if text.starts_with('-') || text.starts_with('+') => self.parse_sibling(text)?,
            _ if text.starts_with('/') => NodeIterator::NamedRegex(
                RegexIterator::parse(text).map_err(|kind| self.error(kind))?,
            ),
            _ if text.starts_with('\\') => NodeIterator::Named(text[1..].to_string()),
            _ if is_number(text) => NodeIterator::Numbered(self.parse_number(text, text)?),
            _ => NodeIterator::Named(text.to_string()),
        };
        Ok(iterator)
    }

    /// `=value`, `=:type:value`, `=\value` or `=/regex/flags`, without the `=`.
    fn parse_valued(&self, text: &str) -> Result<NodeIterator, ExpressionError> {
        if text.starts_with('/') {
            let regex = RegexIterator::parse(text).map_err(|kind| self.error(kind))?;
            return Ok(NodeIterator::ValuedRegex(regex));
        }
        if let Some(escaped) = text.strip_prefix('\\') {
            return Ok(NodeIterator::Valued(Value::String(escaped.to_string())));
        }
        if let Some(typed) = text.strip_prefix(':') {
            let (type_name, value) = typed.split_once(':').ok_or_else(|| {
                self.syntax(format!(
                    "Syntax error in value token '={}', missing ':' after type",
                    text
                ))
            })?;
            let value = value.strip_prefix('\\').unwrap_or(value);
            let value = Value::from_typed(type_name, value)
                .map_err(|e| self.error(ErrorKind::Conversion(e)))?;
            return Ok(NodeIterator::Valued(value));
        }
        Ok(NodeIterator::Valued(Value::String(text.to_string())))
    }

    /// `[start,end]`, either bound optional.
    fn parse_range(&self, token: &str) -> Result<NodeIterator, ExpressionError> {
        let inner = token
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| {
                self.syntax(format!(
                    "Syntax error in range token '{}', no ']' at end of token",
                    token
                ))
            })?;
        let (start, end) = inner.split_once(',').ok_or_else(|| {
            self.syntax(format!(
                "Syntax error in range token '{}', range token must have a ',' character",
                token
            ))
        })?;
        let (start, end) = (start.trim(), end.trim());

        let start = match start {
            "" => 0,
            text => self.parse_number(text, token)?,
        };
        let end = match end {
            "" => None,
            text => Some(self.parse_number(text, token)?),
        };
        if let Some(end) = end
            && end <= start
        {
            return Err(self.syntax(format!(
                "Syntax error in range token '{}', end must be larger than start",
                token
            )));
        }
        Ok(NodeIterator::Range { start, end })
    }

    fn parse_modulo(&self, token: &str) -> Result<NodeIterator, ExpressionError> {
        let modulo = self.parse_number(&token[1..], token)?;
        if modulo == 0 {
            return Err(self.syntax(format!(
                "Syntax error in modulo token '{}', modulo must be larger than zero",
                token
            )));
        }
        Ok(NodeIterator::Modulo(modulo))
    }

    fn parse_sibling(&self, token: &str) -> Result<NodeIterator, ExpressionError> {
        let steps = match &token[1..] {
            "" => 1,
            text => self.parse_number(text, token)?,
        };
        let steps = isize::try_from(steps).map_err(|_| {
            self.syntax(format!("Syntax error in sibling token '{}', offset too large", token))
        })?;
        let offset = if token.starts_with('-') { -steps } else { steps };
        Ok(NodeIterator::Sibling(offset))
    }

    fn parse_number(&self, text: &str, token: &str) -> Result<usize, ExpressionError> {
        if !is_number(text) {
            return Err(self.syntax(format!(
                "Syntax error in token '{}', expected integer value, found '{}'",
                token, text
            )));
        }
        text.parse().map_err(|_| {
            self.syntax(format!("Syntax error in token '{}', number too large", token))
        })
    }
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}
