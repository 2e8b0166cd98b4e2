#![forbid(unsafe_code)]

//! Implicational propositions: atoms and right-associative `->`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// `False` closes any goal when applied.
pub const FALSE: &str = "False";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Prop {
    Atom(String),
    Imp(Box<Prop>, Box<Prop>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropError {
    #[error("empty proposition")]
    Empty,
    #[error("unexpected `{token}` at offset {offset}")]
    Unexpected { token: String, offset: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
}

impl Prop {
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    pub fn imp(lhs: Prop, rhs: Prop) -> Self {
        Self::Imp(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn is_false(&self) -> bool {
        matches!(self, Self::Atom(name) if name == FALSE)
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(name) => f.write_str(name),
            Self::Imp(lhs, rhs) if matches!(**lhs, Self::Imp(..)) => write!(f, "({lhs}) -> {rhs}"),
            Self::Imp(lhs, rhs) => write!(f, "{lhs} -> {rhs}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Arrow,
    Open,
    Close,
}

impl Token<'_> {
    fn text(&self) -> &str {
        match self {
            Self::Ident(s) => s,
            Self::Arrow => "->",
            Self::Open => "(",
            Self::Close => ")",
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token<'_>)>, PropError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some(&(i, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push((i, Token::Open));
            }
            ')' => {
                chars.next();
                tokens.push((i, Token::Close));
            }
            '-' => {
                chars.next();
                match chars.next() {
                    Some((_, '>')) => tokens.push((i, Token::Arrow)),
                    _ => {
                        return Err(PropError::Unexpected {
                            token: "-".into(),
                            offset: i,
                        });
                    }
                }
            }
            c if is_ident_char(c) => {
                let mut end = i;
                while let Some(&(j, c)) = chars.peek() {
                    if !is_ident_char(c) {
                        break;
                    }
                    end = j + c.len_utf8();
                    chars.next();
                }
                tokens.push((i, Token::Ident(&input[i..end])));
            }
            other => {
                return Err(PropError::Unexpected {
                    token: other.to_string(),
                    offset: i,
                });
            }
        }
    }
    Ok(tokens)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

struct Parser<'a> {
    tokens: Vec<(usize, Token<'a>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&(usize, Token<'a>)> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<(usize, Token<'a>)> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn implication(&mut self) -> Result<Prop, PropError> {
        let lhs = self.primary()?;
        if matches!(self.peek(), Some((_, Token::Arrow))) {
            self.bump();
            let rhs = self.implication()?;
            return Ok(Prop::imp(lhs, rhs));
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> Result<Prop, PropError> {
        match self.bump() {
            Some((_, Token::Ident(name))) => Ok(Prop::atom(name)),
            Some((_, Token::Open)) => {
                let inner = self.implication()?;
                match self.bump() {
                    Some((_, Token::Close)) => Ok(inner),
                    Some((offset, token)) => Err(unexpected(offset, &token)),
                    None => Err(PropError::UnexpectedEnd),
                }
            }
            Some((offset, token)) => Err(unexpected(offset, &token)),
            None => Err(PropError::UnexpectedEnd),
        }
    }
}

fn unexpected(offset: usize, token: &Token<'_>) -> PropError {
    PropError::Unexpected {
        token: token.text().to_string(),
        offset,
    }
}

impl FromStr for Prop {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s)?;
        if tokens.is_empty() {
            return Err(PropError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let prop = parser.implication()?;
        if let Some((offset, token)) = parser.bump() {
            return Err(unexpected(offset, &token));
        }
        Ok(prop)
    }
}
