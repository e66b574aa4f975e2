//! Tokenizer for the DEHSUPP lookup descriptor.
//!
//! The descriptor uses a C-like surface: bare or quoted names, signed
//! integers, braces, commas and semicolons, with `//` and `/* */` comments.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A bare word or a quoted string.
    Name(String),
    Integer(i64),
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(s) => write!(f, "'{s}'"),
            Token::Integer(n) => write!(f, "{n}"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::Comma => write!(f, "','"),
            Token::Semicolon => write!(f, "';'"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Located<T> {
    pub value: T,
    pub line: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SupportLexError {
    #[error("line {line}: {msg}")]
    Error { line: usize, msg: String },
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '[' | ']' | '.' | '-' | '/')
}

pub fn lex(input: &str) -> Result<Vec<Located<Token>>, SupportLexError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1usize;

    while let Some(&ch) = chars.peek() {
        if ch == '\n' {
            chars.next();
            line += 1;
            continue;
        }
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch == '/' {
            chars.next();
            match chars.peek() {
                Some('/') => {
                    while let Some(&c) = chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        chars.next();
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let start = line;
                    let mut prev = '\0';
                    loop {
                        match chars.next() {
                            Some('/') if prev == '*' => break,
                            Some(c) => {
                                if c == '\n' {
                                    line += 1;
                                }
                                prev = c;
                            }
                            None => {
                                return Err(SupportLexError::Error {
                                    line: start,
                                    msg: "unterminated comment".into(),
                                });
                            }
                        }
                    }
                    continue;
                }
                _ => {
                    return Err(SupportLexError::Error {
                        line,
                        msg: "unexpected '/'".into(),
                    });
                }
            }
        }

        if ch == '"' {
            chars.next();
            let start = line;
            let mut s = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\n') => {
                        return Err(SupportLexError::Error {
                            line: start,
                            msg: "newline in string".into(),
                        });
                    }
                    Some(c) => s.push(c),
                    None => {
                        return Err(SupportLexError::Error {
                            line: start,
                            msg: "unterminated string".into(),
                        });
                    }
                }
            }
            tokens.push(Located { value: Token::Name(s), line });
            continue;
        }

        let punct = match ch {
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            _ => None,
        };
        if let Some(tok) = punct {
            chars.next();
            tokens.push(Located { value: tok, line });
            continue;
        }

        if ch.is_ascii_digit() || ch == '-' {
            let mut text = String::new();
            text.push(ch);
            chars.next();
            while let Some(&c) = chars.peek() {
                if !c.is_ascii_alphanumeric() {
                    break;
                }
                text.push(c);
                chars.next();
            }
            let value = parse_integer(&text).ok_or_else(|| SupportLexError::Error {
                line,
                msg: format!("bad number '{text}'"),
            })?;
            tokens.push(Located { value: Token::Integer(value), line });
            continue;
        }

        if is_name_char(ch) {
            let mut s = String::new();
            while let Some(&c) = chars.peek() {
                if !is_name_char(c) {
                    break;
                }
                s.push(c);
                chars.next();
            }
            tokens.push(Located { value: Token::Name(s), line });
            continue;
        }

        return Err(SupportLexError::Error {
            line,
            msg: format!("unexpected character '{ch}'"),
        });
    }

    tokens.push(Located { value: Token::Eof, line });
    Ok(tokens)
}

fn parse_integer(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}
