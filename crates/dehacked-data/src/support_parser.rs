//! Parser for the DEHSUPP lookup descriptor.
//!
//! The descriptor is a sequence of named sections, each a brace-delimited,
//! comma-separated list terminated by `;`:
//!
//! ```text
//! OrgSprNames { TROO, SHTG, PUNG };
//! StateMap { Actor, Spawn, 2, DoomPlayer, Spawn, 6 };
//! ```
//!
//! Names are kept as written; resolving them against the class, sound and
//! function registries is left to the engine.

use dehacked_types::SpriteName;

use crate::support_lexer::{Located, SupportLexError, Token};

#[derive(Debug, thiserror::Error)]
pub enum SupportParseError {
    #[error(transparent)]
    Lex(#[from] SupportLexError),
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

/// One run of legacy state numbers: `span` states starting at `label` of
/// `class_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMapEntry {
    pub class_name: String,
    pub label: String,
    pub span: u32,
}

/// A legacy flag mnemonic and the bit it sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingBitEntry {
    pub bit: u8,
    pub word: u8,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStyleEntry {
    pub num: u8,
    pub name: String,
}

/// Legacy codepointer name mapped to the modern routine that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub alias: String,
    pub name: String,
    /// Number of MBF21 arguments the routine accepts.
    pub arity: u8,
}

/// Raw contents of a DEHSUPP descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DehSupp {
    /// Codepointer names without the `A_` prefix; `None` marks a state that
    /// had no action.
    pub actions: Vec<Option<String>>,
    pub org_heights: Vec<i32>,
    pub code_p_conv: Vec<i32>,
    pub org_spr_names: Vec<SpriteName>,
    pub state_map: Vec<StateMapEntry>,
    pub sound_map: Vec<String>,
    pub info_names: Vec<String>,
    pub thing_bits: Vec<ThingBitEntry>,
    pub render_styles: Vec<RenderStyleEntry>,
    pub ammo_names: Vec<Option<String>>,
    pub weapon_names: Vec<String>,
    pub aliases: Vec<AliasEntry>,
}

/// Parse a complete descriptor.
pub fn parse_dehsupp(input: &str) -> Result<DehSupp, SupportParseError> {
    let tokens = crate::support_lexer::lex(input)?;
    Parser { tokens, pos: 0 }.parse()
}

struct Parser {
    tokens: Vec<Located<Token>>,
    pos: usize,
}

impl Parser {
    fn current_line(&self) -> usize {
        self.tokens.get(self.pos).map(|t| t.line).unwrap_or(0)
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|t| &t.value)
            .unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: &str) -> SupportParseError {
        SupportParseError::Parse {
            line: self.current_line(),
            msg: msg.into(),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), SupportParseError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.err(&format!("expected {expected}, got {}", self.peek())))
        }
    }

    fn check(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn name(&mut self) -> Result<String, SupportParseError> {
        match self.peek().clone() {
            Token::Name(s) => {
                self.advance();
                Ok(s)
            }
            other => Err(self.err(&format!("expected name, got {other}"))),
        }
    }

    fn integer(&mut self) -> Result<i64, SupportParseError> {
        match self.peek().clone() {
            Token::Integer(n) => {
                self.advance();
                Ok(n)
            }
            other => Err(self.err(&format!("expected integer, got {other}"))),
        }
    }

    fn integer_in(&mut self, min: i64, max: i64, what: &str) -> Result<i64, SupportParseError> {
        let n = self.integer()?;
        if n < min || n > max {
            return Err(self.err(&format!("invalid {what} {n}")));
        }
        Ok(n)
    }

    /// A name, or `None` for the literal `NULL`.
    fn nullable_name(&mut self) -> Result<Option<String>, SupportParseError> {
        let s = self.name()?;
        Ok(if s.eq_ignore_ascii_case("NULL") { None } else { Some(s) })
    }

    /// Parse `{ item, item, ... }`, allowing a trailing comma.
    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, SupportParseError>,
    ) -> Result<Vec<T>, SupportParseError> {
        self.expect(&Token::LBrace)?;
        let mut items = Vec::new();
        while !self.check(&Token::RBrace) {
            items.push(item(self)?);
            if self.check(&Token::RBrace) {
                break;
            }
            self.expect(&Token::Comma)?;
        }
        Ok(items)
    }

    fn parse(mut self) -> Result<DehSupp, SupportParseError> {
        let mut supp = DehSupp::default();

        while *self.peek() != Token::Eof {
            let section = self.name()?;
            match section.as_str() {
                "ActionList" => supp.actions = self.list(Self::nullable_name)?,
                "OrgHeights" => {
                    supp.org_heights = self.list(|p| {
                        p.integer_in(0, i32::MAX.into(), "height").map(|n| n as i32)
                    })?
                }
                "CodePConv" => {
                    supp.code_p_conv = self.list(|p| {
                        p.integer_in(0, i32::MAX.into(), "state number").map(|n| n as i32)
                    })?
                }
                "OrgSprNames" => {
                    supp.org_spr_names = self.list(|p| {
                        let s = p.name()?;
                        if s.len() != 4 {
                            return Err(p.err(&format!(
                                "invalid sprite name '{s}' (must be 4 characters)"
                            )));
                        }
                        Ok(SpriteName::new(&s))
                    })?
                }
                "StateMap" => {
                    supp.state_map = self.list(|p| {
                        let class_name = p.name()?;
                        p.expect(&Token::Comma)?;
                        let label = p.name()?;
                        p.expect(&Token::Comma)?;
                        let span = p.integer_in(1, u32::MAX.into(), "state range")? as u32;
                        Ok(StateMapEntry { class_name, label, span })
                    })?
                }
                "SoundMap" => supp.sound_map = self.list(Self::name)?,
                "InfoNames" => supp.info_names = self.list(Self::name)?,
                "ThingBits" => {
                    supp.thing_bits = self.list(|p| {
                        let bit = p.integer_in(0, 31, "bit value")? as u8;
                        p.expect(&Token::Comma)?;
                        let word = p.integer_in(0, 2, "flag word")? as u8;
                        p.expect(&Token::Comma)?;
                        let name = p.name()?;
                        Ok(ThingBitEntry { bit, word, name })
                    })?
                }
                "RenderStyles" => {
                    supp.render_styles = self.list(|p| {
                        let num = p.integer_in(0, u8::MAX.into(), "render style")? as u8;
                        p.expect(&Token::Comma)?;
                        let name = p.name()?;
                        Ok(RenderStyleEntry { num, name })
                    })?
                }
                "AmmoNames" => supp.ammo_names = self.list(Self::nullable_name)?,
                "WeaponNames" => supp.weapon_names = self.list(Self::name)?,
                "Aliases" => {
                    supp.aliases = self.list(|p| {
                        let alias = p.name()?;
                        p.expect(&Token::Comma)?;
                        let name = p.name()?;
                        p.expect(&Token::Comma)?;
                        let arity = p.integer_in(0, 8, "argument count")? as u8;
                        Ok(AliasEntry { alias, name, arity })
                    })?
                }
                other => return Err(self.err(&format!("unknown section '{other}'"))),
            }
            self.expect(&Token::Semicolon)?;
        }

        Ok(supp)
    }
}
