//! Line reader for DeHackEd / BEX patch text.
//!
//! [`PatchCursor`] walks an immutable byte buffer. Patch files are not
//! guaranteed to be UTF-8, so classification works on bytes and only the
//! extracted key/value text is decoded (lossily).

/// A classified, non-comment, non-blank patch line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchLine {
    /// `key = value`. Both sides are trimmed and non-empty.
    KeyValue { key: String, value: String },
    /// `word rest...`. `rest` may be empty.
    Header { word: String, rest: String },
}

impl PatchLine {
    pub fn is_key_value(&self) -> bool {
        matches!(self, PatchLine::KeyValue { .. })
    }
}

fn is_blank(b: u8) -> bool {
    b <= b' '
}

fn trim_bytes(mut s: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = s {
        if !is_blank(*first) {
            break;
        }
        s = rest;
    }
    while let [rest @ .., last] = s {
        if !is_blank(*last) {
            break;
        }
        s = rest;
    }
    s
}

fn decode(s: &[u8]) -> String {
    String::from_utf8_lossy(s).into_owned()
}

#[derive(Debug, Clone)]
pub struct PatchCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PatchCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        PatchCursor { data, pos: 0 }
    }

    /// A cursor starting at byte offset `pos`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        PatchCursor {
            data,
            pos: pos.min(data.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// End of input. A NUL byte also terminates the text.
    pub fn is_eof(&self) -> bool {
        self.data.get(self.pos).is_none_or(|&b| b == 0)
    }

    /// The next raw line, without its terminator, and the offset just past
    /// it.
    pub fn peek_line(&self) -> Option<(&'a [u8], usize)> {
        if self.is_eof() {
            return None;
        }
        let rest = &self.data[self.pos..];
        match rest.iter().position(|&b| b == b'\n' || b == 0) {
            Some(end) if rest[end] == b'\n' => Some((&rest[..end], self.pos + end + 1)),
            Some(end) => Some((&rest[..end], self.pos + end)),
            None => Some((rest, self.data.len())),
        }
    }

    /// Move to `next`, an offset returned by [`peek_line`](Self::peek_line).
    pub fn advance(&mut self, next: usize) {
        self.pos = next.min(self.data.len());
    }

    /// Consume and return the next raw line, comments included.
    pub fn next_raw_line(&mut self) -> Option<String> {
        let (line, next) = self.peek_line()?;
        self.advance(next);
        Some(decode(line))
    }

    /// Consume lines up to and including the next meaningful one.
    ///
    /// Lines starting with `#` and blank lines are skipped. A `key =` line
    /// with nothing on one side of the `=` yields `None`, which ends the
    /// patch exactly as the end of input does.
    pub fn next_line(&mut self) -> Option<PatchLine> {
        let line = loop {
            let (raw, next) = self.peek_line()?;
            self.advance(next);
            if raw.first() == Some(&b'#') {
                continue;
            }
            let trimmed = trim_bytes(raw);
            if !trimmed.is_empty() {
                break trimmed;
            }
        };

        if let Some(eq) = line.iter().position(|&b| b == b'=') {
            let key = trim_bytes(&line[..eq]);
            let value = trim_bytes(&line[eq + 1..]);
            if key.is_empty() || value.is_empty() {
                return None;
            }
            return Some(PatchLine::KeyValue {
                key: decode(key),
                value: decode(value),
            });
        }

        let split = line.iter().position(|&b| is_blank(b)).unwrap_or(line.len());
        Some(PatchLine::Header {
            word: decode(&line[..split]),
            rest: decode(trim_bytes(&line[split..])),
        })
    }

    /// Read `size` bytes of raw text, skipping carriage returns, which do not
    /// count toward `size`. Stops early at the end of input.
    pub fn read_chars(&mut self, size: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(size);
        while out.len() < size && !self.is_eof() {
            let b = self.data[self.pos];
            self.pos += 1;
            if b != b'\r' {
                out.push(b);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(key: &str, value: &str) -> PatchLine {
        PatchLine::KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }

    fn header(word: &str, rest: &str) -> PatchLine {
        PatchLine::Header {
            word: word.into(),
            rest: rest.into(),
        }
    }

    #[test]
    fn classifies_both_grammars() {
        let text = b"# comment\n\nThing 1 (Player)\nHit points = 200\r\n  Bits = SOLID+SHOOTABLE\n[STRINGS]\n";
        let mut cursor = PatchCursor::new(text);
        assert_eq!(cursor.next_line(), Some(header("Thing", "1 (Player)")));
        assert_eq!(cursor.next_line(), Some(kv("Hit points", "200")));
        assert_eq!(cursor.next_line(), Some(kv("Bits", "SOLID+SHOOTABLE")));
        assert_eq!(cursor.next_line(), Some(header("[STRINGS]", "")));
        assert_eq!(cursor.next_line(), None);
    }

    #[test]
    fn indented_hash_is_not_a_comment() {
        let mut cursor = PatchCursor::new(b"  #x 1\n");
        assert_eq!(cursor.next_line(), Some(header("#x", "1")));
    }

    #[test]
    fn empty_side_of_equals_ends_input() {
        assert_eq!(PatchCursor::new(b"= 5\nThing 1\n").next_line(), None);
        assert_eq!(PatchCursor::new(b"Speed =   \nThing 1\n").next_line(), None);
    }

    #[test]
    fn nul_terminates_text() {
        let mut cursor = PatchCursor::new(b"Misc 0\n\0Thing 1\n");
        assert_eq!(cursor.next_line(), Some(header("Misc", "0")));
        assert!(cursor.is_eof());
        assert_eq!(cursor.next_line(), None);
    }

    #[test]
    fn read_chars_skips_carriage_returns() {
        let mut cursor = PatchCursor::new(b"ab\r\ncdef");
        assert_eq!(cursor.read_chars(4), b"ab\nc".to_vec());
        assert_eq!(cursor.read_chars(10), b"def".to_vec());
        assert!(cursor.is_eof());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut cursor = PatchCursor::new(b"one\ntwo");
        let (line, next) = cursor.peek_line().expect("line");
        assert_eq!(line, b"one");
        assert_eq!(cursor.position(), 0);
        cursor.advance(next);
        assert_eq!(cursor.next_raw_line().as_deref(), Some("two"));
        assert_eq!(cursor.next_raw_line(), None);
    }
}
