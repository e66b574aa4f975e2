//! The BEX `[STRINGS]`, `[PARS]` and `[MUSIC]` sections.

use dehacked_data::PatchLine;
use dehacked_data::values::{atoi, decode_escapes};

use crate::section::Patcher;
use crate::world::StringOverride;

/// Split off the first whitespace-delimited token.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let (head, tail) = s.split_once(char::is_whitespace)?;
    Some((head, tail.trim_start()))
}

/// Map name and par time of the data after a `par` keyword.
fn par_entry(data: &str) -> Option<(String, i32)> {
    let (first, rest) = split_token(data.trim())?;
    match split_token(rest) {
        Some((second, third)) => {
            let episode = first.chars().next().unwrap_or('0');
            let map = second.chars().next().unwrap_or('0');
            Some((format!("E{episode}M{map}"), atoi(third)))
        }
        None => Some((format!("MAP{:02}", atoi(first) % 100), atoi(rest))),
    }
}

impl Patcher<'_> {
    fn set_string(&mut self, key: String, value: String) {
        let entry = StringOverride {
            value,
            file_id: self.engine.current_file_id,
        };
        self.engine.deh_strings.insert(key, entry);
    }

    pub(crate) fn patch_strings(&mut self) {
        while let Some((key, value)) = self.next_pair() {
            let mut text = value.trim_end().to_string();
            while text.ends_with('\\') {
                text.pop();
                match self.cursor.next_raw_line() {
                    Some(line) if !line.trim().is_empty() => {
                        text.push_str(line.trim_start());
                        text.truncate(text.trim_end().len());
                    }
                    _ => break,
                }
            }
            let text = decode_escapes(&text);
            // Boom and this engine disagree on the red skull pickup id.
            let key = if key.eq_ignore_ascii_case("GOTREDSKULL") {
                "GOTREDSKUL".to_string()
            } else {
                key
            };
            log::debug!("{key} set to:\n{text}");
            self.set_string(key, text);
        }
    }

    pub(crate) fn patch_music(&mut self) {
        while let Some((key, value)) = self.next_pair() {
            let key = format!("MUSIC_{key}");
            log::debug!("Music {key} set to:\n{value}");
            self.set_string(key, value);
        }
    }

    pub(crate) fn patch_pars(&mut self) {
        loop {
            match self.cursor.next_line() {
                Some(PatchLine::KeyValue { key, .. }) => {
                    log::warn!("Unknown key in [PARS] section: {key}");
                }
                Some(PatchLine::Header { word, rest }) if word.eq_ignore_ascii_case("par") => {
                    let Some((map, par)) = par_entry(&rest) else {
                        log::warn!("Need data after par.");
                        continue;
                    };
                    if self.world.set_par_time(&map, par) {
                        log::debug!("Par for {map} changed to {par}");
                    } else {
                        log::warn!("No map {map}");
                    }
                }
                other => {
                    self.pending = other;
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::par_entry;

    #[test]
    fn episode_and_map_forms() {
        assert_eq!(par_entry("1 3 120"), Some(("E1M3".to_string(), 120)));
        assert_eq!(par_entry("7 150"), Some(("MAP07".to_string(), 150)));
        assert_eq!(par_entry("132  90"), Some(("MAP32".to_string(), 90)));
        assert_eq!(par_entry("12"), None);
        assert_eq!(par_entry(""), None);
    }
}
