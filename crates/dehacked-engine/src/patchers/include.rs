use std::path::PathBuf;

use crate::section::Patcher;

/// Split `notext` and quotes off an include directive's arguments. Returns
/// the file name and whether text sections are to be skipped.
fn include_target(rest: &str) -> (&str, bool) {
    let mut rest = rest.trim();
    let mut notext = false;
    if let Some(head) = rest.get(..6)
        && head.eq_ignore_ascii_case("notext")
        && rest[6..].starts_with(char::is_whitespace)
    {
        notext = true;
        rest = rest[6..].trim_start();
    }
    if let Some(quoted) = rest.strip_prefix('"') {
        rest = quoted.split('"').next().unwrap_or("");
    }
    (rest, notext)
}

impl Patcher<'_> {
    pub(crate) fn include(&mut self, rest: &str) {
        if self.engine.including {
            log::warn!("Sorry, can't nest includes");
            self.pending = self.cursor.next_line();
            return;
        }

        let (name, notext) = include_target(rest);
        if name.is_empty() {
            log::warn!("Include directive is missing filename");
            self.pending = self.cursor.next_line();
            return;
        }

        log::debug!("Including {name}");
        // Look next to the including patch before trying the name as given.
        let sibling = self.path.parent().map(|dir| dir.join(name));
        let path = match sibling {
            Some(p) if p.exists() => p,
            _ => PathBuf::from(name),
        };

        self.engine.including = true;
        self.engine.include_notext = notext;
        if let Err(err) = self.engine.load_file(&mut *self.world, &path) {
            log::warn!("Could not include {}: {err}", path.display());
        }
        self.engine.including = false;
        self.engine.include_notext = false;
        log::debug!("Done with include");

        self.pending = self.cursor.next_line();
    }
}

#[cfg(test)]
mod tests {
    use super::include_target;

    #[test]
    fn parses_notext_and_quotes() {
        assert_eq!(include_target("extra.deh"), ("extra.deh", false));
        assert_eq!(include_target("notext extra.deh"), ("extra.deh", true));
        assert_eq!(include_target("NOTEXT \"my file.bex\" junk"), ("my file.bex", true));
        assert_eq!(include_target("notextual.deh"), ("notextual.deh", false));
        assert_eq!(include_target("\"\""), ("", false));
    }
}
