use std::fmt::Write;

use anstyle::{AnsiColor, Reset, Style};

use crate::commands::command::Command;
use crate::resolver::compare_keys;
use crate::store::{CommandStore, segments};

const LOCKED_STYLE: Style = Style::new()
    .bold()
    .fg_color(Some(anstyle::Color::Ansi(AnsiColor::BrightYellow)));
const COMMENT_STYLE: Style = Style::new().dimmed();

/// Order of the listed aliases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Name,
    /// By program, then by name
    Path,
}

/// Options for rendering the alias table
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub sort: SortBy,
    /// Only show aliases under this namespace (segments, dots allowed)
    pub namespace: Vec<String>,
    /// Emit ANSI styling
    pub color: bool,
}

impl Listing {
    fn in_namespace(&self, key: &str) -> bool {
        let wanted: Vec<&str> = self
            .namespace
            .iter()
            .flat_map(|part| segments(part))
            .collect();
        let have: Vec<&str> = segments(key).collect();
        have.len() >= wanted.len()
            && wanted
                .iter()
                .zip(&have)
                .all(|(w, h)| w.eq_ignore_ascii_case(h))
    }

    fn style(&self, style: Style, text: &str) -> String {
        if self.color {
            format!("{style}{text}{Reset}")
        } else {
            text.to_string()
        }
    }

    fn render_entry(&self, out: &mut String, key: &str, command: &Command) {
        let name = if command.locked {
            self.style(LOCKED_STYLE, key)
        } else {
            key.to_string()
        };
        let _ = write!(out, "\t{name}:\t{}", command.path);
        for arg in command.args() {
            let _ = write!(out, " {arg}");
        }
        if command.locked {
            let _ = write!(out, " {}", self.style(LOCKED_STYLE, "+LOCKED+"));
        }
        if let Some(comment) = &command.comment {
            let _ = write!(out, "  {}", self.style(COMMENT_STYLE, &format!("# {comment}")));
        }
        out.push('\n');
    }

    /// Render one line per alias, sorted by dot-path (or program) for stable output.
    #[must_use]
    pub fn render(&self, store: &CommandStore) -> String {
        let mut entries: Vec<(&str, &Command)> = store
            .iter()
            .filter(|(key, _)| self.in_namespace(key))
            .collect();
        entries.sort_by(|a, b| compare_keys(a.0, b.0));
        if self.sort == SortBy::Path {
            entries.sort_by(|a, b| a.1.path.cmp(&b.1.path));
        }

        if entries.is_empty() {
            return "\t(no aliases)\n".to_string();
        }
        let mut out = String::new();
        for (key, command) in entries {
            self.render_entry(&mut out, key, command);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> CommandStore {
        [
            ("m.c", Command::new("calc", Vec::<String>::new())),
            ("gitinit", Command::new("git", ["init"]).locked(true)),
            (
                "lines",
                Command::new("wc", ["-l", "|sort"]).with_comment("count lines"),
            ),
            ("m", Command::new("mspaint", Vec::<String>::new())),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    #[test]
    fn test_render_by_name() {
        let out = Listing::default().render(&make_store());
        assert_eq!(
            out,
            "\tgitinit:\tgit init +LOCKED+\n\
             \tlines:\twc -l |sort  # count lines\n\
             \tm:\tmspaint\n\
             \tm.c:\tcalc\n"
        );
    }

    #[test]
    fn test_render_by_path() {
        let listing = Listing {
            sort: SortBy::Path,
            ..Default::default()
        };
        let keys: Vec<String> = listing
            .render(&make_store())
            .lines()
            .map(|line| line.trim_start().split(':').next().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["m.c", "gitinit", "m", "lines"]);
    }

    #[test]
    fn test_namespace_filter() {
        let listing = Listing {
            namespace: vec!["M".to_string()],
            ..Default::default()
        };
        assert_eq!(listing.render(&make_store()), "\tm:\tmspaint\n\tm.c:\tcalc\n");

        let listing = Listing {
            namespace: vec!["m.c".to_string()],
            ..Default::default()
        };
        assert_eq!(listing.render(&make_store()), "\tm.c:\tcalc\n");
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(
            Listing::default().render(&CommandStore::new()),
            "\t(no aliases)\n"
        );
    }

    #[test]
    fn test_color_marks_locked_entries() {
        let listing = Listing {
            color: true,
            ..Default::default()
        };
        let out = listing.render(&make_store());
        let locked_line = out.lines().find(|l| l.contains("git")).unwrap();
        assert!(locked_line.contains("\x1b["), "got: {locked_line:?}");
        let plain_line = out.lines().find(|l| l.contains("mspaint")).unwrap();
        assert!(!plain_line.contains("\x1b["), "got: {plain_line:?}");
    }
}
