/// Marker that starts a new pipeline stage inside an argument template.
pub const PIPE_MARKER: char = '|';

/// One pre-parsed element of an alias argument template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateToken {
    /// A literal argument for the current stage
    Arg(String),
    /// Start of a new stage, optionally naming its program (`|prog`)
    Pipe(Option<String>),
}

impl TemplateToken {
    /// Parse a single raw token as typed by the user.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(PIPE_MARKER) {
            Some("") => TemplateToken::Pipe(None),
            Some(program) => TemplateToken::Pipe(Some(program.to_string())),
            None => TemplateToken::Arg(raw.to_string()),
        }
    }

    /// Render the token back into the string form it was parsed from.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            TemplateToken::Arg(arg) => arg.clone(),
            TemplateToken::Pipe(None) => PIPE_MARKER.to_string(),
            TemplateToken::Pipe(Some(program)) => format!("{PIPE_MARKER}{program}"),
        }
    }
}

/// Parse a raw argument template into tokens.
pub fn parse_template<I, S>(raw: I) -> Vec<TemplateToken>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|token| TemplateToken::parse(token.as_ref()))
        .collect()
}

/// Render tokens back into the raw string form used for persistence and display.
#[must_use]
pub fn render_template(tokens: &[TemplateToken]) -> Vec<String> {
    tokens.iter().map(TemplateToken::render).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_pipe_tokens() {
        let tokens = parse_template(["x", "|", "b", "|c", "y"]);
        assert_eq!(
            tokens,
            vec![
                TemplateToken::Arg("x".to_string()),
                TemplateToken::Pipe(None),
                TemplateToken::Arg("b".to_string()),
                TemplateToken::Pipe(Some("c".to_string())),
                TemplateToken::Arg("y".to_string()),
            ]
        );
    }

    #[test]
    fn test_marker_only_counts_at_start() {
        assert_eq!(
            TemplateToken::parse("a|b"),
            TemplateToken::Arg("a|b".to_string())
        );
        assert_eq!(TemplateToken::parse(""), TemplateToken::Arg(String::new()));
    }

    #[test]
    fn test_render_preserves_typed_form() {
        let raw = vec!["-n", "|", "sort", "|uniq", "-c"];
        assert_eq!(render_template(&parse_template(&raw)), raw);
    }
}
