use crate::commands::template::{TemplateToken, parse_template, render_template};

/// An alias: a program plus a fixed argument template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub path: String,
    pub template: Vec<TemplateToken>,
    pub locked: bool,
    pub comment: Option<String>,
}

impl Command {
    /// Create an unlocked alias from a program and raw template tokens.
    pub fn new<I, S>(path: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Command {
            path: path.into(),
            template: parse_template(args),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// The template in the raw string form the user typed
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        render_template(&self.template)
    }

    /// An alias without a program cannot be executed
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        !self.path.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parses_template() {
        let cmd = Command::new("ls", ["-l", "|grep", "rs"]);
        assert_eq!(cmd.template.len(), 3);
        assert_eq!(cmd.args(), vec!["-l", "|grep", "rs"]);
        assert!(!cmd.locked);
        assert!(cmd.is_runnable());
    }

    #[test]
    fn test_blank_path_is_not_runnable() {
        assert!(!Command::new("  ", Vec::<String>::new()).is_runnable());
    }
}
