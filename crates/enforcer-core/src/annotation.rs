//! GitHub Actions workflow-command annotations.
//!
//! Annotations are printed verbatim to stdout, outside the log formatter,
//! so the runner can pick them up and surface them in the checks UI.

/// Severity of a workflow-command annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Error,
    Warning,
}

impl AnnotationLevel {
    fn command(&self) -> &'static str {
        match self {
            AnnotationLevel::Error => "error",
            AnnotationLevel::Warning => "warning",
        }
    }
}

/// A single `::<level> title=...::<message>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub level: AnnotationLevel,
    pub title: String,
    pub message: String,
}

impl Annotation {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: AnnotationLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// The annotation every terminal gate failure emits.
    pub fn gate_failed(reason: impl std::fmt::Display) -> Self {
        Self::error("PR Checks Failed", reason.to_string())
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "::{} title={}::{}",
            self.level.command(),
            escape_property(&self.title),
            escape_data(&self.message)
        )
    }
}

// Escaping rules from the Actions toolkit `command.ts`.
fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_failed_annotation() {
        let a = Annotation::gate_failed("Failed checks: lint");
        assert_eq!(
            a.to_string(),
            "::error title=PR Checks Failed::Failed checks: lint"
        );
    }

    #[test]
    fn test_message_newlines_escaped() {
        let a = Annotation::error("t", "line one\nline two 100%");
        assert_eq!(a.to_string(), "::error title=t::line one%0Aline two 100%25");
    }

    #[test]
    fn test_title_separators_escaped() {
        let a = Annotation {
            level: AnnotationLevel::Warning,
            title: "a:b,c".to_string(),
            message: "m".to_string(),
        };
        assert_eq!(a.to_string(), "::warning title=a%3Ab%2Cc::m");
    }
}
