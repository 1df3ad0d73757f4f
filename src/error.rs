//! CLI error types

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("command '{namespace}' requires flag(s): {}", format_flags(.flags))]
    MissingFlags {
        namespace: String,
        flags: Vec<String>,
    },

    #[error("command '{namespace}' requires at least one complete set of flags: {}", format_sets(.sets))]
    MissingFlagSets {
        namespace: String,
        sets: Vec<Vec<String>>,
    },

    #[error("user cancelled {0}")]
    Cancelled(String),

    #[error("{} operation(s) failed:\n{}", .0.len(), .0.join("\n"))]
    Aggregate(Vec<String>),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication required. Set IONOS_TOKEN or both IONOS_USERNAME and IONOS_PASSWORD, or run 'ionosctl config login'")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("field '{path}' not found in response")]
    MissingField { path: String },

    #[error("Invalid location '{0}': expected <country>/<code>, e.g. de/fra")]
    Location(String),

    #[error("invalid size '{input}': {reason}")]
    InvalidSize { input: String, reason: String },

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("timed out after {0}s waiting for request to finish")]
    WaitTimeout(u64),
}

fn format_flags(flags: &[String]) -> String {
    flags
        .iter()
        .map(|f| format!("--{}", f))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_sets(sets: &[Vec<String>]) -> String {
    sets.iter()
        .map(|set| format!("[{}]", format_flags(set)))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flags_lists_every_flag() {
        let err = CliError::MissingFlags {
            namespace: "cdn.distribution.create".to_string(),
            flags: vec!["domain".to_string(), "routing-rules".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "command 'cdn.distribution.create' requires flag(s): --domain, --routing-rules"
        );
    }

    #[test]
    fn missing_flag_sets_lists_alternatives() {
        let err = CliError::MissingFlagSets {
            namespace: "cdn.distribution.delete".to_string(),
            sets: vec![vec!["distribution-id".to_string()], vec!["all".to_string()]],
        };
        assert!(err.to_string().ends_with("[--distribution-id] | [--all]"));
    }

    #[test]
    fn aggregate_enumerates_failures() {
        let err = CliError::Aggregate(vec!["a: boom".to_string(), "b: bang".to_string()]);
        assert_eq!(err.to_string(), "2 operation(s) failed:\na: boom\nb: bang");
    }
}
