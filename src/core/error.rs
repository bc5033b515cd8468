use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationInvalidArgument,

    DescriptorInvalidJson,
    TemplateFileNotFound,

    PromptReadFailed,

    GitCommandFailed,
    ExternalCommandFailed,
    HostingRequestFailed,
    CredentialsUnavailable,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::DescriptorInvalidJson => "descriptor.invalid_json",
            ErrorCode::TemplateFileNotFound => "template.file_not_found",

            ErrorCode::PromptReadFailed => "prompt.read_failed",

            ErrorCode::GitCommandFailed => "git.command_failed",
            ErrorCode::ExternalCommandFailed => "external.command_failed",
            ErrorCode::HostingRequestFailed => "hosting.request_failed",
            ErrorCode::CredentialsUnavailable => "credentials.unavailable",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    pub program: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(InvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(key: impl Into<String>, problem: impl Into<String>) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: key.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn descriptor_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let path = path.into();
        let details = to_details(InvalidJsonDetails {
            path: path.clone(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::DescriptorInvalidJson,
            format!("Package descriptor is not valid JSON: {}", path),
            details,
        )
        .with_hint("Fix or remove the file, then run pkgseed again")
    }

    pub fn template_file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::TemplateFileNotFound,
            format!("Template file not found: {}", path),
            serde_json::json!({ "path": path }),
        )
        .with_hint("Set 'templateDir' in pkgseed.json to a directory containing your templates")
    }

    pub fn prompt_read_failed(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PromptReadFailed,
            "Failed to read input",
            to_details(InternalErrorDetails {
                error: error.into(),
                context: None,
            }),
        )
    }

    pub fn git_command_failed(details: CommandFailedDetails) -> Self {
        let message = format!("git {} failed", details.args.join(" "));
        Self::new(ErrorCode::GitCommandFailed, message, to_details(details))
    }

    pub fn external_command_failed(details: CommandFailedDetails) -> Self {
        let message = format!("{} failed", details.program);
        Self::new(ErrorCode::ExternalCommandFailed, message, to_details(details))
    }

    pub fn hosting_request_failed(message: impl Into<String>, context: Option<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::HostingRequestFailed,
            "Hosting request failed",
            to_details(InternalErrorDetails {
                error: message,
                context,
            }),
        )
    }

    pub fn credentials_unavailable(entry: impl Into<String>) -> Self {
        let entry = entry.into();
        Self::new(
            ErrorCode::CredentialsUnavailable,
            format!("No credentials found for {}", entry),
            serde_json::json!({ "entry": entry }),
        )
        .with_hint(
            "Export GH_TOKEN or store a token in the system keychain under service 'pkgseed'",
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_invalid_json_carries_path_and_hint() {
        let parse_err = serde_json::from_str::<Value>("{").unwrap_err();
        let err = Error::descriptor_invalid_json("/tmp/pkg/package.json", parse_err);

        assert_eq!(err.code.as_str(), "descriptor.invalid_json");
        assert_eq!(err.details["path"], "/tmp/pkg/package.json");
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn git_command_failed_names_the_subcommand() {
        let err = Error::git_command_failed(CommandFailedDetails {
            program: "git".to_string(),
            args: vec!["remote".to_string(), "add".to_string()],
            exit_code: Some(128),
            stderr: "fatal".to_string(),
        });

        assert_eq!(err.message, "git remote add failed");
        assert_eq!(err.details["exitCode"], 128);
    }
}
