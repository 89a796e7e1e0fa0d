use std::fs;
use std::io::{IsTerminal, Read};

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) kind: SourceKind,
    pub(crate) path: Option<String>,
    pub(crate) content: String,
}

impl ResolvedSource {
    /// `file:<path>` or `stdin`, echoed back in command payloads.
    pub(crate) fn label(&self) -> String {
        match &self.path {
            Some(path) => format!("{}:{path}", self.kind.as_str()),
            None => self.kind.as_str().to_string(),
        }
    }
}

/// Reads one JSON document from a file path, or from stdin when the path is
/// `-` or absent. Supplying both is rejected.
pub(crate) fn resolve_source(
    path: Option<String>,
    stdin_override: Option<String>,
    command: &str,
) -> CoreResult<ResolvedSource> {
    let stdin_body = read_stdin(stdin_override, command)?;

    if let Some(path_value) = path {
        if path_value == "-" {
            return match stdin_body {
                Some(content) => Ok(ResolvedSource {
                    kind: SourceKind::Stdin,
                    path: None,
                    content,
                }),
                None => Err(CoreError::invalid_argument_for_command(
                    "Path `-` means stdin input, but stdin was empty. Pipe JSON input or pass a file path.",
                    Some(command),
                )),
            };
        }

        let content = fs::read_to_string(&path_value).map_err(|error| {
            CoreError::invalid_argument_with_recovery(
                &format!("Could not read input file `{path_value}`: {error}"),
                vec![
                    "Verify the path exists and is readable.".to_string(),
                    format!("Rerun `leme {command} <path>`."),
                ],
            )
        })?;

        if stdin_body.is_some() {
            return Err(CoreError::invalid_argument_for_command(
                "Both stdin and file input were provided. Pass exactly one source: either a file path or piped stdin.",
                Some(command),
            ));
        }

        return Ok(ResolvedSource {
            kind: SourceKind::File,
            path: Some(path_value),
            content,
        });
    }

    match stdin_body {
        Some(content) => Ok(ResolvedSource {
            kind: SourceKind::Stdin,
            path: None,
            content,
        }),
        None => Err(CoreError::invalid_argument_for_command(
            "No input provided. Pass a file path or pipe JSON via stdin.",
            Some(command),
        )),
    }
}

fn read_stdin(stdin_override: Option<String>, command: &str) -> CoreResult<Option<String>> {
    let buffer = match stdin_override {
        Some(value) => value,
        None => {
            if std::io::stdin().is_terminal() {
                return Ok(None);
            }
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|error| {
                    CoreError::invalid_argument_with_recovery(
                        &format!("Could not read stdin: {error}"),
                        vec![
                            "Retry with an explicit file path argument.".to_string(),
                            format!("Run `leme {command} --help` for usage."),
                        ],
                    )
                })?;
            buffer
        }
    };

    if buffer.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(buffer))
}
