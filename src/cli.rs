//! Minimal CLI: load generation sessions → emit Java validation code
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use crate::ast::SourceFile;
use crate::render::{MessageValidation, validation_code};
use crate::type_system::TypeSystem;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile Protobuf validation rules into Java code blocks
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate the validation code for every message in the session
    Generate(GenerateOut),
    /// print the resolved type-URL → Java class table
    Types(TypesOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more session .json files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TypesOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

/// Everything one generation run needs: the declared types and the
/// per-message validation rules. Multiple session files merge by
/// concatenation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationSession {
    #[serde(default)]
    pub sources: Vec<SourceFile>,
    #[serde(default)]
    pub validations: Vec<MessageValidation>,
}

impl GenerationSession {
    fn merge(&mut self, other: GenerationSession) {
        self.sources.extend(other.sources);
        self.validations.extend(other.validations);
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> anyhow::Result<GenerationSession> {
        let source_paths =
            resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        let mut session = GenerationSession::default();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read {}", source_path.display()))?;
            let parsed = parse_session(&source)
                .with_context(|| format!("failed to parse {}", source_path.display()))?;
            session.merge(parsed);
        }
        Ok(session)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let session = target.input_settings.load()?;
                let types = TypeSystem::for_sources(&session.sources);
                let mut rendered = String::new();
                for validation in &session.validations {
                    let block = validation_code(validation, &types)
                        .with_context(|| format!("while generating `{}`", validation.label()))?;
                    rendered.push_str(&format!("// {}\n{block}\n", validation.label()));
                }
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &rendered)?;
                } else {
                    println!("{rendered}");
                }
            }
            Command::Types(target) => {
                let session = target.input_settings.load()?;
                let types = TypeSystem::for_sources(&session.sources);
                for (url, class) in types.iter() {
                    println!("{url} => {class}");
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Deserialize a session keeping the JSON path in error messages.
fn parse_session(src: &str) -> anyhow::Result<GenerationSession> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let path = err.path().to_string();
        anyhow::anyhow!("at JSON path {path} → {}", err.into_inner())
    })
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"{
        "sources": [
            {
                "file": {
                    "path": "spine/kanban/wip_limit.proto",
                    "package": "spine.kanban",
                    "java_package": "io.spine.kanban",
                    "java_multiple_files": true
                },
                "types": [ { "package": "spine.kanban", "simple_name": "WipLimit" } ]
            }
        ],
        "validations": [
            {
                "name": { "package": "spine.kanban", "simple_name": "WipLimit" },
                "rules": [
                    { "simple": {
                        "field": {
                            "name": "value",
                            "declaring_type": { "package": "spine.kanban", "simple_name": "WipLimit" },
                            "type": { "primitive": "uint32" }
                        },
                        "sign": "less_or_equal",
                        "other_value": { "number": 100 },
                        "error_message": "WIP limit must not exceed {other}."
                    } }
                ]
            }
        ]
    }"#;

    #[test]
    fn session_parses_and_renders_end_to_end() {
        let session = parse_session(SESSION).unwrap();
        assert_eq!(session.sources.len(), 1);
        assert_eq!(session.validations.len(), 1);

        let types = TypeSystem::for_sources(&session.sources);
        let class = types.iter().next().unwrap().1;
        assert_eq!(class.qualified(), "io.spine.kanban.WipLimit");

        let code = validation_code(&session.validations[0], &types).unwrap().to_string();
        assert!(code.contains("result.getValue() <= 100"), "{code}");
    }

    #[test]
    fn parse_errors_carry_the_json_path() {
        let bad = r#"{ "validations": [ { "name": { "simple_name": "X" }, "rules": [ 42 ] } ] }"#;
        let err = parse_session(bad).unwrap_err().to_string();
        assert!(err.contains("validations[0].rules[0]"), "{err}");
    }

    #[test]
    fn literal_paths_pass_through_unresolved() {
        let paths = resolve_file_path_patterns(["session.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("session.json")]);
    }
}
