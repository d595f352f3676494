//! Text transformations applied to a freshly cloned template.
//!
//! Everything here is pure: callers read the files, pass the contents in and
//! write the results back.

use toml_edit::{value, Array, DocumentMut, Item};

use super::ScaffoldError;

/// Agent wired in by the template; asking for it generates no new file.
pub const TEMPLATE_AGENT: &str = "SampleAgent";

/// README heading replaced with the project name.
pub const README_TITLE: &str = "# MCP Agent Service Template";

/// README tagline replaced with the project description.
pub const README_TAGLINE: &str = "Template for building MCP agent services in Rust.";

/// Lines in `src/agents/mod.rs` after which a new agent is wired in.
pub const MOD_ANCHOR: &str = "mod sample;";
pub const REEXPORT_ANCHOR: &str = "pub use sample::SampleAgent;";
pub const REGISTER_ANCHOR: &str = "    registry.register(Arc::new(SampleAgent::new()));";

const AGENT_TEMPLATE: &str = r#"//! __AGENT__ - generated agent.
//!
//! Replace the body of `process_input` with the real work (LLM calls, data
//! processing, external APIs). Timing and logging are handled by the envelope.

use async_trait::async_trait;

use crate::agents::{Agent, AgentError};
use crate::types::{Input, Output, Payload, TokenUsage};

#[derive(Debug, Clone, Copy, Default)]
pub struct __AGENT__;

impl __AGENT__ {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for __AGENT__ {
    fn name(&self) -> &str {
        "__AGENT__"
    }

    async fn process_input(&self, input: &Input) -> Result<Output, AgentError> {
        let payload = match &input.payload {
            Payload::Text(text) => Payload::Text(format!("{}_processed_by_{}", text, self.name())),
            Payload::Structured(map) => {
                let mut map = map.clone();
                map.insert("processedBy".to_string(), self.name().into());
                Payload::Structured(map)
            }
        };

        // Report real counts once an LLM is involved.
        Ok(Output::new(input.session_id.clone(), payload).with_token_usage(TokenUsage::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tags_text_input() {
        let output = __AGENT__::new()
            .process_input(&Input::new("s-1", "hello"))
            .await
            .unwrap();
        assert_eq!(output.payload, Payload::text("hello_processed_by___AGENT__"));
    }
}
"#;

/// Author and naming details written into the generated project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    pub project_name: String,
    pub description: String,
    pub agent_name: String,
    pub author_name: String,
    pub author_email: String,
}

impl ProjectDetails {
    /// `Name <email>` as written into `authors`.
    pub fn author(&self) -> String {
        format!("{} <{}>", self.author_name, self.author_email)
    }

    pub fn repository_url(&self) -> String {
        format!(
            "https://github.com/{}/{}",
            self.author_name, self.project_name
        )
    }

    pub fn homepage_url(&self) -> String {
        format!("{}#readme", self.repository_url())
    }
}

/// Cargo package names: ASCII letters, digits, `-` and `_`, not starting with a digit.
pub fn validate_project_name(name: &str) -> Result<(), ScaffoldError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidProjectName(name.to_string()))
    }
}

/// Agent names must be UpperCamelCase Rust type names.
pub fn validate_agent_name(name: &str) -> Result<(), ScaffoldError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => first.is_ascii_uppercase() && chars.all(|c| c.is_ascii_alphanumeric()),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidAgentName(name.to_string()))
    }
}

/// `SummaryAgent` -> `summary_agent`, `HTTPAgent` -> `http_agent`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Source of a new agent module.
pub fn render_agent(agent_name: &str) -> String {
    AGENT_TEMPLATE.replace("__AGENT__", agent_name)
}

fn insert_after(
    content: &str,
    anchor: &str,
    line: &str,
    file: &str,
) -> Result<String, ScaffoldError> {
    let mut out = String::with_capacity(content.len() + line.len() + 1);
    let mut inserted = false;
    for existing in content.split_inclusive('\n') {
        out.push_str(existing);
        if !inserted && existing.trim_end_matches(&['\r', '\n'][..]) == anchor {
            if !existing.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(line);
            out.push('\n');
            inserted = true;
        }
    }
    if inserted {
        Ok(out)
    } else {
        Err(ScaffoldError::AnchorNotFound {
            file: file.to_string(),
            anchor: anchor.to_string(),
        })
    }
}

/// Declare, re-export and register `agent_name` in `src/agents/mod.rs`.
pub fn register_agent(mod_rs: &str, agent_name: &str) -> Result<String, ScaffoldError> {
    let module = to_snake_case(agent_name);
    let declaration = format!("mod {};", module);
    if mod_rs.lines().any(|l| l.trim() == declaration) {
        return Err(ScaffoldError::AgentExists(agent_name.to_string()));
    }

    let file = "src/agents/mod.rs";
    let patched = insert_after(mod_rs, MOD_ANCHOR, &declaration, file)?;
    let patched = insert_after(
        &patched,
        REEXPORT_ANCHOR,
        &format!("pub use {}::{};", module, agent_name),
        file,
    )?;
    insert_after(
        &patched,
        REGISTER_ANCHOR,
        &format!("    registry.register(Arc::new({}::new()));", agent_name),
        file,
    )
}

/// Rewrite the `[package]` metadata of the template's `Cargo.toml`.
///
/// Edits happen in place, so comments, key order and inline tables survive.
pub fn patch_manifest(manifest: &str, details: &ProjectDetails) -> Result<String, ScaffoldError> {
    let mut doc: DocumentMut = manifest
        .parse()
        .map_err(|e: toml_edit::TomlError| ScaffoldError::Manifest(e.to_string()))?;

    let package = doc
        .get_mut("package")
        .and_then(Item::as_table_mut)
        .ok_or_else(|| ScaffoldError::Manifest("missing [package] table".to_string()))?;

    package["name"] = value(details.project_name.as_str());
    package["description"] = value(details.description.as_str());
    package["authors"] = value(Array::from_iter([details.author()]));
    package["repository"] = value(details.repository_url());
    package["homepage"] = value(details.homepage_url());

    Ok(doc.to_string())
}

/// Contents of the generated `.env`.
pub fn render_env(api_key: &str) -> String {
    format!(
        "PORT=3000
API_KEY={api_key}
LOG_LEVEL=info

# LLM API keys (set as needed)
# OPENAI_API_KEY=sk-...
# OPENAI_MODEL=gpt-4
"
    )
}

/// Replace the template title and tagline. Missing markers are left alone.
pub fn patch_readme(readme: &str, project_name: &str, description: &str) -> String {
    readme
        .replacen(README_TITLE, &format!("# {}", project_name), 1)
        .replacen(README_TAGLINE, description, 1)
}
