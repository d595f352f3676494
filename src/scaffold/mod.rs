//! Project generator behind the `create-agent` binary.
//!
//! # Steps
//! 1. Clone the template repository and drop its git history
//! 2. Rewrite package metadata, wire in the new agent, write `.env` and README
//! 3. Initialize a fresh git repository
//! 4. Optionally build and test the generated project

mod template;

pub use template::{
    patch_manifest, patch_readme, register_agent, render_agent, render_env, to_snake_case,
    validate_agent_name, validate_project_name, ProjectDetails, MOD_ANCHOR, README_TAGLINE,
    README_TITLE, REEXPORT_ANCHOR, REGISTER_ANCHOR, TEMPLATE_AGENT,
};

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

pub const DEFAULT_DESCRIPTION: &str = "MCP Agent Service";
pub const DEFAULT_AGENT_NAME: &str = "CustomAgent";

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Invalid project name '{0}': use ASCII letters, digits, '-' or '_'")]
    InvalidProjectName(String),

    #[error("Invalid agent name '{0}': expected an UpperCamelCase type name")]
    InvalidAgentName(String),

    #[error("Directory {0} already exists")]
    DirectoryExists(PathBuf),

    #[error("Agent {0} is already registered")]
    AgentExists(String),

    #[error("Anchor line `{anchor}` not found in {file}")]
    AnchorNotFound { file: String, anchor: String },

    #[error("Invalid Cargo.toml: {0}")]
    Manifest(String),

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Target directory for a new project, refusing to reuse an existing path.
pub fn project_dir(parent: &Path, project_name: &str) -> Result<PathBuf, ScaffoldError> {
    validate_project_name(project_name)?;
    let dir = parent.join(project_name);
    if dir.exists() {
        return Err(ScaffoldError::DirectoryExists(dir));
    }
    Ok(dir)
}

/// Run a command in `dir`, capturing output. Non-zero exit is an error.
pub fn run_command(program: &str, args: &[&str], dir: &Path) -> Result<(), ScaffoldError> {
    let command = format!("{} {}", program, args.join(" "));
    tracing::debug!("Running `{}` in {}", command, dir.display());

    let output = Command::new(program).args(args).current_dir(dir).output()?;
    if output.status.success() {
        Ok(())
    } else {
        Err(ScaffoldError::CommandFailed {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Clone `template_url` into `dir` and remove the template's `.git`.
pub fn clone_template(template_url: &str, dir: &Path) -> Result<(), ScaffoldError> {
    let parent = dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let target = dir.to_string_lossy();
    run_command("git", &["clone", "--depth", "1", template_url, &target], parent)?;

    let git_dir = dir.join(".git");
    if git_dir.exists() {
        fs::remove_dir_all(git_dir)?;
    }
    Ok(())
}

/// Apply every file change to a cloned template.
///
/// Returns the paths written, relative to `dir`.
pub fn customize_project(
    dir: &Path,
    details: &ProjectDetails,
    api_key: &str,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    validate_agent_name(&details.agent_name)?;
    let mut written = Vec::new();

    let manifest_path = dir.join("Cargo.toml");
    let manifest = fs::read_to_string(&manifest_path)?;
    fs::write(&manifest_path, patch_manifest(&manifest, details)?)?;
    written.push(PathBuf::from("Cargo.toml"));

    if details.agent_name != TEMPLATE_AGENT {
        let agents_dir = dir.join("src").join("agents");
        let relative = PathBuf::from("src")
            .join("agents")
            .join(format!("{}.rs", to_snake_case(&details.agent_name)));

        let mod_path = agents_dir.join("mod.rs");
        let patched = register_agent(&fs::read_to_string(&mod_path)?, &details.agent_name)?;

        let agent_path = dir.join(&relative);
        if agent_path.exists() {
            return Err(ScaffoldError::AgentExists(details.agent_name.clone()));
        }
        fs::write(&agent_path, render_agent(&details.agent_name))?;
        fs::write(&mod_path, patched)?;
        written.push(relative);
        written.push(PathBuf::from("src").join("agents").join("mod.rs"));
    }

    fs::write(dir.join(".env"), render_env(api_key))?;
    written.push(PathBuf::from(".env"));

    let readme_path = dir.join("README.md");
    if readme_path.exists() {
        let readme = fs::read_to_string(&readme_path)?;
        fs::write(
            &readme_path,
            patch_readme(&readme, &details.project_name, &details.description),
        )?;
        written.push(PathBuf::from("README.md"));
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "[package]\nname = \"mcp-agent\"\nversion = \"0.1.0\"\n";

    const MOD_RS: &str = "mod sample;\npub use sample::SampleAgent;\n\nfn build() {\n    registry.register(Arc::new(SampleAgent::new()));\n}\n";

    fn template_tree() -> tempfile::TempDir {
        let temp = tempfile::tempdir().expect("tempdir");
        let agents = temp.path().join("src").join("agents");
        fs::create_dir_all(&agents).unwrap();
        fs::write(temp.path().join("Cargo.toml"), MANIFEST).unwrap();
        fs::write(agents.join("mod.rs"), MOD_RS).unwrap();
        fs::write(
            temp.path().join("README.md"),
            format!("{}\n\n{}\n", README_TITLE, README_TAGLINE),
        )
        .unwrap();
        temp
    }

    fn details(agent_name: &str) -> ProjectDetails {
        ProjectDetails {
            project_name: "my-agent".to_string(),
            description: "My agent".to_string(),
            agent_name: agent_name.to_string(),
            author_name: "octo".to_string(),
            author_email: "octo@example.com".to_string(),
        }
    }

    #[test]
    fn existing_directory_is_refused() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("taken")).unwrap();

        assert!(matches!(
            project_dir(temp.path(), "taken"),
            Err(ScaffoldError::DirectoryExists(_))
        ));
        assert_eq!(
            project_dir(temp.path(), "fresh").unwrap(),
            temp.path().join("fresh")
        );
    }

    #[test]
    fn customizes_template_with_new_agent() {
        let temp = template_tree();
        let written = customize_project(temp.path(), &details("CustomAgent"), "k3y").unwrap();

        assert!(written.contains(&PathBuf::from("src/agents/custom_agent.rs")));

        let agent = fs::read_to_string(temp.path().join("src/agents/custom_agent.rs")).unwrap();
        assert!(agent.contains("pub struct CustomAgent;"));

        let mod_rs = fs::read_to_string(temp.path().join("src/agents/mod.rs")).unwrap();
        assert!(mod_rs.contains("mod custom_agent;"));
        assert!(mod_rs.contains("registry.register(Arc::new(CustomAgent::new()));"));

        let manifest = fs::read_to_string(temp.path().join("Cargo.toml")).unwrap();
        assert!(manifest.contains("name = \"my-agent\""));

        let env = fs::read_to_string(temp.path().join(".env")).unwrap();
        assert!(env.contains("API_KEY=k3y"));

        let readme = fs::read_to_string(temp.path().join("README.md")).unwrap();
        assert!(readme.starts_with("# my-agent\n\nMy agent\n"));
    }

    #[test]
    fn template_agent_generates_no_module() {
        let temp = template_tree();
        customize_project(temp.path(), &details(TEMPLATE_AGENT), "k3y").unwrap();

        let mod_rs = fs::read_to_string(temp.path().join("src/agents/mod.rs")).unwrap();
        assert_eq!(mod_rs, MOD_RS);
        assert!(!temp.path().join("src/agents/sample_agent.rs").exists());
    }

    #[test]
    fn missing_anchor_leaves_agents_untouched() {
        let temp = template_tree();
        fs::write(temp.path().join("src/agents/mod.rs"), "mod other;\n").unwrap();

        let err = customize_project(temp.path(), &details("CustomAgent"), "k3y").unwrap_err();
        assert!(matches!(err, ScaffoldError::AnchorNotFound { .. }));
        assert!(!temp.path().join("src/agents/custom_agent.rs").exists());
    }

    #[test]
    fn failing_command_reports_stderr() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = run_command("git", &["not-a-git-command"], temp.path()).unwrap_err();
        match err {
            ScaffoldError::CommandFailed { command, .. } => {
                assert_eq!(command, "git not-a-git-command")
            }
            // git missing from PATH surfaces as an I/O error instead.
            ScaffoldError::Io(_) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
