//! `create-agent` - generate a new agent service from the template repository.
//!
//! Missing values are prompted for interactively; `--yes` accepts the defaults.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Parser;
use console::style;
use dialoguer::Input;

use mcp_agent::scaffold::{
    self, ProjectDetails, DEFAULT_AGENT_NAME, DEFAULT_DESCRIPTION, TEMPLATE_AGENT,
};
use mcp_agent::util::generate_api_key;

/// Create a new MCP agent service.
#[derive(Parser)]
#[command(name = "create-agent", version, about, long_about = None)]
struct Cli {
    /// Project (and directory) name.
    project_name: Option<String>,

    /// Short project description.
    #[arg(long)]
    description: Option<String>,

    /// Agent type name, e.g. SummaryAgent.
    #[arg(long)]
    agent_name: Option<String>,

    #[arg(long)]
    author_name: Option<String>,

    #[arg(long)]
    author_email: Option<String>,

    /// Git URL of the template repository.
    #[arg(long, env = "MCP_AGENT_TEMPLATE")]
    template: Option<String>,

    /// Skip `cargo build` and `cargo test` in the new project.
    #[arg(long)]
    skip_install: bool,

    /// Accept defaults instead of prompting.
    #[arg(short, long)]
    yes: bool,
}

/// Take the flag value, else prompt (or use the default under `--yes`).
fn ask<F>(
    value: Option<String>,
    prompt: &str,
    default: Option<&str>,
    yes: bool,
    check: F,
) -> Result<String>
where
    F: Fn(&str) -> Result<(), String>,
{
    if let Some(value) = value {
        check(&value).map_err(|e| anyhow::anyhow!(e))?;
        return Ok(value);
    }
    if yes {
        return match default {
            Some(d) => Ok(d.to_string()),
            None => bail!("{} is required", prompt),
        };
    }

    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(d) = default {
        input = input.default(d.to_string());
    }
    let answer = input
        .validate_with(|s: &String| check(s.trim()))
        .interact_text()?;
    Ok(answer.trim().to_string())
}

fn any(_: &str) -> Result<(), String> {
    Ok(())
}

fn step(message: &str) {
    println!("  {} {}", style("→").blue(), message);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!();
    println!("  {}", style("MCP Agent Creator").bold().blue());
    println!();

    let project_name = ask(cli.project_name, "Project name", None, cli.yes, |s| {
        scaffold::validate_project_name(s).map_err(|e| e.to_string())
    })?;
    let description = ask(
        cli.description,
        "Project description",
        Some(DEFAULT_DESCRIPTION),
        cli.yes,
        any,
    )?;
    let agent_name = ask(
        cli.agent_name,
        "Agent name (e.g. SummaryAgent)",
        Some(DEFAULT_AGENT_NAME),
        cli.yes,
        |s| scaffold::validate_agent_name(s).map_err(|e| e.to_string()),
    )?;
    let author_name = ask(cli.author_name, "Author name", Some("Your Name"), cli.yes, any)?;
    let author_email = ask(
        cli.author_email,
        "Author email",
        Some("your.email@example.com"),
        cli.yes,
        any,
    )?;
    let template = ask(cli.template, "Template repository URL", None, cli.yes, any)?;

    let details = ProjectDetails {
        project_name,
        description,
        agent_name,
        author_name,
        author_email,
    };

    let cwd = std::env::current_dir()?;
    let dir = scaffold::project_dir(&cwd, &details.project_name)?;

    println!();
    println!("  {}", style("Creating project...").yellow());

    step("Cloning template");
    scaffold::clone_template(&template, &dir)?;

    step("Updating Cargo.toml, .env and README");
    if details.agent_name != TEMPLATE_AGENT {
        step(&format!("Creating agent {}", details.agent_name));
    }
    scaffold::customize_project(&dir, &details, &generate_api_key())?;

    step("Initializing git repository");
    scaffold::run_command("git", &["init"], &dir)?;

    if cli.skip_install {
        step("Skipping build and tests");
    } else {
        step("Building");
        scaffold::run_command("cargo", &["build"], &dir)?;
        step("Running tests");
        scaffold::run_command("cargo", &["test"], &dir)?;
    }

    print_next_steps(&details, &dir);
    Ok(())
}

fn print_next_steps(details: &ProjectDetails, dir: &Path) {
    let route = mcp_agent::agents::AgentRegistry::key_for(&details.agent_name);

    println!();
    println!(
        "  {} Project created in {}",
        style("✓").green().bold(),
        style(dir.display()).cyan()
    );
    println!();
    println!("  {}", style("Next steps:").green());
    println!("    cd {}", details.project_name);
    println!("    env $(grep -v '^#' .env | xargs) cargo run");
    println!();
    println!("  {}", style("Try it:").yellow());
    println!("    curl http://localhost:3000/health");
    if details.agent_name != TEMPLATE_AGENT {
        println!(
            "    curl -X POST http://localhost:3000/agents/{}/process -H 'x-api-key: <API_KEY>' \\",
            route
        );
        println!("         -H 'content-type: application/json' -d '{{\"sessionId\":\"s1\",\"input\":\"hello\"}}'");
    }
    println!();
}
