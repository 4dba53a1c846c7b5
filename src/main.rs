//! codescribe - CLI entry point.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use codescribe::bridge::Bridge;
use codescribe::git::check_git_installed;
use codescribe::panel::SystemClipboard;
use codescribe::{
    Config, DiffSource, Generator, GitCli, Host, HostCommand, HtmlRenderer, HttpGenerator,
    ListNode, Notice, NoticeLevel, Orchestrator, PanelMessage, PanelSnapshot, SlotId,
    StagedChangeWatcher, StagedChangesView,
};

/// Generate commit messages, PR descriptions and branch/issue names from staged changes.
#[derive(Parser, Debug)]
#[command(name = "codescribe")]
#[command(about = "Generate commit messages, PR descriptions and branch/issue names from staged changes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Workspace folder (defaults to the current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Base URL of the generation backend
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Write the rendered panel HTML here after a one-shot command
    #[arg(long, global = true)]
    html: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message from staged changes
    Commit,

    /// Generate a PR description from staged changes
    Describe,

    /// Generate a branch name from a description, or from staged changes
    Branch {
        /// Free-text description of the branch
        #[arg(long)]
        text: Option<String>,
    },

    /// Generate an issue name from a description
    Issue {
        /// Free-text description of the issue
        #[arg(long, default_value = "")]
        text: String,
    },

    /// List staged files
    Staged,

    /// List staged files every time the staging index changes
    Watch,

    /// Run the panel over stdin/stdout JSON lines
    Panel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let workspace = match cli.workspace {
        Some(path) => path,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };
    let config = Config::resolve(cli.backend_url.as_deref(), Some(&workspace))
        .context("Invalid configuration")?;

    if !check_git_installed() {
        warn!("git was not found in PATH; staged changes will be unavailable");
    }

    let diffs: Arc<dyn DiffSource> = Arc::new(GitCli::new(config.workspace.clone()));

    match cli.command {
        Command::Staged => {
            let mut view = StagedChangesView::new(diffs);
            print_nodes(view.refresh().await);
        }
        Command::Watch => watch(diffs, config.workspace.clone()).await?,
        Command::Panel => {
            let generator = http_generator(&config)?;
            Bridge::new(
                diffs,
                generator,
                Box::new(SystemClipboard),
                config.workspace.clone(),
                std::io::stdout(),
            )
            .context("Failed to start the panel")?
            .run(BufReader::new(tokio::io::stdin()))
            .await
            .context("Panel bridge failed")?;
        }
        command => {
            let generator = http_generator(&config)?;
            one_shot(command, diffs, generator, cli.html.as_deref()).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "codescribe=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn http_generator(config: &Config) -> Result<Arc<dyn Generator>> {
    let generator = HttpGenerator::new(config.backend_url.clone(), config.timeout)
        .context("Failed to build the HTTP client")?;
    Ok(Arc::new(generator))
}

/// Host for one-shot commands: notices go to stderr.
#[derive(Default)]
struct ConsoleHost {
    snapshot: Option<PanelSnapshot>,
    failed: bool,
}

impl Host for ConsoleHost {
    fn render(&mut self, snapshot: &PanelSnapshot) {
        self.snapshot = Some(snapshot.clone());
    }

    fn notify(&mut self, notice: Notice) {
        if notice.level == NoticeLevel::Error {
            self.failed = true;
        }
        eprintln!("{}", notice.message);
    }
}

/// Run one generation the way the panel would and print the result.
async fn one_shot(
    command: Command,
    diffs: Arc<dyn DiffSource>,
    generator: Arc<dyn Generator>,
    html: Option<&Path>,
) -> Result<()> {
    let mut orchestrator = Orchestrator::new(
        diffs,
        generator,
        Box::new(SystemClipboard),
        ConsoleHost::default(),
    );

    let slot = match command {
        Command::Commit => {
            orchestrator
                .run_command(HostCommand::GenerateCommitMessage)
                .await;
            SlotId::Commit
        }
        Command::Describe => {
            orchestrator
                .run_command(HostCommand::GeneratePrDescription)
                .await;
            SlotId::Description
        }
        Command::Branch { text: Some(text) } => {
            orchestrator
                .handle_message(PanelMessage::GenerateBranchFromText { text })
                .await;
            SlotId::BranchOrIssue
        }
        Command::Branch { text: None } => {
            orchestrator
                .handle_message(PanelMessage::GenerateBranchFromChanges)
                .await;
            SlotId::BranchOrIssue
        }
        Command::Issue { text } => {
            orchestrator
                .handle_message(PanelMessage::GenerateIssueName { text })
                .await;
            SlotId::BranchOrIssue
        }
        Command::Staged | Command::Watch | Command::Panel => return Ok(()),
    };

    orchestrator.settle().await;

    let result = orchestrator.state().slot(slot);
    if !result.is_placeholder() && !orchestrator.host().failed {
        println!("{}", result.content());
    }

    if let (Some(path), Some(snapshot)) = (html, orchestrator.host().snapshot.as_ref()) {
        write_html(path, snapshot)?;
    }

    Ok(())
}

/// Print the staged changes list whenever the staging index changes.
async fn watch(diffs: Arc<dyn DiffSource>, workspace: Option<PathBuf>) -> Result<()> {
    let (mut watcher, mut changes) = StagedChangeWatcher::new(workspace);
    watcher
        .bind()
        .context("Cannot watch the staging index")?;

    let mut view = StagedChangesView::new(diffs);
    print_nodes(view.refresh().await);

    loop {
        tokio::select! {
            Some(()) = changes.recv() => {
                println!();
                print_nodes(view.refresh().await);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn print_nodes(nodes: &[ListNode]) {
    for node in nodes {
        match node {
            ListNode::File { path } => println!("{}", path),
            ListNode::Placeholder { label } => println!("{}", label),
        }
    }
}

/// Render the panel and replace `path` atomically.
fn write_html(path: &Path, snapshot: &PanelSnapshot) -> Result<()> {
    let html = HtmlRenderer::new()
        .and_then(|renderer| renderer.render(snapshot))
        .context("Failed to render panel")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Cannot create a file in {}", dir.display()))?;
    file.write_all(html.as_bytes())
        .context("Failed to write panel HTML")?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
