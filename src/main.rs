//! kommit - CLI entry point.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use kommit::commit::{Collaborators, CommitMessageGenerator, Outcome, run_commit_workflow};
use kommit::config::Config;
use kommit::cost::{CostLedger, CostRecorder, RepositoryCosts, render_cost_table};
use kommit::error::{KommitError, LedgerError, LlmError};
use kommit::git::{Git, check_git_installed, current_repository_identity};
use kommit::init::{InitOutcome, run_init};
use kommit::llm::{Cost, OpenAiClient};
use kommit::ui::{self, TerminalPresenter};

/// Git therapy for your commitment issues.
#[derive(Parser, Debug)]
#[command(name = "kommit")]
#[command(about = "Turn staged changes into conventional commit messages with an LLM")]
#[command(version)]
struct Cli {
    /// Show the underlying cause of errors and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create .kommitrc.toml for this repository
    Init,
    /// Show what generation has cost per repository
    Cost,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => run_commit(cli.verbose).await,
        Some(Command::Init) => run_init_command(cli.verbose).await,
        Some(Command::Cost) => run_cost(cli.verbose),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "kommit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

async fn run_commit(verbose: bool) -> ExitCode {
    let outcome = tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => Ok(Outcome::UserCancelled),
        result = commit_session() => result,
    };

    match outcome {
        Ok(outcome) => {
            println!("{}", ui::farewell(outcome));
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::report_error(&e, verbose);
            ExitCode::FAILURE
        }
    }
}

async fn commit_session() -> Result<Outcome, KommitError> {
    check_git_installed()?;
    let git = Git::new();
    let config = Config::load(&git)?;

    let generator = CommitMessageGenerator::new(OpenAiClient::from_env(), config.model());
    let recorder = ledger_recorder(&git);
    let mut presenter = TerminalPresenter::new();

    run_commit_workflow(
        &config,
        Collaborators {
            diff_source: &git,
            generator: &generator,
            presenter: &mut presenter,
            executor: &git,
            recorder: recorder.as_ref(),
        },
    )
    .await
}

/// Ledger recorder for the current repository. Cost tracking problems are
/// logged and never stop a commit.
fn ledger_recorder(git: &Git) -> Box<dyn CostRecorder> {
    let ledger = CostLedger::from_env();
    let identity = current_repository_identity(git);
    match (ledger, identity) {
        (Ok(ledger), Ok(identity)) => Box::new(RepositoryCosts::new(ledger, identity)),
        (Err(e), _) => {
            warn!("Cost tracking disabled: {e}");
            Box::new(NoRecorder)
        }
        (_, Err(e)) => {
            warn!("Cost tracking disabled: {e}");
            Box::new(NoRecorder)
        }
    }
}

struct NoRecorder;

impl CostRecorder for NoRecorder {
    fn record(&self, cost: Cost) {
        debug!("Dropping cost ${cost:.5}");
    }
}

async fn run_init_command(verbose: bool) -> ExitCode {
    if let Err(e) = check_git_installed() {
        ui::report_error(&KommitError::from(e), verbose);
        return ExitCode::FAILURE;
    }

    let git = Git::new();
    let client = OpenAiClient::from_env();
    let recorder = ledger_recorder(&git);
    let mut presenter = TerminalPresenter::new();

    let result = tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => Ok(InitOutcome::Cancelled),
        result = run_init(&git, &client, &mut presenter, recorder.as_ref()) => result,
    };
    drop(presenter);

    match result {
        Ok(InitOutcome::AlreadyInitialized(path)) => {
            println!("🥹 Your repo is already in therapy! Treatment plan exists.");
            println!("{}", style(path.display()).dim());
            println!("🥰 Run `kommit` to continue the healing process!");
            ExitCode::SUCCESS
        }
        Ok(InitOutcome::Created { path, config }) => {
            println!("🥹 Your repo is in therapy! Treatment plan filled successfully.");
            println!("🥰 Run `kommit` to continue the healing process!");
            println!();
            println!("{}", style(path.display()).bold());
            println!("{}", config.to_toml());
            ExitCode::SUCCESS
        }
        Ok(InitOutcome::Cancelled) => {
            println!("{}", ui::farewell(Outcome::UserCancelled));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("😰 Therapy session interrupted: {e}");
            if let Some(hint) = init_hint(&e) {
                eprintln!("{}", style(hint).dim());
            }
            if verbose {
                eprintln!("{}", style(format!("{e:#}")).dim());
            }
            ExitCode::FAILURE
        }
    }
}

/// Hint for a known cause buried in an init failure.
fn init_hint(error: &anyhow::Error) -> Option<&'static str> {
    match error.downcast_ref::<LlmError>() {
        Some(LlmError::CredentialMissing) => KommitError::Llm(LlmError::CredentialMissing).hint(),
        _ => None,
    }
}

fn run_cost(verbose: bool) -> ExitCode {
    let result = CostLedger::from_env().and_then(|ledger| ledger.read_all());

    match result {
        Ok(costs) => {
            let current = current_repository_identity(&Git::new()).ok();
            println!("💰 Kommit Financial Therapy Session 💰");
            println!();
            print!("{}", render_cost_table(&costs, current.as_deref()));
            ExitCode::SUCCESS
        }
        Err(e @ LedgerError::NotFound(_)) => {
            let e = KommitError::from(e);
            println!("😰 {}", e.headline());
            if let Some(hint) = e.hint() {
                println!("{hint}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::report_error(&KommitError::from(e), verbose);
            ExitCode::FAILURE
        }
    }
}
