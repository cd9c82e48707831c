//! Terminal collaborators: selection menus, spinner and styled output.

use std::time::Duration;

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::commit::{ConfirmationChoice, GeneratedMessage, Outcome, Presenter};
use crate::error::{KommitError, PromptError};
use crate::init::InitPrompter;

const GENERATING: &str = "🧐 Helping your code express its feelings to future developers...";
const ANALYZING: &str = "🤔 Analyzing your repo's commitment issues...";
const PASSPHRASE_HINT: &str = "🔐 If signing is enabled, you may be prompted for your passphrase.";

/// Interactive presenter backed by dialoguer and indicatif.
#[derive(Default)]
pub struct TerminalPresenter {
    spinner: Option<ProgressBar>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn start_spinner(&mut self, message: &'static str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

impl Presenter for TerminalPresenter {
    fn generation_started(&mut self) {
        self.start_spinner(GENERATING);
    }

    fn generation_finished(&mut self) {
        self.stop_spinner();
    }

    fn present(&mut self, message: &GeneratedMessage) {
        println!("💭 Your therapist's recommendation:");
        println!("```text");
        println!("{}", style(message.signed()).green().bold());
        println!("```");
    }

    fn choose(&mut self) -> Result<Option<ConfirmationChoice>, PromptError> {
        let labels: Vec<&str> = ConfirmationChoice::ALL.iter().map(|c| c.label()).collect();
        let index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("🧐 Do you want to use this commit message?")
            .items(&labels[..])
            .default(0)
            .interact_opt()?;
        Ok(index.map(|index| ConfirmationChoice::ALL[index]))
    }

    fn committing(&mut self, choice: ConfirmationChoice) {
        if choice == ConfirmationChoice::EditThenCommit {
            println!("📝 Opening your personal therapy journal (editor)...");
        } else {
            println!("🧐 Preparing for your code's commitment ceremony...");
        }
        println!("{PASSPHRASE_HINT}");
    }
}

impl InitPrompter for TerminalPresenter {
    fn select_model(&mut self, models: &[&'static str]) -> Result<Option<String>, PromptError> {
        let index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("🧐 Choose your therapist's qualifications")
            .items(models)
            .default(0)
            .interact_opt()?;
        Ok(index.map(|index| models[index].to_string()))
    }

    fn select_types(
        &mut self,
        types: &[&'static str],
    ) -> Result<Option<Vec<String>>, PromptError> {
        let defaults = vec![true; types.len()];
        let indices = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select commit types for your therapy plan")
            .items(types)
            .defaults(&defaults)
            .interact_opt()?;
        Ok(indices.map(|indices| indices.into_iter().map(|i| types[i].to_string()).collect()))
    }

    fn analysis_started(&mut self) {
        self.start_spinner(ANALYZING);
    }

    fn analysis_finished(&mut self) {
        self.stop_spinner();
    }
}

/// Closing line for a finished commit session.
pub fn farewell(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Committed => {
            "🧐 Successfully committed! Your relationship with the repo has deepened!"
        }
        Outcome::CommittedWithEditor => {
            "🎓 Self-therapy complete! You've committed to your own path of growth."
        }
        Outcome::Aborted => {
            "🧐 You're on your own path now. Call if your commitment issues return!"
        }
        Outcome::UserCancelled => "🥹 See you next time!",
    }
}

/// Print an error headline, its hint, and with `verbose` the cause chain.
pub fn report_error(error: &KommitError, verbose: bool) {
    eprintln!("😰 {}", error.headline());
    if let Some(hint) = error.hint() {
        eprintln!("{}", style(hint).dim());
    }
    if verbose {
        eprintln!("{}", style(cause_chain(error)).dim());
    }
}

/// `Display` of an error followed by each source, one per line.
pub fn cause_chain(error: &dyn std::error::Error) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str("\n  caused by: ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
