//! Prompt construction for conventional commit messages.
//!
//! The rule sections always precede the diff so a long diff can never push
//! the instructions out of the model's context.

use std::fmt::Write;

use crate::config::Config;

const TASK: &str = "Generate a single commit message following the **Conventional Commit** \
format, adhering to these rules:\n";

const GENERAL_RULES: &str = "
## **General Rules**
- **Do not**:
  - Wrap the message in a code block or triple backticks.
  - Use `build` as a scope.
  - Suggest `feat` for build scripts.
  - Include comments or remarks.

- **Do**:
  - Try your best to guess what the git diff is about.
  - Wrap lines at **72 characters**.
";

const TYPE_GUIDELINES: &str = "
## **Commit Type Guidelines**
- Use **lowercase** commit types:
  - `build`: For build systems, scripts, or settings (e.g., Makefile, Dockerfile).
  - `docs`: For documentation changes (e.g., README, CHANGELOG), **but not** script or code changes.
";

const SCOPE_RULES: &str = "
## **Scope Rules**
- Use the **module or package name** as the scope.
- **Leave the scope empty** if:
  - The changes are **not** tied to a specific module or package.
  - The changes span **multiple modules, packages, files or scopes**.
";

const MESSAGE_FORMATTING: &str = "
## **Message Formatting**
- **Subject**:
  - Use **imperative mood** (present tense).
- **Body _(only if changes are significant)_**:
  - Use **bullet points**.
  - Use **imperative mood** (present tense).
  - Capitalize the **first letter** of each bullet point.
  - Wrap lines at **72 characters**.
";

/// Build the commit-message prompt from the repository vocabulary and the
/// staged diff.
///
/// Pure and deterministic: identical inputs give byte-identical output.
pub fn build_commit_prompt(config: &Config, diff: &str) -> String {
    let mut prompt = String::with_capacity(2048 + diff.len());

    prompt.push_str(TASK);
    prompt.push_str(GENERAL_RULES);
    prompt.push_str(TYPE_GUIDELINES);
    prompt.push_str(SCOPE_RULES);
    prompt.push_str(MESSAGE_FORMATTING);

    prompt.push_str("\n## Context:\n");
    prompt.push_str("- **Allowed commit types**:\n");
    push_quoted_list(&mut prompt, &config.commit.types);
    prompt.push_str("- **Allowed scopes _(only if changes are limited to a single scope)_**:\n");
    push_quoted_list(&mut prompt, &config.commit.scopes);
    prompt.push_str(
        "  - **Note:** If the changes span multiple scopes, or none of the above, \
         do not use a scope in the commit message.\n",
    );

    prompt.push_str("\n## Git Diff:\n");
    prompt.push_str("**Based on the following diff**:\n");
    let _ = write!(prompt, "```diff\n{diff}\n```\n");

    prompt
}

/// Render `items` as one indented bullet of back-tick quoted, comma-joined
/// values. An empty list still yields the bullet.
fn push_quoted_list(prompt: &mut String, items: &[String]) {
    let quoted: Vec<String> = items.iter().map(|item| format!("`{item}`")).collect();
    let _ = writeln!(prompt, "  - {}", quoted.join(", "));
}
