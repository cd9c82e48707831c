//! Integration tests for committing through the real `git` binary.

mod common;

use serial_test::serial;

use common::{TestRepo, leftover_message_files};
use kommit::CommitError;
use kommit::commit::{CommitExecutor, GeneratedMessage};

fn assert_no_new_temp_files(before: &[String]) {
    let after = leftover_message_files();
    let new: Vec<_> = after.iter().filter(|f| !before.contains(f)).collect();
    assert!(new.is_empty(), "temp files left behind: {new:?}");
}

#[test]
#[serial]
fn test_commit_direct_round_trips_message() {
    let repo = TestRepo::new();
    repo.stage_file("src/lib.rs", "pub fn greet() {}\n");
    let before = leftover_message_files();

    let message = GeneratedMessage::new(
        "feat(core): add greeting\n\n- Add a greet function\n- Export it from the crate root",
        0.0,
    );
    repo.git().commit_direct(&message.signed()).unwrap();

    let head = repo.head_message().unwrap();
    assert_eq!(head.trim_end_matches('\n'), message.signed());
    assert!(head.contains("\n\n[Generated by Kommit]"));
    assert_no_new_temp_files(&before);
}

#[test]
#[serial]
fn test_commit_direct_failure_cleans_up() {
    let repo = TestRepo::new();
    repo.commit("chore: initial");
    let before = leftover_message_files();

    // Nothing staged, so git refuses to commit.
    let result = repo.git().commit_direct("fix: nothing\n\n[Generated by Kommit]");

    assert!(matches!(result, Err(CommitError::CommitFailed { code: Some(_) })));
    assert_eq!(repo.commit_count(), 1);
    assert_no_new_temp_files(&before);
}

#[cfg(unix)]
#[test]
#[serial]
fn test_commit_with_editor_uses_edited_template() {
    let repo = TestRepo::new();
    repo.stage_file("README.md", "# hello\n");
    let before = leftover_message_files();

    temp_env::with_var("GIT_EDITOR", Some("sed -i -e s/draft/final/"), || {
        repo.git()
            .commit_with_editor("docs: add draft readme\n\n[Generated by Kommit]")
            .unwrap();
    });

    let head = repo.head_message().unwrap();
    assert!(head.starts_with("docs: add final readme"), "{head}");
    assert_no_new_temp_files(&before);
}

#[cfg(unix)]
#[test]
#[serial]
fn test_commit_with_editor_allows_clearing_the_message() {
    let repo = TestRepo::new();
    repo.stage_file("README.md", "# hello\n");
    let before = leftover_message_files();

    temp_env::with_var("GIT_EDITOR", Some("truncate -s 0"), || {
        repo.git()
            .commit_with_editor("docs: add readme\n\n[Generated by Kommit]")
            .unwrap();
    });

    assert_eq!(repo.commit_count(), 1);
    assert_eq!(repo.head_message().as_deref(), Some(""));
    assert_no_new_temp_files(&before);
}
