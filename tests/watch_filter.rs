// tests/watch_filter.rs

use proptest::prelude::*;

use devtasks::types::{ChangeEvent, ChangeKind};
use devtasks::watch::{classify, Decision, IgnoreList, SkipReason};

const DEFAULT_IGNORE: [&str; 4] = [".idea", ".pytest_cache", "__pycache__", ".git"];

fn ignore() -> IgnoreList {
    IgnoreList::new(DEFAULT_IGNORE)
}

#[test]
fn regular_file_change_is_dispatched() {
    let event = ChangeEvent::file("/proj/src/models.py", ChangeKind::Modified);
    assert_eq!(classify(&event, &ignore()), Decision::Dispatch);
}

#[test]
fn ignored_fragment_wins_over_directory_flag() {
    let event = ChangeEvent::dir("/proj/.git/refs", ChangeKind::Created);
    assert_eq!(
        classify(&event, &ignore()),
        Decision::Skip(SkipReason::IgnoredPath(".git".to_string()))
    );
}

#[test]
fn ignore_matching_is_plain_substring() {
    // ".gitignore" contains ".git", so it is ignored too.
    let event = ChangeEvent::file("/proj/.gitignore", ChangeKind::Modified);
    assert!(matches!(
        classify(&event, &ignore()),
        Decision::Skip(SkipReason::IgnoredPath(_))
    ));
}

#[test]
fn directory_events_are_skipped() {
    let event = ChangeEvent::dir("/proj/src", ChangeKind::Modified);
    assert_eq!(
        classify(&event, &ignore()),
        Decision::Skip(SkipReason::Directory)
    );
}

#[test]
fn editor_backup_files_are_skipped() {
    let event = ChangeEvent::file("/proj/src/models.py~", ChangeKind::Created);
    assert_eq!(
        classify(&event, &ignore()),
        Decision::Skip(SkipReason::BackupFile)
    );
}

#[test]
fn custom_ignore_list_replaces_defaults() {
    let custom = IgnoreList::new(["build/"]);
    let git = ChangeEvent::file("/proj/.git/index", ChangeKind::Modified);
    let build = ChangeEvent::file("/proj/build/out.txt", ChangeKind::Modified);

    assert_eq!(classify(&git, &custom), Decision::Dispatch);
    assert_eq!(
        classify(&build, &custom),
        Decision::Skip(SkipReason::IgnoredPath("build/".to_string()))
    );
}

fn kind_strategy() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Created),
        Just(ChangeKind::Modified),
        Just(ChangeKind::Deleted),
        Just(ChangeKind::Moved),
    ]
}

fn contains_ignored(path: &str) -> bool {
    DEFAULT_IGNORE.iter().any(|frag| path.contains(frag))
}

proptest! {
    #[test]
    fn paths_with_ignored_fragment_never_dispatch(
        prefix in "[a-z/._~]{0,20}",
        idx in 0..DEFAULT_IGNORE.len(),
        suffix in "[a-z/._~]{0,20}",
        kind in kind_strategy(),
        is_dir in any::<bool>(),
    ) {
        let path = format!("{prefix}{}{suffix}", DEFAULT_IGNORE[idx]);
        let event = ChangeEvent::new(path, kind, is_dir);
        prop_assert!(matches!(
            classify(&event, &ignore()),
            Decision::Skip(SkipReason::IgnoredPath(_))
        ));
    }

    #[test]
    fn directory_events_never_dispatch(
        path in "[a-z/._~]{0,40}",
        kind in kind_strategy(),
    ) {
        let event = ChangeEvent::dir(path, kind);
        prop_assert_ne!(classify(&event, &ignore()), Decision::Dispatch);
    }

    #[test]
    fn tilde_suffixed_files_never_dispatch(
        stem in "[a-z/._]{0,40}",
        kind in kind_strategy(),
    ) {
        let path = format!("{stem}~");
        prop_assume!(!contains_ignored(&path));
        let event = ChangeEvent::file(path, kind);
        prop_assert_eq!(
            classify(&event, &ignore()),
            Decision::Skip(SkipReason::BackupFile)
        );
    }

    #[test]
    fn remaining_file_events_dispatch(
        path in "[a-z/._~]{1,40}",
        kind in kind_strategy(),
    ) {
        prop_assume!(!contains_ignored(&path));
        prop_assume!(!path.ends_with('~'));
        let event = ChangeEvent::file(path, kind);
        prop_assert_eq!(classify(&event, &ignore()), Decision::Dispatch);
    }
}
