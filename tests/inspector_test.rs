use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use scour::filters::by_extension;
use scour::{inspector, EntryInfo, EntryType, FilterHook, Limit, RecoverHook, ScourError};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a temporary directory tree for testing.
///
/// Structure:
/// ```
/// scour-test-*/
///   another.file.fastq
///   .hidden_file.json
///   folder_a/
///     folder_n/
///       example.png
///   folder_b/
///     file.txt
///   .hidden_folder/
///     obscured.tar.gz
/// ```
fn setup_tree() -> tempfile::TempDir {
    // Default temp names start with a dot, which would make the root
    // itself hidden.
    let dir = tempfile::Builder::new()
        .prefix("scour-test-")
        .tempdir()
        .unwrap();
    let root = dir.path();

    fs::write(root.join("another.file.fastq"), "@read\nACGT\n").unwrap();
    fs::write(root.join(".hidden_file.json"), "{}").unwrap();

    let nested = root.join("folder_a").join("folder_n");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("example.png"), "not actually a png").unwrap();

    let folder_b = root.join("folder_b");
    fs::create_dir(&folder_b).unwrap();
    fs::write(folder_b.join("file.txt"), "hello world").unwrap();

    let hidden = root.join(".hidden_folder");
    fs::create_dir(&hidden).unwrap();
    fs::write(hidden.join("obscured.tar.gz"), "not actually a tarball").unwrap();

    dir
}

/// Sorted relative paths of a result set, for order-free comparison.
fn relatives(entries: &[EntryInfo]) -> Vec<String> {
    let mut paths: Vec<String> = entries
        .iter()
        .map(|entry| entry.relative.to_string_lossy().into_owned())
        .collect();
    paths.sort();
    paths
}

// ---------------------------------------------------------------------------
// Hooks under test
// ---------------------------------------------------------------------------

/// A filter that errors out on one particular file.
struct Tripwire;

#[async_trait]
impl FilterHook for Tripwire {
    async fn filter(&self, info: &EntryInfo) -> Result<bool, ScourError> {
        if info.base == "file.txt" {
            return Err(ScourError::Hook("tripwire".into()));
        }
        Ok(true)
    }
}

/// A recover hook that rejects everything it is offered.
struct Veto;

#[async_trait]
impl RecoverHook for Veto {
    async fn recover(&self, _error: &ScourError, _location: &Path) -> Result<(), ScourError> {
        Err(ScourError::Hook("vetoed".into()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn defaults_find_visible_files_only() {
    let dir = setup_tree();
    let entries = inspector().build().unwrap().search(dir.path()).await.unwrap();

    assert_eq!(
        relatives(&entries),
        [
            "another.file.fastq",
            "folder_a/folder_n/example.png",
            "folder_b/file.txt",
        ]
    );
}

#[tokio::test]
async fn type_all_with_hidden_reports_every_entry() {
    let dir = setup_tree();
    let entries = inspector()
        .entry_type(EntryType::All)
        .include_hidden(true)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    assert_eq!(
        relatives(&entries),
        [
            "",
            ".hidden_file.json",
            ".hidden_folder",
            ".hidden_folder/obscured.tar.gz",
            "another.file.fastq",
            "folder_a",
            "folder_a/folder_n",
            "folder_a/folder_n/example.png",
            "folder_b",
            "folder_b/file.txt",
        ]
    );

    let root_entry = entries
        .iter()
        .find(|entry| entry.relative.as_os_str().is_empty())
        .unwrap();
    assert!(root_entry.is_directory, "the root reports itself as a directory");
}

#[tokio::test]
#[allow(deprecated)]
async fn legacy_folders_flag_selects_all() {
    let dir = setup_tree();
    let entries = inspector()
        .include_folders(true)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    assert_eq!(
        relatives(&entries),
        [
            "",
            "another.file.fastq",
            "folder_a",
            "folder_a/folder_n",
            "folder_a/folder_n/example.png",
            "folder_b",
            "folder_b/file.txt",
        ]
    );
}

#[tokio::test]
async fn hidden_files_appear_when_requested() {
    let dir = setup_tree();
    let entries = inspector()
        .include_hidden(true)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    assert_eq!(
        relatives(&entries),
        [
            ".hidden_file.json",
            ".hidden_folder/obscured.tar.gz",
            "another.file.fastq",
            "folder_a/folder_n/example.png",
            "folder_b/file.txt",
        ]
    );
}

#[tokio::test]
async fn hidden_entries_gate_their_own_subtrees() {
    let dir = setup_tree();
    let entries = inspector().build().unwrap().search(dir.path()).await.unwrap();

    let paths = relatives(&entries);
    assert!(
        paths.iter().all(|path| !path.contains("obscured")),
        "entries below a hidden folder should be unreachable, got {paths:?}"
    );
}

#[tokio::test]
async fn max_depth_stops_descent() {
    let dir = setup_tree();

    let shallow = inspector()
        .max_depth(1)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();
    assert_eq!(relatives(&shallow), ["another.file.fastq"]);

    let deeper = inspector()
        .max_depth(2)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();
    assert_eq!(relatives(&deeper), ["another.file.fastq", "folder_b/file.txt"]);
}

#[tokio::test]
async fn min_depth_suppresses_shallow_results() {
    let dir = setup_tree();
    let entries = inspector()
        .min_depth(2)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    assert_eq!(
        relatives(&entries),
        ["folder_a/folder_n/example.png", "folder_b/file.txt"]
    );
}

#[tokio::test]
async fn a_file_can_be_the_root() {
    let dir = setup_tree();
    let target = dir.path().join("folder_b").join("file.txt");
    let entries = inspector().build().unwrap().search(&target).await.unwrap();

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.relative, Path::new(""));
    assert_eq!(entry.base, "file.txt");
    assert_eq!(entry.name, "file");
    assert_eq!(entry.ext, ".txt");
    assert_eq!(entry.size, 11);
    assert!(!entry.is_directory);
}

#[tokio::test]
async fn a_hidden_root_needs_include_hidden() {
    let dir = setup_tree();
    let hidden_root = dir.path().join(".hidden_folder");

    let silent = inspector().build().unwrap().search(&hidden_root).await.unwrap();
    assert!(silent.is_empty(), "a hidden root stays gated by default");

    let found = inspector()
        .include_hidden(true)
        .build()
        .unwrap()
        .search(&hidden_root)
        .await
        .unwrap();
    assert_eq!(relatives(&found), ["obscured.tar.gz"]);
}

#[cfg(unix)]
#[tokio::test]
async fn directory_symlinks_are_walked_like_their_targets() {
    let dir = tempfile::Builder::new()
        .prefix("scour-test-")
        .tempdir()
        .unwrap();
    let real = dir.path().join("real_dir");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("inner.txt"), "linked").unwrap();
    std::os::unix::fs::symlink(&real, dir.path().join("link_dir")).unwrap();

    let entries = inspector().build().unwrap().search(dir.path()).await.unwrap();

    assert_eq!(
        relatives(&entries),
        ["link_dir/inner.txt", "real_dir/inner.txt"],
        "the subtree behind a directory symlink is reachable"
    );
    assert!(
        entries.iter().all(|entry| !entry.is_directory),
        "a search for files must never report a directory"
    );
}

#[tokio::test]
async fn dotted_roots_collapse_lexically() {
    let dir = setup_tree();
    let dotted = dir.path().join("folder_a").join("..").join("folder_b");

    let entries = inspector().build().unwrap().search(&dotted).await.unwrap();

    assert_eq!(relatives(&entries), ["file.txt"]);
    assert_eq!(
        entries[0].absolute,
        dir.path().join("folder_b").join("file.txt"),
        "absolute paths carry no dot components"
    );
}

#[tokio::test]
async fn exclude_prunes_whole_subtrees() {
    let dir = setup_tree();
    let entries = inspector()
        .entry_type(EntryType::All)
        .include_hidden(true)
        .exclude(|info: &EntryInfo| info.base == "folder_a")
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    let paths = relatives(&entries);
    assert_eq!(paths.len(), 7, "the excluded folder should vanish from results entirely");
    assert!(paths.iter().all(|path| !path.starts_with("folder_a")));
}

#[tokio::test]
async fn filter_gates_results_only() {
    let dir = setup_tree();
    let entries = inspector()
        .include_hidden(true)
        .filter(|info: &EntryInfo| info.name.contains("file"))
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    // Only result inclusion is gated; descent into folder_b is unaffected.
    assert_eq!(
        relatives(&entries),
        [".hidden_file.json", "another.file.fastq", "folder_b/file.txt"]
    );
}

#[tokio::test]
async fn map_retypes_the_output() {
    let dir = setup_tree();
    let paths: Vec<PathBuf> = inspector()
        .map(|info: EntryInfo| info.absolute)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|path| path.starts_with(dir.path())));
}

#[tokio::test]
async fn extension_filter_integrates() {
    let dir = setup_tree();
    let entries = inspector()
        .include_hidden(true)
        .filter(by_extension(["png", ".GZ"]).unwrap())
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    assert_eq!(
        relatives(&entries),
        [".hidden_folder/obscured.tar.gz", "folder_a/folder_n/example.png"]
    );
}

#[tokio::test]
async fn results_do_not_depend_on_concurrency() {
    let dir = setup_tree();

    let serial = inspector()
        .concurrency(1)
        .entry_type(EntryType::All)
        .include_hidden(true)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();
    let parallel = inspector()
        .concurrency(Limit::Unbounded)
        .entry_type(EntryType::All)
        .include_hidden(true)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    assert_eq!(serial.len(), 10);
    assert_eq!(relatives(&serial), relatives(&parallel));
}

#[tokio::test]
async fn one_inspector_serves_concurrent_searches() {
    let dir = setup_tree();
    let shared = inspector().build().unwrap();

    let (a, b) = tokio::join!(
        shared.search(dir.path().join("folder_a")),
        shared.search(dir.path().join("folder_b")),
    );

    assert_eq!(relatives(&a.unwrap()), ["folder_n/example.png"]);
    assert_eq!(relatives(&b.unwrap()), ["file.txt"]);
}

#[tokio::test]
async fn recover_keeps_the_search_alive() {
    let dir = setup_tree();
    let locations: Arc<Mutex<Vec<PathBuf>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&locations);

    let entries = inspector()
        .filter(Tripwire)
        .recover(move |_error: &ScourError, location: &Path| {
            sink.lock().unwrap().push(location.to_path_buf());
        })
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    assert_eq!(
        relatives(&entries),
        ["another.file.fastq", "folder_a/folder_n/example.png"]
    );
    assert_eq!(*locations.lock().unwrap(), [PathBuf::from("folder_b/file.txt")]);
}

#[tokio::test]
async fn recover_escalation_fails_the_search() {
    let dir = setup_tree();
    let error = inspector()
        .filter(Tripwire)
        .recover(Veto)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "vetoed");
}

#[tokio::test]
async fn missing_roots_error_without_recover() {
    let dir = setup_tree();
    let missing = dir.path().join("missing");
    let error = inspector().build().unwrap().search(&missing).await.unwrap_err();

    assert_eq!(error.path(), Some(missing.as_path()));
}

#[tokio::test]
async fn recovered_root_failures_yield_nothing() {
    let dir = setup_tree();
    let locations: Arc<Mutex<Vec<PathBuf>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&locations);

    let entries = inspector()
        .recover(move |_error: &ScourError, location: &Path| {
            sink.lock().unwrap().push(location.to_path_buf());
        })
        .build()
        .unwrap()
        .search(dir.path().join("missing"))
        .await
        .unwrap();

    assert!(entries.is_empty());
    assert_eq!(
        *locations.lock().unwrap(),
        [PathBuf::new()],
        "a root failure reports the empty path"
    );
}

#[test]
#[allow(deprecated)]
fn validation_messages_are_exact() {
    let concurrency = inspector().concurrency(0).build().unwrap_err();
    assert_eq!(
        concurrency.to_string(),
        "Invalid concurrency value 0. Expected either a positive non-zero integer, or Infinity."
    );

    let depth = inspector().max_depth(0).build().unwrap_err();
    assert_eq!(
        depth.to_string(),
        "Invalid maxDepth value 0. Expected either a positive non-zero integer, or Infinity."
    );

    let range = inspector().min_depth(5).max_depth(2).build().unwrap_err();
    assert_eq!(
        range.to_string(),
        "Invalid depth range. Expected minDepth to be less than or equal to maxDepth."
    );

    // No unsigned minimum depth is invalid on its own, but the message is
    // still part of the error surface.
    let min_depth = ScourError::InvalidMinDepth(Limit::Unbounded);
    assert_eq!(
        min_depth.to_string(),
        "Invalid minDepth value Infinity. Expected either a positive integer, or Infinity."
    );

    let clash = inspector()
        .entry_type(EntryType::All)
        .include_folders(true)
        .build()
        .unwrap_err();
    assert_eq!(
        clash.to_string(),
        "Clashing arguments \"type\" and \"includeFolder\" specified. \
         Use \"type: all\" to include files and folders in your output."
    );
}

#[tokio::test]
async fn matches_an_independent_walk() {
    let dir = setup_tree();
    let entries = inspector()
        .entry_type(EntryType::All)
        .include_hidden(true)
        .build()
        .unwrap()
        .search(dir.path())
        .await
        .unwrap();

    let mut ours: Vec<PathBuf> = entries.iter().map(|entry| entry.absolute.clone()).collect();
    ours.sort();

    let mut reference: Vec<PathBuf> = walkdir::WalkDir::new(dir.path())
        .into_iter()
        .map(|entry| entry.unwrap().into_path())
        .collect();
    reference.sort();

    assert_eq!(ours, reference, "every entry an independent walker sees, we see");
}
