//! Lock exclusion across separate processes.
//!
//! The test binary re-executes itself: each child runs only
//! `child_acquire`, waits for a start signal file, then races for the same
//! lock in a shared directory. Exit code 0 means the child got the lock,
//! [`REFUSED`] means it saw `AlreadyLocked`.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use terrastate_core::Environment;
use terrastate_storage::{LockManager, StateDir, StorageError};

const CHILD_DIR_VAR: &str = "TERRASTATE_LOCK_CHILD_DIR";
const START_FILE: &str = "start";
const REFUSED: i32 = 3;
const CHILDREN: usize = 12;

#[test]
fn child_acquire() {
    let Ok(dir) = std::env::var(CHILD_DIR_VAR) else {
        // Not spawned by `separate_processes_race_for_one_lock`.
        return;
    };
    let dir = PathBuf::from(dir);

    let deadline = Instant::now() + Duration::from_secs(30);
    while !dir.join(START_FILE).exists() {
        assert!(Instant::now() < deadline, "start signal never arrived");
        std::thread::sleep(Duration::from_millis(1));
    }

    let locks = LockManager::new(StateDir::open(&dir).unwrap());
    match locks.acquire(&Environment::parse("shared").unwrap()) {
        Ok(_) => std::process::exit(0),
        Err(StorageError::AlreadyLocked(_)) => std::process::exit(REFUSED),
        Err(e) => panic!("unexpected lock error: {e}"),
    }
}

#[test]
fn separate_processes_race_for_one_lock() {
    let tmp = tempfile::tempdir().unwrap();
    let exe = std::env::current_exe().unwrap();

    let children: Vec<_> = (0..CHILDREN)
        .map(|_| {
            Command::new(&exe)
                .args(["child_acquire", "--exact", "--test-threads=1"])
                .env(CHILD_DIR_VAR, tmp.path())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .unwrap()
        })
        .collect();

    std::fs::write(tmp.path().join(START_FILE), b"go").unwrap();

    let codes: Vec<Option<i32>> = children
        .into_iter()
        .map(|mut child| child.wait().unwrap().code())
        .collect();

    let granted = codes.iter().filter(|c| **c == Some(0)).count();
    let refused = codes.iter().filter(|c| **c == Some(REFUSED)).count();
    assert_eq!(granted, 1, "exit codes: {codes:?}");
    assert_eq!(refused, CHILDREN - 1, "exit codes: {codes:?}");
    assert!(tmp.path().join("shared-tfstate.lock").exists());
}
