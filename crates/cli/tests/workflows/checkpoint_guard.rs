//! Checkpoint safety: nothing is fabricated, skipped or clobbered

use crate::common::TestProject;
use replicat_core::Feed;
use replicat_journal::CheckpointLock;

#[test]
fn test_init_guards_existing_checkpoint() -> anyhow::Result<()> {
    let project = TestProject::new(&Feed::JOINT_ORDER);

    crate::replicat!(project.path(), "init", "--at", "1,2,3,4").assert_success()?;
    let result = crate::replicat!(project.path(), "init", "--at", "5,6,7,8").assert_failure()?;
    assert!(result.contains_stderr("already exists"));
    assert_eq!(project.checkpoint(), "1,2,3,4");

    crate::replicat!(project.path(), "init", "--at", "5,6,7,8", "--force").assert_success()?;
    assert_eq!(project.checkpoint(), "5,6,7,8");
    Ok(())
}

#[test]
fn test_init_checks_existence_under_the_lock() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Minute]);
    crate::replicat!(project.path(), "init", "--at", "100").assert_success()?;

    // Another init holds the checkpoint
    let held = CheckpointLock::acquire(&project.path().join("local-state.csv.lock"))?;
    let result = crate::replicat!(project.path(), "init", "--at", "200").assert_failure()?;
    assert!(result.contains_stderr("locked by another catch-up"));
    assert!(!result.contains_stderr("already exists"));
    drop(held);

    let result = crate::replicat!(project.path(), "init", "--at", "200").assert_failure()?;
    assert!(result.contains_stderr("already exists"));
    assert_eq!(project.checkpoint(), "100");
    Ok(())
}

#[test]
fn test_sync_refused_while_locked() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Minute]);
    project.set_head(Feed::Minute, 103);
    project.publish(Feed::Minute, 101, 103);
    crate::replicat!(project.path(), "init", "--at", "100").assert_success()?;

    let held = CheckpointLock::acquire(&project.path().join("local-state.csv.lock"))?;
    crate::replicat!(project.path(), "sync").assert_failure()?;
    assert_eq!(project.checkpoint(), "100");
    drop(held);

    crate::replicat!(project.path(), "sync").assert_success()?;
    assert_eq!(project.checkpoint(), "103");
    assert!(project.path().join("local-state.csv.lock").is_file());
    Ok(())
}

#[test]
fn test_config_example_ignores_invalid_config() -> anyhow::Result<()> {
    let project = TestProject::new(&[]);

    let result = crate::replicat!(project.path(), "config", "example").assert_success()?;
    assert!(result.contains_stdout("[feed]"));

    let result = crate::replicat!(project.path(), "config", "list").assert_failure()?;
    assert!(result.contains_stderr("feed.tracked must list at least one feed"));
    Ok(())
}

#[test]
fn test_init_requires_one_field_per_feed() -> anyhow::Result<()> {
    let project = TestProject::new(&Feed::JOINT_ORDER);

    crate::replicat!(project.path(), "init", "--at", "1,2").assert_failure()?;
    crate::replicat!(project.path(), "init", "--at", "1,x,3,4").assert_failure()?;
    assert!(!project.path().join("local-state.csv").exists());
    Ok(())
}

#[test]
fn test_missing_checkpoint_is_not_defaulted() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Minute]);
    project.set_head(Feed::Minute, 10);

    let result = crate::replicat!(project.path(), "sync").assert_failure()?;
    assert!(result.contains_stderr("No checkpoint"));
    assert!(!project.path().join("local-state.csv").exists());
    Ok(())
}

#[test]
fn test_corrupt_checkpoint_aborts() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Minute]);
    project.set_head(Feed::Minute, 10);
    std::fs::write(project.path().join("local-state.csv"), "seven")?;

    let result = crate::replicat!(project.path(), "sync").assert_failure()?;
    assert!(result.contains_stderr("corrupt checkpoint"));
    assert_eq!(project.checkpoint(), "seven");
    Ok(())
}

#[test]
fn test_malformed_head_aborts_before_applying() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Day, Feed::Minute]);
    project.set_head(Feed::Day, 12);
    project.publish(Feed::Day, 11, 12);
    let minute_dir = project.mirror().join("minute");
    std::fs::create_dir_all(&minute_dir)?;
    std::fs::write(minute_dir.join("state.txt"), "<html>502 Bad Gateway</html>")?;

    crate::replicat!(project.path(), "init", "--at", "10,100").assert_success()?;
    let result = crate::replicat!(project.path(), "sync").assert_failure()?;

    assert!(result.contains_stderr("Failed to parse minute state"));
    assert_eq!(project.checkpoint(), "10,100");
    assert!(!project.path().join("diffs").exists());
    Ok(())
}

#[test]
fn test_missing_diff_keeps_confirmed_progress() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Hour]);
    project.set_head(Feed::Hour, 20);
    project.publish(Feed::Hour, 11, 14);

    crate::replicat!(project.path(), "init", "--at", "10").assert_success()?;
    let result = crate::replicat!(project.path(), "sync").assert_failure()?;

    assert!(result.contains_stderr("Failed to apply hour sequence 15"));
    assert_eq!(project.checkpoint(), "14");
    Ok(())
}

#[test]
fn test_regression_warns_without_failing() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Hour]);
    project.set_head(Feed::Hour, 480);

    crate::replicat!(project.path(), "init", "--at", "500").assert_success()?;
    let result = crate::replicat!(project.path(), "sync").assert_success()?;

    assert!(result.contains_stdout("remote head is behind checkpoint"));
    assert!(result.contains_stderr("Remote head is behind local checkpoint"));
    assert_eq!(project.checkpoint(), "500");
    Ok(())
}

#[test]
fn test_advance_must_be_contiguous() -> anyhow::Result<()> {
    let project = TestProject::new(&Feed::JOINT_ORDER);
    crate::replicat!(project.path(), "init", "--at", "10,20,30,40").assert_success()?;

    crate::replicat!(project.path(), "advance", "minute", "31").assert_success()?;
    assert_eq!(project.checkpoint(), "10,20,31,40");

    let result = crate::replicat!(project.path(), "advance", "minute", "35").assert_failure()?;
    assert!(result.contains_stderr("must be applied in order"));
    assert_eq!(project.checkpoint(), "10,20,31,40");

    crate::replicat!(project.path(), "advance", "weekly", "1").assert_failure()?;
    Ok(())
}

#[test]
fn test_status_lists_positions() -> anyhow::Result<()> {
    let project = TestProject::new(&Feed::JOINT_ORDER);
    crate::replicat!(project.path(), "init", "--at", "4301,103120,5893142,6349937").assert_success()?;

    let result = crate::replicat!(project.path(), "status").assert_success()?;
    assert!(result.contains_stdout("6349937"));
    assert!(result.contains_stdout("https://example.org/replication/day/000/004/301.state.txt"));
    Ok(())
}
