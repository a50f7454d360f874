//! Catch-up workflow: init -> plan -> sync

use crate::common::TestProject;
use replicat_core::Feed;

#[test]
fn test_sync_catches_up_changesets() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Changesets]);
    project.set_head(Feed::Changesets, 6_350_000);
    project.publish(Feed::Changesets, 6_349_938, 6_350_000);

    crate::replicat!(project.path(), "init", "--at", "6349937").assert_success()?;
    let result = crate::replicat!(project.path(), "sync").assert_success()?;

    assert!(result.contains_stdout("Applied 63 sequences"));
    assert_eq!(project.checkpoint(), "6350000");

    let last = project.path().join("diffs/changesets/6350000.osm.gz");
    assert_eq!(std::fs::read_to_string(last)?, "diff changesets 6350000");
    // 6349999 is published under the bumped leaf 006/349/1000
    assert!(project
        .path()
        .join("diffs/changesets/6349999.osm.gz")
        .is_file());
    Ok(())
}

#[test]
fn test_plan_shows_urls_without_side_effects() -> anyhow::Result<()> {
    let project = TestProject::new(&Feed::JOINT_ORDER);
    project.set_head(Feed::Day, 4_303);
    project.set_head(Feed::Hour, 103_120);
    project.set_head(Feed::Minute, 5_893_150);
    project.set_head(Feed::Changesets, 6_350_000);

    crate::replicat!(project.path(), "init", "--at", "4301,103120,5893142,6349937").assert_success()?;
    let result = crate::replicat!(project.path(), "plan", "--show", "2").assert_success()?;

    assert!(result.contains_stdout("https://example.org/replication/day/000/004/302.osc.gz"));
    assert!(result.contains_stdout("https://example.org/replication/changesets/006/349/939.osm.gz"));
    assert!(result.contains_stdout("up to date"));
    assert!(result.contains_stdout("... and 61 more"));
    assert_eq!(project.checkpoint(), "4301,103120,5893142,6349937");
    assert!(!project.path().join("diffs").exists());
    Ok(())
}

#[test]
fn test_sync_dry_run_and_limit() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Minute]);
    project.set_head(Feed::Minute, 110);
    project.publish(Feed::Minute, 101, 110);

    crate::replicat!(project.path(), "init", "--at", "100").assert_success()?;

    let result = crate::replicat!(project.path(), "sync", "--dry-run").assert_success()?;
    assert!(result.contains_stdout("10 sequences would be applied"));
    assert_eq!(project.checkpoint(), "100");

    crate::replicat!(project.path(), "sync", "--limit", "4").assert_success()?;
    assert_eq!(project.checkpoint(), "104");

    crate::replicat!(project.path(), "sync").assert_success()?;
    assert_eq!(project.checkpoint(), "110");

    let result = crate::replicat!(project.path(), "sync").assert_success()?;
    assert!(result.contains_stdout("Already up to date"));
    assert_eq!(project.checkpoint(), "110");
    Ok(())
}

#[test]
fn test_path_command() -> anyhow::Result<()> {
    let project = TestProject::new(&[Feed::Changesets]);

    let result = crate::replicat!(project.path(), "path", "changesets", "6349999").assert_success()?;
    assert!(result.contains_stdout("006/349/1000"));
    assert!(result.contains_stdout("https://example.org/replication/changesets/006/349/1000.osm.gz"));
    assert!(result.contains_stdout("https://example.org/replication/changesets/state.yaml"));

    let result = crate::replicat!(project.path(), "path", "minute", "5893142").assert_success()?;
    assert!(result.contains_stdout("https://example.org/replication/minute/005/893/142.osc.gz"));
    assert!(result.contains_stdout("https://example.org/replication/minute/005/893/142.state.txt"));
    Ok(())
}
