use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use signgraph_store::{open_storage, EntityKind, EntityStore, ImportLogRepository};

fn signgraph_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_signgraph"))
}

fn run(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(signgraph_bin())
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("run signgraph")
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let out = run(data_dir, args);
    assert!(
        out.status.success(),
        "signgraph {args:?} failed:\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).into_owned()
}

const ROWS: &str = "source\tpage\tlabel\tsign\tbasic_form\tword_unit_id\n\
    P.1\t1\t1-1\tA1\tnfr\t7\n\
    P.1\t1\t1-2\tA2\tnfr\t7\n\
    P.1\t1\t2-1\tB1\tjb\t8\n";

#[test]
fn stepwise_import_resume_and_rollback() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");
    let rows = tmp.path().join("rows.tsv");
    fs::write(&rows, ROWS).unwrap();
    let rows_arg = rows.to_string_lossy().into_owned();

    run_ok(&data, &["source", "add", "P.1", "--title", "Papyrus 1"]);
    run_ok(&data, &["label", "add", "--source", "P.1", "--page", "1", "--name", "1-1"]);

    let first = run_ok(
        &data,
        &["import", &rows_arg, "--language", "egy", "--chunk-size", "2", "--step"],
    );
    assert!(first.contains("paused"), "{first}");
    assert!(data.join("job_state.json").exists());

    // A second job cannot start over the unfinished one.
    let blocked = run(&data, &["import", &rows_arg]);
    assert!(!blocked.status.success());

    run_ok(&data, &["import", "--resume"]);
    assert!(!data.join("job_state.json").exists());

    let (job_id, created) = {
        let storage = open_storage(&data).unwrap();
        let logs = storage.logs().list().unwrap();
        assert_eq!(logs.len(), 1);
        let log = &logs[0];
        assert!(log.status);
        assert_eq!(log.counters.processed, 3);
        assert_eq!(log.language, "egy");
        assert_eq!(log.source_filename, "rows.tsv");
        // Two of the three labels were never provisioned.
        assert_eq!(log.warnings.len(), 2);
        assert_eq!(storage.store().count(EntityKind::WordMap).unwrap(), 3);
        (log.id.to_string(), log.created_entities.len())
    };
    assert!(created > 0);

    let listing = run_ok(&data, &["log", "list"]);
    assert!(listing.contains(&job_id));

    run_ok(&data, &["rollback", &job_id]);
    let storage = open_storage(&data).unwrap();
    assert_eq!(storage.store().count(EntityKind::WordMap).unwrap(), 0);
    assert_eq!(storage.store().count(EntityKind::Source).unwrap(), 1);
    assert_eq!(storage.store().count(EntityKind::Label).unwrap(), 1);

    let shown = run_ok(&data, &["log", "show", &job_id]);
    assert!(shown.contains("rolled back"), "{shown}");

    let again = run_ok(&data, &["rollback", &job_id]);
    assert!(again.contains("nothing left"), "{again}");
}

#[test]
fn config_file_sets_the_default_language() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("signgraph.json"),
        r#"{"import": {"default_language": "cop"}}"#,
    )
    .unwrap();
    let rows = tmp.path().join("rows.csv");
    fs::write(&rows, "source,page,sign,basic_form,word_unit_id\nP.1,1,A1,nfr,7\n").unwrap();

    run_ok(&data, &["source", "add", "P.1"]);
    run_ok(&data, &["import", &rows.to_string_lossy()]);

    let storage = open_storage(&data).unwrap();
    let logs = storage.logs().list().unwrap();
    assert_eq!(logs[0].language, "cop");
}

#[test]
fn unknown_job_cannot_be_rolled_back() {
    let tmp = tempfile::tempdir().unwrap();
    let out = run(tmp.path(), &["rollback", "00000000-0000-0000-0000-000000000000"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no import log"));
}
