use assert_cmd::Command;
use mockito::Server;
use predicates::prelude::*;
use release_sync::cli::{run, Cli, Commands};
use release_sync::load_config::API_BASE_ENV;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracing_subscriber::prelude::*; // needed for .with()
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        use std::fmt::Write as FmtWrite;
        let mut msg = String::new();
        let _ = write!(&mut msg, "{:?}", event);
        self.events.lock().unwrap().push(msg);
    }
}

/// Writes a config pointing every output into `dir` and the API at `api_base`.
fn write_config(dir: &Path, api_base: &str) -> PathBuf {
    let path = dir.join("release-sync.yaml");
    let yaml = format!(
        "repository: adsblol/globe_history_2024\napi_base: \"{api_base}\"\noutputs:\n  changelog: \"{}\"\n  preferred: \"{}\"\n  readme: \"{}\"\n",
        dir.join("RELEASES.md").display(),
        dir.join("PREFERRED_RELEASES.txt").display(),
        dir.join("README.md").display(),
    );
    fs::write(&path, yaml).expect("Writing temp config failed");
    path
}

#[tokio::test]
#[serial]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    // A missing config file fails before any network access.
    let cli = Cli {
        command: Commands::Sync {
            config: Some(PathBuf::from("dummy.yaml")),
        },
    };

    let result = run(cli).await;
    assert!(result.is_err());

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}

#[tokio::test]
#[serial]
async fn sync_regenerates_artifacts_from_listing() {
    std::env::remove_var(API_BASE_ENV);
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/adsblol/globe_history_2024/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"name": "v2024.03.01-planes-test-0", "assets": [{"name": "v2024.03.01-planes-test-0.tar", "size": 1048576}]},
                {"name": "v2024.03.02-planes-staging-0", "assets": [{"name": "v2024.03.02-planes-staging-0.tar", "size": 2097152}]}]"#,
        )
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("README.md"),
        "# adsblol/globe_history_2024 (7 GiB)\n",
    )
    .unwrap();
    let config = write_config(dir.path(), &server.url());

    run(Cli {
        command: Commands::Sync {
            config: Some(config),
        },
    })
    .await
    .expect("sync should succeed");

    let changelog = fs::read_to_string(dir.path().join("RELEASES.md")).unwrap();
    let lines: Vec<&str> = changelog.lines().collect();
    assert_eq!(lines[0], "# Releases");
    assert_eq!(lines[1], "# 2024-03");
    assert!(lines[2].starts_with("- 2024-03-02 [planes-staging-0 (2 MB)]"));
    assert!(lines[3].starts_with("- 2024-03-01 [planes-test-0 (1 MB)]"));

    let preferred = fs::read_to_string(dir.path().join("PREFERRED_RELEASES.txt")).unwrap();
    assert_eq!(preferred.lines().count(), 2);

    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert_eq!(readme, "# adsblol/globe_history_2024 (0 GiB)\n");
}

#[tokio::test]
#[serial]
async fn rejected_names_are_warned_once_and_counted_in_summary() {
    std::env::remove_var(API_BASE_ENV);
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/adsblol/globe_history_2024/releases")
        .with_status(200)
        .with_body(
            r#"[{"name": "v2024.03.01-planes-test-0", "assets": []},
                {"name": "latest", "assets": []}]"#,
        )
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("README.md"),
        "# adsblol/globe_history_2024 (7 GiB)\n",
    )
    .unwrap();
    let config = write_config(dir.path(), &server.url());

    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(EventCollector {
        events: events.clone(),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    run(Cli {
        command: Commands::Sync {
            config: Some(config),
        },
    })
    .await
    .expect("sync should succeed");

    let event_msgs = events.lock().unwrap();
    let warnings = event_msgs
        .iter()
        .filter(|msg| msg.contains("\"latest\""))
        .filter(|msg| !msg.contains("Synchronisation complete"))
        .count();
    assert_eq!(warnings, 1, "events: {:?}", event_msgs);
    assert!(
        event_msgs
            .iter()
            .any(|msg| msg.contains("Synchronisation complete") && msg.contains("rejected: 1")),
        "Expected the summary to carry the rejected count, got: {:?}",
        event_msgs
    );
}

#[tokio::test]
#[serial]
async fn sync_fails_on_api_error_and_leaves_files_alone() {
    std::env::remove_var(API_BASE_ENV);
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/adsblol/globe_history_2024/releases")
        .with_status(500)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("RELEASES.md"), "# Releases\n").unwrap();
    let config = write_config(dir.path(), &server.url());

    let result = run(Cli {
        command: Commands::Sync {
            config: Some(config),
        },
    })
    .await;

    assert!(result.is_err());
    assert_eq!(
        fs::read_to_string(dir.path().join("RELEASES.md")).unwrap(),
        "# Releases\n"
    );
    assert!(!dir.path().join("PREFERRED_RELEASES.txt").exists());
}

#[test]
fn binary_exits_non_zero_on_unreadable_config() {
    let mut cmd = Command::cargo_bin("release-sync").expect("Binary exists");
    cmd.arg("sync").arg("--config").arg("/definitely/not/here.yaml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn binary_help_lists_sync_subcommand() {
    let mut cmd = Command::cargo_bin("release-sync").expect("Binary exists");
    cmd.arg("--help");

    cmd.assert().success().stdout(predicate::str::contains("sync"));
}
