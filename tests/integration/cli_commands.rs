use statecheck::config::{BackendConfig, CheckConfig};
use statecheck::tooling::cli::{BackendArgs, CliContext, Commands};
use std::fs;
use tempfile::TempDir;

use crate::integration::support::write_initial_state_file;

fn local_args(path: &std::path::Path) -> BackendArgs {
    BackendArgs {
        backend: Some("local".to_string()),
        path: Some(path.to_path_buf()),
    }
}

#[test]
fn seed_then_run_local_backend() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    let cli = CliContext::with_config(CheckConfig::default());

    let output = cli
        .execute(&Commands::Seed {
            target: local_args(&path),
        })
        .unwrap();
    assert!(output.contains("Seeded initial state"));
    assert!(path.exists());

    let output = cli
        .execute(&Commands::Run {
            target: local_args(&path),
            seed: false,
            strict_serial: true,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["profile"], "Full");
    let steps = parsed["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert!(steps.iter().all(|s| s["outcome"] == "Passed"));
}

#[test]
fn second_run_without_seed_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    write_initial_state_file(&path);
    let cli = CliContext::with_config(CheckConfig::default());

    let run = Commands::Run {
        target: local_args(&path),
        seed: false,
        strict_serial: false,
        format: "text".to_string(),
    };
    cli.execute(&run).unwrap();

    let err = cli.execute(&run).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("initial state"));
    assert!(message.contains("unexpected module root"));
}

#[test]
fn run_with_seed_on_sled_from_config() {
    let temp = TempDir::new().unwrap();
    let cli = CliContext::with_config(CheckConfig {
        backend: BackendConfig::Sled {
            path: temp.path().join("db"),
            tree: "state".to_string(),
            key: "ci".to_string(),
        },
        ..CheckConfig::default()
    });

    let output = cli
        .execute(&Commands::Run {
            target: BackendArgs::default(),
            seed: true,
            strict_serial: false,
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("sled"));
    assert!(output.contains("4 passed, 0 skipped"));
}

#[test]
fn show_prints_state_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    write_initial_state_file(&path);
    let cli = CliContext::with_config(CheckConfig::default());

    let text = cli
        .execute(&Commands::Show {
            path: path.clone(),
            format: "text".to_string(),
        })
        .unwrap();
    assert!(text.contains("root.child"));
    assert!(text.contains("foo"));

    let json = cli
        .execute(&Commands::Show {
            path,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["modules"][0]["outputs"]["foo"], "bar");
}

#[test]
fn show_missing_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let cli = CliContext::with_config(CheckConfig::default());
    let err = cli
        .execute(&Commands::Show {
            path: temp.path().join("nope.json"),
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(err.to_string().contains("State file not found"));
}

#[test]
fn context_loads_config_file() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("statecheck.toml");
    let state_path = temp.path().join("state.json");
    fs::write(
        &config_path,
        format!(
            "[backend]\nkind = \"local\"\npath = {:?}\n",
            state_path.to_string_lossy()
        ),
    )
    .unwrap();

    let cli = CliContext::new(Some(config_path)).unwrap();
    assert_eq!(
        cli.config().backend,
        BackendConfig::Local {
            path: state_path.clone()
        }
    );

    cli.execute(&Commands::Seed {
        target: BackendArgs::default(),
    })
    .unwrap();
    assert!(state_path.exists());
}
