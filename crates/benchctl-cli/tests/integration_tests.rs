//! Integration tests for CLI commands

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run benchctl command
fn benchctl(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_benchctl"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute benchctl")
}

/// A manifest directory for a benchmark run
fn manifests() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("1-namespace.yaml"),
        "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: prombench-{{ PR_NUMBER }}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("2-loadgen.yaml"),
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: loadgen-{{ normalize(RELEASE) }}\n  namespace: prombench-{{ PR_NUMBER }}\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "{{ NOT_A_MANIFEST }}").unwrap();
    dir
}

fn path(dir: &Path) -> &str {
    dir.to_str().unwrap()
}

mod render_command {
    use super::*;

    #[test]
    fn test_render_directory() {
        let dir = manifests();
        let output = benchctl(&[
            "render",
            "-f",
            path(dir.path()),
            "--set",
            "PR_NUMBER=42",
            "--set",
            "RELEASE=v2.13.0",
        ]);

        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        let stdout = String::from_utf8_lossy(&output.stdout);

        let ns = stdout.find("1-namespace.yaml").unwrap();
        let loadgen = stdout.find("2-loadgen.yaml").unwrap();
        assert!(ns < loadgen, "files should render in name order");

        assert!(stdout.contains("# Source: "));
        assert!(stdout.contains("name: prombench-42"));
        assert!(stdout.contains("name: loadgen-v2-13-0"));
        assert!(!stdout.contains("NOT_A_MANIFEST"));
    }

    #[test]
    fn test_render_unbound_variable_fails() {
        let dir = manifests();
        let output = benchctl(&["render", "-f", path(dir.path()), "--set", "RELEASE=v2.13.0"]);

        assert_eq!(output.status.code(), Some(3));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("PR_NUMBER"));
    }

    #[test]
    fn test_render_lenient_tolerates_unbound_variable() {
        let dir = manifests();
        let output = benchctl(&["render", "-f", path(dir.path()), "--lenient"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("name: prombench-\n"));
    }

    #[test]
    fn test_set_overrides_vars_file() {
        let dir = manifests();
        let vars = TempDir::new().unwrap();
        let vars_file = vars.path().join("vars.yaml");
        fs::write(&vars_file, "PR_NUMBER: 1\nRELEASE: main\n").unwrap();

        let output = benchctl(&[
            "render",
            "-f",
            path(dir.path()),
            "--vars-file",
            vars_file.to_str().unwrap(),
            "--set",
            "PR_NUMBER=99",
        ]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("name: prombench-99"));
        assert!(stdout.contains("name: loadgen-main"));
    }

    #[test]
    fn test_single_file_argument_keeps_any_extension() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("namespace.tmpl");
        fs::write(&file, "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: ns-{{ ID }}\n").unwrap();

        let output = benchctl(&["render", "-f", file.to_str().unwrap(), "--set", "ID=3"]);

        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("name: ns-3"));
    }

    #[test]
    fn test_missing_path_fails() {
        let output = benchctl(&["render", "-f", "/nonexistent/benchctl/manifests"]);
        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_malformed_set_is_a_usage_error() {
        let dir = manifests();
        let output = benchctl(&["render", "-f", path(dir.path()), "--set", "PR_NUMBER"]);
        assert_eq!(output.status.code(), Some(64));
    }
}

mod apply_command {
    use super::*;

    #[test]
    fn test_template_error_stops_before_connecting() {
        let dir = manifests();
        let output = benchctl(&[
            "apply",
            "-f",
            path(dir.path()),
            "--kubeconfig",
            "/nonexistent/benchctl/kubeconfig",
        ]);

        assert_eq!(output.status.code(), Some(3));
    }

    #[test]
    fn test_malformed_manifest_stops_before_connecting() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.yaml"), "kind: [unclosed\n").unwrap();

        let output = benchctl(&[
            "apply",
            "-f",
            path(dir.path()),
            "--kubeconfig",
            "/nonexistent/benchctl/kubeconfig",
        ]);

        assert_eq!(output.status.code(), Some(4));
        assert!(String::from_utf8_lossy(&output.stderr).contains("bad.yaml"));
    }

    #[test]
    fn test_unreadable_kubeconfig_is_a_cluster_error() {
        let dir = manifests();
        let output = benchctl(&[
            "apply",
            "-f",
            path(dir.path()),
            "--set",
            "PR_NUMBER=42",
            "--set",
            "RELEASE=v2.13.0",
            "--kubeconfig",
            "/nonexistent/benchctl/kubeconfig",
        ]);

        assert_eq!(output.status.code(), Some(6));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = manifests();
        let config = TempDir::new().unwrap();
        let config_file = config.path().join("config.yaml");
        fs::write(&config_file, "conflictRetry:\n  maxAttempts: 0\n").unwrap();

        let output = benchctl(&[
            "delete",
            "-f",
            path(dir.path()),
            "--set",
            "PR_NUMBER=42",
            "--set",
            "RELEASE=v2.13.0",
            "--config",
            config_file.to_str().unwrap(),
        ]);

        assert_eq!(output.status.code(), Some(2));
    }
}
