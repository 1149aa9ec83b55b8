// ABOUTME: Integration tests for configuration resolution and the settings file.
// ABOUTME: Tests required-input lookup, ID validation, and YAML tunables.

use fabdeploy::config::*;
use fabdeploy::error::Error;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

fn full_env() -> HashMap<&'static str, String> {
    HashMap::from([
        (ENV_CLIENT_ID, "app-id".to_string()),
        (ENV_CLIENT_SECRET, "s3cret".to_string()),
        (ENV_TENANT_ID, "tenant-id".to_string()),
        (ENV_WORKSPACE_ID, "0f3c6a2e-ws".to_string()),
        (ENV_ENVIRONMENT_ID, "7b1d9e4f-env".to_string()),
        (ENV_FILE_PATH, "dist/lib.whl".to_string()),
    ])
}

fn lookup<'a>(env: &'a HashMap<&'static str, String>) -> impl Fn(&str) -> Option<String> + 'a {
    move |var| env.get(var).cloned()
}

mod resolution {
    use super::*;

    #[test]
    fn resolves_all_inputs_from_variables() {
        let env = full_env();
        let config = Config::resolve(&Inputs::default(), lookup(&env), Settings::default()).unwrap();

        assert_eq!(config.connection.credentials.client_id, "app-id");
        assert_eq!(config.connection.credentials.client_secret(), "s3cret");
        assert_eq!(config.connection.credentials.tenant_id, "tenant-id");
        assert_eq!(config.target().workspace.as_str(), "0f3c6a2e-ws");
        assert_eq!(config.target().environment.as_str(), "7b1d9e4f-env");
        assert_eq!(config.artifact, PathBuf::from("dist/lib.whl"));
    }

    #[test]
    fn flags_override_variables() {
        let env = full_env();
        let inputs = Inputs {
            environment_id: Some("other-env".to_string()),
            file_path: Some(PathBuf::from("build/other.whl")),
            ..Inputs::default()
        };

        let config = Config::resolve(&inputs, lookup(&env), Settings::default()).unwrap();

        assert_eq!(config.target().environment.as_str(), "other-env");
        assert_eq!(config.artifact, PathBuf::from("build/other.whl"));
        assert_eq!(config.connection.credentials.client_id, "app-id");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_flag_is_kept_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut env = full_env();
        env.remove(ENV_FILE_PATH);
        let path = PathBuf::from(OsStr::from_bytes(b"dist/\xfflib.whl"));
        let inputs = Inputs {
            file_path: Some(path.clone()),
            ..Inputs::default()
        };

        let config = Config::resolve(&inputs, lookup(&env), Settings::default()).unwrap();

        assert_eq!(config.artifact, path);
        assert_eq!(config.artifact.as_os_str().as_bytes(), b"dist/\xfflib.whl");
    }

    #[test]
    fn blank_file_flag_falls_back_to_variable() {
        let env = full_env();
        let inputs = Inputs {
            file_path: Some(PathBuf::from("  ")),
            ..Inputs::default()
        };

        let config = Config::resolve(&inputs, lookup(&env), Settings::default()).unwrap();

        assert_eq!(config.artifact, PathBuf::from("dist/lib.whl"));
    }

    #[test]
    fn all_missing_inputs_are_listed_together() {
        let mut env = full_env();
        env.remove(ENV_CLIENT_SECRET);
        env.remove(ENV_FILE_PATH);

        let err = Config::resolve(&Inputs::default(), lookup(&env), Settings::default()).unwrap_err();

        match &err {
            Error::MissingConfig(names) => {
                assert_eq!(names, &vec![ENV_CLIENT_SECRET, ENV_FILE_PATH]);
            }
            other => panic!("expected MissingConfig, got {other:?}"),
        }
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "missing required configuration: FABRIC_CLIENT_SECRET, FABRIC_FILE_PATH"
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut env = full_env();
        env.insert(ENV_TENANT_ID, "   ".to_string());

        let err = Config::resolve(&Inputs::default(), lookup(&env), Settings::default()).unwrap_err();

        assert!(matches!(err, Error::MissingConfig(ref names) if names == &vec![ENV_TENANT_ID]));
    }

    #[test]
    fn connection_does_not_need_a_file() {
        let mut env = full_env();
        env.remove(ENV_FILE_PATH);

        let connection =
            Connection::resolve(&Inputs::default(), lookup(&env), Settings::default()).unwrap();

        assert_eq!(connection.target.to_string(), "0f3c6a2e-ws/7b1d9e4f-env");
    }

    #[test]
    fn invalid_workspace_id_is_rejected() {
        let mut env = full_env();
        env.insert(ENV_WORKSPACE_ID, "ws/../other".to_string());

        let err = Config::resolve(&Inputs::default(), lookup(&env), Settings::default()).unwrap_err();

        match err {
            Error::InvalidId { name, .. } => assert_eq!(name, ENV_WORKSPACE_ID),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn secret_is_not_in_debug_output() {
        let env = full_env();
        let config = Config::resolve(&Inputs::default(), lookup(&env), Settings::default()).unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn from_env_reads_process_environment() {
        let vars: Vec<(&str, Option<String>)> = full_env()
            .into_iter()
            .map(|(k, v)| (k, Some(v)))
            .collect();

        temp_env::with_vars(vars, || {
            let config = Config::from_env(&Inputs::default(), Settings::default()).unwrap();
            assert_eq!(config.connection.credentials.client_id, "app-id");
            assert_eq!(config.artifact, PathBuf::from("dist/lib.whl"));
        });
    }
}

mod settings {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
    }

    #[test]
    fn defaults_match_fabric() {
        let settings = Settings::default();
        assert_eq!(settings.api_base, "https://api.fabric.microsoft.com/");
        assert_eq!(settings.authority, "https://login.microsoftonline.com");
        assert_eq!(settings.publish.timeout, Duration::from_secs(40 * 60));
        assert_eq!(settings.publish.poll_interval, Duration::from_secs(30));
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.retry.delay, Duration::from_secs(3));
    }

    #[test]
    fn parses_partial_overrides() {
        let yaml = r#"
publish:
  timeout: 10m
retry:
  delay: 500ms
"#;
        let settings = Settings::from_yaml(yaml).unwrap();

        assert_eq!(settings.publish.timeout, Duration::from_secs(600));
        assert_eq!(settings.publish.poll_interval, Duration::from_secs(30));
        assert_eq!(settings.retry.delay, Duration::from_millis(500));
        assert_eq!(settings.retry.max_attempts, 3);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_yaml("retries: 5\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn zero_attempts_are_rejected() {
        let err = Settings::from_yaml("retry:\n  max_attempts: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let err = Settings::from_yaml("publish:\n  poll_interval: 0s\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn non_http_api_base_is_rejected() {
        let err = Settings::from_yaml("api_base: ftp://example.com\n").unwrap_err();
        assert!(err.to_string().contains("api_base"));
    }

    #[test]
    fn discover_without_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::discover(dir.path()).unwrap(), Settings::default());
    }

    #[test]
    fn discover_finds_alternate_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".fabdeploy")).unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME_DIR),
            "publish:\n  poll_interval: 5s\n",
        )
        .unwrap();

        let settings = Settings::discover(dir.path()).unwrap();

        assert_eq!(settings.publish.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        init_settings(dir.path(), false).unwrap();

        let settings = Settings::load(&dir.path().join(SETTINGS_FILENAME)).unwrap();
        assert_eq!(settings, Settings::default());

        let err = init_settings(dir.path(), false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        init_settings(dir.path(), true).unwrap();
    }
}
