use std::path::PathBuf;

use clap::Parser;
use http_server::config::{Args, Config};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, "0.0.0.0:4221");
    assert_eq!(cfg.directory, None);
    assert_eq!(cfg.read_buffer_size, 4096);
}

#[test]
fn test_config_listen_from_env() {
    let cfg = Config::default().with_env(|key| match key {
        "LISTEN" => Some("127.0.0.1:8000".to_string()),
        _ => None,
    });

    assert_eq!(cfg.listen_addr, "127.0.0.1:8000");
}

#[test]
fn test_config_env_missing_keeps_default() {
    let cfg = Config::default().with_env(|_| None);

    assert_eq!(cfg.listen_addr, "0.0.0.0:4221");
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml(
        "listen_addr: 127.0.0.1:9000\ndirectory: /tmp/served\nread_buffer_size: 8192\n",
    )
    .unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
    assert_eq!(cfg.directory, Some(PathBuf::from("/tmp/served")));
    assert_eq!(cfg.read_buffer_size, 8192);
}

#[test]
fn test_config_partial_yaml_uses_defaults() {
    let cfg = Config::from_yaml("directory: /data\n").unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:4221");
    assert_eq!(cfg.read_buffer_size, 4096);
}

#[test]
fn test_config_rejects_zero_buffer() {
    assert!(Config::from_yaml("read_buffer_size: 0\n").is_err());
}

#[test]
fn test_config_rejects_bad_yaml() {
    assert!(Config::from_yaml("read_buffer_size: lots\n").is_err());
}

#[test]
fn test_args_parse_directory() {
    let args = Args::parse_from(["http-server", "--directory", "/tmp/files/"]);

    assert_eq!(args.directory, Some(PathBuf::from("/tmp/files/")));
    assert_eq!(args.listen, None);
}

#[test]
fn test_args_override_config() {
    let args = Args::parse_from([
        "http-server",
        "--listen",
        "127.0.0.1:5000",
        "--directory",
        "/srv",
    ]);

    let cfg = Config::from_yaml("listen_addr: 0.0.0.0:1234\ndirectory: /data\n")
        .unwrap()
        .with_args(&args);

    assert_eq!(cfg.listen_addr, "127.0.0.1:5000");
    assert_eq!(cfg.directory, Some(PathBuf::from("/srv")));
}

#[test]
fn test_resolve_reads_config_file() {
    let path = std::env::temp_dir().join(format!("http-server-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "directory: /from-file\nread_buffer_size: 1024\n").unwrap();

    let args = Args {
        config: Some(path.clone()),
        ..Args::default()
    };
    let cfg = Config::resolve(&args).unwrap();

    assert_eq!(cfg.directory, Some(PathBuf::from("/from-file")));
    assert_eq!(cfg.read_buffer_size, 1024);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_resolve_missing_config_file() {
    let args = Args {
        config: Some(PathBuf::from("/definitely/not/here.yaml")),
        ..Args::default()
    };

    assert!(Config::resolve(&args).is_err());
}

#[test]
fn test_resolve_without_config_file_uses_defaults() {
    let args = Args::parse_from(["http-server", "--directory", "/tmp/files/"]);

    let cfg = Config::resolve(&args).unwrap();

    assert_eq!(cfg.directory, Some(PathBuf::from("/tmp/files/")));
    assert_eq!(cfg.read_buffer_size, 4096);
    assert_eq!(cfg.listen_addr, Config::load().listen_addr);
}
