mod common;

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// The binary with its config pointed at `config` so the user's own file never leaks in.
fn bin(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("arr_relocate").unwrap();
    cmd.env("ARR_RELOCATE_CONFIG", config);
    cmd
}

fn empty_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.xml");
    fs::write(&path, "<config></config>").unwrap();
    path
}

#[test]
fn help_exits_zero() {
    let td = tempdir().unwrap();
    let out = bin(&empty_config(td.path())).arg("--help").output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("radarr"));
    assert!(text.contains("sonarr"));
}

#[test]
fn missing_required_arguments_exit_one() {
    let td = tempdir().unwrap();
    let cfg = empty_config(td.path());

    let out = bin(&cfg).args(["radarr", "-a", "key"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));

    let out = bin(&cfg).output().unwrap();
    assert_eq!(out.status.code(), Some(1));

    let out = bin(&cfg).args(["lidarr", "-t", "x", "-d", "/tmp"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn missing_api_key_is_a_usage_error() {
    let td = tempdir().unwrap();
    let dst = td.path().join("dst");
    let out = bin(&empty_config(td.path()))
        .args(["radarr", "-t", "archive", "-d"])
        .arg(&dst)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("API key"));
}

#[test]
fn print_config_reports_env_path() {
    let td = tempdir().unwrap();
    let cfg = empty_config(td.path());
    let out = bin(&cfg).arg("--print-config").output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains(&cfg.display().to_string()));
}

#[test]
fn unknown_tag_fails_run() {
    let stub = common::serve(&[("/api/v3/tag/detail", 200, r#"[{"id":1,"label":"keep","movieIds":[]}]"#)]);
    let td = tempdir().unwrap();
    let out = bin(&empty_config(td.path()))
        .args(["radarr", "-a", "key", "-t", "archive", "-H", &stub.base, "-d"])
        .arg(td.path().join("dst"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("archive"));
}

#[cfg(unix)]
#[test]
fn radarr_run_relocates_tagged_movie() {
    let td = tempdir().unwrap();
    let src = td.path().join("movies/Alien (1979)");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("alien.mkv"), b"in space").unwrap();
    let dst = td.path().join("slow");

    let movie = format!(
        r#"{{"id": 3, "title": "Alien", "path": "{0}", "folderName": "{0}", "hasFile": true,
            "movieFile": {{"path": "{0}/alien.mkv"}}}}"#,
        src.display()
    );
    let stub = common::serve(&[
        ("/api/v3/tag/detail", 200, r#"[{"id":2,"label":"archive","movieIds":[3]}]"#),
        ("/api/v3/movie/3", 200, movie.as_str()),
    ]);

    let out = bin(&empty_config(td.path()))
        .args(["radarr", "-a", "secret", "-t", "archive", "-H", &stub.base, "-d"])
        .arg(&dst)
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(dst.join("Alien (1979)/alien.mkv").is_file());
    assert_eq!(fs::read_link(&src).unwrap(), dst.join("Alien (1979)"));
    assert!(String::from_utf8_lossy(&out.stdout).contains("relocated"));
    assert!(stub.api_keys().iter().all(|k| k.as_deref() == Some("secret")));

    // A second run finds the link and leaves it alone.
    let out = bin(&empty_config(td.path()))
        .args(["radarr", "-a", "secret", "-t", "archive", "-H", &stub.base, "-d"])
        .arg(&dst)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("already relocated"));
}

#[cfg(unix)]
#[test]
fn dry_run_leaves_everything_in_place() {
    let td = tempdir().unwrap();
    let src = td.path().join("tv/Show");
    fs::create_dir_all(src.join("Season 01")).unwrap();
    fs::write(src.join("Season 01/e01.mkv"), b"pilot").unwrap();
    let dst = td.path().join("slow");
    let series = format!(r#"[{{"id":1,"title":"Show","path":"{}","tags":[7]}}]"#, src.display());
    let stub = common::serve(&[
        ("/api/v3/tag", 200, r#"[{"id":7,"label":"archive"}]"#),
        ("/api/v3/series", 200, series.as_str()),
    ]);

    let out = bin(&empty_config(td.path()))
        .args(["--dry-run", "sonarr", "-a", "k", "-t", "archive", "-H", &stub.base, "-d"])
        .arg(&dst)
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(src.join("Season 01/e01.mkv").is_file());
    assert!(!dst.exists(), "dry-run must not create the destination");
    assert!(String::from_utf8_lossy(&out.stdout).contains("dry-run"));
}
