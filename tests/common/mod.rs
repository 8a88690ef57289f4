use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

/// Scratch system: a config file plus both share roots inside one temp dir.
pub struct Sandbox {
    pub dir: tempfile::TempDir,
}

impl Sandbox {
    pub fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().expect("create sandbox");
        fs::create_dir_all(dir.path().join("usr/share")).expect("create system root");
        fs::create_dir_all(dir.path().join("usr/local/share")).expect("create local root");
        fs::write(dir.path().join("advancepurge.conf"), config).expect("write config");
        Self { dir }
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("advancepurge.conf")
    }

    pub fn system_root(&self) -> PathBuf {
        self.dir.path().join("usr/share")
    }

    pub fn local_root(&self) -> PathBuf {
        self.dir.path().join("usr/local/share")
    }

    /// Create `rel` (and parents) as a directory under the system root.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.system_root().join(rel);
        fs::create_dir_all(&path).expect("create sandbox dir");
        path
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.system_root().join(rel).exists()
    }

    /// Run the binary with the sandbox roots and config exported.
    pub fn run(&self, case_name: &str, args: &[&str]) -> CmdResult {
        let env = [
            ("ADVANCEPURGE_CONFIG", self.config()),
            ("ADVANCEPURGE_SYSTEM_ROOT", self.system_root()),
            ("ADVANCEPURGE_LOCAL_ROOT", self.local_root()),
        ];
        let env: Vec<(&str, &Path)> = env.iter().map(|(k, v)| (*k, v.as_path())).collect();
        run_cli_case_with_env(case_name, args, &env)
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_advancepurge") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) {
        "advancepurge.exe"
    } else {
        "advancepurge"
    };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve advancepurge binary path for integration test"),
    }
}

pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    run_cli_case_with_env(case_name, args, &[])
}

pub fn run_cli_case_with_env(case_name: &str, args: &[&str], env: &[(&str, &Path)]) -> CmdResult {
    let root = std::env::temp_dir().join("advancepurge-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let mut command = Command::new(&bin_path);
    command
        .args(args)
        .env_remove("ADVANCEPURGE_CONFIG")
        .env_remove("ADVANCEPURGE_SYSTEM_ROOT")
        .env_remove("ADVANCEPURGE_LOCAL_ROOT")
        .env_remove("ADVANCEPURGE_LOG_FILE")
        .env("RUST_BACKTRACE", "1");
    for (key, value) in env {
        command.env(key, value);
    }
    let output = command.output().expect("execute advancepurge command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("env={env:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}
