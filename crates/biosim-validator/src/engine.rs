//! Running simulator images on COMBINE archives.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::EngineError;

/// Directory the archive's directory is mounted at inside the container.
pub const CONTAINER_IN_DIR: &str = "/root/in";

/// Directory the simulator writes its reports to inside the container.
pub const CONTAINER_OUT_DIR: &str = "/root/out";

/// Executes a simulator image on an archive, writing reports into `out_dir`.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn exec_archive(
        &self,
        archive_path: &Path,
        image: &str,
        out_dir: &Path,
    ) -> Result<(), EngineError>;
}

/// Docker invocation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DockerConfig {
    /// Container CLI to invoke.
    pub docker_bin: String,
    /// Seconds before the simulator is killed; 0 disables the timeout.
    pub timeout_secs: u64,
    /// Extra arguments inserted after `run --rm`.
    pub extra_args: Vec<String>,
}

impl Default for DockerConfig {
    fn default() -> Self {
        DockerConfig {
            docker_bin: std::env::var("BIOSIM_DOCKER_BIN").unwrap_or_else(|_| "docker".to_string()),
            timeout_secs: std::env::var("BIOSIM_EXEC_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0),
            extra_args: Vec::new(),
        }
    }
}

impl DockerConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn with_docker_bin(mut self, docker_bin: &str) -> Self {
        self.docker_bin = docker_bin.to_string();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }
}

/// Runs simulator images with `docker run`.
#[derive(Debug, Clone, Default)]
pub struct DockerEngine {
    config: DockerConfig,
}

impl DockerEngine {
    pub fn new(config: DockerConfig) -> Self {
        DockerEngine { config }
    }

    pub fn config(&self) -> &DockerConfig {
        &self.config
    }

    /// Arguments passed to the container CLI.
    ///
    /// The archive's directory is mounted read-only; both mount sources are
    /// made absolute.
    pub fn command_args(
        &self,
        archive_path: &Path,
        image: &str,
        out_dir: &Path,
    ) -> Result<Vec<String>, EngineError> {
        let archive_path = std::fs::canonicalize(archive_path)?;
        let archive_name = archive_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| EngineError::InvalidArchivePath(archive_path.clone()))?;
        let archive_dir: PathBuf = archive_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| EngineError::InvalidArchivePath(archive_path.clone()))?;
        let out_dir = std::fs::canonicalize(out_dir)?;

        let mut args = vec!["run".to_string(), "--rm".to_string()];
        args.extend(self.config.extra_args.iter().cloned());
        args.extend([
            "--mount".to_string(),
            format!(
                "type=bind,source={},target={CONTAINER_IN_DIR},readonly",
                archive_dir.display()
            ),
            "--mount".to_string(),
            format!(
                "type=bind,source={},target={CONTAINER_OUT_DIR}",
                out_dir.display()
            ),
            image.to_string(),
            "-i".to_string(),
            format!("{CONTAINER_IN_DIR}/{archive_name}"),
            "-o".to_string(),
            CONTAINER_OUT_DIR.to_string(),
        ]);
        Ok(args)
    }
}

#[async_trait]
impl ExecutionEngine for DockerEngine {
    async fn exec_archive(
        &self,
        archive_path: &Path,
        image: &str,
        out_dir: &Path,
    ) -> Result<(), EngineError> {
        let start = Instant::now();
        let args = self.command_args(archive_path, image, out_dir)?;
        debug!(program = %self.config.docker_bin, args = ?args, "Executing simulator");

        let child = Command::new(&self.config.docker_bin)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.config.docker_bin.clone(),
                source,
            })?;

        let output = if self.config.timeout_secs > 0 {
            tokio::time::timeout(
                Duration::from_secs(self.config.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| EngineError::Timeout(self.config.timeout_secs))??
        } else {
            child.wait_with_output().await?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(duration_ms, stdout = %stdout, "Simulator finished");

        if !output.status.success() {
            return Err(EngineError::Failed {
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
