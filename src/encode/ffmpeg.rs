use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    encode::sink::{EncodeJob, FrameEncoder},
    foundation::error::{ScorecastError, ScorecastResult},
};

/// Pads odd trimmed frame sizes up to even values, as most 4:2:x codecs require.
const PAD_EVEN_FILTER: &str = "pad=ceil(iw/2)*2:ceil(ih/2)*2";

/// Options for [`FfmpegEncoder`].
#[derive(Clone, Debug)]
pub struct FfmpegEncoderOpts {
    /// Encoder binary.
    pub program: PathBuf,
    /// Video codec passed to `-c:v`.
    pub codec: String,
    /// Output pixel format; must carry alpha to keep the overlay transparent.
    pub pix_fmt: String,
    /// Arguments appended verbatim after the core argument set.
    pub extra_args: Vec<String>,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl Default for FfmpegEncoderOpts {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            codec: "prores".to_owned(),
            pix_fmt: "yuva420p".to_owned(),
            extra_args: Vec::new(),
            overwrite: true,
        }
    }
}

/// Encodes a frame directory by running the system `ffmpeg` once.
#[derive(Clone, Debug, Default)]
pub struct FfmpegEncoder {
    opts: FfmpegEncoderOpts,
}

impl FfmpegEncoder {
    pub fn new(opts: FfmpegEncoderOpts) -> Self {
        Self { opts }
    }

    /// Full argument list (without the program name) for `job`.
    pub fn command_args(&self, job: &EncodeJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let fps = job.fps.to_string();
        args.push(if self.opts.overwrite { "-y" } else { "-n" }.into());
        args.extend(
            ["-loglevel", "error", "-framerate", fps.as_str(), "-i"].map(OsString::from),
        );
        args.push(job.frame_pattern().into_os_string());
        args.extend(
            [
                "-c:v",
                self.opts.codec.as_str(),
                "-vf",
                PAD_EVEN_FILTER,
                "-pix_fmt",
                self.opts.pix_fmt.as_str(),
                "-movflags",
                "+faststart",
            ]
            .map(OsString::from),
        );
        args.extend(self.opts.extra_args.iter().map(OsString::from));
        args.push(job.out_path.clone().into_os_string());
        args
    }
}

impl FrameEncoder for FfmpegEncoder {
    fn encode(&mut self, job: &EncodeJob) -> ScorecastResult<PathBuf> {
        if job.fps == 0 {
            return Err(ScorecastError::config("encode fps must be non-zero"));
        }
        if job.frame_count == 0 {
            return Err(ScorecastError::config("nothing to encode: zero frames"));
        }

        ensure_parent_dir(&job.out_path)?;
        if !self.opts.overwrite && job.out_path.exists() {
            return Err(ScorecastError::config(format!(
                "output file '{}' already exists",
                job.out_path.display()
            )));
        }

        let args = self.command_args(job);
        tracing::info!(
            program = %self.opts.program.display(),
            args = ?args,
            frames = job.frame_count,
            "running encoder"
        );

        let output = Command::new(&self.opts.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ScorecastError::encoding(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.opts.program.display()
                ))
            })?;

        if !output.status.success() {
            remove_partial_output(&job.out_path);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScorecastError::encoding(format!(
                "{} exited with status {}: {}",
                self.opts.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(job.out_path.clone())
    }
}

fn remove_partial_output(path: &Path) {
    if path.exists()
        && let Err(e) = std::fs::remove_file(path)
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output");
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ScorecastResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
