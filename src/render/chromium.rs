use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;
use image::DynamicImage;

use crate::{
    foundation::{
        core::Viewport,
        error::{ScorecastError, ScorecastResult},
    },
    render::backend::RenderBackend,
};

#[derive(Clone, Debug)]
pub struct ChromiumBackendOpts {
    /// Chromium-family binary (`chromium`, `google-chrome`, ...).
    pub program: PathBuf,
    /// Virtual time granted to the page before the screenshot, in milliseconds.
    ///
    /// Pending network fetches and timers get this much time to settle.
    pub virtual_time_budget_ms: u64,
    /// Extra command-line switches, appended before the page URL.
    pub extra_args: Vec<String>,
}

impl Default for ChromiumBackendOpts {
    fn default() -> Self {
        Self {
            program: PathBuf::from("chromium"),
            virtual_time_budget_ms: 5_000,
            extra_args: Vec::new(),
        }
    }
}

/// Screenshots HTML markup with a headless Chromium process per frame.
pub struct ChromiumBackend {
    opts: ChromiumBackendOpts,
    scratch: Option<tempfile::TempDir>,
}

impl ChromiumBackend {
    pub fn new(opts: ChromiumBackendOpts) -> Self {
        Self {
            opts,
            scratch: None,
        }
    }

    /// Full argument list for one screenshot.
    pub fn command_args(
        &self,
        viewport: Viewport,
        profile_dir: &Path,
        page: &Path,
        screenshot: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--headless".into(),
            "--disable-gpu".into(),
            "--hide-scrollbars".into(),
            "--no-first-run".into(),
            "--force-device-scale-factor=1".into(),
            "--default-background-color=00000000".into(),
            format!("--window-size={},{}", viewport.width, viewport.height).into(),
            format!("--virtual-time-budget={}", self.opts.virtual_time_budget_ms).into(),
        ];

        let mut profile = OsString::from("--user-data-dir=");
        profile.push(profile_dir);
        args.push(profile);

        let mut shot = OsString::from("--screenshot=");
        shot.push(screenshot);
        args.push(shot);

        args.extend(self.opts.extra_args.iter().map(OsString::from));

        let mut url = OsString::from("file://");
        url.push(page);
        args.push(url);
        args
    }

    fn check_program(&self) -> ScorecastResult<()> {
        let ok = Command::new(&self.opts.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if !ok {
            return Err(ScorecastError::render_backend(format!(
                "'{}' could not be started; install Chromium or pass its path",
                self.opts.program.display()
            )));
        }
        Ok(())
    }
}

impl RenderBackend for ChromiumBackend {
    fn name(&self) -> &'static str {
        "chromium"
    }

    fn acquire(&mut self, _viewport: Viewport) -> ScorecastResult<()> {
        self.check_program()?;
        let scratch = tempfile::Builder::new()
            .prefix("scorecast-chromium-")
            .tempdir()
            .context("create chromium scratch directory")?;
        tracing::debug!(dir = %scratch.path().display(), "chromium scratch directory");
        self.scratch = Some(scratch);
        Ok(())
    }

    fn render(&mut self, markup: &str, viewport: Viewport) -> ScorecastResult<DynamicImage> {
        let scratch = self
            .scratch
            .as_ref()
            .ok_or_else(|| ScorecastError::render_backend("chromium backend not acquired"))?
            .path();

        let page = scratch.join("page.html");
        let screenshot = scratch.join("screenshot.png");
        let profile = scratch.join("profile");
        std::fs::write(&page, markup)
            .with_context(|| format!("write page '{}'", page.display()))?;
        if screenshot.exists() {
            std::fs::remove_file(&screenshot)
                .with_context(|| format!("remove stale '{}'", screenshot.display()))?;
        }

        let output = Command::new(&self.opts.program)
            .args(self.command_args(viewport, &profile, &page, &screenshot))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                ScorecastError::render_backend(format!(
                    "failed to spawn '{}': {e}",
                    self.opts.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScorecastError::render_backend(format!(
                "chromium exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if !screenshot.is_file() {
            return Err(ScorecastError::render_backend(
                "chromium exited successfully but wrote no screenshot",
            ));
        }

        image::open(&screenshot).map_err(|e| {
            ScorecastError::render_backend(format!("decode chromium screenshot: {e}"))
        })
    }

    fn release(&mut self) -> ScorecastResult<()> {
        if let Some(scratch) = self.scratch.take() {
            scratch
                .close()
                .context("remove chromium scratch directory")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/chromium.rs"]
mod tests;
