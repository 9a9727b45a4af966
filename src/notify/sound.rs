use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::NotificationSink;
use crate::error::PriceWatchError;
use crate::watch::state::PriceState;

#[cfg(target_os = "macos")]
fn player_command(asset: &Path) -> Command {
    let mut cmd = Command::new("afplay");
    cmd.arg(asset);
    cmd
}

#[cfg(target_os = "linux")]
fn player_command(asset: &Path) -> Command {
    let mut cmd = Command::new("mpg123");
    cmd.arg("-q").arg(asset);
    cmd
}

#[cfg(target_os = "windows")]
fn player_command(asset: &Path) -> Command {
    let mut cmd = Command::new("powershell");
    cmd.arg("-NoProfile").arg("-c").arg(format!(
        "(New-Object Media.SoundPlayer '{}').PlaySync()",
        asset.display()
    ));
    cmd
}

/// Plays a bundled mp3 through the platform's command-line player.
///
/// Three assets exist: `above.mp3`, `below.mp3`, and `napalm.mp3` which
/// replaces both while Gilfoyle mode is on. `Unknown` and `AtThreshold` have
/// no asset and notify as a no-op.
pub struct SoundSink {
    asset_dir: PathBuf,
    gilfoyle_mode: bool,
}

impl SoundSink {
    pub fn new(asset_dir: PathBuf, gilfoyle_mode: bool) -> Self {
        Self {
            asset_dir,
            gilfoyle_mode,
        }
    }

    /// Resolves `assets/` next to the running executable.
    pub fn with_default_assets(gilfoyle_mode: bool) -> Self {
        let dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("assets");
        Self::new(dir, gilfoyle_mode)
    }

    fn asset_for(&self, state: PriceState) -> Option<PathBuf> {
        let name = match state {
            PriceState::AboveThreshold if self.gilfoyle_mode => "napalm",
            PriceState::BelowThreshold if self.gilfoyle_mode => "napalm",
            PriceState::AboveThreshold => "above",
            PriceState::BelowThreshold => "below",
            PriceState::AtThreshold | PriceState::Unknown => return None,
        };
        Some(self.asset_dir.join(format!("{}.mp3", name)))
    }
}

#[async_trait]
impl NotificationSink for SoundSink {
    async fn notify(&self, state: PriceState) -> Result<(), PriceWatchError> {
        let asset = match self.asset_for(state) {
            Some(asset) => asset,
            None => return Ok(()),
        };

        debug!("Playing alert sound: {}", asset.display());

        let status = player_command(&asset).status().await.map_err(|e| {
            PriceWatchError::NotificationError(format!("failed to spawn player: {}", e))
        })?;

        if !status.success() {
            return Err(PriceWatchError::NotificationError(format!(
                "player exited with {} for {}",
                status,
                asset.display()
            )));
        }

        Ok(())
    }
}
