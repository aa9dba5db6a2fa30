//! External playback service and track discovery.
//!
//! Decoding and mixing stay outside the process: playback drives an external
//! decoder (`mpg123`) as a child process. Pause/resume map to SIGSTOP/SIGCONT,
//! stop kills and reaps the child, and "busy" means the child is still
//! running. A missing decoder binary is expected absence, not an error - the
//! radio screen stays navigable and shows a notice instead.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Recognized audio file extensions, lower-case.
const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "ogg", "wav", "flac"];

/// External decoder program.
const PLAYER_PROGRAM: &str = "mpg123";

/// Playback errors surfaced to the audio screen.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("track does not exist or is unreadable: {0}")]
    Unplayable(PathBuf),
}

/// The capability set of the external playback service.
pub trait Playback: Send {
    /// Prepare a track for [`Playback::play`].
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError>;

    /// Start (or restart) the loaded track from the beginning.
    fn play(&mut self);

    /// Suspend output, keeping position.
    fn pause(&mut self);

    /// Resume a paused track.
    fn unpause(&mut self);

    /// Stop and discard the current playback position.
    fn stop(&mut self);

    /// True while a track is audibly in progress.
    fn is_busy(&mut self) -> bool;
}

/// Child-process decoder backend.
pub struct ProcessPlayer {
    loaded: Option<PathBuf>,
    child: Option<Child>,
}

impl ProcessPlayer {
    /// Probe for the decoder binary. `None` means no audio backend on this
    /// system; callers fall back to a playback-less UI.
    pub fn detect() -> Option<Self> {
        let probe = Command::new(PLAYER_PROGRAM)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match probe {
            Ok(status) if status.success() => {
                info!(program = PLAYER_PROGRAM, "audio backend available");
                Some(Self {
                    loaded: None,
                    child: None,
                })
            }
            _ => {
                warn!(program = PLAYER_PROGRAM, "no audio backend found");
                None
            }
        }
    }

    fn signal_child(&mut self, signal: libc::c_int) {
        if let Some(child) = &self.child {
            // The child is reaped in stop(); a stale pid here only means the
            // signal is a no-op.
            unsafe {
                libc::kill(child.id() as libc::pid_t, signal);
            }
        }
    }
}

impl Playback for ProcessPlayer {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        if !path.is_file() {
            return Err(PlaybackError::Unplayable(path.to_path_buf()));
        }
        self.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) {
        self.stop();
        let Some(path) = self.loaded.clone() else {
            return;
        };
        match Command::new(PLAYER_PROGRAM)
            .arg("-q")
            .arg(&path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                debug!(track = %path.display(), pid = child.id(), "playback started");
                self.child = Some(child);
            }
            Err(err) => warn!(track = %path.display(), "decoder spawn failed: {err}"),
        }
    }

    fn pause(&mut self) {
        self.signal_child(libc::SIGSTOP);
    }

    fn unpause(&mut self) {
        self.signal_child(libc::SIGCONT);
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            // SIGCONT first so a paused child can honor the kill.
            unsafe {
                libc::kill(child.id() as libc::pid_t, libc::SIGCONT);
            }
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn is_busy(&mut self) -> bool {
        match &mut self.child {
            Some(child) => match child.try_wait() {
                Ok(None) => true,
                Ok(Some(_)) | Err(_) => {
                    self.child = None;
                    false
                }
            },
            None => false,
        }
    }
}

impl Drop for ProcessPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// List recognized audio files in `dir`, sorted lexicographically.
///
/// The directory is created if missing; an unreadable directory yields an
/// empty list rather than an error.
pub fn scan_tracks(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        if let Err(err) = fs::create_dir_all(dir) {
            warn!(dir = %dir.display(), "cannot create music directory: {err}");
            return Vec::new();
        }
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut tracks: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                })
        })
        .collect();
    tracks.sort();
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pipboy-tracks-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = scratch_dir("scan");
        fs::create_dir_all(&dir).unwrap();
        for name in ["b.mp3", "a.OGG", "notes.txt", "c.wav", "d.mp3.bak"] {
            File::create(dir.join(name)).unwrap();
        }

        let tracks = scan_tracks(&dir);
        assert_eq!(tracks, vec!["a.OGG", "b.mp3", "c.wav"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_scan_creates_missing_directory() {
        let dir = scratch_dir("create");
        assert!(!dir.exists());
        assert!(scan_tracks(&dir).is_empty());
        assert!(dir.is_dir());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_rejects_missing_file() {
        let mut player = ProcessPlayer {
            loaded: None,
            child: None,
        };
        let missing = scratch_dir("missing").join("nope.mp3");
        assert!(player.load(&missing).is_err());
        assert!(!player.is_busy());
    }
}
