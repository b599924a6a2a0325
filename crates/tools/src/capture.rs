use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::frames::{FrameJob, FramePlan};

/// Frames below this size are treated as a failed grab.
pub const MIN_FRAME_BYTES: u64 = 1024;

pub const YT_DLP_FORMAT: &str = "best[ext=mp4][height<=480]/best[height<=480]";

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("video {0} could not be downloaded")]
    VideoUnavailable(String),
    #[error("frame {path} looks invalid ({bytes} bytes)")]
    FrameTooSmall { path: PathBuf, bytes: u64 },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// External video tooling.
pub trait FrameCapturer {
    /// Download `video_id` into `dest`.
    fn fetch_video(&mut self, video_id: &str, dest: &Path) -> Result<(), CaptureError>;

    /// Write the frame at `seconds` of `video` to `output`.
    fn grab_frame(&mut self, video: &Path, seconds: u64, output: &Path)
    -> Result<(), CaptureError>;
}

/// `yt-dlp` for downloads and `ffmpeg` for stills.
#[derive(Debug, Clone)]
pub struct CommandCapturer {
    pub yt_dlp: PathBuf,
    pub ffmpeg: PathBuf,
}

impl Default for CommandCapturer {
    fn default() -> Self {
        Self {
            yt_dlp: PathBuf::from("yt-dlp"),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl CommandCapturer {
    fn run(tool: &Path, command: &mut Command) -> Result<(), CaptureError> {
        let tool = tool.display().to_string();
        debug!(?command, "spawning");
        let output = command.output().map_err(|source| CaptureError::Spawn {
            tool: tool.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(CaptureError::Failed {
                tool,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl FrameCapturer for CommandCapturer {
    fn fetch_video(&mut self, video_id: &str, dest: &Path) -> Result<(), CaptureError> {
        let url = format!("https://www.youtube.com/watch?v={video_id}");
        let mut command = Command::new(&self.yt_dlp);
        command
            .args(["--no-playlist", "--force-overwrites", "-f", YT_DLP_FORMAT, "-o"])
            .arg(dest)
            .arg(url)
            .env("FFMPEG_LOCATION", &self.ffmpeg);
        Self::run(&self.yt_dlp, &mut command)?;
        if !dest.exists() {
            return Err(CaptureError::VideoUnavailable(video_id.to_string()));
        }
        Ok(())
    }

    fn grab_frame(
        &mut self,
        video: &Path,
        seconds: u64,
        output: &Path,
    ) -> Result<(), CaptureError> {
        let mut command = Command::new(&self.ffmpeg);
        command
            .args(["-hide_banner", "-loglevel", "error", "-y", "-ss"])
            .arg(seconds.to_string())
            .arg("-i")
            .arg(video)
            .args(["-frames:v", "1", "-q:v", "2"])
            .arg(output);
        Self::run(&self.ffmpeg, &mut command)
    }
}

#[derive(Debug, Default)]
pub struct CaptureReport {
    /// Indices into `FramePlan::jobs` that now have a frame on disk.
    pub captured: BTreeSet<usize>,
    pub failed: Vec<(usize, CaptureError)>,
    /// Videos downloaded (or attempted) during the run.
    pub videos: usize,
}

/// Capture every pending job in `plan`, downloading each video at most once
/// into `cache_dir`.
///
/// A failed job is recorded and the run continues with the next one.
pub fn capture_frames<C: FrameCapturer>(
    plan: &FramePlan,
    cache_dir: &Path,
    capturer: &mut C,
) -> CaptureReport {
    let mut report = CaptureReport::default();
    let mut videos: BTreeMap<String, Option<PathBuf>> = BTreeMap::new();

    for (idx, job) in plan.jobs.iter().enumerate() {
        if !job.needs_capture() {
            continue;
        }
        let video = videos
            .entry(job.video_id.clone())
            .or_insert_with(|| {
                let dest = cache_dir.join(format!("{}.mp4", job.video_id));
                match capturer.fetch_video(&job.video_id, &dest) {
                    Ok(()) => Some(dest),
                    Err(err) => {
                        warn!(video_id = %job.video_id, error = %err, "video download failed");
                        None
                    }
                }
            })
            .clone();

        let result = match video {
            Some(path) => grab(capturer, &path, job),
            None => Err(CaptureError::VideoUnavailable(job.video_id.clone())),
        };
        match result {
            Ok(()) => {
                report.captured.insert(idx);
            }
            Err(err) => report.failed.push((idx, err)),
        }
    }

    report.videos = videos.len();
    info!(
        captured = report.captured.len(),
        failed = report.failed.len(),
        videos = report.videos,
        "frame capture finished"
    );
    report
}

fn grab<C: FrameCapturer>(
    capturer: &mut C,
    video: &Path,
    job: &FrameJob,
) -> Result<(), CaptureError> {
    if let Some(parent) = job.output.parent() {
        fs::create_dir_all(parent).map_err(|source| CaptureError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    capturer.grab_frame(video, job.seconds, &job.output)?;
    let bytes = fs::metadata(&job.output).map(|m| m.len()).unwrap_or(0);
    if bytes < MIN_FRAME_BYTES {
        return Err(CaptureError::FrameTooSmall {
            path: job.output.clone(),
            bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{FrameStatus, plan_frames, record_indices};
    use catalog::RawPlace;
    use pretty_assertions::assert_eq;
    use scene::{NormalizeConfig, Normalizer};

    /// Writes fake stills; `tiny` videos produce undersized frames.
    #[derive(Default)]
    struct FakeTools {
        fetched: Vec<String>,
        broken: BTreeSet<String>,
        tiny: BTreeSet<String>,
    }

    impl FrameCapturer for FakeTools {
        fn fetch_video(&mut self, video_id: &str, dest: &Path) -> Result<(), CaptureError> {
            self.fetched.push(video_id.to_string());
            if self.broken.contains(video_id) {
                return Err(CaptureError::VideoUnavailable(video_id.to_string()));
            }
            fs::write(dest, video_id).unwrap();
            Ok(())
        }

        fn grab_frame(
            &mut self,
            video: &Path,
            _seconds: u64,
            output: &Path,
        ) -> Result<(), CaptureError> {
            let id = fs::read_to_string(video).unwrap();
            let size = if self.tiny.contains(&id) { 10 } else { 2048 };
            fs::write(output, vec![0u8; size]).unwrap();
            Ok(())
        }
    }

    fn plan(web: &Path, force: bool) -> FramePlan {
        let records = vec![
            RawPlace::new("one", "c", 1.0, 1.0)
                .with_video("https://youtu.be/aaaaaaaaaaa", Some(10.0)),
            RawPlace::new("two", "c", 1.0, 1.0)
                .with_video("https://youtu.be/aaaaaaaaaaa", Some(20.0)),
            RawPlace::new("three", "c", 1.0, 1.0)
                .with_video("https://youtu.be/bbbbbbbbbbb", Some(5.0)),
            RawPlace::new("four", "c", 1.0, 1.0)
                .with_video("https://youtu.be/ccccccccccc", Some(7.0)),
            RawPlace::new("five", "c", 1.0, 1.0)
                .with_video("https://youtu.be/ddddddddddd", Some(3.0)),
        ];
        let total = records.len();
        let report = Normalizer::new(NormalizeConfig::default())
            .unwrap()
            .normalize(records);
        let indices = record_indices(total, &report.dropped);
        let frames = web.join("assets").join("frames");
        plan_frames(&report.places, &indices, &frames, web, force)
    }

    #[test]
    fn downloads_each_video_once_and_writes_back_only_frames_on_disk() {
        let web = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let frames = web.path().join("assets").join("frames");
        fs::create_dir_all(&frames).unwrap();
        fs::write(frames.join("ddddddddddd_00003.jpg"), vec![0u8; 2048]).unwrap();

        let plan = plan(web.path(), false);
        assert_eq!(plan.jobs[4].status, FrameStatus::Present);

        let mut tools = FakeTools::default();
        tools.broken.insert("bbbbbbbbbbb".into());
        tools.tiny.insert("ccccccccccc".into());
        let report = capture_frames(&plan, cache.path(), &mut tools);

        assert_eq!(tools.fetched, vec!["aaaaaaaaaaa", "bbbbbbbbbbb", "ccccccccccc"]);
        assert_eq!(report.videos, 3);
        assert_eq!(report.captured, BTreeSet::from([0, 1]));
        let failed: Vec<usize> = report.failed.iter().map(|(i, _)| *i).collect();
        assert_eq!(failed, vec![2, 3]);
        assert!(matches!(
            report.failed[1].1,
            CaptureError::FrameTooSmall { bytes: 10, .. }
        ));

        let written: Vec<usize> = plan.annotations(&report.captured).into_keys().collect();
        assert_eq!(written, vec![0, 1, 4]);
    }

    #[test]
    fn forced_run_recaptures_existing_frames() {
        let web = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let frames = web.path().join("assets").join("frames");
        fs::create_dir_all(&frames).unwrap();
        fs::write(frames.join("ddddddddddd_00003.jpg"), vec![0u8; 2048]).unwrap();

        let plan = plan(web.path(), true);
        let mut tools = FakeTools::default();
        let report = capture_frames(&plan, cache.path(), &mut tools);

        assert_eq!(tools.fetched.len(), 4);
        assert_eq!(report.captured.len(), 5);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut tools = CommandCapturer {
            yt_dlp: dir.path().join("no-such-yt-dlp"),
            ffmpeg: dir.path().join("no-such-ffmpeg"),
        };
        let err = tools
            .fetch_video("aaaaaaaaaaa", &dir.path().join("a.mp4"))
            .unwrap_err();
        assert!(matches!(err, CaptureError::Spawn { .. }));
    }
}
