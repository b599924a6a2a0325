use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use scene::{DroppedRecord, Place};

/// File name of the still frame for one video timestamp.
pub fn frame_file_name(video_id: &str, seconds: u64) -> String {
    format!("{video_id}_{seconds:05}.jpg")
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    /// Already on disk; kept unless forced.
    Present,
    Capture,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameJob {
    /// Index of the record in the source file.
    pub record: usize,
    pub place_id: String,
    pub video_id: String,
    pub seconds: u64,
    pub output: PathBuf,
    /// Path stored in the data file, relative to the web root when possible.
    pub web_path: String,
    pub status: FrameStatus,
}

impl FrameJob {
    pub fn needs_capture(&self) -> bool {
        self.status == FrameStatus::Capture
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FramePlan {
    pub jobs: Vec<FrameJob>,
}

impl FramePlan {
    pub fn to_capture(&self) -> impl Iterator<Item = &FrameJob> + '_ {
        self.jobs.iter().filter(|j| j.needs_capture())
    }

    pub fn present(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| j.status == FrameStatus::Present)
            .count()
    }

    pub fn videos(&self) -> usize {
        self.jobs
            .iter()
            .map(|j| j.video_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Record index → frame path, for writing back into the data file.
    ///
    /// Only frames on disk are included: jobs already present, plus the job
    /// indices in `captured`.
    pub fn annotations(&self, captured: &BTreeSet<usize>) -> BTreeMap<usize, String> {
        self.jobs
            .iter()
            .enumerate()
            .filter(|(idx, j)| !j.needs_capture() || captured.contains(idx))
            .map(|(_, j)| (j.record, j.web_path.clone()))
            .collect()
    }
}

/// Source record index of every normalized place, given the drop report.
///
/// The normalizer keeps record order and only removes dropped records.
pub fn record_indices(total: usize, dropped: &[DroppedRecord]) -> Vec<usize> {
    let gone: BTreeSet<usize> = dropped.iter().map(|d| d.index).collect();
    (0..total).filter(|i| !gone.contains(i)).collect()
}

/// Work out which frames exist and which still need capturing.
///
/// Only places with a known video id and a start offset get a frame.
pub fn plan_frames(
    places: &[Place],
    records: &[usize],
    output_dir: &Path,
    web_root: &Path,
    force: bool,
) -> FramePlan {
    let mut jobs = Vec::new();
    for (place, record) in places.iter().zip(records) {
        let Some(video) = &place.video else {
            continue;
        };
        let (Some(video_id), Some(seconds)) = (&video.video_id, video.start_seconds) else {
            continue;
        };

        let output = output_dir.join(frame_file_name(video_id, seconds));
        let status = if output.exists() && !force {
            FrameStatus::Present
        } else {
            FrameStatus::Capture
        };
        jobs.push(FrameJob {
            record: *record,
            place_id: place.id.to_string(),
            video_id: video_id.clone(),
            seconds,
            web_path: web_path(&output, web_root),
            output,
            status,
        });
    }
    FramePlan { jobs }
}

fn web_path(output: &Path, web_root: &Path) -> String {
    match output.strip_prefix(web_root) {
        Ok(rel) => {
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            format!("./{}", parts.join("/"))
        }
        Err(_) => output.display().to_string(),
    }
}
