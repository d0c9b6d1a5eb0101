// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Line processing record
//!
//! Tracks every artifact one flightline produces as it runs through the
//! pipeline, in both its scratch location (when `tmp=true`) and its
//! final resting place in the workspace. [`writeback`] moves whichever
//! scratch artifacts exist into their final location and, for a temp
//! run, removes the scratch directory — unconditionally, on every exit
//! path.

use std::path::{Path, PathBuf};

/// One artifact pair: where it is produced, and where it belongs.
#[derive(Debug, Clone)]
struct ArtifactPair {
    scratch: PathBuf,
    finals: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LineProcessingRecord {
    pub is_tmp: bool,
    pub processing_location: PathBuf,
    pub output_location: PathBuf,
    pub output_line_name: String,
    pub projection_token: String,
    artifacts: Vec<ArtifactPair>,
}

impl LineProcessingRecord {
    pub fn new(
        processing_location: impl Into<PathBuf>,
        output_location: impl Into<PathBuf>,
        output_line_name: impl Into<String>,
        projection_token: impl Into<String>,
        is_tmp: bool,
    ) -> Self {
        let processing_location = processing_location.into();
        let output_location = output_location.into();
        let output_line_name = output_line_name.into();
        let projection_token = projection_token.into();

        let masked = format!("{output_line_name}_masked.bil");
        let masked_hdr = format!("{output_line_name}_masked.bil.hdr");
        let igm = format!("{output_line_name}.igm");
        let igm_hdr = format!("{output_line_name}.igm.hdr");
        let igm_transformed = format!("{output_line_name}_{projection_token}.igm");
        let igm_transformed_hdr = format!("{output_line_name}_{projection_token}.igm.hdr");
        let mapped = format!("{output_line_name}3b_mapped.bil");
        let mapped_hdr = format!("{output_line_name}3b_mapped.bil.hdr");
        let zipped = format!("{output_line_name}3b_mapped.bil.zip");

        let artifacts = vec![
            ArtifactPair {
                scratch: processing_location.join(&masked),
                finals: output_location.join("level1b").join(&masked),
            },
            ArtifactPair {
                scratch: processing_location.join(&masked_hdr),
                finals: output_location.join("level1b").join(&masked_hdr),
            },
            ArtifactPair {
                scratch: processing_location.join(&igm),
                finals: output_location.join("igm").join(&igm),
            },
            ArtifactPair {
                scratch: processing_location.join(&igm_hdr),
                finals: output_location.join("igm").join(&igm_hdr),
            },
            ArtifactPair {
                scratch: processing_location.join(&igm_transformed),
                finals: output_location.join("igm").join(&igm_transformed),
            },
            ArtifactPair {
                scratch: processing_location.join(&igm_transformed_hdr),
                finals: output_location.join("igm").join(&igm_transformed_hdr),
            },
            ArtifactPair {
                scratch: processing_location.join(&mapped),
                finals: output_location.join("mapped").join(&mapped),
            },
            ArtifactPair {
                scratch: processing_location.join(&mapped_hdr),
                finals: output_location.join("mapped").join(&mapped_hdr),
            },
            ArtifactPair {
                scratch: processing_location.join(&zipped),
                finals: output_location.join("mapped").join(&zipped),
            },
        ];

        LineProcessingRecord {
            is_tmp,
            processing_location,
            output_location,
            output_line_name,
            projection_token,
            artifacts,
        }
    }

    pub fn masked_file(&self) -> &Path {
        &self.artifacts[0].scratch
    }

    pub fn igm_file(&self) -> &Path {
        &self.artifacts[2].scratch
    }

    pub fn igm_transformed_file(&self) -> &Path {
        &self.artifacts[4].scratch
    }

    pub fn mapname(&self) -> &Path {
        &self.artifacts[6].scratch
    }

    pub fn mapped_header_file(&self) -> &Path {
        &self.artifacts[7].scratch
    }

    pub fn zipname(&self) -> &Path {
        &self.artifacts[8].scratch
    }

    pub fn final_zipname(&self) -> &Path {
        &self.artifacts[8].finals
    }

    /// Every scratch/final pair that actually changes location — a no-op
    /// list when `is_tmp` is false, since the stages wrote straight to
    /// `output_location` already.
    pub fn artifact_pairs(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.artifacts.iter().map(|pair| (pair.scratch.as_path(), pair.finals.as_path()))
    }
}

/// Moves whichever scratch artifacts exist into their final location, via
/// the supplied mover (an injected I/O seam so the domain stays pure),
/// then — for a temp run — removes the scratch directory. Errors moving
/// or removing are logged by the caller, not propagated: writeback is
/// best-effort by design, matching the original's quiet failure mode.
pub fn plan_writeback(record: &LineProcessingRecord) -> Vec<(PathBuf, PathBuf)> {
    if !record.is_tmp {
        return Vec::new();
    }
    record
        .artifact_pairs()
        .map(|(scratch, finals)| (scratch.to_path_buf(), finals.to_path_buf()))
        .collect()
}

pub fn scratch_directory_to_remove(record: &LineProcessingRecord) -> Option<&Path> {
    record.is_tmp.then_some(record.processing_location.as_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_follow_the_original_naming_convention() {
        let record = LineProcessingRecord::new("/tmp/scratch", "/data/GB25_26_207", "f123", "utm_wgs84n_30", true);
        assert_eq!(record.masked_file(), Path::new("/tmp/scratch/f123_masked.bil"));
        assert_eq!(record.mapname(), Path::new("/tmp/scratch/f1233b_mapped.bil"));
        assert_eq!(record.zipname(), Path::new("/tmp/scratch/f1233b_mapped.bil.zip"));
        assert_eq!(record.final_zipname(), Path::new("/data/GB25_26_207/mapped/f1233b_mapped.bil.zip"));
    }

    #[test]
    fn non_temp_runs_plan_no_writeback() {
        let record = LineProcessingRecord::new("/data/GB25_26_207", "/data/GB25_26_207", "f123", "osng", false);
        assert!(plan_writeback(&record).is_empty());
        assert!(scratch_directory_to_remove(&record).is_none());
    }

    #[test]
    fn temp_runs_plan_a_move_per_artifact() {
        let record = LineProcessingRecord::new("/tmp/scratch", "/data/GB25_26_207", "f123", "osng", true);
        assert_eq!(plan_writeback(&record).len(), 9);
        assert_eq!(scratch_directory_to_remove(&record), Some(Path::new("/tmp/scratch")));
    }
}
