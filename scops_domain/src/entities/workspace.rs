// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Workspace
//!
//! The fixed directory layout created for one order: `level1b/` (masked
//! output), `igm/`, `mapped/`, `dem/`, `status/`, and `logs/`, all rooted
//! at a folder named after the order id.

use std::path::{Path, PathBuf};

use crate::value_objects::order_id::OrderId;

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Workspace { root: root.into() }
    }

    /// The workspace rooted at `<base>/<order_id>`.
    pub fn for_order(base: impl AsRef<Path>, order_id: &OrderId) -> Self {
        Workspace { root: base.as_ref().join(order_id.as_str()) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn masked_output_dir(&self) -> PathBuf {
        self.root.join("level1b")
    }

    pub fn igm_dir(&self) -> PathBuf {
        self.root.join("igm")
    }

    pub fn mapped_dir(&self) -> PathBuf {
        self.root.join("mapped")
    }

    pub fn dem_dir(&self) -> PathBuf {
        self.root.join("dem")
    }

    pub fn status_dir(&self) -> PathBuf {
        self.root.join("status")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// The per-line status file, the zip barrier's rendezvous signal.
    pub fn status_file(&self, line_name: &str) -> PathBuf {
        self.status_dir().join(format!("{line_name}_status.txt"))
    }

    pub fn all_subdirectories(&self) -> [PathBuf; 6] {
        [
            self.masked_output_dir(),
            self.igm_dir(),
            self.mapped_dir(),
            self.dem_dir(),
            self.status_dir(),
            self.logs_dir(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_order_joins_base_and_order_id() {
        let id = OrderId::parse("GB25_26_207").unwrap();
        let workspace = Workspace::for_order("/data/web_processing", &id);
        assert_eq!(workspace.root(), Path::new("/data/web_processing/GB25_26_207"));
    }

    #[test]
    fn status_file_uses_the_status_subdirectory() {
        let workspace = Workspace::new("/data/GB25_26_207");
        assert_eq!(workspace.status_file("f123"), Path::new("/data/GB25_26_207/status/f123_status.txt"));
    }

    #[test]
    fn all_subdirectories_covers_every_named_folder() {
        let workspace = Workspace::new("/data/GB25_26_207");
        let dirs = workspace.all_subdirectories();
        assert!(dirs.contains(&workspace.mapped_dir()));
        assert!(dirs.contains(&workspace.dem_dir()));
    }
}
