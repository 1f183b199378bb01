//! Bundled scaffold resolution.
//!
//! The bundle is a directory of local HTML pages shipped with the host. The
//! scaffold is the default page shown when no explicit URL is set; the
//! origin policy for script messages is built from every page in the bundle.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use canvas_commands::OriginPolicy;
use url::Url;

/// File name of the default scaffold page.
pub const SCAFFOLD_FILE: &str = "scaffold.html";

/// Default bundle directory: the crate's `assets/` directory.
#[must_use]
pub fn default_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// The on-disk bundle of local pages the surface may load and trust.
#[derive(Debug, Clone)]
pub struct Bundle {
    dir: PathBuf,
    scaffold: PathBuf,
}

impl Bundle {
    /// Open the bundle at `dir`, verifying the scaffold page exists.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be resolved or the scaffold page is
    /// missing.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("bundle directory {} not found", dir.display()))?;
        let scaffold = dir.join(SCAFFOLD_FILE);
        if !scaffold.is_file() {
            anyhow::bail!("{SCAFFOLD_FILE} missing from bundle {}", dir.display());
        }
        Ok(Self { dir, scaffold })
    }

    /// The bundle directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `file://` URL of the scaffold page. Read access stays scoped to the
    /// bundle directory because every page lives inside it.
    ///
    /// # Errors
    ///
    /// Fails when the scaffold path cannot be expressed as a file URL.
    pub fn scaffold_url(&self) -> anyhow::Result<Url> {
        Url::from_file_path(&self.scaffold)
            .map_err(|()| anyhow::anyhow!("scaffold path {} is not absolute", self.scaffold.display()))
    }

    /// Every HTML page in the bundle.
    #[must_use]
    pub fn pages(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut pages: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
            })
            .collect();
        pages.sort();
        pages
    }

    /// Origin policy accepting script messages from the bundle's pages only.
    #[must_use]
    pub fn origin_policy(&self) -> OriginPolicy {
        let mut policy = OriginPolicy::new();
        for page in self.pages() {
            policy.allow_page(&page);
        }
        policy
    }
}
