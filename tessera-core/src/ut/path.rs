// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use crate::constant::{CANVAS_DIR, IMAGES_DIR, LABEL_EXTENSION, LABELS_DIR, SPLIT_DIR};
use crate::error::TesseraError;

/// Output directories for the patches of one source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub images: PathBuf,
    pub labels: PathBuf,
    pub canvas: PathBuf,
}

impl OutputPaths {
    /// Create every output directory, succeeding if they already exist
    pub fn create(&self) -> Result<(), TesseraError> {
        for directory in [&self.images, &self.labels, &self.canvas] {
            std::fs::create_dir_all(directory)
                .map_err(|err| TesseraError::DirError(format!("{}: {}", directory.display(), err)))?;
        }

        Ok(())
    }
}

/// Storage convention mapping source images to labels and outputs
///
/// The splitting pipeline only ever asks a layout where things live, so
/// alternative dataset structures can be supported by implementing this
/// trait without touching any tiling or clipping code.
pub trait DatasetLayout: Send + Sync {
    /// Path of the label file belonging to a source image
    fn label_path(&self, image: &Path) -> Result<PathBuf, TesseraError>;

    /// Directories receiving the patches of a source image
    fn output_paths(&self, image: &Path) -> Result<OutputPaths, TesseraError>;

    /// Whether a discovered path is itself a previously written patch
    fn is_output(&self, path: &Path) -> bool;
}

/// The yolo segmentation dataset convention
///
/// Images live at `<root>/images/<group>/<stem>.<ext>` and their labels at
/// `<root>/labels/<group>/<stem>.txt`. Patches are written to
/// `<root>/split/images/<group>` and `<root>/split/labels/<group>` unless an
/// explicit output root replaces `<root>/split`. The `<group>` level is
/// optional.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tessera_core::ut::path::{DatasetLayout, YoloLayout};
///
/// let layout = YoloLayout::default();
/// let label = layout.label_path(Path::new("data/images/train/a.png")).unwrap();
/// assert_eq!(label, PathBuf::from("data/labels/train/a.txt"));
///
/// let outputs = layout.output_paths(Path::new("data/images/train/a.png")).unwrap();
/// assert_eq!(outputs.images, PathBuf::from("data/split/images/train"));
/// assert_eq!(outputs.labels, PathBuf::from("data/split/labels/train"));
/// ```
#[derive(Debug, Clone)]
pub struct YoloLayout {
    pub images_dir: String,
    pub labels_dir: String,
    pub split_dir: String,
    pub canvas_dir: String,
    pub output_root: Option<PathBuf>,
}

impl Default for YoloLayout {
    fn default() -> Self {
        Self {
            images_dir: IMAGES_DIR.to_string(),
            labels_dir: LABELS_DIR.to_string(),
            split_dir: SPLIT_DIR.to_string(),
            canvas_dir: CANVAS_DIR.to_string(),
            output_root: None,
        }
    }
}

impl YoloLayout {
    /// Write all patches below `root` instead of `<dataset>/split`
    pub fn with_output_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.output_root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Split an image path into its dataset root and optional group directory
    fn locate(&self, image: &Path) -> Result<(PathBuf, Option<PathBuf>), TesseraError> {
        let parent = image
            .parent()
            .ok_or_else(|| TesseraError::LayoutError(image.display().to_string()))?;

        if dir_name(parent) == Some(self.images_dir.as_str()) {
            let root = parent.parent().unwrap_or_else(|| Path::new(""));
            return Ok((root.to_path_buf(), None));
        }

        let images = parent.parent().filter(|p| dir_name(p) == Some(self.images_dir.as_str()));

        match images {
            Some(images) => {
                let root = images.parent().unwrap_or_else(|| Path::new(""));
                let group = parent.file_name().map(PathBuf::from);
                Ok((root.to_path_buf(), group))
            }
            None => Err(TesseraError::LayoutError(format!(
                "Expected {} below an '{}' directory",
                image.display(),
                self.images_dir
            ))),
        }
    }
}

impl DatasetLayout for YoloLayout {
    fn label_path(&self, image: &Path) -> Result<PathBuf, TesseraError> {
        let (root, group) = self.locate(image)?;

        let stem = image
            .file_stem()
            .ok_or_else(|| TesseraError::LayoutError(image.display().to_string()))?;

        let mut label = root.join(&self.labels_dir);
        if let Some(group) = group {
            label.push(group);
        }
        label.push(stem);

        Ok(label.with_extension(LABEL_EXTENSION))
    }

    fn output_paths(&self, image: &Path) -> Result<OutputPaths, TesseraError> {
        let (root, group) = self.locate(image)?;

        let split_root = self
            .output_root
            .clone()
            .unwrap_or_else(|| root.join(&self.split_dir));

        let grouped = |name: &str| {
            let directory = split_root.join(name);
            match &group {
                Some(group) => directory.join(group),
                None => directory,
            }
        };

        Ok(OutputPaths {
            images: grouped(&self.images_dir),
            labels: grouped(&self.labels_dir),
            canvas: grouped(&self.canvas_dir),
        })
    }

    fn is_output(&self, path: &Path) -> bool {
        if let Some(root) = &self.output_root {
            if path.starts_with(root) {
                return true;
            }
        }

        path.ancestors().any(|ancestor| {
            dir_name(ancestor) == Some(self.images_dir.as_str())
                && ancestor.parent().and_then(dir_name) == Some(self.split_dir.as_str())
        })
    }
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Recursively collect source images with a given extension
///
/// Files recognized by the layout as previously written patches are skipped
/// and the result is sorted so batches are processed in a stable order.
///
/// # Arguments
///
/// * `directory` - Root folder to scan
/// * `extension` - Image extension to match (case insensitive)
/// * `layout` - Dataset layout used to exclude split outputs
///
/// # Examples
///
/// ```no_run
/// use tessera_core::ut::path::{collect_image_paths, YoloLayout};
/// let files = collect_image_paths("dataset/", "png", &YoloLayout::default());
/// ```
pub fn collect_image_paths<P, L>(
    directory: P,
    extension: &str,
    layout: &L,
) -> Result<Vec<PathBuf>, TesseraError>
where
    P: AsRef<Path>,
    L: DatasetLayout + ?Sized,
{
    let extension = extension.trim_start_matches('.').to_lowercase();

    let mut files = Vec::new();
    let mut pending = vec![directory.as_ref().to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current)
            .map_err(|err| TesseraError::DirError(format!("{}: {}", current.display(), err)))?;

        for path in entries.filter_map(Result::ok).map(|entry| entry.path()) {
            if path.is_dir() {
                pending.push(path);
            } else if path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.to_lowercase() == extension)
                && !layout.is_output(&path)
            {
                files.push(path);
            }
        }
    }

    files.sort_unstable();

    Ok(files)
}
