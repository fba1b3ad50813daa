//! Routing fetched file bytes to a rendering strategy.
//!
//! Decoding images, PDFs and word-processor documents is left to external
//! viewers; those strategies carry a summary plus the raw bytes so the file
//! can be saved.

mod dispatch;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use dispatch::{PreviewDispatcher, Strategy};

use crate::tree::TreePath;

/// Character set a text preview was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewKind {
    Text { text: String, encoding: TextEncoding },
    Image,
    Pdf,
    Document,
    Binary,
}

/// A dispatched preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewContent {
    pub path: TreePath,
    pub content_type: String,
    pub kind: PreviewKind,
    pub bytes: Vec<u8>,
}

impl PreviewContent {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, PreviewKind::Text { .. })
    }

    /// Breadcrumb segments from the collection down to the file.
    pub fn breadcrumbs(&self) -> Vec<&str> {
        std::iter::once(self.path.collection())
            .chain(self.path.segments().iter().map(String::as_str))
            .collect()
    }

    /// Write the bytes into `dir` under the file's name, picking
    /// `name (n).ext` instead of replacing an existing file.
    pub fn save_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let name = self.path.name();
        let (stem, extension) = match name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
            _ => (name, None),
        };
        let mut attempt = 0;
        loop {
            let target = match (attempt, extension) {
                (0, _) => dir.join(name),
                (_, Some(extension)) => dir.join(format!("{stem} ({attempt}).{extension}")),
                (_, None) => dir.join(format!("{stem} ({attempt})")),
            };
            match OpenOptions::new().write(true).create_new(true).open(&target) {
                Ok(mut file) => {
                    file.write_all(&self.bytes)?;
                    return Ok(target);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => return Err(err),
            }
        }
    }
}

/// What the preview pane shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    #[default]
    Empty,
    Loading {
        path: TreePath,
    },
    Ready(PreviewContent),
    Failed {
        path: TreePath,
        message: String,
    },
}

impl PreviewState {
    pub fn path(&self) -> Option<&TreePath> {
        match self {
            Self::Empty => None,
            Self::Loading { path } | Self::Failed { path, .. } => Some(path),
            Self::Ready(content) => Some(&content.path),
        }
    }
}

/// Preview state plus the generation that lets the latest open win.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    generation: u64,
    state: PreviewState,
}

impl PreviewSlot {
    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn begin(&mut self, path: TreePath) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.state = PreviewState::Loading { path };
        self.generation
    }

    pub fn finish(&mut self, generation: u64, state: PreviewState) -> bool {
        if generation != self.generation {
            return false;
        }
        self.state = state;
        true
    }

    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = PreviewState::Empty;
    }
}
