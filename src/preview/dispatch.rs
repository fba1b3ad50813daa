use sharetree_remote_api::FetchedFile;

use super::{PreviewContent, PreviewKind, TextEncoding};
use crate::tree::TreePath;

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "ico", "tiff", "tif", "avif",
];

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "json", "csv", "html", "css", "js", "py", "conf", "cmd", "ps1", "log", "xml", "yml",
    "yaml", "ini", "cfg", "md", "sh", "bat",
];

/// Rendering strategy chosen for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Image,
    Pdf,
    Document,
    Text,
    Binary,
}

/// Picks a [`Strategy`] from the file name and declared content type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewDispatcher;

impl PreviewDispatcher {
    pub fn strategy_for(&self, name: &str, content_type: &str) -> Strategy {
        let extension = extension_of(name);
        let content_type = content_type.to_ascii_lowercase();
        let extension = extension.as_str();

        if IMAGE_EXTENSIONS.contains(&extension) || content_type.starts_with("image/") {
            Strategy::Image
        } else if extension == "pdf" {
            Strategy::Pdf
        } else if matches!(extension, "docx" | "doc") {
            Strategy::Document
        } else if content_type.starts_with("text/")
            || content_type.contains("json")
            || content_type.contains("xml")
            || TEXT_EXTENSIONS.contains(&extension)
        {
            Strategy::Text
        } else {
            Strategy::Binary
        }
    }

    pub fn dispatch(&self, path: TreePath, file: FetchedFile) -> PreviewContent {
        let kind = match self.strategy_for(path.name(), &file.content_type) {
            Strategy::Image => PreviewKind::Image,
            Strategy::Pdf => PreviewKind::Pdf,
            Strategy::Document => PreviewKind::Document,
            Strategy::Binary => PreviewKind::Binary,
            Strategy::Text => {
                let (text, encoding) = decode_text(&file.bytes);
                PreviewKind::Text { text, encoding }
            }
        };
        PreviewContent {
            path,
            content_type: file.content_type,
            kind,
            bytes: file.bytes,
        }
    }
}

fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default()
}

/// UTF-8 when valid, otherwise every byte read as Latin-1.
fn decode_text(bytes: &[u8]) -> (String, TextEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), TextEncoding::Utf8),
        Err(_) => (
            bytes.iter().map(|&byte| char::from(byte)).collect(),
            TextEncoding::Latin1,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched(content_type: &str, bytes: &[u8]) -> FetchedFile {
        FetchedFile {
            content_type: content_type.into(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn extensions_pick_strategies() {
        let dispatcher = PreviewDispatcher;
        let octets = "application/octet-stream";
        assert_eq!(dispatcher.strategy_for("photo.JPG", octets), Strategy::Image);
        assert_eq!(dispatcher.strategy_for("report.pdf", octets), Strategy::Pdf);
        assert_eq!(dispatcher.strategy_for("memo.docx", octets), Strategy::Document);
        assert_eq!(dispatcher.strategy_for("setup.ps1", octets), Strategy::Text);
        assert_eq!(dispatcher.strategy_for("tool.exe", octets), Strategy::Binary);
        assert_eq!(dispatcher.strategy_for("README", octets), Strategy::Binary);
    }

    #[test]
    fn content_types_fill_in_for_unknown_extensions() {
        let dispatcher = PreviewDispatcher;
        assert_eq!(dispatcher.strategy_for("scan", "image/png"), Strategy::Image);
        assert_eq!(
            dispatcher.strategy_for("data", "application/json"),
            Strategy::Text
        );
        assert_eq!(
            dispatcher.strategy_for("notes", "text/plain; charset=utf-8"),
            Strategy::Text
        );
    }

    #[test]
    fn text_falls_back_to_latin1() {
        let dispatcher = PreviewDispatcher;
        let path = TreePath::from_relative("Shared", "caf.txt");
        let content = dispatcher.dispatch(path, fetched("text/plain", b"caf\xe9"));
        assert_eq!(
            content.kind,
            PreviewKind::Text {
                text: "café".into(),
                encoding: TextEncoding::Latin1
            }
        );
    }

    #[test]
    fn binary_content_keeps_its_bytes() {
        let dispatcher = PreviewDispatcher;
        let path = TreePath::from_relative("Shared", "tool.exe");
        let content = dispatcher.dispatch(path, fetched("application/octet-stream", &[0, 1, 2]));
        assert_eq!(content.kind, PreviewKind::Binary);
        assert_eq!(content.size(), 3);
    }
}
