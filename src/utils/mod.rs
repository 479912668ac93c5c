use std::path::{Path, PathBuf};

use url::Url;

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Local file name for an image URL: its last path segment, kept verbatim
/// apart from sanitizing. `None` when the URL has no usable segment.
pub fn filename_from_url(url: &str) -> Option<String> {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed.path_segments()?.last()?.to_string(),
        Err(_) => url.split(['?', '#']).next()?.rsplit('/').next()?.to_string(),
    };

    let name = sanitize_filename(&segment);
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name)
}

/// Render an error and every `source()` below it on one line:
/// `outer: middle: root cause`.
pub fn error_chain(err: impl Into<anyhow::Error>) -> String {
    format!("{:#}", err.into())
}

/// Sibling file that receives bytes until the download is complete.
pub fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("test/file.jpg"), "test_file.jpg");
        assert_eq!(sanitize_filename("normal-name.jpg"), "normal-name.jpg");
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("http://example.com/img/12345.jpg").as_deref(),
            Some("12345.jpg")
        );
        assert_eq!(
            Path::new("data/anime").join(filename_from_url("http://example.com/img/12345.jpg").unwrap()),
            Path::new("data/anime/12345.jpg")
        );
    }

    #[test]
    fn test_filename_from_url_keeps_encoded_segment() {
        assert_eq!(
            filename_from_url("https://example.net/data/preview/Konachan.com%20-%201.jpg?x=1")
                .as_deref(),
            Some("Konachan.com%20-%201.jpg")
        );
    }

    #[test]
    fn test_filename_from_url_rejects_directories() {
        assert_eq!(filename_from_url("http://example.com/img/"), None);
        assert_eq!(filename_from_url("http://example.com"), None);
    }

    #[test]
    fn test_filename_from_relative_reference() {
        assert_eq!(filename_from_url("img/9.png").as_deref(), Some("9.png"));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let outer = anyhow::Error::new(inner).context("error sending request");
        assert_eq!(error_chain(outer), "error sending request: connection refused");
    }

    #[test]
    fn test_staging_path() {
        assert_eq!(
            staging_path(Path::new("data/anime/12345.jpg")),
            PathBuf::from("data/anime/12345.jpg.part")
        );
    }
}
