/// Turn a stored upload path into a public URL.
///
/// Absolute URLs pass through untouched; site-relative paths get the
/// configured base URL prefixed. Empty or absent paths stay absent.
pub fn format_url(base_url: &str, path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http") {
        return Some(path.to_string());
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{base}{path}"))
    } else {
        Some(format!("{base}/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_relative_paths() {
        assert_eq!(
            format_url("http://localhost:3000", Some("/uploads/a.jpg")),
            Some("http://localhost:3000/uploads/a.jpg".to_string())
        );
        assert_eq!(
            format_url("http://localhost:3000/", Some("uploads/a.jpg")),
            Some("http://localhost:3000/uploads/a.jpg".to_string())
        );
    }

    #[test]
    fn passes_absolute_urls_through() {
        assert_eq!(
            format_url("http://localhost:3000", Some("https://cdn.example.org/a.jpg")),
            Some("https://cdn.example.org/a.jpg".to_string())
        );
    }

    #[test]
    fn absent_or_empty_paths_stay_absent() {
        assert_eq!(format_url("http://localhost:3000", None), None);
        assert_eq!(format_url("http://localhost:3000", Some("")), None);
    }
}
