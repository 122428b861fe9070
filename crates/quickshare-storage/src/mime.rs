//! Extension-based MIME type guessing.

/// Guess a MIME type from a file name's extension.
pub fn guess_mime(file_name: &str) -> Option<&'static str> {
    mime_guess::from_path(file_name).first_raw()
}
