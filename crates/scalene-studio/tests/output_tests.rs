use std::path::Path;
use scalene_studio::output::{validate_path, write_html};
use tempfile::NamedTempFile;

#[test]
fn test_write_html_passes_content_through() {
    let temp_file = NamedTempFile::new().unwrap();
    let report = "<!DOCTYPE html><html><body><script>const x = 1;</script></body></html>";

    write_html(report, temp_file.path()).unwrap();

    assert_eq!(std::fs::read_to_string(temp_file.path()).unwrap(), report);
}

#[test]
fn test_validate_output_path_empty() {
    let result = validate_path(Path::new(""));
    assert!(result.is_err());
}

#[test]
fn test_validate_output_path_directory() {
    // Try to write to a directory path
    let temp_dir = tempfile::tempdir().unwrap();
    let result = validate_path(temp_dir.path());
    assert!(result.is_err());
}

#[test]
fn test_write_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/profile.html");

    write_html("<html>OK</html>", &nested_path).unwrap();

    assert!(nested_path.exists());
}

#[test]
fn test_write_into_directory_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    assert!(write_html("<html></html>", temp_dir.path()).is_err());
}
