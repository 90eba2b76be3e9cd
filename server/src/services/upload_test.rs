use super::*;

// =============================================================================
// sanitize_file_name
// =============================================================================

#[test]
fn plain_names_pass_through() {
    assert_eq!(sanitize_file_name("essay.pdf"), "essay.pdf");
    assert_eq!(sanitize_file_name("week-3_notes.txt"), "week-3_notes.txt");
}

#[test]
fn path_components_are_stripped() {
    assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_file_name("/tmp/evil.sh"), "evil.sh");
    assert_eq!(sanitize_file_name(r"C:\Users\x\doc.docx"), "doc.docx");
}

#[test]
fn special_characters_become_underscores() {
    assert_eq!(sanitize_file_name("my essay (final).pdf"), "my_essay__final_.pdf");
}

#[test]
fn hidden_file_prefix_is_removed() {
    assert_eq!(sanitize_file_name(".env"), "env");
    assert_eq!(sanitize_file_name("...config"), "config");
}

#[test]
fn empty_input_falls_back() {
    assert_eq!(sanitize_file_name(""), "file");
    assert_eq!(sanitize_file_name("..."), "file");
}

#[test]
fn control_characters_are_dropped() {
    assert_eq!(sanitize_file_name("a\u{0}b\nc.txt"), "abc.txt");
}

#[test]
fn long_names_are_truncated() {
    let long = "a".repeat(500);
    assert_eq!(sanitize_file_name(&long).len(), 80);
}

// =============================================================================
// upload_dir
// =============================================================================

#[test]
fn upload_dir_defaults_when_unset() {
    // UPLOAD_DIR is not set in the test environment.
    if std::env::var("UPLOAD_DIR").is_err() {
        assert_eq!(upload_dir(), std::path::PathBuf::from("uploads"));
    }
}
