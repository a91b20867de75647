use super::*;

#[test]
fn test_detect_each_dialect() {
    assert_eq!(
        detect_bytes(b"<?xml version=\"1.0\"?>\n<datafile/>"),
        Some(DatFormat::Xml)
    );
    assert_eq!(
        detect_bytes(b"clrmamepro (\n\tname \"Test\"\n)"),
        Some(DatFormat::ClrMamePro)
    );
    assert_eq!(
        detect_bytes(b"DOSCenter (\n\tName: Test\n)"),
        Some(DatFormat::DosCenter)
    );
}

#[test]
fn test_detect_is_case_sensitive() {
    assert_eq!(detect_bytes(b"CLRMAMEPRO ("), None);
    assert_eq!(detect_bytes(b"doscenter ("), None);
}

#[test]
fn test_unknown_prefix() {
    assert_eq!(detect_bytes(b"game (\n)"), None);
    assert_eq!(detect_bytes(b"<datafile>"), None);
    assert_eq!(detect_bytes(b""), None);
    assert_eq!(detect_bytes(b"<?x"), None);
}

#[test]
fn test_leading_whitespace_is_rejected() {
    assert_eq!(detect_bytes(b"  <?xml version=\"1.0\"?>"), None);
    assert_eq!(detect_bytes(b"\nclrmamepro ("), None);
}

#[test]
fn test_non_ascii_bytes_are_dropped() {
    // UTF-8 byte order mark
    assert_eq!(
        detect_bytes(b"\xEF\xBB\xBF<?xml version=\"1.0\"?>"),
        Some(DatFormat::Xml)
    );
}

#[test]
fn test_only_first_bytes_are_sniffed() {
    // Seven non-ASCII bytes leave only three ASCII characters in the window.
    let mut bytes = vec![0xC3u8; 7];
    bytes.extend_from_slice(b"clrmamepro (");
    assert_eq!(detect_bytes(&bytes), None);
}

#[test]
fn test_detect_format_names_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("broken.dat");
    std::fs::write(&path, "garbage content").unwrap();

    let err = detect_format(&path).unwrap_err();
    match err {
        DatError::UnrecognizedFormat { path: p } => assert!(p.ends_with("broken.dat")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_detect_format_short_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("short.dat");
    std::fs::write(&path, "DOSCe").unwrap();
    assert_eq!(detect_format(&path).unwrap(), DatFormat::DosCenter);
}

#[test]
fn test_display_names() {
    assert_eq!(DatFormat::Xml.to_string(), "XML");
    assert_eq!(DatFormat::ClrMamePro.to_string(), "ClrMamePro");
    assert_eq!(DatFormat::DosCenter.to_string(), "DOSCenter");
}
