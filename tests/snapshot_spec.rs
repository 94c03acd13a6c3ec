use snapshot_reader::{
    CommentStyle, FragmentScanner, LineEnding, ParseOptions, Snapshot, SnapshotError,
    SnapshotReader,
};
use std::fs;
use std::path::PathBuf;

const MIXED_PATHS: &[(&str, CommentStyle, u64)] = &[
    ("Sources/Driver/IOFWUserClient.cpp", CommentStyle::Slash, 13),
    ("swift/lib/AST/GenericSignature.cpp", CommentStyle::Slash, 10),
    ("cracklib/util/Makefile", CommentStyle::Hash, 5),
    ("LuLu/Info.plist", CommentStyle::Xml, 4),
    ("php/ext/sample/sample.stub.php", CommentStyle::Slash, 5),
    ("xorg/style.css", CommentStyle::Block, 2),
];

fn fixture_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("fixtures");
    p.push(name);
    p
}

fn records(snapshot: &Snapshot) -> Vec<(String, String)> {
    snapshot
        .iter()
        .map(|f| (f.path().to_string(), f.text()))
        .collect()
}

#[test]
fn two_fragment_example_extracts_exact_records() {
    let stream = b"// === a/b.c ===\nint main(){}\n// === c/d.h ===\n#define X 1";
    let snapshot = Snapshot::parse(stream, &ParseOptions::default()).expect("parse");

    assert_eq!(
        records(&snapshot),
        vec![
            ("a/b.c".to_string(), "int main(){}".to_string()),
            ("c/d.h".to_string(), "#define X 1".to_string()),
        ]
    );
    assert_eq!(snapshot.fragments[0].separator, Some(LineEnding::Lf));
    assert_eq!(snapshot.fragments[1].separator, None);
    assert_eq!(snapshot.to_bytes(), stream.to_vec());
}

#[test]
fn mixed_fixture_lists_every_fragment_in_order() {
    let reader =
        SnapshotReader::open(fixture_path("mixed.snapshot"), ParseOptions::default()).expect("open");

    assert_eq!(reader.num_fragments(), MIXED_PATHS.len());
    for (fragment, (path, style, lines)) in reader.iter().zip(MIXED_PATHS) {
        assert_eq!(fragment.path(), *path);
        assert_eq!(fragment.marker.style, *style, "style for {}", path);
        assert_eq!(fragment.line_count(), *lines, "line count for {}", path);
    }

    let sum: u64 = MIXED_PATHS.iter().map(|(_, _, n)| n).sum();
    assert_eq!(reader.total_lines(), sum);
    assert_eq!(reader.total_lines(), 39);
}

#[test]
fn mixed_fixture_header_lines_and_offsets() {
    let bytes = fs::read(fixture_path("mixed.snapshot")).expect("read fixture");
    let snapshot = Snapshot::parse(&bytes, &ParseOptions::default()).expect("parse");

    let mut expected_line = 1;
    for fragment in &snapshot {
        assert_eq!(fragment.line, expected_line, "header line of {}", fragment.path());
        let offset = fragment.offset as usize;
        assert!(bytes[offset..].starts_with(&fragment.marker.raw));
        expected_line += fragment.line_count() + 1;
    }

    let plist = snapshot.get("LuLu/Info.plist").expect("plist fragment");
    assert_eq!(plist.marker.raw, b"<!-- === LuLu/Info.plist === -->".to_vec());
    assert!(plist.text().starts_with("<?xml"));
    assert!(plist.text().ends_with("</plist>"));
}

#[test]
fn mixed_fixture_roundtrips_byte_for_byte() {
    let bytes = fs::read(fixture_path("mixed.snapshot")).expect("read fixture");
    let snapshot = Snapshot::parse(&bytes, &ParseOptions::default()).expect("parse");
    assert_eq!(snapshot.to_bytes(), bytes);

    let reader =
        SnapshotReader::open(fixture_path("mixed.snapshot"), ParseOptions::default()).expect("open");
    let report = reader.verify(Some(39));
    assert!(report.roundtrip_ok);
    assert!(report.is_ok(), "report: {:?}", report);
    assert_eq!(report.fragments, 6);
    assert!(report.identical_duplicates.is_empty());
}

#[test]
fn llvm_banners_are_content_not_headers() {
    let reader =
        SnapshotReader::open(fixture_path("mixed.snapshot"), ParseOptions::default()).expect("open");
    let swift = reader
        .fragment("swift/lib/AST/GenericSignature.cpp")
        .expect("swift fragment");
    let text = swift.text();
    assert!(text.starts_with("//===--- GenericSignature.cpp"));
    assert!(text.contains("//===----------------------------------------------------------------------===//"));
}

#[test]
fn streaming_scanner_matches_parsed_snapshot() {
    let bytes = fs::read(fixture_path("mixed.snapshot")).expect("read fixture");
    let parsed = Snapshot::parse(&bytes, &ParseOptions::default()).expect("parse");

    let streamed: Vec<_> = SnapshotReader::stream(fixture_path("mixed.snapshot"), ParseOptions::default())
        .expect("stream")
        .map(|r| r.expect("fragment"))
        .collect();
    assert_eq!(streamed, parsed.fragments);
}

#[test]
fn crlf_streams_keep_their_line_endings() {
    let stream = b"// === a.c ===\r\nint a;\r\nint b;\r\n// === b.c ===\r\nint c;\r\n";
    let snapshot = Snapshot::parse(stream, &ParseOptions::default()).expect("parse");

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.fragments[0].content, b"int a;\r\nint b;".to_vec());
    assert_eq!(snapshot.fragments[0].marker.ending, Some(LineEnding::CrLf));
    assert_eq!(snapshot.fragments[0].separator, Some(LineEnding::CrLf));
    assert_eq!(snapshot.fragments[1].content, b"int c;".to_vec());
    assert_eq!(snapshot.total_lines(), 3);
    assert_eq!(snapshot.to_bytes(), stream.to_vec());
}

#[test]
fn empty_files_and_trailing_header() {
    let stream = b"# === empty.py ===\n\n// === a.c ===\nx\n\n# === last.sh ===";
    let snapshot = Snapshot::parse(stream, &ParseOptions::default()).expect("parse");

    let got: Vec<(&str, &[u8])> = snapshot.iter().map(|f| (f.path(), f.content())).collect();
    assert_eq!(
        got,
        vec![
            ("empty.py", &b""[..]),
            ("a.c", &b"x\n"[..]),
            ("last.sh", &b""[..]),
        ]
    );
    assert_eq!(snapshot.fragments[2].marker.ending, None);
    assert_eq!(snapshot.total_lines(), 1);
    assert_eq!(snapshot.to_bytes(), stream.to_vec());
}

#[test]
fn stream_without_headers_is_all_preamble() {
    let stream = b"just some text\nwith no headers\n";
    let mut scanner = FragmentScanner::new(&stream[..], ParseOptions::default());
    assert!(scanner.next().is_none());
    assert_eq!(scanner.preamble(), Some(&stream[..]));

    let err = Snapshot::parse(stream, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, SnapshotError::OrphanContent { bytes: 31 }));
}

#[test]
fn orphan_preamble_is_rejected_in_strict_mode_only() {
    let stream = b"stray line\n// === a.c ===\nint a;\n";

    let err = Snapshot::parse(stream, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, SnapshotError::OrphanContent { bytes: 11 }));

    let snapshot = Snapshot::parse(stream, &ParseOptions::lenient()).expect("lenient parse");
    assert_eq!(snapshot.preamble, b"stray line\n".to_vec());
    assert_eq!(snapshot.len(), 1);
    let report = snapshot.verify(None);
    assert_eq!(report.preamble_bytes, 11);
    assert!(report.roundtrip_ok);
    assert!(!report.is_ok());
    assert_eq!(snapshot.to_bytes(), stream.to_vec());
}

#[test]
fn blank_preamble_is_accepted() {
    let stream = b"\n\n// === a.c ===\nint a;\n";
    let snapshot = Snapshot::parse(stream, &ParseOptions::default()).expect("parse");
    assert_eq!(snapshot.preamble, b"\n\n".to_vec());
    assert!(snapshot.verify(None).is_ok());
    assert_eq!(snapshot.to_bytes(), stream.to_vec());
}

#[test]
fn duplicate_paths() {
    let identical = b"// === a.c ===\nint a;\n// === a.c ===\nint a;\n";
    let snapshot = Snapshot::parse(identical, &ParseOptions::default()).expect("identical duplicates parse");
    let report = snapshot.verify(None);
    assert_eq!(report.identical_duplicates, vec!["a.c".to_string()]);
    assert!(report.conflicts.is_empty());
    assert!(report.is_ok());

    let conflicting = b"// === a.c ===\nint a;\n// === a.c ===\nint b;\n";
    let err = Snapshot::parse(conflicting, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, SnapshotError::ConflictingDuplicate { ref path } if path == "a.c"));

    let reader = SnapshotReader::from_bytes(conflicting, ParseOptions::lenient()).expect("lenient");
    assert_eq!(reader.num_fragments(), 2);
    assert_eq!(reader.fragment("a.c").expect("first wins").content(), b"int a;");
    let report = reader.verify(None);
    assert_eq!(report.conflicts, vec!["a.c".to_string()]);
    assert!(!report.is_ok());
    assert!(matches!(
        reader.check(None),
        Err(SnapshotError::ConflictingDuplicate { .. })
    ));
}

#[test]
fn expected_line_count_is_checked() {
    let reader =
        SnapshotReader::open(fixture_path("mixed.snapshot"), ParseOptions::default()).expect("open");

    assert!(reader.check(Some(39)).is_ok());
    let report = reader.verify(Some(40));
    assert!(!report.is_ok());
    assert!(matches!(
        reader.check(Some(40)),
        Err(SnapshotError::LineCountMismatch { expected: 40, found: 39 })
    ));
}

#[test]
fn missing_fragment_is_not_found() {
    let reader =
        SnapshotReader::open(fixture_path("mixed.snapshot"), ParseOptions::default()).expect("open");
    assert!(matches!(
        reader.fragment("no/such/file.c"),
        Err(SnapshotError::NotFound(ref p)) if p == "no/such/file.c"
    ));
}

#[test]
fn latin1_paths_decode_with_configured_encoding() {
    let stream = b"// === caf\xe9/menu.c ===\nint x;\n";
    let options = ParseOptions {
        encoding: snapshot_reader::snapshot::utils::parse_encoding("latin1").expect("latin1"),
        ..ParseOptions::default()
    };
    let snapshot = Snapshot::parse(stream, &options).expect("parse");
    assert_eq!(snapshot.fragments[0].path(), "café/menu.c");
    assert_eq!(snapshot.to_bytes(), stream.to_vec());

    assert!(matches!(
        snapshot_reader::snapshot::utils::parse_encoding("utf-16le"),
        Err(SnapshotError::UnknownEncoding(_))
    ));
}
