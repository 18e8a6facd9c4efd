use rwmap_index::{
    load_index, save_index, Index, IndexError, ManpageIndex, ManpageVariant, RankingPolicy,
    SuiteAliases, INDEX_FORMAT_VERSION,
};

fn variant(name: &str, section: &str, language: &str, suite: &str) -> ManpageVariant {
    ManpageVariant {
        name: name.to_string(),
        section: section.to_string(),
        language: language.to_string(),
        binary_package: "coreutils".to_string(),
        suite: suite.to_string(),
    }
}

fn sample_index() -> Index {
    let suites: SuiteAliases = [("stable", "bookworm"), ("unstable", "sid")]
        .into_iter()
        .collect();
    Index::from_variants(
        [
            variant("ls", "1", "en", "bookworm"),
            variant("ls", "1", "de", "bookworm"),
            variant("ls", "1", "en", "sid"),
            variant("Cat", "1", "en", "sid"),
        ],
        suites,
        RankingPolicy {
            preferred_language: "en".to_string(),
            suite_order: vec!["bookworm".to_string()],
        },
    )
    .unwrap()
}

#[test]
fn binary_index_roundtrips() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("nested").join("auxserver.idx");

    let index = sample_index();
    save_index(&path, &index).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"RWMAPIDX"));

    let loaded = load_index(&path).unwrap();
    assert_eq!(loaded, index);
    assert_eq!(loaded.names().collect::<Vec<_>>(), vec!["cat", "ls"]);
    assert_eq!(loaded.suite_aliases().canonical("stable"), Some("bookworm"));
}

#[test]
fn save_replaces_existing_file_without_leaving_temp_files() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("auxserver.idx");
    std::fs::write(&path, b"stale").unwrap();

    save_index(&path, &sample_index()).unwrap();
    save_index(&path, &sample_index()).unwrap();

    let files: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(files, vec![std::ffi::OsString::from("auxserver.idx")]);
    assert_eq!(load_index(&path).unwrap(), sample_index());
}

#[test]
fn unsupported_format_version_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("auxserver.idx");
    save_index(&path, &sample_index()).unwrap();

    // The format version follows the 8 magic bytes as a little-endian u32.
    let mut bytes = std::fs::read(&path).unwrap();
    bytes[8..12].copy_from_slice(&(INDEX_FORMAT_VERSION + 1).to_le_bytes());
    std::fs::write(&path, &bytes).unwrap();

    match load_index(&path).unwrap_err() {
        IndexError::UnsupportedFormatVersion { expected, found } => {
            assert_eq!(expected, INDEX_FORMAT_VERSION);
            assert_eq!(found, INDEX_FORMAT_VERSION + 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn truncated_binary_index_is_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("auxserver.idx");
    save_index(&path, &sample_index()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    assert!(matches!(
        load_index(&path).unwrap_err(),
        IndexError::Bincode(_)
    ));
}

#[test]
fn json_index_loads_with_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("index.json");
    std::fs::write(
        &path,
        r#"{
  "entries": {
    "ls": [
      {"name": "ls", "section": "1", "language": "en", "binary_package": "coreutils", "suite": "bullseye"}
    ]
  },
  "suites": {"stable": "bullseye"}
}"#,
    )
    .unwrap();

    let index = load_index(&path).unwrap();
    assert_eq!(index.name_count(), 1);
    assert_eq!(index.ranking(), &RankingPolicy::default());
    assert_eq!(index.variants("ls")[0].serving_path(".html"), "/bullseye/coreutils/ls.1.en.html");
}

#[test]
fn garbage_is_a_json_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("auxserver.idx");
    std::fs::write(&path, b"not an index").unwrap();

    match load_index(&path).unwrap_err() {
        IndexError::Json { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_file_and_directories_are_errors() {
    let temp = tempfile::tempdir().unwrap();

    let missing = temp.path().join("missing.idx");
    let err = load_index(&missing).unwrap_err();
    assert!(matches!(err, IndexError::Read { .. }), "{err:?}");
    assert!(err.to_string().contains("missing.idx"), "{err}");

    assert!(matches!(
        load_index(temp.path()).unwrap_err(),
        IndexError::NotAFile { .. }
    ));
}

#[test]
fn invalid_json_entries_fail_validation() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("index.json");
    std::fs::write(
        &path,
        r#"{"entries": {"ls": [{"name": "ls", "section": "1", "language": "", "binary_package": "coreutils", "suite": "sid"}]}}"#,
    )
    .unwrap();

    match load_index(&path).unwrap_err() {
        IndexError::InvalidEntry { key, reason } => {
            assert_eq!(key, "ls");
            assert!(reason.contains("language is empty"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
