use dlws_rs::{DlError, FileSystemStore, OutputSink, Row, resolve_store};

fn row(cells: &[(&str, Option<&str>)]) -> Row {
    cells
        .iter()
        .map(|(k, v)| (*k, v.map(str::to_string)))
        .collect()
}

#[tokio::test]
async fn writes_header_then_rows() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("nested/out.csv");
    let key = key.to_str().unwrap();

    let rows = vec![
        row(&[("identifier", Some("IBM US")), ("PX_LAST", Some("180.5"))]),
        row(&[("identifier", Some("X, Y")), ("NAME", Some("say \"hi\"")), ("PX_LAST", None)]),
    ];
    FileSystemStore::new().write_rows(key, &rows, false).await.unwrap();

    let text = std::fs::read_to_string(key).unwrap();
    assert_eq!(
        text,
        "identifier,PX_LAST,NAME\nIBM US,180.5,\n\"X, Y\",,\"say \"\"hi\"\"\"\n"
    );
}

#[tokio::test]
async fn overwrite_then_append_keeps_one_header() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("out.csv");
    let key = key.to_str().unwrap();
    let store = FileSystemStore::new();

    std::fs::write(key, "stale,content\n1,2\n").unwrap();
    store
        .write_rows(key, &[row(&[("a", Some("1")), ("b", Some("2"))])], false)
        .await
        .unwrap();
    store
        .write_rows(key, &[row(&[("b", Some("4")), ("a", Some("3"))])], true)
        .await
        .unwrap();
    store.write_rows(key, &[row(&[("a", Some("5"))])], true).await.unwrap();

    let text = std::fs::read_to_string(key).unwrap();
    assert_eq!(text, "a,b\n1,2\n3,4\n5,\n");
}

#[tokio::test]
async fn append_to_missing_file_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("fresh.csv");
    let key = key.to_str().unwrap();

    FileSystemStore::new()
        .write_rows(key, &[row(&[("a", Some("1"))])], true)
        .await
        .unwrap();
    assert_eq!(std::fs::read_to_string(key).unwrap(), "a\n1\n");
}

#[tokio::test]
async fn append_with_new_columns_fails() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("out.csv");
    let key = key.to_str().unwrap();
    let store = FileSystemStore::new();

    store.write_rows(key, &[row(&[("a", Some("1"))])], false).await.unwrap();
    let err = store
        .write_rows(key, &[row(&[("a", Some("2")), ("z", Some("9"))])], true)
        .await
        .unwrap_err();

    match err {
        DlError::ColumnMismatch { columns, .. } => assert_eq!(columns, vec!["z".to_string()]),
        other => panic!("expected ColumnMismatch, got {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(key).unwrap(), "a\n1\n");
}

#[tokio::test]
async fn no_rows_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("none.csv");
    FileSystemStore::new()
        .write_rows(key.to_str().unwrap(), &[], false)
        .await
        .unwrap();
    assert!(!key.exists());
}

#[tokio::test]
async fn raw_text_is_written_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("raw/out.csv.chunk1.json");
    let key = key.to_str().unwrap();

    FileSystemStore::new().write_text(key, "{\n  \"a\": 1\n}").await.unwrap();
    assert_eq!(std::fs::read_to_string(key).unwrap(), "{\n  \"a\": 1\n}");
}

#[test]
fn object_store_uris_are_rejected() {
    let err = resolve_store("s3://bucket/prefix/out.csv").unwrap_err();
    assert!(matches!(err, DlError::Configuration(_)));
    assert!(resolve_store("out/data.csv").is_ok());
}

#[tokio::test]
async fn multi_line_cells_survive_append_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("catalog.csv");
    let key = key.to_str().unwrap();
    let store = FileSystemStore::new();

    store
        .write_rows(
            key,
            &[row(&[("field", Some("NAME")), ("description", Some("line one\nline two"))])],
            false,
        )
        .await
        .unwrap();
    store
        .write_rows(key, &[row(&[("field", Some("PX_LAST")), ("description", Some("x"))])], true)
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(key).unwrap(),
        "field,description\nNAME,\"line one\nline two\"\nPX_LAST,x\n"
    );

    let mut rdr = csv::Reader::from_path(key).unwrap();
    let records: Vec<Vec<String>> = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    assert_eq!(
        records,
        vec![
            vec!["NAME".to_string(), "line one\nline two".to_string()],
            vec!["PX_LAST".to_string(), "x".to_string()],
        ]
    );
}

#[tokio::test]
async fn header_with_embedded_newline_is_read_whole() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("odd.csv");
    let key = key.to_str().unwrap();
    let store = FileSystemStore::new();

    store
        .write_rows(key, &[row(&[("id", Some("1")), ("two\nlines", Some("a"))])], false)
        .await
        .unwrap();
    store
        .write_rows(key, &[row(&[("two\nlines", Some("b")), ("id", Some("2"))])], true)
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(key).unwrap(),
        "id,\"two\nlines\"\n1,a\n2,b\n"
    );
}
