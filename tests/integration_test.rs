//! Integration tests for reading and writing records end to end.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use csvrecord::io::{MemorySink, MemorySource};
use csvrecord::{
    CsvDialect, CsvRecordConfig, DuplicateFieldPolicy, Error, ReaderConfig, Record, RecordReader,
    RecordWriter, WriterConfig,
};
use test_case::test_case;

const TEST_FILE: &str = "a,b ,c \n1,2 ,3\n4,5,6 \n";

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn expected(trim: bool) -> (Vec<&'static str>, Vec<Record>) {
    if trim {
        (
            vec!["a", "b", "c"],
            vec![
                record(&[("a", "1"), ("b", "2"), ("c", "3")]),
                record(&[("a", "4"), ("b", "5"), ("c", "6")]),
            ],
        )
    } else {
        (
            vec!["a", "b ", "c "],
            vec![
                record(&[("a", "1"), ("b ", "2 "), ("c ", "3")]),
                record(&[("a", "4"), ("b ", "5"), ("c ", "6 ")]),
            ],
        )
    }
}

// ============================================================================
// Reading
// ============================================================================

#[test]
fn test_read_in_order() {
    let input = "a,b,c\n1,2,3\n4,5,6\n";
    let mut reader = RecordReader::from_reader(input.as_bytes()).unwrap();

    assert_eq!(
        reader.read().unwrap(),
        Some(record(&[("a", "1"), ("b", "2"), ("c", "3")]))
    );
    assert_eq!(
        reader.read().unwrap(),
        Some(record(&[("a", "4"), ("b", "5"), ("c", "6")]))
    );
    assert_eq!(reader.read().unwrap(), None);
}

#[test_case(false ; "untrimmed")]
#[test_case(true ; "trimmed")]
fn test_read(trim: bool) {
    let mut reader = RecordReader::trimming(TEST_FILE.as_bytes(), false, trim).unwrap();
    let (fields, records) = expected(trim);

    assert_eq!(reader.fields(), fields.as_slice());
    for (i, want) in records.iter().enumerate() {
        let got = reader.read().unwrap();
        assert_eq!(got.as_ref(), Some(want), "record {i}");
    }
}

#[test_case(false ; "untrimmed")]
#[test_case(true ; "trimmed")]
fn test_read_all(trim: bool) {
    let mut reader = RecordReader::trimming(TEST_FILE.as_bytes(), false, trim).unwrap();
    let (fields, records) = expected(trim);

    assert_eq!(reader.fields(), fields.as_slice());
    assert_eq!(reader.read_all().unwrap(), records);
}

#[test]
fn test_leading_and_trailing_trim_together() {
    let input = "  a ,\tb\n  1 , 2\t\n";
    let mut reader = RecordReader::trimming(input.as_bytes(), true, true).unwrap();
    assert_eq!(reader.fields(), ["a", "b"]);
    assert_eq!(
        reader.read().unwrap(),
        Some(record(&[("a", "1"), ("b", "2")]))
    );
}

#[test]
fn test_empty_source_is_read_error() {
    let result = RecordReader::from_reader("".as_bytes());
    assert!(matches!(result, Err(Error::Read { .. })));

    let result = RecordReader::new(MemorySource::default());
    assert!(matches!(result, Err(Error::Read { .. })));
}

#[test]
fn test_too_long_line_errors() {
    let error_file = "a,b,c\n3,4,5,6\n3,4,5";

    let mut reader = RecordReader::from_reader(error_file.as_bytes()).unwrap();
    assert!(reader.read().unwrap_err().is_read());

    let mut reader = RecordReader::from_reader(error_file.as_bytes()).unwrap();
    assert!(reader.read_all().unwrap_err().is_read());
}

#[test]
fn test_flexible_dialect_short_and_long_rows() {
    let config = ReaderConfig::default().with_dialect(CsvDialect::default().with_flexible(true));
    let input = "a,b,c\n1\n3,4,5,6\n";
    let mut reader = RecordReader::from_reader_with(input.as_bytes(), &config).unwrap();

    assert_eq!(reader.read().unwrap(), Some(record(&[("a", "1")])));
    assert_eq!(
        reader.read().unwrap(),
        Some(record(&[("a", "3"), ("b", "4"), ("c", "5")]))
    );
}

#[test]
fn test_short_row_is_partial_record() {
    let source = MemorySource::new([vec!["a", "b", "c"], vec!["1"]]);
    let mut reader = RecordReader::new(source).unwrap();
    let partial = reader.read().unwrap().unwrap();
    assert_eq!(partial, record(&[("a", "1")]));
    assert_eq!(partial.len(), 1);
}

#[test]
fn test_reader_hands_back_source() {
    let source = MemorySource::new([vec!["a"], vec!["1"], vec!["2"]]);
    let mut reader = RecordReader::new(source).unwrap();
    reader.read().unwrap();
    assert_eq!(reader.get_ref().remaining(), 1);
    assert_eq!(reader.into_inner().remaining(), 1);
}

// ============================================================================
// Writing
// ============================================================================

fn flushed_text(writer: &mut RecordWriter<csvrecord::CsvRowSink<Vec<u8>>>) -> String {
    writer.flush().unwrap();
    String::from_utf8(writer.get_ref().get_ref().clone()).unwrap()
}

#[test]
fn test_write() {
    let mut writer = RecordWriter::to_writer(Vec::new(), ["a", "b", "c"]);
    writer
        .write(&record(&[("a", "1"), ("b", "2"), ("c", "3")]))
        .unwrap();
    assert_eq!(flushed_text(&mut writer), "1,2,3\n");

    writer
        .write(&record(&[("a", "2"), ("b", "3"), ("c", "4")]))
        .unwrap();
    assert_eq!(flushed_text(&mut writer), "1,2,3\n2,3,4\n");

    writer.write_header().unwrap();
    assert_eq!(flushed_text(&mut writer), "1,2,3\n2,3,4\na,b,c\n");
}

#[test]
fn test_write_unknown_field_strict_then_lenient() {
    let mut writer = RecordWriter::new(MemorySink::new(), ["a", "b", "c"]);

    let err = writer
        .write(&record(&[("a", "2"), ("b", "3"), ("d", "4")]))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownField { ref field } if field == "d"));
    writer.flush().unwrap();
    assert!(writer.get_ref().flushed().is_empty());

    writer.set_allow_unknown(true);
    writer
        .write(&record(&[("a", "1"), ("b", "2"), ("d", "3")]))
        .unwrap();
    writer
        .write(&record(&[("a", "2"), ("b", "3"), ("c", "4")]))
        .unwrap();
    writer.flush().unwrap();
    assert_eq!(
        writer.get_ref().flushed(),
        [vec!["1", "2", ""], vec!["2", "3", "4"]]
    );
}

#[test]
fn test_lenient_csv_output() {
    let mut writer = RecordWriter::to_writer(Vec::new(), ["a", "b", "c"]).with_allow_unknown(true);
    writer
        .write(&record(&[("a", "2"), ("b", "3"), ("d", "4")]))
        .unwrap();
    assert_eq!(flushed_text(&mut writer), "2,3,\n");
}

#[test]
fn test_writer_duplicate_policy() {
    let config = WriterConfig::default().with_duplicate_fields(DuplicateFieldPolicy::Reject);
    assert!(RecordWriter::with_config(MemorySink::new(), ["a", "b", "a"], &config).is_err());

    let mut writer = RecordWriter::new(MemorySink::new(), ["a", "b", "a"]);
    writer.write([("a", "x")]).unwrap();
    assert_eq!(writer.into_inner().into_rows(), [vec!["", "", "x"]]);
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_round_trip_through_text() {
    let records = vec![
        record(&[("name", "Ada, Countess"), ("note", "said \"hi\"")]),
        record(&[("name", "Grace"), ("note", "line one\nline two")]),
        record(&[("name", "Linus")]),
    ];

    let mut writer = RecordWriter::to_writer(Vec::new(), ["name", "note"]);
    writer.write_header().unwrap();
    writer.write_all(&records).unwrap();
    let text = writer.into_inner().into_inner().unwrap();

    let mut reader = RecordReader::from_reader(text.as_slice()).unwrap();
    let read_back = reader.read_all().unwrap();
    assert_eq!(read_back[0], records[0]);
    assert_eq!(read_back[1], records[1]);
    assert_eq!(read_back[2], record(&[("name", "Linus"), ("note", "")]));
}

#[test]
fn test_config_file_drives_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[dialect]\ndelimiter = \";\"\n\n[reader]\ntrim_trailing_space = true\n",
    )
    .unwrap();

    let config = CsvRecordConfig::load_from_file(&path).unwrap();
    let mut reader =
        RecordReader::from_reader_with("a ;b\n1 ;2\n".as_bytes(), &config.reader).unwrap();
    assert_eq!(reader.fields(), ["a", "b"]);
    assert_eq!(
        reader.read().unwrap(),
        Some(record(&[("a", "1"), ("b", "2")]))
    );

    let mut writer = RecordWriter::to_writer_with(Vec::new(), ["b", "a"], &config.writer).unwrap();
    writer.write([("a", "1"), ("b", "2")]).unwrap();
    assert_eq!(writer.into_inner().into_inner().unwrap(), b"2;1\n");
}
