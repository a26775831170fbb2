//! Filesystem tests for the record store and the file-level operations.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use fin_core::{CastleRights, Color, GameResult, Piece, PieceKind, Position, Square, Wdl};
use fin_data::{DataSet, Header, StoreError, StoreWriter, combine, convert, inspect, read_dataset, write_dataset};
use tempfile::tempdir;

fn record(i: u32) -> Position {
    let placement = [
        (Square::A1, Piece::new(PieceKind::King, Color::White)),
        (Square::H8, Piece::new(PieceKind::King, Color::Black)),
    ];
    Position::encode(
        &placement,
        Color::White,
        CastleRights::NONE,
        None,
        (i % 100) as u8,
        (i % 255) as u8,
        GameResult::new(i as i16, Wdl::Draw),
    )
    .unwrap()
}

fn records(n: u32) -> Vec<Position> {
    (0..n).map(record).collect()
}

#[test]
fn create_append_finalize_count_invariant() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.fin");

    let mut writer = StoreWriter::create(&path, &Header::default()).unwrap();
    writer.append(&records(10)).unwrap();
    writer.append(&records(5)).unwrap();
    assert_eq!(writer.count(), 15);
    assert_eq!(writer.finalize().unwrap(), 15);

    assert_eq!(inspect(&path).unwrap(), 15);
    let data = read_dataset(&path, u64::MAX).unwrap();
    assert_eq!(data.header.record_count, 15);
    assert_eq!(data.positions.len(), 15);
}

#[test]
fn count_reads_zero_before_finalize() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.fin");

    let mut writer = StoreWriter::create(&path, &Header::default()).unwrap();
    writer.append(&records(3)).unwrap();
    drop(writer); // never finalized

    // The header still says zero, so the file reads as empty, not corrupt.
    assert_eq!(inspect(&path).unwrap(), 0);
}

#[test]
fn header_strings_survive_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.fin");

    let mut header = Header::default();
    header.set_engine_1("engine-a");
    header.set_engine_2("engine-b");
    header.set_comments("test data");

    let data = DataSet {
        header,
        positions: records(4),
    };
    assert_eq!(write_dataset(&path, &data).unwrap(), 4);

    let back = read_dataset(&path, u64::MAX).unwrap();
    assert_eq!(back.header.engine_1(), "engine-a");
    assert_eq!(back.header.engine_2(), "engine-b");
    assert_eq!(back.header.comments(), "test data");
    assert_eq!(back.positions, data.positions);
}

#[test]
fn read_respects_max_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.fin");

    let data = DataSet {
        header: Header::default(),
        positions: records(20),
    };
    write_dataset(&path, &data).unwrap();

    let back = read_dataset(&path, 7).unwrap();
    assert_eq!(back.positions.len(), 7);
    assert_eq!(back.positions, data.positions[..7]);
}

#[test]
fn append_to_resumes_at_stored_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.fin");

    let first = records(6);
    write_dataset(
        &path,
        &DataSet {
            header: Header::default(),
            positions: first.clone(),
        },
    )
    .unwrap();

    let (mut writer, header) = StoreWriter::append_to(&path).unwrap();
    assert_eq!(header.record_count, 6);
    let second = records(4);
    writer.append(&second).unwrap();
    assert_eq!(writer.finalize().unwrap(), 10);

    let back = read_dataset(&path, u64::MAX).unwrap();
    assert_eq!(back.positions[..6], first);
    assert_eq!(back.positions[6..], second);
}

#[test]
fn open_missing_and_directory() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("nope.fin");
    assert!(matches!(
        inspect(&missing),
        Err(StoreError::NotFound { .. })
    ));

    assert!(matches!(
        inspect(dir.path()),
        Err(StoreError::NotAFile { .. })
    ));
}

#[test]
fn truncated_data_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.fin");

    // A header that promises more records than the file holds.
    let mut header = Header::default();
    header.record_count = 5;
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(&header.to_bytes()).unwrap();
    file.write_all(&record(0).to_bytes()).unwrap();
    drop(file);

    assert!(matches!(
        read_dataset(&path, u64::MAX),
        Err(StoreError::Truncated { .. })
    ));
}

#[test]
fn truncated_header_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stub.fin");
    fs::write(&path, [0u8; 100]).unwrap();

    assert!(matches!(
        inspect(&path),
        Err(StoreError::Truncated { .. })
    ));
}

#[test]
fn combine_concatenates_in_order() {
    let dir = tempdir().unwrap();

    let counts = [3u32, 5, 2];
    let mut inputs = Vec::new();
    let mut expected = Vec::new();
    for (i, n) in counts.iter().enumerate() {
        let path = dir.path().join(format!("in-{i}.fin"));
        let positions: Vec<_> = (0..*n).map(|j| record(i as u32 * 100 + j)).collect();
        expected.extend(positions.iter().copied());
        write_dataset(
            &path,
            &DataSet {
                header: Header::default(),
                positions,
            },
        )
        .unwrap();
        inputs.push(path);
    }

    let output = dir.path().join("combined.fin");
    let report = combine(&inputs, &output).unwrap();
    assert_eq!(report.records, 10);
    assert_eq!(report.files_read, 3);
    assert!(report.skipped.is_empty());

    let back = read_dataset(&output, u64::MAX).unwrap();
    assert_eq!(back.header.record_count, 10);
    assert_eq!(back.positions, expected);
}

#[test]
fn combine_refuses_to_clobber() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("exists.fin");
    fs::write(&output, b"something").unwrap();

    let no_inputs: &[PathBuf] = &[];
    let err = combine(no_inputs, &output).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { .. }));
    // Nothing was written over the existing file.
    assert_eq!(fs::read(&output).unwrap(), b"something");
}

#[test]
fn combine_skips_bad_inputs() {
    let dir = tempdir().unwrap();

    let good = dir.path().join("good.fin");
    write_dataset(
        &good,
        &DataSet {
            header: Header::default(),
            positions: records(3),
        },
    )
    .unwrap();

    let missing = dir.path().join("missing.fin");
    let subdir = dir.path().join("subdir");
    fs::create_dir(&subdir).unwrap();

    let output = dir.path().join("combined.fin");
    let report = combine(&[missing, subdir, good], &output).unwrap();
    assert_eq!(report.records, 3);
    assert_eq!(report.files_read, 1);
    assert_eq!(report.skipped.len(), 2);
}

#[test]
fn convert_parses_text_records() {
    let dir = tempdir().unwrap();

    let text = dir.path().join("games.fens");
    fs::write(
        &text,
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 0.5 13\n\
         4k3/8/8/8/8/8/8/4K3 b - - 10 40 1.0 -200\n\
         this is not a fen\n",
    )
    .unwrap();

    let output = dir.path().join("games.fin");
    let report = convert(&[text], &output).unwrap();
    assert_eq!(report.records, 2);
    assert_eq!(report.bad_lines, 1);

    let back = read_dataset(&output, u64::MAX).unwrap();
    assert_eq!(back.positions.len(), 2);
    assert_eq!(back.positions[0].result().score, 13);
    assert_eq!(back.positions[1].result().wdl, Wdl::Win);
}

#[test]
fn convert_resumes_existing_output() {
    let dir = tempdir().unwrap();

    let line = "4k3/8/8/8/8/8/8/4K3 w - - 0 1 0.0 7\n";
    let text = dir.path().join("more.fens");
    fs::write(&text, line).unwrap();

    let output = dir.path().join("out.fin");
    assert_eq!(convert(&[text.clone()], &output).unwrap().records, 1);
    assert_eq!(convert(&[text], &output).unwrap().records, 2);

    let back = read_dataset(&output, u64::MAX).unwrap();
    assert_eq!(back.positions.len(), 2);
    assert_eq!(back.positions[0], back.positions[1]);
}
