// Conversion of register logs stored on disk
use reglog_decoder::{Decoder, DecoderConfig, DecoderError, Header, LogWriter};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_log(path: &Path, header: &str, records: &[(u64, Vec<i32>)]) {
    let header = Header::parse(header).unwrap();
    let file = BufWriter::new(File::create(path).unwrap());
    let mut writer = LogWriter::new(file, &header).unwrap();
    for (timestamp, values) in records {
        writer.write_record(*timestamp, values).unwrap();
    }
    writer.finish().unwrap();
}

fn motor_records(count: u64) -> Vec<(u64, Vec<i32>)> {
    (0..count)
        .map(|i| {
            let i32_i = i as i32;
            (
                1_700_000_000_000_000 + i * 1_000,
                vec![i32_i * 10, -i32_i * 3, i32::MIN + i32_i, i32::MAX - i32_i],
            )
        })
        .collect()
}

const MOTOR_HEADER: &str = "Timestamp,speed-setpoint,torque-ref,flux-meas,flux-ref";

#[test]
fn end_to_end_example() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("log.bin");
    let output = dir.path().join("log.csv");

    let mut bytes = b"Timestamp,SpeedRef\n".to_vec();
    bytes.extend_from_slice(&1000u64.to_le_bytes());
    bytes.extend_from_slice(&(-500i32).to_le_bytes());
    fs::write(&input, bytes).unwrap();

    let summary = Decoder::new().convert_file(&input, &output).unwrap();
    assert_eq!(summary.records, 1);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Timestamp,SpeedRef\n1000,-500\n"
    );
}

#[test]
fn row_count_and_field_count() {
    init_logging();
    let dir = TempDir::new().unwrap();

    for count in [0u64, 1, 7, 250] {
        let input = dir.path().join(format!("log-{}.bin", count));
        let output = dir.path().join(format!("log-{}.csv", count));
        write_log(&input, MOTOR_HEADER, &motor_records(count));

        let summary = Decoder::new().convert_file(&input, &output).unwrap();
        assert_eq!(summary.records, count);
        assert_eq!(summary.value_columns, 4);

        let csv = fs::read_to_string(&output).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len() as u64, count + 1);
        assert_eq!(rows[0], MOTOR_HEADER);
        assert!(rows[1..].iter().all(|row| row.split(',').count() == 5));
    }
}

#[test]
fn exact_multiple_of_record_size_terminates_cleanly() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("log.bin");
    write_log(&input, MOTOR_HEADER, &motor_records(3));

    let header = Header::parse(MOTOR_HEADER).unwrap();
    let payload = fs::metadata(&input).unwrap().len() as usize - (MOTOR_HEADER.len() + 1);
    assert_eq!(payload % header.record_size(), 0);

    let records = Decoder::new().open(&input).unwrap();
    let decoded: Vec<_> = records.collect::<Result<_, _>>().unwrap();
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded[2].values, vec![20, -6, i32::MIN + 2, i32::MAX - 2]);
}

#[test]
fn header_fidelity() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("log.bin");
    let output = dir.path().join("log.csv");
    write_log(&input, "Timestamp,reg-4,reg-8", &[(5, vec![1, -1])]);

    let records = Decoder::new().open(&input).unwrap();
    assert_eq!(records.header().value_count(), 2);
    drop(records);

    Decoder::new().convert_file(&input, &output).unwrap();
    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().next(), Some("Timestamp,reg-4,reg-8"));
}

#[test]
fn truncated_record_leaves_partial_output_by_default() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("log.bin");
    let output = dir.path().join("log.csv");
    write_log(&input, MOTOR_HEADER, &motor_records(2));

    // Drop the last value column of the final record
    let mut bytes = fs::read(&input).unwrap();
    bytes.truncate(bytes.len() - 4);
    fs::write(&input, bytes).unwrap();

    let err = Decoder::new().convert_file(&input, &output).unwrap_err();
    assert!(err.is_truncation());
    match err {
        DecoderError::TruncatedValue {
            record,
            column,
            bytes_read,
        } => {
            assert_eq!(record, 1);
            assert_eq!(column, "flux-ref");
            assert_eq!(bytes_read, 12);
        }
        other => panic!("expected truncated value, got {:?}", other),
    }

    let csv = fs::read_to_string(&output).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].starts_with("1700000000000000,0,0,"));
}

#[test]
fn truncated_record_removes_output_when_configured() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("log.bin");
    let output = dir.path().join("log.csv");
    write_log(&input, MOTOR_HEADER, &motor_records(2));

    let mut bytes = fs::read(&input).unwrap();
    bytes.truncate(bytes.len() - 20);
    fs::write(&input, bytes).unwrap();

    let decoder = Decoder::with_config(DecoderConfig::new().with_remove_partial_output(true));
    let err = decoder.convert_file(&input, &output).unwrap_err();
    assert!(matches!(
        err,
        DecoderError::TruncatedTimestamp {
            record: 1,
            bytes_read: 4
        }
    ));
    assert!(!output.exists());
}

#[test]
fn empty_input_does_not_create_output() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.bin");
    let output = dir.path().join("empty.csv");
    fs::write(&input, b"").unwrap();

    let err = Decoder::new().convert_file(&input, &output).unwrap_err();
    assert!(matches!(err, DecoderError::HeaderError(_)));
    assert!(!output.exists());
}

#[test]
fn record_limit() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("log.bin");
    let output = dir.path().join("log.csv");
    write_log(&input, MOTOR_HEADER, &motor_records(10));

    let decoder = Decoder::with_config(DecoderConfig::new().with_max_records(4));
    let summary = decoder.convert_file(&input, &output).unwrap();
    assert_eq!(summary.records, 4);
    assert!(summary.truncated_by_limit);
    assert_eq!(summary.duration_secs(), Some(0.003));
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 5);
}
