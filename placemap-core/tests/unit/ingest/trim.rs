use super::*;
use crate::events::file::EventFileReader;
use std::io::Cursor;

const HEADER: &str = "timestamp,user_id,pixel_color,coordinate";

fn opts() -> TrimOpts {
    TrimOpts {
        canvas: Canvas::new(100, 100).unwrap(),
    }
}

fn sort(text: &str) -> Result<SortedLog, IngestError> {
    sort_log(Cursor::new(text.to_string()), Path::new("raw.csv"), &opts())
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_trim");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn timestamps_parse_with_and_without_millis() {
    assert_eq!(
        parse_timestamp_ms("2022-04-04 00:53:51.577 UTC"),
        Some(1_649_033_631_577)
    );
    assert_eq!(
        parse_timestamp_ms("2022-04-04 00:53:51 UTC"),
        Some(1_649_033_631_000)
    );
    assert_eq!(parse_timestamp_ms("yesterday"), None);
}

#[test]
fn csv_split_honors_quotes() {
    assert_eq!(
        split_csv_line(r#"a,"1,2",c"#).unwrap(),
        vec!["a".to_string(), "1,2".to_string(), "c".to_string()]
    );
    assert_eq!(
        split_csv_line(r#""say ""hi""",x"#).unwrap(),
        vec![r#"say "hi""#.to_string(), "x".to_string()]
    );
    assert!(split_csv_line(r#"a,"open"#).is_none());
}

#[test]
fn rows_are_sorted_rebased_and_deduplicated() {
    let text = format!(
        "{HEADER}\n\
         2022-04-04 00:00:02.000 UTC,u1,#FF4500,\"1,2\"\n\
         2022-04-04 00:00:01.500 UTC,u2,#000000,\"3,4\"\n\
         2022-04-04 00:00:02.000 UTC,u1,#FF4500,\"1,2\"\n\
         2022-04-04 00:00:03 UTC,u3,#FFFFFF,\"99,99\"\n"
    );
    let log = sort(&text).unwrap();
    assert_eq!(
        log.report,
        IngestReport {
            accepted: 3,
            rejected: 0,
            duplicates: 1
        }
    );
    assert_eq!(
        log.events,
        vec![
            PixelEvent::new(0, 3, 4, 27),
            PixelEvent::new(500, 1, 2, 2),
            PixelEvent::new(1500, 99, 99, 31),
        ]
    );
    assert_eq!(
        log.header.origin_unix_ms,
        parse_timestamp_ms("2022-04-04 00:00:01.500 UTC").unwrap()
    );
}

#[test]
fn ties_keep_input_order() {
    let text = format!(
        "{HEADER}\n\
         2022-04-04 00:00:01 UTC,u1,#FF4500,\"5,5\"\n\
         2022-04-04 00:00:01 UTC,u2,#000000,\"5,5\"\n"
    );
    let log = sort(&text).unwrap();
    assert_eq!(log.events[0].color, 2);
    assert_eq!(log.events[1].color, 27);
}

#[test]
fn duplicates_separated_by_a_tie_are_dropped() {
    let text = format!(
        "{HEADER}\n\
         2022-04-04 00:00:01.000 UTC,u1,#FF4500,\"1,2\"\n\
         2022-04-04 00:00:01.000 UTC,u2,#000000,\"3,4\"\n\
         2022-04-04 00:00:01.000 UTC,u1,#FF4500,\"1,2\"\n\
         2022-04-04 00:00:02.000 UTC,u1,#FF4500,\"1,2\"\n"
    );
    let log = sort(&text).unwrap();
    assert_eq!(
        log.report,
        IngestReport {
            accepted: 3,
            rejected: 0,
            duplicates: 1
        }
    );
    assert_eq!(
        log.events,
        vec![
            PixelEvent::new(0, 1, 2, 2),
            PixelEvent::new(0, 3, 4, 27),
            PixelEvent::new(1000, 1, 2, 2),
        ]
    );
}

#[test]
fn malformed_rows_are_rejected() {
    let text = format!(
        "{HEADER}\n\
         not a time,u1,#FF4500,\"1,2\"\n\
         2022-04-04 00:00:01 UTC,u1,#123456,\"1,2\"\n\
         2022-04-04 00:00:01 UTC,u1,#FF4500,\"100,2\"\n\
         2022-04-04 00:00:01 UTC,u1,#FF4500,\"1,2,5,6\"\n\
         2022-04-04 00:00:01 UTC,u1,#FF4500\n\
         \n\
         2022-04-04 00:00:01 UTC,u1,#FF4500,\"1,2\"\n"
    );
    let log = sort(&text).unwrap();
    assert_eq!(log.report.rejected, 5);
    assert_eq!(log.report.accepted, 1);
}

#[test]
fn missing_header_is_an_error() {
    let err = sort("2022-04-04 00:00:01 UTC,u1,#FF4500,\"1,2\"\n").unwrap_err();
    assert!(matches!(err, IngestError::MissingHeader { .. }));
    assert!(matches!(
        sort("").unwrap_err(),
        IngestError::MissingHeader { .. }
    ));
}

#[test]
fn wrong_extension_is_rejected_before_reading() {
    let out = scratch("trimmed.csv");
    let _ = std::fs::remove_file(&out);
    let err = trim(Path::new("does/not/exist.csv"), &out, &opts()).unwrap_err();
    assert!(matches!(err, IngestError::WrongExtension { .. }));
    assert!(!out.exists());
}

#[test]
fn trim_writes_a_readable_event_file() {
    let input = scratch("raw.csv");
    std::fs::write(
        &input,
        format!(
            "{HEADER}\n\
             2022-04-04 00:00:05 UTC,u1,#FF4500,\"1,2\"\n\
             2022-04-04 00:00:01 UTC,u2,#000000,\"3,4\"\n"
        ),
    )
    .unwrap();
    let out = scratch("trimmed.pxl");
    let report = trim(&input, &out, &opts()).unwrap();
    assert_eq!(report.accepted, 2);

    let reader = EventFileReader::open(&out).unwrap();
    assert_eq!(reader.header().canvas, opts().canvas);
    let events: Vec<PixelEvent> = reader.map(|r| r.unwrap()).collect();
    assert_eq!(
        events,
        vec![PixelEvent::new(0, 3, 4, 27), PixelEvent::new(4000, 1, 2, 2)]
    );
}

#[test]
fn unreadable_input_is_an_io_error() {
    let err = trim(
        Path::new("target/unit_trim/absent.csv"),
        &scratch("absent.pxl"),
        &opts(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}
