//! End-to-end conversion tests: delimited rows in, `.mrk` lines and ISO 2709
//! bytes out.

use artmarc::{convert_record, convert_records, parse_row, read_rows, MrkWriter};
use chrono::{DateTime, TimeZone, Utc};

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 9, 30, 12, 37, 55).unwrap()
}

/// A 28-column row with the mandatory columns filled in.
fn base_row() -> Vec<String> {
    let mut row = vec![String::new(); 28];
    row[0] = "ART".to_string(); // sublibrary
    row[1] = "English".to_string(); // languages
    row[3] = "The Art of War".to_string(); // title, original script
    row[11] = "UK".to_string(); // country
    row[13] = "London".to_string(); // place
    row[14] = "Sotheby's".to_string(); // publisher
    row[15] = "2020".to_string(); // publication year
    row[17] = "250 pages".to_string(); // extent
    row[18] = "30 cm".to_string(); // size
    row[24] = "20200930".to_string(); // sale dates
    row[27] = "312345678".to_string(); // barcode
    row
}

#[test]
fn test_english_record_display_output_is_exact() {
    let mut record = parse_row(&base_row(), timestamp()).unwrap();
    let encoded = convert_record(&mut record).unwrap();
    assert_eq!(
        encoded.display,
        vec![
            "=LDR  00000nam\\a22000003i\\4500",
            "=005  20200930123755.0",
            "=008  200930s2020||||xxk||||||||||||||\\||eng||",
            "=033  0\\$a20200930",
            "=040  \\\\$aUkOxU$beng$erda$cUkOxU",
            "=245  04$aThe Art of War.",
            "=264  \\1$aLondon :$bSotheby's,$c2020",
            "=300  \\\\$a250 pages ;$c30 cm",
            "=336  \\\\$atext$2rdacontent",
            "=337  \\\\$aunmediated$2rdamedia",
            "=338  \\\\$avolume$2rdacarrier",
            "=876  \\\\$p312345678",
            "=904  \\\\$aOxford Local Record",
        ]
    );
}

#[test]
fn test_chinese_record_links_alternate_script() {
    let mut row = base_row();
    row[1] = "Chinese / English".to_string();
    row[3] = "中國書畫".to_string();
    row[4] = "Zhongguo shu hua".to_string();
    row[11] = "China".to_string();
    row[13] = "Hong Kong".to_string();

    let mut record = parse_row(&row, timestamp()).unwrap();
    let encoded = convert_record(&mut record).unwrap();

    assert!(encoded
        .display
        .contains(&"=245  00$6880-01$aZhongguo shu hua.".to_string()));
    assert!(encoded
        .display
        .contains(&"=880  00$6245-01$a中國書畫.".to_string()));
    assert!(encoded.display.contains(&"=041  0\\$achi$aeng".to_string()));
    // The 880 sorts after every field that can reference it.
    let position_245 = encoded
        .display
        .iter()
        .position(|line| line.starts_with("=245"))
        .unwrap();
    let position_880 = encoded
        .display
        .iter()
        .position(|line| line.starts_with("=880"))
        .unwrap();
    assert!(position_245 < position_880);
}

#[test]
fn test_binary_output_structure() {
    let mut record = parse_row(&base_row(), timestamp()).unwrap();
    let encoded = convert_record(&mut record).unwrap();
    let binary = &encoded.binary;

    assert_eq!(*binary.last().unwrap(), 0x1d);
    // 12 data fields (the leader has no directory entry).
    let base_address = 24 + 12 * 12 + 1;
    let text = String::from_utf8(binary.clone()).unwrap();
    assert_eq!(&text[12..17], format!("{base_address:05}"));
    assert_eq!(&text[5..12], "nam a22");
    assert_eq!(&text[17..24], "3i 4500");
    assert_eq!(binary[base_address - 1], 0x1e);

    // Declared length covers everything but the record terminator.
    let declared: usize = text[..5].parse().unwrap();
    assert_eq!(declared, binary.len() - 1);

    // Directory offsets are cumulative.
    let directory = &text[24..base_address - 1];
    let mut expected_offset = 0;
    for entry in directory.as_bytes().chunks(12) {
        let entry = std::str::from_utf8(entry).unwrap();
        let length: usize = entry[3..7].parse().unwrap();
        let offset: usize = entry[7..12].parse().unwrap();
        assert_eq!(offset, expected_offset);
        expected_offset += length;
    }
    assert_eq!(base_address + expected_offset, declared);
}

#[test]
fn test_batch_skips_record_without_barcode() {
    let mut bad_row = base_row();
    bad_row[27] = String::new();
    let rows = vec![base_row(), bad_row, base_row()];

    let mut records: Vec<_> = rows
        .iter()
        .map(|row| parse_row(row, timestamp()).unwrap())
        .collect();
    let encoded = convert_records(&mut records);
    assert_eq!(encoded.len(), 2);
}

#[test]
fn test_csv_to_mrk_file_round_trip() {
    let row = base_row();
    let header: Vec<String> = (0..28).map(|i| format!("col{i}")).collect();
    let csv = format!("{}\n{}\n{}\n", header.join(","), row.join(","), row.join(","));

    let rows = read_rows(csv.as_bytes(), b',', true).unwrap();
    assert_eq!(rows.len(), 2);

    let mut buffer = Vec::new();
    let mut writer = MrkWriter::new(&mut buffer);
    for row in &rows {
        let mut record = parse_row(row, timestamp()).unwrap();
        writer.write_record(&convert_record(&mut record).unwrap()).unwrap();
    }
    writer.finish().unwrap();
    assert_eq!(writer.records_written(), 2);

    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text.matches("=LDR").count(), 2);
    assert_eq!(text.matches("\n\n").count(), 1);
    assert!(!text.ends_with("\n\n"));
}

#[test]
fn test_occurrence_numbers_shared_within_record() {
    let mut row = base_row();
    row[1] = "Chinese / English".to_string();
    row[3] = "中國書畫".to_string();
    row[4] = "Zhongguo shu hua".to_string();
    row[7] = "陶瓷及藝術品".to_string();
    row[8] = "Taoci ji yishupin".to_string();

    let mut record = parse_row(&row, timestamp()).unwrap();
    let encoded = convert_record(&mut record).unwrap();

    // 245 takes occurrence 01, 246 takes occurrence 02.
    assert!(encoded
        .display
        .iter()
        .any(|line| line.contains("$6880-01") && line.starts_with("=245")));
    assert!(encoded
        .display
        .iter()
        .any(|line| line.contains("$6880-02") && line.starts_with("=246")));
    assert!(encoded
        .display
        .iter()
        .any(|line| line.contains("$6245-01")));
    assert!(encoded
        .display
        .iter()
        .any(|line| line.contains("$6246-02")));
}
