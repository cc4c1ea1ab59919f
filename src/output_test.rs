// Unit tests for output writers

use super::*;
use crate::types::Coordinates;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn record(name: &str) -> FacilityRecord {
    FacilityRecord {
        name: name.to_string(),
        address: "Jl. Melati 5".to_string(),
        coordinates: Coordinates {
            lat: -6.25,
            lng: 106.8,
        },
        rating: Some(4.5),
        review_count: None,
        phone: Some("(021) 123".to_string()),
        website: None,
        place_id: "0xabc:0xdef".to_string(),
        province: "DKI Jakarta".to_string(),
        regency: "Jakarta Selatan".to_string(),
        district: Some("Tebet".to_string()),
        village: None,
        captured_at: "2026-10-17T08:30:15.250Z".parse().unwrap(),
    }
}

#[test]
fn test_default_file_name() {
    let now: DateTime<Utc> = "2026-10-17T14:38:05.123Z".parse().unwrap();
    assert_eq!(
        default_file_name(now, OutputFormat::Json),
        "schools_2026-10-17T14-38-05-123Z.json"
    );
    assert_eq!(
        default_file_name(now, OutputFormat::Csv),
        "schools_2026-10-17T14-38-05-123Z.csv"
    );
}

#[test]
fn test_resolve_output_path() {
    let now: DateTime<Utc> = "2026-10-17T14:38:05.123Z".parse().unwrap();
    let data = Path::new("data");

    assert_eq!(
        resolve_output_path(None, data, OutputFormat::Json, now),
        PathBuf::from("data/schools_2026-10-17T14-38-05-123Z.json")
    );
    assert_eq!(
        resolve_output_path(Some(Path::new("out.json")), data, OutputFormat::Json, now),
        PathBuf::from("out.json")
    );
}

#[test]
fn test_csv_quotes_every_cell() {
    let mut r = record("SD \"Harapan\" Bangsa");
    r.address = "Jl. A, No. 2".to_string();
    let csv = to_csv(&[r]).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(
        "\"Name\",\"Address\",\"Latitude\",\"Longitude\",\"Rating\",\"Total Reviews\""
    ));
    assert_eq!(
        lines[1],
        "\"SD \"\"Harapan\"\" Bangsa\",\"Jl. A, No. 2\",\"-6.25\",\"106.8\",\"4.5\",\"\",\"(021) 123\",\"\",\"0xabc:0xdef\",\"DKI Jakarta\",\"Jakarta Selatan\",\"Tebet\",\"\",\"2026-10-17T08:30:15.250Z\""
    );
}

#[test]
fn test_csv_empty_has_header_only() {
    assert_eq!(to_csv(&[]).unwrap().lines().count(), 1);
}

#[test]
fn test_write_csv_reads_back() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("out.csv");
    let mut r = record("SD \"Harapan\" Bangsa");
    r.address = "Jl. A, No. 2\nBlok C".to_string();

    write_records(&path, &[r, record("B")], OutputFormat::Csv).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADERS.to_vec());

    let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "SD \"Harapan\" Bangsa");
    assert_eq!(&rows[0][1], "Jl. A, No. 2\nBlok C");
    assert_eq!(&rows[0][5], "");
    assert_eq!(&rows[1][0], "B");
    assert_eq!(&rows[1][11], "Tebet");
}

#[test]
fn test_write_json_creates_data_dir() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data").join("nested").join("out.json");

    write_records(&path, &[record("A"), record("B")], OutputFormat::Json).unwrap();

    let written: Vec<FacilityRecord> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].name, "A");
    assert_eq!(written[1], record("B"));
}

#[test]
fn test_write_empty_batch_is_empty_array() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("empty.json");

    write_records(&path, &[], OutputFormat::Json).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}
