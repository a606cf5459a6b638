use std::io::Read;

use chrono::NaiveDate;
use hotel_datagen::calendar::DateWindow;
use hotel_datagen::config::{Configuration, RatePlan, RoomType};
use hotel_datagen::data::datasets::{Booking, DatasetManifest, MarketRow};
use hotel_datagen::data::export::{
    archive_bytes, load_bookings, load_manifest, load_rows, rows_to_csv, write_dataset, Table,
    ARCHIVE_FILE, MANIFEST_FILE,
};
use hotel_datagen::data::generator::generate_dataset;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn config(bookings: usize) -> Configuration {
    Configuration::basic(
        DateWindow::new(date(2024, 1, 1), date(2024, 3, 31)),
        DateWindow::new(date(2024, 4, 1), date(2024, 4, 14)),
        vec![
            RoomType::new("Standard", 20, 900_000.0),
            RoomType::new("Deluxe", 8, 1_500_000.0),
        ],
        vec![RatePlan::percent("BAR", 0.0)],
        bookings,
    )
}

#[test]
fn empty_tables_still_carry_headers() {
    let csv = rows_to_csv::<Booking>(&Booking::COLUMNS, &[]).expect("csv");
    assert_eq!(
        String::from_utf8(csv).expect("utf8"),
        "Booking_ID,Booking_Date,Arrival_Date,Departure_Date,Room_Type,Rate_Plan,Booked_Rate,Nights,Guests,Channel,Is_Member,Is_Cancelled,Revenue\n"
    );
}

#[test]
fn csv_columns_match_declared_headers() {
    let dataset = generate_dataset(&config(5), 42).expect("generate");
    for table in Table::ALL {
        let csv = String::from_utf8(table.to_csv(&dataset).expect("csv")).expect("utf8");
        let mut lines = csv.lines();
        let header = lines.next().expect("header");
        assert_eq!(header, table.columns().join(","));
        for line in lines {
            assert_eq!(line.split(',').count(), table.columns().len(), "{line}");
        }
    }
}

#[test]
fn archive_bundles_all_four_tables() {
    let dataset = generate_dataset(&config(5), 42).expect("generate");
    let bytes = archive_bytes(&dataset).expect("zip");
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("open zip");
    assert_eq!(archive.len(), 4);
    for table in Table::ALL {
        let mut entry = archive.by_name(table.file_name()).expect("entry");
        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("read entry");
        assert_eq!(content, table.to_csv(&dataset).expect("csv"));
    }
}

#[test]
fn writes_tables_archive_and_manifest() {
    let temp = tempfile::tempdir().expect("tempdir");
    let cfg = config(12);
    let outcome = write_dataset(temp.path(), &cfg, 42, false).expect("write dataset");
    assert!(!outcome.reused);

    for table in Table::ALL {
        assert!(temp.path().join(table.file_name()).is_file(), "{}", table.file_name());
    }
    assert!(temp.path().join(ARCHIVE_FILE).is_file());
    assert!(temp.path().join(MANIFEST_FILE).is_file());

    let manifest = load_manifest(temp.path()).expect("manifest");
    assert_eq!(manifest.schema_version, DatasetManifest::SCHEMA_VERSION);
    assert_eq!(manifest.seed, 42);
    assert_eq!(manifest.bookings, 12);
    assert_eq!(manifest.inventory_rows, 28);
    assert_eq!(manifest.daily_rate_rows, 28);
    assert_eq!(manifest.market_rows, 14);
    assert_eq!(manifest.config_fingerprint, cfg.fingerprint().expect("fingerprint"));
}

#[test]
fn exported_rows_load_back() {
    let temp = tempfile::tempdir().expect("tempdir");
    let cfg = config(30);
    write_dataset(temp.path(), &cfg, 7, false).expect("write dataset");
    let dataset = generate_dataset(&cfg, 7).expect("generate");

    assert_eq!(load_bookings(temp.path()).expect("bookings"), dataset.bookings);
    let market: Vec<MarketRow> =
        load_rows(&temp.path().join(Table::Market.file_name())).expect("market");
    assert_eq!(market, dataset.market);
}

#[test]
fn reuses_matching_output_unless_forced() {
    let temp = tempfile::tempdir().expect("tempdir");
    let cfg = config(12);

    write_dataset(temp.path(), &cfg, 42, false).expect("first write");
    let again = write_dataset(temp.path(), &cfg, 42, false).expect("second write");
    assert!(again.reused);

    std::fs::remove_file(temp.path().join(ARCHIVE_FILE)).expect("remove archive");
    let rebuilt = write_dataset(temp.path(), &cfg, 42, false).expect("archive rebuild");
    assert!(!rebuilt.reused);
    assert!(temp.path().join(ARCHIVE_FILE).is_file());

    let forced = write_dataset(temp.path(), &cfg, 42, true).expect("forced write");
    assert!(!forced.reused);

    let reseeded = write_dataset(temp.path(), &cfg, 43, false).expect("reseeded write");
    assert!(!reseeded.reused);
    assert_eq!(load_manifest(temp.path()).expect("manifest").seed, 43);

    let changed = write_dataset(temp.path(), &config(13), 43, false).expect("changed config");
    assert!(!changed.reused);
    assert_eq!(changed.manifest.bookings, 13);
}

#[test]
fn invalid_configuration_writes_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out_dir = temp.path().join("out");
    let mut cfg = config(1);
    cfg.room_types.clear();
    let err = write_dataset(&out_dir, &cfg, 42, false).expect_err("invalid config");
    assert!(err.to_string().contains("room_types"), "unexpected error: {err}");
    assert!(!out_dir.exists());
}
