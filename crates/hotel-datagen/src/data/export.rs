use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::datasets::{Booking, DailyRateRow, DatasetManifest, HotelDataset, InventoryRow, MarketRow};
use super::generator::generate_dataset;
use crate::config::Configuration;
use crate::error::{DatagenError, DatagenResult};

pub const ARCHIVE_FILE: &str = "hotel_data.zip";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Table {
    Bookings,
    Inventory,
    DailyRates,
    Market,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Bookings,
        Table::Inventory,
        Table::DailyRates,
        Table::Market,
    ];

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Bookings => "bookings.csv",
            Self::Inventory => "inventory.csv",
            Self::DailyRates => "daily_rates.csv",
            Self::Market => "market_data.csv",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Bookings => &Booking::COLUMNS,
            Self::Inventory => &InventoryRow::COLUMNS,
            Self::DailyRates => &DailyRateRow::COLUMNS,
            Self::Market => &MarketRow::COLUMNS,
        }
    }

    pub fn to_csv(self, dataset: &HotelDataset) -> DatagenResult<Vec<u8>> {
        match self {
            Self::Bookings => rows_to_csv(self.columns(), &dataset.bookings),
            Self::Inventory => rows_to_csv(self.columns(), &dataset.inventory),
            Self::DailyRates => rows_to_csv(self.columns(), &dataset.daily_rates),
            Self::Market => rows_to_csv(self.columns(), &dataset.market),
        }
    }
}

/// Header is written up front so empty tables still carry their columns.
pub fn rows_to_csv<T: Serialize>(columns: &[&str], rows: &[T]) -> DatagenResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|error| DatagenError::Io(error.into_error()))
}

/// Bundles all four CSVs. Entry timestamps are pinned so archives are
/// byte-identical for identical datasets.
pub fn write_archive<W: Write + Seek>(dataset: &HotelDataset, writer: W) -> DatagenResult<W> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());
    let mut zip = ZipWriter::new(writer);
    for table in Table::ALL {
        zip.start_file(table.file_name(), options)?;
        zip.write_all(&table.to_csv(dataset)?)?;
    }
    Ok(zip.finish()?)
}

pub fn archive_bytes(dataset: &HotelDataset) -> DatagenResult<Vec<u8>> {
    Ok(write_archive(dataset, Cursor::new(Vec::new()))?.into_inner())
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportOutcome {
    pub manifest: DatasetManifest,
    /// Existing output already matched the requested seed and configuration.
    pub reused: bool,
}

/// Generates and writes the CSVs, the archive and the manifest into `out_dir`.
///
/// Without `force`, an existing manifest with the same seed and configuration
/// fingerprint short-circuits the run.
pub fn write_dataset(
    out_dir: &Path,
    config: &Configuration,
    seed: u64,
    force: bool,
) -> DatagenResult<ExportOutcome> {
    config.validate()?;
    let fingerprint = config.fingerprint()?;

    if !force {
        if let Ok(existing) = load_manifest(out_dir) {
            let matches_request = existing.schema_version == DatasetManifest::SCHEMA_VERSION
                && existing.seed == seed
                && existing.config_fingerprint == fingerprint
                && Table::ALL
                    .iter()
                    .map(|table| table.file_name())
                    .chain([ARCHIVE_FILE])
                    .all(|file| out_dir.join(file).is_file());
            if matches_request {
                tracing::info!(out_dir = %out_dir.display(), seed, "output is up to date; skipping generation");
                return Ok(ExportOutcome {
                    manifest: existing,
                    reused: true,
                });
            }
        }
    }

    let dataset = generate_dataset(config, seed)?;
    fs::create_dir_all(out_dir)?;
    for table in Table::ALL {
        let path = out_dir.join(table.file_name());
        fs::write(&path, table.to_csv(&dataset)?)?;
        tracing::debug!(path = %path.display(), "wrote table");
    }
    write_archive(&dataset, fs::File::create(out_dir.join(ARCHIVE_FILE))?)?;

    let manifest = DatasetManifest::describe(&dataset, seed, fingerprint);
    fs::write(
        out_dir.join(MANIFEST_FILE),
        serde_json::to_vec_pretty(&manifest)?,
    )?;
    tracing::info!(out_dir = %out_dir.display(), bookings = manifest.bookings, "dataset written");

    Ok(ExportOutcome {
        manifest,
        reused: false,
    })
}

pub fn load_manifest(out_dir: &Path) -> DatagenResult<DatasetManifest> {
    let manifest: DatasetManifest =
        serde_json::from_slice(&fs::read(out_dir.join(MANIFEST_FILE))?)?;
    Ok(manifest)
}

pub fn load_rows<T: DeserializeOwned>(path: &Path) -> DatagenResult<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn load_bookings(out_dir: &Path) -> DatagenResult<Vec<Booking>> {
    load_rows(&out_dir.join(Table::Bookings.file_name()))
}
