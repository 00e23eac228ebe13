//! Historical Dataset Index
//!
//! Loads the incident CSV once at startup into typed, immutable rows and
//! precomputes the per-country aggregates served by `/globe_data`. Every
//! query operation is a read over the in-memory index; nothing here is
//! mutated after load.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;

use crate::models::{
    CountryAggregate, GlobeResponse, HistoryResponse, IncidentRecord, MetadataResponse,
    SimilarIncident, SimilarResponse,
};

/// Fixed column projection; the source file's full wide schema is never
/// materialized.
const COLUMNS: [&str; 11] = [
    "iyear",
    "country",
    "country_txt",
    "region",
    "region_txt",
    "latitude",
    "longitude",
    "attacktype1_txt",
    "nkill",
    "city",
    "summary",
];

/// Cap on `/similar` results
const SIMILAR_LIMIT: usize = 50;

pub struct DatasetIndex {
    records: Vec<IncidentRecord>,
    country_stats: Vec<CountryAggregate>,
}

impl DatasetIndex {
    /// Load and index the dataset. An absent file is a degraded mode (the
    /// dependent endpoints serve empty payloads), not a startup failure.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            tracing::warn!(
                "dataset not found at {}; history features disabled",
                path.display()
            );
            return None;
        }

        match Self::load_inner(path) {
            Ok(index) => {
                tracing::info!(
                    records = index.records.len(),
                    countries = index.country_stats.len(),
                    "historical dataset loaded"
                );
                Some(index)
            }
            Err(e) => {
                tracing::error!("failed to load dataset: {e:#}");
                None
            }
        }
    }

    fn load_inner(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)?;

        // The source file is Latin-1; lossy decoding only affects free-text
        // fields, never ids, years or coordinates.
        let projection: Arc<[PlSmallStr]> = COLUMNS.iter().map(|c| PlSmallStr::from(*c)).collect();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_columns(Some(projection))
            .with_infer_schema_length(Some(1000))
            .with_parse_options(CsvParseOptions::default().with_encoding(CsvEncoding::LossyUtf8))
            .into_reader_with_file_handle(file)
            .finish()?;

        let records = materialize(&df)?;
        let country_stats = aggregate_by_country(&records);

        Ok(Self {
            records,
            country_stats,
        })
    }

    /// Distinct country/region id-to-name mappings, name-sorted.
    pub fn metadata(&self) -> MetadataResponse {
        MetadataResponse {
            countries: name_sorted_map(
                self.records
                    .iter()
                    .map(|r| (r.country_id, r.country_name.as_str())),
            ),
            regions: name_sorted_map(
                self.records
                    .iter()
                    .map(|r| (r.region_id, r.region_name.as_str())),
            ),
        }
    }

    /// Yearly incident counts for one country, years ascending. A country
    /// with no rows yields empty vectors, not an error.
    pub fn history(&self, country_id: i32) -> HistoryResponse {
        let mut counts: BTreeMap<i32, u32> = BTreeMap::new();
        let mut total = 0u64;

        for record in self.records.iter().filter(|r| r.country_id == country_id) {
            *counts.entry(record.year).or_insert(0) += 1;
            total += 1;
        }

        HistoryResponse {
            years: counts.keys().copied().collect(),
            counts: counts.values().copied().collect(),
            total_incidents: total,
        }
    }

    /// Up to 50 incidents matching region and attack type, newest year
    /// first. Rows with latitude 0 carry no real coordinate and are
    /// excluded; ties in year keep the index's original order (stable
    /// sort).
    pub fn similar(&self, region_id: i32, attack_type: &str) -> SimilarResponse {
        let mut matches: Vec<&IncidentRecord> = self
            .records
            .iter()
            .filter(|r| {
                r.region_id == region_id && r.attack_type == attack_type && r.latitude != 0.0
            })
            .collect();
        matches.sort_by(|a, b| b.year.cmp(&a.year));

        let incidents = matches
            .into_iter()
            .take(SIMILAR_LIMIT)
            .map(|r| SimilarIncident {
                iyear: r.year,
                latitude: r.latitude,
                longitude: r.longitude,
                city: r.city.clone(),
                country: r.country_id,
                country_txt: r.country_name.clone(),
                nkill: r.killed,
                summary: r.summary.clone(),
            })
            .collect();

        SimilarResponse { incidents }
    }

    /// Precomputed per-country aggregates, as-is.
    pub fn globe(&self) -> GlobeResponse {
        GlobeResponse {
            stats: self.country_stats.clone(),
        }
    }
}

/// Narrow the frame into typed rows. Null-fill happens here, before any
/// cast: numeric geo/kill fields default to 0, text fields to "Unknown".
fn materialize(df: &DataFrame) -> anyhow::Result<Vec<IncidentRecord>> {
    let years = df.column("iyear")?;
    let country_ids = df.column("country")?;
    let country_names = df.column("country_txt")?;
    let region_ids = df.column("region")?;
    let region_names = df.column("region_txt")?;
    let latitudes = df.column("latitude")?;
    let longitudes = df.column("longitude")?;
    let attack_types = df.column("attacktype1_txt")?;
    let killed = df.column("nkill")?;
    let cities = df.column("city")?;
    let summaries = df.column("summary")?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        records.push(IncidentRecord {
            year: int_at(years, i),
            country_id: int_at(country_ids, i),
            country_name: text_at(country_names, i),
            region_id: int_at(region_ids, i),
            region_name: text_at(region_names, i),
            latitude: float_at(latitudes, i),
            longitude: float_at(longitudes, i),
            attack_type: text_at(attack_types, i),
            killed: float_at(killed, i),
            city: text_at(cities, i),
            summary: text_at(summaries, i),
        });
    }

    Ok(records)
}

fn int_at(column: &Column, i: usize) -> i32 {
    match column.get(i) {
        Ok(AnyValue::Int64(v)) => v as i32,
        Ok(AnyValue::Int32(v)) => v,
        Ok(AnyValue::Float64(v)) => v as i32,
        Ok(AnyValue::Float32(v)) => v as i32,
        _ => 0,
    }
}

fn float_at(column: &Column, i: usize) -> f32 {
    match column.get(i) {
        Ok(AnyValue::Float64(v)) => v as f32,
        Ok(AnyValue::Float32(v)) => v,
        Ok(AnyValue::Int64(v)) => v as f32,
        Ok(AnyValue::Int32(v)) => v as f32,
        _ => 0.0,
    }
}

fn text_at(column: &Column, i: usize) -> String {
    match column.get(i) {
        Ok(AnyValue::String(v)) => v.to_string(),
        Ok(AnyValue::StringOwned(v)) => v.to_string(),
        _ => "Unknown".to_string(),
    }
}

struct CountryAcc {
    lat_sum: f64,
    lon_sum: f64,
    fatalities: f64,
    count: u64,
    country_id: i32,
}

/// Group rows by country name: mean(lat), mean(lon), sum(killed), count,
/// first country id seen. Any aggregate with a non-finite field is dropped.
fn aggregate_by_country(records: &[IncidentRecord]) -> Vec<CountryAggregate> {
    let mut groups: BTreeMap<&str, CountryAcc> = BTreeMap::new();

    for record in records {
        let acc = groups
            .entry(record.country_name.as_str())
            .or_insert(CountryAcc {
                lat_sum: 0.0,
                lon_sum: 0.0,
                fatalities: 0.0,
                count: 0,
                country_id: record.country_id,
            });
        acc.lat_sum += f64::from(record.latitude);
        acc.lon_sum += f64::from(record.longitude);
        acc.fatalities += f64::from(record.killed);
        acc.count += 1;
    }

    groups
        .into_iter()
        .filter_map(|(country, acc)| {
            let aggregate = CountryAggregate {
                country: country.to_string(),
                lat: acc.lat_sum / acc.count as f64,
                lon: acc.lon_sum / acc.count as f64,
                fatalities: acc.fatalities,
                incidents: acc.count,
                country_id: acc.country_id,
            };
            (aggregate.lat.is_finite()
                && aggregate.lon.is_finite()
                && aggregate.fatalities.is_finite())
            .then_some(aggregate)
        })
        .collect()
}

fn name_sorted_map<'a>(
    pairs: impl Iterator<Item = (i32, &'a str)>,
) -> serde_json::Map<String, serde_json::Value> {
    let mut distinct: HashMap<i32, &str> = HashMap::new();
    for (id, name) in pairs {
        distinct.entry(id).or_insert(name);
    }

    let mut entries: Vec<(i32, &str)> = distinct.into_iter().collect();
    entries.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)));

    entries
        .into_iter()
        .map(|(id, name)| (id.to_string(), serde_json::Value::from(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "iyear,country,country_txt,region,region_txt,latitude,longitude,attacktype1_txt,nkill,city,summary"
        )
        .unwrap();
        // Afghanistan, one incident per year
        writeln!(
            file,
            "2020,4,Afghanistan,6,South Asia,34.0,69.0,Bombing/Explosion,3,Kabul,\"Device detonated near a market, several casualties\""
        )
        .unwrap();
        writeln!(
            file,
            "2021,4,Afghanistan,6,South Asia,35.0,68.5,Bombing/Explosion,1,Herat,Roadside device"
        )
        .unwrap();
        // Coordinate unknown; must never appear in /similar
        writeln!(
            file,
            "2022,4,Afghanistan,6,South Asia,0,0,Bombing/Explosion,2,Unknown,No location reported"
        )
        .unwrap();
        // Different attack type in the same region
        writeln!(
            file,
            "2021,4,Afghanistan,6,South Asia,34.5,69.2,Armed Assault,5,Kandahar,Checkpoint attack"
        )
        .unwrap();
        // Different region entirely
        writeln!(
            file,
            "2019,95,Iraq,10,Middle East & North Africa,33.3,44.4,Bombing/Explosion,7,Baghdad,Car bomb"
        )
        .unwrap();
        // Missing numeric and text fields exercise the null-fill policy
        writeln!(file, "2018,95,Iraq,10,Middle East & North Africa,,,Armed Assault,,,").unwrap();
        file
    }

    fn load_fixture(file: &NamedTempFile) -> DatasetIndex {
        DatasetIndex::load(file.path()).unwrap()
    }

    #[test]
    fn test_absent_file_yields_no_index() {
        assert!(DatasetIndex::load(Path::new("/definitely/not/here.csv")).is_none());
    }

    #[test]
    fn test_null_fill_policy() {
        let file = fixture();
        let index = load_fixture(&file);

        let gap_row = index
            .records
            .iter()
            .find(|r| r.year == 2018)
            .expect("2018 row loaded");
        assert_eq!(gap_row.latitude, 0.0);
        assert_eq!(gap_row.longitude, 0.0);
        assert_eq!(gap_row.killed, 0.0);
        assert_eq!(gap_row.city, "Unknown");
        assert_eq!(gap_row.summary, "Unknown");
    }

    #[test]
    fn test_history_counts_by_year() {
        let file = fixture();
        let index = load_fixture(&file);

        let history = index.history(4);
        assert_eq!(history.years, vec![2020, 2021, 2022]);
        assert_eq!(history.counts, vec![1, 2, 1]);
        assert_eq!(history.total_incidents, 4);
    }

    #[test]
    fn test_history_two_single_incident_years() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "iyear,country,country_txt,region,region_txt,latitude,longitude,attacktype1_txt,nkill,city,summary"
        )
        .unwrap();
        writeln!(file, "2020,4,Afghanistan,6,South Asia,34.0,69.0,Bombing/Explosion,3,Kabul,a").unwrap();
        writeln!(file, "2021,4,Afghanistan,6,South Asia,35.0,68.5,Bombing/Explosion,1,Herat,b").unwrap();

        let index = load_fixture(&file);
        let history = index.history(4);
        assert_eq!(history.years, vec![2020, 2021]);
        assert_eq!(history.counts, vec![1, 1]);
        assert_eq!(history.total_incidents, 2);
    }

    #[test]
    fn test_history_unmatched_country_is_empty() {
        let file = fixture();
        let index = load_fixture(&file);

        let history = index.history(999);
        assert!(history.years.is_empty());
        assert!(history.counts.is_empty());
        assert_eq!(history.total_incidents, 0);
    }

    #[test]
    fn test_similar_filters_and_sorts_newest_first() {
        let file = fixture();
        let index = load_fixture(&file);

        let similar = index.similar(6, "Bombing/Explosion");
        // The 2022 row matches the filter but has latitude 0
        assert_eq!(similar.incidents.len(), 2);
        assert_eq!(similar.incidents[0].iyear, 2021);
        assert_eq!(similar.incidents[0].latitude, 35.0);
        assert_eq!(similar.incidents[1].iyear, 2020);
        assert_eq!(similar.incidents[1].latitude, 34.0);
    }

    #[test]
    fn test_similar_caps_at_fifty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "iyear,country,country_txt,region,region_txt,latitude,longitude,attacktype1_txt,nkill,city,summary"
        )
        .unwrap();
        for i in 0..60 {
            writeln!(
                file,
                "{},4,Afghanistan,6,South Asia,34.5,69.0,Bombing/Explosion,1,Kabul,row",
                1960 + i
            )
            .unwrap();
        }

        let index = load_fixture(&file);
        let similar = index.similar(6, "Bombing/Explosion");
        assert_eq!(similar.incidents.len(), 50);
        // Newest first, so the oldest ten years fall off
        assert_eq!(similar.incidents[0].iyear, 2019);
        assert_eq!(similar.incidents[49].iyear, 1970);
    }

    #[test]
    fn test_metadata_sorted_and_unique() {
        let file = fixture();
        let index = load_fixture(&file);

        let metadata = index.metadata();
        // Two countries across six rows: no duplicate ids
        assert_eq!(metadata.countries.len(), 2);
        assert_eq!(metadata.regions.len(), 2);

        let names: Vec<&str> = metadata
            .countries
            .values()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Afghanistan", "Iraq"]);

        assert_eq!(
            metadata.countries.get("4").and_then(|v| v.as_str()),
            Some("Afghanistan")
        );
    }

    #[test]
    fn test_globe_aggregates_per_country() {
        let file = fixture();
        let index = load_fixture(&file);

        let globe = index.globe();
        assert_eq!(globe.stats.len(), 2);

        let afghanistan = globe
            .stats
            .iter()
            .find(|s| s.country == "Afghanistan")
            .unwrap();
        assert_eq!(afghanistan.country_id, 4);
        assert_eq!(afghanistan.incidents, 4);
        assert_eq!(afghanistan.fatalities, 11.0);
        // Mean over all four rows, including the unknown-coordinate one
        assert!((afghanistan.lat - (34.0 + 35.0 + 0.0 + 34.5) / 4.0).abs() < 1e-6);

        let iraq = globe.stats.iter().find(|s| s.country == "Iraq").unwrap();
        assert_eq!(iraq.incidents, 2);
        assert_eq!(iraq.fatalities, 7.0);
    }
}
