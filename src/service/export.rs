use std::{
    fmt,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use json::JsonValue;

use crate::{
    config::{ExportFormat, ExportOptions},
    model::{
        rank::{RankRecord, RANK_TAG_FIELD},
        role::Role,
        roster::RosterResult,
        stats::{stats_columns, StatsRecord},
    },
};

/// Persists the finished tables of a run, returns the files written.
pub trait Sink {
    fn export(&self, result: &RosterResult) -> Result<Vec<PathBuf>, SinkError>;
}

pub fn sink_for(options: &ExportOptions) -> Box<dyn Sink> {
    match options.format {
        ExportFormat::Json => Box::new(JsonSink::new(options.clone())),
        ExportFormat::Tabular => Box::new(CsvSink::new(options.clone())),
    }
}

/// Column names plus rows of cells, one table per exported file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<JsonValue>>,
}

impl Table {
    pub fn ranks(records: &[RankRecord]) -> Self {
        let mut headers: Vec<&'static str> = Role::ALL.iter().map(|r| r.key()).collect();
        headers.push(RANK_TAG_FIELD);

        let rows = records
            .iter()
            .map(|record| {
                let mut row: Vec<JsonValue> = record
                    .ranks
                    .iter()
                    .map(|(_, rank)| rank.as_deref().map_or(JsonValue::Null, JsonValue::from))
                    .collect();
                row.push(record.tag.as_str().into());
                row
            })
            .collect();

        Self {
            name: "ranks".into(),
            headers,
            rows,
        }
    }

    pub fn stats(role: Role, records: &[StatsRecord]) -> Self {
        let rows = records
            .iter()
            .map(|r| {
                let mut row = vec![
                    r.btag.as_str().into(),
                    cell(r.games_played),
                    cell(r.winrate),
                    cell(r.elims_per_10),
                    cell(r.dmg_per_10),
                    cell(r.death_per_10),
                ];
                if let Some(healing) = r.healing_per_10 {
                    row.push(cell(healing));
                }
                row
            })
            .collect();

        Self {
            name: role.key().into(),
            headers: stats_columns(role),
            rows,
        }
    }

    pub fn all(result: &RosterResult) -> Vec<Self> {
        let mut tables = vec![Table::ranks(&result.ranks)];
        tables.extend(Role::ALL.iter().map(|&role| Table::stats(role, result.stats_for(role))));
        tables
    }

    pub fn to_json(&self) -> JsonValue {
        let mut array = JsonValue::new_array();
        for row in &self.rows {
            let mut obj = JsonValue::new_object();
            for (header, value) in self.headers.iter().zip(row) {
                obj[*header] = value.clone();
            }
            // Pushing onto an array we just created can't fail
            let _ = array.push(obj);
        }
        array
    }
}

fn cell<T: Into<JsonValue>>(value: Option<T>) -> JsonValue {
    value.map_or(JsonValue::Null, Into::into)
}

/// Text of a cell in a csv file, nulls stay empty.
fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Short(_) | JsonValue::String(_) => value.as_str().unwrap_or_default().to_string(),
        other => other.dump(),
    }
}

fn out_file(options: &ExportOptions, table: &Table) -> PathBuf {
    options.out_dir.join(format!(
        "{}{}_{}.{}",
        options.file_prefix,
        options.sequence_id,
        table.name,
        options.format.ext()
    ))
}

fn ensure_directory(dir: &Path) -> Result<(), SinkError> {
    if dir.exists() && !dir.is_dir() {
        return Err(SinkError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub struct JsonSink {
    options: ExportOptions,
}

impl JsonSink {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }
}

impl Sink for JsonSink {
    fn export(&self, result: &RosterResult) -> Result<Vec<PathBuf>, SinkError> {
        ensure_directory(&self.options.out_dir)?;

        let mut written = Vec::new();
        for table in Table::all(result) {
            let path = out_file(&self.options, &table);
            let mut file = File::create(&path)?;
            file.write_all(table.to_json().pretty(2).as_bytes())?;
            log::info!("Wrote {} rows to {}", table.rows.len(), path.display());
            written.push(path);
        }
        Ok(written)
    }
}

pub struct CsvSink {
    options: ExportOptions,
}

impl CsvSink {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }
}

impl Sink for CsvSink {
    fn export(&self, result: &RosterResult) -> Result<Vec<PathBuf>, SinkError> {
        ensure_directory(&self.options.out_dir)?;

        let mut written = Vec::new();
        for table in Table::all(result) {
            let path = out_file(&self.options, &table);
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(&table.headers)?;
            for row in &table.rows {
                writer.write_record(row.iter().map(cell_text))?;
            }
            writer.flush()?;
            log::info!("Wrote {} rows to {}", table.rows.len(), path.display());
            written.push(path);
        }
        Ok(written)
    }
}

#[derive(Debug)]
pub enum SinkError {
    NotADirectory(PathBuf),
    FileError(io::Error),
    CsvError(csv::Error),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SinkError::NotADirectory(path) => write!(f, "Path exists but is not a directory: {}", path.display()),
            SinkError::FileError(err) => write!(f, "Could not write export: {}", err),
            SinkError::CsvError(err) => write!(f, "Could not write csv: {}", err),
        }
    }
}

impl From<io::Error> for SinkError {
    fn from(error: io::Error) -> Self {
        Self::FileError(error)
    }
}

impl From<csv::Error> for SinkError {
    fn from(error: csv::Error) -> Self {
        Self::CsvError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ids::PlayerTag, role::PerRole};

    fn record(tag: &str, healing: Option<Option<f64>>) -> StatsRecord {
        StatsRecord {
            btag: PlayerTag::normalize(tag),
            games_played: Some(10.0),
            winrate: Some(55.5),
            elims_per_10: Some(12.0),
            dmg_per_10: None,
            death_per_10: Some(3.0),
            healing_per_10: healing,
        }
    }

    #[test]
    fn rank_table_has_all_role_columns() {
        let mut ranked = RankRecord::unranked(PlayerTag::normalize("X#9"));
        ranked.ranks = PerRole {
            tank: None,
            damage: None,
            support: Some("Platinum1".into()),
        };
        let table = Table::ranks(&[ranked]);
        assert_eq!(table.headers, vec!["tank", "damage", "support", "tag"]);

        let json = table.to_json();
        assert_eq!(json.len(), 1);
        assert!(json[0]["tank"].is_null());
        assert!(json[0]["damage"].is_null());
        assert_eq!(json[0]["support"], "Platinum1");
        assert_eq!(json[0]["tag"], "X-9");
    }

    #[test]
    fn stats_json_fields() {
        let json = Table::stats(Role::Tank, &[record("Y#1", None)]).to_json();
        assert_eq!(json[0]["btag"], "Y-1");
        assert_eq!(json[0]["games_played"], 10);
        assert_eq!(json[0]["winrate"], 55.5);
        assert_eq!(json[0]["elims_per_10"], 12);
        assert!(json[0]["dmg_per_10"].is_null());
        assert!(json[0].has_key("dmg_per_10"));
        assert_eq!(json[0]["death_per_10"], 3);
        assert!(!json[0].has_key("healing_per_10"));

        let json = Table::stats(Role::Support, &[record("Y#1", Some(Some(8000.0)))]).to_json();
        assert_eq!(json[0]["healing_per_10"], 8000);
    }

    #[test]
    fn csv_sink_writes_four_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            format: ExportFormat::Tabular,
            sequence_id: "7".into(),
            out_dir: dir.path().join("out"),
            file_prefix: "cup".into(),
        };

        let mut result = RosterResult::default();
        result.push_rank(RankRecord::unranked(PlayerTag::normalize("A#1")));
        result.stats.support.push(record("A#1", Some(None)));

        let written = sink_for(&options).export(&result).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["cup7_ranks.csv", "cup7_tank.csv", "cup7_damage.csv", "cup7_support.csv"]);

        let ranks = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(ranks, "tank,damage,support,tag\n,,,A-1\n");
        let tank = fs::read_to_string(&written[1]).unwrap();
        assert_eq!(tank, "btag,games_played,winrate,elims_per_10,dmg_per_10,death_per_10\n");
        let support = fs::read_to_string(&written[3]).unwrap();
        assert_eq!(
            support,
            "btag,games_played,winrate,elims_per_10,dmg_per_10,death_per_10,healing_per_10\nA-1,10,55.5,12,,3,\n"
        );
    }

    #[test]
    fn json_sink_writes_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            format: ExportFormat::Json,
            sequence_id: "3".into(),
            out_dir: dir.path().to_path_buf(),
            file_prefix: String::new(),
        };

        let written = sink_for(&options).export(&RosterResult::default()).unwrap();
        assert_eq!(written.len(), 4);
        assert!(written[2].ends_with("3_damage.json"));
        let parsed = json::parse(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert!(parsed.is_array());
        assert!(parsed.is_empty());
    }

    #[test]
    fn refuses_file_as_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        fs::write(&file, "").unwrap();
        let options = ExportOptions {
            format: ExportFormat::Json,
            sequence_id: "1".into(),
            out_dir: file,
            file_prefix: String::new(),
        };
        assert!(matches!(
            sink_for(&options).export(&RosterResult::default()),
            Err(SinkError::NotADirectory(_))
        ));
    }
}
