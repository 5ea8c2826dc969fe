use async_trait::async_trait;
use rusqlite::params;
use rusqlite::types::ValueRef;
use tracing::instrument;

use aerie_core::{FleetSource, Record, SourceError};

use crate::database::Database;
use crate::error::StoreError;

const SELECT_DRONES: &str =
    "SELECT id, name, model, status, battery_level, last_mission FROM drones";
const SELECT_LOCATIONS: &str = "SELECT id, name, type, description, latitude, longitude FROM locations";
const SELECT_MISSIONS: &str =
    "SELECT id, name, status, mission_type, completion_percentage, location_id, drone_id FROM missions";
const SELECT_SURVEY_REPORTS: &str =
    "SELECT id, mission_id, date, duration, status FROM survey_reports";

/// Write API for the fleet tables. Seeding and tests go through here; the
/// chat path itself is read-only.
#[derive(Clone)]
pub struct FleetRepo {
    db: Database,
}

pub struct NewDrone {
    pub name: String,
    pub model: String,
    pub status: String,
    pub battery_level: i64,
    pub last_mission: Option<String>,
}

pub struct NewLocation {
    pub name: String,
    pub location_type: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub struct NewMission {
    pub name: String,
    pub status: String,
    pub mission_type: String,
    pub completion_percentage: i64,
    pub location_id: Option<i64>,
    pub drone_id: Option<i64>,
}

pub struct NewSurveyReport {
    pub mission_id: i64,
    pub date: String,
    pub duration: Option<i64>,
    pub status: String,
}

impl FleetRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self, drone), fields(name = %drone.name))]
    pub fn insert_drone(&self, drone: &NewDrone) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO drones (name, model, status, battery_level, last_mission)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    drone.name,
                    drone.model,
                    drone.status,
                    drone.battery_level,
                    drone.last_mission,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    #[instrument(skip(self, location), fields(name = %location.name))]
    pub fn insert_location(&self, location: &NewLocation) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO locations (name, type, description, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    location.name,
                    location.location_type,
                    location.description,
                    location.latitude,
                    location.longitude,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    #[instrument(skip(self, mission), fields(name = %mission.name))]
    pub fn insert_mission(&self, mission: &NewMission) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO missions (name, status, mission_type, completion_percentage, location_id, drone_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    mission.name,
                    mission.status,
                    mission.mission_type,
                    mission.completion_percentage,
                    mission.location_id,
                    mission.drone_id,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    #[instrument(skip(self, report), fields(mission_id = report.mission_id))]
    pub fn insert_survey_report(&self, report: &NewSurveyReport) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO survey_reports (mission_id, date, duration, status)
                 VALUES (?1, ?2, ?3, ?4)",
                params![report.mission_id, report.date, report.duration, report.status],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }
}

/// `FleetSource` backed by the embedded SQLite store. Queries run on a
/// blocking thread; the connection lock is scoped to each query and released
/// on every exit path.
#[derive(Clone)]
pub struct SqliteFleetSource {
    db: Database,
}

impl SqliteFleetSource {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn collect(&self, sql: &'static str) -> Result<Vec<Record>, SourceError> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || query_records(&db, sql))
            .await
            .map_err(|e| SourceError::Unavailable(format!("query task failed: {e}")))?
            .map_err(SourceError::from)
    }
}

#[async_trait]
impl FleetSource for SqliteFleetSource {
    async fn drones(&self) -> Result<Vec<Record>, SourceError> {
        self.collect(SELECT_DRONES).await
    }

    async fn locations(&self) -> Result<Vec<Record>, SourceError> {
        self.collect(SELECT_LOCATIONS).await
    }

    async fn missions(&self) -> Result<Vec<Record>, SourceError> {
        self.collect(SELECT_MISSIONS).await
    }

    async fn survey_reports(&self) -> Result<Vec<Record>, SourceError> {
        self.collect(SELECT_SURVEY_REPORTS).await
    }
}

fn query_records(db: &Database, sql: &str) -> Result<Vec<Record>, StoreError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let rows = stmt.query_map([], |row| {
            let mut record = Record::new();
            for (idx, name) in columns.iter().enumerate() {
                record.insert(name.clone(), value_to_json(row.get_ref(idx)?));
            }
            Ok(record)
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    })
}

fn value_to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Value::from(f),
        ValueRef::Text(t) => serde_json::Value::from(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => serde_json::Value::Null,
    }
}
