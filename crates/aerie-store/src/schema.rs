/// SQL DDL for the aerie fleet database.
/// WAL mode + foreign keys enabled at connection time.
pub const SCHEMA_VERSION: u32 = 1;

pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS drones (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    model TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'available',
    battery_level INTEGER NOT NULL DEFAULT 100,
    last_mission TEXT
);

CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    description TEXT,
    latitude REAL,
    longitude REAL
);

CREATE TABLE IF NOT EXISTS missions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'scheduled',
    mission_type TEXT NOT NULL,
    completion_percentage INTEGER NOT NULL DEFAULT 0,
    location_id INTEGER REFERENCES locations(id),
    drone_id INTEGER REFERENCES drones(id)
);

CREATE TABLE IF NOT EXISTS survey_reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    mission_id INTEGER NOT NULL REFERENCES missions(id),
    date TEXT NOT NULL,
    duration INTEGER,
    status TEXT NOT NULL DEFAULT 'draft'
);

CREATE INDEX IF NOT EXISTS idx_missions_location ON missions(location_id);
CREATE INDEX IF NOT EXISTS idx_missions_drone ON missions(drone_id);
CREATE INDEX IF NOT EXISTS idx_survey_reports_mission ON survey_reports(mission_id);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);
"#;

pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;
