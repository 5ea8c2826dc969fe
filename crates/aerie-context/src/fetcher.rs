use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use aerie_core::{FleetSource, Record, Snapshot, SourceError};

/// Queries the four fleet collections and renders them into one text block.
///
/// Rendering is a pure function of the returned records: identical rows
/// always produce a byte-identical snapshot. No ordering is imposed beyond
/// what the source returns.
pub struct SnapshotFetcher {
    source: Arc<dyn FleetSource>,
}

impl SnapshotFetcher {
    pub fn new(source: Arc<dyn FleetSource>) -> Self {
        Self { source }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Snapshot, SourceError> {
        let drones = self.source.drones().await?;
        let locations = self.source.locations().await?;
        let missions = self.source.missions().await?;
        let survey_reports = self.source.survey_reports().await?;

        debug!(
            drones = drones.len(),
            locations = locations.len(),
            missions = missions.len(),
            survey_reports = survey_reports.len(),
            "fleet snapshot fetched"
        );

        Ok(Snapshot::new(render(&drones, &locations, &missions, &survey_reports)))
    }
}

/// Render the collections in their fixed order: a count line, a label line,
/// then one line per record; consecutive collections separated by a blank
/// line. An empty collection contributes its count and label lines only.
fn render(
    drones: &[Record],
    locations: &[Record],
    missions: &[Record],
    survey_reports: &[Record],
) -> String {
    let mut out = String::new();

    out.push_str(&format!("Total Drones: {}\n", drones.len()));
    out.push_str("Drones:\n");
    out.push_str(&join_lines(drones, drone_line));

    out.push_str(&format!("\n\nTotal Locations: {}\n", locations.len()));
    out.push_str("Locations:\n");
    out.push_str(&join_lines(locations, location_line));

    out.push_str(&format!("\n\nTotal Missions: {}\n", missions.len()));
    out.push_str("Missions:\n");
    out.push_str(&join_lines(missions, mission_line));

    out.push_str(&format!("\n\nTotal Survey Reports: {}\n", survey_reports.len()));
    out.push_str("Survey Reports:\n");
    out.push_str(&join_lines(survey_reports, survey_report_line));

    out
}

fn join_lines(records: &[Record], line: fn(&Record) -> String) -> String {
    records.iter().map(line).collect::<Vec<_>>().join("\n")
}

fn drone_line(record: &Record) -> String {
    format!(
        "ID: {}, Name: {}, Model: {}, Status: {}, Battery: {}%, Last Mission: {}",
        field(record, "id"),
        field(record, "name"),
        field(record, "model"),
        field(record, "status"),
        field(record, "battery_level"),
        field(record, "last_mission"),
    )
}

fn location_line(record: &Record) -> String {
    format!(
        "ID: {}, Name: {}, Type: {}, Description: {}",
        field(record, "id"),
        field(record, "name"),
        field(record, "type"),
        field_or_empty(record, "description"),
    )
}

fn mission_line(record: &Record) -> String {
    format!(
        "ID: {}, Name: {}, Status: {}, Type: {}, Completion: {}%",
        field(record, "id"),
        field(record, "name"),
        field(record, "status"),
        field(record, "mission_type"),
        field(record, "completion_percentage"),
    )
}

fn survey_report_line(record: &Record) -> String {
    format!(
        "ID: {}, Mission ID: {}, Date: {}, Duration: {}, Status: {}",
        field(record, "id"),
        field(record, "mission_id"),
        field(record, "date"),
        field(record, "duration"),
        field(record, "status"),
    )
}

/// A missing or null field renders as `N/A` rather than failing the snapshot.
fn field(record: &Record, name: &str) -> String {
    record
        .get(name)
        .and_then(scalar)
        .unwrap_or_else(|| "N/A".to_string())
}

/// Location descriptions render as the empty string when absent.
fn field_or_empty(record: &Record, name: &str) -> String {
    record.get(name).and_then(scalar).unwrap_or_default()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Fleet rows are flat; nested values never appear
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    fn rec(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    struct StubSource {
        drones: Vec<Record>,
        locations: Vec<Record>,
        missions: Vec<Record>,
        survey_reports: Vec<Record>,
    }

    impl StubSource {
        fn empty() -> Self {
            Self {
                drones: vec![],
                locations: vec![],
                missions: vec![],
                survey_reports: vec![],
            }
        }
    }

    #[async_trait]
    impl FleetSource for StubSource {
        async fn drones(&self) -> Result<Vec<Record>, SourceError> {
            Ok(self.drones.clone())
        }
        async fn locations(&self) -> Result<Vec<Record>, SourceError> {
            Ok(self.locations.clone())
        }
        async fn missions(&self) -> Result<Vec<Record>, SourceError> {
            Ok(self.missions.clone())
        }
        async fn survey_reports(&self) -> Result<Vec<Record>, SourceError> {
            Ok(self.survey_reports.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl FleetSource for FailingSource {
        async fn drones(&self) -> Result<Vec<Record>, SourceError> {
            Err(SourceError::Unavailable("connection refused".into()))
        }
        async fn locations(&self) -> Result<Vec<Record>, SourceError> {
            Ok(vec![])
        }
        async fn missions(&self) -> Result<Vec<Record>, SourceError> {
            Ok(vec![])
        }
        async fn survey_reports(&self) -> Result<Vec<Record>, SourceError> {
            Ok(vec![])
        }
    }

    #[test]
    fn renders_single_drone_exactly() {
        let drones = vec![rec(json!({
            "id": 1,
            "name": "Falcon-1",
            "model": "DJI Mavic 3",
            "status": "available",
            "battery_level": 87,
            "last_mission": null,
        }))];
        let text = render(&drones, &[], &[], &[]);

        assert_eq!(
            text,
            "Total Drones: 1\n\
             Drones:\n\
             ID: 1, Name: Falcon-1, Model: DJI Mavic 3, Status: available, Battery: 87%, Last Mission: N/A\
             \n\nTotal Locations: 0\n\
             Locations:\n\
             \n\nTotal Missions: 0\n\
             Missions:\n\
             \n\nTotal Survey Reports: 0\n\
             Survey Reports:\n"
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let drones = vec![
            rec(json!({"id": 1, "name": "A", "model": "M", "status": "available", "battery_level": 100})),
            rec(json!({"id": 2, "name": "B", "model": "M", "status": "charging", "battery_level": 12})),
        ];
        let missions = vec![rec(json!({
            "id": 7, "name": "Crop Survey", "status": "in-progress",
            "mission_type": "survey", "completion_percentage": 40,
        }))];

        let first = render(&drones, &[], &missions, &[]);
        let second = render(&drones, &[], &missions, &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_fields_render_placeholders() {
        let drones = vec![rec(json!({"id": 3}))];
        let text = render(&drones, &[], &[], &[]);
        assert!(text.contains(
            "ID: 3, Name: N/A, Model: N/A, Status: N/A, Battery: N/A%, Last Mission: N/A"
        ));

        let locations = vec![rec(json!({"id": 1, "name": "North Field", "type": "agricultural"}))];
        let text = render(&[], &locations, &[], &[]);
        assert!(text.contains("ID: 1, Name: North Field, Type: agricultural, Description: "));
    }

    #[test]
    fn survey_report_line_format() {
        let reports = vec![rec(json!({
            "id": 2, "mission_id": 7, "date": "2025-03-14", "duration": null, "status": "final",
        }))];
        let text = render(&[], &[], &[], &reports);
        assert!(text.contains("ID: 2, Mission ID: 7, Date: 2025-03-14, Duration: N/A, Status: final"));
    }

    #[test]
    fn collections_render_in_fixed_order() {
        let text = render(&[], &[], &[], &[]);
        let drones = text.find("Total Drones:").unwrap();
        let locations = text.find("Total Locations:").unwrap();
        let missions = text.find("Total Missions:").unwrap();
        let reports = text.find("Total Survey Reports:").unwrap();
        assert!(drones < locations && locations < missions && missions < reports);
    }

    #[tokio::test]
    async fn fetch_is_pure_for_fixed_source() {
        let source = Arc::new(StubSource {
            drones: vec![rec(json!({"id": 1, "name": "A", "model": "M", "status": "ok", "battery_level": 50}))],
            ..StubSource::empty()
        });
        let fetcher = SnapshotFetcher::new(source);

        let first = fetcher.fetch().await.unwrap();
        let second = fetcher.fetch().await.unwrap();
        assert_eq!(first.as_str(), second.as_str());
        assert!(first.as_str().contains("Total Drones: 1"));
    }

    #[tokio::test]
    async fn source_failure_propagates() {
        let fetcher = SnapshotFetcher::new(Arc::new(FailingSource));
        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
