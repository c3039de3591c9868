//! Per-replay statistic extraction.

use serde_json::Value;
use tracing::debug;

use crate::fetch::FetchError;
use crate::models::{CategoryTables, ReplayId, StatCategory};

use super::ballchasing::ReplayRecord;
use super::provider::ReplayProvider;

/// Fetch one replay and flatten its player statistics.
///
/// A failed fetch is returned as-is; no player of the replay is kept.
pub async fn extract_replay(
    provider: &dyn ReplayProvider,
    id: &ReplayId,
) -> Result<CategoryTables, FetchError> {
    let record = provider.fetch_replay(id).await?;
    let tables = tables_from_record(&record);
    debug!("Replay {}: {} observations", id, tables.total_rows());
    Ok(tables)
}

/// One row per player per category, blue roster first.
pub fn tables_from_record(record: &ReplayRecord) -> CategoryTables {
    let mut tables = CategoryTables::new();

    for player in record.players() {
        for (key, fields) in &player.stats {
            let Some(category) = StatCategory::from_key(key) else {
                debug!("Skipping unknown stat category '{}'", key);
                continue;
            };

            let excluded = category.excluded_fields();
            let row: Vec<(&str, Option<f64>)> = fields
                .iter()
                .filter(|(name, _)| !excluded.contains(&name.as_str()))
                .filter_map(|(name, value)| stat_value(value).map(|v| (name.as_str(), v)))
                .collect();

            if row.is_empty() {
                debug!("Skipping '{}' entry with no numeric fields", key);
                continue;
            }
            tables.table_mut(category).push_row(row);
        }
    }

    tables
}

/// Numeric reading of a stat field.
///
/// `None` means the field is not a statistic (strings, arrays, objects);
/// `Some(None)` is a reported but empty value.
fn stat_value(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Number(n) => Some(n.as_f64()),
        Value::Bool(b) => Some(Some(if *b { 1.0 } else { 0.0 })),
        Value::Null => Some(None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiTier;
    use crate::sync::provider::mock::{record_with, MockProvider};
    use serde_json::json;

    #[test]
    fn test_core_drops_mvp() {
        let record = record_with(&[
            (
                "blue",
                json!({
                    "core": {"score": 100, "goals": 1, "mvp": true},
                    "boost": {"bpm": 400.5}
                }),
            ),
            ("orange", json!({"core": {"score": 50, "goals": 0, "mvp": false}})),
        ]);

        let tables = tables_from_record(&record);
        let core = tables.get(StatCategory::Core).unwrap();

        assert_eq!(core.row_count(), 2);
        assert!(!core.columns().iter().any(|c| c == "mvp"));
        assert_eq!(tables.get(StatCategory::Boost).unwrap().row_count(), 1);
    }

    #[test]
    fn test_mvp_kept_outside_core() {
        let record = record_with(&[("blue", json!({"demo": {"inflicted": 2, "mvp": 1}}))]);

        let tables = tables_from_record(&record);
        let demo = tables.get(StatCategory::Demo).unwrap();

        assert!(demo.columns().iter().any(|c| c == "mvp"));
    }

    #[test]
    fn test_rows_follow_roster_order() {
        let record = record_with(&[
            ("orange", json!({"core": {"score": 50}})),
            ("blue", json!({"core": {"score": 100}})),
        ]);

        let tables = tables_from_record(&record);
        let core = tables.get(StatCategory::Core).unwrap();

        assert_eq!(core.column_values(0).collect::<Vec<_>>(), vec![100.0, 50.0]);
    }

    #[test]
    fn test_value_kinds() {
        let record = record_with(&[(
            "blue",
            json!({"positioning": {
                "time_behind_ball": 120.5,
                "goals_against_while_last_defender": null,
                "label": "text",
                "in_front": false
            }}),
        )]);

        let tables = tables_from_record(&record);
        let table = tables.get(StatCategory::Positioning).unwrap();
        let col = |name: &str| table.column(name).unwrap();

        assert_eq!(table.columns().len(), 3);
        assert!(table.column("label").is_none());
        assert_eq!(table.cell(0, col("goals_against_while_last_defender")), None);
        assert_eq!(table.cell(0, col("in_front")), Some(0.0));
        assert_eq!(table.cell(0, col("time_behind_ball")), Some(120.5));
    }

    #[test]
    fn test_entry_without_numeric_fields_skipped() {
        let record = record_with(&[
            ("blue", json!({"core": {"mvp": true, "label": "x"}})),
            ("orange", json!({"core": {"score": 50, "mvp": false}})),
        ]);

        let tables = tables_from_record(&record);
        let core = tables.get(StatCategory::Core).unwrap();

        assert_eq!(core.row_count(), 1);
        assert_eq!(core.column_values(0).collect::<Vec<_>>(), vec![50.0]);
    }

    #[test]
    fn test_unknown_category_skipped() {
        let record = record_with(&[("blue", json!({"ball": {"possession_time": 10}}))]);

        let tables = tables_from_record(&record);

        assert_eq!(tables.total_rows(), 0);
    }

    #[tokio::test]
    async fn test_extract_replay_fetches_detail() {
        let provider = MockProvider::new(ApiTier::Regular).with_record(
            "r1",
            record_with(&[("blue", json!({"core": {"score": 10, "mvp": false}}))]),
        );

        let tables = extract_replay(&provider, &ReplayId::from("r1"))
            .await
            .unwrap();

        assert_eq!(tables.get(StatCategory::Core).unwrap().row_count(), 1);
    }

    #[tokio::test]
    async fn test_extract_replay_propagates_status() {
        let provider = MockProvider::new(ApiTier::Regular);

        let result = extract_replay(&provider, &ReplayId::from("missing")).await;

        assert!(matches!(
            result,
            Err(FetchError::HttpStatus { status: 404, .. })
        ));
    }
}
