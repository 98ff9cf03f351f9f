//! Usage data normalization.
//!
//! Turns a raw `{x, y}` series into `{start, end, data}` with epoch-ms
//! timestamps. Normalization changes representation, never content: `data`
//! has the same length and order as the input and values pass through as-is.

use crate::error::{UpstashError, UpstashResult};
use crate::models::{CommandCount, CommandSeries, NormalizedSeries, RawPoint};

/// Normalize one series.
///
/// `end` is the last point's timestamp when its value is known, otherwise the
/// second-to-last point's timestamp. A single point with a null value has no
/// known end and yields `end: None`. An empty series is an error.
pub fn normalize_series(metric: &str, points: &[RawPoint]) -> UpstashResult<NormalizedSeries> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(UpstashError::empty_series(metric)),
    };

    let data = points
        .iter()
        .map(|p| Ok((p.x.to_epoch_millis()?, p.y.clone())))
        .collect::<UpstashResult<Vec<_>>>()?;

    let start = first.x.to_epoch_millis()?;
    let end = if last.y.is_some() {
        Some(data[data.len() - 1].0)
    } else if data.len() >= 2 {
        Some(data[data.len() - 2].0)
    } else {
        None
    };

    Ok(NormalizedSeries { start, end, data })
}

/// Normalize every per-command series, keeping provider order.
pub fn normalize_command_counts(counts: &[CommandCount]) -> UpstashResult<Vec<CommandSeries>> {
    counts
        .iter()
        .map(|c| {
            Ok(CommandSeries {
                command: c.metric_identifier.clone(),
                series: normalize_series(&c.metric_identifier, &c.data_points)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn points(value: Value) -> Vec<RawPoint> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_all_known_values() {
        let series = normalize_series(
            "keyspace",
            &points(json!([{"x": 10, "y": 1}, {"x": 20, "y": 2}, {"x": 30, "y": 3}])),
        )
        .unwrap();
        assert_eq!(series.start, 10);
        assert_eq!(series.end, Some(30));
        assert_eq!(series.data.len(), 3);
    }

    #[test]
    fn test_null_tail_falls_back_to_second_to_last() {
        let series = normalize_series(
            "throughput",
            &points(json!([{"x": 1, "y": 5}, {"x": 2, "y": 7}, {"x": 3, "y": null}])),
        )
        .unwrap();
        assert_eq!(series.start, 1);
        assert_eq!(series.end, Some(2));
        assert_eq!(
            serde_json::to_value(&series).unwrap(),
            json!({"start": 1, "end": 2, "data": [[1, 5], [2, 7], [3, null]]})
        );
    }

    #[test]
    fn test_values_pass_through_unchanged() {
        let series = normalize_series(
            "read_latency_mean",
            &points(json!([{"x": 1, "y": 0.25}, {"x": 2, "y": 12}])),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&series.data).unwrap(),
            json!([[1, 0.25], [2, 12]])
        );
    }

    #[test]
    fn test_text_timestamps_converted_consistently() {
        let series = normalize_series(
            "diskusage",
            &points(json!([
                {"x": "2024-06-03 13:40:00.000 +0000 UTC", "y": 100},
                {"x": "2024-06-03 13:50:00.000 +0000 UTC", "y": null}
            ])),
        )
        .unwrap();
        assert_eq!(series.start, 1_717_422_000_000);
        assert_eq!(series.end, Some(1_717_422_000_000));
        assert_eq!(series.data[1].0, 1_717_422_600_000);
    }

    #[test]
    fn test_single_point() {
        let series = normalize_series("keyspace", &points(json!([{"x": 5, "y": 1}]))).unwrap();
        assert_eq!(series.start, 5);
        assert_eq!(series.end, Some(5));
    }

    #[test]
    fn test_single_null_point_has_no_end() {
        let series = normalize_series("keyspace", &points(json!([{"x": 5, "y": null}]))).unwrap();
        assert_eq!(series.start, 5);
        assert_eq!(series.end, None);
        assert_eq!(serde_json::to_value(&series).unwrap()["end"], Value::Null);
    }

    #[test]
    fn test_empty_series_is_error() {
        let err = normalize_series("keyspace", &[]).unwrap_err();
        assert!(matches!(err, UpstashError::EmptySeries { ref metric } if metric == "keyspace"));
    }

    #[test]
    fn test_bad_timestamp_is_error() {
        let err = normalize_series("keyspace", &points(json!([{"x": "soon", "y": 1}]))).unwrap_err();
        assert!(matches!(err, UpstashError::InvalidResponse { .. }));
    }

    #[test]
    fn test_command_counts_labelled_per_command() {
        let counts: Vec<CommandCount> = serde_json::from_value(json!([
            {"metric_identifier": "GET", "data_points": [{"x": 1, "y": 4}, {"x": 2, "y": null}]},
            {"metric_identifier": "SET", "data_points": [{"x": 1, "y": 1}, {"x": 2, "y": 2}]}
        ]))
        .unwrap();

        let normalized = normalize_command_counts(&counts).unwrap();
        assert_eq!(normalized.len(), 2);
        assert_eq!(
            serde_json::to_value(&normalized[0]).unwrap(),
            json!({"command": "GET", "start": 1, "end": 1, "data": [[1, 4], [2, null]]})
        );
        assert_eq!(normalized[1].command, "SET");
        assert_eq!(normalized[1].series.end, Some(2));
    }

    #[test]
    fn test_command_with_empty_series_is_error() {
        let counts: Vec<CommandCount> = serde_json::from_value(json!([
            {"metric_identifier": "DEL", "data_points": []}
        ]))
        .unwrap();
        let err = normalize_command_counts(&counts).unwrap_err();
        assert!(err.to_string().contains("DEL"));
    }
}
