//! Integration test: config load, CSV ingest, analysis summaries, snapshot store,
//! feature preprocessing and prediction with a stub classifier.

use nids_insight::{
    analysis::{analyze, AnomalyCounts, ProtocolCounts, Snapshot},
    config::{AppConfig, FeaturesConfig, ModelConfig},
    features::{FeatureMatrix, FeaturePreprocessor, Protocol},
    model::{load_classifier, predict, Classifier},
    records::{ingest, Cell, Column, Numeric, RecordSet},
    storage::{SnapshotStore, UploadInfo, ANOMALY_ALERT_MESSAGE},
    Error,
};
use std::path::Path;
use std::sync::Mutex;

const SCENARIO: &str = "protocol_type,class\ntcp,normal\nudp,dos\nxyz,normal\n";

fn na() -> Cell {
    Cell::Text("N/A".to_string())
}

#[test]
fn config_load_default() {
    let c = AppConfig::load(Path::new("nonexistent.json")).unwrap();
    assert_eq!(c.server.bind, "127.0.0.1:5000");
    assert!(c.features.require_protocol_column);
    assert_eq!(c.model.class_labels, vec!["anomaly", "normal"]);
}

#[test]
fn config_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"server": {"bind": "0.0.0.0:8080"}, "log": {"json": false}}"#).unwrap();
    let c = AppConfig::load(&path).unwrap();
    assert_eq!(c.server.bind, "0.0.0.0:8080");
    assert_eq!(c.server.max_upload_bytes, 64 * 1024 * 1024);
    assert!(!c.log.json);
    assert_eq!(c.log.level, "info");
}

#[test]
fn config_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(AppConfig::load(&path), Err(Error::Config(_))));
}

#[test]
fn scenario_counts_and_detail_rows() {
    let snapshot = analyze(ingest(SCENARIO.as_bytes()).unwrap());

    assert_eq!(
        snapshot.protocol_counts,
        ProtocolCounts { tcp: 1, udp: 1, icmp: 0 }
    );
    assert_eq!(
        snapshot.anomaly_data,
        AnomalyCounts { normal: 2, abnormal: 1 }
    );
    assert_eq!(snapshot.detailed_anomaly_data.len(), 1);
    let row = &snapshot.detailed_anomaly_data[0];
    assert_eq!(row.anomaly_type, na());
    assert_eq!(row.origin_country, na());
    assert_eq!(row.latitude, na());
    assert_eq!(row.longitude, na());
    assert_eq!(row.severity_level, na());

    let zeros = vec![Numeric::Int(0); 3];
    assert_eq!(snapshot.additional_metrics.duration, zeros);
    assert_eq!(snapshot.additional_metrics.src_bytes, zeros);
    assert_eq!(snapshot.additional_metrics.dst_bytes, zeros);
}

#[test]
fn detail_rows_serialize_with_source_field_names() {
    let snapshot = analyze(ingest(SCENARIO.as_bytes()).unwrap());
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(
        json["detailed_anomaly_data"][0],
        serde_json::json!({
            "Anomaly Type": "N/A",
            "Origin Country": "N/A",
            "Latitude": "N/A",
            "Longitude": "N/A",
            "Severity Level": "N/A"
        })
    );
    assert_eq!(json["protocol_counts"], serde_json::json!({"TCP": 1, "UDP": 1, "ICMP": 0}));
}

#[test]
fn missing_label_column_means_no_anomalies() {
    let csv = "protocol_type,duration\ntcp,1\nudp,2\nicmp,3\nTCP,4\n";
    let records = ingest(csv.as_bytes()).unwrap();
    assert_eq!(records.defaulted(), &[Column::Class]);

    let snapshot = analyze(records);
    assert_eq!(
        snapshot.anomaly_data,
        AnomalyCounts { normal: 4, abnormal: 0 }
    );
    assert!(snapshot.detailed_anomaly_data.is_empty());
}

#[test]
fn protocol_counts_are_case_insensitive_and_skip_unknowns() {
    let csv = "protocol_type\nTCP\ntcp\nTcp\nicmp\nUDP\nftp\n\n";
    let records = ingest(csv.as_bytes()).unwrap();
    let n = records.len() as u64;
    let snapshot = analyze(records);
    assert_eq!(
        snapshot.protocol_counts,
        ProtocolCounts { tcp: 3, udp: 1, icmp: 1 }
    );
    assert!(snapshot.protocol_counts.total() < n);
}

#[test]
fn missing_protocol_column_counts_nothing() {
    let snapshot = analyze(ingest(b"class\nnormal\nneptune\n").unwrap());
    assert_eq!(snapshot.protocol_counts, ProtocolCounts::default());
    assert_eq!(snapshot.anomaly_data.abnormal, 1);
}

#[test]
fn labels_compare_exactly() {
    let csv = "class\nnormal\nNormal\n normal\nnormal \nsmurf\n";
    let snapshot = analyze(ingest(csv.as_bytes()).unwrap());
    assert_eq!(
        snapshot.anomaly_data,
        AnomalyCounts { normal: 1, abnormal: 4 }
    );
}

#[test]
fn metrics_pass_values_through() {
    let csv = "duration,src_bytes,dst_bytes,class\n0,181,5450,normal\n-5,1.5,0,neptune\n12,300,1e3,normal\n";
    let snapshot = analyze(ingest(csv.as_bytes()).unwrap());
    let metrics = &snapshot.additional_metrics;
    assert_eq!(
        metrics.duration,
        vec![Numeric::Int(0), Numeric::Int(-5), Numeric::Int(12)]
    );
    assert_eq!(
        metrics.src_bytes,
        vec![Numeric::Int(181), Numeric::Float(1.5), Numeric::Int(300)]
    );
    assert_eq!(
        serde_json::to_string(&metrics.dst_bytes).unwrap(),
        "[5450,0,1000.0]"
    );
}

#[test]
fn partially_present_metric_columns() {
    let csv = "src_bytes,class\n10,normal\n20,normal\n";
    let snapshot = analyze(ingest(csv.as_bytes()).unwrap());
    let metrics = &snapshot.additional_metrics;
    assert_eq!(metrics.src_bytes, vec![Numeric::Int(10), Numeric::Int(20)]);
    assert_eq!(metrics.duration, vec![Numeric::Int(0); 2]);
    assert_eq!(metrics.dst_bytes, vec![Numeric::Int(0); 2]);
}

#[test]
fn detail_rows_project_present_columns_in_order() {
    let csv = "\
class,Anomaly Type,Origin Country,Latitude,Longitude,extra
normal,None,Germany,52.52,13.40,x
neptune,DoS,China,39.90,116.40,y
normal,None,France,48.85,2.35,z
satan,Probe,Brazil,-15.79,-47.88,w
";
    let snapshot = analyze(ingest(csv.as_bytes()).unwrap());
    let rows = &snapshot.detailed_anomaly_data;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].anomaly_type, Cell::Text("DoS".to_string()));
    assert_eq!(rows[0].origin_country, Cell::Text("China".to_string()));
    assert_eq!(rows[0].latitude, Cell::Number(Numeric::Float(39.90)));
    assert_eq!(rows[0].severity_level, na());
    assert_eq!(rows[1].anomaly_type, Cell::Text("Probe".to_string()));
    assert_eq!(rows[1].longitude, Cell::Number(Numeric::Float(-47.88)));
    assert_eq!(rows[1].severity_level, na());
}

#[test]
fn summary_invariants_hold() {
    let inputs = [
        "protocol_type,class,duration\n",
        SCENARIO,
        "protocol_type,class\nicmp,normal\nICMP,teardrop\nudp,normal\n",
        "protocol_type\ntcp\n\nudp\n",
        "duration\n1\n2\n3\n4\n5\n",
    ];
    for csv in inputs {
        let records = ingest(csv.as_bytes()).unwrap();
        let n = records.len();
        let snapshot = analyze(records);
        assert!(snapshot.protocol_counts.total() <= n as u64, "{csv}");
        assert_eq!(
            snapshot.anomaly_data.normal + snapshot.anomaly_data.abnormal,
            n as u64,
            "{csv}"
        );
        assert_eq!(snapshot.additional_metrics.duration.len(), n);
        assert_eq!(snapshot.additional_metrics.src_bytes.len(), n);
        assert_eq!(snapshot.additional_metrics.dst_bytes.len(), n);
        assert_eq!(
            snapshot.detailed_anomaly_data.len() as u64,
            snapshot.anomaly_data.abnormal
        );
    }
}

#[test]
fn analysis_is_idempotent() {
    let csv = "protocol_type,class,duration,src_bytes,dst_bytes,Origin Country\n\
               tcp,normal,0,491,0,US\nudp,back,2,146,0,CN\nicmp,normal,0.25,0,0,\n";
    let first = serde_json::to_vec(&analyze(ingest(csv.as_bytes()).unwrap())).unwrap();
    let second = serde_json::to_vec(&analyze(ingest(csv.as_bytes()).unwrap())).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parse_errors() {
    assert!(matches!(ingest(b""), Err(Error::Parse(_))));
    assert!(matches!(ingest(b"a,b\n1,2\n3\n"), Err(Error::Parse(_))));
    assert!(matches!(
        ingest(b"protocol_type\ntcp\n\xff\xfe\n"),
        Err(Error::Parse(_))
    ));

    match ingest(b"protocol_type,duration\ntcp,1\nudp,abc\n") {
        Err(Error::Parse(msg)) => {
            assert!(msg.contains("duration"), "{msg}");
            assert!(msg.contains("abc"), "{msg}");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
    assert!(matches!(ingest(b"src_bytes,class\n,normal\n"), Err(Error::Parse(_))));
}

#[test]
fn header_only_input_is_empty() {
    let snapshot = analyze(ingest(b"protocol_type,class\n").unwrap());
    assert_eq!(snapshot, Snapshot::empty());
}

#[test]
fn store_starts_empty_and_replaces_whole_snapshot() {
    let store = SnapshotStore::new();
    assert_eq!(*store.current(), Snapshot::empty());
    assert!(store.last_upload().is_none());

    let records = ingest(SCENARIO.as_bytes()).unwrap();
    let info = UploadInfo::new("scenario.csv", SCENARIO.as_bytes(), records.len());
    let installed = store.process_upload(records, Some(info));
    assert_eq!(installed.anomaly_data.abnormal, 1);
    assert_eq!(*store.current(), *installed);

    let upload = store.last_upload().unwrap();
    assert_eq!(upload.file_name, "scenario.csv");
    assert_eq!(upload.records, 3);
    assert_eq!(upload.sha256.len(), 64);

    let second = ingest(b"protocol_type\nicmp\n").unwrap();
    store.process_upload(second, None);
    let current = store.current();
    assert_eq!(current.protocol_counts, ProtocolCounts { tcp: 0, udp: 0, icmp: 1 });
    assert!(current.detailed_anomaly_data.is_empty());
    assert!(store.last_upload().is_none());
}

#[test]
fn store_alerts_once_per_upload_with_anomalies() {
    let store = SnapshotStore::new();
    let mut alerts = store.subscribe_alerts();

    let records = ingest(SCENARIO.as_bytes()).unwrap();
    let info = UploadInfo::new("scenario.csv", SCENARIO.as_bytes(), records.len());
    let upload_id = info.id.clone();
    store.process_upload(records, Some(info));

    let alert = alerts.try_recv().unwrap();
    assert_eq!(alert.message, ANOMALY_ALERT_MESSAGE);
    assert_eq!(alert.severity, "error");
    assert_eq!(alert.abnormal, 1);
    assert_eq!(alert.records, 3);
    assert_eq!(alert.upload_id, Some(upload_id));
    assert!(alerts.try_recv().is_err());

    let clean = ingest(b"protocol_type,class\ntcp,normal\n").unwrap();
    store.process_upload(clean, None);
    assert!(alerts.try_recv().is_err());
}

#[test]
fn protocol_normalization() {
    assert_eq!(Protocol::normalize("FTP"), Protocol::Other);
    assert_eq!(Protocol::normalize("TCP"), Protocol::Tcp);
    assert_eq!(Protocol::normalize("Udp"), Protocol::Udp);
    assert_eq!(Protocol::normalize(""), Protocol::Other);
    assert_eq!(Protocol::Other.as_str(), "other");
}

#[test]
fn preprocessor_rewrites_protocol_column() {
    let mut records = RecordSet::from_reader("protocol_type\nTCP\nFTP\nicmp\n".as_bytes()).unwrap();
    let pre = FeaturePreprocessor::new(FeaturesConfig::default());
    pre.normalize(&mut records).unwrap();
    assert_eq!(
        records.text(Column::ProtocolType).unwrap(),
        &["tcp".to_string(), "other".to_string(), "icmp".to_string()]
    );
    assert_eq!(
        records.defaulted(),
        &[Column::Duration, Column::SrcBytes, Column::DstBytes]
    );
}

#[test]
fn preprocessor_requires_protocol_column_by_default() {
    let mut records = RecordSet::from_reader("duration\n1\n".as_bytes()).unwrap();
    let strict = FeaturePreprocessor::new(FeaturesConfig::default());
    assert!(matches!(strict.normalize(&mut records), Err(Error::Validation(_))));

    let relaxed = FeaturePreprocessor::new(FeaturesConfig {
        require_protocol_column: false,
    });
    let vectors = relaxed.vectors(&mut records).unwrap();
    assert_eq!(vectors.len(), 1);
    assert_eq!(vectors[0].protocol_type, Protocol::Other);
    assert_eq!(vectors[0].duration, 1.0);
}

#[test]
fn feature_matrix_column_order() {
    let mut records = RecordSet::from_reader(
        "dst_bytes,protocol_type,duration,src_bytes\n30,udp,1,20\n0,weird,2.5,0\n".as_bytes(),
    )
    .unwrap();
    let matrix = FeaturePreprocessor::new(FeaturesConfig::default())
        .matrix(&mut records)
        .unwrap();
    assert_eq!((matrix.rows(), matrix.cols()), (2, 4));
    let view = matrix.view();
    assert_eq!(view.row(0).to_vec(), vec![1.0, Protocol::Udp.code(), 20.0, 30.0]);
    assert_eq!(view.row(1).to_vec(), vec![2.5, Protocol::Other.code(), 0.0, 0.0]);
}

/// Labels rows "attack" when src_bytes exceeds the threshold; remembers the last batch.
struct ByteThreshold {
    threshold: f32,
    seen: Mutex<Option<FeatureMatrix>>,
}

impl ByteThreshold {
    fn new(threshold: f32) -> Self {
        Self {
            threshold,
            seen: Mutex::new(None),
        }
    }
}

impl Classifier for ByteThreshold {
    fn predict_batch(&self, features: &FeatureMatrix) -> nids_insight::Result<Vec<String>> {
        *self.seen.lock().unwrap() = Some(features.clone());
        Ok(features
            .view()
            .rows()
            .into_iter()
            .map(|row| {
                let label = if row[2] > self.threshold { "attack" } else { "normal" };
                label.to_string()
            })
            .collect())
    }
}

struct DropsLastRow;

impl Classifier for DropsLastRow {
    fn predict_batch(&self, features: &FeatureMatrix) -> nids_insight::Result<Vec<String>> {
        Ok(vec!["normal".to_string(); features.rows().saturating_sub(1)])
    }
}

#[test]
fn predict_labels_in_record_order() {
    let records = RecordSet::from_reader(
        "protocol_type,src_bytes,duration\ntcp,10,0\nudp,5000,1\nicmp,0,0\n".as_bytes(),
    )
    .unwrap();
    let classifier = ByteThreshold::new(1000.0);
    let pre = FeaturePreprocessor::new(FeaturesConfig::default());
    let labels = predict(&classifier, &pre, records).unwrap();
    assert_eq!(labels, vec!["normal", "attack", "normal"]);
}

#[test]
fn predict_treats_missing_numeric_features_as_zero() {
    let records = RecordSet::from_reader("protocol_type\ntcp\nFTP\n".as_bytes()).unwrap();
    let classifier = ByteThreshold::new(-1.0);
    let pre = FeaturePreprocessor::new(FeaturesConfig::default());
    let labels = predict(&classifier, &pre, records).unwrap();
    assert_eq!(labels, vec!["attack", "attack"]);

    let seen = classifier.seen.lock().unwrap().clone().unwrap();
    let view = seen.view();
    assert_eq!(view.row(0).to_vec(), vec![0.0, Protocol::Tcp.code(), 0.0, 0.0]);
    assert_eq!(view.row(1).to_vec(), vec![0.0, Protocol::Other.code(), 0.0, 0.0]);
}

#[test]
fn predict_without_protocol_column_fails_validation() {
    let records = RecordSet::from_reader("duration,src_bytes\n1,2\n".as_bytes()).unwrap();
    let pre = FeaturePreprocessor::new(FeaturesConfig::default());
    let result = predict(&ByteThreshold::new(0.0), &pre, records);
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn predict_rejects_short_output() {
    let records = RecordSet::from_reader("protocol_type\ntcp\nudp\n".as_bytes()).unwrap();
    let pre = FeaturePreprocessor::new(FeaturesConfig::default());
    let result = predict(&DropsLastRow, &pre, records);
    assert!(matches!(result, Err(Error::Inference(_))));
}

#[test]
fn load_classifier_missing_model() {
    let config = ModelConfig {
        path: "nonexistent.onnx".into(),
        ..ModelConfig::default()
    };
    assert!(matches!(load_classifier(&config), Err(Error::ModelLoad(_))));
}

#[test]
fn load_classifier_empty_model_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.onnx");
    std::fs::write(&path, b"").unwrap();
    let config = ModelConfig {
        path,
        ..ModelConfig::default()
    };
    assert!(matches!(load_classifier(&config), Err(Error::ModelLoad(_))));
}

#[test]
fn load_classifier_corrupt_model_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.onnx");
    std::fs::write(&path, b"definitely not an onnx protobuf").unwrap();
    let config = ModelConfig {
        path,
        ..ModelConfig::default()
    };
    let result = std::panic::catch_unwind(|| load_classifier(&config));
    assert!(matches!(result, Ok(Err(Error::ModelLoad(_)))));
}
