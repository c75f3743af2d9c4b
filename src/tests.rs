use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rusqlite::Connection;

use crate::domain::entities::analysis::{AnalysisOutcome, ChartImagePaths};
use crate::domain::entities::edit::EditState;
use crate::infra::http::analysis_client::{encode_payload, AnalysisClient};
use crate::infra::import::csv::{parse_table, sample_table};
use crate::infra::sqlite::queries::{delete_values, get_value, put_values};
use crate::infra::sqlite::repo::{SqliteHandoffStore, ANALYSIS_MESSAGE_KEY, CHART_IMAGE_URLS_KEY};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::prompt::ConfirmPrompt;
use crate::usecase::ports::repo::HandoffStore;
use crate::usecase::services::analysis_service::AnalysisService;
use crate::usecase::services::edit_service::{EditError, SubmitBlocked, TableEditor};
use crate::usecase::services::import_service::load_table_from_bytes;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("oraculo-{prefix}-{nanos}"))
}

fn outcome(message: &str) -> AnalysisOutcome {
    AnalysisOutcome {
        image_paths: ChartImagePaths {
            decomposicao: "/images/decomposicao.png".to_string(),
            acf_pacf: "/images/acf_pacf.png".to_string(),
            predicao: "/images/predicao.png".to_string(),
        },
        message: message.to_string(),
    }
}

struct AlwaysYes;

impl ConfirmPrompt for AlwaysYes {
    fn confirm(&self, _title: &str, _description: &str) -> bool {
        true
    }
}

#[test]
fn init_db_creates_handoff_table() {
    let temp_dir = unique_test_dir("init-db");
    let db_path = temp_dir.join("nested").join("app.sqlite");

    let result = init_db(&db_path);

    assert!(result.is_ok(), "init_db should succeed: {result:?}");
    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'handoff'",
            [],
            |row| row.get(0),
        )
        .expect("table count query should succeed");
    assert_eq!(table_count, 1);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn put_values_overwrites_existing_keys() {
    let temp_dir = unique_test_dir("put-values");
    let db_path = temp_dir.join("app.sqlite");
    init_db(&db_path).expect("init_db should succeed");

    put_values(&db_path, &[("a", "1"), ("b", "2")]).expect("first write");
    put_values(&db_path, &[("a", "3")]).expect("second write");

    assert_eq!(get_value(&db_path, "a").expect("read a"), Some("3".to_string()));
    assert_eq!(get_value(&db_path, "b").expect("read b"), Some("2".to_string()));

    delete_values(&db_path, &["a"]).expect("delete a");
    assert_eq!(get_value(&db_path, "a").expect("read a"), None);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn handoff_store_is_empty_before_first_save() {
    let temp_dir = unique_test_dir("handoff-empty");
    let store = SqliteHandoffStore {
        db_path: temp_dir.join("app.sqlite"),
    };

    store.init().expect("init should succeed");

    assert_eq!(store.load_result().expect("load should succeed"), None);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn handoff_store_returns_last_saved_result() {
    let temp_dir = unique_test_dir("handoff-roundtrip");
    let store = SqliteHandoffStore {
        db_path: temp_dir.join("app.sqlite"),
    };

    store.save_result(&outcome("Primeira")).expect("first save");
    store.save_result(&outcome("Segunda")).expect("second save");

    let loaded = store
        .load_result()
        .expect("load should succeed")
        .expect("result should exist");
    assert_eq!(loaded, outcome("Segunda"));

    let raw = get_value(&store.db_path, CHART_IMAGE_URLS_KEY)
        .expect("read raw urls")
        .expect("urls should be stored");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("stored urls should be json");
    assert_eq!(json["predicao"], "/images/predicao.png");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn handoff_store_defaults_missing_message() {
    let temp_dir = unique_test_dir("handoff-message");
    let store = SqliteHandoffStore {
        db_path: temp_dir.join("app.sqlite"),
    };
    store.save_result(&outcome("Pronto")).expect("save");
    delete_values(&store.db_path, &[ANALYSIS_MESSAGE_KEY]).expect("drop message");

    let loaded = store.load_result().expect("load").expect("result should exist");

    assert_eq!(loaded.message, "Análise concluída.");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn handoff_store_clear_removes_result() {
    let temp_dir = unique_test_dir("handoff-clear");
    let store = SqliteHandoffStore {
        db_path: temp_dir.join("app.sqlite"),
    };
    store.save_result(&outcome("Pronto")).expect("save");

    store.clear().expect("clear should succeed");

    assert_eq!(store.load_result().expect("load"), None);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn handoff_store_rejects_corrupted_urls() {
    let temp_dir = unique_test_dir("handoff-corrupt");
    let store = SqliteHandoffStore {
        db_path: temp_dir.join("app.sqlite"),
    };
    store.init().expect("init");
    put_values(&store.db_path, &[(CHART_IMAGE_URLS_KEY, "{not json")]).expect("write");

    let err = store.load_result().expect_err("load should fail");

    assert!(err.to_string().starts_with("URLs de gráficos salvas são inválidas"), "unexpected error: {err}");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn unreadable_stored_result_is_discarded_after_one_failed_load() {
    let temp_dir = unique_test_dir("handoff-discard");
    let db_path = temp_dir.join("app.sqlite");
    let store = SqliteHandoffStore {
        db_path: db_path.clone(),
    };
    store.init().expect("init");
    put_values(&db_path, &[(CHART_IMAGE_URLS_KEY, "{not json"), (ANALYSIS_MESSAGE_KEY, "Pronto")])
        .expect("write");
    let service = AnalysisService::new(AnalysisClient::new("http://backend:5000"), Arc::new(store));

    service.load_latest().expect_err("corrupt result should fail");

    assert_eq!(service.load_latest().expect("second load"), None);
    assert_eq!(get_value(&db_path, ANALYSIS_MESSAGE_KEY).expect("read"), None);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn imported_file_flows_through_editor_into_payload() {
    let loaded = load_table_from_bytes(
        "Semestre,Unidade,Taxa\n2019.1,Quixadá,10\n2019.2,Russas,12\n".as_bytes(),
    );
    assert!(loaded.warning.is_none());
    let mut editor = TableEditor::new(loaded.table);

    editor.toggle_campus("Russas");
    let id = editor.add_row();
    assert_eq!(editor.state(), EditState::EditingNew(id));

    let err = editor.save().expect_err("blank row should not save");
    assert!(matches!(err, EditError::Invalid(_)));
    assert_eq!(editor.confirm().unwrap_err(), SubmitBlocked::EditInProgress);

    editor.set_field(0, "2020.1".to_string()).expect("set semestre");
    editor.set_field(1, "Itapajé".to_string()).expect("set unidade");
    editor.set_field(2, "15".to_string()).expect("set taxa");
    editor.save().expect("complete row should save");

    assert_eq!(editor.available_campuses(), vec!["Itapajé", "Quixadá", "Russas"]);

    editor.set_max_semester(" 2020.1 ".to_string());
    let request = editor.confirm().expect("confirm should succeed");
    assert_eq!(request.filters, vec!["Russas"]);
    assert_eq!(request.max_semester, "2020.1");

    let payload = encode_payload(&request);
    let decoded = STANDARD
        .decode(payload.file_content.as_bytes())
        .expect("payload should be base64");
    let table = parse_table(std::str::from_utf8(&decoded).expect("utf8")).expect("csv should parse");
    assert_eq!(table.len(), 3);
    assert_eq!(table.rows()[2].values, vec!["2020.1", "Itapajé", "15"]);
}

#[test]
fn removing_last_row_of_a_campus_drops_it_from_selection() {
    let mut editor = TableEditor::new(sample_table());
    editor.select_all_campuses();
    let russas = editor
        .table()
        .rows()
        .iter()
        .find(|row| row.get(2) == "Russas")
        .map(|row| row.id)
        .expect("sample should have a Russas row");

    let removed = editor.delete_row(russas, &AlwaysYes).expect("delete should succeed");

    assert!(removed);
    assert!(!editor.selected_campuses().contains("Russas"));
    assert_eq!(editor.selected_campuses().len(), 2);
}

#[test]
fn broken_upload_falls_back_to_sample_and_stays_editable() {
    let loaded = load_table_from_bytes(&[0xff, 0xfe, 0x00]);
    assert!(loaded.warning.is_some());
    let mut editor = TableEditor::new(loaded.table);

    let first = editor.table().rows()[0].id;
    editor.begin_edit(first).expect("edit should start");
    editor.set_field(0, "Ana".to_string()).expect("set nome");
    editor.save().expect("save should succeed");

    assert_eq!(editor.table().rows()[0].get(0), "Ana");
    assert!(editor.can_confirm());
}
