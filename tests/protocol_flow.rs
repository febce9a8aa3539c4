use serde_json::{json, Value};
use ts_core::config::CoreConfig;
use ts_core::protocol;

const FIXTURE: &str = include_str!("fixtures/designer_uk.ts");

fn call(config: &CoreConfig, cmd: &str, payload: Value) -> Value {
    let req = json!({ "id": cmd, "cmd": cmd, "payload": payload });
    let resp: Value = serde_json::from_str(&protocol::handle(&req.to_string(), config)).unwrap();
    assert_eq!(resp["id"], cmd);
    resp
}

fn ok_payload(config: &CoreConfig, cmd: &str, payload: Value) -> Value {
    let resp = call(config, cmd, payload);
    assert_eq!(resp["status"], "ok", "{cmd} failed: {resp}");
    resp["payload"].clone()
}

#[test]
fn ping() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::with_home(dir.path());
    let payload = ok_payload(&config, "ping", Value::Null);
    assert_eq!(payload["message"], "ts-core alive");
}

#[test]
fn parse_edit_rebuild_via_protocol() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::with_home(dir.path());

    let parsed = ok_payload(&config, "ts.parse", json!({ "text": FIXTURE }));
    let mut catalog = parsed["catalog"].clone();
    assert_eq!(catalog["language"], "uk");
    assert_eq!(catalog["entries"][2]["status"], "unfinished");

    catalog["entries"][2]["translation"] = json!("Файл шрифту '%1' не має прав на читання.");
    catalog["entries"][2]["status"] = json!("finished");

    let rebuilt = ok_payload(&config, "ts.rebuild", json!({ "catalog": catalog }));
    let text = rebuilt["text"].as_str().unwrap();
    assert!(text.contains("<translation>Файл шрифту &apos;%1&apos; не має прав на читання.</translation>"));

    let qa = ok_payload(&config, "ts.qa", json!({ "catalog": catalog }));
    assert_eq!(qa["errors"], 0);
    assert_eq!(qa["warnings"], 0);
}

#[test]
fn parse_from_file_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::with_home(dir.path());
    let source = dir.path().join("designer_uk.ts");
    std::fs::write(&source, FIXTURE).unwrap();

    let parsed = ok_payload(&config, "ts.parse", json!({ "path": source }));
    assert_eq!(parsed["encoding"], "utf-8");

    let target = dir.path().join("out").join("designer_uk.ts");
    ok_payload(
        &config,
        "ts.save",
        json!({ "path": source, "target": target, "locations": "absolute" }),
    );
    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.contains("line=\"151\""));

    let detected = ok_payload(&config, "encoding.detect", json!({ "path": source }));
    assert_eq!(detected["declared"], "utf-8");
}

#[test]
fn stats_and_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::with_home(dir.path());

    let stats = ok_payload(&config, "ts.stats", json!({ "text": FIXTURE }));
    assert_eq!(stats["stats"]["finished"], 6);
    assert_eq!(stats["summary"][1], "Ignored 2 untranslated source text(s)");

    let broken = call(&config, "ts.parse", json!({ "text": "<TS><context>" }));
    assert_eq!(broken["status"], "error");
    assert!(broken["message"].as_str().unwrap().starts_with("parse error"));
}

#[test]
fn translation_memory_fills_unfinished_entries() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::with_home(dir.path());

    let imported = ok_payload(&config, "tm.import", json!({ "text": FIXTURE }));
    assert_eq!(imported["report"]["harvested"], 6);
    assert!(config.tm_file.exists());

    let fresh = FIXTURE
        .replace("<translation>Головна</translation>", "<translation type=\"unfinished\"></translation>")
        .replace("<name>MainWindowBase</name>", "<name>OtherWindow</name>");

    let applied = ok_payload(&config, "tm.apply", json!({ "text": fresh }));
    assert_eq!(applied["report"]["filled"], 1);
    assert_eq!(applied["catalog"]["entries"][6]["translation"], "Головна");
    assert_eq!(applied["catalog"]["entries"][6]["status"], "unfinished");
}

#[test]
fn project_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::with_home(dir.path());

    let created = ok_payload(
        &config,
        "project.create",
        json!({ "project": {
            "name": "Designer",
            "root_path": dir.path(),
            "catalog_paths": ["designer_uk.ts"],
            "source_language": "en",
            "target_language": "uk"
        }}),
    );
    let project_path = created["project_path"].as_str().unwrap().to_string();
    assert_eq!(created["project"]["encoding"], "utf-8");

    let opened = ok_payload(&config, "project.open", json!({ "project_path": project_path }));
    assert_eq!(opened["project"]["name"], "Designer");
    assert!(opened["catalog_files"][0].as_str().unwrap().ends_with("designer_uk.ts"));

    let mut project = opened["project"].clone();
    project["locations"] = json!("absolute");
    ok_payload(&config, "project.save", json!({ "project": project }));

    let listed = ok_payload(&config, "project.list", Value::Null);
    assert_eq!(listed["projects"][0]["locations"], "absolute");

    let dup = call(&config, "project.create", json!({ "project": { "name": "Designer" } }));
    assert_eq!(dup["status"], "error");
}
