//! 替换流程集成测试
//!
//! 测试场景：
//! - 从文件加载引用表并替换文本
//! - 前缀规则、访问器包装及其逆操作
//! - 单词边界与重复ID的处理
//! - 未加载引用表、读取失败时的行为

use std::path::Path;
use tempfile::TempDir;

use obj_ref_replacer::io::{DefaultTableReader, DefaultTextReader, DefaultTextWriter, TextReader, TextWriter};
use obj_ref_replacer::{
    parse_table, remove_accessor, substitute, RefError, ReferenceRecord, ReferenceTable, Session,
    SubstituteOptions,
};

const REFERENCE_CSV: &str = "\
Object References (exported)
OBJ_ID,OBJ_TYPE,OBJ_REF
100,Fields,id.cf.amount
200,Trackor Tree,id.rel.parent
300,Trackor Types,id.project
400,Validation Tables,project.vt.status
500,Rules,id.rule.check

";

const SQL: &str = "\
select 100, 200
  from 300
 where status = 400
   and rule = 500
   and qty > 1000";

/// 在临时目录中写入引用表
fn write_reference_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("refs.csv");
    std::fs::write(&path, REFERENCE_CSV).unwrap();
    path
}

#[test]
fn test_parse_reference_file() {
    let table = parse_table(REFERENCE_CSV);
    assert_eq!(table.len(), 5);
    assert_eq!(table.records()[3], ReferenceRecord::new("400", "Validation Tables", "project.vt.status"));
}

#[test]
fn test_full_substitution_with_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let table_path = write_reference_file(&temp_dir);

    let mut session = Session::default();
    session.load_table_from(&DefaultTableReader, &table_path).unwrap();
    session.set_text(SQL);

    let report = session.substitute(&SubstituteOptions::new(true, " XY ")).unwrap();

    let expected = "\
select id.get('id.xy_cf.xy_amount'), id.get('id.xy_rel.xy_parent')
  from id.get('id.xy_project')
 where status = id.get('project.vt.xy_status')
   and rule = id.get('id.rule.check')
   and qty > 1000";
    assert_eq!(session.text(), expected);
    assert_eq!(report.applied.len(), 5);
    assert_eq!(report.unresolved, vec!["1000".to_string()]);
}

#[test]
fn test_documented_substitutions() {
    let table = ReferenceTable::from_records(vec![ReferenceRecord::new("100", "Fields", "id.cf.amount")]);

    let wrapped = substitute("select 100 from t", Some(&table), &SubstituteOptions::new(true, "ab")).unwrap();
    assert_eq!(wrapped, "select id.get('id.ab_cf.ab_amount') from t");

    let bare = substitute("select 100 from t", Some(&table), &SubstituteOptions::new(false, "")).unwrap();
    assert_eq!(bare, "select id.cf.amount from t");

    let untouched = substitute("select 1000 from t", Some(&table), &SubstituteOptions::default()).unwrap();
    assert_eq!(untouched, "select 1000 from t");
}

#[test]
fn test_duplicate_ids_only_first_applies() {
    let table = parse_table("title\nOBJ_ID,OBJ_TYPE,OBJ_REF\n5,,first\n5,,second\n");
    let result = substitute("x 5 y", Some(&table), &SubstituteOptions::new(false, "")).unwrap();
    assert_eq!(result, "x first y");
}

#[test]
fn test_wrap_unwrap_round_trip() {
    let table = parse_table(REFERENCE_CSV);

    let wrapped = substitute(SQL, Some(&table), &SubstituteOptions::new(true, "")).unwrap();
    let bare = substitute(SQL, Some(&table), &SubstituteOptions::new(false, "")).unwrap();

    let unwrapped = remove_accessor(&wrapped);
    assert_eq!(unwrapped, bare);
    assert_eq!(remove_accessor(&unwrapped), unwrapped);
}

#[test]
fn test_missing_table_leaves_text_unchanged() {
    let mut session = Session::default();
    session.set_text(SQL);

    let result = session.substitute(&SubstituteOptions::default());
    assert!(matches!(result, Err(RefError::MissingReferenceTable)));
    assert_eq!(session.text(), SQL);

    // 空表同样视为未加载
    session.load_table_text("only a title line");
    assert!(matches!(
        session.substitute(&SubstituteOptions::default()),
        Err(RefError::MissingReferenceTable)
    ));
    assert_eq!(session.text(), SQL);
}

#[test]
fn test_failed_reload_keeps_table() {
    let temp_dir = TempDir::new().unwrap();
    let table_path = write_reference_file(&temp_dir);

    let mut session = Session::default();
    session.load_table_from(&DefaultTableReader, &table_path).unwrap();

    let missing = temp_dir.path().join("missing.csv");
    assert!(session.load_table_from(&DefaultTableReader, &missing).is_err());
    assert_eq!(session.table().unwrap().len(), 5);
    assert_eq!(session.table_source(), Some(table_path.as_path()));
}

#[test]
fn test_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let table_path = write_reference_file(&temp_dir);
    let input_path = temp_dir.path().join("query.sql");
    let output_path = temp_dir.path().join("out").join("query.sql");
    std::fs::write(&input_path, "select 100 from dual").unwrap();

    let mut session = Session::default();
    session.load_table_from(&DefaultTableReader, &table_path).unwrap();
    session.set_text(DefaultTextReader.read_text(&input_path).unwrap());
    session.substitute(&SubstituteOptions::new(false, "")).unwrap();
    DefaultTextWriter.write_text(&session.text(), &output_path).unwrap();

    assert_eq!(
        std::fs::read_to_string(Path::new(&output_path)).unwrap(),
        "select id.cf.amount from dual"
    );
}

#[test]
fn test_semicolon_file_with_bom() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("refs.csv");
    let mut data = vec![0xEF, 0xBB, 0xBF];
    data.extend_from_slice("title\r\nOBJ_ID;OBJ_TYPE;OBJ_REF\r\n7;Fields;id.cf.seven\r\n".as_bytes());
    std::fs::write(&path, data).unwrap();

    let settings = obj_ref_replacer::Settings {
        delimiter: ';',
        ..Default::default()
    };
    let mut session = Session::from_settings(&settings);
    assert_eq!(session.load_table_from(&DefaultTableReader, &path).unwrap(), 1);

    session.set_text("select 7 from t");
    session.substitute(&settings.substitute_options()).unwrap();
    assert_eq!(session.text(), "select id.get('id.cf.seven') from t");
}
