use std::fs;

use furigana_align::{Layout, LoadError, Ruby};

const FURIGANA: &str = "漢\tかん\n字\tじ\tあざ\n食\tた.べる\tショク\n物\tもの\n怪\tけ\n";
const JUKUJIKUN: &str = "下手\tへた\n今日\tきょう\tこんにち\n";

fn tables() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("furigana.tsv"), FURIGANA).expect("write furigana");
    fs::write(dir.path().join("jukujikun.tsv"), JUKUJIKUN).expect("write jukujikun");
    dir
}

#[test]
fn loads_tsv_tables() {
    let dir = tables();
    let mut ruby = Ruby::new();
    assert_eq!(ruby.load_furigana(dir.path().join("furigana.tsv")).unwrap(), 5);
    assert_eq!(ruby.load_jukujikun(dir.path().join("jukujikun.tsv")).unwrap(), 2);
    assert_eq!(ruby.dictionary().len(), 5);
    assert_eq!(ruby.jukujikun().len(), 3);

    let furigana = ruby.split("今日の漢字", "きょうのかんじ").unwrap();
    println!("{furigana:?}");
    assert_eq!(
        furigana.pairs(),
        vec![("今日", "きょう"), ("の", "の"), ("漢", "かん"), ("字", "じ")]
    );
    assert_eq!(
        ruby.to_html5("物の怪", "もののけ", Layout::Ungrouped),
        "<ruby>物<rt>もの</ruby>の<ruby>怪<rt>け</ruby>"
    );
}

#[test]
fn loads_json_tables() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(
        dir.path().join("furigana.json"),
        r#"{"食": {"た": "べる", "しょく": ""}, "事": {"じ": ""}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("jukujikun.json"), r#"{"下手": ["へた"]}"#).unwrap();

    let ruby = Ruby::from_dir(dir.path()).unwrap();
    assert_eq!(ruby.dictionary().longest_reading_length("食"), 3);
    assert_eq!(
        ruby.to_html5("食事", "しょくじ", Layout::Grouped),
        "<ruby>食<rb>事<rt>しょく<rt>じ</ruby>"
    );
    assert_eq!(
        ruby.to_html5("下手", "へた", Layout::Grouped),
        "<ruby>下手<rt>へた</ruby>"
    );
}

#[test]
fn missing_table_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut ruby = Ruby::new();
    let err = ruby.load_furigana(dir.path().join("missing.tsv")).unwrap_err();
    println!("{err}");
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("missing.tsv"));

    assert!(matches!(
        Ruby::from_dir(dir.path()).unwrap_err(),
        LoadError::Io { .. }
    ));
}

#[test]
fn permissive_mode_keeps_leftover_kanji() {
    let dir = tables();
    let mut ruby = Ruby::new().explicit(false);
    ruby.load_furigana(dir.path().join("furigana.tsv")).unwrap();
    let furigana = ruby.split("猫漢字", "かんじ").unwrap();
    assert_eq!(furigana.text(), "猫漢字");
    assert_eq!(furigana.reading(), "かんじ");
    assert_eq!(
        furigana.to_string(),
        "猫<ruby>漢<rt>かん</ruby><ruby>字<rt>じ</ruby>"
    );
}
