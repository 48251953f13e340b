use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio_test::assert_ok;
use trending_journal::services::HistoryIndex;
use trending_journal::{
    App, Config, Extractor, HistoryScope, IdentityKey, LocaleVariant, PageRef, RawRecord,
};

/// 按列表页返回预设结果的抽取器；未预设的页面模拟超时（返回空列表）
#[derive(Clone, Default)]
struct ScriptedExtractor {
    pages: Arc<Mutex<HashMap<String, Vec<RawRecord>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExtractor {
    fn with(self, page: &str, records: Vec<RawRecord>) -> Self {
        self.pages.lock().unwrap().insert(page.to_string(), records);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn fetch(&self, page: &PageRef) -> Vec<RawRecord> {
        let key = page.to_string();
        self.calls.lock().unwrap().push(key.clone());
        self.pages.lock().unwrap().get(&key).cloned().unwrap_or_default()
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn raw(title: &str, url: &str) -> RawRecord {
    RawRecord::new(title, url, format!("{} description", title))
}

fn config_in(root: &Path, languages: &[&str]) -> Config {
    let mut default = LocaleVariant::default_locale();
    default.journal_dir = root.join("daily").to_string_lossy().to_string();
    let mut zh = LocaleVariant::chinese();
    zh.journal_dir = root.join("daily_zh").to_string_lossy().to_string();
    Config {
        languages: languages.iter().map(|s| s.to_string()).collect(),
        locales: vec![default, zh],
        ..Config::default()
    }
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

#[tokio::test]
async fn new_records_are_written_under_language_heading() {
    let root = tempfile::tempdir().unwrap();
    let extractor = ScriptedExtractor::default().with(
        "python",
        vec![
            raw("A", "https://github.com/a/a"),
            raw("B", "https://github.com/b/b"),
        ],
    );
    let app = assert_ok!(App::with_extractor(
        config_in(root.path(), &["python"]),
        Box::new(extractor)
    ));

    let stats = app.run_on(day()).await;
    assert_eq!(stats.written, 2);

    let journal = read(root.path().join("daily/2024-05-01.md"));
    assert_eq!(
        journal,
        "## Python\n\n\
         * 【2024-05-01】[A](https://github.com/a/a) - A description\n\
         * 【2024-05-01】[B](https://github.com/b/b) - B description\n\n"
    );
}

#[tokio::test]
async fn second_run_on_same_day_writes_nothing() {
    let root = tempfile::tempdir().unwrap();
    let mut config = config_in(root.path(), &["", "python"]);
    config.index_path = Some(root.path().join("README.md").to_string_lossy().to_string());
    let extractor = ScriptedExtractor::default()
        .with("all", vec![raw("X", "https://github.com/x/x")])
        .with("python", vec![raw("A", "u1"), raw("B", "u2")])
        .with("python?zh", vec![raw("Z", "u9")]);
    let app = App::with_extractor(config, Box::new(extractor)).unwrap();

    let first = app.run_on(day()).await;
    assert_eq!(first.written, 4);
    let journal = read(root.path().join("daily/2024-05-01.md"));
    let journal_zh = read(root.path().join("daily_zh/2024-05-01.md"));
    let index = read(root.path().join("README.md"));

    let second = app.run_on(day()).await;
    assert_eq!(second.written, 0);
    assert_eq!(second.indexed, 0);
    assert_eq!(read(root.path().join("daily/2024-05-01.md")), journal);
    assert_eq!(read(root.path().join("daily_zh/2024-05-01.md")), journal_zh);
    assert_eq!(read(root.path().join("README.md")), index);
}

#[tokio::test]
async fn changed_description_does_not_cause_rewrite() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path(), &["go"]);

    let first = ScriptedExtractor::default().with("go", vec![raw("A", "u1")]);
    App::with_extractor(config.clone(), Box::new(first))
        .unwrap()
        .run_on(day())
        .await;

    let changed = ScriptedExtractor::default().with(
        "go",
        vec![RawRecord::new("A renamed", "u1", "a brand new description")],
    );
    let stats = App::with_extractor(config, Box::new(changed))
        .unwrap()
        .run_on(day())
        .await;
    assert_eq!(stats.written, 0);
    assert!(!read(root.path().join("daily/2024-05-01.md")).contains("brand new"));
}

#[tokio::test]
async fn locale_scopes_are_journaled_separately() {
    let root = tempfile::tempdir().unwrap();
    let extractor = ScriptedExtractor::default()
        .with("java", vec![raw("default title", "u1")])
        .with("java?zh", vec![raw("zh title", "u1")]);
    let app = App::with_extractor(config_in(root.path(), &["java"]), Box::new(extractor)).unwrap();

    let stats = app.run_on(day()).await;
    assert_eq!(stats.written, 2);

    let journal = read(root.path().join("daily/2024-05-01.md"));
    let journal_zh = read(root.path().join("daily_zh/2024-05-01.md"));
    assert!(journal.starts_with("## Java\n\n"));
    assert!(journal.contains("[default title](u1)"));
    assert!(journal_zh.starts_with("## Java (zh)\n\n"));
    assert!(journal_zh.contains("[zh title](u1)"));
}

#[tokio::test]
async fn combined_locales_keep_first_source() {
    let root = tempfile::tempdir().unwrap();
    let mut config = config_in(root.path(), &["java"]);
    config.combine_locales = true;
    let extractor = ScriptedExtractor::default()
        .with("java", vec![raw("default title", "u1"), raw("only default", "u2")])
        .with("java?zh", vec![raw("zh title", "u1"), raw("only zh", "u3")]);
    let app = App::with_extractor(config, Box::new(extractor.clone())).unwrap();

    let stats = app.run_on(day()).await;
    assert_eq!(stats.sections, 1);
    assert_eq!(stats.fetched, 4);
    assert_eq!(stats.written, 3);
    assert_eq!(extractor.calls(), vec!["java", "java?zh"]);

    let journal = read(root.path().join("daily/2024-05-01.md"));
    assert_eq!(
        journal,
        "## Java\n\n\
         * 【2024-05-01】[default title](u1) - default title description\n\
         * 【2024-05-01】[only default](u2) - only default description\n\
         * 【2024-05-01】[only zh](u3) - only zh description\n\n"
    );
    assert!(!root.path().join("daily_zh/2024-05-01.md").exists());
}

#[tokio::test]
async fn failed_language_does_not_stop_the_run() {
    let root = tempfile::tempdir().unwrap();
    // go 没有预设结果，模拟超时
    let extractor = ScriptedExtractor::default()
        .with("java", vec![raw("J", "uj")])
        .with("python", vec![raw("P", "up")]);
    let app = App::with_extractor(
        config_in(root.path(), &["go", "java", "python"]),
        Box::new(extractor.clone()),
    )
    .unwrap();

    let stats = app.run_on(day()).await;
    assert_eq!(stats.sections, 6);
    assert_eq!(stats.written, 2);
    assert!(stats.empty_sources.iter().any(|s| s.starts_with("go →")));
    assert_eq!(extractor.calls().len(), 6);

    let journal = read(root.path().join("daily/2024-05-01.md"));
    assert!(!journal.contains("## Go"));
    assert!(journal.contains("## Java\n\n* 【2024-05-01】[J](uj)"));
    assert!(journal.contains("## Python\n\n* 【2024-05-01】[P](up)"));
}

#[tokio::test]
async fn written_records_round_trip_through_history() {
    let root = tempfile::tempdir().unwrap();
    let extractor = ScriptedExtractor::default().with(
        "css",
        vec![raw("a / b", "https://github.com/a/b"), raw("no link yet", "")],
    );
    let config = config_in(root.path(), &["css"]);
    App::with_extractor(config, Box::new(extractor))
        .unwrap()
        .run_on(day())
        .await;

    let keys = HistoryIndex::new(HistoryScope::AllDays, false)
        .load(&root.path().join("daily"), day())
        .unwrap();
    assert!(keys.contains(&IdentityKey::Url("https://github.com/a/b".into())));
    assert!(keys.contains(&IdentityKey::Title("no link yet".into())));
}

#[tokio::test]
async fn history_scope_controls_next_day() {
    let root = tempfile::tempdir().unwrap();
    let next_day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let extractor = ScriptedExtractor::default().with("c", vec![raw("A", "u1")]);

    let all_days = config_in(root.path(), &["c"]);
    let app = App::with_extractor(all_days.clone(), Box::new(extractor.clone())).unwrap();
    assert_eq!(app.run_on(day()).await.written, 1);
    assert_eq!(app.run_on(next_day).await.written, 0);

    let mut today_only = all_days;
    today_only.history_scope = HistoryScope::TodayOnly;
    let app = App::with_extractor(today_only, Box::new(extractor)).unwrap();
    assert_eq!(app.run_on(next_day).await.written, 1);
    assert!(root.path().join("daily/2024-05-02.md").exists());
}

#[tokio::test]
async fn identity_ledger_tracks_writes() {
    let root = tempfile::tempdir().unwrap();
    let mut config = config_in(root.path(), &["html"]);
    config.identity_ledger = true;
    let extractor = ScriptedExtractor::default().with("html", vec![raw("H", "uh")]);
    let app = App::with_extractor(config, Box::new(extractor)).unwrap();

    assert_eq!(app.run_on(day()).await.written, 1);
    let ledger = read(root.path().join("daily/.identities.jsonl"));
    assert_eq!(ledger, "{\"key\":{\"url\":\"uh\"},\"date\":\"2024-05-01\"}\n");
    assert_eq!(app.run_on(day()).await.written, 0);
}

#[tokio::test]
async fn index_collects_sections_newest_first() {
    let root = tempfile::tempdir().unwrap();
    let index_path = root.path().join("README.md");
    fs::write(&index_path, "# Trending\n\n## Python\n\n* 【2024-04-30】[old](u0) - old\n").unwrap();

    let mut config = config_in(root.path(), &["python"]);
    config.index_path = Some(index_path.to_string_lossy().to_string());
    let extractor = ScriptedExtractor::default()
        .with("python", vec![raw("new", "u1")])
        .with("python?zh", vec![raw("zh", "u2")]);
    let app = App::with_extractor(config, Box::new(extractor)).unwrap();

    let stats = app.run_on(day()).await;
    assert_eq!(stats.indexed, 2);
    assert_eq!(
        read(&index_path),
        "# Trending\n\n## Python\n\n\
         * 【2024-05-01】[new](u1) - new description\n\
         * 【2024-04-30】[old](u0) - old\n\n\
         ## Python (zh)\n\n\
         * 【2024-05-01】[zh](u2) - zh description\n"
    );
}

#[tokio::test]
async fn unusable_scopes_are_skipped_until_none_remain() {
    let root = tempfile::tempdir().unwrap();
    let blocker = root.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let mut config = config_in(root.path(), &["go"]);
    config.locales[1].journal_dir = blocker.join("daily_zh").to_string_lossy().to_string();
    let extractor = ScriptedExtractor::default().with("go", vec![raw("G", "ug")]);
    let app = assert_ok!(App::with_extractor(config.clone(), Box::new(extractor.clone())));
    assert_eq!(app.plan(day()).len(), 1);
    assert_eq!(app.run_on(day()).await.written, 1);

    config.locales[0].journal_dir = blocker.join("daily").to_string_lossy().to_string();
    assert!(App::with_extractor(config, Box::new(extractor)).is_err());
}

#[tokio::test]
#[ignore] // 需要网络：cargo test -- --ignored
async fn fetches_live_trending_page() {
    let config = Config::default();
    let extractor = trending_journal::TrendingExtractor::new(&config).expect("创建抽取器失败");
    let records = extractor
        .fetch(&LocaleVariant::default_locale().page_ref(""))
        .await;
    assert!(!records.is_empty(), "趋势页应该至少有一条记录");
    assert!(records.iter().all(|r| r.url.starts_with("https://github.com/")));
}
