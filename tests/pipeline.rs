use prenoms_dashboard::charts::{ChartSpecs, TidyTables};
use prenoms_dashboard::data::{DataLoader, DatasetCache, SourceKey};
use prenoms_dashboard::export::{ExportError, ExportSelection, Exporter};
use prenoms_dashboard::stats::{DepartmentFilter, GenderTrend, NameStats};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const NAMES: &str = "sexe;preusuel;annais;dpt;nombre
1;_PRENOMS_RARES;1990;75;500
1;LUCAS;1990;75;40
2;EMMA;1990;75;60
1;CAMILLE;1990;75;5
2;CAMILLE;1990;75;15
1;CAMILLE;1991;13;30
2;CAMILLE;1991;13;10
2;EMMA;1991;13;25
1;LUCAS;1991;XX;99
1;HUGO;XXXX;13;7
";

const DEPARTMENTS: &str = r#"{"type": "FeatureCollection", "features": [
 {"type": "Feature", "properties": {"code": "13", "nom": "Bouches-du-Rhône"},
  "geometry": {"type": "Polygon", "coordinates": [[[4.2,43.2],[5.8,43.2],[5.8,43.9],[4.2,43.9],[4.2,43.2]]]}},
 {"type": "Feature", "properties": {"code": "75", "nom": "Paris"},
  "geometry": {"type": "Polygon", "coordinates": [[[2.2,48.8],[2.5,48.8],[2.5,48.9],[2.2,48.9],[2.2,48.8]]]}},
 {"type": "Feature", "properties": {"code": "2A", "nom": "Corse-du-Sud"},
  "geometry": {"type": "MultiPolygon", "coordinates": [[[[8.5,41.3],[9.4,41.3],[9.4,42.4],[8.5,42.4],[8.5,41.3]]]]}}
]}"#;

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,prenoms_dashboard=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn write_sources(dir: &TempDir) -> (PathBuf, PathBuf) {
    let names = dir.path().join("dpt2020.csv");
    let departments = dir.path().join("departements.geojson");
    fs::write(&names, NAMES).unwrap();
    fs::write(&departments, DEPARTMENTS).unwrap();
    (names, departments)
}

fn load_stats(dir: &TempDir) -> NameStats {
    init_test_logging();
    let (names, departments) = write_sources(dir);
    let dataset = DataLoader::load_paths(&names, &departments).unwrap();
    NameStats::new(Arc::new(dataset))
}

#[test]
fn test_load_cleans_and_joins() {
    let dir = TempDir::new().unwrap();
    let stats = load_stats(&dir);
    let dataset = stats.dataset();

    assert_eq!(dataset.names.len(), 7);
    assert_eq!(dataset.departments.len(), 3);
    assert_eq!(stats.year_range(), Some((1990, 1991)));
    assert!(dataset.joined.iter().all(|j| j.department.is_some()));
}

#[test]
fn test_views_over_loaded_dataset() {
    let dir = TempDir::new().unwrap();
    let mut stats = load_stats(&dir);

    let top = stats.top_names(1990);
    let names: Vec<&str> = top.iter().map(|t| t.name.as_ref()).collect();
    assert_eq!(names, vec!["EMMA", "LUCAS", "CAMILLE"]);
    assert_eq!(top[2].total, 20);

    let extremes = stats.department_extremes();
    assert_eq!(extremes.len(), 2);
    let paris = extremes
        .iter()
        .find(|e| &*e.department_code == "75")
        .unwrap();
    assert_eq!(&*paris.max_name, "EMMA");
    assert_eq!(paris.max_count, 60);
    assert_eq!(&*paris.min_name, "CAMILLE");
    assert_eq!(paris.min_count, 5);

    let map = TidyTables::department_map(&stats.dataset().departments, &extremes);
    let corsica = map.iter().find(|r| r.code == "2A").unwrap();
    assert!(corsica.max_name.is_none());

    let trend = stats.gender_trend("camille", &DepartmentFilter::All);
    match trend.as_ref() {
        GenderTrend::Series(years) => {
            assert_eq!(years.len(), 2);
            assert!((years[0].pct_girls - 75.0).abs() < 1e-9);
            assert!((years[1].pct_boys - 75.0).abs() < 1e-9);
        }
        GenderTrend::NoData => panic!("expected a series"),
    }

    let paris_only =
        stats.gender_trend("CAMILLE", &DepartmentFilter::Named("Paris".to_string()));
    assert_eq!(paris_only.years().len(), 1);
    assert!(stats
        .gender_trend("HUGO", &DepartmentFilter::All)
        .is_no_data());
}

#[test]
fn test_top_names_chart_keeps_every_year() {
    let dir = TempDir::new().unwrap();
    let mut stats = load_stats(&dir);

    let mut rows = TidyTables::top_names(1990, &stats.top_names(1990));
    rows.extend(TidyTables::top_names(1991, &stats.top_names(1991)));
    let spec = ChartSpecs::top_names(&rows, (1990, 1991), 1991);

    let values = spec["data"]["values"].as_array().unwrap();
    assert_eq!(values.len(), rows.len());
    assert_eq!(spec["params"][0]["value"], 1991);
}

#[test]
fn test_cache_reuses_unchanged_sources() {
    let dir = TempDir::new().unwrap();
    let (names, departments) = write_sources(&dir);
    let mut cache = DatasetCache::new();

    let key = SourceKey::of(&names, &departments).unwrap();
    let first = cache.get_or_load(&names, &departments).unwrap();
    let second = cache.get_or_load(&names, &departments).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache.get(&key).is_some());
}

fn assert_tables_written(out_dir: &Path) {
    for view in ["top_names", "department_map", "gender_shares"] {
        assert!(out_dir.join(format!("{view}.vl.json")).exists(), "{view} json");
        assert!(out_dir.join(format!("{view}.csv")).exists(), "{view} csv");
    }
}

#[test]
fn test_export_writes_views() {
    let dir = TempDir::new().unwrap();
    let mut stats = load_stats(&dir);
    let out_dir = dir.path().join("out");

    let selection = ExportSelection {
        year: 1991,
        name: "CAMILLE".to_string(),
        department: DepartmentFilter::All,
    };
    match Exporter::export_all(&mut stats, &selection, &out_dir) {
        Ok(summary) => {
            assert!(!summary.gender_no_data);
            assert_eq!(summary.files.len(), 9);
            assert!(summary.files.iter().all(|f| f.exists()));
        }
        // Text rendering needs a system font; every JSON and CSV is still written.
        Err(ExportError::Drawing(_)) => {}
        Err(e) => panic!("export failed: {e}"),
    }
    assert_tables_written(&out_dir);

    let spec: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("top_names.vl.json")).unwrap())
            .unwrap();
    assert_eq!(spec["layer"][0]["mark"]["type"], "bar");

    let csv = fs::read_to_string(out_dir.join("top_names.csv")).unwrap();
    assert!(csv.starts_with("year;rank;name;births"));
    assert!(csv.contains("1991;1;CAMILLE;40"));
}

#[test]
fn test_failed_render_keeps_other_views() {
    let dir = TempDir::new().unwrap();
    let mut stats = load_stats(&dir);
    let out_dir = dir.path().join("out");
    // A directory where the first PNG should go makes that rendering fail
    fs::create_dir_all(out_dir.join("top_names.png")).unwrap();

    let selection = ExportSelection {
        year: 1990,
        name: "EMMA".to_string(),
        department: DepartmentFilter::All,
    };
    let err = Exporter::export_all(&mut stats, &selection, &out_dir).unwrap_err();
    match err {
        ExportError::Drawing(message) => assert!(message.contains("top_names.png")),
        other => panic!("expected a drawing error, got {other}"),
    }
    assert_tables_written(&out_dir);
}
