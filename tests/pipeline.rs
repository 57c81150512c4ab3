// End-to-end: mirror fallback → season files → year merge → leaderboard.

use std::{fs, path::Path, time::Duration};

use racepoints::{
    fetch::ErgastClient,
    leaderboard::{self, Kind},
    merge::{self, MergeOutcome},
    season::{self, Mode},
    Config, PipelineError,
};
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, p: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_season(server: &MockServer, season: u32, winner: (&str, &str, &str)) {
    mount(
        server,
        &format!("/f1/{season}.json"),
        json!({"MRData": {"RaceTable": {"Races": [
            {"season": season.to_string(), "round": "1", "raceName": "Bahrain Grand Prix",
             "date": format!("{season}-03-02"),
             "Circuit": {"circuitName": "Bahrain International Circuit",
                         "Location": {"locality": "Sakhir", "country": "Bahrain"}}},
            {"season": season.to_string(), "round": "2", "raceName": "Saudi Arabian Grand Prix"}
        ]}}}),
    )
    .await;

    let (code, constructor_id, constructor_name) = winner;
    mount(
        server,
        &format!("/f1/{season}/1/results.json"),
        json!({"MRData": {"RaceTable": {"Races": [{"season": season.to_string(), "round": "1", "Results": [
            {"position": "1", "points": "25",
             "Driver": {"driverId": code.to_lowercase(), "code": code, "givenName": "First", "familyName": code},
             "Constructor": {"constructorId": constructor_id, "name": constructor_name}},
            {"position": "2", "points": "18",
             "Driver": {"driverId": "perez", "code": "PER", "givenName": "Sergio", "familyName": "Pérez"},
             "Constructor": {"constructorId": "red_bull", "name": "Red Bull"}},
            {"position": "3", "points": "15",
             "Driver": {"driverId": "sainz", "code": "SAI", "givenName": "Carlos", "familyName": "Sainz"},
             "Constructor": {"constructorId": "ferrari", "name": "Ferrari"}}
        ]}]}}}),
    )
    .await;
    // round 2 not run yet
    mount(
        server,
        &format!("/f1/{season}/2/results.json"),
        json!({"MRData": {"RaceTable": {"Races": []}}}),
    )
    .await;
}

fn config_for(mirrors: Vec<String>, data_dir: &Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        mirrors,
        timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

#[tokio::test]
async fn fetch_merge_and_rank_across_seasons() {
    let dead = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&dead)
        .await;
    let live = MockServer::start().await;
    mount_season(&live, 2023, ("VER", "red_bull", "Red Bull")).await;
    mount_season(&live, 2024, ("LEC", "ferrari", "Ferrari")).await;

    let tmp = tempdir().unwrap();
    let cfg = config_for(vec![dead.uri(), live.uri()], &tmp.path().join("data"));
    let client = ErgastClient::new(&cfg).unwrap();

    // ── fetch both seasons, race points only ──
    let table = "f1_official_constructor_race_points";
    let merge_dir = tmp.path().join("mycsv").join(table);
    fs::create_dir_all(&merge_dir).unwrap();

    for season in [2023, 2024] {
        let raw = cfg.season_raw_dir(season);
        let summary = season::run_season(&client, season, Mode::Race, &raw).await.unwrap();
        assert_eq!(summary.skipped_rounds, vec![2]);

        let text = fs::read_to_string(raw.join(format!("{table}.csv"))).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        let expected_points: f64 = 25.0 + 18.0 + 15.0;
        let constructor_total: f64 = lines[1..]
            .iter()
            .map(|l| l.split(',').nth(3).unwrap().parse::<f64>().unwrap())
            .sum();
        assert_eq!(constructor_total, expected_points);

        fs::copy(raw.join(format!("{table}.csv")), merge_dir.join(format!("{table}{season}.csv"))).unwrap();
    }

    // 2023: red_bull 43, ferrari 15 ; 2024: red_bull 18... ferrari 40
    let outcome = merge::merge_table(&merge_dir, false).unwrap();
    let combined = merge_dir.join(format!("{table}.csv"));
    match &outcome {
        MergeOutcome::Written { target, inputs, rows } => {
            assert_eq!(target, &combined);
            assert_eq!(inputs.len(), 2);
            assert_eq!(*rows, 4);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let text = fs::read_to_string(&combined).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "season,round,raceName,points,constructorCode,constructorAbbr,constructor_name",
            "2023,1,Bahrain Grand Prix,43,red_bull,RED,Red Bull",
            "2023,1,Bahrain Grand Prix,15,ferrari,FER,Ferrari",
            "2024,1,Bahrain Grand Prix,40,ferrari,FER,Ferrari",
            "2024,1,Bahrain Grand Prix,18,red_bull,RED,Red Bull",
        ]
    );

    // re-run is byte-identical
    let before = fs::read(&combined).unwrap();
    merge::merge_table(&merge_dir, false).unwrap();
    assert_eq!(before, fs::read(&combined).unwrap());

    // ── leaderboard over the combined file ──
    let loaded = leaderboard::load_table(&combined).unwrap();
    let top = leaderboard::leaderboard(&loaded, Kind::Constructor, 2).unwrap();
    assert_eq!(top[0].name, "Red Bull");
    assert_eq!(top[0].points, 43.0);
    assert_eq!(top[1].name, "Ferrari");
    assert_eq!(top[1].points, 40.0);

    // schedule table came along
    let schedule = fs::read_to_string(cfg.season_raw_dir(2024).join("dim_round_dates.csv")).unwrap();
    assert_eq!(
        schedule.lines().nth(1),
        Some("2024,1,Bahrain Grand Prix,Bahrain International Circuit,Sakhir,Bahrain,2024-03-02,")
    );
}

#[tokio::test]
async fn unavailable_upstream_fails_only_that_season() {
    // only 2024 is served; every 2025 request gets a 404 from the mock
    let live = MockServer::start().await;
    mount_season(&live, 2024, ("NOR", "mclaren", "McLaren")).await;

    let tmp = tempdir().unwrap();
    let cfg = config_for(vec![live.uri()], tmp.path());
    let client = ErgastClient::new(&cfg).unwrap();

    let report = season::run_seasons(&client, &[2025, 2024], Mode::Race, |s| cfg.season_raw_dir(s)).await;

    assert_eq!(report.failures(), 1);
    assert!(matches!(
        report.seasons[0],
        (2025, Err(PipelineError::UpstreamUnavailable { .. }))
    ));
    assert!(!cfg.season_raw_dir(2025).exists());

    let (season, outcome) = &report.seasons[1];
    assert_eq!(*season, 2024);
    let summary = outcome.as_ref().unwrap();
    assert_eq!(summary.tables.len(), 3);
    assert!(cfg
        .season_raw_dir(2024)
        .join("f1_official_driver_race_points.csv")
        .exists());
}
