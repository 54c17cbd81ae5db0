use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sitecheck_core::{
    load_sites, write_report, Checker, HttpProber, ProbeConfig, ProbeError, SiteCheckError,
    SiteProber, Status,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEMPLATE: &str = "\
| Site | Status |
|------|--------|
{% for site in sites -%}
| [{{ site.name }}]({{ site.url }}) | {{ site.status }} |
{% endfor %}";

/// Counts calls and never reaches the network.
struct CountingProber {
    calls: AtomicUsize,
}

#[async_trait]
impl SiteProber for CountingProber {
    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("down") {
            Err(ProbeError::Status {
                url: url.to_string(),
                status: 502,
            })
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn load_check_render_with_scripted_prober() {
    let dir = tempfile::tempdir().unwrap();
    let sites_path = dir.path().join("sites.yaml");
    let template_path = dir.path().join("README.md.tmpl");
    let output_path = dir.path().join("README.md");

    fs::write(
        &sites_path,
        "sites:\n  - name: Up\n    url: https://up.example.com\n  - name: Down\n    url: https://down.example.com\n",
    )
    .unwrap();
    fs::write(&template_path, TEMPLATE).unwrap();

    let sites = load_sites(&sites_path).unwrap();
    let prober = Arc::new(CountingProber {
        calls: AtomicUsize::new(0),
    });
    let checker = Checker::new(prober.clone(), ProbeConfig::default());
    let statuses = checker.check_all(&sites).await;
    write_report(&output_path, &template_path, &statuses).unwrap();

    assert_eq!(prober.calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        fs::read_to_string(&output_path).unwrap(),
        "\
| Site | Status |
|------|--------|
| [Up](https://up.example.com) | :green_square: |
| [Down](https://down.example.com) | :red_square: |
"
    );
}

#[test]
fn missing_sites_file_is_config_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = load_sites(dir.path().join("sites.yaml")).unwrap_err();
    assert!(matches!(err, SiteCheckError::ConfigRead { .. }));
    assert!(err.to_string().contains("sites.yaml"), "{}", err);
}

#[tokio::test]
async fn http_probing_against_mock_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(600)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/ok2", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok2"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let yaml = format!(
        "sites:\n\
         \x20 - name: ok\n    url: {uri}/ok\n\
         \x20 - name: error\n    url: {uri}/error\n\
         \x20 - name: slow\n    url: {uri}/slow\n\
         \x20 - name: moved\n    url: {uri}/moved\n\
         \x20 - name: unmocked\n    url: {uri}/unmocked\n",
        uri = server.uri()
    );
    let dir = tempfile::tempdir().unwrap();
    let sites_path = dir.path().join("sites.yaml");
    fs::write(&sites_path, yaml).unwrap();

    let config = ProbeConfig::default().with_timeout(Duration::from_millis(300));
    let prober = Arc::new(HttpProber::from_config(&config).unwrap());
    let checker = Checker::new(prober, config);

    let sites = load_sites(&sites_path).unwrap();
    let statuses = checker.check_all(&sites).await;

    let got: Vec<(&str, Status)> = statuses
        .iter()
        .map(|s| (s.name.as_str(), s.status))
        .collect();
    assert_eq!(
        got,
        vec![
            ("ok", Status::Up),
            ("error", Status::Down),
            ("slow", Status::Down),
            ("moved", Status::Up),
            ("unmocked", Status::Down),
        ]
    );
}
