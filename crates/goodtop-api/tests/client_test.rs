#![allow(clippy::unwrap_used)]
// Integration tests for `GoodtopClient` against a wiremock stand-in for the
// switch's CGI interface, using saved-page fixtures.

use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use goodtop_api::{FlowControl, GoodtopClient, PoeState, SpeedDuplex, TransportConfig};

const INFO: &str = include_str!("fixtures/info.html");
const PSE_SYSTEM: &str = include_str!("fixtures/pse_system.html");
const PORT_STATS: &str = include_str!("fixtures/port_stats.html");
const PORT_SETTINGS: &str = include_str!("fixtures/port_settings.html");
const PSE_PORT: &str = include_str!("fixtures/pse_port.html");
const MAC_FWD_TBL: &str = include_str!("fixtures/mac_fwd_tbl.html");

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GoodtopClient) {
    // A dedicated (non-pooled) server: dropping it actually closes the
    // port, which the transport-failure test relies on.
    let server = MockServer::builder().start().await;
    let client = GoodtopClient::new(
        &server.uri(),
        "admin",
        SecretString::from("password".to_owned()),
        TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mount every page of a healthy device.
async fn mount_all_pages(server: &MockServer) {
    mount_page(server, "/info.cgi", INFO).await;
    mount_page(server, "/pse_system.cgi", PSE_SYSTEM).await;
    Mock::given(method("GET"))
        .and(path("/port.cgi"))
        .and(query_param("page", "stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PORT_STATS))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/port.cgi"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PORT_SETTINGS))
        .mount(server)
        .await;
    mount_page(server, "/pse_port.cgi", PSE_PORT).await;
    Mock::given(method("GET"))
        .and(path("/mac.cgi"))
        .and(query_param("page", "fwd_tbl"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MAC_FWD_TBL))
        .mount(server)
        .await;
    mount_login(server, 200).await;
}

async fn mount_login(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn mount_save(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/save.cgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ── Snapshot tests ──────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_merges_all_pages() {
    let (server, client) = setup().await;
    mount_all_pages(&server).await;

    let snapshot = client.fetch_snapshot().await;

    assert_eq!(snapshot.model, "ZX-AFGW-SWTG218ANS");
    assert_eq!(snapshot.mac_address, "1C:2A:A3:00:11:22");
    assert_eq!(snapshot.ip_address, "192.168.200.11");
    assert_eq!(snapshot.firmware_version, "V1.0.2");
    assert_eq!(snapshot.hardware_version, "V1.0");
    assert_eq!(snapshot.device_id(), "1c2aa3001122");
    assert!((snapshot.poe_total_watts - 13.7).abs() < f64::EPSILON);

    // One entry per statistics row, keyed by parsed port number.
    assert_eq!(snapshot.ports.len(), 4);
    assert_eq!(
        snapshot.ports.keys().copied().collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    let port2 = &snapshot.ports[&2];
    assert_eq!(port2.state, "Enable");
    assert_eq!(port2.link, "100M");
    assert_eq!(port2.tx_good, 120);
    assert_eq!(port2.tx_bad, 0);
    assert_eq!(port2.rx_good, 98);
    assert_eq!(port2.rx_bad, 1);
    assert!(port2.is_enabled());
    assert!(port2.is_link_up());
    assert_eq!(port2.speed_duplex, SpeedDuplex::Full100);
    assert_eq!(port2.flow_control, FlowControl::On);
    assert_eq!(port2.poe, PoeState::Enabled);

    let port3 = &snapshot.ports[&3];
    assert!(!port3.is_link_up());
    assert_eq!(port3.poe, PoeState::Disabled);

    // The PoE page has no row for port 4: degraded, not "disabled".
    assert_eq!(snapshot.ports[&4].poe, PoeState::Unknown);
}

#[tokio::test]
async fn mac_table_annotates_known_ports_only() {
    let (server, client) = setup().await;
    mount_all_pages(&server).await;

    let snapshot = client.fetch_snapshot().await;

    // Deduplicated, insertion order preserved.
    assert_eq!(
        snapshot.ports[&1].mac_addresses,
        vec!["AA:BB:CC:00:11:22", "AA:BB:CC:00:11:33"]
    );
    assert_eq!(snapshot.ports[&2].mac_addresses, vec!["DE:AD:BE:EF:00:01"]);
    // The fixture's port-9 row has no stats entry and is dropped.
    assert!(!snapshot.ports.contains_key(&9));
}

#[tokio::test]
async fn snapshot_tolerates_unreachable_poe_system_page() {
    let (server, client) = setup().await;
    mount_page(&server, "/info.cgi", INFO).await;
    Mock::given(method("GET"))
        .and(path("/port.cgi"))
        .and(query_param("page", "stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PORT_STATS))
        .mount(&server)
        .await;
    // pse_system.cgi, pse_port.cgi, port.cgi, mac.cgi all 404.

    let snapshot = client.fetch_snapshot().await;

    assert_eq!(snapshot.ports.len(), 4);
    assert!((snapshot.poe_total_watts - 0.0).abs() < f64::EPSILON);
    assert_eq!(snapshot.ports[&1].poe, PoeState::Unknown);
}

#[tokio::test]
async fn snapshot_never_fails_even_when_every_page_does() {
    let (server, client) = setup().await;
    // No mocks mounted at all: every request 404s.
    let snapshot = client.fetch_snapshot().await;

    assert_eq!(snapshot, goodtop_api::DeviceSnapshot::default());
    drop(server);
}

#[tokio::test]
async fn snapshot_is_idempotent_against_static_fixtures() {
    let (server, client) = setup().await;
    mount_all_pages(&server).await;

    let first = client.fetch_snapshot().await;
    let second = client.fetch_snapshot().await;

    assert_eq!(first, second);
}

// ── Connectivity tests ──────────────────────────────────────────────

#[tokio::test]
async fn test_connection_recognizes_the_device() {
    let (server, client) = setup().await;
    mount_page(&server, "/info.cgi", INFO).await;

    assert!(client.test_connection().await.unwrap());
}

#[tokio::test]
async fn test_connection_rejects_foreign_pages() {
    let (server, client) = setup().await;
    mount_page(&server, "/info.cgi", "<html>It works!</html>").await;

    assert!(!client.test_connection().await.unwrap());
}

#[tokio::test]
async fn test_connection_propagates_transport_failure() {
    let (server, client) = setup().await;
    drop(server); // port closed: connection refused

    let result = client.test_connection().await;
    assert!(matches!(result, Err(goodtop_api::Error::Transport(_))));
}

// ── Mutation tests ──────────────────────────────────────────────────

#[tokio::test]
async fn set_poe_posts_zero_indexed_port_and_saves_once() {
    let (server, client) = setup().await;
    mount_login(&server, 200).await;
    mount_save(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/pse_port.cgi"))
        .and(body_string_contains("portid=0"))
        .and(body_string_contains("state=1"))
        .and(body_string_contains("cmd=poe"))
        .and(body_string_contains("submit=Apply"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.set_poe(1, true).await);
    server.verify().await;
}

#[tokio::test]
async fn set_port_state_resubmits_speed_and_flow_codes() {
    let (server, client) = setup().await;
    mount_login(&server, 200).await;
    mount_save(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/port.cgi"))
        .and(body_string_contains("portid=7"))
        .and(body_string_contains("state=0"))
        .and(body_string_contains("speed_duplex=4"))
        .and(body_string_contains("flow=1"))
        .and(body_string_contains("cmd=port"))
        .and(body_string_contains("submit=%2B%2B%2BApply%2B%2B%2B"))
        .and(body_string_contains("language=EN"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ok = client
        .set_port_state(8, false, SpeedDuplex::Full100, FlowControl::On)
        .await;
    assert!(ok);
    server.verify().await;
}

#[tokio::test]
async fn set_poe_reports_failure_and_skips_save() {
    let (server, client) = setup().await;
    mount_login(&server, 200).await;
    mount_save(&server, 0).await;
    Mock::given(method("POST"))
        .and(path("/pse_port.cgi"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(!client.set_poe(3, false).await);
    server.verify().await;
}

#[tokio::test]
async fn rejected_login_does_not_block_the_mutation() {
    let (server, client) = setup().await;
    mount_login(&server, 403).await;
    mount_save(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/pse_port.cgi"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // The device often accepts the action on the cookie alone, so a
    // rejected login only gets logged.
    assert!(client.set_poe(2, true).await);
    server.verify().await;
}

#[tokio::test]
async fn save_failure_still_reports_mutation_success() {
    let (server, client) = setup().await;
    mount_login(&server, 200).await;
    Mock::given(method("POST"))
        .and(path("/save.cgi"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pse_port.cgi"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // The toggle itself landed; persistence is best-effort.
    assert!(client.set_poe(2, true).await);
}

#[tokio::test]
async fn fetch_snapshot_logs_in_before_the_mac_table() {
    let (server, client) = setup().await;
    mount_page(&server, "/info.cgi", INFO).await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("Response=e3274be5c857fb42ab72d786e281b4b8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let _ = client.fetch_snapshot().await;
    server.verify().await;
}
