//! Polling behavior of the refresh engine against a mock trading server.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use igdash::client::DashClient;
use igdash::refresh::ViewRefresher;

fn snapshot_body(epic: &str, score: f64) -> serde_json::Value {
    json!({
        "epic": epic,
        "spread": 0.9,
        "current_rsi": 55.5,
        "prediction": { "score": score, "price_prediction": 123.45 },
        "trends": { "MAX": 10.0, "5m": 2.5, "1h": -7.5 }
    })
}

fn market_path(epic: &str) -> String {
    format!("/market/{epic}.json")
}

async fn mount_market(server: &MockServer, epic: &str, score: f64) {
    Mock::given(method("GET"))
        .and(path(market_path(epic)))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body(epic, score)))
        .mount(server)
        .await;
}

fn refresher(
    server: &MockServer,
    epics: &[&str],
    market_interval: Duration,
    trade_interval: Duration,
) -> ViewRefresher {
    let client = DashClient::with_base_url(Url::parse(&server.uri()).unwrap());
    ViewRefresher::new(
        client,
        epics.iter().map(|epic| epic.to_string()).collect(),
        market_interval,
        trade_interval,
    )
}

async fn requests_to(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == path)
        .count()
}

#[tokio::test]
async fn one_market_fetch_per_epic_per_tick() {
    let server = MockServer::start().await;
    let epics = ["CS.D.GBPUSD.TODAY.IP", "CS.D.EURUSD.TODAY.IP", "CS.D.USDJPY.TODAY.IP"];
    for epic in &epics {
        mount_market(&server, epic, 1.0).await;
    }

    // trade cadence far out so only the market loop fires
    let handle = refresher(
        &server,
        &epics,
        Duration::from_millis(200),
        Duration::from_secs(60),
    )
    .spawn();

    // one market tick lands at 200ms; the next would be 400ms
    tokio::time::sleep(Duration::from_millis(310)).await;
    handle.shutdown();

    for epic in &epics {
        assert_eq!(
            requests_to(&server, &market_path(epic)).await,
            1,
            "expected exactly one fetch for {epic} after one tick"
        );
    }
    assert_eq!(requests_to(&server, "/get-trades").await, 0);
}

#[tokio::test]
async fn one_trade_fetch_per_tick_swaps_panel_wholesale() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-trades"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ul><li>trade</li></ul>"))
        .mount(&server)
        .await;

    // no epics: the market loop never starts
    let handle = refresher(
        &server,
        &[],
        Duration::from_secs(60),
        Duration::from_millis(200),
    )
    .spawn();

    tokio::time::sleep(Duration::from_millis(310)).await;

    assert_eq!(requests_to(&server, "/get-trades").await, 1);

    let state = handle.state();
    let state = state.read().await;
    assert_eq!(state.trades_panel(), Some("<ul><li>trade</li></ul>"));
    drop(state);

    handle.shutdown();
}

#[tokio::test]
async fn failed_fetch_leaves_card_stale_while_siblings_update() {
    let server = MockServer::start().await;
    let good = "CS.D.EURUSD.TODAY.IP";
    let flaky = "CS.D.GBPUSD.TODAY.IP";

    mount_market(&server, good, 2.0).await;

    // first response succeeds, everything after is a server error
    Mock::given(method("GET"))
        .and(path(market_path(flaky)))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body(flaky, 7.0)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(market_path(flaky)))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let handle = refresher(
        &server,
        &[good, flaky],
        Duration::from_millis(150),
        Duration::from_secs(60),
    )
    .spawn();

    // several ticks: the flaky card keeps failing after its first success
    tokio::time::sleep(Duration::from_millis(650)).await;
    handle.shutdown();

    let flaky_requests = requests_to(&server, &market_path(flaky)).await;
    assert!(
        flaky_requests >= 3,
        "flaky epic should keep being polled, saw {flaky_requests}"
    );

    let state = handle.state();
    let state = state.read().await;

    // stale content from the one successful fetch is still on the card
    let flaky_card = state.card(flaky).expect("card slot exists");
    let snapshot = flaky_card.snapshot.as_ref().expect("first snapshot kept");
    assert_eq!(snapshot.prediction.score, 7.0);

    // the sibling kept updating the whole time
    let good_card = state.card(good).expect("card slot exists");
    assert!(good_card.snapshot.is_some());
    assert!(requests_to(&server, &market_path(good)).await >= 3);
}

#[tokio::test]
async fn hung_fetch_is_superseded_not_duplicated() {
    let server = MockServer::start().await;
    let fast = "CS.D.EURUSD.TODAY.IP";
    let slow = "CS.D.GBPUSD.TODAY.IP";

    mount_market(&server, fast, 1.0).await;
    Mock::given(method("GET"))
        .and(path(market_path(slow)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(snapshot_body(slow, 9.0))
                .set_delay(Duration::from_secs(60)),
        )
        .mount(&server)
        .await;

    let handle = refresher(
        &server,
        &[fast, slow],
        Duration::from_millis(150),
        Duration::from_secs(60),
    )
    .spawn();

    tokio::time::sleep(Duration::from_millis(650)).await;

    // every tick supersedes the hung request, so at most one is pending for
    // the slow epic at any moment (plus, briefly, the one it just aborted)
    assert!(handle.in_flight_len() <= 2);

    let slow_requests = requests_to(&server, &market_path(slow)).await;
    assert!(
        (2..=6).contains(&slow_requests),
        "one request per tick for the hung epic, saw {slow_requests}"
    );

    let state = handle.state();
    {
        let state = state.read().await;
        // the hung card never rendered anything
        assert!(state.card(slow).unwrap().snapshot.is_none());
        // while its sibling kept updating
        assert!(state.card(fast).unwrap().snapshot.is_some());
    }

    handle.shutdown();
}

#[tokio::test]
async fn cards_reorder_ascending_by_score() {
    let server = MockServer::start().await;
    let high = "CS.D.GBPUSD.TODAY.IP";
    let low = "CS.D.EURUSD.TODAY.IP";
    let mid = "CS.D.USDJPY.TODAY.IP";

    mount_market(&server, high, 3.0).await;
    mount_market(&server, low, 1.0).await;
    mount_market(&server, mid, 2.0).await;

    let handle = refresher(
        &server,
        &[high, low, mid],
        Duration::from_millis(100),
        Duration::from_secs(60),
    )
    .spawn();

    // enough ticks for every snapshot to land and a later tick to re-sort
    tokio::time::sleep(Duration::from_millis(450)).await;
    handle.shutdown();

    let state = handle.state();
    let state = state.read().await;
    let order: Vec<String> = state
        .cards_in_order()
        .into_iter()
        .map(|card| card.epic)
        .collect();
    assert_eq!(order, vec![low, mid, high]);
}
