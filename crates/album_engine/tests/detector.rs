mod support;

use std::sync::Arc;
use std::time::Duration;

use album_core::Catalog;
use album_engine::{
    ChangeDetector, FailureKind, FetchError, ListingSettings, RemoteCollection,
    RemoteCollectionClient, RetryPolicy, Transport, TransportResponse,
};
use chrono::NaiveDate;
use support::{cst, item, listing_body, noon, ok_body, query_map, recording_sleeper, WireItem};

/// Answers single-item samples differently depending on the requested order.
struct TwoOrders {
    default_order: Option<WireItem>,
    reversed: Option<WireItem>,
}

#[async_trait::async_trait]
impl Transport for TwoOrders {
    async fn get(
        &self,
        _url: &str,
        query: &[(String, String)],
    ) -> Result<TransportResponse, FetchError> {
        let params = query_map(query);
        assert_eq!(params["count"], "1");
        let answer = match params.get("is_reverse").map(String::as_str) {
            Some("1") => &self.reversed,
            None => &self.default_order,
            Some(other) => panic!("unexpected order hint {other}"),
        };
        match answer {
            Some(item) => ok_body(listing_body(std::slice::from_ref(item), true)),
            None => Err(FetchError::new(FailureKind::HttpStatus(500), "down")),
        }
    }
}

fn client(default_order: Option<WireItem>, reversed: Option<WireItem>) -> RemoteCollectionClient {
    let collection = RemoteCollection::new("BIZ==", "ABC").with_endpoint("http://fake/album");
    let settings = ListingSettings {
        retry: RetryPolicy::new(1, Duration::ZERO),
        ..ListingSettings::default()
    };
    let transport = TwoOrders {
        default_order,
        reversed,
    };
    RemoteCollectionClient::new(collection, Arc::new(transport), settings)
        .with_sleeper(recording_sleeper())
}

fn a() -> WireItem {
    item(1, "A", "https://host/s/a", 100)
}

fn b() -> WireItem {
    item(2, "B", "https://host/s/b", 200)
}

#[tokio::test]
async fn newer_of_the_two_samples_wins_in_either_order() {
    let client_ab = client(Some(a()), Some(b()));
    let newest = ChangeDetector::new(&client_ab, cst()).newest_remote().await.unwrap();
    assert_eq!(newest.title, "B");

    let client_ba = client(Some(b()), Some(a()));
    let newest = ChangeDetector::new(&client_ba, cst()).newest_remote().await.unwrap();
    assert_eq!(newest.title, "B");
}

#[tokio::test]
async fn failed_sample_falls_back_to_the_other() {
    let client = client(Some(a()), None);
    let newest = ChangeDetector::new(&client, cst()).newest_remote().await.unwrap();
    assert_eq!(newest.title, "A");
}

#[tokio::test]
async fn both_samples_failing_is_not_up_to_date() {
    let client = client(None, None);
    let catalog = Catalog::from_filenames(["2025-01-05_Local.md"]);
    let freshness = ChangeDetector::new(&client, cst())
        .is_local_up_to_date(&catalog)
        .await;
    assert!(!freshness.up_to_date);
    assert!(freshness.remote_newest.is_none());
}

#[tokio::test]
async fn local_date_at_or_after_remote_is_up_to_date() {
    let remote = item(9, "Remote", "https://host/s/r", noon(2025, 1, 5));
    let client = client(Some(remote.clone()), Some(remote));
    let detector = ChangeDetector::new(&client, cst());

    let same_day = Catalog::from_filenames(["2025-01-05_Local.md"]);
    let freshness = detector.is_local_up_to_date(&same_day).await;
    assert!(freshness.up_to_date);
    assert_eq!(freshness.local_newest, NaiveDate::from_ymd_opt(2025, 1, 5));

    let day_before = Catalog::from_filenames(["2025-01-04_Local.md"]);
    assert!(!detector.is_local_up_to_date(&day_before).await.up_to_date);

    assert!(!detector.is_local_up_to_date(&Catalog::new()).await.up_to_date);
}
