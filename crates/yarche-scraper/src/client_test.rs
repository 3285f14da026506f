use super::*;

fn test_fetcher() -> HttpPageFetcher {
    HttpPageFetcher::new(5, "yarche-test/0.1", RetryPolicy::immediate(1))
        .expect("failed to build test HttpPageFetcher")
}

#[tokio::test]
async fn select_location_records_the_address() {
    let mut fetcher = test_fetcher();
    assert_eq!(fetcher.location(), None);

    fetcher
        .select_location("Москва, Вересаева 10")
        .await
        .unwrap();
    assert_eq!(fetcher.location(), Some("Москва, Вересаева 10"));

    fetcher.select_location("Томск, Ленина 1").await.unwrap();
    assert_eq!(fetcher.location(), Some("Томск, Ленина 1"));
}

#[test]
fn plain_http_does_not_apply_the_delivery_address() {
    assert!(!test_fetcher().applies_location());
}

#[tokio::test]
async fn unreachable_host_fails_with_load_page() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let fetcher = test_fetcher();
    let result = fetcher
        .fetch(&format!("http://127.0.0.1:{port}/category/"))
        .await;
    assert!(
        matches!(
            result,
            Err(ScraperError::LoadPage { retries: 1, ref source, .. })
                if matches!(**source, ScraperError::Http(_))
        ),
        "expected LoadPage wrapping Http, got: {result:?}"
    );
}

#[test]
fn fetcher_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpPageFetcher>();
}
