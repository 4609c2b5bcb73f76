use mockito::{Matcher, Server};
use riot_match_coach::error::{RiotApiError, SummaryError};
use riot_match_coach::player_summary::fetch_player_summary;
use riot_match_coach::riot_api::RiotClient;
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::test]
async fn sends_riot_token_and_decodes_puuid() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/riot/account/v1/accounts/by-riot-id/Caps/EUW")
        .match_header("x-riot-token", "RGAPI-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"puuid":"caps-puuid","gameName":"Caps","tagLine":"EUW"}"#)
        .create_async()
        .await;

    let client = RiotClient::new("RGAPI-test", &server.url()).unwrap();
    let puuid = client.get_puuid("Caps", "EUW").await.unwrap();

    mock.assert_async().await;
    assert_eq!(puuid, "caps-puuid");
}

#[tokio::test]
async fn recent_match_ids_keep_upstream_order() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/lol/match/v5/matches/by-puuid/caps-puuid/ids")
        .match_query(Matcher::UrlEncoded("count".into(), "3".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"["EUW1_3","EUW1_2","EUW1_1"]"#)
        .create_async()
        .await;

    let client = RiotClient::new("RGAPI-test", &server.url()).unwrap();
    let ids = client.get_match_ids_by_puuid("caps-puuid", 3).await.unwrap();

    assert_eq!(ids, vec!["EUW1_3", "EUW1_2", "EUW1_1"]);
}

#[tokio::test]
async fn non_success_carries_status_and_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/lol/match/v5/matches/EUW1_404")
        .with_status(404)
        .with_body(r#"{"status":{"message":"Data not found","status_code":404}}"#)
        .create_async()
        .await;

    let client = RiotClient::new("RGAPI-test", &server.url()).unwrap();
    let err = client.get_match_json("EUW1_404").await.unwrap_err();

    match err {
        RiotApiError::Status { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("Data not found"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let client = RiotClient::new("RGAPI-test", "http://127.0.0.1:1").unwrap();
    let err = client.get_match_timeline_json("EUW1_1").await.unwrap_err();

    assert!(matches!(err, RiotApiError::Transport(_)));
}

#[tokio::test]
async fn stalled_upstream_times_out_as_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = RiotClient::with_timeout(
        "RGAPI-test",
        &format!("http://{addr}"),
        Duration::from_millis(200),
    )
    .unwrap();
    let err = client.get_match_json("EUW1_1").await.unwrap_err();

    match err {
        RiotApiError::Transport(source) => assert!(source.is_timeout()),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn match_id_slashes_stay_inside_one_segment() {
    let mut server = Server::new_async().await;
    let account = server
        .mock("GET", "/riot/account/v1/accounts/by-riot-id/Faker/KR1")
        .with_status(200)
        .with_body(r#"{"puuid":"someone-else"}"#)
        .expect(0)
        .create_async()
        .await;

    let client = RiotClient::new("RGAPI-test", &server.url()).unwrap();
    let result = client
        .get_match_json("../../../../riot/account/v1/accounts/by-riot-id/Faker/KR1")
        .await;

    account.assert_async().await;
    assert!(matches!(result, Err(RiotApiError::Status { .. })));
}

#[tokio::test]
async fn encoded_match_id_is_requested_verbatim() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/lol/match/v5/matches/EUW1%2F1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"metadata":{"matchId":"EUW1/1"}}"#)
        .create_async()
        .await;

    let client = RiotClient::new("RGAPI-test", &server.url()).unwrap();
    let details = client.get_match_json("EUW1/1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(details["metadata"]["matchId"], "EUW1/1");
}

#[tokio::test]
async fn dot_segments_are_rejected_before_any_request() {
    let client = RiotClient::new("RGAPI-test", "http://127.0.0.1:1").unwrap();

    for bad in ["..", ".", ""] {
        let err = client.get_match_timeline_json(bad).await.unwrap_err();
        assert!(matches!(err, RiotApiError::InvalidParameter(ref p) if p == bad));
    }
    let err = client.get_puuid("..", "EUW").await.unwrap_err();
    assert!(matches!(err, RiotApiError::InvalidParameter(_)));
}

#[test]
fn base_url_must_be_hierarchical() {
    assert!(RiotClient::new("RGAPI-test", "not a url").is_err());
    assert!(RiotClient::new("RGAPI-test", "mailto:riot@example.com").is_err());
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/lol/match/v5/matches/EUW1_1")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = RiotClient::new("RGAPI-test", &server.url()).unwrap();
    let err = client.get_match_json("EUW1_1").await.unwrap_err();

    assert!(matches!(err, RiotApiError::Decode { .. }));
}

#[tokio::test]
async fn timeline_failure_fails_the_whole_summary() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/lol/match/v5/matches/EUW1_1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "info": { "participants": [{ "puuid": "p", "participantId": 1 }] } })
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/lol/match/v5/matches/EUW1_1/timeline")
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let client = RiotClient::new("RGAPI-test", &server.url()).unwrap();
    let err = fetch_player_summary(&client, "p", "EUW1_1").await.unwrap_err();

    assert!(matches!(err, SummaryError::Upstream(RiotApiError::Status { .. })));
}
