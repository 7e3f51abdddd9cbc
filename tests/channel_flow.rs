//! Channel lifecycle: CREATECHAN, JOIN, LIST, USERS, teardown.

mod common;

use common::{TestClient, TestServer};
use serde_json::json;

#[tokio::test]
async fn test_create_join_broadcast_and_succession() {
    let server = TestServer::start().await;
    let mut ada = TestClient::connect(server.addr()).await;
    let mut bob = TestClient::connect(server.addr()).await;
    ada.login("ada").await;
    bob.login("bob").await;

    ada.send(json!({ "CREATECHAN": { "NAME": "lobby" } })).await;
    assert_eq!(
        ada.recv().await["SUCCESS"]["MESSAGE"],
        "Channel lobby created successfully"
    );

    bob.send(json!({ "JOIN": { "CHANNELS": ["lobby"] } })).await;
    let hist = bob.recv().await;
    assert_eq!(hist["CHANHIST"]["CHANNEL"], "lobby");
    let joined = bob.recv().await;
    assert_eq!(joined["SUCCESS"][0]["STATUS"], 200);
    assert_eq!(
        joined["SUCCESS"][0]["MESSAGE"],
        "Channel lobby joined successfully."
    );
    assert_eq!(joined["ERROR"].as_array().unwrap().len(), 0);

    ada.send(json!({ "SENDMSG": { "MESSAGE": "hello", "CHANNELS": ["lobby"] } }))
        .await;

    // Sender is a member, so the broadcast reaches both; every recipient
    // sees the same TIME stamp.
    let seen_by_ada = ada.recv().await;
    let seen_by_bob = bob.recv().await;
    assert_eq!(seen_by_ada["CHANMSG"]["CHANNEL"], "lobby");
    assert_eq!(seen_by_ada["CHANMSG"]["FROM"], "ada");
    assert_eq!(seen_by_ada["CHANMSG"]["MESSAGE"], "hello");
    assert_eq!(seen_by_ada["CHANMSG"]["TIME"], seen_by_bob["CHANMSG"]["TIME"]);

    let confirmation = ada.recv().await;
    assert_eq!(
        confirmation["SUCCESS"][0]["MESSAGE"],
        "Message sent to channel lobby."
    );

    // The moderator quits; the channel survives under a new moderator.
    ada.send(json!({ "QUIT": null })).await;
    ada.expect_goodbye().await;
    ada.expect_closed().await;

    bob.send(json!({ "USERS": { "NAME": "lobby" } })).await;
    assert_eq!(bob.recv().await["SUCCESS"]["MESSAGE"], json!(["bob"]));
}

#[tokio::test]
async fn test_join_unknown_channel_aggregates_404() {
    let server = TestServer::start().await;
    let mut client = TestClient::connect(server.addr()).await;

    client.send(json!({ "JOIN": { "CHANNELS": ["ghost"] } })).await;
    let response = client.recv().await;
    assert_eq!(response["SUCCESS"].as_array().unwrap().len(), 0);
    assert_eq!(response["ERROR"][0]["STATUS"], 404);
    assert_eq!(response["ERROR"][0]["MESSAGE"], "Channel ghost does not exist.");
}

#[tokio::test]
async fn test_joining_twice_is_already_member() {
    let server = TestServer::start().await;
    let mut client = TestClient::connect(server.addr()).await;
    client.login("ada").await;

    client.send(json!({ "CREATECHAN": { "NAME": "lobby" } })).await;
    client.recv().await;

    // The creator is already a member.
    client.send(json!({ "JOIN": { "CHANNELS": ["lobby"] } })).await;
    let response = client.recv().await;
    assert_eq!(response["ERROR"][0]["STATUS"], 402);
    assert_eq!(
        response["ERROR"][0]["MESSAGE"],
        "User ada already in channel lobby"
    );
}

#[tokio::test]
async fn test_join_with_string_channels_is_malformed() {
    let server = TestServer::start().await;
    let mut client = TestClient::connect(server.addr()).await;

    client.send(json!({ "JOIN": { "CHANNELS": "lobby" } })).await;
    let response = client.recv().await;
    assert_eq!(response["ERROR"]["STATUS"], 401);
    assert_eq!(
        response["ERROR"]["MESSAGE"],
        "Malformed request. Channel names must be passed as a list"
    );
}

#[tokio::test]
async fn test_duplicate_channel_is_conflict() {
    let server = TestServer::start().await;
    let mut client = TestClient::connect(server.addr()).await;

    client.send(json!({ "CREATECHAN": { "NAME": "lobby" } })).await;
    client.recv().await;

    client.send(json!({ "CREATECHAN": { "NAME": "lobby" } })).await;
    let response = client.recv().await;
    assert_eq!(response["ERROR"]["STATUS"], 409);
    assert_eq!(response["ERROR"]["MESSAGE"], "Channel lobby already exists");
}

#[tokio::test]
async fn test_list_supports_filter() {
    let server = TestServer::start().await;
    let mut client = TestClient::connect(server.addr()).await;

    for name in ["lobby", "dev", "devops"] {
        client.send(json!({ "CREATECHAN": { "NAME": name } })).await;
        client.recv().await;
    }

    client.send(json!({ "LIST": null })).await;
    assert_eq!(
        client.recv().await["SUCCESS"]["MESSAGE"],
        json!(["dev", "devops", "lobby"])
    );

    // Unanchored search, so "dev" matches "devops" too.
    client.send(json!({ "LIST": { "FILTER": "dev" } })).await;
    assert_eq!(
        client.recv().await["SUCCESS"]["MESSAGE"],
        json!(["dev", "devops"])
    );

    client.send(json!({ "LIST": { "FILTER": "[" } })).await;
    let response = client.recv().await;
    assert_eq!(response["ERROR"]["STATUS"], 401);
    assert_eq!(
        response["ERROR"]["MESSAGE"],
        "Malformed request. Invalid FILTER pattern."
    );
}

#[tokio::test]
async fn test_users_requires_channel_name() {
    let server = TestServer::start().await;
    let mut client = TestClient::connect(server.addr()).await;

    client.send(json!({ "USERS": {} })).await;
    let response = client.recv().await;
    assert_eq!(response["ERROR"]["STATUS"], 401);
    assert_eq!(
        response["ERROR"]["MESSAGE"],
        "Malformed request. Must send name of channel."
    );

    client.send(json!({ "USERS": { "NAME": "ghost" } })).await;
    let response = client.recv().await;
    assert_eq!(response["ERROR"]["STATUS"], 404);
    assert_eq!(response["ERROR"]["MESSAGE"], "Channel ghost does not exist.");
}

#[tokio::test]
async fn test_users_listing_is_sorted_and_filtered() {
    let server = TestServer::start().await;
    let mut ada = TestClient::connect(server.addr()).await;
    let mut bob = TestClient::connect(server.addr()).await;
    ada.login("ada").await;
    bob.login("bob").await;

    ada.send(json!({ "CREATECHAN": { "NAME": "lobby" } })).await;
    ada.recv().await;
    bob.send(json!({ "JOIN": { "CHANNELS": ["lobby"] } })).await;
    bob.recv().await;
    bob.recv().await;

    ada.send(json!({ "USERS": { "NAME": "lobby" } })).await;
    assert_eq!(ada.recv().await["SUCCESS"]["MESSAGE"], json!(["ada", "bob"]));

    ada.send(json!({ "USERS": { "NAME": "lobby", "FILTER": "^b" } }))
        .await;
    assert_eq!(ada.recv().await["SUCCESS"]["MESSAGE"], json!(["bob"]));
}
