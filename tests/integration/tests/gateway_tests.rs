//! Gateway Integration Tests
//!
//! Drive the WebSocket gateway end to end next to the REST API.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use integration_tests::{
    assert_json, fixtures::*, test_config, GatewayClient, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Envelope
// ============================================================================

#[tokio::test]
async fn test_hello_and_heartbeat() {
    let server = TestServer::start().await.unwrap();
    let mut client = GatewayClient::connect(&server.gateway_url()).await.unwrap();
    assert_eq!(client.heartbeat_interval, 45_000);

    client.heartbeat(None).await.unwrap();
    let ack = client.next_envelope().await.unwrap();
    assert_eq!(ack["op"], 11);
}

#[tokio::test]
async fn test_unknown_opcode_closes() {
    let server = TestServer::start().await.unwrap();
    let mut client = GatewayClient::connect(&server.gateway_url()).await.unwrap();

    client.send_raw(json!({ "op": 99 }).to_string()).await.unwrap();
    assert_eq!(client.expect_close().await.unwrap(), 4001);
}

#[tokio::test]
async fn test_garbage_frame_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = GatewayClient::connect(&server.gateway_url()).await.unwrap();

    client.send_raw("{not json".to_string()).await.unwrap();
    assert_eq!(client.expect_close().await.unwrap(), 4002);
}

#[tokio::test]
async fn test_binary_frame_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = GatewayClient::connect(&server.gateway_url()).await.unwrap();

    client.send_binary(vec![1, 2, 3]).await.unwrap();
    assert_eq!(client.expect_close().await.unwrap(), 4002);
}

#[tokio::test]
async fn test_silent_connection_times_out() {
    let mut config = test_config();
    config.chat.heartbeat_interval_ms = 100;
    config.chat.heartbeat_timeout_ms = 300;
    let server = TestServer::start_with_config(config).await.unwrap();

    let mut client = GatewayClient::connect(&server.gateway_url()).await.unwrap();
    assert_eq!(client.expect_close().await.unwrap(), 4009);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_authenticate_sequence() {
    let server = TestServer::start().await.unwrap();
    let (_, auth) = server.register_unique().await.unwrap();
    let mut client = GatewayClient::connect(&server.gateway_url()).await.unwrap();

    client
        .emit("authenticate", json!({ "token": auth.token }))
        .await
        .unwrap();

    let authenticated = client.next_dispatch().await.unwrap();
    assert_eq!(authenticated.event, "authenticated");
    assert_eq!(authenticated.seq, Some(1));
    assert_eq!(authenticated.data["user"]["id"], auth.user.id.as_str());
    assert!(authenticated.data["groups"].is_array());

    let joined = client.next_dispatch().await.unwrap();
    assert_eq!(joined.event, "user-joined");
    assert_eq!(joined.data["userId"], auth.user.id.as_str());
    assert_eq!(joined.data["room"], "general");

    let history = client.next_dispatch().await.unwrap();
    assert_eq!(history.event, "message-history");
    assert_eq!(history.data, json!([]));

    let online = client.next_dispatch().await.unwrap();
    assert_eq!(online.event, "online-users");
    assert_eq!(online.data.as_array().unwrap().len(), 1);
    assert_eq!(online.data[0]["currentRoom"], "general");
}

#[tokio::test]
async fn test_authenticate_with_bad_token() {
    let server = TestServer::start().await.unwrap();
    let mut client = GatewayClient::connect(&server.gateway_url()).await.unwrap();

    client
        .emit("authenticate", json!({ "token": "garbage" }))
        .await
        .unwrap();

    let error = client.next_dispatch().await.unwrap();
    assert_eq!(error.event, "auth-error");
    assert_eq!(error.data["error"], "Invalid token");

    // The socket stays usable
    client.heartbeat(None).await.unwrap();
    assert_eq!(client.next_envelope().await.unwrap()["op"], 11);
}

#[tokio::test]
async fn test_events_before_authentication_are_rejected() {
    let server = TestServer::start().await.unwrap();
    let mut client = GatewayClient::connect(&server.gateway_url()).await.unwrap();

    client
        .emit("send-message", json!({ "text": "hi" }))
        .await
        .unwrap();

    let error = client.next_dispatch().await.unwrap();
    assert_eq!(error.event, "error");
    assert!(error.data["message"].is_string());
}

// ============================================================================
// Rooms
// ============================================================================

#[tokio::test]
async fn test_history_replayed_to_late_joiner() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();

    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();
    a.emit("send-message", json!({ "text": "hi" })).await.unwrap();
    let echoed = a.wait_for("new-message").await.unwrap();
    assert_eq!(echoed.data["text"], "hi");
    assert_eq!(echoed.data["username"], alice.user.username.as_str());

    let mut b = GatewayClient::connect(&server.gateway_url()).await.unwrap();
    b.emit("authenticate", json!({ "token": bob.token })).await.unwrap();
    let history = b.wait_for("message-history").await.unwrap();
    let messages = history.data.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["text"], "hi");
    assert_eq!(messages[0]["userId"], alice.user.id.as_str());

    // Alice sees Bob arrive
    let joined = a.wait_for("user-joined").await.unwrap();
    assert_eq!(joined.data["userId"], bob.user.id.as_str());
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();

    a.emit("send-message", json!({ "text": "   " })).await.unwrap();
    let error = a.next_dispatch().await.unwrap();
    assert_eq!(error.event, "error");
}

#[tokio::test]
async fn test_create_group_announced_and_joined() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();

    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();
    let mut b = GatewayClient::connect_authenticated(&server.gateway_url(), &bob.token)
        .await
        .unwrap();

    a.emit("create-group", json!({ "name": "Rustaceans", "type": "public" }))
        .await
        .unwrap();

    let created = b.wait_for("group-created").await.unwrap();
    assert_eq!(created.data["name"], "Rustaceans");
    assert!(created.data.get("isAdmin").is_none());

    let joined = a.wait_for("group-joined").await.unwrap();
    let group_id = joined.data["groupId"].as_str().unwrap().to_string();
    assert!(group_id.starts_with("group_"));
    let arrived = a.next_dispatch().await.unwrap();
    assert_eq!(arrived.event, "user-joined");
    assert_eq!(arrived.data["room"], group_id.as_str());

    let response = server
        .get_auth("/api/v1/users/@me/groups", &alice.token)
        .await
        .unwrap();
    let groups: Vec<GroupResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let group = groups.iter().find(|g| g.id == group_id).expect("creator is a member");
    assert_eq!(group.is_admin, Some(true));
    assert_eq!(group.member_count, 1);
}

// ============================================================================
// Social
// ============================================================================

#[tokio::test]
async fn test_friend_request_to_offline_user() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();

    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();
    a.emit(
        "send-friend-request",
        json!({ "username": bob.user.username }),
    )
    .await
    .unwrap();
    let sent = a.wait_for("friend-request-sent").await.unwrap();
    assert_eq!(sent.data["success"], true);

    let response = server
        .get_auth("/api/v1/users/@me/friend-requests", &bob.token)
        .await
        .unwrap();
    let requests: Vec<FriendRequestResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].from.id, alice.user.id);
    assert!(!requests[0].timestamp.is_empty());
}

#[tokio::test]
async fn test_friend_request_accepted_live() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();

    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();
    let mut b = GatewayClient::connect_authenticated(&server.gateway_url(), &bob.token)
        .await
        .unwrap();

    a.emit(
        "send-friend-request",
        json!({ "username": bob.user.username }),
    )
    .await
    .unwrap();

    let received = b.wait_for("friend-request-received").await.unwrap();
    assert_eq!(received.data["from"]["id"], alice.user.id.as_str());
    let request_id = received.data["requestId"].clone();

    b.emit("accept-friend-request", json!({ "requestId": request_id }))
        .await
        .unwrap();
    let added = b.wait_for("friend-added").await.unwrap();
    assert_eq!(added.data["user"]["id"], alice.user.id.as_str());

    let accepted = a.wait_for("friend-request-accepted").await.unwrap();
    assert_eq!(accepted.data["user"]["id"], bob.user.id.as_str());

    let response = server
        .get_auth("/api/v1/users/@me/friends", &alice.token)
        .await
        .unwrap();
    let friends: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["id"], bob.user.id.as_str());
}

// ============================================================================
// Disconnect
// ============================================================================

#[tokio::test]
async fn test_disconnect_cleans_up() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();

    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();
    let b = GatewayClient::connect_authenticated(&server.gateway_url(), &bob.token)
        .await
        .unwrap();
    a.wait_for("user-joined").await.unwrap();

    b.close().await.unwrap();

    let left = a.wait_for("user-left").await.unwrap();
    assert_eq!(left.data["userId"], bob.user.id.as_str());
    assert_eq!(left.data["room"], "general");

    let online = a.wait_for("online-users").await.unwrap();
    let users = online.data.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["userId"], alice.user.id.as_str());
}

// ============================================================================
// Rooms
// ============================================================================

/// Create a group from `client` and return its id once the creator is inside
async fn create_group(client: &mut GatewayClient, name: &str, kind: &str) -> String {
    client
        .emit("create-group", json!({ "name": name, "type": kind }))
        .await
        .unwrap();
    let joined = client.wait_for("group-joined").await.unwrap();
    joined.data["groupId"].as_str().unwrap().to_string()
}

fn roster_size(n: usize) -> impl Fn(&Value) -> bool {
    move |data| data.as_array().is_some_and(|users| users.len() == n)
}

#[tokio::test]
async fn test_join_private_group_rejected() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();
    let (_, carol) = server.register_unique().await.unwrap();

    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();
    let mut b = GatewayClient::connect_authenticated(&server.gateway_url(), &bob.token)
        .await
        .unwrap();
    let group_id = create_group(&mut a, "Secret", "private").await;
    b.wait_for("group-created").await.unwrap();

    b.emit("join-group", json!({ "groupId": group_id }))
        .await
        .unwrap();
    let error = b.wait_for("error").await.unwrap();
    assert_eq!(error.data["message"], "Cannot join private group without invitation");

    // Speaking into the room is refused the same way
    b.emit("voice-activity", json!({ "room": group_id, "isSpeaking": true }))
        .await
        .unwrap();
    let error = b.wait_for("error").await.unwrap();
    assert_eq!(error.data["message"], "Cannot join private group without invitation");

    // Bob is still subscribed to general
    let _c = GatewayClient::connect_authenticated(&server.gateway_url(), &carol.token)
        .await
        .unwrap();
    let arrived = b
        .wait_for_match("user-joined", |d| d["userId"] == carol.user.id.as_str())
        .await
        .unwrap();
    assert_eq!(arrived.data["room"], "general");

    let online = b.wait_for_match("online-users", roster_size(3)).await.unwrap();
    let me = online
        .data
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["userId"] == bob.user.id.as_str())
        .unwrap();
    assert_eq!(me["currentRoom"], "general");

    // Nothing about the refusal reached the group
    let seen = a.collect_until("online-users", roster_size(3)).await.unwrap();
    assert!(seen
        .iter()
        .all(|d| d.event != "error" && d.event != "voice-activity"));
}

#[tokio::test]
async fn test_join_unknown_group_rejected() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();

    a.emit("join-group", json!("group_424242")).await.unwrap();
    let error = a.next_dispatch().await.unwrap();
    assert_eq!(error.event, "error");
    assert_eq!(error.data["message"], "Group not found");

    a.emit("send-message", json!({ "text": "still here" }))
        .await
        .unwrap();
    let message = a.wait_for("new-message").await.unwrap();
    assert_eq!(message.data["room"], "general");
}

#[tokio::test]
async fn test_join_public_group_switches_rooms() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();
    let (_, carol) = server.register_unique().await.unwrap();

    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();
    let mut b = GatewayClient::connect_authenticated(&server.gateway_url(), &bob.token)
        .await
        .unwrap();
    let mut c = GatewayClient::connect_authenticated(&server.gateway_url(), &carol.token)
        .await
        .unwrap();
    let group_id = create_group(&mut a, "Open", "public").await;
    b.wait_for("group-created").await.unwrap();

    b.emit("join-group", json!({ "groupId": group_id }))
        .await
        .unwrap();

    let joined = b.wait_for("group-joined").await.unwrap();
    assert_eq!(joined.data["groupId"], group_id.as_str());
    assert_eq!(joined.data["group"]["isAdmin"], false);

    let left = c
        .wait_for_match("user-left", |d| d["userId"] == bob.user.id.as_str())
        .await
        .unwrap();
    assert_eq!(left.data["room"], "general");

    let arrived = a
        .wait_for_match("user-joined", |d| d["userId"] == bob.user.id.as_str())
        .await
        .unwrap();
    assert_eq!(arrived.data["room"], group_id.as_str());

    // The join is durable
    let response = server
        .get_auth("/api/v1/users/@me/groups", &bob.token)
        .await
        .unwrap();
    let groups: Vec<GroupResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(groups.iter().any(|g| g.id == group_id));
}

#[tokio::test]
async fn test_add_group_member_notifies_both_sides() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();

    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();
    let mut b = GatewayClient::connect_authenticated(&server.gateway_url(), &bob.token)
        .await
        .unwrap();
    let group_id = create_group(&mut a, "Invite only", "private").await;

    a.emit(
        "add-group-member",
        json!({ "groupId": group_id, "userId": bob.user.id }),
    )
    .await
    .unwrap();

    let added = b.wait_for("added-to-group").await.unwrap();
    assert_eq!(added.data["group"]["id"], group_id.as_str());

    let member = a.wait_for("member-added").await.unwrap();
    assert_eq!(member.data["user"]["id"], bob.user.id.as_str());

    // Membership now lets Bob in
    b.emit("join-group", json!({ "groupId": group_id }))
        .await
        .unwrap();
    let joined = b.wait_for("group-joined").await.unwrap();
    assert_eq!(joined.data["groupId"], group_id.as_str());
}

// ============================================================================
// Voice
// ============================================================================

#[tokio::test]
async fn test_voice_join_and_offer_relay() {
    let server = TestServer::start().await.unwrap();
    let (_, alice) = server.register_unique().await.unwrap();
    let (_, bob) = server.register_unique().await.unwrap();

    let mut a = GatewayClient::connect_authenticated(&server.gateway_url(), &alice.token)
        .await
        .unwrap();
    let mut b = GatewayClient::connect_authenticated(&server.gateway_url(), &bob.token)
        .await
        .unwrap();

    a.emit("join-voice-chat", json!({ "room": "general" }))
        .await
        .unwrap();
    let roster = a.wait_for("voice-participants-list").await.unwrap();
    assert_eq!(roster.data.as_array().unwrap().len(), 1);

    b.emit("join-voice-chat", json!({ "room": "general" }))
        .await
        .unwrap();
    let roster = b.wait_for("voice-participants-list").await.unwrap();
    assert_eq!(roster.data.as_array().unwrap().len(), 2);

    let newcomer = a.wait_for("voice-user-joined").await.unwrap();
    assert_eq!(newcomer.data["userId"], bob.user.id.as_str());

    b.emit(
        "voice-offer",
        json!({ "to": alice.user.id, "room": "general", "offer": { "sdp": "v=0" } }),
    )
    .await
    .unwrap();
    let offer = a.wait_for("voice-offer").await.unwrap();
    assert_eq!(offer.data["from"], bob.user.id.as_str());
    assert_eq!(offer.data["room"], "general");
    assert_eq!(offer.data["offer"]["sdp"], "v=0");

    b.emit("leave-voice-chat", json!({ "room": "general" }))
        .await
        .unwrap();
    let left = a.wait_for("voice-user-left").await.unwrap();
    assert_eq!(left.data["userId"], bob.user.id.as_str());
    assert_eq!(left.data["room"], "general");
}
