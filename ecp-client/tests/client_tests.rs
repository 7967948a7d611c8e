//! HTTP-level tests for the ECP client against a mock device.

use ecp_client::{Application, CommandBatch, EcpClient, EcpError, Key};
use mockito::Server;
use rstest::rstest;

const DEVICE_INFO: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<device-info>
    <serial-number>X00400ABCDEF</serial-number>
    <vendor-name>Roku</vendor-name>
    <model-name>Roku Ultra</model-name>
    <user-device-name>Living Room</user-device-name>
    <default-device-name>Roku Ultra - X00400ABCDEF</default-device-name>
</device-info>"#;

const APPS: &str = r#"<apps>
    <app id="12" type="appl" version="4.2">Netflix</app>
    <app id="837" type="appl" version="1.0">YouTube</app>
</apps>"#;

#[tokio::test]
async fn test_info_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/query/device-info")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(DEVICE_INFO)
        .create_async()
        .await;

    let client = EcpClient::with_base_url(server.url()).unwrap();
    let info = client.info().await.unwrap();

    assert_eq!(info.serial_number, "X00400ABCDEF");
    assert_eq!(info.user_device_name, "Living Room");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_apps_query() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/query/apps")
        .with_status(200)
        .with_body(APPS)
        .create_async()
        .await;

    let client = EcpClient::with_base_url(server.url()).unwrap();
    let apps = client.apps().await.unwrap();

    assert_eq!(
        apps,
        vec![
            Application::new("12", "Netflix"),
            Application::new("837", "YouTube")
        ]
    );
}

#[rstest]
#[case(r#"<active-app><app id="837" type="appl">YouTube</app></active-app>"#, Some("837"))]
#[case("<active-app><app>Roku</app></active-app>", None)]
#[tokio::test]
async fn test_active_query(#[case] body: &str, #[case] expected: Option<&str>) {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/query/active-app")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = EcpClient::with_base_url(server.url()).unwrap();
    let active = client.active().await.unwrap();

    assert_eq!(active.map(|a| a.id), expected.map(str::to_string));
}

#[tokio::test]
async fn test_launch_posts_app_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/launch/12")
        .with_status(200)
        .create_async()
        .await;

    let client = EcpClient::with_base_url(server.url()).unwrap();
    client.launch("12").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_presses_every_key() {
    let mut server = Server::new_async().await;
    let volume_up = server
        .mock("POST", "/keypress/VolumeUp")
        .with_status(200)
        .expect(10)
        .create_async()
        .await;

    let client = EcpClient::with_base_url(server.url()).unwrap();
    client
        .send(&CommandBatch::new().keypress(Key::VolumeUp, 10))
        .await
        .unwrap();
    volume_up.assert_async().await;
}

#[tokio::test]
async fn test_send_stops_at_first_failure() {
    let mut server = Server::new_async().await;
    let down = server
        .mock("POST", "/keypress/VolumeDown")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;
    let up = server
        .mock("POST", "/keypress/VolumeUp")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let client = EcpClient::with_base_url(server.url()).unwrap();
    let result = client
        .send(&CommandBatch::new().volume_down().volume_up())
        .await;

    assert!(matches!(result, Err(EcpError::Status(503))));
    down.assert_async().await;
    up.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/query/device-info")
        .with_status(403)
        .create_async()
        .await;

    let client = EcpClient::with_base_url(server.url()).unwrap();
    assert!(matches!(client.info().await, Err(EcpError::Status(403))));
}

#[tokio::test]
async fn test_unreachable_device_is_network_error() {
    // Port 9 (discard) on localhost is expected to refuse connections.
    let client = EcpClient::with_base_url("http://127.0.0.1:9").unwrap();
    assert!(matches!(client.apps().await, Err(EcpError::Network(_))));
}
