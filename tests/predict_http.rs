//! Drives `PredictClient` against a throwaway HTTP server on 127.0.0.1.

use emotion_predict_cli::api::{PredictClient, UNKNOWN_EMOTION};
use emotion_predict_cli::asset::UploadedAsset;
use emotion_predict_cli::config::ClientConfig;
use emotion_predict_cli::error::PredictError;
use emotion_predict_cli::render::{render_outcome, PanelKind};
use emotion_predict_cli::session::{Session, SessionState};

mod common;

use common::{closed_port, TestServer};

fn wav_asset() -> UploadedAsset {
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&[0u8; 40]);
    UploadedAsset::new(bytes, "audio/wav", "clip.wav")
}

#[test]
fn happy_response_is_parsed_and_rendered() {
    let server = TestServer::start("200 OK", r#"{"emotion": "happy"}"#);
    let client = PredictClient::new(server.config()).unwrap();

    let outcome = client.submit(&wav_asset());
    let result = outcome.clone().unwrap();
    assert_eq!(result.emotion, "happy");
    assert_eq!(result.probabilities, None);
    assert_eq!(render_outcome(&outcome).title, "Predicted emotion: HAPPY 😊");

    let (request, connections) = server.finish();
    assert_eq!(connections, 1);
    assert!(request.starts_with("POST /predict HTTP/1.1"));
    let lower = request.to_ascii_lowercase();
    assert!(lower.contains("content-type: multipart/form-data"));
    assert!(request.contains(r#"name="my_file""#));
    assert!(request.contains(r#"filename="clip.wav""#));
    assert!(lower.contains("content-type: audio/wav"));
}

#[test]
fn probabilities_are_passed_through() {
    let server = TestServer::start(
        "200 OK",
        r#"{"emotion": "sad", "probabilities": {"sad": 0.7, "happy": 0.3}}"#,
    );
    let client = PredictClient::new(server.config()).unwrap();

    let outcome = client.submit(&wav_asset());
    let panel = render_outcome(&outcome);
    assert_eq!(panel.kind, PanelKind::Success);
    assert!(panel.title.contains("SAD"));
    assert_eq!(panel.lines.len(), 2);
    server.finish();
}

#[test]
fn unknown_shape_falls_back_to_default_label() {
    let server = TestServer::start("200 OK", r#"{"label": "happy"}"#);
    let client = PredictClient::new(server.config()).unwrap();
    assert_eq!(client.submit(&wav_asset()).unwrap().emotion, UNKNOWN_EMOTION);
    server.finish();
}

#[test]
fn plain_text_body_is_a_decode_failure() {
    let server = TestServer::start("200 OK", "OK");
    let client = PredictClient::new(server.config()).unwrap();

    let outcome = client.submit(&wav_asset());
    assert_eq!(outcome, Err(PredictError::Decode("OK".into())));
    let panel = render_outcome(&outcome);
    assert_eq!(panel.kind, PanelKind::DecodeError);
    assert!(panel.to_string().contains("OK"));
    server.finish();
}

#[test]
fn error_status_is_a_network_failure_without_retry() {
    let server = TestServer::start("500 Internal Server Error", r#"{"detail": "boom"}"#);
    let client = PredictClient::new(server.config()).unwrap();

    match client.submit(&wav_asset()) {
        Err(PredictError::Network(reason)) => assert!(reason.contains("500")),
        other => panic!("expected network failure, got {:?}", other),
    }
    let (_, connections) = server.finish();
    assert_eq!(connections, 1);
}

#[test]
fn unreachable_endpoint_is_a_network_failure() {
    let config = ClientConfig {
        base_url: format!("http://127.0.0.1:{}", closed_port()),
        ..ClientConfig::default()
    };
    let client = PredictClient::new(config).unwrap();

    let outcome = client.submit(&wav_asset());
    match &outcome {
        Err(PredictError::Network(reason)) => assert!(!reason.is_empty()),
        other => panic!("expected network failure, got {:?}", other),
    }
    assert_eq!(render_outcome(&outcome).kind, PanelKind::NetworkError);
}

#[test]
fn configured_path_and_field_are_used() {
    let server = TestServer::start("200 OK", r#"{"emotion": "neutral"}"#);
    let config = ClientConfig {
        predict_path: "/predict/".into(),
        field_name: "file".into(),
        ..server.config()
    };
    let client = PredictClient::new(config).unwrap();
    assert_eq!(client.submit(&wav_asset()).unwrap().emotion, "neutral");

    let (request, _) = server.finish();
    assert!(request.starts_with("POST /predict/ HTTP/1.1"));
    assert!(request.contains(r#"name="file""#));
}

#[test]
fn session_drives_the_real_client() {
    let server = TestServer::start("200 OK", r#"{"emotion": "zorp"}"#);
    let client = PredictClient::new(server.config()).unwrap();

    let mut session = Session::new();
    session.begin_upload();
    assert!(session.accept(wav_asset()).is_none());
    let panel = session.submit(&client).unwrap();
    assert_eq!(panel.title, "Predicted emotion: ZORP");
    assert_eq!(session.state(), SessionState::Succeeded);
    server.finish();
}
