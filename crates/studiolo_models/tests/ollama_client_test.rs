//! Tests for the Ollama driver against a live server.
//!
//! These tests require Ollama running locally with the default model pulled:
//! Install Ollama: https://ollama.ai/download
//! Pull model: ollama pull qwen2.5:7b
//!
//! Run with: cargo test --package studiolo_models -- --ignored

use futures::StreamExt;
use studiolo_admission::ResilientClient;
use studiolo_core::{ChatMessage, GenerateRequest};
use studiolo_error::{OllamaErrorKind, StudioloErrorKind};
use studiolo_interface::StudioloDriver;
use studiolo_models::{OllamaClient, OllamaConfig};
use tokio_util::sync::CancellationToken;

#[tokio::test]
#[ignore] // Requires Ollama running locally
async fn basic_generation() -> Result<(), Box<dyn std::error::Error>> {
    let client = OllamaClient::localhost()?;

    client.validate().await?;

    let request = GenerateRequest::new("Reply with the single word: hello").with_temperature(0.0);
    let response = client.generate(&request, &CancellationToken::new()).await?;

    assert!(!response.content().is_empty());
    assert!(*response.done());
    println!("Response: {}", response.content());
    Ok(())
}

#[tokio::test]
#[ignore]
async fn streaming_accumulates_the_full_answer() -> Result<(), Box<dyn std::error::Error>> {
    let client = OllamaClient::localhost()?;

    client.validate().await?;

    let request = GenerateRequest::new("Count from 1 to 5, digits only.").with_temperature(0.0);
    let stream = client
        .generate_stream(&request, &CancellationToken::new())
        .await?;

    let chunks: Vec<_> = stream.collect().await;
    assert!(!chunks.is_empty());
    assert!(chunks.last().expect("at least one chunk").is_terminal());

    let text: String = chunks.iter().map(|c| c.content().as_str()).collect();
    assert!(!text.is_empty());
    println!("Streamed: {}", text);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn chat_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let client = OllamaClient::localhost()?;

    client.validate().await?;

    let messages = vec![
        ChatMessage::system("You are a terse assistant."),
        ChatMessage::user("What is 2+2? Answer with one digit."),
    ];
    let response = client
        .chat(&messages, Some(0.0), &CancellationToken::new())
        .await?;

    assert!(!response.content().is_empty());
    println!("Reply: {}", response.content());
    Ok(())
}

#[tokio::test]
#[ignore]
async fn missing_model_is_distinguished() -> Result<(), Box<dyn std::error::Error>> {
    let config = OllamaConfig::builder()
        .model("studiolo-does-not-exist:0b".to_string())
        .build();
    let client = OllamaClient::new(&config)?;

    let err = client.validate().await.expect_err("model is not installed");
    assert!(matches!(
        err.kind(),
        StudioloErrorKind::Ollama(o) if matches!(o.kind, OllamaErrorKind::ModelNotFound(_))
    ));
    Ok(())
}

#[tokio::test]
#[ignore]
async fn unreachable_server_is_distinguished() -> Result<(), Box<dyn std::error::Error>> {
    // Non-standard port where Ollama is unlikely to be listening.
    let config = OllamaConfig::builder()
        .base_url("http://localhost:11435".to_string())
        .build();
    let client = OllamaClient::new(&config)?;

    let err = client.validate().await.expect_err("nothing listens there");
    assert!(matches!(
        err.kind(),
        StudioloErrorKind::Ollama(o) if matches!(o.kind, OllamaErrorKind::ServerNotRunning(_))
    ));
    Ok(())
}

#[tokio::test]
#[ignore]
async fn gated_client_generates_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let client = ResilientClient::new(OllamaClient::localhost()?);

    let request = GenerateRequest::new("Name one prime number.").with_temperature(0.0);
    let response = client.generate(&request, &CancellationToken::new()).await?;

    assert!(!response.content().is_empty());
    Ok(())
}
