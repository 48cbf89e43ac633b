//! Request preview
//!
//! Converts one message into every provider's HTTP request and prints the
//! response envelope. Pass a message as JSON to override the default, and set
//! `CHATWIRE_CONFIG` to a YAML file to apply provider settings.
//!
//! Run with: cargo run --example preview -- '{"role":"user","content":"Hi"}'

use chatwire_core::config::load_from_yaml;
use chatwire_core::Converter;
use tracing_subscriber::EnvFilter;

const DEFAULT_MESSAGE: &str = r#"{
    "role": "assistant",
    "content": [
        {"type": "think", "think": "The user wants a greeting.", "encrypted": "sig-demo"},
        {"type": "text", "text": "Hello! Let me look that up."}
    ],
    "tool_calls": [
        {"id": "call_1", "function": {"name": "lookup", "arguments": "{\"q\":\"greeting\"}"}}
    ]
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let converter = match std::env::var("CHATWIRE_CONFIG") {
        Ok(path) => match load_from_yaml(&path).and_then(|config| Converter::from_config(&config)) {
            Ok(converter) => converter,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => Converter::new(),
    };

    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    let response = converter.convert_json(&input);

    println!("Input valid: {}\n", response.success);
    if let Some(error) = &response.error {
        println!("Error: {}", error);
        return;
    }

    for (provider, result) in &response.results {
        match (&result.http_request, &result.error) {
            (Some(request), _) => {
                println!("== {} ==", provider);
                println!("{} {}", request.method.as_str(), request.url);
                for (name, value) in request.headers.iter() {
                    println!("{}: {}", name, value);
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&request.body).unwrap_or_default()
                );
                for reason in &result.lossy_reasons {
                    println!("lossy: {}", reason);
                }
            }
            (None, Some(error)) => println!("== {} ==\nerror: {}", provider, error),
            (None, None) => {}
        }
        println!();
    }
}
