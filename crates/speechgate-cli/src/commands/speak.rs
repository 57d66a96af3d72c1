use std::fs;
use std::io::Read;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use colored::Colorize;
use serde_json::Value;

use crate::cli::SpeakArgs;
use crate::client::SpeechgateClient;
use crate::output::print_success;

pub async fn speak(client: &SpeechgateClient, args: &SpeakArgs) -> Result<()> {
    let text = read_text(args)?;
    if text.trim().is_empty() {
        anyhow::bail!("Nothing to speak: the text is empty");
    }

    let response = client.generate(&text, args).await?;
    let audio = decode_audio(&response)?;
    fs::write(&args.out, &audio)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    print_success(&format!(
        "Wrote {} bytes of audio to {}",
        audio.len(),
        args.out.display().to_string().cyan()
    ));

    if let Some(path) = &args.alignment {
        let alignment = response
            .get("alignment")
            .context("Response carries no alignment")?;
        fs::write(path, serde_json::to_string_pretty(alignment)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        print_success(&format!(
            "Wrote alignment to {}",
            path.display().to_string().cyan()
        ));
    }
    Ok(())
}

fn read_text(args: &SpeakArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    Ok(text)
}

fn decode_audio(response: &Value) -> Result<Vec<u8>> {
    let encoded = response
        .get("audio_base64")
        .and_then(|v| v.as_str())
        .context("Response carries no audio_base64")?;
    STANDARD
        .decode(encoded)
        .context("audio_base64 is not valid base64")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_audio_field() {
        let audio = decode_audio(&json!({"audio_base64": "SUQz"})).unwrap();
        assert_eq!(audio, b"ID3");
    }

    #[test]
    fn missing_or_broken_audio_is_an_error() {
        assert!(decode_audio(&json!({"alignment": {}})).is_err());
        assert!(decode_audio(&json!({"audio_base64": "***"})).is_err());
    }
}
