//! Simple TTS Example
//!
//! Single-speaker synthesis with and without a style instruction.
//!
//! # Running
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run --example simple_tts
//! ```

use dialogue_tts::{Config, Result, SpeechSynthesizer};

fn main() -> Result<()> {
    // Initialize logging (optional)
    tracing_subscriber::fmt::init();

    let synthesizer = SpeechSynthesizer::from_config(&Config::from_env())?;

    println!("Example 1: Basic TTS");
    synthesizer.text_to_speech(
        "Hello! This is a simple text-to-speech example using Google Gemini API.",
        "kore",
        "basic_example.wav",
    )?;

    println!("Example 2: TTS with style");
    synthesizer.text_to_speech_with_style(
        "Welcome to the wonderful world of artificial intelligence!",
        "Say cheerfully and enthusiastically:",
        "puck",
        "cheerful_example.wav",
    )?;

    println!("Example 3: Mysterious style");
    synthesizer.text_to_speech_with_style(
        "In the depths of the digital realm, secrets await discovery.",
        "Say in a mysterious whisper:",
        "enceladus",
        "mysterious_example.wav",
    )?;

    println!("Generated basic_example.wav, cheerful_example.wav, mysterious_example.wav");
    Ok(())
}
