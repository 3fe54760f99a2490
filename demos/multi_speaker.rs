//! Multi-Speaker Example
//!
//! Two-speaker conversations built from inline text, from a script of
//! `(speaker, line)` pairs, and from the bundled dialogue file.
//!
//! # Running
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run --example multi_speaker
//! ```

use dialogue_tts::{dialogues, format_script, Config, Result, SpeakerDescriptor, SpeechSynthesizer};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let synthesizer = SpeechSynthesizer::from_config(&config)?;

    println!("Demo 1: Podcast conversation");
    let podcast = dialogues::get_dialogue(&config.dialogues.path, "multi_speaker_demo", "podcast")?;
    synthesizer.text_to_speech_multi_speaker(
        &podcast.to_dialogue_text(),
        &[
            SpeakerDescriptor::new("Host", "puck"),
            SpeakerDescriptor::new("Dr. Chen", "kore"),
        ],
        "podcast_demo.wav",
    )?;

    println!("Demo 2: Customer service call");
    let script = [
        ("Agent", "Hello! Thank you for calling TechSupport. How can I help you today?"),
        ("Customer", "Hi! My smart speaker stopped responding to voice commands."),
        ("Agent", "Let's start by checking that it is connected to your WiFi network."),
        ("Customer", "It shows as connected... and now it's working again. Thanks!"),
    ];
    synthesizer.text_to_speech_multi_speaker(
        &format_script(&script),
        &[
            SpeakerDescriptor::new("Agent", "callirrhoe"),
            SpeakerDescriptor::new("Customer", "leda"),
        ],
        "customer_service_demo.wav",
    )?;

    println!("Demo 3: Casual chat from the dialogue file");
    let casual = dialogues::get_dialogue(&config.dialogues.path, "gemini_tts_example", "casual_script")?;
    synthesizer.text_to_speech_multi_speaker(
        &casual.to_dialogue_text(),
        &[
            SpeakerDescriptor::new("Emma", "leda"),
            SpeakerDescriptor::new("Alex", "puck"),
        ],
        "casual_chat.wav",
    )?;

    println!("Demo 4: Styled conversation");
    let styled = dialogues::get_dialogue(&config.dialogues.path, "gemini_tts_example", "styled_dialogue")?;
    synthesizer.text_to_speech_multi_speaker(
        &styled.to_dialogue_text(),
        &[
            SpeakerDescriptor::new("Alice", "fenrir"),
            SpeakerDescriptor::new("Bob", "algieba"),
        ],
        "styled_conversation.wav",
    )?;

    Ok(())
}
