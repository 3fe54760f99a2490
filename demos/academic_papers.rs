//! Academic Papers Example
//!
//! Narrates short paper summaries with two narrators each. A failure on one
//! paper is reported and the remaining papers still run.
//!
//! # Running
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run --example academic_papers
//! ```

use dialogue_tts::{dialogues, Config, SpeakerDescriptor, SpeechSynthesizer};

const PAPERS: &[(&str, &str, [(&str, &str); 2], &str)] = &[
    (
        "GneissWeb: Preparing High Quality Data for LLMs at Scale",
        "gneiss_web",
        [("Narrator 1", "kore"), ("Narrator 2", "charon")],
        "gneiss_web_paper.wav",
    ),
    (
        "A ML-LLM Pairing for Better Code Comment Classification",
        "code_comment_classification",
        [("NARRATOR 1", "puck"), ("NARRATOR 2", "zephyr")],
        "code_comment_paper.wav",
    ),
    (
        "The FineWeb Datasets",
        "fineweb_datasets",
        [("Narrator 1", "aoede"), ("Narrator 2", "orus")],
        "fineweb_paper.wav",
    ),
    (
        "DataComp-LM",
        "datacomp_lm",
        [("Narrator 1", "leda"), ("Narrator 2", "fenrir")],
        "datacomp_lm_paper.wav",
    ),
    (
        "The RefinedWeb Dataset for Falcon LLM",
        "refined_web",
        [("Narrator 1", "algieba"), ("Narrator 2", "schedar")],
        "refined_web_paper.wav",
    ),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    if config.api.api_key.is_none() {
        anyhow::bail!("GEMINI_API_KEY environment variable not set");
    }
    let synthesizer = SpeechSynthesizer::from_config(&config)?;

    for (title, key, narrators, output) in PAPERS {
        println!("Paper: {}", title);

        let speakers: Vec<SpeakerDescriptor> = narrators
            .iter()
            .map(|(name, voice)| SpeakerDescriptor::new(*name, *voice))
            .collect();

        let result = dialogues::get_dialogue(&config.dialogues.path, "academic_papers_demo", key)
            .and_then(|entry| {
                synthesizer.text_to_speech_multi_speaker(&entry.to_dialogue_text(), &speakers, output)
            });

        match result {
            Ok(()) => println!("  saved {}", output),
            Err(e) => eprintln!("  failed: {}", e),
        }
    }

    Ok(())
}
