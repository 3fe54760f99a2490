//! Dialogue TTS - command line driver
//!
//! Synthesizes single-speaker text or two-speaker dialogue with Gemini TTS
//! and writes the result to a WAV file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialogue_tts::{dialogues, Config, DialogueStore, SpeakerDescriptor, SpeechSynthesizer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Override the model id (e.g. gemini-2.5-pro-preview-tts)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read text with a single voice
    Speak {
        /// Text to synthesize
        text: String,
        /// Prebuilt voice name
        #[arg(long, default_value = dialogue_tts::models::DEFAULT_VOICE)]
        voice: String,
        /// Style instruction prepended to the text, e.g. "Say cheerfully:"
        #[arg(long)]
        style: Option<String>,
        #[arg(short, long, default_value = "output.wav")]
        output: PathBuf,
    },
    /// Read a two-speaker dialogue
    Dialogue {
        /// Inline dialogue text ("Name: line" per line)
        #[arg(long, conflicts_with_all = ["section", "key"])]
        text: Option<String>,
        /// Dialogue file section
        #[arg(long, requires = "key")]
        section: Option<String>,
        /// Scenario key within the section
        #[arg(long, requires = "section")]
        key: Option<String>,
        /// Speaker binding as NAME=VOICE, given twice
        #[arg(long = "speaker", required = true)]
        speakers: Vec<SpeakerDescriptor>,
        #[arg(short, long, default_value = "multi_speaker.wav")]
        output: PathBuf,
    },
    /// List dialogue sections and scenario keys
    List,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dialogue_tts=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file found: {}", e);
    }

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(model) = cli.model {
        config.api.model = model;
    }

    tracing::debug!("Model: {}", config.api.model);
    tracing::debug!("Dialogues: {}", config.dialogues.path.display());

    match cli.command {
        Command::Speak {
            text,
            voice,
            style,
            output,
        } => {
            let synthesizer = SpeechSynthesizer::from_config(&config)?;
            match style {
                Some(style) => {
                    synthesizer.text_to_speech_with_style(&text, &style, &voice, &output)?
                }
                None => synthesizer.text_to_speech(&text, &voice, &output)?,
            }
            println!("Saved to: {}", output.display());
        }
        Command::Dialogue {
            text,
            section,
            key,
            speakers,
            output,
        } => {
            let dialogue = match (text, section, key) {
                (Some(text), _, _) => text,
                (None, Some(section), Some(key)) => {
                    dialogues::get_dialogue(&config.dialogues.path, &section, &key)
                        .with_context(|| format!("loading dialogue {}/{}", section, key))?
                        .to_dialogue_text()
                }
                _ => anyhow::bail!("either --text or --section/--key is required"),
            };

            let synthesizer = SpeechSynthesizer::from_config(&config)?;
            synthesizer.text_to_speech_multi_speaker(&dialogue, &speakers, &output)?;
            println!("Saved to: {}", output.display());
        }
        Command::List => {
            let store = DialogueStore::global(&config.dialogues.path)
                .with_context(|| format!("reading {}", config.dialogues.path.display()))?;
            for section in store.sections() {
                println!("{}", section);
                for key in store.keys(section)? {
                    println!("  {}", key);
                }
            }
        }
    }

    Ok(())
}
