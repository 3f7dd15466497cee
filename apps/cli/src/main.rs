use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use bytes::Bytes;
use clap::Parser;
use scape_effects::{SoundEffect, missing_markers, resolve};
use scape_script::{parse, unique_markers, word_count};
use scape_tts_client::{SpeechClient, TracingEventLog};

/// Assumed narration speaking rate, matching the parser's estimate.
const WORDS_PER_MINUTE: f64 = 150.0;

const FALLBACK_TONE_SECS: f32 = 2.0;

#[derive(Parser)]
#[command(
    name = "soundscape",
    about = "Generate talkshow narration audio from a script with bracketed effect markers"
)]
struct Cli {
    /// Script file annotated with markers like "[Audience laughs]".
    script: PathBuf,

    /// Sound effect as marker=path. Repeatable.
    #[arg(long = "effect", value_name = "MARKER=PATH")]
    effects: Vec<String>,

    /// Directory of effect files; each file's stem becomes its marker.
    #[arg(long, value_name = "DIR")]
    effects_dir: Option<PathBuf>,

    /// Gateway base URL.
    #[arg(long, env = "SOUNDSCAPE_SERVER", default_value = "http://localhost:3001")]
    server: String,

    /// Provider voice id; the client default is used when omitted.
    #[arg(long, env = "SOUNDSCAPE_VOICE")]
    voice: Option<String>,

    /// Output audio path.
    #[arg(long, short, default_value = "talkshow.mp3")]
    output: PathBuf,
}

/// Outcome of one successful generation.
#[derive(Debug)]
struct GeneratedAudio {
    id: String,
    path: PathBuf,
    duration_secs: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let raw = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("reading script {}", cli.script.display()))?;
    let script = parse(&raw);

    let markers = unique_markers(&script.original_text);
    println!("Words: {}", word_count(&script.cleaned_text));
    println!("Effect markers: {}", markers.len());

    let library = load_effects(&cli)?;

    let timeline = resolve(&script.effects, &library);
    if timeline.summary.is_blocked() {
        bail!(
            "no sound effects uploaded; at least one is required to resolve {} marker mention(s)",
            script.effects.len()
        );
    }
    println!("Resolution: {}", timeline.summary);

    let missing = missing_markers(&script.original_text, &library);
    if !missing.is_empty() {
        tracing::warn!(markers = ?missing, "missing_effects_using_fallback");
    }

    let mut builder = SpeechClient::builder()
        .api_base(&cli.server)
        .event_log(Arc::new(TracingEventLog));
    if let Some(voice) = &cli.voice {
        builder = builder.voice(voice);
    }
    let client = builder.build();

    match client
        .generate_with_progress(&script.cleaned_text, |percent| {
            print!("\rGenerating... {percent}%");
            let _ = std::io::stdout().flush();
        })
        .await
    {
        Ok(audio) => {
            println!();
            std::fs::write(&cli.output, &audio)
                .with_context(|| format!("writing {}", cli.output.display()))?;

            let generated = GeneratedAudio {
                id: uuid::Uuid::new_v4().to_string(),
                path: cli.output.clone(),
                duration_secs: estimate_duration_secs(&script.cleaned_text),
            };
            println!(
                "Generated {} (~{:.1}s) -> {}",
                generated.id,
                generated.duration_secs,
                generated.path.display()
            );
            Ok(())
        }
        Err(e) => {
            println!();
            tracing::error!(error = %e, "generation_failed");

            // Degraded path: leave an audible placeholder so the run does
            // not dead-end, but never pass it off as real narration.
            let fallback_path = cli.output.with_extension("fallback.wav");
            let tone = scape_tone::fallback_tone(FALLBACK_TONE_SECS)
                .context("encoding placeholder tone")?;
            std::fs::write(&fallback_path, tone)
                .with_context(|| format!("writing {}", fallback_path.display()))?;
            tracing::warn!(
                path = %fallback_path.display(),
                "wrote_placeholder_tone_not_narration"
            );

            bail!("speech generation failed: {e}");
        }
    }
}

fn load_effects(cli: &Cli) -> anyhow::Result<Vec<SoundEffect>> {
    let mut library = Vec::new();

    for pair in &cli.effects {
        let Some((marker, path)) = pair.split_once('=') else {
            bail!("invalid --effect value {pair:?}, expected marker=path");
        };
        library.push(read_effect(marker, PathBuf::from(path))?);
    }

    if let Some(dir) = &cli.effects_dir {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("reading effects dir {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        // Directory order is arbitrary; sort so the fallback choice (the
        // first effect) is stable across runs.
        paths.sort();

        for path in paths {
            let marker = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            library.push(read_effect(&marker, path)?);
        }
    }

    Ok(library)
}

fn read_effect(marker: &str, path: PathBuf) -> anyhow::Result<SoundEffect> {
    let data = std::fs::read(&path)
        .with_context(|| format!("reading effect {}", path.display()))?;
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| marker.to_string());
    Ok(SoundEffect::new(name, marker, Bytes::from(data)))
}

fn estimate_duration_secs(text: &str) -> f64 {
    word_count(text) as f64 * 60.0 / WORDS_PER_MINUTE
}
