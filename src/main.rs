use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use emails_editor::{EditorConfig, EditorEvent, EmailRecord, EmailsEditor, EventResult, Key};
use mimalloc::MiMalloc;
use surface::{DomSurface, Surface};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Replays a scripted session against a headless email chips editor.
#[derive(Parser, Debug)]
#[command(name = "mailchips", version)]
struct Cli {
    /// Editor config file (TOML, camelCase keys).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Text typed into the editor, one key at a time. Repeatable.
    #[arg(long = "type", value_name = "TEXT")]
    typed: Vec<String>,

    /// How many times to press the "add email" button.
    #[arg(long, default_value_t = 1)]
    add: usize,

    /// Print the final list as JSON instead of markup.
    #[arg(long)]
    json: bool,
}

fn demo_config() -> EditorConfig {
    EditorConfig {
        class_name: "email-form__input".into(),
        placeholder: "Enter email addresses…".into(),
        add_more_placeholder: "add more people…".into(),
        initial_emails: Vec::new(),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(demo_config());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    EditorConfig::from_toml_str(&source).with_context(|| format!("in {}", path.display()))
}

fn type_text(editor: &mut EmailsEditor<DomSurface>, text: &str) -> anyhow::Result<()> {
    for ch in text.chars() {
        let key = if ch == '\n' {
            Key::Enter
        } else {
            Key::Other(ch.to_string())
        };
        if editor.handle_event(EditorEvent::KeyDown(key))? == EventResult::Continue {
            editor.surface_mut().insert_text(&ch.to_string())?;
            editor.handle_event(EditorEvent::Input)?;
        }
    }
    Ok(())
}

fn valid_count_message(count: usize) -> String {
    if count == 1 {
        "There is 1 valid email".to_string()
    } else {
        format!("There are {count} valid emails")
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let dom = DomSurface::new();
    let host = dom.body();
    let mut editor = EmailsEditor::builder(dom, host)
        .config(config)
        .on_change(|emails: &[EmailRecord]| {
            log::info!(target: "mailchips", "change: {} emails", emails.len());
        })
        .build()?;

    editor.handle_event(EditorEvent::Focus)?;
    for text in &cli.typed {
        type_text(&mut editor, text)?;
        editor.handle_event(EditorEvent::KeyDown(Key::Enter))?;
    }
    for id in 1..=cli.add {
        editor.add_email(&format!("email-{id}@test.com"))?;
    }
    editor.handle_event(EditorEvent::Blur)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&editor.get_emails())?);
    } else {
        println!("{}", editor.surface().outer_html(editor.root()));
        println!("{}", valid_count_message(editor.valid_count()));
    }
    Ok(())
}
