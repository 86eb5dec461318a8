//! Table formatting for CLI output.
//!
//! Format-only: no session access here.

use voxclone_core::{CatalogVoice, VoiceCatalog};

const NAME_WIDTH: usize = 24;

/// Truncate to `max_len` characters, ending in "..." when cut.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// One table row. Predefined voices without audio show where the clip is
/// expected so the operator can supply it.
pub fn format_voice_row(voice: &CatalogVoice) -> String {
    let audio = if voice.audio_exists {
        "yes".to_string()
    } else {
        match &voice.audio_path {
            Some(path) => format!("missing ({path})"),
            None => "missing".to_string(),
        }
    };
    let created = voice
        .created_at
        .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d").to_string());
    format!(
        "{:>5}  {:<name_width$}  {:<12}  {:<10}  {}",
        voice.id.get(),
        truncate_string(&voice.name, NAME_WIDTH),
        voice.voice_id.as_deref().unwrap_or("-"),
        created,
        audio,
        name_width = NAME_WIDTH,
    )
}

fn header() -> String {
    format!(
        "{:>5}  {:<name_width$}  {:<12}  {:<10}  {}",
        "ID",
        "NAME",
        "VOICE ID",
        "CREATED",
        "AUDIO",
        name_width = NAME_WIDTH,
    )
}

pub fn print_catalog(catalog: &VoiceCatalog) {
    for (title, voices) in [
        ("Predefined voices", catalog.predefined()),
        ("Custom voices", catalog.custom()),
    ] {
        println!("{title} ({})", voices.len());
        if voices.is_empty() {
            println!("  (none)");
        } else {
            let header = header();
            println!("{header}");
            print_separator(header.len() + 16);
            for voice in voices {
                println!("{}", format_voice_row(voice));
            }
        }
        println!();
    }
}
