use crate::pipeline::Notes;

/// Render just the summary
pub fn render_text(notes: &Notes) -> String {
    notes.summary.trim_end().to_string()
}

/// Render a markdown page: title, thumbnail, then the notes
pub fn render_markdown(notes: &Notes) -> String {
    let mut out = format!(
        "# Notes for {id}\n\n![thumbnail]({thumb})\n\n",
        id = notes.video_id,
        thumb = notes.thumbnail_url
    );
    if notes.language.needs_translation() {
        out.push_str(&format!("_Translated from {}._\n\n", notes.language.name()));
    }
    out.push_str("## Detailed Notes:\n\n");
    out.push_str(notes.summary.trim_end());
    out.push('\n');
    out
}

/// Render notes as pretty JSON
pub fn render_json(notes: &Notes) -> String {
    serde_json::to_string_pretty(notes).unwrap_or_else(|_| "{}".to_string())
}
