// Static emotion label -> display glyph table.

/// Labels the service is known to return, with their glyph.
pub static EMOTION_GLYPHS: [(&str, &str); 7] = [
    ("angry", "😠"),
    ("happy", "😊"),
    ("sad", "😢"),
    ("neutral", "😐"),
    ("fearful", "😱"),
    ("disgust", "🤢"),
    ("surprised", "😲"),
];

/// Glyph for `label`, compared lower-cased. Unknown labels have none.
pub fn glyph_for(label: &str) -> Option<&'static str> {
    let key = label.to_lowercase();
    EMOTION_GLYPHS
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, glyph)| *glyph)
}
