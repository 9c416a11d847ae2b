// Turns prediction outcomes into text panels. Panels are plain data so the
// UI decides how to colour them and tests can inspect the text.

use std::fmt;

use crate::api::PredictionResult;
use crate::asset::UploadedAsset;
use crate::error::PredictError;
use crate::glyph::glyph_for;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Success,
    Warning,
    NetworkError,
    DecodeError,
}

/// A title line plus detail lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub kind: PanelKind,
    pub title: String,
    pub lines: Vec<String>,
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        for line in &self.lines {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

/// Success panel: upper-cased label, its glyph if known, and a bar per
/// probability when the service sent some.
pub fn render_result(result: &PredictionResult) -> Panel {
    let label = result.emotion.to_uppercase();
    let title = match glyph_for(&result.emotion) {
        Some(glyph) => format!("Predicted emotion: {} {}", label, glyph),
        None => format!("Predicted emotion: {}", label),
    };
    let lines = result
        .probabilities
        .as_ref()
        .map(|p| probability_bars(p.iter().map(|(k, v)| (k.as_str(), *v))))
        .unwrap_or_default();
    Panel {
        kind: PanelKind::Success,
        title,
        lines,
    }
}

pub fn render_failure(err: &PredictError) -> Panel {
    match err {
        PredictError::Network(reason) => Panel {
            kind: PanelKind::NetworkError,
            title: "Error while calling the prediction API.".into(),
            lines: vec![reason.clone()],
        },
        PredictError::Decode(body) => Panel {
            kind: PanelKind::DecodeError,
            title: "Error: the API response is not in JSON format.".into(),
            lines: vec![format!("Raw response: {}", body)],
        },
    }
}

pub fn render_outcome(outcome: &Result<PredictionResult, PredictError>) -> Panel {
    match outcome {
        Ok(result) => render_result(result),
        Err(err) => render_failure(err),
    }
}

/// Warning shown instead of sending a file with the wrong declared type.
pub fn render_rejection(asset: &UploadedAsset) -> Panel {
    Panel {
        kind: PanelKind::Warning,
        title: "Please upload a .wav file only.".into(),
        lines: vec![format!(
            "{} was declared as {}",
            asset.file_name(),
            asset.media_type()
        )],
    }
}

/// One aligned bar per label, highest probability first.
fn probability_bars<'a>(entries: impl Iterator<Item = (&'a str, f64)>) -> Vec<String> {
    let mut entries: Vec<(&str, f64)> = entries.collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let width = entries.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    entries
        .into_iter()
        .map(|(label, p)| {
            let filled = (p.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
            format!(
                "{:<width$} {}{} {:>5.1}%",
                label,
                "█".repeat(filled),
                "░".repeat(BAR_WIDTH - filled),
                p * 100.0,
                width = width
            )
        })
        .collect()
}
