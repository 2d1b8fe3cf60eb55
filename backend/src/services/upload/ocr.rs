//! Text extraction from medication photos.
//!
//! The photo is flattened to grayscale, written to a temporary PNG and handed
//! to the `tesseract` command line engine in TSV mode, which reports every
//! recognised word with its confidence. The recognised lines are then scanned
//! for medication-looking entries.

use common::model::upload::{OcrResult, SuggestedMedication};
use image::ImageFormat;
use regex::Regex;
use std::collections::BTreeMap;
use std::process::Command;
use thiserror::Error;

/// Words that mark a line as a medication entry.
const DOSAGE_INDICATORS: [&str; 7] = ["mg", "ml", "tablet", "capsule", "once", "twice", "daily"];

const DOSAGE_PATTERN: &str = r"(\d+\.?\d*\s*(mg|ml|g|mcg))";

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("cannot decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("text engine failed: {0}")]
    Engine(String),
}

/// Turns an uploaded image into text plus medication suggestions.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError>;
}

/// Runs the `tesseract` executable found at `binary`.
pub struct TesseractCli {
    binary: String,
}

impl TesseractCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError> {
        let gray = image::load_from_memory(image)?.grayscale();
        let mut scratch = tempfile::Builder::new().suffix(".png").tempfile()?;
        gray.write_to(scratch.as_file_mut(), ImageFormat::Png)?;

        let output = Command::new(&self.binary)
            .arg(scratch.path())
            .arg("stdout")
            .arg("tsv")
            .output()?;
        if !output.status.success() {
            return Err(OcrError::Engine(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let (text, confidence) = parse_tsv(&String::from_utf8_lossy(&output.stdout));
        Ok(OcrResult {
            suggested_medications: parse_medications(&text)?,
            text,
            confidence,
        })
    }
}

/// Rebuilds the text line by line from tesseract's TSV output and averages
/// the positive word confidences (integer mean, 0 when there are none).
pub fn parse_tsv(tsv: &str) -> (String, u8) {
    let mut lines: BTreeMap<(u32, u32, u32, u32), Vec<&str>> = BTreeMap::new();
    let mut confidences: Vec<u32> = Vec::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let num = |i: usize| cols[i].trim().parse::<u32>().unwrap_or(0);
        let conf = cols[10].trim().parse::<f64>().unwrap_or(-1.0) as i64;
        if conf > 0 {
            confidences.push(conf as u32);
        }
        let word = cols[11].trim();
        if !word.is_empty() {
            lines.entry((num(1), num(2), num(3), num(4))).or_default().push(word);
        }
    }

    let text = lines
        .values()
        .map(|words| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n");
    let confidence = if confidences.is_empty() {
        0
    } else {
        (confidences.iter().sum::<u32>() / confidences.len() as u32).min(100) as u8
    };
    (text, confidence)
}

/// Every line with at least two words and a dosage indicator becomes a
/// suggestion named after its first word.
pub fn parse_medications(text: &str) -> Result<Vec<SuggestedMedication>, OcrError> {
    let dosage_re =
        Regex::new(DOSAGE_PATTERN).map_err(|e| OcrError::Engine(format!("regex error: {}", e)))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| line.split_whitespace().count() >= 2)
        .filter_map(|line| {
            let lower = line.to_lowercase();
            if !DOSAGE_INDICATORS.iter().any(|i| lower.contains(i)) {
                return None;
            }
            Some(SuggestedMedication {
                name: line.split_whitespace().next()?.to_string(),
                dosage: dosage_re
                    .captures(&lower)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                frequency: frequency(&lower).to_string(),
                raw_text: line.to_string(),
            })
        })
        .collect())
}

fn frequency(lower: &str) -> &'static str {
    let daily = lower.contains("daily");
    if lower.contains("once") && daily {
        "Once daily"
    } else if lower.contains("twice") && daily {
        "Twice daily"
    } else if lower.contains("three times") || lower.contains("tid") {
        "Three times daily"
    } else if lower.contains("four times") || lower.contains("qid") {
        "Four times daily"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t
5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t91.5\tLisinopril
5\t1\t1\t1\t1\t2\t0\t0\t10\t10\t88\t10mg
5\t1\t1\t1\t2\t1\t0\t0\t10\t10\t0\tRx
5\t1\t1\t1\t2\t2\t0\t0\t10\t10\t80\t#1234
";

    #[test]
    fn tsv_rebuilds_lines_and_averages_confidence() {
        let (text, confidence) = parse_tsv(TSV);
        assert_eq!(text, "Lisinopril 10mg\nRx #1234");
        assert_eq!(confidence, 86);
        assert_eq!(parse_tsv(""), (String::new(), 0));
    }

    #[test]
    fn extracts_name_dosage_and_frequency() {
        let text = "CVS Pharmacy\nMetformin 500 mg tablet twice daily\n\nAtorvastatin 20mg\nTake with food";
        let meds = parse_medications(text).unwrap();

        assert_eq!(meds.len(), 2);
        assert_eq!(meds[0].name, "Metformin");
        assert_eq!(meds[0].dosage, "500 mg");
        assert_eq!(meds[0].frequency, "Twice daily");
        assert_eq!(meds[0].raw_text, "Metformin 500 mg tablet twice daily");
        assert_eq!(meds[1].dosage, "20mg");
        assert_eq!(meds[1].frequency, "");
    }

    #[test]
    fn frequency_abbreviations() {
        assert_eq!(frequency("amoxicillin 250mg tid"), "Three times daily");
        assert_eq!(frequency("four times a day"), "Four times daily");
        assert_eq!(frequency("once weekly"), "");
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let err = TesseractCli::new("tesseract").recognize(b"not an image").unwrap_err();
        assert!(matches!(err, OcrError::Image(_)));
    }
}
