use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::rows::direct_cells;
use crate::record::Status;

static BACKGROUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"background(?:-color)?\s*:\s*([^;]+)").unwrap());
static HEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-f]{6}$").unwrap());
static RGB_FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgb\(\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*\)$").unwrap()
});

// Channel thresholds matching the editorial color conventions the source
// tables use. Ad hoc on purpose; kept as constants rather than re-derived.
const RED_FLOOR: i16 = 180;
const RED_DELTA: i16 = 25;
const YELLOW_FLOOR: i16 = 170;
const YELLOW_DELTA: i16 = 25;
const GREEN_FLOOR: i16 = 140;
const GREEN_DELTA: i16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ColorLabel {
    Red,
    Yellow,
    Green,
}

/// Classify a data row. No image wins outright; otherwise the row's color
/// cues decide, red before yellow, anything else is normal.
pub fn classify(row: ElementRef<'_>, images: &[String]) -> Status {
    if images.is_empty() {
        return Status::NoImage;
    }
    let labels = color_labels(row);
    if labels.contains(&ColorLabel::Red) {
        Status::Missing
    } else if labels.contains(&ColorLabel::Yellow) {
        Status::NotInWroclaw
    } else {
        Status::Normal
    }
}

/// Union of color labels found on the row element and its direct cells,
/// from inline `background(-color)` declarations and the legacy `bgcolor`
/// attribute.
fn color_labels(row: ElementRef<'_>) -> HashSet<ColorLabel> {
    let mut labels = HashSet::new();
    let mut elements = vec![row];
    elements.extend(direct_cells(row));

    for el in elements {
        let style = el
            .value()
            .attr("style")
            .map(str::to_lowercase)
            .unwrap_or_default();
        let mut tokens: Vec<String> = BACKGROUND_RE
            .captures_iter(&style)
            .map(|caps| caps[1].trim().to_string())
            .collect();
        if let Some(bgcolor) = el.value().attr("bgcolor") {
            let bgcolor = bgcolor.trim().to_lowercase();
            if !bgcolor.is_empty() {
                tokens.push(bgcolor);
            }
        }

        for token in tokens {
            if token.is_empty() {
                continue;
            }
            if token.contains("red") {
                labels.insert(ColorLabel::Red);
            }
            if token.contains("yellow") {
                labels.insert(ColorLabel::Yellow);
            }
            if token.contains("green") || token.contains("lime") {
                labels.insert(ColorLabel::Green);
            }
            if let Some(rgb) = parse_hex_color(&token).or_else(|| parse_rgb_function(&token)) {
                if let Some(label) = label_from_rgb(rgb) {
                    labels.insert(label);
                }
            }
        }
    }

    labels
}

/// `#abc` or `#aabbcc` → RGB triple. Anything else is not a hex color.
fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };
    if !HEX_RE.is_match(&expanded) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// `rgb(r, g, b)` with each component ≤ 255; out-of-range values make the
/// whole token invalid.
fn parse_rgb_function(value: &str) -> Option<(u8, u8, u8)> {
    let caps = RGB_FN_RE.captures(value.trim())?;
    let channel = |i: usize| {
        caps[i]
            .parse::<u16>()
            .ok()
            .filter(|v| *v <= 255)
            .map(|v| v as u8)
    };
    Some((channel(1)?, channel(2)?, channel(3)?))
}

fn label_from_rgb((r, g, b): (u8, u8, u8)) -> Option<ColorLabel> {
    let (r, g, b) = (i16::from(r), i16::from(g), i16::from(b));
    if r >= RED_FLOOR && r - g >= RED_DELTA && r - b >= RED_DELTA {
        return Some(ColorLabel::Red);
    }
    if r >= YELLOW_FLOOR && g >= YELLOW_FLOOR && r.min(g) - b >= YELLOW_DELTA {
        return Some(ColorLabel::Yellow);
    }
    if g >= GREEN_FLOOR && g - r >= GREEN_DELTA && g - b >= GREEN_DELTA {
        return Some(ColorLabel::Green);
    }
    None
}
