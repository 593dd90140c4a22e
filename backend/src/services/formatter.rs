//! Turns a free-form recommendation into display sections.
//!
//! The text comes from the advice agent or from manual entry, so nothing
//! about its shape is guaranteed. It may be a numbered list, an
//! emoji-prefixed list, plain prose, or a mix. Formatting runs as a fixed
//! sequence of passes, each of which is optional and never fails:
//!
//! 1. [`split_intro`]: text before the first `\n<digits>.` marker.
//! 2. [`extract_final_tip`]: a trailing "tip for the day" phrase.
//! 3. [`extract_final_note`]: a trailing "Remember, it…" / "Check in…" remark.
//! 4. [`strip_emphasis`]: every `*` is removed.
//! 5. [`segment`]: split into list segments (numbered or emoji-prefixed).
//! 6. [`parse_section`]: index, emoji, title and body of one segment.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const EMOJI_START: &str = r"[\p{Extended_Pictographic}\p{Emoji_Presentation}]";
const EMOJI_CONTINUE: &str =
    r"[\p{Extended_Pictographic}\p{Emoji_Presentation}\p{Emoji_Modifier}\x{FE0F}\x{200D}\x{20E3}]";

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\d+\.").expect("valid regex"));

static LEADING_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.").expect("valid regex"));

static NEWLINE_EMOJI: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\n{}", EMOJI_START)).expect("valid regex"));

static EMOJI_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\n(?:{}|Remember|Check|\d+\.)", EMOJI_START)).expect("valid regex")
});

static LEADING_EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}{}*", EMOJI_START, EMOJI_CONTINUE)).expect("valid regex")
});

static TIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)tip for the day:?\s*["“]?([^"”]+)["”]?"#).expect("valid regex")
});

// The trailer starts at the phrase itself, with its "Here's your" lead-in.
static TIP_TRAILER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(?:here[’']?s your\s+)?tip for the day.*$").expect("valid regex")
});

static NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(?:Remember|Check in).*$").expect("valid regex"));

const NOTE_TRIGGERS: [&str; 2] = ["Check in with me tomorrow", "Remember, it"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormattedRecommendation {
    pub intro: String,
    pub sections: Vec<Section>,
    pub final_tip: Option<String>,
    pub final_note: Option<String>,
}

impl FormattedRecommendation {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.intro.is_empty()
            && self.sections.is_empty()
            && self.final_tip.is_none()
            && self.final_note.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub index: Option<String>,
    pub emoji: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub layout: SectionLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLayout {
    /// `1.` prefix, optionally followed by an emoji.
    Numbered,
    /// Emoji icon beside the text, no number.
    IconRow,
    Plain,
}

/// Format one recommendation. Blank input yields an empty result.
pub fn format_recommendation(recommendation: &str) -> FormattedRecommendation {
    if recommendation.trim().is_empty() {
        return FormattedRecommendation::default();
    }
    let raw = recommendation.replace("\r\n", "\n");

    let split = split_intro(&raw);
    let mut intro = split.intro;
    let mut body = split.body;

    let mut final_tip = None;
    if let Some((tip, rest)) = extract_final_tip(&raw, &body) {
        final_tip = Some(strip_emphasis(&tip));
        body = rest;
    }

    let mut final_note = None;
    if let Some((note, rest)) = extract_final_note(&body) {
        final_note = Some(strip_emphasis(&note));
        body = rest;
    }

    body = strip_emphasis(&body);
    intro = strip_emphasis(&intro);

    let segmented = segment(&body, &intro, split.has_list_marker);
    let intro = segmented.intro;

    let sections = segmented
        .segments
        .iter()
        .filter_map(|s| parse_section(s))
        .collect();

    FormattedRecommendation {
        intro,
        sections,
        final_tip: final_tip.filter(|t| !t.is_empty()),
        final_note: final_note.filter(|n| !n.is_empty()),
    }
}

#[derive(Debug, PartialEq)]
pub struct IntroSplit {
    pub intro: String,
    pub body: String,
    pub has_list_marker: bool,
}

/// Pass 1: everything before the first `\n<digits>.` is the intro.
pub fn split_intro(raw: &str) -> IntroSplit {
    match LIST_MARKER.find(raw) {
        Some(m) => IntroSplit {
            intro: raw[..m.start()].trim().to_string(),
            body: raw[m.start()..].trim().to_string(),
            has_list_marker: true,
        },
        None => IntroSplit {
            intro: String::new(),
            body: raw.trim().to_string(),
            has_list_marker: false,
        },
    }
}

/// Pass 2: capture the "tip for the day" text from the raw string and drop
/// everything from the phrase onward from the working body.
pub fn extract_final_tip(raw: &str, body: &str) -> Option<(String, String)> {
    let tip = TIP.captures(raw)?.get(1)?.as_str().trim().to_string();
    let rest = TIP_TRAILER.replace(body, "").trim().to_string();
    Some((tip, rest))
}

/// Pass 3: split off a closing remark. Only triggers on the known phrases,
/// but the cut happens at the first "Remember" or "Check in".
pub fn extract_final_note(body: &str) -> Option<(String, String)> {
    if !NOTE_TRIGGERS.iter().any(|t| body.contains(t)) {
        return None;
    }
    let m = NOTE.find(body)?;
    let note = m.as_str().trim().to_string();
    let rest = body[..m.start()].trim().to_string();
    Some((note, rest))
}

/// Pass 4: emphasis markers are dropped, not interpreted.
pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
}

#[derive(Debug, PartialEq)]
pub struct Segmented {
    pub intro: String,
    pub segments: Vec<String>,
}

/// Pass 5: emoji-prefixed text is cut before every emoji, "Remember",
/// "Check" or `<digits>.` line and its first line becomes the intro.
/// Everything else is cut before every `<digits>.` line. In both shapes an
/// intro that is itself a numbered item goes back into the list.
pub fn segment(body: &str, intro: &str, has_list_marker: bool) -> Segmented {
    if !has_list_marker && NEWLINE_EMOJI.is_match(body) {
        let mut pieces = split_before(body, &EMOJI_BOUNDARY).into_iter();
        let head = pieces.next().unwrap_or_default();
        let (first_line, rest_of_head) = head.split_once('\n').unwrap_or((head, ""));

        let mut segments = Vec::new();
        let mut intro = first_line.trim().to_string();
        if LEADING_INDEX.is_match(&intro) {
            segments.push(std::mem::take(&mut intro));
        }
        if !rest_of_head.trim().is_empty() {
            segments.push(rest_of_head.to_string());
        }
        segments.extend(pieces.map(str::to_string));

        return Segmented { intro, segments };
    }

    let mut segments = Vec::new();
    let mut intro = intro.to_string();
    if LEADING_INDEX.is_match(&intro) {
        segments.push(std::mem::take(&mut intro));
    }
    segments.extend(split_before(body, &LIST_MARKER).into_iter().map(str::to_string));

    Segmented { intro, segments }
}

/// Split `text` at every match of `boundary`, which must start with `\n`.
/// The newline is dropped and the rest of the match opens the next piece.
fn split_before<'a>(text: &'a str, boundary: &Regex) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(text) {
        pieces.push(&text[start..m.start()]);
        start = m.start() + 1;
    }
    pieces.push(&text[start..]);
    pieces
}

/// Pass 6: parse one list segment. Whitespace-only segments yield `None`.
pub fn parse_section(segment: &str) -> Option<Section> {
    let mut content = segment.trim();
    if content.is_empty() {
        return None;
    }

    let mut index = None;
    if let Some(caps) = LEADING_INDEX.captures(content) {
        index = Some(caps[1].to_string());
        content = content[caps[0].len()..].trim();
    }

    let mut emoji = None;
    if let Some(m) = LEADING_EMOJI.find(content) {
        emoji = Some(m.as_str().to_string());
        content = content[m.end()..].trim();
    }

    let clean = strip_emphasis(content);
    let (title, body) = if let Some((title, body)) = clean.split_once(':') {
        (title.trim().to_string(), body.trim().to_string())
    } else if let Some((title, body)) = clean.split_once('\n') {
        (title.trim().to_string(), body.trim().to_string())
    } else if index.is_some() {
        (clean.trim().to_string(), String::new())
    } else {
        (String::new(), clean.trim().to_string())
    };

    let layout = match (&index, &emoji) {
        (Some(_), _) => SectionLayout::Numbered,
        (None, Some(_)) => SectionLayout::IconRow,
        (None, None) => SectionLayout::Plain,
    };

    Some(Section {
        index,
        emoji,
        title: non_empty(strip_emphasis(&title)),
        body: non_empty(strip_emphasis(&body)),
        layout,
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
