/*!
 * Caption data model and XML payload parsing.
 *
 * The platform serves caption payloads in two XML shapes:
 *
 * - the paragraph schema: `<p t="1000" d="500">` units with integer
 *   millisecond timing, optionally holding `<s t="200">` word parts whose
 *   offsets are relative to the start of their unit;
 * - the flat text schema: `<text start="1.0" dur="0.5">` units with
 *   fractional second timing and no parts.
 *
 * `parse_caption_xml` detects which shape it was given and dispatches to
 * the matching conversion. Timing attributes that are absent or do not
 * parse become zero instead of failing the document.
 */

use std::fmt;
use std::time::Duration;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use log::{debug, warn};

use crate::errors::CaptionXmlError;

/// Which of the two known payload shapes a document was parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionSchema {
    /// `<p t d>` units in milliseconds with `<s t>` parts
    Paragraph,
    /// `<text start dur>` units in fractional seconds
    FlatText,
}

impl CaptionSchema {
    fn unit_tag(self) -> &'static [u8] {
        match self {
            Self::Paragraph => b"p",
            Self::FlatText => b"text",
        }
    }

    fn part_tag(self) -> Option<&'static [u8]> {
        match self {
            Self::Paragraph => Some(b"s"),
            Self::FlatText => None,
        }
    }
}

/// A sub-unit of an entry, usually one word
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionPart {
    /// Text of the part
    pub text: String,
    /// Start time relative to the start of the owning entry
    pub offset: Duration,
}

impl CaptionPart {
    /// Start time of the part measured from the start of the track
    pub fn absolute_offset(&self, entry: &CaptionEntry) -> Duration {
        entry.offset + self.offset
    }
}

/// One caption unit
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionEntry {
    /// Full rendered text of the unit
    pub text: String,
    /// Start time from the start of the track
    pub offset: Duration,
    /// How long the unit is displayed
    pub duration: Duration,
    /// Word parts; empty for payloads without sub-word timing
    pub parts: Vec<CaptionPart>,
}

impl CaptionEntry {
    /// End time, always `offset + duration`
    pub fn end(&self) -> Duration {
        self.offset.saturating_add(self.duration)
    }
}

/// Parsed caption payload, entries in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptionDocument {
    entries: Vec<CaptionEntry>,
    schema: Option<CaptionSchema>,
}

impl CaptionDocument {
    pub fn new(entries: Vec<CaptionEntry>, schema: Option<CaptionSchema>) -> Self {
        Self { entries, schema }
    }

    /// Parse a caption payload in either known schema
    pub fn from_xml(xml: &str) -> Result<Self, CaptionXmlError> {
        parse_caption_xml(xml)
    }

    pub fn entries(&self) -> &[CaptionEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CaptionEntry> {
        self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaptionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The schema the entries were read from; `None` when no unit was found
    pub fn schema(&self) -> Option<CaptionSchema> {
        self.schema
    }

    /// Whether start offsets never decrease in document order
    pub fn is_sorted_by_offset(&self) -> bool {
        self.entries.windows(2).all(|pair| pair[0].offset <= pair[1].offset)
    }

    /// Copy of the document with entries stably sorted by start offset
    pub fn sorted_by_offset(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|entry| entry.offset);
        Self {
            entries,
            schema: self.schema,
        }
    }

    /// Entry texts joined by newlines, skipping blank entries
    pub fn plain_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the document as SubRip (SRT)
    pub fn to_srt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CaptionDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{}", index + 1)?;
            writeln!(f, "{} --> {}", format_timestamp(entry.offset), format_timestamp(entry.end()))?;
            writeln!(f, "{}", entry.text.trim())?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CaptionDocument {
    type Item = &'a CaptionEntry;
    type IntoIter = std::slice::Iter<'a, CaptionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for CaptionDocument {
    type Item = CaptionEntry;
    type IntoIter = std::vec::IntoIter<CaptionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Format a duration in SRT format (HH:MM:SS,mmm)
pub fn format_timestamp(duration: Duration) -> String {
    let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parse a caption payload, detecting which schema it uses
///
/// A payload without any caption unit yields an empty document.
pub fn parse_caption_xml(xml: &str) -> Result<CaptionDocument, CaptionXmlError> {
    match detect_schema(xml)? {
        Some(CaptionSchema::Paragraph) => parse_paragraphs(xml),
        Some(CaptionSchema::FlatText) => parse_flat_text(xml),
        None => {
            debug!("Caption payload holds no caption units");
            Ok(CaptionDocument::default())
        }
    }
}

/// Find the schema of a payload: paragraph units win over text units
pub fn detect_schema(xml: &str) -> Result<Option<CaptionSchema>, CaptionXmlError> {
    let mut reader = Reader::from_str(xml);
    let mut saw_text_unit = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.local_name();
                if name.as_ref() == CaptionSchema::Paragraph.unit_tag() {
                    return Ok(Some(CaptionSchema::Paragraph));
                }
                if name.as_ref() == CaptionSchema::FlatText.unit_tag() {
                    saw_text_unit = true;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CaptionXmlError::new(e.to_string())),
            _ => {}
        }
    }

    Ok(saw_text_unit.then_some(CaptionSchema::FlatText))
}

/// Convert a paragraph schema payload (milliseconds, relative word parts)
fn parse_paragraphs(xml: &str) -> Result<CaptionDocument, CaptionXmlError> {
    let mut coerced = 0usize;
    let entries = collect_units(xml, CaptionSchema::Paragraph)?
        .into_iter()
        .map(|unit| CaptionEntry {
            offset: millis_attr(unit.attr("t"), &mut coerced),
            duration: millis_attr(unit.attr("d"), &mut coerced),
            parts: unit
                .children
                .iter()
                .map(|part| CaptionPart {
                    offset: millis_attr(part.attr("t"), &mut coerced),
                    text: part.text.clone(),
                })
                .collect(),
            text: unit.text,
        })
        .collect();

    report_coerced(coerced);
    Ok(CaptionDocument::new(entries, Some(CaptionSchema::Paragraph)))
}

/// Convert a flat text schema payload (fractional seconds, no parts)
fn parse_flat_text(xml: &str) -> Result<CaptionDocument, CaptionXmlError> {
    let mut coerced = 0usize;
    let entries = collect_units(xml, CaptionSchema::FlatText)?
        .into_iter()
        .map(|unit| CaptionEntry {
            offset: seconds_attr(unit.attr("start"), &mut coerced),
            duration: seconds_attr(unit.attr("dur"), &mut coerced),
            parts: Vec::new(),
            text: unit.text,
        })
        .collect();

    report_coerced(coerced);
    Ok(CaptionDocument::new(entries, Some(CaptionSchema::FlatText)))
}

fn report_coerced(coerced: usize) {
    if coerced > 0 {
        warn!("{} caption timing attribute(s) could not be parsed and were read as zero", coerced);
    }
}

/// Integer milliseconds; unparsable values count as zero
fn millis_attr(value: Option<&str>, coerced: &mut usize) -> Duration {
    let Some(raw) = value else {
        return Duration::ZERO;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) => Duration::from_millis(ms),
        Err(_) => {
            *coerced += 1;
            Duration::ZERO
        }
    }
}

/// Fractional seconds rounded to milliseconds; unparsable values count as zero
fn seconds_attr(value: Option<&str>, coerced: &mut usize) -> Duration {
    let Some(raw) = value else {
        return Duration::ZERO;
    };
    match raw.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => {
            Duration::from_millis((seconds * 1000.0).round() as u64)
        }
        _ => {
            *coerced += 1;
            Duration::ZERO
        }
    }
}

/// Element captured from the payload with its descendant text
#[derive(Debug, Default)]
struct RawElement {
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<RawElement>,
}

impl RawElement {
    fn from_start(element: &BytesStart) -> Self {
        let attributes = element
            .attributes()
            .flatten()
            .map(|attr| {
                (
                    String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
                    String::from_utf8_lossy(&attr.value).into_owned(),
                )
            })
            .collect();

        Self {
            attributes,
            ..Default::default()
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Walk the payload and capture every unit element of the schema
///
/// A unit's text is the concatenation of all text below it, so inline
/// markup inside a unit does not hide any of its words.
fn collect_units(xml: &str, schema: CaptionSchema) -> Result<Vec<RawElement>, CaptionXmlError> {
    let unit_tag = schema.unit_tag();
    let part_tag = schema.part_tag();

    let mut reader = Reader::from_str(xml);
    let mut units = Vec::new();
    let mut unit: Option<RawElement> = None;
    let mut unit_depth = 0usize;
    let mut part: Option<RawElement> = None;
    let mut part_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let is_part = part_tag.is_some_and(|tag| e.local_name().as_ref() == tag);
                if unit.is_some() {
                    unit_depth += 1;
                    if part.is_some() {
                        part_depth += 1;
                    } else if is_part {
                        part = Some(RawElement::from_start(&e));
                        part_depth = 1;
                    }
                } else if e.local_name().as_ref() == unit_tag {
                    unit = Some(RawElement::from_start(&e));
                    unit_depth = 1;
                }
            }
            Ok(Event::Empty(e)) => {
                let is_part = part_tag.is_some_and(|tag| e.local_name().as_ref() == tag);
                if let Some(current) = unit.as_mut() {
                    if is_part && part.is_none() {
                        current.children.push(RawElement::from_start(&e));
                    }
                } else if e.local_name().as_ref() == unit_tag {
                    units.push(RawElement::from_start(&e));
                }
            }
            Ok(Event::Text(e)) => {
                if unit.is_some() {
                    let raw = match e.unescape() {
                        Ok(text) => text.into_owned(),
                        // Unknown entity: let the HTML decoder stand in for the XML layer
                        Err(_) => html_escape::decode_html_entities(&String::from_utf8_lossy(&e))
                            .into_owned(),
                    };
                    append_text(&mut unit, &mut part, &raw);
                }
            }
            Ok(Event::CData(e)) => {
                if unit.is_some() {
                    let raw = String::from_utf8_lossy(&e).into_owned();
                    append_text(&mut unit, &mut part, &raw);
                }
            }
            Ok(Event::End(_)) => {
                if unit.is_none() {
                    continue;
                }
                if part.is_some() {
                    part_depth -= 1;
                    if part_depth == 0 {
                        if let (Some(finished), Some(current)) = (part.take(), unit.as_mut()) {
                            current.children.push(finished);
                        }
                    }
                }
                unit_depth -= 1;
                if unit_depth == 0 {
                    if let Some(finished) = unit.take() {
                        units.push(finished);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CaptionXmlError::new(e.to_string())),
            _ => {}
        }
    }

    if unit.is_some() {
        return Err(CaptionXmlError::new(format!(
            "document ended inside a <{}> element",
            String::from_utf8_lossy(unit_tag)
        )));
    }

    Ok(units)
}

fn append_text(unit: &mut Option<RawElement>, part: &mut Option<RawElement>, raw: &str) {
    // The platform escapes entities twice, so decode what the XML layer left
    let decoded = html_escape::decode_html_entities(raw);
    if let Some(current) = unit.as_mut() {
        current.text.push_str(&decoded);
    }
    if let Some(current) = part.as_mut() {
        current.text.push_str(&decoded);
    }
}
