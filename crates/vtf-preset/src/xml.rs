//! XML subtree (de)serialization of transfer-function state.
//!
//! The persisted form is one element per transfer function:
//!
//! ```xml
//! <node window="W" level="L" llr="R" alpha="A">
//!   <alpha>pos1=val1 pos2=val2 ...</alpha>
//!   <color>pos1=R1/G1/B1 pos2=R2/G2/B2 ...</color>
//! </node>
//! ```
//!
//! Parsing fails closed: a malformed numeric attribute falls back to the
//! current in-memory value, and a missing or empty `<alpha>`/`<color>` node
//! keeps the constructed default map (older preset files omit them). Both
//! cases log a warning and never produce an error; only structurally
//! invalid XML does.

use crate::error::{PresetError, PresetResult};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;
use tracing::warn;
use vtf_core::{
    TransferFunctionData, color_map_from_str, color_map_to_string, opacity_map_from_str,
    opacity_map_to_string,
};

/// Attribute values and map texts collected from one transfer-function
/// element, before being applied to a data instance.
#[derive(Debug, Default)]
pub(crate) struct ParsedTransfer {
    window: Option<f64>,
    level: Option<f64>,
    llr: Option<f64>,
    alpha: Option<f64>,
    alpha_text: Option<String>,
    color_text: Option<String>,
}

impl ParsedTransfer {
    /// Collects the knob attributes of a start element.
    pub(crate) fn from_start(element: &BytesStart) -> Self {
        let mut parsed = Self::default();
        for attr in element.attributes().flatten() {
            let value = String::from_utf8_lossy(&attr.value);
            let slot = match attr.key.as_ref() {
                b"window" => &mut parsed.window,
                b"level" => &mut parsed.level,
                b"llr" => &mut parsed.llr,
                b"alpha" => &mut parsed.alpha,
                _ => continue,
            };
            match value.parse::<f64>() {
                Ok(v) => *slot = Some(v),
                Err(_) => {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    warn!(attribute = %key, value = %value, "malformed attribute, keeping current value");
                }
            }
        }
        parsed
    }

    pub(crate) fn set_map_text(&mut self, kind: MapNode, text: String) {
        match kind {
            MapNode::Alpha => self.alpha_text = Some(text),
            MapNode::Color => self.color_text = Some(text),
        }
    }

    /// Applies the parsed state to a data instance in one step.
    ///
    /// Absent attributes keep the current knob values; absent or empty map
    /// nodes keep the current maps (warning logged).
    pub(crate) fn apply(&self, data: &mut TransferFunctionData) {
        let opacity_map = match self.alpha_text.as_deref() {
            Some(text) => {
                let map = opacity_map_from_str(text);
                if map.is_empty() {
                    warn!("empty or malformed <alpha> node, keeping default opacity map");
                    None
                } else {
                    Some(map)
                }
            }
            None => {
                warn!("missing <alpha> node, keeping default opacity map");
                None
            }
        };
        let color_map = match self.color_text.as_deref() {
            Some(text) => {
                let map = color_map_from_str(text);
                if map.is_empty() {
                    warn!("empty or malformed <color> node, keeping default color map");
                    None
                } else {
                    Some(map)
                }
            }
            None => {
                warn!("missing <color> node, keeping default color map");
                None
            }
        };

        data.restore(
            self.window.unwrap_or(data.window()),
            self.level.unwrap_or(data.level()),
            self.llr.unwrap_or(data.llr()),
            self.alpha.unwrap_or(data.alpha()),
            opacity_map,
            color_map,
        );
    }
}

/// The two map child nodes of a transfer-function element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MapNode {
    Alpha,
    Color,
}

impl MapNode {
    pub(crate) fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"alpha" => Some(MapNode::Alpha),
            b"color" => Some(MapNode::Color),
            _ => None,
        }
    }
}

fn write_err(e: impl std::fmt::Display) -> PresetError {
    PresetError::Write(format!("{e}"))
}

fn write_text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> PresetResult<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_err)?;
    xml.write_event(Event::Text(BytesText::new(text)))
        .map_err(write_err)?;
    xml.write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_err)?;
    Ok(())
}

/// Writes one transfer-function element under the given tag.
pub fn write_transfer_data<W: Write>(
    xml: &mut Writer<W>,
    tag: &str,
    data: &TransferFunctionData,
) -> PresetResult<()> {
    let mut start = BytesStart::new(tag);
    start.push_attribute(("window", format!("{}", data.window()).as_str()));
    start.push_attribute(("level", format!("{}", data.level()).as_str()));
    start.push_attribute(("llr", format!("{}", data.llr()).as_str()));
    start.push_attribute(("alpha", format!("{}", data.alpha()).as_str()));
    xml.write_event(Event::Start(start)).map_err(write_err)?;

    write_text_element(xml, "alpha", &opacity_map_to_string(data.opacity_map()))?;
    write_text_element(xml, "color", &color_map_to_string(data.color_map()))?;

    xml.write_event(Event::End(BytesEnd::new(tag)))
        .map_err(write_err)?;
    Ok(())
}

/// Serializes a transfer function as a standalone XML string.
///
/// # Example
///
/// ```rust
/// use vtf_core::{RampStyle, ScalarRange, TransferFunctionData};
/// use vtf_preset::transfer_to_xml;
///
/// let data = TransferFunctionData::new(ScalarRange::new(0.0, 10.0), RampStyle::Step);
/// let xml = transfer_to_xml(&data, "node").unwrap();
/// assert!(xml.starts_with("<node window=\"10\""));
/// ```
pub fn transfer_to_xml(data: &TransferFunctionData, tag: &str) -> PresetResult<String> {
    let mut xml = Writer::new(Vec::new());
    write_transfer_data(&mut xml, tag, data)?;
    String::from_utf8(xml.into_inner()).map_err(|e| PresetError::Write(format!("{e}")))
}

/// Parses a standalone transfer-function element into a data instance.
///
/// The element tag is arbitrary; the first element found is taken as the
/// transfer-function node. Malformed content falls back per the module
/// documentation; only invalid XML or a missing element is an error.
pub fn transfer_from_xml(text: &str, data: &mut TransferFunctionData) -> PresetResult<()> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut parsed: Option<ParsedTransfer> = None;
    let mut current_map: Option<MapNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if parsed.is_none() {
                    parsed = Some(ParsedTransfer::from_start(&e));
                } else {
                    current_map = MapNode::from_name(e.name().as_ref());
                }
            }
            Ok(Event::Empty(e)) => {
                if parsed.is_none() {
                    parsed = Some(ParsedTransfer::from_start(&e));
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(parsed), Some(kind)) = (&mut parsed, current_map) {
                    let text = e.unescape().unwrap_or_default();
                    parsed.set_map_text(kind, text.into_owned());
                }
            }
            Ok(Event::End(_)) => current_map = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(PresetError::Parse(format!("XML error: {e}"))),
            _ => {}
        }
    }

    match parsed {
        Some(parsed) => {
            parsed.apply(data);
            Ok(())
        }
        None => Err(PresetError::Parse("missing transfer function element".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtf_core::{RampStyle, Rgb, ScalarRange};

    fn sample_data() -> TransferFunctionData {
        let mut data = TransferFunctionData::new(ScalarRange::new(0.0, 1000.0), RampStyle::Smooth);
        data.set_window(100.0);
        data.set_llr(20.0);
        data.add_color_point(500, Rgb::new(200, 100, 50));
        data
    }

    #[test]
    fn test_roundtrip_preserves_state() {
        let source = sample_data();
        let xml = transfer_to_xml(&source, "node").unwrap();

        let mut target = TransferFunctionData::new(ScalarRange::new(0.0, 1000.0), RampStyle::Smooth);
        transfer_from_xml(&xml, &mut target).unwrap();

        assert_eq!(target.window(), source.window());
        assert_eq!(target.level(), source.level());
        assert_eq!(target.llr(), source.llr());
        assert_eq!(target.alpha(), source.alpha());
        assert_eq!(target.opacity_map(), source.opacity_map());
        assert_eq!(target.color_map(), source.color_map());
    }

    #[test]
    fn test_missing_map_nodes_keep_defaults() {
        let mut data = sample_data();
        let opacity = data.opacity_map().clone();
        let color = data.color_map().clone();

        transfer_from_xml(r#"<node window="300" level="150" llr="5" alpha="0.5"/>"#, &mut data)
            .unwrap();
        assert_eq!(data.window(), 300.0);
        assert_eq!(data.level(), 150.0);
        assert_eq!(data.llr(), 5.0);
        assert_eq!(data.alpha(), 0.5);
        assert_eq!(data.opacity_map(), &opacity);
        assert_eq!(data.color_map(), &color);
    }

    #[test]
    fn test_malformed_attribute_falls_back() {
        let mut data = sample_data();
        let window = data.window();

        transfer_from_xml(
            r#"<node window="oops" level="42"><alpha>0=0 10=255</alpha><color>0=0/0/0</color></node>"#,
            &mut data,
        )
        .unwrap();
        assert_eq!(data.window(), window);
        assert_eq!(data.level(), 42.0);
        assert_eq!(data.opacity_map().len(), 2);
    }

    #[test]
    fn test_empty_map_node_keeps_default() {
        let mut data = sample_data();
        let opacity = data.opacity_map().clone();
        transfer_from_xml(r#"<node><alpha></alpha></node>"#, &mut data).unwrap();
        assert_eq!(data.opacity_map(), &opacity);
    }

    #[test]
    fn test_document_without_element_is_an_error() {
        let mut data = sample_data();
        assert!(matches!(
            transfer_from_xml("", &mut data),
            Err(PresetError::Parse(_))
        ));
    }

    #[test]
    fn test_window_attribute_clamped_on_restore() {
        let mut data = sample_data();
        transfer_from_xml(r#"<node window="-5"/>"#, &mut data).unwrap();
        assert_eq!(data.window(), 1.0);
    }
}
