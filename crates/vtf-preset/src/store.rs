//! Named preset store: one XML file per preset.

use crate::error::{PresetError, PresetResult};
use crate::xml::{MapNode, ParsedTransfer, write_transfer_data};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use vtf_core::TransferFunctionData;

/// Which subset of a preset to apply when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresetScope {
    /// Apply both the 3D and 2D transfer functions.
    #[default]
    All,
    /// Apply only the 3D (volume) transfer function.
    VolumeOnly,
    /// Apply only the 2D (slice) transfer function.
    SliceOnly,
}

impl PresetScope {
    fn includes_volume(self) -> bool {
        matches!(self, PresetScope::All | PresetScope::VolumeOnly)
    }

    fn includes_slice(self) -> bool {
        matches!(self, PresetScope::All | PresetScope::SliceOnly)
    }
}

/// File-backed store of named transfer-function presets.
///
/// Each preset is one XML file `<name>.xml` under the store directory:
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <preset name="CT Bone">
///   <volume window="..." level="..." llr="..." alpha="...">...</volume>
///   <slice window="..." level="..." llr="..." alpha="...">...</slice>
/// </preset>
/// ```
///
/// The store is mechanical: it does not apply the unsigned-CT shift. When
/// presets are authored against signed CT data, the application brackets
/// [`TransferFunctionData::unsigned_ct`] around save and load itself.
#[derive(Debug, Clone)]
pub struct PresetStore {
    root: PathBuf,
}

impl PresetStore {
    /// Opens (and creates if needed) a store rooted at a directory.
    pub fn new(root: impl Into<PathBuf>) -> PresetResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.xml"))
    }

    /// Saves a preset under a name, overwriting any existing one.
    ///
    /// Either transfer function may be omitted to store a 3D-only or
    /// 2D-only preset.
    pub fn save(
        &self,
        name: &str,
        volume: Option<&TransferFunctionData>,
        slice: Option<&TransferFunctionData>,
    ) -> PresetResult<()> {
        let file = File::create(self.path_for(name))?;
        let mut xml = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| PresetError::Write(format!("{e}")))?;

        let mut start = BytesStart::new("preset");
        start.push_attribute(("name", name));
        xml.write_event(Event::Start(start))
            .map_err(|e| PresetError::Write(format!("{e}")))?;

        if let Some(data) = volume {
            write_transfer_data(&mut xml, "volume", data)?;
        }
        if let Some(data) = slice {
            write_transfer_data(&mut xml, "slice", data)?;
        }

        xml.write_event(Event::End(BytesEnd::new("preset")))
            .map_err(|e| PresetError::Write(format!("{e}")))?;
        xml.into_inner().flush()?;
        Ok(())
    }

    /// Loads a named preset into the given transfer functions.
    ///
    /// The scope restricts which subtrees are applied; a requested subtree
    /// absent from the file logs a warning and leaves the target untouched.
    /// Malformed content inside a subtree falls back field by field, per
    /// [`crate::transfer_from_xml`] semantics.
    pub fn load(
        &self,
        name: &str,
        scope: PresetScope,
        volume: Option<&mut TransferFunctionData>,
        slice: Option<&mut TransferFunctionData>,
    ) -> PresetResult<()> {
        let text = fs::read_to_string(self.path_for(name)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PresetError::UnknownPreset(name.to_string())
            } else {
                PresetError::Io(e)
            }
        })?;
        let doc = parse_preset(&text)?;

        if scope.includes_volume() {
            if let Some(target) = volume {
                match &doc.volume {
                    Some(parsed) => parsed.apply(target),
                    None => warn!(preset = %name, "preset has no <volume> node, target unchanged"),
                }
            }
        }
        if scope.includes_slice() {
            if let Some(target) = slice {
                match &doc.slice {
                    Some(parsed) => parsed.apply(target),
                    None => warn!(preset = %name, "preset has no <slice> node, target unchanged"),
                }
            }
        }
        Ok(())
    }

    /// Names of all stored presets, sorted.
    pub fn list(&self) -> PresetResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("xml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Deletes a stored preset.
    pub fn remove(&self, name: &str) -> PresetResult<()> {
        fs::remove_file(self.path_for(name)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PresetError::UnknownPreset(name.to_string())
            } else {
                PresetError::Io(e)
            }
        })
    }
}

#[derive(Debug, Default)]
struct PresetDoc {
    volume: Option<ParsedTransfer>,
    slice: Option<ParsedTransfer>,
}

/// Parses a whole preset document into its 3D and 2D subtrees.
fn parse_preset(text: &str) -> PresetResult<PresetDoc> {
    enum Target {
        Volume,
        Slice,
    }

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut doc = PresetDoc::default();
    let mut current_tf: Option<Target> = None;
    let mut current_map: Option<MapNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"volume" => {
                    doc.volume = Some(ParsedTransfer::from_start(&e));
                    current_tf = Some(Target::Volume);
                }
                b"slice" => {
                    doc.slice = Some(ParsedTransfer::from_start(&e));
                    current_tf = Some(Target::Slice);
                }
                name => {
                    if current_tf.is_some() {
                        current_map = MapNode::from_name(name);
                    }
                }
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"volume" => doc.volume = Some(ParsedTransfer::from_start(&e)),
                b"slice" => doc.slice = Some(ParsedTransfer::from_start(&e)),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Some(kind) = current_map {
                    let parsed = match current_tf {
                        Some(Target::Volume) => doc.volume.as_mut(),
                        Some(Target::Slice) => doc.slice.as_mut(),
                        None => None,
                    };
                    if let Some(parsed) = parsed {
                        let text = e.unescape().unwrap_or_default();
                        parsed.set_map_text(kind, text.into_owned());
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"volume" | b"slice" => {
                    current_tf = None;
                    current_map = None;
                }
                b"alpha" | b"color" => current_map = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(PresetError::Parse(format!("XML error: {e}"))),
            _ => {}
        }
    }

    Ok(doc)
}
