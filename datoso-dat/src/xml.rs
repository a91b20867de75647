//! Logiqx-style XML DATs.
//!
//! `quick-xml` tokenizes the document into a generic [`Element`] tree, which
//! is then mapped onto the uniform model. Saving goes the other way: the
//! model is turned back into a tree and written with `quick-xml`'s writer.

use std::path::Path;

use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::dat::{DatFile, DatLayout, Game, GameChild, Rom, RootChild};
use crate::error::DatError;
use crate::format::DatFormat;

/// A generic XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// A text-only element such as `<name>Foo</name>`.
    fn is_simple(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    fn text_node(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: (!text.is_empty()).then(|| text.to_string()),
            ..Self::default()
        }
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub doctype: Option<String>,
    pub root: Element,
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element, DatError> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn append_text(stack: &mut [Element], text: &str) {
    if let Some(top) = stack.last_mut() {
        top.text.get_or_insert_with(String::new).push_str(text);
    }
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, DatError> {
        let mut xml = Reader::from_str(text);
        xml.config_mut().trim_text(true);

        let mut doctype = None;
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            match xml.read_event()? {
                Event::Start(ref e) => stack.push(element_from_start(e)?),
                Event::Empty(ref e) => {
                    let element = element_from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Event::Text(ref e) => append_text(&mut stack, &e.unescape()?),
                Event::CData(e) => append_text(&mut stack, &String::from_utf8_lossy(&e.into_inner())),
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(element),
                            None => root = Some(element),
                        }
                    }
                }
                Event::DocType(ref e) => {
                    doctype = Some(String::from_utf8_lossy(e).trim().to_string());
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(DatError::invalid_dat("Unclosed XML element"));
        }
        let root = root.ok_or_else(|| DatError::invalid_dat("No root element in XML DAT file"))?;
        Ok(Self { doctype, root })
    }

    pub fn render(&self) -> Result<String, DatError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if let Some(ref doctype) = self.doctype {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
        }
        write_element(&mut writer, &self.root)?;

        let mut out = String::from_utf8_lossy(&writer.into_inner()).into_owned();
        out.push('\n');
        Ok(out)
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), DatError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(ref text) = element.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn rom_from_element(element: &Element) -> Result<Rom, DatError> {
    let mut rom = Rom::default();
    for (key, value) in &element.attributes {
        rom.set_attribute(key, value.clone())?;
    }
    Ok(rom)
}

fn game_from_element(element: &Element) -> Result<Game, DatError> {
    let mut game = Game {
        attributes: element.attributes.clone(),
        ..Game::default()
    };
    for child in &element.children {
        let slot = if child.name == "rom" {
            game.roms.push(rom_from_element(child)?);
            GameChild::Rom
        } else if child.is_simple() {
            let text = child.text.clone().unwrap_or_default();
            game.fields.push((child.name.clone(), text));
            GameChild::Field
        } else {
            game.extra.push(child.clone());
            GameChild::Extra
        };
        game.order.push(slot);
    }
    Ok(game)
}

/// Map a parsed document onto the uniform model.
pub(crate) fn from_document(doc: Document, file: Option<&Path>) -> Result<DatFile, DatError> {
    let Document { doctype, root } = doc;
    let mut layout = DatLayout::for_format(DatFormat::Xml);
    layout.root = root.name.clone();
    layout.root_attributes = root.attributes.clone();
    layout.doctype = doctype;

    let mut header = IndexMap::new();
    match root.child("header") {
        Some(header_el) => {
            for child in &header_el.children {
                if child.is_simple() {
                    header.insert(child.name.clone(), child.text.clone().unwrap_or_default());
                } else {
                    layout.header_extra.push(child.clone());
                }
            }
        }
        None => {
            layout.has_header = false;
            for key in ["name", "description"] {
                if let Some((_, v)) = root.attributes.iter().find(|(k, _)| k == key) {
                    header.insert(key.to_string(), v.clone());
                }
            }
        }
    }
    if header.get("name").is_none_or(|n| n.is_empty()) {
        return Err(DatError::missing_header("name", file));
    }

    if let Some(first) = root.children.iter().find(|c| c.name != "header") {
        layout.game_tag = first.name.clone();
    }

    let mut games = Vec::new();
    for child in &root.children {
        let slot = if child.name == "header" {
            RootChild::Header
        } else if child.name == layout.game_tag {
            games.push(game_from_element(child)?);
            RootChild::Game
        } else {
            layout.root_extra.push(child.clone());
            RootChild::Extra
        };
        layout.root_order.push(slot);
    }

    Ok(DatFile {
        format: DatFormat::Xml,
        file: file.map(Path::to_path_buf),
        header,
        games,
        layout,
        classification: Default::default(),
    })
}

pub(crate) fn parse(text: &str, file: Option<&Path>) -> Result<DatFile, DatError> {
    let doc = Document::parse(text)?;
    from_document(doc, file)
}

/// Lay out grouped elements in their recorded source order.
///
/// Each slot takes the next unused element of its kind, so a slot whose
/// element was removed (a deduped rom) is skipped. Elements left over
/// after the last slot follow in group order.
fn in_source_order<K: Copy + PartialEq>(order: &[K], groups: Vec<(K, Vec<Element>)>) -> Vec<Element> {
    let mut groups: Vec<_> = groups.into_iter().map(|(k, v)| (k, v.into_iter())).collect();
    let mut out = Vec::new();
    for kind in order {
        if let Some((_, items)) = groups.iter_mut().find(|(k, _)| k == kind) {
            out.extend(items.next());
        }
    }
    for (_, rest) in groups {
        out.extend(rest);
    }
    out
}

fn game_to_element(game: &Game, tag: &str) -> Element {
    let mut element = Element::new(tag);
    element.attributes = game.attributes.clone();

    let fields = game
        .fields
        .iter()
        .map(|(key, value)| Element::text_node(key, value))
        .collect();
    let roms = game
        .roms
        .iter()
        .map(|rom| Element {
            attributes: rom.attribute_pairs(),
            ..Element::new("rom")
        })
        .collect();
    element.children = in_source_order(
        &game.order,
        vec![
            (GameChild::Field, fields),
            (GameChild::Rom, roms),
            (GameChild::Extra, game.extra.clone()),
        ],
    );
    element
}

/// Turn the model back into a document.
pub(crate) fn to_document(dat: &DatFile) -> Document {
    let layout = &dat.layout;
    let mut root = Element::new(layout.root.as_str());
    root.attributes = layout.root_attributes.clone();

    let mut header_group = Vec::new();
    if layout.has_header {
        let mut header = Element::new("header");
        for (key, value) in &dat.header {
            header.children.push(Element::text_node(key, value));
        }
        header.children.extend(layout.header_extra.iter().cloned());
        header_group.push(header);
    } else {
        for key in ["name", "description"] {
            let Some(value) = dat.header_value(key) else {
                continue;
            };
            match root.attributes.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value.to_string(),
                None => root.attributes.push((key.to_string(), value.to_string())),
            }
        }
    }

    let games = dat
        .games
        .iter()
        .map(|game| game_to_element(game, &layout.game_tag))
        .collect();
    root.children = in_source_order(
        &layout.root_order,
        vec![
            (RootChild::Header, header_group),
            (RootChild::Game, games),
            (RootChild::Extra, layout.root_extra.clone()),
        ],
    );

    Document {
        doctype: layout.doctype.clone(),
        root,
    }
}

pub(crate) fn render(dat: &DatFile) -> Result<String, DatError> {
    to_document(dat).render()
}

#[cfg(test)]
#[path = "tests/xml_tests.rs"]
mod tests;
