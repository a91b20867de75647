//! ClrMamePro and DOSCenter block-syntax parser and writer.
//!
//! Format:
//! ```text
//! clrmamepro (
//!     name "System Name"
//!     description "System Name"
//!     version 20240101-000000
//! )
//!
//! game (
//!     name "Game Name (Region)"
//!     rom ( name "Game Name (Region).ext" size 12345 crc AABBCCDD sha1 ... )
//! )
//! ```
//!
//! DOSCenter files use the same blocks, but header lines are written as
//! `Key: value` and rom lines use the `file` keyword.

use std::fmt::Write as _;
use std::path::Path;

use indexmap::IndexMap;

use crate::dat::{DatFile, DatLayout, Game, Rom};
use crate::error::DatError;
use crate::format::DatFormat;

/// One parenthesized block: the keyword in front of it and its inner text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawBlock<'a> {
    pub keyword: &'a str,
    pub body: &'a str,
}

/// The fields and roms read out of a single block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Block {
    pub fields: Vec<(String, String)>,
    pub roms: Vec<Rom>,
}

/// Split off the next top-level block.
///
/// Quotes toggle on every unescaped `"`, and parentheses only count while
/// outside quotes, so a `)` inside a quoted rom name never closes the block.
/// Returns `Ok(None)` once no further `(` exists.
pub(crate) fn next_block(text: &str) -> Result<Option<(RawBlock<'_>, &str)>, DatError> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            ')' if !in_quotes && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let open = start.unwrap_or_default();
                    let keyword = text[..open].split_whitespace().last().unwrap_or_default();
                    let block = RawBlock {
                        keyword,
                        body: &text[open + 1..i],
                    };
                    return Ok(Some((block, &text[i + 1..])));
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(DatError::invalid_dat("Unterminated block"));
    }
    Ok(None)
}

/// Shell-style word splitting.
///
/// Whitespace separates words; double quotes group (with `\"` and `\\`
/// escapes), single quotes group literally, and a backslash outside quotes
/// escapes the next character. Returns `None` on an unterminated quote.
pub(crate) fn split_words(input: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        // Skip whitespace
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut word = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            chars.next();
            match c {
                '"' => loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' if matches!(chars.peek(), Some('"' | '\\')) => {
                            word.push(chars.next()?);
                        }
                        other => word.push(other),
                    }
                },
                '\'' => loop {
                    match chars.next()? {
                        '\'' => break,
                        other => word.push(other),
                    }
                },
                '\\' => word.push(chars.next()?),
                other => word.push(other),
            }
        }
        words.push(word);
    }

    Some(words)
}

/// Rom line keyword for a dialect, if `line` is one.
fn rom_line_body(line: &str, format: DatFormat) -> Option<&str> {
    let keywords: &[&str] = match format {
        DatFormat::DosCenter => &["rom", "file"],
        _ => &["rom"],
    };
    keywords.iter().find_map(|kw| {
        let rest = line.strip_prefix(kw)?.trim_start();
        let inner = rest.strip_prefix('(')?;
        let inner = inner.trim_end();
        Some(inner.strip_suffix(')').unwrap_or(inner).trim())
    })
}

/// Parse the interior of `rom ( ... )` into a [`Rom`].
fn parse_rom(body: &str, format: DatFormat) -> Result<Rom, DatError> {
    let tokens = split_words(body).unwrap_or_else(|| {
        log::warn!("Unbalanced quotes in rom line, splitting on whitespace: {body}");
        body.split_whitespace().map(str::to_string).collect()
    });

    let mut rom = Rom::default();
    let mut i = 0;
    while i + 1 < tokens.len() {
        let key = tokens[i].as_str();
        let mut value = tokens[i + 1].clone();
        i += 2;

        // DOSCenter dates are two bare words: `date 1996/12/24 23:32:00`
        if format == DatFormat::DosCenter && key == "date" {
            if let Some(time) = tokens.get(i).filter(|t| t.contains(':')) {
                value.push(' ');
                value.push_str(time);
                i += 1;
            }
        }
        rom.set_attribute(key, value)?;
    }
    if i < tokens.len() {
        log::debug!("Ignoring dangling rom key '{}'", tokens[i]);
    }
    Ok(rom)
}

/// Split a non-rom line into its key and value.
fn parse_field(line: &str, format: DatFormat, file: Option<&Path>) -> Result<(String, String), DatError> {
    if format == DatFormat::DosCenter {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            let plain_key = !key.is_empty()
                && !key.contains(['"', '\''])
                && !key.contains(char::is_whitespace);
            if plain_key {
                return Ok((key.to_string(), value.trim().to_string()));
            }
        }
    }

    match split_words(line) {
        Some(words) if words.len() == 2 => {
            let mut words = words.into_iter();
            let key = words.next().unwrap_or_default();
            let value = words.next().unwrap_or_default();
            Ok((key, value))
        }
        _ => Err(DatError::parse(line, file)),
    }
}

/// Read the lines of one block body.
pub(crate) fn read_block(body: &str, format: DatFormat, file: Option<&Path>) -> Result<Block, DatError> {
    let mut block = Block::default();
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rom_body) = rom_line_body(line, format) {
            block.roms.push(parse_rom(rom_body, format)?);
        } else {
            block.fields.push(parse_field(line, format, file)?);
        }
    }
    Ok(block)
}

/// Parse a whole ClrMamePro or DOSCenter file.
pub(crate) fn parse(text: &str, format: DatFormat, file: Option<&Path>) -> Result<DatFile, DatError> {
    let Some((header_block, mut rest)) = next_block(text)? else {
        return Err(DatError::invalid_dat(format!(
            "No header block found in {format} DAT file"
        )));
    };

    let header_fields = read_block(header_block.body, format, file)?;
    let header: IndexMap<String, String> = header_fields
        .fields
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect();
    if header.get("name").is_none_or(|n| n.is_empty()) {
        return Err(DatError::missing_header("name", file));
    }
    if !header.contains_key("description") {
        return Err(DatError::missing_header("description", file));
    }

    let mut layout = DatLayout::for_format(format);
    if !header_block.keyword.is_empty() {
        layout.root = header_block.keyword.to_string();
    }

    let mut games = Vec::new();
    while let Some((block, remainder)) = next_block(rest)? {
        if games.is_empty() && !block.keyword.is_empty() {
            layout.game_tag = block.keyword.to_string();
        }
        let Block { fields, roms } = read_block(block.body, format, file)?;
        games.push(Game {
            fields,
            roms,
            ..Game::default()
        });
        rest = remainder;
    }
    log::debug!("Read {} {format} games", games.len());

    Ok(DatFile {
        format,
        file: file.map(Path::to_path_buf),
        header,
        games,
        layout,
        classification: Default::default(),
    })
}

/// Quote a value when it can't be written as a bare word.
fn quote(value: &str) -> String {
    let bare = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '(' | ')'));
    if bare {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Write a DAT in block syntax.
pub(crate) fn render(dat: &DatFile) -> String {
    let format = dat.format;
    let mut out = String::new();

    let _ = writeln!(out, "{} (", dat.layout.root);
    for (key, value) in &dat.header {
        match format {
            DatFormat::DosCenter => {
                let _ = writeln!(out, "\t{key}: {value}");
            }
            _ => {
                let _ = writeln!(out, "\t{key} {}", quote(value));
            }
        }
    }
    out.push_str(")\n");

    let rom_keyword = match format {
        DatFormat::DosCenter => "file",
        _ => "rom",
    };
    for game in &dat.games {
        let _ = writeln!(out, "\n{} (", dat.layout.game_tag);
        for (key, value) in game.attributes.iter().chain(game.fields.iter()) {
            let _ = writeln!(out, "\t{key} {}", quote(value));
        }
        if !game.extra.is_empty() {
            log::debug!(
                "Dropping {} XML-only elements from game {:?}",
                game.extra.len(),
                game.name()
            );
        }
        for rom in &game.roms {
            let attrs: Vec<String> = rom
                .attribute_pairs()
                .iter()
                .map(|(k, v)| format!("{k} {}", quote(v)))
                .collect();
            let _ = writeln!(out, "\t{rom_keyword} ( {} )", attrs.join(" "));
        }
        out.push_str(")\n");
    }
    out
}

#[cfg(test)]
#[path = "tests/clrmamepro_tests.rs"]
mod tests;
