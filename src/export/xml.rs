//! Flat XML document holding one clip's descriptors:
//!
//! ```xml
//! <root>
//!   <descriptors>
//!     <audio_spectrum_centroid>…</audio_spectrum_centroid>
//!     <audio_spectrum_spread>…</audio_spectrum_spread>
//!     <audio_spectrum_flatness>…</audio_spectrum_flatness>
//!     <log_attack_time>…</log_attack_time>
//!   </descriptors>
//! </root>
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::audio::features::{Descriptor, DescriptorSet};
use crate::error::{Error, Result};

const ROOT: &str = "root";
const GROUP: &str = "descriptors";

pub fn write_to<W: Write>(inner: W, set: &DescriptorSet) -> Result<()> {
    let mut writer = Writer::new_with_indent(inner, b' ', 2);

    writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
    writer.write_event(Event::Start(BytesStart::new(GROUP)))?;
    for d in Descriptor::ALL {
        let value = set.get(d).to_string();
        writer.write_event(Event::Start(BytesStart::new(d.tag())))?;
        writer.write_event(Event::Text(BytesText::new(&value)))?;
        writer.write_event(Event::End(BytesEnd::new(d.tag())))?;
    }
    writer.write_event(Event::End(BytesEnd::new(GROUP)))?;
    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;

    writer.into_inner().flush()?;
    Ok(())
}

pub fn to_string(set: &DescriptorSet) -> Result<String> {
    let mut buf = Vec::new();
    write_to(&mut buf, set)?;
    String::from_utf8(buf).map_err(|e| Error::MalformedDocument(e.to_string()))
}

/// Write the document to `path`, replacing any existing file.
pub fn write_descriptors(path: &Path, set: &DescriptorSet) -> Result<()> {
    let file = File::create(path)?;
    write_to(BufWriter::new(file), set)?;
    log::info!("Wrote descriptors to {}", path.display());
    Ok(())
}

pub fn read_descriptors(path: &Path) -> Result<DescriptorSet> {
    let xml = std::fs::read_to_string(path)?;
    parse(&xml)
}

pub fn parse(xml: &str) -> Result<DescriptorSet> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut values: [Option<f64>; 4] = [None; 4];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .map_err(|e| Error::MalformedDocument(e.to_string()))?
                    .to_string();
                path.push(name);
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(t) => {
                let Some(d) = leaf_descriptor(&path) else {
                    continue;
                };
                let text = t.unescape()?;
                let value: f64 = text.trim().parse().map_err(|_| {
                    Error::MalformedDocument(format!("{d} is not a number: {text:?}"))
                })?;
                let slot = &mut values[index_of(d)];
                if slot.replace(value).is_some() {
                    return Err(Error::MalformedDocument(format!("duplicate {d}")));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let get = |d: Descriptor| {
        values[index_of(d)].ok_or_else(|| Error::MalformedDocument(format!("missing {d}")))
    };
    Ok(DescriptorSet {
        centroid: get(Descriptor::Centroid)?,
        spread: get(Descriptor::Spread)?,
        flatness: get(Descriptor::Flatness)?,
        log_attack_time: get(Descriptor::LogAttackTime)?,
    })
}

fn leaf_descriptor(path: &[String]) -> Option<Descriptor> {
    match path {
        [root, group, leaf] if root == ROOT && group == GROUP => Descriptor::from_tag(leaf),
        _ => None,
    }
}

fn index_of(descriptor: Descriptor) -> usize {
    Descriptor::ALL
        .iter()
        .position(|&d| d == descriptor)
        .unwrap_or_default()
}
