/*
 * xliff.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reader for XLIFF translation files.
//!
//! Only the parts needed for label lookup are read: each `<trans-unit>`
//! becomes one [`TranslationEntry`] whose id is the unit's `id` attribute and
//! whose value is the text content of its first `<source>` element.
//!
//! ```xml
//! <xliff version="1.2">
//!   <file source-language="en" datatype="plaintext">
//!     <body>
//!       <trans-unit id="settings.page.size">
//!         <source>Page size</source>
//!       </trans-unit>
//!     </body>
//!   </file>
//! </xliff>
//! ```

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::XliffError;
use crate::labels::TranslationEntry;

/// A `<trans-unit>` being read.
struct OpenUnit {
    id: String,
    value: Option<String>,
}

/// Read all translation units from an XLIFF document, in document order.
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML.
pub fn parse_xliff(content: &str) -> Result<Vec<TranslationEntry>, XliffError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut entries = Vec::new();
    let mut unit: Option<OpenUnit> = None;
    // Element depth inside the first <source> of the current unit; 0 when outside.
    let mut source_depth = 0usize;
    let mut source_text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if source_depth > 0 {
                    source_depth += 1;
                    continue;
                }
                match e.local_name().as_ref() {
                    b"trans-unit" => {
                        unit = Some(OpenUnit {
                            id: unit_id(&e)?,
                            value: None,
                        });
                    }
                    b"source" => {
                        if unit.as_ref().is_some_and(|u| u.value.is_none()) {
                            source_depth = 1;
                            source_text.clear();
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if source_depth > 0 {
                    continue;
                }
                match e.local_name().as_ref() {
                    b"trans-unit" => {
                        entries.push(TranslationEntry::new(unit_id(&e)?, String::new()));
                    }
                    b"source" => {
                        if let Some(open) = unit.as_mut() {
                            open.value.get_or_insert_with(String::new);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if source_depth > 0 {
                    source_text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if source_depth > 0 {
                    source_text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                if source_depth > 0 {
                    source_depth -= 1;
                    if source_depth == 0
                        && let Some(open) = unit.as_mut()
                    {
                        open.value = Some(std::mem::take(&mut source_text));
                    }
                    continue;
                }
                if e.local_name().as_ref() == b"trans-unit"
                    && let Some(open) = unit.take()
                {
                    entries.push(TranslationEntry::new(
                        open.id,
                        open.value.unwrap_or_default(),
                    ));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn unit_id(element: &BytesStart<'_>) -> Result<String, XliffError> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.local_name().as_ref() == b"id" {
            return Ok(attribute.unescape_value()?.into_owned());
        }
    }
    Ok(String::new())
}
