use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

use crate::error::{CoreError, Result};
use crate::model::catalog::Catalog;
use crate::model::entry::{EntryStatus, Location, TsEntry, LENGTH_VARIANT_SEPARATOR};

/// Parses a TS document into a flat catalog.
///
/// Text content is kept verbatim (no trimming), so trailing newlines inside
/// `<source>` survive a parse/rebuild cycle.
pub fn parse(text: &str) -> Result<Catalog> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut ts = TsReader::new(text);
    let mut catalog: Option<Catalog> = None;

    loop {
        match ts.next()? {
            Event::Start(e) if e.name().as_ref() == b"TS" => {
                let mut c = ts.header(&e)?;
                ts.read_body(&mut c)?;
                catalog = Some(c);
            }
            Event::Empty(e) if e.name().as_ref() == b"TS" => {
                catalog = Some(ts.header(&e)?);
            }
            Event::Start(e) | Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return Err(ts.error(format!("unexpected root element <{name}>")));
            }
            Event::Eof => break,
            // declaration, doctype, comments, whitespace
            _ => {}
        }
    }

    let catalog = catalog.ok_or_else(|| CoreError::parse("missing <TS> root element", text.len()))?;

    debug!(
        entries = catalog.entries.len(),
        language = catalog.language.as_deref().unwrap_or(""),
        "parsed ts catalog"
    );

    Ok(catalog)
}

struct TsReader<'a> {
    reader: Reader<&'a [u8]>,
    next_index: usize,
}

impl<'a> TsReader<'a> {
    fn new(text: &'a str) -> Self {
        let mut reader = Reader::from_str(text);
        reader.trim_text(false);
        TsReader {
            reader,
            next_index: 0,
        }
    }

    fn next(&mut self) -> Result<Event<'a>> {
        self.reader.read_event().map_err(|e| self.error(e.to_string()))
    }

    fn error(&self, message: impl Into<String>) -> CoreError {
        CoreError::parse(message, self.reader.buffer_position())
    }

    fn attr(&self, e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.error(format!("invalid attribute: {err}")))?;
            if attr.key.as_ref() == name {
                let value = attr.unescape_value().map_err(|err| self.error(err.to_string()))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn skip(&mut self, e: &BytesStart<'_>) -> Result<()> {
        trace!(element = %String::from_utf8_lossy(e.name().as_ref()), "skipping element");
        let end = e.to_end().into_owned();
        self.reader
            .read_to_end(end.name())
            .map_err(|err| self.error(err.to_string()))?;
        Ok(())
    }

    fn byte_value(&self, e: &BytesStart<'_>) -> Result<char> {
        let raw = self.attr(e, b"value")?.unwrap_or_default();
        let code = match raw.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => raw.parse::<u32>(),
        }
        .map_err(|_| self.error(format!("invalid <byte> value '{raw}'")))?;

        char::from_u32(code).ok_or_else(|| self.error(format!("invalid <byte> value '{raw}'")))
    }

    fn header(&self, e: &BytesStart<'_>) -> Result<Catalog> {
        let mut catalog = Catalog::default();
        if let Some(v) = self.attr(e, b"version")? {
            catalog.version = v;
        }
        catalog.language = self.attr(e, b"language")?.filter(|l| !l.is_empty());
        catalog.source_language = self.attr(e, b"sourcelanguage")?.filter(|l| !l.is_empty());
        Ok(catalog)
    }

    fn read_body(&mut self, catalog: &mut Catalog) -> Result<()> {
        loop {
            match self.next()? {
                Event::Start(e) if e.name().as_ref() == b"context" => self.read_context(catalog)?,
                Event::Start(e) => self.skip(&e)?,
                Event::End(e) if e.name().as_ref() == b"TS" => return Ok(()),
                Event::Eof => return Err(self.error("unexpected end of file inside <TS>")),
                _ => {}
            }
        }
    }

    fn read_context(&mut self, catalog: &mut Catalog) -> Result<()> {
        let mut name = String::new();

        loop {
            match self.next()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"name" => name = self.read_text(b"name")?,
                    b"comment" => {
                        let comment = self.read_text(b"comment")?;
                        catalog.context_comments.insert(name.clone(), comment);
                    }
                    b"message" => {
                        let entry = self.read_message(&e, &name)?;
                        catalog.entries.push(entry);
                    }
                    _ => self.skip(&e)?,
                },
                Event::End(e) if e.name().as_ref() == b"context" => return Ok(()),
                Event::Eof => return Err(self.error("unexpected end of file inside <context>")),
                _ => {}
            }
        }
    }

    fn read_message(&mut self, start: &BytesStart<'_>, context: &str) -> Result<TsEntry> {
        let mut entry = TsEntry::new(format!("msg-{}", self.next_index), context, "");
        self.next_index += 1;

        entry.id = self.attr(start, b"id")?.filter(|v| !v.is_empty());
        entry.numerus = self.attr(start, b"numerus")?.as_deref() == Some("yes");

        loop {
            match self.next()? {
                Event::Empty(e) => match e.name().as_ref() {
                    b"location" => entry.locations.push(self.location(&e)?),
                    b"translation" => {
                        entry.status = EntryStatus::from_type_attr(self.attr(&e, b"type")?.as_deref());
                    }
                    b"comment" => entry.comment = Some(String::new()),
                    _ => {}
                },
                Event::Start(e) => match e.name().as_ref() {
                    b"location" => {
                        entry.locations.push(self.location(&e)?);
                        self.skip(&e)?;
                    }
                    b"source" => entry.source = self.read_text(b"source")?,
                    b"comment" => entry.comment = Some(self.read_text(b"comment")?),
                    b"oldsource" => entry.old_source = Some(self.read_text(b"oldsource")?),
                    b"oldcomment" => entry.old_comment = Some(self.read_text(b"oldcomment")?),
                    b"extracomment" => entry.extra_comment = Some(self.read_text(b"extracomment")?),
                    b"translatorcomment" => {
                        entry.translator_comment = Some(self.read_text(b"translatorcomment")?)
                    }
                    b"translation" => self.read_translation(&e, &mut entry)?,
                    _ => self.skip(&e)?,
                },
                Event::End(e) if e.name().as_ref() == b"message" => return Ok(entry),
                Event::Eof => return Err(self.error("unexpected end of file inside <message>")),
                _ => {}
            }
        }
    }

    fn location(&self, e: &BytesStart<'_>) -> Result<Location> {
        Ok(Location {
            filename: self.attr(e, b"filename")?,
            line: self.attr(e, b"line")?,
        })
    }

    fn read_translation(&mut self, start: &BytesStart<'_>, entry: &mut TsEntry) -> Result<()> {
        entry.status = EntryStatus::from_type_attr(self.attr(start, b"type")?.as_deref());

        let mut text = String::new();
        let mut variants: Vec<String> = Vec::new();
        let mut forms: Vec<String> = Vec::new();

        loop {
            match self.next()? {
                Event::Text(t) => text.push_str(&t.unescape().map_err(|e| self.error(e.to_string()))?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Empty(e) => match e.name().as_ref() {
                    b"byte" => text.push(self.byte_value(&e)?),
                    b"numerusform" => forms.push(String::new()),
                    b"lengthvariant" => variants.push(String::new()),
                    _ => {}
                },
                Event::Start(e) => match e.name().as_ref() {
                    b"numerusform" => forms.push(self.read_variants(b"numerusform")?),
                    b"lengthvariant" => variants.push(self.read_text(b"lengthvariant")?),
                    _ => self.skip(&e)?,
                },
                Event::End(e) if e.name().as_ref() == b"translation" => break,
                Event::Eof => return Err(self.error("unexpected end of file inside <translation>")),
                _ => {}
            }
        }

        entry.translation = if !variants.is_empty() {
            join_variants(&variants)
        } else if forms.is_empty() {
            text
        } else {
            String::new()
        };
        entry.numerus_forms = forms;

        Ok(())
    }

    /// Text of `tag`, folding `<lengthvariant>` children into one string.
    fn read_variants(&mut self, tag: &[u8]) -> Result<String> {
        let mut text = String::new();
        let mut variants: Vec<String> = Vec::new();

        loop {
            match self.next()? {
                Event::Text(t) => text.push_str(&t.unescape().map_err(|e| self.error(e.to_string()))?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Empty(e) => match e.name().as_ref() {
                    b"byte" => text.push(self.byte_value(&e)?),
                    b"lengthvariant" => variants.push(String::new()),
                    _ => {}
                },
                Event::Start(e) if e.name().as_ref() == b"lengthvariant" => {
                    variants.push(self.read_text(b"lengthvariant")?)
                }
                Event::Start(e) => self.skip(&e)?,
                Event::End(e) if e.name().as_ref() == tag => break,
                Event::Eof => return Err(self.unexpected_eof(tag)),
                _ => {}
            }
        }

        if variants.is_empty() {
            Ok(text)
        } else {
            Ok(join_variants(&variants))
        }
    }

    fn read_text(&mut self, tag: &[u8]) -> Result<String> {
        let mut out = String::new();

        loop {
            match self.next()? {
                Event::Text(t) => out.push_str(&t.unescape().map_err(|e| self.error(e.to_string()))?),
                Event::CData(c) => out.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Empty(e) if e.name().as_ref() == b"byte" => out.push(self.byte_value(&e)?),
                Event::Start(e) => self.skip(&e)?,
                Event::End(e) if e.name().as_ref() == tag => return Ok(out),
                Event::Eof => return Err(self.unexpected_eof(tag)),
                _ => {}
            }
        }
    }

    fn unexpected_eof(&self, tag: &[u8]) -> CoreError {
        self.error(format!(
            "unexpected end of file inside <{}>",
            String::from_utf8_lossy(tag)
        ))
    }
}

fn join_variants(variants: &[String]) -> String {
    let sep = LENGTH_VARIANT_SEPARATOR.to_string();
    variants.join(sep.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n";

    fn doc(body: &str) -> String {
        format!("{HEADER}<TS version=\"2.1\" language=\"uk_UA\">\n{body}</TS>\n")
    }

    #[test]
    fn reads_header_attributes() {
        let c = parse(&doc("")).unwrap();
        assert_eq!(c.version, "2.1");
        assert_eq!(c.language.as_deref(), Some("uk_UA"));
        assert_eq!(c.source_language, None);
        assert!(c.entries.is_empty());
    }

    #[test]
    fn reads_message_fields_and_unescapes() {
        let c = parse(&doc(
            "<context>\n    <name>AppFontManager</name>\n    <message>\n        \
             <location filename=\"../appfontdialog.cpp\" line=\"+418\"/>\n        \
             <source>&apos;%1&apos; is not a file.</source>\n        \
             <extracomment>file name</extracomment>\n        \
             <translation>&apos;%1&apos; не є файлом.</translation>\n    </message>\n</context>\n",
        ))
        .unwrap();

        let e = &c.entries[0];
        assert_eq!(e.entry_id, "msg-0");
        assert_eq!(e.context, "AppFontManager");
        assert_eq!(e.source, "'%1' is not a file.");
        assert_eq!(e.translation, "'%1' не є файлом.");
        assert_eq!(e.status, EntryStatus::Finished);
        assert_eq!(e.extra_comment.as_deref(), Some("file name"));
        assert_eq!(e.locations[0].line.as_deref(), Some("+418"));
        assert_eq!(e.locations[0].filename.as_deref(), Some("../appfontdialog.cpp"));
    }

    #[test]
    fn reads_numerus_forms() {
        let c = parse(&doc(
            "<context>\n    <name>LUpdate</name>\n    <message numerus=\"yes\">\n        \
             <source>Removed %n entries</source>\n        <translation type=\"unfinished\">\n            \
             <numerusform>a</numerusform>\n            <numerusform></numerusform>\n            \
             <numerusform>c</numerusform>\n        </translation>\n    </message>\n</context>\n",
        ))
        .unwrap();

        let e = &c.entries[0];
        assert!(e.numerus);
        assert_eq!(e.numerus_forms, vec!["a", "", "c"]);
        assert_eq!(e.translation, "");
        assert_eq!(e.status, EntryStatus::Unfinished);
    }

    #[test]
    fn keeps_trailing_newline_in_source() {
        let c = parse(&doc(
            "<context>\n    <name>LRelease</name>\n    <message>\n        \
             <source>lrelease version %1\n</source>\n        \
             <translation type=\"unfinished\"></translation>\n    </message>\n</context>\n",
        ))
        .unwrap();
        assert_eq!(c.entries[0].source, "lrelease version %1\n");
    }

    #[test]
    fn folds_length_variants_and_bytes() {
        let c = parse(&doc(
            "<context>\n    <name>X</name>\n    <message>\n        <source>a<byte value=\"x1b\"/>b</source>\n        \
             <translation variants=\"yes\">\n            <lengthvariant>long</lengthvariant>\n            \
             <lengthvariant>s</lengthvariant>\n        </translation>\n    </message>\n</context>\n",
        ))
        .unwrap();
        let e = &c.entries[0];
        assert_eq!(e.source, "a\u{1b}b");
        assert_eq!(e.translation, "long\u{9c}s");
    }

    #[test]
    fn skips_unknown_elements() {
        let c = parse(&doc(
            "<defaultcodec>UTF-8</defaultcodec>\n<context>\n    <name>X</name>\n    <message>\n        \
             <source>s</source>\n        <userdata>opaque</userdata>\n        \
             <translation type=\"obsolete\">t</translation>\n    </message>\n</context>\n",
        ))
        .unwrap();
        assert_eq!(c.entries.len(), 1);
        assert_eq!(c.entries[0].status, EntryStatus::Obsolete);
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = parse(HEADER).unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
    }

    #[test]
    fn unexpected_root_is_an_error() {
        let err = parse("<xliff></xliff>").unwrap_err();
        assert!(err.to_string().contains("xliff"));
    }

    #[test]
    fn truncated_document_is_an_error() {
        let err = parse("<TS version=\"2.0\"><context><name>X</name><message><source>a</source>").unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
    }
}
