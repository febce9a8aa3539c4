use std::collections::HashSet;
use std::fmt::Write;

use quick_xml::escape::escape;

use crate::model::catalog::Catalog;
use crate::model::entry::{TsEntry, LENGTH_VARIANT_SEPARATOR};

/// Writes the catalog in lupdate's canonical layout.
pub fn rebuild(catalog: &Catalog) -> String {
    let mut out = String::with_capacity(catalog.entries.len() * 160 + 128);

    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!DOCTYPE TS>\n");

    let _ = write!(out, "<TS version=\"{}\"", protect(&catalog.version));
    if let Some(lang) = catalog.language.as_deref() {
        let _ = write!(out, " language=\"{}\"", protect(lang));
    }
    if let Some(lang) = catalog.source_language.as_deref() {
        let _ = write!(out, " sourcelanguage=\"{}\"", protect(lang));
    }
    out.push_str(">\n");

    // a context comment belongs to the first run of its context only
    let mut commented: HashSet<&str> = HashSet::new();

    for (context, entries) in catalog.context_groups() {
        let comment = if commented.insert(context) {
            catalog.context_comments.get(context).map(String::as_str)
        } else {
            None
        };
        write_context(&mut out, context, comment, entries);
    }

    // contexts holding only a comment go after all message-bearing ones
    for (context, comment) in &catalog.context_comments {
        if !commented.contains(context.as_str()) {
            write_context(&mut out, context, Some(comment), &[]);
        }
    }

    out.push_str("</TS>\n");
    out
}

fn write_context(out: &mut String, name: &str, comment: Option<&str>, entries: &[TsEntry]) {
    out.push_str("<context>\n");
    let _ = writeln!(out, "    <name>{}</name>", protect(name));
    if let Some(comment) = comment {
        let _ = writeln!(out, "    <comment>{}</comment>", protect(comment));
    }
    for e in entries {
        write_message(out, e);
    }
    out.push_str("</context>\n");
}

fn write_message(out: &mut String, e: &TsEntry) {
    out.push_str("    <message");
    if let Some(id) = e.id.as_deref() {
        let _ = write!(out, " id=\"{}\"", protect(id));
    }
    if e.numerus {
        out.push_str(" numerus=\"yes\"");
    }
    out.push_str(">\n");

    for loc in &e.locations {
        out.push_str("        <location");
        if let Some(f) = loc.filename.as_deref() {
            let _ = write!(out, " filename=\"{}\"", protect(f));
        }
        if let Some(l) = loc.line.as_deref() {
            let _ = write!(out, " line=\"{}\"", protect(l));
        }
        out.push_str("/>\n");
    }

    let _ = writeln!(out, "        <source>{}</source>", protect(&e.source));
    write_optional(out, "oldsource", e.old_source.as_deref());
    write_optional(out, "comment", e.comment.as_deref());
    write_optional(out, "oldcomment", e.old_comment.as_deref());
    write_optional(out, "extracomment", e.extra_comment.as_deref());
    write_optional(out, "translatorcomment", e.translator_comment.as_deref());

    out.push_str("        <translation");
    if let Some(kind) = e.status.type_attr() {
        let _ = write!(out, " type=\"{kind}\"");
    }

    if e.numerus {
        out.push('>');
        for form in &e.numerus_forms {
            out.push_str("\n            <numerusform");
            write_variants(out, "            ", form);
            out.push_str("</numerusform>");
        }
        out.push_str("\n        ");
    } else {
        write_variants(out, "        ", &e.translation);
    }
    out.push_str("</translation>\n");

    out.push_str("    </message>\n");
}

fn write_optional(out: &mut String, tag: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        let _ = writeln!(out, "        <{tag}>{}</{tag}>", protect(v));
    }
}

/// Closes the open tag and writes `text`, expanding length variants.
fn write_variants(out: &mut String, indent: &str, text: &str) {
    if !text.contains(LENGTH_VARIANT_SEPARATOR) {
        out.push('>');
        out.push_str(&protect(text));
        return;
    }

    out.push_str(" variants=\"yes\">");
    for variant in text.split(LENGTH_VARIANT_SEPARATOR) {
        let _ = write!(
            out,
            "\n    {indent}<lengthvariant>{}</lengthvariant>",
            protect(variant)
        );
    }
    out.push('\n');
    out.push_str(indent);
}

/// XML-escapes text; control characters become `<byte/>` elements.
pub fn protect(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 5);
    let mut run_start = 0usize;

    for (i, c) in text.char_indices() {
        if (c as u32) < 0x20 && c != '\r' && c != '\n' && c != '\t' {
            out.push_str(&escape(&text[run_start..i]));
            let _ = write!(out, "<byte value=\"x{:x}\"/>", c as u32);
            run_start = i + c.len_utf8();
        }
    }
    out.push_str(&escape(&text[run_start..]));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::{EntryStatus, Location};

    #[test]
    fn protect_escapes_markup_and_controls() {
        assert_eq!(protect("<b>'a' & \"b\"</b>"), "&lt;b&gt;&apos;a&apos; &amp; &quot;b&quot;&lt;/b&gt;");
        assert_eq!(protect("a\u{1b}b\n\t"), "a<byte value=\"x1b\"/>b\n\t");
    }

    #[test]
    fn writes_unfinished_numerus_layout() {
        let mut e = TsEntry::new("msg-0", "LUpdate", "Kept %n obsolete entries\n");
        e.numerus = true;
        e.numerus_forms = vec![String::new(), String::new()];
        e.locations.push(Location {
            filename: None,
            line: Some("+2".into()),
        });

        let mut out = String::new();
        write_message(&mut out, &e);

        let expected = "    <message numerus=\"yes\">\n\
                        \x20       <location line=\"+2\"/>\n\
                        \x20       <source>Kept %n obsolete entries\n</source>\n\
                        \x20       <translation type=\"unfinished\">\n\
                        \x20           <numerusform></numerusform>\n\
                        \x20           <numerusform></numerusform>\n\
                        \x20       </translation>\n\
                        \x20   </message>\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn writes_length_variants() {
        let mut e = TsEntry::new("msg-0", "X", "Open");
        e.status = EntryStatus::Finished;
        e.translation = "Відкрити\u{9c}Відкр.".into();

        let mut out = String::new();
        write_message(&mut out, &e);

        assert!(out.contains(
            "        <translation variants=\"yes\">\n            <lengthvariant>Відкрити</lengthvariant>\n            <lengthvariant>Відкр.</lengthvariant>\n        </translation>\n"
        ));
    }

    #[test]
    fn context_comment_written_once_and_kept_without_messages() {
        let mut c = Catalog::default();
        for (i, ctx) in ["A", "B", "A"].iter().enumerate() {
            c.entries.push(TsEntry::new(format!("msg-{i}"), *ctx, "x"));
        }
        c.context_comments.insert("A".into(), "about A".into());
        c.context_comments.insert("Empty".into(), "no messages".into());

        let out = rebuild(&c);
        assert_eq!(out.matches("<comment>about A</comment>").count(), 1);
        assert!(out.contains(
            "<context>\n    <name>Empty</name>\n    <comment>no messages</comment>\n</context>\n</TS>\n"
        ));

        let reparsed = crate::parsers::ts::parse(&out).unwrap();
        assert_eq!(reparsed.context_comments, c.context_comments);
    }

    #[test]
    fn empty_catalog_still_has_root() {
        let mut c = Catalog::default();
        c.language = Some("uk".into());
        assert_eq!(
            rebuild(&c),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS version=\"2.0\" language=\"uk\">\n</TS>\n"
        );
    }
}
