use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

use dnsdumpster_lib::types::QueryResult;

/// Child element name for items of a record list.
fn singular(field: &str) -> &str {
    match field {
        "a" | "mx" | "ns" => "entry",
        "txt" => "record",
        _ => field,
    }
}

/// Recursively write a serde_json::Value as XML elements.
fn write_value<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: &serde_json::Value,
) -> Result<(), quick_xml::Error> {
    match value {
        serde_json::Value::Null => {
            // Omit null fields entirely
        }
        serde_json::Value::Bool(b) => {
            write_text(writer, tag, if *b { "true" } else { "false" })?;
        }
        serde_json::Value::Number(n) => {
            write_text(writer, tag, &n.to_string())?;
        }
        serde_json::Value::String(s) => {
            write_text(writer, tag, s)?;
        }
        serde_json::Value::Array(arr) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            let child_tag = singular(tag);
            for item in arr {
                write_value(writer, child_tag, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        serde_json::Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            for (key, val) in map {
                write_value(writer, key, val)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
    }
    Ok(())
}

fn write_text<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Serialize a search result into an XML document rooted at `<dnsdumpster>`.
pub fn result_to_xml(result: &QueryResult) -> anyhow::Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let val = serde_json::to_value(result)?;
    write_value(&mut writer, "dnsdumpster", &val)?;

    let buf = writer.into_inner().into_inner();
    Ok(String::from_utf8(buf)?)
}
