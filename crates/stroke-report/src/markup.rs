//! Plain-text extraction of `<li>` items from advice markup.
//!
//! Only what the report needs: an item opens at `<li ...>` and closes at
//! `</li>`, at the next `<li>`, at `</ul>`/`</ol>`, or at end of input.
//! Inner tags are dropped, entities decoded and whitespace collapsed.
use std::borrow::Cow;

use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

/// Text of every `<li>` element in document order, one entry per element.
pub fn list_items(markup: &str) -> Vec<String> {
    let mut reader = Reader::from_str(markup);
    // HTML leaves `<li>` and void elements unclosed.
    reader.config_mut().check_end_names = false;

    let mut items = Vec::new();
    let mut current: Option<String> = None;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if is_item(e.name().as_ref()) => {
                items.extend(current.replace(String::new()));
            }
            Ok(Event::Empty(e)) if is_item(e.name().as_ref()) => {
                items.extend(current.take());
                items.push(String::new());
            }
            Ok(Event::End(e)) if is_item(e.name().as_ref()) || is_list(e.name().as_ref()) => {
                items.extend(current.take());
            }
            Ok(Event::Text(e)) => {
                if let Some(buf) = current.as_mut() { buf.push_str(&String::from_utf8_lossy(&e)); }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(buf) = current.as_mut() {
                    buf.push('&');
                    buf.push_str(&String::from_utf8_lossy(&e));
                    buf.push(';');
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(position = reader.error_position(), error = %e, "Stopped reading advice markup");
                break;
            }
        }
    }
    items.extend(current.take());

    items.into_iter().map(|raw| collapse_whitespace(&decode_entities(&raw))).collect()
}

fn is_item(name: &[u8]) -> bool { name.eq_ignore_ascii_case(b"li") }

fn is_list(name: &[u8]) -> bool { name.eq_ignore_ascii_case(b"ul") || name.eq_ignore_ascii_case(b"ol") }

fn collapse_whitespace(s: &str) -> String { s.split_whitespace().collect::<Vec<_>>().join(" ") }

/// Decode XML's predefined entities, `&nbsp;` and numeric references.
/// Text with an unknown or unterminated reference is returned unchanged.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    unescape_with(s, |name| resolve_predefined_entity(name).or(if name == "nbsp" { Some("\u{a0}") } else { None }))
        .unwrap_or(Cow::Borrowed(s))
}
