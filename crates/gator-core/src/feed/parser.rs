use quick_xml::events::Event;
use quick_xml::Reader;

use super::document::{FeedDocument, FeedItem};
use crate::{Error, Result};

/// Parse an RSS 2.0 document into a [`FeedDocument`]
///
/// Only `<rss><channel>` and its direct `title`, `link`, `description` and
/// `<item>` children are read. Unknown elements are ignored.
pub fn parse_rss(content: &[u8]) -> Result<FeedDocument> {
    let text = std::str::from_utf8(content)
        .map_err(|e| Error::FeedParse(format!("Feed is not valid UTF-8: {}", e)))?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut doc = FeedDocument::default();
    let mut path: Vec<String> = Vec::new();
    let mut item: Option<FeedItem> = None;
    let mut saw_channel = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match (path_of(&path).as_slice(), name.as_str()) {
                    (["rss"], "channel") => saw_channel = true,
                    (["rss", "channel"], "item") => item = Some(FeedItem::default()),
                    _ => {}
                }
                path.push(name);
            }
            Ok(Event::End(_)) => {
                let closed = path.pop();
                if closed.as_deref() == Some("item") && path_of(&path) == ["rss", "channel"] {
                    if let Some(done) = item.take() {
                        doc.items.push(done);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                let value = match e.unescape() {
                    Ok(value) => value.into_owned(),
                    // HTML-only entities such as &nbsp; are left for normalize()
                    Err(_) => String::from_utf8_lossy(&e).into_owned(),
                };
                append_text(&mut doc, item.as_mut(), &path, &value);
            }
            Ok(Event::CData(e)) => {
                let value = String::from_utf8_lossy(&e.into_inner()).into_owned();
                append_text(&mut doc, item.as_mut(), &path, &value);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::FeedParse(format!(
                    "Malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if !saw_channel {
        return Err(Error::FeedParse(
            "Document has no <rss><channel> element".to_string(),
        ));
    }

    Ok(doc)
}

fn path_of(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}

fn append_text(doc: &mut FeedDocument, item: Option<&mut FeedItem>, path: &[String], value: &str) {
    let target = match (path_of(path).as_slice(), item) {
        (["rss", "channel", "title"], _) => &mut doc.channel.title,
        (["rss", "channel", "link"], _) => &mut doc.channel.link,
        (["rss", "channel", "description"], _) => &mut doc.channel.description,
        (["rss", "channel", "item", field], Some(item)) => match *field {
            "title" => &mut item.title,
            "link" => &mut item.link,
            "description" => &mut item.description,
            "pubDate" => &mut item.pub_date,
            _ => return,
        },
        _ => return,
    };
    target.push_str(value);
}
