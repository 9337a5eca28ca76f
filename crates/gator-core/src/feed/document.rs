use std::io::{self, Write};

/// Line printed when a cycle stored nothing new
pub const NOTHING_NEW: &str = "Nothing new...";

/// A fetched RSS document; lives only for the duration of one ingestion cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    pub channel: Channel,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Raw `pubDate` text, parsed during ingestion
    pub pub_date: String,
    /// Excluded from the cycle report
    pub skip: bool,
}

impl FeedDocument {
    /// Decode HTML entities in the channel and item titles and descriptions
    pub fn normalize(&mut self) {
        unescape_in_place(&mut self.channel.title);
        unescape_in_place(&mut self.channel.description);

        for item in &mut self.items {
            unescape_in_place(&mut item.title);
            unescape_in_place(&mut item.description);
        }
    }

    /// Items that were not skipped during ingestion
    pub fn reported_items(&self) -> impl Iterator<Item = &FeedItem> {
        self.items.iter().filter(|item| !item.skip)
    }

    /// Write the channel header followed by every reported item
    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}\n{}\n\n", self.channel.title, self.channel.description)?;

        let mut printed = 0;
        for item in self.reported_items() {
            write!(out, "{}\n{}\n\n", item.title, item.description)?;
            printed += 1;
        }

        if printed == 0 {
            writeln!(out, "{}", NOTHING_NEW)?;
        }

        Ok(())
    }
}

/// Decode each `&name;` or `&#NN;` run on its own, so a bare `&` or an
/// unknown entity elsewhere in the text does not block the others
fn unescape_in_place(text: &mut String) {
    if !text.contains('&') {
        return;
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text.as_str();

    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let entity = entity_len(candidate).and_then(|len| {
            htmlescape::decode_html(&candidate[..len])
                .ok()
                .map(|value| (len, value))
        });

        match entity {
            Some((len, value)) => {
                decoded.push_str(&value);
                rest = &candidate[len..];
            }
            None => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }

    decoded.push_str(rest);
    *text = decoded;
}

/// Byte length of the entity reference at the start of `text`, `&` and `;` included
fn entity_len(text: &str) -> Option<usize> {
    let body = text.strip_prefix('&')?;
    let end = body.find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))?;
    (end > 0 && body[end..].starts_with(';')).then_some(end + 2)
}
