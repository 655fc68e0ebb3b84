use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::domain::Channel;

/// Parsed playlist: header lines before the first `#EXTINF`, then the
/// ordered channel entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Playlist {
    pub header: Vec<String>,
    pub channels: Vec<Channel>,
}

static RE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z0-9][A-Za-z0-9_.-]*)="([^"]*)""#).expect("valid attr regex")
});

/// Split an `#EXTINF` line into duration, attributes and display name.
/// The display name starts after the first comma past the last quoted
/// value, so quoted values may themselves contain commas.
fn parse_extinf(line: &str) -> Option<Channel> {
    let rest = line.strip_prefix("#EXTINF:")?;
    let attrs_end = rest.rfind('"').map(|i| i + 1).unwrap_or(0);
    let name_sep = attrs_end + rest[attrs_end..].find(',')?;
    let head = &rest[..name_sep];
    let duration = head.split_whitespace().next().unwrap_or("-1").to_string();
    let attrs = RE_ATTR
        .captures_iter(head)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();
    Some(Channel {
        name: rest[name_sep + 1..].trim().to_string(),
        duration,
        attrs,
        extra: Vec::new(),
        url: String::new(),
    })
}

pub fn parse(text: &str) -> Playlist {
    let mut playlist = Playlist::default();
    let mut pending: Option<Channel> = None;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("#EXTINF:") {
            if let Some(prev) = pending.take() {
                warn!(channel = %prev.name, "entry has no stream URL; skipping");
            }
            match parse_extinf(line) {
                Some(ch) => pending = Some(ch),
                None => warn!("malformed #EXTINF line; skipping: {line}"),
            }
        } else if line.starts_with('#') {
            match pending.as_mut() {
                Some(ch) => ch.extra.push(line.to_string()),
                None if playlist.channels.is_empty() => playlist.header.push(line.to_string()),
                None => warn!("stray directive outside any entry; skipping: {line}"),
            }
        } else {
            match pending.take() {
                Some(mut ch) => {
                    ch.url = line.to_string();
                    playlist.channels.push(ch);
                }
                None => warn!("stream URL with no #EXTINF; skipping: {line}"),
            }
        }
    }
    if let Some(prev) = pending {
        warn!(channel = %prev.name, "entry has no stream URL; skipping");
    }
    playlist
}

pub fn render(playlist: &Playlist) -> String {
    let mut out = String::new();
    if !playlist.header.iter().any(|l| l.starts_with("#EXTM3U")) {
        out.push_str("#EXTM3U\n");
    }
    for line in &playlist.header {
        out.push_str(line);
        out.push('\n');
    }
    for ch in &playlist.channels {
        out.push_str(&ch.extinf_line());
        out.push('\n');
        for line in &ch.extra {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&ch.url);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extinf_with_attrs() {
        let ch = parse_extinf(r#"#EXTINF:-1 tvg-id="bbc1" group-title="UK, National",BBC One"#)
            .unwrap();
        assert_eq!(ch.name, "BBC One");
        assert_eq!(ch.duration, "-1");
        assert_eq!(
            ch.attrs,
            vec![
                ("tvg-id".to_string(), "bbc1".to_string()),
                ("group-title".to_string(), "UK, National".to_string()),
            ]
        );
    }

    #[test]
    fn parse_extinf_without_attrs() {
        let ch = parse_extinf("#EXTINF:-1,BBC One").unwrap();
        assert_eq!(ch.name, "BBC One");
        assert!(ch.attrs.is_empty());
    }

    #[test]
    fn parse_extinf_rejects_line_without_name_separator() {
        assert!(parse_extinf("#EXTINF:-1 garbage").is_none());
    }

    #[test]
    fn parse_keeps_header_and_between_entry_directives() {
        let input = "#EXTM3U url-tvg=\"http://x/epg.xml\"\n#EXTINF:-1,BBC One\n#EXTGRP:UK\nhttp://srv/bbc1.ts\n";
        let p = parse(input);
        assert_eq!(p.header, vec!["#EXTM3U url-tvg=\"http://x/epg.xml\""]);
        assert_eq!(p.channels.len(), 1);
        assert_eq!(p.channels[0].extra, vec!["#EXTGRP:UK"]);
        assert_eq!(p.channels[0].url, "http://srv/bbc1.ts");
    }

    #[test]
    fn parse_skips_entry_without_url() {
        let input = "#EXTM3U\n#EXTINF:-1,Broken\n#EXTINF:-1,Whole\nhttp://srv/whole.ts\n";
        let p = parse(input);
        assert_eq!(p.channels.len(), 1);
        assert_eq!(p.channels[0].name, "Whole");
    }

    #[test]
    fn render_emits_extm3u_when_input_had_none() {
        let p = parse("#EXTINF:-1,BBC One\nhttp://srv/bbc1.ts\n");
        assert!(render(&p).starts_with("#EXTM3U\n"));
    }

    #[test]
    fn parse_render_round_trips() {
        let input = "#EXTM3U\n#EXTINF:-1 tvg-id=\"bbc1\" tvg-logo=\"http://x/logo.png\",BBC One\nhttp://srv/bbc1.ts\n#EXTINF:0,BBC Two\nhttp://srv/bbc2.ts\n";
        let p = parse(input);
        assert_eq!(render(&p), input);
        assert_eq!(parse(&render(&p)), p);
    }
}
