use std::collections::HashMap;

/// One playlist entry: the `#EXTINF` line broken into its parts, any
/// directive lines carried between it and the stream URL, and the URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Channel {
    pub name: String,
    pub duration: String,
    pub attrs: Vec<(String, String)>,
    pub extra: Vec<String>,
    pub url: String,
}

impl Channel {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overrides in place so attribute order stays stable across runs.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((key.to_string(), value.to_string())),
        }
    }

    pub fn extinf_line(&self) -> String {
        let mut line = format!("#EXTINF:{}", self.duration);
        for (k, v) in &self.attrs {
            line.push_str(&format!(" {k}=\"{v}\""));
        }
        line.push(',');
        line.push_str(&self.name);
        line
    }
}

/// Mapping-table lookup: normalized channel name to its attribute rows.
pub type Mapping = HashMap<String, Vec<(String, String)>>;

/// Lookup key for a channel name: surrounding whitespace and case do not
/// count.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attr_overrides_in_place() {
        let mut ch = Channel {
            name: "BBC One".into(),
            duration: "-1".into(),
            attrs: vec![
                ("tvg-id".into(), "old".into()),
                ("group-title".into(), "UK".into()),
            ],
            ..Default::default()
        };
        ch.set_attr("tvg-id", "new");
        ch.set_attr("tvg-logo", "http://x/logo.png");
        assert_eq!(
            ch.attrs,
            vec![
                ("tvg-id".to_string(), "new".to_string()),
                ("group-title".to_string(), "UK".to_string()),
                ("tvg-logo".to_string(), "http://x/logo.png".to_string()),
            ]
        );
    }

    #[test]
    fn normalize_name_folds_case_and_whitespace() {
        assert_eq!(normalize_name("  BBC One "), "bbc one");
        assert_eq!(normalize_name("bbc one"), "bbc one");
    }
}
