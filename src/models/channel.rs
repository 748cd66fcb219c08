use serde::Serialize;

/// Single live channel as published by the upstream catalog.
///
/// Field names on the wire follow the upstream payload (`ch_id`, `ch_name`,
/// `img_url`, `ch_url`) so the catalog can be relayed unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    #[serde(rename = "ch_id")]
    pub id: String,
    #[serde(rename = "ch_name")]
    pub display_name: String,
    /// Relative path, qualified with the upstream host by the consumer
    #[serde(rename = "img_url")]
    pub thumbnail_path: String,
    /// Base stream URL, still missing its auth token
    #[serde(rename = "ch_url")]
    pub stream_url_prefix: String,
}

/// Channels from one fetch cycle, in upstream order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub channels: Vec<Channel>,
    /// Upstream entries rejected while decoding
    pub dropped: usize,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Directly playable stream URL obtained from a token exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackTarget {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_uses_upstream_field_names() {
        let channel = Channel {
            id: "1".to_string(),
            display_name: "A".to_string(),
            thumbnail_path: "/a.png".to_string(),
            stream_url_prefix: "http://host/a?token=".to_string(),
        };

        let json = serde_json::to_value(&channel).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ch_id": "1",
                "ch_name": "A",
                "img_url": "/a.png",
                "ch_url": "http://host/a?token="
            })
        );
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert_eq!(catalog.dropped, 0);
    }
}
