use std::collections::HashSet;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::host::{MediaDecodingConfig, MediaDecodingType};

/// Configuration for the environment info collectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    /// Decoding configurations asked of the host's media-capability query,
    /// keyed in the output by their label. Labels must be unique.
    #[serde(
        default = "default_media_probes",
        deserialize_with = "deserialize_unique_labels"
    )]
    pub media_probes: Vec<MediaProbe>,
}

/// One labelled media-capability question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaProbe {
    pub label: String,
    #[serde(flatten)]
    pub config: MediaDecodingConfig,
}

impl MediaProbe {
    fn video_1080p(label: &str, content_type: &str) -> Self {
        Self {
            label: label.to_owned(),
            config: MediaDecodingConfig {
                kind: MediaDecodingType::File,
                content_type: content_type.to_owned(),
                width: 1920,
                height: 1080,
                bitrate: 5_000_000,
                framerate: 30.0,
            },
        }
    }
}

fn default_media_probes() -> Vec<MediaProbe> {
    vec![
        MediaProbe::video_1080p("h264", r#"video/mp4; codecs="avc1.42E01E""#),
        MediaProbe::video_1080p("vp9", r#"video/webm; codecs="vp09.00.10.08""#),
        MediaProbe::video_1080p("av1", r#"video/mp4; codecs="av01.0.05M.08""#),
    ]
}

fn deserialize_unique_labels<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<MediaProbe>, D::Error> {
    let probes = Vec::<MediaProbe>::deserialize(deserializer)?;
    let duplicate = {
        let mut seen = HashSet::new();
        probes
            .iter()
            .find(|probe| !seen.insert(probe.label.as_str()))
            .map(|probe| probe.label.clone())
    };
    if let Some(label) = duplicate {
        return Err(D::Error::custom(format!(
            "duplicate media probe label `{label}`"
        )));
    }
    Ok(probes)
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            media_probes: default_media_probes(),
        }
    }
}
