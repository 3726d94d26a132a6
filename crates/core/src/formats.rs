//! Ad-format grouping over clip metadata.
//!
//! Every clip of a whole video carries its own ad-type tag. A video's format
//! is its dominant ad type: the most frequent non-empty tag among its clips,
//! ties going to the lexicographically smallest tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipVideoInfo {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipAnalysis {
    #[serde(default)]
    pub ad_type: Option<String>,
    #[serde(default)]
    pub visual_description: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub objects: Vec<String>,
    #[serde(default)]
    pub scenes: Vec<String>,
}

/// One stored clip, as exported from the `video_clips` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRecord {
    #[serde(default)]
    pub sno: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub video_info: ClipVideoInfo,
    #[serde(default)]
    pub analysis: Option<ClipAnalysis>,
    #[serde(default)]
    pub audio_text: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
}

impl ClipRecord {
    pub fn ad_type(&self) -> Option<&str> {
        self.analysis
            .as_ref()
            .and_then(|a| a.ad_type.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn video_url(&self) -> Option<&str> {
        self.video_info.url.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGroup {
    pub whole_video_url: String,
    pub dominant_ad_type: Option<String>,
    pub clips: Vec<ClipRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatCount {
    pub id: usize,
    pub format: String,
    pub video_count: usize,
}

pub fn dominant_ad_type<'a, I>(clips: I) -> Option<String>
where
    I: IntoIterator<Item = &'a ClipRecord>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for ad_type in clips.into_iter().filter_map(ClipRecord::ad_type) {
        *counts.entry(ad_type).or_default() += 1;
    }

    // BTreeMap iterates in ascending key order, so the first maximum seen
    // is also the smallest tag among the tied ones.
    let mut best: Option<(&str, usize)> = None;
    for (ad_type, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((ad_type, count));
        }
    }
    best.map(|(ad_type, _)| ad_type.to_string())
}

/// Group clips by whole-video URL in first-seen order. Clips without a URL
/// are ignored.
pub fn group_by_video(clips: Vec<ClipRecord>) -> Vec<VideoGroup> {
    let mut groups: Vec<VideoGroup> = Vec::new();
    for clip in clips {
        let Some(url) = clip.video_url().map(str::to_string) else {
            continue;
        };
        match groups.iter_mut().find(|g| g.whole_video_url == url) {
            Some(group) => group.clips.push(clip),
            None => groups.push(VideoGroup {
                whole_video_url: url,
                dominant_ad_type: None,
                clips: vec![clip],
            }),
        }
    }
    for group in &mut groups {
        group.dominant_ad_type = dominant_ad_type(&group.clips);
    }
    groups
}

/// Number of videos per dominant ad type, most common first.
pub fn format_counts(groups: &[VideoGroup]) -> Vec<FormatCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for format in groups.iter().filter_map(|g| g.dominant_ad_type.as_deref()) {
        *counts.entry(format).or_default() += 1;
    }

    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, (format, video_count))| FormatCount {
            id: i + 1,
            format: format.to_string(),
            video_count,
        })
        .collect()
}

pub fn videos_with_format<'a>(groups: &'a [VideoGroup], format: &str) -> Vec<&'a VideoGroup> {
    groups
        .iter()
        .filter(|g| g.dominant_ad_type.as_deref() == Some(format))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn clip(url: &str, ad_type: Option<&str>) -> ClipRecord {
        ClipRecord {
            video_info: ClipVideoInfo {
                url: Some(url.to_string()),
            },
            analysis: Some(ClipAnalysis {
                ad_type: ad_type.map(str::to_string),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn most_frequent_type_wins() {
        let clips = vec![
            clip("v", Some("UGC")),
            clip("v", Some("Demo")),
            clip("v", Some("UGC")),
        ];
        assert_eq!(dominant_ad_type(&clips).as_deref(), Some("UGC"));
    }

    #[test]
    fn ties_break_lexicographically() {
        let clips = vec![
            clip("v", Some("Testimonial")),
            clip("v", Some("Demo")),
            clip("v", Some("Testimonial")),
            clip("v", Some("Demo")),
        ];
        assert_eq!(dominant_ad_type(&clips).as_deref(), Some("Demo"));
    }

    #[test]
    fn empty_and_missing_types_are_ignored() {
        let clips = vec![clip("v", Some("")), clip("v", None), clip("v", Some(""))];
        assert_eq!(dominant_ad_type(&clips), None);

        let clips = vec![clip("v", Some("")), clip("v", Some("")), clip("v", Some("Skit"))];
        assert_eq!(dominant_ad_type(&clips).as_deref(), Some("Skit"));
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let groups = group_by_video(vec![
            clip("b", Some("Demo")),
            clip("a", Some("UGC")),
            clip("b", Some("Demo")),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].whole_video_url, "b");
        assert_eq!(groups[0].clips.len(), 2);
        assert_eq!(groups[1].dominant_ad_type.as_deref(), Some("UGC"));
    }

    #[test]
    fn counts_sorted_by_videos_then_name() {
        let groups = group_by_video(vec![
            clip("1", Some("UGC")),
            clip("2", Some("Demo")),
            clip("3", Some("UGC")),
            clip("4", Some("Animation")),
            clip("5", None),
        ]);
        let counts = format_counts(&groups);

        assert_eq!(
            counts,
            vec![
                FormatCount { id: 1, format: "UGC".into(), video_count: 2 },
                FormatCount { id: 2, format: "Animation".into(), video_count: 1 },
                FormatCount { id: 3, format: "Demo".into(), video_count: 1 },
            ]
        );
        assert_eq!(videos_with_format(&groups, "UGC").len(), 2);
    }

    #[test]
    fn reads_exported_clip_documents() {
        let doc = json!({
            "_id": { "$oid": "682c0015110c28ff637a40a5" },
            "sno": 3,
            "url": "https://cdn.example.com/clips/3.mp4",
            "videoInfo": { "url": "https://cdn.example.com/videos/full.mp4" },
            "analysis": { "adType": "UGC", "confidence": 0.87, "tags": ["hook"] },
            "startTime": 4.5,
            "endTime": 9.0
        });
        let clip: ClipRecord = serde_json::from_value(doc).unwrap();

        assert_eq!(clip.ad_type(), Some("UGC"));
        assert_eq!(clip.video_url(), Some("https://cdn.example.com/videos/full.mp4"));
        assert_eq!(clip.sno, Some(3));
    }
}
