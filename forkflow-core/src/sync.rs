//! Asset sync: maps an exported asset-host folder listing onto a workflow configuration
//!
//! Every stage owns a folder `Stage_<id>` and every fork sub-stage `"<id>.<n>"`
//! owns `Stage_<id>_<n>`. Scenario B content lives in the twin folder with a
//! `_B` suffix; when that folder is empty the Scenario A media is reused.

use crate::media::MediaKind;
use crate::{Scenario, StageId, WorkflowConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default folder prefix on the asset host
pub const DEFAULT_BASE_PATH: &str = "samples/SubAIShowcase";

/// A single uploaded asset as reported by the asset host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Base HTTPS URL, without delivery transformations
    pub secure_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl Resource {
    /// A resource is a video if its URL says so or the host typed it as one
    pub fn is_video(&self) -> bool {
        MediaKind::from_url(Some(&self.secure_url)).is_video()
            || self.resource_type.as_deref() == Some("video")
    }

    /// Ordering key: the public ID, else the URL path after `/upload/` and its
    /// `v<digits>` version segment
    pub fn sort_key(&self) -> &str {
        if let Some(id) = &self.public_id {
            return id;
        }
        let url = self.secure_url.as_str();
        let path = url
            .find(UPLOAD_SEGMENT)
            .map_or(url, |i| &url[i + UPLOAD_SEGMENT.len()..]);
        match path.split_once('/') {
            Some((version, rest)) if is_version_segment(version) => rest,
            _ => path,
        }
    }
}

const UPLOAD_SEGMENT: &str = "/upload/";

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Folder path -> resources, as exported from the asset host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderListing {
    pub folders: BTreeMap<String, Vec<Resource>>,
}

impl FolderListing {
    /// Resources of a folder in public ID order (empty when the folder is absent)
    pub fn resources(&self, folder: &str) -> Vec<&Resource> {
        let mut resources: Vec<&Resource> = self
            .folders
            .get(folder)
            .map(|r| r.iter().collect())
            .unwrap_or_default();
        resources.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        resources
    }
}

/// Where a folder's media ends up in the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTarget {
    Stage(StageId),
    SubStage { stage: StageId, sub_stage: String },
}

impl SyncTarget {
    /// Folder name without base path or scenario suffix ("Stage_3_1")
    pub fn folder_name(&self) -> String {
        match self {
            SyncTarget::Stage(id) => format!("Stage_{id}"),
            SyncTarget::SubStage { sub_stage, .. } => {
                format!("Stage_{}", sub_stage.replace('.', "_"))
            }
        }
    }

    pub fn stage_id(&self) -> StageId {
        match self {
            SyncTarget::Stage(id) => *id,
            SyncTarget::SubStage { stage, .. } => *stage,
        }
    }
}

/// One line of the sync summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRow {
    pub folder: String,
    pub stage_id: StageId,
    pub sub_stage_id: Option<String>,
    pub scenario: Scenario,
    pub count: usize,
    pub images: usize,
    pub videos: usize,
    pub fallback: bool,
}

/// Outcome of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub rows: Vec<SyncRow>,
}

impl SyncReport {
    /// Total number of assets applied across all rows
    pub fn total_assets(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }
}

/// Images first, then videos, as `(urls, images, videos)`
struct FolderMedia {
    urls: Vec<String>,
    images: usize,
    videos: usize,
}

fn collect_folder(listing: &FolderListing, folder: &str) -> FolderMedia {
    let (videos, images): (Vec<&Resource>, Vec<&Resource>) =
        listing.resources(folder).into_iter().partition(|r| r.is_video());

    let urls = images
        .iter()
        .chain(videos.iter())
        .map(|r| r.secure_url.clone())
        .collect();

    FolderMedia {
        urls,
        images: images.len(),
        videos: videos.len(),
    }
}

/// Lists the sync targets of a configuration in stage order
pub fn sync_targets(config: &WorkflowConfig) -> Vec<SyncTarget> {
    let mut targets = Vec::new();
    for stage in &config.stages {
        targets.push(SyncTarget::Stage(stage.id));
        if !stage.is_fork {
            continue;
        }
        let mut sub_ids: Vec<&str> = Vec::new();
        for scenario in [Scenario::A, Scenario::B] {
            for sub in stage.sub_stages(scenario) {
                if !sub_ids.contains(&sub.id.as_str()) {
                    sub_ids.push(&sub.id);
                }
            }
        }
        targets.extend(sub_ids.into_iter().map(|id| SyncTarget::SubStage {
            stage: stage.id,
            sub_stage: id.to_string(),
        }));
    }
    targets
}

/// Applies the folder listing to the configuration in place
pub fn sync_assets(
    config: &mut WorkflowConfig,
    listing: &FolderListing,
    base_path: &str,
) -> SyncReport {
    let mut report = SyncReport::default();

    for target in sync_targets(config) {
        let name = target.folder_name();
        let folder_a = format!("{base_path}/{name}");
        let folder_b = format!("{base_path}/{name}{}", Scenario::B.folder_suffix());

        tracing::info!("Processing {}", name);

        let media_a = collect_folder(listing, &folder_a);
        let found_b = collect_folder(listing, &folder_b);
        let fallback = found_b.urls.is_empty() && !media_a.urls.is_empty();
        let media_b = if fallback {
            tracing::info!("  Scenario B: using fallback from A");
            FolderMedia {
                urls: media_a.urls.clone(),
                images: media_a.images,
                videos: media_a.videos,
            }
        } else {
            found_b
        };

        if media_a.urls.is_empty() {
            tracing::warn!("  Scenario A: no assets found in {}", folder_a);
        }

        apply(config, &target, &media_a, &media_b);

        let sub_stage_id = match &target {
            SyncTarget::SubStage { sub_stage, .. } => Some(sub_stage.clone()),
            SyncTarget::Stage(_) => None,
        };
        report.rows.push(SyncRow {
            folder: name.clone(),
            stage_id: target.stage_id(),
            sub_stage_id: sub_stage_id.clone(),
            scenario: Scenario::A,
            count: media_a.urls.len(),
            images: media_a.images,
            videos: media_a.videos,
            fallback: false,
        });
        report.rows.push(SyncRow {
            folder: format!("{name}{}", Scenario::B.folder_suffix()),
            stage_id: target.stage_id(),
            sub_stage_id,
            scenario: Scenario::B,
            count: media_b.urls.len(),
            images: media_b.images,
            videos: media_b.videos,
            fallback,
        });
    }

    report
}

fn apply(config: &mut WorkflowConfig, target: &SyncTarget, a: &FolderMedia, b: &FolderMedia) {
    let Some(stage) = config.stage_mut(target.stage_id()) else {
        return;
    };

    match target {
        SyncTarget::SubStage { sub_stage, .. } => {
            for (scenario, media) in [(Scenario::A, a), (Scenario::B, b)] {
                if media.urls.is_empty() {
                    continue;
                }
                if let Some(sub) = stage
                    .branch_mut(scenario)
                    .and_then(|branch| branch.sub_stage_mut(sub_stage))
                {
                    sub.set_media(media.urls.clone());
                }
            }
        }
        SyncTarget::Stage(_) => {
            if !a.urls.is_empty() {
                stage.set_media(a.urls.clone());
            }

            if stage.is_fork {
                for (scenario, media) in [(Scenario::A, a), (Scenario::B, b)] {
                    if media.urls.is_empty() {
                        continue;
                    }
                    if let Some(branch) = stage.branch_mut(scenario) {
                        branch.set_header_media(media.urls.clone());
                    }
                }
            } else if a.videos > 0 {
                stage.is_animated = true;
                if a.images > 0 {
                    stage.poster_url = a.urls.first().cloned();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScenarioBranch, Stage, SubStage};

    fn resource(url: &str) -> Resource {
        Resource {
            secure_url: url.to_string(),
            public_id: None,
            resource_type: None,
        }
    }

    fn config() -> WorkflowConfig {
        let mut fork = Stage::new(StageId(2), "Fork", 1.0);
        fork.is_fork = true;
        let sub = SubStage {
            id: "2.1".to_string(),
            title: "Detail".to_string(),
            ..Default::default()
        };
        fork.scenario_a = Some(ScenarioBranch {
            sub_stages: vec![sub.clone()],
            ..Default::default()
        });
        fork.scenario_b = Some(ScenarioBranch {
            sub_stages: vec![sub],
            ..Default::default()
        });
        WorkflowConfig::new(vec![Stage::new(StageId(1), "Concept", 1.0), fork]).unwrap()
    }

    fn listing(entries: Vec<(&str, Vec<&str>)>) -> FolderListing {
        let mut listing = FolderListing::default();
        for (folder, urls) in entries {
            listing.folders.insert(
                format!("{DEFAULT_BASE_PATH}/{folder}"),
                urls.iter().map(|u| resource(u)).collect(),
            );
        }
        listing
    }

    #[test]
    fn test_order_ignores_upload_version() {
        let mut config = config();
        let listing = listing(vec![(
            "Stage_1",
            vec![
                "https://res.cloudinary.com/demo/image/upload/v1699999999/Stage_1/b_second.png",
                "https://res.cloudinary.com/demo/image/upload/v1700000002/Stage_1/a_first.png",
            ],
        )]);

        sync_assets(&mut config, &listing, DEFAULT_BASE_PATH);

        let stage = config.stage(StageId(1)).unwrap();
        assert!(stage.media_url.as_deref().unwrap().ends_with("/a_first.png"));
        assert!(stage.media_urls[1].ends_with("/b_second.png"));
    }

    #[test]
    fn test_public_id_takes_precedence() {
        let mut late = resource("https://h/upload/v1/a.png");
        late.public_id = Some("z".to_string());
        let early = resource("https://h/upload/v2/b.png");
        assert_eq!(early.sort_key(), "b.png");

        let mut listing = FolderListing::default();
        listing
            .folders
            .insert("folder".to_string(), vec![late.clone(), early.clone()]);
        assert_eq!(listing.resources("folder"), vec![&early, &late]);
    }

    #[test]
    fn test_targets_include_sub_stages() {
        let targets = sync_targets(&config());
        let names: Vec<String> = targets.iter().map(|t| t.folder_name()).collect();
        assert_eq!(names, vec!["Stage_1", "Stage_2", "Stage_2_1"]);
    }

    #[test]
    fn test_images_before_videos_and_animated_flag() {
        let mut config = config();
        let listing = listing(vec![(
            "Stage_1",
            vec!["https://h/z.mp4", "https://h/b.png", "https://h/a.png"],
        )]);

        let report = sync_assets(&mut config, &listing, DEFAULT_BASE_PATH);

        let stage = config.stage(StageId(1)).unwrap();
        assert_eq!(
            stage.media_urls,
            vec!["https://h/a.png", "https://h/b.png", "https://h/z.mp4"]
        );
        assert_eq!(stage.media_url.as_deref(), Some("https://h/a.png"));
        assert!(stage.is_animated);
        assert_eq!(stage.poster_url.as_deref(), Some("https://h/a.png"));

        let row = &report.rows[0];
        assert_eq!((row.images, row.videos, row.count), (2, 1, 3));
    }

    #[test]
    fn test_scenario_b_fallback() {
        let mut config = config();
        let listing = listing(vec![
            ("Stage_2", vec!["https://h/fork.png"]),
            ("Stage_2_1", vec!["https://h/a1.png"]),
            ("Stage_2_1_B", vec!["https://h/b1.png"]),
        ]);

        let report = sync_assets(&mut config, &listing, DEFAULT_BASE_PATH);

        let fork = config.stage(StageId(2)).unwrap();
        assert_eq!(
            fork.scenario_b.as_ref().unwrap().header_media_urls,
            vec!["https://h/fork.png"]
        );
        assert_eq!(fork.sub_stages(Scenario::A)[0].media_urls, vec!["https://h/a1.png"]);
        assert_eq!(fork.sub_stages(Scenario::B)[0].media_urls, vec!["https://h/b1.png"]);
        assert!(!fork.is_animated);

        let fork_b = report
            .rows
            .iter()
            .find(|r| r.folder == "Stage_2_B")
            .unwrap();
        assert!(fork_b.fallback);
        assert_eq!(fork_b.count, 1);

        let sub_b = report
            .rows
            .iter()
            .find(|r| r.folder == "Stage_2_1_B")
            .unwrap();
        assert!(!sub_b.fallback);
        assert_eq!(sub_b.sub_stage_id.as_deref(), Some("2.1"));
    }

    #[test]
    fn test_empty_folders_leave_config_untouched() {
        let mut config = config();
        let before = config.clone();
        let report = sync_assets(&mut config, &FolderListing::default(), DEFAULT_BASE_PATH);
        assert_eq!(config, before);
        assert_eq!(report.total_assets(), 0);
        assert_eq!(report.rows.len(), 6);
    }

    #[test]
    fn test_resource_type_marks_video() {
        let r = Resource {
            secure_url: "https://h/clip".to_string(),
            public_id: None,
            resource_type: Some("video".to_string()),
        };
        assert!(r.is_video());
        assert!(!resource("https://h/a.png").is_video());
    }
}
