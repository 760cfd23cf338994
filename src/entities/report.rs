use serde::{Deserialize, Serialize};

use super::Coordinates;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentStatus {
    Ok { points: usize },
    Failed { reason: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentReport {
    pub index: usize,
    pub from: Coordinates,
    pub to: Coordinates,
    #[serde(flatten)]
    pub status: SegmentStatus,
}

impl SegmentReport {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, SegmentStatus::Ok { .. })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub poi_count: usize,
    pub segments: Vec<SegmentReport>,
    pub artifact: String,
}

impl RunReport {
    pub fn failed_segments(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_ok()).count()
    }
}

#[test]
fn report_counts_failures() {
    let ok = SegmentReport {
        index: 0,
        from: Coordinates::new(35.46, 135.39),
        to: Coordinates::new(35.47, 135.40),
        status: SegmentStatus::Ok { points: 12 },
    };
    let failed = SegmentReport {
        index: 1,
        from: Coordinates::new(35.47, 135.40),
        to: Coordinates::new(35.48, 135.41),
        status: SegmentStatus::Failed {
            reason: "upstream error".into(),
        },
    };

    let report = RunReport {
        poi_count: 1,
        segments: vec![ok, failed],
        artifact: "maizuru_route.html".into(),
    };

    assert_eq!(report.failed_segments(), 1);
}

#[test]
fn segment_status_serializes_tagged() {
    let report = SegmentReport {
        index: 2,
        from: Coordinates::new(35.46, 135.39),
        to: Coordinates::new(35.47, 135.40),
        status: SegmentStatus::Failed {
            reason: "timeout".into(),
        },
    };

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"], "failed");
    assert_eq!(value["reason"], "timeout");
}
