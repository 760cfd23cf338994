use std::env;
use std::path::PathBuf;

use crate::{
    entities::{Coordinates, RunReport, SegmentReport, SegmentStatus},
    error::Error,
    external::{
        ors::{DirectionsProvider, OrsClient},
        overpass,
    },
    render::MapDocument,
    tags,
};

// Higashi Maizuru Station
pub const START_POINT: Coordinates = Coordinates::new(35.46872450002604, 135.39500977773056);
// Red Brick Park
pub const END_POINT: Coordinates = Coordinates::new(35.474763476187924, 135.38536802589823);

const DEFAULT_ARTIFACT_PATH: &str = "maizuru_route.html";

// Shared between the pipeline and the serving endpoint so both agree on
// where the artifact lives.
pub fn artifact_path() -> PathBuf {
    env::var("MAP_ARTIFACT_PATH")
        .unwrap_or_else(|_| DEFAULT_ARTIFACT_PATH.into())
        .into()
}

pub fn waypoints(pois: &[Coordinates]) -> Vec<Coordinates> {
    let mut points = Vec::with_capacity(pois.len() + 2);
    points.push(START_POINT);
    points.extend_from_slice(pois);
    points.push(END_POINT);

    points
}

// One routing call per consecutive waypoint pair. A failed segment leaves
// a gap in the accumulated path and a Failed entry in the reports; it
// never aborts the remaining segments.
pub async fn build_route(
    provider: &dyn DirectionsProvider,
    waypoints: &[Coordinates],
) -> (Vec<Coordinates>, Vec<SegmentReport>) {
    let mut path = Vec::new();
    let mut reports = Vec::new();

    for (index, pair) in waypoints.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);

        let status = match provider.walking_route(&from, &to).await {
            Ok(points) => {
                let status = SegmentStatus::Ok {
                    points: points.len(),
                };
                path.extend(points);
                status
            }
            Err(err) => {
                tracing::warn!(segment = index, reason = %err.message, "routing failed");
                SegmentStatus::Failed {
                    reason: err.message,
                }
            }
        };

        reports.push(SegmentReport {
            index,
            from,
            to,
            status,
        });
    }

    (path, reports)
}

#[tracing::instrument]
pub async fn run(tags_input: &str) -> Result<Option<RunReport>, Error> {
    let parsed = tags::parse_tags(tags_input);

    let tag = match parsed.first() {
        Some(tag) => tag,
        None => {
            tracing::info!("no usable tags given, exiting");
            return Ok(None);
        }
    };

    tracing::info!(%tag, "querying points of interest");

    let pois = overpass::find_nodes(tag).await?;

    if pois.is_empty() {
        tracing::info!("no matching points found");
        return Ok(None);
    }

    // Credential check comes before any routing request is issued.
    let client = OrsClient::from_env()?;

    let (path, segments) = build_route(&client, &waypoints(&pois)).await;

    let artifact = artifact_path();
    let document = MapDocument::new(START_POINT, END_POINT, pois.clone(), path);
    document.save(&artifact).await?;

    tracing::info!(artifact = %artifact.display(), "map generated");

    Ok(Some(RunReport {
        poi_count: pois.len(),
        segments,
        artifact: artifact.display().to_string(),
    }))
}

#[test]
fn empty_or_malformed_tags_are_a_successful_noop() {
    use tokio_test::block_on;

    // returns before any network or routing call is made
    assert!(matches!(block_on(run("")), Ok(None)));
    assert!(matches!(block_on(run("no-equals-here")), Ok(None)));
    assert!(matches!(block_on(run(",,,")), Ok(None)));

    // and leaves no artifact behind
    assert!(!std::path::Path::new(DEFAULT_ARTIFACT_PATH).exists());
}

#[test]
fn waypoints_wrap_pois_between_start_and_end() {
    let pois = vec![
        Coordinates::new(35.47, 135.40),
        Coordinates::new(35.48, 135.41),
    ];

    let points = waypoints(&pois);
    assert_eq!(points.len(), 4);
    assert_eq!(points[0], START_POINT);
    assert_eq!(points[1], pois[0]);
    assert_eq!(points[2], pois[1]);
    assert_eq!(points[3], END_POINT);
}

#[cfg(test)]
struct StubProvider {
    fail: bool,
}

#[cfg(test)]
#[async_trait::async_trait]
impl DirectionsProvider for StubProvider {
    async fn walking_route(
        &self,
        from: &Coordinates,
        to: &Coordinates,
    ) -> Result<Vec<Coordinates>, Error> {
        if self.fail {
            return Err(crate::error::upstream_error());
        }

        Ok(vec![*from, *to])
    }
}

#[test]
fn all_segments_failing_yields_empty_path() {
    use tokio_test::block_on;

    let points = waypoints(&[Coordinates::new(35.47, 135.40)]);
    let (path, reports) = block_on(build_route(&StubProvider { fail: true }, &points));

    assert!(path.is_empty());
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| !r.is_ok()));
}

#[test]
fn two_pois_produce_three_segments() {
    use tokio_test::block_on;

    let pois = vec![
        Coordinates::new(35.47, 135.40),
        Coordinates::new(35.48, 135.41),
    ];
    let points = waypoints(&pois);
    let (path, reports) = block_on(build_route(&StubProvider { fail: false }, &points));

    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.is_ok()));
    assert_eq!(path.len(), 6);

    // the rendered scenario: 2 POIs -> 4 markers, one polyline
    let html = MapDocument::new(START_POINT, END_POINT, pois, path).to_html();
    assert_eq!(html.matches("L.marker(").count(), 4);
    assert_eq!(html.matches("L.polyline(").count(), 1);
}

#[test]
fn partial_failure_keeps_surviving_segments() {
    use tokio_test::block_on;

    struct FlakyProvider;

    #[async_trait::async_trait]
    impl DirectionsProvider for FlakyProvider {
        async fn walking_route(
            &self,
            from: &Coordinates,
            to: &Coordinates,
        ) -> Result<Vec<Coordinates>, Error> {
            // fail only the first segment out of the start point
            if *from == START_POINT {
                return Err(crate::error::upstream_error());
            }

            Ok(vec![*from, *to])
        }
    }

    let points = waypoints(&[
        Coordinates::new(35.47, 135.40),
        Coordinates::new(35.48, 135.41),
    ]);
    let (path, reports) = block_on(build_route(&FlakyProvider, &points));

    assert_eq!(reports.len(), 3);
    assert_eq!(reports.iter().filter(|r| r.is_ok()).count(), 2);
    assert_eq!(path.len(), 4);
}
