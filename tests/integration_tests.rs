use quakemap::{
    DrawCommand, FeedStatus, HttpFeed, LatLng, MapBuilder, MapError, MapView, Point,
    QuakeMapConfig, SceneRecorder, StaticFeed,
};

/// Integration tests for loading feeds and rendering the map
/// These tests drive the map the way a front-end does
#[cfg(test)]
mod integration_tests {
    use super::*;

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"title": "USGS All Earthquakes, Past Week", "count": 4},
        "features": [
            {"type": "Feature", "id": "ok1",
             "properties": {"mag": 0, "place": "30 km SE of McCook, Nebraska", "time": 1700000000000},
             "geometry": {"type": "Point", "coordinates": [-100, 40, 2]}},
            {"type": "Feature", "id": "ok2",
             "properties": {"mag": 4.6, "place": "15 km S of Independence, Kansas", "time": 1700000100000},
             "geometry": {"type": "Point", "coordinates": [-95.71, 37.09, 33.2]}},
            {"type": "Feature", "id": "bad-mag",
             "properties": {"mag": null, "place": "Nowhere", "time": 1700000200000},
             "geometry": {"type": "Point", "coordinates": [-97.0, 36.0, 5.0]}},
            {"type": "Feature", "id": "bad-coords",
             "properties": {"mag": 1.1, "place": "Nowhere", "time": 1700000300000},
             "geometry": {"type": "Point", "coordinates": [-97.0]}}
        ]
    }"#;

    fn map() -> MapView {
        MapBuilder::new().build().unwrap()
    }

    fn recorded(map: &MapView) -> SceneRecorder {
        let viewport = map.initial_viewport(Point::new(1200.0, 800.0));
        let mut recorder = SceneRecorder::new();
        map.render(&mut recorder, &viewport).unwrap();
        recorder
    }

    #[tokio::test]
    async fn test_load_skips_malformed_features() {
        let mut map = map();
        let report = map.load(&StaticFeed::new(FEED)).await.unwrap();

        assert_eq!(report.rendered, 2);
        let skipped: Vec<_> = report.skipped.iter().map(|s| s.id.as_deref()).collect();
        assert_eq!(skipped, [Some("bad-mag"), Some("bad-coords")]);

        let ids: Vec<_> = recorded(&map).markers().map(|(id, _, _)| id.to_string()).collect();
        assert_eq!(ids, ["ok1", "ok2"]);
    }

    #[tokio::test]
    async fn test_missing_coordinates_skip_only_that_feature() {
        let good = r#"{"type": "Feature", "id": "good",
            "properties": {"mag": 2.2, "place": "Anza, California", "time": 1700000000000},
            "geometry": {"type": "Point", "coordinates": [-116.7, 33.5, 11.0]}}"#;

        for broken in [
            r#"{"type": "Feature", "id": "broken", "properties": {"mag": 1.0, "time": 0},
                "geometry": {"type": "Point", "coordinates": null}}"#,
            r#"{"type": "Feature", "id": "broken", "properties": {"mag": 1.0, "time": 0},
                "geometry": {"type": "Point"}}"#,
            r#"{"type": "Feature", "id": "broken", "properties": "n/a",
                "geometry": {"type": "Point", "coordinates": [0, 0, 1]}}"#,
        ] {
            let doc = format!(r#"{{"type": "FeatureCollection", "features": [{good}, {broken}]}}"#);
            let mut map = map();
            let report = map.load(&StaticFeed::new(doc)).await.unwrap();

            assert_eq!(report.rendered, 1);
            assert_eq!(report.skipped.len(), 1);
            assert_eq!(report.skipped[0].id.as_deref(), Some("broken"));
            assert_eq!(recorded(&map).markers().count(), 1);
        }
    }

    #[tokio::test]
    async fn test_rerender_is_idempotent() {
        let mut map = map();
        let feed = StaticFeed::new(FEED);

        let first = map.load(&feed).await.unwrap();
        let before = recorded(&map);
        let second = map.load(&feed).await.unwrap();
        let after = recorded(&map);

        assert_eq!(first, second);
        assert_eq!(map.markers().len(), 2);
        assert_eq!(before.commands(), after.commands());
    }

    #[tokio::test]
    async fn test_unavailable_feed_renders_status_only() {
        let mut map = map();
        let err = map.load(&StaticFeed::new("<html>503</html>")).await.unwrap_err();
        assert!(matches!(err, MapError::FeedUnavailable(_)));
        assert!(matches!(map.status(), FeedStatus::Unavailable(_)));

        let scene = recorded(&map);
        assert_eq!(scene.markers().count(), 0);
        assert!(scene.status().unwrap().starts_with("Earthquake data unavailable"));
        // Legend still shows so the map stays readable
        assert_eq!(scene.legend().map(|l| l.len()), Some(5));
    }

    #[tokio::test]
    async fn test_unreachable_http_feed() {
        let mut map = map();
        // Port from a listener that is already closed again
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let feed = HttpFeed::new(format!("http://127.0.0.1:{port}/all_week.geojson"));
        let err = map.load(&feed).await.unwrap_err();

        assert!(matches!(err, MapError::FeedUnavailable(_)));
        assert!(map.markers().is_empty());
    }

    #[tokio::test]
    async fn test_hidden_overlay_draws_no_markers() {
        let mut map = map();
        map.load(&StaticFeed::new(FEED)).await.unwrap();
        map.set_overlay_visible(false);

        let scene = recorded(&map);
        assert_eq!(scene.markers().count(), 0);

        let control = scene.commands().iter().find_map(|cmd| match cmd {
            DrawCommand::LayerControl { entries, collapsed, .. } => Some((entries, *collapsed)),
            _ => None,
        });
        let (entries, collapsed) = control.unwrap();
        assert!(!collapsed);
        let overlay = entries.iter().find(|e| e.name == "Earthquakes").unwrap();
        assert!(!overlay.active);
    }

    #[tokio::test]
    async fn test_click_marker_shows_popup() {
        let mut map = map();
        map.load(&StaticFeed::new(FEED)).await.unwrap();

        // ok2 sits on the default center
        let viewport = map.initial_viewport(Point::new(1200.0, 800.0));
        let center = Point::new(600.0, 400.0);
        let marker = map.marker_at(&viewport, &center).unwrap();
        assert_eq!(marker.feature().place, "15 km S of Independence, Kansas");

        assert_eq!(map.click(&viewport, &center).as_deref(), Some("ok2"));
        let mut recorder = SceneRecorder::new();
        map.render(&mut recorder, &viewport).unwrap();
        let popup = recorder.commands().iter().find_map(|cmd| match cmd {
            DrawCommand::Popup { popup, .. } => Some(popup),
            _ => None,
        });
        assert_eq!(popup.unwrap().title, "Magnitude: 4.6, Depth: 33.2");
    }

    #[tokio::test]
    async fn test_fit_to_markers() {
        let mut map = map();
        map.load(&StaticFeed::new(FEED)).await.unwrap();

        let mut viewport = map.initial_viewport(Point::new(1200.0, 800.0));
        assert!(map.fit_to_markers(&mut viewport));
        let bounds = viewport.bounds();
        assert!(bounds.contains(&LatLng::new(40.0, -100.0)));
        assert!(bounds.contains(&LatLng::new(37.09, -95.71)));
    }

    #[test]
    fn test_config_drives_legend_and_profile() {
        let config = QuakeMapConfig::from_json_str(
            r#"{"style_profile": "compact", "legend_floor_entry": true, "legend_position": "bottom_left"}"#,
        )
        .unwrap();
        let map = MapView::new(config).unwrap();

        assert_eq!(map.marker_options().radius_multiplier, 2.0);
        let labels: Vec<_> = map.legend_entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, ["≤1", "1–3", "3–5", "5–10", "10–20", "20+"]);
    }
}
