//! End-to-end tests through the HTTP router

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::http::create_router;
    use crate::integration::fixtures::Fixture;

    fn app(fx: &Fixture) -> Router {
        create_router(fx.state(fx.config())).unwrap()
    }

    async fn post(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/splitIntoTracks")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn two_tagged_tracks() -> Value {
        json!({
            "sourceFile": "live.m4a",
            "fileFormat": "m4a",
            "metadata": {"artist": "X", "album": "Live"},
            "tracks": [
                {"name": "Intro", "startTime": "00:00:00", "endTime": "00:01:30"},
                {"name": "Song", "startTime": "00:01:30", "endTime": "00:02:45"}
            ]
        })
    }

    #[tokio::test]
    async fn test_direct_job_creates_tracks() {
        let fx = Fixture::new();
        let body = json!({
            "tracks": [
                {"fromFile": "set.mp3", "toFile": "01.mp3", "startTime": "00:00:00", "endTime": "00:03:10"},
                {"fromFile": "set.mp3", "toFile": "02.mp3", "startTime": "00:03:10", "endTime": "00:07:42"}
            ]
        });

        let (status, body) = post(app(&fx), body.to_string()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"message": "Tracks created"}));
        let calls = fx.transcoder.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].input, fx.source("set.mp3"));
        assert_eq!(calls[1].output, fx.output("02.mp3"));
    }

    #[tokio::test]
    async fn test_skips_existing_track_and_processes_the_rest() {
        let fx = Fixture::new();
        fx.touch_output("Intro.m4a");

        let (status, body) = post(app(&fx), two_tagged_tracks().to_string()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Tracks created");

        let calls = fx.transcoder.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].output, fx.output("Song.uncut.m4a"));
        assert_eq!(calls[0].tags["artist"], "X");
        assert_eq!(calls[0].tags["album"], "Live");
        assert_eq!(calls[0].tags["title"], "Song");
        assert_eq!(calls[1].output, fx.output("Song.m4a"));
        assert_eq!(calls[1].end, "00:01:15");
        assert!(fx.output("Song.m4a").exists());
        assert!(!fx.output("Song.uncut.m4a").exists());
    }

    #[tokio::test]
    async fn test_same_job_twice_is_idempotent() {
        let fx = Fixture::new();

        let (status, _) = post(app(&fx), two_tagged_tracks().to_string()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(fx.transcoder.calls().len(), 4);

        let (status, _) = post(app(&fx), two_tagged_tracks().to_string()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(fx.transcoder.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_transcoder_failure_is_internal_error() {
        let fx = Fixture::failing_on_call(0);

        let (status, body) = post(app(&fx), two_tagged_tracks().to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "Internal server error"}));
        let calls = fx.transcoder.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].output, fx.output("Intro.uncut.m4a"));
        assert!(!fx.output("Song.m4a").exists());
    }

    #[tokio::test]
    async fn test_escaping_path_is_internal_error() {
        let fx = Fixture::new();
        let body = json!({
            "tracks": [
                {"fromFile": "set.mp3", "toFile": "../../escaped.mp3", "startTime": "00:00:00", "endTime": "00:01:00"}
            ]
        });

        let (status, _) = post(app(&fx), body.to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(fx.transcoder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_rejected_without_side_effects() {
        let fx = Fixture::new();
        let bodies = [
            json!({}).to_string(),
            json!({"tracks": "01.mp3"}).to_string(),
            json!({"tracks": [{"fromFile": "a", "toFile": "b", "startTime": "00:00:00"}]}).to_string(),
            json!({"tracks": [{"fromFile": "a", "toFile": "b", "startTime": "0:0:0", "endTime": "00:00:05"}]})
                .to_string(),
            json!({"sourceFile": "live.m4a", "tracks": [{"name": "a", "startTime": "00:00:00", "endTime": "00:00:05"}]})
                .to_string(),
            "{not json".to_string(),
        ];

        for body in bodies {
            let (status, response) = post(app(&fx), body.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(response, json!({"message": "Invalid request body"}));
        }
        assert!(fx.transcoder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let fx = Fixture::new();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/splitIntoTracks")
            .body(Body::from(two_tagged_tracks().to_string()))
            .unwrap();

        let response = app(&fx).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(fx.transcoder.calls().is_empty());
    }
}
