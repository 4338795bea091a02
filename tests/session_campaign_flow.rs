//! End-to-end tests
//!
//! Sign in, work with campaigns, restart the app on the same storage and
//! sign out again, all against a mock backend and an on-disk sled database.

use rpg_assistant::{App, AppConfig, CampaignUpdate, NewCampaign, StoreError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_backend() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok1", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "gm@example.com",
            "full_name": "Game Master",
            "subscription_status": "free"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/campaigns/"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Curse of Strahd", "rpg_system": "D&D 5e"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/campaigns/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Masks of Nyarlathotep", "rpg_system": "Call of Cthulhu"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/campaigns/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "name": "Masks of Nyarlathotep",
            "rpg_system": "Call of Cthulhu",
            "campaign_notes": "Session 0 done"
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/campaigns/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Campaign deleted successfully"})),
        )
        .mount(&server)
        .await;

    server
}

fn config(server: &MockServer, dir: &TempDir) -> AppConfig {
    let storage_path = dir.path().join("state").to_string_lossy().to_string();
    AppConfig::new(server.uri(), storage_path)
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let server = mock_backend().await;
    let temp_dir = TempDir::new().unwrap();

    // First run: sign in and edit campaigns
    {
        let app = App::open(config(&server, &temp_dir)).unwrap();
        assert!(!app.session.is_authenticated());

        let user = app.session.login("gm@example.com", "hunter2").await.unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Game Master"));

        app.campaigns.load_campaigns().await.unwrap();
        let created = app
            .campaigns
            .create_campaign(&NewCampaign::new("Masks of Nyarlathotep", "Call of Cthulhu"))
            .await
            .unwrap();

        let updates = CampaignUpdate {
            campaign_notes: Some("Session 0 done".to_string()),
            ..Default::default()
        };
        app.campaigns.update_campaign(created.id, &updates).await.unwrap();
        app.campaigns.delete_campaign(1).await.unwrap();

        let state = app.campaigns.snapshot();
        assert_eq!(state.campaigns.len(), 1);
        assert_eq!(state.campaigns[0].campaign_notes.as_deref(), Some("Session 0 done"));
        assert_eq!(state.current_campaign.map(|c| c.id), Some(2));
        assert!(!state.is_loading);
    }

    // Second run: the session comes back from storage
    {
        let app = App::open(config(&server, &temp_dir)).unwrap();
        assert_eq!(app.session.token().as_deref(), Some("tok1"));
        assert_eq!(app.session.user().map(|u| u.id), Some(1));

        // Campaigns are not persisted
        assert!(app.campaigns.campaigns().is_empty());
        app.campaigns.load_campaigns().await.unwrap();
        assert_eq!(app.campaigns.campaigns().len(), 1);

        app.session.logout().unwrap();
        let err = app.campaigns.load_campaigns().await.unwrap_err();
        assert!(matches!(err, StoreError::Authentication(_)));
    }

    // Third run: still signed out
    {
        let app = App::open(config(&server, &temp_dir)).unwrap();
        assert!(!app.session.is_authenticated());
        assert!(app.session.user().is_none());
    }
}

#[tokio::test]
async fn test_stores_share_one_session() {
    let server = mock_backend().await;
    let temp_dir = TempDir::new().unwrap();
    let app = App::open(config(&server, &temp_dir)).unwrap();
    let handle = app.clone();

    handle.session.login("gm@example.com", "hunter2").await.unwrap();

    assert!(app.session.is_authenticated());
    app.campaigns.load_campaigns().await.unwrap();
    assert_eq!(handle.campaigns.campaigns().len(), 1);
}
