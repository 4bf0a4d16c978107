use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes};

mod weather {
    use super::*;

    #[tokio::test]
    async fn explicit_location_is_echoed_back() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let path = format!("{}?location=Nakuru", routes::WEATHER);
        let res = app.get_with_token(&path, &token).await;

        assert_eq!(res.status, 200, "Weather failed: {}", res.text);
        assert_eq!(res.body["location"], "Nakuru");
        assert!(res.body["temperature"].is_number());
        assert!(res.body["humidity"].is_number());
    }

    #[tokio::test]
    async fn defaults_to_the_profile_location() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let res = app.get_with_token(routes::WEATHER, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["location"], "Punjab, India");
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::WEATHER).await;

        assert_eq!(res.status, 401);
    }
}

mod prices {
    use super::*;

    #[tokio::test]
    async fn returns_one_point_per_requested_day() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let path = format!("{}?crop_type=Fruit&days=7", routes::PRICES);
        let res = app.get_with_token(&path, &token).await;

        assert_eq!(res.status, 200, "Prices failed: {}", res.text);
        assert_eq!(res.body["crop_type"], "Fruit");
        assert_eq!(res.body["points"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn day_count_is_clamped_to_a_sane_window() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let path = format!("{}?days=100000", routes::PRICES);
        let res = app.get_with_token(&path, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["points"].as_array().unwrap().len(), 90);
    }
}

mod analyze {
    use super::*;

    #[tokio::test]
    async fn reports_figures_in_the_documented_ranges() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;
        let crop = app.create_crop(&token, "Basmati Rice", "Grain").await;

        let res = app
            .post_with_token(
                routes::ANALYZE,
                &json!({"crop_id": crop["id"]}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "Analyze failed: {}", res.text);
        let freshness = res.body["freshness"].as_u64().unwrap();
        assert!((70..=100).contains(&freshness));
        let shelf_life = res.body["shelf_life_days"].as_u64().unwrap();
        assert!((3..=12).contains(&shelf_life));
        assert!(!res.body["recommendations"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_crop_is_a_404() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let res = app
            .post_with_token(
                routes::ANALYZE,
                &json!({"crop_id": Uuid::new_v4()}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod chat {
    use super::*;

    #[tokio::test]
    async fn keyword_messages_get_a_topical_reply() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let res = app
            .post_with_token(
                routes::CHAT,
                &json!({"message": "how is the weather for planting?"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "Chat failed: {}", res.text);
        assert!(res.body["reply"].as_str().unwrap().contains("Weather"));
    }

    #[tokio::test]
    async fn empty_messages_are_rejected() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let res = app
            .post_with_token(routes::CHAT, &json!({"message": "   "}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
