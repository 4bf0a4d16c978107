use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes};

mod public_scan {
    use super::*;

    #[tokio::test]
    async fn bare_crop_id_resolves_without_authentication() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.sign_up_user("alice@farm.example", "farmer").await;
        let crop = app.create_crop(&alice, "Basmati Rice", "Grain").await;
        let id = crop["id"].as_str().unwrap();

        let res = app.get_without_token(&routes::scan(id)).await;

        assert_eq!(res.status, 200, "Scan failed: {}", res.text);
        assert_eq!(res.body["crop"]["name"], "Basmati Rice");
        assert!(res.body["supply_chain"].is_array());
    }

    #[tokio::test]
    async fn json_payload_with_an_id_field_resolves_to_the_same_crop() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.sign_up_user("alice@farm.example", "farmer").await;
        let crop = app.create_crop(&alice, "Basmati Rice", "Grain").await;
        let id = crop["id"].as_str().unwrap();

        let payload = json!({"id": id}).to_string();
        let encoded: String = payload
            .bytes()
            .map(|b| format!("%{:02X}", b))
            .collect();

        let res = app.get_without_token(&routes::scan(&encoded)).await;

        assert_eq!(res.status, 200, "Scan failed: {}", res.text);
        assert_eq!(res.body["crop"]["id"], crop["id"]);
    }

    #[tokio::test]
    async fn unknown_crop_id_is_a_404() {
        let app = TestApp::spawn().await;
        let id = Uuid::new_v4().to_string();

        let res = app.get_without_token(&routes::scan(&id)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_payload_is_a_400() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::scan("not-a-uuid")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn scan_includes_the_audit_trail() {
        let app = TestApp::spawn().await;
        let (alice, alice_profile) = app.sign_up_user("alice@farm.example", "farmer").await;
        let (dana, _) = app.sign_up_user("dana@dist.example", "distributor").await;
        let crop = app.create_crop(&alice, "Basmati Rice", "Grain").await;
        let farmer_code = alice_profile["farmer_id"].as_str().unwrap();

        let copy = app
            .post_with_token(
                &routes::crop_acquire(crop["id"].as_str().unwrap()),
                &json!({"supplier_id": farmer_code}),
                &dana,
            )
            .await;
        assert_eq!(copy.status, 201);

        let res = app
            .get_without_token(&routes::scan(copy.body["id"].as_str().unwrap()))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["supply_chain"].as_array().unwrap().len(), 1);
    }
}
