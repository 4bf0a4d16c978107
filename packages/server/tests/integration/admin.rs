use serde_json::json;

use crate::common::{TestApp, routes};

mod user_listing {
    use super::*;

    #[tokio::test]
    async fn admin_sees_every_registered_user() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.sign_up_user("admin@farmchainx.example", "admin").await;
        app.sign_up_user("alice@farm.example", "farmer").await;
        app.sign_up_user("dana@dist.example", "distributor").await;

        let res = app.get_with_token(routes::ADMIN_USERS, &admin).await;

        assert_eq!(res.status, 200, "User listing failed: {}", res.text);
        let users = res.body.as_array().unwrap();
        assert_eq!(users.len(), 3);
        assert!(users.iter().all(|u| u.get("password_hash").is_none()));
    }

    #[tokio::test]
    async fn non_admins_are_rejected() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let res = app.get_with_token(routes::ADMIN_USERS, &token).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod export_import {
    use super::*;

    #[tokio::test]
    async fn export_then_import_reproduces_the_data_set() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.sign_up_user("admin@farmchainx.example", "admin").await;
        let (alice, _) = app.sign_up_user("alice@farm.example", "farmer").await;
        app.create_crop(&alice, "Basmati Rice", "Grain").await;

        let exported = app.get_with_token(routes::ADMIN_EXPORT, &admin).await;
        assert_eq!(exported.status, 200, "Export failed: {}", exported.text);
        assert_eq!(exported.body["crops"].as_array().unwrap().len(), 1);

        let res = app
            .post_with_token(routes::ADMIN_IMPORT, &exported.body, &admin)
            .await;
        assert_eq!(res.status, 204, "Import failed: {}", res.text);

        // The imported data set is served back unchanged.
        let after = app.get_with_token(routes::ADMIN_EXPORT, &admin).await;
        assert_eq!(after.body, exported.body);
    }

    #[tokio::test]
    async fn malformed_document_is_rejected_and_data_survives() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.sign_up_user("admin@farmchainx.example", "admin").await;

        let res = app
            .post_with_token(
                routes::ADMIN_IMPORT,
                &json!({"users": "this-should-be-an-array"}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        // The admin account created above is still there.
        let users = app.get_with_token(routes::ADMIN_USERS, &admin).await;
        assert_eq!(users.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn export_requires_the_admin_role() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let res = app.get_with_token(routes::ADMIN_EXPORT, &token).await;

        assert_eq!(res.status, 403);
    }
}
