use serde_json::json;

use crate::common::{TestApp, routes};

mod signup {
    use super::*;

    #[tokio::test]
    async fn farmer_gets_a_three_digit_code_on_signup() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({
                    "email": "alice@farm.example",
                    "password": "securepass",
                    "role": "farmer",
                    "name": "Alice",
                    "location": "Punjab, India",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "Signup failed: {}", res.text);
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(res.body["user"]["role"], "farmer");

        let code = res.body["user"]["farmer_id"].as_str().unwrap();
        assert_eq!(code.len(), 3);
        let numeric: u32 = code.parse().unwrap();
        assert!((100..=999).contains(&numeric));
        assert!(res.body["user"]["distributor_id"].is_null());
    }

    #[tokio::test]
    async fn distributor_gets_a_distributor_code_not_a_farmer_code() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({
                    "email": "dana@dist.example",
                    "password": "securepass",
                    "role": "distributor",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "Signup failed: {}", res.text);
        assert!(res.body["user"]["distributor_id"].is_string());
        assert!(res.body["user"]["farmer_id"].is_null());
    }

    #[tokio::test]
    async fn consumer_gets_no_lookup_code() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({
                    "email": "carol@example.com",
                    "password": "securepass",
                    "role": "consumer",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "Signup failed: {}", res.text);
        assert!(res.body["user"]["farmer_id"].is_null());
        assert!(res.body["user"]["distributor_id"].is_null());
    }

    #[tokio::test]
    async fn response_never_contains_the_password_hash() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({
                    "email": "alice@farm.example",
                    "password": "securepass",
                    "role": "farmer",
                }),
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["user"].get("password_hash").is_none());
        assert!(!res.text.contains("securepass"));
    }

    #[tokio::test]
    async fn cannot_sign_up_twice_with_the_same_email() {
        let app = TestApp::spawn().await;
        let body = json!({
            "email": "alice@farm.example",
            "password": "securepass",
            "role": "farmer",
        });

        let first = app.post_without_token(routes::SIGNUP, &body).await;
        assert_eq!(first.status, 201, "First signup failed: {}", first.text);

        let res = app.post_without_token(routes::SIGNUP, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_insensitive() {
        let app = TestApp::spawn().await;

        let first = app
            .post_without_token(
                routes::SIGNUP,
                &json!({"email": "alice@farm.example", "password": "securepass", "role": "farmer"}),
            )
            .await;
        assert_eq!(first.status, 201);

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({"email": "ALICE@FARM.EXAMPLE", "password": "securepass", "role": "farmer"}),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn cannot_sign_up_with_a_malformed_email() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({"email": "not-an-email", "password": "securepass", "role": "farmer"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_sign_up_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({"email": "alice@farm.example", "password": "short", "role": "farmer"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_sign_up_with_an_unknown_role() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({"email": "alice@farm.example", "password": "securepass", "role": "wizard"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod signin {
    use super::*;

    #[tokio::test]
    async fn registered_user_can_sign_in() {
        let app = TestApp::spawn().await;
        app.sign_up_user("alice@farm.example", "farmer").await;

        let res = app
            .post_without_token(
                routes::SIGNIN,
                &json!({"email": "alice@farm.example", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 200, "Signin failed: {}", res.text);
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(res.body["user"]["email"], "alice@farm.example");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.sign_up_user("alice@farm.example", "farmer").await;

        let res = app
            .post_without_token(
                routes::SIGNIN,
                &json!({"email": "alice@farm.example", "password": "wrongpassword"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_gets_the_same_error_as_a_wrong_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNIN,
                &json!({"email": "nobody@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn returns_the_profile_for_a_valid_token() {
        let app = TestApp::spawn().await;
        let (token, _) = app.sign_up_user("alice@farm.example", "farmer").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200, "Me failed: {}", res.text);
        assert_eq!(res.body["email"], "alice@farm.example");
        assert_eq!(res.body["role"], "farmer");
    }

    #[tokio::test]
    async fn rejects_requests_without_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn rejects_a_garbage_token() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
