use serde_json::json;

use crate::common::{TestApp, routes};

mod acquire {
    use super::*;

    #[tokio::test]
    async fn distributor_gets_a_copy_and_the_farmer_keeps_the_original() {
        let app = TestApp::spawn().await;
        let (alice, alice_profile) = app.sign_up_user("alice@farm.example", "farmer").await;
        let (dana, dana_profile) = app.sign_up_user("dana@dist.example", "distributor").await;
        let crop = app.create_crop(&alice, "Basmati Rice", "Grain").await;
        let crop_id = crop["id"].as_str().unwrap();
        let farmer_code = alice_profile["farmer_id"].as_str().unwrap();

        let res = app
            .post_with_token(
                &routes::crop_acquire(crop_id),
                &json!({"supplier_id": farmer_code}),
                &dana,
            )
            .await;

        assert_eq!(res.status, 201, "Acquire failed: {}", res.text);
        assert_ne!(res.body["id"], crop["id"]);
        assert_eq!(res.body["user_id"], dana_profile["id"]);
        assert_eq!(res.body["farmer_info"]["farmer_id"], farmer_code);

        // The farmer's own record is untouched.
        let farmer_list = app.get_with_token(routes::CROPS, &alice).await;
        assert_eq!(farmer_list.body.as_array().unwrap().len(), 1);
        assert_eq!(farmer_list.body[0]["id"], crop["id"]);
    }

    #[tokio::test]
    async fn acquisition_is_recorded_in_the_audit_trail() {
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

        let trace = app
            .get_with_token(&routes::crop_trace(copy.body["id"].as_str().unwrap()), &dana)
            .await;

        assert_eq!(trace.status, 200);
        let entries = trace.body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["user_role"], "distributor");
        assert_eq!(entries[0]["details"]["action"], "acquired");
        assert_eq!(entries[0]["details"]["source_crop_id"], crop["id"]);
    }

    #[tokio::test]
    async fn farmers_cannot_acquire() {
        let app = TestApp::spawn().await;
        let (alice, alice_profile) = app.sign_up_user("alice@farm.example", "farmer").await;
        let crop = app.create_crop(&alice, "Basmati Rice", "Grain").await;

        let res = app
            .post_with_token(
                &routes::crop_acquire(crop["id"].as_str().unwrap()),
                &json!({"supplier_id": alice_profile["farmer_id"]}),
                &alice,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn unknown_supplier_code_is_a_404() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.sign_up_user("alice@farm.example", "farmer").await;
        let (dana, _) = app.sign_up_user("dana@dist.example", "distributor").await;
        let crop = app.create_crop(&alice, "Basmati Rice", "Grain").await;

        let res = app
            .post_with_token(
                &routes::crop_acquire(crop["id"].as_str().unwrap()),
                &json!({"supplier_id": "000"}),
                &dana,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn crop_must_be_listed_under_the_given_code() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.sign_up_user("alice@farm.example", "farmer").await;
        let (_, bob_profile) = app.sign_up_user("bob@farm.example", "farmer").await;
        let (dana, _) = app.sign_up_user("dana@dist.example", "distributor").await;
        let crop = app.create_crop(&alice, "Basmati Rice", "Grain").await;

        // Bob's code does not list Alice's crop.
        let res = app
            .post_with_token(
                &routes::crop_acquire(crop["id"].as_str().unwrap()),
                &json!({"supplier_id": bob_profile["farmer_id"]}),
                &dana,
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod handoff {
    use super::*;

    #[tokio::test]
    async fn distributor_handoff_stamps_both_snapshots() {
        let app = TestApp::spawn().await;
        let (_, alice_profile) = app.sign_up_user("alice@farm.example", "farmer").await;
        let (dana, _) = app.sign_up_user("dana@dist.example", "distributor").await;
        let crop = app.create_crop(&dana, "Basmati Rice", "Grain").await;
        let farmer_code = alice_profile["farmer_id"].as_str().unwrap();

        let res = app
            .post_with_token(
                &routes::crop_handoff(crop["id"].as_str().unwrap()),
                &json!({
                    "farmer_id": farmer_code,
                    "sent_to_retailer": "FreshMart",
                    "retailer_location": "Delhi",
                }),
                &dana,
            )
            .await;

        assert_eq!(res.status, 200, "Handoff failed: {}", res.text);
        assert_eq!(res.body["farmer_info"]["farmer_id"], farmer_code);
        assert_eq!(res.body["distributor_info"]["name"], "dana");
        assert_eq!(res.body["distributor_info"]["sent_to_retailer"], "FreshMart");
    }

    #[tokio::test]
    async fn invalid_farmer_code_is_rejected_with_a_hint() {
        let app = TestApp::spawn().await;
        let (dana, _) = app.sign_up_user("dana@dist.example", "distributor").await;
        let crop = app.create_crop(&dana, "Basmati Rice", "Grain").await;

        let res = app
            .post_with_token(
                &routes::crop_handoff(crop["id"].as_str().unwrap()),
                &json!({"farmer_id": "000"}),
                &dana,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].as_str().unwrap().contains("farmer ID"));
    }

    #[tokio::test]
    async fn distributor_must_supply_a_farmer_code() {
        let app = TestApp::spawn().await;
        let (dana, _) = app.sign_up_user("dana@dist.example", "distributor").await;
        let crop = app.create_crop(&dana, "Basmati Rice", "Grain").await;

        let res = app
            .post_with_token(
                &routes::crop_handoff(crop["id"].as_str().unwrap()),
                &json!({"sent_to_retailer": "FreshMart"}),
                &dana,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn retailer_handoff_stamps_the_retail_snapshot() {
        let app = TestApp::spawn().await;
        let (_, dana_profile) = app.sign_up_user("dana@dist.example", "distributor").await;
        let (rita, _) = app.sign_up_user("rita@shop.example", "retailer").await;
        let crop = app.create_crop(&rita, "Basmati Rice", "Grain").await;
        let dist_code = dana_profile["distributor_id"].as_str().unwrap();

        let res = app
            .post_with_token(
                &routes::crop_handoff(crop["id"].as_str().unwrap()),
                &json!({"distributor_id": dist_code}),
                &rita,
            )
            .await;

        assert_eq!(res.status, 200, "Handoff failed: {}", res.text);
        assert_eq!(res.body["retailer_info"]["name"], "rita");
        assert_eq!(
            res.body["retailer_info"]["received_from_distributor"],
            "dana"
        );
    }

    #[tokio::test]
    async fn farmers_cannot_record_handoffs() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.sign_up_user("alice@farm.example", "farmer").await;
        let crop = app.create_crop(&alice, "Basmati Rice", "Grain").await;

        let res = app
            .post_with_token(
                &routes::crop_handoff(crop["id"].as_str().unwrap()),
                &json!({"farmer_id": "123"}),
                &alice,
            )
            .await;

        assert_eq!(res.status, 403);
    }
}

mod full_chain {
    use super::*;

    #[tokio::test]
    async fn crop_accumulates_snapshots_as_it_moves_down_the_chain() {
        let app = TestApp::spawn().await;
        let (alice, alice_profile) = app.sign_up_user("alice@farm.example", "farmer").await;
        let (dana, dana_profile) = app.sign_up_user("dana@dist.example", "distributor").await;
        let (rita, _) = app.sign_up_user("rita@shop.example", "retailer").await;

        let crop = app.create_crop(&alice, "Basmati Rice", "Grain").await;
        let farmer_code = alice_profile["farmer_id"].as_str().unwrap();
        let dist_code = dana_profile["distributor_id"].as_str().unwrap();

        // Distributor acquires from the farmer.
        let dist_copy = app
            .post_with_token(
                &routes::crop_acquire(crop["id"].as_str().unwrap()),
                &json!({"supplier_id": farmer_code}),
                &dana,
            )
            .await;
        assert_eq!(dist_copy.status, 201, "Acquire failed: {}", dist_copy.text);

        // Retailer acquires from the distributor.
        let retail_copy = app
            .post_with_token(
                &routes::crop_acquire(dist_copy.body["id"].as_str().unwrap()),
                &json!({"supplier_id": dist_code}),
                &rita,
            )
            .await;
        assert_eq!(
            retail_copy.status, 201,
            "Retail acquire failed: {}",
            retail_copy.text
        );

        // Farmer provenance survived both copies.
        assert_eq!(
            retail_copy.body["farmer_info"]["farmer_id"],
            farmer_code
        );

        let rita_list = app.get_with_token(routes::CROPS, &rita).await;
        assert_eq!(rita_list.body.as_array().unwrap().len(), 1);
    }
}
