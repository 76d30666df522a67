#[cfg(test)]
mod integration_tests {
    use crate::auth::issue_token;
    use crate::handlers::auth::LoginRequest;
    use crate::schemas::{ApiResponse, AppState};
    use crate::test_utils::test_utils::{create_admin, setup_test_app, setup_test_app_with_state};
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::multipart::MultipartForm;
    use axum_test::TestServer;
    use model::entities::{district, user};
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    fn bearer(token: &str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
    }

    async fn dhaka_district(state: &AppState) -> district::Model {
        district::Entity::find()
            .filter(district::Column::Name.eq("Dhaka"))
            .one(&state.db)
            .await
            .unwrap()
            .expect("reference data must contain Dhaka district")
    }

    /// Register the Dhaka-5 candidate through the API and return the
    /// response payload.
    async fn register_dhaka5(server: &TestServer, state: &AppState) -> serde_json::Value {
        let district_model = dhaka_district(state).await;

        let form = MultipartForm::new()
            .add_text("candidateNameEn", "Rahim Uddin")
            .add_text("candidateNameBn", "রহিম উদ্দিন")
            .add_text("divisionId", district_model.division_id.to_string())
            .add_text("districtId", district_model.id.to_string())
            .add_text("constituteNo", "5")
            .add_text("password", "Sonar@Bangla1");

        let response = server.post("/api/v1/auth/register").multipart(form).await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        body.data
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        let data = register_dhaka5(&server, &state).await;
        assert_eq!(data["username"], "Dhaka5");
        assert_eq!(data["slug"], "dhaka5");
        assert!(data["userId"].as_i64().unwrap() > 0);

        // The derived credentials log in and carry the candidate role.
        let response = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                username: "Dhaka5".to_string(),
                password: "Sonar@Bangla1".to_string(),
            })
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["user"]["role"], "candidate");

        let token = body.data["token"].as_str().unwrap().to_string();
        let (name, value) = bearer(&token);
        let response = server
            .get("/api/v1/contact/my-messages")
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_duplicate_rejected() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        register_dhaka5(&server, &state).await;

        let district_model = dhaka_district(&state).await;
        let form = MultipartForm::new()
            .add_text("candidateNameEn", "Someone Else")
            .add_text("candidateNameBn", "অন্য কেউ")
            .add_text("divisionId", district_model.division_id.to_string())
            .add_text("districtId", district_model.id.to_string())
            .add_text("constituteNo", "5")
            .add_text("password", "Another@1");

        let response = server.post("/api/v1/auth/register").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_wrong_password_rejected() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        register_dhaka5(&server, &state).await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                username: "Dhaka5".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_candidate_profile_by_slug() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        register_dhaka5(&server, &state).await;

        let response = server.get("/api/v1/candidates/profile/dhaka5").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["slug"], "dhaka5");
        assert_eq!(body.data["fullNameEn"], "Rahim Uddin");
        assert_eq!(body.data["districtEn"], "Dhaka");
        assert_eq!(body.data["divisionEn"], "Dhaka");
        assert_eq!(body.data["constituencyNo"], 5);
        assert!(body.data["team"].as_array().unwrap().is_empty());
        assert!(body.data["gallery"].as_array().unwrap().is_empty());

        let response = server.get("/api/v1/candidates/profile/nowhere1").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_update_invalidates_cached_profile() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        register_dhaka5(&server, &state).await;
        let (_admin, token) = create_admin(&state).await;

        // Prime the cache.
        let response = server.get("/api/v1/candidates/profile/dhaka5").await;
        response.assert_status(StatusCode::OK);

        let (name, value) = bearer(&token);
        let response = server
            .put("/api/v1/candidates/dhaka5")
            .add_header(name, value)
            .json(&serde_json::json!({ "vision": "A better Dhaka-5" }))
            .await;
        response.assert_status(StatusCode::OK);

        // The next read must reflect the update, not the cached copy.
        let response = server.get("/api/v1/candidates/profile/dhaka5").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["vision"], "A better Dhaka-5");
    }

    #[tokio::test]
    async fn test_candidate_updates_own_profile() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        let data = register_dhaka5(&server, &state).await;
        let user_id = data["userId"].as_i64().unwrap() as i32;
        let account = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await
            .unwrap()
            .unwrap();
        let token = issue_token(&state.config.jwt_secret, &account).unwrap();

        let (name, value) = bearer(&token);
        let response = server
            .put("/api/v1/auth/profile")
            .add_header(name, value)
            .json(&serde_json::json!({
                "briefIntro": "Community organizer since 2008",
                "facebookLink": "https://facebook.com/rahim.dhaka5"
            }))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server.get("/api/v1/candidates/profile/dhaka5").await;
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["briefIntro"], "Community organizer since 2008");
        assert_eq!(
            body.data["facebookLink"],
            "https://facebook.com/rahim.dhaka5"
        );
    }

    #[tokio::test]
    async fn test_location_reference_listings() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/locations/divisions").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 8);
        assert!(body.data.iter().any(|d| d["name"] == "Dhaka"));

        let dhaka_division_id = dhaka_district(&state).await.division_id;
        let response = server
            .get("/api/v1/locations/districts")
            .add_query_param("divisionId", dhaka_division_id)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 13);
        assert!(body.data.iter().all(|d| d["divisionId"] == dhaka_division_id));
    }

    #[tokio::test]
    async fn test_candidates_by_district_matches_bengali_name() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        register_dhaka5(&server, &state).await;

        let response = server
            .get("/api/v1/candidates/by-district")
            .add_query_param("districtName", "ঢাকা")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["slug"], "dhaka5");
        assert_eq!(body.data[0]["districtBn"], "ঢাকা");
    }

    #[tokio::test]
    async fn test_contact_message_flow() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        register_dhaka5(&server, &state).await;
        let (_admin, admin_token) = create_admin(&state).await;

        let response = server
            .post("/api/v1/contact/submit")
            .json(&serde_json::json!({
                "name": "Visitor",
                "email": "visitor@example.org",
                "subject": "Road repair",
                "message": "When will the road be fixed?",
                "slugName": "dhaka5"
            }))
            .await;
        response.assert_status(StatusCode::OK);

        // Admin sees the unread message.
        let (name, value) = bearer(&admin_token);
        let response = server
            .get("/api/v1/contact/messages")
            .add_query_param("status", "unread")
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        let message_id = body.data[0]["id"].as_i64().unwrap();

        // The candidate sees and resolves it.
        let data = register_response_user(&state).await;
        let token = issue_token(&state.config.jwt_secret, &data).unwrap();
        let (name, value) = bearer(&token);
        let response = server
            .get("/api/v1/contact/my-messages")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);

        let response = server
            .put(&format!("/api/v1/contact/messages/{}/mark-read", message_id))
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::OK);

        let (name, value) = bearer(&admin_token);
        let response = server
            .get("/api/v1/contact/messages")
            .add_query_param("status", "unread")
            .add_header(name, value)
            .await;
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.data.is_empty());
    }

    async fn register_response_user(state: &AppState) -> user::Model {
        user::Entity::find()
            .filter(user::Column::Username.eq("Dhaka5"))
            .one(&state.db)
            .await
            .unwrap()
            .expect("registered candidate account must exist")
    }

    #[tokio::test]
    async fn test_team_roster_flow() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        register_dhaka5(&server, &state).await;
        let (_admin, admin_token) = create_admin(&state).await;

        // Admin adds a member to the global roster.
        let (name, value) = bearer(&admin_token);
        let form = MultipartForm::new()
            .add_text("name", "Coordinator")
            .add_text("role", "National coordinator");
        let response = server
            .post("/api/v1/team")
            .add_header(name, value)
            .multipart(form)
            .await;
        response.assert_status(StatusCode::CREATED);

        // The candidate adds a member to their own roster.
        let account = register_response_user(&state).await;
        let token = issue_token(&state.config.jwt_secret, &account).unwrap();
        let (name, value) = bearer(&token);
        let form = MultipartForm::new()
            .add_text("name", "Agent")
            .add_text("role", "Polling agent");
        let response = server
            .post("/api/v1/team")
            .add_header(name, value)
            .multipart(form)
            .await;
        response.assert_status(StatusCode::CREATED);

        // Public listings keep the scopes apart.
        let response = server.get("/api/v1/team/public").await;
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "Coordinator");

        let response = server.get("/api/v1/team/public/dhaka5").await;
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "Agent");
    }

    #[tokio::test]
    async fn test_import_requires_admin() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/import")
            .multipart(MultipartForm::new())
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        register_dhaka5(&server, &state).await;
        let account = register_response_user(&state).await;
        let token = issue_token(&state.config.jwt_secret, &account).unwrap();
        let (name, value) = bearer(&token);
        let response = server
            .post("/api/v1/import")
            .add_header(name, value)
            .multipart(MultipartForm::new())
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_import_without_file_is_rejected() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();

        let (_admin, token) = create_admin(&state).await;
        let (name, value) = bearer(&token);
        let response = server
            .post("/api/v1/import")
            .add_header(name, value)
            .multipart(MultipartForm::new())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
