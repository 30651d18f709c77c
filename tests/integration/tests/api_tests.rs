//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance (migrations are applied at startup)
//! - Environment variables: DATABASE_URL, JWT_SECRET, API_PORT
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer, API,
};
use reqwest::StatusCode;
use serde_json::json;

/// Register a user, create a convention and an edition owned by that user
async fn setup_edition(
    server: &TestServer,
    is_online: bool,
) -> (AuthResponse, ConventionResponse, EditionResponse) {
    let owner = server.register_user().await.unwrap();

    let response = server
        .post_auth(
            &format!("{API}/conventions"),
            &owner.access_token,
            &CreateConventionRequest::unique(),
        )
        .await
        .unwrap();
    let convention: ConventionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("{API}/conventions/{}/editions", convention.id),
            &owner.access_token,
            &CreateEditionRequest::upcoming(is_online),
        )
        .await
        .unwrap();
    let edition: EditionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    (owner, convention, edition)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server
        .post(&format!("{API}/auth/register"), &request)
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.user.pseudo, request.pseudo);
    assert_eq!(auth.user.email, request.email);
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server
        .post(&format!("{API}/auth/register"), &request)
        .await
        .unwrap();

    let response = server
        .post(&format!("{API}/auth/register"), &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_register_rejects_invalid_body() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post(
            &format!("{API}/auth/register"),
            &json!({ "email": "not-an-email", "pseudo": "ab", "password": "short" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_and_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let register_req = RegisterRequest::unique();
    server
        .post(&format!("{API}/auth/register"), &register_req)
        .await
        .unwrap();

    let response = server
        .post(
            &format!("{API}/auth/login"),
            &LoginRequest::from_register(&register_req),
        )
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.pseudo, register_req.pseudo);

    let wrong = LoginRequest {
        email: register_req.email.clone(),
        password: "WrongPass123!".to_string(),
    };
    let response = server
        .post(&format!("{API}/auth/login"), &wrong)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.register_user().await.unwrap();

    let request = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server
        .post(&format!("{API}/auth/refresh"), &request)
        .await
        .unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // The old refresh token was consumed
    let response = server
        .post(&format!("{API}/auth/refresh"), &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_access_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.register_user().await.unwrap();

    let response = server
        .post_auth(&format!("{API}/auth/logout"), &auth.access_token, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("{API}/users/@me"), &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_get_current_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.register_user().await.unwrap();

    let response = server
        .get_auth(&format!("{API}/users/@me"), &auth.access_token)
        .await
        .unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.id, auth.user.id);
}

#[tokio::test]
async fn test_unauthorized_access() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get(&format!("{API}/users/@me")).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .get_auth(&format!("{API}/users/@me"), "not-a-jwt")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Convention and Edition Tests
// ============================================================================

#[tokio::test]
async fn test_convention_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.register_user().await.unwrap();
    let stranger = server.register_user().await.unwrap();

    let response = server
        .post_auth(
            &format!("{API}/conventions"),
            &owner.access_token,
            &CreateConventionRequest::unique(),
        )
        .await
        .unwrap();
    let convention: ConventionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(convention.author_id, owner.user.id);

    let response = server
        .get_auth(&format!("{API}/conventions/@me"), &owner.access_token)
        .await
        .unwrap();
    let mine: Vec<ConventionResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(mine.iter().any(|c| c.id == convention.id));

    // Someone without rights cannot edit
    let response = server
        .patch_auth(
            &format!("{API}/conventions/{}", convention.id),
            &stranger.access_token,
            &json!({ "name": "Hijacked" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "MISSING_RIGHTS");

    let response = server
        .put_auth(
            &format!("{API}/conventions/{}/archived", convention.id),
            &owner.access_token,
            &ToggleRequest { enabled: true },
        )
        .await
        .unwrap();
    let archived: ConventionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(archived.is_archived);

    let response = server
        .delete_auth(
            &format!("{API}/conventions/{}", convention.id),
            &owner.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get(&format!("{API}/conventions/{}", convention.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_offline_edition_hidden_until_online() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, _, edition) = setup_edition(&server, false).await;
    assert!(!edition.is_online);

    let response = server
        .get(&format!("{API}/editions/{}", edition.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    // The author sees it with full rights
    let response = server
        .get_auth(&format!("{API}/editions/{}", edition.id), &owner.access_token)
        .await
        .unwrap();
    let seen: EditionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(seen.rights.is_some_and(|r| !r.is_empty()));

    let response = server
        .put_auth(
            &format!("{API}/editions/{}/online", edition.id),
            &owner.access_token,
            &ToggleRequest { enabled: true },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!("{API}/editions/{}", edition.id))
        .await
        .unwrap();
    let public: EditionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(public.is_online);
    assert!(public.rights.is_none());
}

#[tokio::test]
async fn test_invalid_path_id() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get(&format!("{API}/editions/not-a-number"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Collaborator Tests
// ============================================================================

#[tokio::test]
async fn test_collaborator_rights_boundaries() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, convention, edition) = setup_edition(&server, true).await;
    let helper = server.register_user().await.unwrap();
    let stranger = server.register_user().await.unwrap();

    let response = server
        .post_auth(
            &format!("{API}/conventions/{}/editions", convention.id),
            &owner.access_token,
            &CreateEditionRequest::upcoming(true),
        )
        .await
        .unwrap();
    let sibling: EditionResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let collaborators_url = format!("{API}/conventions/{}/collaborators", convention.id);

    // A stranger sees nothing of the management side
    let response = server
        .get_auth(&collaborators_url, &stranger.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    // Add by email with an EDIT override on one edition only
    let response = server
        .post_auth(
            &collaborators_url,
            &owner.access_token,
            &AddCollaboratorRequest::by_email(
                &helper.user.email,
                vec![EditionPermission::new(&edition.id, &["EDIT"])],
            ),
        )
        .await
        .unwrap();
    let collaborator: CollaboratorResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(collaborator.user_id, helper.user.id);
    assert!(collaborator.rights.is_empty());
    assert_eq!(collaborator.edition_permissions.len(), 1);

    let response = server
        .post_auth(
            &collaborators_url,
            &owner.access_token,
            &AddCollaboratorRequest::by_email(&helper.user.email, Vec::new()),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_COLLABORATOR");

    let response = server
        .post_auth(
            &collaborators_url,
            &owner.access_token,
            &AddCollaboratorRequest::by_email(&owner.user.email, Vec::new()),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(code, "AUTHOR_CANNOT_BE_COLLABORATOR");

    // The override applies to its edition and nowhere else
    let rename = json!({ "city": "Nantes" });
    let response = server
        .patch_auth(
            &format!("{API}/editions/{}", edition.id),
            &helper.access_token,
            &rename,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .patch_auth(
            &format!("{API}/editions/{}", sibling.id),
            &helper.access_token,
            &rename,
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "MISSING_RIGHTS");

    // Updating replaces the whole override set
    let collaborator_url = format!("{collaborators_url}/{}", collaborator.id);
    let response = server
        .put_auth(
            &collaborator_url,
            &owner.access_token,
            &UpdateCollaboratorRequest {
                rights: Vec::new(),
                edition_permissions: vec![EditionPermission::new(&sibling.id, &["EDIT"])],
            },
        )
        .await
        .unwrap();
    let updated: CollaboratorResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.edition_permissions.len(), 1);
    assert_eq!(updated.edition_permissions[0].edition_id, sibling.id);

    let response = server
        .patch_auth(
            &format!("{API}/editions/{}", edition.id),
            &helper.access_token,
            &rename,
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .patch_auth(
            &format!("{API}/editions/{}", sibling.id),
            &helper.access_token,
            &rename,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // The collaborator cannot manage other collaborators
    let response = server
        .delete_auth(&collaborator_url, &helper.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .delete_auth(&collaborator_url, &owner.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&collaborators_url, &owner.access_token)
        .await
        .unwrap();
    let remaining: Vec<CollaboratorResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert!(remaining.is_empty());

    let response = server
        .patch_auth(
            &format!("{API}/editions/{}", sibling.id),
            &helper.access_token,
            &rename,
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Volunteer Tests
// ============================================================================

#[tokio::test]
async fn test_volunteer_application_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, _, edition) = setup_edition(&server, true).await;
    let volunteer = server.register_user().await.unwrap();
    let applications = format!("{API}/editions/{}/volunteers/applications", edition.id);

    // Closed until the organisers open recruitment
    let response = server
        .post_auth(
            &applications,
            &volunteer.access_token,
            &ApplyVolunteerRequest::default(),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();

    let response = server
        .put_auth(
            &format!("{API}/editions/{}/volunteers-open", edition.id),
            &owner.access_token,
            &ToggleRequest { enabled: true },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post_auth(
            &applications,
            &volunteer.access_token,
            &ApplyVolunteerRequest::default(),
        )
        .await
        .unwrap();
    let application: ApplicationResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(application.status, "PENDING");
    assert_eq!(application.diet, "VEGETARIAN");

    // One application per edition
    let response = server
        .post_auth(
            &applications,
            &volunteer.access_token,
            &ApplyVolunteerRequest::default(),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    // Volunteers cannot review applications
    let response = server
        .get_auth(&applications, &volunteer.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .get_auth(&format!("{applications}?status=PENDING"), &owner.access_token)
        .await
        .unwrap();
    let pending: Vec<ApplicationResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(pending.len(), 1);

    let response = server
        .put_auth(
            &format!("{applications}/{}", application.id),
            &owner.access_token,
            &DecideApplicationRequest {
                status: "ACCEPTED".to_string(),
            },
        )
        .await
        .unwrap();
    let decided: ApplicationResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(decided.status, "ACCEPTED");

    // The applicant was notified
    let response = server
        .get_auth(
            &format!("{API}/notifications/unread-count"),
            &volunteer.access_token,
        )
        .await
        .unwrap();
    let unread: UnreadCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(unread.count >= 1);
}

// ============================================================================
// Ticketing Tests
// ============================================================================

#[tokio::test]
async fn test_manual_order_uses_tier_price() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, _, edition) = setup_edition(&server, true).await;
    let ticketing = format!("{API}/editions/{}/ticketing", edition.id);

    let response = server
        .post_auth(
            &format!("{ticketing}/tiers"),
            &owner.access_token,
            &CreateTierRequest {
                name: "Full pass".to_string(),
                price_cents: 4500,
            },
        )
        .await
        .unwrap();
    let tier: TierResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(tier.is_active);

    // Tiers are public
    let response = server.get(&format!("{ticketing}/tiers")).await.unwrap();
    let tiers: Vec<TierResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(tiers.len(), 1);

    let order = CreateOrderRequest {
        payer_first_name: "Ada".to_string(),
        payer_last_name: "Lovelace".to_string(),
        payer_email: "ada@example.com".to_string(),
        items: vec![
            OrderItemInput {
                tier_id: Some(tier.id.clone()),
                first_name: Some("Ada".to_string()),
            },
            OrderItemInput {
                tier_id: Some(tier.id.clone()),
                first_name: Some("Charles".to_string()),
            },
        ],
    };
    let response = server
        .post_auth(&format!("{ticketing}/orders"), &owner.access_token, &order)
        .await
        .unwrap();
    let created: OrderResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created.status, "PROCESSED");
    assert_eq!(created.amount_cents, 9000);
    assert!(created.items.iter().all(|i| i.name == "Full pass" && i.amount_cents == 4500));

    let response = server
        .get_auth(&format!("{ticketing}/orders?limit=1"), &owner.access_token)
        .await
        .unwrap();
    let page: PaginatedResponse<OrderResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.limit, 1);
    assert!(!page.pagination.has_more);
}

#[tokio::test]
async fn test_external_ticketing_requires_configuration() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (owner, _, edition) = setup_edition(&server, true).await;

    let response = server
        .post_auth(
            &format!("{API}/editions/{}/ticketing/external/sync", edition.id),
            &owner.access_token,
            &json!({}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Carpool Tests
// ============================================================================

#[tokio::test]
async fn test_carpool_booking_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (driver, _, edition) = setup_edition(&server, true).await;
    let passenger = server.register_user().await.unwrap();

    let response = server
        .post_auth(
            &format!("{API}/editions/{}/carpool/offers", edition.id),
            &driver.access_token,
            &CreateCarpoolOfferRequest::to_event(3),
        )
        .await
        .unwrap();
    let offer: CarpoolOfferResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(offer.remaining_seats, 3);
    let bookings = format!("{API}/carpool/offers/{}/bookings", offer.id);

    // Drivers cannot book their own ride
    let response = server
        .post_auth(
            &bookings,
            &driver.access_token,
            &CreateBookingRequest {
                seats: 1,
                message: None,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();

    let response = server
        .post_auth(
            &bookings,
            &passenger.access_token,
            &CreateBookingRequest {
                seats: 2,
                message: Some("Two of us".to_string()),
            },
        )
        .await
        .unwrap();
    let booking: BookingResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(booking.status, "PENDING");

    // The driver hears about it
    let response = server
        .get_auth(&format!("{API}/notifications?unread=true"), &driver.access_token)
        .await
        .unwrap();
    let notifications: Vec<NotificationResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert!(notifications.iter().any(|n| !n.is_read));

    let response = server
        .put_auth(
            &format!("{bookings}/{}", booking.id),
            &driver.access_token,
            &DecideBookingRequest {
                status: "ACCEPTED".to_string(),
            },
        )
        .await
        .unwrap();
    let accepted: BookingResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(accepted.status, "ACCEPTED");

    let response = server
        .get(&format!("{API}/carpool/offers/{}", offer.id))
        .await
        .unwrap();
    let offer: CarpoolOfferResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(offer.remaining_seats, 1);

    // Only one seat left
    let late = server.register_user().await.unwrap();
    let response = server
        .post_auth(
            &bookings,
            &late.access_token,
            &CreateBookingRequest {
                seats: 2,
                message: None,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
}

// ============================================================================
// Notification Tests
// ============================================================================

#[tokio::test]
async fn test_notifications_mark_all_read() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.register_user().await.unwrap();

    let response = server
        .post_auth(
            &format!("{API}/notifications/test"),
            &auth.access_token,
            &json!({ "title": "Hello", "message": "Testing" }),
        )
        .await
        .unwrap();
    let created: NotificationResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created.title, "Hello");

    let response = server
        .put_auth(
            &format!("{API}/notifications/read"),
            &auth.access_token,
            &json!({}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth(
            &format!("{API}/notifications/unread-count"),
            &auth.access_token,
        )
        .await
        .unwrap();
    let unread: UnreadCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(unread.count, 0);
}

#[tokio::test]
async fn test_push_config_is_public() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get(&format!("{API}/push/config")).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}
