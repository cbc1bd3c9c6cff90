// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use ktu_record::domain::models::credentials::Credentials;
use ktu_record::domain::models::trace::DiagnosticTrace;
use ktu_record::domain::services::authenticator::{AuthOutcome, Authenticator};
use ktu_record::domain::services::portal_navigator::PortalNavigator;
use ktu_record::engines::reqwest_session::ReqwestSession;
use uuid::Uuid;

use super::helpers::{FixturePortal, PortalBehaviour};

/// 真实会话：登录后的 Cookie 被后续页面请求携带
#[tokio::test]
async fn login_cookie_carries_through_navigation() {
    let portal = FixturePortal::start(PortalBehaviour { semesters: 3 }).await;
    let settings = portal.settings();
    let session = ReqwestSession::new(&settings.portal).unwrap();
    let mut trace = DiagnosticTrace::new(Uuid::new_v4());

    let outcome = Authenticator::new(&settings.portal)
        .authenticate(&session, &Credentials::new("TVE20CS042", "pw"), &mut trace)
        .await
        .unwrap();
    let landing_url = match outcome {
        AuthOutcome::Authenticated { landing_url } => landing_url,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert!(landing_url.path().ends_with("/eu/stu/home.htm"));

    let pages = PortalNavigator::new(&settings.portal)
        .collect_pages(&session, &landing_url, &mut trace)
        .await
        .unwrap();

    assert_eq!(pages.grade_cards.len(), 3);
    assert!(pages.profile.body_contains("Anjali Menon"));
    // login page, submit, post-login redirect to the dashboard, dashboard again
    // from the navigator, three fixed pages, three grade cards
    assert_eq!(portal.hits(), 10);
}

/// 独立会话之间不共享 Cookie
#[tokio::test]
async fn fresh_session_is_not_authenticated() {
    let portal = FixturePortal::start(PortalBehaviour { semesters: 1 }).await;
    let settings = portal.settings();

    let first = ReqwestSession::new(&settings.portal).unwrap();
    let mut trace = DiagnosticTrace::new(Uuid::new_v4());
    Authenticator::new(&settings.portal)
        .authenticate(&first, &Credentials::new("TVE20CS042", "pw"), &mut trace)
        .await
        .unwrap();

    let second = ReqwestSession::new(&settings.portal).unwrap();
    let landing_url = settings.portal.page_url("/eu/stu/home.htm").unwrap();
    let err = PortalNavigator::new(&settings.portal)
        .collect_pages(&second, &landing_url, &mut trace)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Session expired - redirected to login page"
    );
}
