// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 测试用的门户替身
//!
//! 在 `127.0.0.1:0` 上启动一个 axum 服务器，模拟登录、Cookie 校验和成绩页面

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use ktu_record::config::settings::Settings;
use ktu_record::engines::reqwest_session::ReqwestSessionFactory;
use ktu_record::engines::traits::{PortalSession, SessionError, SessionFactory};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

const VALID_COOKIE: &str = "JSESSIONID=valid";
const STALE_COOKIE: &str = "JSESSIONID=stale";

/// 门户替身的可调行为
#[derive(Clone, Copy)]
pub struct PortalBehaviour {
    /// 成绩列表页上的学期链接数
    pub semesters: usize,
}

struct PortalState {
    behaviour: PortalBehaviour,
    hits: AtomicUsize,
}

/// 正在运行的门户替身
pub struct FixturePortal {
    pub base_url: String,
    state: Arc<PortalState>,
}

impl FixturePortal {
    pub async fn start(behaviour: PortalBehaviour) -> Self {
        let state = Arc::new(PortalState {
            behaviour,
            hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/login.htm", get(login_page))
            .route("/j_security_check", post(login_submit))
            .route("/eu/stu/home.htm", get(dashboard))
            .route("/eu/stu/viewProfile.htm", get(profile))
            .route("/eu/stu/studentDetailsView.htm", get(full_profile))
            .route("/eu/stu/grade.htm", get(curriculum))
            .route("/eu/stu/viewResult.htm", get(grade_card))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// 门户收到的请求总数
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// 指向该门户的配置
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::new().unwrap();
        settings.portal.base_url = self.base_url.clone();
        settings.portal.semester_delay_ms = 0;
        settings
    }
}

/// 记录创建次数的会话工厂
pub struct CountingSessionFactory {
    inner: ReqwestSessionFactory,
    created: AtomicUsize,
}

impl CountingSessionFactory {
    pub fn new(settings: &Settings) -> Self {
        Self {
            inner: ReqwestSessionFactory::new(settings.portal.clone()),
            created: AtomicUsize::new(0),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl SessionFactory for CountingSessionFactory {
    fn create(&self) -> Result<Box<dyn PortalSession>, SessionError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.inner.create()
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<&'static str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    if cookies.contains(VALID_COOKIE) {
        Some(VALID_COOKIE)
    } else if cookies.contains(STALE_COOKIE) {
        Some(STALE_COOKIE)
    } else {
        None
    }
}

/// 只有有效 Cookie 才能访问，否则重定向回登录页
fn guarded(state: &PortalState, headers: &HeaderMap, body: String) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match session_cookie(headers) {
        Some(VALID_COOKIE) => Html(body).into_response(),
        _ => Redirect::to("/login.htm").into_response(),
    }
}

async fn login_page(State(state): State<Arc<PortalState>>) -> Html<&'static str> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    Html(
        r#"<html><body>
            <form name="loginform" action="/j_security_check" method="post">
                <input type="text" name="username">
                <input type="password" name="password">
                <input type="hidden" name="CSRF_TOKEN" value="token-1">
                <input type="submit" value="Login">
            </form>
        </body></html>"#,
    )
}

async fn login_submit(
    State(state): State<Arc<PortalState>>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let username = fields.get("username").map(String::as_str).unwrap_or_default();
    let password = fields.get("password").map(String::as_str).unwrap_or_default();

    if fields.get("CSRF_TOKEN").map(String::as_str) != Some("token-1") {
        return (StatusCode::FORBIDDEN, "missing token").into_response();
    }
    if password == "wrong" {
        return Html("<div class=\"alert\">Invalid Username or Password</div>").into_response();
    }
    if username == "rejected" {
        return Redirect::to("/login.htm?error=1").into_response();
    }

    let cookie = if username == "expired" {
        STALE_COOKIE
    } else {
        VALID_COOKIE
    };
    (
        [(header::SET_COOKIE, format!("{}; Path=/", cookie))],
        Redirect::to("/eu/stu/home.htm"),
    )
        .into_response()
}

async fn dashboard(State(state): State<Arc<PortalState>>, headers: HeaderMap) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    // Any session cookie reaches the landing page
    match session_cookie(&headers) {
        Some(_) => Html(
            r#"<div class="user-name">ANJALI MENON</div>
               <a href="/eu/stu/viewProfile.htm">Profile</a>
               <a href="/eu/stu/grade.htm">Grades</a>"#,
        )
        .into_response(),
        None => Redirect::to("/login.htm").into_response(),
    }
}

async fn profile(State(state): State<Arc<PortalState>>, headers: HeaderMap) -> Response {
    guarded(
        &state,
        &headers,
        r#"<table>
            <tr><td>Student Name</td><td>Anjali Menon</td></tr>
            <tr><td>Register Number</td><td>TVE20CS042</td></tr>
            <tr><td>Branch</td><td>Computer Science and Engineering</td></tr>
        </table>"#
            .to_string(),
    )
}

async fn full_profile(State(state): State<Arc<PortalState>>, headers: HeaderMap) -> Response {
    guarded(&state, &headers, "<p>Batch: 2020-2024</p>".to_string())
}

async fn curriculum(State(state): State<Arc<PortalState>>, headers: HeaderMap) -> Response {
    let links: String = (1..=state.behaviour.semesters)
        .map(|i| format!("<a href=\"viewResult.htm?sem={}\">Semester {}</a>", i, i))
        .collect();
    let body = format!(
        "<div class=\"col-md-12\"><p>CGPA : 8.12</p>{}</div>",
        links
    );
    guarded(&state, &headers, body)
}

async fn grade_card(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let sem = query.get("sem").cloned().unwrap_or_default();
    let body = format!(
        r#"<p>SGPA : 8.{sem}</p>
        <table class="table table-bordered">
            <tr><th>Code</th><th>Course</th><th>Credits</th><th>Grade</th><th>Result</th></tr>
            <tr><td>CS{sem}01</td><td>Course {sem}</td><td>4</td><td>A</td><td>P</td></tr>
        </table>"#,
        sem = sem
    );
    guarded(&state, &headers, body)
}
