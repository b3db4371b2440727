//! Black-box tests for the edge gate: real server, raw cookies.

use postpilot_auth::RoleTable;
use postpilot_gateway::{GatewayConfig, build_app};
use reqwest::StatusCode;
use reqwest::redirect::Policy;

struct TestGateway {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestGateway {
    async fn spawn() -> Self {
        let config = GatewayConfig {
            listen_addr: String::new(),
            session_cookie: "pp_session".to_string(),
            public_prefixes: vec!["pricing".to_string()],
            table: RoleTable::standard(),
        };
        let app = build_app(config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn get(&self, path: &str, cookies: Option<&str>) -> reqwest::Response {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();
        let mut req = client.get(format!("{}{}", self.base_url, path));
        if let Some(cookies) = cookies {
            req = req.header("Cookie", cookies);
        }
        req.send().await.unwrap()
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .expect("missing location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn unauthenticated_non_public_paths_redirect_to_login() {
    let gw = TestGateway::spawn().await;

    let resp = gw.get("/en/manager/dashboard", None).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en/auth/login");

    let resp = gw.get("/ar/admin/accounts", None).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/ar/auth/login");

    let resp = gw.get("/en/settings/profile", None).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en/auth/login");
}

#[tokio::test]
async fn public_allow_list_passes_without_a_session() {
    let gw = TestGateway::spawn().await;

    for path in ["/en", "/ar", "/en/auth/login", "/en/pricing", "/en/pricing/teams"] {
        let resp = gw.get(path, None).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path} should pass");
    }
}

#[tokio::test]
async fn own_home_namespace_passes() {
    let gw = TestGateway::spawn().await;

    let resp = gw
        .get("/en/manager/dashboard", Some("pp_session=tok; role=manager"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = gw
        .get("/ar/admin/accounts", Some("pp_session=tok; role=super_admin"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn allowed_but_not_home_bounces_to_home() {
    let gw = TestGateway::spawn().await;

    let resp = gw
        .get("/en/user/dashboard", Some("pp_session=tok; role=manager"))
        .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en/manager/dashboard");
}

#[tokio::test]
async fn forbidden_namespace_bounces_to_home() {
    let gw = TestGateway::spawn().await;

    let resp = gw
        .get("/en/admin/dashboard", Some("pp_session=tok; role=user"))
        .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en/user/dashboard");

    let resp = gw
        .get("/ar/admin/accounts", Some("pp_session=tok; role=manager"))
        .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/ar/manager/dashboard");
}

#[tokio::test]
async fn session_without_role_mirror_passes_through() {
    // The edge cannot classify without the mirror; the client gate will
    // re-validate with the authoritative role.
    let gw = TestGateway::spawn().await;

    let resp = gw.get("/en/admin/dashboard", Some("pp_session=tok")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn stale_mirror_never_redirects_onto_itself() {
    let gw = TestGateway::spawn().await;

    // An unknown role fails closed to the user home; requesting exactly
    // that path must pass rather than loop.
    let resp = gw
        .get("/en/user/dashboard", Some("pp_session=tok; role=ghost"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = gw
        .get("/en/admin/dashboard", Some("pp_session=tok; role=ghost"))
        .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en/user/dashboard");
}

#[tokio::test]
async fn non_dashboard_routes_pass_with_a_session() {
    let gw = TestGateway::spawn().await;

    let resp = gw
        .get("/en/settings/profile", Some("pp_session=tok; role=user"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}
