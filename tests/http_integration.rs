use std::fs;
use std::path::PathBuf;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::Value;
use tempfile::TempDir;

use media_shelf::config::Config;
use media_shelf::handlers::auth::AUTH_COOKIE;
use media_shelf::library::MediaLibrary;
use media_shelf::routes;
use media_shelf::state::AppState;

const BOUNDARY: &str = "----media-shelf-test-boundary";
const UPLOAD_LIMIT: u64 = 1024;

/// Media root layout:
///   Movies/a.mp4 ("0123456789"), Movies/b.mp4, Movies/Extras/, readme.txt, .DS_Store
struct Fixture {
    media: TempDir,
    _statics: TempDir,
    static_dir: PathBuf,
    state: web::Data<AppState>,
}

impl Fixture {
    fn new() -> Self {
        let media = TempDir::new().unwrap();
        fs::create_dir_all(media.path().join("Movies/Extras")).unwrap();
        fs::write(media.path().join("Movies/a.mp4"), b"0123456789").unwrap();
        fs::write(media.path().join("Movies/b.mp4"), b"b").unwrap();
        fs::write(media.path().join("readme.txt"), b"hello").unwrap();
        fs::write(media.path().join(".DS_Store"), b"junk").unwrap();

        let statics = TempDir::new().unwrap();
        fs::write(statics.path().join("index.html"), "<h1>index</h1>").unwrap();
        fs::write(statics.path().join("login.html"), "<h1>login</h1>").unwrap();
        let static_dir = statics.path().to_path_buf();

        let media_root = media.path().to_string_lossy().into_owned();
        let static_root = static_dir.to_string_lossy().into_owned();
        let config = Config::from_lookup(|key| match key {
            "MEDIA_ROOT" => Some(media_root.clone()),
            "STATIC_DIR" => Some(static_root.clone()),
            "MAX_UPLOAD_BYTES" => Some(UPLOAD_LIMIT.to_string()),
            _ => None,
        })
        .unwrap();

        let library = MediaLibrary::open(&config.media_root).unwrap();
        let state = web::Data::new(AppState::new(library, &config));

        Fixture {
            media,
            _statics: statics,
            static_dir,
            state,
        }
    }

    fn session(&self) -> Cookie<'static> {
        Cookie::new(AUTH_COOKIE, self.state.session_token.clone())
    }

    fn staged_leftovers(&self) -> Vec<String> {
        fs::read_dir(self.media.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".upload-"))
            .collect()
    }
}

macro_rules! app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data($fixture.state.clone())
                .configure(|cfg| routes::setup_routes(cfg, &$fixture.static_dir)),
        )
        .await
    };
}

struct Part {
    name: &'static str,
    filename: Option<&'static str>,
    data: Vec<u8>,
}

fn text_part(name: &'static str, value: &str) -> Part {
    Part {
        name,
        filename: None,
        data: value.as_bytes().to_vec(),
    }
}

fn file_part(name: &'static str, filename: &'static str, data: &[u8]) -> Part {
    Part {
        name,
        filename: Some(filename),
        data: data.to_vec(),
    }
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let headers = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                part.name, filename
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name),
        };
        body.extend_from_slice(headers.as_bytes());
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(fixture: &Fixture, parts: &[Part]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/upload")
        .cookie(fixture.session())
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}

fn names(entries: &Value) -> Vec<&str> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect()
}

// ── session gate ──────────────────────────────────────────────────────────────

#[actix_web::test]
async fn anonymous_browse_redirects_to_login() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/folder").to_request()).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
}

#[actix_web::test]
async fn anonymous_htmx_request_gets_hx_redirect() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/folder")
        .insert_header(("HX-Request", "true"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get("HX-Redirect").unwrap(), "/login");
}

#[actix_web::test]
async fn forged_cookie_is_rejected() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/folder")
        .cookie(Cookie::new(AUTH_COOKIE, "true"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn login_page_is_public() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "<h1>login</h1>");
}

#[actix_web::test]
async fn login_with_good_credentials_sets_session_cookie() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", "admin"), ("password", "admin")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == AUTH_COOKIE)
        .expect("session cookie");
    assert_eq!(cookie.value(), fixture.state.session_token);
    assert_eq!(cookie.http_only(), Some(true));
}

#[actix_web::test]
async fn login_with_bad_credentials_goes_back_to_login() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", "admin"), ("password", "wrong")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login?error=1");
    assert!(resp.response().cookies().next().is_none());
}

#[actix_web::test]
async fn logout_expires_the_session_cookie() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/logout")
        .cookie(fixture.session())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == AUTH_COOKIE)
        .expect("removal cookie");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
}

#[actix_web::test]
async fn index_is_served_behind_the_gate() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get().uri("/").cookie(fixture.session()).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "<h1>index</h1>");
}

// ── browsing ──────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn root_listing_puts_folders_first_and_hides_dotfiles() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get().uri("/api/folder").cookie(fixture.session()).to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(view["currentPath"], "/");
    assert!(view.get("parentPath").is_none());
    assert_eq!(names(&view["entries"]), ["Movies", "readme.txt"]);
    assert_eq!(view["entries"][0]["isDir"], true);
    assert_eq!(view["breadcrumbs"], serde_json::json!([{"name": "home", "path": "/"}]));
}

#[actix_web::test]
async fn folder_listing_carries_parent_and_breadcrumbs() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/folder/Movies")
        .cookie(fixture.session())
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(view["currentPath"], "Movies");
    assert_eq!(view["parentPath"], "/");
    assert_eq!(names(&view["entries"]), ["Extras", "a.mp4", "b.mp4"]);
    assert_eq!(view["entries"][1]["path"], "Movies/a.mp4");
    assert_eq!(view["breadcrumbs"][1]["path"], "Movies");
}

#[actix_web::test]
async fn browsing_outside_the_root_is_a_bad_request() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/folder/../../etc")
        .cookie(fixture.session())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn browsing_a_missing_folder_is_not_found() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/folder/Series")
        .cookie(fixture.session())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── player ────────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn player_returns_sibling_playlist() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/player/Movies/a.mp4")
        .cookie(fixture.session())
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(view["currentPath"], "Movies");
    assert_eq!(view["playingItem"]["path"], "Movies/a.mp4");
    assert_eq!(names(&view["playlist"]), ["a.mp4", "b.mp4"]);
    assert_eq!(view["next"]["path"], "Movies/b.mp4");
    assert!(view["previous"].is_null());
}

#[actix_web::test]
async fn player_for_a_folder_is_not_found() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/player/Movies/Extras")
        .cookie(fixture.session())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn player_without_a_path_is_a_bad_request() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/player/")
        .cookie(fixture.session())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── streaming ─────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn stream_serves_the_whole_file() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/stream/Movies/a.mp4")
        .cookie(fixture.session())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "video/mp4");
    assert_eq!(test::read_body(resp).await, "0123456789");
}

#[actix_web::test]
async fn stream_honours_byte_ranges() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/stream/Movies/a.mp4")
        .cookie(fixture.session())
        .insert_header((header::RANGE, "bytes=2-5"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(resp.headers().get(header::CONTENT_RANGE).unwrap(), "bytes 2-5/10");
    assert_eq!(test::read_body(resp).await, "2345");
}

#[actix_web::test]
async fn stream_of_a_directory_is_not_found() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/stream/Movies")
        .cookie(fixture.session())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn stream_outside_the_root_is_a_bad_request() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/stream/Movies/../../secret.mp4")
        .cookie(fixture.session())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── uploads ───────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn upload_creates_the_folder_and_stores_the_file() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = upload_request(
        &fixture,
        &[
            file_part("file", "clip.mp4", b"clip-bytes"),
            text_part("path", "Movies/New"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "Upload successful");
    let stored = fixture.media.path().join("Movies/New/clip.mp4");
    assert_eq!(fs::read(stored).unwrap(), b"clip-bytes");
    assert!(fixture.staged_leftovers().is_empty());
}

#[actix_web::test]
async fn upload_without_folder_lands_in_the_root() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = upload_request(&fixture, &[file_part("file", "top.mkv", b"x")]).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(fixture.media.path().join("top.mkv").is_file());
}

#[actix_web::test]
async fn upload_file_name_is_reduced_to_its_last_segment() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = upload_request(
        &fixture,
        &[
            text_part("path", "Movies"),
            file_part("file", "../../evil.mp4", b"evil"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(fixture.media.path().join("Movies/evil.mp4").is_file());
    assert!(!fixture.media.path().parent().unwrap().join("evil.mp4").exists());
}

#[actix_web::test]
async fn upload_into_an_escaping_folder_is_rejected() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = upload_request(
        &fixture,
        &[
            file_part("file", "clip.mp4", b"clip"),
            text_part("path", "../outside"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!fixture.media.path().parent().unwrap().join("outside").exists());
    assert!(fixture.staged_leftovers().is_empty());
}

#[actix_web::test]
async fn upload_over_the_limit_is_refused_and_cleaned_up() {
    let fixture = Fixture::new();
    let app = app!(fixture);
    let big = vec![7u8; (UPLOAD_LIMIT as usize) * 2];

    let req = upload_request(
        &fixture,
        &[text_part("path", "Movies"), file_part("file", "big.mp4", &big)],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!fixture.media.path().join("Movies/big.mp4").exists());
    assert!(fixture.staged_leftovers().is_empty());
}

#[actix_web::test]
async fn upload_without_a_file_field_is_a_bad_request() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = upload_request(&fixture, &[text_part("path", "Movies")]).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[cfg(unix)]
#[actix_web::test]
async fn upload_into_a_folder_on_another_filesystem() {
    // tmpfs, so the folder sits on a different device than the media root.
    let Ok(elsewhere) = TempDir::new_in("/dev/shm") else {
        return;
    };
    let fixture = Fixture::new();
    std::os::unix::fs::symlink(elsewhere.path(), fixture.media.path().join("Shm")).unwrap();
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/folder/Shm")
        .cookie(fixture.session())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = upload_request(
        &fixture,
        &[file_part("file", "clip.mp4", b"far-away"), text_part("path", "Shm")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(fs::read(elsewhere.path().join("clip.mp4")).unwrap(), b"far-away");
    assert!(fixture.staged_leftovers().is_empty());
    let leftovers_elsewhere = fs::read_dir(elsewhere.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().starts_with(".upload-"))
        .count();
    assert_eq!(leftovers_elsewhere, 0);
}

// ── cors ──────────────────────────────────────────────────────────────────────

#[actix_web::test]
async fn preflight_from_the_configured_origin_allows_credentials() {
    let fixture = Fixture::new();
    let origin = "http://localhost:4200";
    let app = test::init_service(
        App::new()
            .app_data(fixture.state.clone())
            .wrap(routes::cors(origin))
            .configure(|cfg| routes::setup_routes(cfg, &fixture.static_dir)),
    )
    .await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/folder")
        .insert_header((header::ORIGIN, origin))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), origin);
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
}
