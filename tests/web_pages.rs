mod support;

use axum::http::StatusCode;
use support::{get, post_form, TestBoard};

#[tokio::test]
async fn add_toggle_delete_via_forms() {
    let board = TestBoard::new();

    let reply = post_form(board.router(), "/add", "title=Buy+milk&state=inwork&comment=2+liters").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/"));

    let page = get(board.router(), "/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Buy milk"));
    assert!(page.body.contains("2 liters"));
    assert!(page.body.contains("class=\"open\" id=\"todo-1\""));

    let reply = post_form(board.router(), "/toggle/1", "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    let stored = board.read_list_file("todos");
    assert_eq!(stored[0]["done"], true);
    assert_eq!(stored[0]["state"], "inwork");

    let page = get(board.router(), "/").await;
    assert!(page.body.contains("class=\"done\" id=\"todo-1\""));

    let reply = post_form(board.router(), "/delete/1", "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(board.read_list_file("todos"), serde_json::json!([]));

    let page = get(board.router(), "/").await;
    assert!(page.body.contains("Keine Aufgaben."));
}

#[tokio::test]
async fn blank_title_is_ignored() {
    let board = TestBoard::new();

    let reply = post_form(board.router(), "/add", "title=+++").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/"));
    assert!(!board.list_file("todos").exists());
}

#[tokio::test]
async fn unknown_ids_are_ignored() {
    let board = TestBoard::new();
    post_form(board.router(), "/add", "title=Keep").await;

    for uri in ["/toggle/99", "/update/99", "/delete/99"] {
        let reply = post_form(board.router(), uri, "title=Other").await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER, "{uri}");
    }

    let stored = board.read_list_file("todos");
    assert_eq!(stored.as_array().map(Vec::len), Some(1));
    assert_eq!(stored[0]["title"], "Keep");
    assert_eq!(stored[0]["done"], false);
}

#[tokio::test]
async fn update_form_edits_fields() {
    let board = TestBoard::new();
    post_form(board.router(), "/add", "title=Draft").await;

    let reply = post_form(
        board.router(),
        "/update/1",
        "title=Final&state=INWORK&comment=++reviewed++",
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);

    let stored = board.read_list_file("todos");
    assert_eq!(stored[0]["title"], "Final");
    assert_eq!(stored[0]["state"], "inwork");
    assert_eq!(stored[0]["comment"], "reviewed");
}

#[tokio::test]
async fn invalid_state_falls_back_to_default() {
    let board = TestBoard::new();
    post_form(board.router(), "/add", "title=Task&state=someday").await;

    let stored = board.read_list_file("todos");
    assert_eq!(stored[0]["state"], "idle");
}

#[tokio::test]
async fn list_field_routes_to_that_list() {
    let board = TestBoard::new();

    let reply = post_form(board.router(), "/add", "title=Report&list=arbeit").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/?list=arbeit"));

    let stored = board.read_list_file("arbeit");
    assert_eq!(stored[0]["title"], "Report");
    assert!(!board.list_file("todos").exists());

    let page = get(board.router(), "/?list=arbeit").await;
    assert!(page.body.contains("<h1>Arbeit</h1>"));
    assert!(page.body.contains("Report"));

    let page = get(board.router(), "/").await;
    assert!(page.body.contains("<h1>Privat</h1>"));
    assert!(!page.body.contains("Report"));
}

#[tokio::test]
async fn unknown_list_falls_back_to_default() {
    let board = TestBoard::new();

    let reply = post_form(board.router(), "/add?list=nope", "title=Stray").await;
    assert_eq!(reply.location.as_deref(), Some("/"));
    assert_eq!(board.read_list_file("todos")[0]["title"], "Stray");
    assert!(!board.list_file("nope").exists());
}

#[tokio::test]
async fn titles_are_escaped_on_the_page() {
    let board = TestBoard::new();
    post_form(board.router(), "/add", "title=%3Cb%3Ebold%3C%2Fb%3E").await;

    let page = get(board.router(), "/").await;
    assert!(page.body.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(!page.body.contains("<b>bold</b>"));
}

#[tokio::test]
async fn health_endpoint_answers() {
    let board = TestBoard::new();
    let reply = get(board.router(), "/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "OK");
}

#[tokio::test]
async fn non_numeric_ids_redirect() {
    let board = TestBoard::new();
    post_form(board.router(), "/add", "title=Keep").await;

    for uri in ["/toggle/abc", "/update/abc", "/delete/-1"] {
        let reply = post_form(board.router(), uri, "title=Other").await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(reply.location.as_deref(), Some("/"), "{uri}");
    }

    let reply = post_form(board.router(), "/toggle/x1", "list=arbeit").await;
    assert_eq!(reply.location.as_deref(), Some("/?list=arbeit"));

    let stored = board.read_list_file("todos");
    assert_eq!(stored[0]["title"], "Keep");
    assert_eq!(stored[0]["done"], false);
}

#[tokio::test]
async fn failed_write_is_not_shown_on_page() {
    let board = TestBoard::new();
    post_form(board.router(), "/add", "title=Saved").await;
    board.block_writes();

    let reply = post_form(board.router(), "/add", "title=Lost").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);

    let page = get(board.router(), "/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Saved"));
    assert!(!page.body.contains("Lost"));
}
