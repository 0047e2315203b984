//! Web front end: one form, one answer page.
//!
//! `GET /` shows the question form; `POST /` answers the submitted question.

use std::sync::Arc;

use anyhow::Result;
use applybot_lib::pipeline::DefaultPipeline;
use axum::{
    Form, Router,
    extract::State,
    response::Html,
    routing::get,
};
use serde::Deserialize;

type AppState = Arc<DefaultPipeline>;

#[derive(Deserialize)]
struct AskForm {
    question: String,
}

pub fn router(pipeline: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(ask))
        .with_state(pipeline)
}

pub async fn serve(pipeline: AppState, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(render_index())
}

async fn ask(State(pipeline): State<AppState>, Form(form): Form<AskForm>) -> Html<String> {
    let question = form.question;
    let answer = {
        let question = question.clone();
        // Retrieval and generation block on network I/O
        tokio::task::spawn_blocking(move || pipeline.answer(&question))
            .await
            .unwrap_or_else(|e| format!("An error occurred: {e}"))
    };
    Html(render_result(&question, &answer))
}

const FORM: &str = r#"<form method="post" action="/">
  <label for="question">Application question</label><br>
  <textarea id="question" name="question" rows="4" cols="80" required></textarea><br>
  <button type="submit">Answer</button>
</form>"#;

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>ApplyBot</title></head>\n<body>\n<h1>ApplyBot</h1>\n{body}\n</body>\n</html>\n"
    )
}

fn render_index() -> String {
    page(FORM)
}

fn render_result(question: &str, answer: &str) -> String {
    page(&format!(
        "<h2>Question</h2>\n<p>{}</p>\n<h2>Answer</h2>\n<p style=\"white-space: pre-wrap\">{}</p>\n<p><a href=\"/\">Ask another question</a></p>",
        html_escape::encode_text(question),
        html_escape::encode_text(answer),
    ))
}
