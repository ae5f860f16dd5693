use crate::{
    error::{Error, Result},
    Service,
};
use db::{QuestionRepo, QuizRepo};
use http_body_util::{BodyExt, Full};
use hyper::{
    body::{Body, Bytes},
    header::{HeaderValue, CONTENT_TYPE},
    Method, Request, Response, StatusCode, Uri,
};
use model::{IdGenerator, Pagination};
use serde::{de::DeserializeOwned, Serialize};

type Reply = (StatusCode, Vec<u8>);

/// Dispatches a single request to the service. Failures are logged and rendered
/// as `{"error": "..."}` with the matching status code.
pub async fn try_respond<R, G, B>(req: Request<B>, service: &Service<R, G>) -> Response<Full<Bytes>>
where
    R: QuizRepo + QuestionRepo,
    G: IdGenerator,
    B: Body,
{
    let (parts, body) = req.into_parts();
    log::debug!("{} {}", parts.method, parts.uri);

    let (status, bytes) = match route(&parts.method, &parts.uri, body, service).await {
        Ok(reply) => reply,
        Err(err) => {
            log::warn!("{} {} failed: {err}", parts.method, parts.uri.path());
            let bytes = serde_json::to_vec(&serde_json::json!({ "error": err.to_string() })).unwrap_or_default();
            (err.status(), bytes)
        }
    };

    let mut res = Response::new(Full::new(Bytes::from(bytes)));
    *res.status_mut() = status;
    assert!(res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json")).is_none());
    res
}

async fn route<R, G, B>(method: &Method, uri: &Uri, body: B, service: &Service<R, G>) -> Result<Reply>
where
    R: QuizRepo + QuestionRepo,
    G: IdGenerator,
    B: Body,
{
    let segments: Vec<_> = uri.path().trim_start_matches('/').split('/').collect();
    let query = uri.query();
    match (method, segments.as_slice()) {
        (&Method::POST, ["quizzes"]) => created(&service.create_quiz(parse(body).await?).await?),
        (&Method::GET, ["quizzes"]) => ok(&service.list_quizzes(pagination(query)).await?),
        (&Method::GET, ["quizzes", "search"]) => {
            let keyword = param(query, "keyword").and_then(decode).unwrap_or_default();
            ok(&service.search_quizzes(&keyword, pagination(query)).await?)
        }
        (&Method::GET, ["quizzes", id]) => ok(&service.get_quiz(id).await?),
        (&Method::PUT, ["quizzes", id]) => ok(&service.update_quiz(id, parse(body).await?).await?),
        (&Method::DELETE, ["quizzes", id]) => ok(&service.delete_quiz(id).await?),
        (&Method::GET, ["quizzes", id, "questions"]) => ok(&service.list_questions(id, pagination(query)).await?),
        (&Method::POST, ["questions"]) => created(&service.create_question(parse(body).await?).await?),
        (&Method::GET, ["questions", id]) => ok(&service.get_question(id).await?),
        (&Method::PUT, ["questions", id]) => ok(&service.update_question(id, parse(body).await?).await?),
        (&Method::DELETE, ["questions", id]) => ok(&service.delete_question(id).await?),
        (&Method::POST, ["questions", id, "reorder"]) => {
            let placement = parse(body).await?;
            ok(&service.reorder_question(id, &placement).await?)
        }
        (&Method::POST, ["questions", id, "validate"]) => {
            let submissions: Vec<_> = parse(body).await?;
            ok(&service.validate_answers(id, &submissions).await?)
        }
        (&Method::POST, ["questions", id, "answers"]) => created(&service.add_answer(id, parse(body).await?).await?),
        (&Method::PUT, ["questions", id, "answers"]) => ok(&service.put_answers(id, parse(body).await?).await?),
        (&Method::POST, ["questions", id, "answers", "reorder"]) => {
            let order: Vec<String> = parse(body).await?;
            ok(&service.reorder_answers(id, &order).await?)
        }
        (&Method::PUT, ["questions", id, "answers", answer]) => {
            ok(&service.override_answer(id, answer, parse(body).await?).await?)
        }
        (&Method::DELETE, ["questions", id, "answers", answer]) => ok(&service.delete_answer(id, answer).await?),
        _ => Err(Error::NotFound("No such route.")),
    }
}

async fn parse<B, T>(body: B) -> Result<T>
where
    B: Body,
    T: DeserializeOwned,
{
    let bytes = body.collect().await.map_err(|_| Error::InvalidInput("Cannot read the request body."))?.to_bytes();
    serde_json::from_slice(&bytes).map_err(|_| Error::InvalidInput("Malformed JSON payload."))
}

fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Reply> {
    let bytes = serde_json::to_vec(value).map_err(|err| {
        log::error!("cannot serialize reply: {err}");
        Error::Internal
    })?;
    Ok((status, bytes))
}

fn ok<T: Serialize>(value: &T) -> Result<Reply> {
    json(StatusCode::OK, value)
}

fn created<T: Serialize>(value: &T) -> Result<Reply> {
    json(StatusCode::CREATED, value)
}

fn param<'q>(query: Option<&'q str>, name: &str) -> Option<&'q str> {
    query?.split('&').filter_map(|pair| pair.split_once('=')).find_map(|(key, value)| (key == name).then_some(value))
}

/// Unparseable values fall back to the defaults just like missing ones.
fn pagination(query: Option<&str>) -> Pagination {
    let page = param(query, "page").and_then(|value| value.parse().ok());
    let size = param(query, "size").and_then(|value| value.parse().ok());
    Pagination::new(page, size)
}

/// Decodes `application/x-www-form-urlencoded` escapes.
fn decode(raw: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(raw.len());
    let mut iter = raw.bytes();
    while let Some(byte) = iter.next() {
        match byte {
            b'+' => bytes.push(b' '),
            b'%' => {
                let mut out = [0];
                hex::decode_to_slice([iter.next()?, iter.next()?], &mut out).ok()?;
                bytes.push(out[0]);
            }
            _ => bytes.push(byte),
        }
    }
    String::from_utf8(bytes).ok()
}
