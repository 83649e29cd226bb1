// 일지 API 핸들러들

use std::convert::Infallible;
use std::sync::Arc;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use warp::http::StatusCode;
use warp::reply::{json, with_status, Json, Reply, WithStatus};

use crate::analytics::{FilterCriteria, PnlFilter, StatusFilter};
use crate::error::JournalError;
use crate::journal::{PrincipleBook, TradeJournal};
use crate::models::principle::PrincipleDraft;
use crate::models::settings::AppSettings;
use crate::models::trade::{TradeClose, TradeDraft, TradeId, TradeUpdate};
use crate::storage::JournalStorage;
use crate::utils::i18n::t;
use crate::utils::logging;

type Settings = Arc<RwLock<AppSettings>>;
type Principles = Arc<RwLock<PrincipleBook>>;

/// 오류를 JSON 응답으로 변환
fn error_reply(context: &str, err: JournalError) -> WithStatus<Json> {
    let status = match &err {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        JournalError::InvalidState(_) => StatusCode::CONFLICT,
        _ => {
            logging::log_error(context, &err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    with_status(json(&serde_json::json!({"error": err.to_string()})), status)
}

fn respond<T: Serialize>(context: &str, result: Result<T, JournalError>, ok: StatusCode) -> WithStatus<Json> {
    match result {
        Ok(value) => with_status(json(&value), ok),
        Err(e) => error_reply(context, e),
    }
}

/// 헬스체크 핸들러
pub async fn health_handler() -> Result<impl Reply, warp::Rejection> {
    Ok(json(&serde_json::json!({"status": "ok"})))
}

// ====== 거래 ======

pub async fn list_trades(journal: Arc<TradeJournal>) -> Result<impl Reply, warp::Rejection> {
    Ok(respond("list trades", journal.list_trades().await, StatusCode::OK))
}

pub async fn create_trade(
    draft: TradeDraft,
    journal: Arc<TradeJournal>,
    storage: JournalStorage,
) -> Result<impl Reply, warp::Rejection> {
    let result = journal.create_trade(draft).await;
    if result.is_ok() {
        persist_keywords(&journal, &storage).await;
    }
    Ok(respond("create trade", result, StatusCode::CREATED))
}

pub async fn get_trade(id: String, journal: Arc<TradeJournal>) -> Result<impl Reply, warp::Rejection> {
    let trade_id = TradeId(id);
    let result = journal
        .get_trade(&trade_id)
        .await
        .and_then(|trade| trade.ok_or(JournalError::TradeNotFound(trade_id)));
    Ok(respond("get trade", result, StatusCode::OK))
}

pub async fn update_trade(
    id: String,
    update: TradeUpdate,
    journal: Arc<TradeJournal>,
    storage: JournalStorage,
) -> Result<impl Reply, warp::Rejection> {
    let result = journal.update_trade(&TradeId(id), update).await;
    if result.is_ok() {
        persist_keywords(&journal, &storage).await;
    }
    Ok(respond("update trade", result, StatusCode::OK))
}

pub async fn close_trade(
    id: String,
    close: TradeClose,
    journal: Arc<TradeJournal>,
) -> Result<impl Reply, warp::Rejection> {
    Ok(respond("close trade", journal.close_trade(&TradeId(id), close).await, StatusCode::OK))
}

pub async fn delete_trade(
    id: String,
    journal: Arc<TradeJournal>,
    settings: Settings,
) -> Result<impl Reply, warp::Rejection> {
    let language = settings.read().await.language;
    let result = journal.delete_trade(&TradeId(id)).await.map(|_| {
        serde_json::json!({"status": "deleted", "message": t("tradeDeleted", language)})
    });
    Ok(respond("delete trade", result, StatusCode::OK))
}

pub async fn get_stats(journal: Arc<TradeJournal>) -> Result<impl Reply, warp::Rejection> {
    Ok(respond("stats", journal.stats().await, StatusCode::OK))
}

/// 복기 쿼리 매개변수 (keywords는 쉼표 구분)
#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    pub search: Option<String>,
    pub keywords: Option<String>,
    pub status: Option<StatusFilter>,
    pub pnl: Option<PnlFilter>,
    pub asset: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReviewQuery {
    pub fn into_criteria(self) -> Result<FilterCriteria, JournalError> {
        let date_range = match (self.from, self.to) {
            (None, None) => None,
            (Some(from), Some(to)) if from <= to => Some((from, to)),
            (Some(_), Some(_)) => {
                return Err(JournalError::InvalidParameter("'from' must not be after 'to'".to_string()))
            }
            (from, to) => Some((from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX))),
        };

        Ok(FilterCriteria {
            search_term: self.search,
            keywords: self
                .keywords
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|k| !k.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            pnl_filter: self.pnl.unwrap_or_default(),
            asset: self.asset,
            date_range,
        })
    }
}

pub async fn review(query: ReviewQuery, journal: Arc<TradeJournal>) -> Result<impl Reply, warp::Rejection> {
    let result = match query.into_criteria() {
        Ok(criteria) => journal.review(&criteria).await,
        Err(e) => Err(e),
    };
    Ok(respond("review", result, StatusCode::OK))
}

pub async fn list_keywords(journal: Arc<TradeJournal>) -> Result<impl Reply, warp::Rejection> {
    let keywords = journal.keywords();
    let registry = keywords.read().await;
    Ok(json(&registry.all()))
}

// 키워드는 보조 데이터라 저장 실패는 로그만 남긴다.
// 쓰기 잠금으로 동시 저장 순서를 직렬화
async fn persist_keywords(journal: &TradeJournal, storage: &JournalStorage) {
    let keywords = journal.keywords();
    let registry = keywords.write().await;
    if let Err(e) = storage.save_keywords(&registry).await {
        log::warn!("키워드 저장 실패: {}", e);
    }
}

// 수첩 변경 후 저장. 저장에 실패하면 변경 전 상태로 되돌린다
async fn commit_book<T>(
    book: &mut PrincipleBook,
    storage: &JournalStorage,
    change: impl FnOnce(&mut PrincipleBook) -> Result<T, JournalError>,
) -> Result<T, JournalError> {
    let backup = book.clone();
    let value = change(book)?;
    if let Err(e) = storage.save_principle_book(book).await {
        *book = backup;
        return Err(e);
    }
    Ok(value)
}

// ====== 원칙 수첩 ======

#[derive(Debug, Default, Deserialize)]
pub struct PrincipleQuery {
    pub category: Option<String>,
}

pub async fn list_principles(
    query: PrincipleQuery,
    principles: Principles,
) -> Result<impl Reply, warp::Rejection> {
    let book = principles.read().await;
    Ok(json(&book.list(query.category.as_deref())))
}

pub async fn add_principle(
    draft: PrincipleDraft,
    principles: Principles,
    storage: JournalStorage,
) -> Result<impl Reply, warp::Rejection> {
    let mut book = principles.write().await;
    let result = commit_book(&mut book, &storage, |b| b.add(draft)).await;
    Ok(respond("add principle", result, StatusCode::CREATED))
}

pub async fn update_principle(
    id: String,
    draft: PrincipleDraft,
    principles: Principles,
    storage: JournalStorage,
) -> Result<impl Reply, warp::Rejection> {
    let mut book = principles.write().await;
    let result = commit_book(&mut book, &storage, |b| b.update(&id, draft)).await;
    Ok(respond("update principle", result, StatusCode::OK))
}

pub async fn delete_principle(
    id: String,
    principles: Principles,
    storage: JournalStorage,
    settings: Settings,
) -> Result<impl Reply, warp::Rejection> {
    let language = settings.read().await.language;
    let mut book = principles.write().await;
    let result = commit_book(&mut book, &storage, |b| b.delete(&id))
        .await
        .map(|_| serde_json::json!({"status": "deleted", "message": t("principleDeleted", language)}));
    Ok(respond("delete principle", result, StatusCode::OK))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPrincipleRequest {
    pub trade_id: TradeId,
    pub category: String,
}

pub async fn extract_principle(
    req: ExtractPrincipleRequest,
    journal: Arc<TradeJournal>,
    principles: Principles,
    storage: JournalStorage,
) -> Result<impl Reply, warp::Rejection> {
    let trade = match journal.get_trade(&req.trade_id).await {
        Ok(Some(trade)) => trade,
        Ok(None) => return Ok(error_reply("extract principle", JournalError::TradeNotFound(req.trade_id))),
        Err(e) => return Ok(error_reply("extract principle", e)),
    };

    let mut book = principles.write().await;
    let result = commit_book(&mut book, &storage, |b| b.extract_from_trade(&trade, &req.category)).await;
    Ok(respond("extract principle", result, StatusCode::CREATED))
}

pub async fn list_categories(principles: Principles) -> Result<impl Reply, warp::Rejection> {
    let book = principles.read().await;
    Ok(json(&book.categories()))
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: String,
}

pub async fn add_category(
    req: CreateCategoryRequest,
    principles: Principles,
    storage: JournalStorage,
) -> Result<impl Reply, warp::Rejection> {
    let mut book = principles.write().await;
    let result = commit_book(&mut book, &storage, |b| b.add_category(&req.name, &req.color)).await;
    Ok(respond("add category", result, StatusCode::CREATED))
}

// ====== 설정 ======

pub async fn get_settings(settings: Settings) -> Result<impl Reply, warp::Rejection> {
    let current = settings.read().await;
    Ok(json(&*current))
}

pub async fn save_settings(
    new_settings: AppSettings,
    settings: Settings,
    storage: JournalStorage,
) -> Result<impl Reply, warp::Rejection> {
    if new_settings.currency.trim().is_empty() || !new_settings.total_portfolio.is_finite() {
        return Ok(error_reply(
            "save settings",
            JournalError::InvalidParameter("currency and a finite total portfolio are required".to_string()),
        ));
    }

    // 파일과 메모리가 같은 요청 내용을 갖도록 저장하는 동안 쓰기 잠금 유지
    let mut current = settings.write().await;
    let result = storage.save_settings(&new_settings).await.map(|_| new_settings.clone());
    if result.is_ok() {
        *current = new_settings;
    }
    Ok(respond("save settings", result, StatusCode::OK))
}

// ====== 거부 처리 ======

/// 본문 파싱 실패 등 warp 거부를 JSON 오류로 변환
pub async fn handle_rejection(err: warp::Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid body: {}", e))
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, format!("Invalid query: {}", e))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        log::error!("처리되지 않은 거부: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(with_status(json(&serde_json::json!({"error": message})), status))
}
