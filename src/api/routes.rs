use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::RwLock;
use warp::Filter;

use crate::api::handlers;
use crate::journal::{PrincipleBook, TradeJournal};
use crate::models::settings::AppSettings;
use crate::storage::JournalStorage;

/// 일지 API 라우트 생성
pub fn create_routes(
    journal: Arc<TradeJournal>,
    principles: Arc<RwLock<PrincipleBook>>,
    settings: Arc<RwLock<AppSettings>>,
    storage: JournalStorage,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // 헬스체크 라우트
    let health = warp::path!("health")
        .and(warp::get())
        .and_then(handlers::health_handler);

    // 상태 필터 생성
    let journal_filter = warp::any().map(move || journal.clone());
    let principles_filter = warp::any().map(move || principles.clone());
    let settings_filter = warp::any().map(move || settings.clone());
    let storage_filter = warp::any().map(move || storage.clone());

    // 거래 라우트
    let trade_routes = warp::path!("trades")
        .and(warp::get())
        .and(journal_filter.clone())
        .and_then(handlers::list_trades)
        .or(warp::path!("trades")
            .and(warp::post())
            .and(warp::body::json())
            .and(journal_filter.clone())
            .and(storage_filter.clone())
            .and_then(handlers::create_trade))
        .or(warp::path!("trades" / String)
            .and(warp::get())
            .and(journal_filter.clone())
            .and_then(handlers::get_trade))
        .or(warp::path!("trades" / String)
            .and(warp::put())
            .and(warp::body::json())
            .and(journal_filter.clone())
            .and(storage_filter.clone())
            .and_then(handlers::update_trade))
        .or(warp::path!("trades" / String)
            .and(warp::delete())
            .and(journal_filter.clone())
            .and(settings_filter.clone())
            .and_then(handlers::delete_trade))
        .or(warp::path!("trades" / String / "close")
            .and(warp::post())
            .and(warp::body::json())
            .and(journal_filter.clone())
            .and_then(handlers::close_trade));

    // 통계/복기 라우트
    let analysis_routes = warp::path!("stats")
        .and(warp::get())
        .and(journal_filter.clone())
        .and_then(handlers::get_stats)
        .or(warp::path!("review")
            .and(warp::get())
            .and(warp::query::<handlers::ReviewQuery>())
            .and(journal_filter.clone())
            .and_then(handlers::review))
        .or(warp::path!("keywords")
            .and(warp::get())
            .and(journal_filter.clone())
            .and_then(handlers::list_keywords));

    // 원칙 수첩 라우트
    let principle_routes = warp::path!("principles")
        .and(warp::get())
        .and(warp::query::<handlers::PrincipleQuery>())
        .and(principles_filter.clone())
        .and_then(handlers::list_principles)
        .or(warp::path!("principles")
            .and(warp::post())
            .and(warp::body::json())
            .and(principles_filter.clone())
            .and(storage_filter.clone())
            .and_then(handlers::add_principle))
        .or(warp::path!("principles" / "extract")
            .and(warp::post())
            .and(warp::body::json())
            .and(journal_filter.clone())
            .and(principles_filter.clone())
            .and(storage_filter.clone())
            .and_then(handlers::extract_principle))
        .or(warp::path!("principles" / String)
            .and(warp::put())
            .and(warp::body::json())
            .and(principles_filter.clone())
            .and(storage_filter.clone())
            .and_then(handlers::update_principle))
        .or(warp::path!("principles" / String)
            .and(warp::delete())
            .and(principles_filter.clone())
            .and(storage_filter.clone())
            .and(settings_filter.clone())
            .and_then(handlers::delete_principle))
        .or(warp::path!("categories")
            .and(warp::get())
            .and(principles_filter.clone())
            .and_then(handlers::list_categories))
        .or(warp::path!("categories")
            .and(warp::post())
            .and(warp::body::json())
            .and(principles_filter.clone())
            .and(storage_filter.clone())
            .and_then(handlers::add_category));

    // 설정 라우트
    let settings_routes = warp::path!("settings")
        .and(warp::get())
        .and(settings_filter.clone())
        .and_then(handlers::get_settings)
        .or(warp::path!("settings")
            .and(warp::put())
            .and(warp::body::json())
            .and(settings_filter.clone())
            .and(storage_filter.clone())
            .and_then(handlers::save_settings));

    // 모든 라우트 결합
    health
        .or(trade_routes)
        .or(analysis_routes)
        .or(principle_routes)
        .or(settings_routes)
        .with(warp::log("trade_journal::api"))
        .recover(handlers::handle_rejection)
}
