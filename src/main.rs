/**
* filename : main
* author : HAMA
* date: 2025. 5. 14.
* description: 투자 일지 서버 / CLI 진입점
**/

use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use trade_journal::api::routes;
use trade_journal::config::Config;
use trade_journal::journal::{BasicTradeValidator, FileTradeRepository, TradeJournal, TradeRepository};
use trade_journal::models::settings::AppSettings;
use trade_journal::storage::{trade_csv, JournalStorage};
use trade_journal::utils::{format_currency, format_percentage, logging, t};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 설정 로드
    let config = Config::load()?;

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("투자 일지 시작 (v{})...", trade_journal::VERSION);

    let storage = JournalStorage::new(&config.storage.data_dir);
    let repository = Arc::new(RwLock::new(FileTradeRepository::open(storage.trades_path())?));
    let settings = load_settings(&config, &storage).await;

    // 명령줄 인수 확인
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("stats") => print_stats(repository, &storage, &settings).await?,
        Some("export") => {
            let path = args.get(2).ok_or_else(|| anyhow::anyhow!("usage: export <file.csv>"))?;
            let trades = repository.read().await.find_all().await?;
            let count = trade_csv::export_trades(path, &trades)?;
            println!("{} trades -> {}", count, path);
        }
        Some("import") => {
            let path = args.get(2).ok_or_else(|| anyhow::anyhow!("usage: import <file.csv>"))?;
            import_csv(repository, &storage, Path::new(path)).await?;
        }
        _ => serve(config, repository, storage, settings).await?,
    }

    Ok(())
}

async fn load_settings(config: &Config, storage: &JournalStorage) -> AppSettings {
    if storage.has_settings().await {
        storage.load_settings().await
    } else {
        config.default_settings()
    }
}

async fn build_journal(repository: Arc<RwLock<FileTradeRepository>>, storage: &JournalStorage) -> TradeJournal {
    let keywords = Arc::new(RwLock::new(storage.load_keywords().await));
    let mut journal = TradeJournal::new(repository).with_keywords(keywords);
    journal.add_validator(Box::new(BasicTradeValidator::new()));
    journal
}

async fn serve(
    config: Config,
    repository: Arc<RwLock<FileTradeRepository>>,
    storage: JournalStorage,
    settings: AppSettings,
) -> Result<(), anyhow::Error> {
    let journal = Arc::new(build_journal(repository, &storage).await);
    let principles = Arc::new(RwLock::new(storage.load_principle_book().await));
    let settings = Arc::new(RwLock::new(settings));

    // API 라우트 초기화
    let routes = routes::create_routes(journal, principles, settings, storage);
    log::info!("API 라우트 초기화 완료");

    // Warp 서버 시작
    let addr = config.socket_addr()?;
    log::info!("서버 시작: http://{}/", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}

async fn print_stats(
    repository: Arc<RwLock<FileTradeRepository>>,
    storage: &JournalStorage,
    settings: &AppSettings,
) -> Result<(), anyhow::Error> {
    let journal = build_journal(repository, storage).await;
    let report = journal.stats().await?;
    let stats = report.stats;
    let lang = settings.language;

    println!("\n=== {} ===", t("dashboard", lang));
    println!(
        "{}: {} ({})",
        t("totalPnl", lang),
        format_currency(stats.total_pnl, &settings.currency),
        format_percentage(stats.total_pnl_percentage)
    );
    println!("{}: {:.1}%", t("winRate", lang), stats.win_rate);
    println!("{}: {}", t("openPositions", lang), stats.open_positions);
    println!("{}: {}", t("totalTrades", lang), stats.total_trades);
    println!("{}: {}", t("averageReturn", lang), format_currency(stats.average_return, &settings.currency));

    if !report.flagged.is_empty() {
        println!("\n진입가/금액이 잘못된 거래 {}건:", report.flagged.len());
        for id in &report.flagged {
            println!("  {}", id);
        }
    }

    Ok(())
}

async fn import_csv(
    repository: Arc<RwLock<FileTradeRepository>>,
    storage: &JournalStorage,
    path: &Path,
) -> Result<(), anyhow::Error> {
    let trades = trade_csv::import_trades(path)?;

    let mut keywords = storage.load_keywords().await;
    let mut repo = repository.write().await;
    for trade in &trades {
        if repo.find_by_id(&trade.id).await?.is_some() {
            repo.update(trade).await?;
        } else {
            repo.save(trade).await?;
        }
        keywords.extend(trade.macro_context.iter().cloned());
    }
    storage.save_keywords(&keywords).await?;

    log::info!("{}건 가져오기 완료: {}", trades.len(), path.display());
    println!("{} trades <- {}", trades.len(), path.display());
    Ok(())
}
