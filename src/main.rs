/**
* filename : main
* author : HAMA
* date: 2025. 5. 14.
* description: analyze / watch / serve 진입점
**/

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};

use xsignal::api::routes;
use xsignal::config::{Config, ProviderKind};
use xsignal::market_data::{CsvPriceProvider, PriceHistoryProvider, YahooChartProvider};
use xsignal::notification::HttpNotifier;
use xsignal::utils::logging;
use xsignal::{AnalysisService, Interval, TechnicalAnalyzer};

const USAGE: &str = "usage: xsignal analyze <SYMBOL> [INTERVAL] [PERIOD] | watch <SYMBOL> [INTERVAL] | serve";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 설정 로드
    let config = Config::load()?;

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("신호 분석 시스템 시작 (v{})", xsignal::VERSION);

    let service = build_service(&config)?;

    // 명령줄 인수 확인
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("serve");

    let result = match command {
        "analyze" => {
            let symbol = args.get(2).ok_or_else(|| anyhow!(USAGE))?;
            let interval = interval_arg(args.get(3), &config)?;
            run_analyze(&service, symbol, interval, args.get(4).map(String::as_str)).await
        }
        "watch" => {
            let symbol = args.get(2).ok_or_else(|| anyhow!(USAGE))?;
            let interval = interval_arg(args.get(3), &config)?;
            run_watch(&service, &config, symbol, interval).await
        }
        "serve" => run_server(service, &config).await,
        other => Err(anyhow!("unknown command '{}'\n{}", other, USAGE)),
    };

    if let Err(e) = &result {
        log::error!("{:#}", e);
    }
    result
}

fn build_service(config: &Config) -> Result<AnalysisService, anyhow::Error> {
    let provider: Arc<dyn PriceHistoryProvider> = match config.market_data.provider {
        ProviderKind::Yahoo => Arc::new(YahooChartProvider::new(&config.market_data)?),
        ProviderKind::Csv => {
            let path = config
                .market_data
                .csv_path
                .as_ref()
                .context("market_data.csv_path is not set")?;
            Arc::new(CsvPriceProvider::new(PathBuf::from(path), &config.market_data.utc_offset)?)
        }
    };
    log::info!("가격 제공자: {}", provider.name());

    let analyzer = TechnicalAnalyzer::new(config.analyzer.clone())?;
    let mut service = AnalysisService::new(provider, analyzer, config.notification.clone());

    if config.notification.enabled {
        let notifier = HttpNotifier::from_config(&config.notification)?;
        service = service.with_notifier(Arc::new(notifier));
        if config.notification.recipient.is_none() {
            log::warn!("알림 수신자가 설정되지 않아 알림을 보내지 않습니다 (SIGNAL_RECIPIENT)");
        }
    }

    Ok(service)
}

/// Interval from the command line, or the configured default.
fn interval_arg(arg: Option<&String>, config: &Config) -> Result<Interval, anyhow::Error> {
    match arg {
        Some(s) => Ok(s.parse::<Interval>()?),
        None => Ok(config.market_data.default_interval),
    }
}

async fn run_analyze(
    service: &AnalysisService,
    symbol: &str,
    interval: Interval,
    period: Option<&str>,
) -> Result<(), anyhow::Error> {
    let report = service.analyze(symbol, interval, period).await?;
    let d = &report.decision;

    println!("\n=== {} ({}, {}) ===", report.symbol, report.interval, report.period);
    println!("Signal: {} (confidence {})", d.signal, d.confidence);
    println!("Current Price: {:.2}", d.current_price);
    println!("Support: {:.2}  Resistance: {:.2}", d.support, d.resistance);
    match d.rsi {
        Some(rsi) => println!("RSI: {:.2}", rsi),
        None => println!("RSI: N/A"),
    }
    println!("MACD: {:.2}  Signal Line: {:.2}", d.macd, d.signal_line);
    println!("Bollinger Upper: {:.2}  Lower: {:.2}", d.bb_upper, d.bb_lower);
    if d.is_actionable() {
        println!("Hold: {} minutes", d.hold_minutes);
    }

    Ok(())
}

async fn run_watch(
    service: &AnalysisService,
    config: &Config,
    symbol: &str,
    interval: Interval,
) -> Result<(), anyhow::Error> {
    let every = Duration::from_secs(config.refresh.interval_secs);
    log::info!("{} {} 감시 시작 ({}초 간격, Ctrl-C 로 종료)", symbol, interval, every.as_secs());

    service.watch(symbol, interval, every).await;
    Ok(())
}

async fn run_server(service: AnalysisService, config: &Config) -> Result<(), anyhow::Error> {
    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server.host '{}'", config.server.host))?;
    let addr = (host, config.server.port);

    let api = routes::create_routes(service.clone(), config.market_data.default_interval.to_string());
    log::info!("서버 시작: http://{}:{}/", host, config.server.port);

    // 자동 갱신이 켜져 있으면 기본 심볼을 백그라운드로 감시
    if config.refresh.auto_refresh {
        if let Some(symbol) = config.refresh.symbol.clone() {
            let interval = config.market_data.default_interval;
            let every = Duration::from_secs(config.refresh.interval_secs);
            let watcher = service.clone();
            tokio::spawn(async move {
                watcher.watch(&symbol, interval, every).await;
            });
        } else {
            log::warn!("auto_refresh 설정됨, refresh.symbol 없음: 자동 갱신 생략");
        }
    }

    let (_, server) = warp::serve(api).bind_with_graceful_shutdown(addr, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Ctrl-C 핸들러 등록 실패, 종료 신호 없이 계속 실행: {}", e);
            std::future::pending::<()>().await;
        }
    });
    server.await;
    log::info!("서버 종료");

    Ok(())
}
