// In app/src/report.rs

use app_config::Settings;
use core_types::{Signal, Symbol, TradeRecord};
use events::{CycleReport, EngineEvent};
use tokio::sync::broadcast;

/// Prints engine events until the channel closes.
pub async fn print_events(mut rx: broadcast::Receiver<EngineEvent>) {
    loop {
        match rx.recv().await {
            Ok(EngineEvent::TradeExecuted(record)) => print_trade(&record),
            Ok(EngineEvent::CycleReport(report)) => print_cycle(&report),
            Ok(EngineEvent::FinalReport(report)) => print_final(&report),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "Report printer fell behind; some events were dropped.");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn print_trade(record: &TradeRecord) {
    match record {
        TradeRecord::Open {
            symbol,
            quantity,
            price,
            cost,
            stop_loss,
            take_profit,
            ..
        } => {
            println!(
                "BUY   {symbol:<6} {quantity:>6} @ {price:>10.2}  cost {cost:>12.2}  stop {}  target {}",
                fmt_price(*stop_loss),
                fmt_price(*take_profit)
            );
        }
        TradeRecord::Close {
            symbol,
            quantity,
            exit_price,
            pnl,
            pnl_percent,
            reason,
            holding_hours,
            ..
        } => {
            println!(
                "SELL  {symbol:<6} {quantity:>6} @ {exit_price:>10.2}  P&L {pnl:>+10.2} ({pnl_percent:+.2}%)  held {holding_hours:.1}h  [{reason}]"
            );
        }
    }
}

fn print_cycle(report: &CycleReport) {
    let p = &report.portfolio;
    let s = &report.stats;
    println!(
        "--- cycle {} --- value {:.2} ({:+.2}%)  cash {:.2}  open {}  signals {}  executed {}  skipped {}  failed {}",
        report.cycle,
        p.total_value,
        p.total_return_percent,
        p.capital,
        p.open_positions.len(),
        s.total_signals,
        s.executed_trades,
        s.skipped_trades,
        s.failed_symbols,
    );
    for pos in &p.open_positions {
        println!(
            "      {:<6} {:>6} entry {:>10.2}  now {:>10.2}  P&L {:>+10.2} ({:+.2}%)",
            pos.symbol, pos.quantity, pos.entry_price, pos.current_price, pos.pnl, pos.pnl_percent
        );
    }
}

fn print_final(report: &CycleReport) {
    let p = &report.portfolio;
    println!();
    println!("================ FINAL REPORT ================");
    println!("Cycles run:            {}", report.cycle);
    println!("Initial capital:       {:>12.2}", p.initial_capital);
    println!("Cash:                  {:>12.2}", p.capital);
    println!("Open positions value:  {:>12.2}", p.open_positions_value);
    println!("Total value:           {:>12.2}", p.total_value);
    println!(
        "Total return:          {:>12.2} ({:+.2}%)",
        p.total_return_amount, p.total_return_percent
    );
    println!("Closed trades:         {:>12}", p.total_trades);
    println!(
        "Won / lost:            {:>5} / {:<5} win rate {:.2}%",
        p.winning_trades, p.losing_trades, p.win_rate
    );
    println!("Average win:           {:>12.2}", p.avg_profit);
    println!("Average loss:          {:>12.2}", p.avg_loss);
    println!("Profit factor:         {:>12.2}", p.profit_factor);
    println!("Max drawdown:          {:>11.2}%", p.max_drawdown_percent);
    println!("Signals seen:          {:>12}", report.stats.total_signals);
    println!("Trades executed:       {:>12}", report.stats.executed_trades);
    println!("Trades skipped:        {:>12}", report.stats.skipped_trades);
    println!("==============================================");
}

/// Output of the `scan` subcommand.
pub fn print_analysis(results: &[(Symbol, Signal)], min_confidence: f64) {
    for (symbol, signal) in results {
        let marker = if signal.is_actionable(min_confidence) {
            "*"
        } else {
            " "
        };
        let votes = signal
            .votes
            .map(|v| format!("{} buy / {} sell / {} hold", v.buy, v.sell, v.hold))
            .unwrap_or_default();
        println!(
            "{marker} {symbol:<6} {:<5} {:>5.1}%  {votes}",
            signal.action.to_string(),
            signal.confidence
        );
        for detail in &signal.details {
            println!(
                "      {:<16} {:<5} {:>5.1}%",
                detail.source,
                detail.action.to_string(),
                detail.confidence
            );
            for reason in &detail.rationale {
                println!("        - {reason}");
            }
        }
    }
    println!("* actionable at the {min_confidence:.0}% confidence threshold");
}

/// Output of the `check` subcommand.
pub fn print_settings(settings: &Settings) {
    let r = &settings.risk;
    let t = &settings.trading;
    let s = &settings.scanner;
    println!("Configuration OK ({})", settings.app.environment);
    println!(
        "  risk:     capital {}  risk/trade {}  daily loss cap {}  max positions {}",
        r.initial_capital, r.max_risk_per_trade, r.max_daily_loss_fraction, r.max_open_positions
    );
    println!(
        "  trading:  min confidence {}%  stop {}  reward ratio {}  auto-close {}  liquidate on exit {}",
        t.min_confidence,
        t.stop_loss_percent,
        t.reward_ratio,
        t.auto_close_on_signal,
        t.liquidate_on_shutdown
    );
    let watchlist: Vec<&str> = s.watchlist.iter().map(Symbol::as_str).collect();
    println!(
        "  scanner:  [{}] every {}s, {}ms between symbols, max cycles {}, fetch timeout {}",
        watchlist.join(", "),
        s.scan_interval_seconds,
        s.symbol_delay_millis,
        s.max_cycles.map_or("none".to_string(), |n| n.to_string()),
        s.fetch_timeout_secs
            .map_or("none".to_string(), |n| format!("{n}s"))
    );
    println!("  data:     {}", settings.market_data.replay_file.display());
    for voter in &settings.voters {
        println!(
            "  voter:    {:<16} {}",
            voter.name,
            if voter.enabled { "enabled" } else { "disabled" }
        );
    }
}

fn fmt_price(price: Option<rust_decimal::Decimal>) -> String {
    price.map_or_else(|| "-".to_string(), |p| format!("{p:.2}"))
}
