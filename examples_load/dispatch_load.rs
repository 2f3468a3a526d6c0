use std::time::Instant;

use cloudwatch_otlp_logs::dispatch::{Dispatcher, DispatcherConfig};
use cloudwatch_otlp_logs::event::LogEvent;
use cloudwatch_otlp_logs::init::init_logging;
use cloudwatch_otlp_logs::noop_sink::NoopSink;

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("logging disabled: {}", e);
    }

    let mut dispatcher = Dispatcher::new(DispatcherConfig::from_env());
    let sink = NoopSink;

    let n: u64 = 100_000;
    let hosts = 64;
    let start = Instant::now();

    for i in 0..n {
        let event = LogEvent {
            event_id: i.to_string(),
            timestamp: 1_700_000_000_000 + i as i64,
            message: format!("load test message {}", i),
            region: None,
            log_group: "/var/log/messages".to_string(),
            log_stream: format!("i-{:08x}-us-east-1", i % hosts),
            account: None,
            kubernetes: None,
            attributes: Default::default(),
        };
        dispatcher.route(&event);
    }

    let routed = start.elapsed();
    let flushed = match dispatcher.flush(&sink).await {
        Ok(count) => count,
        Err(e) => {
            eprintln!("flush failed: {}", e);
            return;
        }
    };

    println!(
        "routed {} events in {:?} (~{:.0} ev/s), flushed {} documents in {:?}",
        n,
        routed,
        n as f64 / routed.as_secs_f64(),
        flushed,
        start.elapsed()
    );
}
