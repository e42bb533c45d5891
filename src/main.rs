use clap::Parser;
use log::{error, info};
use portero::app::{self, App};
use portero::event::FeedMessage;
use portero::feed_fetch::{HttpSnapshotFetcher, SnapshotFetcher};
use portero::feed_push::Subscription;
use portero::session::SessionContext;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "portero", about = "Terminal home screen for the tenant portal")]
struct Args {
    /// Base address of the portal backend, e.g. https://portal.example.com
    #[arg(long, env = "PORTAL_API_URL")]
    base_url: Url,

    /// Cached session profile written by the login flow
    #[arg(long, default_value = "session.json")]
    session_file: PathBuf,

    /// Where diagnostics go; the TUI owns the terminal, so logs go to a file
    #[arg(long, default_value = "portero.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_file)?;

    // Session identity is read once and handed to the app explicitly.
    let session = SessionContext::from_cache_file(&args.session_file);

    let (tx, rx) = mpsc::unbounded_channel::<FeedMessage>();

    // Kick off the snapshot fetch. Its completion lands on the same channel
    // as push deltas; if the UI quits first, the closed channel swallows the
    // stale result.
    let fetcher: Arc<dyn SnapshotFetcher> = Arc::new(HttpSnapshotFetcher::new());
    let snapshot_tx = tx.clone();
    let base = args.base_url.clone();
    let token = session.token().map(str::to_owned);
    tokio::spawn(async move {
        let message = match fetcher.fetch_snapshot(&base, token.as_deref()).await {
            Ok(items) => FeedMessage::Snapshot(items),
            Err(err) => {
                error!("failed to load announcements: {}", err);
                FeedMessage::SnapshotFailed
            }
        };
        let _ = snapshot_tx.send(message);
    });

    // A dead push channel is not fatal either; the feed just goes stale.
    let mut subscription = match Subscription::open(&args.base_url, tx).await {
        Ok(subscription) => Some(subscription),
        Err(err) => {
            error!("announcement push channel unavailable: {}", err);
            None
        }
    };

    info!("starting portero against {}", args.base_url);
    let app = App::new(session);
    let result = app::start_ui(app, rx);

    if let Some(subscription) = subscription.as_mut() {
        subscription.close();
    }

    result
}

fn setup_logging(path: &Path) -> anyhow::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(fern::log_file(path)?)
        .apply()?;
    Ok(())
}
