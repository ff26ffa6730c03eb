pub mod analyze;
pub mod extract;
pub mod prompts;
pub mod trade;

use crate::domain::ports::chart_port::ChartProvider;
use crate::domain::ports::notifier_port::Notifier;
use std::sync::Arc;

/// Deliver a formatted report: render the chart if a provider is wired,
/// send the text, then the image. Every step degrades with a warning
/// instead of failing the cycle. Returns (chart_attached, telegram_sent).
pub(crate) async fn deliver_report(
    notifier: Option<&Arc<dyn Notifier>>,
    chart: Option<&Arc<dyn ChartProvider>>,
    message: &str,
    caption: &str,
) -> (bool, bool) {
    let Some(notifier) = notifier else {
        println!("No notifier configured, skipping delivery");
        return (false, false);
    };

    let chart_png = match chart {
        Some(provider) => match provider.render().await {
            Ok(png) => Some(png),
            Err(e) => {
                eprintln!("Warning: chart rendering failed: {e}");
                None
            }
        },
        None => None,
    };

    let sent = match notifier.send_text(message).await {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Warning: message delivery failed: {e}");
            false
        }
    };

    let mut attached = false;
    if let Some(png) = chart_png {
        match notifier.send_photo(caption, &png).await {
            Ok(()) => attached = true,
            Err(e) => eprintln!("Warning: photo delivery failed: {e}"),
        }
    }

    (attached, sent)
}
