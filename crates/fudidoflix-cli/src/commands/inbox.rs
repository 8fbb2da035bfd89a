use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::ui::Activity;
use crate::InboxCommands;
use color_eyre::Result;
use fudidoflix_core::notifications::{badge_count, check_for_updates, next_check_at, sorted_for_display};
use fudidoflix_core::ScanOutcome;
use serde_json::json;
use std::time::Duration;
use tracing::{error, info};

const MIN_WAIT: Duration = Duration::from_secs(60);

pub async fn run_inbox(ctx: &AppContext, cmd: InboxCommands, output: &Output) -> Result<()> {
    match cmd {
        InboxCommands::Show => {
            show(ctx, output);
            Ok(())
        }
        InboxCommands::Check => check(ctx, output).await,
        InboxCommands::Dismiss { unique_id } => {
            if ctx.store.remove_notification(&unique_id) {
                output.success(format!("Notificação {} removida", unique_id));
                Ok(())
            } else {
                Err(color_eyre::eyre::eyre!("Notificação não encontrada: {}", unique_id))
            }
        }
        InboxCommands::Clear => {
            ctx.store.clear_inbox();
            output.success("Notificações limpas");
            Ok(())
        }
        InboxCommands::Watch => watch(ctx, output).await,
    }
}

fn show(ctx: &AppContext, output: &Output) {
    let items = sorted_for_display(&ctx.store.inbox());
    if !output.is_human() {
        output.emit(&json!({
            "badge": badge_count(&ctx.store),
            "notifications": items,
        }));
        return;
    }
    output.println(render::section(&format!("Notificações ({})", items.len())));
    if items.is_empty() {
        output.info("Nenhuma notificação nova.");
    } else {
        output.table(&render::inbox(&items));
    }
}

async fn check(ctx: &AppContext, output: &Output) -> Result<()> {
    let source = ctx.source()?;
    let mut rng = ctx.rng();

    let activity = Activity::start("Procurando novos episódios...", output.is_human());
    let outcome = check_for_updates(&ctx.store, source.as_ref(), &ctx.config.notifications, &mut rng).await;
    activity.finish();

    if !output.is_human() {
        output.emit(&outcome);
        return Ok(());
    }
    match outcome {
        ScanOutcome::Skipped { next_check_at } => {
            output.info(format!(
                "Verificação recente; a próxima será após {}",
                next_check_at.format("%Y-%m-%d %H:%M UTC")
            ));
        }
        ScanOutcome::Completed {
            new_episodes,
            failures,
            ..
        } => {
            if failures > 0 {
                output.warn(format!("{} séries não puderam ser verificadas", failures));
            }
            output.success(format!("{} novos episódios encontrados", new_episodes));
            show(ctx, output);
        }
    }
    Ok(())
}

/// Check forever, sleeping until the gate opens again.
async fn watch(ctx: &AppContext, output: &Output) -> Result<()> {
    let source = ctx.source()?;
    let config = &ctx.config.notifications;
    let mut rng = ctx.rng();

    output.info(format!(
        "Verificando a cada {}h. Logs em {}",
        config.check_interval_hours,
        ctx.paths.log_dir().display()
    ));
    info!(
        operation = "inbox_watch_started",
        interval_hours = config.check_interval_hours,
        "Inbox watcher started"
    );

    loop {
        match check_for_updates(&ctx.store, source.as_ref(), config, &mut rng).await {
            ScanOutcome::Completed { new_episodes, failures, badge } => info!(
                operation = "inbox_watch_scan",
                new_episodes,
                failures,
                badge,
                "Scheduled inbox scan completed"
            ),
            ScanOutcome::Skipped { .. } => {}
        }

        let wait = match next_check_at(&ctx.store, config) {
            Some(next) => (next - ctx.store.clock().now()).to_std().unwrap_or(MIN_WAIT),
            None => {
                // The scan just ran, so the gate should be closed
                error!(operation = "inbox_watch_error", "Last check was not recorded");
                Duration::from_secs(config.check_interval_hours.max(1) as u64 * 3600)
            }
        };
        let wait = wait.max(MIN_WAIT);
        info!(operation = "inbox_watch_sleep", seconds = wait.as_secs(), "Waiting for next scan");
        tokio::time::sleep(wait).await;
    }
}
