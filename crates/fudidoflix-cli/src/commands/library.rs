use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::{HistoryCommands, ListCommands};
use color_eyre::Result;
use fudidoflix_core::CoreError;
use fudidoflix_models::{EntryDraft, MediaId, MediaKind, PosterEntry};
use fudidoflix_tmdb::api;
use tracing::debug;

fn show_entries(title: &str, entries: &[PosterEntry], empty: &str, output: &Output) {
    if !output.is_human() {
        output.emit(&entries);
        return;
    }
    output.println(render::section(title));
    if entries.is_empty() {
        output.info(empty);
    } else {
        output.table(&render::poster_entries(entries));
    }
}

pub fn run_history(ctx: &AppContext, cmd: HistoryCommands, output: &Output) -> Result<()> {
    let store = &ctx.store;
    match cmd {
        HistoryCommands::List => show_entries(
            "Últimos Assistidos",
            &store.watched_history(),
            "Você ainda não assistiu nada.",
            output,
        ),
        HistoryCommands::Remove { kind, id } => {
            store.remove_from_watched_history(id, kind);
            output.success(format!("{} {} removido do histórico", kind, id));
        }
        HistoryCommands::Clear => {
            store.clear_all_history();
            output.success("Histórico limpo");
        }
    }
    Ok(())
}

pub fn run_continue(ctx: &AppContext, cmd: HistoryCommands, output: &Output) -> Result<()> {
    let store = &ctx.store;
    match cmd {
        HistoryCommands::List => show_entries(
            "Continuar Assistindo",
            &store.continue_watching(),
            "Nada para continuar assistindo.",
            output,
        ),
        HistoryCommands::Remove { kind, id } => {
            store.remove_from_continue_watching(id, kind);
            output.success(format!("{} {} removido de continuar assistindo", kind, id));
        }
        HistoryCommands::Clear => {
            store.clear_continue_watching();
            output.success("Continuar assistindo limpo");
        }
    }
    Ok(())
}

/// Entry data for a title known only by id.
async fn draft_for(ctx: &AppContext, kind: MediaKind, id: MediaId) -> Result<EntryDraft> {
    let source = ctx.source()?;
    let details = api::details(source.as_ref(), kind, id)
        .await
        .map_err(|_| CoreError::DetailsUnavailable { kind, id })?;
    Ok(details.to_draft(kind))
}

pub async fn run_list(ctx: &AppContext, cmd: ListCommands, output: &Output) -> Result<()> {
    let store = &ctx.store;
    match cmd {
        ListCommands::Show => show_entries(
            "Minha Lista",
            &store.my_list(),
            "Sua lista está vazia.",
            output,
        ),
        ListCommands::Add { kind, id } => {
            if store.is_in_my_list(id, kind) {
                output.info(format!("{} {} já está na sua lista", kind, id));
                return Ok(());
            }
            let draft = draft_for(ctx, kind, id).await?;
            if store.save_to_my_list(&draft) {
                let title = draft.title.as_deref().or(draft.name.as_deref()).unwrap_or("Título");
                output.success(format!("{} adicionado à sua lista", title));
            } else {
                output.warn("Não foi possível adicionar: dados do título incompletos");
            }
        }
        ListCommands::Remove { kind, id } => {
            store.remove_from_my_list(id, kind);
            output.success(format!("{} {} removido da sua lista", kind, id));
        }
        ListCommands::Toggle { kind, id } => {
            let mut manager = ctx.modal()?;
            let in_list = match manager.open_details(kind, id).await {
                Ok(_) => manager.toggle_my_list().ok_or(CoreError::NoSession)?,
                // Removing needs no title data
                Err(e) if store.is_in_my_list(id, kind) => {
                    debug!(%kind, id, error = %e, "Removing from my list without details");
                    store.toggle_my_list(&EntryDraft::new(id, kind))
                }
                Err(e) => return Err(e.into()),
            };
            manager.close().await;
            if in_list {
                output.success(format!("{} {} adicionado à sua lista", kind, id));
            } else {
                output.success(format!("{} {} removido da sua lista", kind, id));
            }
        }
        ListCommands::Clear => {
            store.clear_my_list();
            output.success("Sua lista foi limpa");
        }
    }
    Ok(())
}

pub fn run_watched(
    ctx: &AppContext,
    kind: MediaKind,
    id: MediaId,
    season: Option<u32>,
    episode: Option<u32>,
    output: &Output,
) -> Result<()> {
    if kind == MediaKind::Tv && (season.is_none() || episode.is_none()) {
        return Err(CoreError::invalid_target(kind, id, "series need --season and --episode").into());
    }
    if !ctx.store.save_watched_episode(id, kind, season, episode) {
        return Err(color_eyre::eyre::eyre!("Não foi possível marcar como assistido"));
    }
    match (season, episode) {
        (Some(s), Some(e)) if kind == MediaKind::Tv => {
            output.success(format!("T{}E{} de {} marcado como assistido", s, e, id))
        }
        _ => output.success(format!("{} {} marcado como assistido", kind, id)),
    }
    Ok(())
}
