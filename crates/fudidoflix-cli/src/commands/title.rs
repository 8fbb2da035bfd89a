use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::ui::Activity;
use color_eyre::Result;
use fudidoflix_core::episodes::{episode_rows, initial_season, EpisodeRow, SeasonCache};
use fudidoflix_core::player::PlaybackTarget;
use fudidoflix_core::{CoreError, ModalManager, PlayOutcome};
use fudidoflix_models::{MediaId, MediaKind};
use fudidoflix_tmdb::api;
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::warn;

fn report_notices(manager: &mut ModalManager, output: &Output) {
    for notice in manager.take_notices() {
        output.warn(notice);
    }
}

fn report_play(manager: &ModalManager, outcome: &PlayOutcome, output: &Output) {
    let label = manager
        .state()
        .session()
        .map(|s| {
            let title = s.entry.as_ref().map(|e| e.title.as_str()).unwrap_or("");
            format!("{} {}", title, s.target.label()).trim().to_string()
        })
        .unwrap_or_default();

    if !output.is_human() {
        output.emit(&json!({
            "outcome": outcome,
            "session": manager.state().session(),
        }));
        return;
    }
    match outcome {
        PlayOutcome::Started { .. } => output.success(format!("Reproduzindo {}", label)),
        PlayOutcome::AlreadyPlaying { .. } => output.info(format!("{} já está em reprodução", label)),
    }
    output.println(outcome.embed_url().underline().to_string());
}

pub async fn run_details(ctx: &AppContext, kind: MediaKind, id: MediaId, output: &Output) -> Result<()> {
    let mut manager = ctx.modal()?;
    let activity = Activity::start("Carregando detalhes...", output.is_human());
    let result = manager.open_details(kind, id).await;
    activity.finish();
    report_notices(&mut manager, output);
    let view = result?;

    if !output.is_human() {
        output.emit(&view);
        return Ok(());
    }
    output.table(&render::details(&view));
    if let Some(poster) = ctx.images.poster(view.poster_path.as_deref()) {
        output.println(poster.dimmed().to_string());
    }
    if kind == MediaKind::Tv && !view.episodes.is_empty() {
        output.println(render::section(&format!(
            "Temporada {}",
            view.default_season().unwrap_or(1)
        )));
        output.table(&render::episodes(&view.episodes));
    }
    Ok(())
}

pub async fn run_play(
    ctx: &AppContext,
    kind: MediaKind,
    id: MediaId,
    season: Option<u32>,
    episode: Option<u32>,
    output: &Output,
) -> Result<()> {
    let mut manager = ctx.modal()?;
    if kind == MediaKind::Movie && (season.is_some() || episode.is_some()) {
        output.warn("Filmes não têm temporadas; --season/--episode ignorados.");
    }

    let activity = Activity::start("Preparando o player...", output.is_human());
    let outcome = match manager.open_details(kind, id).await {
        Ok(_) => manager.play_from_details(season, episode).await,
        Err(e) => {
            // Play without title data; history needs a title and poster
            warn!(%kind, id, error = %e, "Playing without details");
            let target = PlaybackTarget::new(id, kind, season.or(Some(1)), episode.or(Some(1)));
            manager.play(target, None).await
        }
    };
    activity.finish();
    report_notices(&mut manager, output);

    let outcome = outcome?;
    report_play(&manager, &outcome, output);
    Ok(())
}

pub async fn run_next(ctx: &AppContext, output: &Output) -> Result<()> {
    let mut manager = ctx.modal()?;
    if !manager.resume_last() {
        return Err(CoreError::NoSession.into());
    }
    let outcome = manager.next_episode().await?;
    report_notices(&mut manager, output);
    report_play(&manager, &outcome, output);
    Ok(())
}

pub async fn run_trailer(ctx: &AppContext, kind: MediaKind, id: MediaId, output: &Output) -> Result<()> {
    let mut manager = ctx.modal()?;
    let url = manager.play_trailer(kind, id).await?;
    let embed = manager.embed_url().map(str::to_string);
    manager.close().await;

    if !output.is_human() {
        output.emit(&json!({ "url": url, "embed_url": embed }));
        return Ok(());
    }
    output.success("Trailer encontrado");
    output.println(url.underline().to_string());
    Ok(())
}

/// Episodes of a season. The series in the player goes through its episode
/// panel; any other series is listed straight from the catalogue.
pub async fn run_episodes(
    ctx: &AppContext,
    id: MediaId,
    season: Option<u32>,
    play: Option<u32>,
    output: &Output,
) -> Result<()> {
    let mut manager = ctx.modal()?;
    let in_player = manager.resume_last()
        && manager
            .state()
            .session()
            .map(|s| (s.target.kind, s.target.id))
            == Some((MediaKind::Tv, id));
    if in_player {
        return panel_episodes(&mut manager, id, season, play, output).await;
    }
    match play {
        Some(episode) => run_play(ctx, MediaKind::Tv, id, season, Some(episode), output).await,
        None => list_season(ctx, id, season, output).await,
    }
}

async fn open_panel(manager: &mut ModalManager, season: Option<u32>) -> Result<u32, CoreError> {
    manager.open_episode_panel().await?;
    if let Some(season) = season {
        if manager.panel_season() != Some(season) {
            manager.select_season(season).await;
        }
    }
    manager.panel_season().ok_or(CoreError::NoSession)
}

async fn panel_episodes(
    manager: &mut ModalManager,
    id: MediaId,
    season: Option<u32>,
    play: Option<u32>,
    output: &Output,
) -> Result<()> {
    let activity = Activity::start("Carregando episódios...", output.is_human());
    let opened = open_panel(manager, season).await;
    activity.finish();
    report_notices(manager, output);
    let season = opened?;

    if let Some(episode) = play {
        let outcome = manager.select_episode(season, episode).await?;
        report_notices(manager, output);
        report_play(manager, &outcome, output);
        return Ok(());
    }

    let rows = manager.panel_episodes().to_vec();
    manager.close_episode_panel();
    show_episodes(id, season, &rows, output);
    Ok(())
}

async fn list_season(ctx: &AppContext, id: MediaId, season: Option<u32>, output: &Output) -> Result<()> {
    let source = ctx.source()?;

    let season = match season {
        Some(season) => season,
        None => {
            let details = api::details(source.as_ref(), MediaKind::Tv, id)
                .await
                .map_err(|_| CoreError::DetailsUnavailable { kind: MediaKind::Tv, id })?;
            initial_season(None, &details.playable_seasons())
        }
    };

    let mut cache = SeasonCache::new();
    let episodes = cache
        .episodes(source.as_ref(), id, season)
        .await
        .ok_or_else(|| color_eyre::eyre::eyre!("Não foi possível carregar os episódios."))?;
    let rows = episode_rows(&ctx.store, id, season, &episodes, None);
    show_episodes(id, season, &rows, output);
    Ok(())
}

fn show_episodes(id: MediaId, season: u32, rows: &[EpisodeRow], output: &Output) {
    if !output.is_human() {
        output.emit(&json!({ "series_id": id, "season": season, "episodes": rows }));
        return;
    }
    output.println(render::section(&format!("Temporada {}", season)));
    if rows.is_empty() {
        output.info("Nenhum episódio encontrado para esta temporada.");
    } else {
        output.table(&render::episodes(rows));
    }
}
