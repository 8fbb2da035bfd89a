use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::ui::Activity;
use crate::{RouletteCommands, SorteCommands};
use color_eyre::Result;
use fudidoflix_core::sorte::{self, GridSort, SurpriseMode, Wheel, STUDIOS};
use owo_colors::OwoColorize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::debug;

pub async fn run_sorte(ctx: &AppContext, cmd: SorteCommands, output: &Output) -> Result<()> {
    match cmd {
        SorteCommands::Surprise { genre } => surprise(ctx, genre, output).await,
        SorteCommands::Genres => {
            let genres = sorte::genres(ctx.source()?.as_ref()).await?;
            if output.is_human() {
                output.table(&render::genres(&genres));
            } else {
                output.emit(&genres);
            }
            Ok(())
        }
        SorteCommands::Roulette { cmd } => roulette(ctx, cmd.unwrap_or(RouletteCommands::List), output).await,
        SorteCommands::Studios => {
            if output.is_human() {
                output.println(render::section("Estúdios"));
                for studio in STUDIOS {
                    output.println(format!("  {:>7}  {}", studio.id, studio.name));
                }
            } else {
                output.emit(&STUDIOS);
            }
            Ok(())
        }
        SorteCommands::Studio { id, sort } => {
            let source = ctx.source()?;
            let activity = Activity::start("Carregando filmes do estúdio...", output.is_human());
            let mut items = sorte::studio_grid(source.as_ref(), id, &ctx.config.sorte).await;
            activity.finish();
            let title = STUDIOS
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.name.to_string())
                .unwrap_or_else(|| format!("Estúdio {}", id));
            show_grid(&title, &mut items, sort, output);
            Ok(())
        }
        SorteCommands::Actor { id, sort } => {
            let source = ctx.source()?;
            let activity = Activity::start("Carregando filmografia...", output.is_human());
            let result = sorte::actor_grid(source.as_ref(), id).await;
            activity.finish();
            let mut items = result?;
            show_grid(&format!("Pessoa {}", id), &mut items, sort, output);
            Ok(())
        }
        SorteCommands::People { query } => people(ctx, query, output).await,
    }
}

fn show_grid(title: &str, items: &mut [fudidoflix_tmdb::MediaItem], sort: GridSort, output: &Output) {
    sorte::sort_grid(items, sort);
    if !output.is_human() {
        output.emit(&json!({ "title": title, "sort": sort, "results": items }));
        return;
    }
    output.println(render::section(title));
    if items.is_empty() {
        output.info("Nenhum resultado encontrado.");
    } else {
        output.table(&render::media_items(items));
    }
}

async fn surprise(ctx: &AppContext, genre: Option<u32>, output: &Output) -> Result<()> {
    let source = ctx.source()?;
    let mode = genre.map(SurpriseMode::Genre).unwrap_or(SurpriseMode::Anything);
    let mut rng = ctx.rng();

    let activity = Activity::start("Procurando uma surpresa...", output.is_human());
    let pick = sorte::surprise(source.as_ref(), &ctx.config.sorte, mode, &mut rng).await;
    activity.finish();

    let Some(pick) = pick else {
        return Err(color_eyre::eyre::eyre!(
            "Não encontramos uma surpresa com esses critérios. Tente novamente!"
        ));
    };
    if !output.is_human() {
        output.emit(&pick);
        return Ok(());
    }
    output.success(format!("{} ({})", pick.item.display_title().bold(), pick.kind));
    if let Some(overview) = &pick.item.overview {
        output.println(overview);
    }
    output.println(
        format!("fudidoflix details {} {}", pick.kind, pick.item.id)
            .dimmed()
            .to_string(),
    );
    Ok(())
}

async fn roulette(ctx: &AppContext, cmd: RouletteCommands, output: &Output) -> Result<()> {
    let store = &ctx.store;
    match cmd {
        RouletteCommands::List => {
            let items = store.roulette_items();
            if !output.is_human() {
                output.emit(&items);
                return Ok(());
            }
            output.println(render::section("Roleta"));
            if items.is_empty() {
                output.info("A roleta está vazia. Use 'fudidoflix sorte roulette search'.");
            } else {
                output.table(&render::roulette(&items));
            }
        }
        RouletteCommands::Search { query } => {
            let query = query.join(" ");
            let found = sorte::search_candidates(ctx.source()?.as_ref(), &query)
                .await?
                .ok_or_else(|| color_eyre::eyre::eyre!("Erro ao buscar. Tente novamente."))?;
            if !output.is_human() {
                output.emit(&found);
            } else if found.is_empty() {
                output.info("Nenhum resultado...");
            } else {
                output.table(&render::roulette(&found));
                output.println("Adicione com 'fudidoflix sorte roulette add <tipo> <id>'".dimmed().to_string());
            }
        }
        RouletteCommands::Add { kind, id } => {
            let item = sorte::candidate_for(ctx.source()?.as_ref(), kind, id).await?;
            if store.add_roulette_item(item.clone()) {
                output.success(format!("{} adicionado à roleta", item.title));
            } else {
                output.info(format!("{} já está na roleta", item.title));
            }
        }
        RouletteCommands::Remove { id } => {
            if store.remove_roulette_item(id) {
                output.success(format!("{} removido da roleta", id));
            } else {
                output.warn(format!("{} não está na roleta", id));
            }
        }
        RouletteCommands::Spin => spin(ctx, output).await?,
    }
    Ok(())
}

async fn spin(ctx: &AppContext, output: &Output) -> Result<()> {
    let config = &ctx.config.sorte;
    let duration = Duration::from_millis(config.spin_duration_ms);
    let mut wheel = Wheel::default();
    let mut rng = ctx.rng();

    let activity = Activity::countdown("Girando a roleta...", duration, output.is_human());
    let started = Instant::now();
    let spinning = sorte::spin_saved(&ctx.store, &mut wheel, config, &mut rng);
    tokio::pin!(spinning);
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let result = loop {
        tokio::select! {
            result = &mut spinning => break result,
            _ = ticker.tick() => activity.tick_to(started.elapsed()),
        }
    };
    activity.finish();

    let (plan, winner) = result?;
    debug!(rotation = plan.final_rotation, "Wheel stopped");
    if !output.is_human() {
        output.emit(&json!({ "plan": plan, "winner": winner }));
        return Ok(());
    }
    output.success(format!("A roleta escolheu: {}", winner.title.bold()));
    if let Some(poster) = ctx.images.poster(Some(&winner.poster_path)) {
        output.println(poster.dimmed().to_string());
    }
    output.println(
        format!("fudidoflix details {} {}", winner.media_type, winner.id)
            .dimmed()
            .to_string(),
    );
    Ok(())
}

async fn people(ctx: &AppContext, query: Option<String>, output: &Output) -> Result<()> {
    let source = ctx.source()?;
    match query {
        None => {
            let people = sorte::popular_people(source.as_ref()).await?;
            if output.is_human() {
                output.println(render::section("Pessoas populares"));
                output.table(&render::people(&people));
            } else {
                output.emit(&people);
            }
        }
        Some(query) => {
            let found = sorte::find(source.as_ref(), &query).await?;
            if !output.is_human() {
                output.emit(&found);
                return Ok(());
            }
            output.println(render::section("Pessoas"));
            if found.people.is_empty() {
                output.info("Nenhuma pessoa encontrada.");
            } else {
                output.table(&render::people(&found.people));
            }
            output.println(render::section("Estúdios"));
            if found.studios.is_empty() {
                output.info("Nenhum estúdio encontrado.");
            } else {
                output.table(&render::companies(&found.studios));
            }
        }
    }
    Ok(())
}
