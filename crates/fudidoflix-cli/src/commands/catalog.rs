use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::ui::Activity;
use color_eyre::Result;
use fudidoflix_core::catalog::{
    self, fetch_hero, filter_presets, find_preset, find_sort, home_rows, sort_options, BrowseCursor,
    BrowseType, DiscoverQuery, HOME_CATEGORIES,
};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_home(ctx: &AppContext, limit: usize, output: &Output) -> Result<()> {
    let source = ctx.source()?;
    let mut rng = ctx.rng();

    let activity = Activity::start("Carregando a página inicial...", output.is_human());
    let (hero, rows) = futures::join!(
        fetch_hero(source.as_ref(), &mut rng),
        home_rows(source.as_ref(), &ctx.store, HOME_CATEGORIES)
    );
    activity.finish();

    if !output.is_human() {
        output.emit(&json!({ "hero": hero, "rows": rows }));
        return Ok(());
    }

    if let Some(hero) = &hero {
        output.println(format!("{} {}", "★".yellow(), hero.display_title().bold()));
        if let Some(overview) = &hero.overview {
            output.println(overview);
        }
        if let Some(url) = ctx.images.backdrop(hero.backdrop_path.as_deref()) {
            output.println(url.dimmed().to_string());
        }
    }
    if rows.is_empty() {
        output.warn("Nenhuma categoria pôde ser carregada.");
    }
    for row in &rows {
        output.println(render::section(&row.title));
        output.table(&render::home_row(row, limit));
    }
    Ok(())
}

pub fn list_filters(browse: BrowseType, output: &Output) {
    let kind = browse.media_kind();
    if !output.is_human() {
        output.emit(&json!({
            "categories": filter_presets(kind),
            "sorts": sort_options(kind),
        }));
        return;
    }
    output.println(render::section("Categorias"));
    for preset in filter_presets(kind) {
        output.println(format!("  {}", preset.name));
    }
    output.println(render::section("Ordenação"));
    for sort in sort_options(kind) {
        output.println(format!("  {} ({})", sort.name, sort.value.dimmed()));
    }
}

pub async fn run_browse(
    ctx: &AppContext,
    browse: BrowseType,
    sort: Option<String>,
    category: Option<String>,
    page: u32,
    pages: u32,
    output: &Output,
) -> Result<()> {
    let kind = browse.media_kind();
    let mut query = DiscoverQuery::new(browse);
    if let Some(category) = category {
        query = query.with_preset(find_preset(kind, &category)?);
    }
    if let Some(sort) = sort {
        query = query.with_sort(find_sort(kind, &sort)?.value);
    }

    let source = ctx.source()?;
    let mut cursor = BrowseCursor::new(query.with_page(page.max(1)));
    let mut results = Vec::new();
    let activity = Activity::start(format!("Carregando {}...", browse.title()), output.is_human());
    for _ in 0..pages.max(1) {
        if cursor.is_exhausted() {
            break;
        }
        match cursor.load_next(source.as_ref(), ctx.region()).await {
            Some(items) => results.extend(items),
            None => break,
        }
    }
    activity.finish();

    let (Some(last_page), Some(total_pages)) = (cursor.last_page(), cursor.total_pages()) else {
        return Err(color_eyre::eyre::eyre!("Erro ao carregar. Tente novamente."));
    };

    if !output.is_human() {
        output.emit(&json!({
            "type": browse,
            "page": last_page,
            "total_pages": total_pages,
            "results": results,
        }));
        return Ok(());
    }

    output.println(render::section(browse.title()));
    if results.is_empty() {
        output.info("Nenhum título encontrado.");
    } else {
        output.table(&render::media_items(&results));
    }
    output.println(format!("Página {} de {}", last_page, total_pages).dimmed().to_string());
    if !cursor.is_exhausted() {
        output.println(
            format!("Mais títulos com --page {}", cursor.query().page)
                .dimmed()
                .to_string(),
        );
    }
    Ok(())
}

pub async fn run_search(ctx: &AppContext, query: &str, output: &Output) -> Result<()> {
    let source = ctx.source()?;
    let results = catalog::search(source.as_ref(), query)
        .await?
        .ok_or_else(|| color_eyre::eyre::eyre!("Erro ao buscar. Tente novamente."))?;

    if !output.is_human() {
        output.emit(&json!({ "query": query, "results": results }));
        return Ok(());
    }
    if results.is_empty() {
        output.info(format!("Nenhum resultado encontrado para \"{}\".", query));
    } else {
        output.table(&render::media_items(&results));
    }
    Ok(())
}
